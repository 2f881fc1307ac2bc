//! Bulk Import
//!
//! Turns raw import records into objects and stores them in a collection's
//! containers. Three routing modes:
//! - manual: everything into the first container (a default one is created
//!   when the collection has none)
//! - target: everything into a caller-chosen container
//! - automatic: capacity-aware routing through the distribution planner
//!
//! Bad records are reported per item and skipped. Storage failures abort
//! the call; in automatic mode containers written before the failure stay
//! written.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::distribution::{plan_distribution, CapacityWarning, ImportItem};
use crate::domain::{
    validate_name, Collection, CollectionId, Container, ContainerId, ContainerProps,
    ContainerType, DomainError, DomainResult, Object, ObjectProps, ObjectType, Properties,
};
use crate::services::Caller;

use super::context::Stores;

pub const DEFAULT_CONTAINER_NAME: &str = "Default Container";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionMode {
    #[default]
    Manual,
    Target,
    Automatic,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkImportRequest {
    pub collection_id: CollectionId,
    #[serde(alias = "data")]
    pub items: Vec<ImportItem>,
    #[serde(default)]
    pub distribution_mode: DistributionMode,
    /// Required in target mode
    #[serde(default)]
    pub target_container_id: Option<ContainerId>,
    #[serde(default)]
    pub default_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkImportResponse {
    pub imported: usize,
    pub failed: usize,
    /// `imported + failed`
    pub total: usize,
    /// Items the planner could not place (automatic mode only)
    pub unassigned: usize,
    pub errors: Vec<String>,
    pub capacity_warnings: Vec<CapacityWarning>,
    /// Objects stored per container
    pub assignments: BTreeMap<ContainerId, usize>,
}

impl BulkImportResponse {
    fn record(&mut self, outcome: Result<ContainerId, String>) {
        match outcome {
            Ok(container_id) => {
                self.imported += 1;
                *self.assignments.entry(container_id).or_default() += 1;
            }
            Err(message) => {
                self.failed += 1;
                self.errors.push(message);
            }
        }
    }

    fn finish(mut self) -> Self {
        self.total = self.imported + self.failed;
        self
    }
}

enum Persist {
    Create,
    Update,
}

pub struct BulkImportService {
    stores: Stores,
}

impl BulkImportService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn execute(&self, caller: &Caller, request: BulkImportRequest) -> DomainResult<BulkImportResponse> {
        let collection = self
            .stores
            .accessible_collection(caller, &request.collection_id)
            .await?;

        let response = match request.distribution_mode {
            DistributionMode::Automatic => self.import_automatic(&collection, &request).await?,
            DistributionMode::Target => {
                let container = self
                    .target_container(&collection, request.target_container_id.as_ref())
                    .await?;
                self.import_into(container, &collection, &request, Persist::Update)
                    .await?
            }
            DistributionMode::Manual => {
                let first = self
                    .stores
                    .containers
                    .list_by_collection(&collection.id)
                    .await?
                    .into_iter()
                    .next();
                match first {
                    Some(container) => {
                        self.import_into(container, &collection, &request, Persist::Update)
                            .await?
                    }
                    None => {
                        let container = Container::new(ContainerProps {
                            collection_id: collection.id.clone(),
                            name: DEFAULT_CONTAINER_NAME.to_string(),
                            container_type: ContainerType::General,
                            ..Default::default()
                        })?;
                        self.import_into(container, &collection, &request, Persist::Create)
                            .await?
                    }
                }
            }
        };

        log::info!(
            "bulk import into collection {}: {} imported, {} failed, {} unassigned",
            collection.id,
            response.imported,
            response.failed,
            response.unassigned
        );
        Ok(response)
    }

    async fn target_container(
        &self,
        collection: &Collection,
        target_id: Option<&ContainerId>,
    ) -> DomainResult<Container> {
        let target_id = target_id.ok_or_else(|| {
            DomainError::InvalidInput(
                "target container ID required for target distribution mode".to_string(),
            )
        })?;
        let container = self.stores.find_container(target_id).await?;
        if container.collection_id != collection.id {
            return Err(DomainError::InvalidInput(
                "target container does not belong to this collection".to_string(),
            ));
        }
        Ok(container)
    }

    /// Every valid item goes into `container`, written once if anything landed
    async fn import_into(
        &self,
        mut container: Container,
        collection: &Collection,
        request: &BulkImportRequest,
        persist: Persist,
    ) -> DomainResult<BulkImportResponse> {
        let mut response = BulkImportResponse::default();

        for item in &request.items {
            let outcome = build_object(item, collection.object_type, &request.default_tags)
                .map(|object| {
                    container.add_object(object);
                    container.id.clone()
                });
            response.record(outcome);
        }

        if response.imported > 0 {
            let written = match persist {
                Persist::Create => self.stores.containers.create(&container).await,
                Persist::Update => self.stores.containers.update(&container).await,
            };
            if let Err(e) = written {
                log::error!("failed to save container {}: {}", container.id, e);
                return Err(e);
            }
        }

        Ok(response.finish())
    }

    async fn import_automatic(
        &self,
        collection: &Collection,
        request: &BulkImportRequest,
    ) -> DomainResult<BulkImportResponse> {
        let containers = self
            .stores
            .containers
            .list_by_collection(&collection.id)
            .await?;
        let plan = plan_distribution(&containers, &request.items, collection.object_type);
        if plan.assigned_items == 0 {
            return Err(DomainError::Conflict(
                "no containers available for automatic distribution".to_string(),
            ));
        }

        // Fresh copies of every assigned container, in first-assignment order
        let mut touched: Vec<Container> = Vec::new();
        let mut slots: HashMap<ContainerId, Option<usize>> = HashMap::new();
        for assignment in &plan.assignments {
            if slots.contains_key(&assignment.container_id) {
                continue;
            }
            let slot = match self
                .stores
                .containers
                .find_by_id(assignment.container_id.clone())
                .await?
            {
                Some(container) => {
                    touched.push(container);
                    Some(touched.len() - 1)
                }
                None => {
                    log::warn!("container {} vanished during import", assignment.container_id);
                    None
                }
            };
            slots.insert(assignment.container_id.clone(), slot);
        }

        let mut response = BulkImportResponse {
            unassigned: plan.unassigned_items,
            ..Default::default()
        };
        for assignment in &plan.assignments {
            let item = &request.items[assignment.item_index];
            let outcome = build_object(item, collection.object_type, &request.default_tags)
                .and_then(|object| {
                    match slots.get(&assignment.container_id).copied().flatten() {
                        Some(slot) => {
                            touched[slot].add_object(object);
                            Ok(assignment.container_id.clone())
                        }
                        None => Err(format!(
                            "container {} not found for object '{}'",
                            assignment.container_id, object.name
                        )),
                    }
                });
            response.record(outcome);
        }

        for container in touched
            .iter()
            .filter(|c| response.assignments.contains_key(&c.id))
        {
            if let Err(e) = self.stores.containers.update(container).await {
                log::error!("failed to update container {}: {}", container.id, e);
                return Err(e);
            }
        }

        if response.failed > 0 {
            log::warn!("{} item(s) rejected during automatic import", response.failed);
        }
        response.capacity_warnings = plan.capacity_warnings;
        Ok(response.finish())
    }
}

/// Build an object from one import record, or describe why it was rejected
fn build_object(item: &ImportItem, object_type: ObjectType, default_tags: &[String]) -> Result<Object, String> {
    let name = match item.get("name") {
        None => return Err("missing required field: name".to_string()),
        Some(Value::String(name)) if !name.is_empty() => name,
        Some(_) => return Err("invalid name: must be a non-empty string".to_string()),
    };
    if let Err(e) = validate_name("object", name) {
        return Err(format!("invalid object name '{}': {}", name, e));
    }

    let properties: Properties = item
        .iter()
        .filter(|(key, _)| key.as_str() != "name" && key.as_str() != "tags")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let mut tags = default_tags.to_vec();
    if let Some(Value::Array(item_tags)) = item.get("tags") {
        tags.extend(item_tags.iter().filter_map(Value::as_str).map(str::to_string));
    }

    Object::new(ObjectProps {
        name: name.clone(),
        object_type,
        properties,
        tags,
        ..Default::default()
    })
    .map_err(|e| format!("failed to create object '{}': {}", name, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Severity;
    use crate::repository::{init_db, ContainerRepository, Repository};
    use crate::usecases::testing::{
        caller, seed_collection, seed_container, setup, setup_with_containers, FlakyContainerStore,
        TestEnv,
    };
    use serde_json::json;
    use std::sync::Arc;

    fn items(n: usize) -> Vec<ImportItem> {
        (1..=n)
            .map(|i| json!({ "name": format!("item {}", i) }).as_object().cloned().unwrap())
            .collect()
    }

    fn request(collection_id: &CollectionId, mode: DistributionMode, items: Vec<ImportItem>) -> BulkImportRequest {
        BulkImportRequest {
            collection_id: collection_id.clone(),
            items,
            distribution_mode: mode,
            ..Default::default()
        }
    }

    async fn stored(env: &TestEnv, id: &ContainerId) -> Container {
        env.stores.containers.find_by_id(id.clone()).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_automatic_single_container_overflow() {
        let env = setup().await;
        let collection = seed_collection(&env, "alice", ObjectType::General).await;
        let shelf = Container::new(ContainerProps {
            collection_id: collection.id.clone(),
            name: "Shelf".to_string(),
            container_type: ContainerType::Shelf,
            width: Some(10.0),
            rows: Some(2),
            ..Default::default()
        })
        .unwrap();
        env.stores.containers.create(&shelf).await.unwrap();

        let service = BulkImportService::new(env.stores.clone());
        let response = service
            .execute(&caller("alice"), request(&collection.id, DistributionMode::Automatic, items(25)))
            .await
            .unwrap();

        assert_eq!(response.imported, 20);
        assert_eq!(response.failed, 0);
        assert_eq!(response.unassigned, 5);
        assert_eq!(response.total, 20);
        assert_eq!(response.assignments.get(&shelf.id), Some(&20));
        assert_eq!(response.capacity_warnings.len(), 1);
        assert_eq!(response.capacity_warnings[0].severity, Severity::Warning);
        assert_eq!(stored(&env, &shelf.id).await.object_count(), 20);
    }

    #[tokio::test]
    async fn test_automatic_two_containers() {
        let env = setup().await;
        let collection = seed_collection(&env, "alice", ObjectType::General).await;
        let small = seed_container(&env, &collection.id, "Small", ContainerType::Shelf, None, Some(5.0)).await;
        let large = seed_container(&env, &collection.id, "Large", ContainerType::Shelf, None, Some(10.0)).await;

        let service = BulkImportService::new(env.stores.clone());
        let response = service
            .execute(&caller("alice"), request(&collection.id, DistributionMode::Automatic, items(12)))
            .await
            .unwrap();

        assert_eq!(response.imported, 12);
        assert_eq!(response.failed, 0);
        assert_eq!(response.assignments.get(&large.id), Some(&10));
        assert_eq!(response.assignments.get(&small.id), Some(&2));
        assert_eq!(response.capacity_warnings.len(), 1);
        assert_eq!(response.capacity_warnings[0].container_id, large.id);
        assert_eq!(stored(&env, &small.id).await.object_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_name_is_soft_failure() {
        let env = setup().await;
        let collection = seed_collection(&env, "alice", ObjectType::General).await;
        let shelf = seed_container(&env, &collection.id, "Shelf", ContainerType::Shelf, None, None).await;

        let mut batch = items(3);
        batch.insert(1, json!({"title": "no name"}).as_object().cloned().unwrap());
        batch.push(json!({"name": 42}).as_object().cloned().unwrap());
        batch.push(json!({"name": "x".repeat(256)}).as_object().cloned().unwrap());

        let service = BulkImportService::new(env.stores.clone());
        let response = service
            .execute(&caller("alice"), request(&collection.id, DistributionMode::Manual, batch))
            .await
            .unwrap();

        assert_eq!(response.imported, 3);
        assert_eq!(response.failed, 3);
        assert_eq!(response.total, 6);
        assert!(response.errors[0].contains("missing required field: name"));
        assert_eq!(response.errors[1], "invalid name: must be a non-empty string");
        assert!(response.errors[2].starts_with("invalid object name 'xxx"));
        assert_eq!(stored(&env, &shelf.id).await.object_count(), 3);
    }

    #[tokio::test]
    async fn test_orphan_container_skipped_by_automatic() {
        let env = setup().await;
        let collection = seed_collection(&env, "alice", ObjectType::General).await;
        let orphan = seed_container(
            &env,
            &collection.id,
            "Orphan",
            ContainerType::Shelf,
            Some(&ContainerId::from("gone")),
            Some(1000.0),
        )
        .await;
        let shelf = seed_container(&env, &collection.id, "Shelf", ContainerType::Shelf, None, Some(10.0)).await;

        let service = BulkImportService::new(env.stores.clone());
        let response = service
            .execute(&caller("alice"), request(&collection.id, DistributionMode::Automatic, items(4)))
            .await
            .unwrap();

        assert_eq!(response.assignments.get(&shelf.id), Some(&4));
        assert!(!response.assignments.contains_key(&orphan.id));
        assert_eq!(stored(&env, &orphan.id).await.object_count(), 0);
    }

    #[tokio::test]
    async fn test_properties_and_tags() {
        let env = setup().await;
        let collection = seed_collection(&env, "alice", ObjectType::Book).await;
        let shelf = seed_container(&env, &collection.id, "Shelf", ContainerType::Shelf, None, None).await;

        let item = json!({
            "name": "Dune",
            "pages": 412,
            "read": true,
            "authors": ["Frank Herbert"],
            "tags": ["scifi", 7, "classic"]
        });
        let mut req = request(
            &collection.id,
            DistributionMode::Target,
            vec![item.as_object().cloned().unwrap()],
        );
        req.target_container_id = Some(shelf.id.clone());
        req.default_tags = vec!["import".to_string(), "scifi".to_string()];

        let service = BulkImportService::new(env.stores.clone());
        let response = service.execute(&caller("alice"), req).await.unwrap();
        assert_eq!(response.imported, 1);
        assert!(response.capacity_warnings.is_empty());

        let mut shelf_now = stored(&env, &shelf.id).await;
        let object = shelf_now.objects.remove(0);
        assert_eq!(object.object_type, ObjectType::Book);
        assert_eq!(object.tags, vec!["import", "scifi", "scifi", "classic"]);
        assert_eq!(object.properties.len(), 3);
        assert_eq!(object.property("authors"), Some(&json!(["Frank Herbert"])));
        assert_eq!(object.property("read"), Some(&json!(true)));
        assert!(object.property("name").is_none());
    }

    #[tokio::test]
    async fn test_target_mode_errors() {
        let env = setup().await;
        let alice = caller("alice");
        let collection = seed_collection(&env, "alice", ObjectType::General).await;
        let other = seed_collection(&env, "alice", ObjectType::General).await;
        let foreign = seed_container(&env, &other.id, "Elsewhere", ContainerType::Shelf, None, None).await;
        let service = BulkImportService::new(env.stores.clone());

        let no_target = request(&collection.id, DistributionMode::Target, items(1));
        assert!(matches!(
            service.execute(&alice, no_target).await,
            Err(DomainError::InvalidInput(_))
        ));

        let mut missing = request(&collection.id, DistributionMode::Target, items(1));
        missing.target_container_id = Some(ContainerId::from("nope"));
        assert!(matches!(service.execute(&alice, missing).await, Err(DomainError::NotFound(_))));

        let mut cross = request(&collection.id, DistributionMode::Target, items(1));
        cross.target_container_id = Some(foreign.id.clone());
        assert!(matches!(service.execute(&alice, cross).await, Err(DomainError::InvalidInput(_))));
        assert_eq!(stored(&env, &foreign.id).await.object_count(), 0);
    }

    #[tokio::test]
    async fn test_manual_creates_default_container() {
        let env = setup().await;
        let collection = seed_collection(&env, "alice", ObjectType::General).await;
        let service = BulkImportService::new(env.stores.clone());

        let response = service
            .execute(&caller("alice"), request(&collection.id, DistributionMode::Manual, items(2)))
            .await
            .unwrap();

        let containers = env.stores.containers.list_by_collection(&collection.id).await.unwrap();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].name, DEFAULT_CONTAINER_NAME);
        assert_eq!(containers[0].container_type, ContainerType::General);
        assert_eq!(containers[0].object_count(), 2);
        assert_eq!(response.assignments.get(&containers[0].id), Some(&2));
    }

    #[tokio::test]
    async fn test_manual_uses_first_container() {
        let env = setup().await;
        let collection = seed_collection(&env, "alice", ObjectType::General).await;
        let first = seed_container(&env, &collection.id, "First", ContainerType::Room, None, Some(1.0)).await;
        let second = seed_container(&env, &collection.id, "Second", ContainerType::Shelf, None, None).await;
        let service = BulkImportService::new(env.stores.clone());

        let response = service
            .execute(&caller("alice"), request(&collection.id, DistributionMode::Manual, items(3)))
            .await
            .unwrap();

        assert_eq!(response.imported, 3);
        assert_eq!(response.unassigned, 0);
        assert_eq!(stored(&env, &first.id).await.object_count(), 3);
        assert_eq!(stored(&env, &second.id).await.object_count(), 0);
    }

    #[tokio::test]
    async fn test_access_denied_imports_nothing() {
        let env = setup().await;
        let collection = seed_collection(&env, "alice", ObjectType::General).await;
        let shelf = seed_container(&env, &collection.id, "Shelf", ContainerType::Shelf, None, None).await;
        let service = BulkImportService::new(env.stores.clone());

        let result = service
            .execute(&caller("mallory"), request(&collection.id, DistributionMode::Automatic, items(2)))
            .await;
        assert!(matches!(result, Err(DomainError::AccessDenied(_))));
        assert_eq!(stored(&env, &shelf.id).await.object_count(), 0);
    }

    #[tokio::test]
    async fn test_automatic_without_containers_fails() {
        let env = setup().await;
        let collection = seed_collection(&env, "alice", ObjectType::General).await;
        let service = BulkImportService::new(env.stores.clone());

        let result = service
            .execute(&caller("alice"), request(&collection.id, DistributionMode::Automatic, items(2)))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_one_write_per_touched_container() {
        let db = init_db(":memory:").await.unwrap();
        let store = Arc::new(FlakyContainerStore::new(ContainerRepository::new(db.connection())));
        let env = setup_with_containers(db.connection(), store.clone());

        let collection = seed_collection(&env, "alice", ObjectType::General).await;
        seed_container(&env, &collection.id, "Small", ContainerType::Shelf, None, Some(5.0)).await;
        seed_container(&env, &collection.id, "Large", ContainerType::Shelf, None, Some(10.0)).await;
        seed_container(&env, &collection.id, "Spare", ContainerType::Shelf, None, Some(1.0)).await;

        let service = BulkImportService::new(env.stores.clone());
        let response = service
            .execute(&caller("alice"), request(&collection.id, DistributionMode::Automatic, items(12)))
            .await
            .unwrap();

        assert_eq!(response.imported, 12);
        assert_eq!(response.assignments.len(), 2);
        assert_eq!(store.update_calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_earlier_containers() {
        let db = init_db(":memory:").await.unwrap();
        let plain = ContainerRepository::new(db.connection());
        let flaky: Arc<FlakyContainerStore> =
            Arc::new(FlakyContainerStore::new(ContainerRepository::new(db.connection())).fail_updates_from(2));
        let env = setup_with_containers(db.connection(), flaky);

        let collection = seed_collection(&env, "alice", ObjectType::General).await;
        let large = seed_container(&env, &collection.id, "Large", ContainerType::Shelf, None, Some(3.0)).await;
        let small = seed_container(&env, &collection.id, "Small", ContainerType::Shelf, None, Some(2.0)).await;

        let service = BulkImportService::new(env.stores.clone());
        let result = service
            .execute(&caller("alice"), request(&collection.id, DistributionMode::Automatic, items(5)))
            .await;

        assert!(matches!(result, Err(DomainError::Internal(_))));
        let large_now = plain.find_by_id(large.id.clone()).await.unwrap().unwrap();
        let small_now = plain.find_by_id(small.id.clone()).await.unwrap().unwrap();
        assert_eq!(large_now.object_count(), 3);
        assert_eq!(small_now.object_count(), 0);
    }

    #[tokio::test]
    async fn test_vanished_container_items_are_soft_errors() {
        let db = init_db(":memory:").await.unwrap();
        let seeding = setup_with_containers(
            db.connection(),
            Arc::new(ContainerRepository::new(db.connection())),
        );
        let collection = seed_collection(&seeding, "alice", ObjectType::General).await;
        let large = seed_container(&seeding, &collection.id, "Large", ContainerType::Shelf, None, Some(2.0)).await;
        let small = seed_container(&seeding, &collection.id, "Small", ContainerType::Shelf, None, Some(1.0)).await;

        let flaky = FlakyContainerStore::new(ContainerRepository::new(db.connection())).hide(&small.id);
        let env = setup_with_containers(db.connection(), Arc::new(flaky));
        let service = BulkImportService::new(env.stores.clone());

        let response = service
            .execute(&caller("alice"), request(&collection.id, DistributionMode::Automatic, items(3)))
            .await
            .unwrap();

        assert_eq!(response.imported, 2);
        assert_eq!(response.failed, 1);
        assert_eq!(response.total, 3);
        assert_eq!(
            response.errors,
            vec![format!("container {} not found for object 'item 3'", small.id)]
        );
        assert_eq!(response.assignments.get(&large.id), Some(&2));
    }

    #[test]
    fn test_request_wire_format() {
        let req: BulkImportRequest = serde_json::from_value(json!({
            "collection_id": "c1",
            "data": [{"name": "a"}],
            "distribution_mode": "automatic",
            "default_tags": ["x"]
        }))
        .unwrap();

        assert_eq!(req.distribution_mode, DistributionMode::Automatic);
        assert_eq!(req.items.len(), 1);
        assert!(req.target_container_id.is_none());

        let defaulted: BulkImportRequest =
            serde_json::from_value(json!({"collection_id": "c1", "items": []})).unwrap();
        assert_eq!(defaulted.distribution_mode, DistributionMode::Manual);
    }
}
