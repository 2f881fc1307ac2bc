//! Distribution Planner
//!
//! Decides which container each bulk-import record lands in. Pure and
//! synchronous: it reads a snapshot of a collection's containers and never
//! touches storage.
//!
//! Pipeline: tree -> leaf targets -> capacity-ordered allocation -> warnings.

pub mod allocator;
pub mod capacity;
pub mod leaves;
pub mod tree;
pub mod warnings;

use serde::Serialize;

use crate::domain::{Container, ObjectType, Properties};

pub use allocator::{AllocationTarget, Assignment};
pub use warnings::{CapacityWarning, Severity};

/// One raw import record; `"name"` is required by the importer
pub type ImportItem = Properties;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DistributionPlan {
    pub assignments: Vec<Assignment>,
    pub capacity_warnings: Vec<CapacityWarning>,
    pub total_items: usize,
    pub assigned_items: usize,
    pub unassigned_items: usize,
}

/// Plan where `items` should go among `containers` of one collection
pub fn plan_distribution(
    containers: &[Container],
    items: &[ImportItem],
    object_type: ObjectType,
) -> DistributionPlan {
    let tree = tree::ContainerTree::build(containers);
    let mut targets: Vec<AllocationTarget> = leaves::resolve_targets(&tree)
        .into_iter()
        .map(|index| AllocationTarget::from_node(tree.node(index)))
        .collect();

    allocator::order_targets(&mut targets);
    let assignments = allocator::allocate(items, &mut targets, object_type);
    let capacity_warnings = warnings::capacity_warnings(&targets);

    let assigned_items = assignments.len();
    let plan = DistributionPlan {
        assignments,
        capacity_warnings,
        total_items: items.len(),
        assigned_items,
        unassigned_items: items.len() - assigned_items,
    };

    log::debug!(
        "planned {} of {} item(s) across {} target(s)",
        plan.assigned_items,
        plan.total_items,
        targets.len()
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CollectionId, ContainerProps, ContainerType};
    use serde_json::json;

    fn container(
        name: &str,
        kind: ContainerType,
        parent: Option<&Container>,
        width: Option<f64>,
        rows: Option<u32>,
        capacity: Option<f64>,
    ) -> Container {
        Container::new(ContainerProps {
            collection_id: CollectionId::from("c1"),
            name: name.to_string(),
            container_type: kind,
            parent_id: parent.map(|p| p.id.clone()),
            width,
            rows,
            capacity,
            ..Default::default()
        })
        .unwrap()
    }

    fn unit_items(n: usize) -> Vec<ImportItem> {
        (0..n)
            .map(|i| json!({ "name": format!("item {}", i + 1) }).as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_scenario_single_container_overflow_stops() {
        let shelf = container("Shelf", ContainerType::Shelf, None, Some(10.0), Some(2), None);
        let plan = plan_distribution(&[shelf], &unit_items(25), ObjectType::General);

        assert_eq!(plan.assigned_items, 20);
        assert_eq!(plan.unassigned_items, 5);
        assert_eq!(plan.total_items, 25);
        assert_eq!(plan.assignments.last().unwrap().item_index, 19);
        assert_eq!(plan.capacity_warnings.len(), 1);
        assert_eq!(plan.capacity_warnings[0].utilization, 100.0);
        assert_eq!(plan.capacity_warnings[0].severity, Severity::Warning);
    }

    #[test]
    fn test_scenario_two_containers_largest_first() {
        let small = container("Small", ContainerType::Shelf, None, None, None, Some(5.0));
        let large = container("Large", ContainerType::Shelf, None, None, None, Some(10.0));
        let plan = plan_distribution(&[small, large], &unit_items(12), ObjectType::General);

        assert_eq!(plan.assigned_items, 12);
        assert_eq!(plan.unassigned_items, 0);
        assert!(plan.assignments[..10].iter().all(|a| a.container_name == "Large"));
        assert!(plan.assignments[10..].iter().all(|a| a.container_name == "Small"));
        assert_eq!(plan.capacity_warnings.len(), 1);
        assert_eq!(plan.capacity_warnings[0].container_name, "Large");
    }

    #[test]
    fn test_orphan_never_receives_items() {
        let elsewhere = container("Elsewhere", ContainerType::Room, None, None, None, None);
        let orphan = container("Orphan", ContainerType::Shelf, Some(&elsewhere), None, None, Some(1000.0));
        let room = container("Room", ContainerType::Room, None, None, None, None);
        let shelf = container("Shelf", ContainerType::Shelf, Some(&room), None, None, Some(3.0));
        let orphan_id = orphan.id.clone();

        let plan = plan_distribution(&[orphan, room, shelf], &unit_items(4), ObjectType::General);
        assert!(plan.assignments.iter().all(|a| a.container_id != orphan_id));
        assert_eq!(plan.assigned_items, 3);
    }

    #[test]
    fn test_no_containers_leaves_everything_unassigned() {
        let plan = plan_distribution(&[], &unit_items(3), ObjectType::Book);
        assert_eq!(plan.assigned_items, 0);
        assert_eq!(plan.unassigned_items, 3);
        assert!(plan.capacity_warnings.is_empty());
    }

    #[test]
    fn test_existing_objects_reduce_room() {
        let mut busy = container("Busy", ContainerType::Shelf, None, None, None, Some(10.0));
        for i in 0..8 {
            busy.add_object(
                crate::domain::Object::new(crate::domain::ObjectProps {
                    name: format!("old {}", i),
                    ..Default::default()
                })
                .unwrap(),
            );
        }
        let idle = container("Idle", ContainerType::Shelf, None, None, None, Some(5.0));

        let plan = plan_distribution(&[busy, idle], &unit_items(1), ObjectType::General);
        assert_eq!(plan.assignments[0].container_name, "Idle");
    }

    #[test]
    fn test_planning_is_deterministic() {
        let a = container("A", ContainerType::Shelf, None, None, None, Some(4.0));
        let b = container("B", ContainerType::Shelf, None, None, None, Some(4.0));
        let c = container("C", ContainerType::Binder, None, None, None, Some(2.0));
        let containers = vec![a, b, c];
        let items: Vec<ImportItem> = (0..9)
            .map(|i| json!({"name": format!("b{}", i), "pages": 100 * i}).as_object().cloned().unwrap())
            .collect();

        let first = plan_distribution(&containers, &items, ObjectType::Book);
        let second = plan_distribution(&containers, &items, ObjectType::Book);
        assert_eq!(first, second);
        assert_eq!(first.assigned_items + first.unassigned_items, first.total_items);
    }
}
