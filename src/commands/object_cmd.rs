//! Commands for Object operations
//!
//! Objects are addressed through their container.

use crate::domain::{CollectionId, ContainerId, Object, ObjectId};
use crate::services::Caller;
use crate::usecases::{CreateObjectInput, UpdateObjectInput};
use crate::AppState;

pub async fn create_object(
    state: &AppState,
    caller: &Caller,
    container_id: ContainerId,
    input: CreateObjectInput,
) -> Result<Object, String> {
    state
        .objects
        .create(caller, &container_id, input)
        .await
        .map_err(|e| e.to_string())
}

pub async fn update_object(
    state: &AppState,
    caller: &Caller,
    container_id: ContainerId,
    object_id: ObjectId,
    input: UpdateObjectInput,
) -> Result<Object, String> {
    state
        .objects
        .update(caller, &container_id, &object_id, input)
        .await
        .map_err(|e| e.to_string())
}

pub async fn delete_object(
    state: &AppState,
    caller: &Caller,
    container_id: ContainerId,
    object_id: ObjectId,
) -> Result<(), String> {
    state
        .objects
        .delete(caller, &container_id, &object_id)
        .await
        .map_err(|e| e.to_string())
}

/// All objects of a collection, container by container
pub async fn list_objects(
    state: &AppState,
    caller: &Caller,
    collection_id: CollectionId,
) -> Result<Vec<Object>, String> {
    state
        .objects
        .list_by_collection(caller, &collection_id)
        .await
        .map_err(|e| e.to_string())
}
