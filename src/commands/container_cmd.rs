//! Commands for Container operations

use crate::domain::{CollectionId, Container, ContainerId};
use crate::services::Caller;
use crate::usecases::{CreateContainerInput, UpdateContainerInput};
use crate::AppState;

/// Create a container, optionally nested under a parent
pub async fn create_container(
    state: &AppState,
    caller: &Caller,
    input: CreateContainerInput,
) -> Result<Container, String> {
    state.containers.create(caller, input).await.map_err(|e| e.to_string())
}

/// Containers of a collection in creation order
pub async fn list_containers(
    state: &AppState,
    caller: &Caller,
    collection_id: CollectionId,
) -> Result<Vec<Container>, String> {
    state
        .containers
        .list(caller, &collection_id)
        .await
        .map_err(|e| e.to_string())
}

pub async fn get_container(state: &AppState, caller: &Caller, id: ContainerId) -> Result<Container, String> {
    state.containers.get(caller, &id).await.map_err(|e| e.to_string())
}

pub async fn update_container(
    state: &AppState,
    caller: &Caller,
    id: ContainerId,
    input: UpdateContainerInput,
) -> Result<Container, String> {
    state
        .containers
        .update(caller, &id, input)
        .await
        .map_err(|e| e.to_string())
}

pub async fn delete_container(state: &AppState, caller: &Caller, id: ContainerId) -> Result<(), String> {
    state.containers.delete(caller, &id).await.map_err(|e| e.to_string())
}
