//! Commands for Collection operations

use crate::domain::{Collection, CollectionId};
use crate::services::Caller;
use crate::usecases::{CreateCollectionInput, UpdateCollectionInput};
use crate::AppState;

/// Create a new collection owned by the caller
pub async fn create_collection(
    state: &AppState,
    caller: &Caller,
    input: CreateCollectionInput,
) -> Result<Collection, String> {
    state.collections.create(caller, input).await.map_err(|e| e.to_string())
}

/// Collections the caller owns or shares through a group
pub async fn list_collections(state: &AppState, caller: &Caller) -> Result<Vec<Collection>, String> {
    state.collections.list(caller).await.map_err(|e| e.to_string())
}

pub async fn get_collection(
    state: &AppState,
    caller: &Caller,
    id: CollectionId,
) -> Result<Collection, String> {
    state.collections.get(caller, &id).await.map_err(|e| e.to_string())
}

pub async fn update_collection(
    state: &AppState,
    caller: &Caller,
    id: CollectionId,
    input: UpdateCollectionInput,
) -> Result<Collection, String> {
    state
        .collections
        .update(caller, &id, input)
        .await
        .map_err(|e| e.to_string())
}

pub async fn delete_collection(state: &AppState, caller: &Caller, id: CollectionId) -> Result<(), String> {
    state.collections.delete(caller, &id).await.map_err(|e| e.to_string())
}
