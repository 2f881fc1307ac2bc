//! Commands for Group operations

use crate::domain::{Group, GroupId};
use crate::services::Caller;
use crate::AppState;

pub async fn create_group(state: &AppState, caller: &Caller, name: String) -> Result<Group, String> {
    state.groups.create(caller, &name).await.map_err(|e| e.to_string())
}

pub async fn list_groups(state: &AppState, caller: &Caller) -> Result<Vec<Group>, String> {
    state.groups.list(caller).await.map_err(|e| e.to_string())
}

pub async fn get_group(state: &AppState, caller: &Caller, id: GroupId) -> Result<Group, String> {
    state.groups.get(caller, &id).await.map_err(|e| e.to_string())
}
