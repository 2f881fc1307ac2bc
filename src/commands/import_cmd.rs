//! Command for bulk import

use crate::services::Caller;
use crate::usecases::{BulkImportRequest, BulkImportResponse};
use crate::AppState;

/// Import a batch of records into a collection
pub async fn bulk_import(
    state: &AppState,
    caller: &Caller,
    request: BulkImportRequest,
) -> Result<BulkImportResponse, String> {
    state.bulk_import.execute(caller, request).await.map_err(|e| e.to_string())
}
