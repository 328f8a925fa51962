use crate::storage::{PetRepository, StoreError};
use crate::transport::http::types::AppState;
use tokio::sync::MutexGuard;

/// Locks the shared session for one request.
///
/// A transaction still open at this point belongs to a request whose future was
/// dropped before it committed or rolled back; it is discarded.
pub async fn lock_store(state: &AppState) -> MutexGuard<'_, dyn PetRepository> {
    let mut store = state.store.lock().await;
    if store.in_transaction() {
        tracing::warn!("Discarding transaction left open by an interrupted request");
        if let Err(e) = store.rollback().await {
            tracing::error!(error = %e, "Rollback of leftover transaction failed");
        }
    }
    store
}

/// Logs a data-access failure. Nothing is surfaced to the user.
pub fn log_store_error(action: &str, err: &StoreError) {
    match err {
        StoreError::OwnerNotFound(owner) => {
            tracing::warn!(action, owner = %owner, "Owner `{}` doesn't exist!", owner);
        }
        StoreError::ConnectionNotOpen => {
            tracing::error!(action, "No database connection!! Connect to database first!");
        }
        StoreError::Database(e) => {
            tracing::error!(action, error = %e, "Failed to execute query");
        }
        StoreError::CorruptRow(detail) => {
            tracing::error!(action, detail = %detail, "Invalid pet row");
        }
    }
}

/// Ends the request's transaction after a failure so the session stays usable.
pub async fn recover(store: &mut dyn PetRepository, action: &str, err: StoreError) {
    log_store_error(action, &err);
    if matches!(err, StoreError::ConnectionNotOpen) {
        return;
    }
    if let Err(e) = store.rollback().await {
        tracing::error!(action, error = %e, "Rollback failed");
    }
}

/// Commits the work in `result`, or logs and rolls back if any step failed.
pub async fn commit_or_recover<T: Send>(
    store: &mut dyn PetRepository,
    action: &str,
    result: Result<T, StoreError>,
) -> Option<T> {
    let outcome = match result {
        Ok(v) => store.commit().await.map(|_| v),
        Err(e) => Err(e),
    };
    match outcome {
        Ok(v) => Some(v),
        Err(e) => {
            recover(store, action, e).await;
            None
        }
    }
}

/// Parses a pet id from a path segment.
pub fn parse_pet_id(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok()
}
