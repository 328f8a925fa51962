use crate::storage::PetRepository;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::sync::Mutex;
use utoipa::ToSchema;

/// Shared application state. The store is the process-wide session; the mutex
/// serialises requests so only one handler uses it at a time.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<dyn PetRepository>>,
}

impl AppState {
    pub fn new<R: PetRepository + 'static>(store: R) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
