// src/main.rs

use pet_registry::infra::{config, logging};
use pet_registry::transport;
use pet_registry::{PetRepository, PgPetStore};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    logging::init();

    // --- Session Initialization ---
    let database_url = config::database_url()?;
    let mut store = PgPetStore::connect(&database_url).await?;

    // --- Schema ---
    store.create_schema().await?;
    store.commit().await?;
    tracing::info!("Schema ready (owners, pets)");

    // --- HTTP Server ---
    let app_state = transport::http::AppState::new(store);
    let app = transport::http::create_router(app_state.clone())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http());

    let addr = config::bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Pet registry listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    // Uncommitted work is rolled back and the pool closed.
    let mut store = app_state.store.lock().await;
    if let Err(e) = store.disconnect().await {
        tracing::warn!(error = %e, "Disconnect on shutdown failed");
    }
    tracing::info!("Graceful shutdown complete.");
    Ok(())
}
