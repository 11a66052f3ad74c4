use std::sync::Arc;

use axum::{routing::get, Router};
use codeforum::{api, auth, cache, config::Config, forums, index, AppState};
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("codeforum=info,tower_http=info")),
        )
        .init();

    let config = Config::load();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(config.session_minutes)));

    let app_state = AppState {
        api: api::Client::new(config.api_url),
        store: Arc::new(cache::Store::new()),
    };

    let app = Router::new()
        .route("/", get(index::index))

        .merge(auth::router())
        .nest("/f", forums::router())

        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
        .layer(session_layer);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("could not bind listener");
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await.expect("server exited");
}
