//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;

use tower_http::compression::CompressionLayer;

use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{data, health, surveys};
use crate::core::CoreApp;
use crate::core::constants::{DEFAULT_BODY_LIMIT, WELCOME_MESSAGE};
use crate::data::SurveyRepository;
use crate::domain::MicrodataService;

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(
            &app.config.server.host,
            app.config.server.port,
            &app.config.server.cors_origins,
        );

        Self {
            app,
            allowed_origins,
        }
    }

    /// Serve until shutdown is triggered. Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        let shutdown = app.shutdown.clone();

        let router = router(
            Arc::clone(&app.repository),
            app.microdata.clone(),
            &allowed_origins,
        );

        // Host may be a name such as "localhost"; bind resolves it
        let listener =
            TcpListener::bind((app.config.server.host.as_str(), app.config.server.port)).await?;
        tracing::debug!(addr = %listener.local_addr()?, "HTTP server listening");
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

/// Assemble the full HTTP surface
pub fn router(
    repository: Arc<dyn SurveyRepository>,
    microdata: MicrodataService,
    allowed_origins: &AllowedOrigins,
) -> Router {
    Router::new()
        .route("/", get(|| async { WELCOME_MESSAGE }))
        .route(
            "/api/v1/health",
            get(health::health).with_state(Arc::clone(&repository)),
        )
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/docs", get(swagger_ui_html))
        .route("/api/docs/", get(swagger_ui_html))
        .nest("/api/v1/surveys", surveys::routes(repository))
        .nest("/api/v1/data", data::routes(microdata))
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(middleware::cors(allowed_origins))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
}
