//! Application startup and lifecycle management.
//!
//! Wires collaborators (store, mail transport, text generator) into shared
//! state, builds the router with CORS and tracing layers, and serves it.

use crate::config::AppConfig;
use crate::error::AppError;
use crate::handlers::{
    chatbot::chatbot,
    contact::submit_contact,
    health::{health_check, liveness, readiness_check},
    method_not_allowed,
};
use crate::services::providers::{
    CallJournal, ContactStore, GeminiGenerator, MailTransport, MockMailTransport,
    MockTextGenerator, SmtpMailer, TextGenerator,
};
use crate::services::ContactDb;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state, cloned per request. Collaborators sit behind
/// trait objects so tests can substitute recording mocks.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn ContactStore>,
    pub mailer: Arc<dyn MailTransport>,
    pub generator: Arc<dyn TextGenerator>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors.allowed_origins);

    Router::new()
        .route("/", get(liveness))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route(
            "/api/contact",
            post(submit_contact).fallback(method_not_allowed),
        )
        .route("/api/chatbot", post(chatbot).fallback(method_not_allowed))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration. Collaborators
    /// disabled in config are replaced with mocks so the service can run
    /// without SMTP or Gemini credentials.
    pub async fn build(config: AppConfig) -> Result<Self, AppError> {
        let db = ContactDb::connect(&config.mongo.uri, &config.mongo.database).await?;
        db.initialize_indexes().await?;
        let store: Arc<dyn ContactStore> = Arc::new(db);

        let mailer: Arc<dyn MailTransport> = if config.mail.enabled {
            match SmtpMailer::new(config.mail.clone()) {
                Ok(mailer) => {
                    tracing::info!("SMTP mail transport initialized");
                    Arc::new(mailer)
                }
                Err(e) => {
                    tracing::warn!("Failed to initialize SMTP transport: {}. Using mock.", e);
                    Arc::new(MockMailTransport::new(CallJournal::default()))
                }
            }
        } else {
            tracing::warn!("SMTP transport disabled, using mock mail transport");
            Arc::new(MockMailTransport::new(CallJournal::default()))
        };

        let generator: Arc<dyn TextGenerator> = if config.gemini.enabled {
            tracing::info!(model = %config.gemini.model, "Gemini text generator initialized");
            Arc::new(GeminiGenerator::new(config.gemini.clone()))
        } else {
            tracing::warn!("Gemini generator disabled, using mock text generator");
            Arc::new(MockTextGenerator::new(CallJournal::default()))
        };

        // Port 0 binds a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Server listening on port {}", port);

        let state = AppState {
            config,
            store,
            mailer,
            generator,
        };

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router).await
    }
}
