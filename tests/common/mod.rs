use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use portfolio_backend::config::{
    AppConfig, CorsConfig, GeminiConfig, MailConfig, MongoConfig, ServerConfig,
};
use portfolio_backend::services::providers::{
    CallJournal, MockContactStore, MockMailTransport, MockTextGenerator,
};
use portfolio_backend::startup::{build_router, AppState};
use std::sync::Arc;
use tower::util::ServiceExt;

pub const ALLOWED_ORIGIN: &str = "https://allowed.test";
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Router over mock collaborators, with handles kept for assertions.
pub struct TestApp {
    pub router: Router,
    pub journal: CallJournal,
    pub store: Arc<MockContactStore>,
    pub mailer: Arc<MockMailTransport>,
    pub generator: Arc<MockTextGenerator>,
}

impl TestApp {
    pub fn spawn() -> Self {
        let journal = CallJournal::default();
        let store = Arc::new(MockContactStore::new(journal.clone()));
        let mailer = Arc::new(MockMailTransport::new(journal.clone()));
        let generator = Arc::new(MockTextGenerator::new(journal.clone()));

        let state = AppState {
            config: test_config(),
            store: store.clone(),
            mailer: mailer.clone(),
            generator: generator.clone(),
        };

        Self {
            router: build_router(state),
            journal,
            store,
            mailer,
            generator,
        }
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(path)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("Failed to build request"),
            )
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let json = serde_json::from_slice(&bytes).expect("Response body was not JSON");
        (status, json)
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request")
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig { port: 0 },
        mongo: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "portfolio_test".to_string(),
        },
        mail: MailConfig {
            host: "smtp.test.local".to_string(),
            port: 587,
            user: "test".to_string(),
            password: "test".to_string(),
            admin_email: ADMIN_EMAIL.to_string(),
            from_name: "Test Operator".to_string(),
            enabled: false,
        },
        gemini: GeminiConfig {
            api_key: "test-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
            enabled: false,
        },
        cors: CorsConfig {
            allowed_origins: vec![ALLOWED_ORIGIN.to_string()],
        },
    }
}
