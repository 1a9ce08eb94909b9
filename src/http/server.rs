//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up the middleware pipeline in its one canonical order
//! - Build the collaborator state from configuration
//! - Bind the server to a listener and serve until shutdown
//!
//! # Pipeline Order
//! The layer order is load-bearing and only ever wired here (outermost
//! first): trace → classification → identity → capture → timeout →
//! handler. Classification mints the correlation id and renders failures;
//! identity resolves the caller before capture records it; the timeout
//! sits inside capture so timed-out calls still complete their audit
//! record.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::audit::resilient::ResilientLogger;
use crate::auth::password::Sha256PasswordHasher;
use crate::auth::tokens::TokenIssuer;
use crate::config::schema::AppConfig;
use crate::config::{ConfigError, ValidationError};
use crate::http::handlers::auth::login;
use crate::http::handlers::docs::{docs_index, openapi_document};
use crate::http::handlers::health::health;
use crate::http::handlers::users::{create_user, delete_user, get_user, list_users, update_user};
use crate::http::middleware::{
    capture_request, classify_errors, extract_identity, CaptureState, ClassifyState, IdentityState,
};
use crate::users::repository::MemoryUserRepository;
use crate::users::service::{UserService, ValidationPolicy};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub tokens: Arc<TokenIssuer>,
    pub logger: Arc<ResilientLogger>,
}

impl AppState {
    /// Build the collaborator graph from configuration.
    ///
    /// The audit logger is constructed by the caller (its sinks depend on
    /// deployment wiring); everything else is owned here.
    pub fn from_config(
        config: &AppConfig,
        logger: Arc<ResilientLogger>,
    ) -> Result<Self, ConfigError> {
        let policy = ValidationPolicy::from_config(&config.validation).map_err(|err| {
            ConfigError::Validation(vec![ValidationError {
                field: "validation.email_pattern".to_string(),
                message: err.to_string(),
            }])
        })?;

        let users = Arc::new(UserService::new(
            Arc::new(MemoryUserRepository::new()),
            Arc::new(Sha256PasswordHasher),
            policy,
        ));
        let tokens = Arc::new(TokenIssuer::new(Duration::from_secs(
            config.auth.token_ttl_secs,
        )));

        Ok(Self {
            users,
            tokens,
            logger,
        })
    }
}

/// HTTP server for the accounts API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and state.
    pub fn new(config: &AppConfig, state: AppState) -> Self {
        Self {
            router: build_router(config, state),
        }
    }

    /// Run the server, accepting connections on the given listener, until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(config: &AppConfig, state: AppState) -> Router {
    let capture = CaptureState {
        logger: state.logger.clone(),
        skip_prefixes: Arc::new(config.audit.skip_path_prefixes.clone()),
        max_body_bytes: config.audit.max_body_bytes,
    };
    let identity = IdentityState {
        tokens: state.tokens.clone(),
    };
    let classify = ClassifyState {
        logger: state.logger.clone(),
    };

    // ServiceBuilder applies layers top-down: the first listed is the
    // outermost, matching the order documented above.
    Router::new()
        .route("/health", get(health))
        .route("/docs", get(docs_index))
        .route("/docs/openapi.json", get(openapi_document))
        .route("/auth/login", post(login))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn_with_state(classify, classify_errors))
                .layer(from_fn_with_state(identity, extract_identity))
                .layer(from_fn_with_state(capture, capture_request))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.timeouts.request_secs,
                ))),
        )
}
