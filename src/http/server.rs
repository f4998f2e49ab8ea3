//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the demonstration handlers
//! - Wire up middleware (request ID, tracing, timeout, rate limit, principal)
//! - Attach per-route authorization chains
//! - Spawn the rate limit sweeper
//! - Serve until the shutdown signal fires

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::{
    authenticate_middleware, guard_middleware, AuthorizationChain, GuardState, MemoryStore,
    PermissionStore, PrincipalResolver, TokenStore,
};
use crate::config::{validate_config, ConfigError, GateConfig};
use crate::http::handlers;
use crate::lifecycle::Shutdown;
use crate::security::{rate_limit_middleware, RateLimiter};

/// External lookups the gate depends on.
#[derive(Clone)]
pub struct Stores {
    pub tokens: Arc<dyn TokenStore>,
    pub permissions: Arc<dyn PermissionStore>,
}

impl Stores {
    /// Both lookups served by one in-memory store.
    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            tokens: store.clone(),
            permissions: store,
        }
    }
}

/// HTTP server fronted by the admission gate.
pub struct HttpServer {
    router: Router,
    config: GateConfig,
    limiter: Arc<RateLimiter>,
}

impl HttpServer {
    /// Create a new HTTP server. The configuration is validated first so that
    /// nothing downstream (the sweeper interval in particular) sees a zero period.
    pub fn new(config: GateConfig, stores: Stores) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        let resolver = Arc::new(PrincipalResolver::new(
            stores.tokens.clone(),
            config.auth.token_length,
        ));

        let router = Self::build_router(&config, limiter.clone(), resolver, stores.permissions);
        Ok(Self {
            router,
            config,
            limiter,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(
        config: &GateConfig,
        limiter: Arc<RateLimiter>,
        resolver: Arc<PrincipalResolver>,
        permissions: Arc<dyn PermissionStore>,
    ) -> Router {
        let require = |chain| GuardState::new(chain, permissions.clone());

        let movies = get(handlers::list_movies)
            .route_layer(middleware::from_fn_with_state(
                require(AuthorizationChain::permission("movies:read")),
                guard_middleware,
            ))
            .merge(post(handlers::create_movie).route_layer(middleware::from_fn_with_state(
                require(AuthorizationChain::permission("movies:write")),
                guard_middleware,
            )));

        let me = get(handlers::current_user).route_layer(middleware::from_fn_with_state(
            require(AuthorizationChain::activated()),
            guard_middleware,
        ));

        Router::new()
            .route("/v1/healthcheck", get(handlers::healthcheck))
            .route("/v1/users/me", me)
            .route("/v1/movies", movies)
            .layer(middleware::from_fn_with_state(resolver, authenticate_middleware))
            .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Router with every layer applied, for driving without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rate_limit_enabled = self.limiter.is_enabled(),
            "HTTP server starting"
        );

        let sweeper = self.limiter.is_enabled().then(|| {
            self.limiter.registry().spawn_sweeper(
                Duration::from_secs(self.config.rate_limit.sweep_interval_secs),
                shutdown.signalled(),
            )
        });

        let stop = shutdown.signalled();
        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                stop.await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        if let Some(sweeper) = sweeper {
            if let Err(e) = sweeper.await {
                tracing::error!(error = %e, "Rate limit sweeper terminated abnormally");
                return Err(std::io::Error::other(format!("rate limit sweeper failed: {}", e)));
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}
