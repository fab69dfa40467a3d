mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{Config, Environment, StorageBackend};
use crate::core::database::FallbackRepository;
use crate::core::error::init_error_details;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth::{routes as auth_routes, AuthService};
use crate::features::disasters::repositories::{
    DisasterRepository, MemoryDisasterRepository, PgDisasterRepository,
};
use crate::features::disasters::{routes as disasters_routes, DisasterService};
use crate::features::fixtures::FixtureStore;
use crate::features::geocode::routes as geocode_routes;
use crate::features::health::dtos::FeatureFlagsDto;
use crate::features::health::{routes as health_routes, HealthState};
use crate::features::official_updates::{routes as official_updates_routes, OfficialUpdateService};
use crate::features::rate_limits::{rate_limit_middleware, RateLimiter};
use crate::features::realtime::services::{
    AggregatorSources, DisasterSource, EmergencySource, ReportSource, ShelterSource, SocialSource,
    WeatherSource,
};
use crate::features::realtime::{
    routes as realtime_routes, Aggregator, PollerState, RealtimePoller, RealtimeState,
    SnapshotPublisher,
};
use crate::features::reports::repositories::{
    MemoryReportRepository, PgReportRepository, ReportRepository,
};
use crate::features::reports::{routes as reports_routes, ReportService};
use crate::features::resources::repositories::{
    MemoryResourceRepository, PgResourceRepository, ResourceRepository,
};
use crate::features::resources::{routes as resources_routes, ResourceService};
use crate::features::social_media::routes as social_media_routes;
use crate::features::verification::routes as verification_routes;
use crate::features::websocket::routes as websocket_routes;
use crate::modules::ai::{AiService, GeminiClient, GenerativeModel};
use crate::modules::cache::{CacheService, CacheStore, CacheSweeper, MemoryCacheStore, PgCacheStore};
use crate::modules::events::EventHub;
use crate::modules::feeds::FeedsClient;
use crate::modules::geocoding::GeocodingService;
use crate::modules::social::{MastodonClient, SocialService};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Snapshots buffered between the poller and the publisher
const SNAPSHOT_CHANNEL_CAPACITY: usize = 4;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Fail fast and leave restarts to the process supervisor
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("Panic: {}", info);
        std::process::exit(1);
    }));

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    init_error_details(config.app.environment == Environment::Development);

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );
    tracing::info!(
        "Configuration loaded successfully (environment: {})",
        config.app.environment.as_str()
    );

    // Storage: Postgres backed by the fixture store, or the fixture store alone
    let fixtures = Arc::new(FixtureStore::seeded());
    let (disasters_seeded, reports_seeded, resources_seeded) = fixtures.counts().await;
    tracing::info!(
        "Fixture store seeded: {} disasters, {} reports, {} resources",
        disasters_seeded,
        reports_seeded,
        resources_seeded
    );

    let (pool, database_ready) = match (config.database.backend, config.database.url.as_deref()) {
        (StorageBackend::Postgres, Some(url)) => {
            let pool = database::create_pool(&config.database, url)?;
            tracing::info!("Database connection pool created");
            let ready = database::run_migrations(&pool).await;
            (Some(pool), ready)
        }
        _ => {
            tracing::info!("Running on the in-memory fixture store");
            (None, false)
        }
    };

    let disaster_repository: Arc<dyn DisasterRepository> = match &pool {
        Some(pool) => Arc::new(FallbackRepository::new(
            PgDisasterRepository::new(pool.clone()),
            MemoryDisasterRepository::new(fixtures.clone()),
        )),
        None => Arc::new(MemoryDisasterRepository::new(fixtures.clone())),
    };
    let report_repository: Arc<dyn ReportRepository> = match &pool {
        Some(pool) => Arc::new(FallbackRepository::new(
            PgReportRepository::new(pool.clone()),
            MemoryReportRepository::new(fixtures.clone()),
        )),
        None => Arc::new(MemoryReportRepository::new(fixtures.clone())),
    };
    let resource_repository: Arc<dyn ResourceRepository> = match &pool {
        Some(pool) => Arc::new(FallbackRepository::new(
            PgResourceRepository::new(pool.clone()),
            MemoryResourceRepository::new(fixtures.clone()),
        )),
        None => Arc::new(MemoryResourceRepository::new(fixtures.clone())),
    };

    // Cache
    let cache_store: Arc<dyn CacheStore> = match (&pool, database_ready) {
        (Some(pool), true) => {
            tracing::info!("Cache backed by Postgres");
            Arc::new(PgCacheStore::new(pool.clone()))
        }
        _ => {
            tracing::info!("Cache held in memory");
            Arc::new(MemoryCacheStore::new())
        }
    };
    let cache = Arc::new(CacheService::new(cache_store));

    let sweeper = CacheSweeper::new(Arc::clone(&cache), config.cache.sweep_interval);
    tokio::spawn(sweeper.run());
    tracing::info!("Cache sweeper spawned");

    // Upstream adapters
    let http_timeout = config.app.http_timeout;

    let model: Option<Arc<dyn GenerativeModel>> = match config.ai.api_key.as_deref() {
        Some(api_key) => {
            let client =
                GeminiClient::new(api_key, &config.ai.base_url, &config.ai.model, http_timeout)?;
            tracing::info!("Gemini client initialized (model: {})", config.ai.model);
            Some(Arc::new(client) as Arc<dyn GenerativeModel>)
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set, AI features use heuristic fallbacks");
            None
        }
    };
    let ai = Arc::new(AiService::new(
        model,
        Arc::clone(&cache),
        config.ai.cache_ttl,
        config.ai.fail_open,
    ));

    let geocoder = Arc::new(GeocodingService::new(
        &config.feeds.geocoding_url,
        &config.feeds.user_agent,
        http_timeout,
        Arc::clone(&cache),
        config.cache.geocode_ttl,
    )?);

    let mastodon = MastodonClient::new(
        &config.social.instance_url,
        config.social.access_token.clone(),
        http_timeout,
    )?;
    let social = Arc::new(SocialService::new(
        mastodon,
        Arc::clone(&cache),
        config.social.cache_ttl,
        config.social.official_accounts.clone(),
    ));

    let feeds = Arc::new(FeedsClient::new(&config.feeds, http_timeout)?);
    let events = Arc::new(EventHub::new());
    tracing::info!("Upstream adapters initialized");

    // CRUD services
    let disaster_service = Arc::new(DisasterService::new(
        Arc::clone(&disaster_repository),
        Arc::clone(&ai),
        Arc::clone(&geocoder),
        Arc::clone(&events),
    ));
    let report_service = Arc::new(ReportService::new(
        Arc::clone(&report_repository),
        Arc::clone(&disaster_repository),
        Arc::clone(&ai),
        Arc::clone(&events),
    ));
    let resource_service = Arc::new(ResourceService::new(
        resource_repository,
        Arc::clone(&disaster_repository),
        Arc::clone(&geocoder),
        Arc::clone(&events),
    ));
    tracing::info!("CRUD services initialized");

    // Realtime aggregation
    let aggregator = Arc::new(Aggregator::new(
        Arc::clone(&cache),
        AggregatorSources {
            disasters: DisasterSource {
                repository: Arc::clone(&disaster_repository),
            },
            reports: ReportSource {
                repository: report_repository,
            },
            social: SocialSource {
                social: Arc::clone(&social),
                ttl: config.realtime.social_ttl,
            },
            weather: WeatherSource {
                client: Arc::clone(&feeds),
                ttl: config.realtime.weather_ttl,
            },
            emergency: EmergencySource {
                client: Arc::clone(&feeds),
                ttl: config.realtime.emergency_ttl,
            },
            shelters: ShelterSource {
                client: feeds,
                ttl: config.realtime.shelters_ttl,
            },
        },
        config.realtime.correlation_radius_km,
    ));

    let poller_state = Arc::new(PollerState::new());
    let poller = if config.realtime.enabled {
        let (tx, rx) = mpsc::channel(SNAPSHOT_CHANNEL_CAPACITY);
        let poller = Arc::new(RealtimePoller::new(
            Arc::clone(&aggregator),
            Arc::clone(&poller_state),
            tx,
            config.realtime.poll_interval,
        ));

        let background = Arc::clone(&poller);
        tokio::spawn(async move {
            background.run().await;
        });
        tokio::spawn(SnapshotPublisher::new(rx, Arc::clone(&events)).run());
        tracing::info!("Realtime poller and snapshot publisher spawned");
        Some(poller)
    } else {
        tracing::info!("Realtime polling disabled");
        None
    };

    let official_update_service = Arc::new(OfficialUpdateService::new(
        Arc::clone(&aggregator),
        Arc::clone(&social),
        Arc::clone(&disaster_service),
    ));

    let auth_service = Arc::new(AuthService::new(&config.auth));
    let rate_limiter = Arc::new(RateLimiter::new(&config.rate_limit));
    tracing::info!(
        "Rate limiting: {} requests per {}s per IP",
        config.rate_limit.max_requests,
        config.rate_limit.window.as_secs()
    );

    let health_state = Arc::new(HealthState {
        service: env!("CARGO_PKG_NAME").to_string(),
        environment: config.app.environment,
        features: FeatureFlagsDto::from_config(&config),
        pool: pool.clone(),
        cache: Arc::clone(&cache),
    });

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Everything under /api shares the per-IP request budget
    let api_routes = Router::new()
        .merge(auth_routes::routes(auth_service))
        .merge(disasters_routes::routes(Arc::clone(&disaster_service)))
        .merge(reports_routes::routes(Arc::clone(&report_service)))
        .merge(resources_routes::routes(resource_service))
        .merge(geocode_routes::routes(Arc::clone(&ai), Arc::clone(&geocoder)))
        .merge(verification_routes::routes(Arc::clone(&ai), report_service))
        .merge(social_media_routes::routes(
            Arc::clone(&social),
            Arc::clone(&disaster_service),
            Arc::clone(&events),
        ))
        .merge(official_updates_routes::routes(official_update_service))
        .merge(realtime_routes::routes(RealtimeState {
            aggregator,
            poller_state,
            poller,
            events: Arc::clone(&events),
        }))
        .merge(health_routes::cache_routes(Arc::clone(&health_state)))
        .layer(from_fn_with_state(rate_limiter, rate_limit_middleware));

    let app = Router::new()
        .merge(swagger)
        .merge(api_routes)
        .merge(websocket_routes::routes(events))
        .merge(health_routes::health_routes(health_state))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("WebSocket endpoint at ws://{}/ws", addr);

    // Client IPs for rate limiting come from the connection when no proxy header is present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
