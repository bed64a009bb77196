mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth;
use crate::features::intake::{routes as intake_routes, IntakeService};
use crate::features::issues::{routes as issues_routes, IssueService, PgIssueStore, SubmissionService};
use crate::features::media::{routes as media_routes, MediaService};
use crate::modules::storage::S3MediaStorage;
use crate::shared::llm::TensorZeroModel;
use crate::shared::prompts::PromptEngine;
use axum::{middleware::from_fn, Router};
use std::path::Path;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

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

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");
    if config.identity.mock_mode {
        tracing::warn!(
            "Mock identity mode is ON: unauthenticated reports are attributed to {:?}",
            config.identity.mock_reporter_id
        );
    }

    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    let jwt_validator = match &config.auth {
        Some(auth_config) => {
            let jwks_client = Arc::new(auth::JwksClient::new(
                &auth_config.jwks_url,
                auth_config.jwks_cache_ttl,
            ));
            tracing::info!("Auth configuration initialized (issuer: {})", auth_config.issuer);
            Some(Arc::new(auth::JwtValidator::new(jwks_client, auth_config)))
        }
        None => {
            tracing::warn!("AUTH_ISSUER not set: bearer tokens will be rejected");
            None
        }
    };

    let model = Arc::new(
        TensorZeroModel::new(&config.llm)
            .map_err(|e| anyhow::anyhow!("Failed to create model client: {}", e))?,
    );
    tracing::info!(
        "Language model client initialized (TensorZero: {}, model: {})",
        config.llm.tensorzero_url,
        model.model_name()
    );

    let prompts = Arc::new(PromptEngine::new(
        config.llm.prompt_template_dir.as_deref().map(Path::new),
    ));
    tracing::info!("Prompt engine initialized");

    let intake_service = Arc::new(IntakeService::new(model, Arc::clone(&prompts)));
    tracing::info!("Intake service initialized");

    let issue_store = Arc::new(PgIssueStore::new(pool.clone()));
    let issue_service = Arc::new(IssueService::new(issue_store, config.identity.clone()));
    let submission_service = Arc::new(SubmissionService::new(
        Arc::clone(&intake_service),
        Arc::clone(&issue_service),
    ));
    tracing::info!("Issue services initialized");

    // Media storage is optional: reports can still be filed without uploads
    let media_service = match S3MediaStorage::new(&config.media).await {
        Ok(storage) => {
            tracing::info!("Media storage initialized for bucket: {}", config.media.bucket);
            Some(Arc::new(MediaService::new(
                Arc::new(storage),
                config.identity.clone(),
                config.media.prefix.clone(),
            )))
        }
        Err(e) => {
            tracing::warn!("Media storage not available: {}. Upload endpoint disabled.", e);
            None
        }
    };

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

    let mut api_routes = Router::new()
        .merge(intake_routes::routes(intake_service))
        .merge(issues_routes::routes(issue_service, submission_service));
    if let Some(media_service) = media_service {
        api_routes = api_routes.merge(media_routes::routes(media_service));
    }
    let api_routes = api_routes.route_layer(axum::middleware::from_fn_with_state(
        jwt_validator,
        middleware::optional_auth_middleware,
    ));

    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(api_routes)
        .merge(health_route)
        .layer(RequestBodyLimitLayer::new(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

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
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
