use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi; // bring trait into scope for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

use noteful::openapi::ApiDoc;
use noteful::repo::Repo;
use noteful::{config, AppConfig, AppState, AuthGate, ErrorHandler, SecurityHeaders};

#[cfg(not(any(feature = "inmem-store", feature = "postgres-store")))]
compile_error!("enable the `inmem-store` or `postgres-store` feature");

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // .env is a development convenience; deployments set variables externally.
    if cfg!(debug_assertions) {
        let _ = dotenv::dotenv();
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cfg = AppConfig::from_env().context("invalid configuration")?;
    info!(environment = ?cfg.environment, verbose_errors = cfg.environment.verbose_errors(), "Bootstrapping noteful server");

    let repo = build_repo(&cfg).await?;
    let state = AppState::new(repo);
    let openapi = ApiDoc::openapi();

    let gate = AuthGate::new(&cfg.api_token);
    let errors = ErrorHandler::for_environment(cfg.environment);
    let security = SecurityHeaders::from_config(&cfg);
    let origins = cfg.cors_origins.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(errors)
            .wrap(gate.clone())
            .wrap(security.clone())
            .wrap(cors(&origins))
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(config)
            .service(SwaggerUi::new("/docs/{_:.*}").url("/docs/openapi.json", openapi.clone()))
    })
    .bind((cfg.host.as_str(), cfg.port))
    .with_context(|| format!("cannot bind {}:{}", cfg.host, cfg.port))?;

    info!("Listening on http://{}:{}", cfg.host, cfg.port);

    server.run().await?;
    Ok(())
}

fn cors(origins: &[String]) -> Cors {
    let base = if origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        origins.iter().fold(Cors::default(), |c, o| c.allowed_origin(o))
    };
    base.allowed_methods(["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::LOCATION])
        .max_age(3600)
}

#[cfg(feature = "postgres-store")]
async fn build_repo(cfg: &AppConfig) -> anyhow::Result<Arc<dyn Repo>> {
    use noteful::repo::pg::PgRepo;
    use sqlx::postgres::PgPoolOptions;

    let db_url = cfg
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set for postgres-store")?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(db_url)
        .await
        .context("cannot connect to Postgres")?;
    sqlx::migrate!("./migrations").run(&pool).await.context("migrations failed")?;
    info!("Using Postgres repository backend");
    Ok(Arc::new(PgRepo::new(pool)))
}

#[cfg(all(feature = "inmem-store", not(feature = "postgres-store")))]
async fn build_repo(cfg: &AppConfig) -> anyhow::Result<Arc<dyn Repo>> {
    use noteful::repo::inmem::InMemRepo;

    let repo = match &cfg.data_dir {
        Some(dir) => {
            let repo = InMemRepo::with_snapshot(dir.join("state.json")).await?;
            info!(dir = %dir.display(), "Using in-memory repository backend with snapshots");
            repo
        }
        None => {
            info!("Using in-memory repository backend");
            InMemRepo::new()
        }
    };
    Ok(Arc::new(repo))
}
