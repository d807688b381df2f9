use anyhow::anyhow;
use clap::{Parser, Subcommand};
use fred::clients::Pool;
use fred::interfaces::ClientLike;
use fred::prelude::ReconnectPolicy;
use it_company::core::application::{Application, ApplicationServices};
use it_company::core::config::Config;
use it_company::domain::auth;
use it_company::domain::task_manager::forms::WorkerCreationForm;
use it_company::domain::task_manager::{
    self, CreateWorkerServiceParams, ServiceFormError, TaskManagerService,
};
use it_company::inbound::http::router;
use it_company::outbound::db::repository::Repository;
use it_company::outbound::session::{SessionAdapter, SessionAdapterFactory};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::process::exit;
use tower_sessions_redis_store::RedisStore;
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type ApplicationAlias = Application<
    auth::Service<SessionAdapter, Repository, SessionAdapterFactory>,
    task_manager::Service<Repository>,
>;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(long)]
    config_path: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the web application.
    Run,
    /// Create a worker account that can log in.
    CreateWorker {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "it_company=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = start(cli).await {
        error!("Error: {:#?}", e);
        exit(1);
    }
}

async fn start(cli: Cli) -> anyhow::Result<(), anyhow::Error> {
    let config = Config::parse(cli.config_path)?;
    if !config.is_valid() {
        return Err(anyhow!("config is not valid"));
    }

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(config.db.connection_string().as_str())
        .await
        .map_err(|e| anyhow!("could not connect to the database: {e}"))?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let application = create_application(pool, config);

    match cli.command {
        None => Ok(()),
        Some(subcommand) => match subcommand {
            Commands::Run => run_server(application).await,
            Commands::CreateWorker { username, password } => {
                create_worker(application, username, password).await
            }
        },
    }
}

fn create_application(pool: PgPool, config: Config) -> ApplicationAlias {
    let repo = Repository::new(pool);
    let session_factory = SessionAdapterFactory::new();
    let auth_service = auth::Service::new(repo.clone(), session_factory);
    let task_manager_service = task_manager::Service::new(repo);

    Application::new(config, auth_service, task_manager_service)
}

async fn create_worker(
    app: ApplicationAlias,
    username: String,
    password: String,
) -> anyhow::Result<()> {
    let form = WorkerCreationForm {
        username: Some(username),
        password1: Some(password.clone()),
        password2: Some(password),
        ..Default::default()
    };

    let worker = app
        .task_manager_service()
        .create_worker(CreateWorkerServiceParams { form })
        .await
        .map_err(|e| match e {
            ServiceFormError::Invalid(errors) => anyhow!("worker is invalid: {errors:?}"),
            e => anyhow!(e),
        })?;

    tracing::info!(worker_id = %worker.id, username = %worker.username, "created worker");
    Ok(())
}

async fn run_server(app: ApplicationAlias) -> anyhow::Result<()> {
    tracing::debug!("creating session store.");
    let session_store = new_session_store(app.config())
        .await
        .map_err(|_| anyhow!("failed to create redis session store"))?;
    tracing::debug!("created session store.");

    let listen_address = app.config().listen_address;
    let router = router(app, session_store);

    let listener = tokio::net::TcpListener::bind(listen_address.as_str())
        .await
        .map_err(|_| anyhow!("server failed to bind"))?;

    tracing::debug!(
        "listening on {}",
        listener
            .local_addr()
            .map_err(|_| anyhow!("failed to get local_addr"))?
    );

    axum::serve(listener, router)
        .await
        .map_err(|_| anyhow!("failed to start server"))
}

async fn new_session_store(config: Config) -> Result<RedisStore<Pool>, anyhow::Error> {
    let config: fred::types::config::Config = config
        .redis
        .try_into()
        .map_err(|_| anyhow!("failed to parse redis session store connection url"))?;

    let pool = Pool::new(
        config,
        None,
        None,
        Some(ReconnectPolicy::new_constant(0, 5_000)),
        10,
    )?;
    let redis_connection = pool.connect();
    tokio::spawn(redis_connection);
    pool.wait_for_connect().await.map_err(|e| {
        error!("Redis connection failed: {:?}", e);
        anyhow!("Redis connection failed")
    })?;

    let session_store = RedisStore::new(pool);

    Ok(session_store)
}
