use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use dotenv::dotenv;
use nure_web_lab::cli::{AddGroupArgs, Cli, Commands, SetAdminArgs};
use nure_web_lab::db::{models::GROUP_NAME_MAX_LENGTH, schema};
use nure_web_lab::{configure_app, AppError, AppState, Settings};
use std::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn serve(config: Settings) -> nure_web_lab::Result<()> {
    info!("Starting server at {}:{}", config.server.host, config.server.port);

    let state = AppState::new(config.clone()).await?;
    let state = web::Data::new(state);

    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;

    let app_state = state.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(configure_app)
    })
    .listen(listener)?
    .workers(config.server.workers as usize)
    .run()
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?;

    state.shutdown().await
}

async fn init_db(config: Settings) -> nure_web_lab::Result<()> {
    let state = AppState::new(config).await?;
    schema::init_db(state.db.pool()).await?;
    println!("Initialized the database.");
    state.shutdown().await
}

async fn add_group(config: Settings, args: AddGroupArgs) -> nure_web_lab::Result<()> {
    let name = args.name.trim();
    if name.is_empty() || name.chars().count() > GROUP_NAME_MAX_LENGTH {
        return Err(AppError::BadRequest(format!(
            "group name must be 1 to {} characters",
            GROUP_NAME_MAX_LENGTH
        )));
    }

    let state = AppState::new(config).await?;
    let group = state.db.create_group(name).await?;
    println!("Created group {} with id {}.", group.name, group.id);
    state.shutdown().await
}

async fn set_admin(config: Settings, args: SetAdminArgs) -> nure_web_lab::Result<()> {
    let state = AppState::new(config).await?;
    let user = state.db.set_admin(&args.username, !args.revoke).await?;
    println!("User {} is_admin = {}.", user.username, user.is_admin);
    state.shutdown().await
}

#[actix_web::main]
async fn main() -> nure_web_lab::Result<()> {
    // Load environment variables
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    let cli = Cli::parse();

    let config = Settings::new()?;
    info!("Configuration loaded successfully ({})", config.environment);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::InitDb => init_db(config).await,
        Commands::AddGroup(args) => add_group(config, args).await,
        Commands::SetAdmin(args) => set_admin(config, args).await,
    }
}
