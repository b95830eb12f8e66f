use crate::infra::open_store;
use crate::server;
use clap::{Args, Parser, Subcommand};
use proviz_intake::applications::ApplicationStore;
use proviz_intake::config::{AppConfig, StoreConfig};
use proviz_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Proviz Intake",
    about = "Serve and inspect Proviz School of AI application submissions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect stored applications
    Applications {
        #[command(subcommand)]
        command: ApplicationsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ApplicationsCommand {
    /// Print every stored application as JSON
    List(ListArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Store connection string to read instead of APP_STORE_URL (e.g. file://applications.jsonl)
    #[arg(long)]
    store_url: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Applications {
            command: ApplicationsCommand::List(args),
        } => list_applications(args).await,
    }
}

async fn list_applications(args: ListArgs) -> Result<(), AppError> {
    let store_config = match args.store_url {
        Some(url) => StoreConfig::parse(&url)?,
        None => AppConfig::load()?.store,
    };

    if store_config == StoreConfig::Memory {
        eprintln!("note: memory:// stores live inside the server process; nothing to list");
    }

    let store = open_store(&store_config).await?;
    println!("{}", render_applications(&store).await?);

    Ok(())
}

async fn render_applications(store: &impl ApplicationStore) -> Result<String, AppError> {
    let applications = store.list_all().await?;
    Ok(serde_json::to_string_pretty(&applications)?)
}
