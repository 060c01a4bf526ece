#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::warn;

use worldwise::auth::{AuthError, AuthSession};
use worldwise::backend::{self, BackendError};
use worldwise::cities::{CityError, CityId, HttpCityApi, NewCity, Position, RemoteCityStore};
use worldwise::config::{BackendConfig, ClientConfig};
use worldwise::guard::{Gate, RouteGuard};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("login required: redirected to {0}")]
    Unauthorized(String),
    #[error("login failed: {0}")]
    Auth(#[from] AuthError),
    #[error("city request failed: {0}")]
    City(#[from] CityError),
    #[error("backend failed: {0}")]
    Backend(#[from] BackendError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("date format failed: {0}")]
    Date(#[from] time::error::Format),
}

#[derive(Parser, Debug)]
#[command(name = "worldwise", about = "WorldWise visited-city tracker")]
struct Cli {
    /// Collection endpoint base URL (falls back to `WORLDWISE_BASE_URL`).
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long, env = "WORLDWISE_EMAIL", default_value = "")]
    email: String,

    #[arg(long, env = "WORLDWISE_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    #[command(subcommand)]
    command: Command,
}

struct CliContext {
    client: ClientConfig,
    email: String,
    password: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    Cities(CitiesCommand),
    Countries,
    Whoami,
    /// Run the development collection server.
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct CitiesCommand {
    #[command(subcommand)]
    command: CitiesSubcommand,
}

#[derive(Subcommand, Debug)]
enum CitiesSubcommand {
    List,
    Show { id: CityId },
    Add(AddCityArgs),
    Remove { id: CityId },
}

#[derive(Args, Debug)]
struct AddCityArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    country: String,
    #[arg(long, default_value = "")]
    emoji: String,
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    lng: f64,
    /// Visit date (RFC 3339); defaults to now.
    #[arg(long)]
    date: Option<String>,
    #[arg(long, default_value = "")]
    notes: String,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long)]
    listen: Option<String>,
    #[arg(long, help = "JSON seed file (json-server db or bare array)")]
    seed: Option<PathBuf>,
}

/// Commands that render protected content.
#[derive(Debug)]
enum Protected {
    Cities(CitiesSubcommand),
    Countries,
    Whoami,
}

#[derive(Serialize)]
struct CountryRow<'a> {
    country: &'a str,
    emoji: &'a str,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let ctx = CliContext {
        client: ClientConfig::from_env().with_base_url(cli.base_url),
        email: cli.email,
        password: cli.password,
    };

    match cli.command {
        Command::Serve(args) => run_serve(args).await,
        Command::Cities(cities) => run_protected(&ctx, Protected::Cities(cities.command)).await,
        Command::Countries => run_protected(&ctx, Protected::Countries).await,
        Command::Whoami => run_protected(&ctx, Protected::Whoami).await,
    }
}

async fn run_serve(args: ServeArgs) -> Result<(), CliError> {
    let config = BackendConfig::from_env().with_overrides(args.listen, args.seed);
    backend::serve(&config).await?;
    Ok(())
}

async fn run_protected(ctx: &CliContext, command: Protected) -> Result<(), CliError> {
    let mut session = AuthSession::new();
    if let Err(error) = session.login(&ctx.email, &ctx.password) {
        warn!(%error, "session stays anonymous");
    }

    let guard = RouteGuard::default();
    let command = match guard.authorize(session.state(), || command) {
        Gate::Render(command) => command,
        Gate::Redirect(redirect) => return Err(CliError::Unauthorized(redirect.to)),
    };

    match command {
        Protected::Whoami => match session.state().user() {
            Some(user) => print_json(user),
            None => Ok(()),
        },
        Protected::Cities(CitiesSubcommand::List) => print_json(&open_store(ctx).await?.snapshot().cities),
        Protected::Cities(CitiesSubcommand::Show { id }) => {
            let city = open_store(ctx).await?.get_city(&id).await?;
            print_json(&city)
        }
        Protected::Cities(CitiesSubcommand::Add(args)) => {
            let new_city = new_city_from_args(args)?;
            let city = open_store(ctx).await?.create_city(new_city).await?;
            print_json(&city)
        }
        Protected::Cities(CitiesSubcommand::Remove { id }) => {
            let store = open_store(ctx).await?;
            store.delete_city(&id).await?;
            print_json(&store.snapshot().cities)
        }
        Protected::Countries => {
            let state = open_store(ctx).await?.snapshot();
            let rows: Vec<CountryRow<'_>> = state
                .countries()
                .into_iter()
                .map(|(country, emoji)| CountryRow { country, emoji })
                .collect();
            print_json(&rows)
        }
    }
}

/// Build the store and mirror the server collection.
async fn open_store(ctx: &CliContext) -> Result<RemoteCityStore, CliError> {
    let api = HttpCityApi::new(&ctx.client)?;
    let store = RemoteCityStore::new(Arc::new(api));
    store.load_all().await?;
    Ok(store)
}

fn new_city_from_args(args: AddCityArgs) -> Result<NewCity, CliError> {
    let date = match args.date {
        Some(date) => date,
        None => OffsetDateTime::now_utc().format(&Rfc3339)?,
    };
    Ok(NewCity {
        city_name: args.name,
        country: args.country,
        emoji: args.emoji,
        date,
        notes: args.notes,
        position: Position { lat: args.lat, lng: args.lng },
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
