//! Rolegate CLI
//!
//! Run with: cargo run --features cli --bin rolegate -- <COMMAND>
//!
//! Commands:
//!   catalog                    - Fetch and print the grouped permission catalog
//!   group <FILE>               - Group a catalog JSON file offline
//!   role <ID>                  - Print a role with its grants expanded
//!   check <ROLE> <PERM>...     - Evaluate requirements against a role
//!   me                         - Print the current session's grants
//!   toggle-active <ID>         - Flip a role's active flag

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rolegate::{
    group_permissions, group_response, load_session, toggle_role_active, Catalog, CatalogResponse,
    Config, Gate, HttpRoleApi, Labels, Permission, QueryCache, QueryKey, Result, RoleApi, RoleId,
};

// ============================================================================
// CLI
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "rolegate", version, about = "Role and permission authorization tools")]
struct Cli {
    /// API base URL
    #[arg(long, env = "ROLEGATE_API_URL")]
    api_url: Option<String>,

    /// Labels JSON file
    #[arg(long, env = "ROLEGATE_LABELS")]
    labels: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", env = "ROLEGATE_LOG_LEVEL", global = true)]
    log_level: String,

    /// Log format
    #[arg(long, default_value = "text", env = "ROLEGATE_LOG_FORMAT", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and print the grouped permission catalog
    Catalog,
    /// Group a catalog JSON file ({resources, combinations}) without the API
    Group { file: PathBuf },
    /// Print a role with its grants expanded against the catalog
    Role { id: String },
    /// Evaluate `resource:action` requirements against a role
    Check {
        role: String,
        #[arg(required = true)]
        requirements: Vec<String>,
        /// Any requirement suffices (default: all)
        #[arg(long)]
        any: bool,
    },
    /// Print the current session's effective grants
    Me,
    /// Flip a role's active flag
    ToggleActive { id: String },
}

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(fmt::layer().with_writer(std::io::stderr)).init(),
        LogFormat::Json => registry.with(fmt::layer().json().with_writer(std::io::stderr)).init(),
    }
}

// ============================================================================
// Commands
// ============================================================================

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<bool> {
    let mut config = Config::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if cli.labels.is_some() {
        config.labels_path = cli.labels;
    }
    let labels = match &config.labels_path {
        Some(p) => Labels::load(p)?,
        None => Labels::default(),
    };
    let cache = match &config.cache_dir {
        Some(dir) => Some(QueryCache::open(dir)?),
        None => None,
    };

    let api = HttpRoleApi::from_config(&config)?;
    match cli.command {
        Command::Group { file } => {
            let raw = std::fs::read_to_string(file)?;
            let resp: CatalogResponse = serde_json::from_str(&raw)?;
            print_json(&group_response(Some(&resp), &labels))?;
        }
        Command::Catalog => {
            let catalog = fetch_catalog(&api, cache.as_ref(), config.cache_ttl()).await?;
            print_json(&group_permissions(&catalog, &labels))?;
        }
        Command::Role { id } => {
            let catalog = fetch_catalog(&api, cache.as_ref(), config.cache_ttl()).await?;
            let mut role = api.get_role(&RoleId::new(id)).await?;
            role.permissions.normalize(&catalog);
            let expanded: Vec<String> =
                role.permissions.expand(&catalog).iter().map(ToString::to_string).collect();
            print_json(&serde_json::json!({ "role": role, "expanded": expanded }))?;
        }
        Command::Check { role, requirements, any } => {
            let reqs = requirements
                .iter()
                .map(|r| Permission::parse(r))
                .collect::<Result<Vec<_>>>()?;
            let role = api.get_role(&RoleId::new(role)).await?;
            let allowed = Gate::new(reqs).require_all(!any).is_authorized(Some(&role.effective_grants()));
            println!("{}", if allowed { "allowed" } else { "denied" });
            return Ok(allowed);
        }
        Command::Me => {
            let session = load_session(&api).await?;
            match session.grants() {
                Some(g) => print_json(&g.to_wire())?,
                None => println!("not signed in"),
            }
        }
        Command::ToggleActive { id } => {
            let role = api.get_role(&RoleId::new(id)).await?;
            let updated = toggle_role_active(&api, cache.as_ref(), &role).await?;
            println!("{} is now {}", updated.id, if updated.is_active { "active" } else { "inactive" });
        }
    }
    Ok(true)
}

/// Catalog through the query cache when one is configured and the entry is younger than `ttl`
async fn fetch_catalog(api: &HttpRoleApi, cache: Option<&QueryCache>, ttl: Duration) -> Result<Catalog> {
    if let Some(resp) =
        cache.map(|c| c.get_fresh::<CatalogResponse>(&QueryKey::Catalog, ttl)).transpose()?.flatten()
    {
        return Ok(Catalog::from_response(&resp));
    }
    let resp = api.fetch_catalog().await?;
    if let Some(c) = cache {
        c.put(&QueryKey::Catalog, &resp)?;
    }
    Ok(Catalog::from_response(&resp))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}
