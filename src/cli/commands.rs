use crate::config::AppConfig;
use crate::dispatcher::HandlerName;
use crate::logging::{init_logging, LogConfig, LogFormat, LoggingGuard};
use crate::router::{Role, Router};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Command-line interface for waymark applications
#[derive(Parser)]
#[command(name = "waymark")]
#[command(about = "Inspect waymark routing configuration", long_about = None)]
pub struct Cli {
    /// Log matching decisions to stdout
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List configured routes in evaluation order
    Routes {
        /// Application configuration file (YAML)
        #[arg(short, long, env = "WAYMARK_CONFIG")]
        config: PathBuf,
    },
    /// Resolve a uri to its route and controller method
    Resolve {
        /// Application configuration file (YAML)
        #[arg(short, long, env = "WAYMARK_CONFIG")]
        config: PathBuf,

        /// Request uri, e.g. /shop/cart/show
        uri: String,
    },
}

fn load_router(path: &Path) -> anyhow::Result<(AppConfig, Router)> {
    let config = AppConfig::load(path)
        .with_context(|| format!("Failed to load {}", path.display()))?
        .apply_env();
    let router = config
        .matchers()?
        .into_iter()
        .fold(Router::new(), Router::with_matcher);
    Ok((config, router))
}

/// One line per matcher: position, pattern, roles (placeholders shown as
/// `:role`) and, for fully fixed matchers, the handler name.
#[must_use]
pub fn render_routes(router: &Router) -> String {
    let width = router
        .matchers()
        .iter()
        .map(|m| m.pattern().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (index, matcher) in router.matchers().iter().enumerate() {
        let roles: Vec<&str> = Role::ALL
            .iter()
            .map(|role| matcher.fixed_value(*role).unwrap_or(role.key()))
            .collect();
        out.push_str(&format!(
            "{index:>3}  {:<width$}  {}",
            matcher.pattern(),
            roles.join("/")
        ));
        if let Some(route) = matcher.fixed_route() {
            out.push_str(&format!("  {}", HandlerName::for_route(&route)));
        }
        out.push('\n');
    }
    out
}

/// Route and handler for `uri`, `None` when nothing matches.
#[must_use]
pub fn resolve_uri(router: &Router, uri: &str) -> Option<String> {
    let route = router.get_route(uri)?;
    Some(format!(
        "route: {route}\nhandler: {}\n",
        HandlerName::for_route(&route)
    ))
}

fn verbose_logging() -> anyhow::Result<LoggingGuard> {
    init_logging(&LogConfig {
        level: "debug".to_string(),
        format: LogFormat::Compact,
        ..LogConfig::default()
    })
}

/// Entry point of the `waymark` binary.
///
/// # Errors
///
/// Configuration that cannot be read, parsed or turned into matchers.
pub fn run_cli() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = if cli.verbose {
        Some(verbose_logging()?)
    } else {
        None
    };

    match &cli.command {
        Commands::Routes { config } => {
            let (_, router) = load_router(config)?;
            if router.is_empty() {
                println!("no routes configured");
            } else {
                print!("{}", render_routes(&router));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Resolve { config, uri } => {
            let (_, router) = load_router(config)?;
            match resolve_uri(&router, uri) {
                Some(resolved) => {
                    print!("{resolved}");
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    println!("no route");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
