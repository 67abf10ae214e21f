//! Unit tests for CLI commands

use crate::cli::{render_routes, resolve_uri, Cli, Commands};
use crate::router::{Matcher, Router};
use clap::Parser;

fn router() -> Router {
    Router::new()
        .with_matcher(Matcher::fixed("/", "default", "index", "index").unwrap())
        .with_matcher(Matcher::new("/:module/:controller/:action", None, None, None).unwrap())
}

#[test]
fn test_routes_command_parses() {
    let cli = Cli::try_parse_from(["waymark", "routes", "--config", "app.yaml"]).unwrap();
    match cli.command {
        Commands::Routes { config } => assert_eq!(config.to_string_lossy(), "app.yaml"),
        Commands::Resolve { .. } => panic!("Expected Routes command"),
    }
    assert!(!cli.verbose);
}

#[test]
fn test_resolve_command_parses() {
    let cli = Cli::try_parse_from(["waymark", "resolve", "-c", "app.yaml", "/a/b/c", "-v"]).unwrap();
    match cli.command {
        Commands::Resolve { config, uri } => {
            assert_eq!(config.to_string_lossy(), "app.yaml");
            assert_eq!(uri, "/a/b/c");
        }
        Commands::Routes { .. } => panic!("Expected Resolve command"),
    }
    assert!(cli.verbose);
}

#[test]
fn test_resolve_requires_uri() {
    assert!(Cli::try_parse_from(["waymark", "resolve", "--config", "app.yaml"]).is_err());
}

#[test]
fn test_render_routes() {
    let out = render_routes(&router());
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("  0  /"));
    assert!(lines[0].ends_with("default/index/index  Controller::Default::IndexController::indexAction()"));
    assert!(lines[1].starts_with("  1  /:module/:controller/:action"));
    assert!(lines[1].ends_with(":module/:controller/:action"));
}

#[test]
fn test_render_routes_pads_patterns_to_widest() {
    let out = render_routes(&router());
    let lines: Vec<&str> = out.lines().collect();
    let width = "/:module/:controller/:action".len();
    assert_eq!(&lines[0][5..5 + width + 2], format!("{:<width$}  ", "/"));
    assert_eq!(render_routes(&Router::new()), "");
}

#[test]
fn test_resolve_uri() {
    let router = router();
    assert_eq!(
        resolve_uri(&router, "/shop/order-history/show-all").as_deref(),
        Some("route: shop/order-history/show-all\nhandler: Controller::Shop::OrderHistoryController::showAllAction()\n")
    );
    assert_eq!(resolve_uri(&router, "/shop/cart"), None);
}
