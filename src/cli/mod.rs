//! # CLI Module
//!
//! Command-line tools for inspecting an application's routing configuration.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! List the configured matchers in evaluation order. Matchers whose three
//! roles are fixed also show the handler they resolve to:
//!
//! ```bash
//! waymark routes --config config/application.yaml
//! ```
//!
//! ### `resolve`
//!
//! Resolve a uri the way a request would be, printing the route and the
//! controller method it dispatches to. Exits with status 1 when no matcher
//! accepts the uri:
//!
//! ```bash
//! waymark resolve --config config/application.yaml /shop/cart/show-all
//! ```
//!
//! `--verbose` installs the logger and shows matching decisions.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{render_routes, resolve_uri, run_cli, Cli, Commands};
