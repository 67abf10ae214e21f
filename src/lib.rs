//! # waymark
//!
//! **waymark** is a small MVC web framework: URL routing by convention,
//! controller dispatch and templated views.
//!
//! ## Overview
//!
//! A request uri is matched against an ordered list of patterns. The first
//! match yields a `(module, controller, action)` [`Route`](router::Route),
//! which names a controller method through a fixed convention: the route
//! `shop/order-history/show-all` calls
//! `Controller::Shop::OrderHistoryController::showAllAction()`.
//!
//! ## Architecture
//!
//! - **[`router`]** - Patterns with `:module`, `:controller` and `:action`
//!   placeholders, first-match resolution
//! - **[`dispatcher`]** - Handler naming, controller registry, the
//!   pre-execute/action/post-execute cycle and forwarding
//! - **[`server`]** - Request and response types and the `tiny_http` transport
//! - **[`view`]** - `minijinja` views with layouts, placeholders, stylesheets and scripts
//! - **[`storage`]** - Key/value storage and the request session
//! - **[`app`]** - Wires configuration, router and dispatcher into one request handler
//! - **[`config`]** - YAML configuration with environment overrides
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `waymark` route inspection tool
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as server::HttpServer
//!     participant App as app::Application
//!     participant Router as router::Router
//!     participant Dispatcher as dispatcher::Dispatcher
//!     participant Controller
//!
//!     Client->>Server: GET /shop/cart/show
//!     Server->>App: handle(Request)
//!     App->>Router: get_route("/shop/cart/show")
//!     Router-->>App: Route(shop, cart, show)
//!     App->>Dispatcher: execute(route, request)
//!     Dispatcher->>Dispatcher: HandlerName::for_route
//!     Dispatcher->>Controller: pre_execute, showAction, post_execute
//!     Controller-->>Dispatcher: first Some(Outcome)
//!     Dispatcher-->>App: ActionResult
//!     App-->>Server: Response (404 / 200 / 500)
//!     Server-->>Client: HTTP response
//! ```
//!
//! ## Example
//!
//! ```rust
//! use waymark::app::Application;
//! use waymark::config::AppConfig;
//! use waymark::dispatcher::{ActionResult, Context, Controller, ControllerClass};
//! use waymark::router::Matcher;
//! use waymark::server::Request;
//!
//! #[derive(Default)]
//! struct IndexController;
//!
//! impl Controller for IndexController {}
//!
//! impl IndexController {
//!     fn index(&mut self, ctx: &mut Context) -> ActionResult {
//!         ctx.ok("welcome")
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let app = Application::builder(AppConfig::default())
//!     .matcher(Matcher::fixed("/", "application", "index", "index")?)
//!     .controller(
//!         "application",
//!         "index",
//!         ControllerClass::<IndexController>::new().action("index", IndexController::index),
//!     )
//!     .build()?;
//!
//! let response = app.handle(Request::get("/"));
//! assert_eq!(response.content(), Some("welcome"));
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod ids;
pub mod inflector;
pub mod logging;
pub mod router;
pub mod server;
pub mod storage;
pub mod view;

pub use app::Application;
pub use config::{AppConfig, ConfigError};
pub use dispatcher::{ActionResult, Context, Controller, ControllerClass, Outcome};
pub use router::{Matcher, Route, Router};
pub use server::{Request, Response};
