//! # Router Module
//!
//! Convention-based URL routing. A request uri is resolved to a [`Route`], the
//! `(module, controller, action)` triple the dispatcher turns into a handler.
//!
//! ## Overview
//!
//! - [`Matcher`]: one `/`-delimited pattern. Segments are literals or the
//!   reserved placeholders `:module`, `:controller` and `:action`. Roles not
//!   read from the uri carry a fixed value.
//! - [`Router`]: ordered list of matchers, first match wins.
//! - [`Route`]: the resolved triple.
//!
//! ## Example
//!
//! ```rust
//! use waymark::router::{Matcher, Route, Router};
//!
//! # fn main() -> Result<(), waymark::router::InvalidMatcherError> {
//! let mut router = Router::new();
//! router
//!     .add_matcher(Matcher::new("/", Some("default"), Some("index"), Some("index"))?)
//!     .add_matcher(Matcher::new("/:module/:controller/:action", None, None, None)?);
//!
//! assert_eq!(router.get_route("/"), Some(Route::new("default", "index", "index")));
//! assert_eq!(router.get_route("/shop/cart/show"), Some(Route::new("shop", "cart", "show")));
//! assert_eq!(router.get_route("/shop/cart"), None);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration errors
//!
//! A matcher where a role has both a fixed value and a placeholder, or
//! neither, is rejected by [`Matcher::new`] with an [`InvalidMatcherError`].
//! Matching itself never fails; a uri either resolves or yields `None`.

mod core;
mod matcher;
mod route;

pub use core::Router;
pub use matcher::{InvalidMatcherError, Matcher, Role, ACTION_KEY, CONTROLLER_KEY, MODULE_KEY};
pub use route::Route;
