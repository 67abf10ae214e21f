//! # Dispatcher Module
//!
//! Turns a resolved [`Route`](crate::router::Route) into a call on an
//! application controller.
//!
//! ## Naming convention
//!
//! A route `module/controller/action` names the class
//! `Controller::<Module>::<Controller>Controller` and its method
//! `<action>Action`. Each name has `-` replaced by `_` and is then camel-cased,
//! so `shop/order-history/show-all` calls
//! `Controller::Shop::OrderHistoryController::showAllAction()`. See
//! [`HandlerName`].
//!
//! ## Registration
//!
//! Controllers are plain types implementing [`Controller`]. Their actions are
//! listed in a [`ControllerClass`] and registered in a [`ControllerRegistry`]
//! under a module and controller name:
//!
//! ```rust
//! use waymark::dispatcher::{ActionResult, Context, Controller, ControllerClass, ControllerRegistry};
//!
//! #[derive(Default)]
//! struct IndexController;
//!
//! impl Controller for IndexController {}
//!
//! impl IndexController {
//!     fn index(&mut self, ctx: &mut Context) -> ActionResult {
//!         ctx.ok("home")
//!     }
//! }
//!
//! let mut registry = ControllerRegistry::new();
//! registry.register(
//!     "application",
//!     "index",
//!     ControllerClass::<IndexController>::new().action("index", IndexController::index),
//! );
//! assert!(registry.has_class("Controller::Application::IndexController"));
//! ```
//!
//! ## Request Flow
//!
//! 1. Resolve the handler name; unknown class or method gives a 404 response
//! 2. Build the controller with `Default` and a fresh [`Context`]
//! 3. Run `pre_execute`, the action and `post_execute`; the first `Some` wins
//! 4. [`Context::forward`] re-enters step 1 for another route, same thread
//!
//! ## Error Handling
//!
//! Unresolved handlers are a response value, never an error. An `Err` from a
//! phase propagates to the caller untouched; the application layer turns it
//! into a 500.

mod context;
mod controller;
mod core;
mod naming;
mod registry;

pub use context::Context;
pub use controller::{Action, ActionError, ActionResult, Controller, ControllerClass, Outcome};
pub use core::{Dispatcher, MAX_FORWARD_DEPTH};
pub use naming::{
    HandlerName, ACTION_SUFFIX, CONTROLLER_NAMESPACE, CONTROLLER_SUFFIX, PATH_SEPARATOR,
};
pub use registry::ControllerRegistry;
