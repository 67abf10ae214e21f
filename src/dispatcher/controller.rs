use super::naming::HandlerName;
use super::Context;
use crate::server::Response;
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// Non-empty result of a controller phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Sent as is
    Response(Response),
    /// Sent as a 200 `text/html` body
    Content(String),
}

impl From<Response> for Outcome {
    fn from(response: Response) -> Self {
        Outcome::Response(response)
    }
}

impl From<String> for Outcome {
    fn from(content: String) -> Self {
        Outcome::Content(content)
    }
}

impl From<&str> for Outcome {
    fn from(content: &str) -> Self {
        Outcome::Content(content.to_string())
    }
}

/// Failure raised by a controller phase. Turned into a 500 by the application.
pub type ActionError = anyhow::Error;

/// `Ok(None)` lets dispatch continue with the next phase.
pub type ActionResult = Result<Option<Outcome>, ActionError>;

/// Action method of a controller.
pub type Action<C> = fn(&mut C, &mut Context) -> ActionResult;

/// Application controller.
///
/// A fresh instance is built with `Default` for every dispatch. The hooks run
/// before and after the action; returning `Some` from either ends dispatch.
pub trait Controller: Default + 'static {
    fn pre_execute(&mut self, _ctx: &mut Context) -> ActionResult {
        Ok(None)
    }

    fn post_execute(&mut self, _ctx: &mut Context) -> ActionResult {
        Ok(None)
    }
}

/// Action table of one controller type, registered under a module and controller name.
///
/// ```rust
/// use waymark::dispatcher::{ActionResult, Context, Controller, ControllerClass};
///
/// #[derive(Default)]
/// struct CartController;
///
/// impl Controller for CartController {}
///
/// impl CartController {
///     fn show(&mut self, ctx: &mut Context) -> ActionResult {
///         ctx.ok("cart")
///     }
/// }
///
/// let class = ControllerClass::<CartController>::new().action("show", CartController::show);
/// assert!(class.has_method("showAction"));
/// ```
pub struct ControllerClass<C: Controller> {
    actions: BTreeMap<String, Action<C>>,
    _controller: PhantomData<fn() -> C>,
}

impl<C: Controller> Default for ControllerClass<C> {
    fn default() -> Self {
        Self {
            actions: BTreeMap::new(),
            _controller: PhantomData,
        }
    }
}

impl<C: Controller> ControllerClass<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `action` under the method name derived from `action_name`,
    /// so `show-all`, `show_all` and `showAll` all name `showAllAction`.
    #[must_use]
    pub fn action(mut self, action_name: &str, action: Action<C>) -> Self {
        self.actions
            .insert(HandlerName::method_for(action_name), action);
        self
    }

    #[must_use]
    pub fn has_method(&self, method_name: &str) -> bool {
        self.actions.contains_key(method_name)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }
}

/// Type-erased controller class held by the registry.
pub(crate) trait ControllerFactory: Send + Sync {
    fn handles(&self, method_name: &str) -> bool;
    fn action_methods(&self) -> Vec<String>;
    fn instantiate(&self, method_name: &str) -> Option<Box<dyn Instance>>;
}

/// A controller instance bound to the action selected for this dispatch.
pub(crate) trait Instance {
    fn pre_execute(&mut self, ctx: &mut Context) -> ActionResult;
    fn run_action(&mut self, ctx: &mut Context) -> ActionResult;
    fn post_execute(&mut self, ctx: &mut Context) -> ActionResult;
}

struct Bound<C> {
    controller: C,
    action: Action<C>,
}

impl<C: Controller> Instance for Bound<C> {
    fn pre_execute(&mut self, ctx: &mut Context) -> ActionResult {
        self.controller.pre_execute(ctx)
    }

    fn run_action(&mut self, ctx: &mut Context) -> ActionResult {
        (self.action)(&mut self.controller, ctx)
    }

    fn post_execute(&mut self, ctx: &mut Context) -> ActionResult {
        self.controller.post_execute(ctx)
    }
}

impl<C: Controller> ControllerFactory for ControllerClass<C> {
    fn handles(&self, method_name: &str) -> bool {
        self.actions.contains_key(method_name)
    }

    fn action_methods(&self) -> Vec<String> {
        self.actions.keys().cloned().collect()
    }

    fn instantiate(&self, method_name: &str) -> Option<Box<dyn Instance>> {
        let action = *self.actions.get(method_name)?;
        Some(Box::new(Bound {
            controller: C::default(),
            action,
        }))
    }
}
