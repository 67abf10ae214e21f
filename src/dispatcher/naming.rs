use crate::inflector::{camelize, ucfirst};
use crate::router::Route;
use std::fmt;

/// Namespace every controller class lives under.
pub const CONTROLLER_NAMESPACE: &str = "Controller";
/// Appended to the controller part of a class name.
pub const CONTROLLER_SUFFIX: &str = "Controller";
/// Appended to an action method name.
pub const ACTION_SUFFIX: &str = "Action";
/// Separator between class path segments and between class and method.
pub const PATH_SEPARATOR: &str = "::";

fn type_segment(name: &str) -> String {
    ucfirst(&camelize(&name.replace('-', "_")))
}

/// Handler a route resolves to: a controller class and one of its action methods.
///
/// `shop/order-history/show-all` resolves to
/// `Controller::Shop::OrderHistoryController::showAllAction()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerName {
    class_name: String,
    method_name: String,
}

impl HandlerName {
    #[must_use]
    pub fn for_route(route: &Route) -> Self {
        Self {
            class_name: Self::class_for(route.module_name(), route.controller_name()),
            method_name: Self::method_for(route.action_name()),
        }
    }

    /// `Controller::<Module>::<Controller>Controller`
    #[must_use]
    pub fn class_for(module_name: &str, controller_name: &str) -> String {
        format!(
            "{CONTROLLER_NAMESPACE}{PATH_SEPARATOR}{}{PATH_SEPARATOR}{}{CONTROLLER_SUFFIX}",
            type_segment(module_name),
            type_segment(controller_name)
        )
    }

    /// `<action>Action`, camel-cased with a lower-case first letter.
    #[must_use]
    pub fn method_for(action_name: &str) -> String {
        format!("{}{ACTION_SUFFIX}", camelize(&action_name.replace('-', "_")))
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Message logged (and shown in debug mode) when the handler does not exist.
    #[must_use]
    pub fn not_found_message(&self) -> String {
        format!("Not found: {self}")
    }
}

impl fmt::Display for HandlerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{PATH_SEPARATOR}{}()", self.class_name, self.method_name)
    }
}
