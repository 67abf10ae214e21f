use super::controller::{Controller, ControllerClass, ControllerFactory, Instance};
use super::naming::HandlerName;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Controller classes by fully qualified class name.
///
/// Filled at startup, then shared read-only behind an `Arc`.
#[derive(Default)]
pub struct ControllerRegistry {
    classes: BTreeMap<String, Box<dyn ControllerFactory>>,
}

impl ControllerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `class` as the controller for `module/controller`.
    ///
    /// Registering the same class name twice replaces the earlier table.
    pub fn register<C: Controller>(
        &mut self,
        module_name: &str,
        controller_name: &str,
        class: ControllerClass<C>,
    ) -> &mut Self {
        let class_name = HandlerName::class_for(module_name, controller_name);
        let actions_count = class.method_names().count();
        if self.classes.contains_key(&class_name) {
            warn!(class_name = %class_name, "Replaced existing controller class");
        }
        info!(
            class_name = %class_name,
            actions_count = actions_count,
            "Controller registered"
        );
        self.classes.insert(class_name, Box::new(class));
        self
    }

    #[must_use]
    pub fn has_class(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    /// True when the class is registered and exposes the method.
    #[must_use]
    pub fn resolves(&self, handler: &HandlerName) -> bool {
        self.classes
            .get(handler.class_name())
            .is_some_and(|class| class.handles(handler.method_name()))
    }

    /// Registered class names with their action methods, sorted.
    #[must_use]
    pub fn handlers(&self) -> Vec<(String, Vec<String>)> {
        self.classes
            .iter()
            .map(|(name, class)| (name.clone(), class.action_methods()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub(crate) fn instantiate(&self, handler: &HandlerName) -> Option<Box<dyn Instance>> {
        self.classes
            .get(handler.class_name())?
            .instantiate(handler.method_name())
    }
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("classes", &self.classes.keys().collect::<Vec<_>>())
            .finish()
    }
}
