use std::fmt;

/// Resolved `(module, controller, action)` triple for one request.
///
/// Produced by a successful [`Matcher::match_uri`](super::Matcher::match_uri) or
/// built explicitly when forwarding. Two routes are equal when their three
/// names are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    module_name: String,
    controller_name: String,
    action_name: String,
}

impl Route {
    #[must_use]
    pub fn new(
        module_name: impl Into<String>,
        controller_name: impl Into<String>,
        action_name: impl Into<String>,
    ) -> Self {
        Self {
            module_name: module_name.into(),
            controller_name: controller_name.into(),
            action_name: action_name.into(),
        }
    }

    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    #[must_use]
    pub fn controller_name(&self) -> &str {
        &self.controller_name
    }

    #[must_use]
    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    /// Request uri that addresses this route directly (`/module/controller/action`).
    #[must_use]
    pub fn canonical_uri(&self) -> String {
        format!(
            "/{}/{}/{}",
            self.module_name, self.controller_name, self.action_name
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.module_name, self.controller_name, self.action_name
        )
    }
}
