//! URL pattern matcher.
//!
//! A pattern is a `/`-delimited template. Each segment is either a literal or
//! one of the reserved placeholder tokens [`MODULE_KEY`], [`CONTROLLER_KEY`] and
//! [`ACTION_KEY`]. Every role must be given exactly once: either as a fixed
//! value at construction or as a placeholder read from the uri at match time.

use super::Route;
use std::fmt;

/// Placeholder segment bound to the module name.
pub const MODULE_KEY: &str = ":module";
/// Placeholder segment bound to the controller name.
pub const CONTROLLER_KEY: &str = ":controller";
/// Placeholder segment bound to the action name.
pub const ACTION_KEY: &str = ":action";

/// One of the three names a route is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Module,
    Controller,
    Action,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Module, Role::Controller, Role::Action];

    /// Placeholder token for this role.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Role::Module => MODULE_KEY,
            Role::Controller => CONTROLLER_KEY,
            Role::Action => ACTION_KEY,
        }
    }

    fn from_key(segment: &str) -> Option<Role> {
        match segment {
            MODULE_KEY => Some(Role::Module),
            CONTROLLER_KEY => Some(Role::Controller),
            ACTION_KEY => Some(Role::Action),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Module => "module",
            Role::Controller => "controller",
            Role::Action => "action",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matcher configuration error
///
/// Returned by [`Matcher::new`] when a role has both a fixed value and a
/// placeholder, or neither. This is a startup error: applications must not
/// serve requests with a matcher that failed to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMatcherError {
    /// The offending pattern
    pub pattern: String,
    /// First role (module, controller, action order) that failed the check
    pub role: Role,
}

impl fmt::Display for InvalidMatcherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Missing {role} key or {role} value, or provided both (pattern '{}')",
            self.pattern,
            role = self.role
        )
    }
}

impl std::error::Error for InvalidMatcherError {}

/// Split on `/` and drop empty segments.
///
/// Leading, trailing and repeated slashes all collapse, so `/`, `//` and the
/// empty string are zero segments and `/a//b/` equals `a/b`. Only empty
/// segments are dropped: `0` is an ordinary segment.
pub(crate) fn segments(uri: &str) -> impl Iterator<Item = &str> {
    uri.split('/').filter(|s| !s.is_empty())
}

/// A single URL pattern plus the fixed role values it does not read from the uri.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    pattern: String,
    parts: Vec<String>,
    module_name: Option<String>,
    controller_name: Option<String>,
    action_name: Option<String>,
}

impl Matcher {
    /// Build a matcher, checking every role independently.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMatcherError`] for the first role that has both a fixed
    /// value and a placeholder in `pattern`, or neither.
    ///
    /// # Example
    ///
    /// ```rust
    /// use waymark::router::Matcher;
    ///
    /// let home = Matcher::new("/", Some("default"), Some("index"), Some("index")).unwrap();
    /// let generic = Matcher::new("/:module/:controller/:action", None, None, None).unwrap();
    /// assert!(Matcher::new("/:controller/:action", None, None, None).is_err());
    /// # let _ = (home, generic);
    /// ```
    pub fn new(
        pattern: impl Into<String>,
        module_name: Option<&str>,
        controller_name: Option<&str>,
        action_name: Option<&str>,
    ) -> Result<Self, InvalidMatcherError> {
        let pattern = pattern.into();
        let parts: Vec<String> = segments(&pattern).map(str::to_string).collect();
        let matcher = Self {
            pattern,
            parts,
            module_name: module_name.map(str::to_string),
            controller_name: controller_name.map(str::to_string),
            action_name: action_name.map(str::to_string),
        };
        matcher.check()?;
        Ok(matcher)
    }

    /// Matcher whose three roles are all fixed.
    ///
    /// # Errors
    ///
    /// Fails if `pattern` contains any placeholder token.
    pub fn fixed(
        pattern: impl Into<String>,
        module_name: &str,
        controller_name: &str,
        action_name: &str,
    ) -> Result<Self, InvalidMatcherError> {
        Self::new(
            pattern,
            Some(module_name),
            Some(controller_name),
            Some(action_name),
        )
    }

    fn check(&self) -> Result<(), InvalidMatcherError> {
        for role in Role::ALL {
            let has_value = self.fixed_value(role).is_some();
            let has_key = self.parts.iter().any(|part| part == role.key());
            if has_value == has_key {
                return Err(InvalidMatcherError {
                    pattern: self.pattern.clone(),
                    role,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Value configured for `role`, `None` when the role is read from the uri.
    #[must_use]
    pub fn fixed_value(&self, role: Role) -> Option<&str> {
        match role {
            Role::Module => self.module_name.as_deref(),
            Role::Controller => self.controller_name.as_deref(),
            Role::Action => self.action_name.as_deref(),
        }
    }

    /// Route produced by this matcher when no role is read from the uri.
    #[must_use]
    pub fn fixed_route(&self) -> Option<Route> {
        Some(Route::new(
            self.module_name.as_deref()?,
            self.controller_name.as_deref()?,
            self.action_name.as_deref()?,
        ))
    }

    /// Test `uri` against the pattern.
    ///
    /// Matching is purely structural and side-effect free. A uri with a
    /// different segment count never matches; a placeholder binds its role to
    /// the uri segment at the same position; any other differing segment
    /// rejects the uri. An empty uri is treated as zero segments.
    #[must_use]
    pub fn match_uri(&self, uri: &str) -> Option<Route> {
        let uri_parts: Vec<&str> = segments(uri).collect();
        if uri_parts.len() != self.parts.len() {
            return None;
        }

        let mut module_name = self.module_name.as_deref();
        let mut controller_name = self.controller_name.as_deref();
        let mut action_name = self.action_name.as_deref();

        for (pattern_part, uri_part) in self.parts.iter().zip(uri_parts) {
            if pattern_part == uri_part {
                continue;
            }
            match Role::from_key(pattern_part)? {
                Role::Module => module_name = Some(uri_part),
                Role::Controller => controller_name = Some(uri_part),
                Role::Action => action_name = Some(uri_part),
            }
        }

        Some(Route::new(module_name?, controller_name?, action_name?))
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)?;
        for role in Role::ALL {
            if let Some(value) = self.fixed_value(role) {
                write!(f, " {role}={value}")?;
            }
        }
        Ok(())
    }
}
