//! Templated views.
//!
//! A [`View`] renders one script file from the views directory with
//! `minijinja`. When a layout is set, the script output is rendered again
//! inside `layouts/<name>.html` as the safe `content` variable.
//!
//! Templates see every user variable plus three reserved ones:
//! `placeholders` (map), `stylesheets` and `scripts` (rendered HTML tags).
//! The `placeholder(name)` function reads a placeholder, `""` when unset.

use crate::router::Route;
use minijinja::{Environment, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Layout applied when none is configured.
pub const DEFAULT_LAYOUT: &str = "default";
/// Extension of script and layout files.
pub const VIEWS_EXTENSION: &str = ".html";
/// Layouts live in this subdirectory of the views directory.
pub const LAYOUTS_DIRECTORY: &str = "layouts";

pub const VARIABLE_PLACEHOLDERS: &str = "placeholders";
pub const VARIABLE_STYLESHEETS: &str = "stylesheets";
pub const VARIABLE_SCRIPTS: &str = "scripts";

const RESERVED: [&str; 3] = [VARIABLE_PLACEHOLDERS, VARIABLE_STYLESHEETS, VARIABLE_SCRIPTS];

#[derive(Debug)]
pub enum ViewError {
    /// Attempt to set or read one of the reserved variable names
    ReservedVariable(String),
    /// Read of a variable that was never set
    MissingVariable(String),
    /// `render` called before any script was set
    NoScript,
    /// Script file missing or unreadable
    ScriptNotFound(PathBuf),
    /// Template failed to compile or render
    Render(minijinja::Error),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::ReservedVariable(name) => write!(f, "Cannot use reserved variable {name}"),
            ViewError::MissingVariable(name) => {
                write!(f, "Tried to access non existing variable {name}")
            }
            ViewError::NoScript => write!(f, "No view script set"),
            ViewError::ScriptNotFound(path) => write!(f, "{} not found", path.display()),
            ViewError::Render(err) => write!(f, "Exception caught during view rendering: {err}"),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewError::Render(err) => Some(err),
            _ => None,
        }
    }
}

impl From<minijinja::Error> for ViewError {
    fn from(err: minijinja::Error) -> Self {
        ViewError::Render(err)
    }
}

/// Move `path` to the front (or back) of `list`, keeping one copy.
fn place_unique(list: &mut Vec<String>, path: &str, front: bool) {
    list.retain(|existing| existing != path);
    if front {
        list.insert(0, path.to_string());
    } else {
        list.push(path.to_string());
    }
}

#[derive(Debug, Clone)]
pub struct View {
    script: Option<String>,
    directory: PathBuf,
    variables: BTreeMap<String, Value>,
    placeholders: BTreeMap<String, String>,
    stylesheets: Vec<String>,
    scripts: Vec<String>,
    layout: Option<Box<View>>,
}

impl View {
    /// View rooted at `directory` with no script and no layout.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            script: None,
            directory: directory.into(),
            variables: BTreeMap::new(),
            placeholders: BTreeMap::new(),
            stylesheets: Vec::new(),
            scripts: Vec::new(),
            layout: None,
        }
    }

    #[must_use]
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    #[must_use]
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn set_script(&mut self, script: impl Into<String>) -> &mut Self {
        self.script = Some(script.into());
        self
    }

    /// Script `<module>/<controller>/<action>`.
    pub fn set_script_from_route(&mut self, route: &Route) -> &mut Self {
        self.set_script(route.to_string())
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn set_directory(&mut self, directory: impl Into<PathBuf>) -> &mut Self {
        self.directory = directory.into();
        self
    }

    /// Use `layouts/<layout>` as parent view, or disable the layout with `None`.
    pub fn set_layout(&mut self, layout: Option<&str>) -> &mut Self {
        self.layout = layout.map(|name| {
            Box::new(View::new(self.directory.join(LAYOUTS_DIRECTORY)).with_script(name))
        });
        self
    }

    pub fn disable_layout(&mut self) -> &mut Self {
        self.layout = None;
        self
    }

    #[must_use]
    pub fn layout(&self) -> Option<&View> {
        self.layout.as_deref()
    }

    /// Layout view, to set variables only the layout uses.
    pub fn layout_mut(&mut self) -> Option<&mut View> {
        self.layout.as_deref_mut()
    }

    /// Set a template variable.
    ///
    /// # Errors
    ///
    /// Reserved names are rejected.
    pub fn set<T: Serialize>(&mut self, name: &str, value: T) -> Result<&mut Self, ViewError> {
        if RESERVED.contains(&name) {
            return Err(ViewError::ReservedVariable(name.to_string()));
        }
        self.variables
            .insert(name.to_string(), Value::from_serialize(&value));
        Ok(self)
    }

    /// # Errors
    ///
    /// Fails for reserved names and variables never set.
    pub fn get(&self, name: &str) -> Result<&Value, ViewError> {
        if RESERVED.contains(&name) {
            return Err(ViewError::ReservedVariable(name.to_string()));
        }
        self.variables
            .get(name)
            .ok_or_else(|| ViewError::MissingVariable(name.to_string()))
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn unset(&mut self, name: &str) {
        self.variables.remove(name);
    }

    pub fn set_placeholder(&mut self, name: &str, value: impl Into<String>) {
        self.placeholders.insert(name.to_string(), value.into());
    }

    /// Placeholder content, empty when unset.
    #[must_use]
    pub fn placeholder(&self, name: &str) -> &str {
        self.placeholders.get(name).map_or("", String::as_str)
    }

    pub fn prepend_stylesheet(&mut self, path: &str) {
        place_unique(&mut self.stylesheets, path, true);
    }

    pub fn append_stylesheet(&mut self, path: &str) {
        place_unique(&mut self.stylesheets, path, false);
    }

    #[must_use]
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    #[must_use]
    pub fn render_stylesheets(&self) -> String {
        self.stylesheets
            .iter()
            .map(|href| format!("<link rel=\"stylesheet\" href=\"{href}\" />"))
            .collect()
    }

    pub fn prepend_script(&mut self, path: &str) {
        place_unique(&mut self.scripts, path, true);
    }

    pub fn append_script(&mut self, path: &str) {
        place_unique(&mut self.scripts, path, false);
    }

    #[must_use]
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    #[must_use]
    pub fn render_scripts(&self) -> String {
        self.scripts
            .iter()
            .map(|src| format!("<script src=\"{src}\"></script>"))
            .collect()
    }

    #[must_use]
    pub fn script_path(&self) -> Option<PathBuf> {
        self.script
            .as_ref()
            .map(|script| self.directory.join(format!("{script}{VIEWS_EXTENSION}")))
    }

    fn context(&self) -> BTreeMap<String, Value> {
        let mut ctx = self.variables.clone();
        ctx.insert(
            VARIABLE_PLACEHOLDERS.to_string(),
            Value::from_serialize(&self.placeholders),
        );
        ctx.insert(
            VARIABLE_STYLESHEETS.to_string(),
            Value::from_safe_string(self.render_stylesheets()),
        );
        ctx.insert(
            VARIABLE_SCRIPTS.to_string(),
            Value::from_safe_string(self.render_scripts()),
        );
        ctx
    }

    /// Layout state for rendering: child data first, layout data on top.
    fn merged_into(&self, layout: &View, content: String) -> View {
        let mut merged = layout.clone();
        merged.variables = self.variables.clone();
        merged.variables.extend(layout.variables.clone());
        merged
            .variables
            .insert("content".to_string(), Value::from_safe_string(content));

        merged.placeholders = self.placeholders.clone();
        merged.placeholders.extend(layout.placeholders.clone());

        merged.stylesheets = self.stylesheets.clone();
        merged.stylesheets.extend(layout.stylesheets.iter().cloned());
        merged.scripts = self.scripts.clone();
        merged.scripts.extend(layout.scripts.iter().cloned());
        merged
    }

    /// Render the script, then the layout around it when one is set.
    ///
    /// # Errors
    ///
    /// Fails when no script is set, the script file cannot be read, or the
    /// template does not compile or render.
    pub fn render(&self) -> Result<String, ViewError> {
        let path = self.script_path().ok_or(ViewError::NoScript)?;
        let source =
            std::fs::read_to_string(&path).map_err(|_| ViewError::ScriptNotFound(path.clone()))?;

        let mut env = Environment::new();
        let placeholders = self.placeholders.clone();
        env.add_function("placeholder", move |name: String| -> String {
            placeholders.get(&name).cloned().unwrap_or_default()
        });

        let name = path.to_string_lossy();
        let output = env.render_named_str(&name, &source, self.context())?;
        debug!(script = %path.display(), bytes = output.len(), "View rendered");

        match &self.layout {
            Some(layout) => self.merged_into(layout, output).render(),
            None => Ok(output),
        }
    }

    /// Render another script with this view's state.
    ///
    /// # Errors
    ///
    /// Same as [`render`](Self::render).
    pub fn render_script(&mut self, script: &str) -> Result<String, ViewError> {
        self.set_script(script);
        self.render()
    }
}
