//! Output formatting module

pub mod human;
pub mod json;
pub mod styles;

use std::collections::BTreeMap;

use anyhow::Result;
use automation_settings::{
    ConfigValue, PluginInfo, ProjectSettings, StackSettings, StackSummary, WhoAmIResult,
};
use console::Term;
use owo_colors::OwoColorize as _;
pub use human::HumanRenderer;
pub use styles::Styles;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Marker for JSON rendering: every value is printed as its wire form.
pub struct JsonRenderer;

/// Dispatches rendering to the human or JSON form.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_project(&self, project: &ProjectSettings) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_project(project);
                Ok(())
            }
            Self::Json(_) => json::print(project),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_stack_settings(&self, stack_name: &str, settings: &StackSettings) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_stack_settings(stack_name, settings);
                Ok(())
            }
            Self::Json(_) => json::print(settings),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_stacks(&self, stacks: &[StackSummary]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_stacks(stacks);
                Ok(())
            }
            Self::Json(_) => json::print(stacks),
        }
    }

    /// JSON output carries secret values verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(
        &self,
        config: &BTreeMap<String, ConfigValue>,
        show_secrets: bool,
    ) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_config(config, show_secrets);
                Ok(())
            }
            Self::Json(_) => json::print(config),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config_value(&self, value: &ConfigValue, show_secrets: bool) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_config_value(value, show_secrets);
                Ok(())
            }
            Self::Json(_) => json::print(value),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_plugins(&self, plugins: &[PluginInfo]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_plugins(plugins);
                Ok(())
            }
            Self::Json(_) => json::print(plugins),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_whoami(&self, who: &WhoAmIResult) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_whoami(who);
                Ok(())
            }
            Self::Json(_) => json::print(who),
        }
    }
}
