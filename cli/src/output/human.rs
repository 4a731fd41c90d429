//! Human-readable terminal renderer.

use std::collections::BTreeMap;

use automation_settings::{
    ConfigValue, PluginInfo, ProjectSettings, StackSettings, StackSettingsConfigValue,
    StackSummary, WhoAmIResult,
};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize as _;

use crate::domain::command::MASK;
use crate::output::OutputContext;

/// Renders workspace types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the project settings file.
    pub fn render_project(&self, project: &ProjectSettings) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.header(&format!("Project {}", project.name));
        self.ctx.kv("runtime:", project.runtime.name.as_str());
        for (key, value) in [
            ("main:", &project.main),
            ("description:", &project.description),
            ("author:", &project.author),
            ("website:", &project.website),
            ("license:", &project.license),
        ] {
            if let Some(value) = value {
                self.ctx.kv(key, value);
            }
        }
        if let Some(backend) = project.backend.as_ref().and_then(|b| b.url.as_deref()) {
            self.ctx.kv("backend:", backend);
        }
        if let Some(config) = &project.config {
            self.render_settings_config(config);
        }
    }

    /// Render a stack settings file.
    pub fn render_stack_settings(&self, stack_name: &str, settings: &StackSettings) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.header(&format!("Stack {stack_name}"));
        if let Some(provider) = &settings.secrets_provider {
            self.ctx.kv("secrets provider:", provider);
        }
        if settings.encrypted_key.is_some() || settings.encryption_salt.is_some() {
            self.ctx.kv("encryption:", "configured");
        }
        match &settings.config {
            Some(config) if !config.is_empty() => self.render_settings_config(config),
            _ => self.ctx.info("No config values."),
        }
    }

    fn render_settings_config(&self, config: &BTreeMap<String, StackSettingsConfigValue>) {
        println!();
        self.ctx.header("Config:");
        let width = key_width(config.keys());
        for (key, value) in config {
            if value.is_secure {
                println!(
                    "  {key:<width$}  {}",
                    "secure (encrypted)".style(self.ctx.styles.secret)
                );
            } else {
                println!("  {key:<width$}  {}", value.value);
            }
        }
    }

    /// Render the stacks of a project.
    pub fn render_stacks(&self, stacks: &[StackSummary]) {
        if stacks.is_empty() {
            if !self.ctx.quiet {
                println!("No stacks. Create one: pulumi-auto stack init <name>");
            }
            return;
        }
        let width = key_width(stacks.iter().map(|s| &s.name)).max("NAME".len());
        println!(
            "  {}",
            format!("{:<width$}  {:<20}  {:>9}", "NAME", "LAST UPDATE", "RESOURCES")
                .style(self.ctx.styles.dim)
        );
        for stack in stacks {
            let marker = if stack.current { "*" } else { " " };
            let name = format!("{:<width$}", stack.name);
            let updated = if stack.update_in_progress {
                "in progress".to_string()
            } else {
                stack
                    .last_update
                    .map_or_else(|| "n/a".to_string(), format_time)
            };
            let resources = stack
                .resource_count
                .map_or_else(|| "n/a".to_string(), |n| n.to_string());
            if stack.current {
                println!(
                    "{marker} {}  {updated:<20}  {resources:>9}",
                    name.style(self.ctx.styles.current)
                );
            } else {
                println!("{marker} {name}  {updated:<20}  {resources:>9}");
            }
        }
    }

    /// Render a stack's config as returned by the CLI.
    pub fn render_config(&self, config: &BTreeMap<String, ConfigValue>, show_secrets: bool) {
        if config.is_empty() {
            if !self.ctx.quiet {
                println!("No config values.");
            }
            return;
        }
        let width = key_width(config.keys());
        for (key, value) in config {
            println!("  {key:<width$}  {}", self.config_value(value, show_secrets));
        }
    }

    /// Render one config value.
    pub fn render_config_value(&self, value: &ConfigValue, show_secrets: bool) {
        println!("{}", self.config_value(value, show_secrets));
    }

    fn config_value(&self, value: &ConfigValue, show_secrets: bool) -> String {
        if value.is_secret && !show_secrets {
            MASK.style(self.ctx.styles.secret).to_string()
        } else {
            value.value.clone()
        }
    }

    /// Render installed plugins.
    pub fn render_plugins(&self, plugins: &[PluginInfo]) {
        if plugins.is_empty() {
            if !self.ctx.quiet {
                println!("No plugins installed.");
            }
            return;
        }
        let width = key_width(plugins.iter().map(|p| &p.name)).max("NAME".len());
        println!(
            "  {}",
            format!("{:<width$}  {:<9}  {:<12}  {:>10}", "NAME", "KIND", "VERSION", "SIZE")
                .style(self.ctx.styles.dim)
        );
        for plugin in plugins {
            println!(
                "  {:<width$}  {:<9}  {:<12}  {:>10}",
                plugin.name,
                plugin.kind.as_str(),
                plugin.version.as_deref().unwrap_or("n/a"),
                format_size(plugin.size),
            );
        }
    }

    /// Render the logged-in user.
    pub fn render_whoami(&self, who: &WhoAmIResult) {
        println!("{}", who.user);
    }
}

fn key_width<'k>(keys: impl Iterator<Item = &'k String>) -> usize {
    keys.map(String::len).max().unwrap_or(0)
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M").to_string()
}

/// Plugin size with a binary unit suffix.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut unit = 0;
    let mut whole = bytes;
    let mut rem = 0;
    while whole >= 1024 && unit < UNITS.len() - 1 {
        rem = whole % 1024;
        whole /= 1024;
        unit += 1;
    }
    if unit == 0 {
        format!("{whole} B")
    } else {
        format!("{whole}.{} {}", rem * 10 / 1024, UNITS[unit])
    }
}
