//! Argument vectors for the external CLI.
//!
//! Builders return owned `Vec<String>` so callers can append hook arguments;
//! nothing here spawns a process.

use automation_settings::PluginKind;

/// Placeholder printed instead of a secret config value.
pub const MASK: &str = "[secret]";

#[must_use]
pub fn stack_select(stack_name: &str) -> Vec<String> {
    owned(&["stack", "select", stack_name])
}

#[must_use]
pub fn stack_init(stack_name: &str, secrets_provider: Option<&str>) -> Vec<String> {
    let mut args = owned(&["stack", "init", stack_name]);
    if let Some(provider) = secrets_provider.filter(|p| !p.trim().is_empty()) {
        args.extend(owned(&["--secrets-provider", provider]));
    }
    args
}

#[must_use]
pub fn stack_rm(stack_name: &str) -> Vec<String> {
    owned(&["stack", "rm", "--yes", stack_name])
}

#[must_use]
pub fn stack_ls() -> Vec<String> {
    owned(&["stack", "ls", "--json"])
}

#[must_use]
pub fn config_get(key: &str) -> Vec<String> {
    owned(&["config", "get", key, "--json"])
}

#[must_use]
pub fn config_show() -> Vec<String> {
    owned(&["config", "--show-secrets", "--json"])
}

#[must_use]
pub fn config_set(key: &str, value: &str, secret: bool) -> Vec<String> {
    let flag = if secret { "--secret" } else { "--plaintext" };
    owned(&["config", "set", key, value, flag])
}

#[must_use]
pub fn config_rm(key: &str) -> Vec<String> {
    owned(&["config", "rm", key])
}

#[must_use]
pub fn config_refresh() -> Vec<String> {
    owned(&["config", "refresh", "--force"])
}

#[must_use]
pub fn whoami() -> Vec<String> {
    owned(&["whoami"])
}

#[must_use]
pub fn plugin_install(name: &str, version: &str, kind: PluginKind) -> Vec<String> {
    owned(&["plugin", "install", kind.as_str(), name, version])
}

#[must_use]
pub fn plugin_rm(name: Option<&str>, version_range: Option<&str>, kind: PluginKind) -> Vec<String> {
    let mut args = owned(&["plugin", "rm", kind.as_str()]);
    for arg in [name, version_range].into_iter().flatten() {
        if !arg.trim().is_empty() {
            args.push(arg.to_string());
        }
    }
    args.push("--yes".to_string());
    args
}

#[must_use]
pub fn plugin_ls() -> Vec<String> {
    owned(&["plugin", "ls", "--json"])
}

/// Printable command line with the value of `config set ... --secret` masked.
#[must_use]
pub fn display_command(program: &str, args: &[&str]) -> String {
    let masked = args.starts_with(&["config", "set"]) && args.contains(&"--secret");
    let mut parts = vec![program];
    for (i, arg) in args.iter().copied().enumerate() {
        parts.push(if masked && i == 3 { MASK } else { arg });
    }
    parts.join(" ")
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| (*a).to_string()).collect()
}
