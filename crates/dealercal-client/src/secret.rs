//! Secret references in `config.toml`.
//!
//! The API token may point at a secret kept outside the file:
//!
//! - `pass::path/in/store` runs `pass show path/in/store` and keeps the first line
//! - `env::VAR_NAME` reads `$VAR_NAME`
//!
//! Anything else is taken literally.

const PASS_PREFIX: &str = "pass::";
const ENV_PREFIX: &str = "env::";

/// Returns true if `value` is a `pass::` or `env::` reference.
pub fn is_reference(value: &str) -> bool {
    value.starts_with(PASS_PREFIX) || value.starts_with(ENV_PREFIX)
}

/// Resolves a value that may be a secret reference.
pub fn resolve(value: &str) -> Result<String, String> {
    if let Some(path) = value.strip_prefix(PASS_PREFIX) {
        resolve_pass(path)
    } else if let Some(var) = value.strip_prefix(ENV_PREFIX) {
        std::env::var(var).map_err(|_| format!("environment variable `{}` is not set", var))
    } else {
        Ok(value.to_string())
    }
}

fn resolve_pass(path: &str) -> Result<String, String> {
    let output = std::process::Command::new("pass")
        .args(["show", path])
        .output()
        .map_err(|e| format!("failed to run `pass show {}`: {}", path, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "`pass show {}` failed ({}): {}",
            path,
            output.status,
            stderr.trim()
        ));
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
        .ok_or_else(|| format!("`pass show {}` produced no output", path))
}
