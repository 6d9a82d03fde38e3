//! Collecting the process environment.

use std::path::Path;

use star_core::Env;
use tracing::debug;

/// Prefix derived from a program name: its basename upper-cased, with `-`
/// mapped to `_`, followed by `_`.
pub fn default_env_prefix(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    format!("{}_", base.to_uppercase().replace('-', "_"))
}

/// Keeps the pairs whose key starts with `prefix`. Keys are not stripped.
pub fn filter_env<I, K, V>(vars: I, prefix: &str) -> Env
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    vars.into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .filter(|(k, _)| k.starts_with(prefix))
        .collect()
}

/// Process environment variables whose key starts with `prefix`.
///
/// Variables that are not valid UTF-8 are skipped.
pub fn os_env(prefix: &str) -> Env {
    let vars = std::env::vars_os().filter_map(|(k, v)| match (k.into_string(), v.into_string()) {
        (Ok(k), Ok(v)) => Some((k, v)),
        (k, _) => {
            debug!(key = ?k, "skipping non UTF-8 environment variable");
            None
        }
    });
    filter_env(vars, prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefix() {
        assert_eq!(default_env_prefix("crud"), "CRUD_");
        assert_eq!(default_env_prefix("/usr/bin/my-tool"), "MY_TOOL_");
    }

    #[test]
    fn test_filter_env_keeps_prefixed_keys() {
        let env = filter_env(
            [
                ("CRUD_DB", "sqlite://x"),
                ("HOME", "/root"),
                ("CRUD_", "empty-suffix"),
                ("crud_lower", "no"),
            ],
            "CRUD_",
        );

        assert_eq!(env.len(), 2);
        assert_eq!(env["CRUD_DB"], "sqlite://x");
        assert_eq!(env["CRUD_"], "empty-suffix");
    }

    #[test]
    fn test_empty_prefix_keeps_everything() {
        let env = filter_env([("A", "1"), ("B", "2")], "");
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_os_env_only_returns_prefixed() {
        let env = os_env("STAR_CLI_TEST_SURELY_UNSET_");
        assert!(env.is_empty());

        let path_like = os_env("PATH");
        assert!(path_like.keys().all(|k| k.starts_with("PATH")));
    }
}
