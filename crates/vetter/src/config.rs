//! Layered configuration: CLI flags (highest), `VET_*` environment
//! variables, a `vetter.toml` file searched from the current directory
//! upward (path overridable with `--config`), then built-in defaults
//! (§6 Added — Configuration layering).

use std::path::{Path, PathBuf};

use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "vetter.toml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub concurrency: Option<usize>,
    #[serde(default)]
    pub rate_limit: Option<f64>,
    #[serde(default)]
    pub retries: Option<u32>,
    #[serde(default)]
    pub max_programs: Option<usize>,
    #[serde(default)]
    pub exception_window_days: Option<i64>,
}

impl FileConfig {
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| anyhow::anyhow!("failed to read {}: {source}", path.display()))?;
        Self::from_toml(&contents)
    }
}

/// Walks upward from `start` looking for `vetter.toml`. Returns `None` if
/// no ancestor directory contains one.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}

/// The fully-resolved configuration a scan actually runs with, after
/// merging file, environment and built-in-default layers. CLI flags that
/// shadow these fields are applied by the caller on top of this struct.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub concurrency: usize,
    pub rate_limit: f64,
    pub retries: u32,
    pub max_programs: usize,
    pub exception_window_days: i64,
}

impl ResolvedConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.vetter.dev";
    pub const DEFAULT_CONCURRENCY: usize = 10;
    pub const DEFAULT_RATE_LIMIT: f64 = 25.0;
    pub const DEFAULT_RETRIES: u32 = 3;
    pub const DEFAULT_MAX_PROGRAMS: usize = vetter_eval::DEFAULT_MAX_PROGRAMS;
    pub const DEFAULT_EXCEPTION_WINDOW_DAYS: i64 = vetter_analyzers::ExceptionSet::DEFAULT_WINDOW_DAYS;

    /// Resolves layers in precedence order: env vars over the file config
    /// over built-in defaults. `file` is `None` when no `vetter.toml` was
    /// found or loaded.
    pub fn resolve(file: Option<FileConfig>, env: &dyn Fn(&str) -> Option<String>) -> Self {
        let file = file.unwrap_or_default();

        let api_key = env("VET_API_KEY").or(file.api_key);
        let base_url = env("VET_BASE_URL")
            .or(file.base_url)
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());
        let concurrency = env("VET_CONCURRENCY")
            .and_then(|v| v.parse().ok())
            .or(file.concurrency)
            .unwrap_or(Self::DEFAULT_CONCURRENCY);
        let rate_limit = env("VET_RATE_LIMIT")
            .and_then(|v| v.parse().ok())
            .or(file.rate_limit)
            .unwrap_or(Self::DEFAULT_RATE_LIMIT);
        let retries = env("VET_RETRIES")
            .and_then(|v| v.parse().ok())
            .or(file.retries)
            .unwrap_or(Self::DEFAULT_RETRIES);
        let max_programs = env("VET_MAX_PROGRAMS")
            .and_then(|v| v.parse().ok())
            .or(file.max_programs)
            .unwrap_or(Self::DEFAULT_MAX_PROGRAMS);
        let exception_window_days = env("VET_EXCEPTION_WINDOW_DAYS")
            .and_then(|v| v.parse().ok())
            .or(file.exception_window_days)
            .unwrap_or(Self::DEFAULT_EXCEPTION_WINDOW_DAYS);

        Self {
            api_key,
            base_url,
            concurrency,
            rate_limit,
            retries,
            max_programs,
            exception_window_days,
        }
    }

    /// Loads the configuration for a real process invocation: `config_path`
    /// if given, otherwise searches upward from the current directory;
    /// falls back to built-in defaults if neither finds a file.
    pub fn load(config_path: Option<&Path>, cwd: &Path) -> anyhow::Result<Self> {
        let file = match config_path {
            Some(path) => Some(FileConfig::load(path)?),
            None => match find_config_file(cwd) {
                Some(path) => Some(FileConfig::load(&path)?),
                None => None,
            },
        };
        Ok(Self::resolve(file, &|key| std::env::var(key).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_key: &str) -> Option<String> {
        None
    }

    #[test]
    fn built_in_defaults_apply_when_nothing_else_is_set() {
        let resolved = ResolvedConfig::resolve(None, &no_env);
        assert_eq!(resolved.concurrency, ResolvedConfig::DEFAULT_CONCURRENCY);
        assert_eq!(resolved.rate_limit, ResolvedConfig::DEFAULT_RATE_LIMIT);
        assert_eq!(resolved.base_url, ResolvedConfig::DEFAULT_BASE_URL);
        assert!(resolved.api_key.is_none());
    }

    #[test]
    fn file_config_overrides_defaults() {
        let file = FileConfig::from_toml("concurrency = 4\nbase_url = \"https://example.com\"\n").unwrap();
        let resolved = ResolvedConfig::resolve(Some(file), &no_env);
        assert_eq!(resolved.concurrency, 4);
        assert_eq!(resolved.base_url, "https://example.com");
    }

    #[test]
    fn retries_max_programs_and_exception_window_fall_back_to_their_own_defaults() {
        let resolved = ResolvedConfig::resolve(None, &no_env);
        assert_eq!(resolved.retries, ResolvedConfig::DEFAULT_RETRIES);
        assert_eq!(resolved.max_programs, ResolvedConfig::DEFAULT_MAX_PROGRAMS);
        assert_eq!(resolved.exception_window_days, ResolvedConfig::DEFAULT_EXCEPTION_WINDOW_DAYS);
    }

    #[test]
    fn exception_window_days_is_overridable_via_env() {
        let env = |key: &str| (key == "VET_EXCEPTION_WINDOW_DAYS").then(|| "30".to_string());
        let resolved = ResolvedConfig::resolve(None, &env);
        assert_eq!(resolved.exception_window_days, 30);
    }

    #[test]
    fn env_vars_override_the_file() {
        let file = FileConfig::from_toml("concurrency = 4\n").unwrap();
        let env = |key: &str| (key == "VET_CONCURRENCY").then(|| "20".to_string());
        let resolved = ResolvedConfig::resolve(Some(file), &env);
        assert_eq!(resolved.concurrency, 20);
    }

    #[test]
    fn find_config_file_walks_up_to_an_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "concurrency = 1\n").unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn find_config_file_returns_none_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config_file(dir.path()).is_none());
    }
}
