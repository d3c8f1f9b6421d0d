use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

pub const DEFAULT_HISTORY_DEPTH: i64 = 4;
pub const DEFAULT_MAX_PROMPT_CHARS: i64 = 1_048_576;

/// Where saved layouts live.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Memory,
    Postgres,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub storage: StorageKind,
    pub database_url: Option<String>,
    pub history_depth: usize,
    pub max_prompt_chars: usize,
    pub gemini: GeminiConfig,
}

impl Config {
    /// Loads defaults, then the TOML file at `path` if it exists, then
    /// `LAYOUT__*` environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`Config::load`], but reads overrides from `env` instead of the
    /// process environment when it is given.
    pub fn load_with_env<P: AsRef<Path>>(
        path: P,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let config_path = path.as_ref();
        let builder = config::Config::builder()
            .set_default("listen_addr", "127.0.0.1:8000")?
            .set_default("storage", "memory")?
            .set_default("history_depth", DEFAULT_HISTORY_DEPTH)?
            .set_default("max_prompt_chars", DEFAULT_MAX_PROMPT_CHARS)?
            .set_default("gemini.base_url", "https://generativelanguage.googleapis.com")?
            .set_default("gemini.model", "gemini-3-pro-preview")?
            .set_default("gemini.timeout_secs", 120_i64)?
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("LAYOUT")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            );

        let settings = builder
            .build()
            .with_context(|| format!("Failed to build configuration from path: {:?}", config_path))?;

        let config: Config = settings
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize configuration from path: {:?}", config_path))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.storage == StorageKind::Postgres && self.database_url.is_none() {
            bail!("storage = \"postgres\" requires database_url to be set");
        }
        if self.history_depth == 0 {
            bail!("history_depth must be at least 1");
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr
            .parse()
            .with_context(|| format!("Invalid listen_addr format in config: {}", self.listen_addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        Config::load_with_env(path, Some(config::Map::new()))
    }

    fn env(vars: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load("does/not/exist.toml").unwrap();
        assert_eq!(config.storage, StorageKind::Memory);
        assert_eq!(config.history_depth, 4);
        assert_eq!(config.max_prompt_chars, 1_048_576);
        assert_eq!(config.gemini.model, "gemini-3-pro-preview");
        assert!(config.socket_addr().is_ok());
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_toml(
            r#"
listen_addr = "0.0.0.0:9100"
history_depth = 6

[gemini]
model = "gemini-2.5-flash"
"#,
        );
        let config = load(file.path()).unwrap();
        assert_eq!(config.history_depth, 6);
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.timeout_secs, 120);
        assert_eq!(config.socket_addr().unwrap().port(), 9100);
    }

    #[test]
    fn postgres_without_url_is_rejected() {
        let file = write_toml("storage = \"postgres\"\n");
        let err = load(file.path()).unwrap_err();
        assert!(err.to_string().contains("database_url"));
    }

    #[test]
    fn zero_history_depth_is_rejected() {
        let file = write_toml("history_depth = 0\n");
        assert!(load(file.path()).is_err());
    }

    #[test]
    fn bad_listen_addr_is_reported() {
        let file = write_toml("listen_addr = \"not-an-addr\"\n");
        let config = load(file.path()).unwrap();
        let err = config.socket_addr().unwrap_err();
        assert!(err.to_string().contains("not-an-addr"));
    }

    #[test]
    fn environment_overrides_file_values() {
        let file = write_toml(
            r#"
listen_addr = "0.0.0.0:9100"

[gemini]
model = "gemini-2.5-flash"
"#,
        );
        let config = Config::load_with_env(
            file.path(),
            env(&[
                ("LAYOUT__LISTEN_ADDR", "127.0.0.1:7000"),
                ("LAYOUT__GEMINI__MODEL", "gemini-2.5-pro"),
                ("LAYOUT__HISTORY_DEPTH", "8"),
                ("UNRELATED__HISTORY_DEPTH", "1"),
            ]),
        )
        .unwrap();
        assert_eq!(config.socket_addr().unwrap().port(), 7000);
        assert_eq!(config.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.history_depth, 8);
    }

    #[test]
    fn environment_can_select_postgres() {
        let config = Config::load_with_env(
            "does/not/exist.toml",
            env(&[
                ("LAYOUT__STORAGE", "postgres"),
                ("LAYOUT__DATABASE_URL", "postgres://localhost/layouts"),
            ]),
        )
        .unwrap();
        assert_eq!(config.storage, StorageKind::Postgres);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/layouts"));
    }

    #[test]
    fn wrongly_typed_value_is_rejected() {
        let file = write_toml("history_depth = \"abc\"\n");
        let err = load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("deserialize"), "{:#}", err);
    }

    #[test]
    fn unknown_storage_kind_is_rejected() {
        let file = write_toml("storage = \"mongodb\"\n");
        assert!(load(file.path()).is_err());
    }
}
