use anyhow::Context;
use serde::Deserialize;

/// Runtime configuration, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Path of the SQLite database file, `DB_PATH`.
    pub db_path: String,
    /// Address the HTTP server binds to, `LISTEN_ADDR`.
    pub listen_addr: String,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_source(config::Environment::default())
    }

    fn from_source<S>(source: S) -> anyhow::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .set_default("listen_addr", "0.0.0.0:8080")?
            .add_source(source)
            .build()?
            .try_deserialize()
            .context("DB_PATH must be set")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::default().source(Some(source))
    }

    #[test]
    fn listen_addr_has_a_default() {
        let settings = Settings::from_source(env(&[("DB_PATH", "trivia.db")])).unwrap();
        assert_eq!(
            settings,
            Settings {
                db_path: "trivia.db".to_string(),
                listen_addr: "0.0.0.0:8080".to_string(),
            }
        );
    }

    #[test]
    fn listen_addr_can_be_overridden() {
        let settings = Settings::from_source(env(&[
            ("DB_PATH", "trivia.db"),
            ("LISTEN_ADDR", "127.0.0.1:5000"),
        ]))
        .unwrap();
        assert_eq!(settings.listen_addr, "127.0.0.1:5000");
    }

    #[test]
    fn db_path_is_required() {
        assert!(Settings::from_source(env(&[])).is_err());
    }
}
