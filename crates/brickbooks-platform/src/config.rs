use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::info;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub http_addr: String,
    pub seed_path: Option<PathBuf>,
    pub auto_inventory: bool,
}

impl ServiceConfig {
    pub fn from_env(default_http_addr: &str) -> Result<Self> {
        Self::from_lookup(default_http_addr, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        default_http_addr: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let http_addr = lookup("HTTP_ADDR").unwrap_or_else(|| default_http_addr.to_string());
        let seed_path = lookup("BRICKBOOKS_SEED_PATH")
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);
        let auto_inventory = match lookup("BRICKBOOKS_AUTO_INVENTORY") {
            Some(raw) => {
                parse_flag(&raw).context("BRICKBOOKS_AUTO_INVENTORY must be a boolean")?
            }
            None => false,
        };

        Ok(Self {
            http_addr,
            seed_path,
            auto_inventory,
        })
    }

    /// Reads the seed document, if one is configured.
    pub fn seed_document(&self) -> Result<Option<Value>> {
        let Some(path) = &self.seed_path else {
            return Ok(None);
        };

        info!("loading seed records from {}", path.display());
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        let document = serde_json::from_str(&raw)
            .with_context(|| format!("seed file {} is not valid JSON", path.display()))?;
        Ok(Some(document))
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognised flag value {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ServiceConfig::from_lookup("0.0.0.0:8090", lookup(&[])).unwrap();

        assert_eq!(config.http_addr, "0.0.0.0:8090");
        assert!(config.seed_path.is_none());
        assert!(!config.auto_inventory);
        assert!(config.seed_document().unwrap().is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = ServiceConfig::from_lookup(
            "0.0.0.0:8090",
            lookup(&[
                ("HTTP_ADDR", "127.0.0.1:9000"),
                ("BRICKBOOKS_SEED_PATH", "/tmp/books.json"),
                ("BRICKBOOKS_AUTO_INVENTORY", "1"),
            ]),
        )
        .unwrap();

        assert_eq!(config.http_addr, "127.0.0.1:9000");
        assert_eq!(config.seed_path, Some(PathBuf::from("/tmp/books.json")));
        assert!(config.auto_inventory);
    }

    #[test]
    fn rejects_unknown_flag_values() {
        let result = ServiceConfig::from_lookup(
            "0.0.0.0:8090",
            lookup(&[("BRICKBOOKS_AUTO_INVENTORY", "sometimes")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_seed_file_is_an_error() {
        let config = ServiceConfig::from_lookup(
            "0.0.0.0:8090",
            lookup(&[("BRICKBOOKS_SEED_PATH", "/nonexistent/brickbooks-seed.json")]),
        )
        .unwrap();
        assert!(config.seed_document().is_err());
    }
}
