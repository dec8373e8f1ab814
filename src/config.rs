//! Engine configuration
use std::path::{Path, PathBuf};

pub const DEFAULT_KEY_PREFIX: &str = "ecommerce_";
pub const DEFAULT_PRICE_CEILING: f64 = 1000.0;
pub const DEFAULT_TAX_RATE: f64 = 0.08;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    path: PathBuf,
    temporary: bool,
    key_prefix: String,
    price_ceiling: f64,
    tax_rate: f64,
    flush_on_teardown: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("storefront.db"),
            temporary: false,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            price_ceiling: DEFAULT_PRICE_CEILING,
            tax_rate: DEFAULT_TAX_RATE,
            flush_on_teardown: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }
    /// A temporary database ignores `path` and is removed when dropped. Used by tests.
    pub fn set_temporary(mut self, temporary: bool) -> Self {
        self.temporary = temporary;
        self
    }
    pub fn set_key_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }
    pub fn set_price_ceiling(mut self, ceiling: f64) -> Self {
        self.price_ceiling = ceiling.max(0.0);
        self
    }
    pub fn set_tax_rate(mut self, rate: f64) -> Self {
        self.tax_rate = rate.max(0.0);
        self
    }
    pub fn set_flush_on_teardown(mut self, flush: bool) -> Self {
        self.flush_on_teardown = flush;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }
    pub fn price_ceiling(&self) -> f64 {
        self.price_ceiling
    }
    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }
    pub fn flush_on_teardown(&self) -> bool {
        self.flush_on_teardown
    }

    /// Opens the sled database described by this config.
    pub fn open_db(&self) -> anyhow::Result<sled::Db> {
        // temporary databases get a unique generated path from sled
        let mut config = sled::Config::new().temporary(self.temporary);
        if !self.temporary {
            config = config.path(&self.path);
        }
        Ok(config.open()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_storefront() {
        let config = EngineConfig::new();

        assert_eq!(config.key_prefix(), "ecommerce_");
        assert_eq!(config.price_ceiling(), 1000.0);
        assert_eq!(config.tax_rate(), 0.08);
        assert!(config.flush_on_teardown());
    }

    #[test]
    fn negative_settings_clamp_to_zero() {
        let config = EngineConfig::new().set_price_ceiling(-5.0).set_tax_rate(-0.1);

        assert_eq!(config.price_ceiling(), 0.0);
        assert_eq!(config.tax_rate(), 0.0);
    }

    #[test]
    fn temporary_db_opens() {
        let db = EngineConfig::new().set_temporary(true).open_db().unwrap();
        assert!(db.is_empty());
    }
}
