//! # Storefront Configuration
//!
//! Pricing, storage and catalog settings, loaded at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     EKART_TAX_RATE_BPS=825                                             │
//! │     EKART_DATA_DIR=/tmp/ekart                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/ekart/config.toml (Linux)                                │
//! │     ~/Library/Application Support/com.ekart.storefront/config.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     8% tax, $10.00 shipping, free at $75.00, USD, file storage         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # config.toml
//! [store]
//! name = "eKart"
//!
//! [pricing]
//! currency = "USD"
//! tax_rate_bps = 800
//! shipping_fee_cents = 1000
//! free_shipping_threshold_cents = 7500
//!
//! [storage]
//! backend = "file"      # file | memory
//! data_dir = "/var/lib/ekart"
//!
//! [catalog]
//! path = "catalog.json"
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use directories::ProjectDirs;
use ekart_core::{Currency, Money, PricingPolicy, TaxRate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to save config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No config path available on this platform")]
    NoConfigPath,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Shown in CLI headers and order confirmations.
    pub name: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        StoreSection {
            name: "eKart".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSection {
    /// ISO-4217 code; only selects the display symbol.
    pub currency: String,

    /// e.g. 800 = 8%
    pub tax_rate_bps: u32,

    pub shipping_fee_cents: i64,

    /// Subtotals at or above this ship free.
    pub free_shipping_threshold_cents: i64,
}

impl Default for PricingSection {
    fn default() -> Self {
        PricingSection {
            currency: ekart_core::DEFAULT_CURRENCY.to_string(),
            tax_rate_bps: ekart_core::DEFAULT_TAX_RATE_BPS,
            shipping_fee_cents: ekart_core::DEFAULT_SHIPPING_FEE_CENTS,
            free_shipping_threshold_cents: ekart_core::FREE_SHIPPING_THRESHOLD_CENTS,
        }
    }
}

/// Where the cart is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per key under `data_dir`
    #[default]
    File,

    /// Nothing survives the process (kiosk / private sessions)
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "disk" => Ok(StorageBackend::File),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            _ => Err(format!("Unknown storage backend: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub backend: StorageBackend,

    /// Overrides the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    /// JSON array of products. The built-in sample catalog when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Storefront Config
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub pricing: PricingSection,

    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub catalog: CatalogSection,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let code = self.pricing.currency.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::Invalid(format!(
                "currency must be a 3-letter ISO code, got '{}'",
                self.pricing.currency
            )));
        }

        if self.pricing.tax_rate_bps > 10_000 {
            return Err(ConfigError::Invalid(format!(
                "tax_rate_bps must be at most 10000 (100%), got {}",
                self.pricing.tax_rate_bps
            )));
        }

        if self.pricing.shipping_fee_cents < 0 {
            return Err(ConfigError::Invalid(
                "shipping_fee_cents must not be negative".into(),
            ));
        }

        if self.pricing.free_shipping_threshold_cents < 0 {
            return Err(ConfigError::Invalid(
                "free_shipping_threshold_cents must not be negative".into(),
            ));
        }

        Ok(())
    }

    /// Applies `EKART_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any `EKART_*` lookup (the process environment in
    /// production, a map in tests).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("EKART_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(currency) = lookup("EKART_CURRENCY") {
            debug!(currency = %currency, "Overriding currency from environment");
            self.pricing.currency = currency;
        }

        if let Some(bps) = lookup("EKART_TAX_RATE_BPS") {
            match bps.parse::<u32>() {
                Ok(bps) => self.pricing.tax_rate_bps = bps,
                Err(_) => warn!(value = %bps, "Ignoring non-numeric EKART_TAX_RATE_BPS"),
            }
        }

        if let Some(fee) = lookup("EKART_SHIPPING_FEE_CENTS") {
            match fee.parse::<i64>() {
                Ok(fee) => self.pricing.shipping_fee_cents = fee,
                Err(_) => warn!(value = %fee, "Ignoring non-numeric EKART_SHIPPING_FEE_CENTS"),
            }
        }

        if let Some(threshold) = lookup("EKART_FREE_SHIPPING_THRESHOLD_CENTS") {
            match threshold.parse::<i64>() {
                Ok(threshold) => self.pricing.free_shipping_threshold_cents = threshold,
                Err(_) => warn!(
                    value = %threshold,
                    "Ignoring non-numeric EKART_FREE_SHIPPING_THRESHOLD_CENTS"
                ),
            }
        }

        if let Some(backend) = lookup("EKART_STORAGE") {
            match backend.parse() {
                Ok(parsed) => self.storage.backend = parsed,
                Err(e) => warn!("{}", e),
            }
        }

        if let Some(dir) = lookup("EKART_DATA_DIR") {
            debug!(dir = %dir, "Overriding data directory from environment");
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(path) = lookup("EKART_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Pricing policy the cart engine runs with.
    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy {
            tax_rate: TaxRate::from_bps(self.pricing.tax_rate_bps),
            shipping_fee: Money::from_cents(self.pricing.shipping_fee_cents),
            free_shipping_threshold: Money::from_cents(self.pricing.free_shipping_threshold_cents),
            currency: Currency::new(&self.pricing.currency),
        }
    }

    /// Directory the file backend writes to.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.ekart.storefront`
    /// - **Windows**: `%APPDATA%\ekart\storefront\data`
    /// - **Linux**: `~/.local/share/storefront`
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.storage
            .data_dir
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "ekart", "storefront")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert!(config.validate().is_ok());

        let policy = config.pricing_policy();
        assert_eq!(policy, PricingPolicy::default());
        assert_eq!(config.storage.backend, StorageBackend::File);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = StorefrontConfig::default();
        config.apply_overrides(lookup(&[
            ("EKART_TAX_RATE_BPS", "825"),
            ("EKART_CURRENCY", "eur"),
            ("EKART_STORAGE", "memory"),
            ("EKART_DATA_DIR", "/tmp/ekart"),
            ("EKART_SHIPPING_FEE_CENTS", "not-a-number"),
        ]));

        assert_eq!(config.pricing.tax_rate_bps, 825);
        assert_eq!(config.pricing.shipping_fee_cents, 1000);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.data_dir(), Some(PathBuf::from("/tmp/ekart")));
        assert_eq!(config.pricing_policy().currency.code(), "EUR");
    }

    #[test]
    fn test_config_validation() {
        let mut config = StorefrontConfig::default();

        config.pricing.currency = "US".to_string();
        assert!(config.validate().is_err());

        config.pricing.currency = "USD".to_string();
        config.pricing.tax_rate_bps = 20_000;
        assert!(config.validate().is_err());

        config.pricing.tax_rate_bps = 800;
        config.pricing.shipping_fee_cents = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = StorefrontConfig::default();
        config.pricing.tax_rate_bps = 700;
        config.storage.data_dir = Some(dir.path().join("data"));
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: StorefrontConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: StorefrontConfig = toml::from_str(
            r#"
            [pricing]
            tax_rate_bps = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.tax_rate_bps, 500);
        assert_eq!(config.pricing.shipping_fee_cents, 1000);
        assert_eq!(config.store.name, "eKart");
    }
}
