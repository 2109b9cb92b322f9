//! Storefront configuration model.
//!
//! Every field has a default so a missing or partial `config.toml` still
//! yields a usable configuration. Loading from disk lives in the
//! infrastructure crate.

use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Root of `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorefrontConfig {
    pub session: SessionSettings,
    pub catalog: CatalogSettings,
    pub checkout: CheckoutSettings,
    pub storage: StorageSettings,
}

impl StorefrontConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> crate::error::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Renders the configuration as pretty TOML.
    pub fn to_toml_string(&self) -> crate::error::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Login / registration behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Artificial delay applied to login and register.
    pub simulated_latency_ms: u64,
    /// Avatar assigned to synthesized identities.
    pub avatar_placeholder: String,
}

impl SessionSettings {
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            simulated_latency_ms: 1000,
            avatar_placeholder: "/placeholder.svg?height=40&width=40".to_string(),
        }
    }
}

/// Defaults applied to newly listed meals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub default_rating: Decimal,
    pub default_prep_time: String,
    pub image_placeholder: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            default_rating: Decimal::new(45, 1),
            default_prep_time: "30 mins".to_string(),
            image_placeholder: "/placeholder.svg?height=200&width=300".to_string(),
        }
    }
}

/// Order pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutSettings {
    /// Flat fee added for home delivery.
    pub delivery_fee: Decimal,
    /// GST applied to the subtotal.
    pub gst_rate: Decimal,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            delivery_fee: Decimal::from(29),
            gst_rate: Decimal::new(18, 2),
        }
    }
}

/// Where durable records live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageSettings {
    /// Overrides the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}
