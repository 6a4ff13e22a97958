//! Configuration for retailboard
//!
//! Loaded from a TOML file and passed explicitly to the data store and the
//! section dispatcher; there is no global connection state.
//!
//! ```toml
//! [store]
//! database_path = "retail.db"
//! row_limit = 2000
//!
//! [analytics]
//! top_n = 15
//! cohort_cap = 20
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analytics::{DEFAULT_COHORT_CAP, DEFAULT_PARETO_FRACTION, DEFAULT_SEASONAL_THRESHOLD_PCT};
use crate::error::{CoreError, Result};

/// Data store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database holding the inventory table and its views
    pub database_path: PathBuf,

    /// Row cap for raw inventory samples
    pub row_limit: usize,

    /// Maximum memoized query results
    pub cache_capacity: u64,

    /// Lifetime of a memoized query result in seconds
    pub cache_ttl_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("retail.db"),
            row_limit: 2000,
            cache_capacity: 64,
            cache_ttl_secs: 300,
        }
    }
}

impl StoreConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Calculator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Products shown per top-N list
    pub top_n: usize,

    /// Maximum products per performance cohort
    pub cohort_cap: usize,

    /// Population fraction for the Pareto check
    pub pareto_fraction: f64,

    /// Variation percent above which a category is strongly seasonal
    pub seasonal_threshold_pct: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_n: 15,
            cohort_cap: DEFAULT_COHORT_CAP,
            pareto_fraction: DEFAULT_PARETO_FRACTION,
            seasonal_threshold_pct: DEFAULT_SEASONAL_THRESHOLD_PCT,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetailboardConfig {
    pub store: StoreConfig,
    pub analytics: AnalyticsConfig,
}

impl RetailboardConfig {
    /// Load from a TOML file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CoreError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| CoreError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the calculators cannot work with
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| -> Result<()> { Err(CoreError::InvalidConfig { message }) };

        if self.store.row_limit == 0 {
            return invalid("store.row_limit must be positive".to_string());
        }
        if self.analytics.top_n == 0 {
            return invalid("analytics.top_n must be positive".to_string());
        }
        if self.analytics.cohort_cap == 0 {
            return invalid("analytics.cohort_cap must be positive".to_string());
        }
        let f = self.analytics.pareto_fraction;
        if !(f > 0.0 && f <= 1.0) {
            return invalid(format!(
                "analytics.pareto_fraction must be in (0, 1], got {}",
                f
            ));
        }
        let t = self.analytics.seasonal_threshold_pct;
        if !(t.is_finite() && t >= 0.0) {
            return invalid(format!(
                "analytics.seasonal_threshold_pct must be >= 0, got {}",
                t
            ));
        }
        Ok(())
    }
}
