//! Store configuration.
//!
//! ## Sources
//!
//! ```text
//! 1. Environment variables (highest priority)
//!    FAMIN_DATA_DIR=/var/lib/famin
//!    FAMIN_BUCKET_COUNT=256
//!
//! 2. TOML file (./famin.toml unless a path is given)
//!
//! 3. Defaults (lowest priority)
//! ```
//!
//! ## File Format
//!
//! ```toml
//! data_dir = "wearhouse"
//! bucket_count = 100
//! seed_defaults = true
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::index::DEFAULT_BUCKET_COUNT;

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "famin.toml";

// ============================================================================
// File layout
// ============================================================================

pub const PRODUCTS_FILE: &str = "products.txt";
pub const CUSTOMERS_FILE: &str = "customers.txt";
pub const SALES_FILE: &str = "sales.txt";
pub const ORDERS_FILE: &str = "orders.txt";
pub const ADMINS_FILE: &str = "admins.txt";
pub const ID_COUNTERS_FILE: &str = "id_counters.txt";
pub const DATABASE_DIR: &str = "database";
pub const SHIPMENTS_FILE: &str = "shipments.txt";

// ============================================================================
// StoreConfig
// ============================================================================

/// Runtime settings for a [`crate::store::Store`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root of the flat-file database
    pub data_dir: PathBuf,

    /// Buckets per hash table (customers, sales, admins)
    pub bucket_count: usize,

    /// Insert the two starter products when product "1" is missing
    pub seed_defaults: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("wearhouse"),
            bucket_count: DEFAULT_BUCKET_COUNT,
            seed_defaults: true,
        }
    }
}

impl StoreConfig {
    /// Config rooted at `data_dir`, defaults otherwise
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Load configuration: defaults, then file, then environment.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(config_path: Option<&Path>) -> StoreResult<Self> {
        let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            info!(?path, "Loading store config from file");
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml_str(&contents)?
        } else {
            debug!(?path, "Config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML document; absent keys take their defaults
    pub fn from_toml_str(contents: &str) -> StoreResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.bucket_count == 0 {
            return Err(StoreError::Config("bucket_count must be at least 1".to_string()));
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(StoreError::Config("data_dir cannot be empty".to_string()));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("FAMIN_DATA_DIR") {
            debug!(data_dir = %dir, "Overriding data dir from environment");
            self.data_dir = PathBuf::from(dir);
        }

        if let Ok(count) = std::env::var("FAMIN_BUCKET_COUNT") {
            match count.parse::<usize>() {
                Ok(n) => self.bucket_count = n,
                Err(_) => warn!(value = %count, "Ignoring non-numeric FAMIN_BUCKET_COUNT"),
            }
        }
    }

    // ========================================================================
    // Paths
    // ========================================================================

    #[inline]
    pub fn database_dir(&self) -> PathBuf {
        self.data_dir.join(DATABASE_DIR)
    }

    #[inline]
    pub fn file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    #[inline]
    pub fn shipments_path(&self) -> PathBuf {
        self.database_dir().join(SHIPMENTS_FILE)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
