//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigPort`] and [`RosterPort`].
//!
//! | Key      | Format         | Content                         |
//! |----------|----------------|---------------------------------|
//! | `termcfg`| postcard blob  | [`TerminalConfig`]              |
//! | `roster` | UTF-8 JSON     | `[{"id": "...", "name": "..."}]`|
//!
//! Both live in the `rollcall` namespace.  On ESP-IDF this is the default
//! NVS partition (commits are atomic); on the host an in-memory map.
//! Everything is validated before it is written.

use std::cell::RefCell;

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort, RosterPort};
use crate::config::TerminalConfig;
use crate::registry::Registry;

#[cfg(not(feature = "espidf"))]
use std::collections::HashMap;

#[cfg(feature = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};

const NAMESPACE: &str = "rollcall";
const CONFIG_KEY: &str = "termcfg";
const ROSTER_KEY: &str = "roster";

/// Largest blob accepted on read.
const MAX_BLOB_SIZE: usize = 4000;

pub struct NvsAdapter {
    #[cfg(not(feature = "espidf"))]
    store: RefCell<HashMap<&'static str, Vec<u8>>>,
    #[cfg(feature = "espidf")]
    nvs: RefCell<EspNvs<NvsDefault>>,
}

#[cfg(not(feature = "espidf"))]
impl Default for NvsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl NvsAdapter {
    /// Simulation backend: empty in-memory store.
    #[cfg(not(feature = "espidf"))]
    pub fn new() -> Self {
        info!("NvsAdapter: simulation backend");
        Self {
            store: RefCell::new(HashMap::new()),
        }
    }

    /// Open the `rollcall` namespace read-write on the default partition.
    #[cfg(feature = "espidf")]
    pub fn new(partition: EspDefaultNvsPartition) -> Result<Self, ConfigError> {
        let nvs = EspNvs::new(partition, NAMESPACE, true).map_err(|e| {
            warn!("NvsAdapter: cannot open namespace '{}': {}", NAMESPACE, e);
            ConfigError::IoError
        })?;
        info!("NvsAdapter: ESP-IDF NVS namespace '{}' open", NAMESPACE);
        Ok(Self {
            nvs: RefCell::new(nvs),
        })
    }

    /// Validate a roster and persist it.  The stored roster is only
    /// replaced if every entry is accepted.
    pub fn save_roster_json(&self, json: &str) -> Result<usize, ConfigError> {
        let registry = Registry::from_json(json)?;
        self.write_blob(ROSTER_KEY, json.as_bytes())?;
        info!("NvsAdapter: roster saved ({} identities)", registry.len());
        Ok(registry.len())
    }

    // ── Blob access ───────────────────────────────────────────

    #[cfg(not(feature = "espidf"))]
    fn read_blob(&self, key: &'static str) -> Result<Option<Vec<u8>>, ConfigError> {
        Ok(self.store.borrow().get(key).cloned())
    }

    #[cfg(not(feature = "espidf"))]
    fn write_blob(&self, key: &'static str, bytes: &[u8]) -> Result<(), ConfigError> {
        self.store.borrow_mut().insert(key, bytes.to_vec());
        Ok(())
    }

    #[cfg(feature = "espidf")]
    fn read_blob(&self, key: &'static str) -> Result<Option<Vec<u8>>, ConfigError> {
        let nvs = self.nvs.borrow();
        let len = nvs.blob_len(key).map_err(|e| {
            warn!("NvsAdapter: '{}' length query failed: {}", key, e);
            ConfigError::IoError
        })?;
        let Some(len) = len else {
            return Ok(None);
        };
        if len > MAX_BLOB_SIZE {
            return Err(ConfigError::Corrupted);
        }
        let mut buf = vec![0u8; len];
        let blob = nvs.get_blob(key, &mut buf).map_err(|e| {
            warn!("NvsAdapter: '{}' read failed: {}", key, e);
            ConfigError::IoError
        })?;
        Ok(blob.map(<[u8]>::to_vec))
    }

    #[cfg(feature = "espidf")]
    fn write_blob(&self, key: &'static str, bytes: &[u8]) -> Result<(), ConfigError> {
        self.nvs.borrow_mut().set_blob(key, bytes).map_err(|e| {
            warn!("NvsAdapter: '{}' write failed: {}", key, e);
            ConfigError::IoError
        })
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<TerminalConfig, ConfigError> {
        let Some(bytes) = self.read_blob(CONFIG_KEY)? else {
            info!("NvsAdapter: no stored config, using defaults");
            return Ok(TerminalConfig::default());
        };
        if bytes.len() > MAX_BLOB_SIZE {
            return Err(ConfigError::Corrupted);
        }
        let cfg: TerminalConfig =
            postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        info!("NvsAdapter: loaded config ({} bytes)", bytes.len());
        Ok(cfg)
    }

    fn save(&self, config: &TerminalConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        self.write_blob(CONFIG_KEY, &bytes)?;
        info!("NvsAdapter: config saved ({} bytes)", bytes.len());
        Ok(())
    }
}

impl RosterPort for NvsAdapter {
    fn load_roster(&self) -> Result<Registry, ConfigError> {
        let Some(bytes) = self.read_blob(ROSTER_KEY)? else {
            warn!("NvsAdapter: no roster stored, every card will be rejected");
            return Ok(Registry::empty());
        };
        let json = core::str::from_utf8(&bytes).map_err(|_| ConfigError::Corrupted)?;
        let registry = Registry::from_json(json)?;
        info!("NvsAdapter: roster loaded ({} identities)", registry.len());
        Ok(registry)
    }
}
