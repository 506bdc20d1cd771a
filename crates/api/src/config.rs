//! Runtime configuration from environment variables.
//!
//! | variable                   | default        |
//! |----------------------------|----------------|
//! | `STOCKTAKE_BIND_ADDR`      | `0.0.0.0:8080` |
//! | `STOCKTAKE_DATA_DIR`       | unset: in-memory storage |
//! | `STOCKTAKE_ADMIN_PASSWORD` | `admin`        |

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("STOCKTAKE_BIND_ADDR is not a socket address: {0}")]
    InvalidBindAddr(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Directory for JSON documents. `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    /// Password for the seeded `admin` account (first start only).
    pub admin_password: String,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup("STOCKTAKE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(raw_addr.clone()))?;

        let data_dir = lookup("STOCKTAKE_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let admin_password = match lookup("STOCKTAKE_ADMIN_PASSWORD").filter(|p| !p.is_empty()) {
            Some(password) => password,
            None => {
                tracing::warn!("STOCKTAKE_ADMIN_PASSWORD not set; using insecure default for the admin account");
                DEFAULT_ADMIN_PASSWORD.to_string()
            }
        };

        Ok(Self {
            bind_addr,
            data_dir,
            admin_password,
        })
    }

    /// In-memory configuration for tests.
    pub fn in_memory(admin_password: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            data_dir: None,
            admin_password: admin_password.into(),
        }
    }
}
