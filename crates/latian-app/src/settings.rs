//! Startup settings handed to registry factories.

use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use crate::AppError;

/// Resolved startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Transport registry key.
    pub io: String,
    /// Runtime mode registry key.
    pub runtime: String,
    /// Storage backend registry key.
    pub storage: String,
    /// Directory of per-user storage files.
    pub storage_dest: PathBuf,
    /// User of single-session mode.
    pub user: String,
    /// Network bind address.
    pub bind: String,
    /// Network port.
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            io: "std".to_string(),
            runtime: "simple".to_string(),
            storage: "file".to_string(),
            storage_dest: PathBuf::from("."),
            user: "default".to_string(),
            bind: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Settings {
    /// Socket address to listen on.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        let ip: IpAddr = self
            .bind
            .parse()
            .map_err(|_| AppError::Transport(format!("invalid bind address: {}", self.bind)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
