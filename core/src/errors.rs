//! Unified error types for the netvitals core crate.
//!
//! Extraction itself never fails — output that matches no known pattern
//! degrades to the `"unknown"` sentinel per field. These types cover the
//! fallible edges around the extraction core: loading the device
//! inventory and talking to devices over the transport.

use thiserror::Error;

/// Top-level error type encompassing all core error categories.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An inventory-related error.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// A device-collection error.
    #[error("Collect error: {0}")]
    Collect(#[from] CollectError),

    /// A low-level I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for errors that don't fit other categories.
    #[error("{0}")]
    Other(String),
}

/// Errors related to loading and filtering the device inventory.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// The inventory file does not exist.
    #[error("Inventory file not found: {0}")]
    NotFound(String),

    /// The inventory file could not be parsed.
    #[error("Inventory parse error: {0}")]
    Parse(String),

    /// The inventory contains no devices, possibly after filtering.
    #[error("Inventory is empty")]
    Empty,

    /// A low-level I/O error while reading the inventory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to connecting to a device and running commands on it.
#[derive(Error, Debug)]
pub enum CollectError {
    /// The transport connection to the device could not be established.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The device rejected the supplied credentials.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// The configured authentication method is not supported.
    #[error("Unknown auth method: {0}")]
    UnknownAuthMethod(String),

    /// A command could not be executed or its output could not be read.
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// A low-level I/O error during collection.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
