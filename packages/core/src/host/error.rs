//! Host-specific error types
//!
//! Errors that can occur while configuring pod membership and SSH trust.

use thiserror::Error;

use crate::block::BlockError;

/// Errors that can occur during host operations
#[derive(Error, Debug)]
pub enum HostError {
    /// The address list was empty
    #[error("No addresses given. Enter at least one host address.")]
    EmptyAddressList,

    /// A token did not parse as an IPv4 address
    #[error("'{0}' is not a valid IPv4 address")]
    InvalidAddress(String),

    /// A parsed address is outside the private ranges
    #[error("{0} is not a private IPv4 address (expected 10.0.0.0/8, 172.16.0.0/12 or 192.168.0.0/16)")]
    NotPrivate(String),

    /// The pod membership file does not exist yet
    #[error("Pod is not configured: {0} not found. Run the pod setup first.")]
    NotConfigured(String),

    /// Failed to read the pod membership file
    #[error("Failed to load pod addresses: {0}")]
    LoadFailed(String),

    /// Failed to write the pod membership file
    #[error("Failed to save pod addresses: {0}")]
    SaveFailed(String),

    /// Failed to prepare the SSH directory or config
    #[error("Failed to write SSH config: {0}")]
    SshConfigWrite(String),

    /// ssh-keygen failed or could not be started
    #[error("Failed to generate SSH key: {0}")]
    KeyGen(String),

    /// Failed to read a key or authorized_keys file
    #[error("Failed to read SSH key: {0}")]
    KeyRead(String),

    /// Failed to delete a key file
    #[error("Failed to remove SSH key: {0}")]
    KeyRemove(String),

    /// Editing the SSH config block failed
    #[error(transparent)]
    Block(#[from] BlockError),
}
