//! Pod host management
//!
//! Provides functionality for the hosts of a TPU pod:
//! - Parsing and validating member addresses
//! - Pod membership storage (podips.txt)
//! - SSH client config block and the dedicated pod key pair

mod address;
mod error;
mod keys;
mod ssh_config;
mod storage;

// Public exports
pub use address::{LOCALHOST, format_addresses, parse_pod_addresses, parse_private_ipv4, with_localhost};
pub use error::HostError;
pub use keys::{
    KEY_FILE_NAME, generate_key_pair, get_authorized_keys_path, get_private_key_path,
    is_key_authorized, public_key_path, read_public_key, remove_key_pair,
};
pub use ssh_config::{
    clear_ssh_config, ensure_ssh_dir, get_ssh_config_path, get_ssh_dir, insert_ssh_config,
    render_ssh_block,
};
pub use storage::{load_pod_hosts, remove_pod_hosts, save_pod_hosts};
