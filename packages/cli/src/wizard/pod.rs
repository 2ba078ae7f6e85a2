//! Pod address prompt

use std::net::Ipv4Addr;

use anyhow::{Result, anyhow};
use console::style;
use dialoguer::Input;
use tpux_core::parse_pod_addresses;

use super::handle_interrupt;

const ADDRESS_PROMPT: &str =
    "Input the private (internal) IPv4 address of the other hosts, comma separated";

const INVALID_ADDRESSES: &str =
    "Please input a list of valid private IPv4 addresses (comma-separated).";

fn address_note(current_host: Ipv4Addr) -> String {
    format!(
        "To find the IPv4 addresses,\n\
        1. Open https://console.cloud.google.com/compute/tpus\n\
        2. Click on the node name of the TPU pod you're using in the current project\n\
        3. In the details, find the Internal IP addresses\n\
        4. Do NOT include the IP address of the current host: {current_host}"
    )
}

/// Parse the other hosts' addresses, rejecting the current host
fn validate_addresses(input: &str, current_host: Ipv4Addr) -> Result<Vec<Ipv4Addr>, String> {
    let addrs = parse_pod_addresses(input).map_err(|e| {
        tracing::debug!("Rejected address list '{input}': {e}");
        INVALID_ADDRESSES.to_string()
    })?;

    if addrs.contains(&current_host) {
        return Err(format!(
            "Do not include the address of the current host ({current_host})."
        ));
    }

    Ok(addrs)
}

/// Collect the private addresses of the other pod hosts
///
/// A value from `-i` is used as is and is fatal when invalid; otherwise the
/// prompt repeats until the input is valid.
pub fn prompt_pod_addresses(flag: Option<&str>, current_host: Ipv4Addr) -> Result<Vec<Ipv4Addr>> {
    if let Some(value) = flag {
        return validate_addresses(value, current_host)
            .map_err(|reason| anyhow!("Invalid --priv-ipv4-addrs value '{value}'. {reason}"));
    }

    println!("{}", style(address_note(current_host)).yellow());

    let input: String = Input::new()
        .with_prompt(ADDRESS_PROMPT)
        .validate_with(|input: &String| validate_addresses(input, current_host).map(|_| ()))
        .interact_text()
        .map_err(|_| handle_interrupt())?;

    validate_addresses(&input, current_host).map_err(|reason| anyhow!(reason))
}
