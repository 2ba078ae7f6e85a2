//! Pod summary display
//!
//! Shows what the pod setup is about to configure.

use std::net::Ipv4Addr;

use comfy_table::{Cell, Table};
use console::style;
use tpux_core::config::get_pod_hosts_path;
use tpux_core::host::format_addresses;

/// Display the pod layout once the addresses are known
pub fn display_pod_summary(current_host: Ipv4Addr, other_hosts: &[Ipv4Addr], share_dir: &str) {
    println!();
    println!("{}", style("Pod Summary").bold());
    println!("{}", style("-".repeat(11)).dim());

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::NOTHING);

    table.add_row(vec![
        Cell::new("This host:"),
        Cell::new(format!("{current_host} (NFS server)")),
    ]);
    table.add_row(vec![
        Cell::new("Other hosts:"),
        Cell::new(format_addresses(other_hosts)),
    ]);
    table.add_row(vec![Cell::new("Host count:"), Cell::new(other_hosts.len() + 1)]);
    table.add_row(vec![Cell::new("Shared dir:"), Cell::new(share_dir)]);

    println!("{table}");

    if let Some(path) = get_pod_hosts_path() {
        println!();
        println!("Pod addresses saved to: {}", style(path.display()).dim());
    }
    println!();
}
