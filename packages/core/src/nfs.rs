//! NFS share for the pod
//!
//! The host tpux runs on exports one directory to every pod member; the
//! members mount it at the same path. The export list lives in a tpux
//! block inside /etc/exports, written through `sudo cp`.

use std::net::Ipv4Addr;

use crate::block::{BlockError, BlockFile};

/// System exports file
pub const EXPORTS_PATH: &str = "/etc/exports";

/// Options granted to each pod member
pub const EXPORT_OPTIONS: &str = "rw,sync,no_subtree_check";

/// The exports file, edited with privileged copies
pub fn exports_file() -> BlockFile {
    BlockFile::privileged(EXPORTS_PATH)
}

/// Build the exports block body: one line per host
pub fn render_exports_body(share_dir: &str, hosts: &[Ipv4Addr]) -> String {
    hosts
        .iter()
        .map(|host| format!("{share_dir} {host}({EXPORT_OPTIONS})"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the export entries for `hosts` into `exports`
pub fn insert_exports(
    exports: &BlockFile,
    share_dir: &str,
    hosts: &[Ipv4Addr],
) -> Result<bool, BlockError> {
    exports.insert(&render_exports_body(share_dir, hosts))
}

/// Remove the tpux export entries from `exports`
pub fn clear_exports(exports: &BlockFile) -> Result<bool, BlockError> {
    exports.clear()
}

/// Client package, installed on the other pod members
pub fn client_install_commands() -> Vec<String> {
    vec!["sudo apt-get install -y -qq nfs-common".to_string()]
}

/// Server package and share directory, on the exporting host
pub fn server_setup_commands(share_dir: &str) -> Vec<String> {
    vec![
        "sudo apt-get install -y -qq nfs-kernel-server".to_string(),
        format!("sudo mkdir -p {share_dir}"),
        format!("sudo chown -R nobody:nogroup {share_dir}"),
        format!("sudo chmod 777 {share_dir}"),
    ]
}

/// Re-read /etc/exports and restart the server
pub fn server_reload_commands() -> Vec<String> {
    vec![
        "sudo exportfs -ra".to_string(),
        "sudo systemctl restart nfs-kernel-server".to_string(),
    ]
}

/// Mount the share from `server` on a pod member
pub fn client_mount_commands(server: Ipv4Addr, share_dir: &str) -> Vec<String> {
    vec![
        format!("sudo mkdir -p {share_dir}"),
        format!("sudo mount {server}:{share_dir} {share_dir}"),
    ]
}

/// Link the share into the home directory
pub fn home_link_command(share_dir: &str) -> String {
    let name = share_dir.trim_end_matches('/').rsplit('/').next().unwrap_or(share_dir);
    format!("ln -sfn {share_dir} ~/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BLOCK_END, BLOCK_START};
    use crate::host::load_pod_hosts;
    use std::fs;

    #[test]
    fn test_render_exports_body() {
        let body = render_exports_body(
            "/nfs_share",
            &[Ipv4Addr::new(10, 0, 0, 2), Ipv4Addr::new(10, 0, 0, 3)],
        );
        assert_eq!(
            body,
            "/nfs_share 10.0.0.2(rw,sync,no_subtree_check)\n/nfs_share 10.0.0.3(rw,sync,no_subtree_check)"
        );
    }

    #[test]
    fn test_exports_block_from_pod_file() {
        let dir = tempfile::tempdir().unwrap();
        let pod_file = dir.path().join("podips.txt");
        fs::write(&pod_file, "10.0.0.2\n10.0.0.3\n").unwrap();
        let exports_path = dir.path().join("exports");
        fs::write(&exports_path, "# /srv/homes hostname1(rw,sync)\n").unwrap();

        let hosts = load_pod_hosts(&pod_file).unwrap();
        let exports = BlockFile::direct(&exports_path);
        insert_exports(&exports, "/nfs_share", &hosts).unwrap();

        let content = fs::read_to_string(&exports_path).unwrap();
        let export_lines: Vec<&str> = content
            .lines()
            .filter(|line| line.ends_with("(rw,sync,no_subtree_check)"))
            .collect();
        assert_eq!(
            export_lines,
            vec![
                "/nfs_share 10.0.0.2(rw,sync,no_subtree_check)",
                "/nfs_share 10.0.0.3(rw,sync,no_subtree_check)",
            ]
        );
        assert!(content.starts_with("# /srv/homes hostname1(rw,sync)\n\n"));
        assert!(content.contains(BLOCK_START) && content.contains(BLOCK_END));
    }

    #[test]
    fn test_clear_exports_keeps_other_entries() {
        let dir = tempfile::tempdir().unwrap();
        let exports_path = dir.path().join("exports");
        let original = "/srv 192.168.0.0/24(ro)\n";
        fs::write(&exports_path, original).unwrap();
        let exports = BlockFile::direct(&exports_path);

        insert_exports(&exports, "/nfs_share", &[Ipv4Addr::new(10, 0, 0, 2)]).unwrap();
        assert!(clear_exports(&exports).unwrap());
        assert_eq!(fs::read_to_string(&exports_path).unwrap(), original);
    }

    #[test]
    fn test_client_mount_commands() {
        let commands = client_mount_commands(Ipv4Addr::new(10, 0, 0, 1), "/nfs_share");
        assert_eq!(commands[1], "sudo mount 10.0.0.1:/nfs_share /nfs_share");
    }

    #[test]
    fn test_home_link_command() {
        assert_eq!(home_link_command("/nfs_share"), "ln -sfn /nfs_share ~/nfs_share");
        assert_eq!(home_link_command("/mnt/pod/"), "ln -sfn /mnt/pod/ ~/pod");
    }

    #[test]
    fn test_exports_file_targets_etc_exports() {
        assert_eq!(exports_file().path(), std::path::Path::new("/etc/exports"));
    }
}
