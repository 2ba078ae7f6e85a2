//! Setup flows
//!
//! Single host: prechecks, packages, oh-my-zsh, PATH.
//! Pod: prechecks, pod addresses, SSH trust, packages on every host, NFS
//! share, PATH.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use console::style;
use tpux_core::host::{
    generate_key_pair, get_authorized_keys_path, get_private_key_path, get_ssh_config_path,
    insert_ssh_config, with_localhost,
};
use tpux_core::packages::{
    INSTALL_OH_MY_ZSH_COMMANDS, INSTALL_PACKAGES_COMMANDS, UPDATE_APT_COMMANDS,
};
use tpux_core::preflight::{DEVICE_DIR, check_not_root, check_tpu_present, detect_private_ipv4};
use tpux_core::shell::{PATH_EXPORT_LINE, find_user_shell_rc, insert_path_block};
use tpux_core::{
    CommandEnv, Config, LocalExecutor, PodExecutor, config, load_pod_hosts, nfs, save_pod_hosts,
};

use crate::output::{self, CommandSpinner};
use crate::wizard::{
    self, YesNo, display_pod_summary, prompt_pod_addresses, wait_for_key_propagation,
};

const OH_MY_ZSH_PROMPT: &str = "Do you want to install oh my zsh?";

/// Answers collected from flags
#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    pub install_zsh: Option<YesNo>,
    pub add_path: Option<YesNo>,
    pub priv_ipv4_addrs: Option<String>,
    pub quiet: bool,
}

fn command_env(config: &Config) -> CommandEnv {
    CommandEnv::new(config.command_env.clone())
}

/// Refuse to run as root or on a machine without TPU chips
fn run_prechecks() -> Result<()> {
    check_not_root()?;
    let chips = check_tpu_present(Path::new(DEVICE_DIR))?;
    tracing::info!("Prechecks passed, {chips} TPU devices present");
    Ok(())
}

/// Run `commands` locally under a step header
fn local_step<S: AsRef<str>>(
    local: &LocalExecutor,
    label: &str,
    commands: &[S],
    quiet: bool,
) -> Result<()> {
    output::step(label, quiet);
    local
        .run_all(commands)
        .with_context(|| format!("{label} failed"))
}

/// Run `commands` on every host of `pod` behind a spinner
async fn fan_out<S: AsRef<str>>(
    pod: &PodExecutor,
    label: &str,
    done: &str,
    commands: &[S],
    quiet: bool,
) -> Result<()> {
    let spinner =
        CommandSpinner::new_maybe(&format!("{label} on {} hosts", pod.hosts().len()), quiet);

    for (index, command) in commands.iter().enumerate() {
        let command = command.as_ref();
        spinner.command(index + 1, commands.len(), command);
        if let Err(e) = pod.run(command).await {
            spinner.fail(&format!("{label} failed"));
            return Err(e).with_context(|| format!("{label} failed"));
        }
    }

    spinner.success(done);
    Ok(())
}

/// Offer to put ~/.local/bin on PATH in the user's shell rc
fn configure_shell_path(options: &SetupOptions) -> Result<()> {
    let rc_file = find_user_shell_rc()?;

    let prompt = format!(
        "Do you want to add the `{PATH_EXPORT_LINE}` to {}?",
        rc_file.display()
    );
    if !wizard::prompt_yes_no(&prompt, options.add_path, Some(true))? {
        output::skipped("Left PATH unchanged", options.quiet);
        return Ok(());
    }

    if insert_path_block(&rc_file)? {
        output::done(
            &format!("Added ~/.local/bin to PATH in {}", rc_file.display()),
            options.quiet,
        );
    } else {
        output::done(
            &format!("PATH already configured in {}", rc_file.display()),
            options.quiet,
        );
    }
    Ok(())
}

fn print_finished(quiet: bool) {
    if !quiet {
        println!();
        println!("{}", style("Setup complete.").green().bold());
        println!("Open a new shell to pick up the changes.");
    }
}

/// Set up a single TPU VM
pub fn cmd_setup_single_host(options: &SetupOptions, config: &Config) -> Result<()> {
    run_prechecks()?;

    let local = LocalExecutor::new(command_env(config));

    local_step(&local, "Updating apt packages", UPDATE_APT_COMMANDS, options.quiet)?;
    local_step(&local, "Installing packages", INSTALL_PACKAGES_COMMANDS, options.quiet)?;

    if wizard::prompt_yes_no(OH_MY_ZSH_PROMPT, options.install_zsh, Some(true))? {
        local_step(&local, "Installing oh my zsh", INSTALL_OH_MY_ZSH_COMMANDS, options.quiet)?;
    } else {
        output::skipped("Skipped oh my zsh", options.quiet);
    }

    configure_shell_path(options)?;

    print_finished(options.quiet);
    Ok(())
}

/// Set up every host of a TPU Pod from this host
///
/// This host becomes the NFS server; the others mount its share.
pub async fn cmd_setup_pod(options: &SetupOptions, config: &Config) -> Result<()> {
    let quiet = options.quiet;
    run_prechecks()?;

    // Pod membership
    let current_host = detect_private_ipv4(&config.interface_prefix)?;
    tracing::info!("This host's private address: {current_host}");

    let other_hosts = prompt_pod_addresses(options.priv_ipv4_addrs.as_deref(), current_host)?;

    let ssh_config_path =
        get_ssh_config_path().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    insert_ssh_config(&ssh_config_path, &other_hosts)?;

    let pod_hosts_path = config::get_pod_hosts_path()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?;
    save_pod_hosts(&pod_hosts_path, &other_hosts)?;

    if !quiet {
        display_pod_summary(current_host, &other_hosts, &config.nfs_share_dir);
    }

    // SSH trust
    let private_key =
        get_private_key_path().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    let authorized_keys =
        get_authorized_keys_path().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    let public_key = generate_key_pair(&private_key)?;
    wait_for_key_propagation(&public_key, &authorized_keys)?;

    // Every fan-out reads the membership file
    let hosts = load_pod_hosts(&pod_hosts_path)?;
    let env = command_env(config);
    let all_hosts = PodExecutor::new(with_localhost(&hosts), env.clone())?;
    let remote_hosts = PodExecutor::new(hosts.clone(), env.clone())?;
    let local = LocalExecutor::new(env);

    fan_out(
        &all_hosts,
        "Updating apt packages",
        "Updated apt packages",
        UPDATE_APT_COMMANDS,
        quiet,
    )
    .await?;
    fan_out(
        &all_hosts,
        "Installing packages",
        "Installed packages",
        INSTALL_PACKAGES_COMMANDS,
        quiet,
    )
    .await?;

    if wizard::prompt_yes_no(OH_MY_ZSH_PROMPT, options.install_zsh, Some(true))? {
        fan_out(
            &all_hosts,
            "Installing oh my zsh",
            "Installed oh my zsh",
            INSTALL_OH_MY_ZSH_COMMANDS,
            quiet,
        )
        .await?;
    } else {
        output::skipped("Skipped oh my zsh", quiet);
    }

    // NFS share served from this host
    let share_dir = config.nfs_share_dir.as_str();
    fan_out(
        &remote_hosts,
        "Installing NFS client",
        "Installed NFS client",
        &nfs::client_install_commands(),
        quiet,
    )
    .await?;
    local_step(
        &local,
        "Setting up NFS server",
        &nfs::server_setup_commands(share_dir),
        quiet,
    )?;
    nfs::insert_exports(&nfs::exports_file(), share_dir, &hosts)?;
    local_step(
        &local,
        "Reloading NFS exports",
        &nfs::server_reload_commands(),
        quiet,
    )?;
    fan_out(
        &remote_hosts,
        "Mounting shared directory",
        &format!("Mounted {current_host}:{share_dir}"),
        &nfs::client_mount_commands(current_host, share_dir),
        quiet,
    )
    .await?;
    fan_out(
        &all_hosts,
        "Linking shared directory",
        "Linked shared directory into home",
        &[nfs::home_link_command(share_dir)],
        quiet,
    )
    .await?;

    configure_shell_path(options)?;

    print_finished(quiet);
    Ok(())
}
