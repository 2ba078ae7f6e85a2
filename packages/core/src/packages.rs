//! Package installation command lists
//!
//! The same lists run on a single host or across the pod.

/// Refresh and upgrade apt packages
pub const UPDATE_APT_COMMANDS: &[&str] = &[
    "sudo apt-get update -y -qq",
    "sudo apt-get upgrade -y -qq",
];

/// Base tooling and Python 3.12 from the deadsnakes PPA
pub const INSTALL_PACKAGES_COMMANDS: &[&str] = &[
    "sudo apt-get install -y -qq golang neofetch zsh byobu",
    "sudo apt-get install -y -qq software-properties-common",
    "sudo add-apt-repository -y ppa:deadsnakes/ppa",
    "sudo apt-get install -y -qq python3.12-full python3.12-dev",
];

/// Unattended oh-my-zsh install and zsh as login shell
pub const INSTALL_OH_MY_ZSH_COMMANDS: &[&str] = &[
    r#"sh -c "$(curl -fsSL https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh)" "" --unattended"#,
    "sudo chsh $USER -s /usr/bin/zsh",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apt_commands_never_prompt() {
        for command in UPDATE_APT_COMMANDS.iter().chain(INSTALL_PACKAGES_COMMANDS) {
            if command.contains("apt") {
                assert!(command.contains(" -y"), "{command} would prompt");
            }
        }
    }

    #[test]
    fn oh_my_zsh_install_is_unattended() {
        assert!(INSTALL_OH_MY_ZSH_COMMANDS[0].ends_with("--unattended"));
    }
}
