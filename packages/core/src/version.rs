//! Version information for tpux

/// Get the current version string
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the long version string with build information
///
/// Appends the git commit and build date when the build exported them
/// through `TPUX_GIT_HASH` / `TPUX_BUILD_DATE`.
pub fn get_version_long() -> String {
    let version = get_version();
    let git_hash = option_env!("TPUX_GIT_HASH").unwrap_or("unknown");
    let build_date = option_env!("TPUX_BUILD_DATE").unwrap_or("unknown");

    format!("{version} (git: {git_hash}, built: {build_date})")
}
