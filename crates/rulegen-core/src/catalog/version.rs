//! Version comparison for CLI and catalog compatibility

use semver::Version;

/// Compare the running CLI version against the version a catalog declares.
/// Returns a warning message if the CLI is older than the catalog expects
pub fn check_compatibility(
    cli_version: &str,
    catalog_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    let cli_ver = parse_version(cli_version)?;
    let catalog_ver = parse_version(catalog_version)?;

    if cli_ver < catalog_ver {
        Some(format!(
            "This catalog was written for rulegen {} or newer.\n\
             You are running version {}.\n\
             Consider updating: {}",
            catalog_version, cli_version, upgrade_command
        ))
    } else {
        None
    }
}

/// Parse a version string, accepting a leading 'v'. Unparseable versions yield `None`
fn parse_version(version_str: &str) -> Option<Version> {
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).ok()
}
