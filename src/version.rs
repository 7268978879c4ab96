//! Version information with embedded git metadata.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git branch at build time, or "unknown" if unavailable.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

/// Git commit SHA at build time, or "unknown" if unavailable.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

/// Whether the working tree was dirty at build time.
pub fn git_dirty() -> bool {
    option_env!("VERGEN_GIT_DIRTY") == Some("true")
}

/// Full version string: `{version}+{branch}.{sha}` or `{version}+{branch}.{sha}.dirty`.
///
/// Examples:
/// - `0.1.0+main.abc1234`
/// - `0.1.0+offline-cache.abc1234.dirty`
pub fn version_string() -> String {
    let dirty_suffix = if git_dirty() { ".dirty" } else { "" };
    let short_sha: String = GIT_SHA.chars().take(7).collect();
    format!("{PKG_VERSION}+{GIT_BRANCH}.{short_sha}{dirty_suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_contains_pkg_version() {
        let version = version_string();
        assert!(
            version.starts_with(PKG_VERSION),
            "version should start with pkg version"
        );
    }

    #[test]
    fn version_string_contains_branch() {
        let version = version_string();
        assert!(
            version.contains(GIT_BRANCH),
            "version should contain branch name"
        );
    }

    #[test]
    fn short_sha_is_at_most_seven_chars() {
        let version = version_string();
        let build_meta = version.split('+').nth(1).unwrap();
        let sha = build_meta
            .trim_end_matches(".dirty")
            .rsplit('.')
            .next()
            .unwrap();
        assert!(sha.chars().count() <= 7);
    }
}
