//! Build metadata generated by the build script

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Version of the store key layout, bumped whenever key derivation changes
pub fn key_schema_version() -> u32 {
    KEY_SCHEMA_VERSION.parse().unwrap_or(20261017)
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// Multi-line version text for `--version`
pub fn long_version() -> String {
    format!(
        "{}\nkey schema: {}\nbuilt: {}\ncommit: {}",
        env!("CARGO_PKG_VERSION"),
        key_schema_version(),
        build_time(),
        git_hash()
    )
}
