//! Build information captured at compile time.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short git commit hash, or `unknown` outside a checkout.
pub const BUILD_HASH: &str = env!("CLEARPLATE_BUILD_HASH");

/// Whether the working tree had uncommitted changes.
pub const BUILD_DIRTY: bool = matches!(env!("CLEARPLATE_BUILD_DIRTY").as_bytes(), b"true");

/// `0.1.0 (abc1234)`, with a trailing `*` on the hash for dirty builds.
#[must_use]
pub fn version_string() -> String {
    let marker = if BUILD_DIRTY { "*" } else { "" };
    format!("{VERSION} ({BUILD_HASH}{marker})")
}
