use std::fmt;

/// Reads a `CARDCYCLE_BUILD_*` variable set by `build.rs`.
macro_rules! build_env {
    ($key:literal) => {
        match option_env!(concat!("CARDCYCLE_BUILD_", $key)) {
            Some(value) => value,
            None => "unknown",
        }
    };
}

/// Where and how this binary was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    /// `clean`, `dirty` or `unknown`.
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

const EMBEDDED: BuildMetadata = BuildMetadata {
    version: env!("CARGO_PKG_VERSION"),
    git_hash: build_env!("HASH"),
    git_status: build_env!("STATUS"),
    timestamp: build_env!("TIMESTAMP"),
    target: build_env!("TARGET"),
    profile: build_env!("PROFILE"),
    rustc: build_env!("RUSTC"),
};

impl BuildMetadata {
    /// One-line summary, e.g. `cardcycle 0.1.0 (abc1234, clean)`.
    pub fn summary(&self) -> String {
        self.to_string()
    }

    pub fn is_dirty(&self) -> bool {
        self.git_status == "dirty"
    }
}

impl fmt::Display for BuildMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cardcycle {} ({}, {})",
            self.version, self.git_hash, self.git_status
        )
    }
}

pub fn current() -> BuildMetadata {
    EMBEDDED
}
