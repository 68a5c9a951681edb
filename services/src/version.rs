//! Build information stamped by `build.rs`.
//!
//! Version display format:
//! - Prod: `stable:{version}`
//! - Local/Test: `main:{commit}`

use crate::config::Env;

pub fn build_date() -> &'static str {
    env!("BUILD_DATE")
}

pub fn build_commit() -> &'static str {
    env!("BUILD_COMMIT")
}

pub fn build_branch() -> &'static str {
    env!("BUILD_BRANCH")
}

pub fn build_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Version string reported in the `x-service-version` header.
pub fn format_version_for_env(env: &Env) -> String {
    match env {
        Env::Prod => format!("stable:{}", build_version()),
        Env::Local | Env::Test => format!("main:{}", build_commit()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_not_empty() {
        assert!(!build_date().is_empty());
        assert!(!build_commit().is_empty());
        assert!(!build_branch().is_empty());
    }

    #[test]
    fn test_format_version_for_env() {
        assert_eq!(
            format_version_for_env(&Env::Prod),
            format!("stable:{}", env!("CARGO_PKG_VERSION"))
        );
        assert!(format_version_for_env(&Env::Local).starts_with("main:"));
        assert!(format_version_for_env(&Env::Test).starts_with("main:"));
    }
}
