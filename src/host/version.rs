//! Application version providers.
//!
//! The version gate compares a single identifier string. `AppVersion`
//! renders either the release alone or `release (build)`, depending on
//! `version.include_build`.

use std::env;

use serde::{Deserialize, Serialize};

use crate::host::VersionProvider;

/// Environment variable holding the release version for `EnvVersion`.
pub const APP_VERSION_ENV: &str = "RATEGATE_APP_VERSION";

/// Environment variable holding the build number for `EnvVersion`.
pub const APP_BUILD_ENV: &str = "RATEGATE_APP_BUILD";

/// A running application version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppVersion {
    /// Marketing/release version, e.g. `2.4.1`.
    pub release: String,
    /// Build number, if the platform exposes one.
    pub build: Option<String>,
}

impl AppVersion {
    /// Create a version without a build number.
    pub fn new(release: impl Into<String>) -> Self {
        Self {
            release: release.into(),
            build: None,
        }
    }

    /// Attach a build number.
    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = Some(build.into());
        self
    }

    /// Identifier compared by the version gate and stored on ask.
    pub fn identifier(&self, include_build: bool) -> String {
        match (&self.build, include_build) {
            (Some(build), true) => format!("{} ({})", self.release, build),
            _ => self.release.clone(),
        }
    }
}

/// A fixed version, known at construction time.
#[derive(Debug, Clone, Default)]
pub struct StaticVersion {
    version: Option<AppVersion>,
}

impl StaticVersion {
    /// Provide `version` on every call.
    pub fn new(version: AppVersion) -> Self {
        Self {
            version: Some(version),
        }
    }

    /// A provider that never resolves a version.
    pub fn unknown() -> Self {
        Self { version: None }
    }
}

impl VersionProvider for StaticVersion {
    fn current_version(&self) -> Option<AppVersion> {
        self.version.clone()
    }
}

/// Reads `RATEGATE_APP_VERSION` and `RATEGATE_APP_BUILD` on each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvVersion;

impl VersionProvider for EnvVersion {
    fn current_version(&self) -> Option<AppVersion> {
        let release = env::var(APP_VERSION_ENV).ok()?;
        let release = release.trim();
        if release.is_empty() {
            return None;
        }

        let mut version = AppVersion::new(release);
        if let Ok(build) = env::var(APP_BUILD_ENV) {
            let build = build.trim();
            if !build.is_empty() {
                version = version.with_build(build);
            }
        }
        Some(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_identifier_without_build() {
        let version = AppVersion::new("2.4.1");
        assert_eq!(version.identifier(false), "2.4.1");
        assert_eq!(version.identifier(true), "2.4.1");
    }

    #[test]
    fn test_identifier_with_build() {
        let version = AppVersion::new("2.4.1").with_build("88");
        assert_eq!(version.identifier(false), "2.4.1");
        assert_eq!(version.identifier(true), "2.4.1 (88)");
    }

    #[test]
    fn test_static_version() {
        let provider = StaticVersion::new(AppVersion::new("1.0"));
        assert_eq!(provider.current_version(), Some(AppVersion::new("1.0")));
        assert!(StaticVersion::unknown().current_version().is_none());
    }

    #[test]
    #[serial]
    fn test_env_version() {
        env::set_var(APP_VERSION_ENV, "3.2.0");
        env::set_var(APP_BUILD_ENV, "120");

        let version = EnvVersion.current_version().unwrap();
        assert_eq!(version.release, "3.2.0");
        assert_eq!(version.build.as_deref(), Some("120"));

        env::remove_var(APP_VERSION_ENV);
        env::remove_var(APP_BUILD_ENV);
    }

    #[test]
    #[serial]
    fn test_env_version_missing_or_blank() {
        env::remove_var(APP_VERSION_ENV);
        env::remove_var(APP_BUILD_ENV);
        assert!(EnvVersion.current_version().is_none());

        env::set_var(APP_VERSION_ENV, "   ");
        assert!(EnvVersion.current_version().is_none());

        env::remove_var(APP_VERSION_ENV);
    }
}
