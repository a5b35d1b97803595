// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Configuration settings that affect every command.
//!
//! Settings are layered: the defaults embedded from `config.toml`, then an
//! optional user file in the same format, then command-line flags.

use crate::error::{LambctlError, Result};
use crate::paginator::PartialFailurePolicy;
use crate::schema::ConfirmImpact;
use ini::Ini;
use lazy_static::lazy_static;
use std::path::Path;
use std::time::Duration;

/// The embedded default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("./config.toml");

lazy_static! {
    /// Global settings.
    pub static ref LAMBCTL_CONF: Ini = Ini::load_from_str(DEFAULT_CONFIG).unwrap_or_default();
}

/// The resolved settings of one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// The AWS region; the provider chain decides when unset.
    pub region:         Option<String>,
    /// Overrides the regional service endpoint.
    pub endpoint_url:   Option<String>,
    /// The named AWS profile.
    pub profile:        Option<String>,
    /// Retries of throttled and failed calls.
    pub max_retries:    usize,
    /// The delay before the first retry.
    pub base_backoff:   Duration,
    /// The limit of one HTTP exchange.
    pub timeout:        Duration,
    /// Operations at or above this impact ask for confirmation.
    pub confirm_impact: ConfirmImpact,
    /// Whether a later page failure fails the whole command.
    pub strict_paging:  bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            region:         None,
            endpoint_url:   None,
            profile:        None,
            max_retries:    3,
            base_backoff:   Duration::from_millis(100),
            timeout:        Duration::from_secs(60),
            confirm_impact: ConfirmImpact::High,
            strict_paging:  false,
        }
    }
}

impl Settings {
    /// Loads the embedded defaults and, if given, the user file on top.
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        let mut settings = Settings::default();
        settings.merge(&LAMBCTL_CONF)?;
        if let Some(path) = path {
            let user = Ini::load_from_file(path).map_err(|e| {
                LambctlError::Config(format!("cannot read {}: {}", path.display(), e))
            })?;
            settings.merge(&user)?;
        }
        Ok(settings)
    }

    /// Replaces every setting the file sets to a non-empty value.
    pub fn merge(&mut self, ini: &Ini) -> Result<()> {
        if let Some(region) = value(ini, "aws", "region") {
            self.region = Some(region.to_string());
        }
        if let Some(url) = value(ini, "aws", "endpoint_url") {
            self.endpoint_url = Some(url.to_string());
        }
        if let Some(profile) = value(ini, "aws", "profile") {
            self.profile = Some(profile.to_string());
        }
        if let Some(retries) = value(ini, "client", "max_retries") {
            self.max_retries = retries
                .parse::<usize>()
                .map_err(|e| invalid("client", "max_retries", retries, &e.to_string()))?;
        }
        if let Some(backoff) = value(ini, "client", "base_backoff") {
            self.base_backoff = humantime::parse_duration(backoff)
                .map_err(|e| invalid("client", "base_backoff", backoff, &e.to_string()))?;
        }
        if let Some(timeout) = value(ini, "client", "timeout") {
            self.timeout = humantime::parse_duration(timeout)
                .map_err(|e| invalid("client", "timeout", timeout, &e.to_string()))?;
        }
        if let Some(impact) = value(ini, "cli", "confirm_impact") {
            self.confirm_impact = impact
                .parse::<ConfirmImpact>()
                .map_err(|e| invalid("cli", "confirm_impact", impact, &e))?;
        }
        if let Some(strict) = value(ini, "pagination", "strict") {
            self.strict_paging = strict
                .parse::<bool>()
                .map_err(|e| invalid("pagination", "strict", strict, &e.to_string()))?;
        }
        Ok(())
    }

    /// Applies the connection flags of the command line.
    pub fn with_overrides(
        mut self,
        region: Option<&str>,
        endpoint_url: Option<&str>,
        profile: Option<&str>,
    ) -> Settings {
        if let Some(region) = region {
            self.region = Some(region.to_string());
        }
        if let Some(url) = endpoint_url {
            self.endpoint_url = Some(url.to_string());
        }
        if let Some(profile) = profile {
            self.profile = Some(profile.to_string());
        }
        self
    }

    /// The pagination failure policy the settings select.
    pub fn paging_policy(&self) -> PartialFailurePolicy {
        if self.strict_paging {
            PartialFailurePolicy::Surface
        } else {
            PartialFailurePolicy::TruncateWhenBudgeted
        }
    }
}

fn value<'a>(ini: &'a Ini, section: &str, key: &str) -> Option<&'a str> {
    ini.section(Some(section))
        .and_then(|properties| properties.get(key))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> LambctlError {
    LambctlError::Config(format!(
        "invalid value '{}' for [{}] {}: {}",
        value, section, key, reason
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embedded_defaults_parse() -> Result<()> {
        let conf = Ini::load_from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(&conf["client"]["max_retries"], "3");
        assert_eq!(&conf["cli"]["confirm_impact"], "high");

        let settings = Settings::load(None)?;
        assert_eq!(settings, Settings::default());
        Ok(())
    }

    #[test]
    fn user_files_override_the_defaults() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(
            file,
            "[aws]\nregion = ap-southeast-2\n\n[client]\nbase_backoff = 1s\n\n[cli]\nconfirm_impact = Medium\n\n[pagination]\nstrict = true"
        )?;

        let settings = Settings::load(Some(file.path()))?;
        assert_eq!(settings.region.as_deref(), Some("ap-southeast-2"));
        assert_eq!(settings.base_backoff, Duration::from_secs(1));
        assert_eq!(settings.timeout, Duration::from_secs(60));
        assert_eq!(settings.confirm_impact, ConfirmImpact::Medium);
        assert_eq!(settings.paging_policy(), PartialFailurePolicy::Surface);
        Ok(())
    }

    #[test]
    fn invalid_values_are_reported() {
        let ini = Ini::load_from_str("[client]\ntimeout = soon").unwrap();
        let err = Settings::default().merge(&ini).unwrap_err();
        assert!(err.to_string().contains("[client] timeout"));

        let ini = Ini::load_from_str("[cli]\nconfirm_impact = severe").unwrap();
        assert!(Settings::default().merge(&ini).is_err());
    }

    #[test]
    fn flags_win_over_files() {
        let settings = Settings {
            region: Some("us-east-1".to_string()),
            ..Settings::default()
        }
        .with_overrides(Some("eu-central-1"), None, Some("dev"));
        assert_eq!(settings.region.as_deref(), Some("eu-central-1"));
        assert_eq!(settings.endpoint_url, None);
        assert_eq!(settings.profile.as_deref(), Some("dev"));
    }

    #[test]
    fn a_missing_user_file_is_a_config_error() {
        let err = Settings::load(Some(Path::new("/definitely/not/lambctl.toml"))).unwrap_err();
        assert!(matches!(err, LambctlError::Config(_)));
    }
}
