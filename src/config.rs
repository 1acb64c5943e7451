// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Typed view of the host's `tagButtons` configuration section.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Name of the configuration section read from the host.
pub const SECTION: &str = "tagButtons";

/// Default foreground for tags.
pub const DEFAULT_TAG_COLOR: &str = "#2188ff";
/// Default foreground for variables.
pub const DEFAULT_VARIABLE_COLOR: &str = "#ce9178";
/// Profile selected when nothing is configured.
pub const DEFAULT_PROFILE: &str = "raw";

/// A named set of literal tag strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Text inserted for a line break
    #[serde(default)]
    pub newline: String,
    /// Color name (`white`, `red`, ...) to the literal tag text
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

/// All settings the core reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub tag_color: String,
    pub variable_color: String,
    /// Name of the active profile
    pub profile: String,
    pub profiles: HashMap<String, Profile>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tag_color: DEFAULT_TAG_COLOR.to_string(),
            variable_color: DEFAULT_VARIABLE_COLOR.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            profiles: HashMap::new(),
        }
    }
}

impl Settings {
    /// Parses the configuration section. `null` yields the defaults.
    ///
    /// Profiles are parsed one by one and a malformed profile is skipped, so
    /// it cannot take the colors and the remaining profiles down with it.
    pub fn from_value(mut value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }

        let profiles = value
            .as_object_mut()
            .and_then(|section| section.remove(ConfigKey::Profiles.name()));

        let mut settings: Settings = serde_json::from_value(value)?;
        if let Some(profiles) = profiles {
            settings.profiles = parse_profiles(profiles);
        }
        Ok(settings)
    }

    /// Parses the configuration section from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Returns the active profile, if it exists.
    pub fn active_profile(&self) -> Option<&Profile> {
        crate::profile::resolve(&self.profiles, &self.profile)
    }
}

fn parse_profiles(value: Value) -> HashMap<String, Profile> {
    let entries = match value {
        Value::Object(entries) => entries,
        Value::Null => return HashMap::new(),
        other => {
            tracing::warn!(found = %other, "`profiles` is not an object; ignoring it");
            return HashMap::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|(name, entry)| match serde_json::from_value(entry) {
            Ok(profile) => Some((name, profile)),
            Err(err) => {
                tracing::warn!(%err, profile = %name, "skipping malformed profile");
                None
            }
        })
        .collect()
}

/// Keys of the configuration section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    TagColor,
    VariableColor,
    Profile,
    Profiles,
}

impl ConfigKey {
    /// All known keys.
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::TagColor,
        ConfigKey::VariableColor,
        ConfigKey::Profile,
        ConfigKey::Profiles,
    ];

    /// Key name inside the section.
    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::TagColor => "tagColor",
            ConfigKey::VariableColor => "variableColor",
            ConfigKey::Profile => "profile",
            ConfigKey::Profiles => "profiles",
        }
    }

    /// Whether a change to this key requires rebuilding the decoration styles.
    pub fn affects_styles(self) -> bool {
        matches!(self, ConfigKey::TagColor | ConfigKey::VariableColor)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SECTION}.{}", self.name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    /// Accepts both the bare key and the section-qualified form.
    fn from_str(s: &str) -> Result<Self> {
        let bare = s
            .strip_prefix(SECTION)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(s);

        ConfigKey::ALL
            .into_iter()
            .find(|key| key.name() == bare)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
