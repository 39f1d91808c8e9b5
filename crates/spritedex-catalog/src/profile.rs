//! Load profiles.
//!
//! A profile decides whether the soft findings of a load pass (things that
//! are suspicious but do not break any catalog invariant) are reported as
//! warnings or as errors.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, WarningCode};

/// How a soft finding is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Not reported.
    Ignore,
    /// Reported as a warning; loading continues.
    #[default]
    Warn,
    /// Reported as an error; loading fails.
    Deny,
}

/// Findings whose severity is controlled by the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoftFinding {
    /// Creature tile carries an attribute key that means nothing to the catalog.
    UnknownAttribute,
    /// Tile has a kind tag other than "creature".
    UnrecognizedKind,
    /// Two tiles share kind, imageset, direction and subclass.
    DuplicateAppearance,
    /// Tile has attributes but no kind tag.
    AttributesWithoutKind,
}

impl SoftFinding {
    /// Code used when the finding is denied.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            SoftFinding::UnknownAttribute => ErrorCode::UnknownAttribute,
            SoftFinding::UnrecognizedKind => ErrorCode::UnrecognizedKind,
            SoftFinding::DuplicateAppearance => ErrorCode::DuplicateAppearance,
            SoftFinding::AttributesWithoutKind => ErrorCode::AttributesWithoutKind,
        }
    }

    /// Code used when the finding is a warning.
    pub fn warning_code(&self) -> WarningCode {
        match self {
            SoftFinding::UnknownAttribute => WarningCode::UnknownAttribute,
            SoftFinding::UnrecognizedKind => WarningCode::UnrecognizedKind,
            SoftFinding::DuplicateAppearance => WarningCode::DuplicateAppearance,
            SoftFinding::AttributesWithoutKind => WarningCode::AttributesWithoutKind,
        }
    }
}

/// A complete load profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadProfile {
    /// Profile identifier (e.g., "default", "strict").
    pub name: String,
    /// Severity for unrecognized attribute keys on creature tiles.
    #[serde(default)]
    pub unknown_attributes: Severity,
    /// Severity for kind tags other than "creature".
    #[serde(default)]
    pub unrecognized_kinds: Severity,
    /// Severity for repeated (kind, imageset, direction, subclass) keys.
    #[serde(default)]
    pub duplicate_appearances: Severity,
    /// Severity for attribute bags on tiles without a kind.
    #[serde(default)]
    pub attributes_without_kind: Severity,
}

impl Default for LoadProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            unknown_attributes: Severity::Warn,
            unrecognized_kinds: Severity::Warn,
            duplicate_appearances: Severity::Warn,
            attributes_without_kind: Severity::Warn,
        }
    }
}

impl LoadProfile {
    /// Every soft finding is an error.
    pub fn strict() -> Self {
        Self {
            name: "strict".to_string(),
            unknown_attributes: Severity::Deny,
            unrecognized_kinds: Severity::Deny,
            duplicate_appearances: Severity::Deny,
            attributes_without_kind: Severity::Deny,
        }
    }

    /// Soft findings are not reported at all.
    pub fn lenient() -> Self {
        Self {
            name: "lenient".to_string(),
            unknown_attributes: Severity::Ignore,
            unrecognized_kinds: Severity::Ignore,
            duplicate_appearances: Severity::Ignore,
            attributes_without_kind: Severity::Ignore,
        }
    }

    /// Looks up a profile by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "strict" => Some(Self::strict()),
            "lenient" => Some(Self::lenient()),
            _ => None,
        }
    }

    /// Names accepted by [`LoadProfile::by_name`].
    pub fn names() -> &'static [&'static str] {
        &["default", "strict", "lenient"]
    }

    /// Returns the severity configured for a finding.
    pub fn severity(&self, finding: SoftFinding) -> Severity {
        match finding {
            SoftFinding::UnknownAttribute => self.unknown_attributes,
            SoftFinding::UnrecognizedKind => self.unrecognized_kinds,
            SoftFinding::DuplicateAppearance => self.duplicate_appearances,
            SoftFinding::AttributesWithoutKind => self.attributes_without_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_by_name() {
        for name in LoadProfile::names() {
            let profile = LoadProfile::by_name(name).unwrap();
            assert_eq!(profile.name, *name);
        }
        assert!(LoadProfile::by_name("paranoid").is_none());
    }

    #[test]
    fn test_strict_denies_everything() {
        let strict = LoadProfile::strict();
        assert_eq!(
            strict.severity(SoftFinding::DuplicateAppearance),
            Severity::Deny
        );
        assert_eq!(strict.severity(SoftFinding::UnknownAttribute), Severity::Deny);
    }

    #[test]
    fn test_profile_from_json_defaults_to_warn() {
        let json = r#"{ "name": "custom", "unknown_attributes": "ignore" }"#;
        let profile: LoadProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.unknown_attributes, Severity::Ignore);
        assert_eq!(profile.unrecognized_kinds, Severity::Warn);
        assert_eq!(profile.duplicate_appearances, Severity::Warn);
    }

    #[test]
    fn test_finding_codes() {
        assert_eq!(
            SoftFinding::UnknownAttribute.error_code(),
            ErrorCode::UnknownAttribute
        );
        assert_eq!(
            SoftFinding::AttributesWithoutKind.warning_code(),
            WarningCode::AttributesWithoutKind
        );
    }
}
