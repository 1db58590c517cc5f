//! Selector presentation settings.
//!
//! Settings load from TOML:
//!
//! ```toml
//! flow_direction = "left_to_right"
//! mode = "exclusive"
//! name_style = "description"
//! ```
//!
//! Every key is optional.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::names::NameStyle;

/// Direction toggles are laid out in. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "native", derive(uniffi::Enum))]
pub enum FlowDirection {
    LeftToRight,
    RightToLeft,
    #[default]
    TopDown,
    BottomUp,
}

impl FlowDirection {
    /// Whether toggles stack horizontally.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::LeftToRight | Self::RightToLeft)
    }
}

/// How checking a toggle affects the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "native", derive(uniffi::Enum))]
pub enum SelectionMode {
    /// Independent check boxes; any combination of members.
    #[default]
    Multiple,
    /// Radio buttons; checking one member clears the rest.
    Exclusive,
}

/// Settings for constructing a selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub flow_direction: FlowDirection,
    pub mode: SelectionMode,
    pub name_style: NameStyle,
}

impl SelectorConfig {
    /// Parse settings from a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlagError;

    #[test]
    fn defaults() {
        let config = SelectorConfig::default();
        assert_eq!(config.flow_direction, FlowDirection::TopDown);
        assert_eq!(config.mode, SelectionMode::Multiple);
        assert_eq!(config.name_style, NameStyle::MemberName);
    }

    #[test]
    fn parse_full() {
        let config = SelectorConfig::from_toml_str(
            r#"
            flow_direction = "left_to_right"
            mode = "exclusive"
            name_style = "description"
            "#,
        )
        .unwrap();
        assert_eq!(config.flow_direction, FlowDirection::LeftToRight);
        assert!(config.flow_direction.is_horizontal());
        assert_eq!(config.mode, SelectionMode::Exclusive);
        assert_eq!(config.name_style, NameStyle::Description);
    }

    #[test]
    fn parse_partial_and_empty() {
        let config = SelectorConfig::from_toml_str("name_style = \"display\"").unwrap();
        assert_eq!(config.name_style, NameStyle::Display);
        assert_eq!(config.mode, SelectionMode::Multiple);
        assert_eq!(SelectorConfig::from_toml_str("").unwrap(), SelectorConfig::default());
    }

    #[test]
    fn parse_invalid() {
        let err = SelectorConfig::from_toml_str("mode = \"sideways\"").unwrap_err();
        assert!(matches!(err, FlagError::Config(_)));
    }
}
