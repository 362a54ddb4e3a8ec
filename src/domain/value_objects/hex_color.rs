//! CSS hex color value

use serde::{Deserialize, Serialize};

/// A `#RGB` or `#RRGGBB` color, stored as entered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid color {0:?}: expected #RGB or #RRGGBB")]
pub struct InvalidColor(pub String);

impl HexColor {
    pub fn parse(value: &str) -> Result<Self, InvalidColor> {
        let value = value.trim();
        let digits = value
            .strip_prefix('#')
            .ok_or_else(|| InvalidColor(value.to_string()))?;
        let valid_len = digits.len() == 3 || digits.len() == 6;
        if !valid_len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidColor(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    /// Wrap a compiled-in constant that is known to be valid
    pub(super) fn from_static(value: &'static str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HexColor {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
