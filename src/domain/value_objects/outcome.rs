//! Fudge outcome derived from a six-sided roll

use serde::{Deserialize, Serialize};

/// Three-valued fudge classification of a single die
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Minus,
    Zero,
    Plus,
}

impl Outcome {
    /// Classify a pip count.
    ///
    /// Out-of-range counts are not rejected: anything above four reads as `Plus`.
    pub fn classify(pips: u32) -> Self {
        match pips {
            0..=2 => Self::Minus,
            3 | 4 => Self::Zero,
            _ => Self::Plus,
        }
    }

    /// Numeric score attached to the widget
    pub fn value(&self) -> i8 {
        match self {
            Self::Minus => -1,
            Self::Zero => 0,
            Self::Plus => 1,
        }
    }

    /// Face drawn over the die. Blank faces stay empty.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Minus => "\u{2212}",
            Self::Zero => "",
            Self::Plus => "+",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_table() {
        let expected = [
            (0, Outcome::Minus),
            (1, Outcome::Minus),
            (2, Outcome::Minus),
            (3, Outcome::Zero),
            (4, Outcome::Zero),
            (5, Outcome::Plus),
            (6, Outcome::Plus),
        ];
        for (pips, outcome) in expected {
            assert_eq!(Outcome::classify(pips), outcome, "pips = {}", pips);
        }
    }

    #[test]
    fn test_out_of_range_is_plus() {
        assert_eq!(Outcome::classify(7), Outcome::Plus);
        assert_eq!(Outcome::classify(42), Outcome::Plus);
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(Outcome::Zero.glyph(), "");
        assert_eq!(Outcome::Plus.glyph(), "+");
        assert_eq!(Outcome::Minus.glyph(), "\u{2212}");
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Outcome::Minus.to_string(), "-1");
        assert_eq!(Outcome::Zero.to_string(), "0");
        assert_eq!(Outcome::Plus.to_string(), "1");
    }
}
