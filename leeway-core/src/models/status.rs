//! Utilization status levels and their colours.

use serde::{Deserialize, Serialize};

/// Upper bound (inclusive) of the safe band.
pub const MODERATE_THRESHOLD: f64 = 50.0;

/// Upper bound (inclusive) of the moderate band.
pub const CRITICAL_THRESHOLD: f64 = 80.0;

/// Status level derived from a utilization percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    /// At or below 50 %.
    Safe,
    /// Above 50 % and at or below 80 %.
    Moderate,
    /// Above 80 %.
    Critical,
    /// No data.
    Unknown,
}

impl StatusLevel {
    /// Maps a utilization percentage to a status level.
    pub fn for_pct(pct: Option<f64>) -> Self {
        match pct {
            None => Self::Unknown,
            Some(p) if p <= MODERATE_THRESHOLD => Self::Safe,
            Some(p) if p <= CRITICAL_THRESHOLD => Self::Moderate,
            Some(_) => Self::Critical,
        }
    }

    /// RGB colour for this level (GNOME palette).
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Safe => (0x33, 0xD1, 0x7A),
            Self::Moderate => (0xF6, 0xD3, 0x2D),
            Self::Critical => (0xC0, 0x1C, 0x28),
            Self::Unknown => (0x80, 0x80, 0x80),
        }
    }

    /// Closest ANSI 256-colour code, for terminal output.
    pub fn ansi256(self) -> u8 {
        match self {
            Self::Safe => 41,
            Self::Moderate => 220,
            Self::Critical => 160,
            Self::Unknown => 244,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_bands() {
        assert_eq!(StatusLevel::for_pct(None), StatusLevel::Unknown);
        assert_eq!(StatusLevel::for_pct(Some(0.0)), StatusLevel::Safe);
        assert_eq!(StatusLevel::for_pct(Some(50.0)), StatusLevel::Safe);
        assert_eq!(StatusLevel::for_pct(Some(50.1)), StatusLevel::Moderate);
        assert_eq!(StatusLevel::for_pct(Some(80.0)), StatusLevel::Moderate);
        assert_eq!(StatusLevel::for_pct(Some(80.1)), StatusLevel::Critical);
    }

    #[test]
    fn test_colours_are_distinct() {
        let levels = [
            StatusLevel::Safe,
            StatusLevel::Moderate,
            StatusLevel::Critical,
            StatusLevel::Unknown,
        ];
        for (i, a) in levels.iter().enumerate() {
            for b in &levels[i + 1..] {
                assert_ne!(a.rgb(), b.rgb());
                assert_ne!(a.ansi256(), b.ansi256());
            }
        }
    }
}
