//! Four-valued logic samples and their textual tokens

use std::fmt;

/// Discrete logic level carried by digital waveforms
///
/// The numeric codes match the host protocol: 0, 1, unknown (2) and
/// high-impedance (3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Logic {
    Zero,
    One,
    /// Undetermined level, rendered as `x`
    Unknown,
    /// High-impedance, rendered as `z`
    HighZ,
}

impl Logic {
    /// Numeric code stored in a column's real slot
    pub fn code(self) -> i32 {
        match self {
            Logic::Zero => 0,
            Logic::One => 1,
            Logic::Unknown => 2,
            Logic::HighZ => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Logic::Zero),
            1 => Some(Logic::One),
            2 => Some(Logic::Unknown),
            3 => Some(Logic::HighZ),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        encode(self.code())
    }
}

impl From<Logic> for i32 {
    fn from(value: Logic) -> Self {
        value.code()
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Map a logic code to its single-character token
///
/// Codes outside 0..=3 map to the empty string rather than an error.
pub fn encode(value: i32) -> &'static str {
    match value {
        0 => "0",
        1 => "1",
        2 => "x",
        3 => "z",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_codes() {
        assert_eq!(encode(0), "0");
        assert_eq!(encode(1), "1");
        assert_eq!(encode(2), "x");
        assert_eq!(encode(3), "z");
    }

    #[test]
    fn test_encode_fallback_is_empty() {
        assert_eq!(encode(4), "");
        assert_eq!(encode(-1), "");
        assert_eq!(encode(i32::MAX), "");
    }

    #[test]
    fn test_code_roundtrip() {
        for level in [Logic::Zero, Logic::One, Logic::Unknown, Logic::HighZ] {
            assert_eq!(Logic::from_code(level.code()), Some(level));
        }
        assert_eq!(Logic::from_code(7), None);
    }

    #[test]
    fn test_display_uses_token() {
        assert_eq!(Logic::HighZ.to_string(), "z");
        assert_eq!(Logic::Unknown.to_string(), "x");
    }
}
