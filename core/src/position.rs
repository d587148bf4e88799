//! Position strings
//!
//! Display form is `name:start-end`, 1-based and inclusive. Internally every
//! range is 0-based and half-open, so `"chr1:101-110"` is `chr1 [100, 110)`.

use crate::config::DEFAULT_VIRTUAL_NAME;
use crate::error::{VirtError, VirtResult};
use crate::types::GenomicPos;
use std::fmt;

/// A parsed position, either in virtual space or on a real sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Position {
    /// Range in virtual space
    Virtual {
        /// 0-based start
        start: GenomicPos,
        /// Exclusive end
        end: GenomicPos,
    },
    /// Range on a named real sequence
    Real {
        /// Sequence name as written
        sequence_id: String,
        /// 0-based start
        start: GenomicPos,
        /// Exclusive end
        end: GenomicPos,
    },
}

impl Position {
    /// 0-based start
    pub fn start(&self) -> GenomicPos {
        match self {
            Position::Virtual { start, .. } | Position::Real { start, .. } => *start,
        }
    }

    /// Exclusive end
    pub fn end(&self) -> GenomicPos {
        match self {
            Position::Virtual { end, .. } | Position::Real { end, .. } => *end,
        }
    }

    /// True for [`Position::Virtual`]
    pub fn is_virtual(&self) -> bool {
        matches!(self, Position::Virtual { .. })
    }
}

/// Converts between [`Position`] values and display strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionCodec {
    virtual_name: String,
}

impl Default for PositionCodec {
    fn default() -> Self {
        Self::new(DEFAULT_VIRTUAL_NAME)
    }
}

impl PositionCodec {
    /// Codec treating `virtual_name` as the virtual sequence
    pub fn new<S: Into<String>>(virtual_name: S) -> Self {
        Self {
            virtual_name: virtual_name.into(),
        }
    }

    /// Name used for virtual positions
    pub fn virtual_name(&self) -> &str {
        &self.virtual_name
    }

    /// Parse a display string; the virtual name selects [`Position::Virtual`]
    pub fn parse(&self, input: &str) -> VirtResult<Position> {
        let (name, start, end) = parse_range(input)?;
        if name == self.virtual_name {
            Ok(Position::Virtual { start, end })
        } else {
            Ok(Position::Real {
                sequence_id: name,
                start,
                end,
            })
        }
    }

    /// Display string for a position, 1-based inclusive
    pub fn format(&self, position: &Position) -> String {
        match position {
            Position::Virtual { start, end } => self.format_virtual(*start, *end),
            Position::Real {
                sequence_id,
                start,
                end,
            } => format_range(sequence_id, *start, *end),
        }
    }

    /// Display string for a virtual range
    pub fn format_virtual(&self, start: GenomicPos, end: GenomicPos) -> String {
        format_range(&self.virtual_name, start, end)
    }
}

impl fmt::Display for Position {
    /// Virtual positions are shown under the default virtual name
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Virtual { start, end } => {
                write!(f, "{}:{}-{}", DEFAULT_VIRTUAL_NAME, start + 1, end)
            }
            Position::Real {
                sequence_id,
                start,
                end,
            } => write!(f, "{}:{}-{}", sequence_id, start + 1, end),
        }
    }
}

/// Format a 0-based half-open range as `name:start-end` (1-based, inclusive)
pub fn format_range(name: &str, start: GenomicPos, end: GenomicPos) -> String {
    format!("{}:{}-{}", name, start + 1, end)
}

/// Parse `name:start-end` into `(name, start, end)`, 0-based half-open.
///
/// Surrounding whitespace and thousands separators are accepted. The last
/// `:` splits the name from the range, so names may contain `:` themselves.
pub fn parse_range(input: &str) -> VirtResult<(String, GenomicPos, GenomicPos)> {
    let trimmed = input.trim();
    let (name, range) = trimmed
        .rsplit_once(':')
        .ok_or_else(|| VirtError::malformed(input, "expected 'name:start-end'"))?;
    if name.is_empty() {
        return Err(VirtError::malformed(input, "missing sequence name"));
    }

    let (start, end) = range
        .split_once('-')
        .ok_or_else(|| VirtError::malformed(input, "expected 'start-end' after ':'"))?;
    let start = parse_coordinate(input, start)?;
    let end = parse_coordinate(input, end)?;

    if start == 0 {
        return Err(VirtError::malformed(input, "positions are 1-based; start must be at least 1"));
    }
    if start > end {
        return Err(VirtError::malformed(
            input,
            format!("start ({}) is after end ({})", start, end),
        ));
    }

    Ok((name.to_string(), start - 1, end))
}

fn parse_coordinate(input: &str, field: &str) -> VirtResult<GenomicPos> {
    let digits: String = field.trim().chars().filter(|&c| c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(VirtError::malformed(
            input,
            format!("'{}' is not a number", field.trim()),
        ));
    }
    digits
        .parse::<GenomicPos>()
        .map_err(|e| VirtError::malformed(input, format!("'{}': {}", field.trim(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_real() {
        let codec = PositionCodec::default();
        assert_eq!(
            codec.parse("chr1:101-110").unwrap(),
            Position::Real {
                sequence_id: "chr1".to_string(),
                start: 100,
                end: 110
            }
        );
    }

    #[test]
    fn test_parse_virtual() {
        let codec = PositionCodec::new("multi");
        let pos = codec.parse("multi:6-25").unwrap();
        assert_eq!(pos, Position::Virtual { start: 5, end: 25 });
        assert!(pos.is_virtual());
        assert_eq!(codec.format(&pos), "multi:6-25");
    }

    #[test]
    fn test_separators_and_whitespace() {
        assert_eq!(
            parse_range("  chr2:1,001-2,000 ").unwrap(),
            ("chr2".to_string(), 1000, 2000)
        );
    }

    #[test]
    fn test_name_with_colon() {
        assert_eq!(
            parse_range("HLA-A*01:01:1-100").unwrap(),
            ("HLA-A*01:01".to_string(), 0, 100)
        );
    }

    #[test]
    fn test_single_base() {
        assert_eq!(parse_range("chr1:5-5").unwrap(), ("chr1".to_string(), 4, 5));
        assert_eq!(format_range("chr1", 4, 5), "chr1:5-5");
    }

    #[test]
    fn test_malformed() {
        for bad in [
            "chr1",
            "chr1:100",
            ":1-10",
            "chr1:a-10",
            "chr1:1-b",
            "chr1:-10",
            "chr1:0-10",
            "chr1:20-10",
            "chr1:1-10-20",
            "chr1:1.5-10",
            "",
        ] {
            let err = parse_range(bad).unwrap_err();
            assert!(err.is_user_facing(), "{} should be malformed", bad);
        }
    }

    #[test]
    fn test_round_trip() {
        let codec = PositionCodec::default();
        for pos in [
            Position::Virtual { start: 0, end: 30 },
            Position::Real {
                sequence_id: "chrUn_KI270302v1".to_string(),
                start: 12345,
                end: 67890,
            },
        ] {
            assert_eq!(codec.parse(&codec.format(&pos)).unwrap(), pos);
        }
    }

    #[test]
    fn test_display() {
        let pos = Position::Virtual { start: 9, end: 20 };
        assert_eq!(pos.to_string(), "virt:10-20");
    }
}
