//! Presenting virtual positions as plain sequence positions
//!
//! When the region table covers a single real sequence, users see that
//! sequence's coordinates instead of the synthetic virtual name. Whenever the
//! mapping is ambiguous the original, undisguised string is kept.

use crate::error::VirtResult;
use crate::index::VirtualIndex;
use crate::position::{format_range, Position, PositionCodec};
use crate::reverse::locate_real;
use crate::types::{GenomicPos, Window};
use crate::windows::make_windows;

/// Real span of `windows` if they lie on one sequence in ascending order
fn single_sequence_span(windows: &[Window]) -> Option<(&str, GenomicPos, GenomicPos)> {
    let first = windows.first()?;
    let last = windows.last()?;
    let ascending = windows.windows(2).all(|pair| {
        pair[0].sequence_id == pair[1].sequence_id && pair[0].real_end <= pair[1].real_start
    });
    ascending.then_some((first.sequence_id.as_str(), first.real_start, last.real_end))
}

/// Display string for `[virtual_start, virtual_end)`.
///
/// Returns `seq:start-end` when the table covers a single sequence and that
/// string translates back to exactly the same virtual range; otherwise the
/// virtual form under the codec's name.
pub fn disguise_position(
    index: &VirtualIndex,
    codec: &PositionCodec,
    virtual_start: GenomicPos,
    virtual_end: GenomicPos,
) -> VirtResult<String> {
    let windows = make_windows(index, virtual_start, virtual_end)?;
    let undisguised = codec.format_virtual(virtual_start, virtual_end);

    if !index.is_single_sequence() {
        log::debug!("Not disguising {}: table spans several sequences", undisguised);
        return Ok(undisguised);
    }

    let Some((sequence_id, real_start, real_end)) = single_sequence_span(&windows) else {
        log::debug!("Not disguising {}: spans several sequences", undisguised);
        return Ok(undisguised);
    };

    let back = locate_real(index, sequence_id, real_start, real_end, false);
    let exact = back.len() == 1
        && back[0].virtual_start == virtual_start as i64
        && back[0].virtual_end == virtual_end as i64;
    if !exact {
        log::debug!(
            "Not disguising {}: {}:{}-{} maps back to {} ranges",
            undisguised,
            sequence_id,
            real_start,
            real_end,
            back.len()
        );
        return Ok(undisguised);
    }

    Ok(format_range(sequence_id, real_start, real_end))
}

/// Recover a virtual position from a possibly disguised string.
///
/// Virtual strings pass through. On a single-sequence table, a real string
/// that maps to exactly one virtual range becomes that range; otherwise it is
/// returned as a real position for the caller to handle.
pub fn undisguise_position(
    index: &VirtualIndex,
    codec: &PositionCodec,
    input: &str,
    nearest_fallback: bool,
) -> VirtResult<Position> {
    let position = codec.parse(input)?;
    let matches = match &position {
        Position::Real {
            sequence_id,
            start,
            end,
        } => locate_real(index, sequence_id, *start, *end, nearest_fallback),
        Position::Virtual { .. } => return Ok(position.clone()),
    };
    if !index.is_single_sequence() {
        log::debug!("Leaving {} undisguised: table spans several sequences", input);
        return Ok(position);
    }
    match matches.as_slice() {
        [m] if !m.is_empty() => Ok(Position::Virtual {
            start: m.virtual_start as GenomicPos,
            end: m.virtual_end as GenomicPos,
        }),
        _ => {
            log::debug!(
                "Leaving {} undisguised: {} virtual matches",
                input,
                matches.len()
            );
            Ok(position)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegionTable;

    fn index_of(triples: &[(&str, u64, u64)]) -> VirtualIndex {
        VirtualIndex::build(RegionTable::from_triples(triples.iter().cloned()).unwrap()).unwrap()
    }

    #[test]
    fn test_single_sequence_disguised() {
        // Exons of one gene
        let index = index_of(&[("chr7", 100, 200), ("chr7", 300, 350), ("chr7", 500, 600)]);
        let codec = PositionCodec::default();

        let shown = disguise_position(&index, &codec, 50, 200).unwrap();
        assert_eq!(shown, "chr7:151-550");

        let back = undisguise_position(&index, &codec, &shown, false).unwrap();
        assert_eq!(back, Position::Virtual { start: 50, end: 200 });
    }

    #[test]
    fn test_multi_sequence_range_not_disguised() {
        let index = index_of(&[("chr1", 100, 110), ("chr2", 0, 20)]);
        let codec = PositionCodec::default();

        assert_eq!(disguise_position(&index, &codec, 5, 25).unwrap(), "virt:6-25");
        // A range inside one region is still virtual when the table has two sequences
        assert_eq!(disguise_position(&index, &codec, 12, 25).unwrap(), "virt:13-25");
        assert_eq!(
            undisguise_position(&index, &codec, "chr2:3-15", true).unwrap(),
            Position::Real {
                sequence_id: "chr2".to_string(),
                start: 2,
                end: 15
            }
        );
    }

    #[test]
    fn test_repeated_region_not_disguised() {
        let index = index_of(&[("chr1", 0, 10), ("chr1", 0, 10)]);
        let codec = PositionCodec::default();
        assert_eq!(disguise_position(&index, &codec, 0, 5).unwrap(), "virt:1-5");

        // Ambiguous real string stays real
        let pos = undisguise_position(&index, &codec, "chr1:1-5", false).unwrap();
        assert!(!pos.is_virtual());
    }

    #[test]
    fn test_undisguise_passthrough_and_nearest() {
        let index = index_of(&[("chr1", 100, 110), ("chr1", 200, 220)]);
        let codec = PositionCodec::default();

        assert_eq!(
            undisguise_position(&index, &codec, "virt:1-30", false).unwrap(),
            Position::Virtual { start: 0, end: 30 }
        );
        let missing = undisguise_position(&index, &codec, "chr1:1-5", false).unwrap();
        assert!(!missing.is_virtual());

        assert_eq!(
            undisguise_position(&index, &codec, "chr1:1-5", true).unwrap(),
            Position::Virtual { start: 0, end: 5 }
        );
        assert!(undisguise_position(&index, &codec, "chr1", true).is_err());
    }
}
