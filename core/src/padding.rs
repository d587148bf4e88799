//! Symmetric interval padding
//!
//! Grows each region toward its neighbours on the same sequence without ever
//! making two regions overlap or change order.

use crate::error::{VirtError, VirtResult};
use crate::types::{GenomicPos, Region, RegionTable, SequenceSizes};
use std::collections::HashMap;

/// Pad every region by `amount` bases on both sides.
///
/// Padding is clipped to `[0, sequence size)`. Where two consecutive regions
/// of one sequence are less than `2 * amount` apart, the gap is split between
/// them: the left region takes `gap / 2`, the right region `(gap + 1) / 2`,
/// so an odd leftover base goes to the right region. Sequences are padded
/// independently of each other. Output has as many regions as input, in the
/// same order; nothing is merged or dropped.
pub fn pad<S: SequenceSizes + ?Sized>(
    table: &RegionTable,
    amount: GenomicPos,
    sizes: &S,
) -> VirtResult<RegionTable> {
    table.check_ordering()?;
    if amount == 0 {
        return Ok(table.clone());
    }

    let regions = table.regions();
    let mut starts: Vec<GenomicPos> = regions.iter().map(|r| r.start.saturating_sub(amount)).collect();
    let mut ends: Vec<GenomicPos> = Vec::with_capacity(regions.len());
    for region in regions {
        let size = sizes
            .sequence_size(&region.sequence_id)
            .ok_or_else(|| VirtError::unknown_sequence(region.sequence_id.as_str()))?;
        if region.end > size {
            return Err(VirtError::invariant(format!(
                "region {} extends past the end of its sequence ({})",
                region, size
            )));
        }
        ends.push(region.end.saturating_add(amount).min(size));
    }

    // Facing sides of same-sequence neighbours share the gap between them.
    let mut previous: HashMap<&str, usize> = HashMap::new();
    for (i, region) in regions.iter().enumerate() {
        if let Some(&p) = previous.get(region.sequence_id.as_str()) {
            let gap = region.start - regions[p].end;
            if gap < amount.saturating_mul(2) {
                ends[p] = regions[p].end + gap / 2;
                starts[i] = region.start - (gap + 1) / 2;
            }
        }
        previous.insert(region.sequence_id.as_str(), i);
    }

    let padded = regions
        .iter()
        .zip(starts.into_iter().zip(ends))
        .map(|(region, (start, end))| Region {
            sequence_id: region.sequence_id.clone(),
            start,
            end,
        })
        .collect();

    log::debug!("Padded {} regions by {} bases", regions.len(), amount);
    RegionTable::new(padded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes() -> HashMap<String, u64> {
        HashMap::from([("chr1".to_string(), 1000), ("chr2".to_string(), 500)])
    }

    fn spans(table: &RegionTable) -> Vec<(u64, u64)> {
        table.iter().map(|r| (r.start, r.end)).collect()
    }

    #[test]
    fn test_full_padding_when_far_apart() {
        let table = RegionTable::from_triples([("chr1", 100, 200), ("chr1", 400, 500)]).unwrap();
        let padded = pad(&table, 50, &sizes()).unwrap();
        assert_eq!(spans(&padded), vec![(50, 250), (350, 550)]);
    }

    #[test]
    fn test_clipped_to_sequence_bounds() {
        let table = RegionTable::from_triples([("chr1", 10, 20), ("chr1", 980, 1000)]).unwrap();
        let padded = pad(&table, 50, &sizes()).unwrap();
        assert_eq!(spans(&padded), vec![(0, 70), (930, 1000)]);
    }

    #[test]
    fn test_small_gap_split_with_odd_base_to_the_right() {
        // Gap of 7 < 2 * 10: left takes 3, right takes 4
        let table = RegionTable::from_triples([("chr1", 100, 200), ("chr1", 207, 300)]).unwrap();
        let padded = pad(&table, 10, &sizes()).unwrap();
        assert_eq!(spans(&padded), vec![(90, 203), (203, 310)]);
    }

    #[test]
    fn test_even_gap_split() {
        let table = RegionTable::from_triples([("chr1", 100, 200), ("chr1", 210, 300)]).unwrap();
        let padded = pad(&table, 5, &sizes()).unwrap();
        // Gap of exactly 2 * amount is padded in full
        assert_eq!(spans(&padded), vec![(95, 205), (205, 305)]);

        let table = RegionTable::from_triples([("chr1", 100, 200), ("chr1", 206, 300)]).unwrap();
        let padded = pad(&table, 10, &sizes()).unwrap();
        assert_eq!(spans(&padded), vec![(90, 203), (203, 310)]);
    }

    #[test]
    fn test_touching_regions_stay_touching() {
        let table = RegionTable::from_triples([("chr1", 100, 200), ("chr1", 200, 300)]).unwrap();
        let padded = pad(&table, 10, &sizes()).unwrap();
        assert_eq!(spans(&padded), vec![(90, 200), (200, 310)]);
    }

    #[test]
    fn test_sequences_padded_independently() {
        let table = RegionTable::from_triples([
            ("chr1", 100, 200),
            ("chr2", 100, 200),
            ("chr1", 205, 300),
            ("chr2", 480, 490),
        ])
        .unwrap();
        let padded = pad(&table, 10, &sizes()).unwrap();
        assert_eq!(
            spans(&padded),
            vec![(90, 202), (90, 210), (202, 310), (470, 500)]
        );
        assert!(padded.check_ordering().is_ok());
        assert_eq!(padded.len(), table.len());
    }

    #[test]
    fn test_errors() {
        let unknown = RegionTable::from_triples([("chrZ", 0, 10)]).unwrap();
        assert!(matches!(
            pad(&unknown, 5, &sizes()),
            Err(VirtError::UnknownSequence { .. })
        ));

        let overlapping = RegionTable::from_triples([("chr1", 0, 10), ("chr1", 5, 20)]).unwrap();
        assert!(matches!(
            pad(&overlapping, 5, &sizes()),
            Err(VirtError::InvariantViolation { .. })
        ));

        let too_long = RegionTable::from_triples([("chr2", 0, 600)]).unwrap();
        assert!(pad(&too_long, 5, &sizes()).is_err());
    }

    #[test]
    fn test_zero_amount_is_identity() {
        let table = RegionTable::from_triples([("chrZ", 0, 10)]).unwrap();
        assert_eq!(pad(&table, 0, &sizes()).unwrap(), table);
    }
}
