//! Window materialization
//!
//! Turns a virtual sub-range into the ordered list of region slices it covers.

use crate::error::{VirtError, VirtResult};
use crate::index::VirtualIndex;
use crate::types::{GenomicPos, Window};

/// Materialize the windows covering `[virtual_start, virtual_end)`
pub fn make_windows(
    index: &VirtualIndex,
    virtual_start: GenomicPos,
    virtual_end: GenomicPos,
) -> VirtResult<Vec<Window>> {
    make_windows_limited(index, virtual_start, virtual_end, usize::MAX)
}

/// Same as [`make_windows`], refusing ranges that would yield more than `limit` windows
pub fn make_windows_limited(
    index: &VirtualIndex,
    virtual_start: GenomicPos,
    virtual_end: GenomicPos,
    limit: usize,
) -> VirtResult<Vec<Window>> {
    if virtual_start >= virtual_end {
        return Err(VirtError::empty_range(virtual_start, virtual_end));
    }

    let first = index.locate(virtual_start)?;
    let last = index.locate(virtual_end)?;

    // A range ending exactly on a boundary takes nothing from the last region.
    let last_index = if last.local_offset == 0 {
        last.region_index - 1
    } else {
        last.region_index
    };

    let count = last_index + 1 - first.region_index;
    if count > limit {
        log::warn!(
            "Refusing to materialize {} windows for virtual range {}-{} (limit {})",
            count,
            virtual_start,
            virtual_end,
            limit
        );
        return Err(VirtError::TooManyWindows { count, limit });
    }

    let mut windows = Vec::with_capacity(count);
    for region_index in first.region_index..=last_index {
        let entry = &index.entries()[region_index];
        let region = &entry.region;

        let local_start = if region_index == first.region_index {
            first.local_offset
        } else {
            0
        };
        let local_end = if region_index == last.region_index {
            last.local_offset
        } else {
            region.len()
        };

        windows.push(Window {
            sequence_id: region.sequence_id.clone(),
            real_start: region.start + local_start,
            real_end: region.start + local_end,
            virtual_start: entry.virtual_offset + local_start,
            virtual_end: entry.virtual_offset + local_end,
            region_index,
            parity: region_index % 2 == 1,
        });
    }

    let covered: GenomicPos = windows.iter().map(Window::bases).sum();
    if covered != virtual_end - virtual_start {
        return Err(VirtError::consistency(format!(
            "windows cover {} bases but virtual range {}-{} spans {}",
            covered,
            virtual_start,
            virtual_end,
            virtual_end - virtual_start
        )));
    }

    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegionTable;

    fn index_of(triples: &[(&str, u64, u64)]) -> VirtualIndex {
        VirtualIndex::build(RegionTable::from_triples(triples.iter().cloned()).unwrap()).unwrap()
    }

    #[test]
    fn test_example_scenario() {
        let index = index_of(&[("chr1", 100, 110), ("chr2", 0, 20)]);
        let windows = make_windows(&index, 5, 25).unwrap();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].sequence_id, "chr1");
        assert_eq!((windows[0].real_start, windows[0].real_end), (105, 110));
        assert_eq!((windows[0].virtual_start, windows[0].virtual_end), (5, 10));
        assert!(!windows[0].parity);

        assert_eq!(windows[1].sequence_id, "chr2");
        assert_eq!((windows[1].real_start, windows[1].real_end), (0, 15));
        assert_eq!((windows[1].virtual_start, windows[1].virtual_end), (10, 25));
        assert!(windows[1].parity);
    }

    #[test]
    fn test_range_ending_on_boundary() {
        let index = index_of(&[("chr1", 100, 110), ("chr2", 0, 20)]);
        let windows = make_windows(&index, 0, 10).unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!((windows[0].real_start, windows[0].real_end), (100, 110));
    }

    #[test]
    fn test_range_to_virtual_end() {
        let index = index_of(&[("chr1", 100, 110), ("chr2", 0, 20)]);
        let windows = make_windows(&index, 10, 30).unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!((windows[0].real_start, windows[0].real_end), (0, 20));
        assert_eq!(windows[0].region_index, 1);
    }

    #[test]
    fn test_single_region_interior() {
        let index = index_of(&[("chr1", 100, 200)]);
        let windows = make_windows(&index, 10, 20).unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!((windows[0].real_start, windows[0].real_end), (110, 120));
    }

    #[test]
    fn test_empty_and_out_of_range() {
        let index = index_of(&[("chr1", 0, 10)]);
        assert!(matches!(
            make_windows(&index, 5, 5),
            Err(VirtError::EmptyRange { start: 5, end: 5 })
        ));
        assert!(matches!(
            make_windows(&index, 6, 2),
            Err(VirtError::EmptyRange { .. })
        ));
        assert!(matches!(
            make_windows(&index, 0, 11),
            Err(VirtError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_window_limit() {
        let triples: Vec<(String, u64, u64)> =
            (0..10).map(|i| ("chr1".to_string(), i * 10, i * 10 + 5)).collect();
        let index =
            VirtualIndex::build(RegionTable::from_triples(triples).unwrap()).unwrap();

        assert!(make_windows_limited(&index, 0, 50, 10).is_ok());
        assert!(matches!(
            make_windows_limited(&index, 0, 50, 9),
            Err(VirtError::TooManyWindows { count: 10, limit: 9 })
        ));
        // Ending on a boundary does not count the following region
        assert!(make_windows_limited(&index, 0, 45, 9).is_ok());
    }

    #[test]
    fn test_coverage_all_ranges() {
        let index = index_of(&[("a", 0, 3), ("b", 7, 8), ("a", 10, 14), ("c", 0, 2)]);
        let total = index.virtual_length();
        for a in 0..total {
            for b in (a + 1)..=total {
                let windows = make_windows(&index, a, b).unwrap();
                let bases: u64 = windows.iter().map(Window::bases).sum();
                assert_eq!(bases, b - a);
                assert_eq!(windows.first().unwrap().virtual_start, a);
                assert_eq!(windows.last().unwrap().virtual_end, b);
            }
        }
    }
}
