//! Real-to-virtual lookup
//!
//! A real span can appear in virtual space more than once, so every lookup
//! returns a list. Matches produced by touching windows are coalesced by
//! [`merge_adjacent`].

use crate::index::VirtualIndex;
use crate::types::{GenomicPos, PositionMatch};

/// Every virtual range where `[start, end)` on `sequence_id` is shown.
///
/// Linear scan over the index; a per-sequence interval tree could replace it
/// for very large tables without changing results.
pub fn find_overlaps(
    index: &VirtualIndex,
    sequence_id: &str,
    start: GenomicPos,
    end: GenomicPos,
) -> Vec<PositionMatch> {
    index
        .entries()
        .iter()
        .filter(|e| e.region.overlaps(sequence_id, start, end))
        .map(|e| {
            let clipped_start = start.max(e.region.start);
            let clipped_end = end.min(e.region.end);
            let virtual_start = e.virtual_offset + (clipped_start - e.region.start);
            PositionMatch::new(
                virtual_start as i64,
                (virtual_start + (clipped_end - clipped_start)) as i64,
            )
        })
        .collect()
}

/// Fallback for a query that overlaps nothing.
///
/// Picks the region on `sequence_id` closest to the query (first in table
/// order on ties) and returns a range of the query's length placed inside
/// that region against the edge facing the query, clamped to virtual space.
pub fn find_nearest(
    index: &VirtualIndex,
    sequence_id: &str,
    start: GenomicPos,
    end: GenomicPos,
) -> Option<PositionMatch> {
    let entry = index
        .entries()
        .iter()
        .filter(|e| e.region.sequence_id == sequence_id)
        .min_by_key(|e| e.region.distance_to(start, end))?;

    let length = end.saturating_sub(start) as i64;
    let virtual_length = index.virtual_length() as i64;
    let (virtual_start, virtual_end) = if end <= entry.region.start {
        let s = entry.virtual_offset as i64;
        (s, s + length)
    } else {
        let e = entry.virtual_end() as i64;
        (e - length, e)
    };

    log::debug!(
        "No overlap for {}:{}-{}, nearest region is {}",
        sequence_id,
        start,
        end,
        entry.region
    );

    Some(PositionMatch::new(
        virtual_start.clamp(0, virtual_length),
        virtual_end.clamp(0, virtual_length),
    ))
}

/// Sort by start and join runs where one match ends exactly where the next begins
pub fn merge_adjacent(mut matches: Vec<PositionMatch>) -> Vec<PositionMatch> {
    matches.sort();

    let mut merged: Vec<PositionMatch> = Vec::with_capacity(matches.len());
    for m in matches {
        match merged.last_mut() {
            Some(last) if last.virtual_end == m.virtual_start => last.virtual_end = m.virtual_end,
            _ => merged.push(m),
        }
    }
    merged
}

/// Overlaps, then the optional nearest fallback, then merging
pub fn locate_real(
    index: &VirtualIndex,
    sequence_id: &str,
    start: GenomicPos,
    end: GenomicPos,
    nearest_fallback: bool,
) -> Vec<PositionMatch> {
    let mut matches = find_overlaps(index, sequence_id, start, end);
    if matches.is_empty() && nearest_fallback {
        matches.extend(find_nearest(index, sequence_id, start, end));
    }
    merge_adjacent(matches)
}
