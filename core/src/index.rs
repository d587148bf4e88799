//! Prefix-sum index over a region table
//!
//! Maps a virtual offset to the region it falls in with a binary search.

use crate::error::{VirtError, VirtResult};
use crate::types::{GenomicPos, Region, RegionTable};
use serde::{Deserialize, Serialize};

/// One region together with the virtual offset at which it begins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Real span
    pub region: Region,
    /// Virtual offset of the region's first base
    pub virtual_offset: GenomicPos,
}

impl IndexEntry {
    /// Virtual offset one past the last base of this region
    pub fn virtual_end(&self) -> GenomicPos {
        self.virtual_offset + self.region.len()
    }
}

/// Result of [`VirtualIndex::locate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Index of the containing region in table order
    pub region_index: usize,
    /// Offset from the region's first base
    pub local_offset: GenomicPos,
}

/// Regions laid end to end with their virtual start offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualIndex {
    entries: Vec<IndexEntry>,
    virtual_length: GenomicPos,
}

impl VirtualIndex {
    /// Build the index in a single pass. An empty table has no virtual space.
    pub fn build(table: RegionTable) -> VirtResult<Self> {
        if table.is_empty() {
            return Err(VirtError::EmptyRegionTable);
        }

        let mut entries = Vec::with_capacity(table.len());
        let mut offset: GenomicPos = 0;
        for region in table.into_regions() {
            let len = region.len();
            entries.push(IndexEntry {
                region,
                virtual_offset: offset,
            });
            offset = offset.checked_add(len).ok_or_else(|| {
                VirtError::invariant("total region length overflows the virtual coordinate space")
            })?;
        }

        log::debug!(
            "Built virtual index: {} regions, virtual length {}",
            entries.len(),
            offset
        );

        Ok(Self {
            entries,
            virtual_length: offset,
        })
    }

    /// Total bases in the virtual space
    pub fn virtual_length(&self) -> GenomicPos {
        self.virtual_length
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a built index
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in table order
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Entry for one region, if it exists
    pub fn entry(&self, region_index: usize) -> Option<&IndexEntry> {
        self.entries.get(region_index)
    }

    /// Indexed regions in table order
    pub fn regions(&self) -> impl Iterator<Item = &Region> + '_ {
        self.entries.iter().map(|e| &e.region)
    }

    /// True when every indexed region lies on one sequence
    pub fn is_single_sequence(&self) -> bool {
        match self.entries.split_first() {
            Some((first, rest)) => rest
                .iter()
                .all(|e| e.region.sequence_id == first.region.sequence_id),
            None => false,
        }
    }

    /// Find the region containing `virtual_offset`.
    ///
    /// An offset on a region boundary resolves to the start of the later
    /// region. `virtual_length` itself resolves to one past the end of the
    /// last region.
    pub fn locate(&self, virtual_offset: GenomicPos) -> VirtResult<Location> {
        if virtual_offset > self.virtual_length {
            return Err(VirtError::out_of_range(virtual_offset, self.virtual_length));
        }

        // First entry starting after the offset; the one before it holds the offset.
        let after = self
            .entries
            .partition_point(|e| e.virtual_offset <= virtual_offset);
        let region_index = after.saturating_sub(1);
        let entry = &self.entries[region_index];

        Ok(Location {
            region_index,
            local_offset: virtual_offset - entry.virtual_offset,
        })
    }

    /// Inverse of [`locate`](Self::locate)
    pub fn virtual_offset_of(&self, region_index: usize, local_offset: GenomicPos) -> VirtResult<GenomicPos> {
        let entry = self
            .entries
            .get(region_index)
            .ok_or_else(|| VirtError::out_of_range(region_index as u64, self.entries.len() as u64))?;
        if local_offset > entry.region.len() {
            return Err(VirtError::out_of_range(
                entry.virtual_offset + local_offset,
                self.virtual_length,
            ));
        }
        Ok(entry.virtual_offset + local_offset)
    }

    /// Real position (sequence id, coordinate) of a virtual offset
    pub fn real_position(&self, virtual_offset: GenomicPos) -> VirtResult<(&str, GenomicPos)> {
        let loc = self.locate(virtual_offset)?;
        let region = &self.entries[loc.region_index].region;
        Ok((region.sequence_id.as_str(), region.start + loc.local_offset))
    }
}
