//! Regions, region tables and the records produced from them

use crate::error::{VirtError, VirtResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Base coordinate, 0-based
pub type GenomicPos = u64;

/// One contiguous span of a real sequence (0-based, end exclusive)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    /// Chromosome, scaffold or patch name
    pub sequence_id: String,
    /// First base
    pub start: GenomicPos,
    /// One past the last base
    pub end: GenomicPos,
}

impl Region {
    /// Create a region, rejecting empty or inverted spans
    pub fn new<S: Into<String>>(sequence_id: S, start: GenomicPos, end: GenomicPos) -> VirtResult<Self> {
        let region = Self {
            sequence_id: sequence_id.into(),
            start,
            end,
        };
        region.validate()?;
        Ok(region)
    }

    fn validate(&self) -> VirtResult<()> {
        if self.sequence_id.is_empty() {
            return Err(VirtError::invariant(format!(
                "region {}-{} has an empty sequence id",
                self.start, self.end
            )));
        }
        if self.start >= self.end {
            return Err(VirtError::invariant(format!(
                "region {} has start >= end",
                self
            )));
        }
        Ok(())
    }

    /// Number of bases covered
    pub fn len(&self) -> GenomicPos {
        self.end - self.start
    }

    /// Never true for a validated region
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if this region intersects `[start, end)` on `sequence_id`
    pub fn overlaps(&self, sequence_id: &str, start: GenomicPos, end: GenomicPos) -> bool {
        self.sequence_id == sequence_id && self.start < end && start < self.end
    }

    /// Gap between this region and `[start, end)`; zero when they overlap or touch
    pub fn distance_to(&self, start: GenomicPos, end: GenomicPos) -> GenomicPos {
        if end <= self.start {
            self.start - end
        } else if start >= self.end {
            start - self.end
        } else {
            0
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.sequence_id, self.start, self.end)
    }
}

/// Ordered list of regions making up one virtual chromosome
///
/// Immutable once built. Every region is checked for `start < end` on
/// construction; per-sequence ordering is checked separately by
/// [`RegionTable::check_ordering`] so a caller can decide how to fall back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTable {
    regions: Vec<Region>,
}

impl RegionTable {
    /// Create a table, validating each region
    pub fn new(regions: Vec<Region>) -> VirtResult<Self> {
        for region in &regions {
            region.validate()?;
        }
        Ok(Self { regions })
    }

    /// Build a table from `(sequence_id, start, end)` triples
    pub fn from_triples<S, I>(triples: I) -> VirtResult<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, GenomicPos, GenomicPos)>,
    {
        let regions = triples
            .into_iter()
            .map(|(id, start, end)| Region::new(id, start, end))
            .collect::<VirtResult<Vec<_>>>()?;
        Ok(Self { regions })
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True when the table has no regions
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region at `index`, if any
    pub fn get(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    /// Regions in table order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Iterate regions in table order
    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    /// Consume the table
    pub fn into_regions(self) -> Vec<Region> {
        self.regions
    }

    /// Sum of all region lengths
    pub fn total_bases(&self) -> GenomicPos {
        self.regions.iter().map(Region::len).sum()
    }

    /// Verify that within each sequence, regions ascend without overlapping.
    ///
    /// Regions of different sequences may interleave freely. Touching regions
    /// (`prev.end == next.start`) are allowed.
    pub fn check_ordering(&self) -> VirtResult<()> {
        let mut last_by_sequence: HashMap<&str, usize> = HashMap::new();
        for (i, region) in self.regions.iter().enumerate() {
            if let Some(&prev_index) = last_by_sequence.get(region.sequence_id.as_str()) {
                let prev = &self.regions[prev_index];
                if region.start < prev.end {
                    log::warn!(
                        "Region table rejected: region {} ({}) overlaps or precedes region {} ({})",
                        i,
                        region,
                        prev_index,
                        prev
                    );
                    return Err(VirtError::invariant(format!(
                        "region {} ({}) overlaps or precedes region {} ({}) on the same sequence",
                        i, region, prev_index, prev
                    )));
                }
            }
            last_by_sequence.insert(region.sequence_id.as_str(), i);
        }
        Ok(())
    }

    /// Distinct sequence ids in order of first appearance
    pub fn sequence_ids(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for region in &self.regions {
            if !seen.contains(&region.sequence_id.as_str()) {
                seen.push(region.sequence_id.as_str());
            }
        }
        seen
    }

    /// True when every region lies on one sequence
    pub fn is_single_sequence(&self) -> bool {
        match self.regions.first() {
            Some(first) => self
                .regions
                .iter()
                .all(|r| r.sequence_id == first.sequence_id),
            None => false,
        }
    }
}

impl<'a> IntoIterator for &'a RegionTable {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

/// A slice of one region inside a requested virtual range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Real sequence of the originating region
    pub sequence_id: String,
    /// Real start coordinate
    pub real_start: GenomicPos,
    /// Real end coordinate, exclusive
    pub real_end: GenomicPos,
    /// Virtual start offset
    pub virtual_start: GenomicPos,
    /// Virtual end offset, exclusive
    pub virtual_end: GenomicPos,
    /// Index of the originating region in its table
    pub region_index: usize,
    /// Set for regions at odd table indices, used for alternating bands
    pub parity: bool,
}

impl Window {
    /// Number of bases in the window
    pub fn bases(&self) -> GenomicPos {
        self.real_end - self.real_start
    }

    /// Real coordinate of a virtual offset inside this window
    pub fn real_at(&self, virtual_offset: GenomicPos) -> Option<GenomicPos> {
        if virtual_offset < self.virtual_start || virtual_offset > self.virtual_end {
            return None;
        }
        Some(self.real_start + (virtual_offset - self.virtual_start))
    }
}

/// A range in virtual space found for a real-coordinate query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionMatch {
    /// Virtual start, clamped to the virtual space
    pub virtual_start: i64,
    /// Virtual end, exclusive
    pub virtual_end: i64,
}

impl PositionMatch {
    /// Create a match from its bounds
    pub fn new(virtual_start: i64, virtual_end: i64) -> Self {
        Self {
            virtual_start,
            virtual_end,
        }
    }

    /// Width in bases
    pub fn len(&self) -> i64 {
        self.virtual_end - self.virtual_start
    }

    /// True when clamping left nothing
    pub fn is_empty(&self) -> bool {
        self.virtual_end <= self.virtual_start
    }
}

/// Lookup of real sequence lengths, used to clip padding
pub trait SequenceSizes {
    /// Length of `sequence_id`, if known
    fn sequence_size(&self, sequence_id: &str) -> Option<GenomicPos>;
}

impl SequenceSizes for HashMap<String, GenomicPos> {
    fn sequence_size(&self, sequence_id: &str) -> Option<GenomicPos> {
        self.get(sequence_id).copied()
    }
}

impl SequenceSizes for BTreeMap<String, GenomicPos> {
    fn sequence_size(&self, sequence_id: &str) -> Option<GenomicPos> {
        self.get(sequence_id).copied()
    }
}

impl<T: SequenceSizes + ?Sized> SequenceSizes for &T {
    fn sequence_size(&self, sequence_id: &str) -> Option<GenomicPos> {
        (**self).sequence_size(sequence_id)
    }
}

/// Trait for strategies that produce the interval list of a virtual chromosome
///
/// Implementations (exon extraction, BED uploads, haplotype placement, ...)
/// live outside this crate; they must hand back regions that ascend without
/// overlap within each sequence.
pub trait RegionSource {
    /// Produce the ordered regions for one view
    fn regions(&self) -> VirtResult<Vec<Region>>;

    /// Get the name/identifier of this strategy
    fn name(&self) -> &str;
}

/// A fixed, caller-supplied list of regions
#[derive(Debug, Clone)]
pub struct StaticRegions {
    name: String,
    regions: Vec<Region>,
}

impl StaticRegions {
    /// Wrap `regions` under a source name
    pub fn new<S: Into<String>>(name: S, regions: Vec<Region>) -> Self {
        Self {
            name: name.into(),
            regions,
        }
    }
}

impl RegionSource for StaticRegions {
    fn regions(&self) -> VirtResult<Vec<Region>> {
        Ok(self.regions.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
