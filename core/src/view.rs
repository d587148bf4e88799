//! Per-request virtual view
//!
//! Wires region collection, validation, padding and indexing together and
//! exposes the forward and reverse operations with the configured policy.
//! A view is built once per request and never mutated afterwards.

use crate::config::VirtConfig;
use crate::disguise::{disguise_position, undisguise_position};
use crate::error::{VirtError, VirtResult};
use crate::highlight;
use crate::index::VirtualIndex;
use crate::padding::pad;
use crate::pixels::{allocate, PixelWindow};
use crate::position::{Position, PositionCodec};
use crate::reverse::locate_real;
use crate::types::{GenomicPos, PositionMatch, Region, RegionSource, RegionTable, SequenceSizes, Window};
use crate::windows::make_windows_limited;

/// Validated, padded and indexed regions for one request, with its config
#[derive(Debug, Clone)]
pub struct VirtualView {
    config: VirtConfig,
    codec: PositionCodec,
    index: VirtualIndex,
    source_name: String,
}

impl VirtualView {
    /// Collect regions from `source`, validate, pad and index them.
    ///
    /// `InvariantViolation` means the source broke the ordering contract; the
    /// caller should fall back to [`VirtualView::single_region`].
    pub fn build<S: SequenceSizes + ?Sized>(
        source: &dyn RegionSource,
        sizes: &S,
        config: VirtConfig,
    ) -> VirtResult<Self> {
        let table = RegionTable::new(source.regions()?)?;
        log::debug!(
            "Building virtual view from '{}' with {} regions",
            source.name(),
            table.len()
        );
        Self::from_table(source.name(), table, sizes, config)
    }

    /// Validate, pad and index an already collected table
    pub fn from_table<S: SequenceSizes + ?Sized>(
        source_name: &str,
        table: RegionTable,
        sizes: &S,
        config: VirtConfig,
    ) -> VirtResult<Self> {
        table.check_ordering()?;
        let table = if config.pad_amount > 0 {
            pad(&table, config.pad_amount, sizes)?
        } else {
            table
        };
        let index = VirtualIndex::build(table)?;

        log::info!(
            "Virtual view '{}': {} regions, {} bases",
            source_name,
            index.len(),
            index.virtual_length()
        );

        Ok(Self {
            codec: PositionCodec::new(config.virtual_name.clone()),
            config,
            index,
            source_name: source_name.to_string(),
        })
    }

    /// Plain one-region view, used when a source's regions are rejected
    pub fn single_region(region: Region, config: VirtConfig) -> VirtResult<Self> {
        let table = RegionTable::new(vec![region])?;
        Ok(Self {
            codec: PositionCodec::new(config.virtual_name.clone()),
            config,
            index: VirtualIndex::build(table)?,
            source_name: "default".to_string(),
        })
    }

    /// Underlying index
    pub fn index(&self) -> &VirtualIndex {
        &self.index
    }

    /// Configuration the view was built with
    pub fn config(&self) -> &VirtConfig {
        &self.config
    }

    /// Position codec using the configured virtual name
    pub fn codec(&self) -> &PositionCodec {
        &self.codec
    }

    /// Name of the region source
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Total bases in the view
    pub fn virtual_length(&self) -> GenomicPos {
        self.index.virtual_length()
    }

    /// Windows covering `[start, end)`, capped at `max_windows`
    pub fn windows(&self, start: GenomicPos, end: GenomicPos) -> VirtResult<Vec<Window>> {
        make_windows_limited(&self.index, start, end, self.config.max_windows)
    }

    /// Materialize and lay out `[start, end)` across `pixel_budget` pixels
    pub fn allocate(
        &self,
        start: GenomicPos,
        end: GenomicPos,
        pixel_budget: u32,
    ) -> VirtResult<Vec<PixelWindow>> {
        let windows = self.windows(start, end)?;
        Ok(allocate(windows, pixel_budget, self.config.label_width))
    }

    /// Merged virtual matches for a real range, with the configured fallback
    pub fn locate_real(&self, sequence_id: &str, start: GenomicPos, end: GenomicPos) -> Vec<PositionMatch> {
        locate_real(&self.index, sequence_id, start, end, self.config.nearest_fallback)
    }

    /// Undisguised display string
    pub fn format_virtual(&self, start: GenomicPos, end: GenomicPos) -> String {
        self.codec.format_virtual(start, end)
    }

    /// User-visible position string, disguised when enabled and unambiguous
    pub fn display_position(&self, start: GenomicPos, end: GenomicPos) -> VirtResult<String> {
        if end > self.virtual_length() {
            return Err(VirtError::out_of_range(end, self.virtual_length()));
        }
        if self.config.disguise {
            disguise_position(&self.index, &self.codec, start, end)
        } else if start < end {
            Ok(self.format_virtual(start, end))
        } else {
            Err(VirtError::empty_range(start, end))
        }
    }

    /// Interpret a user-entered or saved position string
    pub fn resolve_position(&self, input: &str) -> VirtResult<Position> {
        if self.config.disguise {
            undisguise_position(&self.index, &self.codec, input, self.config.nearest_fallback)
        } else {
            self.codec.parse(input)
        }
    }

    /// Fit a requested range into `[0, virtual_length]`.
    ///
    /// The range keeps its width where possible, sliding back inside the
    /// space; a range wider than the space becomes the whole space. Inverted
    /// bounds are swapped and an empty range widens to one base.
    pub fn clamp(&self, start: i64, end: i64) -> (GenomicPos, GenomicPos) {
        let length = self.virtual_length() as i64;
        let (start, end) = match start.cmp(&end) {
            std::cmp::Ordering::Less => (start, end),
            std::cmp::Ordering::Equal => (start, start.saturating_add(1)),
            std::cmp::Ordering::Greater => (end, start),
        };
        let width = end.saturating_sub(start);
        if width >= length {
            return (0, length as GenomicPos);
        }
        let (s, e) = if start < 0 {
            (0, width)
        } else if end > length {
            (length - width, length)
        } else {
            (start, end)
        };
        (s as GenomicPos, e as GenomicPos)
    }

    /// Translate a real highlight list into virtual coordinates
    pub fn highlights_to_virtual(&self, db: &str, value: &str) -> VirtResult<String> {
        highlight::to_virtual(&self.index, &self.codec, db, value, self.config.nearest_fallback)
    }

    /// Translate a virtual highlight list back to real coordinates
    pub fn highlights_to_real(&self, db: &str, value: &str) -> VirtResult<String> {
        highlight::to_real(&self.index, &self.codec, db, value)
    }
}
