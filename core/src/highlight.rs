//! Saved highlight translation
//!
//! Highlights are stored as `|`-separated items of the form
//! `db.name:start-end[#rrggbb]`. Entering or leaving a virtual view rewrites
//! the items of the current database between real and virtual coordinates.

use crate::error::{VirtError, VirtResult};
use crate::index::VirtualIndex;
use crate::position::{format_range, parse_range, PositionCodec};
use crate::reverse::locate_real;
use crate::types::GenomicPos;
use crate::windows::make_windows;
use regex::Regex;
use std::sync::OnceLock;

fn item_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<db>[^.:|#]+)\.(?P<pos>[^|#]+)(?:#(?P<color>[0-9A-Fa-f]{6}))?$")
            .expect("highlight pattern is valid")
    })
}

/// One highlighted range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    /// Assembly prefix, e.g. `hg38`
    pub db: String,
    /// Sequence name, or the virtual name for virtual highlights
    pub name: String,
    /// 0-based start
    pub start: GenomicPos,
    /// Exclusive end
    pub end: GenomicPos,
    /// `rrggbb` without the leading `#`
    pub color: Option<String>,
}

impl Highlight {
    /// Parse one `db.name:start-end[#rrggbb]` item
    pub fn parse(item: &str) -> VirtResult<Self> {
        let item = item.trim();
        let caps = item_pattern()
            .captures(item)
            .ok_or_else(|| VirtError::malformed(item, "expected 'db.name:start-end[#rrggbb]'"))?;
        let (name, start, end) = parse_range(&caps["pos"])?;
        Ok(Self {
            db: caps["db"].to_string(),
            name,
            start,
            end,
            color: caps.name("color").map(|c| c.as_str().to_string()),
        })
    }

    fn with_range(&self, name: &str, start: GenomicPos, end: GenomicPos) -> Self {
        Self {
            db: self.db.clone(),
            name: name.to_string(),
            start,
            end,
            color: self.color.clone(),
        }
    }
}

impl std::fmt::Display for Highlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.db, format_range(&self.name, self.start, self.end))?;
        if let Some(color) = &self.color {
            write!(f, "#{}", color)?;
        }
        Ok(())
    }
}

/// Parse a `|`-separated highlight list; empty items are skipped
pub fn parse_highlights(value: &str) -> VirtResult<Vec<Highlight>> {
    value
        .split('|')
        .filter(|item| !item.trim().is_empty())
        .map(Highlight::parse)
        .collect()
}

/// Join highlights back into a `|`-separated list
pub fn format_highlights(highlights: &[Highlight]) -> String {
    highlights
        .iter()
        .map(Highlight::to_string)
        .collect::<Vec<_>>()
        .join("|")
}

/// Rewrite real highlights of `db` into virtual ones.
///
/// Each real item becomes one item per merged virtual match. Items of other
/// databases, items already virtual, and items with no match are kept as is.
pub fn to_virtual(
    index: &VirtualIndex,
    codec: &PositionCodec,
    db: &str,
    value: &str,
    nearest_fallback: bool,
) -> VirtResult<String> {
    let mut out = Vec::new();
    for highlight in parse_highlights(value)? {
        if highlight.db != db || highlight.name == codec.virtual_name() {
            out.push(highlight);
            continue;
        }
        let matches = locate_real(
            index,
            &highlight.name,
            highlight.start,
            highlight.end,
            nearest_fallback,
        );
        if matches.is_empty() {
            out.push(highlight);
            continue;
        }
        out.extend(matches.iter().filter(|m| !m.is_empty()).map(|m| {
            highlight.with_range(
                codec.virtual_name(),
                m.virtual_start as GenomicPos,
                m.virtual_end as GenomicPos,
            )
        }));
    }
    Ok(format_highlights(&out))
}

/// Rewrite virtual highlights of `db` into real ones.
///
/// Each virtual item becomes one real item per run of windows that are
/// contiguous on a sequence. Virtual items are clipped to the virtual space
/// and dropped if nothing remains.
pub fn to_real(
    index: &VirtualIndex,
    codec: &PositionCodec,
    db: &str,
    value: &str,
) -> VirtResult<String> {
    let mut out = Vec::new();
    for highlight in parse_highlights(value)? {
        if highlight.db != db || highlight.name != codec.virtual_name() {
            out.push(highlight);
            continue;
        }
        let end = highlight.end.min(index.virtual_length());
        if highlight.start >= end {
            log::debug!("Dropping highlight {} outside the virtual space", highlight);
            continue;
        }

        let mut runs: Vec<Highlight> = Vec::new();
        for window in make_windows(index, highlight.start, end)? {
            match runs.last_mut() {
                Some(run) if run.name == window.sequence_id && run.end == window.real_start => {
                    run.end = window.real_end
                }
                _ => runs.push(highlight.with_range(
                    &window.sequence_id,
                    window.real_start,
                    window.real_end,
                )),
            }
        }
        out.extend(runs);
    }
    Ok(format_highlights(&out))
}
