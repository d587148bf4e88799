//! Proportional pixel allocation across materialized windows

use crate::types::{GenomicPos, Window};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A window with its horizontal screen placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelWindow {
    /// Materialized window
    pub window: Window,
    /// First screen column
    pub pixel_offset: u32,
    /// Columns assigned to this window, at least one
    pub pixel_width: u32,
}

impl PixelWindow {
    /// One past the last screen column
    pub fn pixel_end(&self) -> u32 {
        self.pixel_offset.saturating_add(self.pixel_width)
    }
}

/// Split `pixel_budget` across `windows` in proportion to their base counts.
///
/// Windows are laid out left to right from `origin`; offsets saturate at
/// `u32::MAX`. Each gets
/// `round(bases * pixels_per_base)` pixels, cut back to whatever budget remains
/// so the total never exceeds `pixel_budget`. Windows left with less than one
/// pixel are dropped. Rounding drift is not redistributed.
pub fn allocate(windows: Vec<Window>, pixel_budget: u32, origin: u32) -> Vec<PixelWindow> {
    let total_bases: GenomicPos = windows.iter().map(Window::bases).sum();
    if total_bases == 0 || pixel_budget == 0 {
        return Vec::new();
    }
    let pixels_per_base = pixel_budget as f64 / total_bases as f64;

    let mut used: u32 = 0;
    let mut dropped = 0usize;
    let mut placed = Vec::with_capacity(windows.len());
    for window in windows {
        let ideal = (window.bases() as f64 * pixels_per_base).round();
        let width = (ideal as u32).min(pixel_budget - used);
        if width < 1 {
            dropped += 1;
            continue;
        }
        placed.push(PixelWindow {
            window,
            pixel_offset: origin.saturating_add(used),
            pixel_width: width,
        });
        used += width;
    }

    if dropped > 0 {
        log::debug!(
            "Dropped {} sub-pixel windows ({:.4} pixels per base)",
            dropped,
            pixels_per_base
        );
    }

    placed
}

/// Virtual offset under screen column `x`, if any window covers it
pub fn pixel_to_virtual(windows: &[PixelWindow], x: u32) -> Option<GenomicPos> {
    let pw = windows
        .iter()
        .find(|pw| x >= pw.pixel_offset && x < pw.pixel_end())?;
    let column = (x - pw.pixel_offset) as u128;
    let delta = (column * pw.window.bases() as u128 / pw.pixel_width as u128) as GenomicPos;
    Some(pw.window.virtual_start + delta.min(pw.window.bases().saturating_sub(1)))
}

/// Screen x (fractional) of a virtual offset, if a kept window contains it
pub fn virtual_to_pixel(windows: &[PixelWindow], virtual_offset: GenomicPos) -> Option<f64> {
    let last = windows.last()?;
    let pw = windows
        .iter()
        .find(|pw| {
            virtual_offset >= pw.window.virtual_start && virtual_offset < pw.window.virtual_end
        })
        .or_else(|| (virtual_offset == last.window.virtual_end).then_some(last))?;
    let fraction =
        (virtual_offset - pw.window.virtual_start) as f64 / pw.window.bases() as f64;
    Some(pw.pixel_offset as f64 + fraction * pw.pixel_width as f64)
}

/// Serialize an allocated layout for hand-off to the renderer
pub fn to_json(windows: &[PixelWindow]) -> serde_json::Result<String> {
    serde_json::to_string(windows)
}

/// Run `f` over every allocated window in parallel, returning results in window order.
///
/// Takes a finished allocation: window identities and offsets are fixed
/// before any per-window work starts.
pub fn fan_out<T, F>(windows: &[PixelWindow], f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&PixelWindow) -> T + Sync + Send,
{
    windows.par_iter().map(f).collect()
}
