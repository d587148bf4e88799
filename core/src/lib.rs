// VChrom Core Library
// Virtual chromosome coordinate engine for multi-region genome views

#![warn(missing_docs)]

//! VChrom Core
//!
//! Presents an ordered list of real genomic intervals as one continuous
//! virtual chromosome: builds the virtual coordinate space, materializes
//! windows for a virtual range, spreads a pixel budget across them, and
//! translates positions between virtual and real coordinates.

/// Error taxonomy
pub mod error;

/// View configuration
pub mod config;

/// Regions, region tables and derived records
pub mod types;

/// Prefix-sum index over a region table
pub mod index;

/// Window materialization
pub mod windows;

/// Pixel allocation across windows
pub mod pixels;

/// Interval padding
pub mod padding;

/// Real-to-virtual lookup
pub mod reverse;

/// Position string codec
pub mod position;

/// Disguising virtual positions as real ones
pub mod disguise;

/// Highlight translation
pub mod highlight;

/// Per-request virtual view
pub mod view;

// Re-export commonly used types
pub use config::VirtConfig;
pub use error::{VirtError, VirtResult};
pub use index::{Location, VirtualIndex};
pub use pixels::PixelWindow;
pub use position::{Position, PositionCodec};
pub use types::{
    PositionMatch, Region, RegionSource, RegionTable, SequenceSizes, StaticRegions, Window,
};
pub use view::VirtualView;

/// Version information for the VChrom core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
