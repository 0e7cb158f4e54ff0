//! Acquisition and redraw scheduling for threshold overlays.
//!
//! - [`loader`]: async source acquisition (files, memory)
//! - [`codec`]: raster ⇄ image conversion through the `image` crate
//! - [`redraw`]: one pipeline per redraw request, latest request wins

pub mod codec;
pub mod loader;
pub mod redraw;

pub use loader::{acquire_pair, FileLoader, MemoryLoader, SourceLoader, SourcePair};
pub use redraw::{
    DeliveredFrame, RedrawHandle, RedrawOutcome, RedrawRequest, RedrawScheduler, RequestId,
};
