#![warn(missing_docs)]
//! Immediate-mode drawing helpers for HUD overlays and debug rendering.
//!
//! Thin, CPU-side glue over the host renderer: geometry is accumulated into
//! vertex buffers the host uploads and submits with its own pipelines.

mod batch;
mod item_grid;

pub use batch::{DrawBatch, HudVertex, WHITE_UV};
pub use item_grid::{CountLabel, IconAtlas, ItemGrid, ItemStack};
