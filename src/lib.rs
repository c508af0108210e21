#![warn(missing_docs)]
//! voxelhud - client-side HUD overlays, font rendering, and debug draw for a
//! voxel engine.
//!
//! Three pieces layered over the host renderer:
//!
//! - **Fonts** ([`voxelhud_font`]): async font registry, per-style metrics,
//!   glyph pages, text layout.
//! - **Draw** ([`voxelhud_draw`]): immediate-mode vertex batching for lines,
//!   quads, debug boxes, and item grids.
//! - **HUD glue** (this crate): configuration plus the composition helpers
//!   that turn text and item grids into submittable batches.
//!
//! # Startup
//!
//! ```rust,no_run
//! # async fn start() {
//! let config = voxelhud::HudConfig::load();
//! let fonts = voxelhud::startup(&config).await;
//! // On the rendering thread, each frame:
//! let renderer = fonts.active_renderer();
//! # }
//! ```

mod config;
mod hud;

pub use config::HudConfig;
pub use hud::{draw_item_grid, draw_text, TextBatches};

pub use voxelhud_draw::{CountLabel, DrawBatch, HudVertex, IconAtlas, ItemGrid, ItemStack};
pub use voxelhud_font::{
    FontFace, FontManager, FontRenderer, GlyphPageManager, Platform, Style, RENDER_SIZE,
};

use std::sync::Arc;
use tracing::info;

/// Version of the voxelhud crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bring the font subsystem up: resolve the fallback faces, queue the
/// configured extra fonts, and bake glyph pages.
///
/// Call once at startup, before the first frame. Fonts queued after this
/// returns are still registered but get no glyph pages.
pub async fn startup(config: &HudConfig) -> Arc<FontManager> {
    let fonts = Arc::new(FontManager::with_system_resolver());
    fonts.init_fallbacks().await;
    for path in &config.extra_fonts {
        fonts.queue_font_from_file(path).await;
    }
    fonts.create_glyph_manager().await;
    info!(faces = fonts.face_count(), "font subsystem ready");
    fonts
}
