#![warn(missing_docs)]
//! Font management and glyph paging for the HUD.
//!
//! Everything revolves around the [`FontManager`]: it resolves the platform
//! fallback faces asynchronously at startup, accepts queued font files and
//! streams, and — once all fonts of interest are in — bakes glyph pages that
//! text renderers draw from.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voxelhud_font::FontManager;
//!
//! # async fn start() {
//! let fonts = Arc::new(FontManager::with_system_resolver());
//! fonts.init_fallbacks().await;
//! fonts.queue_font_from_file("fonts/Inter-Regular.ttf").await;
//! fonts.create_glyph_manager().await;
//! // On the rendering thread:
//! let renderer = fonts.active_renderer();
//! # }
//! ```

mod error;
mod face;
mod glyph;
mod manager;
mod renderer;
mod resolver;

pub use error::FontError;
pub use face::{FontFace, FontId, Style, RENDER_SIZE};
pub use glyph::{GlyphInfo, GlyphPage, GlyphPageManager, ASCII_RANGE};
pub use manager::{FontManager, PREFERRED_FAMILY};
pub use renderer::{FontRenderer, GlyphQuad};
pub use resolver::{
    resolve_or_default, FontResolver, Platform, SystemFontResolver, DEFAULT_FAMILY,
};

/// Locate a usable font file for tests; tests skip when none is present.
#[cfg(test)]
pub(crate) fn test_font_data() -> Option<Vec<u8>> {
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/google-noto/NotoSans-Regular.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    CANDIDATES.iter().find_map(|path| std::fs::read(path).ok())
}
