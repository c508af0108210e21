//! Text shaping and layout over baked glyph pages.

use std::sync::Arc;

use crate::face::{FontFace, FontId, Style};
use crate::glyph::GlyphPageManager;

/// Positioned glyph produced by layout, ready to be turned into a textured
/// quad against the glyph page it references.
#[derive(Debug, Clone, Copy)]
pub struct GlyphQuad {
    /// Source character.
    pub ch: char,
    /// Glyph page holding the bitmap.
    pub page: usize,
    /// Quad origin, relative to the layout origin (y grows downward).
    pub x: f32,
    /// Quad origin, relative to the layout origin (y grows downward).
    pub y: f32,
    /// Quad width in pixels.
    pub width: f32,
    /// Quad height in pixels.
    pub height: f32,
    /// Normalized texture coordinates into the page.
    pub uv_min: (f32, f32),
    /// Normalized texture coordinates into the page.
    pub uv_max: (f32, f32),
}

/// Lays out and measures text for one face.
///
/// Built lazily on the rendering thread via `FontFace::renderer` and cached
/// on the face; the handle itself is cheap to clone.
#[derive(Clone)]
pub struct FontRenderer {
    face_name: String,
    styles: [Option<FontId>; 4],
    glyphs: Arc<GlyphPageManager>,
}

impl FontRenderer {
    pub(crate) fn new(face: &FontFace, glyphs: Arc<GlyphPageManager>) -> Self {
        Self {
            face_name: face.name().to_string(),
            styles: face.styles().clone(),
            glyphs,
        }
    }

    /// Name of the face this renderer draws with.
    pub fn face_name(&self) -> &str {
        &self.face_name
    }

    /// Lay out `text` in the given style, one quad per drawable glyph.
    ///
    /// Coordinates are relative to the layout origin with y growing downward;
    /// `\n` starts a new line. Characters no glyph source covers are skipped.
    pub fn layout(&self, text: &str, style: Style) -> Vec<GlyphQuad> {
        let id = self.font_id(style);
        let mut quads = Vec::with_capacity(text.len());
        let mut cursor_x = 0.0f32;
        let mut baseline = id.ascent();

        for ch in text.chars() {
            if ch == '\n' {
                cursor_x = 0.0;
                baseline += id.height();
                continue;
            }

            if let Some(glyph) = self.glyphs.glyph(&self.face_name, style, ch) {
                quads.push(GlyphQuad {
                    ch,
                    page: glyph.page,
                    x: cursor_x + glyph.bearing_x,
                    y: baseline - (glyph.bearing_y + glyph.height as f32),
                    width: glyph.width as f32,
                    height: glyph.height as f32,
                    uv_min: glyph.uv_min,
                    uv_max: glyph.uv_max,
                });
                cursor_x += glyph.advance_width;
            }
        }

        quads
    }

    /// Width of `text` when rendered, the widest line for multi-line input.
    pub fn measure(&self, text: &str, style: Style) -> f32 {
        let mut widest = 0.0f32;
        let mut line = 0.0f32;

        for ch in text.chars() {
            if ch == '\n' {
                widest = widest.max(line);
                line = 0.0;
                continue;
            }
            if let Some(glyph) = self.glyphs.glyph(&self.face_name, style, ch) {
                line += glyph.advance_width;
            }
        }

        widest.max(line)
    }

    /// Line height for the given style, in pixels.
    pub fn line_height(&self, style: Style) -> f32 {
        self.font_id(style).height()
    }

    /// Ascent for the given style, in pixels.
    pub fn ascent(&self, style: Style) -> f32 {
        self.font_id(style).ascent()
    }

    /// Metrics for `style`, falling back to the plain slot.
    fn font_id(&self, style: Style) -> &FontId {
        self.styles[style.index()]
            .as_ref()
            .or(self.styles[Style::Plain.index()].as_ref())
            .expect("font face has no plain style")
    }
}
