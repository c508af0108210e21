//! Font faces and per-style metrics.
//!
//! A [`FontFace`] binds one font family, at the fixed HUD render size, to up
//! to four style variants. Each populated variant is a [`FontId`]: the parsed
//! native font plus its measured line metrics. Faces are immutable once
//! constructed; the only late-bound piece is the text renderer, which is
//! built lazily on the render thread and cached on the face.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::error::FontError;
use crate::glyph::GlyphPageManager;
use crate::renderer::FontRenderer;
use crate::resolver::FontResolver;

/// Fixed render size for every face, in pixels.
///
/// The text renderer does not support runtime resizing, so all metrics and
/// glyph pages are produced at this one size.
pub const RENDER_SIZE: f32 = 43.0;

/// Glyph rasterized while measuring a style, to reject fonts that parse but
/// cannot produce bitmaps at the fixed size.
const PROBE_GLYPH: char = 'A';

/// Style variant of a face, used as an index into the face's style slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// Regular weight, upright.
    Plain = 0,
    /// Bold weight, upright.
    Bold = 1,
    /// Regular weight, italic.
    Italic = 2,
    /// Bold weight, italic.
    BoldItalic = 3,
}

impl Style {
    /// All four styles, in slot order.
    pub const ALL: [Style; 4] = [Style::Plain, Style::Bold, Style::Italic, Style::BoldItalic];

    /// Slot index of this style (0-3).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Style::index`].
    pub fn from_index(index: usize) -> Option<Style> {
        Style::ALL.get(index).copied()
    }

    /// Whether the bold style bit is set.
    pub fn is_bold(self) -> bool {
        matches!(self, Style::Bold | Style::BoldItalic)
    }

    /// Whether the italic style bit is set.
    pub fn is_italic(self) -> bool {
        matches!(self, Style::Italic | Style::BoldItalic)
    }
}

/// One measured style variant: the parsed font plus its line metrics at
/// [`RENDER_SIZE`]. Immutable after creation.
#[derive(Clone)]
pub struct FontId {
    style: Style,
    font: Arc<fontdue::Font>,
    height: f32,
    ascent: f32,
}

impl FontId {
    fn new(style: Style, font: Arc<fontdue::Font>, height: f32, ascent: f32) -> Self {
        Self {
            style,
            font,
            height,
            ascent,
        }
    }

    /// Style this variant was measured as.
    pub fn style(&self) -> Style {
        self.style
    }

    /// Parsed native font backing this variant.
    pub fn font(&self) -> &Arc<fontdue::Font> {
        &self.font
    }

    /// Line height in pixels at the fixed render size.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Ascent in pixels at the fixed render size.
    pub fn ascent(&self) -> f32 {
        self.ascent
    }
}

impl PartialEq for FontId {
    fn eq(&self, other: &Self) -> bool {
        self.style == other.style
            && self.height.to_bits() == other.height.to_bits()
            && self.ascent.to_bits() == other.ascent.to_bits()
            && Arc::ptr_eq(&self.font, &other.font)
    }
}

impl Eq for FontId {}

impl std::hash::Hash for FontId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.style.hash(state);
        self.height.to_bits().hash(state);
        self.ascent.to_bits().hash(state);
        (Arc::as_ptr(&self.font) as usize).hash(state);
    }
}

impl std::fmt::Debug for FontId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontId")
            .field("style", &self.style)
            .field("height", &self.height)
            .field("ascent", &self.ascent)
            .finish_non_exhaustive()
    }
}

/// A font family bound to up to four measured style variants at one fixed
/// render size.
///
/// Slot 0 (plain) is always populated by the time a face is observable;
/// consumers fall back to it when another slot is absent. Equality and hash
/// are structural over `(name, size, file, styles)`; the cached renderer is
/// excluded.
pub struct FontFace {
    name: String,
    size: f32,
    file: Option<PathBuf>,
    styles: [Option<FontId>; 4],
    renderer: OnceLock<FontRenderer>,
}

impl FontFace {
    pub(crate) fn from_parts(
        name: String,
        file: Option<PathBuf>,
        styles: [Option<FontId>; 4],
    ) -> Self {
        debug_assert!(styles[0].is_some(), "face constructed without a plain style");
        Self {
            name,
            size: RENDER_SIZE,
            file,
            styles,
            renderer: OnceLock::new(),
        }
    }

    /// Construct a face for a system family, deriving and measuring all four
    /// style variants on the worker pool.
    ///
    /// Style variants that cannot be resolved on their own fall back to the
    /// plain variant's data but keep their own slot. Returns an error only if
    /// the plain variant itself cannot be resolved or measured.
    pub async fn of_system(
        name: &str,
        resolver: Arc<dyn FontResolver>,
    ) -> Result<FontFace, FontError> {
        let mut tasks = Vec::with_capacity(Style::ALL.len());
        for style in Style::ALL {
            let resolver = resolver.clone();
            let family = name.to_string();
            tasks.push(tokio::task::spawn_blocking(move || {
                let data = match resolver.resolve(&family, style) {
                    Ok(data) => data,
                    // Missing bold/italic variants reuse the plain data.
                    Err(_) if style != Style::Plain => resolver.resolve(&family, Style::Plain)?,
                    Err(err) => return Err(err),
                };
                measure_style(data, style)
            }));
        }

        let mut styles: [Option<FontId>; 4] = [None, None, None, None];
        for (task, style) in tasks.into_iter().zip(Style::ALL) {
            let id = task
                .await
                .map_err(|err| FontError::Task(err.to_string()))??;
            styles[style.index()] = Some(id);
        }

        debug!(family = name, "measured system font face");
        Ok(FontFace::from_parts(name.to_string(), None, styles))
    }

    /// Construct a single-style face from raw TrueType data, registered under
    /// the font's self-reported family name.
    ///
    /// Only the plain slot is filled; externally supplied fonts do not get
    /// derived bold/italic variants.
    pub(crate) async fn of_data(
        data: Vec<u8>,
        file: Option<PathBuf>,
    ) -> Result<FontFace, FontError> {
        tokio::task::spawn_blocking(move || {
            let name = reported_family(data.clone()).ok_or_else(|| FontError::Malformed {
                reason: "font reports no family name".to_string(),
            })?;
            let plain = measure_style(data, Style::Plain)?;
            debug!(family = name.as_str(), "measured queued font face");
            Ok(FontFace::from_parts(name, file, [Some(plain), None, None, None]))
        })
        .await
        .map_err(|err| FontError::Task(err.to_string()))?
    }

    /// Family name this face is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fixed render size of this face, in pixels.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Origin file for queued fonts; absent for system and stream fonts.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Measured variant for `style`, if that slot was filled.
    pub fn style(&self, style: Style) -> Option<&FontId> {
        self.styles[style.index()].as_ref()
    }

    /// Measured variant for `style`, falling back to the plain slot.
    pub fn style_or_plain(&self, style: Style) -> &FontId {
        self.styles[style.index()]
            .as_ref()
            .or(self.styles[0].as_ref())
            .expect("font face has no plain style")
    }

    /// All four style slots, in slot order.
    pub fn styles(&self) -> &[Option<FontId>; 4] {
        &self.styles
    }

    /// The face's text renderer, built on first access and cached for the
    /// face's lifetime.
    ///
    /// Construction must only happen on the rendering thread; the thread
    /// check lives in `FontManager::active_renderer`.
    pub fn renderer(&self, glyphs: &Arc<GlyphPageManager>) -> &FontRenderer {
        self.renderer
            .get_or_init(|| FontRenderer::new(self, glyphs.clone()))
    }
}

impl PartialEq for FontFace {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.size.to_bits() == other.size.to_bits()
            && self.file == other.file
            && self.styles == other.styles
    }
}

impl Eq for FontFace {}

impl std::hash::Hash for FontFace {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.size.to_bits().hash(state);
        self.file.hash(state);
        self.styles.hash(state);
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("file", &self.file)
            .field("styles", &self.styles)
            .finish_non_exhaustive()
    }
}

/// Parse font data and measure its line metrics at [`RENDER_SIZE`].
///
/// Rasterizes a probe glyph so fonts that parse but cannot produce bitmaps
/// are rejected here rather than at draw time.
fn measure_style(data: Vec<u8>, style: Style) -> Result<FontId, FontError> {
    let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
        .map_err(|reason| FontError::Malformed {
            reason: reason.to_string(),
        })?;

    let (probe, _) = font.rasterize(PROBE_GLYPH, RENDER_SIZE);
    let (height, ascent) = match font.horizontal_line_metrics(RENDER_SIZE) {
        Some(line) => (line.new_line_size, line.ascent),
        // Fonts without horizontal metrics: size off the probe glyph.
        None => (probe.height as f32, probe.height as f32),
    };

    Ok(FontId::new(style, Arc::new(font), height, ascent))
}

/// Read the self-reported family name out of raw font data.
///
/// A single file can report a compound family+style name; whatever it reports
/// is the registry key.
fn reported_family(data: Vec<u8>) -> Option<String> {
    let mut db = fontdb::Database::new();
    db.load_font_data(data);
    let face = db.faces().next()?;
    match face.families.first() {
        Some((family, _)) => Some(family.clone()),
        None if !face.post_script_name.is_empty() => Some(face.post_script_name.clone()),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_index_round_trip() {
        for style in Style::ALL {
            assert_eq!(Style::from_index(style.index()), Some(style));
        }
        assert_eq!(Style::from_index(4), None);
    }

    #[test]
    fn test_style_bits() {
        assert!(!Style::Plain.is_bold() && !Style::Plain.is_italic());
        assert!(Style::Bold.is_bold() && !Style::Bold.is_italic());
        assert!(!Style::Italic.is_bold() && Style::Italic.is_italic());
        assert!(Style::BoldItalic.is_bold() && Style::BoldItalic.is_italic());
    }

    #[test]
    fn test_face_structural_equality() {
        let Some(data) = crate::test_font_data() else {
            eprintln!("no system font available, skipping");
            return;
        };

        let plain = measure_style(data, Style::Plain).expect("system font should parse");
        let styles = [Some(plain), None, None, None];

        let a = FontFace::from_parts("Test".to_string(), None, styles.clone());
        let b = FontFace::from_parts("Test".to_string(), None, styles.clone());
        assert_eq!(a, b);

        let c = FontFace::from_parts("Other".to_string(), None, styles);
        assert_ne!(a, c);
    }

    #[test]
    fn test_reported_family_rejects_garbage() {
        assert_eq!(reported_family(vec![0u8; 64]), None);
    }
}
