//! Glyph page management.
//!
//! Consumes the registry's faces at the cutover point and bakes grayscale
//! glyph pages from them. ASCII glyphs are baked eagerly, one page per face
//! and style; anything outside that range is rasterized on demand into
//! shared overflow pages. Lookups fall back from the requested style to the
//! plain style, then to the optional CJK supplement.
//!
//! Pages are CPU-side bitmaps; uploading them is the host's business.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::{Arc, Mutex, RwLock};

use tracing::{debug, info};

use crate::face::{FontFace, Style, RENDER_SIZE};

/// Character range baked eagerly for every face.
pub const ASCII_RANGE: Range<u32> = 32..127;

/// Maximum width of an eagerly-baked page.
const MAX_PAGE_WIDTH: u32 = 2048;

/// Padding around each glyph, in pixels.
const PAGE_PADDING: u32 = 2;

/// Edge length of the square overflow pages used for on-demand glyphs.
const OVERFLOW_PAGE_SIZE: u32 = 1024;

/// Placement and metrics of one baked glyph.
#[derive(Debug, Clone, Copy)]
pub struct GlyphInfo {
    /// Index of the page holding this glyph.
    pub page: usize,
    /// Position in the page, in pixels.
    pub atlas_x: u32,
    /// Position in the page, in pixels.
    pub atlas_y: u32,
    /// Bitmap width in pixels.
    pub width: u32,
    /// Bitmap height in pixels.
    pub height: u32,
    /// Horizontal advance for layout.
    pub advance_width: f32,
    /// Horizontal offset from the pen position to the bitmap.
    pub bearing_x: f32,
    /// Vertical offset from the baseline to the bitmap's bottom edge.
    pub bearing_y: f32,
    /// Normalized texture coordinates (0.0 to 1.0).
    pub uv_min: (f32, f32),
    /// Normalized texture coordinates (0.0 to 1.0).
    pub uv_max: (f32, f32),
}

/// One grayscale glyph page.
pub struct GlyphPage {
    /// Page texture data, one byte per pixel.
    pub texture_data: Vec<u8>,
    /// Page width in pixels.
    pub width: u32,
    /// Page height in pixels.
    pub height: u32,
}

/// Glyph source for one style slot of one face.
struct StyleGlyphs {
    font: Arc<fontdue::Font>,
    /// `None` entries record characters the font has no glyph for.
    cache: RwLock<HashMap<char, Option<GlyphInfo>>>,
}

/// All style slots of one face.
struct FaceSource {
    styles: [Option<StyleGlyphs>; 4],
}

/// Cursor into the currently-open overflow page.
struct PackCursor {
    page: Option<usize>,
    x: u32,
    y: u32,
    row_height: u32,
}

/// Bakes and serves glyph pages for a fixed set of faces.
///
/// Built exactly once, from the faces registered at that moment; fonts queued
/// later do not appear in the pages.
pub struct GlyphPageManager {
    faces: HashMap<String, FaceSource>,
    supplement: Option<FaceSource>,
    pages: RwLock<Vec<GlyphPage>>,
    cursor: Mutex<PackCursor>,
}

impl GlyphPageManager {
    /// Bake eager pages for `faces`, with `supplement` as the last-resort
    /// glyph source (typically the CJK fallback face).
    pub fn new(faces: &[Arc<FontFace>], supplement: Option<&Arc<FontFace>>) -> Self {
        let mut pages = Vec::new();
        let mut sources = HashMap::new();

        for face in faces {
            sources.insert(face.name().to_string(), bake_face(face, &mut pages));
        }
        let supplement = supplement.map(|face| bake_face(face, &mut pages));

        info!(
            faces = sources.len(),
            pages = pages.len(),
            "baked glyph pages"
        );

        Self {
            faces: sources,
            supplement,
            pages: RwLock::new(pages),
            cursor: Mutex::new(PackCursor {
                page: None,
                x: PAGE_PADDING,
                y: PAGE_PADDING,
                row_height: 0,
            }),
        }
    }

    /// Look up the glyph for `ch` in the named face and style.
    ///
    /// Falls back from the requested style to the plain style, then to the
    /// supplementary face. Returns `None` when no source has the character.
    pub fn glyph(&self, face: &str, style: Style, ch: char) -> Option<GlyphInfo> {
        let source = self.faces.get(face)?;

        let slots = [
            source.styles[style.index()].as_ref(),
            source.styles[Style::Plain.index()].as_ref(),
        ];
        for glyphs in slots.into_iter().flatten() {
            if let Some(info) = self.glyph_from(glyphs, ch) {
                return Some(info);
            }
        }

        let supplement = self.supplement.as_ref()?;
        let glyphs = supplement.styles[Style::Plain.index()].as_ref()?;
        self.glyph_from(glyphs, ch)
    }

    /// Number of pages currently baked.
    pub fn page_count(&self) -> usize {
        self.pages.read().expect("glyph pages poisoned").len()
    }

    /// Run `f` against a page's bitmap, e.g. to upload it.
    pub fn with_page<R>(&self, index: usize, f: impl FnOnce(&GlyphPage) -> R) -> Option<R> {
        let pages = self.pages.read().expect("glyph pages poisoned");
        pages.get(index).map(f)
    }

    fn glyph_from(&self, glyphs: &StyleGlyphs, ch: char) -> Option<GlyphInfo> {
        if let Some(cached) = glyphs.cache.read().expect("glyph cache poisoned").get(&ch) {
            return *cached;
        }

        let entry = if glyphs.font.lookup_glyph_index(ch) == 0 {
            None
        } else {
            let (metrics, bitmap) = glyphs.font.rasterize(ch, RENDER_SIZE);
            Some(self.place_overflow(&metrics, &bitmap))
        };

        glyphs
            .cache
            .write()
            .expect("glyph cache poisoned")
            .insert(ch, entry);
        entry
    }

    /// Place an on-demand glyph into the open overflow page, starting a new
    /// row or page as needed.
    fn place_overflow(&self, metrics: &fontdue::Metrics, bitmap: &[u8]) -> GlyphInfo {
        let mut cursor = self.cursor.lock().expect("glyph cursor poisoned");
        let mut pages = self.pages.write().expect("glyph pages poisoned");

        let slot_w = metrics.width as u32 + PAGE_PADDING;
        let slot_h = metrics.height as u32 + PAGE_PADDING;

        if cursor.page.is_some() && cursor.x + slot_w > OVERFLOW_PAGE_SIZE {
            cursor.x = PAGE_PADDING;
            cursor.y += cursor.row_height + PAGE_PADDING;
            cursor.row_height = 0;
        }
        let page_full = cursor
            .page
            .map(|_| cursor.y + slot_h > OVERFLOW_PAGE_SIZE)
            .unwrap_or(true);
        if page_full {
            pages.push(GlyphPage {
                texture_data: vec![0u8; (OVERFLOW_PAGE_SIZE * OVERFLOW_PAGE_SIZE) as usize],
                width: OVERFLOW_PAGE_SIZE,
                height: OVERFLOW_PAGE_SIZE,
            });
            cursor.page = Some(pages.len() - 1);
            cursor.x = PAGE_PADDING;
            cursor.y = PAGE_PADDING;
            cursor.row_height = 0;
            debug!(pages = pages.len(), "opened overflow glyph page");
        }

        let page_index = cursor.page.expect("overflow page just opened");
        let (x, y) = (cursor.x, cursor.y);
        cursor.x += slot_w + PAGE_PADDING;
        cursor.row_height = cursor.row_height.max(slot_h);

        let page = &mut pages[page_index];
        blit(page, x, y, metrics, bitmap);
        glyph_info(page_index, page, x, y, metrics)
    }
}

/// Bake eager ASCII pages for every populated style slot of a face.
fn bake_face(face: &Arc<FontFace>, pages: &mut Vec<GlyphPage>) -> FaceSource {
    let mut styles: [Option<StyleGlyphs>; 4] = [None, None, None, None];

    for style in Style::ALL {
        let Some(id) = face.style(style) else {
            continue;
        };
        let font = id.font().clone();
        let cache = bake_ascii_page(&font, pages);
        styles[style.index()] = Some(StyleGlyphs {
            font,
            cache: RwLock::new(cache),
        });
    }

    debug!(face = face.name(), "baked face glyph source");
    FaceSource { styles }
}

/// Rasterize the ASCII range into a fresh page using row packing.
fn bake_ascii_page(
    font: &fontdue::Font,
    pages: &mut Vec<GlyphPage>,
) -> HashMap<char, Option<GlyphInfo>> {
    let chars: Vec<char> = ASCII_RANGE.filter_map(char::from_u32).collect();

    let mut glyph_data = Vec::with_capacity(chars.len());
    for &ch in &chars {
        let (metrics, bitmap) = font.rasterize(ch, RENDER_SIZE);
        glyph_data.push((ch, metrics, bitmap));
    }

    // Row packing, capped at MAX_PAGE_WIDTH per row.
    let mut current_x = PAGE_PADDING;
    let mut current_y = PAGE_PADDING;
    let mut row_height = 0u32;
    let mut max_width = 0u32;
    let mut positions = Vec::with_capacity(glyph_data.len());

    for (_, metrics, _) in &glyph_data {
        let slot_w = metrics.width as u32 + PAGE_PADDING * 2;
        let slot_h = metrics.height as u32 + PAGE_PADDING * 2;

        if current_x + slot_w > MAX_PAGE_WIDTH {
            current_x = PAGE_PADDING;
            current_y += row_height + PAGE_PADDING;
            row_height = 0;
        }

        positions.push((current_x, current_y));
        current_x += slot_w;
        row_height = row_height.max(slot_h);
        max_width = max_width.max(current_x);
    }

    let page_width = max_width.next_power_of_two();
    let page_height = (current_y + row_height + PAGE_PADDING).next_power_of_two();

    let mut page = GlyphPage {
        texture_data: vec![0u8; (page_width * page_height) as usize],
        width: page_width,
        height: page_height,
    };

    let page_index = pages.len();
    let mut cache = HashMap::with_capacity(glyph_data.len());
    for ((ch, metrics, bitmap), (x, y)) in glyph_data.iter().zip(positions) {
        blit(&mut page, x, y, metrics, bitmap);
        cache.insert(*ch, Some(glyph_info(page_index, &page, x, y, metrics)));
    }

    pages.push(page);
    cache
}

/// Copy a glyph bitmap into a page at the given position.
fn blit(page: &mut GlyphPage, x: u32, y: u32, metrics: &fontdue::Metrics, bitmap: &[u8]) {
    for row in 0..metrics.height {
        for col in 0..metrics.width {
            let src_idx = row * metrics.width + col;
            let dst_x = x + col as u32;
            let dst_y = y + row as u32;
            let dst_idx = (dst_y * page.width + dst_x) as usize;

            if dst_idx < page.texture_data.len() && src_idx < bitmap.len() {
                page.texture_data[dst_idx] = bitmap[src_idx];
            }
        }
    }
}

fn glyph_info(
    page_index: usize,
    page: &GlyphPage,
    x: u32,
    y: u32,
    metrics: &fontdue::Metrics,
) -> GlyphInfo {
    let uv_min = (x as f32 / page.width as f32, y as f32 / page.height as f32);
    let uv_max = (
        (x + metrics.width as u32) as f32 / page.width as f32,
        (y + metrics.height as u32) as f32 / page.height as f32,
    );

    GlyphInfo {
        page: page_index,
        atlas_x: x,
        atlas_y: y,
        width: metrics.width as u32,
        height: metrics.height as u32,
        advance_width: metrics.advance_width,
        bearing_x: metrics.xmin as f32,
        bearing_y: metrics.ymin as f32,
        uv_min,
        uv_max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_range() {
        let chars: Vec<char> = ASCII_RANGE.filter_map(char::from_u32).collect();
        assert!(!chars.is_empty());
        assert!(chars.contains(&'A'));
        assert!(chars.contains(&'z'));
        assert!(chars.contains(&'0'));
    }

    #[test]
    fn test_unknown_face_has_no_glyphs() {
        let manager = GlyphPageManager::new(&[], None);
        assert_eq!(manager.page_count(), 0);
        assert!(manager.glyph("Nope", Style::Plain, 'A').is_none());
    }
}
