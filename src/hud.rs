//! HUD overlay composition.
//!
//! Ties the font renderer and the draw batch together: text is laid out into
//! glyph quads, grouped per glyph page (each page is a separate texture
//! bind), and item grids get their count labels drawn at the anchors the
//! layout hands back.

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use voxelhud_draw::{DrawBatch, IconAtlas, ItemGrid, ItemStack};
use voxelhud_font::{FontRenderer, Style};

/// Text geometry grouped by the glyph page it samples from.
#[derive(Default)]
pub struct TextBatches {
    pages: HashMap<usize, DrawBatch>,
}

impl TextBatches {
    /// Create an empty set of per-page batches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all accumulated text geometry, keeping allocations.
    pub fn clear(&mut self) {
        for batch in self.pages.values_mut() {
            batch.clear();
        }
    }

    /// Iterate non-empty batches with the glyph page index to bind.
    pub fn page_batches(&self) -> impl Iterator<Item = (usize, &DrawBatch)> {
        self.pages
            .iter()
            .filter(|(_, batch)| !batch.is_empty())
            .map(|(page, batch)| (*page, batch))
    }

    fn batch_for(&mut self, page: usize) -> &mut DrawBatch {
        self.pages.entry(page).or_default()
    }
}

/// Lay out `text` at `origin` (screen space, y down) into per-page batches.
pub fn draw_text(
    renderer: &FontRenderer,
    text: &str,
    style: Style,
    origin: Vec2,
    color: [f32; 4],
    batches: &mut TextBatches,
) {
    for quad in renderer.layout(text, style) {
        let min = origin + Vec2::new(quad.x, quad.y);
        let corners = [
            Vec3::new(min.x, min.y, 0.0),
            Vec3::new(min.x + quad.width, min.y, 0.0),
            Vec3::new(min.x + quad.width, min.y + quad.height, 0.0),
            Vec3::new(min.x, min.y + quad.height, 0.0),
        ];
        batches.batch_for(quad.page).textured_quad(
            corners,
            [quad.uv_min.0, quad.uv_min.1],
            [quad.uv_max.0, quad.uv_max.1],
            color,
        );
    }
}

/// Emit an item grid plus its stack-count labels.
pub fn draw_item_grid(
    renderer: &FontRenderer,
    grid: &ItemGrid,
    stacks: &[ItemStack],
    atlas: &IconAtlas,
    batch: &mut DrawBatch,
    text: &mut TextBatches,
) {
    for label in grid.emit(stacks, atlas, batch) {
        let width = renderer.measure(&label.text, Style::Plain);
        let height = renderer.line_height(Style::Plain);
        let origin = label.anchor - Vec2::new(width, height);
        draw_text(renderer, &label.text, Style::Plain, origin, [1.0; 4], text);
    }
}
