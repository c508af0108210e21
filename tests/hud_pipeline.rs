//! End-to-end HUD pipeline: font startup, text layout, and item grid
//! emission through the public API.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use voxelhud::{
    draw_item_grid, draw_text, DrawBatch, FontManager, IconAtlas, ItemGrid, ItemStack, Platform,
    Style, TextBatches,
};
use voxelhud_font::{FontError, FontResolver};

/// Locate a usable font file; tests skip when none is present.
fn test_font_data() -> Option<Vec<u8>> {
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

struct FakeResolver {
    data: Vec<u8>,
}

impl FontResolver for FakeResolver {
    fn resolve(&self, _family: &str, _style: Style) -> Result<Vec<u8>, FontError> {
        Ok(self.data.clone())
    }
}

async fn ready_manager(data: Vec<u8>) -> Arc<FontManager> {
    let manager = Arc::new(FontManager::new(
        Platform::Unknown,
        Arc::new(FakeResolver { data }),
    ));
    manager.init_fallbacks().await;
    manager.create_glyph_manager().await;
    manager
}

#[tokio::test]
async fn test_text_flows_into_page_batches() {
    let Some(data) = test_font_data() else {
        eprintln!("no system font available, skipping");
        return;
    };

    let manager = ready_manager(data).await;
    let renderer = manager.active_renderer();

    let mut batches = TextBatches::new();
    draw_text(
        &renderer,
        "FPS: 60\nChunks: 128",
        Style::Plain,
        Vec2::new(8.0, 8.0),
        [1.0, 1.0, 0.0, 1.0],
        &mut batches,
    );

    let total: usize = batches
        .page_batches()
        .map(|(_, batch)| batch.tri_vertices().len())
        .sum();
    // Four vertices per drawable glyph; whitespace and newlines emit none.
    assert!(total >= 4 * "FPS:60".len());

    batches.clear();
    assert_eq!(batches.page_batches().count(), 0);
}

#[tokio::test]
async fn test_item_grid_draws_slots_and_count_labels() {
    let Some(data) = test_font_data() else {
        eprintln!("no system font available, skipping");
        return;
    };

    let manager = ready_manager(data).await;
    let renderer = manager.active_renderer();

    let grid = ItemGrid {
        origin: Vec2::new(100.0, 400.0),
        slot_size: 32.0,
        padding: 4.0,
        columns: 9,
    };
    let stacks = [
        ItemStack { icon: 3, count: 1 },
        ItemStack { icon: 7, count: 12 },
    ];

    let mut batch = DrawBatch::new();
    let mut text = TextBatches::new();
    draw_item_grid(
        &renderer,
        &grid,
        &stacks,
        &IconAtlas {
            columns: 16,
            rows: 16,
        },
        &mut batch,
        &mut text,
    );

    // Two quads per stack: slot background plus icon.
    assert_eq!(batch.tri_vertices().len(), 16);
    // Only the stack with count > 1 gets a label, two digits of it.
    let label_vertices: usize = text
        .page_batches()
        .map(|(_, batch)| batch.tri_vertices().len())
        .sum();
    assert_eq!(label_vertices, 8);
}

#[tokio::test]
async fn test_debug_boxes_share_the_batch() {
    let Some(data) = test_font_data() else {
        eprintln!("no system font available, skipping");
        return;
    };

    let manager = ready_manager(data).await;
    let _renderer = manager.active_renderer();

    let mut batch = DrawBatch::new();
    batch.box_edges(Vec3::ZERO, Vec3::splat(1.0), [0.0, 1.0, 0.0, 1.0]);
    batch.line(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(batch.line_vertices().len(), 26);
}
