//! Item-stack grid layout.
//!
//! Lays out a grid of item stacks for HUD drawing: a background quad per
//! slot, a textured icon quad per stack, and a label anchor for stack
//! counts. The text itself is drawn by the font renderer; this module only
//! decides where it goes.

use glam::{Vec2, Vec3};

use crate::batch::DrawBatch;

/// Background color for slot quads.
const SLOT_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.5];

/// Fraction of the slot size left as margin around each icon.
const ICON_INSET: f32 = 0.1;

/// One stack to display: an icon index into the item atlas plus a count.
#[derive(Debug, Clone, Copy)]
pub struct ItemStack {
    /// Icon index into the host's item atlas.
    pub icon: u32,
    /// Stack size; counts above 1 get a label.
    pub count: u32,
}

/// Uniform grid of icon cells inside the host's item atlas texture.
#[derive(Debug, Clone, Copy)]
pub struct IconAtlas {
    /// Cells per row.
    pub columns: u32,
    /// Cell rows.
    pub rows: u32,
}

impl IconAtlas {
    /// UV rectangle of the given icon index, row-major.
    pub fn uv(&self, icon: u32) -> ([f32; 2], [f32; 2]) {
        let col = icon % self.columns;
        let row = (icon / self.columns).min(self.rows.saturating_sub(1));
        let w = 1.0 / self.columns as f32;
        let h = 1.0 / self.rows as f32;
        let min = [col as f32 * w, row as f32 * h];
        let max = [min[0] + w, min[1] + h];
        (min, max)
    }
}

/// Where a stack-count label should be drawn, in the same space as the grid.
#[derive(Debug, Clone)]
pub struct CountLabel {
    /// Label text, the decimal stack count.
    pub text: String,
    /// Anchor for the label's bottom-right corner.
    pub anchor: Vec2,
}

/// Screen-space grid of item slots.
#[derive(Debug, Clone, Copy)]
pub struct ItemGrid {
    /// Top-left corner of the grid.
    pub origin: Vec2,
    /// Edge length of one slot, in pixels.
    pub slot_size: f32,
    /// Gap between slots, in pixels.
    pub padding: f32,
    /// Slots per row.
    pub columns: u32,
}

impl ItemGrid {
    /// Top-left corner of the slot at `index`.
    pub fn slot_origin(&self, index: usize) -> Vec2 {
        let columns = self.columns.max(1) as usize;
        let col = (index % columns) as f32;
        let row = (index / columns) as f32;
        let step = self.slot_size + self.padding;
        self.origin + Vec2::new(col * step, row * step)
    }

    /// Emit slot backgrounds and icon quads for `stacks` into `batch`,
    /// returning the count labels for the font renderer to draw.
    pub fn emit(
        &self,
        stacks: &[ItemStack],
        atlas: &IconAtlas,
        batch: &mut DrawBatch,
    ) -> Vec<CountLabel> {
        let mut labels = Vec::new();

        for (index, stack) in stacks.iter().enumerate() {
            let slot = self.slot_origin(index);
            batch.quad(corners(slot, self.slot_size), SLOT_COLOR);

            let inset = self.slot_size * ICON_INSET;
            let icon_origin = slot + Vec2::splat(inset);
            let icon_size = self.slot_size - inset * 2.0;
            let (uv_min, uv_max) = atlas.uv(stack.icon);
            batch.textured_quad(
                corners(icon_origin, icon_size),
                uv_min,
                uv_max,
                [1.0, 1.0, 1.0, 1.0],
            );

            if stack.count > 1 {
                labels.push(CountLabel {
                    text: stack.count.to_string(),
                    anchor: slot + Vec2::splat(self.slot_size),
                });
            }
        }

        labels
    }
}

/// Corners of an axis-aligned screen-space square at z = 0, winding order.
fn corners(origin: Vec2, size: f32) -> [Vec3; 4] {
    [
        Vec3::new(origin.x, origin.y, 0.0),
        Vec3::new(origin.x + size, origin.y, 0.0),
        Vec3::new(origin.x + size, origin.y + size, 0.0),
        Vec3::new(origin.x, origin.y + size, 0.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid() -> ItemGrid {
        ItemGrid {
            origin: Vec2::new(10.0, 20.0),
            slot_size: 32.0,
            padding: 4.0,
            columns: 9,
        }
    }

    #[test]
    fn test_slot_origin_wraps_rows() {
        let grid = grid();
        assert_eq!(grid.slot_origin(0), Vec2::new(10.0, 20.0));
        assert_eq!(grid.slot_origin(1), Vec2::new(46.0, 20.0));
        assert_eq!(grid.slot_origin(9), Vec2::new(10.0, 56.0));
    }

    #[test]
    fn test_emit_labels_only_for_counts_above_one() {
        let mut batch = DrawBatch::new();
        let stacks = [
            ItemStack { icon: 0, count: 1 },
            ItemStack { icon: 1, count: 64 },
        ];
        let labels = grid().emit(&stacks, &IconAtlas { columns: 16, rows: 16 }, &mut batch);

        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "64");
        // Two quads per stack: slot background plus icon.
        assert_eq!(batch.tri_vertices().len(), 16);
    }

    #[test]
    fn test_icon_atlas_uv_first_and_last() {
        let atlas = IconAtlas { columns: 4, rows: 4 };
        let (min, max) = atlas.uv(0);
        assert_eq!(min, [0.0, 0.0]);
        assert_eq!(max, [0.25, 0.25]);

        let (min, max) = atlas.uv(15);
        assert_eq!(min, [0.75, 0.75]);
        assert_eq!(max, [1.0, 1.0]);
    }

    proptest! {
        #[test]
        fn prop_slots_never_overlap(a in 0usize..64, b in 0usize..64) {
            prop_assume!(a != b);
            let grid = grid();
            let (pa, pb) = (grid.slot_origin(a), grid.slot_origin(b));
            // Distinct slots are at least one slot edge apart on some axis.
            let apart = (pa.x - pb.x).abs() >= grid.slot_size
                || (pa.y - pb.y).abs() >= grid.slot_size;
            prop_assert!(apart);
        }

        #[test]
        fn prop_emit_quads_match_stack_count(count in 0usize..32) {
            let stacks: Vec<ItemStack> =
                (0..count).map(|i| ItemStack { icon: i as u32, count: 1 }).collect();
            let mut batch = DrawBatch::new();
            grid().emit(&stacks, &IconAtlas { columns: 16, rows: 16 }, &mut batch);
            prop_assert_eq!(batch.tri_vertices().len(), count * 8);
        }
    }
}
