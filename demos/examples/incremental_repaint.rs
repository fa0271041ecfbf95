// Copyright 2026 the Viewshed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental repaint over a character-grid framebuffer.
//!
//! Builds a screen with two overlapping windows, settles the first frame,
//! then moves the front window and redraws. The second frame repaints only
//! the revealed and newly covered cells; every other cell is untouched.
//!
//! Run with: `cargo run --example incremental_repaint`

use viewshed_rect::Rect;
use viewshed_tree::{Damage, LocalWidget, Painter, Tree, WidgetId, redraw};

const COLS: usize = 64;
const ROWS: usize = 24;

/// A toy framebuffer: one glyph per widget, plus a per-frame touch counter.
struct GridPainter {
    cells: [[char; COLS]; ROWS],
    glyphs: Vec<(WidgetId, char)>,
    touched: usize,
}

impl GridPainter {
    fn new() -> Self {
        Self {
            cells: [['.'; COLS]; ROWS],
            glyphs: Vec::new(),
            touched: 0,
        }
    }

    fn glyph_for(&self, widget: WidgetId) -> char {
        self.glyphs
            .iter()
            .find(|(w, _)| *w == widget)
            .map(|(_, g)| *g)
            .unwrap_or('?')
    }

    fn print(&self) {
        for row in &self.cells {
            let line: String = row.iter().collect();
            println!("{line}");
        }
    }
}

impl Painter for GridPainter {
    fn paint(&mut self, widget: WidgetId, area: Rect) {
        let glyph = self.glyph_for(widget);
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                if (0..ROWS as i32).contains(&y) && (0..COLS as i32).contains(&x) {
                    self.cells[y as usize][x as usize] = glyph;
                    self.touched += 1;
                }
            }
        }
    }
}

fn window(x: i32, y: i32, w: i32, h: i32) -> LocalWidget {
    LocalWidget {
        bounds: Rect::new(x, y, w, h),
        ..LocalWidget::default()
    }
}

fn main() {
    let mut tree = Tree::new();
    let mut damage = Damage::new();
    let mut painter = GridPainter::new();

    let screen = tree.insert(None, window(0, 0, COLS as i32, ROWS as i32), &mut damage);
    let back = tree.insert(Some(screen), window(4, 2, 30, 14), &mut damage);
    let front = tree.insert(Some(screen), window(18, 8, 30, 12), &mut damage);
    painter.glyphs = vec![(screen, ' '), (back, 'a'), (front, 'B')];

    redraw(&tree, &mut damage, &mut painter);
    println!("frame 1: full first paint, {} cells", painter.touched);
    painter.print();

    // Move the front window; only its old and new footprints repaint.
    painter.touched = 0;
    tree.set_bounds(front, Rect::new(30, 10, 30, 12), &mut damage);
    redraw(&tree, &mut damage, &mut painter);
    println!("\nframe 2: incremental repaint, {} cells", painter.touched);
    painter.print();
}
