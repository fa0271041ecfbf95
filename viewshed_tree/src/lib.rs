// Copyright 2026 the Viewshed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewshed Tree: a retained widget tree with exact visible regions and
//! damage-driven redraw.
//!
//! This crate is the occlusion core of a retained-mode widget hierarchy for
//! a small dual-framebuffer display: a tree of possibly-overlapping,
//! z-ordered, rectangular widgets where every structural change repaints only
//! the pixels it actually invalidated, each pixel repainted by exactly one
//! widget, exactly once per frame, with no full-screen repaint.
//!
//! - [`Tree`]: the widget arena. Parent-owns-children through z-ordered
//!   child lists; parents are non-owning back-references; top-level widgets
//!   occlude each other like siblings. Generational [`WidgetId`]s make stale
//!   handles inert instead of dangerous.
//! - Visible regions: every widget caches its *foreground* (full visible
//!   silhouette) and *background* (silhouette minus its children) as
//!   disjoint rect sets, invalidated by structural changes and recomputed
//!   lazily on read. See [`Tree::foreground_regions`] and
//!   [`Tree::background_regions`].
//! - [`Damage`]: the de-duplicated, non-overlapping set of screen regions
//!   awaiting repaint. Structural mutations enqueue old and new footprints
//!   into it themselves; there are no ambient globals.
//! - [`redraw`]: the per-frame drain. Walks each damaged rect through the
//!   tree front-to-back, letting each widget claim exactly the pixels it
//!   owns, and hands them to a [`Painter`].
//!
//! What this crate is *not*: a layout engine, an event router, a rasterizer,
//! or a compositor with blending. Occlusion here is opaque rectangles only,
//! and drawing primitives, text, and input live in the widget layer above.
//!
//! Everything is single-threaded and frame-paced: one [`redraw`] call per
//! display refresh tick, running to completion, with single-writer access
//! enforced by `&mut` borrows rather than locks.
//!
//! ## Example
//!
//! ```rust
//! use viewshed_rect::Rect;
//! use viewshed_tree::{Damage, LocalWidget, Painter, Tree, WidgetId, redraw};
//!
//! struct CountingPainter(u32);
//! impl Painter for CountingPainter {
//!     fn paint(&mut self, _widget: WidgetId, _area: Rect) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut tree = Tree::new();
//! let mut damage = Damage::new();
//! let back = tree.insert(
//!     None,
//!     LocalWidget { bounds: Rect::new(0, 0, 100, 100), ..LocalWidget::default() },
//!     &mut damage,
//! );
//! let front = tree.insert(
//!     None,
//!     LocalWidget { bounds: Rect::new(50, 50, 100, 100), ..LocalWidget::default() },
//!     &mut damage,
//! );
//!
//! // The front window carves an L-shape out of the back one.
//! assert_eq!(
//!     tree.background_regions(back).unwrap().area(),
//!     100 * 100 - 50 * 50,
//! );
//! assert_eq!(tree.background_regions(front).unwrap().area(), 100 * 100);
//!
//! // One paint pass drains all pending damage.
//! let mut painter = CountingPainter(0);
//! redraw(&tree, &mut damage, &mut painter);
//! assert!(damage.is_empty());
//! assert!(painter.0 > 0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod damage;
mod paint;
mod tree;
mod types;
mod visible;

pub use damage::Damage;
pub use paint::{Painter, redraw};
pub use tree::Tree;
pub use types::{LocalWidget, WidgetFlags, WidgetId};
