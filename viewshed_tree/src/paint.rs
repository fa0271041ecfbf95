// Copyright 2026 the Viewshed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage-driven redraw: one paint pass per frame.

use alloc::vec;
use alloc::vec::Vec;

use viewshed_rect::{Rect, split_intersection};

use crate::damage::Damage;
use crate::tree::Tree;
use crate::types::WidgetId;

/// Receiver of paint calls issued by [`redraw`].
///
/// Implemented by the widget layer. `paint` is invoked with exactly the
/// screen sub-rect to repaint; the call is synchronous and always completes.
pub trait Painter {
    /// Repaint exactly `area` (screen coordinates) of `widget`.
    fn paint(&mut self, widget: WidgetId, area: Rect);
}

/// Drain the damage set and repaint, once per display refresh tick.
///
/// For each damaged rect, the widget tree is walked front-to-back: children
/// claim pieces of the damage first (recursively subdividing what they
/// cover), then the widget paints whatever is left inside its own clipped
/// rect, and the rest passes on to whatever is behind. Each covered pixel is
/// painted by exactly the front-most widget that owns it, exactly once; no
/// widget paints over a visible child. Hidden and drawing-disabled widgets
/// pass damage through untouched. Pieces no widget claims are true empty
/// background and are discarded at end of pass.
///
/// Damage entries are disjoint by invariant and may be processed in any
/// order; within one entry the traversal is strictly front-to-back.
pub fn redraw<P: Painter>(tree: &Tree, damage: &mut Damage, painter: &mut P) {
    let drained = damage.take();
    for &entry in drained.rects() {
        let mut pending = vec![entry];
        for root in tree.roots_front_to_back() {
            if pending.is_empty() {
                break;
            }
            let mut rest = Vec::with_capacity(pending.len());
            for piece in pending {
                rest.extend(claim(tree, root, piece, painter));
            }
            pending = rest;
        }
    }
}

/// Let `id` and its subtree consume `piece`; returns what is left for
/// whatever lies behind.
fn claim<P: Painter>(tree: &Tree, id: WidgetId, piece: Rect, painter: &mut P) -> Vec<Rect> {
    if !tree.occludes(id) {
        return vec![piece];
    }
    let clip = tree.clipped_rect(id).unwrap_or(Rect::ZERO);
    // A subtree reaches outside `clip` only through a permeable widget or a
    // decoration child; otherwise a non-overlapping piece skips the whole
    // branch.
    let escapes = tree.is_permeable(id)
        || tree.children_of(id).iter().any(|&c| tree.is_decoration(c));
    if !escapes && !clip.intersects(piece) {
        return vec![piece];
    }
    // Children are offered the full piece, not just the part inside `clip`:
    // their own clipped rects bound what they may take, including any
    // overhang past this widget.
    let mut pending = vec![piece];
    for child in tree.children_front_to_back(id) {
        if pending.is_empty() {
            return pending;
        }
        let mut rest = Vec::with_capacity(pending.len());
        for p in pending {
            rest.extend(claim(tree, child, p, painter));
        }
        pending = rest;
    }
    // Whatever no child claimed and lies inside this widget's clipped rect
    // is its own contribution.
    let mut unclaimed = Vec::new();
    for p in pending {
        match split_intersection(clip, p) {
            Some(split) => {
                painter.paint(id, split.intersection);
                unclaimed.extend(split.remainders);
            }
            None => unclaimed.push(p),
        }
    }
    unclaimed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LocalWidget, WidgetFlags};

    fn widget(x: i32, y: i32, w: i32, h: i32) -> LocalWidget {
        LocalWidget {
            bounds: Rect::new(x, y, w, h),
            ..LocalWidget::default()
        }
    }

    fn widget_with(x: i32, y: i32, w: i32, h: i32, flags: WidgetFlags) -> LocalWidget {
        LocalWidget {
            bounds: Rect::new(x, y, w, h),
            flags,
        }
    }

    #[derive(Default)]
    struct RecordingPainter {
        calls: Vec<(WidgetId, Rect)>,
    }

    impl Painter for RecordingPainter {
        fn paint(&mut self, widget: WidgetId, area: Rect) {
            self.calls.push((widget, area));
        }
    }

    fn painted_area(calls: &[(WidgetId, Rect)]) -> i64 {
        calls.iter().map(|(_, r)| r.area()).sum()
    }

    fn assert_no_double_paint(calls: &[(WidgetId, Rect)]) {
        for (i, (_, a)) in calls.iter().enumerate() {
            for (_, b) in &calls[i + 1..] {
                assert!(!a.intersects(*b), "a pixel was painted twice");
            }
        }
    }

    #[test]
    fn moving_a_window_repaints_revealed_and_covered_once() {
        let mut tree = Tree::new();
        let mut damage = Damage::new();
        let a = tree.insert(None, widget(0, 0, 100, 100), &mut damage);
        let b = tree.insert(None, widget(50, 50, 100, 100), &mut damage);

        // Settle the initial frame.
        let mut painter = RecordingPainter::default();
        redraw(&tree, &mut damage, &mut painter);
        assert!(damage.is_empty());

        // Moving B damages its old and new footprints; the next frame
        // repaints exactly the region B revealed of A, once, and B's new
        // covering region, once.
        tree.set_bounds(b, Rect::new(150, 150, 100, 100), &mut damage);
        let mut painter = RecordingPainter::default();
        redraw(&tree, &mut damage, &mut painter);

        let a_calls: Vec<Rect> = painter
            .calls
            .iter()
            .filter(|(w, _)| *w == a)
            .map(|(_, r)| *r)
            .collect();
        assert_eq!(a_calls, [Rect::new(50, 50, 50, 50)]);

        let b_calls: Vec<Rect> = painter
            .calls
            .iter()
            .filter(|(w, _)| *w == b)
            .map(|(_, r)| *r)
            .collect();
        assert_eq!(b_calls, [Rect::new(150, 150, 100, 100)]);

        assert_no_double_paint(&painter.calls);
        assert!(damage.is_empty(), "redraw must drain the damage set");
    }

    #[test]
    fn redraw_drains_even_with_no_matching_widget() {
        let tree = Tree::new();
        let mut damage = Damage::new();
        damage.add_rect(Rect::new(500, 500, 10, 10));
        let mut painter = RecordingPainter::default();
        redraw(&tree, &mut damage, &mut painter);
        assert!(damage.is_empty());
        assert!(painter.calls.is_empty());
    }

    #[test]
    fn front_widget_claims_before_rear() {
        let mut tree = Tree::new();
        let mut damage = Damage::new();
        let back = tree.insert(None, widget(0, 0, 100, 100), &mut damage);
        let front = tree.insert(None, widget(50, 50, 100, 100), &mut damage);

        let mut painter = RecordingPainter::default();
        redraw(&tree, &mut damage, &mut painter);

        assert_no_double_paint(&painter.calls);
        // Every painted pixel inside the overlap belongs to the front window.
        let overlap = Rect::new(50, 50, 50, 50);
        for (w, r) in &painter.calls {
            if r.intersects(overlap) {
                assert_eq!(*w, front, "overlap pixels must go to the front window");
            }
        }
        // The rear window painted exactly its L-shaped remainder.
        let back_area: i64 = painter
            .calls
            .iter()
            .filter(|(w, _)| *w == back)
            .map(|(_, r)| r.area())
            .sum();
        assert_eq!(back_area, 100 * 100 - 50 * 50);
    }

    #[test]
    fn parent_never_paints_over_visible_children() {
        let mut tree = Tree::new();
        let mut damage = Damage::new();
        let window = tree.insert(None, widget(0, 0, 100, 100), &mut damage);
        let button = tree.insert(Some(window), widget(20, 20, 30, 10), &mut damage);

        let mut painter = RecordingPainter::default();
        redraw(&tree, &mut damage, &mut painter);

        assert_no_double_paint(&painter.calls);
        for (w, r) in &painter.calls {
            if *w == window {
                assert!(
                    !r.intersects(Rect::new(20, 20, 30, 10)),
                    "window must not paint under the button"
                );
            }
        }
        let button_area = painter
            .calls
            .iter()
            .filter(|(w, _)| *w == button)
            .map(|(_, r)| r.area())
            .sum::<i64>();
        assert_eq!(button_area, 30 * 10);
        assert_eq!(painted_area(&painter.calls), 100 * 100);
    }

    #[test]
    fn hidden_widgets_pass_damage_through() {
        let mut tree = Tree::new();
        let mut damage = Damage::new();
        let back = tree.insert(None, widget(0, 0, 100, 100), &mut damage);
        let front = tree.insert(None, widget(0, 0, 100, 100), &mut damage);
        tree.set_hidden(front, true, &mut damage);

        let mut painter = RecordingPainter::default();
        redraw(&tree, &mut damage, &mut painter);

        // The hidden front window consumes nothing; the back window paints
        // the full area.
        assert!(painter.calls.iter().all(|(w, _)| *w == back));
        assert_eq!(painted_area(&painter.calls), 100 * 100);
    }

    #[test]
    fn disabled_subtree_is_skipped_entirely() {
        let mut tree = Tree::new();
        let mut damage = Damage::new();
        let back = tree.insert(None, widget(0, 0, 100, 100), &mut damage);
        let front = tree.insert(
            None,
            widget_with(0, 0, 100, 100, WidgetFlags::empty()),
            &mut damage,
        );
        // A visible child of the disabled widget still must not paint.
        let _child = tree.insert(Some(front), widget(10, 10, 20, 20), &mut damage);

        let mut painter = RecordingPainter::default();
        damage.add_rect(Rect::new(0, 0, 100, 100));
        redraw(&tree, &mut damage, &mut painter);

        assert!(painter.calls.iter().all(|(w, _)| *w == back));
        assert_eq!(painted_area(&painter.calls), 100 * 100);
    }

    #[test]
    fn permeable_overhang_is_claimed_by_its_owner() {
        let mut tree = Tree::new();
        let mut damage = Damage::new();
        let screen = tree.insert(None, widget(0, 0, 100, 100), &mut damage);
        let pane = tree.insert(
            Some(screen),
            widget_with(
                0,
                0,
                50,
                50,
                WidgetFlags::DRAWING_ENABLED | WidgetFlags::PERMEABLE,
            ),
            &mut damage,
        );
        let child = tree.insert(Some(pane), widget(40, 40, 30, 30), &mut damage);

        let mut painter = RecordingPainter::default();
        redraw(&tree, &mut damage, &mut painter);

        assert_no_double_paint(&painter.calls);
        assert_eq!(painted_area(&painter.calls), 100 * 100);

        // The child painted its whole rect, including the overhang past the
        // permeable pane; the pane painted only its remainder.
        let child_area: i64 = painter
            .calls
            .iter()
            .filter(|(w, _)| *w == child)
            .map(|(_, r)| r.area())
            .sum();
        assert_eq!(child_area, 30 * 30);
        for (w, r) in &painter.calls {
            if *w == pane {
                assert!(!r.intersects(Rect::new(40, 40, 30, 30)));
            }
        }
    }

    #[test]
    fn decoration_overhang_is_painted_outside_its_parent() {
        let mut tree = Tree::new();
        let mut damage = Damage::new();
        let screen = tree.insert(None, widget(0, 0, 100, 100), &mut damage);
        let window = tree.insert(Some(screen), widget(10, 20, 80, 70), &mut damage);
        let title = tree.insert(
            Some(window),
            widget_with(
                0,
                -10,
                80,
                10,
                WidgetFlags::DRAWING_ENABLED | WidgetFlags::DECORATION,
            ),
            &mut damage,
        );

        let mut painter = RecordingPainter::default();
        redraw(&tree, &mut damage, &mut painter);

        assert_no_double_paint(&painter.calls);
        assert_eq!(painted_area(&painter.calls), 100 * 100);
        let title_area: i64 = painter
            .calls
            .iter()
            .filter(|(w, _)| *w == title)
            .map(|(_, r)| r.area())
            .sum();
        assert_eq!(title_area, 80 * 10, "the title bar sits fully above the window");
    }

    #[test]
    fn damage_outside_everything_is_discarded_not_retried() {
        let mut tree = Tree::new();
        let mut damage = Damage::new();
        let _window = tree.insert(None, widget(0, 0, 50, 50), &mut damage);

        let mut painter = RecordingPainter::default();
        redraw(&tree, &mut damage, &mut painter);

        // Damage partially off every widget: the covered part paints, the
        // rest is dropped.
        damage.add_rect(Rect::new(40, 40, 20, 20));
        let mut painter2 = RecordingPainter::default();
        redraw(&tree, &mut damage, &mut painter2);
        assert_eq!(painted_area(&painter2.calls), 10 * 10);
        assert!(damage.is_empty());
    }
}
