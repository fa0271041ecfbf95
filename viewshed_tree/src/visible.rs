// Copyright 2026 the Viewshed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-widget visible-region caches: foreground, background, invalidation.
//!
//! Each widget caches two disjoint rect sets:
//!
//! - **foreground**: the widget's full visible silhouette, which is its
//!   screen rect clipped to the nearest non-skipped ancestor's foreground,
//!   minus the foregrounds of every in-front sibling at every level up to
//!   that ancestor. Includes area the widget's own children later paint over.
//! - **background**: the foreground minus each direct child's foreground,
//!   i.e. the pixels the widget itself may paint without being immediately
//!   overdrawn by a child.
//!
//! Invalidation only flips the validity flags; recomputation happens lazily
//! on the next read through [`Tree::foreground_regions`] or
//! [`Tree::background_regions`].

use alloc::vec::Vec;

use viewshed_rect::Region;

use crate::tree::Tree;
use crate::types::{WidgetFlags, WidgetId};

/// Cached visible regions for one widget, created and destroyed with it.
#[derive(Clone, Debug, Default)]
pub(crate) struct VisibleRegions {
    pub(crate) foreground: Region,
    pub(crate) background: Region,
    pub(crate) foreground_valid: bool,
    pub(crate) background_valid: bool,
}

impl VisibleRegions {
    /// Flip the validity flags. Never recomputes eagerly.
    pub(crate) fn invalidate(&mut self) {
        self.foreground_valid = false;
        self.background_valid = false;
    }
}

impl Tree {
    /// The widget's full visible silhouette, recomputed if stale.
    ///
    /// Empty for widgets that are hidden, drawing-disabled, fully occluded by
    /// the ancestor hierarchy, or clipped entirely off-screen. `None` only
    /// for stale ids.
    pub fn foreground_regions(&mut self, id: WidgetId) -> Option<&Region> {
        if !self.is_alive(id) {
            return None;
        }
        self.ensure_foreground(id);
        Some(&self.node(id).vis.foreground)
    }

    /// The pixels the widget itself may paint (foreground minus children),
    /// recomputed if stale. `None` only for stale ids.
    pub fn background_regions(&mut self, id: WidgetId) -> Option<&Region> {
        if !self.is_alive(id) {
            return None;
        }
        self.ensure_background(id);
        Some(&self.node(id).vis.background)
    }

    /// Mark one widget's cached regions stale.
    ///
    /// Only the flags flip; the regions recompute on the next read. Structural
    /// mutations call this through the wider cascade themselves, so manual
    /// calls are needed only by code that bypasses the mutation surface.
    pub fn invalidate_regions(&mut self, id: WidgetId) {
        if self.is_alive(id) {
            self.node_mut(id).vis.invalidate();
        }
    }

    /// Invalidate a whole sibling level after a structural change there.
    ///
    /// The parent keeps its foreground (child geometry cannot affect it) but
    /// loses its background; every sibling subtree loses both, since sibling
    /// occlusion and inherited clipping may have changed anywhere below.
    /// Deliberately conservative: correctness never depends on computing the
    /// minimal set, and lazy recompute bounds the cost to the next read.
    pub(crate) fn invalidate_level_of(&mut self, parent: Option<WidgetId>) {
        let siblings: Vec<WidgetId> = match parent {
            Some(p) => {
                if !self.is_alive(p) {
                    return;
                }
                self.node_mut(p).vis.background_valid = false;
                self.node(p).children.clone()
            }
            None => self.roots.clone(),
        };
        for s in siblings {
            self.invalidate_subtree(s);
        }
    }

    pub(crate) fn invalidate_subtree(&mut self, id: WidgetId) {
        self.node_mut(id).vis.invalidate();
        let children = self.node(id).children.clone();
        for c in children {
            self.invalidate_subtree(c);
        }
    }

    /// Whether the widget itself paints and occludes.
    pub(crate) fn occludes(&self, id: WidgetId) -> bool {
        self.flags(id).is_some_and(|f| {
            f.contains(WidgetFlags::DRAWING_ENABLED)
                && !f.intersects(WidgetFlags::HIDDEN | WidgetFlags::DELETED)
        })
    }

    /// Whether every strict ancestor of the widget paints and occludes.
    pub(crate) fn branch_visible(&self, id: WidgetId) -> bool {
        let mut cur = self.node(id).parent;
        while let Some(p) = cur {
            if !self.occludes(p) {
                return false;
            }
            cur = self.node(p).parent;
        }
        true
    }

    fn ensure_foreground(&mut self, id: WidgetId) {
        if self.node(id).vis.foreground_valid {
            return;
        }
        let fg = self.compute_foreground(id);
        let node = self.node_mut(id);
        node.vis.foreground = fg;
        node.vis.foreground_valid = true;
    }

    fn ensure_background(&mut self, id: WidgetId) {
        if self.node(id).vis.background_valid {
            return;
        }
        self.ensure_foreground(id);
        let mut bg = self.node(id).vis.foreground.clone();
        let children = self.node(id).children.clone();
        // Order is irrelevant here: children of one parent subtract disjoint
        // silhouettes.
        for c in children {
            if bg.is_empty() {
                break;
            }
            if !self.occludes(c) {
                continue;
            }
            self.ensure_foreground(c);
            bg.subtract_region(&self.node(c).vis.foreground);
        }
        let node = self.node_mut(id);
        node.vis.background = bg;
        node.vis.background_valid = true;
    }

    /// The nearest ancestor whose bounds clip this widget, walking past
    /// permeable ancestors and past the direct parent of a decoration.
    fn clip_ancestor_of(&self, id: WidgetId) -> Option<WidgetId> {
        let mut child = id;
        while let Some(p) = self.node(child).parent {
            let skip = self.node(p).local.flags.contains(WidgetFlags::PERMEABLE)
                || self.node(child).local.flags.contains(WidgetFlags::DECORATION);
            if !skip {
                return Some(p);
            }
            child = p;
        }
        None
    }

    /// Siblings stacked in front of `id` at its own level (top-level widgets
    /// are siblings of each other).
    fn in_front_of(&self, id: WidgetId) -> Vec<WidgetId> {
        let siblings: &[WidgetId] = match self.node(id).parent {
            Some(p) => &self.node(p).children,
            None => &self.roots,
        };
        match siblings.iter().position(|&s| s == id) {
            Some(i) => siblings[i + 1..].to_vec(),
            None => Vec::new(),
        }
    }

    fn compute_foreground(&mut self, id: WidgetId) -> Region {
        if !self.occludes(id) || !self.branch_visible(id) {
            return Region::EMPTY;
        }
        let Some(screen) = self.screen_rect(id) else {
            return Region::EMPTY;
        };
        // Clip against the nearest non-skipped ancestor's own foreground, not
        // its raw bounding rect: occlusion at and above that ancestor's level
        // is already carved out of it.
        let clip_ancestor = self.clip_ancestor_of(id);
        let mut region = match clip_ancestor {
            Some(p) => {
                self.ensure_foreground(p);
                self.node(p).vis.foreground.clipped_to(screen)
            }
            None => Region::from_rect(screen),
        };
        if region.is_empty() {
            return region;
        }
        // Subtract in-front sibling silhouettes at every level from the
        // widget up to the clip ancestor. A cousin covering an ancestor
        // occludes this widget too, which is exactly what the upper levels of
        // this walk account for.
        let mut on_path = id;
        loop {
            for s in self.in_front_of(on_path) {
                if !self.occludes(s) {
                    continue;
                }
                self.ensure_foreground(s);
                region.subtract_region(&self.node(s).vis.foreground);
                if region.is_empty() {
                    return region;
                }
            }
            match self.node(on_path).parent {
                Some(p) if Some(p) != clip_ancestor => on_path = p,
                _ => break,
            }
        }
        region
    }
}
