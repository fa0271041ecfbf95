// Copyright 2026 the Viewshed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, mutation, queries.

use alloc::vec::Vec;

use viewshed_rect::Rect;

use crate::damage::Damage;
use crate::types::{LocalWidget, WidgetFlags, WidgetId};
use crate::visible::VisibleRegions;

/// Retained widget tree.
///
/// Widgets live in an index-addressable arena. Ownership runs strictly
/// parent-owns-children through the z-ordered child lists; the parent link is
/// a non-owning back-reference used only for upward queries. Top-level
/// widgets live in an explicit z-ordered root list and occlude each other
/// exactly like siblings, so sibling windows need no artificial screen node.
///
/// Every structural mutation takes the application's [`Damage`] accumulator
/// by `&mut` and enqueues the affected old and new footprints itself; there
/// is no ambient global to forget about. Mutations also invalidate the
/// affected visible-region caches, which recompute lazily on the next read.
///
/// ## Example
///
/// ```rust
/// use viewshed_rect::Rect;
/// use viewshed_tree::{Damage, LocalWidget, Tree};
///
/// let mut tree = Tree::new();
/// let mut damage = Damage::new();
/// let window = tree.insert(
///     None,
///     LocalWidget {
///         bounds: Rect::new(0, 0, 100, 100),
///         ..LocalWidget::default()
///     },
///     &mut damage,
/// );
///
/// // Inserting a visible widget damages its footprint.
/// assert_eq!(damage.union_rect(), Some(Rect::new(0, 0, 100, 100)));
/// assert_eq!(tree.screen_rect(window), Some(Rect::new(0, 0, 100, 100)));
/// ```
pub struct Tree {
    /// slots
    pub(crate) nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    pub(crate) generations: Vec<u32>,
    pub(crate) free_list: Vec<usize>,
    /// top-level widgets, back-to-front
    pub(crate) roots: Vec<WidgetId>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("roots", &self.roots.len())
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) generation: u32,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,
    pub(crate) local: LocalWidget,
    pub(crate) vis: VisibleRegions,
}

impl Node {
    fn new(generation: u32, local: LocalWidget) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            vis: VisibleRegions::default(),
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Insert a new widget as a child of `parent`, or as a top-level widget
    /// when `parent` is `None`.
    ///
    /// The new widget is stacked in front of its existing siblings. Its
    /// visible footprint is enqueued into `damage` so the next redraw paints
    /// it.
    pub fn insert(
        &mut self,
        parent: Option<WidgetId>,
        local: LocalWidget,
        damage: &mut Damage,
    ) -> WidgetId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "WidgetId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "WidgetId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = WidgetId::new(idx, generation);
        match parent {
            Some(p) if self.is_alive(p) => self.link_parent(id, p),
            Some(_) | None => self.roots.push(id),
        }
        self.damage_subtree(id, damage);
        self.invalidate_level_of(self.parent_of(id));
        id
    }

    /// Remove a widget and its subtree.
    ///
    /// The old footprint is enqueued into `damage` (so whatever was behind
    /// repaints), the subtree is tombstoned with [`WidgetFlags::DELETED`],
    /// unlinked from its parent, and its slots are freed. All ids into the
    /// subtree become stale and inert; the damage set stores plain rects and
    /// never references widgets, so nothing is left dangling.
    pub fn remove(&mut self, id: WidgetId, damage: &mut Damage) {
        if !self.is_alive(id) {
            return;
        }
        self.damage_subtree(id, damage);
        let parent = self.node(id).parent;
        match parent {
            Some(p) => self.unlink_parent(id, p),
            None => self.roots.retain(|r| *r != id),
        }
        self.invalidate_level_of(parent);
        self.release_subtree(id);
    }

    /// Move `id` under `new_parent` (or to top level), stacked in front of
    /// its new siblings.
    pub fn reparent(&mut self, id: WidgetId, new_parent: Option<WidgetId>, damage: &mut Damage) {
        if !self.is_alive(id) || new_parent.is_some_and(|p| !self.is_alive(p)) {
            return;
        }
        // Refuse to create a cycle.
        let mut cur = new_parent;
        while let Some(p) = cur {
            if p == id {
                return;
            }
            cur = self.node(p).parent;
        }
        self.damage_subtree(id, damage);
        let old_parent = self.node(id).parent;
        match old_parent {
            Some(p) => self.unlink_parent(id, p),
            None => self.roots.retain(|r| *r != id),
        }
        match new_parent {
            Some(p) => self.link_parent(id, p),
            None => self.roots.push(id),
        }
        self.damage_subtree(id, damage);
        self.invalidate_level_of(old_parent);
        self.invalidate_level_of(new_parent);
    }

    /// Move or resize a widget.
    ///
    /// Both the old and the new visible footprints of the whole subtree are
    /// enqueued into `damage`: the next redraw repaints exactly the revealed
    /// area once and the newly covered area once.
    pub fn set_bounds(&mut self, id: WidgetId, bounds: Rect, damage: &mut Damage) {
        if self.node_opt(id).is_none_or(|n| n.local.bounds == bounds) {
            return;
        }
        self.damage_subtree(id, damage);
        self.node_mut(id).local.bounds = bounds;
        self.damage_subtree(id, damage);
        self.invalidate_level_of(self.parent_of(id));
    }

    /// Replace a widget's flags.
    pub fn set_flags(&mut self, id: WidgetId, flags: WidgetFlags, damage: &mut Damage) {
        if self.node_opt(id).is_none_or(|n| n.local.flags == flags) {
            return;
        }
        self.damage_subtree(id, damage);
        self.node_mut(id).local.flags = flags;
        self.damage_subtree(id, damage);
        self.invalidate_level_of(self.parent_of(id));
    }

    /// Show or hide a widget (and with it, its whole subtree).
    pub fn set_hidden(&mut self, id: WidgetId, hidden: bool, damage: &mut Damage) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        let mut flags = node.local.flags;
        flags.set(WidgetFlags::HIDDEN, hidden);
        self.set_flags(id, flags, damage);
    }

    /// Restack a widget in front of all of its siblings.
    pub fn raise_to_front(&mut self, id: WidgetId, damage: &mut Damage) {
        if !self.is_alive(id) {
            return;
        }
        let parent = self.node(id).parent;
        let siblings = self.sibling_list_mut(parent);
        if siblings.last() == Some(&id) {
            return;
        }
        siblings.retain(|s| *s != id);
        siblings.push(id);
        // Stacking moved but geometry did not: one footprint covers the
        // pixels whose ownership changed.
        self.damage_subtree(id, damage);
        self.invalidate_level_of(parent);
    }

    /// Restack a widget behind all of its siblings.
    pub fn lower_to_back(&mut self, id: WidgetId, damage: &mut Damage) {
        if !self.is_alive(id) {
            return;
        }
        let parent = self.node(id).parent;
        let siblings = self.sibling_list_mut(parent);
        if siblings.first() == Some(&id) {
            return;
        }
        siblings.retain(|s| *s != id);
        siblings.insert(0, id);
        self.damage_subtree(id, damage);
        self.invalidate_level_of(parent);
    }

    // --- queries ---

    /// Returns true if `id` refers to a live widget.
    ///
    /// An id is live if its slot exists and its generation matches the
    /// current generation stored in that slot.
    pub fn is_alive(&self, id: WidgetId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// The parent of a live widget, or `None` for top-level widgets and
    /// stale ids.
    pub fn parent_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// The children of a widget, back-to-front. Empty for stale ids.
    pub fn children_of(&self, id: WidgetId) -> &[WidgetId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// Iterate a widget's children front-to-back (topmost first).
    pub fn children_front_to_back(&self, id: WidgetId) -> impl Iterator<Item = WidgetId> + '_ {
        self.children_of(id).iter().rev().copied()
    }

    /// Top-level widgets, back-to-front.
    pub fn roots(&self) -> &[WidgetId] {
        &self.roots
    }

    /// Iterate top-level widgets front-to-back (topmost first).
    pub fn roots_front_to_back(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.roots.iter().rev().copied()
    }

    /// A widget's parent-relative bounds, if live.
    pub fn bounds(&self, id: WidgetId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.local.bounds)
    }

    /// A widget's flags, if live.
    pub fn flags(&self, id: WidgetId) -> Option<WidgetFlags> {
        self.node_opt(id).map(|n| n.local.flags)
    }

    /// Whether the widget carries [`WidgetFlags::HIDDEN`]. False for stale ids.
    pub fn is_hidden(&self, id: WidgetId) -> bool {
        self.flags(id).is_some_and(|f| f.contains(WidgetFlags::HIDDEN))
    }

    /// Whether the widget paints. False for stale ids.
    pub fn is_drawing_enabled(&self, id: WidgetId) -> bool {
        self.flags(id)
            .is_some_and(|f| f.contains(WidgetFlags::DRAWING_ENABLED))
    }

    /// Whether the widget lets its children escape its clip. False for stale ids.
    pub fn is_permeable(&self, id: WidgetId) -> bool {
        self.flags(id)
            .is_some_and(|f| f.contains(WidgetFlags::PERMEABLE))
    }

    /// Whether the widget decorates (and may overhang) its parent. False for
    /// stale ids.
    pub fn is_decoration(&self, id: WidgetId) -> bool {
        self.flags(id)
            .is_some_and(|f| f.contains(WidgetFlags::DECORATION))
    }

    /// Whether the widget has been removed. True for stale ids and for
    /// tombstoned widgets mid-teardown.
    pub fn is_deleted(&self, id: WidgetId) -> bool {
        match self.node_opt(id) {
            None => true,
            Some(n) => n.local.flags.contains(WidgetFlags::DELETED),
        }
    }

    /// A widget's bounds in screen coordinates (ancestor origins applied),
    /// if live. Ignores clipping.
    pub fn screen_rect(&self, id: WidgetId) -> Option<Rect> {
        if !self.is_alive(id) {
            return None;
        }
        let mut rect = self.node(id).local.bounds;
        let mut cur = self.node(id).parent;
        while let Some(p) = cur {
            let b = self.node(p).local.bounds;
            rect = rect.translate(b.x, b.y);
            cur = self.node(p).parent;
        }
        Some(rect)
    }

    /// A widget's screen rect intersected down the ancestor chain.
    ///
    /// An ancestor's bounds are skipped when that ancestor is permeable, or
    /// when the node below it on the path is a decoration (a decoration
    /// escapes only its direct parent; ancestors above still clip). The
    /// result may be empty for widgets pushed fully outside their ancestors.
    pub fn clipped_rect(&self, id: WidgetId) -> Option<Rect> {
        if !self.is_alive(id) {
            return None;
        }
        let mut path = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            path.push(n);
            cur = self.node(n).parent;
        }
        // Walk root-to-widget, accumulating the screen origin and the clip.
        let mut origin = (0_i32, 0_i32);
        let mut clip: Option<Rect> = None;
        let mut prev: Option<(WidgetId, Rect)> = None;
        let mut screen = Rect::ZERO;
        for &n in path.iter().rev() {
            let local = self.node(n).local.bounds;
            screen = local.translate(origin.0, origin.1);
            if let Some((p, p_screen)) = prev
                && !self.node(p).local.flags.contains(WidgetFlags::PERMEABLE)
                && !self.node(n).local.flags.contains(WidgetFlags::DECORATION)
            {
                clip = Some(match clip {
                    Some(c) => c.intersection(p_screen),
                    None => p_screen,
                });
            }
            origin.0 = origin.0.saturating_add(local.x);
            origin.1 = origin.1.saturating_add(local.y);
            prev = Some((n, screen));
        }
        Some(match clip {
            Some(c) => screen.intersection(c),
            None => screen,
        })
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: WidgetId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling WidgetId")
    }

    /// Access a node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: WidgetId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling WidgetId")
    }

    pub(crate) fn node_opt(&self, id: WidgetId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn link_parent(&mut self, id: WidgetId, parent: WidgetId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: WidgetId, parent: WidgetId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn sibling_list_mut(&mut self, parent: Option<WidgetId>) -> &mut Vec<WidgetId> {
        match parent {
            Some(p) => &mut self.node_mut(p).children,
            None => &mut self.roots,
        }
    }

    /// Enqueue the visible footprint of a whole subtree into `damage`.
    ///
    /// Each visible node contributes its own clipped rect, so overhanging
    /// descendants of permeable or decorated branches are damaged too.
    /// Invisible subtrees have no footprint and contribute nothing, which is
    /// what makes hide/show damage exactly the revealed or covered area.
    pub(crate) fn damage_subtree(&self, id: WidgetId, damage: &mut Damage) {
        if !self.branch_visible(id) {
            return;
        }
        self.footprint(id, damage);
    }

    fn footprint(&self, id: WidgetId, damage: &mut Damage) {
        if !self.occludes(id) {
            return;
        }
        if let Some(r) = self.clipped_rect(id)
            && !r.is_empty()
        {
            damage.add_rect(r);
        }
        for &child in &self.node(id).children {
            self.footprint(child, damage);
        }
    }

    fn release_subtree(&mut self, id: WidgetId) {
        let node = self.node_mut(id);
        node.local.flags |= WidgetFlags::DELETED;
        let children = core::mem::take(&mut node.children);
        for child in children {
            self.release_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }
}
