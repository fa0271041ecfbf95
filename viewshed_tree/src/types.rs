// Copyright 2026 the Viewshed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the widget tree: identifiers, flags, and local geometry.

use viewshed_rect::Rect;

/// Identifier for a widget in the tree (generational).
///
/// A `WidgetId` names a slot plus the generation it was allocated in. After
/// the widget is removed, the id goes stale: accessors return `None` or an
/// empty result and mutations become no-ops, even if the slot has been reused
/// for a newer widget.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct WidgetId(pub(crate) u32, pub(crate) u32);

impl WidgetId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Widget flags controlling painting, clipping, and teardown state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u8 {
        /// Widget paints itself and occludes what lies behind it. When clear,
        /// the widget and its subtree pass damage through untouched.
        const DRAWING_ENABLED = 0b0000_0001;
        /// Widget and its whole subtree are invisible.
        const HIDDEN = 0b0000_0010;
        /// Children of this widget are not clipped by its bounds.
        const PERMEABLE = 0b0000_0100;
        /// Widget adorns its parent and escapes the parent's clip (and only
        /// the parent's; ancestors above still clip normally).
        const DECORATION = 0b0000_1000;
        /// Teardown tombstone, set on a subtree while it is being removed.
        const DELETED = 0b0001_0000;
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self::DRAWING_ENABLED
    }
}

/// Local data for a widget.
#[derive(Clone, Debug, Default)]
pub struct LocalWidget {
    /// Bounding rect relative to the parent's top-left corner (or to the
    /// logical screen origin for top-level widgets).
    pub bounds: Rect,
    /// Painting, clipping, and teardown flags.
    pub flags: WidgetFlags,
}
