// Copyright 2026 the Viewshed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The damaged-region accumulator drained once per frame.

use viewshed_rect::{Rect, Region};

/// De-duplicated set of screen regions awaiting repaint.
///
/// The stored rects are pairwise non-overlapping and never empty, maintained
/// by construction: [`Damage::add_rect`] splits each incoming rect against
/// the stored set and keeps only the genuinely new remainder pieces.
/// Repeated or overlapping adds are therefore idempotent in total covered
/// area, which also bounds memory growth between frames.
///
/// One `Damage` lives for the whole process, owned by the application
/// context and handed by `&mut` to structural-mutation code (the sole
/// writers) and to [`redraw`](crate::redraw) (the sole drain). Single-writer
/// discipline comes from single-threaded execution and the borrow checker,
/// not from locks.
#[derive(Clone, Debug, Default)]
pub struct Damage {
    region: Region,
}

impl Damage {
    /// Create an empty damage set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a stale screen region into the set.
    ///
    /// This is the single write entrypoint, called by move/resize/scroll/
    /// show/hide/restack code whenever pixels go stale. Empty rects are
    /// ignored; overlap with already-recorded damage is discarded.
    pub fn add_rect(&mut self, rect: Rect) {
        self.region.add_rect(rect);
    }

    /// The pending damaged rects, in no particular order.
    pub fn rects(&self) -> &[Rect] {
        self.region.rects()
    }

    /// Whether nothing awaits repaint.
    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    /// Total damaged area in pixels.
    pub fn area(&self) -> i64 {
        self.region.area()
    }

    /// The smallest rect containing all pending damage, for coarse sizing
    /// queries. `None` when empty.
    pub fn union_rect(&self) -> Option<Rect> {
        self.region.bounding_rect()
    }

    /// Take the whole pending set, leaving the accumulator empty.
    pub(crate) fn take(&mut self) -> Region {
        core::mem::take(&mut self.region)
    }
}
