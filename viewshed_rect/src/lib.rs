// Copyright 2026 the Viewshed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewshed Rect: exact integer rectangle algebra for damage-driven repaint.
//!
//! This crate is the geometry substrate of the Viewshed stack. It provides
//! axis-aligned rectangles over signed integer pixel coordinates and sets of
//! pairwise-disjoint rectangles, with the operations occlusion and dirty-region
//! bookkeeping are built on:
//!
//! - [`Rect`]: a value-type rectangle over half-open pixel spans, with
//!   [`Rect::intersects`], [`Rect::intersection`], and [`Rect::union`].
//! - [`split_intersection`]: the central primitive. It decomposes a candidate
//!   rect into its overlap with a container plus at most four disjoint
//!   remainder strips, covering the candidate exactly: no gaps, no
//!   double-covered pixels. Precision here is load-bearing: an off-by-one
//!   produces a one-pixel seam or a double-paint flicker downstream.
//! - [`Region`]: a disjoint rect set with clipping, subtraction, and a
//!   deduplicating [`Region::add_rect`] suitable for damage accumulation.
//!
//! Every operation is total: "no overlap" is `None` or an empty result, never
//! an error, and computed extents are clamped to zero rather than allowed to
//! go negative.
//!
//! # Example
//!
//! ```rust
//! use viewshed_rect::{Rect, Region};
//!
//! // A window silhouette with a smaller window in front of it.
//! let mut visible = Region::from_rect(Rect::new(0, 0, 100, 100));
//! visible.subtract_rect(Rect::new(50, 50, 100, 100));
//!
//! // The L-shaped remainder is stored as two disjoint strips.
//! assert_eq!(visible.area(), 100 * 100 - 50 * 50);
//! assert!(visible.contains_point(0, 0));
//! assert!(!visible.contains_point(50, 50));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod rect;
mod region;

pub use rect::{Rect, SplitIntersection, split_intersection};
pub use region::Region;
