// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query windows, split axes, and bounding-box helpers.

use core::cmp::Ordering;

use kurbo::{Point, Rect};

use crate::label::Label;

/// Split axis of a tree node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Split on x (even depths).
    X,
    /// Split on y (odd depths).
    Y,
}

impl Axis {
    /// The axis used at `depth`, counted from the root at depth `0`.
    #[inline]
    pub const fn at_depth(depth: usize) -> Self {
        if depth % 2 == 0 { Self::X } else { Self::Y }
    }

    /// The other axis.
    #[inline]
    pub const fn flip(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// The coordinate of `p` along this axis.
    #[inline]
    pub fn coord(self, p: Point) -> f64 {
        match self {
            Self::X => p.x,
            Self::Y => p.y,
        }
    }

    /// Total order of two labels along this axis.
    ///
    /// Label coordinates are finite, so this agrees with `<` and `==`.
    #[inline]
    pub(crate) fn cmp_labels(self, a: &Label, b: &Label) -> Ordering {
        self.coord(a.position()).total_cmp(&self.coord(b.position()))
    }
}

/// A range query: a minimum elimination time and an inclusive rectangle.
///
/// The rectangle is stored as given and never normalized, so a window with
/// `min_x > max_x` or `min_y > max_y` selects nothing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QueryWindow {
    /// Labels with `t < min_t` are excluded.
    pub min_t: f64,
    /// Inclusive spatial range, `x0..=x1` by `y0..=y1`.
    pub rect: Rect,
}

impl QueryWindow {
    /// Create a window, taking arguments in `(min_t, min_x, max_x, min_y, max_y)` order.
    pub const fn new(min_t: f64, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_t,
            rect: Rect::new(min_x, min_y, max_x, max_y),
        }
    }

    /// Create a window from a rectangle in `kurbo` corner form.
    pub const fn from_rect(min_t: f64, rect: Rect) -> Self {
        Self { min_t, rect }
    }

    /// Whether the window can match nothing regardless of the data.
    ///
    /// True for inverted ranges and for any NaN bound.
    pub fn is_empty(&self) -> bool {
        let r = self.rect;
        !(r.x0 <= r.x1 && r.y0 <= r.y1) || self.min_t.is_nan()
    }

    /// Whether `label` satisfies the full predicate (t, x, and y).
    #[inline]
    pub fn contains(&self, label: &Label) -> bool {
        label.t() >= self.min_t && self.contains_point(label.position())
    }

    #[inline]
    pub(crate) fn contains_point(&self, p: Point) -> bool {
        let r = self.rect;
        r.x0 <= p.x && p.x <= r.x1 && r.y0 <= p.y && p.y <= r.y1
    }

    /// Whether the window's rectangle touches `bounds` (closed intervals on both sides).
    #[inline]
    pub(crate) fn intersects(&self, bounds: Rect) -> bool {
        let r = self.rect;
        bounds.x0 <= r.x1 && r.x0 <= bounds.x1 && bounds.y0 <= r.y1 && r.y0 <= bounds.y1
    }
}

/// The seed for bounding-box aggregation: inverted and infinite, the identity of union.
pub(crate) const EMPTY_BOUNDS: Rect = Rect::new(
    f64::INFINITY,
    f64::INFINITY,
    f64::NEG_INFINITY,
    f64::NEG_INFINITY,
);

/// Grow `bounds` to include `p`. Uses only min/max, so the result is exact.
#[inline]
pub(crate) fn union_point(bounds: Rect, p: Point) -> Rect {
    Rect::new(
        bounds.x0.min(p.x),
        bounds.y0.min(p.y),
        bounds.x1.max(p.x),
        bounds.y1.max(p.y),
    )
}

/// Union of two bounding boxes, treating [`EMPTY_BOUNDS`] as the identity.
#[inline]
pub(crate) fn union_bounds(a: Rect, b: Rect) -> Rect {
    Rect::new(
        a.x0.min(b.x0),
        a.y0.min(b.y0),
        a.x1.max(b.x1),
        a.y1.max(b.y1),
    )
}
