// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label records: the loose loader-side input and the validated, immutable record.

use alloc::string::String;

use kurbo::Point;

use crate::error::MalformedReason;

/// A label candidate as handed over by an external loader.
///
/// Fields are public and unchecked; [`IndexBuilder`](crate::IndexBuilder) validates every
/// record before building and turns it into an immutable [`Label`].
#[derive(Clone, Debug, PartialEq)]
pub struct LabelInput {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Elimination time. Higher values stay visible longer.
    pub t: f64,
    /// External identifier, opaque to the index.
    pub id: i64,
    /// Priority class, opaque to the index.
    pub priority: i32,
    /// Display scale factor, opaque to the index.
    pub scale: f64,
    /// Label text. `None` models a record whose text is missing.
    pub text: Option<String>,
}

impl LabelInput {
    /// Create an input record with text, priority `0` and scale `1.0`.
    pub fn new(x: f64, y: f64, t: f64, id: i64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            t,
            id,
            priority: 0,
            scale: 1.0,
            text: Some(text.into()),
        }
    }

    /// Set the priority class.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the display scale factor.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub(crate) fn into_label(self) -> Result<Label, MalformedReason> {
        if !self.x.is_finite() {
            return Err(MalformedReason::NonFiniteX);
        }
        if !self.y.is_finite() {
            return Err(MalformedReason::NonFiniteY);
        }
        if !self.t.is_finite() {
            return Err(MalformedReason::NonFiniteT);
        }
        let text = self.text.ok_or(MalformedReason::MissingText)?;
        Ok(Label {
            position: Point::new(self.x, self.y),
            t: self.t,
            id: self.id,
            priority: self.priority,
            scale: self.scale,
            text,
        })
    }
}

/// A validated label record.
///
/// Coordinates and elimination time are always finite. Records are immutable once built;
/// the index only ever hands out shared references to them.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    position: Point,
    t: f64,
    id: i64,
    priority: i32,
    scale: f64,
    text: String,
}

impl Label {
    /// Position of the label.
    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Horizontal coordinate.
    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// Vertical coordinate.
    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Elimination time.
    #[inline]
    pub fn t(&self) -> f64 {
        self.t
    }

    /// External identifier.
    #[inline]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Priority class.
    #[inline]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Display scale factor.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Label text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<Label> for LabelInput {
    fn from(label: Label) -> Self {
        Self {
            x: label.position.x,
            y: label.position.y,
            t: label.t,
            id: label.id,
            priority: label.priority,
            scale: label.scale,
            text: Some(label.text),
        }
    }
}
