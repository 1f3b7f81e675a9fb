// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborators that measure and draw on behalf of the engine.

use peniko::kurbo::Rect;
use peniko::Color;

use crate::{FontSpec, InlineImage};

/// Vertical metrics of a font at a given size.
#[derive(Copy, Clone, Default, PartialEq, Debug)]
pub struct FontMetrics {
    /// Distance from the top of the line box to the baseline.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line box.
    pub descent: f32,
}

impl FontMetrics {
    /// Total height of a line box.
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// Measures text runs.
///
/// The engine assumes simple left-to-right runs: the advance of an element is
/// whatever the measurer reports for its text.
pub trait TextMeasurer {
    /// Horizontal advance of `text` in `font`.
    fn advance(&self, text: &str, font: &FontSpec) -> f32;

    /// Vertical metrics of `font`.
    fn metrics(&self, font: &FontSpec) -> FontMetrics;
}

/// A drawing surface.
pub trait Canvas {
    /// Fills `rect` with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draws a text run.
    ///
    /// `bounds` is the element box and `baseline` the absolute y of its baseline.
    fn draw_text(&mut self, text: &str, bounds: Rect, baseline: f64, font: &FontSpec, color: Color);

    /// Draws an inline image scaled into `bounds`.
    fn draw_image(&mut self, image: &InlineImage, bounds: Rect);
}

pub(crate) fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Rect {
    Rect::new(
        f64::from(x0),
        f64::from(y0),
        f64::from(x1),
        f64::from(y1),
    )
}
