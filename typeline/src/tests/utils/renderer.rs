// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo::Rect;
use peniko::Color;
use tiny_skia::{Paint, Pixmap, Transform};

use crate::{Canvas, FontSpec, InlineImage};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DrawOp {
    Rect {
        rect: Rect,
        color: Color,
    },
    Text {
        text: String,
        bounds: Rect,
        baseline: f64,
        size: f32,
        color: Color,
    },
    Image {
        id: u64,
        bounds: Rect,
    },
}

/// Records every call in order.
#[derive(Debug, Default)]
pub(crate) struct RecordingCanvas {
    pub(crate) ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    /// The text runs drawn, with their colors.
    pub(crate) fn texts(&self) -> Vec<(String, Color)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, color, .. } => Some((text.clone(), *color)),
                _ => None,
            })
            .collect()
    }

    /// The rectangles filled, with their colors.
    pub(crate) fn rects(&self) -> Vec<(Rect, Color)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::Rect { rect, color });
    }

    fn draw_text(&mut self, text: &str, bounds: Rect, baseline: f64, font: &FontSpec, color: Color) {
        self.ops.push(DrawOp::Text {
            text: text.into(),
            bounds,
            baseline,
            size: font.size,
            color,
        });
    }

    fn draw_image(&mut self, image: &InlineImage, bounds: Rect) {
        self.ops.push(DrawOp::Image {
            id: image.id,
            bounds,
        });
    }
}

/// Rasterizes rectangles into a tiny-skia pixmap. Text is not rasterized;
/// images are filled gray.
pub(crate) struct PixmapCanvas {
    pub(crate) pixmap: Pixmap,
}

impl PixmapCanvas {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            pixmap: Pixmap::new(width, height).expect("non-zero pixmap size"),
        }
    }

    /// Premultiplied RGBA at `(x, y)`.
    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let pixel = self.pixmap.pixel(x, y).expect("pixel inside the pixmap");
        [pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()]
    }

    fn fill(&mut self, rect: Rect, color: Color) {
        let Some(rect) = tiny_skia::Rect::from_ltrb(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.x1 as f32,
            rect.y1 as f32,
        ) else {
            return;
        };
        let rgba = color.to_rgba8();
        let mut paint = Paint::default();
        paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, rgba.a);
        paint.anti_alias = false;
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }
}

impl Canvas for PixmapCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill(rect, color);
    }

    fn draw_text(&mut self, _: &str, _: Rect, _: f64, _: &FontSpec, _: Color) {}

    fn draw_image(&mut self, _: &InlineImage, bounds: Rect) {
        self.fill(bounds, peniko::color::palette::css::GRAY);
    }
}
