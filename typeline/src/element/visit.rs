// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visiting elements: enter (save, update), act, leave (restore).

use alloc::vec::Vec;

use peniko::kurbo::Rect;

use crate::measure::rect;
use crate::{
    Canvas, ElementId, ElementKind, FontMetrics, Side, TextMeasurer, TypeEnvironment, TypeModel,
};

/// Text drawn after a line broken inside a word.
pub(crate) const BREAK_WORD_TEXT: &str = "-";

impl TypeModel {
    fn enter(&self, id: ElementId, env: &mut TypeEnvironment) {
        let element = self.element(id);
        for key in &element.save_types {
            env.save(*key);
        }
        for (_, updater) in &element.updaters {
            updater.apply(env);
        }
    }

    fn leave(&self, id: ElementId, env: &mut TypeEnvironment) {
        for key in &self.element(id).restore_types {
            if let Err(err) = env.restore(*key) {
                tracing::warn!(index = self.element(id).index, %err, "unbalanced effect");
            }
        }
    }

    fn skipped(&self, id: ElementId) -> Option<Vec<ElementId>> {
        match &self.element(id).kind {
            ElementKind::IgnoreEffect(skipped) => Some(skipped.clone()),
            _ => None,
        }
    }

    /// Applies the effects of `id` without measuring or drawing it.
    pub fn move_element(&self, id: ElementId, env: &mut TypeEnvironment) {
        self.enter(id, env);
        if let Some(skipped) = self.skipped(id) {
            for skipped in skipped {
                self.move_element(skipped, env);
            }
        }
        self.leave(id, env);
    }

    /// Measures `id` against the environment, applying its effects.
    ///
    /// Ellipsis and more-text elements measure against the environment's base
    /// state.
    pub fn measure_element<M: TextMeasurer + ?Sized>(
        &mut self,
        id: ElementId,
        env: &mut TypeEnvironment,
        measurer: &M,
    ) {
        if self.element(id).kind.is_decoration() {
            env.with_base_state(|env| self.measure_visit(id, env, measurer));
        } else {
            self.measure_visit(id, env, measurer);
        }
    }

    fn measure_visit<M: TextMeasurer + ?Sized>(
        &mut self,
        id: ElementId,
        env: &mut TypeEnvironment,
        measurer: &M,
    ) {
        self.enter(id, env);
        let (width, height, baseline) = match self.element(id).kind.clone() {
            ElementKind::Text | ElementKind::Ellipsis | ElementKind::MoreText => {
                text_box(env, measurer, &self.element(id).text)
            }
            ElementKind::BreakWord => text_box(env, measurer, BREAK_WORD_TEXT),
            ElementKind::Emoji(_) => {
                let (height, baseline) = line_box(env, measurer.metrics(&env.font()));
                (height, height, baseline)
            }
            ElementKind::Drawable(image) => (image.width, image.height, image.height),
            ElementKind::NextParagraph => {
                let (height, baseline) = line_box(env, measurer.metrics(&env.font()));
                (0.0, height, baseline)
            }
            ElementKind::IgnoreEffect(skipped) => {
                for skipped in skipped {
                    self.move_element(skipped, env);
                }
                (0.0, 0.0, 0.0)
            }
        };
        self.element_mut(id).set_measure(width, height, baseline);
        self.leave(id, env);
    }

    /// Draws `id`, applying its effects. Hidden elements only apply effects.
    pub fn draw_element<C: Canvas + ?Sized>(
        &self,
        id: ElementId,
        env: &mut TypeEnvironment,
        canvas: &mut C,
    ) {
        if self.element(id).kind.is_decoration() {
            env.with_base_state(|env| self.draw_visit(id, env, canvas));
        } else {
            self.draw_visit(id, env, canvas);
        }
    }

    fn draw_visit<C: Canvas + ?Sized>(
        &self,
        id: ElementId,
        env: &mut TypeEnvironment,
        canvas: &mut C,
    ) {
        self.enter(id, env);
        if let Some(skipped) = self.skipped(id) {
            for skipped in skipped {
                self.move_element(skipped, env);
            }
        } else if self.element(id).is_visible() {
            self.paint(id, env, canvas);
        }
        self.leave(id, env);
    }

    fn paint<C: Canvas + ?Sized>(&self, id: ElementId, env: &TypeEnvironment, canvas: &mut C) {
        let element = self.element(id);
        if element.measure_width + element.next_gap_width <= 0.0 {
            return;
        }
        let (x0, y0) = (element.x, element.y);
        let x1 = x0 + element.measure_width + element.next_gap_width;
        let y1 = y0 + element.measure_height;
        let baseline = y0 + element.baseline;

        let background = env.background_color();
        if background.components[3] > 0.0 {
            canvas.fill_rect(rect(x0, y0, x1, y1), background);
        }

        for side in Side::ALL {
            let border = env.border(side);
            if border.width <= 0.0 {
                continue;
            }
            let w = border.width;
            let strip = match side {
                Side::Top => rect(x0, y0, x1, y0 + w),
                Side::Right => rect(x1 - w, y0, x1, y1),
                Side::Bottom => rect(x0, y1 - w, x1, y1),
                Side::Left => rect(x0, y0, x0 + w, y1),
            };
            canvas.fill_rect(strip, border.color);
        }

        let content = rect(x0, y0, x0 + element.measure_width, y1);
        match &element.kind {
            ElementKind::Text | ElementKind::Ellipsis | ElementKind::MoreText => {
                draw_text(canvas, env, &element.text, content, baseline);
            }
            ElementKind::BreakWord => draw_text(canvas, env, BREAK_WORD_TEXT, content, baseline),
            ElementKind::Emoji(image) | ElementKind::Drawable(image) => {
                canvas.draw_image(image, content);
            }
            ElementKind::NextParagraph | ElementKind::IgnoreEffect(_) => {}
        }

        if let Some(underline) = env.underline() {
            let top = baseline + underline.offset;
            canvas.fill_rect(
                rect(x0, top, x1, top + underline.thickness),
                underline.color,
            );
        }
    }
}

/// Height and baseline of a line box in the current environment.
fn line_box(env: &TypeEnvironment, metrics: FontMetrics) -> (f32, f32) {
    match env.line_height() {
        Some(height) => (height, metrics.ascent + (height - metrics.height()) / 2.0),
        None => (metrics.height(), metrics.ascent),
    }
}

fn text_box<M: TextMeasurer + ?Sized>(
    env: &TypeEnvironment,
    measurer: &M,
    text: &str,
) -> (f32, f32, f32) {
    let font = env.font();
    let (height, baseline) = line_box(env, measurer.metrics(&font));
    (measurer.advance(text, &font), height, baseline)
}

fn draw_text<C: Canvas + ?Sized>(
    canvas: &mut C,
    env: &TypeEnvironment,
    text: &str,
    bounds: Rect,
    baseline: f32,
) {
    canvas.draw_text(
        text,
        bounds,
        f64::from(baseline),
        &env.font(),
        env.text_color(),
    );
}
