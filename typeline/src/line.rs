// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual lines and their pool.

use alloc::vec::Vec;

use crate::element::visit::BREAK_WORD_TEXT;
use crate::{
    Alignment, Canvas, Element, ElementId, ElementKind, LineBreakType, TextMeasurer,
    TypeEnvironment, TypeModel, Visibility, WordPart,
};

/// How many split points a line searches backwards for a word boundary.
const MAX_WORD_BREAK_LOOKBACK: usize = 30;

/// One visual line: an ordered run of elements and its placement.
#[derive(Clone, Debug, Default)]
pub struct Line {
    elements: Vec<ElementId>,
    x: f32,
    y: f32,
    width_limit: f32,
    content_width: f32,
    content_height: f32,
    baseline: f32,
    layout_width: f32,
    justified: bool,
}

impl Line {
    /// The elements of this line in visual order.
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    /// Left edge, including any indent.
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Top edge.
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Width available to content after indentation.
    pub fn width_limit(&self) -> f32 {
        self.width_limit
    }

    /// Summed width of visible elements, justify gaps included.
    pub fn content_width(&self) -> f32 {
        self.content_width
    }

    /// Height of the line box.
    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    /// Distance from the top of the line to its shared baseline.
    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    /// Width occupied after alignment: the width limit for justified lines,
    /// the content width otherwise.
    pub fn layout_width(&self) -> f32 {
        self.layout_width
    }

    /// Returns `true` if slack was distributed between words.
    pub fn is_justified(&self) -> bool {
        self.justified
    }

    /// Returns `true` if the line holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of elements, hidden ones included.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the last element is a paragraph break.
    pub fn ends_paragraph(&self, model: &TypeModel) -> bool {
        self.elements
            .last()
            .is_some_and(|id| model.element(*id).is_paragraph_break())
    }

    fn reset(&mut self) {
        self.elements.clear();
        self.x = 0.0;
        self.y = 0.0;
        self.width_limit = 0.0;
        self.content_width = 0.0;
        self.content_height = 0.0;
        self.baseline = 0.0;
        self.layout_width = 0.0;
        self.justified = false;
    }

    /// Places an empty line at `y` with the full available width.
    pub(crate) fn start(&mut self, y: f32, width_limit: f32) {
        self.y = y;
        self.x = 0.0;
        self.width_limit = width_limit;
    }

    /// Narrows the line by a leading indent.
    pub(crate) fn set_indent(&mut self, indent: f32, full_width: f32) {
        self.x = indent;
        self.width_limit = full_width - indent;
    }

    /// Appends `id`, making it visible again if an earlier layout hid it.
    pub(crate) fn add(&mut self, model: &mut TypeModel, id: ElementId) {
        self.grow(reveal(model, id));
        self.elements.push(id);
    }

    /// Prepends `id`.
    pub(crate) fn add_first(&mut self, model: &mut TypeModel, id: ElementId) {
        self.grow(reveal(model, id));
        self.elements.insert(0, id);
    }

    fn grow(&mut self, element: &Element) {
        self.content_width += element.measure_width;
        let descent =
            (self.content_height - self.baseline).max(element.measure_height - element.baseline);
        self.baseline = self.baseline.max(element.baseline);
        self.content_height = self.baseline + descent;
    }

    /// Removes and returns the last element.
    pub(crate) fn pop(&mut self, model: &TypeModel) -> Option<ElementId> {
        let id = self.elements.pop()?;
        self.recompute_metrics(model);
        Some(id)
    }

    /// Empties the line, keeping its position.
    pub(crate) fn take_elements(&mut self) -> Vec<ElementId> {
        self.content_width = 0.0;
        self.content_height = 0.0;
        self.baseline = 0.0;
        self.layout_width = 0.0;
        self.justified = false;
        core::mem::take(&mut self.elements)
    }

    /// Rebuilds width, height and baseline from the visible elements.
    pub(crate) fn recompute_metrics(&mut self, model: &TypeModel) {
        let mut width = 0.0_f32;
        let mut ascent = 0.0_f32;
        let mut descent = 0.0_f32;
        for id in &self.elements {
            let element = model.element(*id);
            if !element.is_visible() {
                continue;
            }
            width += element.occupied_width();
            ascent = ascent.max(element.baseline);
            descent = descent.max(element.measure_height - element.baseline);
        }
        self.content_width = width;
        self.baseline = ascent;
        self.content_height = ascent + descent;
    }

    /// Width of the visible elements before position `end`.
    fn prefix_width(&self, model: &TypeModel, end: usize) -> f32 {
        self.elements[..end]
            .iter()
            .map(|id| model.element(*id).occupied_width())
            .sum()
    }

    /// Backs off a word that would be split by ending the line before `next`.
    ///
    /// Searches split points from the end of the line backwards. A split is
    /// acceptable if it falls between words, or inside a word before an
    /// element marked [`LineBreakType::WordBreakAllowed`] when a hyphen still
    /// fits; in the latter case a hyphen element is appended. Splits before a
    /// [`LineBreakType::NotStart`] element or after a
    /// [`LineBreakType::NotEnd`] element are never taken.
    ///
    /// Returns the elements removed from the end of the line, which belong at
    /// the start of the next line. Returns `None` if the line already ends at
    /// a boundary or no acceptable split exists within the lookback window; in
    /// the latter case the line keeps all of its elements.
    pub(crate) fn handle_word_break<M: TextMeasurer + ?Sized>(
        &mut self,
        model: &mut TypeModel,
        env: &mut TypeEnvironment,
        measurer: &M,
        next: Option<ElementId>,
    ) -> Option<Vec<ElementId>> {
        let next = next?;
        let len = self.elements.len();
        // Never split off everything after leading ignore-effect elements.
        let replaying = self
            .elements
            .iter()
            .take_while(|id| matches!(model.element(**id).kind, ElementKind::IgnoreEffect(_)))
            .count();
        let lowest = len
            .saturating_sub(MAX_WORD_BREAK_LOOKBACK)
            .max(replaying + 1);
        let mut split = None;
        for at in (lowest..=len).rev() {
            let before = model.element(self.elements[at - 1]);
            let after = model.element(if at == len { next } else { self.elements[at] });
            if after.line_break_type == LineBreakType::NotStart
                || before.line_break_type == LineBreakType::NotEnd
            {
                continue;
            }
            let inside_word = before.word_part.continues_word()
                && matches!(after.word_part, WordPart::Middle | WordPart::End);
            if !inside_word {
                split = Some((at, false));
                break;
            }
            if after.line_break_type == LineBreakType::WordBreakAllowed {
                let hyphen = measurer.advance(BREAK_WORD_TEXT, &env.font());
                if self.prefix_width(model, at) + hyphen <= self.width_limit {
                    split = Some((at, true));
                    break;
                }
            }
        }
        let (at, hyphenate) = split?;
        if at == len && !hyphenate {
            return None;
        }
        let deferred = self.elements.split_off(at);
        self.recompute_metrics(model);
        if hyphenate {
            let id = model.push_synthetic(Element::synthetic(
                ElementKind::BreakWord,
                BREAK_WORD_TEXT,
            ));
            model.measure_element(id, env, measurer);
            self.add(model, id);
        }
        tracing::trace!(split = at, deferred = deferred.len(), hyphenate, "word break");
        Some(deferred)
    }

    /// Finalizes horizontal placement.
    ///
    /// `is_end` marks the last line of the content, which is treated like the
    /// last line of a paragraph for justification.
    pub(crate) fn layout(
        &mut self,
        model: &mut TypeModel,
        env: &TypeEnvironment,
        drop_last_if_space: bool,
        is_end: bool,
    ) {
        for id in &self.elements {
            let element = model.element_mut(*id);
            element.visibility = Visibility::Visible;
            element.next_gap_width = 0.0;
        }
        if drop_last_if_space {
            let trailing = self
                .elements
                .iter()
                .rev()
                .find(|id| !model.element(**id).is_paragraph_break())
                .copied();
            if let Some(id) = trailing.filter(|id| model.element(*id).is_space()) {
                model.element_mut(id).visibility = Visibility::Gone;
            }
        }
        self.recompute_metrics(model);

        let slack = self.width_limit - self.content_width;
        let paragraph_end = is_end || self.ends_paragraph(model);
        let offset = match env.alignment() {
            Alignment::Left => 0.0,
            // An unbounded line has no edge to align against.
            _ if !slack.is_finite() => 0.0,
            Alignment::Right => slack.max(0.0),
            Alignment::Center => (slack / 2.0).max(0.0),
            Alignment::Justify => {
                if slack.is_finite()
                    && slack > 0.0
                    && (!paragraph_end || slack <= env.last_line_justify_max_width())
                {
                    self.justify(model, slack);
                }
                0.0
            }
        };
        self.layout_width = if self.justified {
            self.width_limit
        } else {
            self.content_width
        };
        self.position(model, self.x + offset);
    }

    /// Distributes `slack` evenly before each visible word start after the
    /// first element. The remainder of the integer division is not placed.
    fn justify(&mut self, model: &mut TypeModel, slack: f32) {
        let mut gaps = Vec::new();
        let mut prev_visible = None;
        for id in &self.elements {
            let element = model.element(*id);
            if !element.is_visible() || element.is_paragraph_break() {
                continue;
            }
            if let Some(prev) = prev_visible.filter(|_| element.word_part.starts_word()) {
                gaps.push(prev);
            }
            prev_visible = Some(*id);
        }
        if gaps.is_empty() {
            return;
        }
        let share = (slack / gaps.len() as f32).floor();
        if share <= 0.0 {
            return;
        }
        for id in &gaps {
            model.element_mut(*id).next_gap_width = share;
        }
        self.content_width += share * gaps.len() as f32;
        self.justified = true;
    }

    fn position(&self, model: &mut TypeModel, start: f32) {
        let mut x = start;
        for id in &self.elements {
            let element = model.element_mut(*id);
            element.x = x;
            element.y = self.y + self.baseline - element.baseline;
            if element.is_visible() {
                x += element.measure_width + element.next_gap_width;
            }
        }
    }

    /// Moves the line and its elements down by `dy`.
    pub(crate) fn offset_y(&mut self, model: &mut TypeModel, dy: f32) {
        self.y += dy;
        for id in &self.elements {
            model.element_mut(*id).y += dy;
        }
    }

    /// Draws every element in order.
    pub fn draw<C: Canvas + ?Sized>(
        &self,
        model: &TypeModel,
        env: &mut TypeEnvironment,
        canvas: &mut C,
    ) {
        for id in &self.elements {
            model.draw_element(*id, env, canvas);
        }
    }

    /// Applies every element's effects without drawing.
    pub fn traverse(&self, model: &TypeModel, env: &mut TypeEnvironment) {
        for id in &self.elements {
            model.move_element(*id, env);
        }
    }
}

fn reveal(model: &mut TypeModel, id: ElementId) -> &Element {
    let element = model.element_mut(id);
    element.visibility = Visibility::Visible;
    element.next_gap_width = 0.0;
    element
}

/// Recycles [`Line`] allocations across layout passes.
#[derive(Debug)]
pub struct LinePool {
    free: Vec<Line>,
    capacity: usize,
}

impl LinePool {
    /// Creates a pool that retains at most `capacity` released lines.
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Takes a cleared line from the pool, or allocates one.
    pub fn acquire(&mut self) -> Line {
        self.free.pop().unwrap_or_default()
    }

    /// Returns `line` to the pool. Lines beyond capacity are dropped.
    pub fn release(&mut self, mut line: Line) {
        if self.free.len() < self.capacity {
            line.reset();
            self.free.push(line);
        }
    }

    /// Number of lines ready for reuse.
    pub fn available(&self) -> usize {
        self.free.len()
    }
}
