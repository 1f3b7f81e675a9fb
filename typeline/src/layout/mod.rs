// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Breaking a [`TypeModel`] into lines.

mod ellipsis;
pub mod indent;

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::{self, Vec};

use peniko::Color;

use crate::line::{Line, LinePool};
use crate::{
    Canvas, ElementId, LineIndentHandler, TextMeasurer, TypeEnvironment, TypeModel, Underline,
};

/// Where content is cut when it does not fit in the allowed lines.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Ellipsize {
    /// Keep the beginning; the last kept line ends with an ellipsis.
    End,
    /// Keep the ending; the first line starts with an ellipsis.
    Start,
    /// Keep both ends with an ellipsis spliced in between.
    Middle,
}

/// Decoration text drawn after an end ellipsis, such as "more".
#[derive(Clone, PartialEq, Debug)]
pub struct MoreText {
    /// The text shown.
    pub text: String,
    /// Text color; the base text color if `None`.
    pub color: Option<Color>,
    /// Underline; none if `None`.
    pub underline: Option<Underline>,
}

impl MoreText {
    /// Decoration text drawn in the base style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            underline: None,
        }
    }

    /// Draws the decoration in `color`.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Underlines the decoration.
    pub fn with_underline(mut self, underline: Underline) -> Self {
        self.underline = Some(underline);
        self
    }
}

/// Parameters of a [`LineLayout`].
#[derive(Clone, PartialEq, Debug)]
pub struct LayoutOptions {
    /// Maximum number of lines; `usize::MAX` for unlimited.
    pub max_lines: usize,
    /// How overflowing content is cut. `None` drops the overflow without a
    /// marker.
    pub ellipsize: Option<Ellipsize>,
    /// Lay out all content even when it will be truncated, so that
    /// [`LineLayout::natural_line_count`] reports the full count.
    pub calculate_whole_lines: bool,
    /// Hide a single space ending a line.
    pub drop_last_if_space: bool,
    /// The ellipsis marker text.
    pub ellipsis: String,
    /// Decoration drawn after an end ellipsis.
    pub more: Option<MoreText>,
    /// Number of released lines kept for reuse.
    pub pool_capacity: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_lines: usize::MAX,
            ellipsize: None,
            calculate_whole_lines: false,
            drop_last_if_space: true,
            ellipsis: String::from("..."),
            more: None,
            pool_capacity: 16,
        }
    }
}

enum Source {
    Chain(Option<ElementId>),
    List(vec::IntoIter<ElementId>),
}

impl Source {
    fn next(&mut self, model: &TypeModel) -> Option<ElementId> {
        match self {
            Self::Chain(cursor) => {
                let id = (*cursor)?;
                *cursor = model.next(id);
                Some(id)
            }
            Self::List(ids) => ids.next(),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Flow {
    Complete,
    Interrupted,
}

/// The line-breaking driver.
///
/// Each call to [`measure_and_layout`](Self::measure_and_layout) measures the
/// model's elements in order against the environment, fills lines greedily up
/// to the environment's width limit and then applies the configured ellipsis
/// if the content needs more lines than allowed.
pub struct LineLayout {
    options: LayoutOptions,
    lines: Vec<Line>,
    pool: LinePool,
    indent: Option<Box<dyn LineIndentHandler>>,
    natural_lines: usize,
    truncated: bool,
}

impl core::fmt::Debug for LineLayout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LineLayout")
            .field("options", &self.options)
            .field("lines", &self.lines)
            .field("indent", &self.indent.is_some())
            .field("natural_lines", &self.natural_lines)
            .field("truncated", &self.truncated)
            .finish_non_exhaustive()
    }
}

impl Default for LineLayout {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

impl LineLayout {
    /// Creates a layout with `options`.
    pub fn new(options: LayoutOptions) -> Self {
        let pool = LinePool::new(options.pool_capacity);
        Self {
            options,
            lines: Vec::new(),
            pool,
            indent: None,
            natural_lines: 0,
            truncated: false,
        }
    }

    /// The current options.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Mutable access to the options. Takes effect on the next layout pass.
    pub fn options_mut(&mut self) -> &mut LayoutOptions {
        &mut self.options
    }

    /// Installs a per-line indent handler.
    pub fn set_indent_handler(&mut self, handler: Option<Box<dyn LineIndentHandler>>) {
        self.indent = handler;
    }

    /// The finalized lines of the last pass.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Width of the widest line, indent included.
    pub fn content_width(&self) -> f32 {
        self.lines
            .iter()
            .map(|line| line.x() + line.layout_width())
            .fold(0.0, f32::max)
    }

    /// Bottom edge of the last line.
    pub fn content_height(&self) -> f32 {
        self.lines
            .last()
            .map_or(0.0, |line| line.y() + line.content_height())
    }

    /// Number of lines the content produced before truncation.
    ///
    /// When truncation stops layout early, this counts only the lines built
    /// before stopping; set [`LayoutOptions::calculate_whole_lines`] for the
    /// full count.
    pub fn natural_line_count(&self) -> usize {
        self.natural_lines
    }

    /// Returns `true` if the last pass dropped content.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    fn release_lines(&mut self) {
        for line in self.lines.drain(..) {
            self.pool.release(line);
        }
    }

    /// Measures `model` and breaks it into lines.
    ///
    /// A `None` model, a non-positive width limit or `max_lines == 0` all
    /// produce no lines. The environment is cleared before and after the pass.
    pub fn measure_and_layout<M: TextMeasurer + ?Sized>(
        &mut self,
        model: Option<&mut TypeModel>,
        env: &mut TypeEnvironment,
        measurer: &M,
    ) {
        self.release_lines();
        self.natural_lines = 0;
        self.truncated = false;
        let Some(model) = model else {
            return;
        };
        model.reset_synthetic();
        env.clear();
        if env.width_limit() <= 0.0 || self.options.max_lines == 0 {
            tracing::debug!(width = env.width_limit(), "nothing to lay out");
            return;
        }
        if let Some(indent) = self.indent.as_mut() {
            indent.reset();
        }

        let max_lines = self.options.max_lines;
        let interruptible = !self.options.calculate_whole_lines
            && matches!(self.options.ellipsize, None | Some(Ellipsize::End));
        let limit = if interruptible { max_lines } else { usize::MAX };
        let first = model.first();
        let flow = self.flow(model, env, measurer, Source::Chain(first), limit);
        env.clear();
        self.natural_lines = self.lines.len();

        let max = max_lines.min(self.lines_in_height(env)).max(1);
        if flow == Flow::Interrupted || self.lines.len() > max {
            self.truncated = true;
            match self.options.ellipsize {
                None => self.truncate(max),
                Some(Ellipsize::End) => ellipsis::ellipsize_end(self, model, env, measurer, max),
                Some(Ellipsize::Start) => {
                    ellipsis::ellipsize_start(self, model, env, measurer, max);
                }
                Some(Ellipsize::Middle) => {
                    ellipsis::ellipsize_middle(self, model, env, measurer, max);
                }
            }
            env.clear();
        }
        tracing::debug!(
            lines = self.lines.len(),
            natural_lines = self.natural_lines,
            max_lines,
            truncated = self.truncated,
            ellipsize = ?self.options.ellipsize,
            "layout pass"
        );
    }

    /// Draws every line, clearing the environment before and after.
    pub fn draw<C: Canvas + ?Sized>(
        &self,
        model: &TypeModel,
        env: &mut TypeEnvironment,
        canvas: &mut C,
    ) {
        env.clear();
        for line in &self.lines {
            line.draw(model, env, canvas);
        }
        env.clear();
    }

    /// Number of leading lines whose bottom edge fits the height limit.
    fn lines_in_height(&self, env: &TypeEnvironment) -> usize {
        let limit = env.height_limit();
        self.lines
            .iter()
            .take_while(|line| line.y() + line.content_height() <= limit)
            .count()
    }

    fn truncate(&mut self, max: usize) {
        let keep = max.min(self.lines.len());
        for line in self.lines.drain(keep..) {
            self.pool.release(line);
        }
    }

    /// Fills lines from `source` until it runs dry, or until content remains
    /// once `limit` lines are finalized.
    fn flow<M: TextMeasurer + ?Sized>(
        &mut self,
        model: &mut TypeModel,
        env: &mut TypeEnvironment,
        measurer: &M,
        mut source: Source,
        limit: usize,
    ) -> Flow {
        let drop_last_if_space = self.options.drop_last_if_space;
        let full_width = env.width_limit();
        let mut pending = VecDeque::new();
        let mut new_paragraph = true;
        let mut y = 0.0;
        let mut line = self.pool.acquire();
        line.start(y, full_width);

        loop {
            // Deferred elements were measured when they first came out of the source.
            let id = match pending.pop_front() {
                Some(id) => id,
                None => match source.next(model) {
                    Some(id) => {
                        model.measure_element(id, env, measurer);
                        id
                    }
                    None => break,
                },
            };

            if line.is_empty() {
                if self.lines.len() >= limit {
                    self.pool.release(line);
                    return Flow::Interrupted;
                }
                if let Some(indent) = self.indent.as_mut() {
                    let px = indent.process_indent(model, id, new_paragraph);
                    line.set_indent(px, full_width);
                }
                new_paragraph = false;
            }

            let element = model.element(id);
            if element.is_paragraph_break() {
                line.add(model, id);
                line.layout(model, env, drop_last_if_space, false);
                y += line.content_height() + env.paragraph_space();
                self.lines.push(line);
                line = self.pool.acquire();
                line.start(y, full_width);
                new_paragraph = true;
                continue;
            }

            let fits =
                line.is_empty() || line.content_width() + element.measure_width <= line.width_limit();
            let absorbed_space = drop_last_if_space
                && element.is_space()
                && line
                    .elements()
                    .last()
                    .is_some_and(|last| !model.element(*last).is_space());
            if fits || absorbed_space {
                line.add(model, id);
                continue;
            }

            let deferred = line
                .handle_word_break(model, env, measurer, Some(id))
                .unwrap_or_default();
            line.layout(model, env, drop_last_if_space, false);
            y += line.content_height() + env.line_space();
            self.lines.push(line);
            line = self.pool.acquire();
            line.start(y, full_width);
            pending.push_front(id);
            for id in deferred.into_iter().rev() {
                pending.push_front(id);
            }
        }

        if line.is_empty() {
            self.pool.release(line);
        } else {
            line.layout(model, env, drop_last_if_space, true);
            self.lines.push(line);
        }
        Flow::Complete
    }
}
