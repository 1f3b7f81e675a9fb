// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A host view binding over parser, model, environment and layout.

use alloc::boxed::Box;

use peniko::Color;

use crate::{
    Alignment, Canvas, Error, LayoutOptions, LineIndentHandler, LineLayout, Parser, PropValue,
    TextMeasurer, TypeEnvironment, TypeModel, Typeface,
};

/// Owns everything needed to show one piece of rich text.
///
/// A host translates its measure and draw callbacks into [`measure`] and
/// [`draw`]. Property setters only mark the view dirty; the next measure or
/// draw lays the text out again.
///
/// [`measure`]: Self::measure
/// [`draw`]: Self::draw
#[derive(Debug)]
pub struct TypeView<M> {
    parser: Parser,
    model: Option<TypeModel>,
    env: TypeEnvironment,
    layout: LineLayout,
    measurer: M,
    limits: Option<(f32, f32)>,
    dirty: bool,
}

impl<M: TextMeasurer> TypeView<M> {
    /// Creates an empty view measuring with `measurer`.
    pub fn new(measurer: M) -> Self {
        Self {
            parser: Parser::new(),
            model: None,
            env: TypeEnvironment::new(),
            layout: LineLayout::default(),
            measurer,
            limits: None,
            dirty: true,
        }
    }

    /// Replaces the parser used by [`set_text`](Self::set_text).
    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }

    /// Replaces the layout options.
    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.layout = LineLayout::new(options);
        self
    }

    /// Parses `text`, dropping the previous model and its effects.
    pub fn set_text(&mut self, text: &str) {
        self.model = self.parser.parse(text);
        self.dirty = true;
    }

    /// The parsed text, if any.
    pub fn model(&self) -> Option<&TypeModel> {
        self.model.as_ref()
    }

    /// Mutable access to the model, e.g. to attach effects.
    pub fn model_mut(&mut self) -> Option<&mut TypeModel> {
        self.dirty = true;
        self.model.as_mut()
    }

    /// The environment holding the base style.
    pub fn env(&self) -> &TypeEnvironment {
        &self.env
    }

    /// The layout of the last pass.
    pub fn layout(&self) -> &LineLayout {
        &self.layout
    }

    /// Mutable access to the layout options.
    pub fn options_mut(&mut self) -> &mut LayoutOptions {
        self.dirty = true;
        self.layout.options_mut()
    }

    /// Installs a per-line indent handler.
    pub fn set_indent_handler(&mut self, handler: Option<Box<dyn LineIndentHandler>>) {
        self.layout.set_indent_handler(handler);
        self.dirty = true;
    }

    /// Sets a base style property.
    ///
    /// Fails with [`ErrorKind::EnvironmentRunning`](crate::ErrorKind::EnvironmentRunning)
    /// while a traversal is in progress.
    pub fn set_property(&mut self, value: PropValue) -> Result<(), Error> {
        self.env.set(value)?;
        self.dirty = true;
        Ok(())
    }

    /// Sets the base text color.
    pub fn set_text_color(&mut self, color: Color) -> Result<(), Error> {
        self.set_property(PropValue::TextColor(color))
    }

    /// Sets the base text size.
    pub fn set_text_size(&mut self, size: f32) -> Result<(), Error> {
        self.set_property(PropValue::TextSize(size))
    }

    /// Sets the base typeface.
    pub fn set_typeface(&mut self, typeface: Typeface) -> Result<(), Error> {
        self.set_property(PropValue::Typeface(typeface))
    }

    /// Sets the line alignment.
    pub fn set_alignment(&mut self, alignment: Alignment) -> Result<(), Error> {
        self.set_property(PropValue::Alignment(alignment))
    }

    /// Sets the space between lines of one paragraph.
    pub fn set_line_space(&mut self, space: f32) -> Result<(), Error> {
        self.set_property(PropValue::LineSpace(space))
    }

    /// Sets the space between paragraphs.
    pub fn set_paragraph_space(&mut self, space: f32) -> Result<(), Error> {
        self.set_property(PropValue::ParagraphSpace(space))
    }

    /// Sets the slack below which a paragraph's last line is still justified.
    pub fn set_last_line_justify_max_width(&mut self, width: f32) -> Result<(), Error> {
        self.env.set_last_line_justify_max_width(width)?;
        self.dirty = true;
        Ok(())
    }

    /// Lays the text out within `width` × `height` and returns the size it
    /// occupies.
    pub fn measure(&mut self, width: f32, height: f32) -> Result<(f32, f32), Error> {
        if self.dirty || self.limits != Some((width, height)) {
            self.env.set_measure_limit(width, height)?;
            self.limits = Some((width, height));
            self.relayout();
        }
        Ok((self.layout.content_width(), self.layout.content_height()))
    }

    /// Draws the text, laying it out again first if anything changed since
    /// the last [`measure`](Self::measure).
    pub fn draw<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        if self.dirty && self.limits.is_some() {
            self.relayout();
        }
        if let Some(model) = &self.model {
            self.layout.draw(model, &mut self.env, canvas);
        }
    }

    fn relayout(&mut self) {
        self.layout
            .measure_and_layout(self.model.as_mut(), &mut self.env, &self.measurer);
        self.dirty = false;
    }
}
