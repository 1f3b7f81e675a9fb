// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The mutable rendering context visited elements read from and write to.

mod props;

pub use props::{
    Alignment, Border, CustomValue, FontSpec, PropKey, PropValue, Side, Typeface, Underline,
};

use alloc::vec::Vec;

use hashbrown::HashMap;
use peniko::color::palette::css;
use peniko::Color;

use crate::Error;

/// Stack-based rendering context shared by one layout and draw pass.
///
/// Every property has its own save stack, keyed by [`PropKey`]. Elements push
/// the current value when an effect starts and pop it when the effect ends, so
/// nested effects of the same property resolve last-in first-out.
///
/// While any stack is non-empty the environment [is running](Self::is_running)
/// and the guarded setters refuse to change it. Environment updaters change
/// values mid-traversal through [`apply`](Self::apply) instead.
#[derive(Clone, Debug)]
pub struct TypeEnvironment {
    text_color: Color,
    background: Color,
    typeface: Typeface,
    text_size: f32,
    underline: Option<Underline>,
    alignment: Alignment,
    line_space: f32,
    paragraph_space: f32,
    line_height: Option<f32>,
    borders: [Border; 4],
    custom: HashMap<u32, CustomValue>,

    width_limit: f32,
    height_limit: f32,
    last_line_justify_max_width: f32,

    stacks: HashMap<PropKey, Vec<PropValue>>,
}

impl Default for TypeEnvironment {
    fn default() -> Self {
        Self {
            text_color: css::BLACK,
            background: css::TRANSPARENT,
            typeface: Typeface::default(),
            text_size: 16.0,
            underline: None,
            alignment: Alignment::Left,
            line_space: 0.0,
            paragraph_space: 0.0,
            line_height: None,
            borders: [Border::NONE; 4],
            custom: HashMap::new(),
            width_limit: f32::INFINITY,
            height_limit: f32::INFINITY,
            last_line_justify_max_width: 0.0,
            stacks: HashMap::new(),
        }
    }
}

impl TypeEnvironment {
    /// Creates an environment in its default state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current text color.
    pub fn text_color(&self) -> Color {
        self.text_color
    }

    /// The current background color.
    pub fn background_color(&self) -> Color {
        self.background
    }

    /// The current typeface.
    pub fn typeface(&self) -> &Typeface {
        &self.typeface
    }

    /// The current text size in pixels.
    pub fn text_size(&self) -> f32 {
        self.text_size
    }

    /// The current typeface and size, as handed to measurers and canvases.
    pub fn font(&self) -> FontSpec {
        FontSpec {
            typeface: self.typeface.clone(),
            size: self.text_size,
        }
    }

    /// The current underline decoration, if any.
    pub fn underline(&self) -> Option<Underline> {
        self.underline
    }

    /// The current line alignment.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Vertical space between lines of the same paragraph.
    pub fn line_space(&self) -> f32 {
        self.line_space
    }

    /// Vertical space between paragraphs.
    pub fn paragraph_space(&self) -> f32 {
        self.paragraph_space
    }

    /// Fixed line height, if one is set.
    pub fn line_height(&self) -> Option<f32> {
        self.line_height
    }

    /// The border drawn along `side`.
    pub fn border(&self, side: Side) -> Border {
        self.borders[side.slot()]
    }

    /// A value from the generic property bucket.
    pub fn custom(&self, key: u32) -> Option<&CustomValue> {
        self.custom.get(&key)
    }

    /// Width available to each line.
    pub fn width_limit(&self) -> f32 {
        self.width_limit
    }

    /// Height available to the whole layout.
    pub fn height_limit(&self) -> f32 {
        self.height_limit
    }

    /// Largest slack a paragraph's last line may have and still be justified.
    pub fn last_line_justify_max_width(&self) -> f32 {
        self.last_line_justify_max_width
    }

    /// Returns `true` while any property has an unmatched save.
    pub fn is_running(&self) -> bool {
        self.stacks.values().any(|stack| !stack.is_empty())
    }

    /// Sets the area the layout may occupy.
    pub fn set_measure_limit(&mut self, width: f32, height: f32) -> Result<(), Error> {
        self.check_idle(None)?;
        self.width_limit = width;
        self.height_limit = height;
        Ok(())
    }

    /// Sets the slack below which a paragraph's last line is still justified.
    pub fn set_last_line_justify_max_width(&mut self, width: f32) -> Result<(), Error> {
        self.check_idle(None)?;
        self.last_line_justify_max_width = width;
        Ok(())
    }

    /// Sets a property outside of a traversal.
    ///
    /// Returns [`ErrorKind::EnvironmentRunning`](crate::ErrorKind::EnvironmentRunning)
    /// if a traversal is in progress.
    pub fn set(&mut self, value: PropValue) -> Result<(), Error> {
        self.check_idle(Some(value.key()))?;
        self.apply(value);
        Ok(())
    }

    /// Sets the text color.
    pub fn set_text_color(&mut self, color: Color) -> Result<(), Error> {
        self.set(PropValue::TextColor(color))
    }

    /// Sets the background color.
    pub fn set_background_color(&mut self, color: Color) -> Result<(), Error> {
        self.set(PropValue::Background(color))
    }

    /// Sets the typeface.
    pub fn set_typeface(&mut self, typeface: Typeface) -> Result<(), Error> {
        self.set(PropValue::Typeface(typeface))
    }

    /// Sets the text size.
    pub fn set_text_size(&mut self, size: f32) -> Result<(), Error> {
        self.set(PropValue::TextSize(size))
    }

    /// Sets the line alignment.
    pub fn set_alignment(&mut self, alignment: Alignment) -> Result<(), Error> {
        self.set(PropValue::Alignment(alignment))
    }

    /// Sets the space between lines of one paragraph.
    pub fn set_line_space(&mut self, space: f32) -> Result<(), Error> {
        self.set(PropValue::LineSpace(space))
    }

    /// Sets the space between paragraphs.
    pub fn set_paragraph_space(&mut self, space: f32) -> Result<(), Error> {
        self.set(PropValue::ParagraphSpace(space))
    }

    /// Sets a fixed line height, or `None` to use font metrics.
    pub fn set_line_height(&mut self, height: Option<f32>) -> Result<(), Error> {
        self.set(PropValue::LineHeight(height))
    }

    /// Sets the border drawn along `side`.
    pub fn set_border(&mut self, side: Side, border: Border) -> Result<(), Error> {
        self.set(PropValue::Border(side, border))
    }

    /// Writes a value without checking whether a traversal is running.
    ///
    /// This is the path environment updaters take while elements are visited.
    pub fn apply(&mut self, value: PropValue) {
        match value {
            PropValue::TextColor(color) => self.text_color = color,
            PropValue::Background(color) => self.background = color,
            PropValue::Typeface(typeface) => self.typeface = typeface,
            PropValue::TextSize(size) => self.text_size = size,
            PropValue::Underline(underline) => self.underline = underline,
            PropValue::Alignment(alignment) => self.alignment = alignment,
            PropValue::LineSpace(space) => self.line_space = space,
            PropValue::ParagraphSpace(space) => self.paragraph_space = space,
            PropValue::LineHeight(height) => self.line_height = height,
            PropValue::Border(side, border) => self.borders[side.slot()] = border,
            PropValue::Custom(key, Some(value)) => {
                self.custom.insert(key, value);
            }
            PropValue::Custom(key, None) => {
                self.custom.remove(&key);
            }
        }
    }

    /// A snapshot of the current value of `key`.
    pub fn value(&self, key: PropKey) -> PropValue {
        match key {
            PropKey::TextColor => PropValue::TextColor(self.text_color),
            PropKey::Background => PropValue::Background(self.background),
            PropKey::Typeface => PropValue::Typeface(self.typeface.clone()),
            PropKey::TextSize => PropValue::TextSize(self.text_size),
            PropKey::Underline => PropValue::Underline(self.underline),
            PropKey::Alignment => PropValue::Alignment(self.alignment),
            PropKey::LineSpace => PropValue::LineSpace(self.line_space),
            PropKey::ParagraphSpace => PropValue::ParagraphSpace(self.paragraph_space),
            PropKey::LineHeight => PropValue::LineHeight(self.line_height),
            PropKey::Border(side) => PropValue::Border(side, self.border(side)),
            PropKey::Custom(key) => PropValue::Custom(key, self.custom.get(&key).cloned()),
        }
    }

    /// Pushes the current value of `key` onto its stack.
    pub fn save(&mut self, key: PropKey) {
        let value = self.value(key);
        self.stacks.entry(key).or_default().push(value);
    }

    /// Pops the most recently saved value of `key` and makes it current.
    pub fn restore(&mut self, key: PropKey) -> Result<(), Error> {
        let value = self
            .stacks
            .get_mut(&key)
            .and_then(Vec::pop)
            .ok_or_else(|| Error::unbalanced_restore(key))?;
        self.apply(value);
        Ok(())
    }

    /// Number of pending saves of `key`.
    pub fn save_depth(&self, key: PropKey) -> usize {
        self.stacks.get(&key).map_or(0, Vec::len)
    }

    /// Drains every stack, returning each property to the value it had before
    /// its first pending save.
    pub fn clear(&mut self) {
        let mut stacks = core::mem::take(&mut self.stacks);
        for stack in stacks.values_mut() {
            if let Some(base) = stack.drain(..).next() {
                self.apply(base);
            }
        }
        self.stacks = stacks;
    }

    /// Runs `f` with every saved property temporarily returned to its base
    /// value, then reinstates the values that were current.
    ///
    /// The stacks are left untouched, so `f` may be called in the middle of a
    /// traversal.
    pub fn with_base_state<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let overridden: Vec<(PropValue, PropValue)> = self
            .stacks
            .iter()
            .filter_map(|(key, stack)| Some((self.value(*key), stack.first()?.clone())))
            .collect();
        for (_, base) in &overridden {
            self.apply(base.clone());
        }
        let result = f(self);
        for (current, _) in overridden {
            self.apply(current);
        }
        result
    }

    fn check_idle(&self, prop: Option<PropKey>) -> Result<(), Error> {
        if self.is_running() {
            Err(Error::environment_running(prop))
        } else {
            Ok(())
        }
    }
}
