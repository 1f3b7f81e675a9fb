// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property identifiers and values carried by the environment.

use alloc::sync::Arc;

use peniko::color::palette::css;
use peniko::Color;

/// Horizontal alignment of the elements within a line.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug)]
pub enum Alignment {
    /// Lines start at their left edge.
    #[default]
    Left,
    /// Lines end at their right edge.
    Right,
    /// Lines are centered within the width limit.
    Center,
    /// Slack is distributed across word gaps, except for the last line of a paragraph.
    Justify,
}

/// A side of an element box.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Side {
    /// The top edge.
    Top,
    /// The right edge.
    Right,
    /// The bottom edge.
    Bottom,
    /// The left edge.
    Left,
}

impl Side {
    /// All sides, in drawing order.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    pub(crate) fn slot(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Right => 1,
            Self::Bottom => 2,
            Self::Left => 3,
        }
    }
}

/// Border drawn along one side of each element box.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Border {
    /// Stroke width in pixels. Zero disables the border.
    pub width: f32,
    /// Stroke color.
    pub color: Color,
}

impl Border {
    /// A border that draws nothing.
    pub const NONE: Self = Self {
        width: 0.0,
        color: css::TRANSPARENT,
    };

    /// Creates a border of the given width and color.
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}

impl Default for Border {
    fn default() -> Self {
        Self::NONE
    }
}

/// Underline decoration.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Underline {
    /// Line color.
    pub color: Color,
    /// Line thickness in pixels.
    pub thickness: f32,
    /// Distance below the baseline at which the line starts.
    pub offset: f32,
}

impl Underline {
    /// Creates an underline one pixel thick, one pixel below the baseline.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            thickness: 1.0,
            offset: 1.0,
        }
    }

    /// Sets the thickness.
    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    /// Sets the offset below the baseline.
    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }
}

/// A font family plus the weight and slant to select from it.
///
/// Typeline never resolves fonts itself; the typeface is forwarded to the
/// [`TextMeasurer`](crate::TextMeasurer) and [`Canvas`](crate::Canvas).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Typeface {
    family: Arc<str>,
    weight: u16,
    italic: bool,
}

impl Typeface {
    /// Creates a regular typeface for the named family.
    pub fn new(family: &str) -> Self {
        Self {
            family: family.into(),
            weight: 400,
            italic: false,
        }
    }

    /// Sets the weight, where 400 is regular and 700 is bold.
    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    /// Sets whether the italic face is selected.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// The family name.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// The weight.
    pub fn weight(&self) -> u16 {
        self.weight
    }

    /// Whether the italic face is selected.
    pub fn is_italic(&self) -> bool {
        self.italic
    }
}

impl Default for Typeface {
    fn default() -> Self {
        Self::new("sans-serif")
    }
}

/// Font selection handed to measurement and drawing collaborators.
#[derive(Clone, PartialEq, Debug)]
pub struct FontSpec {
    /// The typeface.
    pub typeface: Typeface,
    /// Text size in pixels.
    pub size: f32,
}

/// Value stored under a [`PropKey::Custom`] key.
#[derive(Clone, PartialEq, Debug)]
pub enum CustomValue {
    /// A flag.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A number.
    Float(f32),
    /// A color.
    Color(Color),
    /// A string.
    Text(Arc<str>),
}

/// Identifies one save/restore stack of a [`TypeEnvironment`](crate::TypeEnvironment).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PropKey {
    /// Text color.
    TextColor,
    /// Background color behind each element.
    Background,
    /// Typeface.
    Typeface,
    /// Text size.
    TextSize,
    /// Underline decoration.
    Underline,
    /// Line alignment.
    Alignment,
    /// Space between lines of one paragraph.
    LineSpace,
    /// Space between paragraphs.
    ParagraphSpace,
    /// Fixed line height.
    LineHeight,
    /// Border of one side.
    Border(Side),
    /// A caller-defined property in the generic bucket.
    Custom(u32),
}

/// A property value, tagged with the property it belongs to.
#[derive(Clone, PartialEq, Debug)]
pub enum PropValue {
    /// See [`PropKey::TextColor`].
    TextColor(Color),
    /// See [`PropKey::Background`].
    Background(Color),
    /// See [`PropKey::Typeface`].
    Typeface(Typeface),
    /// See [`PropKey::TextSize`].
    TextSize(f32),
    /// See [`PropKey::Underline`].
    Underline(Option<Underline>),
    /// See [`PropKey::Alignment`].
    Alignment(Alignment),
    /// See [`PropKey::LineSpace`].
    LineSpace(f32),
    /// See [`PropKey::ParagraphSpace`].
    ParagraphSpace(f32),
    /// See [`PropKey::LineHeight`]. `None` derives the height from font metrics.
    LineHeight(Option<f32>),
    /// See [`PropKey::Border`].
    Border(Side, Border),
    /// See [`PropKey::Custom`]. `None` removes the value.
    Custom(u32, Option<CustomValue>),
}

impl PropValue {
    /// The key of the stack this value belongs to.
    pub fn key(&self) -> PropKey {
        match self {
            Self::TextColor(_) => PropKey::TextColor,
            Self::Background(_) => PropKey::Background,
            Self::Typeface(_) => PropKey::Typeface,
            Self::TextSize(_) => PropKey::TextSize,
            Self::Underline(_) => PropKey::Underline,
            Self::Alignment(_) => PropKey::Alignment,
            Self::LineSpace(_) => PropKey::LineSpace,
            Self::ParagraphSpace(_) => PropKey::ParagraphSpace,
            Self::LineHeight(_) => PropKey::LineHeight,
            Self::Border(side, _) => PropKey::Border(*side),
            Self::Custom(key, _) => PropKey::Custom(*key),
        }
    }
}
