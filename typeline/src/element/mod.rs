// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The atomic units of typesetting.

pub(crate) mod visit;

use alloc::string::String;
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::model::{EnvironmentUpdater, UpdaterId};
use crate::{InlineImage, PropKey};

/// Handle to an [`Element`] stored in a [`TypeModel`](crate::TypeModel).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ElementId(u32);

impl ElementId {
    pub(crate) fn new(slot: usize) -> Self {
        debug_assert!(
            u32::try_from(slot).is_ok(),
            "element arena exceeds u32::MAX slots"
        );
        Self(u32::try_from(slot).unwrap_or(u32::MAX))
    }

    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

/// How an element takes part in a multi-element word.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug)]
pub enum WordPart {
    /// A word on its own, such as a space, an ideograph or an image.
    #[default]
    Whole,
    /// The first element of a word.
    Start,
    /// An interior element of a word.
    Middle,
    /// The last element of a word.
    End,
}

impl WordPart {
    /// Returns `true` if a new word begins at this element.
    pub fn starts_word(self) -> bool {
        matches!(self, Self::Whole | Self::Start)
    }

    /// Returns `true` if a word continues past this element.
    pub fn continues_word(self) -> bool {
        matches!(self, Self::Start | Self::Middle)
    }
}

/// Punctuation-aware line break classification.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug)]
pub enum LineBreakType {
    /// No restriction.
    #[default]
    Normal,
    /// The element must not begin a line, e.g. a closing bracket or a comma.
    NotStart,
    /// The element must not end a line, e.g. an opening bracket.
    NotEnd,
    /// A line may break before this interior word element.
    WordBreakAllowed,
}

/// Whether an element takes up space in its line.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug)]
pub enum Visibility {
    /// Measured and drawn.
    #[default]
    Visible,
    /// Skipped for width and drawing; its effects still apply.
    Gone,
}

/// The variant of an [`Element`].
#[derive(Clone, PartialEq, Debug)]
pub enum ElementKind {
    /// A run of glyphs.
    Text,
    /// An image sized to the current font.
    Emoji(InlineImage),
    /// An image at its intrinsic size.
    Drawable(InlineImage),
    /// A paragraph break.
    NextParagraph,
    /// The hyphen appended to a line broken inside a word.
    BreakWord,
    /// The ellipsis marker.
    Ellipsis,
    /// The decoration text that follows an end ellipsis.
    MoreText,
    /// Replays the effects of elements that are not laid out.
    IgnoreEffect(Vec<ElementId>),
}

impl ElementKind {
    /// Returns `true` for elements created by layout rather than by parsing.
    pub fn is_synthetic(&self) -> bool {
        matches!(
            self,
            Self::BreakWord | Self::Ellipsis | Self::MoreText | Self::IgnoreEffect(_)
        )
    }

    fn is_decoration(&self) -> bool {
        matches!(self, Self::Ellipsis | Self::MoreText)
    }
}

/// One typesetting unit.
///
/// Elements are stored in an arena owned by their [`TypeModel`](crate::TypeModel)
/// and link to each other by [`ElementId`]. Two independent lists run through
/// the arena: the content chain over every parsed element, and the effect list
/// over the elements that start or end some effect.
#[derive(Clone, Debug)]
pub struct Element {
    pub(crate) kind: ElementKind,
    pub(crate) text: String,
    pub(crate) index: usize,
    pub(crate) start: usize,
    pub(crate) word_part: WordPart,
    pub(crate) line_break_type: LineBreakType,
    pub(crate) visibility: Visibility,

    pub(crate) measure_width: f32,
    pub(crate) measure_height: f32,
    pub(crate) baseline: f32,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) next_gap_width: f32,

    pub(crate) prev: Option<ElementId>,
    pub(crate) next: Option<ElementId>,
    pub(crate) prev_effect: Option<ElementId>,
    pub(crate) next_effect: Option<ElementId>,

    pub(crate) save_types: SmallVec<[PropKey; 2]>,
    pub(crate) restore_types: SmallVec<[PropKey; 2]>,
    pub(crate) updaters: SmallVec<[(UpdaterId, EnvironmentUpdater); 1]>,
}

impl Element {
    pub(crate) fn new(kind: ElementKind, text: &str, index: usize, start: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            index,
            start,
            word_part: WordPart::Whole,
            line_break_type: LineBreakType::Normal,
            visibility: Visibility::Visible,
            measure_width: 0.0,
            measure_height: 0.0,
            baseline: 0.0,
            x: 0.0,
            y: 0.0,
            next_gap_width: 0.0,
            prev: None,
            next: None,
            prev_effect: None,
            next_effect: None,
            save_types: SmallVec::new(),
            restore_types: SmallVec::new(),
            updaters: SmallVec::new(),
        }
    }

    /// Synthetic elements carry no position in the source text.
    pub(crate) fn synthetic(kind: ElementKind, text: &str) -> Self {
        Self::new(kind, text, usize::MAX, usize::MAX)
    }

    /// The variant of this element.
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// The source text this element renders.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Dense ordinal position among the parsed elements; the key of effect ranges.
    ///
    /// Synthetic elements report `usize::MAX`.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Byte offset of [`text`](Self::text) in the parsed source.
    ///
    /// Synthetic elements report `usize::MAX`.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Word participation.
    pub fn word_part(&self) -> WordPart {
        self.word_part
    }

    /// Line break classification.
    pub fn line_break_type(&self) -> LineBreakType {
        self.line_break_type
    }

    /// Current visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Returns `true` unless the element was hidden by its line.
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    /// Width from the last measurement.
    pub fn measure_width(&self) -> f32 {
        self.measure_width
    }

    /// Height from the last measurement.
    pub fn measure_height(&self) -> f32 {
        self.measure_height
    }

    /// Distance from the top of the element box to its baseline.
    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    /// Left edge after layout.
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Top edge after layout.
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Extra space inserted after this element by justification.
    pub fn next_gap_width(&self) -> f32 {
        self.next_gap_width
    }

    /// Width this element occupies in its line, including justify gap.
    pub fn occupied_width(&self) -> f32 {
        if self.is_visible() {
            self.measure_width + self.next_gap_width
        } else {
            0.0
        }
    }

    /// Properties pushed when this element is entered.
    pub fn save_types(&self) -> &[PropKey] {
        &self.save_types
    }

    /// Properties popped when this element is left.
    pub fn restore_types(&self) -> &[PropKey] {
        &self.restore_types
    }

    /// Returns `true` if this element starts or ends an effect.
    pub fn has_effects(&self) -> bool {
        !self.save_types.is_empty() || !self.restore_types.is_empty() || !self.updaters.is_empty()
    }

    /// Returns `true` for paragraph breaks.
    pub fn is_paragraph_break(&self) -> bool {
        self.kind == ElementKind::NextParagraph
    }

    /// Returns `true` for a text element consisting of one ASCII space.
    pub fn is_space(&self) -> bool {
        self.kind == ElementKind::Text && self.text == " "
    }

    fn set_measure(&mut self, width: f32, height: f32, baseline: f32) {
        self.measure_width = width;
        self.measure_height = height;
        self.baseline = baseline;
    }
}
