// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-line leading indents.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::{ElementId, ElementKind, TypeModel};

/// Computes the leading indent of each line.
///
/// The layout asks once per line, when the line receives its first element,
/// and narrows that line's width limit by the returned number of pixels.
pub trait LineIndentHandler {
    /// The indent of a line starting at `first`.
    ///
    /// `new_paragraph` is `true` for the first line of a paragraph. Answers
    /// must only depend on the model, so that two layout passes over the same
    /// model agree.
    fn process_indent(
        &mut self,
        model: &TypeModel,
        first: ElementId,
        new_paragraph: bool,
    ) -> f32;

    /// Forgets state from the previous layout pass.
    fn reset(&mut self) {}
}

/// Indents the first line of every paragraph by a fixed amount.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FirstLineIndentHandler {
    indent: f32,
}

impl FirstLineIndentHandler {
    /// Creates a handler indenting first lines by `indent` pixels.
    pub fn new(indent: f32) -> Self {
        Self { indent }
    }
}

impl LineIndentHandler for FirstLineIndentHandler {
    fn process_indent(&mut self, _: &TypeModel, _: ElementId, new_paragraph: bool) -> f32 {
        if new_paragraph { self.indent } else { 0.0 }
    }
}

/// Longest run of letters or digits accepted before a list marker delimiter.
const MAX_SERIAL_LEN: usize = 4;

/// Number of leading characters inspected for a marker and its spaces.
const MARKER_SCAN: usize = 16;

/// Hangs continuation lines of list items under the item text.
///
/// A paragraph starting with a serial marker such as `1.`, `a.`, `b、`,
/// `3)`, `(12)` or a bullet (`•`, `-`, `*`) followed by spaces keeps its first
/// line flush; its wrapped lines are indented by the measured width of the
/// marker and the spaces after it.
#[derive(Clone, Debug, Default)]
pub struct SerialLineIndentHandler {
    recompute_continuation: bool,
    paragraph: Option<ElementId>,
    cache: HashMap<ElementId, f32>,
}

impl SerialLineIndentHandler {
    /// Creates a handler that measures each paragraph's marker once.
    pub fn new() -> Self {
        Self::default()
    }

    /// Measures the marker again for every continuation line instead of
    /// reusing the paragraph's first answer.
    pub fn with_recompute_continuation(mut self, recompute: bool) -> Self {
        self.recompute_continuation = recompute;
        self
    }
}

impl LineIndentHandler for SerialLineIndentHandler {
    fn process_indent(&mut self, model: &TypeModel, first: ElementId, new_paragraph: bool) -> f32 {
        if new_paragraph {
            self.paragraph = Some(first);
            return 0.0;
        }
        let Some(paragraph) = self.paragraph else {
            return 0.0;
        };
        if !self.recompute_continuation {
            if let Some(indent) = self.cache.get(&paragraph) {
                return *indent;
            }
        }
        let indent = marker_width(model, paragraph);
        self.cache.insert(paragraph, indent);
        indent
    }

    fn reset(&mut self) {
        self.paragraph = None;
        self.cache.clear();
    }
}

/// Width of the list marker starting the paragraph at `first`, or zero.
fn marker_width(model: &TypeModel, first: ElementId) -> f32 {
    let chars: Vec<(char, f32)> = core::iter::successors(Some(first), |id| model.next(*id))
        .map(|id| model.element(id))
        .map_while(|element| {
            let mut text = element.text.chars();
            match (&element.kind, text.next(), text.next()) {
                (ElementKind::Text, Some(ch), None) => Some((ch, element.measure_width)),
                _ => None,
            }
        })
        .take(MARKER_SCAN)
        .collect();
    let Some(marker_len) = match_marker(&chars) else {
        return 0.0;
    };
    let spaces = chars[marker_len..]
        .iter()
        .take_while(|(ch, _)| *ch == ' ')
        .count();
    if spaces == 0 {
        return 0.0;
    }
    chars[..marker_len + spaces].iter().map(|(_, w)| w).sum()
}

/// Length in characters of the marker at the start of `chars`.
fn match_marker(chars: &[(char, f32)]) -> Option<usize> {
    let (first, _) = *chars.first()?;
    if matches!(first, '•' | '-' | '*') {
        return Some(1);
    }
    if first == '(' {
        let digits = chars[1..]
            .iter()
            .take_while(|(ch, _)| ch.is_ascii_digit())
            .count();
        let close = chars.get(1 + digits).map(|(ch, _)| *ch);
        return ((1..=MAX_SERIAL_LEN).contains(&digits) && close == Some(')'))
            .then_some(digits + 2);
    }
    let serial = chars
        .iter()
        .take_while(|(ch, _)| ch.is_ascii_alphanumeric())
        .count();
    let delimiter = chars.get(serial).map(|(ch, _)| *ch);
    ((1..=MAX_SERIAL_LEN).contains(&serial) && matches!(delimiter, Some('.' | '、' | ')')))
        .then_some(serial + 1)
}
