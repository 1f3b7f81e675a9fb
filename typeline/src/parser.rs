// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning source text into a [`TypeModel`].

use alloc::rc::Rc;
use alloc::vec::Vec;

use icu_properties::props::{GeneralCategory, LineBreak};
use icu_properties::CodePointMapData;

use crate::{
    Element, ElementKind, ImageSizing, InlineImage, InlineImageProvider, LineBreakType,
    TypeModel, WordBreakChecker, WordPart,
};

/// The number of characters after `[` searched for the closing `]`.
const MAX_TOKEN_LOOKAHEAD: usize = 30;

/// Splits text into elements.
///
/// Each element covers one code point plus any combining marks that follow it,
/// a paragraph break (`\n`, `\r` or `\r\n`), or a sequence recognized by the
/// [`InlineImageProvider`].
#[derive(Clone, Default)]
pub struct Parser {
    images: Option<Rc<dyn InlineImageProvider>>,
    word_break: Option<Rc<dyn WordBreakChecker>>,
}

impl core::fmt::Debug for Parser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Parser")
            .field("images", &self.images.is_some())
            .field("word_break", &self.word_break.is_some())
            .finish()
    }
}

impl Parser {
    /// Creates a parser that produces text and paragraph elements only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recognizes inline images with `provider`.
    pub fn with_inline_images(mut self, provider: Rc<dyn InlineImageProvider>) -> Self {
        self.images = Some(provider);
        self
    }

    /// Marks mid-word break opportunities with `checker`.
    pub fn with_word_break_checker(mut self, checker: Rc<dyn WordBreakChecker>) -> Self {
        self.word_break = Some(checker);
        self
    }

    /// Parses `text`. Returns `None` for empty input.
    pub fn parse(&self, text: &str) -> Option<TypeModel> {
        if text.is_empty() {
            return None;
        }
        let mut elements: Vec<Element> = Vec::with_capacity(text.len());
        let mut pos = 0;
        while let Some(ch) = text[pos..].chars().next() {
            let rest = &text[pos..];
            let (kind, len, trigger) = match ch {
                '\n' => (ElementKind::NextParagraph, 1, None),
                '\r' if rest.as_bytes().get(1) == Some(&b'\n') => {
                    (ElementKind::NextParagraph, 2, None)
                }
                '\r' => (ElementKind::NextParagraph, 1, None),
                _ => self.scan(rest, ch),
            };
            let mut element = Element::new(kind, &rest[..len], elements.len(), pos);
            self.classify(&mut elements, &mut element, trigger);
            elements.push(element);
            pos += len;
        }
        if let Some(last) = elements.last_mut() {
            close_word(last);
        }
        tracing::trace!(bytes = text.len(), elements = elements.len(), "parsed text");
        Some(TypeModel::from_elements(text, elements))
    }

    /// Scans one non-break element starting with `ch`, returning its kind, its
    /// byte length and the character that drives word classification.
    fn scan(&self, rest: &str, ch: char) -> (ElementKind, usize, Option<char>) {
        if let Some(images) = &self.images {
            if ch == '[' {
                if let Some(len) = token_len(rest) {
                    if let Some(image) = images.find_token(&rest[..len]) {
                        return (image_kind(image), len, None);
                    }
                }
            }
            if let Some(image) = images.find_char(ch) {
                return (image_kind(image), ch.len_utf8(), None);
            }
            let first_len = ch.len_utf8();
            if let Some(second) = rest[first_len..].chars().next() {
                if let Some(image) = images.find_pair(ch, second) {
                    return (image_kind(image), first_len + second.len_utf8(), None);
                }
            }
        }
        let mut len = ch.len_utf8();
        for mark in rest[len..].chars() {
            if !is_nonspacing_mark(mark) {
                break;
            }
            len += mark.len_utf8();
        }
        (ElementKind::Text, len, Some(ch))
    }

    fn classify(&self, parsed: &mut [Element], element: &mut Element, trigger: Option<char>) {
        let prev = parsed.last_mut();
        match trigger.filter(char::is_ascii_alphanumeric) {
            Some(ch) => {
                let continues = prev.is_some_and(|prev| prev.word_part.continues_word());
                if continues {
                    element.word_part = WordPart::Middle;
                    if self
                        .word_break
                        .as_ref()
                        .is_some_and(|checker| checker.is_break_allowed(ch))
                    {
                        element.line_break_type = LineBreakType::WordBreakAllowed;
                    }
                } else {
                    element.word_part = WordPart::Start;
                }
            }
            None => {
                if let Some(prev) = prev {
                    close_word(prev);
                }
                element.word_part = WordPart::Whole;
                element.line_break_type = trigger.map_or(LineBreakType::Normal, punctuation_type);
            }
        }
    }
}

/// Ends a word at `element` if one was still open.
fn close_word(element: &mut Element) {
    element.word_part = match element.word_part {
        WordPart::Start => WordPart::Whole,
        WordPart::Middle => WordPart::End,
        part => part,
    };
}

/// Byte length of a `[...]` token at the start of `rest`, brackets included.
fn token_len(rest: &str) -> Option<usize> {
    for (offset, ch) in rest.char_indices().skip(1).take(MAX_TOKEN_LOOKAHEAD) {
        match ch {
            ']' => return Some(offset + 1),
            '[' | '\n' | '\r' => return None,
            _ => {}
        }
    }
    None
}

fn image_kind(image: InlineImage) -> ElementKind {
    match image.sizing {
        ImageSizing::MatchFont => ElementKind::Emoji(image),
        ImageSizing::Intrinsic => ElementKind::Drawable(image),
    }
}

fn is_nonspacing_mark(ch: char) -> bool {
    CodePointMapData::<GeneralCategory>::new().get(ch) == GeneralCategory::NonspacingMark
}

fn punctuation_type(ch: char) -> LineBreakType {
    if matches!(ch, ',' | '.' | ';' | ':') {
        return LineBreakType::NotStart;
    }
    let class = CodePointMapData::<LineBreak>::new().get(ch);
    if class == LineBreak::ClosePunctuation
        || class == LineBreak::CloseParenthesis
        || class == LineBreak::Exclamation
        || class == LineBreak::Nonstarter
    {
        LineBreakType::NotStart
    } else if class == LineBreak::OpenPunctuation {
        LineBreakType::NotEnd
    } else {
        LineBreakType::Normal
    }
}
