// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inline image lookup and word-break policy supplied by the caller.

use alloc::string::String;

use hashbrown::HashMap;

/// How an inline image is sized when measured.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum ImageSizing {
    /// A square as tall as the current font's line box, like an emoji glyph.
    #[default]
    MatchFont,
    /// The image's own width and height, sitting on the baseline.
    Intrinsic,
}

/// An image to be laid out inline with text.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct InlineImage {
    /// User-specified identifier, handed back to the [`Canvas`](crate::Canvas)
    /// when the image is drawn.
    pub id: u64,
    /// Intrinsic width in pixels.
    pub width: f32,
    /// Intrinsic height in pixels.
    pub height: f32,
    /// How the image is sized.
    pub sizing: ImageSizing,
}

impl InlineImage {
    /// An image sized to the surrounding font.
    pub fn emoji(id: u64) -> Self {
        Self {
            id,
            width: 0.0,
            height: 0.0,
            sizing: ImageSizing::MatchFont,
        }
    }

    /// An image with a fixed intrinsic size.
    pub fn intrinsic(id: u64, width: f32, height: f32) -> Self {
        Self {
            id,
            width,
            height,
            sizing: ImageSizing::Intrinsic,
        }
    }
}

/// Recognizes the text that should be replaced by an inline image.
pub trait InlineImageProvider {
    /// Looks up a bracketed token such as `[smile]`, brackets included.
    fn find_token(&self, token: &str) -> Option<InlineImage>;

    /// Looks up a single code point.
    fn find_char(&self, ch: char) -> Option<InlineImage>;

    /// Looks up a two code point sequence, such as a base emoji followed by a
    /// skin tone modifier.
    fn find_pair(&self, first: char, second: char) -> Option<InlineImage> {
        let _ = (first, second);
        None
    }
}

/// Decides where a run of word characters may be broken.
pub trait WordBreakChecker {
    /// Returns `true` if a line may break before `ch` inside a word.
    fn is_break_allowed(&self, ch: char) -> bool;
}

impl<F: Fn(char) -> bool> WordBreakChecker for F {
    fn is_break_allowed(&self, ch: char) -> bool {
        self(ch)
    }
}

/// A table-backed [`InlineImageProvider`].
#[derive(Clone, Default, Debug)]
pub struct InlineImageTable {
    tokens: HashMap<String, InlineImage>,
    chars: HashMap<char, InlineImage>,
    pairs: HashMap<(char, char), InlineImage>,
}

impl InlineImageTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a bracketed token, e.g. `"[smile]"`.
    pub fn insert_token(&mut self, token: &str, image: InlineImage) -> &mut Self {
        self.tokens.insert(token.into(), image);
        self
    }

    /// Registers a single code point.
    pub fn insert_char(&mut self, ch: char, image: InlineImage) -> &mut Self {
        self.chars.insert(ch, image);
        self
    }

    /// Registers a two code point sequence.
    pub fn insert_pair(&mut self, first: char, second: char, image: InlineImage) -> &mut Self {
        self.pairs.insert((first, second), image);
        self
    }
}

impl InlineImageProvider for InlineImageTable {
    fn find_token(&self, token: &str) -> Option<InlineImage> {
        self.tokens.get(token).copied()
    }

    fn find_char(&self, ch: char) -> Option<InlineImage> {
        self.chars.get(&ch).copied()
    }

    fn find_pair(&self, first: char, second: char) -> Option<InlineImage> {
        self.pairs.get(&(first, second)).copied()
    }
}
