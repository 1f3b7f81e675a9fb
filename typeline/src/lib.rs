// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typeline lays out rich inline text.
//!
//! Text is parsed into a chain of [elements](Element): glyph runs, inline
//! images and paragraph breaks. Range effects attached to a [`TypeModel`]
//! change the [`TypeEnvironment`] while elements are visited, and
//! [`LineLayout`] breaks the measured elements into wrapped, aligned and
//! optionally ellipsized [lines](Line).
//!
//! Measuring and drawing are delegated to a [`TextMeasurer`] and a [`Canvas`]
//! supplied by the host.
//!
//! ```
//! use typeline::{FontMetrics, FontSpec, LineLayout, Parser, TextMeasurer, TypeEnvironment};
//!
//! struct Monospace;
//!
//! impl TextMeasurer for Monospace {
//!     fn advance(&self, text: &str, font: &FontSpec) -> f32 {
//!         text.chars().count() as f32 * font.size / 2.0
//!     }
//!
//!     fn metrics(&self, font: &FontSpec) -> FontMetrics {
//!         FontMetrics {
//!             ascent: font.size * 0.8,
//!             descent: font.size * 0.2,
//!         }
//!     }
//! }
//!
//! let mut model = Parser::new().parse("hello world").unwrap();
//! let mut env = TypeEnvironment::new();
//! env.set_text_size(20.0).unwrap();
//! env.set_measure_limit(60.0, f32::INFINITY).unwrap();
//!
//! let mut layout = LineLayout::default();
//! layout.measure_and_layout(Some(&mut model), &mut env, &Monospace);
//! assert_eq!(layout.lines().len(), 2);
//! ```

extern crate alloc;

pub use peniko;

mod element;
mod environment;
mod error;
mod line;
mod measure;
mod model;
mod parser;
mod provider;
mod view;

pub mod layout;

#[cfg(test)]
mod tests;

pub use element::{Element, ElementId, ElementKind, LineBreakType, Visibility, WordPart};
pub use environment::{
    Alignment, Border, CustomValue, FontSpec, PropKey, PropValue, Side, TypeEnvironment, Typeface,
    Underline,
};
pub use error::{Error, ErrorKind};
pub use layout::indent::{FirstLineIndentHandler, LineIndentHandler, SerialLineIndentHandler};
pub use layout::{Ellipsize, LayoutOptions, LineLayout, MoreText};
pub use line::{Line, LinePool};
pub use measure::{Canvas, FontMetrics, TextMeasurer};
pub use model::{EffectRemover, EnvironmentUpdater, TypeModel};
pub use parser::Parser;
pub use provider::{
    ImageSizing, InlineImage, InlineImageProvider, InlineImageTable, WordBreakChecker,
};
pub use view::TypeView;
