// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    ElementKind, FontMetrics, FontSpec, LayoutOptions, LineLayout, Parser, TextMeasurer,
    TypeEnvironment, TypeModel,
};

/// Text size every test environment starts with: 10px per character, 20px lines.
pub(crate) const TEXT_SIZE: f32 = 20.0;

/// Every character is half the text size wide; ascent and descent split the
/// size 4:1.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct FixedMeasurer;

impl TextMeasurer for FixedMeasurer {
    fn advance(&self, text: &str, font: &FontSpec) -> f32 {
        text.chars().count() as f32 * font.size / 2.0
    }

    fn metrics(&self, font: &FontSpec) -> FontMetrics {
        let descent = font.size / 5.0;
        FontMetrics {
            ascent: font.size - descent,
            descent,
        }
    }
}

pub(crate) struct TestEnv {
    pub(crate) env: TypeEnvironment,
    pub(crate) options: LayoutOptions,
    pub(crate) parser: Parser,
}

impl TestEnv {
    /// An environment `width` pixels wide and unbounded in height.
    pub(crate) fn new(width: f32) -> Self {
        let mut env = TypeEnvironment::new();
        env.set_text_size(TEXT_SIZE).unwrap();
        env.set_measure_limit(width, f32::INFINITY).unwrap();
        Self {
            env,
            options: LayoutOptions::default(),
            parser: Parser::new(),
        }
    }

    pub(crate) fn parse(&self, text: &str) -> TypeModel {
        self.parser.parse(text).expect("test text is not empty")
    }

    pub(crate) fn layout(&mut self, model: &mut TypeModel) -> LineLayout {
        let mut layout = LineLayout::new(self.options.clone());
        layout.measure_and_layout(Some(model), &mut self.env, &FixedMeasurer);
        assert!(
            !self.env.is_running(),
            "layout left environment saves behind"
        );
        layout
    }
}

/// The visible text of each line, paragraph breaks left out.
pub(crate) fn line_texts(model: &TypeModel, layout: &LineLayout) -> Vec<String> {
    layout
        .lines()
        .iter()
        .map(|line| {
            line.elements()
                .iter()
                .map(|id| model.element(*id))
                .filter(|element| element.is_visible())
                .filter(|element| element.kind() != &ElementKind::NextParagraph)
                .map(|element| element.text())
                .collect()
        })
        .collect()
}
