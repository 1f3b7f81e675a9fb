// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::color::palette::css;

use super::utils::{FixedMeasurer, PixmapCanvas, RecordingCanvas, TEXT_SIZE};
use crate::{Ellipsize, TypeView};

fn view(text: &str) -> TypeView<FixedMeasurer> {
    let mut view = TypeView::new(FixedMeasurer);
    view.set_text_size(TEXT_SIZE).unwrap();
    view.set_text(text);
    view
}

#[test]
fn measure_reports_the_occupied_size() {
    let mut view = view("hello world");
    assert_eq!(view.measure(200.0, f32::INFINITY).unwrap(), (110.0, 20.0));
    assert_eq!(view.measure(60.0, f32::INFINITY).unwrap(), (50.0, 40.0));
}

#[test]
fn property_changes_relayout() {
    let mut view = view("hello world");
    view.measure(400.0, f32::INFINITY).unwrap();
    view.set_text_size(40.0).unwrap();
    assert_eq!(view.measure(400.0, f32::INFINITY).unwrap(), (220.0, 40.0));

    view.options_mut().max_lines = 1;
    view.options_mut().ellipsize = Some(Ellipsize::End);
    assert_eq!(view.measure(200.0, f32::INFINITY).unwrap(), (160.0, 40.0));
    assert!(view.layout().is_truncated(), "overflow not reported");
}

#[test]
fn new_text_replaces_the_model() {
    let mut view = view("hello world");
    view.measure(200.0, f32::INFINITY).unwrap();
    view.set_text("hi");
    assert_eq!(view.measure(200.0, f32::INFINITY).unwrap(), (20.0, 20.0));
    assert_eq!(view.model().map(|model| model.text()), Some("hi"));

    view.set_text("");
    assert!(view.model().is_none(), "empty text parsed to a model");
    assert_eq!(view.measure(200.0, f32::INFINITY).unwrap(), (0.0, 0.0));
}

#[test]
fn background_effect_is_painted() {
    let mut view = view("ab cd");
    let _bg = view
        .model_mut()
        .unwrap()
        .add_bg_effect(0..2, css::RED)
        .unwrap();
    view.measure(200.0, 20.0).unwrap();

    let mut canvas = PixmapCanvas::new(100, 20);
    view.draw(&mut canvas);
    assert_eq!(canvas.pixel(5, 10), [255, 0, 0, 255]);
    assert_eq!(canvas.pixel(15, 10), [255, 0, 0, 255]);
    assert_eq!(canvas.pixel(25, 10), [0, 0, 0, 0]);
    assert!(!view.env().is_running(), "draw left environment saves behind");
}

#[test]
fn draw_before_measure_is_empty() {
    let mut view = view("hello");
    let mut canvas = RecordingCanvas::default();
    view.draw(&mut canvas);
    assert!(canvas.ops.is_empty(), "drew without a width");
}
