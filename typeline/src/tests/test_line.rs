// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;

use super::utils::{line_texts, FixedMeasurer, TestEnv};
use crate::{
    Alignment, InlineImage, InlineImageTable, LineLayout, LinePool, Parser, TypeEnvironment,
    Visibility, WordBreakChecker,
};

fn justified(width: f32) -> TestEnv {
    let mut env = TestEnv::new(width);
    env.env.set_alignment(Alignment::Justify).unwrap();
    env
}

#[test]
fn justify_gives_the_gap_to_the_element_before() {
    let mut env = justified(30.0);
    let mut model = env.parse("中文ab");
    let layout = env.layout(&mut model);

    assert_eq!(line_texts(&model, &layout), ["中文", "ab"]);
    let first = &layout.lines()[0];
    assert!(first.is_justified(), "non-final line was not justified");
    assert_eq!(first.layout_width(), 30.0);
    let zhong = model.element(first.elements()[0]);
    let wen = model.element(first.elements()[1]);
    assert_eq!(zhong.next_gap_width(), 10.0);
    assert_eq!(wen.next_gap_width(), 0.0);
    assert_eq!(wen.x(), 20.0);

    let last = &layout.lines()[1];
    assert!(!last.is_justified(), "last line was justified");
    assert_eq!(last.layout_width(), 20.0);
}

#[test]
fn justify_drops_the_remainder() {
    let mut env = justified(95.0);
    let mut model = env.parse("aa bb cc dddddddd");
    let layout = env.layout(&mut model);

    assert_eq!(line_texts(&model, &layout), ["aa bb cc", "dddddddd"]);
    let line = &layout.lines()[0];
    // 15px of slack over four word starts: a space and a letter per gap.
    let gaps: f32 = line
        .elements()
        .iter()
        .map(|id| model.element(*id).next_gap_width())
        .sum();
    assert_eq!(gaps, 12.0);
    assert_eq!(line.content_width(), 92.0);
    assert_eq!(line.layout_width(), 95.0);
}

#[test]
fn short_last_line_is_justified_below_threshold() {
    let mut env = justified(40.0);
    let mut model = env.parse("中文中文中文");
    let layout = env.layout(&mut model);
    assert!(!layout.lines()[1].is_justified(), "last line justified by default");

    env.env.set_last_line_justify_max_width(20.0).unwrap();
    let layout = env.layout(&mut model);
    let last = &layout.lines()[1];
    assert!(last.is_justified(), "last line slack is within threshold");
    assert_eq!(model.element(last.elements()[0]).next_gap_width(), 20.0);
}

#[test]
fn right_and_center_alignment() {
    let mut env = TestEnv::new(100.0);
    let mut model = env.parse("abc");

    env.env.set_alignment(Alignment::Right).unwrap();
    env.layout(&mut model);
    assert_eq!(model.element(model.first().unwrap()).x(), 70.0);

    env.env.set_alignment(Alignment::Center).unwrap();
    env.layout(&mut model);
    assert_eq!(model.element(model.first().unwrap()).x(), 35.0);
}

#[test]
fn trailing_space_is_hidden() {
    let mut env = TestEnv::new(50.0);
    let mut model = env.parse("aaaa bbbb");
    let layout = env.layout(&mut model);

    let line = &layout.lines()[0];
    assert_eq!(line.content_width(), 40.0);
    let space = model.element(model.get(4).unwrap());
    assert_eq!(space.visibility(), Visibility::Gone);
    assert_eq!(space.occupied_width(), 0.0);

    env.options.drop_last_if_space = false;
    let layout = env.layout(&mut model);
    assert_eq!(layout.lines()[0].content_width(), 50.0);
    assert!(
        model.element(model.get(4).unwrap()).is_visible(),
        "space hidden although dropping is off"
    );
}

#[test]
fn allowed_break_inside_a_word_adds_a_hyphen() {
    let checker: Rc<dyn WordBreakChecker> = Rc::new(|_: char| true);
    let mut env = TestEnv::new(50.0);
    env.parser = Parser::new().with_word_break_checker(checker);
    let mut model = env.parse("abcdefgh");
    let layout = env.layout(&mut model);

    // Breaking before `f` leaves no room for the hyphen, so the split moves back.
    assert_eq!(line_texts(&model, &layout), ["abcd-", "efgh"]);
    assert!(layout.lines()[0].content_width() <= 50.0, "hyphen overflowed");
}

#[test]
fn unbreakable_word_overflows_into_next_line() {
    let mut env = TestEnv::new(50.0);
    let mut model = env.parse("abcdefgh");
    let layout = env.layout(&mut model);
    assert_eq!(line_texts(&model, &layout), ["abcde", "fgh"]);
}

#[test]
fn word_moves_to_the_next_line_with_its_punctuation() {
    let mut env = TestEnv::new(50.0);
    let mut model = env.parse("ab cd,");
    let layout = env.layout(&mut model);
    assert_eq!(line_texts(&model, &layout), ["ab", "cd,"]);
}

#[test]
fn wide_element_gets_a_line_of_its_own() {
    let mut table = InlineImageTable::new();
    table.insert_char('★', InlineImage::intrinsic(1, 100.0, 10.0));
    let mut env = TestEnv::new(50.0);
    env.parser = Parser::new().with_inline_images(Rc::new(table));
    let mut model = env.parse("a★b");
    let layout = env.layout(&mut model);

    assert_eq!(line_texts(&model, &layout), ["a", "★", "b"]);
    for line in layout.lines() {
        assert!(
            line.content_width() <= line.width_limit() || line.len() == 1,
            "line over the width limit holds more than one element"
        );
    }
}

#[test]
fn pool_keeps_at_most_its_capacity() {
    let mut pool = LinePool::new(2);
    let lines = [pool.acquire(), pool.acquire(), pool.acquire()];
    for line in lines {
        pool.release(line);
    }
    assert_eq!(pool.available(), 2);
    let line = pool.acquire();
    assert!(line.is_empty(), "pooled line was not cleared");
    assert_eq!(pool.available(), 1);
}

#[test]
fn unbounded_width_keeps_the_left_edge() {
    for alignment in [Alignment::Right, Alignment::Center] {
        let mut env = TypeEnvironment::new();
        env.set_text_size(20.0).unwrap();
        env.set_alignment(alignment).unwrap();
        let mut model = Parser::new().parse("abc").unwrap();
        let mut layout = LineLayout::default();
        layout.measure_and_layout(Some(&mut model), &mut env, &FixedMeasurer);

        let xs: Vec<f32> = model.iter().map(|(_, el)| el.x()).collect();
        assert_eq!(xs, [0.0, 10.0, 20.0], "{alignment:?} moved the line");
        assert_eq!(layout.content_width(), 30.0);
    }
}
