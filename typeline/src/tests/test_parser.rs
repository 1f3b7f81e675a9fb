// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;

use crate::{
    ElementKind, ImageSizing, InlineImage, InlineImageTable, LineBreakType, Parser, TypeModel,
    WordPart,
};

fn kinds(model: &TypeModel) -> Vec<ElementKind> {
    model.iter().map(|(_, el)| el.kind().clone()).collect()
}

fn texts(model: &TypeModel) -> Vec<&str> {
    model.iter().map(|(_, el)| el.text()).collect()
}

fn word_parts(model: &TypeModel) -> Vec<WordPart> {
    model.iter().map(|(_, el)| el.word_part()).collect()
}

fn break_types(model: &TypeModel) -> Vec<LineBreakType> {
    model.iter().map(|(_, el)| el.line_break_type()).collect()
}

fn image_parser(table: InlineImageTable) -> Parser {
    Parser::new().with_inline_images(Rc::new(table))
}

#[test]
fn empty_input_has_no_model() {
    assert!(Parser::new().parse("").is_none(), "empty text parsed");
}

#[test]
fn latin_words_are_marked_by_part() {
    use WordPart::{End, Middle, Start, Whole};

    let model = Parser::new().parse("hello world").unwrap();
    assert_eq!(model.len(), 11);
    assert_eq!(
        word_parts(&model),
        [Start, Middle, Middle, Middle, End, Whole, Start, Middle, Middle, Middle, End]
    );
    for (position, (_, element)) in model.iter().enumerate() {
        assert_eq!(element.index(), position, "index is the parse position");
        assert_eq!(element.start(), position, "ASCII starts are byte offsets");
    }
}

#[test]
fn single_letters_and_ideographs_are_whole_words() {
    let model = Parser::new().parse("a 中b").unwrap();
    assert_eq!(word_parts(&model), [WordPart::Whole; 4]);
    let starts: Vec<usize> = model.iter().map(|(_, el)| el.start()).collect();
    assert_eq!(starts, [0, 1, 2, 5]);
}

#[test]
fn line_breaks_become_paragraph_elements() {
    let model = Parser::new().parse("a\r\nb\nc\rd").unwrap();
    assert_eq!(texts(&model), ["a", "\r\n", "b", "\n", "c", "\r", "d"]);
    let breaks: Vec<usize> = model
        .iter()
        .filter(|(_, el)| el.is_paragraph_break())
        .map(|(_, el)| el.start())
        .collect();
    assert_eq!(breaks, [1, 4, 6]);
}

#[test]
fn registered_token_becomes_one_emoji() {
    let mut table = InlineImageTable::new();
    table.insert_token("[smile]", InlineImage::emoji(1));
    let model = image_parser(table).parse("hi[smile]!").unwrap();

    assert_eq!(texts(&model), ["h", "i", "[smile]", "!"]);
    assert_eq!(kinds(&model)[2], ElementKind::Emoji(InlineImage::emoji(1)));
    assert_eq!(
        word_parts(&model),
        [WordPart::Start, WordPart::End, WordPart::Whole, WordPart::Whole]
    );
    assert_eq!(model.element(model.last().unwrap()).start(), 9);
}

#[test]
fn unregistered_token_stays_text() {
    use LineBreakType::{Normal, NotEnd, NotStart};

    let model = image_parser(InlineImageTable::new()).parse("[nope]").unwrap();
    assert_eq!(model.len(), 6);
    assert!(
        kinds(&model).iter().all(|kind| *kind == ElementKind::Text),
        "unknown token produced an image"
    );
    assert_eq!(
        break_types(&model),
        [NotEnd, Normal, Normal, Normal, Normal, NotStart]
    );
}

#[test]
fn token_lookahead_is_bounded() {
    let token = format!("[{}]", "x".repeat(40));
    let mut table = InlineImageTable::new();
    table.insert_token(&token, InlineImage::emoji(1));
    let model = image_parser(table).parse(&token).unwrap();
    assert_eq!(model.len(), 42, "long token must not be matched");
}

#[test]
fn nested_bracket_ends_token_search() {
    let mut table = InlineImageTable::new();
    table.insert_token("[ok]", InlineImage::emoji(1));
    let model = image_parser(table).parse("[[ok]").unwrap();
    assert_eq!(texts(&model), ["[", "[ok]"]);
}

#[test]
fn char_then_pair_lookup() {
    let mut table = InlineImageTable::new();
    table
        .insert_char('☺', InlineImage::emoji(2))
        .insert_pair('👍', '\u{1F3FD}', InlineImage::emoji(3));
    let model = image_parser(table).parse("☺👍\u{1F3FD}👍").unwrap();

    assert_eq!(texts(&model), ["☺", "👍\u{1F3FD}", "👍"]);
    let kinds = kinds(&model);
    assert_eq!(kinds[0], ElementKind::Emoji(InlineImage::emoji(2)));
    assert_eq!(kinds[1], ElementKind::Emoji(InlineImage::emoji(3)));
    assert_eq!(kinds[2], ElementKind::Text);
    assert_eq!(model.element(model.last().unwrap()).start(), 11);
}

#[test]
fn intrinsic_images_become_drawables() {
    let mut table = InlineImageTable::new();
    table.insert_char('★', InlineImage::intrinsic(4, 30.0, 12.0));
    let model = image_parser(table).parse("★").unwrap();
    match model.element(model.first().unwrap()).kind() {
        ElementKind::Drawable(image) => {
            assert_eq!(image.sizing, ImageSizing::Intrinsic);
            assert_eq!(image.width, 30.0);
        }
        kind => panic!("expected a drawable, got {kind:?}"),
    }
}

#[test]
fn combining_marks_join_their_base() {
    let model = Parser::new().parse("e\u{301}x").unwrap();
    assert_eq!(texts(&model), ["e\u{301}", "x"]);
    assert_eq!(word_parts(&model), [WordPart::Start, WordPart::End]);
    assert_eq!(model.element(model.last().unwrap()).start(), 3);
}

#[test]
fn word_break_checker_marks_interior_positions() {
    use LineBreakType::{Normal, WordBreakAllowed};

    let checker: Rc<dyn crate::WordBreakChecker> = Rc::new(|ch: char| ch == 'c' || ch == 'a');
    let model = Parser::new()
        .with_word_break_checker(checker)
        .parse("abcd")
        .unwrap();
    // The first letter of a word is never an interior position.
    assert_eq!(
        break_types(&model),
        [Normal, Normal, WordBreakAllowed, Normal]
    );
}

#[test]
fn punctuation_classes() {
    use LineBreakType::{Normal, NotEnd, NotStart};

    let model = Parser::new().parse("a,b（c）。d").unwrap();
    assert_eq!(
        break_types(&model),
        [Normal, NotStart, Normal, NotEnd, Normal, NotStart, NotStart, Normal]
    );
}
