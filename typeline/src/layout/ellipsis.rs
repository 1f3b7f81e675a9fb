// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The three ellipsis procedures.
//!
//! Each runs after the natural flow, with a cleared environment, and leaves
//! at most `max` lines behind.

use alloc::vec::Vec;

use super::{LineLayout, Source};
use crate::line::Line;
use crate::model::{EnvironmentUpdater, UpdaterId};
use crate::{Element, ElementId, ElementKind, PropValue, TextMeasurer, TypeEnvironment, TypeModel};

/// Creates and measures a marker element drawn in the base style, with
/// `overrides` applied on top.
fn decoration<M: TextMeasurer + ?Sized>(
    model: &mut TypeModel,
    env: &mut TypeEnvironment,
    measurer: &M,
    kind: ElementKind,
    text: &str,
    overrides: &[PropValue],
) -> ElementId {
    let mut element = Element::synthetic(kind, text);
    for value in overrides {
        element.save_types.push(value.key());
        element.restore_types.push(value.key());
        element
            .updaters
            .push((UpdaterId::SYNTHETIC, EnvironmentUpdater::Set(value.clone())));
    }
    let id = model.push_synthetic(element);
    model.measure_element(id, env, measurer);
    id
}

/// A zero-size element replaying the effects of `skipped`, or `None` if no
/// effect boundary was skipped.
fn ignore_effects(model: &mut TypeModel, skipped: Vec<ElementId>) -> Option<ElementId> {
    if skipped.is_empty() {
        return None;
    }
    Some(model.push_synthetic(Element::synthetic(ElementKind::IgnoreEffect(skipped), "")))
}

/// The parsed elements of `lines` in order, dropping synthetic ones.
fn parsed_elements<'a>(
    model: &TypeModel,
    lines: impl IntoIterator<Item = &'a Line>,
) -> Vec<ElementId> {
    lines
        .into_iter()
        .flat_map(Line::elements)
        .copied()
        .filter(|id| !model.element(*id).kind.is_synthetic())
        .collect()
}

/// Keeps the first `max` lines and ends the last one with the ellipsis,
/// followed by the "more" decoration if one is configured.
pub(super) fn ellipsize_end<M: TextMeasurer + ?Sized>(
    layout: &mut LineLayout,
    model: &mut TypeModel,
    env: &mut TypeEnvironment,
    measurer: &M,
    max: usize,
) {
    layout.truncate(max);
    let Some(mut line) = layout.lines.pop() else {
        return;
    };
    let ellipsis = decoration(
        model,
        env,
        measurer,
        ElementKind::Ellipsis,
        &layout.options.ellipsis,
        &[],
    );
    let more = layout.options.more.clone().map(|more| {
        let mut overrides = Vec::new();
        if let Some(color) = more.color {
            overrides.push(PropValue::TextColor(color));
        }
        if let Some(underline) = more.underline {
            overrides.push(PropValue::Underline(Some(underline)));
        }
        decoration(model, env, measurer, ElementKind::MoreText, &more.text, &overrides)
    });

    let reserved = model.element(ellipsis).measure_width
        + more.map_or(0.0, |id| model.element(id).measure_width);
    let budget = line.width_limit() - reserved;
    let elements = line.take_elements();
    for id in elements {
        let element = model.element(id);
        if element.is_paragraph_break()
            || element.kind == ElementKind::BreakWord
            || line.content_width() + element.measure_width > budget
        {
            break;
        }
        line.add(model, id);
    }
    if line
        .elements()
        .last()
        .is_some_and(|id| model.element(*id).is_space())
    {
        line.pop(model);
    }
    line.add(model, ellipsis);
    if let Some(more) = more {
        line.add(model, more);
    }
    line.layout(model, env, false, true);
    layout.lines.push(line);
}

/// Keeps the ending of the content and starts the first line with the
/// ellipsis.
///
/// The elements of the last `max` natural lines are reflowed behind the
/// ellipsis, dropping leading elements until the result fits. Elements are
/// measured again because effects of the dropped content change what applies
/// at the new first line; an ignore-effect element carries those effects.
///
/// Dropping one element can merge two lines when a group of elements that may
/// not start a line moves with it. If the count then falls below `max`, or no
/// round fits at all, the last overflowing reflow is kept and its surplus
/// leading lines are cut.
pub(super) fn ellipsize_start<M: TextMeasurer + ?Sized>(
    layout: &mut LineLayout,
    model: &mut TypeModel,
    env: &mut TypeEnvironment,
    measurer: &M,
    max: usize,
) {
    let natural: Vec<Vec<ElementId>> = layout
        .lines
        .iter()
        .map(|line| parsed_elements(model, [line]))
        .collect();
    layout.release_lines();
    let ellipsis = decoration(
        model,
        env,
        measurer,
        ElementKind::Ellipsis,
        &layout.options.ellipsis,
        &[],
    );
    let mut ignore = None;

    // Reflowing a line boundary behind the ellipsis can absorb a line, so start
    // early enough that the first round still overflows.
    let mut from = natural.len().saturating_sub(max);
    let candidates = loop {
        let candidates = natural[from..].concat();
        if from == 0 {
            break candidates;
        }
        let count =
            reflow_behind_ellipsis(layout, model, env, measurer, ellipsis, &mut ignore, &candidates);
        if count > max {
            break candidates;
        }
        from -= 1;
    };

    let mut overflowing = None;
    let mut count = 0;
    for skip in 0..candidates.len() {
        let kept = &candidates[skip..];
        count = reflow_behind_ellipsis(layout, model, env, measurer, ellipsis, &mut ignore, kept);
        if count <= max {
            break;
        }
        overflowing = Some(skip);
    }
    if count != max {
        if let Some(skip) = overflowing {
            if count < max {
                let kept = &candidates[skip..];
                reflow_behind_ellipsis(layout, model, env, measurer, ellipsis, &mut ignore, kept);
            }
            env.clear();
            cut_leading_lines(layout, model, env, ellipsis, ignore, max);
        }
    }
    layout.truncate(max);
}

/// Flows `kept` behind the ellipsis, replaying every effect boundary before
/// `kept` through the `ignore` element. Returns the number of lines.
fn reflow_behind_ellipsis<M: TextMeasurer + ?Sized>(
    layout: &mut LineLayout,
    model: &mut TypeModel,
    env: &mut TypeEnvironment,
    measurer: &M,
    ellipsis: ElementId,
    ignore: &mut Option<ElementId>,
    kept: &[ElementId],
) -> usize {
    let first_index = first_parsed_index(model, kept).unwrap_or(model.len());
    let skipped = model.effects_in(0..first_index);
    let mut ids = Vec::with_capacity(kept.len() + 2);
    if !skipped.is_empty() {
        let id = set_ignore(model, ignore, skipped);
        ids.push(id);
    }
    ids.push(ellipsis);
    ids.extend_from_slice(kept);

    layout.release_lines();
    env.clear();
    layout.flow(model, env, measurer, Source::List(ids.into_iter()), usize::MAX);
    layout.lines.len()
}

/// Points the reusable ignore-effect element at `skipped`.
fn set_ignore(
    model: &mut TypeModel,
    ignore: &mut Option<ElementId>,
    skipped: Vec<ElementId>,
) -> ElementId {
    let id = *ignore.get_or_insert_with(|| {
        model.push_synthetic(Element::synthetic(
            ElementKind::IgnoreEffect(Vec::new()),
            "",
        ))
    });
    model.element_mut(id).kind = ElementKind::IgnoreEffect(skipped);
    id
}

/// Drops leading lines until `max` remain and starts the new first line with
/// the ellipsis, keeping as much of that line's ending as fits beside it.
fn cut_leading_lines(
    layout: &mut LineLayout,
    model: &mut TypeModel,
    env: &TypeEnvironment,
    ellipsis: ElementId,
    mut ignore: Option<ElementId>,
    max: usize,
) {
    let surplus = layout.lines.len().saturating_sub(max);
    if surplus == 0 {
        return;
    }
    let mut tail = layout.lines.split_off(surplus);
    layout.release_lines();
    let mut line = tail.remove(0);
    let elements = line.take_elements();
    let budget = line.width_limit() - model.element(ellipsis).measure_width;

    let mut width = 0.0;
    let mut from = elements.len();
    for (at, id) in elements.iter().enumerate().rev() {
        let element_width = model.element(*id).measure_width;
        if width + element_width > budget {
            break;
        }
        width += element_width;
        from = at;
    }
    while from < elements.len() && model.element(elements[from]).is_space() {
        from += 1;
    }
    let kept = &elements[from..];

    let resume = first_parsed_index(model, kept)
        .or_else(|| {
            tail.iter()
                .find_map(|line| first_parsed_index(model, line.elements()))
        })
        .unwrap_or(model.len());
    let skipped = model.effects_in(0..resume);
    if !skipped.is_empty() {
        let id = set_ignore(model, &mut ignore, skipped);
        line.add(model, id);
    }
    line.add(model, ellipsis);
    for id in kept {
        line.add(model, *id);
    }
    let drop_last_if_space = layout.options.drop_last_if_space;
    line.layout(model, env, drop_last_if_space, tail.is_empty());
    let top = line.y();
    line.offset_y(model, -top);

    if let Some(next) = tail.first() {
        let space = if line.ends_paragraph(model) {
            env.paragraph_space()
        } else {
            env.line_space()
        };
        let dy = line.content_height() + space - next.y();
        for tail_line in &mut tail {
            tail_line.offset_y(model, dy);
        }
    }
    layout.lines.push(line);
    layout.lines.append(&mut tail);
}

/// Keeps the first `ceil(max / 2)` and the last `max / 2` lines and
/// splices the ellipsis into the last line of the first half.
pub(super) fn ellipsize_middle<M: TextMeasurer + ?Sized>(
    layout: &mut LineLayout,
    model: &mut TypeModel,
    env: &mut TypeEnvironment,
    measurer: &M,
    max: usize,
) {
    let ellipsis = decoration(
        model,
        env,
        measurer,
        ElementKind::Ellipsis,
        &layout.options.ellipsis,
        &[],
    );
    if max == 1 {
        splice_single_line(layout, model, env, ellipsis);
        return;
    }

    let total = layout.lines.len();
    let head = max.div_ceil(2);
    let tail = max / 2;
    let tail_from = total - tail;
    let resume =
        first_parsed_index(model, layout.lines[tail_from].elements()).unwrap_or(model.len());
    let dropped_paragraph = layout.lines[tail_from - 1].ends_paragraph(model);

    let mut tail_lines = layout.lines.split_off(tail_from);
    for line in layout.lines.drain(head..) {
        layout.pool.release(line);
    }
    let Some(mut line) = layout.lines.pop() else {
        return;
    };

    let elements = line.take_elements();
    let budget = line.width_limit() - model.element(ellipsis).measure_width;
    let mut cut = first_parsed_index(model, &elements).unwrap_or(0);
    for id in elements {
        let element = model.element(id);
        if element.is_paragraph_break()
            || element.kind == ElementKind::BreakWord
            || line.content_width() + element.measure_width > budget
        {
            break;
        }
        if !element.kind.is_synthetic() {
            cut = element.index + 1;
        }
        line.add(model, id);
    }
    let skipped = model.effects_in(cut..resume);
    if let Some(id) = ignore_effects(model, skipped) {
        line.add(model, id);
    }
    line.add(model, ellipsis);
    line.layout(model, env, false, true);

    let space = if dropped_paragraph {
        env.paragraph_space()
    } else {
        env.line_space()
    };
    let dy = line.y() + line.content_height() + space - tail_lines[0].y();
    for tail_line in &mut tail_lines {
        tail_line.offset_y(model, dy);
    }
    layout.lines.push(line);
    layout.lines.append(&mut tail_lines);
}

fn first_parsed_index(model: &TypeModel, elements: &[ElementId]) -> Option<usize> {
    elements
        .iter()
        .map(|id| model.element(*id))
        .find(|element| !element.kind.is_synthetic())
        .map(|element| element.index)
}

/// Builds one line holding the beginning of the content, the ellipsis and the
/// ending, each side given half of the remaining width.
fn splice_single_line(
    layout: &mut LineLayout,
    model: &mut TypeModel,
    env: &TypeEnvironment,
    ellipsis: ElementId,
) {
    let elements = parsed_elements(model, &layout.lines);
    if layout.lines.is_empty() {
        return;
    }
    let mut line = layout.lines.remove(0);
    layout.release_lines();
    line.take_elements();
    let budget = line.width_limit() - model.element(ellipsis).measure_width;

    let mut head = Vec::new();
    let mut head_width = 0.0;
    for id in &elements {
        let element = model.element(*id);
        if element.is_paragraph_break() || head_width + element.measure_width > budget / 2.0 {
            break;
        }
        head_width += element.measure_width;
        head.push(*id);
    }
    while let Some(space) = head.pop_if(|id| model.element(*id).is_space()) {
        head_width -= model.element(space).measure_width;
    }

    let head_len = head.len();
    let mut tail_width = 0.0;
    let mut tail_from = elements.len();
    for (at, id) in elements.iter().enumerate().skip(head_len).rev() {
        let element = model.element(*id);
        if element.is_paragraph_break()
            || head_width + tail_width + element.measure_width > budget
        {
            break;
        }
        tail_width += element.measure_width;
        tail_from = at;
    }
    while tail_from < elements.len() && model.element(elements[tail_from]).is_space() {
        tail_from += 1;
    }

    for id in &elements[tail_from..] {
        line.add(model, *id);
    }
    line.add_first(model, ellipsis);
    let cut = head.last().map_or(0, |id| model.element(*id).index + 1);
    let resume = elements
        .get(tail_from)
        .map_or(model.len(), |id| model.element(*id).index);
    let skipped = model.effects_in(cut..resume);
    if let Some(id) = ignore_effects(model, skipped) {
        line.add_first(model, id);
    }
    for id in head.into_iter().rev() {
        line.add_first(model, id);
    }
    line.layout(model, env, false, true);
    layout.lines.push(line);
}
