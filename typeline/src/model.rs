// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The parsed element chain and its range effects.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use hashbrown::HashMap;
use peniko::Color;
use smallvec::SmallVec;

use crate::{
    Border, CustomValue, Element, ElementId, PropKey, PropValue, Side, TypeEnvironment, Typeface,
    Underline,
};

/// Identifies one updater attached by an effect, so that removal takes out
/// exactly that registration.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) struct UpdaterId(u32);

impl UpdaterId {
    /// Updaters attached to synthetic elements are never removed individually.
    pub(crate) const SYNTHETIC: Self = Self(u32::MAX);
}

/// Mutates the environment when the element carrying it is entered.
#[derive(Clone)]
pub enum EnvironmentUpdater {
    /// Writes one property value.
    Set(PropValue),
    /// Runs arbitrary code against the environment.
    Custom(Rc<dyn Fn(&mut TypeEnvironment)>),
}

impl EnvironmentUpdater {
    /// Wraps a closure.
    pub fn custom(f: impl Fn(&mut TypeEnvironment) + 'static) -> Self {
        Self::Custom(Rc::new(f))
    }

    /// Applies this updater.
    pub fn apply(&self, env: &mut TypeEnvironment) {
        match self {
            Self::Set(value) => env.apply(value.clone()),
            Self::Custom(f) => f(env),
        }
    }
}

impl core::fmt::Debug for EnvironmentUpdater {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Set(value) => f.debug_tuple("Set").field(value).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Undo token returned when an effect is attached.
///
/// Passing it back to [`remove`](Self::remove) reverses exactly the
/// registration that produced it, which can happen only once.
#[derive(Debug)]
#[must_use = "dropping the remover makes the effect permanent"]
pub struct EffectRemover {
    start: ElementId,
    end: ElementId,
    keys: SmallVec<[PropKey; 2]>,
    updater: UpdaterId,
}

impl EffectRemover {
    /// Detaches the effect from `model`.
    pub fn remove(self, model: &mut TypeModel) {
        model.remove_effect(self);
    }

    /// The element at which the effect starts.
    pub fn start(&self) -> ElementId {
        self.start
    }

    /// The element after which the effect ends.
    pub fn end(&self) -> ElementId {
        self.end
    }
}

/// A parsed text: the element chain, a position index and the effect list.
///
/// Effect ranges are half-open ranges of element [indices](Element::index).
/// The range `2..5` saves the affected properties when element 2 is entered
/// and restores them after element 4 has been visited. Callers holding byte
/// offsets resolve them with [`index_at_offset`](Self::index_at_offset).
#[derive(Clone, Debug)]
pub struct TypeModel {
    text: String,
    elements: Vec<Element>,
    parsed_len: usize,
    head: Option<ElementId>,
    tail: Option<ElementId>,
    index_map: HashMap<usize, ElementId>,
    first_effect: Option<ElementId>,
    next_updater: u32,
}

impl TypeModel {
    /// Builds a model from elements in parse order, linking the content chain.
    pub(crate) fn from_elements(text: &str, mut elements: Vec<Element>) -> Self {
        let len = elements.len();
        let mut index_map = HashMap::with_capacity(len);
        for (slot, element) in elements.iter_mut().enumerate() {
            let id = ElementId::new(slot);
            element.prev = slot.checked_sub(1).map(ElementId::new);
            element.next = (slot + 1 < len).then(|| ElementId::new(slot + 1));
            index_map.insert(element.index, id);
        }
        Self {
            text: text.into(),
            elements,
            parsed_len: len,
            head: (len > 0).then(|| ElementId::new(0)),
            tail: len.checked_sub(1).map(ElementId::new),
            index_map,
            first_effect: None,
            next_updater: 0,
        }
    }

    /// The parsed source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of parsed elements.
    pub fn len(&self) -> usize {
        self.parsed_len
    }

    /// Returns `true` if the model holds no parsed elements.
    pub fn is_empty(&self) -> bool {
        self.parsed_len == 0
    }

    /// The first element of the content chain.
    pub fn first(&self) -> Option<ElementId> {
        self.head
    }

    /// The last element of the content chain.
    pub fn last(&self) -> Option<ElementId> {
        self.tail
    }

    /// The element for `id`.
    ///
    /// # Panics
    ///
    /// If `id` does not belong to this model.
    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.slot()]
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.slot()]
    }

    /// The element following `id` in the content chain.
    pub fn next(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).next
    }

    /// The element preceding `id` in the content chain.
    pub fn prev(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).prev
    }

    /// Looks up the element at a dense ordinal position.
    pub fn get(&self, index: usize) -> Option<ElementId> {
        self.index_map.get(&index).copied()
    }

    /// Resolves a byte offset in the source text to the index of the element
    /// covering it.
    pub fn index_at_offset(&self, offset: usize) -> Option<usize> {
        if offset >= self.text.len() {
            return None;
        }
        let parsed = &self.elements[..self.parsed_len];
        let slot = parsed.partition_point(|element| element.start <= offset);
        Some(parsed[slot.checked_sub(1)?].index)
    }

    /// Iterates the content chain in order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> + '_ {
        core::iter::successors(self.head, |id| self.next(*id)).map(|id| (id, self.element(id)))
    }

    /// The first element of the effect list.
    pub fn first_effect(&self) -> Option<ElementId> {
        self.first_effect
    }

    /// The element following `id` in the effect list.
    pub fn next_effect(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).next_effect
    }

    /// Iterates the effect list, which is sorted by index.
    pub fn effects(&self) -> impl Iterator<Item = ElementId> + '_ {
        core::iter::successors(self.first_effect, |id| self.next_effect(*id))
    }

    /// Effect boundary elements whose index lies in `range`.
    pub(crate) fn effects_in(&self, range: Range<usize>) -> Vec<ElementId> {
        self.effects()
            .skip_while(|id| self.element(*id).index < range.start)
            .take_while(|id| self.element(*id).index < range.end)
            .collect()
    }

    /// Stores an element created during layout. It joins neither list.
    pub(crate) fn push_synthetic(&mut self, element: Element) -> ElementId {
        let id = ElementId::new(self.elements.len());
        self.elements.push(element);
        id
    }

    /// Drops every element created by previous layout passes.
    pub(crate) fn reset_synthetic(&mut self) {
        self.elements.truncate(self.parsed_len);
    }

    /// Colors the text of `range`.
    pub fn add_text_color_effect(
        &mut self,
        range: Range<usize>,
        color: Color,
    ) -> Option<EffectRemover> {
        self.add_value_effect(range, PropValue::TextColor(color))
    }

    /// Fills the background behind `range`.
    pub fn add_bg_effect(&mut self, range: Range<usize>, color: Color) -> Option<EffectRemover> {
        self.add_value_effect(range, PropValue::Background(color))
    }

    /// Underlines `range`.
    pub fn add_underline_effect(
        &mut self,
        range: Range<usize>,
        underline: Underline,
    ) -> Option<EffectRemover> {
        self.add_value_effect(range, PropValue::Underline(Some(underline)))
    }

    /// Switches the typeface of `range`.
    pub fn add_typeface_effect(
        &mut self,
        range: Range<usize>,
        typeface: Typeface,
    ) -> Option<EffectRemover> {
        self.add_value_effect(range, PropValue::Typeface(typeface))
    }

    /// Changes the text size of `range`.
    pub fn add_text_size_effect(
        &mut self,
        range: Range<usize>,
        size: f32,
    ) -> Option<EffectRemover> {
        self.add_value_effect(range, PropValue::TextSize(size))
    }

    /// Draws a border along one side of every element in `range`.
    pub fn add_border_effect(
        &mut self,
        range: Range<usize>,
        side: Side,
        border: Border,
    ) -> Option<EffectRemover> {
        self.add_value_effect(range, PropValue::Border(side, border))
    }

    /// Sets a value in the generic property bucket for `range`.
    pub fn add_custom_effect(
        &mut self,
        range: Range<usize>,
        key: u32,
        value: CustomValue,
    ) -> Option<EffectRemover> {
        self.add_value_effect(range, PropValue::Custom(key, Some(value)))
    }

    fn add_value_effect(&mut self, range: Range<usize>, value: PropValue) -> Option<EffectRemover> {
        let key = value.key();
        self.add_effect(range, &[key], EnvironmentUpdater::Set(value))
    }

    /// Attaches an arbitrary effect.
    ///
    /// Every key in `keys` is saved when the first element of `range` is
    /// entered, before `updater` runs, and restored after the last element of
    /// `range` has been visited. The updater must only change properties listed
    /// in `keys`, or the change leaks past the end of the range.
    ///
    /// Returns `None` without changing the model if `range` is empty or either
    /// end is not an element index.
    pub fn add_effect(
        &mut self,
        range: Range<usize>,
        keys: &[PropKey],
        updater: EnvironmentUpdater,
    ) -> Option<EffectRemover> {
        if range.is_empty() {
            return None;
        }
        let start = self.get(range.start)?;
        let end = self.get(range.end - 1)?;

        let id = UpdaterId(self.next_updater);
        self.next_updater = self.next_updater.wrapping_add(1);

        let start_element = self.element_mut(start);
        start_element.save_types.extend(keys.iter().copied());
        start_element.updaters.push((id, updater));
        self.element_mut(end)
            .restore_types
            .extend(keys.iter().copied());

        self.link_effect(start);
        self.link_effect(end);

        Some(EffectRemover {
            start,
            end,
            keys: keys.into(),
            updater: id,
        })
    }

    fn remove_effect(&mut self, remover: EffectRemover) {
        if remover.start.slot() >= self.parsed_len || remover.end.slot() >= self.parsed_len {
            return;
        }
        let start = self.element_mut(remover.start);
        for key in &remover.keys {
            if let Some(pos) = start.save_types.iter().position(|k| k == key) {
                start.save_types.remove(pos);
            }
        }
        start.updaters.retain(|(id, _)| *id != remover.updater);

        let end = self.element_mut(remover.end);
        for key in &remover.keys {
            if let Some(pos) = end.restore_types.iter().rposition(|k| k == key) {
                end.restore_types.remove(pos);
            }
        }

        for id in [remover.start, remover.end] {
            if !self.element(id).has_effects() {
                self.unlink_effect(id);
            }
        }
    }

    fn is_effect_linked(&self, id: ElementId) -> bool {
        self.first_effect == Some(id) || self.element(id).prev_effect.is_some()
    }

    /// Inserts `id` into the effect list, keeping it sorted by index.
    fn link_effect(&mut self, id: ElementId) {
        if self.is_effect_linked(id) {
            return;
        }
        let index = self.element(id).index;
        let Some(head) = self.first_effect else {
            self.first_effect = Some(id);
            return;
        };
        if index < self.element(head).index {
            self.element_mut(id).next_effect = Some(head);
            self.element_mut(head).prev_effect = Some(id);
            self.first_effect = Some(id);
            return;
        }
        let mut cursor = head;
        while let Some(next) = self.element(cursor).next_effect {
            if self.element(next).index > index {
                break;
            }
            cursor = next;
        }
        let after = self.element(cursor).next_effect;
        let element = self.element_mut(id);
        element.prev_effect = Some(cursor);
        element.next_effect = after;
        self.element_mut(cursor).next_effect = Some(id);
        if let Some(after) = after {
            self.element_mut(after).prev_effect = Some(id);
        }
    }

    fn unlink_effect(&mut self, id: ElementId) {
        if !self.is_effect_linked(id) {
            return;
        }
        let element = self.element_mut(id);
        let prev = element.prev_effect.take();
        let next = element.next_effect.take();
        match prev {
            Some(prev) => self.element_mut(prev).next_effect = next,
            None => self.first_effect = next,
        }
        if let Some(next) = next {
            self.element_mut(next).prev_effect = prev;
        }
    }
}
