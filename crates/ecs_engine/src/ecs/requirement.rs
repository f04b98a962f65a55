//! Requirement matching
//!
//! A system declares an ordered list of component kinds. An entity is wired
//! into the system when it owns one component of every listed kind, and the
//! components are then supplied in exactly that order. Systems index their
//! components positionally, so the order is part of the contract.

use std::collections::HashMap;

use super::component::{Component, ComponentRef, Handle, Kind};

/// Match an entity's components against a requirement list
///
/// Returns the owned components in the order of `required`, or `None` if any
/// required kind is missing. An empty requirement list matches every entity.
pub fn match_components(
    required: &[Kind],
    owned: &HashMap<Kind, ComponentRef>,
) -> Option<Vec<ComponentRef>> {
    required
        .iter()
        .map(|kind| owned.get(kind).cloned())
        .collect()
}

/// First kind listed more than once, if any
pub fn find_duplicate(required: &[Kind]) -> Option<Kind> {
    required
        .iter()
        .enumerate()
        .find(|&(index, kind)| required[..index].contains(kind))
        .map(|(_, kind)| *kind)
}

/// Typed view of a matched component list
///
/// Implemented for `()` and tuples of up to six [`Handle`]s. The tuple order is
/// the requirement order:
///
/// ```rust
/// use ecs_engine::common::{RenderComponent, SpaceComponent};
/// use ecs_engine::ecs::{Handle, Requirement};
///
/// type Drawable = (Handle<RenderComponent>, Handle<SpaceComponent>);
/// assert_eq!(Drawable::KINDS, &["Render", "Space"]);
/// ```
pub trait Requirement: Sized + 'static {
    /// Required kinds, in supply order
    const KINDS: &'static [Kind];

    /// Convert matched components into typed handles
    ///
    /// Returns `None` if the list has the wrong length or a component is not
    /// of the type registered for its position.
    fn from_components(components: &[ComponentRef]) -> Option<Self>;

    /// Whether every component is of the type registered for its position
    ///
    /// Two component types may declare the same kind name; matching by name
    /// alone cannot tell them apart.
    fn accepts(components: &[ComponentRef]) -> bool;

    /// Erased component at the given position
    fn component(&self, index: usize) -> Option<ComponentRef>;
}

impl Requirement for () {
    const KINDS: &'static [Kind] = &[];

    fn from_components(components: &[ComponentRef]) -> Option<Self> {
        components.is_empty().then_some(())
    }

    fn accepts(components: &[ComponentRef]) -> bool {
        components.is_empty()
    }

    fn component(&self, _index: usize) -> Option<ComponentRef> {
        None
    }
}

macro_rules! impl_requirement {
    ($($name:ident $index:tt),+) => {
        impl<$($name: Component),+> Requirement for ($(Handle<$name>,)+) {
            const KINDS: &'static [Kind] = &[$($name::KIND),+];

            fn from_components(components: &[ComponentRef]) -> Option<Self> {
                if components.len() != Self::KINDS.len() {
                    return None;
                }
                Some(($(components[$index].downcast::<$name>()?,)+))
            }

            fn accepts(components: &[ComponentRef]) -> bool {
                components.len() == Self::KINDS.len() $(&& components[$index].is::<$name>())+
            }

            fn component(&self, index: usize) -> Option<ComponentRef> {
                match index {
                    $($index => Some(self.$index.erase()),)+
                    _ => None,
                }
            }
        }
    };
}

impl_requirement!(A 0);
impl_requirement!(A 0, B 1);
impl_requirement!(A 0, B 1, C 2);
impl_requirement!(A 0, B 1, C 2, D 3);
impl_requirement!(A 0, B 1, C 2, D 3, E 4);
impl_requirement!(A 0, B 1, C 2, D 3, E 4, F 5);
