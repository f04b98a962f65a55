//! Component trait and shared component cells
//!
//! Components are owned by their entity's component map but shared with every
//! system the entity is wired into. The loop is single-threaded, so a component
//! lives in an `Rc<RefCell<_>>` cell. Two views of that cell exist:
//!
//! - [`ComponentRef`]: type-erased, tagged with the kind name. This is what the
//!   entity map stores and what the matching algorithm hands to systems.
//! - [`Handle<T>`]: typed. Systems convert once, when an entity is added, and
//!   then access their data without any further lookups.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Name of a component kind, e.g. `"Space"` or `"Render"`
pub type Kind = &'static str;

/// Data bucket describing one facet of an entity
///
/// By convention a struct named `FooComponent` has the kind `"Foo"`.
///
/// ```rust
/// use ecs_engine::ecs::Component;
///
/// struct HealthComponent {
///     current: f32,
/// }
///
/// impl Component for HealthComponent {
///     const KIND: &'static str = "Health";
/// }
/// ```
pub trait Component: 'static {
    /// Kind name under which the component is stored on an entity
    const KIND: Kind;

    /// Kind name of this component
    fn kind(&self) -> Kind {
        Self::KIND
    }
}

/// Typed, shared handle to a component instance
pub struct Handle<T: Component> {
    cell: Rc<RefCell<T>>,
}

impl<T: Component> Handle<T> {
    /// Wrap a component in a new shared cell
    pub fn new(component: T) -> Self {
        Self {
            cell: Rc::new(RefCell::new(component)),
        }
    }

    /// Borrow the component immutably
    ///
    /// # Panics
    /// Panics if the component is currently borrowed mutably.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.cell.borrow()
    }

    /// Borrow the component mutably
    ///
    /// # Panics
    /// Panics if the component is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.cell.borrow_mut()
    }

    /// Type-erased view of the same component
    pub fn erase(&self) -> ComponentRef {
        let cell: Rc<dyn Any> = self.cell.clone();
        ComponentRef { kind: T::KIND, cell }
    }

    /// Whether both handles point at the same component instance
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    /// Number of live handles (entity map and system memberships included)
    pub fn share_count(&self) -> usize {
        Rc::strong_count(&self.cell)
    }
}

impl<T: Component> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: Component> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle").field("kind", &T::KIND).finish()
    }
}

/// Type-erased, shared reference to a component instance
#[derive(Clone)]
pub struct ComponentRef {
    kind: Kind,
    cell: Rc<dyn Any>,
}

impl ComponentRef {
    /// Wrap a component in a new shared cell
    pub fn new<T: Component>(component: T) -> Self {
        Handle::new(component).erase()
    }

    /// Kind name of the referenced component
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Whether the referenced component is a `T`
    pub fn is<T: Component>(&self) -> bool {
        self.cell.is::<RefCell<T>>()
    }

    /// Recover the typed handle, or `None` if the component is not a `T`
    pub fn downcast<T: Component>(&self) -> Option<Handle<T>> {
        Rc::clone(&self.cell)
            .downcast::<RefCell<T>>()
            .ok()
            .map(|cell| Handle { cell })
    }

    /// Whether both references point at the same component instance
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Component> From<Handle<T>> for ComponentRef {
    fn from(handle: Handle<T>) -> Self {
        handle.erase()
    }
}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef").field("kind", &self.kind).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct HealthComponent {
        current: f32,
    }

    impl Component for HealthComponent {
        const KIND: Kind = "Health";
    }

    struct ArmorComponent;

    impl Component for ArmorComponent {
        const KIND: Kind = "Armor";
    }

    #[test]
    fn test_erased_ref_keeps_kind() {
        let component = ComponentRef::new(HealthComponent { current: 10.0 });
        assert_eq!(component.kind(), "Health");
        assert!(component.is::<HealthComponent>());
        assert!(!component.is::<ArmorComponent>());
    }

    #[test]
    fn test_downcast_shares_the_cell() {
        let component = ComponentRef::new(HealthComponent { current: 10.0 });
        let first = component.downcast::<HealthComponent>().unwrap();
        let second = component.downcast::<HealthComponent>().unwrap();

        first.borrow_mut().current = 3.0;

        assert_eq!(second.borrow().current, 3.0);
        assert!(first.ptr_eq(&second));
        assert!(first.erase().ptr_eq(&component));
    }

    #[test]
    fn test_downcast_to_wrong_type_fails() {
        let component = ComponentRef::new(ArmorComponent);
        assert!(component.downcast::<HealthComponent>().is_none());
    }

    #[test]
    fn test_share_count_tracks_clones() {
        let handle = Handle::new(HealthComponent { current: 1.0 });
        assert_eq!(handle.share_count(), 1);

        let erased = handle.erase();
        let _copy = handle.clone();
        assert_eq!(handle.share_count(), 3);

        drop(erased);
        assert_eq!(handle.share_count(), 2);
    }

    #[test]
    fn test_kind_method_matches_const() {
        let health = HealthComponent { current: 0.0 };
        assert_eq!(health.kind(), HealthComponent::KIND);
    }
}
