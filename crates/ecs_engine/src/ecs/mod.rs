//! Entity-Component-System core
//!
//! Components are plain data tagged with a kind name, entities are bundles of
//! components, and systems declare the ordered component kinds they need.
//! Wiring entities into systems is the job of [`crate::scene::Scene`].

pub mod component;
pub mod entity;
pub mod requirement;
pub mod system;

pub use component::{Component, ComponentRef, Handle, Kind};
pub use entity::{Entity, EntityId};
pub use requirement::{find_duplicate, match_components, Requirement};
pub use system::{Membership, MultiMembers, SharedMembers, SingleMembers, System};
