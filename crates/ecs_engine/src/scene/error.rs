//! Scene errors

use crate::ecs::{EntityId, Kind};

/// Programming errors detected while composing a scene
///
/// The panicking scene API reports these through its panic message; the
/// `try_*` variants return them.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// No entity with this id is registered with the scene
    #[error("entity {0} is not registered with this scene")]
    MissingEntity(EntityId),

    /// A system lists the same component kind twice
    #[error("system '{system}' requires component kind '{kind}' more than once")]
    DuplicateRequirement {
        /// System name
        system: &'static str,
        /// Repeated kind
        kind: Kind,
    },

    /// Components handed to a system are not the ones its requirement expects
    #[error("components {supplied:?} supplied for entity {entity} do not match requirement {required:?}")]
    RequirementMismatch {
        /// Entity being wired
        entity: EntityId,
        /// Kinds the system requires
        required: &'static [Kind],
        /// Kinds actually supplied
        supplied: Vec<Kind>,
    },
}
