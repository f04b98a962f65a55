//! Message passing between systems
//!
//! The [`MailBox`] is owned by the window and handed to the active scene. It
//! replaces direct references between systems: a system that produces data
//! sends or posts a message, and the systems interested in it listen.

pub mod mailbox;
pub mod messages;

pub use mailbox::{MailBox, Message, MessageKind};
pub use messages::{
    keys, ChangeSceneMessage, KeyboardMessage, Modifiers, MouseButtonMessage, MouseMotionMessage,
    MouseScrollMessage, QuitMessage,
};
