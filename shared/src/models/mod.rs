mod entity;
mod reply;
mod role;

pub use entity::{field, Entity, EntityBuilder, EntityKind, Fields};
pub use reply::{Menu, Prompt, Reply};
pub use role::Role;

/// Opaque sender identifier handed in by the transport layer.
pub type SenderId = String;
