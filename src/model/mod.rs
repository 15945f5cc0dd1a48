//! Data model shared by the layout builders and the store
//!
//! Media objects come in from the import pipeline, chains of container
//! descriptors go out to the store.

mod container;
pub mod meta;
mod object;

pub use container::{Chain, ContainerDescriptor};
pub use meta::{upnp_class, MetaData};
pub use object::{MediaKind, MediaObject, ObjectId, ObjectType, Resource};
