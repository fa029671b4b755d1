pub mod command;
pub mod document;
pub mod error;
pub mod geometry;
pub mod identifier;
pub mod math;

pub use command::{Command, CommandConfig, CreateSlab};
pub use document::{DocumentModel, MemoryDocument};
pub use error::{Result, SlabportError};
pub use identifier::ElementId;
