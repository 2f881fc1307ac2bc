//! Commands Layer
//!
//! Thin handlers that bridge callers to the use cases. Errors leave this
//! layer as plain strings.

mod collection_cmd;
mod container_cmd;
mod group_cmd;
mod import_cmd;
mod object_cmd;

pub use collection_cmd::*;
pub use container_cmd::*;
pub use group_cmd::*;
pub use import_cmd::*;
pub use object_cmd::*;
