//! Lua table constructors as output format.
//!
//! Every exported table becomes a global assignment
//!
//! ```text
//! fishing_bait = {
//! 	{ baitid=1, name='Little Worm', flags=0 },
//! };
//! ```
//!
//! and the file ends with a `return` statement exposing all tables by name.

mod blob_format;
mod record;
#[cfg(test)]
mod short_string;
mod value_format;
mod writer;

pub use blob_format::{BlobFormat, BlobLiteral, PlanarCoordinates};
pub use record::RecordSerializer;
pub use value_format::LuaValueEncoder;
pub use writer::{LuaWriter, RowEnrichment};

/// The literal for absent values.
pub const NIL: &str = "nil";
