//! File access for SchemaGen
//!
//! Narrow capabilities for reading the schema and opening per-table outputs,
//! plus their filesystem implementations.

pub mod reader;
pub mod writer;

// Re-export key types
pub use reader::{FsReader, Reader};
pub use writer::{FileTarget, FileWriter, OutputStream, OutputTarget, Writer};
