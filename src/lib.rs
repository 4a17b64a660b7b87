//! Command-line layer over `htm_index`: vertex and range parsing, range
//! output, and timing helpers shared by the binaries.

pub mod input;
pub mod output;
pub mod util;
