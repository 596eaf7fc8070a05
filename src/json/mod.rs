//! The JSON side of the codec pair: a streaming parser over 8- or 16-bit
//! code units and a writer handler that emits minified JSON.

mod error;
mod parser;
mod writer;

pub use error::JsonError;
pub use parser::parse_json;
pub use writer::JsonWriter;
