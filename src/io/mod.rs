// CSV adapters around the reconciliation core

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{IoError, Result};
pub use reader::{read_errors, read_input, read_input_from, read_output};
pub use writer::{write_errors, write_output, OutputPaths, ERROR_HEADER, OUTPUT_HEADER};
