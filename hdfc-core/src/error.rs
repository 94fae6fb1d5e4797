//! Error taxonomy for statement processing.
//!
//! Config and parse failures are fatal and surface to the CLI; LLM failures
//! are handled inside the classifier and never abort a run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed configuration (category file, column mapping).
    #[error("config error: {0}")]
    Config(String),

    /// A statement source yielded no usable rows or is missing a required
    /// column.
    #[error("parse error: {0}")]
    Parse(String),

    /// Any failure in the LLM fallback path (network, bad JSON, timeout).
    #[error("llm error: {0}")]
    Llm(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
