// src/core/mod.rs

pub mod flags;
pub mod options;
pub mod parameters;
/// Config and output path helpers.
pub mod paths;
pub mod support;
/// Splitting invocation strings into tokens.
pub mod tokenizer;
pub mod values;
