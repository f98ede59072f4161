//! VM source text to commands.

pub(crate) mod parser;
