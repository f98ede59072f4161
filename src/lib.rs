pub mod api;
pub mod ast;
pub mod codegen;
pub mod diagnostic;
pub mod runtime;
pub mod span;
pub mod syntax;

// Re-export public API: `hackvm::translate()` etc.
pub use api::*;
