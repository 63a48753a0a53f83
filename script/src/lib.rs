//! A small host for type-level tests written in a TypeScript-like syntax.
//!
//! It parses the declarations and the test calls of type-test scripts and answers type queries
//! from the declared types, without any inference:
//!
//! ```
//! use rtt_api::host::Program;
//! use rtt_script::ScriptProgram;
//!
//! let program = ScriptProgram::from_sources(vec![
//!     ("lib.d.ts", "declare function isString<T>(): RTT_FAIL<\"Expected `string`\">;"),
//!     ("a.spec-types.ts", "testType('is a string', () => isString<number>());"),
//! ])?;
//! assert_eq!(2, program.source_files().len());
//! # Result::<_, rtt_script::ScriptError>::Ok(())
//! ```
#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_qualifications
)]
#![doc(test(attr(deny(warnings))))]

mod error;
mod lexer;
mod parser;
mod program;
mod session;
mod tree;
mod types;

pub use error::{ScriptError, ScriptErrorKind};
pub use program::{ScriptProgram, ScriptSignature, ScriptType};
pub use session::ScriptSession;
pub use tree::{ScriptFile, ScriptNode};
