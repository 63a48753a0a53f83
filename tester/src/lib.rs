//! A harness for type-level tests.
//!
//! Type tests are calls whose type, not value, tells if they pass. A failing assertion
//! resolves to a type containing the [`FAIL_SENTINEL`](sentinel/constant.FAIL_SENTINEL.html)
//! token. This crate finds `describeType`/`testType` blocks in the files of a host
//! [`Program`](../rtt_api/host/trait.Program.html), asks the host type checker for the type of
//! each assertion and reports the results like a usual test runner.
//!
//! The same detection powers [`TypeTestSession`](diagnostics/struct.TypeTestSession.html),
//! which adds failing assertions to the diagnostics of an editor session.
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

pub mod config;
pub mod diagnostics;
mod error;
pub mod formatter;
pub mod report;
pub mod resolver;
mod run;
pub mod sentinel;
pub mod sources;
pub mod walker;

pub use error::TesterError;
pub use run::TypeTester;
