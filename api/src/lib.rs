//! This crate provides the interfaces and data structures shared by type-level test harnesses
//! and the hosts that type-check the code under test.
//!
//! A host exposes parsed files through [`SourceFile`](host/trait.SourceFile.html),
//! type information through [`TypeChecker`](host/trait.TypeChecker.html)
//! and live analysis sessions through [`LanguageSession`](host/trait.LanguageSession.html).
//!
//! It is currently used by the [`rtt_script`](https://docs.rs/rtt_script/) host and the
//! [`rtt_tester`](https://docs.rs/rtt_tester/) harness.
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

pub mod host;
pub mod model;
