//! Execution context for interpreters.
//!
//! [`AsyncIO`] is the deferred, future-backed context every interpreter
//! handler returns. Suspension happens only between actions, never inside
//! one, so a program's operations cannot interleave.
//!
//! The [`chain!`](crate::chain) macro provides do-notation over both
//! `AsyncIO` and free programs.

mod async_io;
mod chain_macro;

pub use async_io::AsyncIO;
