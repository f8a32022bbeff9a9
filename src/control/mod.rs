//! Control structures for programs-as-data.
//!
//! - [`Freer`]: a program over an instruction set, built without running it
//!   and executed later by a handler

mod freer;

pub use freer::{Erased, Freer, InterpretError};
