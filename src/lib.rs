//! # blog-effects
//!
//! Two encodings of one small effectful system: a blog that caches users'
//! post lists, stores and updates posts, and mails post lists around.
//!
//! ## Overview
//!
//! - **Free monad** ([`free`]): workflows are [`control::Freer`] programs over
//!   [`free::Operation`], built as data and run later by [`free::run`].
//! - **Tagless final** ([`tagless`]): workflows are generic functions over an
//!   [`interpreter::Interpreter`] that sequence its actions directly.
//! - **Interpreters** ([`interpreter`]): the handler trait both encodings run
//!   against, plus [`interpreter::Traced`] for observing operations.
//! - **Reference backend** ([`backend`]): in-memory cache, database and
//!   network with simulated latency.
//!
//! ## Feature Flags
//!
//! - `free`: the free-monad encoding
//! - `tagless`: the tagless-final encoding
//!
//! Both are enabled by default.
//!
//! ## Example
//!
//! ```rust
//! use blog_effects::prelude::*;
//!
//! let runtime = tokio::runtime::Builder::new_current_thread()
//!     .enable_all()
//!     .build()
//!     .unwrap();
//!
//! let john = User::new(1, "john@example.com");
//! let backend = ReferenceBackend::with_latency(LatencyProfile::zero())
//!     .with_posts([Post::new(john.clone(), "Cool post", "...").stored_as(PostId::new(1))]);
//!
//! runtime
//!     .block_on(free::run(free::workflows::review_posts(john.id), &backend).run_async())
//!     .unwrap();
//! runtime.block_on(tagless::workflows::review_posts(&backend, john.id).run_async());
//!
//! assert_eq!(backend.outbox().len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use blog_effects::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backend::{LatencyProfile, ReferenceBackend};
    pub use crate::domain::*;
    pub use crate::effect::AsyncIO;
    pub use crate::interpreter::{Interpreter, LogSink, RecordingSink, Traced};

    #[cfg(feature = "free")]
    pub use crate::control::{Freer, InterpretError};

    #[cfg(feature = "free")]
    pub use crate::free;

    #[cfg(feature = "tagless")]
    pub use crate::tagless;
}

pub mod backend;
pub mod config;
pub mod domain;
pub mod effect;
pub mod interpreter;
pub mod workflow;

#[cfg(feature = "free")]
pub mod control;

#[cfg(feature = "free")]
pub mod free;

#[cfg(feature = "tagless")]
pub mod tagless;
