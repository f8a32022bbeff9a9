//! Free-monad encoding.
//!
//! Workflows are [`Program`] values: trees of [`Operation`]s and
//! continuations that do nothing until [`run`] walks them against an
//! [`Interpreter`]. The same program can be run any number of times, against
//! any interpreter.
//!
//! ```rust
//! use blog_effects::backend::{LatencyProfile, ReferenceBackend};
//! use blog_effects::domain::{Post, User};
//! use blog_effects::free;
//!
//! let runtime = tokio::runtime::Builder::new_current_thread()
//!     .enable_all()
//!     .build()
//!     .unwrap();
//!
//! let backend = ReferenceBackend::with_latency(LatencyProfile::zero());
//! let john = User::new(1, "john@example.com");
//! let program = free::workflows::publish_post(Post::new(john, "Hello", "World"));
//!
//! runtime.block_on(free::run(program, &backend).run_async()).unwrap();
//! assert_eq!(backend.outbox().len(), 1);
//! ```

mod operation;
mod program;
pub mod workflows;

pub use operation::{Operation, Program};
pub use program::{
    cache_delete, cache_get, cache_get_posts, cache_invalidate, cache_put, cache_store_posts,
    db_create_post, db_list_posts, db_update_post, net_send, net_send_posts,
};

use crate::control::{Erased, InterpretError};
use crate::effect::AsyncIO;
use crate::interpreter::Interpreter;

/// Routes one operation to its handler.
///
/// The match is exhaustive: adding an [`Operation`] variant without a handler
/// does not compile.
pub fn dispatch<I: Interpreter>(interpreter: &I, operation: Operation) -> AsyncIO<Erased> {
    match operation {
        Operation::CacheGet { key } => erase(interpreter.cache_get(&key)),
        Operation::CachePut { key, value } => erase(interpreter.cache_put(&key, value)),
        Operation::CacheDelete { key } => erase(interpreter.cache_delete(&key)),
        Operation::DbListPosts { user_id } => erase(interpreter.db_list_posts(user_id)),
        Operation::DbCreatePost { post } => erase(interpreter.db_create_post(post)),
        Operation::DbUpdatePost { post_id, update } => {
            erase(interpreter.db_update_post(post_id, update))
        }
        Operation::NetSend { payload, recipient } => {
            erase(interpreter.net_send(payload, &recipient))
        }
    }
}

fn erase<A: Send + 'static>(action: AsyncIO<A>) -> AsyncIO<Erased> {
    action.fmap(|value| Box::new(value) as Erased)
}

/// Executes `program` against `interpreter`, one operation at a time.
///
/// Each handler's action completes before the continuation it feeds runs.
///
/// # Errors
///
/// The action yields [`InterpretError::TypeMismatch`] only if a handler
/// answers an operation with the wrong type.
pub fn run<I, A>(program: Program<A>, interpreter: &I) -> AsyncIO<Result<A, InterpretError>>
where
    I: Interpreter,
    A: Send + 'static,
{
    let interpreter = interpreter.clone();
    AsyncIO::new(move || async move {
        program
            .interpret_async(|operation| dispatch(&interpreter, operation).run_async())
            .await
    })
}
