//! `AsyncIO` - the deferred asynchronous execution context.
//!
//! Every interpreter handler returns an `AsyncIO`. Building one (including
//! chaining with `fmap`/`flat_map`) runs nothing; the wrapped future is only
//! created and polled by [`AsyncIO::run_async`]. This is what lets the
//! tagless-final workflows be composed up front and executed later, and what
//! lets the free-monad driver await each handler before feeding the next
//! continuation.
//!
//! # Examples
//!
//! ```rust
//! use blog_effects::effect::AsyncIO;
//!
//! let runtime = tokio::runtime::Builder::new_current_thread()
//!     .enable_all()
//!     .build()
//!     .unwrap();
//!
//! let async_io = AsyncIO::pure(10)
//!     .fmap(|x| x * 2)
//!     .flat_map(|x| AsyncIO::pure(x + 1));
//!
//! assert_eq!(runtime.block_on(async_io.run_async()), 21);
//! ```

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// A deferred asynchronous computation producing `A`.
///
/// # Monad Laws
///
/// 1. **Left Identity**: `AsyncIO::pure(a).flat_map(f) == f(a)`
/// 2. **Right Identity**: `m.flat_map(AsyncIO::pure) == m`
/// 3. **Associativity**: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`
pub struct AsyncIO<A> {
    run_async_io: Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = A> + Send>> + Send>,
}

// =============================================================================
// Constructors
// =============================================================================

impl<A: 'static> AsyncIO<A> {
    /// Creates an `AsyncIO` from a closure producing a future.
    ///
    /// The closure is not called until `run_async`.
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = A> + Send + 'static,
    {
        Self {
            run_async_io: Box::new(move || Box::pin(action())),
        }
    }
}

impl<A: Send + 'static> AsyncIO<A> {
    /// Wraps a value without performing any effect.
    pub fn pure(value: A) -> Self {
        Self {
            run_async_io: Box::new(move || Box::pin(async move { value })),
        }
    }

    /// Wraps a synchronous side effect; `effect` runs when the action is run.
    pub fn from_fn<F>(effect: F) -> Self
    where
        F: FnOnce() -> A + Send + 'static,
    {
        Self::new(move || async move { effect() })
    }
}

// =============================================================================
// Execution
// =============================================================================

impl<A: 'static> AsyncIO<A> {
    /// Runs the action and returns its result.
    ///
    /// This is the only place effects happen. Call it at the program edge.
    pub async fn run_async(self) -> A {
        (self.run_async_io)().await
    }
}

// =============================================================================
// Functor / Monad
// =============================================================================

impl<A: 'static> AsyncIO<A> {
    /// Transforms the result without adding effects.
    pub fn fmap<B, F>(self, function: F) -> AsyncIO<B>
    where
        F: FnOnce(A) -> B + Send + 'static,
        B: 'static,
    {
        AsyncIO::new(move || async move {
            let value = self.run_async().await;
            function(value)
        })
    }

    /// Sequences a dependent action after this one completes.
    ///
    /// The effects of `function(a)` never start before `self` has finished.
    pub fn flat_map<B, F>(self, function: F) -> AsyncIO<B>
    where
        F: FnOnce(A) -> AsyncIO<B> + Send + 'static,
        B: 'static,
    {
        AsyncIO::new(move || async move {
            let value_a = self.run_async().await;
            let async_io_b = function(value_a);
            async_io_b.run_async().await
        })
    }

    /// Alias for `flat_map`.
    pub fn and_then<B, F>(self, function: F) -> AsyncIO<B>
    where
        F: FnOnce(A) -> AsyncIO<B> + Send + 'static,
        B: 'static,
    {
        self.flat_map(function)
    }

    /// Runs `next` after `self`, discarding `self`'s result.
    #[must_use]
    pub fn then<B>(self, next: AsyncIO<B>) -> AsyncIO<B>
    where
        B: 'static,
    {
        self.flat_map(move |_| next)
    }

    /// Waits `duration` before running `self`. A zero duration adds no suspension.
    #[must_use]
    pub fn after(self, duration: Duration) -> Self {
        if duration.is_zero() {
            self
        } else {
            AsyncIO::delay_async(duration).then(self)
        }
    }
}

impl AsyncIO<()> {
    /// Sleeps for `duration` on the tokio timer.
    #[must_use]
    pub fn delay_async(duration: Duration) -> Self {
        Self::new(move || async move {
            tokio::time::sleep(duration).await;
        })
    }
}

impl<A> std::fmt::Debug for AsyncIO<A> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("AsyncIO(<deferred>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[rstest]
    #[tokio::test]
    async fn pure_returns_value() {
        assert_eq!(AsyncIO::pure(42).run_async().await, 42);
    }

    #[rstest]
    #[tokio::test]
    async fn construction_is_deferred() {
        let counter = Arc::new(AtomicUsize::new(0));
        let clone = Arc::clone(&counter);

        let action = AsyncIO::from_fn(move || clone.fetch_add(1, Ordering::SeqCst))
            .fmap(|previous| previous + 10);
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        assert_eq!(action.run_async().await, 10);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn flat_map_runs_in_order() {
        let log = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let first = Arc::clone(&log);
        let second = Arc::clone(&log);

        let action = AsyncIO::from_fn(move || first.lock().push("first"))
            .then(AsyncIO::from_fn(move || second.lock().push("second")));
        action.run_async().await;

        assert_eq!(*log.lock(), vec!["first", "second"]);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn after_waits_for_duration() {
        let start = tokio::time::Instant::now();

        let value = AsyncIO::pure(1).after(Duration::from_millis(500)).run_async().await;

        assert_eq!(value, 1);
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn after_zero_does_not_advance_clock() {
        let start = tokio::time::Instant::now();

        AsyncIO::pure(()).after(Duration::ZERO).run_async().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[rstest]
    fn debug_hides_closure() {
        assert_eq!(format!("{:?}", AsyncIO::pure(1)), "AsyncIO(<deferred>)");
    }
}
