//! Do-notation for programs.
//!
//! `chain!` rewrites a block of binds into nested `flat_map` calls, so it works
//! with any type exposing `flat_map(self, FnOnce(A) -> Self<B>)`: both
//! [`AsyncIO`](crate::effect::AsyncIO) and `Freer` programs.
//!
//! ```text
//! chain! {
//!     pattern <= program;      // bind
//!     let pattern = expr;      // pure let
//!     program                  // final expression
//! }
//! ```
//!
//! `<=` stands in for `<-`, which macro patterns cannot match.

/// Do-notation over `flat_map`.
///
/// # Examples
///
/// ```rust
/// use blog_effects::chain;
/// use blog_effects::effect::AsyncIO;
///
/// let runtime = tokio::runtime::Builder::new_current_thread()
///     .enable_all()
///     .build()
///     .unwrap();
///
/// let program = chain! {
///     x <= AsyncIO::pure(1);
///     (y, z) <= AsyncIO::pure((2, 3));
///     let sum = x + y + z;
///     AsyncIO::pure(sum * 10)
/// };
///
/// assert_eq!(runtime.block_on(program.run_async()), 60);
/// ```
#[macro_export]
macro_rules! chain {
    ($result:expr) => {
        $result
    };

    (_ <= $program:expr ; $($rest:tt)+) => {
        $program.flat_map(move |_| $crate::chain!($($rest)+))
    };

    ($pattern:ident <= $program:expr ; $($rest:tt)+) => {
        $program.flat_map(move |$pattern| $crate::chain!($($rest)+))
    };

    (($($pattern:tt)*) <= $program:expr ; $($rest:tt)+) => {
        $program.flat_map(move |($($pattern)*)| $crate::chain!($($rest)+))
    };

    (let $pattern:ident = $expr:expr ; $($rest:tt)+) => {{
        let $pattern = $expr;
        $crate::chain!($($rest)+)
    }};

    (let ($($pattern:tt)*) = $expr:expr ; $($rest:tt)+) => {{
        let ($($pattern)*) = $expr;
        $crate::chain!($($rest)+)
    }};
}
