//! Freer monad: programs as data.
//!
//! A program is either a finished value or one pending instruction together
//! with the continuations that turn the instruction's eventual result into the
//! rest of the program:
//!
//! ```text
//! Freer<I, A> = Pure(A)
//!             | Impure { instruction: I, continuation_queue: ContinuationQueue<I> }
//! ```
//!
//! Building a program never executes an instruction. Only [`Freer::interpret`]
//! and [`Freer::interpret_async`] do, one instruction at a time, in the order
//! the program was composed.
//!
//! Continuations are kept in a queue ("reflection without remorse"), so
//! `flat_map` is O(1) and interpretation is a loop rather than recursion.
//!
//! # Examples
//!
//! ```rust
//! use blog_effects::control::Freer;
//!
//! enum Counter { Get, Set(i32) }
//!
//! fn get() -> Freer<Counter, i32> {
//!     Freer::lift(Counter::Get)
//! }
//!
//! fn set(value: i32) -> Freer<Counter, ()> {
//!     Freer::lift(Counter::Set(value))
//! }
//!
//! let program = get().flat_map(|x| set(x + 1)).then(get());
//!
//! let mut state = 10;
//! let result = program.interpret(|command| match command {
//!     Counter::Get => Box::new(state),
//!     Counter::Set(value) => {
//!         state = value;
//!         Box::new(())
//!     }
//! });
//!
//! assert_eq!(result, Ok(11));
//! assert_eq!(state, 11);
//! ```

use smallvec::SmallVec;
use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::marker::PhantomData;
use thiserror::Error;

/// A handler result whose static type has been erased.
pub type Erased = Box<dyn Any + Send>;

// =============================================================================
// InterpretError
// =============================================================================

/// Error raised while driving a program.
///
/// Only a handler returning a value of a different type than the one its
/// instruction was lifted with can cause this.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretError {
    /// A value did not have the type its continuation expected.
    #[error("Type mismatch in interpret: {context}")]
    TypeMismatch {
        /// Where the mismatch was detected.
        context: &'static str,
    },
}

fn downcast<A: 'static>(input: Erased, context: &'static str) -> Result<A, InterpretError> {
    input
        .downcast::<A>()
        .map(|boxed| *boxed)
        .map_err(|_| InterpretError::TypeMismatch { context })
}

// =============================================================================
// Continuations
// =============================================================================

/// `A -> Freer<I, B>` with `A` and `B` erased so heterogeneous continuations
/// can share one queue.
trait TypeErasedArrow<I>: Send {
    fn apply(self: Box<Self>, input: Erased) -> Result<Freer<I, Erased>, InterpretError>;
}

struct FlatMapArrow<I, A, B, F> {
    function: F,
    _phantom: PhantomData<fn(A) -> (I, B)>,
}

impl<I, A, B, F> TypeErasedArrow<I> for FlatMapArrow<I, A, B, F>
where
    I: Send + 'static,
    A: Send + 'static,
    B: Send + 'static,
    F: FnOnce(A) -> Freer<I, B> + Send + 'static,
{
    fn apply(self: Box<Self>, input: Erased) -> Result<Freer<I, Erased>, InterpretError> {
        let value = downcast::<A>(input, "flat_map continuation")?;
        Ok(match (self.function)(value) {
            Freer::Pure(b) => Freer::Pure(Box::new(b) as Erased),
            Freer::Impure {
                instruction,
                continuation_queue,
                ..
            } => Freer::Impure {
                instruction,
                continuation_queue,
                _result: PhantomData,
            },
        })
    }
}

struct MapArrow<A, B, F> {
    function: F,
    _phantom: PhantomData<fn(A) -> B>,
}

impl<I, A, B, F> TypeErasedArrow<I> for MapArrow<A, B, F>
where
    A: Send + 'static,
    B: Send + 'static,
    F: FnOnce(A) -> B + Send + 'static,
{
    #[inline]
    fn apply(self: Box<Self>, input: Erased) -> Result<Freer<I, Erased>, InterpretError> {
        let value = downcast::<A>(input, "map continuation")?;
        Ok(Freer::Pure(Box::new((self.function)(value)) as Erased))
    }
}

/// First continuation of every lifted instruction: checks the handler's
/// result has the type the instruction promised.
struct ResultArrow<R>(PhantomData<fn() -> R>);

impl<I, R: Send + 'static> TypeErasedArrow<I> for ResultArrow<R> {
    #[inline]
    fn apply(self: Box<Self>, input: Erased) -> Result<Freer<I, Erased>, InterpretError> {
        if input.is::<R>() {
            Ok(Freer::Pure(input))
        } else {
            Err(InterpretError::TypeMismatch {
                context: "instruction result",
            })
        }
    }
}

const CONTINUATION_INLINE_CAPACITY: usize = 8;

type Arrows<I> = SmallVec<[Box<dyn TypeErasedArrow<I>>; CONTINUATION_INLINE_CAPACITY]>;

/// The continuations attached to one pending instruction, in application order.
#[doc(hidden)]
pub struct ContinuationQueue<I> {
    arrows: Arrows<I>,
}

impl<I> ContinuationQueue<I> {
    #[inline]
    fn new() -> Self {
        Self {
            arrows: SmallVec::new(),
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.arrows.len()
    }
}

impl<I: Send + 'static> ContinuationQueue<I> {
    #[inline]
    fn push_flat_map<A, B, F>(mut self, function: F) -> Self
    where
        A: Send + 'static,
        B: Send + 'static,
        F: FnOnce(A) -> Freer<I, B> + Send + 'static,
    {
        self.arrows.push(Box::new(FlatMapArrow {
            function,
            _phantom: PhantomData,
        }));
        self
    }

    #[inline]
    fn push_map<A, B, F>(mut self, function: F) -> Self
    where
        A: Send + 'static,
        B: Send + 'static,
        F: FnOnce(A) -> B + Send + 'static,
    {
        self.arrows.push(Box::new(MapArrow {
            function,
            _phantom: PhantomData,
        }));
        self
    }

    #[inline]
    fn push_result<R: Send + 'static>(mut self) -> Self {
        self.arrows.push(Box::new(ResultArrow::<R>(PhantomData)));
        self
    }
}

/// Queues still to be applied during interpretation. Each frame is stored
/// reversed so the next arrow is popped from its end; the newest frame runs
/// first.
struct ContinuationStack<I> {
    frames: SmallVec<[Arrows<I>; CONTINUATION_INLINE_CAPACITY]>,
}

impl<I> ContinuationStack<I> {
    fn new() -> Self {
        Self {
            frames: SmallVec::new(),
        }
    }

    fn push_queue(&mut self, queue: ContinuationQueue<I>) {
        let mut arrows = queue.arrows;
        if !arrows.is_empty() {
            arrows.reverse();
            self.frames.push(arrows);
        }
    }

    fn pop(&mut self) -> Option<Box<dyn TypeErasedArrow<I>>> {
        loop {
            let frame = self.frames.last_mut()?;
            if let Some(arrow) = frame.pop() {
                return Some(arrow);
            }
            self.frames.pop();
        }
    }
}

// =============================================================================
// Freer Monad
// =============================================================================

/// A program over instruction set `I` producing `A`.
///
/// # Laws
///
/// Equality is observational: same result and same instruction sequence
/// under the same handler.
///
/// - **Left Identity**: `Freer::pure(a).flat_map(f) == f(a)`
/// - **Right Identity**: `m.flat_map(Freer::pure) == m`
/// - **Associativity**: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`
pub enum Freer<I, A> {
    /// A finished program.
    Pure(A),

    /// One instruction and what to do with its result.
    Impure {
        /// The instruction to execute next.
        instruction: I,
        /// Continuations applied to the instruction's result.
        continuation_queue: ContinuationQueue<I>,
        /// Ties the result type to the erased queue.
        _result: PhantomData<fn() -> A>,
    },
}

impl<I, A> Freer<I, A> {
    /// Lifts a value into a program with no instructions.
    #[inline]
    pub const fn pure(value: A) -> Self {
        Self::Pure(value)
    }

    /// `true` when the program has no pending instruction.
    #[inline]
    pub const fn is_pure(&self) -> bool {
        matches!(self, Self::Pure(_))
    }

    /// The next instruction the program will execute, if any.
    #[inline]
    pub const fn peek(&self) -> Option<&I> {
        match self {
            Self::Pure(_) => None,
            Self::Impure { instruction, .. } => Some(instruction),
        }
    }
}

impl<I: Send + 'static, A: Send + 'static> Freer<I, A> {
    /// Lifts a single instruction whose handler produces an `A`.
    ///
    /// A handler returning anything other than an `A` for this instruction
    /// makes interpretation fail with [`InterpretError::TypeMismatch`].
    #[inline]
    pub fn lift(instruction: I) -> Self {
        Self::Impure {
            instruction,
            continuation_queue: ContinuationQueue::new().push_result::<A>(),
            _result: PhantomData,
        }
    }

    /// Transforms the result without adding instructions.
    #[inline]
    pub fn map<B, F>(self, function: F) -> Freer<I, B>
    where
        B: Send + 'static,
        F: FnOnce(A) -> B + Send + 'static,
    {
        match self {
            Self::Pure(a) => Freer::Pure(function(a)),
            Self::Impure {
                instruction,
                continuation_queue,
                ..
            } => Freer::Impure {
                instruction,
                continuation_queue: continuation_queue.push_map(function),
                _result: PhantomData,
            },
        }
    }

    /// Sequences a program that depends on this one's result.
    ///
    /// Instructions of `function(a)` are never executed before every
    /// instruction of `self`.
    #[inline]
    pub fn flat_map<B, F>(self, function: F) -> Freer<I, B>
    where
        B: Send + 'static,
        F: FnOnce(A) -> Freer<I, B> + Send + 'static,
    {
        match self {
            Self::Pure(a) => function(a),
            Self::Impure {
                instruction,
                continuation_queue,
                ..
            } => Freer::Impure {
                instruction,
                continuation_queue: continuation_queue.push_flat_map(function),
                _result: PhantomData,
            },
        }
    }

    /// Alias for `flat_map`.
    #[inline]
    pub fn and_then<B, F>(self, function: F) -> Freer<I, B>
    where
        B: Send + 'static,
        F: FnOnce(A) -> Freer<I, B> + Send + 'static,
    {
        self.flat_map(function)
    }

    /// Runs `next` after `self`, discarding `self`'s result.
    #[inline]
    #[must_use]
    pub fn then<B: Send + 'static>(self, next: Freer<I, B>) -> Freer<I, B> {
        self.flat_map(move |_| next)
    }

    /// Drives the program with a synchronous handler.
    ///
    /// # Errors
    ///
    /// Returns [`InterpretError::TypeMismatch`] if the handler answers an
    /// instruction with a value of the wrong type.
    pub fn interpret<Handler>(self, mut handler: Handler) -> Result<A, InterpretError>
    where
        Handler: FnMut(I) -> Erased,
    {
        let (mut interpretation, mut step) = Interpretation::start(self);
        loop {
            match step {
                Step::Done(value) => return Ok(value),
                Step::Perform(instruction) => {
                    step = interpretation.resume(handler(instruction))?;
                }
            }
        }
    }

    /// Drives the program with an asynchronous handler.
    ///
    /// Each handler future is awaited to completion before the next
    /// continuation runs, so instructions never overlap.
    ///
    /// # Errors
    ///
    /// Returns [`InterpretError::TypeMismatch`] if the handler answers an
    /// instruction with a value of the wrong type.
    pub async fn interpret_async<Handler, Fut>(
        self,
        mut handler: Handler,
    ) -> Result<A, InterpretError>
    where
        Handler: FnMut(I) -> Fut,
        Fut: Future<Output = Erased>,
    {
        let (mut interpretation, mut step) = Interpretation::start(self);
        loop {
            match step {
                Step::Done(value) => return Ok(value),
                Step::Perform(instruction) => {
                    let result = handler(instruction).await;
                    step = interpretation.resume(result)?;
                }
            }
        }
    }
}

// =============================================================================
// Interpretation state machine
// =============================================================================

enum Step<I, A> {
    Done(A),
    Perform(I),
}

struct Interpretation<I, A> {
    stack: ContinuationStack<I>,
    _result: PhantomData<fn() -> A>,
}

impl<I: Send + 'static, A: Send + 'static> Interpretation<I, A> {
    fn start(program: Freer<I, A>) -> (Self, Step<I, A>) {
        let mut interpretation = Self {
            stack: ContinuationStack::new(),
            _result: PhantomData,
        };
        let step = match program {
            Freer::Pure(value) => Step::Done(value),
            Freer::Impure {
                instruction,
                continuation_queue,
                ..
            } => {
                interpretation.stack.push_queue(continuation_queue);
                Step::Perform(instruction)
            }
        };
        (interpretation, step)
    }

    /// Feeds a handler result through the continuations until the next
    /// instruction or the final value is reached.
    fn resume(&mut self, mut current: Erased) -> Result<Step<I, A>, InterpretError> {
        loop {
            let Some(arrow) = self.stack.pop() else {
                return downcast::<A>(current, "final result").map(Step::Done);
            };

            match arrow.apply(current)? {
                Freer::Pure(value) => current = value,
                Freer::Impure {
                    instruction,
                    continuation_queue,
                    ..
                } => {
                    self.stack.push_queue(continuation_queue);
                    return Ok(Step::Perform(instruction));
                }
            }
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<I: Debug, A: Debug> Debug for Freer<I, A> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pure(a) => formatter.debug_tuple("Pure").field(a).finish(),
            Self::Impure {
                instruction,
                continuation_queue,
                ..
            } => formatter
                .debug_struct("Impure")
                .field("instruction", instruction)
                .field("continuations", &continuation_queue.len())
                .finish(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
