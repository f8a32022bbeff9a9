//! An interpreter wrapper that reports every operation before it runs.

use super::{Interpreter, OperationTag};
use crate::domain::{CacheKey, Email, Payload, Post, PostId, PostUpdate, StoredPost, UserId};
use crate::effect::AsyncIO;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

// =============================================================================
// TraceRecord
// =============================================================================

/// One observed operation: its kind and its arguments as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRecord {
    /// The operation kind.
    pub operation: OperationTag,
    /// Named arguments, e.g. `{"key": "1"}` for a cache lookup.
    pub arguments: Value,
}

impl TraceRecord {
    /// Creates a record from its parts.
    pub const fn new(operation: OperationTag, arguments: Value) -> Self {
        Self {
            operation,
            arguments,
        }
    }

    pub(crate) fn cache_get(key: &CacheKey) -> Self {
        Self::new(OperationTag::CacheGet, json!({ "key": key.as_str() }))
    }

    pub(crate) fn cache_put(key: &CacheKey, value: &str) -> Self {
        Self::new(
            OperationTag::CachePut,
            json!({ "key": key.as_str(), "value": value }),
        )
    }

    pub(crate) fn cache_delete(key: &CacheKey) -> Self {
        Self::new(OperationTag::CacheDelete, json!({ "key": key.as_str() }))
    }

    pub(crate) fn db_list_posts(user_id: UserId) -> Self {
        Self::new(
            OperationTag::DbListPosts,
            json!({ "user_id": user_id.value() }),
        )
    }

    pub(crate) fn db_create_post(post: &Post) -> Self {
        Self::new(OperationTag::DbCreatePost, json!({ "post": post }))
    }

    pub(crate) fn db_update_post(post_id: PostId, update: &PostUpdate) -> Self {
        Self::new(
            OperationTag::DbUpdatePost,
            json!({ "post_id": post_id.value(), "update": update }),
        )
    }

    pub(crate) fn net_send(payload: &Payload, recipient: &Email) -> Self {
        Self::new(
            OperationTag::NetSend,
            json!({ "payload": payload.as_value(), "recipient": recipient.as_str() }),
        )
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// Destination for trace records.
pub trait TraceSink: Clone + Send + Sync + 'static {
    /// Receives a record just before the operation executes.
    fn record(&self, record: TraceRecord);
}

/// Emits each record as a `tracing` event at `INFO`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn record(&self, record: TraceRecord) {
        tracing::info!(
            operation = %record.operation,
            arguments = %record.arguments,
            "effect"
        );
    }
}

/// Keeps records in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Arc<RwLock<Vec<TraceRecord>>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, oldest first.
    pub fn records(&self) -> Vec<TraceRecord> {
        self.records.read().clone()
    }

    /// The operation kinds recorded so far, oldest first.
    pub fn tags(&self) -> Vec<OperationTag> {
        self.records
            .read()
            .iter()
            .map(|record| record.operation)
            .collect()
    }

    /// How many times `tag` was recorded.
    pub fn count(&self, tag: OperationTag) -> usize {
        self.records
            .read()
            .iter()
            .filter(|record| record.operation == tag)
            .count()
    }

    /// Drops all records.
    pub fn clear(&self) {
        self.records.write().clear();
    }
}

impl TraceSink for RecordingSink {
    fn record(&self, record: TraceRecord) {
        self.records.write().push(record);
    }
}

// =============================================================================
// Traced
// =============================================================================

/// Wraps an interpreter and reports each operation to a sink.
///
/// `Traced` is itself an [`Interpreter`], so layers nest: the outermost sink
/// sees an operation first, then the next layer, then the wrapped handler runs.
/// The record is emitted when the action runs, not when it is built.
///
/// ```rust
/// use blog_effects::backend::ReferenceBackend;
/// use blog_effects::interpreter::{LogSink, RecordingSink, Traced};
///
/// let recording = RecordingSink::new();
/// let interpreter = Traced::new(Traced::new(ReferenceBackend::new(), LogSink), recording.clone());
/// # let _ = interpreter;
/// ```
#[derive(Debug, Clone)]
pub struct Traced<I, S = LogSink> {
    inner: I,
    sink: S,
}

impl<I, S> Traced<I, S> {
    /// Wraps `inner`, reporting to `sink`.
    pub const fn new(inner: I, sink: S) -> Self {
        Self { inner, sink }
    }

    /// The wrapped interpreter.
    pub const fn inner(&self) -> &I {
        &self.inner
    }

    /// The sink records go to.
    pub const fn sink(&self) -> &S {
        &self.sink
    }
}

impl<I: Interpreter> Traced<I, LogSink> {
    /// Wraps `inner`, logging every operation through `tracing`.
    pub const fn logged(inner: I) -> Self {
        Self::new(inner, LogSink)
    }
}

impl<I: Interpreter, S: TraceSink> Traced<I, S> {
    fn observe<A: Send + 'static>(&self, record: TraceRecord, action: AsyncIO<A>) -> AsyncIO<A> {
        let sink = self.sink.clone();
        AsyncIO::new(move || async move {
            sink.record(record);
            action.run_async().await
        })
    }
}

impl<I: Interpreter, S: TraceSink> Interpreter for Traced<I, S> {
    fn cache_get(&self, key: &CacheKey) -> AsyncIO<Option<String>> {
        self.observe(TraceRecord::cache_get(key), self.inner.cache_get(key))
    }

    fn cache_put(&self, key: &CacheKey, value: String) -> AsyncIO<bool> {
        let record = TraceRecord::cache_put(key, &value);
        self.observe(record, self.inner.cache_put(key, value))
    }

    fn cache_delete(&self, key: &CacheKey) -> AsyncIO<bool> {
        self.observe(TraceRecord::cache_delete(key), self.inner.cache_delete(key))
    }

    fn db_list_posts(&self, user_id: UserId) -> AsyncIO<Vec<StoredPost>> {
        self.observe(
            TraceRecord::db_list_posts(user_id),
            self.inner.db_list_posts(user_id),
        )
    }

    fn db_create_post(&self, post: Post) -> AsyncIO<StoredPost> {
        let record = TraceRecord::db_create_post(&post);
        self.observe(record, self.inner.db_create_post(post))
    }

    fn db_update_post(&self, post_id: PostId, update: PostUpdate) -> AsyncIO<Option<StoredPost>> {
        let record = TraceRecord::db_update_post(post_id, &update);
        self.observe(record, self.inner.db_update_post(post_id, update))
    }

    fn net_send(&self, payload: Payload, recipient: &Email) -> AsyncIO<()> {
        let record = TraceRecord::net_send(&payload, recipient);
        self.observe(record, self.inner.net_send(payload, recipient))
    }
}
