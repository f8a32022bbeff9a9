//! Network payloads.

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use super::StoredPost;

/// Error raised when an arbitrary value cannot be turned into a payload.
#[derive(Debug, Error)]
#[error("payload serialization failed: {0}")]
pub struct PayloadError(#[from] serde_json::Error);

/// A serialized value handed to the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(Value);

impl Payload {
    /// Serializes any value into a payload.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] if `value`'s `Serialize` implementation fails.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, PayloadError> {
        Ok(Self(serde_json::to_value(value)?))
    }

    /// A JSON array of the given posts, in order.
    #[must_use]
    pub fn posts(posts: &[StoredPost]) -> Self {
        Self(Value::Array(posts.iter().map(StoredPost::to_json).collect()))
    }

    /// Number of elements for array payloads, 1 for anything else but `null`.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.0 {
            Value::Array(items) => items.len(),
            Value::Null => 0,
            _ => 1,
        }
    }

    /// `true` when [`Payload::len`] is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows the serialized value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Unwraps the serialized value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl StoredPost {
    /// The JSON form of this post, identical to its serde representation.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id.value(),
            "author": {
                "id": self.author.id.value(),
                "email": self.author.email.as_str(),
            },
            "title": self.title,
            "body": self.body,
        })
    }
}
