//! Value objects.
//!
//! All string value objects reject the empty string and are otherwise opaque:
//! no trimming, no case folding, exact-match equality.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::error::ValueObjectError;

macro_rules! non_empty_string {
    ($(#[$meta:meta])* $name:ident, $err:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: String) -> Result<Self, ValueObjectError> {
                if value.is_empty() {
                    return Err(ValueObjectError::$err);
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValueObjectError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

non_empty_string!(
    /// Client-chosen room key; case-sensitive and the sole pairing key.
    RoomKey,
    EmptyRoomKey
);

non_empty_string!(
    /// Identifier assigned by the transport when a connection is accepted.
    ConnectionId,
    EmptyConnectionId
);

non_empty_string!(
    /// Free-form display name. Not unique.
    Username,
    EmptyUsername
);

non_empty_string!(
    /// Client-generated message id, unique within a room.
    MessageId,
    EmptyMessageId
);

non_empty_string!(
    /// Chat message text.
    MessageBody,
    EmptyMessageBody
);

/// Generates fresh connection ids
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4().to_string())
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
