//! Common type definitions and newtype wrappers for domain modeling.
//!
//! Discord ids are 64-bit snowflakes. They are serialized as strings so the
//! document stays safe for JavaScript consumers, and accepted as either
//! strings or numbers because older configuration files stored plain integers.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Error returned when text cannot be read as a Discord id or mention.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("'{input}' is not a valid Discord id or mention")]
pub struct IdParseError {
    /// The rejected input.
    pub input: String,
}

/// Parses a raw snowflake or a mention such as `<#123>`, `<@123>`, `<@!123>`
/// or `<@&123>`.
pub fn parse_snowflake(input: &str) -> Result<u64, IdParseError> {
    let trimmed = input.trim();
    let inner = trimmed
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .map_or(trimmed, |mention| {
            mention
                .trim_start_matches("@&")
                .trim_start_matches("@!")
                .trim_start_matches('@')
                .trim_start_matches('#')
        });

    match inner.parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(IdParseError {
            input: input.to_string(),
        }),
    }
}

struct SnowflakeVisitor;

impl<'de> Visitor<'de> for SnowflakeVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a Discord snowflake as integer or string")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
        Ok(value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<u64, E> {
        u64::try_from(value).map_err(|_| E::custom(format!("negative id {value}")))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<u64, E> {
        parse_snowflake(value).map_err(E::custom)
    }
}

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw snowflake value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_snowflake(s).map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(SnowflakeVisitor).map(Self)
            }
        }
    };
}

snowflake_id! {
    /// A tenant (Discord guild) ID.
    TenantId
}

snowflake_id! {
    /// A Discord channel ID.
    ChannelId
}

snowflake_id! {
    /// A Discord user ID.
    UserId
}

snowflake_id! {
    /// A Discord message ID.
    MessageId
}

snowflake_id! {
    /// A Discord role ID.
    RoleId
}

impl UserId {
    /// Renders the user mention markup, e.g. `<@42>`.
    #[must_use]
    pub fn mention(self) -> String {
        format!("<@{}>", self.0)
    }
}

impl ChannelId {
    /// Renders the channel mention markup, e.g. `<#42>`.
    #[must_use]
    pub fn mention(self) -> String {
        format!("<#{}>", self.0)
    }
}

/// An inbound chat message as seen by the rule engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// Tenant the message was posted in; `None` for direct messages.
    pub tenant: Option<TenantId>,
    /// Channel the message was posted in.
    pub channel: ChannelId,
    /// Author of the message.
    pub author: UserId,
    /// Whether the author is an automated account.
    pub author_is_bot: bool,
    /// Raw message text.
    pub text: String,
}
