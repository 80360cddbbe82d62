//! Core types for the `RecordCore` ledger record library.
//!
//! All identifiers use smart constructors so that a value which made it
//! through construction is valid everywhere else, following the
//! "parse, don't validate" principle.

use nutype::nutype;

/// A world-state key identifying exactly one record.
///
/// Keys are trimmed, non-empty ASCII strings of at most 255 characters. The
/// record's own ID field carries the same value, so a `RecordKey` doubles as
/// the record identifier.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 255, predicate = |key: &str| key.is_ascii()),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct RecordKey(String);

/// The discriminator stored with every record (`docType`).
///
/// Several record kinds share one keyspace; rich queries select a family by
/// matching this tag.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 64, predicate = |tag: &str| tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct DocType(String);

/// Name of a top-level record attribute, as it appears in the JSON encoding.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 128, predicate = |name: &str| !name.starts_with('$')),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct FieldName(String);

/// Name of a domain event emitted after a successful mutation.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 128, predicate = |name: &str| name.chars().all(|c| c.is_ascii_alphanumeric())),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct EventName(String);
