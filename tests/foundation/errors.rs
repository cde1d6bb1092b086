//! Integration tests for Error types
//!
//! Tests error construction, display, context, domains and error lists.

use stash_foundation::{
    DeserializeError, DeserializeErrorCode, Error, ErrorDomain, ErrorKind, ErrorList,
};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn parse_error_names_line() {
    let err = Error::parse(3, "invalid int32 `x`");
    assert!(matches!(err.kind, ErrorKind::Parse { line: 3, .. }));
    assert_eq!(err.domain(), ErrorDomain::Text);
    assert_eq!(err.to_string(), "parse error at line 3: invalid int32 `x`");
}

#[test]
fn io_errors_are_their_own_domain() {
    let err = Error::from(std::io::Error::other("gone"));
    assert_eq!(err.domain(), ErrorDomain::Io);
    assert!(err.deserialize_errors().is_none());
    assert!(std::error::Error::source(&err.kind).is_some());
}

#[test]
fn context_is_kept() {
    let err = Error::parse(1, "bad").with_context("reading dump.txt");
    assert_eq!(err.context.as_deref(), Some("reading dump.txt"));
}

// =============================================================================
// Error Lists
// =============================================================================

#[test]
fn fatal_and_non_fatal_codes() {
    use DeserializeErrorCode::*;
    for code in [Truncated, Padding, Invalid, ObjectType, TooDeep] {
        assert!(code.is_fatal(), "{code}");
    }
    assert!(!Item.is_fatal());
    assert!(!Replaced.is_fatal());
}

#[test]
fn lists_accumulate() {
    let mut list = ErrorList::new();
    list.push(DeserializeError::new(DeserializeErrorCode::Item, "first"));
    assert!(!list.has_fatal());

    let more: ErrorList = [DeserializeError::new(DeserializeErrorCode::Truncated, "second")]
        .into_iter()
        .collect();
    list.extend(more);

    assert_eq!(list.len(), 2);
    assert!(list.has_fatal());
    assert!(list.contains(DeserializeErrorCode::Truncated));
    assert_eq!(list.to_string(), "first; second");
    assert!(list.iter().all(|e| e.domain() == ErrorDomain::Deserialize));

    let err = Error::from(list);
    assert_eq!(err.domain(), ErrorDomain::Deserialize);
    assert_eq!(err.deserialize_errors().map(ErrorList::len), Some(2));
}
