// vim: tw=80
//! Trait bounds that users may rely on.
#![deny(warnings)]

use std::{error::Error as StdError, fmt::Display};

use mockify::*;
use static_assertions::{assert_impl_all, assert_not_impl_any};

assert_impl_all!(Error: StdError, Send, Sync, Display);
assert_impl_all!(UninterestedCallError: StdError, Clone, Send, Sync);
assert_impl_all!(UnexpectedCallError: StdError, Clone, Send, Sync);
assert_impl_all!(UnexpectedCallOrderError: StdError, Clone, Send, Sync);
assert_impl_all!(OversaturatedCallError: StdError, Clone, Send, Sync);
assert_impl_all!(UnsatisfiedError: StdError, Clone, Send, Sync);
assert_impl_all!(Cardinality: Copy, Eq, Display, From<usize>);
assert_impl_all!(Config: Clone, Default, Eq);
assert_impl_all!(Mock: Clone);
assert_impl_all!(Return: Action);
assert_impl_all!(ReturnNone: Action);

// Sessions are single-threaded
assert_not_impl_any!(Mock: Send, Sync);
assert_not_impl_any!(Session: Send, Sync);
// Call patterns are compared directionally
assert_not_impl_any!(Call: PartialEq);

#[test]
fn name_validation() {
    assert!(is_valid_name("foo.bar"));
    assert!(!is_valid_name("foo.1"));
}
