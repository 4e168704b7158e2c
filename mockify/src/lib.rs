// vim: tw=80
//! Expectation-matching mock objects for Rust.
//!
//! Mockify records what a test expects its collaborators to be called with,
//! decides what those calls return, and reports precisely when reality does
//! not match.  Mocks are dynamically named and take dynamically typed
//! arguments, so no trait or proc-macro is needed to create one.
//!
//! # Usage
//!
//! * Create a [`Mock`], or a tree of them with [`Mock::child`].
//! * Record expectations with [`Mock::expect_call`].  Each expectation has an
//!   argument pattern, made of literal values and [matchers](#matchers), an
//!   expected call count, and optionally a chain of actions.
//! * Hand the mocks to the code under test, which calls them with
//!   [`Mock::call`].
//! * Finally check that every expectation was consumed, with
//!   [`Mock::assert_satisfied`], [`assert_satisfied`], or the scoped
//!   [`satisfied`] guard.
//!
//! ```
//! use mockify::*;
//!
//! fn greet(name: &str, out: &Mock) -> Result<()> {
//!     out.call(params![format!("Hello, {}!", name)])?;
//!     Ok(())
//! }
//!
//! let out = Mock::new("out").unwrap();
//! out.expect_call(params![String::from("Hello, world!")]).unwrap();
//! greet("world", &out).unwrap();
//! out.assert_satisfied().unwrap();
//! ```
//!
//! # Call counts
//!
//! By default an expectation must be called exactly once.  Use
//! [`Expectation::times`] with a number, a [`Cardinality`], or a range:
//!
//! ```
//! # use mockify::*;
//! let foo = Mock::new("foo").unwrap();
//! foo.expect_call(params![1]).unwrap().times(..=2);
//! foo.expect_call(params![2]).unwrap()
//!     .times(Cardinality::between(1, 3).unwrap());
//! foo.call(params![2]).unwrap();
//! foo.assert_satisfied().unwrap();
//! ```
//!
//! # Actions
//!
//! Actions decide what a call returns.  [`Expectation::will_once`] records a
//! single-use action; any number of them run in sequence.
//! [`Expectation::will_repeatedly`] records an action that runs after them,
//! any number of times unless bounded with `times`.
//!
//! ```
//! # use mockify::*;
//! let next = Mock::new("next").unwrap();
//! next.expect_call(params![]).unwrap()
//!     .will_once(Return::new(1))
//!     .will_repeatedly(Return::new(2))
//!     .times(2);
//! let got: Vec<i32> = (0..3)
//!     .map(|_| *next.call(params![]).unwrap().unwrap().get::<i32>().unwrap())
//!     .collect();
//! assert_eq!(got, vec![1, 2, 2]);
//! next.assert_satisfied().unwrap();
//! ```
//!
//! When all single-use actions have run and there is no repeated action,
//! another call fails with [`Error::OversaturatedCall`].
//!
//! # Matchers
//!
//! Anywhere a literal argument may appear, a [`Matcher`] may be used instead:
//! [`any`], [`instance_of`], [`function`], [`matching`] for any
//! [`predicate`], [`matching_str`] for string predicates, or a [`SaveArg`].
//!
//! # Uninterested calls
//!
//! A call matching no expectation fails with [`Error::UninterestedCall`], or
//! [`Error::UnexpectedCall`] if there are expectations for the same name with
//! other arguments.  A [`Session`] can be configured to only log such calls,
//! or to ignore them, with [`Config`].
//!
//! # Ordered expectations
//!
//! Inside the scope of an [`ordered`] guard, expectations of the given mocks
//! must be consumed in the order they were recorded.
//!
//! # Logging
//!
//! Mockify logs through [`tracing`].  Uninterested calls under the `warn`
//! strategy are logged at `WARN`; recording and consumption of expectations
//! are logged at `TRACE`.

mod action;
mod call;
mod cardinality;
mod config;
mod error;
mod expectation;
mod matcher;
mod mock;
mod session;
mod value;

pub use crate::{
    action::{Action, Invoke, Raise, Return, ReturnNone},
    call::{Call, CallSummary, Location, Params, is_valid_name},
    cardinality::{Cardinality, Times},
    config::{Config, UninterestedCallStrategy},
    error::{
        Error,
        OversaturatedCallError,
        Result,
        UnexpectedCallError,
        UnexpectedCallOrderError,
        UninterestedCallError,
        Unsatisfied,
        UnsatisfiedError,
    },
    expectation::{Expectation, WillOnce, WillRepeatedly},
    matcher::{
        Anything,
        InstanceOf,
        Lifted,
        LiftedStr,
        Matcher,
        Param,
        SaveArg,
        any,
        function,
        instance_of,
        matching,
        matching_str,
    },
    mock::{
        ExpectationGuard,
        Mock,
        OrderedGuard,
        SatisfiedGuard,
        assert_satisfied,
        ordered,
        satisfied,
    },
    session::Session,
    value::{Arg, Output},
};
pub use predicates::prelude::{Predicate, predicate};
