// vim: tw=80
//! Errors returned by mock calls, expectation builders and assertions.
//!
//! Failures that are meant to end a test carry a multi-line report in their
//! `Display` implementation.  They are wrapped by [`Error`], so a test may
//! simply `unwrap()` the result of a mock call, or match on the variant to
//! inspect the details.

use std::{
    error::Error as StdError,
    fmt::{self, Display},
};

use thiserror::Error;

use crate::call::{CallSummary, Location};

/// Write an "at file:line" heading underlined with dashes.
fn heading(f: &mut fmt::Formatter, location: Location) -> fmt::Result {
    let at = format!("at {}", location);
    writeln!(f, "{}", at)?;
    writeln!(f, "{}", "-".repeat(at.len()))
}

/// A call was made to a mock that has no expectations recorded at all.
#[derive(Clone, Debug)]
pub struct UninterestedCallError {
    actual: CallSummary,
}

impl UninterestedCallError {
    pub(crate) fn new(actual: CallSummary) -> Self {
        UninterestedCallError { actual }
    }

    pub fn actual_call(&self) -> &CallSummary {
        &self.actual
    }
}

impl Display for UninterestedCallError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "No expectations recorded for mock:\n")?;
        heading(f, self.actual.location())?;
        writeln!(f, "Actual:")?;
        write!(f, "  {}", self.actual)
    }
}

impl StdError for UninterestedCallError {}

/// A call was made with arguments that match none of the expectations
/// recorded for the same name.
#[derive(Clone, Debug)]
pub struct UnexpectedCallError {
    actual: CallSummary,
    candidates: Vec<(CallSummary, Vec<String>)>,
}

impl UnexpectedCallError {
    pub(crate) fn new(
        actual: CallSummary,
        candidates: Vec<(CallSummary, Vec<String>)>
    ) -> Self
    {
        UnexpectedCallError { actual, candidates }
    }

    pub fn actual_call(&self) -> &CallSummary {
        &self.actual
    }

    /// Patterns recorded for the same name, in registration order.
    pub fn candidates(&self) -> impl Iterator<Item = &CallSummary> {
        self.candidates.iter().map(|(c, _)| c)
    }
}

impl Display for UnexpectedCallError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "No matching expectations found:\n")?;
        heading(f, self.actual.location())?;
        writeln!(f, "Actual:")?;
        writeln!(f, "  {}", self.actual)?;
        write!(f, "Candidates:")?;
        for (i, (pattern, reasons)) in self.candidates.iter().enumerate() {
            write!(f, "\n  {}) {}", i + 1, pattern)?;
            for reason in reasons {
                write!(f, "\n       {}", reason)?;
            }
        }
        Ok(())
    }
}

impl StdError for UnexpectedCallError {}

/// In ordered mode, a call arrived that is not the next one expected.
#[derive(Clone, Debug)]
pub struct UnexpectedCallOrderError {
    actual: CallSummary,
    expected: CallSummary,
}

impl UnexpectedCallOrderError {
    pub(crate) fn new(actual: CallSummary, expected: CallSummary) -> Self {
        UnexpectedCallOrderError { actual, expected }
    }

    pub fn actual_call(&self) -> &CallSummary {
        &self.actual
    }

    pub fn expected_call(&self) -> &CallSummary {
        &self.expected
    }
}

impl Display for UnexpectedCallOrderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Another mock was expected to be called:\n")?;
        heading(f, self.actual.location())?;
        writeln!(f, "Actual:")?;
        writeln!(f, "  {}", self.actual)?;
        writeln!(f, "Expected:")?;
        writeln!(f, "  {}", self.expected)?;
        write!(f, "  (recorded at {})", self.expected.location())
    }
}

impl StdError for UnexpectedCallOrderError {}

/// An expectation whose actions are all used up was called again.
#[derive(Clone, Debug)]
pub struct OversaturatedCallError {
    pattern: CallSummary,
    actual: CallSummary,
}

impl OversaturatedCallError {
    pub(crate) fn new(pattern: CallSummary, actual: CallSummary) -> Self {
        OversaturatedCallError { pattern, actual }
    }

    /// The pattern of the expectation that ran out of actions.
    pub fn expected_call(&self) -> &CallSummary {
        &self.pattern
    }

    pub fn actual_call(&self) -> &CallSummary {
        &self.actual
    }
}

impl Display for OversaturatedCallError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "at {}: {}: no more actions recorded for call: {}",
               self.pattern.location(), self.pattern, self.actual)
    }
}

impl StdError for OversaturatedCallError {}

/// One row of an [`UnsatisfiedError`] report.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Unsatisfied {
    pub(crate) pattern: CallSummary,
    pub(crate) action: Option<String>,
    pub(crate) expected: String,
    pub(crate) actual: String,
}

impl Unsatisfied {
    pub fn expected_call(&self) -> &CallSummary {
        &self.pattern
    }

    /// The next action that would have run, if any was recorded.
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// Expected call count phrase, like "to be called twice".
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Actual call count phrase, like "called once".
    pub fn actual(&self) -> &str {
        &self.actual
    }
}

impl Display for Unsatisfied {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        heading(f, self.pattern.location())?;
        writeln!(f, "{:>13}{}", "Pattern: ", self.pattern)?;
        if let Some(action) = &self.action {
            writeln!(f, "{:>13}{}", "Action: ", action)?;
        }
        writeln!(f, "{:>13}{}", "Expected: ", self.expected)?;
        write!(f, "{:>13}{}", "Actual: ", self.actual)
    }
}

/// Some expectations were not satisfied.
#[derive(Clone, Debug)]
pub struct UnsatisfiedError {
    expectations: Vec<Unsatisfied>,
}

impl UnsatisfiedError {
    pub(crate) fn new(expectations: Vec<Unsatisfied>) -> Self {
        UnsatisfiedError { expectations }
    }

    /// Every unsatisfied expectation, in registration order.
    pub fn expectations(&self) -> &[Unsatisfied] {
        &self.expectations
    }
}

impl Display for UnsatisfiedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.expectations.len() == 1 {
            writeln!(f, "following expectation is not satisfied:\n")?;
        } else {
            writeln!(f, "following {} expectations are not satisfied:\n",
                     self.expectations.len())?;
        }
        for (i, e) in self.expectations.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl StdError for UnsatisfiedError {}

/// The error type for everything in this crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("mock name must be a dotted sequence of identifiers, got {0:?}")]
    InvalidName(String),
    #[error("invalid cardinality: minimal bound {minimal} is greater than \
             maximal bound {maximal}")]
    InvalidCardinality { minimal: usize, maximal: usize },
    #[error("unknown config option {0:?}")]
    UnknownConfigOption(String),
    #[error("invalid value {value:?} for config option {option:?}")]
    InvalidConfig { option: String, value: String },
    #[error("mocks {0:?} and {1:?} do not share a session")]
    SessionMismatch(String, String),
    #[error(transparent)]
    UninterestedCall(#[from] UninterestedCallError),
    #[error(transparent)]
    UnexpectedCall(#[from] UnexpectedCallError),
    #[error(transparent)]
    UnexpectedCallOrder(#[from] UnexpectedCallOrderError),
    #[error(transparent)]
    OversaturatedCall(#[from] OversaturatedCallError),
    #[error(transparent)]
    Unsatisfied(#[from] UnsatisfiedError),
    /// An error produced by a user-supplied action, passed through unchanged.
    #[error(transparent)]
    Raised(Box<dyn StdError + Send + Sync>),
}

impl Error {
    /// Borrow the error raised by a user action, if this is one and it has
    /// type `E`.
    pub fn raised<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Error::Raised(e) => e.downcast_ref::<E>(),
            _ => None
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
