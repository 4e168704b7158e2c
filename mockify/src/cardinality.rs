// vim: tw=80
//! Expected call counts.

use std::{
    fmt::{self, Display},
    ops::{RangeFrom, RangeToInclusive},
};

use crate::{Error, Result};

/// "once", "twice" or "n times"
fn format_count(n: usize) -> String {
    match n {
        1 => "once".to_owned(),
        2 => "twice".to_owned(),
        n => format!("{} times", n)
    }
}

/// How many times an expectation (or one of its actions) should be consumed.
///
/// Use the constructor functions rather than the variants directly; they
/// normalize degenerate ranges so that formatting and satisfaction checks stay
/// uniform.  `AtMost(0)` becomes `Exactly(0)`, `Between(n, n)` becomes
/// `Exactly(n)` and `Between(0, m)` becomes `AtMost(m)`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Cardinality {
    Exactly(usize),
    AtLeast(usize),
    AtMost(usize),
    Between(usize, usize),
}

impl Cardinality {
    pub fn exactly(n: usize) -> Self {
        Cardinality::Exactly(n)
    }

    pub fn at_least(minimal: usize) -> Self {
        Cardinality::AtLeast(minimal)
    }

    pub fn at_most(maximal: usize) -> Self {
        if maximal == 0 {
            Cardinality::Exactly(0)
        } else {
            Cardinality::AtMost(maximal)
        }
    }

    /// Fails if `minimal > maximal`.
    pub fn between(minimal: usize, maximal: usize) -> Result<Self> {
        if minimal > maximal {
            Err(Error::InvalidCardinality { minimal, maximal })
        } else {
            Ok(Self::from_bounds(minimal, Some(maximal)))
        }
    }

    /// Build from bounds already known to be ordered.  `None` means
    /// unbounded.
    fn from_bounds(minimal: usize, maximal: Option<usize>) -> Self {
        match maximal {
            None => Cardinality::AtLeast(minimal),
            Some(max) if max == minimal => Cardinality::Exactly(max),
            Some(max) if minimal == 0 => Self::at_most(max),
            Some(max) => Cardinality::Between(minimal, max)
        }
    }

    pub fn minimal(&self) -> usize {
        match *self {
            Cardinality::Exactly(n) => n,
            Cardinality::AtLeast(n) => n,
            Cardinality::AtMost(_) => 0,
            Cardinality::Between(n, _) => n
        }
    }

    /// `None` if there is no upper bound.
    pub fn maximal(&self) -> Option<usize> {
        match *self {
            Cardinality::Exactly(n) => Some(n),
            Cardinality::AtLeast(_) => None,
            Cardinality::AtMost(n) => Some(n),
            Cardinality::Between(_, n) => Some(n)
        }
    }

    /// Does `actual` calls satisfy this cardinality?
    pub fn is_satisfied(&self, actual: usize) -> bool {
        match *self {
            Cardinality::Exactly(n) => actual == n,
            Cardinality::AtLeast(n) => actual >= n,
            Cardinality::AtMost(n) => actual <= n,
            Cardinality::Between(min, max) => min <= actual && actual <= max
        }
    }

    /// Phrase describing the expected count, for assertion reports.
    pub fn format_expected(&self) -> String {
        match *self {
            Cardinality::Exactly(0) => "to be never called".to_owned(),
            Cardinality::Exactly(n) =>
                format!("to be called {}", format_count(n)),
            Cardinality::AtLeast(0) =>
                "to be called any number of times".to_owned(),
            Cardinality::AtLeast(n) =>
                format!("to be called at least {}", format_count(n)),
            Cardinality::AtMost(n) =>
                format!("to be called at most {}", format_count(n)),
            Cardinality::Between(min, max) =>
                format!("to be called between {} and {} times", min, max)
        }
    }

    /// Raise both bounds by `extra`.
    ///
    /// Used to fold a run of single-use actions into the cardinality of the
    /// repeated action that follows them.
    pub fn adjust_minimal(&self, extra: usize) -> Self {
        self.combine(Cardinality::Exactly(extra))
    }

    /// The cardinality of doing `self`, then `other`.
    ///
    /// An upper bound too large for `usize` becomes unbounded.
    pub fn combine(&self, other: Cardinality) -> Self {
        let minimal = self.minimal().saturating_add(other.minimal());
        let maximal = match (self.maximal(), other.maximal()) {
            (Some(a), Some(b)) => a.checked_add(b),
            _ => None
        };
        Self::from_bounds(minimal, maximal)
    }
}

impl Default for Cardinality {
    fn default() -> Self {
        Cardinality::Exactly(1)
    }
}

impl Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.format_expected())
    }
}

impl From<usize> for Cardinality {
    fn from(n: usize) -> Self {
        Cardinality::exactly(n)
    }
}

impl From<RangeFrom<usize>> for Cardinality {
    fn from(r: RangeFrom<usize>) -> Self {
        Cardinality::at_least(r.start)
    }
}

impl From<RangeToInclusive<usize>> for Cardinality {
    fn from(r: RangeToInclusive<usize>) -> Self {
        Cardinality::at_most(r.end)
    }
}

/// Phrase describing an actual call count, for assertion reports.
pub fn format_actual(count: usize) -> String {
    match count {
        0 => "never called".to_owned(),
        n => format!("called {}", format_count(n))
    }
}

/// A [`Cardinality`] together with the number of calls consumed so far.
#[derive(Clone, Copy, Debug, Default)]
pub struct Times {
    /// How many times has the owner already been consumed?
    count: usize,
    cardinality: Cardinality,
}

impl Times {
    pub fn new(cardinality: Cardinality) -> Self {
        Times { count: 0, cardinality }
    }

    /// Record one consumption.
    pub fn update(&mut self) {
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn set(&mut self, cardinality: Cardinality) {
        self.cardinality = cardinality;
    }

    pub fn is_satisfied(&self) -> bool {
        self.cardinality.is_satisfied(self.count)
    }

    pub fn format_actual(&self) -> String {
        format_actual(self.count)
    }
}
