// vim: tw=80
//! The engine connecting mock calls with recorded expectations.

use std::collections::{HashSet, VecDeque};

use crate::{
    Call,
    Result,
    action::SharedAction,
    config::{Config, UninterestedCallStrategy},
    error::{
        UnexpectedCallError,
        UnexpectedCallOrderError,
        UninterestedCallError,
        UnsatisfiedError,
    },
    expectation::Expectation,
    value::Output,
};

/// Owns every expectation recorded by the mocks that share it, and matches
/// actual calls against them.
///
/// Normally a session is created implicitly by [`Mock::new`](crate::Mock::new)
/// and shared with the mock's children.  It may also be used directly.
///
/// # Matching
///
/// In the default, unordered mode an actual call consumes the first
/// expectation, in registration order, that matches it and is not yet
/// satisfied.  If every matching expectation is already satisfied, the most
/// recently recorded one is consumed anyway, so that the resulting error
/// points at it.
///
/// In ordered mode (see [`enable_ordered`](Session::enable_ordered)),
/// expectations for the selected names must be consumed in the order they
/// were recorded.
///
/// ```
/// # use mockify::*;
/// let mut session = Session::new();
/// session.expect_call(Call::new("foo", params![1]).unwrap())
///     .will_once(Return::new("one"));
/// let r = session.call(&Call::new("foo", params![1]).unwrap()).unwrap();
/// assert_eq!(r.unwrap().get::<&str>(), Some(&"one"));
/// session.assert_satisfied().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct Session {
    /// Every expectation ever recorded, in registration order.
    expectations: Vec<Expectation>,
    /// Indices of expectations matched in any order, ascending.
    unordered: Vec<usize>,
    /// Indices of expectations that must be consumed in sequence.
    ordered: VecDeque<usize>,
    ordered_names: HashSet<String>,
    config: Config,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Session { config, ..Default::default() }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Record a new expectation, returning it for further configuration.
    pub fn expect_call(&mut self, expected_call: Call) -> &mut Expectation {
        let i = self.push(expected_call);
        &mut self.expectations[i]
    }

    pub(crate) fn push(&mut self, expected_call: Call) -> usize {
        tracing::trace!(pattern = %expected_call,
            location = %expected_call.location(), "expectation recorded");
        let i = self.expectations.len();
        self.expectations.push(Expectation::new(expected_call));
        self.unordered.push(i);
        i
    }

    pub(crate) fn expectation_mut(&mut self, i: usize) -> &mut Expectation {
        &mut self.expectations[i]
    }

    pub(crate) fn expectation(&self, i: usize) -> &Expectation {
        &self.expectations[i]
    }

    /// Indices of all expectations that can still be called, ascending.
    fn live(&self) -> Vec<usize> {
        let mut live: Vec<usize> = self.unordered.iter()
            .chain(self.ordered.iter())
            .copied()
            .collect();
        live.sort_unstable();
        live
    }

    /// Every expectation still in play, in registration order.
    ///
    /// Ordered expectations that were satisfied and retired are not included.
    pub fn expectations(&self) -> impl Iterator<Item = &Expectation> {
        self.live().into_iter().map(move |i| &self.expectations[i])
    }

    /// Is `name` currently handled in ordered mode?
    pub fn is_ordered(&self, name: &str) -> bool {
        self.ordered_names.contains(name)
    }

    /// Match `actual` to an expectation and consume it, without running the
    /// action.
    ///
    /// Returns the action to run, or `None` if there is nothing to run.
    pub(crate) fn resolve(&mut self, actual: &Call)
        -> Result<Option<SharedAction>>
    {
        if self.is_ordered(actual.name()) {
            if let Some(&head) = self.ordered.front() {
                return self.resolve_ordered(head, actual);
            }
        }
        self.resolve_unordered(actual)
    }

    fn resolve_ordered(&mut self, head: usize, actual: &Call)
        -> Result<Option<SharedAction>>
    {
        let expected = self.expectations[head].expected_call();
        if !expected.matches(actual) {
            return Err(UnexpectedCallOrderError::new(
                actual.summary(),
                expected.summary()
            ).into());
        }
        let r = self.expectations[head].consume(actual);
        if self.expectations[head].is_satisfied() {
            tracing::trace!(pattern = %self.expectations[head].expected_call(),
                "ordered expectation retired");
            self.ordered.pop_front();
        }
        r
    }

    fn resolve_unordered(&mut self, actual: &Call)
        -> Result<Option<SharedAction>>
    {
        let found: Vec<usize> = self.live().into_iter()
            .filter(|&i| self.expectations[i].expected_call().matches(actual))
            .collect();
        let chosen = found.iter()
            .copied()
            .find(|&i| !self.expectations[i].is_satisfied())
            .or_else(|| found.last().copied());
        match chosen {
            Some(i) => self.expectations[i].consume(actual),
            None => self.uninterested(actual).map(|()| None)
        }
    }

    fn uninterested(&self, actual: &Call) -> Result<()> {
        match self.config.uninterested_call_strategy {
            UninterestedCallStrategy::Fail => {
                let candidates: Vec<_> = self.expectations()
                    .map(Expectation::expected_call)
                    .filter(|e| e.name() == actual.name())
                    .map(|e| (e.summary(), e.explain_mismatch(actual)))
                    .collect();
                if candidates.is_empty() {
                    Err(UninterestedCallError::new(actual.summary()).into())
                } else {
                    Err(UnexpectedCallError::new(actual.summary(), candidates)
                        .into())
                }
            }
            UninterestedCallStrategy::Warn => {
                tracing::warn!("uninterested mock call: {}", actual);
                Ok(())
            }
            UninterestedCallStrategy::Ignore => Ok(())
        }
    }

    /// Handle an actual mock call, returning what the consumed action
    /// produced.
    ///
    /// The session stays borrowed while the action runs.  Use
    /// [`Mock::call`](crate::Mock::call) if actions need to call other mocks
    /// sharing this session.
    pub fn call(&mut self, actual: &Call) -> Result<Output> {
        match self.resolve(actual)? {
            Some(action) => action.call(actual),
            None => Ok(None)
        }
    }

    /// Check that every expectation is satisfied.
    ///
    /// This does not modify the session, and may be called any number of
    /// times.
    pub fn assert_satisfied(&self) -> Result<()> {
        self.assert_satisfied_by(|_| true)
    }

    /// Like [`assert_satisfied`](Session::assert_satisfied), but only for
    /// expectations whose name is accepted by `f`.
    pub(crate) fn assert_satisfied_by<F>(&self, f: F) -> Result<()>
        where F: Fn(&str) -> bool
    {
        let unsatisfied: Vec<_> = self.expectations()
            .filter(|e| f(e.expected_call().name()))
            .filter(|e| !e.is_satisfied())
            .map(Expectation::unsatisfied)
            .collect();
        if unsatisfied.is_empty() {
            Ok(())
        } else {
            Err(UnsatisfiedError::new(unsatisfied).into())
        }
    }

    /// Names of every expectation still in play, without duplicates.
    pub(crate) fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for e in self.expectations() {
            let name = e.expected_call().name();
            if !names.iter().any(|n| n == name) {
                names.push(name.to_owned());
            }
        }
        names
    }

    /// Require expectations with any of the given names to be consumed in the
    /// order they were recorded.
    ///
    /// Any previous ordering is cancelled first.
    pub fn enable_ordered<I, S>(&mut self, names: I)
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.disable_ordered();
        self.ordered_names = names.into_iter().map(Into::into).collect();
        let (ordered, unordered): (Vec<usize>, Vec<usize>) = self.unordered
            .iter()
            .copied()
            .partition(|&i| {
                self.ordered_names.contains(self.expectations[i]
                                            .expected_call().name())
            });
        tracing::trace!(ordered = ordered.len(), "ordered mode enabled");
        self.ordered = ordered.into();
        self.unordered = unordered;
    }

    /// Return to unordered matching.
    ///
    /// Ordered expectations that were not yet consumed move back to the
    /// unordered pool, so they are still reported by
    /// [`assert_satisfied`](Session::assert_satisfied).
    pub fn disable_ordered(&mut self) {
        if self.ordered_names.is_empty() && self.ordered.is_empty() {
            return;
        }
        self.unordered.extend(self.ordered.drain(..));
        self.unordered.sort_unstable();
        self.ordered_names.clear();
        tracing::trace!("ordered mode disabled");
    }
}
