// vim: tw=80
//! Expectations and their action chains.
//!
//! An [`Expectation`] pairs an expected call pattern with a chain of actions.
//! The chain is a sequence of segments, each with its own [`Times`] counter:
//!
//! * an implicit default segment that returns `None`, present only until the
//!   first action is recorded,
//! * any number of single-use segments recorded with
//!   [`will_once`](Expectation::will_once),
//! * at most one terminal repeated segment recorded with
//!   [`will_repeatedly`](Expectation::will_repeatedly).
//!
//! Each consumption runs the first segment whose own cardinality is not yet
//! satisfied.  When every segment is satisfied, a terminal default or
//! repeated segment keeps running, while a terminal single-use segment
//! reports an [`OversaturatedCallError`].

use std::fmt;

use crate::{
    Call,
    Result,
    action::{self, Action, SharedAction},
    call::Location,
    cardinality::{self, Cardinality, Times},
    error::{OversaturatedCallError, Unsatisfied},
    value::Output,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Kind {
    Default,
    Single,
    Repeated,
}

struct Segment {
    kind: Kind,
    /// `None` for the default segment.
    action: Option<SharedAction>,
    times: Times,
}

impl Segment {
    fn new(kind: Kind, action: Option<SharedAction>, c: Cardinality) -> Self {
        Segment { kind, action, times: Times::new(c) }
    }
}

/// The segments of an expectation.  Never empty.
struct ActionChain {
    segments: Vec<Segment>,
    /// Was `times` called while only the default segment existed?
    times_set: bool,
}

impl ActionChain {
    fn new() -> Self {
        ActionChain {
            segments: vec![Segment::new(Kind::Default, None,
                                        Cardinality::default())],
            times_set: false
        }
    }

    fn first(&self) -> &Segment {
        &self.segments[0]
    }

    fn last(&self) -> &Segment {
        &self.segments[self.segments.len() - 1]
    }

    fn set_times(&mut self, c: Cardinality) {
        if self.first().kind == Kind::Default {
            self.times_set = true;
        }
        self.segments[0].times.set(c);
    }

    /// Remove the default segment, if still present, returning the cardinality
    /// that was explicitly recorded for it.
    fn take_default(&mut self) -> Option<Cardinality> {
        if self.first().kind != Kind::Default {
            return None;
        }
        let default = self.segments.remove(0);
        if self.times_set {
            Some(default.times.cardinality())
        } else {
            None
        }
    }

    fn push_single(&mut self, action: SharedAction) {
        let c = self.take_default().unwrap_or_default();
        let segment = Segment::new(Kind::Single, Some(action), c);
        // Single-use actions always run before the repeated one.
        if self.segments.last().is_some_and(|s| s.kind == Kind::Repeated) {
            let at = self.segments.len() - 1;
            self.segments.insert(at, segment);
        } else {
            self.segments.push(segment);
        }
    }

    fn push_repeated(&mut self, action: SharedAction) {
        let c = self.take_default()
            .unwrap_or_else(|| Cardinality::at_least(0));
        let segment = Segment::new(Kind::Repeated, Some(action), c);
        if self.segments.last().is_some_and(|s| s.kind == Kind::Repeated) {
            self.segments.pop();
        }
        self.segments.push(segment);
    }

    fn set_repeated_times(&mut self, c: Cardinality) {
        if let Some(s) = self.segments.last_mut() {
            if s.kind == Kind::Repeated {
                s.times.set(c);
            }
        }
    }

    /// Pick the segment for the next call and count it.
    ///
    /// Returns `None` if every single-use action has already been used up.
    fn consume(&mut self) -> Option<Option<SharedAction>> {
        let last = self.segments.len() - 1;
        let i = match self.segments.iter().position(|s| !s.times.is_satisfied())
        {
            Some(i) => i,
            None if self.segments[last].kind != Kind::Single => last,
            None => return None
        };
        let segment = &mut self.segments[i];
        segment.times.update();
        Some(segment.action.clone())
    }

    fn actual_call_count(&self) -> usize {
        self.segments.iter().map(|s| s.times.count()).sum()
    }

    fn expected_call_count(&self) -> Cardinality {
        if self.first().kind == Kind::Default {
            return self.first().times.cardinality();
        }
        let singles = self.segments.iter()
            .filter(|s| s.kind == Kind::Single)
            .fold(Cardinality::exactly(0),
                  |acc, s| acc.combine(s.times.cardinality()));
        let last = self.last();
        if last.kind == Kind::Repeated {
            last.times.cardinality().combine(singles)
        } else {
            singles
        }
    }

    fn next_action(&self) -> Option<&SharedAction> {
        self.segments.iter()
            .filter(|s| s.kind != Kind::Default)
            .find(|s| !s.times.is_satisfied())
            .and_then(|s| s.action.as_ref())
    }
}

/// A recorded expectation: a call pattern and what to do when it is called.
///
/// Expectations are created by [`Session::expect_call`](crate::Session::expect_call)
/// or [`Mock::expect_call`](crate::Mock::expect_call).  Without any further
/// configuration an expectation must be called exactly once, and returns
/// `None`.
pub struct Expectation {
    expected_call: Call,
    chain: ActionChain,
}

impl Expectation {
    pub fn new(expected_call: Call) -> Self {
        Expectation { expected_call, chain: ActionChain::new() }
    }

    /// Set the expected number of calls.
    ///
    /// Before any action is recorded this bounds the expectation as a whole,
    /// and is inherited by the first action recorded afterwards.  To bound a
    /// repeated action, call `times` on the result of
    /// [`will_repeatedly`](Expectation::will_repeatedly) instead.
    ///
    /// # Examples
    /// ```
    /// # use mockify::*;
    /// let foo = Mock::new("foo").unwrap();
    /// foo.expect_call(params![]).unwrap().times(2..);
    /// foo.call(params![]).unwrap();
    /// assert!(foo.assert_satisfied().is_err());
    /// foo.call(params![]).unwrap();
    /// foo.call(params![]).unwrap();
    /// foo.assert_satisfied().unwrap();
    /// ```
    pub fn times<C: Into<Cardinality>>(&mut self, c: C) -> &mut Self {
        self.chain.set_times(c.into());
        self
    }

    /// Record an action to be performed once, after any single-use actions
    /// recorded previously.
    pub fn will_once<A: Action + 'static>(&mut self, action: A) -> WillOnce<'_>
    {
        self.chain.push_single(action::share(action));
        WillOnce { expectation: self }
    }

    /// Record the action to be performed after every single-use action has
    /// run.
    ///
    /// By itself, a repeated action may run any number of times, including
    /// zero.  Recording a second repeated action replaces the first.
    pub fn will_repeatedly<A>(&mut self, action: A) -> WillRepeatedly<'_>
        where A: Action + 'static
    {
        self.chain.push_repeated(action::share(action));
        WillRepeatedly { expectation: self }
    }

    /// Does the number of calls so far match the expected number?
    pub fn is_satisfied(&self) -> bool {
        self.expected_call_count().is_satisfied(self.actual_call_count())
    }

    pub fn expected_call(&self) -> &Call {
        &self.expected_call
    }

    /// Where this expectation was recorded.
    pub fn location(&self) -> Location {
        self.expected_call.location()
    }

    /// Total number of times this expectation has been consumed.
    pub fn actual_call_count(&self) -> usize {
        self.chain.actual_call_count()
    }

    /// Total number of calls this expectation expects, over its whole chain.
    pub fn expected_call_count(&self) -> Cardinality {
        self.chain.expected_call_count()
    }

    /// The next action that will run, if any remain to be used.
    ///
    /// Returns `None` when no action was recorded, or when all of them are
    /// satisfied.
    pub fn next_action(&self) -> Option<&dyn Action> {
        self.chain.next_action().map(|a| &**a)
    }

    pub fn format_action(&self) -> Option<String> {
        self.next_action().map(|a| a.to_string())
    }

    pub fn format_expected(&self) -> String {
        self.expected_call_count().format_expected()
    }

    pub fn format_actual(&self) -> String {
        cardinality::format_actual(self.actual_call_count())
    }

    /// Count one call, and pick the action to run for it.
    ///
    /// # Panics
    ///
    /// If `actual` does not match the expected call pattern.
    pub(crate) fn consume(&mut self, actual: &Call)
        -> Result<Option<SharedAction>>
    {
        assert!(self.expected_call.matches(actual),
            "{} called with non-matching call {}", self.expected_call, actual);
        match self.chain.consume() {
            Some(action) => {
                tracing::trace!(expectation = %self.expected_call,
                    count = self.actual_call_count(), "consumed");
                Ok(action)
            }
            None => Err(OversaturatedCallError::new(
                self.expected_call.summary(),
                actual.summary()
            ).into())
        }
    }

    /// Consume this expectation with `actual` and run the selected action.
    ///
    /// # Panics
    ///
    /// If `actual` does not match the expected call pattern.
    pub fn call(&mut self, actual: &Call) -> Result<Output> {
        match self.consume(actual)? {
            Some(action) => action.call(actual),
            None => Ok(None)
        }
    }

    pub(crate) fn unsatisfied(&self) -> Unsatisfied {
        Unsatisfied {
            pattern: self.expected_call.summary(),
            action: self.format_action(),
            expected: self.format_expected(),
            actual: self.format_actual()
        }
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Expectation")
            .field("expected_call", &format_args!("{}", self.expected_call))
            .field("expected", &self.expected_call_count())
            .field("actual", &self.actual_call_count())
            .finish()
    }
}

/// Returned by [`Expectation::will_once`] to record further actions.
pub struct WillOnce<'a> {
    expectation: &'a mut Expectation,
}

impl<'a> WillOnce<'a> {
    /// Just like [`Expectation::will_once`]
    pub fn will_once<A: Action + 'static>(self, action: A) -> WillOnce<'a> {
        self.expectation.chain.push_single(action::share(action));
        self
    }

    /// Just like [`Expectation::will_repeatedly`]
    pub fn will_repeatedly<A>(self, action: A) -> WillRepeatedly<'a>
        where A: Action + 'static
    {
        self.expectation.chain.push_repeated(action::share(action));
        WillRepeatedly { expectation: self.expectation }
    }
}

/// Returned by [`Expectation::will_repeatedly`] to bound the repeated action.
pub struct WillRepeatedly<'a> {
    expectation: &'a mut Expectation,
}

impl WillRepeatedly<'_> {
    /// Set the number of times the repeated action should run.
    ///
    /// The expectation as a whole then expects that many calls plus one for
    /// every single-use action recorded before it.
    pub fn times<C: Into<Cardinality>>(self, c: C) {
        self.expectation.chain.set_repeated_times(c.into());
    }
}

#[cfg(test)]
mod t {
    use super::*;
    use crate::{
        action::{Raise, Return},
        error::Error,
        params,
    };
    use pretty_assertions::assert_eq;

    fn call() -> Call {
        Call::new("foo", params![]).unwrap()
    }

    fn int(o: Output) -> i32 {
        *o.unwrap().get::<i32>().unwrap()
    }

    #[test]
    fn default_once() {
        let mut e = Expectation::new(call());
        assert!(!e.is_satisfied());
        assert_eq!(e.format_expected(), "to be called once");
        assert!(e.call(&call()).unwrap().is_none());
        assert!(e.is_satisfied());
        // Default segments never oversaturate
        assert!(e.call(&call()).unwrap().is_none());
        assert!(!e.is_satisfied());
        assert_eq!(e.format_actual(), "called twice");
    }

    #[test]
    fn times_without_actions() {
        let mut e = Expectation::new(call());
        e.times(Cardinality::between(1, 2).unwrap());
        assert_eq!(e.format_expected(), "to be called between 1 and 2 times");
        e.call(&call()).unwrap();
        assert!(e.is_satisfied());
        e.call(&call()).unwrap();
        assert!(e.is_satisfied());
        e.call(&call()).unwrap();
        assert!(!e.is_satisfied());
    }

    #[test]
    fn never() {
        let mut e = Expectation::new(call());
        e.times(0);
        assert!(e.is_satisfied());
        assert_eq!(e.format_expected(), "to be never called");
        e.call(&call()).unwrap();
        assert!(!e.is_satisfied());
    }

    #[test]
    fn will_once_chain() {
        let mut e = Expectation::new(call());
        e.will_once(Return::new(1)).will_once(Return::new(2));
        assert_eq!(e.format_expected(), "to be called twice");
        assert_eq!(e.format_action().unwrap(), "Return(1)");
        assert_eq!(int(e.call(&call()).unwrap()), 1);
        assert_eq!(e.format_action().unwrap(), "Return(2)");
        assert_eq!(int(e.call(&call()).unwrap()), 2);
        assert!(e.is_satisfied());
        assert!(e.format_action().is_none());
        let err = e.call(&call()).unwrap_err();
        assert!(matches!(err, Error::OversaturatedCall(_)));
        assert!(err.to_string()
            .ends_with("foo(): no more actions recorded for call: foo()"));
    }

    #[test]
    fn repeated_unbounded() {
        let mut e = Expectation::new(call());
        e.will_repeatedly(Return::new(5));
        assert!(e.is_satisfied());
        assert_eq!(e.format_expected(), "to be called any number of times");
        for _ in 0..10 {
            assert_eq!(int(e.call(&call()).unwrap()), 5);
        }
        assert!(e.is_satisfied());
    }

    #[test]
    fn once_then_repeated_bounded() {
        let mut e = Expectation::new(call());
        e.will_once(Return::new(1)).will_repeatedly(Return::new(2)).times(2);
        assert_eq!(e.expected_call_count(), Cardinality::Exactly(3));
        let got: Vec<i32> = (0..3).map(|_| int(e.call(&call()).unwrap()))
            .collect();
        assert_eq!(got, vec![1, 2, 2]);
        assert!(e.is_satisfied());
        assert_eq!(int(e.call(&call()).unwrap()), 2);
        assert!(!e.is_satisfied());
        assert_eq!(e.format_actual(), "called 4 times");
    }

    #[test]
    fn once_then_repeated_at_least() {
        let mut e = Expectation::new(call());
        e.will_once(Return::new(1)).will_repeatedly(Return::new(2));
        assert_eq!(e.format_expected(), "to be called at least once");
        assert!(!e.is_satisfied());
        e.call(&call()).unwrap();
        assert!(e.is_satisfied());
    }

    #[test]
    fn times_carried_to_first_action() {
        let mut e = Expectation::new(call());
        e.times(2).will_once(Return::new(1)).will_once(Return::new(3));
        assert_eq!(e.expected_call_count(), Cardinality::Exactly(3));
        let got: Vec<i32> = (0..3).map(|_| int(e.call(&call()).unwrap()))
            .collect();
        assert_eq!(got, vec![1, 1, 3]);
        assert!(e.is_satisfied());
    }

    #[test]
    fn times_carried_to_repeated() {
        let mut e = Expectation::new(call());
        e.times(2).will_repeatedly(Return::new(1));
        assert_eq!(e.expected_call_count(), Cardinality::Exactly(2));
    }

    #[test]
    fn second_repeated_replaces_first() {
        let mut e = Expectation::new(call());
        e.will_repeatedly(Return::new(1));
        e.will_repeatedly(Return::new(2));
        assert_eq!(int(e.call(&call()).unwrap()), 2);
    }

    #[test]
    fn single_inserted_before_repeated() {
        let mut e = Expectation::new(call());
        e.will_repeatedly(Return::new(2));
        e.will_once(Return::new(1));
        let got: Vec<i32> = (0..3).map(|_| int(e.call(&call()).unwrap()))
            .collect();
        assert_eq!(got, vec![1, 2, 2]);
    }

    #[test]
    fn raise_propagates() {
        let mut e = Expectation::new(call());
        e.will_once(Raise::new(std::fmt::Error));
        let err = e.call(&call()).unwrap_err();
        assert!(err.raised::<std::fmt::Error>().is_some());
        // The call still counts
        assert!(e.is_satisfied());
    }

    #[test]
    #[should_panic(expected = "non-matching call")]
    fn call_with_other_pattern() {
        let mut e = Expectation::new(call());
        let other = Call::new("bar", params![]).unwrap();
        let _ = e.call(&other);
    }

    #[test]
    fn unsatisfied_row() {
        let mut e = Expectation::new(call());
        e.will_once(Return::new(1)).will_once(Return::new(2));
        e.call(&call()).unwrap();
        let row = e.unsatisfied();
        assert_eq!(row.action(), Some("Return(2)"));
        assert_eq!(row.expected(), "to be called twice");
        assert_eq!(row.actual(), "called once");
        assert_eq!(row.expected_call().to_string(), "foo()");
    }
}
