// vim: tw=80
//! Named mock objects and the scoped helpers built on them.

use std::{
    cell::{RefCell, RefMut},
    fmt,
    ops::Deref,
    rc::Rc,
    thread,
};

use crate::{
    Call,
    Error,
    Params,
    Result,
    action::Action,
    call::{self, Location},
    cardinality::Cardinality,
    error::UnsatisfiedError,
    expectation::{Expectation, WillOnce, WillRepeatedly},
    session::Session,
    value::Output,
};

/// A named mock.
///
/// Mocks form a tree: [`child`](Mock::child) creates a mock named
/// `parent.child` that shares the parent's session.  Cloning a `Mock` gives
/// another handle to the same node.
///
/// # Examples
/// ```
/// # use mockify::*;
/// let db = Mock::new("db").unwrap();
/// let get = db.child("get").unwrap();
/// get.expect_call(params!["key"]).unwrap().will_once(Return::new(42));
/// let r = get.call(params!["key"]).unwrap().unwrap();
/// assert_eq!(r.get::<i32>(), Some(&42));
/// db.assert_satisfied().unwrap();
/// ```
#[derive(Clone)]
pub struct Mock {
    name: String,
    session: Rc<RefCell<Session>>,
}

impl Mock {
    /// Create a root mock with a session of its own.
    pub fn new<N: Into<String>>(name: N) -> Result<Self> {
        let session = Rc::new(RefCell::new(Session::new()));
        Self::with_session(name, &session)
    }

    /// Create a root mock using an existing session.
    pub fn with_session<N>(name: N, session: &Rc<RefCell<Session>>)
        -> Result<Self>
        where N: Into<String>
    {
        let name = name.into();
        call::validate_name(&name)?;
        Ok(Mock { name, session: session.clone() })
    }

    /// Create a child mock, named `self.name() + "." + name`.
    pub fn child(&self, name: &str) -> Result<Mock> {
        call::validate_name(name)?;
        Ok(Mock {
            name: format!("{}.{}", self.name, name),
            session: self.session.clone()
        })
    }

    /// The full, dotted name of this mock.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn session(&self) -> &Rc<RefCell<Session>> {
        &self.session
    }

    /// Does `name` belong to this mock or one of its descendants?
    fn owns(&self, name: &str) -> bool {
        name.strip_prefix(self.name.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    }

    /// Record an expectation that this mock will be called with `params`.
    ///
    /// The returned guard keeps the session borrowed; drop it before calling
    /// any mock sharing the session.
    #[track_caller]
    pub fn expect_call(&self, params: Params) -> Result<ExpectationGuard<'_>> {
        let expected = Call::new(self.name.as_str(), params)?;
        let mut session = self.session.borrow_mut();
        let i = session.push(expected);
        Ok(ExpectationGuard { session, i })
    }

    /// Call the mock.
    ///
    /// The session is released before the selected action runs, so actions
    /// may call other mocks, and record expectations, on the same session.
    #[track_caller]
    pub fn call(&self, params: Params) -> Result<Output> {
        let actual = Call::new(self.name.as_str(), params)?;
        let action = self.session.borrow_mut().resolve(&actual)?;
        match action {
            Some(action) => action.call(&actual),
            None => Ok(None)
        }
    }

    /// Check that every expectation recorded for this mock, or for any of its
    /// descendants, is satisfied.
    pub fn assert_satisfied(&self) -> Result<()> {
        self.session.borrow().assert_satisfied_by(|name| self.owns(name))
    }

    /// Names with expectations recorded under this mock.
    fn expected_names(&self) -> Vec<String> {
        self.session.borrow().names().into_iter()
            .filter(|name| self.owns(name))
            .collect()
    }
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Mock").field("name", &self.name).finish()
    }
}

// We must return the session's RefMut to the caller so they can configure the
// expectation.  But we can't bundle both the RefMut and the &mut Expectation
// into the same structure; the borrow checker won't let us.  Instead we'll
// record the expectation's index within the session so we can proxy its
// methods.
pub struct ExpectationGuard<'a> {
    session: RefMut<'a, Session>,
    i: usize,
}

impl ExpectationGuard<'_> {
    /// Just like [`Expectation::times`]
    pub fn times<C: Into<Cardinality>>(&mut self, c: C) -> &mut Expectation {
        self.session.expectation_mut(self.i).times(c)
    }

    /// Just like [`Expectation::will_once`]
    pub fn will_once<A: Action + 'static>(&mut self, action: A) -> WillOnce<'_>
    {
        self.session.expectation_mut(self.i).will_once(action)
    }

    /// Just like [`Expectation::will_repeatedly`]
    pub fn will_repeatedly<A>(&mut self, action: A) -> WillRepeatedly<'_>
        where A: Action + 'static
    {
        self.session.expectation_mut(self.i).will_repeatedly(action)
    }

    /// Just like [`Expectation::location`]
    pub fn location(&self) -> Location {
        self.session.expectation(self.i).location()
    }
}

impl Deref for ExpectationGuard<'_> {
    type Target = Expectation;

    fn deref(&self) -> &Expectation {
        self.session.expectation(self.i)
    }
}

/// Check that every given mock is satisfied, and report all unsatisfied
/// expectations together.
pub fn assert_satisfied(mocks: &[&Mock]) -> Result<()> {
    let mut unsatisfied = Vec::new();
    let mut seen: Vec<&Rc<RefCell<Session>>> = Vec::new();
    for mock in mocks {
        if seen.iter().any(|s| Rc::ptr_eq(s, &mock.session)) {
            continue;
        }
        seen.push(&mock.session);
        let same_session: Vec<&&Mock> = mocks.iter()
            .filter(|m| Rc::ptr_eq(&m.session, &mock.session))
            .collect();
        let r = mock.session.borrow().assert_satisfied_by(|name| {
            same_session.iter().any(|m| m.owns(name))
        });
        match r {
            Ok(()) => (),
            Err(Error::Unsatisfied(e)) =>
                unsatisfied.extend_from_slice(e.expectations()),
            Err(e) => return Err(e)
        }
    }
    if unsatisfied.is_empty() {
        Ok(())
    } else {
        Err(UnsatisfiedError::new(unsatisfied).into())
    }
}

/// Returned by [`satisfied`].  Checks the mocks when dropped.
#[must_use = "the mocks are checked when the guard is dropped"]
pub struct SatisfiedGuard {
    mocks: Vec<Mock>,
}

impl Drop for SatisfiedGuard {
    fn drop(&mut self) {
        if thread::panicking() {
            return;
        }
        let mocks: Vec<&Mock> = self.mocks.iter().collect();
        if let Err(e) = assert_satisfied(&mocks) {
            panic!("{}", e);
        }
    }
}

/// Check that the given mocks are satisfied at the end of the current scope.
///
/// The check panics with the unsatisfied report, unless the thread is already
/// panicking.
///
/// ```should_panic
/// # use mockify::*;
/// let foo = Mock::new("foo").unwrap();
/// let _s = satisfied(&[&foo]);
/// foo.expect_call(params![]).unwrap().times(2);
/// foo.call(params![]).unwrap();
/// ```
pub fn satisfied(mocks: &[&Mock]) -> SatisfiedGuard {
    SatisfiedGuard { mocks: mocks.iter().map(|&m| m.clone()).collect() }
}

/// Returned by [`ordered`].  Returns the session to unordered mode when
/// dropped.
#[must_use = "ordered mode ends when the guard is dropped"]
pub struct OrderedGuard {
    session: Option<Rc<RefCell<Session>>>,
}

impl Drop for OrderedGuard {
    fn drop(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        match session.try_borrow_mut() {
            Ok(mut session) => session.disable_ordered(),
            // The session is still borrowed by whoever is unwinding
            Err(_) if thread::panicking() => (),
            Err(_) => panic!("cannot leave ordered mode: the session is \
                              borrowed while the ordered guard is dropped")
        }
    }
}

/// Require the expectations already recorded for the given mocks, and their
/// descendants, to be consumed in the order they were recorded, until the
/// returned guard is dropped.
///
/// All mocks must share one session.
///
/// ```
/// # use mockify::*;
/// let first = Mock::new("first").unwrap();
/// let second = Mock::with_session("second", first.session()).unwrap();
/// first.expect_call(params![]).unwrap();
/// second.expect_call(params![]).unwrap();
/// {
///     let _o = ordered(&[&first, &second]).unwrap();
///     assert!(second.call(params![]).is_err());
///     first.call(params![]).unwrap();
///     second.call(params![]).unwrap();
/// }
/// assert_satisfied(&[&first, &second]).unwrap();
/// ```
pub fn ordered(mocks: &[&Mock]) -> Result<OrderedGuard> {
    let Some(first) = mocks.first() else {
        return Ok(OrderedGuard { session: None });
    };
    for pair in mocks.windows(2) {
        if !Rc::ptr_eq(&pair[0].session, &pair[1].session) {
            return Err(Error::SessionMismatch(pair[0].name.clone(),
                                              pair[1].name.clone()));
        }
    }
    let mut names: Vec<String> = Vec::new();
    for mock in mocks {
        for name in mock.expected_names() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    first.session.borrow_mut().enable_ordered(names);
    Ok(OrderedGuard { session: Some(first.session.clone()) })
}
