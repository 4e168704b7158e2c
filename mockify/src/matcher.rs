// vim: tw=80
//! Argument matchers.
//!
//! A recorded expectation may use a [`Matcher`] anywhere a literal argument
//! could appear.  Matchers are built on the [`predicates`] crate, so any
//! predicate from [`predicate`](crate::predicate) can be lifted into a matcher
//! with [`matching`].
//!
//! ```
//! # use mockify::*;
//! let pattern = Call::new(
//!     "foo",
//!     params![matching::<i32, _>(predicate::gt(3)), any()]
//! ).unwrap();
//! let actual = Call::new("foo", params![4, "anything"]).unwrap();
//! assert!(pattern.matches(&actual));
//! ```

use std::{
    any::type_name,
    cell::RefCell,
    fmt::{self, Debug, Display},
    marker::PhantomData,
    rc::Rc,
};

use predicates::{
    reflection::{Case, PredicateReflection},
    Predicate,
};

use crate::value::Arg;

/// A type-erased predicate over mock call arguments.
pub struct Matcher(Box<dyn Predicate<dyn Arg>>);

impl Matcher {
    /// Wrap any predicate over type-erased arguments.
    pub fn new<P: Predicate<dyn Arg> + 'static>(p: P) -> Self {
        Matcher(Box::new(p))
    }

    pub fn eval(&self, value: &dyn Arg) -> bool {
        self.0.eval(value)
    }

    /// Explain why `value` was rejected, if it was.
    pub fn find_case<'a>(&'a self, value: &dyn Arg) -> Option<Case<'a>> {
        self.0.find_case(false, value)
    }
}

impl Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// One argument of a [`Call`](crate::Call): either a literal value or a
/// matcher.
#[derive(Debug)]
pub enum Param {
    Value(Box<dyn Arg>),
    Matcher(Matcher),
}

impl Param {
    /// Compare this expected parameter against an actual one.
    ///
    /// The comparison always runs with the pattern on the left.  A matcher on
    /// the actual side is evaluated against the expected literal, and two
    /// matchers are considered equal when they render the same way.
    pub fn matches(&self, actual: &Param) -> bool {
        match (self, actual) {
            (Param::Value(e), Param::Value(a)) => (**e).eq_arg(&**a),
            (Param::Matcher(m), Param::Value(a)) => m.eval(&**a),
            (Param::Value(e), Param::Matcher(m)) => m.eval(&**e),
            (Param::Matcher(e), Param::Matcher(a)) =>
                e.to_string() == a.to_string(),
        }
    }

    /// The literal value, if this is not a matcher.
    pub fn value(&self) -> Option<&dyn Arg> {
        match self {
            Param::Value(v) => Some(&**v),
            Param::Matcher(_) => None
        }
    }

    /// Shorthand for `self.value().and_then(|v| v.get::<T>())`.
    pub fn get<T: Arg>(&self) -> Option<&T> {
        self.value().and_then(|v| v.get::<T>())
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Param::Value(v) => write!(f, "{:?}", v),
            Param::Matcher(m) => write!(f, "{}", m),
        }
    }
}

impl<T: Arg> From<T> for Param {
    fn from(t: T) -> Self {
        Param::Value(Box::new(t))
    }
}

impl From<Matcher> for Param {
    fn from(m: Matcher) -> Self {
        Param::Matcher(m)
    }
}

/// Matches any value.  Renders as `_`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Anything;

impl Display for Anything {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("_")
    }
}

impl PredicateReflection for Anything {}

impl Predicate<dyn Arg> for Anything {
    fn eval(&self, _: &dyn Arg) -> bool {
        true
    }
}

/// Matches any value of type `T`.
pub struct InstanceOf<T>(PhantomData<fn(&T)>);

impl<T> Display for InstanceOf<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InstanceOf({})", type_name::<T>())
    }
}

impl<T> PredicateReflection for InstanceOf<T> {}

impl<T: Arg> Predicate<dyn Arg> for InstanceOf<T> {
    fn eval(&self, v: &dyn Arg) -> bool {
        v.is::<T>()
    }
}

/// Adapts a predicate over `T` into a predicate over type-erased arguments.
///
/// Arguments of any other type are rejected.
pub struct Lifted<T: ?Sized, P> {
    predicate: P,
    _t: PhantomData<fn(&T)>
}

impl<T: ?Sized, P: Display> Display for Lifted<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.predicate, f)
    }
}

impl<T: ?Sized, P: PredicateReflection> PredicateReflection for Lifted<T, P> {}

impl<T, P> Predicate<dyn Arg> for Lifted<T, P>
    where T: Arg, P: Predicate<T>
{
    fn eval(&self, v: &dyn Arg) -> bool {
        v.get::<T>().is_some_and(|v| self.predicate.eval(v))
    }

    fn find_case<'a>(&'a self, expected: bool, v: &dyn Arg)
        -> Option<Case<'a>>
    {
        match v.get::<T>() {
            Some(v) => self.predicate.find_case(expected, v),
            None if expected => None,
            None => Some(Case::new(Some(self), false))
        }
    }
}

/// Like [`Lifted`], but for string predicates applied to either `String` or
/// `&'static str` arguments.
pub struct LiftedStr<P>(P);

impl<P: Display> Display for LiftedStr<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<P: PredicateReflection> PredicateReflection for LiftedStr<P> {}

impl<P: Predicate<str>> Predicate<dyn Arg> for LiftedStr<P> {
    fn eval(&self, v: &dyn Arg) -> bool {
        let s = v.get::<String>().map(String::as_str)
            .or_else(|| v.get::<&'static str>().copied());
        s.is_some_and(|s| self.0.eval(s))
    }
}

/// Records the values it is compared against, then matches anyway.
///
/// Consecutive duplicates are recorded once, so a `SaveArg` can be used to
/// check the order in which distinct values were passed.
///
/// ```
/// # use mockify::*;
/// let arg = SaveArg::new();
/// let foo = Mock::new("foo").unwrap();
/// foo.expect_call(params![arg.param()]).unwrap().times(3);
/// for i in [0, 0, 1] {
///     foo.call(params![i]).unwrap();
/// }
/// let seen: Vec<i32> = arg.called_with().iter()
///     .filter_map(|v| v.get::<i32>().copied())
///     .collect();
/// assert_eq!(seen, vec![0, 1]);
/// ```
#[derive(Clone, Default)]
pub struct SaveArg {
    called_with: Rc<RefCell<Vec<Box<dyn Arg>>>>
}

impl SaveArg {
    pub fn new() -> Self {
        Self::default()
    }

    /// A matcher that records into this `SaveArg`.
    pub fn param(&self) -> Param {
        Param::Matcher(Matcher::new(self.clone()))
    }

    /// Unique values seen so far, in order.
    pub fn called_with(&self) -> Vec<Box<dyn Arg>> {
        self.called_with.borrow().iter().map(|v| (**v).clone_arg()).collect()
    }
}

impl Display for SaveArg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("SaveArg")
    }
}

impl PredicateReflection for SaveArg {}

impl Predicate<dyn Arg> for SaveArg {
    fn eval(&self, v: &dyn Arg) -> bool {
        let mut seen = self.called_with.borrow_mut();
        if !seen.last().is_some_and(|last| (**last).eq_arg(v)) {
            seen.push(v.clone_arg());
        }
        true
    }
}

/// Match any argument.
pub fn any() -> Matcher {
    Matcher::new(Anything)
}

/// Match any argument whose concrete type is `T`.
pub fn instance_of<T: Arg>() -> Matcher {
    Matcher::new(InstanceOf::<T>(PhantomData))
}

/// Lift a typed predicate into a matcher.
///
/// # Examples
/// ```
/// # use mockify::*;
/// let m = matching::<u8, _>(predicate::in_iter(vec![1u8, 2, 3]));
/// assert!(m.eval(&2u8));
/// assert!(!m.eval(&2u16));
/// ```
pub fn matching<T, P>(p: P) -> Matcher
    where T: Arg, P: Predicate<T> + 'static
{
    Matcher::new(Lifted { predicate: p, _t: PhantomData::<fn(&T)> })
}

/// Match with a closure over a typed argument.
pub fn function<T, F>(f: F) -> Matcher
    where T: Arg, F: Fn(&T) -> bool + 'static
{
    matching::<T, _>(predicates::function::function(f))
}

/// Lift a string predicate, such as `predicate::str::starts_with`, into a
/// matcher accepting `String` and `&'static str` arguments.
pub fn matching_str<P>(p: P) -> Matcher
    where P: Predicate<str> + 'static
{
    Matcher::new(LiftedStr(p))
}
