// vim: tw=80
//! Actions: what a mock does when an expectation is consumed.
//!
//! An action is anything implementing [`Action`].  The provided actions cover
//! the common cases of returning a value, failing with an error and running a
//! closure.

use std::{
    any::type_name,
    error::Error as StdError,
    fmt::{self, Debug, Display},
    rc::Rc,
};

use crate::{
    Call,
    Error,
    Result,
    value::{Arg, Output},
};

/// Something a mock can do when called.
///
/// The `Display` form is used in assertion reports to show the next pending
/// action of an unsatisfied expectation.
///
/// `call` takes `&self` because an action may be running more than once at a
/// time: a callback may call its own mock again.  Actions that keep state
/// must use interior mutability.
pub trait Action: Display {
    /// Perform the action for the given actual call.
    fn call(&self, call: &Call) -> Result<Output>;
}

/// Actions are shared between the session that owns them and the code that
/// invokes them, so the session can be released while the action runs.
pub(crate) type SharedAction = Rc<dyn Action>;

pub(crate) fn share<A: Action + 'static>(action: A) -> SharedAction {
    Rc::new(action)
}

/// Return a clone of the given value every time.
pub struct Return(Box<dyn Arg>);

impl Return {
    pub fn new<T: Arg>(value: T) -> Self {
        Return(Box::new(value))
    }
}

impl Action for Return {
    fn call(&self, _: &Call) -> Result<Output> {
        Ok(Some((*self.0).clone_arg()))
    }
}

impl Display for Return {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Return({:?})", self.0)
    }
}

/// Return nothing.  This is what an expectation without actions does.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReturnNone;

impl Action for ReturnNone {
    fn call(&self, _: &Call) -> Result<Output> {
        Ok(None)
    }
}

impl Display for ReturnNone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("ReturnNone")
    }
}

/// Fail with a clone of the given error every time.
///
/// The error reaches the caller as [`Error::Raised`], and may be recovered
/// with [`Error::raised`].
pub struct Raise<E>(E);

impl<E> Raise<E>
    where E: StdError + Clone + Send + Sync + 'static
{
    pub fn new(error: E) -> Self {
        Raise(error)
    }
}

impl<E> Action for Raise<E>
    where E: StdError + Clone + Send + Sync + 'static
{
    fn call(&self, _: &Call) -> Result<Output> {
        Err(Error::Raised(Box::new(self.0.clone())))
    }
}

impl<E: Debug> Display for Raise<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Raise({:?})", self.0)
    }
}

/// Run a closure with the actual call, and return whatever it returns.
///
/// The closure may call its own mock again, so it must be `Fn`.  Keep any
/// state in a `Cell` or `RefCell`.
///
/// # Examples
/// ```
/// # use mockify::*;
/// let add = Mock::new("add").unwrap();
/// add.expect_call(params![any(), any()]).unwrap()
///     .will_repeatedly(Invoke::new(|c: &Call| {
///         let sum = c.arg::<i32>(0).unwrap() + c.arg::<i32>(1).unwrap();
///         Ok(Some(Box::new(sum) as Box<dyn Arg>))
///     }));
/// let r = add.call(params![2, 3]).unwrap().unwrap();
/// assert_eq!(r.get::<i32>(), Some(&5));
/// ```
pub struct Invoke<F>(F);

impl<F> Invoke<F>
    where F: Fn(&Call) -> Result<Output>
{
    pub fn new(f: F) -> Self {
        Invoke(f)
    }
}

impl<F> Action for Invoke<F>
    where F: Fn(&Call) -> Result<Output>
{
    fn call(&self, call: &Call) -> Result<Output> {
        (self.0)(call)
    }
}

impl<F> Display for Invoke<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invoke({})", type_name::<F>())
    }
}

#[cfg(test)]
mod t {
    use std::cell::RefCell;

    use super::*;
    use crate::params;

    #[derive(Clone, Debug, PartialEq, thiserror::Error)]
    #[error("boom {0}")]
    struct Boom(u32);

    fn call() -> Call {
        Call::new("foo", params![1]).unwrap()
    }

    #[test]
    fn return_clones() {
        let a = Return::new(String::from("x"));
        for _ in 0..2 {
            let r = a.call(&call()).unwrap().unwrap();
            assert_eq!(r.get::<String>().map(String::as_str), Some("x"));
        }
        assert_eq!(a.to_string(), "Return(\"x\")");
    }

    #[test]
    fn return_none() {
        assert!(ReturnNone.call(&call()).unwrap().is_none());
        assert_eq!(ReturnNone.to_string(), "ReturnNone");
    }

    #[test]
    fn raise() {
        let a = Raise::new(Boom(7));
        let e = a.call(&call()).unwrap_err();
        assert_eq!(e.raised::<Boom>(), Some(&Boom(7)));
        assert_eq!(e.to_string(), "boom 7");
        assert_eq!(a.to_string(), "Raise(Boom(7))");
    }

    #[test]
    fn invoke_sees_call() {
        let seen = RefCell::new(Vec::new());
        {
            let a = Invoke::new(|c: &Call| {
                seen.borrow_mut().push(c.to_string());
                Ok(None)
            });
            a.call(&call()).unwrap();
            assert!(a.to_string().starts_with("Invoke("));
        }
        assert_eq!(seen.into_inner(), vec!["foo(1)".to_owned()]);
    }
}
