// vim: tw=80
//! Type-erased argument and return values.
//!
//! Mock calls carry arguments of arbitrary types.  Any `'static` type that is
//! `Debug`, `PartialEq` and `Clone` can be used as an argument or returned
//! from an action; it is stored as a `Box<dyn Arg>`.

use std::fmt::Debug;

use downcast::{downcast, Any};

/// A value that can travel through a mock call.
///
/// This trait is implemented automatically for every suitable type.  Two
/// values compare equal only if they have the same concrete type and that
/// type's `PartialEq` says they are equal.  There is no implicit conversion
/// between, for example, `&'static str` and `String`.
pub trait Arg: Any + Debug {
    /// Compare with another type-erased value.
    fn eq_arg(&self, other: &dyn Arg) -> bool;

    /// Clone into a new box.
    fn clone_arg(&self) -> Box<dyn Arg>;
}

downcast!(dyn Arg);

impl<T> Arg for T
    where T: Any + Debug + PartialEq + Clone
{
    fn eq_arg(&self, other: &dyn Arg) -> bool {
        match other.downcast_ref::<T>() {
            Ok(other) => self == other,
            Err(_) => false
        }
    }

    fn clone_arg(&self) -> Box<dyn Arg> {
        Box::new(self.clone())
    }
}

impl dyn Arg {
    /// Borrow the value as a `T`, if that is its concrete type.
    pub fn get<T: Arg>(&self) -> Option<&T> {
        self.downcast_ref::<T>().ok()
    }
}

impl PartialEq for dyn Arg {
    fn eq(&self, other: &dyn Arg) -> bool {
        self.eq_arg(other)
    }
}

/// What a mock call produces.
///
/// `None` is returned when the consumed expectation has no action recorded,
/// or when an uninterested call is ignored.
pub type Output = Option<Box<dyn Arg>>;
