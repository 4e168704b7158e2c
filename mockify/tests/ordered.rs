// vim: tw=80
//! Expectations consumed in the order they were recorded.
#![deny(warnings)]

use mockify::*;
use pretty_assertions::assert_eq;

fn pair() -> (Mock, Mock) {
    let first = Mock::new("first").unwrap();
    let second = Mock::with_session("second", first.session()).unwrap();
    (first, second)
}

#[test]
fn in_order() {
    let (first, second) = pair();
    first.expect_call(params![]).unwrap().will_once(Return::new(1));
    second.expect_call(params![]).unwrap().will_once(Return::new(2));
    let _s = satisfied(&[&first, &second]);
    let _o = ordered(&[&first, &second]).unwrap();
    first.call(params![]).unwrap();
    second.call(params![]).unwrap();
}

#[test]
fn out_of_order() {
    let (first, second) = pair();
    let expected_at = first.expect_call(params![]).unwrap().location();
    second.expect_call(params![]).unwrap();
    let _o = ordered(&[&first, &second]).unwrap();
    let e = second.call(params![]).unwrap_err();
    let s = e.to_string();
    match e {
        Error::UnexpectedCallOrder(e) => {
            assert_eq!(e.expected_call().to_string(), "first()");
            assert_eq!(e.expected_call().location(), expected_at);
            assert_eq!(e.actual_call().to_string(), "second()");
            assert_eq!(e.actual_call().location().file(), file!());
        }
        e => panic!("unexpected {:?}", e)
    }
    assert!(s.starts_with("Another mock was expected to be called:"));
    assert!(s.contains("Actual:\n  second()\nExpected:\n  first()"), "{}", s);
}

#[test]
fn interleaved_same_name() {
    let (first, second) = pair();
    first.expect_call(params![1]).unwrap();
    second.expect_call(params![]).unwrap();
    first.expect_call(params![2]).unwrap();
    let _o = ordered(&[&first, &second]).unwrap();
    assert!(first.call(params![2]).is_err());
    first.call(params![1]).unwrap();
    assert!(first.call(params![2]).is_err());
    second.call(params![]).unwrap();
    first.call(params![2]).unwrap();
}

#[test]
fn children_are_ordered_too() {
    let root = Mock::new("root").unwrap();
    let a = root.child("a").unwrap();
    let b = root.child("b").unwrap();
    a.expect_call(params![]).unwrap();
    b.expect_call(params![]).unwrap();
    let _o = ordered(&[&root]).unwrap();
    assert!(matches!(b.call(params![]),
                     Err(Error::UnexpectedCallOrder(_))));
    a.call(params![]).unwrap();
    b.call(params![]).unwrap();
}

#[test]
fn unordered_mocks_unaffected() {
    let (first, second) = pair();
    let other = Mock::with_session("other", first.session()).unwrap();
    first.expect_call(params![]).unwrap();
    other.expect_call(params![]).unwrap();
    second.expect_call(params![]).unwrap();
    let _o = ordered(&[&first, &second]).unwrap();
    other.call(params![]).unwrap();
    first.call(params![]).unwrap();
    second.call(params![]).unwrap();
}

#[test]
fn unconsumed_reported_after_scope() {
    let (first, second) = pair();
    first.expect_call(params![]).unwrap();
    second.expect_call(params![]).unwrap();
    {
        let _o = ordered(&[&first, &second]).unwrap();
        first.call(params![]).unwrap();
    }
    match assert_satisfied(&[&first, &second]) {
        Err(Error::Unsatisfied(e)) => {
            assert_eq!(e.expectations().len(), 1);
            assert_eq!(e.expectations()[0].expected_call().to_string(),
                       "second()");
        }
        r => panic!("unexpected {:?}", r)
    }
    // No longer ordered
    second.call(params![]).unwrap();
}

#[test]
fn different_sessions() {
    let a = Mock::new("a").unwrap();
    let b = Mock::new("b").unwrap();
    let e = ordered(&[&a, &b]).err().unwrap();
    assert_eq!(e.to_string(), "mocks \"a\" and \"b\" do not share a session");
}

#[test]
fn explicit_session_api() {
    let mut session = Session::new();
    session.expect_call(Call::new("x", params![]).unwrap());
    session.expect_call(Call::new("y", params![]).unwrap());
    session.enable_ordered(["x", "y"]);
    let y = Call::new("y", params![]).unwrap();
    assert!(session.call(&y).is_err());
    session.call(&Call::new("x", params![]).unwrap()).unwrap();
    session.call(&y).unwrap();
    session.disable_ordered();
    session.assert_satisfied().unwrap();
}
