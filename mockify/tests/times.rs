// vim: tw=80
//! Expected call counts and the assertion reports about them.
#![deny(warnings)]

use mockify::*;

fn unsatisfied(mock: &Mock) -> Vec<Unsatisfied> {
    match mock.assert_satisfied() {
        Ok(()) => Vec::new(),
        Err(Error::Unsatisfied(e)) => e.expectations().to_vec(),
        Err(e) => panic!("unexpected {:?}", e)
    }
}

mod exactly {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn satisfied_only_at_n() {
        for n in 0..4usize {
            let mock = Mock::new("mock").unwrap();
            mock.expect_call(params![]).unwrap().times(n);
            for calls in 0..(n + 3) {
                assert_eq!(mock.assert_satisfied().is_ok(), calls == n,
                           "n={} calls={}", n, calls);
                mock.call(params![]).unwrap();
            }
        }
    }

    #[test]
    fn never() {
        let mock = Mock::new("mock").unwrap();
        mock.expect_call(params![]).unwrap().times(0);
        mock.assert_satisfied().unwrap();
        mock.call(params![]).unwrap();
        let rows = unsatisfied(&mock);
        assert_eq!(rows[0].expected(), "to be never called");
        assert_eq!(rows[0].actual(), "called once");
    }
}

mod ranges {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn at_least() {
        let mock = Mock::new("mock").unwrap();
        mock.expect_call(params![]).unwrap().times(2..);
        mock.call(params![]).unwrap();
        assert_eq!(unsatisfied(&mock)[0].expected(),
                   "to be called at least twice");
        for _ in 0..5 {
            mock.call(params![]).unwrap();
            mock.assert_satisfied().unwrap();
        }
    }

    #[test]
    fn at_most() {
        let mock = Mock::new("mock").unwrap();
        mock.expect_call(params![]).unwrap().times(..=2);
        mock.assert_satisfied().unwrap();
        mock.call(params![]).unwrap();
        mock.call(params![]).unwrap();
        mock.assert_satisfied().unwrap();
        mock.call(params![]).unwrap();
        let rows = unsatisfied(&mock);
        assert_eq!(rows[0].expected(), "to be called at most twice");
        assert_eq!(rows[0].actual(), "called 3 times");
    }

    #[test]
    fn between() {
        let mock = Mock::new("mock").unwrap();
        mock.expect_call(params![]).unwrap()
            .times(Cardinality::between(2, 3).unwrap());
        mock.call(params![]).unwrap();
        assert_eq!(unsatisfied(&mock)[0].expected(),
                   "to be called between 2 and 3 times");
        mock.call(params![]).unwrap();
        mock.assert_satisfied().unwrap();
        mock.call(params![]).unwrap();
        mock.assert_satisfied().unwrap();
        mock.call(params![]).unwrap();
        assert_eq!(unsatisfied(&mock).len(), 1);
    }

    #[test]
    fn huge_repeated_count() {
        let mock = Mock::new("mock").unwrap();
        mock.expect_call(params![]).unwrap()
            .will_once(Return::new(1))
            .will_repeatedly(Return::new(2))
            .times(usize::MAX);
        let got: Vec<_> = (0..3)
            .map(|_| *mock.call(params![]).unwrap().unwrap()
                 .get::<i32>().unwrap())
            .collect();
        assert_eq!(got, vec![1, 2, 2]);
        assert_eq!(unsatisfied(&mock)[0].actual(), "called 3 times");
    }

    #[test]
    fn between_reversed() {
        assert!(matches!(Cardinality::between(3, 1),
                         Err(Error::InvalidCardinality { .. })));
    }
}

mod normalization {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn at_most_zero_is_never() {
        let a = Cardinality::at_most(0);
        let b = Cardinality::exactly(0);
        assert_eq!(a, b);
        assert_eq!(a.format_expected(), "to be never called");
        for n in 0..3 {
            assert_eq!(a.is_satisfied(n), b.is_satisfied(n));
        }
    }

    #[test]
    fn between_n_n_is_exactly() {
        let a = Cardinality::between(1, 1).unwrap();
        let b = Cardinality::exactly(1);
        assert_eq!(a.format_expected(), b.format_expected());
        for n in 0..3 {
            assert_eq!(a.is_satisfied(n), b.is_satisfied(n));
        }
    }

    #[test]
    fn between_zero_m_is_at_most() {
        assert_eq!(Cardinality::between(0, 2).unwrap().format_expected(),
                   "to be called at most twice");
    }
}

mod reports {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn idempotent() {
        let mock = Mock::new("mock").unwrap();
        mock.expect_call(params![1]).unwrap().times(2);
        mock.expect_call(params![2]).unwrap();
        mock.call(params![1]).unwrap();
        let a = mock.assert_satisfied().unwrap_err().to_string();
        let b = mock.assert_satisfied().unwrap_err().to_string();
        assert_eq!(a, b);
    }

    #[test]
    fn layout() {
        let mock = Mock::new("mock").unwrap();
        let at = format!("at {}", mock.expect_call(params![1]).unwrap()
                         .location());
        let s = mock.assert_satisfied().unwrap_err().to_string();
        let expected = format!(
            "following expectation is not satisfied:\n\n{}\n{}\n\
             \x20   Pattern: mock(1)\n\
             \x20  Expected: to be called once\n\
             \x20    Actual: never called",
            at, "-".repeat(at.len()));
        assert_eq!(s, expected);
    }

    #[test]
    fn many_in_registration_order() {
        let mock = Mock::new("mock").unwrap();
        for i in 0..3 {
            mock.expect_call(params![i]).unwrap();
        }
        let s = mock.assert_satisfied().unwrap_err().to_string();
        assert!(s.starts_with("following 3 expectations are not satisfied:"));
        let p0 = s.find("mock(0)").unwrap();
        let p1 = s.find("mock(1)").unwrap();
        let p2 = s.find("mock(2)").unwrap();
        assert!(p0 < p1 && p1 < p2);
    }

    #[test]
    #[should_panic(expected = "following expectation is not satisfied")]
    fn satisfied_guard() {
        let mock = Mock::new("mock").unwrap();
        let _s = satisfied(&[&mock]);
        mock.expect_call(params![]).unwrap();
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn satisfied_guard_while_panicking() {
        let mock = Mock::new("mock").unwrap();
        let _s = satisfied(&[&mock]);
        mock.expect_call(params![]).unwrap();
        panic!("boom");
    }
}
