// vim: tw=80
//! Call records: the name and arguments of one mock invocation, or of one
//! expected invocation pattern.

use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    panic,
};

use crate::{
    Error,
    Result,
    matcher::Param,
};

/// Identifiers that may not be used as a segment of a mock name.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const",
    "continue", "crate", "do", "dyn", "else", "enum", "extern", "false",
    "final", "fn", "for", "if", "impl", "in", "let", "loop", "macro", "match",
    "mod", "move", "mut", "override", "priv", "pub", "ref", "return", "self",
    "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let first_ok = match chars.next() {
        Some(c) => c == '_' || c.is_alphabetic(),
        None => false
    };
    first_ok
        && s != "_"
        && chars.all(|c| c == '_' || c.is_alphanumeric())
        && !KEYWORDS.contains(&s)
}

/// Is `name` one or more identifiers joined by `.`?
pub fn is_valid_name(name: &str) -> bool {
    name.split('.').all(is_identifier)
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_owned()))
    }
}

/// The place in test (or tested) code where a [`Call`] was created.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Location {
    file: &'static str,
    line: u32,
}

impl Location {
    /// Location of the caller, following `#[track_caller]` frames.
    #[track_caller]
    pub fn caller() -> Self {
        let l = panic::Location::caller();
        Location { file: l.file(), line: l.line() }
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Positional and keyword arguments of a call.
///
/// Usually built with the [`params!`](crate::params) macro.
#[derive(Debug, Default)]
pub struct Params {
    args: Vec<Param>,
    kwargs: BTreeMap<String, Param>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg<P: Into<Param>>(mut self, p: P) -> Self {
        self.args.push(p.into());
        self
    }

    /// Set a keyword argument, replacing any previous value for `key`.
    pub fn kwarg<K, P>(mut self, key: K, p: P) -> Self
        where K: Into<String>, P: Into<Param>
    {
        self.kwargs.insert(key.into(), p.into());
        self
    }
}

impl Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        let mut sep = |f: &mut fmt::Formatter| -> fmt::Result {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            Ok(())
        };
        for a in self.args.iter() {
            sep(f)?;
            write!(f, "{}", a)?;
        }
        // BTreeMap keeps keyword arguments sorted by key
        for (k, v) in self.kwargs.iter() {
            sep(f)?;
            write!(f, "{}={}", k, v)?;
        }
        Ok(())
    }
}

/// Build [`Params`] from positional arguments, optionally followed by keyword
/// arguments after a semicolon.
///
/// # Examples
/// ```
/// # use mockify::*;
/// let p = params![1, "two", any(); verbose = true];
/// assert_eq!(p.to_string(), "1, \"two\", _, verbose=true");
/// ```
#[macro_export]
macro_rules! params {
    ($($arg:expr),* $(,)? $(; $($key:ident = $value:expr),* $(,)?)?) => {{
        #[allow(unused_mut)]
        let mut params = $crate::Params::new();
        $( params = params.arg($arg); )*
        $($( params = params.kwarg(stringify!($key), $value); )*)?
        params
    }};
}

/// One concrete invocation, or one expected invocation pattern.
///
/// `Call` deliberately does not implement `PartialEq`: matchers need not be
/// symmetric, so comparison is always directional through
/// [`matches`](Call::matches).
#[derive(Debug)]
pub struct Call {
    name: String,
    params: Params,
    location: Location,
}

impl Call {
    /// Create a call record, capturing the caller's location.
    ///
    /// Fails with [`Error::InvalidName`] unless `name` is a dotted sequence of
    /// identifiers.
    #[track_caller]
    pub fn new<N: Into<String>>(name: N, params: Params) -> Result<Self> {
        let location = Location::caller();
        Self::with_location(name, params, location)
    }

    /// Like [`new`](Call::new), with an explicitly supplied location.
    pub fn with_location<N: Into<String>>(
        name: N,
        params: Params,
        location: Location
    ) -> Result<Self>
    {
        let name = name.into();
        validate_name(&name)?;
        Ok(Call { name, params, location })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positional arguments.
    pub fn args(&self) -> &[Param] {
        &self.params.args
    }

    /// Keyword arguments, sorted by key.
    pub fn kwargs(&self) -> &BTreeMap<String, Param> {
        &self.params.kwargs
    }

    /// The `i`th positional argument as a `T`, if it is a literal of that type.
    pub fn arg<T: crate::Arg>(&self, i: usize) -> Option<&T> {
        self.params.args.get(i).and_then(Param::get::<T>)
    }

    /// Keyword argument `key` as a `T`, if it is a literal of that type.
    pub fn kwarg<T: crate::Arg>(&self, key: &str) -> Option<&T> {
        self.params.kwargs.get(key).and_then(Param::get::<T>)
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Does `actual` fit the pattern described by `self`?
    pub fn matches(&self, actual: &Call) -> bool {
        self.name == actual.name
            && self.params.args.len() == actual.params.args.len()
            && self.params.kwargs.len() == actual.params.kwargs.len()
            && self.params.args.iter()
                .zip(actual.params.args.iter())
                .all(|(e, a)| e.matches(a))
            && self.params.kwargs.iter()
                .all(|(k, e)| {
                    actual.params.kwargs.get(k).is_some_and(|a| e.matches(a))
                })
    }

    /// Explain, argument by argument, why `actual` does not fit `self`.
    pub(crate) fn explain_mismatch(&self, actual: &Call) -> Vec<String> {
        use predicates_tree::CaseTreeExt;

        let mut reasons = Vec::new();
        let (eargs, aargs) = (&self.params.args, &actual.params.args);
        if eargs.len() != aargs.len() {
            reasons.push(format!("expected {} positional argument(s), got {}",
                                 eargs.len(), aargs.len()));
        }
        for (i, (e, a)) in eargs.iter().zip(aargs.iter()).enumerate() {
            if e.matches(a) {
                continue;
            }
            let tree = match (e, a.value()) {
                (Param::Matcher(m), Some(v)) => m.find_case(v)
                    .map(|case| case.tree().to_string()),
                _ => None
            };
            match tree {
                Some(t) => reasons.push(format!("argument {}: {}", i, t)),
                None => reasons.push(format!("argument {}: {} != {}", i, e, a))
            }
        }
        for (k, e) in self.params.kwargs.iter() {
            match actual.params.kwargs.get(k) {
                None => reasons.push(format!("missing keyword argument {}", k)),
                Some(a) if !e.matches(a) =>
                    reasons.push(format!("keyword argument {}: {} != {}",
                                         k, e, a)),
                Some(_) => ()
            }
        }
        for k in actual.params.kwargs.keys() {
            if !self.params.kwargs.contains_key(k) {
                reasons.push(format!("unexpected keyword argument {}", k));
            }
        }
        reasons
    }

    pub(crate) fn summary(&self) -> CallSummary {
        CallSummary {
            name: self.name.clone(),
            text: self.to_string(),
            location: self.location
        }
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params)
    }
}

/// A rendered snapshot of a [`Call`], as carried by error reports.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CallSummary {
    name: String,
    text: String,
    location: Location,
}

impl CallSummary {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Location {
        self.location
    }
}

impl Display for CallSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}
