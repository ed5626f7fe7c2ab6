//! Filter expressions for `entity.find` and `entity.count`.
//!
//! A [`Filter`] is a string-valued boolean predicate over entity
//! attributes, assigned to the `filter` request parameter. Atomic
//! constraints pair a comparator-bearing attribute string with a value:
//!
//! ```rust
//! use capture_api::Filter;
//!
//! let filter = Filter::new("displayName =", "chareth");
//! assert_eq!(filter.as_str(), "displayName = 'chareth'");
//! ```
//!
//! Constraints chain with [`Filter::and`] and [`Filter::or`], and any
//! application type implementing [`Expression`] can be combined with the
//! free [`and`] and [`or`] functions:
//!
//! ```rust
//! use capture_api::filter::{self, Expression, Filter};
//!
//! struct Organization {
//!     code: String,
//! }
//!
//! impl Expression for Organization {
//!     fn filter(&self) -> String {
//!         Filter::new("organization =", self.code.as_str()).filter()
//!     }
//! }
//!
//! let org = Organization { code: "acme".to_string() };
//! let adults = Filter::new("age >=", 18);
//! let combined = filter::and(&[&org, &adults]);
//! assert_eq!(
//!     combined.as_str(),
//!     "(organization = 'acme') AND (age >= 18)"
//! );
//! ```

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};

use crate::client::ParamValue;
use crate::datetime;

/// Escapes backslashes and single quotes in `val` and wraps it in single
/// quotes, in one pass.
#[must_use]
pub fn escape_string(val: &str) -> String {
    let mut escaped = String::with_capacity(val.len() + 2);
    escaped.push('\'');
    for c in val.chars() {
        match c {
            '\'' => escaped.push_str("\\'"),
            '\\' => escaped.push_str("\\\\"),
            _ => escaped.push(c),
        }
    }
    escaped.push('\'');
    escaped
}

/// A custom textual rendering for a filter value.
///
/// The rendered text is inserted into the filter string verbatim, letting a
/// type opt out of the default escaping and formatting rules.
pub trait RenderValue: fmt::Debug {
    /// Renders the value exactly as it should appear in the filter string.
    fn render(&self) -> String;
}

/// A value on the right-hand side of an atomic constraint.
///
/// Strings are escaped and quoted, timestamps are rendered with the shared
/// timestamp format and quoted, raw values are inserted via their default
/// textual form, and [`FilterValue::Custom`] defers to a [`RenderValue`]
/// implementation.
#[derive(Debug)]
pub enum FilterValue {
    /// A string value, escaped and single-quoted.
    Str(String),
    /// A timestamp, rendered with [`crate::datetime::TIME_FORMAT`] and
    /// quoted.
    Timestamp(DateTime<FixedOffset>),
    /// A pre-rendered value inserted without escaping.
    Raw(String),
    /// A value carrying its own rendering.
    Custom(Box<dyn RenderValue>),
}

impl FilterValue {
    /// Builds a raw value from any displayable type.
    pub fn raw(value: impl fmt::Display) -> Self {
        Self::Raw(value.to_string())
    }

    /// Builds a custom-rendered value.
    pub fn custom(value: impl RenderValue + 'static) -> Self {
        Self::Custom(Box::new(value))
    }

    fn render(&self) -> String {
        match self {
            Self::Str(s) => escape_string(s),
            Self::Timestamp(t) => format!("'{}'", datetime::timestamp(t)),
            Self::Raw(s) => s.clone(),
            Self::Custom(custom) => custom.render(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<DateTime<FixedOffset>> for FilterValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value.fixed_offset())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::raw(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::raw(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::raw(value)
    }
}

/// Types that can act as filters and be joined with logical operators.
pub trait Expression {
    /// Renders the expression as a filter string.
    fn filter(&self) -> String;
}

/// An immutable filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter(String);

impl Filter {
    /// Builds an atomic constraint from a comparator-bearing attribute
    /// string (e.g. `"age >="`) and a value.
    pub fn new(attrcomp: &str, value: impl Into<FilterValue>) -> Self {
        Self(format!("{attrcomp} {}", value.into().render()))
    }

    /// Adds an additional constraint in conjunction.
    #[must_use]
    pub fn and(self, attrcomp: &str, value: impl Into<FilterValue>) -> Self {
        Self(format!("({}) AND ({})", self.0, Self::new(attrcomp, value).0))
    }

    /// Adds an alternative constraint in disjunction.
    #[must_use]
    pub fn or(self, attrcomp: &str, value: impl Into<FilterValue>) -> Self {
        Self(format!("({}) OR ({})", self.0, Self::new(attrcomp, value).0))
    }

    /// Returns the filter string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the filter, returning the filter string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Expression for Filter {
    fn filter(&self) -> String {
        self.0.clone()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Filter> for ParamValue {
    fn from(filter: Filter) -> Self {
        Self::String(filter.0)
    }
}

/// Joins expressions in a conjunction.
///
/// Zero operands yield the empty filter, one operand is returned
/// unwrapped, and two or more are each parenthesized and joined with
/// ` AND `.
#[must_use]
pub fn and(exprs: &[&dyn Expression]) -> Filter {
    join(exprs, " AND ")
}

/// Joins expressions in a disjunction; see [`and`] for arity behavior.
#[must_use]
pub fn or(exprs: &[&dyn Expression]) -> Filter {
    join(exprs, " OR ")
}

fn join(exprs: &[&dyn Expression], sep: &str) -> Filter {
    match exprs {
        [] => Filter(String::new()),
        [single] => Filter(single.filter()),
        _ => Filter(
            exprs
                .iter()
                .map(|expr| format!("({})", expr.filter()))
                .collect::<Vec<_>>()
                .join(sep),
        ),
    }
}
