//! Field selectors
//!
//! Kubernetes-style selector strings used by list calls:
//! `name=foo`, `name==foo`, `name!=foo`, terms joined by `,`.
//! A backslash escapes `\`, `,`, `=` and `!` inside fields and values.
//! The empty string selects everything.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("invalid selector: '{selector}'; can't understand '{term}'")]
    InvalidTerm { selector: String, term: String },
    #[error("invalid escape sequence '{0}' in selector")]
    InvalidEscape(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    DoubleEquals,
    NotEquals,
}

impl Operator {
    fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::DoubleEquals => "==",
            Operator::NotEquals => "!=",
        }
    }
}

// Longest tokens first so `==` is not read as `=` followed by `=value`
const OPERATORS: [(&str, Operator); 3] = [
    ("!=", Operator::NotEquals),
    ("==", Operator::DoubleEquals),
    ("=", Operator::Equals),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub field: String,
    pub operator: Operator,
    pub value: String,
}

/// A parsed selector: every requirement must hold
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    requirements: Vec<Requirement>,
}

impl Selector {
    #[must_use]
    pub fn everything() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    #[must_use]
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Value of the first `field=value` or `field==value` term, if any
    #[must_use]
    pub fn requires_exact_match(&self, field: &str) -> Option<&str> {
        self.requirements
            .iter()
            .find(|r| {
                r.field == field
                    && matches!(r.operator, Operator::Equals | Operator::DoubleEquals)
            })
            .map(|r| r.value.as_str())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.requirements.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(
                f,
                "{}{}{}",
                escape(&r.field),
                r.operator.as_str(),
                escape(&r.value)
            )?;
        }
        Ok(())
    }
}

/// Parse a selector string
///
/// # Errors
///
/// Returns [`SelectorError`] when a term has no operator, an empty field, or
/// an unknown escape sequence.
pub fn parse_selector(selector: &str) -> Result<Selector, SelectorError> {
    let mut requirements = Vec::new();

    for term in split_terms(selector) {
        if term.is_empty() {
            continue;
        }

        let invalid = || SelectorError::InvalidTerm {
            selector: selector.to_string(),
            term: term.to_string(),
        };

        let (field, operator, value) = split_term(term).ok_or_else(invalid)?;
        let field = unescape(field.trim())?;
        if field.is_empty() {
            return Err(invalid());
        }

        requirements.push(Requirement {
            field,
            operator,
            value: unescape(value)?,
        });
    }

    Ok(Selector { requirements })
}

fn split_terms(selector: &str) -> Vec<&str> {
    let mut terms = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in selector.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            ',' => {
                terms.push(&selector[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    terms.push(&selector[start..]);
    terms
}

fn split_term(term: &str) -> Option<(&str, Operator, &str)> {
    let mut escaped = false;

    for (i, c) in term.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        let rest = &term[i..];
        for (token, operator) in OPERATORS {
            if rest.starts_with(token) {
                return Some((&term[..i], operator, &term[i + token.len()..]));
            }
        }
    }
    None
}

fn unescape(raw: &str) -> Result<String, SelectorError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ ('\\' | ',' | '=' | '!')) => out.push(next),
            Some(next) => return Err(SelectorError::InvalidEscape(format!("\\{next}"))),
            None => return Err(SelectorError::InvalidEscape("\\".to_string())),
        }
    }
    Ok(out)
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | ',' | '=' | '!') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
