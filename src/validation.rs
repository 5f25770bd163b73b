//! # Field Validation
//!
//! Field-level checks for secret payloads.
//!
//! Every failing field produces one [`FieldError`]. The errors of a request
//! are collected in an [`ErrorList`] and reported together through
//! [`ErrorList::to_aggregate`].

use crate::constants::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use store::Secret;

static DNS_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[a-z0-9]([-a-z0-9]*[a-z0-9])?$")
        .expect("Failed to compile DNS label pattern - this should never happen")
});

const DNS_LABEL_DETAIL: &str = "a lowercase RFC 1123 label must consist of lower case alphanumeric characters or '-', and must start and end with an alphanumeric character";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Required {
        path: String,
    },
    Invalid {
        path: String,
        value: String,
        detail: String,
    },
    TooLong {
        path: String,
        max: usize,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required { path } => write!(f, "{path}: Required value"),
            FieldError::Invalid {
                path,
                value,
                detail,
            } => write!(f, "{path}: Invalid value: {value:?}: {detail}"),
            FieldError::TooLong { path, max } => {
                write!(f, "{path}: Too long: must have at most {max} characters")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorList(Vec<FieldError>);

impl ErrorList {
    pub fn push(&mut self, err: FieldError) {
        self.0.push(err);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// One message for the whole list, `None` when nothing failed
    #[must_use]
    pub fn to_aggregate(&self) -> Option<String> {
        match self.0.as_slice() {
            [] => None,
            [only] => Some(only.to_string()),
            errs => {
                let joined = errs
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(format!("[{joined}]"))
            }
        }
    }
}

/// Check a secret as submitted for creation
#[must_use]
pub fn validate_secret(secret: &Secret) -> ErrorList {
    let mut errs = ErrorList::default();
    validate_name(&secret.metadata.name, &mut errs);
    validate_mutable_fields(secret, &mut errs);
    errs
}

/// Check only the fields an update may change
#[must_use]
pub fn validate_secret_update(secret: &Secret) -> ErrorList {
    let mut errs = ErrorList::default();
    validate_mutable_fields(secret, &mut errs);
    errs
}

fn validate_name(name: &str, errs: &mut ErrorList) {
    let path = "metadata.name";
    if name.is_empty() {
        errs.push(FieldError::Required {
            path: path.to_string(),
        });
        return;
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        errs.push(FieldError::TooLong {
            path: path.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }
    if !DNS_LABEL.is_match(name) {
        errs.push(FieldError::Invalid {
            path: path.to_string(),
            value: name.to_string(),
            detail: DNS_LABEL_DETAIL.to_string(),
        });
    }
}

fn validate_mutable_fields(secret: &Secret, errs: &mut ErrorList) {
    if secret.description.chars().count() > MAX_DESCRIPTION_LENGTH {
        errs.push(FieldError::TooLong {
            path: "description".to_string(),
            max: MAX_DESCRIPTION_LENGTH,
        });
    }
    if secret.expires < 0 {
        errs.push(FieldError::Invalid {
            path: "expires".to_string(),
            value: secret.expires.to_string(),
            detail: "must be greater than or equal to 0".to_string(),
        });
    }
}
