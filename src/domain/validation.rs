use std::fmt;

use crate::domain::schema::ValueType;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    NotPositive {
        field: &'static str,
        actual: i64,
    },
    LimitNotPositive {
        actual: i64,
    },
    OffsetNegative {
        actual: i64,
    },
    InvalidOrderDirection {
        actual: String,
    },
    OneSidedDateRange,
    DateInFuture {
        field: &'static str,
    },
    DateRangeInverted,
    UnknownField {
        schema: &'static str,
        field: String,
    },
    MissingField {
        schema: &'static str,
        field: &'static str,
    },
    InvalidType {
        schema: &'static str,
        field: &'static str,
        expected: &'static [ValueType],
        actual: &'static str,
    },
    InvalidValue {
        schema: &'static str,
        field: &'static str,
        constraint: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::NotPositive { field, actual } => {
                write!(f, "{field} must be greater than 0 (got {actual})")
            }
            Self::LimitNotPositive { actual } => {
                write!(f, "limit must be greater than 0 (got {actual})")
            }
            Self::OffsetNegative { actual } => {
                write!(f, "offset must be greater or equal 0 (got {actual})")
            }
            Self::InvalidOrderDirection { actual } => {
                write!(f, "orderDirection must be 'ASC' or 'DESC' (got '{actual}')")
            }
            Self::OneSidedDateRange => {
                write!(f, "dateFrom and dateTo must be provided together")
            }
            Self::DateInFuture { field } => {
                write!(f, "{field} must not be later than the current instant")
            }
            Self::DateRangeInverted => {
                write!(f, "dateFrom must not be later than dateTo")
            }
            Self::UnknownField { schema, field } => {
                write!(f, "{schema}: unknown field '{field}'")
            }
            Self::MissingField { schema, field } => {
                write!(f, "{schema}: required field '{field}' is missing")
            }
            Self::InvalidType {
                schema,
                field,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "{schema}: field '{field}' has type {actual}, expected one of {expected:?}"
                )
            }
            Self::InvalidValue {
                schema,
                field,
                constraint,
            } => {
                write!(f, "{schema}: field '{field}' is invalid: {constraint}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
