use chrono::{DateTime, Utc};

use crate::domain::validation::ValidationError;

/// Check pagination bounds: `limit > 0`, `offset >= 0`, `orderDirection`
/// exactly `ASC` or `DESC`. Each check only applies when the value is
/// provided.
pub fn validate_pagination(
    limit: Option<i64>,
    offset: Option<i64>,
    order_direction: Option<&str>,
) -> Result<(), ValidationError> {
    if let Some(limit) = limit {
        if limit <= 0 {
            return Err(ValidationError::LimitNotPositive { actual: limit });
        }
    }

    if let Some(offset) = offset {
        if offset < 0 {
            return Err(ValidationError::OffsetNegative { actual: offset });
        }
    }

    if let Some(direction) = order_direction {
        if direction != "ASC" && direction != "DESC" {
            return Err(ValidationError::InvalidOrderDirection {
                actual: direction.to_owned(),
            });
        }
    }

    Ok(())
}

/// Check a `dateFrom`/`dateTo` pair: both-or-neither, neither later than
/// the current instant, and `dateFrom <= dateTo`.
pub fn validate_date_range(
    date_from: Option<DateTime<Utc>>,
    date_to: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    let (from, to) = match (date_from, date_to) {
        (None, None) => return Ok(()),
        (Some(from), Some(to)) => (from, to),
        _ => return Err(ValidationError::OneSidedDateRange),
    };

    let now = Utc::now();
    if from > now {
        return Err(ValidationError::DateInFuture { field: "dateFrom" });
    }
    if to > now {
        return Err(ValidationError::DateInFuture { field: "dateTo" });
    }
    if from > to {
        return Err(ValidationError::DateRangeInverted);
    }

    Ok(())
}

/// Numeric identifiers passed as path or body params must be `>= 1`.
pub fn validate_positive_id(field: &'static str, id: i64) -> Result<(), ValidationError> {
    if id < 1 {
        return Err(ValidationError::NotPositive { field, actual: id });
    }
    Ok(())
}

/// Batch operations reject empty collection arguments before any request
/// is built.
pub fn validate_non_empty<T>(field: &'static str, items: &[T]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}
