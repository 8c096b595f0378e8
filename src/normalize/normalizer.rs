//! Normalization of raw page responses

use super::types::{PageRecord, RawPageResponse};
use crate::error::PageError;
use crate::types::JsonValue;
use serde::de::DeserializeOwned;

/// Normalize a raw response into a page record
///
/// `data`, `perPage`, `lastPage` and `currentPage` are required and the
/// numeric fields must be positive. A missing `total` becomes
/// `perPage * lastPage`.
pub fn normalize<T>(raw: RawPageResponse<T>) -> Result<PageRecord<T>, PageError> {
    let data = raw
        .data
        .ok_or_else(|| PageError::validation("data", "missing from response"))?;
    let per_page = positive_u32("perPage", raw.per_page)?;
    let last_page = positive_u32("lastPage", raw.last_page)?;
    let current_page = positive_u32("currentPage", raw.current_page)?;

    let total = match raw.total {
        Some(total) => u64::try_from(total).map_err(|_| {
            PageError::validation("total", format!("must not be negative, got {total}"))
        })?,
        None => u64::from(per_page) * u64::from(last_page),
    };

    Ok(PageRecord {
        data,
        per_page,
        last_page,
        current_page,
        total,
    })
}

/// Deserialize and normalize a raw JSON response
///
/// Shape errors (not an object, wrongly typed fields) are reported as
/// validation errors on the `response` field.
pub fn normalize_value<T: DeserializeOwned>(value: JsonValue) -> Result<PageRecord<T>, PageError> {
    if !value.is_object() {
        return Err(PageError::validation("response", "expected a JSON object"));
    }

    let raw: RawPageResponse<T> = serde_json::from_value(value)
        .map_err(|e| PageError::validation("response", e.to_string()))?;

    normalize(raw)
}

fn positive_u32(field: &str, value: Option<i64>) -> Result<u32, PageError> {
    let value = value.ok_or_else(|| PageError::validation(field, "missing from response"))?;
    if value < 1 {
        return Err(PageError::validation(
            field,
            format!("must be a positive integer, got {value}"),
        ));
    }
    u32::try_from(value)
        .map_err(|_| PageError::validation(field, format!("out of range, got {value}")))
}
