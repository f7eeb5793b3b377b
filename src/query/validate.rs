//! Parameter validators
//!
//! Each validator returns the canonical value to send. When a field catalog
//! is supplied, names are also checked against it.

use crate::error::{Error, Result};
use crate::fields::FieldMap;
use crate::types::SortDirection;
use chrono::{NaiveDate, NaiveDateTime};

/// Split a comma list, trimming entries and dropping blanks
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_names(param: &str, names: &[String], catalog: Option<&FieldMap>) -> Result<String> {
    let names: Vec<&str> = names
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if names.is_empty() {
        return Err(Error::invalid_argument(param));
    }

    if let Some(fields) = catalog {
        for name in &names {
            if !fields.contains_key(*name) {
                return Err(Error::validation(param, format!("'{name}'")));
            }
        }
    }

    Ok(names.join(","))
}

/// Validate the `fields` list, returning it comma-joined
pub fn validate_fields(fields: &[String], catalog: Option<&FieldMap>) -> Result<String> {
    validate_names("fields", fields, catalog)
}

/// Validate the `group` list, returning it comma-joined
pub fn validate_group(group: &[String], catalog: Option<&FieldMap>) -> Result<String> {
    validate_names("group", group, catalog)
}

/// Validate sort entries, parsing each direction
pub fn validate_sort(
    sort: &[(String, String)],
    catalog: Option<&FieldMap>,
) -> Result<Vec<(String, SortDirection)>> {
    sort.iter()
        .map(|(field, direction)| {
            let field = field.trim();
            if field.is_empty() {
                return Err(Error::invalid_argument("sort"));
            }
            let direction: SortDirection = direction.parse()?;
            if let Some(fields) = catalog {
                if !fields.contains_key(field) {
                    return Err(Error::validation("sort", format!("'{field}'")));
                }
            }
            Ok((field.to_string(), direction))
        })
        .collect()
}

/// Accept `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`
pub fn validate_datetime(param: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::invalid_argument(param));
    }

    let date_ok = NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
    let datetime_ok = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").is_ok();
    if date_ok || datetime_ok {
        Ok(value.to_string())
    } else {
        Err(Error::validation(param, format!("'{value}'")))
    }
}
