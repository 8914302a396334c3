//! Identifier translation
//!
//! The domain model identifies resources with opaque strings, the v4 API
//! with non-negative integers. Every operation translates its inputs here
//! before building any parameter, so a malformed identifier never reaches
//! the wire.

use gandi_hosting::{HostingError, Result};

/// Wire id of a resource the operation cannot work without.
///
/// An empty id is a validation error, anything but decimal digits a parse
/// error.
pub fn required_id(
    operation: &'static str,
    resource: &'static str,
    field: &'static str,
    id: &str,
) -> Result<i64> {
    if id.is_empty() {
        return Err(HostingError::missing(operation, resource, field));
    }
    to_wire_id(resource, field, id)
}

/// Wire id of a filter criterion; empty means "no restriction"
pub fn optional_id(resource: &'static str, field: &'static str, id: &str) -> Result<Option<i64>> {
    if id.is_empty() {
        return Ok(None);
    }
    to_wire_id(resource, field, id).map(Some)
}

pub fn to_wire_id(resource: &'static str, field: &'static str, id: &str) -> Result<i64> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HostingError::parse(format!("{resource}.{field}"), id));
    }
    id.parse::<i64>()
        .map_err(|_| HostingError::parse(format!("{resource}.{field}"), id))
}

pub fn to_domain_id(id: i64) -> String {
    id.to_string()
}

/// Domain id of a reference the wire leaves at 0 when unset
pub fn to_optional_domain_id(id: i64) -> String {
    if id == 0 { String::new() } else { to_domain_id(id) }
}
