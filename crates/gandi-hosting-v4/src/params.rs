//! Sparse wire parameter sets
//!
//! The v4 API cannot tell an omitted field from one set to its zero value,
//! and a zero sent for an optional field overrides the platform default.
//! Specs and filters are therefore marshaled into a [`ParamSet`] holding
//! only the fields whose value is not zero.
//!
//! The flip side is that a field cannot be explicitly set to zero through a
//! spec or filter. Update calls, which must send exactly what the caller
//! asked for, use [`ParamSet::insert`] instead.

use gandi_hosting::Result;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Field names recognised by the v4 API
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WireField {
    Id,
    DatacenterId,
    Hostname,
    Farm,
    Memory,
    Cores,
    State,
    Keys,
    Login,
    Password,
    IpVersion,
    Bandwidth,
    SysDiskId,
    IfaceId,
    Name,
    Size,
    VmId,
    Version,
    Ip,
    Gateway,
    Subnet,
    Value,
    Label,
    DcCode,
    Position,
}

impl WireField {
    pub fn as_str(&self) -> &'static str {
        match self {
            WireField::Id => "id",
            WireField::DatacenterId => "datacenter_id",
            WireField::Hostname => "hostname",
            WireField::Farm => "farm",
            WireField::Memory => "memory",
            WireField::Cores => "cores",
            WireField::State => "state",
            WireField::Keys => "keys",
            WireField::Login => "login",
            WireField::Password => "password",
            WireField::IpVersion => "ip_version",
            WireField::Bandwidth => "bandwidth",
            WireField::SysDiskId => "sys_disk_id",
            WireField::IfaceId => "iface_id",
            WireField::Name => "name",
            WireField::Size => "size",
            WireField::VmId => "vm_id",
            WireField::Version => "version",
            WireField::Ip => "ip",
            WireField::Gateway => "gateway",
            WireField::Subnet => "subnet",
            WireField::Value => "value",
            WireField::Label => "label",
            WireField::DcCode => "dc_code",
            WireField::Position => "position",
        }
    }
}

impl std::fmt::Display for WireField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that can be placed in a parameter set
pub trait WireValue {
    /// True for the zero value of the type, which is never sent
    fn is_zero(&self) -> bool;

    fn to_wire(&self) -> Value;
}

impl WireValue for i64 {
    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn to_wire(&self) -> Value {
        Value::from(*self)
    }
}

impl WireValue for u32 {
    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn to_wire(&self) -> Value {
        Value::from(*self)
    }
}

impl WireValue for u64 {
    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn to_wire(&self) -> Value {
        Value::from(*self)
    }
}

impl WireValue for f64 {
    fn is_zero(&self) -> bool {
        *self == 0.0
    }

    fn to_wire(&self) -> Value {
        Value::from(*self)
    }
}

impl WireValue for str {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_wire(&self) -> Value {
        Value::from(self)
    }
}

impl WireValue for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_wire(&self) -> Value {
        Value::from(self.as_str())
    }
}

impl<T: WireValue> WireValue for [T] {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_wire(&self) -> Value {
        Value::Array(self.iter().map(WireValue::to_wire).collect())
    }
}

impl<T: WireValue> WireValue for Vec<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_wire(&self) -> Value {
        self.as_slice().to_wire()
    }
}

impl<T: WireValue> WireValue for Option<T> {
    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn to_wire(&self) -> Value {
        self.as_ref().map_or(Value::Null, WireValue::to_wire)
    }
}

impl<T: WireValue + ?Sized> WireValue for &T {
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn to_wire(&self) -> Value {
        (**self).to_wire()
    }
}

/// Keyword parameters of a v4 call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSet {
    fields: BTreeMap<WireField, Value>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field` unless `value` is zero
    pub fn set<V: WireValue + ?Sized>(&mut self, field: WireField, value: &V) -> &mut Self {
        if !value.is_zero() {
            self.fields.insert(field, value.to_wire());
        }
        self
    }

    /// Builder form of [`ParamSet::set`]
    pub fn with<V: WireValue + ?Sized>(mut self, field: WireField, value: &V) -> Self {
        self.set(field, value);
        self
    }

    /// Sets `field` even when `value` is zero
    pub fn insert(&mut self, field: WireField, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(field, value.into());
        self
    }

    pub fn get(&self, field: WireField) -> Option<&Value> {
        self.fields.get(&field)
    }

    pub fn contains(&self, field: WireField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = WireField> + '_ {
        self.fields.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Debug builds panic when a field outside `allowed` was set
    pub fn debug_assert_within(&self, allowed: &[WireField]) {
        debug_assert!(
            self.fields().all(|field| allowed.contains(&field)),
            "{:?} is not within {allowed:?}",
            self.fields().collect::<Vec<_>>()
        );
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl From<ParamSet> for Value {
    fn from(params: ParamSet) -> Self {
        let map: Map<String, Value> = params
            .fields
            .into_iter()
            .map(|(field, value)| (field.as_str().to_string(), value))
            .collect();
        Value::Object(map)
    }
}

/// Domain values marshaled into a sparse parameter set
pub trait ToParams {
    /// Every field the marshaled set may contain
    const FIELDS: &'static [WireField];

    /// Builds the set, skipping zero values
    fn marshal(&self) -> Result<ParamSet>;

    fn to_params(&self) -> Result<ParamSet> {
        let params = self.marshal()?;
        params.debug_assert_within(Self::FIELDS);
        Ok(params)
    }
}

/// Positional arguments of a list call: the filter, or nothing when the
/// filter is empty
pub fn list_args(filter: ParamSet) -> Vec<Value> {
    if filter.is_empty() {
        Vec::new()
    } else {
        vec![filter.into_value()]
    }
}
