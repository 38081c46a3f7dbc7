//! Decoded ASTERIX records.
//!
//! Responsibilities:
//! - `PropertyStore`: typed, tag-keyed storage with kind checking
//! - `AsterixMessage`: one decoded record plus its decode context
//! - Lazy decoding of the special purpose field for project-specific layouts

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::item::{self, Field, Uap};
use crate::property::{Property, PropertyKind, Value};
use crate::spf;
use crate::types::{AsterixError, Result};
use crate::version::Version;

// ---------------------------------------------------------------------------
// Typed access
// ---------------------------------------------------------------------------

/// Rust types that map onto an integer property kind.
pub trait PropertyValue: Sized {
    const KIND: PropertyKind;

    fn from_value(value: &Value) -> Option<Self>;
    fn into_value(self) -> Value;
}

macro_rules! impl_property_value {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl PropertyValue for $t {
                const KIND: PropertyKind = PropertyKind::$variant;

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(*v),
                        _ => None,
                    }
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

impl_property_value!(u8 => U8, i8 => I8, u16 => U16, i16 => I16, u32 => U32, i32 => I32);

// ---------------------------------------------------------------------------
// Property store
// ---------------------------------------------------------------------------

/// Tag-keyed property values for one record.
///
/// Each tag is stored under its canonical kind; reads and writes with any
/// other kind fail with `WrongPropertyType`. Iteration order is by tag code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyStore {
    values: BTreeMap<Property, Value>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(prop: Property, requested: PropertyKind) -> Result<()> {
        if prop.kind() != requested {
            return Err(AsterixError::WrongPropertyType {
                property: prop,
                expected: prop.kind(),
                requested,
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, prop: Property) -> bool {
        self.values.contains_key(&prop)
    }

    pub fn value(&self, prop: Property) -> Option<&Value> {
        self.values.get(&prop)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, &Value)> {
        self.values.iter().map(|(p, v)| (*p, v))
    }

    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        self.values.keys().copied()
    }

    pub fn remove(&mut self, prop: Property) -> Option<Value> {
        self.values.remove(&prop)
    }

    /// Store a value whose kind must match the tag's canonical kind.
    pub fn set_value(&mut self, prop: Property, value: Value) -> Result<()> {
        Self::check(prop, value.kind())?;
        self.values.insert(prop, value);
        Ok(())
    }

    pub fn get<T: PropertyValue>(&self, prop: Property) -> Result<T> {
        Self::check(prop, T::KIND)?;
        self.values
            .get(&prop)
            .and_then(T::from_value)
            .ok_or(AsterixError::PropertyNotPresent(prop))
    }

    pub fn set<T: PropertyValue>(&mut self, prop: Property, value: T) -> Result<()> {
        self.set_value(prop, value.into_value())
    }

    /// Any integer property widened to i64.
    pub fn get_int(&self, prop: Property) -> Result<i64> {
        if !prop.kind().is_integer() {
            return Err(AsterixError::WrongPropertyType {
                property: prop,
                expected: prop.kind(),
                requested: PropertyKind::I32,
            });
        }
        self.values
            .get(&prop)
            .and_then(Value::as_i64)
            .ok_or(AsterixError::PropertyNotPresent(prop))
    }

    /// Store a raw wire integer under the tag's canonical kind.
    pub(crate) fn set_raw(&mut self, prop: Property, raw: i64) -> Result<()> {
        let value = Value::from_raw(prop.kind(), raw)
            .ok_or(AsterixError::invalid("value out of range for property"))?;
        self.values.insert(prop, value);
        Ok(())
    }

    pub fn get_text(&self, prop: Property) -> Result<&str> {
        Self::check(prop, PropertyKind::Text)?;
        match self.values.get(&prop) {
            Some(Value::Text(s)) => Ok(s),
            _ => Err(AsterixError::PropertyNotPresent(prop)),
        }
    }

    pub fn set_text(&mut self, prop: Property, text: impl Into<String>) -> Result<()> {
        self.set_value(prop, Value::Text(text.into()))
    }

    pub fn get_data(&self, prop: Property) -> Result<&[u8]> {
        Self::check(prop, PropertyKind::Data)?;
        match self.values.get(&prop) {
            Some(Value::Data(d)) => Ok(d),
            _ => Err(AsterixError::PropertyNotPresent(prop)),
        }
    }

    pub fn set_data(&mut self, prop: Property, data: impl Into<Vec<u8>>) -> Result<()> {
        self.set_value(prop, Value::Data(data.into()))
    }

    /// Bytes held by a blob property.
    pub fn data_size(&self, prop: Property) -> Result<usize> {
        Ok(self.get_data(prop)?.len())
    }

    /// `len` bytes of a blob starting at `offset`.
    pub fn get_data_at(&self, prop: Property, offset: usize, len: usize) -> Result<&[u8]> {
        let data = self.get_data(prop)?;
        let end = offset.checked_add(len).unwrap_or(usize::MAX);
        data.get(offset..end).ok_or(AsterixError::Truncated {
            needed: end,
            remaining: data.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// Decoded message
// ---------------------------------------------------------------------------

/// One decoded record.
#[derive(Clone, Serialize)]
pub struct AsterixMessage {
    category: u8,
    version: Version,
    project_code: u32,
    uap_code: u32,
    partial: bool,
    properties: PropertyStore,
    #[serde(skip)]
    uap: Uap,
    #[serde(skip)]
    spf: OnceCell<Option<PropertyStore>>,
}

impl fmt::Debug for AsterixMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsterixMessage")
            .field("category", &self.category)
            .field("version", &self.version)
            .field("partial", &self.partial)
            .field("properties", &self.properties)
            .finish()
    }
}

impl AsterixMessage {
    /// An empty message with no item table attached.
    pub fn new(category: u8, version: Version) -> Self {
        AsterixMessage {
            category,
            version,
            project_code: 0,
            uap_code: 0,
            partial: false,
            properties: PropertyStore::new(),
            uap: &[],
            spf: OnceCell::new(),
        }
    }

    pub(crate) fn with_context(
        category: u8,
        version: Version,
        project_code: u32,
        uap_code: u32,
        uap: Uap,
    ) -> Self {
        AsterixMessage {
            project_code,
            uap_code,
            uap,
            ..AsterixMessage::new(category, version)
        }
    }

    pub fn category(&self) -> u8 {
        self.category
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn project_code(&self) -> u32 {
        self.project_code
    }

    pub fn uap_code(&self) -> u32 {
        self.uap_code
    }

    /// Item table the record was decoded with.
    pub fn uap(&self) -> Uap {
        self.uap
    }

    /// True when at least one item failed to decode in permissive mode.
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    /// Same as `is_partial`: the record should not be trusted downstream.
    pub fn is_nogo(&self) -> bool {
        self.partial
    }

    pub(crate) fn mark_partial(&mut self) {
        self.partial = true;
    }

    pub fn store(&self) -> &PropertyStore {
        &self.properties
    }

    pub(crate) fn store_mut(&mut self) -> &mut PropertyStore {
        self.spf = OnceCell::new();
        &mut self.properties
    }

    pub fn contains(&self, prop: Property) -> bool {
        if self.properties.contains(prop) {
            return true;
        }
        prop.is_spf_p466() && self.spf_store().is_some_and(|s| s.contains(prop))
    }

    /// Tags present in the main store, in code order.
    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        self.properties.properties()
    }

    /// Store a property in the main store.
    pub fn set<T: PropertyValue>(&mut self, prop: Property, value: T) -> Result<()> {
        self.store_mut().set(prop, value)
    }

    pub fn set_text(&mut self, prop: Property, text: impl Into<String>) -> Result<()> {
        self.store_mut().set_text(prop, text)
    }

    pub fn set_data(&mut self, prop: Property, data: impl Into<Vec<u8>>) -> Result<()> {
        self.store_mut().set_data(prop, data)
    }

    fn lookup(&self, prop: Property) -> &PropertyStore {
        if prop.is_spf_p466() && !self.properties.contains(prop) {
            if let Some(spf) = self.spf_store() {
                return spf;
            }
        }
        &self.properties
    }

    pub fn get<T: PropertyValue>(&self, prop: Property) -> Result<T> {
        self.lookup(prop).get(prop)
    }

    pub fn get_int(&self, prop: Property) -> Result<i64> {
        self.lookup(prop).get_int(prop)
    }

    pub fn get_text(&self, prop: Property) -> Result<&str> {
        self.lookup(prop).get_text(prop)
    }

    pub fn get_data(&self, prop: Property) -> Result<&[u8]> {
        self.lookup(prop).get_data(prop)
    }

    pub fn get_data_at(&self, prop: Property, offset: usize, len: usize) -> Result<&[u8]> {
        self.lookup(prop).get_data_at(prop, offset, len)
    }

    pub fn data_size(&self, prop: Property) -> Result<usize> {
        self.lookup(prop).data_size(prop)
    }

    /// Properties decoded from the special purpose field.
    ///
    /// Decoded on first access when the project code selects a known
    /// layout; `None` if there is no SPF or the layout is unknown.
    pub fn spf_store(&self) -> Option<&PropertyStore> {
        self.spf
            .get_or_init(|| {
                let data = self.properties.get_data(Property::Spf).ok()?;
                match spf::decode(self.project_code, data) {
                    Ok(store) => store,
                    Err(e) => {
                        log::debug!(
                            "CAT{:03} SPF for project {} not decoded: {e}",
                            self.category,
                            self.project_code
                        );
                        None
                    }
                }
            })
            .as_ref()
    }

    /// Table field describing `prop`, searched through the record's item
    /// table and the SPF layout.
    pub fn field(&self, prop: Property) -> Option<&'static Field> {
        item::find_field(self.uap, prop).or_else(|| {
            spf::layout(self.project_code).and_then(|uap| item::find_field(uap, prop))
        })
    }

    /// Property value scaled to its physical unit (metres, metres/second,
    /// degrees, seconds, or flight levels), per the item table.
    pub fn scaled(&self, prop: Property) -> Option<f64> {
        let raw = self.get_int(prop).ok()?;
        self.field(prop)?.unit.apply(raw)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn msg() -> AsterixMessage {
        AsterixMessage::new(48, Version::new(1, 31))
    }

    #[test]
    fn test_typed_round_trip() {
        let mut m = msg();
        m.set(Property::TrackNumber, 42u16).unwrap();
        m.set(Property::CalcPosX, -5i16).unwrap();
        assert_eq!(m.get::<u16>(Property::TrackNumber).unwrap(), 42);
        assert_eq!(m.get::<i16>(Property::CalcPosX).unwrap(), -5);
        assert_eq!(m.get_int(Property::CalcPosX).unwrap(), -5);
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let mut m = msg();
        m.set(Property::TrackNumber, 42u16).unwrap();
        assert!(matches!(
            m.get::<u32>(Property::TrackNumber),
            Err(AsterixError::WrongPropertyType {
                expected: PropertyKind::U16,
                requested: PropertyKind::U32,
                ..
            })
        ));
        assert!(m.set(Property::TrackNumber, 1u8).is_err());
        assert!(m.get_text(Property::TrackNumber).is_err());
    }

    #[test]
    fn test_missing_is_not_present() {
        let m = msg();
        assert!(matches!(
            m.get::<u8>(Property::Sac),
            Err(AsterixError::PropertyNotPresent(Property::Sac))
        ));
        assert!(!m.contains(Property::Sac));
    }

    #[test]
    fn test_text_and_data() {
        let mut m = msg();
        m.set_text(Property::AircraftId, "BAW123").unwrap();
        m.set_data(Property::ModeSMbData, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(m.get_text(Property::AircraftId).unwrap(), "BAW123");
        assert_eq!(m.data_size(Property::ModeSMbData).unwrap(), 4);
        assert_eq!(
            m.get_data_at(Property::ModeSMbData, 1, 2).unwrap(),
            &[2, 3]
        );
        assert!(m.get_data_at(Property::ModeSMbData, 3, 2).is_err());
    }

    #[test]
    fn test_properties_in_code_order() {
        let mut m = msg();
        m.set(Property::TrackNumber, 7u16).unwrap();
        m.set(Property::Sac, 1u8).unwrap();
        m.set(Property::Sic, 2u8).unwrap();
        let props: Vec<_> = m.properties().collect();
        assert_eq!(props, vec![Property::Sac, Property::Sic, Property::TrackNumber]);
    }

    #[test]
    fn test_store_serializes_by_name() {
        let mut s = PropertyStore::new();
        s.set(Property::Sac, 1u8).unwrap();
        s.set_text(Property::AircraftId, "KLM1023").unwrap();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"Sac":1,"AircraftId":"KLM1023"}"#);
    }
}
