//! Student record types.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;
use crate::validation::Field;

/// Identifier of a stored record.
///
/// Always held in one canonical text form. Older blobs carry the id as a JSON
/// number for records that were never edited and as a string for edited
/// ones; both deserialize to the same `RecordId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    /// Id built from a creation sequence number.
    #[must_use]
    pub fn from_sequence(value: u64) -> Self {
        Self(value.to_string())
    }

    pub(crate) fn from_token(token: String) -> Self {
        Self(token)
    }

    /// The canonical text form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the id, if it is a plain decimal number.
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_input("record id must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = RecordId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a record id as a string or an integer")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RecordId, E> {
                Ok(RecordId::from_sequence(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RecordId, E> {
                Ok(RecordId(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<RecordId, E> {
                // Integral floats like 1.7e12 print without a fraction
                Ok(RecordId(v.to_string()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RecordId, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Field values submitted through the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordData {
    /// Student name.
    pub name: String,
    /// University identifier.
    pub uid: String,
    /// Email address.
    pub email: String,
    /// Contact number.
    pub contact: String,
}

impl RecordData {
    /// Value of one field.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Uid => &self.uid,
            Field::Email => &self.email,
            Field::Contact => &self.contact,
        }
    }

    /// Replace one field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Uid => self.uid = value,
            Field::Email => self.email = value,
            Field::Contact => self.contact = value,
        }
    }

    /// Copy with surrounding whitespace removed from every field.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            uid: self.uid.trim().to_string(),
            email: self.email.trim().to_string(),
            contact: self.contact.trim().to_string(),
        }
    }
}

/// One stored student entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique id assigned by the store.
    pub id: RecordId,
    /// Field values.
    #[serde(flatten)]
    pub data: RecordData,
}

impl Record {
    /// Create a record from an id and field values.
    #[must_use]
    pub fn new(id: RecordId, data: RecordData) -> Self {
        Self { id, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> RecordData {
        RecordData {
            name: "Ann Lee".to_string(),
            uid: "101".to_string(),
            email: "a@b.co".to_string(),
            contact: "1234567890".to_string(),
        }
    }

    #[test]
    fn test_id_from_number_and_string_compare_equal() {
        let from_number: RecordId = serde_json::from_str("1700000000000").unwrap();
        let from_string: RecordId = serde_json::from_str("\"1700000000000\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.sequence(), Some(1_700_000_000_000));
    }

    #[test]
    fn test_id_parse_trims() {
        let id: RecordId = " 42 ".parse().unwrap();
        assert_eq!(id.as_str(), "42");
        assert!("   ".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = RecordId::from_sequence(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }

    #[test]
    fn test_record_json_layout_is_flat() {
        let record = Record::new(RecordId::from_sequence(1), ann());
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["id"], "1");
        assert_eq!(value["name"], "Ann Lee");
        assert_eq!(value["uid"], "101");
        assert_eq!(value["email"], "a@b.co");
        assert_eq!(value["contact"], "1234567890");
    }

    #[test]
    fn test_record_reads_legacy_numeric_id() {
        let json = r#"{"id":1700000000000,"name":"Ann Lee","uid":"101","email":"a@b.co","contact":"1234567890"}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id.as_str(), "1700000000000");
        assert_eq!(record.data, ann());
    }

    #[test]
    fn test_get_and_set_fields() {
        let mut data = RecordData::default();
        for field in Field::ALL {
            data.set(field, format!("{field}-value"));
        }
        assert_eq!(data.get(Field::Email), "email-value");
        assert_eq!(data.contact, "contact-value");
    }

    #[test]
    fn test_trimmed() {
        let data = RecordData {
            name: "  Ann Lee ".to_string(),
            ..ann()
        };
        assert_eq!(data.trimmed(), ann());
    }
}
