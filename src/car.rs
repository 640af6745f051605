//! Car domain record, payload, and patch types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{Bhp, CarId};

/// Server-acknowledged car record.
///
/// Fields the client does not know about are kept in [`CarRecord::extra`] and
/// survive updates untouched. On the wire the id is `_id`; a bare `id` is
/// accepted when `_id` is absent and kept in `extra` when both are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireCar")]
pub struct CarRecord {
    /// Server-assigned identifier, `_id` on the wire.
    #[serde(rename = "_id")]
    pub id: CarId,
    /// Manufacturer text, passed through as entered.
    pub make: String,
    /// Brake horsepower.
    pub bhp: Bhp,
    /// Any other fields the server attached.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct WireCar {
    #[serde(rename = "_id")]
    oid: Option<Value>,
    id: Option<Value>,
    make: String,
    bhp: Bhp,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<WireCar> for CarRecord {
    type Error = String;

    fn try_from(wire: WireCar) -> Result<Self, Self::Error> {
        let WireCar {
            oid,
            id,
            make,
            bhp,
            mut extra,
        } = wire;
        let id = match (oid, id) {
            (Some(oid), alt) => {
                if let Some(alt) = alt {
                    extra.insert("id".to_string(), alt);
                }
                id_text(oid)?
            }
            (None, Some(alt)) => id_text(alt)?,
            (None, None) => return Err("missing field `_id`".to_string()),
        };
        Ok(Self {
            id,
            make,
            bhp,
            extra,
        })
    }
}

fn id_text(value: Value) -> Result<CarId, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("car id must be a string or number, got {other}")),
    }
}

impl CarRecord {
    /// Builds a record with no server-added fields.
    pub fn new(id: impl Into<CarId>, make: impl Into<String>, bhp: Bhp) -> Self {
        Self {
            id: id.into(),
            make: make.into(),
            bhp,
            extra: Map::new(),
        }
    }
}

/// Create/update payload sent to the collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarDraft {
    /// Manufacturer text.
    pub make: String,
    /// Brake horsepower.
    pub bhp: Bhp,
}

/// Sparse patch where each `Some` field overwrites the record value.
///
/// A patch never carries an id; the target is always chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CarPatch {
    /// Optional replacement for make.
    pub make: Option<String>,
    /// Optional replacement for bhp.
    pub bhp: Option<Bhp>,
    /// Extra fields to set or overwrite.
    pub extra: Map<String, Value>,
}

impl CarPatch {
    /// Adds the server-attached fields of `rec` without touching make or bhp.
    pub fn with_extras_of(mut self, rec: CarRecord) -> Self {
        self.extra = rec.extra;
        self
    }

    /// Applies this patch in place to `rec`.
    pub fn apply_to(&self, rec: &mut CarRecord) {
        if let Some(v) = &self.make {
            rec.make = v.clone();
        }
        if let Some(v) = self.bhp {
            rec.bhp = v;
        }
        for (k, v) in &self.extra {
            rec.extra.insert(k.clone(), v.clone());
        }
    }
}

impl From<CarDraft> for CarPatch {
    fn from(draft: CarDraft) -> Self {
        Self {
            make: Some(draft.make),
            bhp: Some(draft.bhp),
            extra: Map::new(),
        }
    }
}
