//! Physical unit object.

use std::fmt;

use crate::object::{ObjectRef, Serializable, eq_by_value};
use crate::record::{Item, ItemValue, Record};
use crate::registry::{DeserializeContext, FromRecord};

/// A physical unit such as `m`, `uPa` or `A/s`, kept as its textual form.
///
/// Serialized as `GwySIUnit` with a single `unitstr` string item.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Unit {
    unitstr: String,
}

impl Unit {
    /// Creates a unit from its textual form.
    #[must_use]
    pub fn new(unitstr: impl Into<String>) -> Self {
        Self {
            unitstr: unitstr.into(),
        }
    }

    /// Returns the textual form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.unitstr
    }

    /// Returns true for the dimensionless unit.
    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        self.unitstr.is_empty()
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unit({:?})", self.unitstr)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.unitstr)
    }
}

impl Serializable for Unit {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn itemize(&self, record: &mut Record) {
        if !self.unitstr.is_empty() {
            record.push("unitstr", ItemValue::String(self.unitstr.clone()));
        }
    }

    fn duplicate(&self) -> ObjectRef {
        ObjectRef::new(self.clone())
    }

    fn structurally_eq(&self, other: &dyn Serializable) -> bool {
        eq_by_value(self, other)
    }
}

impl FromRecord for Unit {
    const TYPE_NAME: &'static str = "GwySIUnit";

    fn from_record(record: Record, ctx: &mut DeserializeContext<'_>) -> Option<Self> {
        let mut unit = Unit::default();
        for Item { name, value } in record.items {
            match (name.as_str(), value) {
                ("unitstr", ItemValue::String(s)) => unit.unitstr = s,
                (name, value) => ctx.unexpected_item(Self::TYPE_NAME, name, value.kind()),
            }
        }
        Some(unit)
    }
}
