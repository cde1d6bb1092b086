//! `GwyIntSet` record form and the optional serde support.

use stash_foundation::{
    DeserializeContext, DeserializeErrorCode, FromRecord, Item, ItemValue, ObjectRef, Record,
    Serializable, eq_by_value,
};

use crate::set::IntSet;

impl Serializable for IntSet {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn itemize(&self, record: &mut Record) {
        if self.is_nonempty() {
            record.push("ranges", ItemValue::Int32Array(self.to_flat()));
        }
    }

    fn duplicate(&self) -> ObjectRef {
        ObjectRef::new(self.clone())
    }

    fn structurally_eq(&self, other: &dyn Serializable) -> bool {
        eq_by_value(self, other)
    }
}

impl FromRecord for IntSet {
    const TYPE_NAME: &'static str = "GwyIntSet";

    fn from_record(record: Record, ctx: &mut DeserializeContext<'_>) -> Option<Self> {
        let mut flat: Option<Vec<i32>> = None;
        for Item { name, value } in record.items {
            match (name.as_str(), value) {
                ("ranges", ItemValue::Int32Array(bounds)) => {
                    if flat.replace(bounds).is_some() {
                        ctx.report(
                            DeserializeErrorCode::Replaced,
                            "Item `ranges` of GwyIntSet appears more than once; the last one is used.",
                        );
                    }
                }
                (name, value) => ctx.unexpected_item(Self::TYPE_NAME, name, value.kind()),
            }
        }

        let Some(flat) = flat else {
            return Some(IntSet::new());
        };
        match IntSet::from_flat(&flat) {
            Ok(set) => Some(set),
            Err(err) => {
                ctx.report(DeserializeErrorCode::Invalid, err.to_string());
                None
            }
        }
    }
}

#[cfg(feature = "serde")]
mod serde_support {
    use serde::ser::SerializeStruct;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

    use crate::range::IntRange;
    use crate::set::IntSet;

    impl Serialize for IntSet {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            // Subscribers are not part of the value
            let mut state = serializer.serialize_struct("IntSet", 1)?;
            state.serialize_field("ranges", self.ranges())?;
            state.end()
        }
    }

    impl<'de> Deserialize<'de> for IntSet {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            #[derive(Deserialize)]
            struct Repr {
                ranges: Vec<IntRange>,
            }

            let repr = Repr::deserialize(deserializer)?;
            IntSet::from_ranges(repr.ranges).map_err(de::Error::custom)
        }
    }
}
