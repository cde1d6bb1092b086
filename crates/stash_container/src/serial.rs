//! `GwyContainer` record form.
//!
//! Each cell becomes one item named by its key path. Boxed values and
//! objects become nested records.

use stash_foundation::{
    Constructed, DeserializeContext, DeserializeErrorCode, FromRecord, Item, ItemValue, ObjectRef,
    Record, Serializable, Value, eq_by_value, intern,
};

use crate::container::Container;

impl Serializable for Container {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn itemize(&self, record: &mut Record) {
        for (key, value) in self.iter() {
            record.push(&*key.name(), value.to_item_value());
        }
    }

    fn duplicate(&self) -> ObjectRef {
        ObjectRef::new(Container::duplicate(self))
    }

    fn structurally_eq(&self, other: &dyn Serializable) -> bool {
        eq_by_value(self, other)
    }
}

impl FromRecord for Container {
    const TYPE_NAME: &'static str = "GwyContainer";

    fn from_record(record: Record, ctx: &mut DeserializeContext<'_>) -> Option<Self> {
        let mut container = Container::new();
        let mut failed = false;
        for Item { name, value } in record.items {
            if name.is_empty() {
                ctx.report(
                    DeserializeErrorCode::Item,
                    "Container item with an empty name was ignored.",
                );
                continue;
            }
            let value = match value {
                ItemValue::Bool(b) => Value::Bool(b),
                ItemValue::Char(c) => Value::Char(c),
                ItemValue::Int32(n) => Value::Int32(n),
                ItemValue::Int64(n) => Value::Int64(n),
                ItemValue::Double(x) => Value::Double(x),
                ItemValue::String(s) => Value::String(s),
                ItemValue::Object(nested) => match ctx.construct(nested) {
                    Some(Constructed::Object(object)) => Value::Object(object),
                    Some(Constructed::Boxed(boxed)) => Value::Boxed(boxed),
                    None => {
                        failed |= ctx.failed();
                        continue;
                    }
                },
                array => {
                    ctx.report(
                        DeserializeErrorCode::Item,
                        format!(
                            "Container item `{name}` of array type {} cannot be stored in a container and was ignored.",
                            array.kind()
                        ),
                    );
                    continue;
                }
            };
            if container.insert_silently(intern(&name), value).is_some() {
                ctx.report(
                    DeserializeErrorCode::Replaced,
                    format!("Container item `{name}` appears more than once; the last value is used."),
                );
            }
        }
        if failed {
            return None;
        }
        Some(container)
    }
}
