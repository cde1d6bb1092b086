//! RGBA color, the stock boxed type.

use crate::boxed::BoxedType;
use crate::record::{Item, ItemValue, Record};
use crate::registry::{DeserializeContext, FromRecord};

/// Color with red, green, blue and alpha components in `[0, 1]`.
///
/// Serialized as `GwyRGBA` with double items `r`, `g`, `b` and `a`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rgba {
    /// Red component.
    pub r: f64,
    /// Green component.
    pub g: f64,
    /// Blue component.
    pub b: f64,
    /// Alpha (opacity) component.
    pub a: f64,
}

impl Rgba {
    /// Creates a color from its components.
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

impl BoxedType for Rgba {
    fn itemize(&self, record: &mut Record) {
        record.push("r", ItemValue::Double(self.r));
        record.push("g", ItemValue::Double(self.g));
        record.push("b", ItemValue::Double(self.b));
        record.push("a", ItemValue::Double(self.a));
    }
}

impl FromRecord for Rgba {
    const TYPE_NAME: &'static str = "GwyRGBA";

    fn from_record(record: Record, ctx: &mut DeserializeContext<'_>) -> Option<Self> {
        let mut color = Rgba::default();
        for Item { name, value } in record.items {
            let slot = match name.as_str() {
                "r" => &mut color.r,
                "g" => &mut color.g,
                "b" => &mut color.b,
                "a" => &mut color.a,
                _ => {
                    ctx.unexpected_item(Self::TYPE_NAME, &name, value.kind());
                    continue;
                }
            };
            match value {
                ItemValue::Double(v) => *slot = v,
                other => ctx.unexpected_item(Self::TYPE_NAME, &name, other.kind()),
            }
        }
        Some(color)
    }
}
