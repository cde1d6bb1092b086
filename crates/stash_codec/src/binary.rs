//! Binary wire format.
//!
//! All integers are little-endian. A record is
//!
//! ```text
//! type name (NUL-terminated) | u64 length of the item data | items
//! ```
//!
//! and an item is its NUL-terminated name, a one-byte type tag and the
//! value. Scalars use their natural width, booleans one byte, strings are
//! NUL-terminated, arrays are a `u64` element count followed by the
//! elements, and objects are nested records.
//!
//! Decoding happens in two steps: bytes are parsed into a [`Record`] tree,
//! which catches every framing problem, and the tree is then rebuilt into
//! objects through a [`TypeRegistry`].

use std::io::{Read, Write};

use stash_foundation::{
    DeserializeContext, DeserializeError, DeserializeErrorCode, ErrorList, Item, ItemKind,
    ItemValue, ObjectRef, Record, Result, Serializable, TypeRegistry,
};
use tracing::{debug, warn};

use crate::config::CodecConfig;

/// A successfully decoded object.
#[derive(Debug)]
pub struct Deserialized {
    /// The rebuilt object.
    pub object: ObjectRef,
    /// Number of bytes the top-level record occupied.
    pub consumed: usize,
    /// Non-fatal problems met along the way.
    pub warnings: ErrorList,
}

// Encoding

/// Serializes an object.
#[must_use]
pub fn to_bytes(object: &dyn Serializable) -> Vec<u8> {
    let bytes = encode_record(&object.to_record());
    debug!(type_name = object.type_name(), size = bytes.len(), "serialized object");
    bytes
}

/// Serializes an object into `writer`.
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_to<W: Write>(object: &dyn Serializable, mut writer: W) -> Result<()> {
    writer.write_all(&to_bytes(object))?;
    Ok(())
}

/// Serializes a record tree.
#[must_use]
pub fn encode_record(record: &Record) -> Vec<u8> {
    let mut out = Vec::new();
    write_record(&mut out, record);
    out
}

fn write_record(out: &mut Vec<u8>, record: &Record) {
    write_cstr(out, &record.type_name);
    let size_at = out.len();
    out.extend_from_slice(&[0; 8]);
    let body_at = out.len();
    for item in &record.items {
        write_item(out, item);
    }
    let size = (out.len() - body_at) as u64;
    out[size_at..body_at].copy_from_slice(&size.to_le_bytes());
}

fn write_item(out: &mut Vec<u8>, item: &Item) {
    write_cstr(out, &item.name);
    out.push(item.value.kind().tag());
    match &item.value {
        ItemValue::Bool(b) => out.push(u8::from(*b)),
        ItemValue::Char(c) => out.push(*c),
        ItemValue::Int32(n) => out.extend_from_slice(&n.to_le_bytes()),
        ItemValue::Int64(n) => out.extend_from_slice(&n.to_le_bytes()),
        ItemValue::Double(x) => out.extend_from_slice(&x.to_le_bytes()),
        ItemValue::String(s) => write_cstr(out, s),
        ItemValue::Object(record) => write_record(out, record),
        ItemValue::BoolArray(values) => {
            write_count(out, values.len());
            out.extend(values.iter().map(|&b| u8::from(b)));
        }
        ItemValue::CharArray(values) => {
            write_count(out, values.len());
            out.extend_from_slice(values);
        }
        ItemValue::Int32Array(values) => {
            write_count(out, values.len());
            out.extend(values.iter().flat_map(|n| n.to_le_bytes()));
        }
        ItemValue::Int64Array(values) => {
            write_count(out, values.len());
            out.extend(values.iter().flat_map(|n| n.to_le_bytes()));
        }
        ItemValue::DoubleArray(values) => {
            write_count(out, values.len());
            out.extend(values.iter().flat_map(|x| x.to_le_bytes()));
        }
        ItemValue::StringArray(values) => {
            write_count(out, values.len());
            for s in values {
                write_cstr(out, s);
            }
        }
        ItemValue::ObjectArray(records) => {
            write_count(out, records.len());
            for record in records {
                write_record(out, record);
            }
        }
    }
}

fn write_count(out: &mut Vec<u8>, count: usize) {
    out.extend_from_slice(&(count as u64).to_le_bytes());
}

fn write_cstr(out: &mut Vec<u8>, s: &str) {
    let bytes = s.as_bytes();
    let bytes = match bytes.iter().position(|&b| b == 0) {
        Some(nul) => {
            warn!(string = %s.escape_debug(), "string contains NUL and was truncated");
            &bytes[..nul]
        }
        None => bytes,
    };
    out.extend_from_slice(bytes);
    out.push(0);
}

// Decoding

/// Rebuilds an object from bytes using the default [`CodecConfig`].
///
/// # Errors
///
/// Returns every problem found if the bytes do not hold a valid object.
pub fn from_bytes(bytes: &[u8], registry: &TypeRegistry) -> std::result::Result<Deserialized, ErrorList> {
    from_bytes_with(bytes, registry, &CodecConfig::default())
}

/// Rebuilds an object from bytes.
///
/// # Errors
///
/// Returns every problem found if the bytes do not hold a valid object.
/// Non-fatal problems are returned in [`Deserialized::warnings`] instead.
pub fn from_bytes_with(
    bytes: &[u8],
    registry: &TypeRegistry,
    config: &CodecConfig,
) -> std::result::Result<Deserialized, ErrorList> {
    let (record, consumed) = decode_record(bytes, config).map_err(single)?;
    if consumed < bytes.len() && !config.allow_trailing {
        return Err(single(DeserializeError::new(
            DeserializeErrorCode::Padding,
            format!(
                "Data contains {} trailing bytes after the serialized object.",
                bytes.len() - consumed
            ),
        )));
    }

    let mut ctx = DeserializeContext::with_max_depth(registry, config.max_depth);
    let object = ctx.construct_object(record);
    let mut errors = ctx.into_errors();
    match object {
        Some(object) if !errors.has_fatal() => {
            debug!(type_name = object.type_name(), consumed, warnings = errors.len(), "deserialized object");
            Ok(Deserialized {
                object,
                consumed,
                warnings: errors,
            })
        }
        _ => {
            if !errors.has_fatal() {
                errors.push(DeserializeError::new(
                    DeserializeErrorCode::Invalid,
                    "The object could not be constructed.",
                ));
            }
            Err(errors)
        }
    }
}

/// Reads exactly one serialized object from `reader` and rebuilds it.
///
/// Nothing after the object is read.
///
/// # Errors
///
/// Returns an I/O error if reading fails and a deserialization error if the
/// data is not a valid object. A stream ending inside the object is a
/// truncation error.
pub fn read_from<R: Read>(
    mut reader: R,
    registry: &TypeRegistry,
    config: &CodecConfig,
) -> Result<Deserialized> {
    let mut bytes = Vec::new();
    loop {
        let mut byte = [0u8];
        if reader.read(&mut byte)? == 0 {
            return Err(truncated("Data ended inside the object type name.").into());
        }
        bytes.push(byte[0]);
        if byte[0] == 0 {
            break;
        }
    }

    let mut size = [0u8; 8];
    if let Err(err) = reader.read_exact(&mut size) {
        return Err(match err.kind() {
            std::io::ErrorKind::UnexpectedEof => truncated("Data ended inside the object size.").into(),
            _ => err.into(),
        });
    }
    bytes.extend_from_slice(&size);
    let size = u64::from_le_bytes(size);

    let body_at = bytes.len();
    reader.take(size).read_to_end(&mut bytes)?;
    if ((bytes.len() - body_at) as u64) < size {
        return Err(truncated(format!(
            "Object data is {size} bytes long but only {} bytes are available.",
            bytes.len() - body_at
        ))
        .into());
    }

    Ok(from_bytes_with(&bytes, registry, config)?)
}

/// Parses one record from the start of `bytes`, without rebuilding
/// objects. Returns the record and the number of bytes it occupied.
///
/// # Errors
///
/// Returns the first framing problem found.
pub fn decode_record(
    bytes: &[u8],
    config: &CodecConfig,
) -> std::result::Result<(Record, usize), DeserializeError> {
    let mut parser = Parser {
        buf: bytes,
        pos: 0,
        max_depth: config.max_depth,
    };
    let record = parser.record(0)?;
    Ok((record, parser.pos))
}

fn single(error: DeserializeError) -> ErrorList {
    std::iter::once(error).collect()
}

fn truncated(message: impl Into<String>) -> ErrorList {
    single(DeserializeError::new(DeserializeErrorCode::Truncated, message))
}

fn invalid(message: impl Into<String>) -> DeserializeError {
    DeserializeError::new(DeserializeErrorCode::Invalid, message)
}

type Parsed<T> = std::result::Result<T, DeserializeError>;

struct Parser<'a> {
    buf: &'a [u8],
    pos: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, len: usize, what: &str) -> Parsed<&'a [u8]> {
        if len > self.remaining() {
            return Err(DeserializeError::new(
                DeserializeErrorCode::Truncated,
                format!(
                    "Data ended inside {what}: {len} bytes needed, {} available.",
                    self.remaining()
                ),
            ));
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self, what: &str) -> Parsed<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn byte(&mut self, what: &str) -> Parsed<u8> {
        Ok(self.take(1, what)?[0])
    }

    fn count(&mut self, what: &str) -> Parsed<usize> {
        let count = u64::from_le_bytes(self.array(what)?);
        usize::try_from(count).map_err(|_| invalid(format!("Size of {what} {count} is too large.")))
    }

    fn cstr(&mut self, what: &str) -> Parsed<String> {
        let rest = &self.buf[self.pos..];
        let Some(nul) = rest.iter().position(|&b| b == 0) else {
            return Err(DeserializeError::new(
                DeserializeErrorCode::Truncated,
                format!("Data ended inside {what}: no terminating NUL."),
            ));
        };
        let text = std::str::from_utf8(&rest[..nul])
            .map_err(|_| invalid(format!("{what} is not valid UTF-8.")))?
            .to_owned();
        self.pos += nul + 1;
        Ok(text)
    }

    fn record(&mut self, depth: usize) -> Parsed<Record> {
        if depth >= self.max_depth {
            return Err(DeserializeError::new(
                DeserializeErrorCode::TooDeep,
                format!("Objects are nested deeper than {} levels.", self.max_depth),
            ));
        }
        let type_name = self.cstr("object type name")?;
        if type_name.is_empty() {
            return Err(invalid("Object type name is empty."));
        }
        let size = self.count("object size")?;
        let body = self.take(size, "object data")?;

        let mut items = Parser {
            buf: body,
            pos: 0,
            max_depth: self.max_depth,
        };
        let mut record = Record::new(type_name);
        while items.remaining() > 0 {
            let item = items.item(depth, &record.type_name)?;
            record.items.push(item);
        }
        Ok(record)
    }

    fn item(&mut self, depth: usize, type_name: &str) -> Parsed<Item> {
        let name = self.cstr("item name")?;
        let tag = self.byte("item type")?;
        let Some(kind) = ItemKind::from_tag(tag) else {
            return Err(invalid(format!(
                "Item `{name}` of {type_name} has unknown type tag 0x{tag:02x}."
            )));
        };

        let value = if kind.is_array() {
            let count = self.count("array length")?;
            if let Some(width) = kind.fixed_size() {
                let needed = count
                    .checked_mul(width)
                    .ok_or_else(|| invalid(format!("Array item `{name}` is too large.")))?;
                if needed > self.remaining() {
                    return Err(DeserializeError::new(
                        DeserializeErrorCode::Truncated,
                        format!(
                            "Data ended inside array item `{name}`: {needed} bytes needed, {} available.",
                            self.remaining()
                        ),
                    ));
                }
            }
            self.array_value(kind, count, depth)?
        } else {
            self.scalar_value(kind, depth)?
        };
        Ok(Item { name, value })
    }

    fn scalar_value(&mut self, kind: ItemKind, depth: usize) -> Parsed<ItemValue> {
        Ok(match kind {
            ItemKind::Bool => ItemValue::Bool(self.byte("boolean")? != 0),
            ItemKind::Char => ItemValue::Char(self.byte("char")?),
            ItemKind::Int32 => ItemValue::Int32(i32::from_le_bytes(self.array("int32")?)),
            ItemKind::Int64 => ItemValue::Int64(i64::from_le_bytes(self.array("int64")?)),
            ItemKind::Double => ItemValue::Double(f64::from_le_bytes(self.array("double")?)),
            ItemKind::String => ItemValue::String(self.cstr("string")?),
            _ => ItemValue::Object(self.record(depth + 1)?),
        })
    }

    fn array_value(&mut self, kind: ItemKind, count: usize, depth: usize) -> Parsed<ItemValue> {
        Ok(match kind {
            ItemKind::BoolArray => {
                ItemValue::BoolArray(self.take(count, "boolean array")?.iter().map(|&b| b != 0).collect())
            }
            ItemKind::CharArray => ItemValue::CharArray(self.take(count, "char array")?.to_vec()),
            ItemKind::Int32Array => ItemValue::Int32Array(
                self.take(count * 4, "int32 array")?
                    .chunks_exact(4)
                    .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            ItemKind::Int64Array => ItemValue::Int64Array(
                self.take(count * 8, "int64 array")?
                    .chunks_exact(8)
                    .map(|c| i64::from_le_bytes(le8(c)))
                    .collect(),
            ),
            ItemKind::DoubleArray => ItemValue::DoubleArray(
                self.take(count * 8, "double array")?
                    .chunks_exact(8)
                    .map(|c| f64::from_le_bytes(le8(c)))
                    .collect(),
            ),
            ItemKind::StringArray => {
                let mut values = Vec::with_capacity(count.min(self.remaining()));
                for _ in 0..count {
                    values.push(self.cstr("string array")?);
                }
                ItemValue::StringArray(values)
            }
            _ => {
                let mut records = Vec::with_capacity(count.min(self.remaining()));
                for _ in 0..count {
                    records.push(self.record(depth + 1)?);
                }
                ItemValue::ObjectArray(records)
            }
        })
    }
}

fn le8(chunk: &[u8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(chunk);
    out
}
