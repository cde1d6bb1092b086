//! Line-oriented text dump of a container.
//!
//! Each cell is one line, `"key" value`:
//!
//! ```text
//! "/0/data/visible" True
//! "/0/data/marker" 'x'
//! "/0/data/count" 42
//! "/0/data/total" 1234567890123q
//! "/0/data/scale" 2.5e-9
//! "/0/data/title" "Topography \"raw\""
//! "/0/data/unit" @GwySIUnit:R3d5U0lVbml0AAsAAAAAAAAAdW5pdHN0cgBzbQA=
//! ```
//!
//! Doubles are written in their shortest exact form and always contain a
//! `.` or an exponent, or are one of `inf`, `-inf` and `NaN`. A NaN other
//! than the default one keeps its bits as `NaN:0x<hex>`. Boxed values
//! and objects are embedded as the base64 of their binary record. Blank
//! lines and lines starting with `#` are skipped when reading.

use std::fmt::Write as _;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use stash_container::Container;
use stash_foundation::{Constructed, DeserializeContext, Error, Record, Result, TypeRegistry, Value};
use tracing::debug;

use crate::binary::{decode_record, encode_record};
use crate::config::CodecConfig;

// Writing

/// Dumps every cell of `container`, in iteration order.
#[must_use]
pub fn to_text(container: &Container) -> String {
    let mut out = String::new();
    for (key, value) in container.iter() {
        out.push('"');
        escape_str(&mut out, &key.name(), '"');
        out.push_str("\" ");
        write_value(&mut out, value);
        out.push('\n');
    }
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Char(c) => {
            out.push('\'');
            escape_byte(out, *c, '\'');
            out.push('\'');
        }
        Value::Int32(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Int64(n) => {
            let _ = write!(out, "{n}q");
        }
        Value::Double(x) => write_double(out, *x),
        Value::String(s) => {
            out.push('"');
            escape_str(out, s, '"');
            out.push('"');
        }
        Value::Boxed(boxed) => write_record(out, boxed.type_name(), &boxed.to_record()),
        Value::Object(object) => write_record(out, object.type_name(), &object.to_record()),
    }
}

fn write_double(out: &mut String, x: f64) {
    if x.is_nan() {
        out.push_str("NaN");
        if x.to_bits() != f64::NAN.to_bits() {
            let _ = write!(out, ":0x{:016x}", x.to_bits());
        }
    } else if x.is_infinite() {
        out.push_str(if x > 0.0 { "inf" } else { "-inf" });
    } else {
        // Debug formatting is the shortest exact form and keeps a `.0`
        let _ = write!(out, "{x:?}");
    }
}

fn write_record(out: &mut String, type_name: &str, record: &Record) {
    out.push('@');
    out.push_str(type_name);
    out.push(':');
    STANDARD.encode_string(encode_record(record), out);
}

fn escape_str(out: &mut String, s: &str, quote: char) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
}

fn escape_byte(out: &mut String, byte: u8, quote: char) {
    if byte.is_ascii() {
        escape_str(out, char::from(byte).encode_utf8(&mut [0; 4]), quote);
    } else {
        let _ = write!(out, "\\x{byte:02x}");
    }
}

// Reading

/// Parses a text dump into a new container.
///
/// # Errors
///
/// Returns a parse error naming the first malformed line.
pub fn from_text(text: &str, registry: &TypeRegistry) -> Result<Container> {
    let mut container = Container::new();
    load_text_into(&mut container, text, registry)?;
    Ok(container)
}

/// Parses a text dump and stores every cell into `container`.
///
/// Cells equal to the ones already stored are left alone and notify
/// nobody, so reloading a dump of an unchanged container is silent.
/// Nothing is stored unless the whole text parses. Returns the number of
/// cells that changed.
///
/// # Errors
///
/// Returns a parse error naming the first malformed line.
pub fn load_text_into(container: &mut Container, text: &str, registry: &TypeRegistry) -> Result<usize> {
    let config = CodecConfig::default();
    let mut cells = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let cell = parse_line(line, registry, &config).map_err(|message| Error::parse(index + 1, message))?;
        cells.push(cell);
    }

    let parsed = cells.len();
    let changed = cells
        .into_iter()
        .map(|(key, value)| container.set_value(key, value))
        .filter(|&changed| changed)
        .count();
    debug!(parsed, changed, "loaded text dump");
    Ok(changed)
}

fn parse_line(line: &str, registry: &TypeRegistry, config: &CodecConfig) -> std::result::Result<(String, Value), String> {
    if !line.starts_with('"') {
        return Err("expected a quoted key".to_owned());
    }
    let (key, rest) = unquote(line, b'"')?;
    let key = String::from_utf8(key).map_err(|_| "key is not valid UTF-8".to_owned())?;
    if key.is_empty() {
        return Err("key is empty".to_owned());
    }
    if !rest.starts_with(char::is_whitespace) {
        return Err(format!("expected whitespace after key `{key}`"));
    }
    let value = parse_value(rest.trim_start(), registry, config)?;
    Ok((key, value))
}

fn parse_value(token: &str, registry: &TypeRegistry, config: &CodecConfig) -> std::result::Result<Value, String> {
    let value = match token {
        "True" => Value::Bool(true),
        "False" => Value::Bool(false),
        "NaN" => Value::Double(f64::NAN),
        "inf" => Value::Double(f64::INFINITY),
        "-inf" => Value::Double(f64::NEG_INFINITY),
        _ if token.starts_with("NaN:") => Value::Double(parse_nan(&token[4..])?),
        _ if token.starts_with('\'') => {
            let (bytes, rest) = unquote(token, b'\'')?;
            expect_end(rest)?;
            match bytes.as_slice() {
                [byte] => Value::Char(*byte),
                _ => return Err(format!("character literal {token} must hold exactly one byte")),
            }
        }
        _ if token.starts_with('"') => {
            let (bytes, rest) = unquote(token, b'"')?;
            expect_end(rest)?;
            Value::String(String::from_utf8(bytes).map_err(|_| "string is not valid UTF-8".to_owned())?)
        }
        _ if token.starts_with('@') => parse_record(&token[1..], registry, config)?,
        _ => {
            if let Some(digits) = token.strip_suffix('q') {
                Value::Int64(digits.parse().map_err(|_| format!("invalid int64 `{token}`"))?)
            } else if token.contains(['.', 'e', 'E']) {
                Value::Double(token.parse().map_err(|_| format!("invalid double `{token}`"))?)
            } else {
                Value::Int32(token.parse().map_err(|_| format!("invalid int32 `{token}`"))?)
            }
        }
    };
    Ok(value)
}

/// Reads the bit pattern of a NaN other than the default one.
fn parse_nan(bits: &str) -> std::result::Result<f64, String> {
    let x = bits
        .strip_prefix("0x")
        .and_then(|hex| u64::from_str_radix(hex, 16).ok())
        .map(f64::from_bits)
        .ok_or_else(|| format!("invalid NaN bits `{bits}`"))?;
    if x.is_nan() {
        Ok(x)
    } else {
        Err(format!("bits `{bits}` do not encode a NaN"))
    }
}

fn parse_record(token: &str, registry: &TypeRegistry, config: &CodecConfig) -> std::result::Result<Value, String> {
    let Some((type_name, encoded)) = token.split_once(':') else {
        return Err("expected `@TypeName:data`".to_owned());
    };
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|err| format!("invalid base64 data for {type_name}: {err}"))?;
    let (record, consumed) = decode_record(&bytes, config).map_err(|err| err.to_string())?;
    if consumed != bytes.len() {
        return Err(format!("{} trailing bytes after {type_name} data", bytes.len() - consumed));
    }
    if record.type_name != type_name {
        return Err(format!("data holds {}, not {type_name}", record.type_name));
    }

    let mut ctx = DeserializeContext::with_max_depth(registry, config.max_depth);
    let constructed = ctx.construct(record);
    let errors = ctx.into_errors();
    match constructed {
        Some(Constructed::Object(object)) if !errors.has_fatal() => Ok(Value::Object(object)),
        Some(Constructed::Boxed(boxed)) if !errors.has_fatal() => Ok(Value::Boxed(boxed)),
        _ => Err(errors.to_string()),
    }
}

fn expect_end(rest: &str) -> std::result::Result<(), String> {
    if rest.trim().is_empty() {
        Ok(())
    } else {
        Err(format!("unexpected `{}` after the value", rest.trim()))
    }
}

/// Reads a quoted literal starting at `s[0]`, returning its unescaped
/// bytes and whatever follows the closing quote.
fn unquote(s: &str, quote: u8) -> std::result::Result<(Vec<u8>, &str), String> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut i = 1;
    loop {
        match bytes.get(i) {
            None => return Err("unterminated quoted literal".to_owned()),
            Some(&b) if b == quote => return Ok((out, &s[i + 1..])),
            Some(b'\\') => {
                let escaped = match bytes.get(i + 1) {
                    Some(b'n') => b'\n',
                    Some(b't') => b'\t',
                    Some(b'r') => b'\r',
                    Some(b'0') => 0,
                    Some(b'x') => {
                        let hex = s.get(i + 2..i + 4).ok_or("truncated \\x escape")?;
                        let byte = u8::from_str_radix(hex, 16).map_err(|_| format!("invalid escape \\x{hex}"))?;
                        out.push(byte);
                        i += 4;
                        continue;
                    }
                    Some(&c @ (b'\\' | b'\'' | b'"')) => c,
                    Some(&c) => return Err(format!("unknown escape \\{}", char::from(c))),
                    None => return Err("unterminated quoted literal".to_owned()),
                };
                out.push(escaped);
                i += 2;
            }
            Some(&b) => {
                out.push(b);
                i += 1;
            }
        }
    }
}
