//! Typed value rendering and parsing.
//!
//! Every renderer builds its text first and appends it to the caller's
//! [`OutBuf`] in one step, so a buffer that may not grow is either
//! extended by the whole value or left exactly as it was.

use std::fmt::Write;
use std::net::Ipv4Addr;

use crate::error::{FormatError, ResolveError};
use crate::hint::{IntegerHint, OctetHint};
use crate::model::{enum_label, enum_value, AsnType, EnumItem, NodeId, NodeInfo, Oid, Printer};
use crate::registry::Mib;
use crate::settings::StringOutput;

/// Default capacity of [`OutBuf::growable`].
const DEFAULT_CAPACITY: usize = 256;

/// Opaque-wrapped application types: `9f <type> <len> <bytes>`.
const OPAQUE_TAG: u8 = 0x9f;
const OPAQUE_COUNTER64: u8 = 0x76;
const OPAQUE_FLOAT: u8 = 0x78;
const OPAQUE_DOUBLE: u8 = 0x79;
const OPAQUE_I64: u8 = 0x7a;
const OPAQUE_U64: u8 = 0x7b;

/// A typed SNMP value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Integer(i64),
    /// Unsigned32 / Gauge32.
    Unsigned(u32),
    Counter(u32),
    Counter64(u64),
    TimeTicks(u32),
    Octets(Vec<u8>),
    ObjectId(Oid),
    IpAddress([u8; 4]),
    /// Raw Opaque contents, possibly a wrapped float, double or 64-bit value.
    Opaque(Vec<u8>),
    Bits(Vec<u8>),
    Null,
}

impl Value {
    /// Type tag used in `NAME = TAG: VALUE` output.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::Unsigned(_) => "Gauge32",
            Self::Counter(_) => "Counter32",
            Self::Counter64(_) => "Counter64",
            Self::TimeTicks(_) => "Timeticks",
            Self::Octets(_) => "STRING",
            Self::ObjectId(_) => "OID",
            Self::IpAddress(_) => "IpAddress",
            Self::Opaque(_) => "Opaque",
            Self::Bits(_) => "BITS",
            Self::Null => "NULL",
        }
    }
}

/// Caller-owned output buffer.
///
/// With `allow_realloc` off, an append that would exceed the capacity
/// fails and leaves the contents untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutBuf {
    text: String,
    capacity: usize,
    allow_realloc: bool,
}

impl OutBuf {
    #[must_use]
    pub fn new(capacity: usize, allow_realloc: bool) -> Self {
        Self {
            text: String::with_capacity(capacity),
            capacity,
            allow_realloc,
        }
    }

    #[must_use]
    pub fn growable() -> Self {
        Self::new(DEFAULT_CAPACITY, true)
    }

    /// Append all of `s` or nothing.
    pub fn push_str(&mut self, s: &str) -> Result<(), FormatError> {
        let needed = self.text.len() + s.len();
        if needed > self.capacity {
            if !self.allow_realloc {
                return Err(FormatError::BufferFull {
                    capacity: self.capacity,
                });
            }
            self.capacity = needed.max(self.capacity * 2);
        }
        self.text.push_str(s);
        Ok(())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

/// Presentation metadata for one value.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueMeta<'a> {
    pub syntax: AsnType,
    pub enums: &'a [EnumItem],
    pub hint: Option<&'a str>,
    pub units: Option<&'a str>,
}

impl<'a> ValueMeta<'a> {
    #[must_use]
    pub fn of(info: &'a NodeInfo) -> Self {
        Self {
            syntax: info.syntax,
            enums: &info.enums,
            hint: info.hint.as_deref(),
            units: info.units.as_deref(),
        }
    }
}

impl Mib {
    /// Render `value` using `meta`, without a type tag.
    pub fn format_value(
        &self,
        meta: &ValueMeta<'_>,
        value: &Value,
        buf: &mut OutBuf,
    ) -> Result<(), FormatError> {
        let (_, text) = self.value_text(meta, value);
        buf.push_str(&text)
    }

    /// Render `value` with the metadata of node `id`.
    pub fn format_node_value(
        &self,
        id: NodeId,
        value: &Value,
        buf: &mut OutBuf,
    ) -> Result<(), FormatError> {
        let meta = self
            .tree
            .get(id)
            .map(|n| ValueMeta::of(&n.info))
            .unwrap_or_default();
        self.format_value(&meta, value, buf)
    }

    /// `NAME = TYPE: VALUE`, or `NAME VALUE` with quick printing.
    ///
    /// A value whose kind disagrees with the object's syntax is rendered
    /// plainly behind a `Wrong Type (should be X): ` prefix.
    pub fn format_varbind(
        &self,
        oid: &[u32],
        value: &Value,
        buf: &mut OutBuf,
    ) -> Result<(), FormatError> {
        let name = self.render_oid(oid);
        let node = self
            .tree
            .longest_match(oid)
            .and_then(|(id, _)| self.tree.get(id))
            .filter(|n| n.info.kind.is_object_type());

        let (prefix, meta) = match node {
            Some(n) if accepts(n.printer, value) => (String::new(), ValueMeta::of(&n.info)),
            Some(n) => (
                format!("Wrong Type (should be {}): ", n.info.syntax),
                ValueMeta::default(),
            ),
            None => (String::new(), ValueMeta::default()),
        };
        let (tag, text) = self.value_text(&meta, value);

        let line = if self.settings.quick_print {
            format!("{name} {prefix}{text}")
        } else if matches!(value, Value::Null) {
            format!("{name} = {prefix}NULL")
        } else {
            format!("{name} = {prefix}{tag}: {text}")
        };
        buf.push_str(line.trim_end())
    }

    /// Type tag and text for a value.
    fn value_text(&self, meta: &ValueMeta<'_>, value: &Value) -> (&'static str, String) {
        let settings = &self.settings;
        match value {
            Value::Integer(v) => {
                if !settings.print_numeric_enums {
                    if let Some(label) = enum_label(meta.enums, *v) {
                        let text = if settings.quick_print {
                            label.to_string()
                        } else {
                            format!("{label}({v})")
                        };
                        return (value.tag(), text);
                    }
                }
                let text = match meta.hint.and_then(IntegerHint::parse) {
                    Some(hint) => hint.format(*v),
                    None => v.to_string(),
                };
                (value.tag(), self.with_units(text, meta))
            }
            Value::Unsigned(v) | Value::Counter(v) => {
                let text = match meta.hint.and_then(IntegerHint::parse) {
                    Some(hint) => hint.format(i64::from(*v)),
                    None => v.to_string(),
                };
                (value.tag(), self.with_units(text, meta))
            }
            Value::Counter64(v) => (value.tag(), self.with_units(v.to_string(), meta)),
            Value::TimeTicks(t) => {
                let text = if settings.numeric_timeticks {
                    t.to_string()
                } else if settings.quick_print {
                    uptime(*t, true)
                } else {
                    format!("({t}) {}", uptime(*t, false))
                };
                (value.tag(), self.with_units(text, meta))
            }
            Value::Octets(bytes) if meta.syntax == AsnType::Bits => {
                ("BITS", self.bits_text(meta, bytes))
            }
            Value::Octets(bytes) => self.octets_text(meta, bytes),
            Value::ObjectId(oid) => (value.tag(), self.render_oid(oid)),
            Value::IpAddress(ip) => {
                let tag = if meta.syntax == AsnType::NetAddress {
                    "Network Address"
                } else {
                    value.tag()
                };
                (tag, Ipv4Addr::from(*ip).to_string())
            }
            Value::Opaque(bytes) => (
                value.tag(),
                decode_opaque(bytes).unwrap_or_else(|| hex(bytes)),
            ),
            Value::Bits(bytes) => (value.tag(), self.bits_text(meta, bytes)),
            Value::Null => (value.tag(), String::new()),
        }
    }

    fn with_units(&self, mut text: String, meta: &ValueMeta<'_>) -> String {
        if let Some(units) = meta.units {
            if !self.settings.dont_print_units {
                text.push(' ');
                text.push_str(units);
            }
        }
        text
    }

    fn octets_text(&self, meta: &ValueMeta<'_>, bytes: &[u8]) -> (&'static str, String) {
        if let Some(Ok(hint)) = meta.hint.map(OctetHint::parse) {
            return ("STRING", hint.format(bytes));
        }
        let ascii = match self.settings.string_output {
            StringOutput::Hex => false,
            StringOutput::Ascii => true,
            StringOutput::Guess => bytes.iter().all(|&b| is_printable(b)),
        };
        if !ascii {
            return ("Hex-STRING", hex(bytes));
        }
        let mut text = String::with_capacity(bytes.len() + 2);
        text.push('"');
        for &b in bytes {
            match b {
                b'"' if self.settings.escape_quotes => text.push_str("\\\""),
                b if is_printable(b) => text.push(char::from(b)),
                _ => text.push('.'),
            }
        }
        text.push('"');
        ("STRING", text)
    }

    fn bits_text(&self, meta: &ValueMeta<'_>, bytes: &[u8]) -> String {
        let mut items = Vec::new();
        for (i, &byte) in bytes.iter().enumerate() {
            for bit in 0..8 {
                if byte & (0x80 >> bit) == 0 {
                    continue;
                }
                let position = i * 8 + bit;
                let label = i64::try_from(position)
                    .ok()
                    .and_then(|p| enum_label(meta.enums, p))
                    .filter(|_| !self.settings.print_numeric_enums);
                items.push(match label {
                    Some(label) if self.settings.quick_print => label.to_string(),
                    Some(label) => format!("{label}({position})"),
                    None => position.to_string(),
                });
            }
        }
        items.join(" ")
    }

    /// Parse text into a value of node `id`'s syntax.
    pub fn parse_value(&self, id: NodeId, text: &str) -> Result<Value, FormatError> {
        let node = self
            .tree
            .get(id)
            .ok_or_else(|| ResolveError::UnknownLabel(format!("{id}")))?;
        let info = &node.info;
        let text = text.trim();
        let bad = |expected| FormatError::BadValue {
            text: text.to_string(),
            expected,
        };
        let integer_hint = info.hint.as_deref().and_then(IntegerHint::parse);
        let unsigned = || -> Result<u32, FormatError> {
            integer_hint
                .and_then(|h| h.parse_value(text))
                .or_else(|| text.parse::<i64>().ok())
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| bad("unsigned 32-bit integer"))
        };

        match node.printer {
            Printer::Integer => {
                let label = text.split_once('(').map_or(text, |(label, _)| label);
                enum_value(&info.enums, label)
                    .or_else(|| integer_hint.and_then(|h| h.parse_value(text)))
                    .or_else(|| text.parse::<i64>().ok())
                    .map(Value::Integer)
                    .ok_or_else(|| bad("integer or enumeration label"))
            }
            Printer::Unsigned | Printer::Gauge => unsigned().map(Value::Unsigned),
            Printer::Counter => unsigned().map(Value::Counter),
            Printer::TimeTicks => unsigned().map(Value::TimeTicks),
            Printer::Counter64 => text
                .parse::<u64>()
                .map(Value::Counter64)
                .map_err(|_| bad("unsigned 64-bit integer")),
            Printer::Octets | Printer::Nsap => {
                if let Some(quoted) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
                    return Ok(Value::Octets(quoted.as_bytes().to_vec()));
                }
                match info.hint.as_deref().map(OctetHint::parse) {
                    Some(Ok(hint)) => Ok(Value::Octets(hint.encode(text)?)),
                    _ => Ok(Value::Octets(text.as_bytes().to_vec())),
                }
            }
            Printer::Bits => parse_bits(&info.enums, text)
                .map(Value::Bits)
                .ok_or_else(|| bad("BITS labels or positions")),
            Printer::IpAddress | Printer::NetAddress => text
                .parse::<Ipv4Addr>()
                .map(|ip| Value::IpAddress(ip.octets()))
                .map_err(|_| bad("dotted IPv4 address")),
            Printer::ObjectId => Ok(Value::ObjectId(self.resolve_name(text)?)),
            Printer::Opaque => parse_hex(text)
                .map(Value::Opaque)
                .ok_or_else(|| bad("hex octets")),
            Printer::Null => Ok(Value::Null),
            Printer::Unknown => Err(bad("a value for an object with a known syntax")),
        }
    }
}

/// Whether a node with `printer` expects `value`'s kind.
fn accepts(printer: Printer, value: &Value) -> bool {
    matches!(
        (printer, value),
        (Printer::Unknown, _)
            | (Printer::Integer, Value::Integer(_))
            | (Printer::Unsigned | Printer::Gauge, Value::Unsigned(_))
            | (Printer::Counter, Value::Counter(_))
            | (Printer::Counter64, Value::Counter64(_))
            | (Printer::TimeTicks, Value::TimeTicks(_))
            | (Printer::Octets | Printer::Nsap, Value::Octets(_))
            | (Printer::Bits, Value::Bits(_) | Value::Octets(_))
            | (Printer::ObjectId, Value::ObjectId(_))
            | (Printer::IpAddress | Printer::NetAddress, Value::IpAddress(_))
            | (Printer::Opaque, Value::Opaque(_))
            | (Printer::Null, Value::Null)
    )
}

fn is_printable(b: u8) -> bool {
    b.is_ascii_graphic() || matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // write! into a String cannot fail
        let _ = write!(out, "{b:02X}");
    }
    out
}

fn parse_hex(text: &str) -> Option<Vec<u8>> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace() && *c != ':').collect();
    if digits.len() % 2 != 0 {
        return None;
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok())
        .collect()
}

/// `D:H:MM:SS.cc` when quick, `H:MM:SS.cc` with a day prefix otherwise.
fn uptime(ticks: u32, quick: bool) -> String {
    let centis = ticks % 100;
    let secs = ticks / 100;
    let (s, m, h, d) = (secs % 60, (secs / 60) % 60, (secs / 3600) % 24, secs / 86400);
    if quick {
        return format!("{d}:{h}:{m:02}:{s:02}.{centis:02}");
    }
    match d {
        0 => format!("{h}:{m:02}:{s:02}.{centis:02}"),
        1 => format!("1 day, {h}:{m:02}:{s:02}.{centis:02}"),
        _ => format!("{d} days, {h}:{m:02}:{s:02}.{centis:02}"),
    }
}

/// Decode an Opaque-wrapped float, double or 64-bit integer.
fn decode_opaque(bytes: &[u8]) -> Option<String> {
    let [OPAQUE_TAG, kind, len, rest @ ..] = bytes else {
        return None;
    };
    let body = rest.get(..usize::from(*len))?;
    let big_endian = || -> Option<u64> {
        (body.len() <= 8).then(|| body.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
    };
    match *kind {
        OPAQUE_FLOAT => {
            let raw: [u8; 4] = body.try_into().ok()?;
            Some(format!("Float: {:.6}", f32::from_be_bytes(raw)))
        }
        OPAQUE_DOUBLE => {
            let raw: [u8; 8] = body.try_into().ok()?;
            Some(format!("Double: {:.6}", f64::from_be_bytes(raw)))
        }
        OPAQUE_COUNTER64 => Some(format!("Counter64: {}", big_endian()?)),
        OPAQUE_U64 => Some(format!("UInt64: {}", big_endian()?)),
        OPAQUE_I64 => {
            let raw = big_endian()?;
            let bits = u32::try_from(body.len() * 8).ok()?;
            let value = if bits == 0 || bits == 64 {
                raw as i64
            } else {
                // Sign-extend from the encoded width.
                ((raw << (64 - bits)) as i64) >> (64 - bits)
            };
            Some(format!("I64: {value}"))
        }
        _ => None,
    }
}

/// Highest bit position accepted without declared labels, the last bit of
/// a 65535-octet string.
const MAX_BIT_POSITION: usize = 65_535 * 8 - 1;

fn parse_bits(enums: &[EnumItem], text: &str) -> Option<Vec<u8>> {
    let limit = match enums.iter().map(|item| item.value).max() {
        Some(highest) => usize::try_from(highest).ok()?,
        None => MAX_BIT_POSITION,
    };
    let mut bytes = Vec::new();
    for token in text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let label = token.split_once('(').map_or(token, |(label, _)| label);
        let position = enum_value(enums, label)
            .or_else(|| token.parse::<i64>().ok())
            .and_then(|p| usize::try_from(p).ok())
            .filter(|&p| p <= limit)?;
        if bytes.len() <= position / 8 {
            bytes.resize(position / 8 + 1, 0);
        }
        bytes[position / 8] |= 0x80 >> (position % 8);
    }
    Some(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_MIB: &str = r#"
STATUS-MIB DEFINITIONS ::= BEGIN
IMPORTS
    OBJECT-TYPE, Integer32, Gauge32, TimeTicks, enterprises FROM SNMPv2-SMI
    PhysAddress, DisplayString FROM SNMPv2-TC;

status OBJECT IDENTIFIER ::= { enterprises 777 }

linkState OBJECT-TYPE
    SYNTAX INTEGER { up(1), down(2) }
    MAX-ACCESS read-only
    STATUS current
    DESCRIPTION "Link."
    ::= { status 1 }

linkMac OBJECT-TYPE
    SYNTAX PhysAddress
    MAX-ACCESS read-only
    STATUS current
    DESCRIPTION "Mac."
    ::= { status 2 }

linkSpeed OBJECT-TYPE
    SYNTAX Gauge32
    UNITS "Mbit/s"
    MAX-ACCESS read-only
    STATUS current
    DESCRIPTION "Speed."
    ::= { status 3 }

linkFlags OBJECT-TYPE
    SYNTAX BITS { a(0), b(1), c(9) }
    MAX-ACCESS read-only
    STATUS current
    DESCRIPTION "Flags."
    ::= { status 4 }

linkUp OBJECT-TYPE
    SYNTAX TimeTicks
    MAX-ACCESS read-only
    STATUS current
    DESCRIPTION "Uptime."
    ::= { status 5 }

END
"#;

    fn mib() -> Mib {
        let mut mib = Mib::new();
        mib.load_text("status.mib", STATUS_MIB.as_bytes()).unwrap();
        mib
    }

    fn render(mib: &Mib, label: &str, value: &Value) -> String {
        let mut buf = OutBuf::growable();
        mib.format_node_value(mib.find_node(label).unwrap(), value, &mut buf)
            .unwrap();
        buf.into_string()
    }

    fn varbind(mib: &Mib, name: &str, value: &Value) -> String {
        let oid = mib.resolve_name(name).unwrap();
        let mut buf = OutBuf::growable();
        mib.format_varbind(&oid, value, &mut buf).unwrap();
        buf.into_string()
    }

    #[test]
    fn test_enum_verbose_and_quick() {
        let mut mib = mib();
        assert_eq!(render(&mib, "linkState", &Value::Integer(2)), "down(2)");
        assert_eq!(render(&mib, "linkState", &Value::Integer(9)), "9");
        mib.settings_mut().quick_print = true;
        assert_eq!(render(&mib, "linkState", &Value::Integer(2)), "down");
        mib.settings_mut().print_numeric_enums = true;
        assert_eq!(render(&mib, "linkState", &Value::Integer(2)), "2");
    }

    #[test]
    fn test_timeticks() {
        let mut mib = mib();
        assert_eq!(
            render(&mib, "linkUp", &Value::TimeTicks(12345)),
            "(12345) 0:02:03.45"
        );
        assert_eq!(
            render(&mib, "linkUp", &Value::TimeTicks(2 * 8_640_000 + 100)),
            "(17280100) 2 days, 0:00:01.00"
        );
        mib.settings_mut().quick_print = true;
        assert_eq!(render(&mib, "linkUp", &Value::TimeTicks(12345)), "0:0:02:03.45");
        mib.settings_mut().numeric_timeticks = true;
        assert_eq!(render(&mib, "linkUp", &Value::TimeTicks(12345)), "12345");
    }

    #[test]
    fn test_octet_strings() {
        let mut mib = mib();
        let mac = Value::Octets(vec![0x00, 0x1a, 0x2b]);
        assert_eq!(render(&mib, "linkMac", &mac), "0:1a:2b");

        let meta = ValueMeta::default();
        let mut buf = OutBuf::growable();
        mib.format_value(&meta, &Value::Octets(vec![0x00, 0x1a, 0x2b]), &mut buf)
            .unwrap();
        assert_eq!(buf.as_str(), "00 1A 2B");

        let mut buf = OutBuf::growable();
        mib.format_value(&meta, &Value::Octets(b"say \"hi\"".to_vec()), &mut buf)
            .unwrap();
        assert_eq!(buf.as_str(), "\"say \"hi\"\"");

        mib.settings_mut().escape_quotes = true;
        mib.settings_mut().string_output = StringOutput::Hex;
        let mut buf = OutBuf::growable();
        mib.format_value(&meta, &Value::Octets(b"ab".to_vec()), &mut buf)
            .unwrap();
        assert_eq!(buf.as_str(), "61 62");
    }

    #[test]
    fn test_units_and_bits() {
        let mut mib = mib();
        assert_eq!(render(&mib, "linkSpeed", &Value::Unsigned(100)), "100 Mbit/s");
        assert_eq!(
            render(&mib, "linkFlags", &Value::Bits(vec![0xc0, 0x40])),
            "a(0) b(1) c(9)"
        );
        mib.settings_mut().dont_print_units = true;
        mib.settings_mut().quick_print = true;
        assert_eq!(render(&mib, "linkSpeed", &Value::Unsigned(100)), "100");
        assert_eq!(
            render(&mib, "linkFlags", &Value::Octets(vec![0x20])),
            "2"
        );
    }

    #[test]
    fn test_opaque_subencodings() {
        let meta = ValueMeta::default();
        let mib = Mib::new();
        let cases: [(&[u8], &str); 4] = [
            (&[0x9f, 0x78, 4, 0x3f, 0xc0, 0, 0], "Float: 1.500000"),
            (&[0x9f, 0x76, 2, 0x01, 0x00], "Counter64: 256"),
            (&[0x9f, 0x7a, 1, 0xff], "I64: -1"),
            (&[0x01, 0x02], "01 02"),
        ];
        for (bytes, expected) in cases {
            let mut buf = OutBuf::growable();
            mib.format_value(&meta, &Value::Opaque(bytes.to_vec()), &mut buf)
                .unwrap();
            assert_eq!(buf.as_str(), expected);
        }
    }

    #[test]
    fn test_fixed_buffer_is_atomic() {
        let mib = mib();
        let mut buf = OutBuf::new(8, false);
        buf.push_str("ab").unwrap();
        let err = mib
            .format_node_value(
                mib.find_node("linkUp").unwrap(),
                &Value::TimeTicks(12345),
                &mut buf,
            )
            .unwrap_err();
        assert_eq!(err, FormatError::BufferFull { capacity: 8 });
        assert_eq!(buf.as_str(), "ab");

        let mut grow = OutBuf::new(2, true);
        grow.push_str("abcdef").unwrap();
        assert_eq!(grow.as_str(), "abcdef");
        assert!(grow.capacity() >= 6);
    }

    #[test]
    fn test_varbind_lines() {
        let mut mib = mib();
        assert_eq!(
            varbind(&mib, "linkState.0", &Value::Integer(1)),
            "STATUS-MIB::linkState.0 = INTEGER: up(1)"
        );
        assert_eq!(
            varbind(&mib, "linkState.0", &Value::Unsigned(1)),
            "STATUS-MIB::linkState.0 = Wrong Type (should be INTEGER): Gauge32: 1"
        );
        assert_eq!(
            varbind(&mib, "linkState.0", &Value::Null),
            "STATUS-MIB::linkState.0 = NULL"
        );
        mib.settings_mut().quick_print = true;
        assert_eq!(
            varbind(&mib, "linkState.0", &Value::Integer(1)),
            "STATUS-MIB::linkState.0 up"
        );
    }

    #[test]
    fn test_bits_without_labels_are_bounded() {
        assert_eq!(parse_bits(&[], "0 15"), Some(vec![0x80, 0x01]));
        assert_eq!(parse_bits(&[], "524279").map(|b| b.len()), Some(65_535));
        assert_eq!(parse_bits(&[], "524280"), None);
    }

    #[test]
    fn test_oversized_hint_falls_back() {
        let mib = mib();
        let meta = ValueMeta {
            hint: Some("1d18446744073709551615a"),
            ..ValueMeta::default()
        };
        let mut buf = OutBuf::growable();
        mib.format_value(&meta, &Value::Octets(vec![1, 2, 3]), &mut buf)
            .unwrap();
        assert_eq!(buf.as_str(), "01 02 03");
    }

    #[test]
    fn test_parse_value() {
        let mib = mib();
        let node = |label| mib.find_node(label).unwrap();
        assert_eq!(
            mib.parse_value(node("linkState"), "down").unwrap(),
            Value::Integer(2)
        );
        assert_eq!(
            mib.parse_value(node("linkState"), "up(1)").unwrap(),
            Value::Integer(1)
        );
        assert_eq!(
            mib.parse_value(node("linkMac"), "0:1a:2b").unwrap(),
            Value::Octets(vec![0, 0x1a, 0x2b])
        );
        assert_eq!(
            mib.parse_value(node("linkFlags"), "a c").unwrap(),
            Value::Bits(vec![0x80, 0x40])
        );
        assert_eq!(
            mib.parse_value(node("linkSpeed"), "42").unwrap(),
            Value::Unsigned(42)
        );
        assert_eq!(
            mib.parse_value(node("linkFlags"), "9").unwrap(),
            Value::Bits(vec![0, 0x40])
        );
        for text in ["10", "4294967295", "9223372036854775807", "-1"] {
            assert!(matches!(
                mib.parse_value(node("linkFlags"), text),
                Err(FormatError::BadValue { .. })
            ));
        }
        assert!(matches!(
            mib.parse_value(node("linkSpeed"), "-1"),
            Err(FormatError::BadValue { .. })
        ));
        assert_eq!(
            mib.parse_value(node("status"), "1"),
            Err(FormatError::BadValue {
                text: "1".into(),
                expected: "a value for an object with a known syntax",
            })
        );
    }
}
