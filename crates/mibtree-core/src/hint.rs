//! DISPLAY-HINT engine.
//!
//! Octet-string hints are a list of field specs, each
//! `['*'] width format [separator] [terminator]` with format one of
//! `d x o a t`. The last spec repeats until the data runs out. Integer
//! hints are `d`, `d-N`, `x`, `o` or `b`.
//!
//! [`OctetHint::format`] and [`OctetHint::encode`] are inverses for every
//! hint whose fields are delimited, which is what index rendering and
//! value parsing rely on.

use crate::error::HintError;

/// Rendering of one octet-hint field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintFormat {
    Decimal,
    Hex,
    Octal,
    Ascii,
    Utf8,
}

impl HintFormat {
    const fn from_char(c: char) -> Option<Self> {
        match c {
            'd' => Some(Self::Decimal),
            'x' => Some(Self::Hex),
            'o' => Some(Self::Octal),
            'a' => Some(Self::Ascii),
            't' => Some(Self::Utf8),
            _ => None,
        }
    }

    const fn radix(self) -> Option<u32> {
        match self {
            Self::Decimal => Some(10),
            Self::Hex => Some(16),
            Self::Octal => Some(8),
            Self::Ascii | Self::Utf8 => None,
        }
    }
}

/// One field spec of an octet-string hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OctetSpec {
    /// The first data byte is a repeat count for this spec.
    pub repeat: bool,
    pub width: usize,
    pub format: HintFormat,
    pub separator: Option<char>,
    /// Written after the last repetition instead of the separator.
    pub terminator: Option<char>,
}

/// A field cut out of an octet string by a hint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HintField {
    Number(u64),
    Text(String),
}

/// Largest field width, the maximum size of an OCTET STRING.
const MAX_FIELD_WIDTH: usize = 65_535;

/// Parsed octet-string DISPLAY-HINT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OctetHint {
    text: String,
    specs: Vec<OctetSpec>,
}

impl OctetHint {
    pub fn parse(hint: &str) -> Result<Self, HintError> {
        let malformed = |reason| HintError::Malformed {
            hint: hint.to_string(),
            reason,
        };
        let chars: Vec<char> = hint.chars().collect();
        let mut specs = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            let repeat = chars[i] == '*';
            if repeat {
                i += 1;
            }

            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if start == i {
                return Err(malformed("missing field width"));
            }
            let width: usize = chars[start..i]
                .iter()
                .collect::<String>()
                .parse()
                .map_err(|_| malformed("field width too large"))?;
            if width == 0 {
                return Err(malformed("zero field width"));
            }
            if width > MAX_FIELD_WIDTH {
                return Err(malformed("field width too large"));
            }

            let format = chars
                .get(i)
                .copied()
                .and_then(HintFormat::from_char)
                .ok_or_else(|| malformed("expected one of d, x, o, a, t"))?;
            i += 1;

            let delimiter = |c: Option<&char>| {
                c.copied().filter(|c| !c.is_ascii_digit() && *c != '*')
            };
            let separator = delimiter(chars.get(i));
            if separator.is_some() {
                i += 1;
            }
            let terminator = if repeat {
                let terminator = delimiter(chars.get(i));
                if terminator.is_some() {
                    i += 1;
                }
                terminator
            } else {
                None
            };

            specs.push(OctetSpec {
                repeat,
                width,
                format,
                separator,
                terminator,
            });
        }

        if specs.is_empty() {
            return Err(malformed("empty hint"));
        }
        Ok(Self {
            text: hint.to_string(),
            specs,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn specs(&self) -> &[OctetSpec] {
        &self.specs
    }

    fn spec(&self, index: usize) -> &OctetSpec {
        &self.specs[index.min(self.specs.len() - 1)]
    }

    /// Cut `bytes` into fields. Never reads past the end of `bytes`; a
    /// short final field takes whatever is left.
    #[must_use]
    pub fn fields(&self, bytes: &[u8]) -> Vec<HintField> {
        self.walk(bytes)
            .into_iter()
            .map(|(_, field, _)| field)
            .collect()
    }

    /// Render `bytes` through the hint.
    #[must_use]
    pub fn format(&self, bytes: &[u8]) -> String {
        let mut out = String::new();
        for (format, field, delimiter) in self.walk(bytes) {
            match (field, format) {
                (HintField::Number(n), HintFormat::Hex) => out.push_str(&format!("{n:x}")),
                (HintField::Number(n), HintFormat::Octal) => out.push_str(&format!("{n:o}")),
                (HintField::Number(n), _) => out.push_str(&n.to_string()),
                (HintField::Text(text), _) => out.push_str(&text),
            }
            if let Some(c) = delimiter {
                out.push(c);
            }
        }
        out
    }

    /// Fields with their format and the delimiter written after each.
    fn walk(&self, bytes: &[u8]) -> Vec<(HintFormat, HintField, Option<char>)> {
        let mut out = Vec::new();
        let mut pos = 0;
        let mut index = 0;

        while pos < bytes.len() {
            let spec = *self.spec(index);
            index += 1;

            let count = if spec.repeat {
                let count = usize::from(bytes[pos]);
                pos += 1;
                count
            } else {
                1
            };

            for rep in 0..count {
                if pos >= bytes.len() {
                    break;
                }
                let end = pos.saturating_add(spec.width).min(bytes.len());
                let chunk = &bytes[pos..end];
                pos = end;

                let field = match spec.format.radix() {
                    Some(_) => HintField::Number(big_endian(chunk)),
                    None => HintField::Text(String::from_utf8_lossy(chunk).into_owned()),
                };
                let delimiter = if pos >= bytes.len() {
                    None
                } else if rep + 1 == count && spec.terminator.is_some() {
                    spec.terminator
                } else {
                    spec.separator
                };
                out.push((spec.format, field, delimiter));
            }
        }
        out
    }

    /// Inverse of [`format`](Self::format).
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, HintError> {
        let chars: Vec<char> = text.chars().collect();
        let mismatch = || HintError::Mismatch {
            hint: self.text.clone(),
            text: text.to_string(),
        };
        let mut out = Vec::new();
        let mut pos = 0;
        let mut index = 0;

        while pos < chars.len() {
            let spec = *self.spec(index);
            index += 1;

            if spec.repeat {
                let count_at = out.len();
                out.push(0u8);
                let mut count = 0u8;
                while pos < chars.len() {
                    encode_field(&spec, &chars, &mut pos, &mut out).ok_or_else(mismatch)?;
                    count = count.checked_add(1).ok_or_else(mismatch)?;
                    let next = chars.get(pos).copied();
                    if next.is_some() && next == spec.terminator {
                        pos += 1;
                        break;
                    }
                    if next.is_some() && next == spec.separator {
                        pos += 1;
                    } else if spec.separator.is_some() || spec.terminator.is_some() {
                        break;
                    }
                }
                out[count_at] = count;
            } else {
                encode_field(&spec, &chars, &mut pos, &mut out).ok_or_else(mismatch)?;
                if pos < chars.len() && Some(chars[pos]) == spec.separator {
                    pos += 1;
                }
            }
        }
        Ok(out)
    }
}

/// Unsigned big-endian value of up to the first 8 bytes.
fn big_endian(chunk: &[u8]) -> u64 {
    chunk
        .iter()
        .take(8)
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
}

/// Parse one field at `pos` into `out`. `None` on mismatch.
fn encode_field(spec: &OctetSpec, chars: &[char], pos: &mut usize, out: &mut Vec<u8>) -> Option<()> {
    let delimiter = |c: char| Some(c) == spec.separator || Some(c) == spec.terminator;
    match spec.format.radix() {
        Some(radix) => {
            let start = *pos;
            while *pos < chars.len() && chars[*pos].is_digit(radix) {
                *pos += 1;
            }
            if start == *pos {
                return None;
            }
            let digits: String = chars[start..*pos].iter().collect();
            let value = u64::from_str_radix(&digits, radix).ok()?;
            let width = spec.width.min(8);
            if width < 8 && value >> (width * 8) != 0 {
                return None;
            }
            out.extend(std::iter::repeat(0).take(spec.width - width));
            out.extend_from_slice(&value.to_be_bytes()[8 - width..]);
        }
        None => {
            let mut taken = 0;
            let mut buf = [0u8; 4];
            while *pos < chars.len() && !delimiter(chars[*pos]) {
                let encoded = chars[*pos].encode_utf8(&mut buf).as_bytes();
                if taken + encoded.len() > spec.width {
                    break;
                }
                out.extend_from_slice(encoded);
                taken += encoded.len();
                *pos += 1;
            }
            if taken == 0 {
                return None;
            }
        }
    }
    Some(())
}

/// Integer DISPLAY-HINT.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegerHint {
    /// `d` or `d-N`: decimal with `N` implied fraction digits.
    Decimal { places: u8 },
    Hex,
    Octal,
    Binary,
}

impl IntegerHint {
    #[must_use]
    pub fn parse(hint: &str) -> Option<Self> {
        match hint {
            "d" => Some(Self::Decimal { places: 0 }),
            "x" => Some(Self::Hex),
            "o" => Some(Self::Octal),
            "b" => Some(Self::Binary),
            _ => {
                let places = hint.strip_prefix("d-")?.parse::<u8>().ok()?;
                (places <= 18).then_some(Self::Decimal { places })
            }
        }
    }

    #[must_use]
    pub fn format(self, value: i64) -> String {
        let sign = if value < 0 { "-" } else { "" };
        let magnitude = value.unsigned_abs();
        match self {
            Self::Decimal { places: 0 } => value.to_string(),
            Self::Decimal { places } => {
                let scale = 10u64.pow(u32::from(places));
                format!(
                    "{sign}{}.{:0width$}",
                    magnitude / scale,
                    magnitude % scale,
                    width = usize::from(places)
                )
            }
            Self::Hex => format!("{sign}{magnitude:x}"),
            Self::Octal => format!("{sign}{magnitude:o}"),
            Self::Binary => format!("{sign}{magnitude:b}"),
        }
    }

    /// Inverse of [`format`](Self::format).
    #[must_use]
    pub fn parse_value(self, text: &str) -> Option<i64> {
        let text = text.trim();
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let magnitude = match self {
            Self::Decimal { places } => {
                let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
                if fraction.len() > usize::from(places)
                    || !fraction.chars().all(|c| c.is_ascii_digit())
                {
                    return None;
                }
                let padded = format!("{fraction:0<width$}", width = usize::from(places));
                let digits = format!("{whole}{padded}");
                digits.parse::<i64>().ok()?
            }
            Self::Hex => i64::from_str_radix(body, 16).ok()?,
            Self::Octal => i64::from_str_radix(body, 8).ok()?,
            Self::Binary => i64::from_str_radix(body, 2).ok()?,
        };
        Some(if negative { -magnitude } else { magnitude })
    }
}
