use crate::{Error, Result};

/// A `#NAME[:VALUE]` line split at the first colon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagLine<'a> {
    pub name: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> TagLine<'a> {
    /// Returns `None` for lines that are not tags.
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        if !line.starts_with('#') {
            return None;
        }

        Some(match line.split_once(':') {
            Some((name, value)) => Self {
                name: name.trim_end(),
                value: Some(value.trim()),
            },
            None => Self {
                name: line,
                value: None,
            },
        })
    }

    /// The value, or an attribute error naming this tag.
    pub fn require_value(&self) -> Result<&'a str> {
        match self.value {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(Error::attribute(self.name, "missing value")),
        }
    }

    /// Parse the value as an attribute list.
    pub fn attributes(&self) -> Result<AttributeList<'a>> {
        let value = self.require_value()?;
        parse_list(value)
            .map(|pairs| AttributeList {
                tag: self.name,
                pairs,
            })
            .map_err(|reason| Error::attribute(self.name, reason))
    }
}

/// A single attribute value as written in the playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeValue<'a> {
    /// Contents between the quotes.
    Quoted(&'a str),
    /// Digits after the `0x` prefix.
    Hex(&'a str),
    /// Unquoted integer, decimal, enumerated string or resolution.
    Token(&'a str),
}

impl<'a> AttributeValue<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Self::Quoted(s) | Self::Hex(s) | Self::Token(s) => s,
        }
    }
}

/// Ordered `KEY=VALUE` pairs of one tag. Duplicate keys keep the first
/// occurrence; keys compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeList<'a> {
    tag: &'a str,
    pairs: Vec<(&'a str, AttributeValue<'a>)>,
}

impl<'a> AttributeList<'a> {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<AttributeValue<'a>> {
        self.pairs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| *v)
    }

    /// A value that must be a quoted string.
    pub fn quoted(&self, key: &str) -> Result<Option<&'a str>> {
        match self.get(key) {
            None => Ok(None),
            Some(AttributeValue::Quoted(s)) => Ok(Some(s)),
            Some(other) => Err(self.invalid(
                key,
                format!("expected quoted string, got '{}'", other.as_str()),
            )),
        }
    }

    /// A value that must be an unquoted token.
    pub fn token(&self, key: &str) -> Result<Option<&'a str>> {
        match self.get(key) {
            None => Ok(None),
            Some(AttributeValue::Token(s)) => Ok(Some(s)),
            Some(other) => Err(self.invalid(
                key,
                format!("expected enumerated value, got '{}'", other.as_str()),
            )),
        }
    }

    pub fn decimal_integer(&self, key: &str) -> Result<Option<u64>> {
        match self.token(key)? {
            None => Ok(None),
            Some(s) => s
                .parse()
                .map(Some)
                .map_err(|_| self.invalid(key, format!("'{}' is not an integer", s))),
        }
    }

    pub fn decimal_float(&self, key: &str) -> Result<Option<f64>> {
        match self.token(key)? {
            None => Ok(None),
            Some(s) => match s.parse::<f64>() {
                Ok(x) if x.is_finite() => Ok(Some(x)),
                _ => Err(self.invalid(key, format!("'{}' is not a decimal", s))),
            },
        }
    }

    /// `YES` or `NO`, case-insensitively.
    pub fn yes_no(&self, key: &str) -> Result<Option<bool>> {
        match self.token(key)? {
            None => Ok(None),
            Some(s) if s.eq_ignore_ascii_case("YES") => Ok(Some(true)),
            Some(s) if s.eq_ignore_ascii_case("NO") => Ok(Some(false)),
            Some(s) => Err(self.invalid(key, format!("expected YES or NO, got '{}'", s))),
        }
    }

    /// `<width>x<height>`.
    pub fn resolution(&self, key: &str) -> Result<Option<(u32, u32)>> {
        let Some(s) = self.token(key)? else {
            return Ok(None);
        };
        let parsed = s
            .split_once(['x', 'X'])
            .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)));
        parsed
            .map(Some)
            .ok_or_else(|| self.invalid(key, format!("'{}' is not a resolution", s)))
    }

    fn invalid(&self, key: &str, reason: String) -> Error {
        Error::attribute(self.tag, format!("{}: {}", key, reason))
    }
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b':')
}

fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-'
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

fn parse_list(input: &str) -> std::result::Result<Vec<(&str, AttributeValue<'_>)>, String> {
    let bytes = input.as_bytes();
    let mut pairs: Vec<(&str, AttributeValue<'_>)> = Vec::new();
    let mut pos = 0;

    loop {
        pos = skip_whitespace(bytes, pos);
        if pos >= bytes.len() {
            break;
        }

        let key_start = pos;
        while pos < bytes.len() && bytes[pos] != b'=' && bytes[pos] != b',' {
            pos += 1;
        }
        let key = input[key_start..pos].trim();
        if pos >= bytes.len() || bytes[pos] != b'=' {
            return Err(format!("attribute '{}' has no value", key));
        }
        if key.is_empty() {
            return Err("empty attribute name".to_string());
        }
        if !key.bytes().all(is_key_byte) {
            return Err(format!("invalid attribute name '{}'", key));
        }
        pos = skip_whitespace(bytes, pos + 1);

        let value = if pos < bytes.len() && bytes[pos] == b'"' {
            let start = pos + 1;
            let end = input[start..]
                .find('"')
                .map(|i| start + i)
                .ok_or_else(|| format!("unterminated quoted string for '{}'", key))?;
            pos = end + 1;
            AttributeValue::Quoted(&input[start..end])
        } else {
            let start = pos;
            while pos < bytes.len() && bytes[pos] != b',' {
                pos += 1;
            }
            let raw = input[start..pos].trim();
            if raw.is_empty() {
                return Err(format!("attribute '{}' has an empty value", key));
            }
            if let Some(digits) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(format!("invalid hexadecimal value '{}'", raw));
                }
                AttributeValue::Hex(digits)
            } else if raw.bytes().all(is_token_byte) {
                AttributeValue::Token(raw)
            } else {
                return Err(format!("invalid characters in value '{}'", raw));
            }
        };

        pos = skip_whitespace(bytes, pos);
        if pos < bytes.len() {
            if bytes[pos] != b',' {
                return Err(format!("unexpected text after value of '{}'", key));
            }
            pos += 1;
        }

        if !pairs.iter().any(|(k, _)| k.eq_ignore_ascii_case(key)) {
            pairs.push((key, value));
        }
    }

    Ok(pairs)
}
