use serde::Serialize;

use super::{TagLine, attributes::AttributeValue, uri};
use crate::{Error, Result};

/// Represents an HLS encryption method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KeyMethod {
    None,
    Aes128,
    SampleAes,
    SampleAesCtr,
    SampleAesCenc,
}

impl KeyMethod {
    /// Parse from EXT-X-KEY METHOD attribute value.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "NONE" => Ok(Self::None),
            "AES-128" => Ok(Self::Aes128),
            "SAMPLE-AES" => Ok(Self::SampleAes),
            "SAMPLE-AES-CTR" => Ok(Self::SampleAesCtr),
            "SAMPLE-AES-CENC" => Ok(Self::SampleAesCenc),
            _ => Err(Error::UnsupportedMethod(s.to_string())),
        }
    }

    /// The whole segment is one encrypted blob.
    pub fn is_whole_segment(&self) -> bool {
        matches!(self, Self::Aes128)
    }

    /// Individual media samples are encrypted inside a clear container.
    pub fn is_sample_level(&self) -> bool {
        matches!(
            self,
            Self::SampleAes | Self::SampleAesCtr | Self::SampleAesCenc
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Aes128 => "AES-128",
            Self::SampleAes => "SAMPLE-AES",
            Self::SampleAesCtr => "SAMPLE-AES-CTR",
            Self::SampleAesCenc => "SAMPLE-AES-CENC",
        }
    }
}

/// Parsed #EXT-X-KEY tag with its key URI already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CipherInfo {
    pub method: KeyMethod,
    pub uri: Option<String>,
    pub iv: Option<[u8; 16]>,
    pub keyformat: Option<String>,
    pub keyformatversions: Option<String>,
}

impl CipherInfo {
    /// Parse the attribute list of an #EXT-X-KEY tag.
    ///
    /// Every failure here is fatal to the playlist: segments after a key tag
    /// cannot be played with a guessed key.
    pub fn parse(tag: &TagLine<'_>, base_uri: &str) -> Result<Self> {
        let attrs = tag
            .attributes()
            .map_err(|e| Error::InvalidKey(e.to_string()))?;

        let method = match attrs.get("METHOD") {
            Some(AttributeValue::Token(s)) => KeyMethod::parse(s)?,
            Some(other) => return Err(Error::UnsupportedMethod(other.as_str().to_string())),
            None => return Err(Error::InvalidKey("missing METHOD".to_string())),
        };

        let uri = match attrs.get("URI") {
            Some(AttributeValue::Quoted(s)) => Some(uri::resolve_or_keep(base_uri, s)),
            Some(other) => {
                return Err(Error::InvalidKey(format!(
                    "URI must be quoted, got '{}'",
                    other.as_str()
                )));
            }
            None => None,
        };

        if method != KeyMethod::None && uri.is_none() {
            return Err(Error::InvalidKey(format!(
                "METHOD={} requires a URI",
                method.as_str()
            )));
        }

        let iv = match attrs.get("IV") {
            Some(AttributeValue::Hex(digits)) => Some(Self::parse_iv(digits)?),
            Some(other) => return Err(Error::InvalidIv(other.as_str().to_string())),
            None => None,
        };

        let keyformat = attrs
            .quoted("KEYFORMAT")
            .map_err(|e| Error::InvalidKey(e.to_string()))?
            .map(str::to_string);
        let keyformatversions = attrs
            .quoted("KEYFORMATVERSIONS")
            .map_err(|e| Error::InvalidKey(e.to_string()))?
            .map(str::to_string);

        Ok(Self {
            method,
            uri,
            iv,
            keyformat,
            keyformatversions,
        })
    }

    /// Parse IV from hex digits (the `0x` prefix already stripped).
    fn parse_iv(digits: &str) -> Result<[u8; 16]> {
        let bytes = hex::decode(digits)?;
        bytes
            .try_into()
            .map_err(|_| Error::InvalidIv(format!("0x{} is not 16 bytes", digits)))
    }

    /// Explicit IV, or one derived from the media sequence number.
    pub fn iv_for_sequence(&self, sequence: u64) -> [u8; 16] {
        self.iv.unwrap_or_else(|| {
            let mut iv = [0u8; 16];
            iv[8..16].copy_from_slice(&sequence.to_be_bytes());
            iv
        })
    }
}

/// The encryption parameters currently in force.
#[derive(Debug, Clone, Default)]
pub struct CipherContext {
    current: Option<CipherInfo>,
}

impl CipherContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active key; `METHOD=NONE` clears it.
    pub fn update(&mut self, info: CipherInfo) {
        if info.method == KeyMethod::None {
            self.current = None;
        } else {
            self.current = Some(info);
        }
    }

    /// Copy to stamp onto the next item.
    pub fn snapshot(&self) -> Option<CipherInfo> {
        self.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/live/index.m3u8";

    fn parse(line: &str) -> Result<CipherInfo> {
        CipherInfo::parse(&TagLine::parse(line).unwrap(), BASE)
    }

    #[test]
    fn test_key_method_parse() {
        assert_eq!(KeyMethod::parse("AES-128").unwrap(), KeyMethod::Aes128);
        assert_eq!(KeyMethod::parse("SAMPLE-AES").unwrap(), KeyMethod::SampleAes);
        assert_eq!(KeyMethod::parse("aes-128").unwrap(), KeyMethod::Aes128);
        assert!(KeyMethod::parse("ROT13").is_err());
    }

    #[test]
    fn test_key_method_levels() {
        assert!(KeyMethod::Aes128.is_whole_segment());
        assert!(!KeyMethod::Aes128.is_sample_level());
        assert!(KeyMethod::SampleAesCenc.is_sample_level());
        assert!(!KeyMethod::None.is_sample_level());
    }

    #[test]
    fn test_cipher_info_parse() {
        let info = parse(
            r#"#EXT-X-KEY:METHOD=SAMPLE-AES,URI="key.bin",IV=0x00000000000000000000000000000001"#,
        )
        .unwrap();
        assert_eq!(info.method, KeyMethod::SampleAes);
        assert_eq!(
            info.uri.as_deref(),
            Some("https://example.com/live/key.bin")
        );
        let mut expected = [0u8; 16];
        expected[15] = 1;
        assert_eq!(info.iv, Some(expected));
    }

    #[test]
    fn test_cipher_info_none_without_uri() {
        let info = parse("#EXT-X-KEY:METHOD=NONE").unwrap();
        assert_eq!(info.method, KeyMethod::None);
        assert!(info.uri.is_none());
    }

    #[test]
    fn test_cipher_info_errors() {
        assert!(parse("#EXT-X-KEY:METHOD=AES-128").is_err());
        assert!(parse(r#"#EXT-X-KEY:URI="k""#).is_err());
        assert!(parse(r#"#EXT-X-KEY:METHOD=AES-128,URI="k",IV=0x01"#).is_err());
        assert!(parse(r#"#EXT-X-KEY:METHOD=AES-128,URI="k"#).is_err());
    }

    #[test]
    fn test_iv_derived_from_sequence() {
        let info = parse(r#"#EXT-X-KEY:METHOD=AES-128,URI="k""#).unwrap();
        let iv = info.iv_for_sequence(105);
        let mut expected = [0u8; 16];
        expected[8..16].copy_from_slice(&105u64.to_be_bytes());
        assert_eq!(iv, expected);
    }

    #[test]
    fn test_context_none_clears() {
        let mut ctx = CipherContext::new();
        ctx.update(parse(r#"#EXT-X-KEY:METHOD=AES-128,URI="k""#).unwrap());
        assert!(ctx.snapshot().is_some());

        ctx.update(parse("#EXT-X-KEY:METHOD=NONE").unwrap());
        assert!(ctx.snapshot().is_none());
    }
}
