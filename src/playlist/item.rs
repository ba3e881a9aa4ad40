use std::time::Duration;

use serde::Serialize;

use crate::hls::{ByteSpan, CipherInfo, RenditionType, StreamInfo};

/// Everything the tags before a URI line said about it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemMeta {
    /// #EXTINF duration, at microsecond precision.
    pub duration: Option<Duration>,
    pub title: Option<String>,
    pub discontinuity: bool,
    /// Media sequence number of a segment.
    pub sequence: Option<u64>,
    pub byte_range: Option<ByteSpan>,
    pub cipher: Option<CipherInfo>,
    pub program_date_time: Option<String>,
    /// Set on variant streams only.
    pub stream_info: Option<StreamInfo>,
}

impl ItemMeta {
    pub fn duration_us(&self) -> Option<u64> {
        self.duration.map(|d| d.as_micros() as u64)
    }

    pub fn bandwidth(&self) -> Option<u64> {
        self.stream_info.as_ref().and_then(|s| s.bandwidth)
    }

    /// The media group this variant references for `kind`.
    pub fn group_id(&self, kind: RenditionType) -> Option<&str> {
        self.stream_info.as_ref().and_then(|s| s.group_id(kind))
    }

    /// IV to decrypt this segment with, when it is encrypted.
    pub fn iv(&self) -> Option<[u8; 16]> {
        let cipher = self.cipher.as_ref()?;
        Some(cipher.iv_for_sequence(self.sequence.unwrap_or(0)))
    }
}

/// A media segment or a variant stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    /// Resolved against the playlist base.
    pub uri: String,
    pub meta: ItemMeta,
}
