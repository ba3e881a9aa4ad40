use serde::Serialize;

use super::{AttributeList, AttributeValue, RenditionType, TagLine};
use crate::Result;

const VIDEO_CODECS: &[&str] = &[
    "avc1", "avc3", "hvc1", "hev1", "dvh1", "dvhe", "av01", "vp08", "vp09", "mp4v",
];
const AUDIO_CODECS: &[&str] = &["mp4a", "ac-3", "ec-3", "ac-4", "opus", "flac", "alac"];

/// Represents parsed stream information from #EXT-X-STREAM-INF tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamInfo {
    pub bandwidth: Option<u64>,
    pub average_bandwidth: Option<u64>,
    pub program_id: Option<u64>,
    pub resolution: Option<(u32, u32)>,
    pub codecs: Option<String>,
    pub frame_rate: Option<f64>,
    pub audio: Option<String>,
    pub video: Option<String>,
    pub subtitles: Option<String>,
    pub closed_captions: Option<String>,
}

impl StreamInfo {
    /// Parse from #EXT-X-STREAM-INF tag line.
    ///
    /// A malformed attribute list fails the whole tag; a single malformed
    /// attribute is logged and left unset.
    pub fn parse(tag: &TagLine<'_>) -> Result<Self> {
        let attrs = tag.attributes()?;

        let info = Self {
            bandwidth: soft(attrs.decimal_integer("BANDWIDTH")),
            average_bandwidth: soft(attrs.decimal_integer("AVERAGE-BANDWIDTH")),
            program_id: soft(attrs.decimal_integer("PROGRAM-ID")),
            resolution: soft(attrs.resolution("RESOLUTION")),
            codecs: soft(attrs.quoted("CODECS")).map(str::to_string),
            frame_rate: soft(attrs.decimal_float("FRAME-RATE")),
            audio: group_reference(&attrs, RenditionType::Audio),
            video: group_reference(&attrs, RenditionType::Video),
            subtitles: group_reference(&attrs, RenditionType::Subtitles),
            closed_captions: group_reference(&attrs, RenditionType::ClosedCaptions),
        };

        if info.bandwidth.is_none() {
            tracing::debug!("Stream info without BANDWIDTH: {:?}", tag.value);
        }

        Ok(info)
    }

    /// The group id this variant references for `kind`.
    pub fn group_id(&self, kind: RenditionType) -> Option<&str> {
        match kind {
            RenditionType::Audio => self.audio.as_deref(),
            RenditionType::Video => self.video.as_deref(),
            RenditionType::Subtitles => self.subtitles.as_deref(),
            RenditionType::ClosedCaptions => self.closed_captions.as_deref(),
        }
    }

    fn codec_families(&self) -> impl Iterator<Item = String> + '_ {
        self.codecs
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(|c| c.split('.').next().unwrap_or(c).to_ascii_lowercase())
    }

    pub fn has_video_codec(&self) -> bool {
        self.codec_families()
            .any(|c| VIDEO_CODECS.contains(&c.as_str()))
    }

    /// True when CODECS lists only audio codecs.
    pub fn is_audio_only(&self) -> bool {
        let mut families = self.codec_families().peekable();
        families.peek().is_some() && families.all(|c| AUDIO_CODECS.contains(&c.as_str()))
    }
}

fn soft<T>(value: Result<Option<T>>) -> Option<T> {
    value.unwrap_or_else(|e| {
        tracing::debug!("Ignoring attribute: {}", e);
        None
    })
}

fn group_reference(attrs: &AttributeList<'_>, kind: RenditionType) -> Option<String> {
    let key = kind.stream_inf_attribute();
    // CLOSED-CAPTIONS=NONE means no captions, not a group called NONE.
    if kind == RenditionType::ClosedCaptions
        && matches!(attrs.get(key), Some(AttributeValue::Token(s)) if s.eq_ignore_ascii_case("NONE"))
    {
        return None;
    }
    soft(attrs.quoted(key)).map(str::to_string)
}
