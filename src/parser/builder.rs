use std::time::Duration;

use super::{
    classifier::{LineClassifier, LineType},
    scanner::{Line, LineScanner},
    state::{ParsePhase, ParserState, PendingItem, PlaylistKind},
};
use crate::config::ParserConfig;
use crate::hls::{
    ByteRange, CipherInfo, MediaTag, RenditionType, StreamInfo, TagLine, uri,
};
use crate::playlist::{Item, Playlist, PlaylistType};
use crate::{Error, Result};

/// Single-pass M3U8 parser producing a [`Playlist`].
pub struct PlaylistBuilder {
    state: ParserState,
    playlist: Playlist,
    require_extension_marker: bool,
}

impl PlaylistBuilder {
    pub fn new(base_uri: &str, config: &ParserConfig) -> Self {
        Self {
            state: ParserState::new(),
            playlist: Playlist::empty(base_uri, config.audio_index),
            require_extension_marker: config.require_extension_marker,
        }
    }

    /// Parse `data` to completion.
    pub fn build(mut self, data: &[u8]) -> Result<Playlist> {
        let text = String::from_utf8_lossy(data);

        self.state.phase = ParsePhase::ExpectingExtensionMarker;
        for line in LineScanner::new(&text) {
            self.process_line(line)?;
        }

        self.finish()
    }

    /// Process a single scanned line according to the current phase.
    fn process_line(&mut self, line: Line<'_>) -> Result<()> {
        match self.state.phase {
            ParsePhase::ExpectingExtensionMarker => {
                self.state.phase = ParsePhase::Scanning;
                if LineClassifier::classify(line.text) == LineType::ExtM3U {
                    self.playlist.is_extension_format = true;
                    return Ok(());
                }
                if self.require_extension_marker {
                    return Err(Error::MissingExtM3u);
                }
                tracing::debug!("No #EXTM3U marker, parsing as a plain URI list");
                self.scan_line(line)
            }
            ParsePhase::Scanning => self.scan_line(line),
            ParsePhase::Init | ParsePhase::Done => {
                tracing::debug!("Line {}: ignored outside of a parse", line.number);
                Ok(())
            }
        }
    }

    fn scan_line(&mut self, line: Line<'_>) -> Result<()> {
        let line_type = LineClassifier::classify(line.text);

        if line_type.is_uri() {
            return self.push_item(line);
        }

        let Some(tag) = TagLine::parse(line.text) else {
            return Ok(());
        };

        if line_type.is_media_playlist_tag() {
            self.state.claim(PlaylistKind::Media, line.number, tag.name)?;
        } else if line_type.signals_next_uri_is_variant() {
            self.state.claim(PlaylistKind::Master, line.number, tag.name)?;
        }

        self.process_tag(line_type, &tag, line.number)
    }

    fn process_tag(&mut self, line_type: LineType, tag: &TagLine<'_>, number: usize) -> Result<()> {
        match line_type {
            LineType::ExtXStreamInf => {
                let info = StreamInfo::parse(tag).unwrap_or_else(|e| {
                    tracing::warn!("Line {}: {}; keeping variant without attributes", number, e);
                    StreamInfo::default()
                });
                self.playlist.is_variant = true;
                self.state.pending.set_variant(number, info);
            }
            LineType::ExtXMedia => match MediaTag::parse(tag, &self.playlist.base_uri) {
                Ok(media) => {
                    self.playlist
                        .groups
                        .append(media.rendition_type, &media.group_id, media.rendition);
                }
                Err(e) => tracing::warn!("Line {}: dropping {}: {}", number, tag.name, e),
            },
            LineType::ExtXKey => {
                let info = CipherInfo::parse(tag, &self.playlist.base_uri)?;
                tracing::debug!("Line {}: cipher method {}", number, info.method.as_str());
                self.state.cipher.update(info);
            }
            LineType::ExtXByteRange => {
                let range = ByteRange::parse(tag.value.unwrap_or_default())?;
                let span = self.state.byte_cursor.resolve(&range)?;
                self.state.pending.meta.byte_range = Some(span);
            }
            LineType::ExtInf => match Self::parse_extinf(tag) {
                Ok((duration, title)) => {
                    self.state.pending.meta.duration = Some(duration);
                    self.state.pending.meta.title = title;
                }
                Err(e) => tracing::warn!("Line {}: dropping {}: {}", number, tag.name, e),
            },
            LineType::ExtXTargetDuration => {
                if let Some(v) = Self::integer_value(tag, number) {
                    self.playlist.meta.target_duration = Some(v);
                }
            }
            LineType::ExtXMediaSequence => {
                if let Some(v) = Self::integer_value(tag, number) {
                    self.playlist.meta.media_sequence = Some(v);
                }
            }
            LineType::ExtXDiscontinuitySequence => {
                if let Some(v) = Self::integer_value(tag, number) {
                    self.playlist.meta.discontinuity_sequence = Some(v);
                }
            }
            LineType::ExtXVersion => {
                if let Some(v) = Self::integer_value(tag, number) {
                    self.playlist.meta.version = Some(v);
                }
            }
            LineType::ExtXPlaylistType => match tag.value.map(str::to_uppercase).as_deref() {
                Some("EVENT") => {
                    self.playlist.meta.playlist_type = Some(PlaylistType::Event);
                    self.playlist.is_event = true;
                }
                Some("VOD") => self.playlist.meta.playlist_type = Some(PlaylistType::Vod),
                other => tracing::warn!(
                    "Line {}: dropping {} with unknown value {:?}",
                    number,
                    tag.name,
                    other
                ),
            },
            LineType::ExtXIndependentSegments => {
                self.playlist.meta.independent_segments = true;
            }
            LineType::ExtXDiscontinuity => {
                self.state.pending.meta.discontinuity = true;
            }
            LineType::ExtXProgramDateTime => {
                self.state.pending.meta.program_date_time = tag.value.map(str::to_string);
            }
            LineType::ExtXEndList => {
                self.playlist.is_complete = true;
            }
            LineType::ExtM3U => {
                tracing::debug!("Line {}: ignoring repeated #EXTM3U", number);
            }
            LineType::UnknownTag => {
                tracing::debug!("Line {}: ignoring {}", number, tag.name);
            }
            LineType::Uri => {}
        }

        Ok(())
    }

    /// Turn the pending metadata and a URI line into an item.
    fn push_item(&mut self, line: Line<'_>) -> Result<()> {
        let PendingItem {
            mut meta,
            variant_line,
        } = self.state.take_pending();

        if variant_line.is_none() {
            self.state
                .claim(PlaylistKind::Media, line.number, &format!("segment '{}'", line.text))?;

            if self.playlist.is_extension_format && meta.duration.is_none() {
                return Err(Error::MissingDuration(line.number));
            }

            meta.sequence = Some(
                self.state
                    .advance_segment(self.playlist.meta.media_sequence),
            );
            meta.cipher = self.state.cipher.snapshot();
        }

        self.playlist.items.push(Item {
            uri: uri::resolve_or_keep(&self.playlist.base_uri, line.text),
            meta,
        });

        Ok(())
    }

    fn finish(mut self) -> Result<Playlist> {
        if self.state.phase == ParsePhase::ExpectingExtensionMarker {
            return Err(Error::EmptyPlaylist);
        }
        if let Some(line) = self.state.pending.variant_line {
            return Err(Error::MissingVariantUri(line));
        }
        if self.state.pending.meta.duration.is_some() {
            tracing::debug!("Ignoring #EXTINF after the last segment");
        }

        for item in &self.playlist.items {
            for kind in [
                RenditionType::Audio,
                RenditionType::Video,
                RenditionType::Subtitles,
                RenditionType::ClosedCaptions,
            ] {
                if let Some(group_id) = item.meta.group_id(kind)
                    && self.playlist.groups.lookup(kind, group_id).is_none()
                {
                    tracing::warn!(
                        "Variant '{}' references undefined {} group '{}'",
                        item.uri,
                        kind,
                        group_id
                    );
                }
            }
        }

        self.state.phase = ParsePhase::Done;
        tracing::debug!(
            "Parsed {} playlist: {} items, {} media groups, complete={}",
            if self.playlist.is_variant { "variant" } else { "media" },
            self.playlist.items.len(),
            self.playlist.groups.len(),
            self.playlist.is_complete
        );

        Ok(self.playlist)
    }

    /// `#EXTINF:<duration>[,<title>]`
    fn parse_extinf(tag: &TagLine<'_>) -> Result<(Duration, Option<String>)> {
        let value = tag.require_value()?;
        let (duration, title) = match value.split_once(',') {
            Some((d, t)) => (d.trim(), Some(t.trim())),
            None => (value.trim(), None),
        };

        let secs: f64 = duration
            .parse()
            .map_err(|_| Error::attribute(tag.name, format!("invalid duration '{}'", duration)))?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(Error::attribute(
                tag.name,
                format!("invalid duration '{}'", duration),
            ));
        }

        Ok((
            Duration::from_micros((secs * 1_000_000.0).round() as u64),
            title.filter(|t| !t.is_empty()).map(str::to_string),
        ))
    }

    fn integer_value(tag: &TagLine<'_>, number: usize) -> Option<u64> {
        let parsed = tag.require_value().and_then(|v| {
            v.parse::<u64>()
                .map_err(|_| Error::attribute(tag.name, format!("invalid integer '{}'", v)))
        });
        match parsed {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Line {}: dropping {}: {}", number, tag.name, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(data: &str) -> Result<Playlist> {
        PlaylistBuilder::new("http://h/a/b.m3u8", &ParserConfig::default()).build(data.as_bytes())
    }

    #[test]
    fn test_phase_transitions() {
        let mut builder = PlaylistBuilder::new("http://h/a/b.m3u8", &ParserConfig::default());
        assert_eq!(builder.state.phase, ParsePhase::Init);

        builder.state.phase = ParsePhase::ExpectingExtensionMarker;
        builder.process_line(Line { number: 1, text: "#EXTM3U" }).unwrap();
        assert_eq!(builder.state.phase, ParsePhase::Scanning);
        assert!(builder.playlist.is_extension_format);

        builder.process_line(Line { number: 2, text: "#EXTINF:4," }).unwrap();
        builder.process_line(Line { number: 3, text: "a.ts" }).unwrap();
        assert_eq!(builder.playlist.items.len(), 1);

        builder.state.phase = ParsePhase::Done;
        builder.process_line(Line { number: 4, text: "b.ts" }).unwrap();
        assert_eq!(builder.playlist.items.len(), 1);
    }

    #[test]
    fn test_unmarked_first_line_is_scanned() {
        let playlist = build("a.ts\n").unwrap();
        assert!(!playlist.is_extension_format());
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.item_at(0).unwrap().uri, "http://h/a/a.ts");
    }

    #[test]
    fn test_byte_order_mark_before_marker() {
        let playlist = build("\u{feff}#EXTM3U\n#EXTINF:10,\na.ts\n").unwrap();
        assert!(playlist.is_extension_format());
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.item_at(0).unwrap().uri, "http://h/a/a.ts");
    }

    #[test]
    fn test_parse_extinf() {
        let tag = TagLine::parse("#EXTINF:9.009,Intro").unwrap();
        let (duration, title) = PlaylistBuilder::parse_extinf(&tag).unwrap();
        assert_eq!(duration, Duration::from_micros(9_009_000));
        assert_eq!(title.as_deref(), Some("Intro"));

        let tag = TagLine::parse("#EXTINF:10").unwrap();
        let (duration, title) = PlaylistBuilder::parse_extinf(&tag).unwrap();
        assert_eq!(duration, Duration::from_secs(10));
        assert!(title.is_none());

        for bad in ["#EXTINF:abc,", "#EXTINF:-1,", "#EXTINF:", "#EXTINF:inf,"] {
            assert!(PlaylistBuilder::parse_extinf(&TagLine::parse(bad).unwrap()).is_err());
        }
    }

    #[test]
    fn test_metadata_tags() {
        let playlist = build(
            "#EXTM3U\n#EXT-X-VERSION:6\n#EXT-X-TARGETDURATION:10\n#EXT-X-MEDIA-SEQUENCE:42\n\
             #EXT-X-DISCONTINUITY-SEQUENCE:3\n#EXT-X-PLAYLIST-TYPE:EVENT\n\
             #EXT-X-INDEPENDENT-SEGMENTS\n#EXTINF:10,\na.ts\n",
        )
        .unwrap();
        let meta = playlist.meta();
        assert_eq!(meta.version, Some(6));
        assert_eq!(meta.target_duration, Some(10));
        assert_eq!(meta.media_sequence, Some(42));
        assert_eq!(meta.discontinuity_sequence, Some(3));
        assert_eq!(meta.playlist_type, Some(PlaylistType::Event));
        assert!(meta.independent_segments);
        assert!(playlist.is_event());
        assert!(!playlist.is_complete());
        assert_eq!(playlist.item_at(0).unwrap().meta.sequence, Some(42));
    }

    #[test]
    fn test_malformed_integer_dropped() {
        let playlist = build("#EXTM3U\n#EXT-X-TARGETDURATION:ten\n#EXTINF:10,\na.ts\n").unwrap();
        assert_eq!(playlist.meta().target_duration, None);
        assert_eq!(playlist.len(), 1);
    }

    #[test]
    fn test_pending_resets_between_items() {
        let playlist = build(
            "#EXTM3U\n#EXT-X-DISCONTINUITY\n#EXT-X-PROGRAM-DATE-TIME:2024-01-01T00:00:00Z\n\
             #EXTINF:4,first\na.ts\n#EXTINF:4,\nb.ts\n",
        )
        .unwrap();
        let a = &playlist.item_at(0).unwrap().meta;
        let b = &playlist.item_at(1).unwrap().meta;
        assert!(a.discontinuity);
        assert_eq!(a.program_date_time.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(a.title.as_deref(), Some("first"));
        assert!(!b.discontinuity);
        assert!(b.program_date_time.is_none());
        assert!(b.title.is_none());
    }

    #[test]
    fn test_missing_variant_uri() {
        let err = build("#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1\n").unwrap_err();
        assert!(matches!(err, Error::MissingVariantUri(2)));
    }

    #[test]
    fn test_stream_inf_after_media_tag() {
        let err = build("#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXT-X-STREAM-INF:BANDWIDTH=1\nv.m3u8\n")
            .unwrap_err();
        assert!(matches!(err, Error::MixedPlaylist { line: 3, .. }));
        assert!(err.is_structural());
    }

    #[test]
    fn test_media_tag_in_variant() {
        let err = build("#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1\nv.m3u8\n#EXTINF:10,\na.ts\n")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MixedPlaylist {
                line: 4,
                kind: "master",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_stream_inf_kept() {
        let playlist = build("#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=\"x\nv.m3u8\n").unwrap();
        assert!(playlist.is_variant());
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.item_at(0).unwrap().meta.bandwidth(), None);
    }

    #[test]
    fn test_missing_duration() {
        let err = build("#EXTM3U\n#EXTINF:10,\na.ts\nb.ts\n").unwrap_err();
        assert!(matches!(err, Error::MissingDuration(4)));
    }

    #[test]
    fn test_invalid_key_fails() {
        let err = build("#EXTM3U\n#EXT-X-KEY:METHOD=AES-128\n#EXTINF:10,\na.ts\n").unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }
}
