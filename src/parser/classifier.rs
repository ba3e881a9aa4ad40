/// Represents the type of a line in an M3U8 playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    ExtM3U,
    ExtXStreamInf,
    ExtXMedia,
    ExtXKey,
    ExtXMediaSequence,
    ExtInf,
    ExtXByteRange,
    ExtXDiscontinuity,
    ExtXDiscontinuitySequence,
    ExtXEndList,
    ExtXTargetDuration,
    ExtXPlaylistType,
    ExtXVersion,
    ExtXIndependentSegments,
    ExtXProgramDateTime,
    UnknownTag,
    Uri,
}

impl LineType {
    pub fn is_uri(&self) -> bool {
        matches!(self, Self::Uri)
    }

    /// Tags that only make sense in a media playlist.
    pub fn is_media_playlist_tag(&self) -> bool {
        matches!(
            self,
            Self::ExtXTargetDuration
                | Self::ExtXMediaSequence
                | Self::ExtXDiscontinuitySequence
                | Self::ExtXKey
                | Self::ExtInf
                | Self::ExtXDiscontinuity
                | Self::ExtXByteRange
        )
    }

    pub fn signals_next_uri_is_variant(&self) -> bool {
        matches!(self, Self::ExtXStreamInf)
    }
}

/// Classifier for M3U8 lines.
pub struct LineClassifier;

impl LineClassifier {
    /// Classify a scanned line by its exact tag name.
    pub fn classify(line: &str) -> LineType {
        let line = line.trim();

        if !line.starts_with('#') {
            return LineType::Uri;
        }

        let name = line.split_once(':').map_or(line, |(name, _)| name).trim_end();

        match name {
            "#EXTM3U" => LineType::ExtM3U,
            "#EXT-X-STREAM-INF" => LineType::ExtXStreamInf,
            "#EXT-X-MEDIA" => LineType::ExtXMedia,
            "#EXT-X-KEY" => LineType::ExtXKey,
            "#EXT-X-MEDIA-SEQUENCE" => LineType::ExtXMediaSequence,
            "#EXTINF" => LineType::ExtInf,
            "#EXT-X-BYTERANGE" => LineType::ExtXByteRange,
            "#EXT-X-DISCONTINUITY" => LineType::ExtXDiscontinuity,
            "#EXT-X-DISCONTINUITY-SEQUENCE" => LineType::ExtXDiscontinuitySequence,
            "#EXT-X-ENDLIST" => LineType::ExtXEndList,
            "#EXT-X-TARGETDURATION" => LineType::ExtXTargetDuration,
            "#EXT-X-PLAYLIST-TYPE" => LineType::ExtXPlaylistType,
            "#EXT-X-VERSION" => LineType::ExtXVersion,
            "#EXT-X-INDEPENDENT-SEGMENTS" => LineType::ExtXIndependentSegments,
            "#EXT-X-PROGRAM-DATE-TIME" => LineType::ExtXProgramDateTime,
            _ => LineType::UnknownTag,
        }
    }
}
