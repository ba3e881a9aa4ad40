use serde::Serialize;

/// Container format of a media segment, guessed from its URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SegmentFormat {
    MpegTS,
    Mp4,
    Aac,
    Mp3,
    WebVtt,
    Unknown,
}

impl SegmentFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "ts" => Self::MpegTS,
            "mp4" | "m4s" | "m4f" | "m4v" | "cmfv" => Self::Mp4,
            "aac" | "m4a" | "cmfa" | "ac3" | "ec3" => Self::Aac,
            "mp3" => Self::Mp3,
            "vtt" | "webvtt" => Self::WebVtt,
            _ => Self::Unknown,
        }
    }

    /// Detect format from URL/filename.
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let file = path.rsplit('/').next().unwrap_or(path);

        match file.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(SegmentFormat::from_extension("ts"), SegmentFormat::MpegTS);
        assert_eq!(SegmentFormat::from_extension("M4S"), SegmentFormat::Mp4);
        assert_eq!(SegmentFormat::from_extension("vtt"), SegmentFormat::WebVtt);
        assert_eq!(SegmentFormat::from_extension("xyz"), SegmentFormat::Unknown);
    }

    #[test]
    fn test_from_url() {
        assert_eq!(
            SegmentFormat::from_url("https://example.com/segment.ts"),
            SegmentFormat::MpegTS
        );
        assert_eq!(
            SegmentFormat::from_url("https://example.com/segment.m4s?token=abc.ts"),
            SegmentFormat::Mp4
        );
        assert_eq!(
            SegmentFormat::from_url("https://example.com/audio/chunk.aac"),
            SegmentFormat::Aac
        );
        assert_eq!(
            SegmentFormat::from_url("https://example.v2/segment"),
            SegmentFormat::Unknown
        );
    }
}
