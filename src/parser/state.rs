use crate::hls::{ByteRangeCursor, CipherContext, StreamInfo};
use crate::playlist::ItemMeta;
use crate::{Error, Result};

/// Where the builder is in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePhase {
    Init,
    ExpectingExtensionMarker,
    Scanning,
    Done,
}

/// Represents the type of playlist being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistKind {
    Master,
    Media,
}

impl PlaylistKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Media => "media",
        }
    }
}

/// Metadata collected for the next URI line.
#[derive(Debug, Clone, Default)]
pub struct PendingItem {
    pub meta: ItemMeta,
    /// Line of the #EXT-X-STREAM-INF waiting for its URI.
    pub variant_line: Option<usize>,
}

impl PendingItem {
    pub fn is_variant(&self) -> bool {
        self.variant_line.is_some()
    }

    pub fn set_variant(&mut self, line: usize, info: StreamInfo) {
        if let Some(previous) = self.variant_line {
            tracing::warn!(
                "Line {}: #EXT-X-STREAM-INF replaces the one on line {} that had no URI",
                line,
                previous
            );
        }
        self.variant_line = Some(line);
        self.meta.stream_info = Some(info);
    }
}

/// State maintained while building a playlist.
#[derive(Debug)]
pub struct ParserState {
    pub phase: ParsePhase,

    /// Decided by the first master-only or media-only line.
    pub kind: Option<PlaylistKind>,

    /// Current encryption context.
    pub cipher: CipherContext,

    /// End of the last byte range, for ranges without an offset.
    pub byte_cursor: ByteRangeCursor,

    /// Segments emitted so far (relative to the media sequence).
    pub segment_index: u64,

    pub pending: PendingItem,
}

impl ParserState {
    pub fn new() -> Self {
        Self {
            phase: ParsePhase::Init,
            kind: None,
            cipher: CipherContext::new(),
            byte_cursor: ByteRangeCursor::new(),
            segment_index: 0,
            pending: PendingItem::default(),
        }
    }

    /// Record that `tag` on `line` belongs to a `kind` playlist.
    ///
    /// Fails when the playlist was already decided to be the other kind.
    pub fn claim(&mut self, kind: PlaylistKind, line: usize, tag: &str) -> Result<()> {
        match self.kind {
            Some(current) if current != kind => Err(Error::MixedPlaylist {
                line,
                tag: tag.to_string(),
                kind: current.as_str(),
            }),
            Some(_) => Ok(()),
            None => {
                tracing::debug!("Line {}: {} makes this a {} playlist", line, tag, kind.as_str());
                self.kind = Some(kind);
                Ok(())
            }
        }
    }

    /// Take the pending metadata, leaving a fresh one behind.
    pub fn take_pending(&mut self) -> PendingItem {
        std::mem::take(&mut self.pending)
    }

    /// Sequence number of the next segment, then advance.
    pub fn advance_segment(&mut self, media_sequence: Option<u64>) -> u64 {
        let sequence = media_sequence.unwrap_or(0) + self.segment_index;
        self.segment_index += 1;
        sequence
    }
}

impl Default for ParserState {
    fn default() -> Self {
        Self::new()
    }
}
