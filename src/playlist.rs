//! The parsed playlist and its query surface.
//!
//! A [`Playlist`] is built once by [`Playlist::parse`]; afterwards only the
//! selected index and the picked media group defaults change.

pub mod group;
pub mod item;
pub mod selector;
pub mod track_info;

pub use group::{MediaGroup, MediaGroupRegistry};
pub use item::{Item, ItemMeta};
pub use track_info::{MediaTrackInfo, SubtitleFlags, TrackInfo, TrackKind};

use serde::Serialize;

use crate::Result;
use crate::config::ParserConfig;
use crate::parser::PlaylistBuilder;

/// Value of `#EXT-X-PLAYLIST-TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaylistType {
    Event,
    Vod,
}

/// Playlist-wide tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaylistMeta {
    pub target_duration: Option<u64>,
    pub media_sequence: Option<u64>,
    pub discontinuity_sequence: Option<u64>,
    pub version: Option<u64>,
    pub playlist_type: Option<PlaylistType>,
    pub independent_segments: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Playlist {
    pub(crate) base_uri: String,
    pub(crate) is_extension_format: bool,
    pub(crate) is_variant: bool,
    pub(crate) is_complete: bool,
    pub(crate) is_event: bool,
    pub(crate) meta: PlaylistMeta,
    pub(crate) items: Vec<Item>,
    pub(crate) groups: MediaGroupRegistry,
    pub(crate) selected: Option<usize>,
    #[serde(skip)]
    pub(crate) audio_index: Option<usize>,
}

impl Playlist {
    /// Parse `data`, resolving relative URIs against `base_uri`.
    pub fn parse(base_uri: &str, data: impl AsRef<[u8]>) -> Result<Self> {
        Self::parse_with_config(base_uri, data, &ParserConfig::default())
    }

    pub fn parse_with_config(
        base_uri: &str,
        data: impl AsRef<[u8]>,
        config: &ParserConfig,
    ) -> Result<Self> {
        PlaylistBuilder::new(base_uri, config).build(data.as_ref())
    }

    pub(crate) fn empty(base_uri: &str, audio_index: Option<usize>) -> Self {
        Self {
            base_uri: base_uri.to_string(),
            is_extension_format: false,
            is_variant: false,
            is_complete: false,
            is_event: false,
            meta: PlaylistMeta::default(),
            items: Vec::new(),
            groups: MediaGroupRegistry::new(),
            selected: None,
            audio_index,
        }
    }

    /// The first line was `#EXTM3U`.
    pub fn is_extension_format(&self) -> bool {
        self.is_extension_format
    }

    /// Items are variant streams rather than media segments.
    pub fn is_variant(&self) -> bool {
        self.is_variant
    }

    /// `#EXT-X-ENDLIST` was seen.
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn is_event(&self) -> bool {
        self.is_event
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn meta(&self) -> &PlaylistMeta {
        &self.meta
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_at(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn media_groups(&self) -> &MediaGroupRegistry {
        &self.groups
    }
}
