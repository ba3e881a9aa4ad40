use serde::Serialize;

use super::{Item, Playlist};
use crate::hls::{RenditionType, SegmentFormat};

const UNDETERMINED_LANGUAGE: &str = "und";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrackKind {
    Audio,
    Video,
    Subtitle,
    Unknown,
}

impl From<SegmentFormat> for TrackKind {
    fn from(format: SegmentFormat) -> Self {
        match format {
            SegmentFormat::MpegTS | SegmentFormat::Mp4 => Self::Video,
            SegmentFormat::Aac | SegmentFormat::Mp3 => Self::Audio,
            SegmentFormat::WebVtt => Self::Subtitle,
            SegmentFormat::Unknown => Self::Unknown,
        }
    }
}

impl From<RenditionType> for TrackKind {
    fn from(kind: RenditionType) -> Self {
        match kind {
            RenditionType::Audio => Self::Audio,
            RenditionType::Video => Self::Video,
            RenditionType::Subtitles | RenditionType::ClosedCaptions => Self::Subtitle,
        }
    }
}

/// Description of one top-level item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackInfo {
    pub index: usize,
    pub kind: TrackKind,
    pub language: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubtitleFlags {
    pub autoselect: bool,
    pub default: bool,
    pub forced: bool,
}

/// Description of one alternate rendition in a media group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaTrackInfo {
    pub rendition_type: RenditionType,
    pub group_id: String,
    pub kind: TrackKind,
    pub name: String,
    pub language: String,
    pub uri: Option<String>,
    /// Whether this is the group's effective alternate.
    pub effective: bool,
    /// Set for subtitle and closed-caption alternates.
    pub subtitle_flags: Option<SubtitleFlags>,
}

impl Playlist {
    pub fn track_info(&self) -> Vec<TrackInfo> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let kind = Self::item_kind(item);
                TrackInfo {
                    index,
                    kind,
                    language: self.item_language(item, kind),
                    selected: self.selected == Some(index),
                }
            })
            .collect()
    }

    pub fn media_track_info(&self) -> Vec<MediaTrackInfo> {
        let mut tracks = Vec::with_capacity(self.groups.rendition_count());

        for group in self.groups.iter() {
            let effective = group.effective_index();
            let kind = TrackKind::from(group.rendition_type());

            for (i, rendition) in group.renditions().iter().enumerate() {
                tracks.push(MediaTrackInfo {
                    rendition_type: group.rendition_type(),
                    group_id: group.group_id().to_string(),
                    kind,
                    name: rendition.name.clone(),
                    language: rendition
                        .language
                        .clone()
                        .unwrap_or_else(|| UNDETERMINED_LANGUAGE.to_string()),
                    uri: rendition.uri.clone(),
                    effective: effective == Some(i),
                    subtitle_flags: (kind == TrackKind::Subtitle).then_some(SubtitleFlags {
                        autoselect: rendition.is_autoselect,
                        default: rendition.is_default,
                        forced: rendition.is_forced,
                    }),
                });
            }
        }

        tracks
    }

    fn item_kind(item: &Item) -> TrackKind {
        match &item.meta.stream_info {
            Some(info) if info.resolution.is_some() || info.video.is_some() || info.has_video_codec() => {
                TrackKind::Video
            }
            Some(info) if info.is_audio_only() => TrackKind::Audio,
            Some(_) => TrackKind::Unknown,
            None => SegmentFormat::from_url(&item.uri).into(),
        }
    }

    fn item_language(&self, item: &Item, kind: TrackKind) -> String {
        let own = match kind {
            TrackKind::Video => Some(RenditionType::Video),
            TrackKind::Subtitle => Some(RenditionType::Subtitles),
            TrackKind::Audio | TrackKind::Unknown => None,
        };

        own.into_iter()
            .chain(std::iter::once(RenditionType::Audio))
            .find_map(|rendition_type| {
                let group_id = item.meta.group_id(rendition_type)?;
                self.groups
                    .lookup(rendition_type, group_id)?
                    .effective_rendition()?
                    .language
                    .clone()
            })
            .unwrap_or_else(|| UNDETERMINED_LANGUAGE.to_string())
    }
}
