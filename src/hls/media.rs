use std::fmt;

use serde::Serialize;

use super::{TagLine, uri};
use crate::{Error, Result};

/// The TYPE of an #EXT-X-MEDIA rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RenditionType {
    Audio,
    Video,
    Subtitles,
    ClosedCaptions,
}

impl RenditionType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "AUDIO" => Some(Self::Audio),
            "VIDEO" => Some(Self::Video),
            "SUBTITLES" => Some(Self::Subtitles),
            "CLOSED-CAPTIONS" => Some(Self::ClosedCaptions),
            _ => None,
        }
    }

    /// The #EXT-X-STREAM-INF attribute that references groups of this type.
    pub fn stream_inf_attribute(&self) -> &'static str {
        match self {
            Self::Audio => "AUDIO",
            Self::Video => "VIDEO",
            Self::Subtitles => "SUBTITLES",
            Self::ClosedCaptions => "CLOSED-CAPTIONS",
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.stream_inf_attribute()
    }
}

impl fmt::Display for RenditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One alternate inside a media group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendition {
    pub name: String,
    /// Resolved URI; `None` when the rendition is carried in the variant stream.
    pub uri: Option<String>,
    pub language: Option<String>,
    pub assoc_language: Option<String>,
    pub is_default: bool,
    pub is_autoselect: bool,
    pub is_forced: bool,
    pub instream_id: Option<String>,
    pub characteristics: Option<String>,
    pub channels: Option<String>,
}

/// A parsed #EXT-X-MEDIA tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTag {
    pub rendition_type: RenditionType,
    pub group_id: String,
    pub rendition: Rendition,
}

impl MediaTag {
    /// Parse an #EXT-X-MEDIA tag, resolving its URI against `base_uri`.
    ///
    /// Errors are attribute errors; the caller drops the tag.
    pub fn parse(tag: &TagLine<'_>, base_uri: &str) -> Result<Self> {
        let attrs = tag.attributes()?;
        let missing = |key: &str| Error::attribute(tag.name, format!("missing {}", key));

        let type_token = attrs.token("TYPE")?.ok_or_else(|| missing("TYPE"))?;
        let rendition_type = RenditionType::parse(type_token).ok_or_else(|| {
            Error::attribute(tag.name, format!("invalid media type '{}'", type_token))
        })?;
        let group_id = attrs.quoted("GROUP-ID")?.ok_or_else(|| missing("GROUP-ID"))?;
        // NAME is descriptive only; alternates without one stay addressable.
        let name = attrs.quoted("NAME")?.unwrap_or_default();

        let is_default = attrs.yes_no("DEFAULT")?.unwrap_or(false);
        // AUTOSELECT must be YES whenever DEFAULT is YES.
        let is_autoselect = attrs.yes_no("AUTOSELECT")?.unwrap_or(false) || is_default;

        let forced = attrs.yes_no("FORCED")?;
        if forced.is_some() && rendition_type != RenditionType::Subtitles {
            return Err(Error::attribute(
                tag.name,
                "FORCED is only allowed on SUBTITLES",
            ));
        }

        let uri = match attrs.quoted("URI")? {
            Some(_) if rendition_type == RenditionType::ClosedCaptions => {
                return Err(Error::attribute(
                    tag.name,
                    "CLOSED-CAPTIONS must not have a URI",
                ));
            }
            Some(reference) => Some(uri::resolve_or_keep(base_uri, reference)),
            None => None,
        };

        let owned = |v: Option<&str>| v.map(str::to_string);

        Ok(Self {
            rendition_type,
            group_id: group_id.to_string(),
            rendition: Rendition {
                name: name.to_string(),
                uri,
                language: owned(attrs.quoted("LANGUAGE")?),
                assoc_language: owned(attrs.quoted("ASSOC-LANGUAGE")?),
                is_default,
                is_autoselect,
                is_forced: forced.unwrap_or(false),
                instream_id: owned(attrs.quoted("INSTREAM-ID")?),
                characteristics: owned(attrs.quoted("CHARACTERISTICS")?),
                channels: owned(attrs.quoted("CHANNELS")?),
            },
        })
    }
}
