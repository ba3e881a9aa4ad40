use super::Playlist;
use crate::hls::RenditionType;
use crate::{Error, Result};

impl Playlist {
    /// Select or deselect the item at `index`.
    ///
    /// Deselecting an item that is not the selected one leaves the selection
    /// unchanged.
    pub fn select_track(&mut self, index: usize, select: bool) -> Result<()> {
        self.check_index(index)?;

        if select {
            tracing::debug!("Selecting track {}", index);
            self.selected = Some(index);
        } else if self.selected == Some(index) {
            tracing::debug!("Deselecting track {}", index);
            self.selected = None;
        }

        Ok(())
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Fix an effective default alternate in every media group.
    ///
    /// The first DEFAULT alternate wins. Audio groups without one honour the
    /// configured audio index; otherwise the first AUTOSELECT alternate wins,
    /// then the first.
    pub fn pick_random_media_items(&mut self) {
        let audio_index = self.audio_index;
        for group in self.groups.iter_mut() {
            group.pick_default(audio_index);
        }
    }

    /// URI of the effective alternate in the `kind` group referenced by the
    /// item at `index`, or the item's own URI for in-stream alternates.
    pub fn rendition_uri(&self, index: usize, kind: RenditionType) -> Result<&str> {
        self.check_index(index)?;
        let item = &self.items[index];

        let group_id = item.meta.group_id(kind).ok_or_else(|| {
            Error::NotFound(format!("item {} has no {} group", index, kind))
        })?;
        let group = self
            .groups
            .lookup(kind, group_id)
            .ok_or_else(|| Error::NotFound(format!("{} group '{}'", kind, group_id)))?;
        let rendition = group.effective_rendition().ok_or_else(|| {
            Error::NotFound(format!("{} group '{}' is empty", kind, group_id))
        })?;

        Ok(rendition.uri.as_deref().unwrap_or(&item.uri))
    }

    pub fn audio_uri(&self, index: usize) -> Result<&str> {
        self.rendition_uri(index, RenditionType::Audio)
    }

    pub fn video_uri(&self, index: usize) -> Result<&str> {
        self.rendition_uri(index, RenditionType::Video)
    }

    pub fn subtitle_uri(&self, index: usize) -> Result<&str> {
        self.rendition_uri(index, RenditionType::Subtitles)
    }

    pub fn closed_captions_uri(&self, index: usize) -> Result<&str> {
        self.rendition_uri(index, RenditionType::ClosedCaptions)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(Error::IndexOutOfRange {
                index,
                size: self.items.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ParserConfig;
    use crate::{Error, Playlist};

    const BASE: &str = "https://cdn.example.com/live/master.m3u8";

    const MASTER: &str = r#"#EXTM3U
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID="aac",NAME="English",LANGUAGE="en",URI="audio/en.m3u8"
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID="aac",NAME="French",LANGUAGE="fr",AUTOSELECT=YES,URI="audio/fr.m3u8"
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID="aac",NAME="German",LANGUAGE="de",DEFAULT=YES,URI="audio/de.m3u8"
#EXT-X-MEDIA:TYPE=SUBTITLES,GROUP-ID="subs",NAME="English",LANGUAGE="en",URI="subs/en.m3u8"
#EXT-X-MEDIA:TYPE=CLOSED-CAPTIONS,GROUP-ID="cc",NAME="CC1",INSTREAM-ID="CC1"
#EXT-X-MEDIA:TYPE=VIDEO,GROUP-ID="empty-ref",NAME="Main"
#EXT-X-STREAM-INF:BANDWIDTH=1280000,AUDIO="aac",SUBTITLES="subs",CLOSED-CAPTIONS="cc",VIDEO="empty-ref"
low/index.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2560000,AUDIO="missing"
high/index.m3u8
"#;

    fn master() -> Playlist {
        Playlist::parse(BASE, MASTER).unwrap()
    }

    #[test]
    fn test_select_deselect() {
        let mut playlist = master();
        assert_eq!(playlist.selected_index(), None);

        playlist.select_track(1, true).unwrap();
        assert_eq!(playlist.selected_index(), Some(1));

        playlist.select_track(0, false).unwrap();
        assert_eq!(playlist.selected_index(), Some(1));

        playlist.select_track(1, false).unwrap();
        assert_eq!(playlist.selected_index(), None);
    }

    #[test]
    fn test_select_out_of_range() {
        let mut playlist = master();
        playlist.select_track(0, true).unwrap();

        let err = playlist.select_track(2, true).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 2, size: 2 }));
        assert_eq!(playlist.selected_index(), Some(0));
    }

    #[test]
    fn test_audio_uri_uses_default() {
        let playlist = master();
        assert_eq!(
            playlist.audio_uri(0).unwrap(),
            "https://cdn.example.com/live/audio/de.m3u8"
        );
        assert_eq!(
            playlist.subtitle_uri(0).unwrap(),
            "https://cdn.example.com/live/subs/en.m3u8"
        );
    }

    #[test]
    fn test_in_stream_falls_back_to_item() {
        let playlist = master();
        assert_eq!(
            playlist.closed_captions_uri(0).unwrap(),
            "https://cdn.example.com/live/low/index.m3u8"
        );
        assert_eq!(
            playlist.video_uri(0).unwrap(),
            "https://cdn.example.com/live/low/index.m3u8"
        );
    }

    #[test]
    fn test_uri_lookup_errors() {
        let playlist = master();
        assert!(matches!(
            playlist.audio_uri(5).unwrap_err(),
            Error::IndexOutOfRange { index: 5, size: 2 }
        ));
        assert!(matches!(
            playlist.audio_uri(1).unwrap_err(),
            Error::NotFound(_)
        ));
        assert!(matches!(
            playlist.subtitle_uri(1).unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[test]
    fn test_pick_random_media_items_audio_index() {
        let data = r#"#EXTM3U
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID="aac",NAME="English",URI="audio/en.m3u8"
#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID="aac",NAME="French",URI="audio/fr.m3u8"
#EXT-X-STREAM-INF:BANDWIDTH=1280000,AUDIO="aac"
low/index.m3u8
"#;
        let config = ParserConfig::default().with_audio_index(Some(1));
        let mut playlist = Playlist::parse_with_config(BASE, data, &config).unwrap();
        assert_eq!(
            playlist.audio_uri(0).unwrap(),
            "https://cdn.example.com/live/audio/en.m3u8"
        );

        playlist.pick_random_media_items();
        assert_eq!(
            playlist.audio_uri(0).unwrap(),
            "https://cdn.example.com/live/audio/fr.m3u8"
        );

        // Picking again keeps the first choice.
        playlist.pick_random_media_items();
        assert_eq!(
            playlist.audio_uri(0).unwrap(),
            "https://cdn.example.com/live/audio/fr.m3u8"
        );
    }

    #[test]
    fn test_audio_index_does_not_override_default() {
        let config = ParserConfig::default().with_audio_index(Some(0));
        let mut playlist = Playlist::parse_with_config(BASE, MASTER, &config).unwrap();
        let before = playlist.audio_uri(0).unwrap().to_string();

        playlist.pick_random_media_items();
        assert_eq!(playlist.audio_uri(0).unwrap(), before);
        assert_eq!(before, "https://cdn.example.com/live/audio/de.m3u8");
    }

    #[test]
    fn test_pick_random_media_items_default() {
        let mut playlist = master();
        playlist.pick_random_media_items();

        let picked: Vec<_> = playlist
            .media_groups()
            .iter()
            .map(|g| (g.group_id().to_string(), g.picked_index()))
            .collect();
        assert_eq!(
            picked,
            [
                ("aac".to_string(), Some(2)),
                ("subs".to_string(), Some(0)),
                ("cc".to_string(), Some(0)),
                ("empty-ref".to_string(), Some(0)),
            ]
        );
    }
}
