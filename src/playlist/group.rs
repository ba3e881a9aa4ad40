use serde::Serialize;

use crate::hls::{Rendition, RenditionType};

/// Alternate renditions sharing one `(type, group-id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaGroup {
    rendition_type: RenditionType,
    group_id: String,
    renditions: Vec<Rendition>,
    picked: Option<usize>,
}

impl MediaGroup {
    pub fn new(rendition_type: RenditionType, group_id: impl Into<String>) -> Self {
        Self {
            rendition_type,
            group_id: group_id.into(),
            renditions: Vec::new(),
            picked: None,
        }
    }

    pub fn rendition_type(&self) -> RenditionType {
        self.rendition_type
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Alternates in source order.
    pub fn renditions(&self) -> &[Rendition] {
        &self.renditions
    }

    pub fn len(&self) -> usize {
        self.renditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renditions.is_empty()
    }

    pub fn push(&mut self, rendition: Rendition) {
        self.renditions.push(rendition);
    }

    /// Index designated by [`MediaGroup::pick_default`], if it ran.
    pub fn picked_index(&self) -> Option<usize> {
        self.picked
    }

    /// The alternate to play: the picked one, else DEFAULT, else AUTOSELECT,
    /// else the first.
    pub fn effective_index(&self) -> Option<usize> {
        if self.renditions.is_empty() {
            return None;
        }
        Some(self.picked.unwrap_or_else(|| self.preferred_index()))
    }

    pub fn effective_rendition(&self) -> Option<&Rendition> {
        self.effective_index().map(|i| &self.renditions[i])
    }

    /// Fix the effective default. Does nothing once a default was picked.
    ///
    /// An alternate marked DEFAULT always wins; `audio_index` only applies to
    /// audio groups without one.
    pub fn pick_default(&mut self, audio_index: Option<usize>) {
        if self.picked.is_some() || self.renditions.is_empty() {
            return;
        }

        let marked_default = self.renditions.iter().position(|r| r.is_default);
        let index = match (marked_default, self.rendition_type, audio_index) {
            (Some(i), _, _) => i,
            (None, RenditionType::Audio, Some(i)) => i.min(self.renditions.len() - 1),
            _ => self.preferred_index(),
        };

        tracing::debug!(
            "Picked {} rendition {} ('{}') in group '{}'",
            self.rendition_type,
            index,
            self.renditions[index].name,
            self.group_id
        );
        self.picked = Some(index);
    }

    fn preferred_index(&self) -> usize {
        self.renditions
            .iter()
            .position(|r| r.is_default)
            .or_else(|| self.renditions.iter().position(|r| r.is_autoselect))
            .unwrap_or(0)
    }
}

/// Media groups of one playlist, in order of first reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaGroupRegistry {
    groups: Vec<MediaGroup>,
}

impl MediaGroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, rendition_type: RenditionType, group_id: &str) -> &mut MediaGroup {
        let index = match self.position(rendition_type, group_id) {
            Some(index) => index,
            None => {
                self.groups.push(MediaGroup::new(rendition_type, group_id));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    pub fn append(&mut self, rendition_type: RenditionType, group_id: &str, rendition: Rendition) {
        self.get_or_create(rendition_type, group_id).push(rendition);
    }

    pub fn lookup(&self, rendition_type: RenditionType, group_id: &str) -> Option<&MediaGroup> {
        self.position(rendition_type, group_id)
            .map(|index| &self.groups[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaGroup> {
        self.groups.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut MediaGroup> {
        self.groups.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Alternates across all groups.
    pub fn rendition_count(&self) -> usize {
        self.groups.iter().map(MediaGroup::len).sum()
    }

    fn position(&self, rendition_type: RenditionType, group_id: &str) -> Option<usize> {
        self.groups
            .iter()
            .position(|g| g.rendition_type == rendition_type && g.group_id == group_id)
    }
}
