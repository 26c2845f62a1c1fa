//! Full-viewport loading overlay synchronized with an audio clip.
//!
//! One status line is drawn per mount. Completion fires once, when the clip
//! ends; unmounting always stops and rewinds the clip whether or not it did.

use rand::Rng;
use site_logging::{site_debug, site_info};

use crate::view_model::OverlayView;
use crate::{AudioId, Effect, IdAllocator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingStatus {
    pub text: String,
    pub audio: String,
}

impl LoadingStatus {
    pub fn new(text: impl Into<String>, audio: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            audio: audio.into(),
        }
    }
}

/// Fixed, non-empty set of status lines with their clips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingCatalog {
    entries: Vec<LoadingStatus>,
}

impl Default for LoadingCatalog {
    fn default() -> Self {
        Self {
            entries: vec![
                LoadingStatus::new("Calentando motores...", "/audio/loading-engines.mp3"),
                LoadingStatus::new("Ordenando las ideas...", "/audio/loading-ideas.mp3"),
                LoadingStatus::new("Preparando el escenario...", "/audio/loading-stage.mp3"),
                LoadingStatus::new("Casi listo...", "/audio/loading-almost.mp3"),
            ],
        }
    }
}

impl LoadingCatalog {
    /// Returns `None` for an empty list.
    pub fn new(entries: Vec<LoadingStatus>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    pub fn entries(&self) -> &[LoadingStatus] {
        &self.entries
    }

    pub fn contains(&self, status: &LoadingStatus) -> bool {
        self.entries.contains(status)
    }

    /// Uniform choice with replacement.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> LoadingStatus {
        let index = rng.gen_range(0..self.entries.len());
        self.entries[index].clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    audio: AudioId,
    status: LoadingStatus,
    background_video: String,
    completed: bool,
}

impl Overlay {
    pub fn mount(
        status: LoadingStatus,
        background_video: String,
        ids: &mut IdAllocator,
    ) -> (Self, Vec<Effect>) {
        let audio = ids.next_id();
        site_info!("overlay mounted audio={} status={:?}", audio, status.text);
        let effects = vec![Effect::PlayAudio {
            audio,
            source: status.audio.clone(),
        }];
        let overlay = Self {
            audio,
            status,
            background_video,
            completed: false,
        };
        (overlay, effects)
    }

    pub fn audio(&self) -> AudioId {
        self.audio
    }

    pub fn status(&self) -> &LoadingStatus {
        &self.status
    }

    /// Returns true the first time this overlay's clip ends, false otherwise.
    pub fn on_audio_ended(&mut self, audio: AudioId) -> bool {
        if audio != self.audio || self.completed {
            return false;
        }
        self.completed = true;
        site_debug!("overlay audio {} ended", audio);
        true
    }

    /// Release on unmount: stop the clip and rewind it.
    pub fn unmount(self) -> Vec<Effect> {
        vec![Effect::StopAudio { audio: self.audio }]
    }

    pub(crate) fn view(&self) -> OverlayView {
        OverlayView {
            text: self.status.text.clone(),
            background_video: self.background_video.clone(),
            video_looping: true,
            video_muted: true,
            viewport_portal: true,
        }
    }
}
