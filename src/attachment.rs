//! Attachments bind one sound to one scene object
//!
//! An attachment carries the playback window, the repeat configuration and the
//! set of frames at which the scheduler already placed a segment. The
//! lifecycle actions at the bottom of this module are the only way, besides
//! the scheduler, that attachments change.

use crate::assets::SoundLibrary;
use crate::error::{Error, Result};
use crate::frames::FrameSet;
use crate::scene::{SceneGraph, SceneObject};
use serde::{Deserialize, Serialize};

/// Allowed range for the spectral modifier
pub const SPECTRAL_MOD_RANGE: (f32, f32) = (0.0, 2.0);

fn default_spectral_mod() -> f32 {
    1.0
}

/// User-editable attachment parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentSettings {
    pub frame_start: i32,
    pub frame_end: i32,
    pub repeat_frames: FrameSet,
    pub repeat_interval: u32,
    pub spectral_mod: f32,
}

impl Default for AttachmentSettings {
    fn default() -> Self {
        Self {
            frame_start: 1,
            frame_end: 250,
            repeat_frames: FrameSet::new(),
            repeat_interval: 0,
            spectral_mod: default_spectral_mod(),
        }
    }
}

impl AttachmentSettings {
    pub fn new(frame_start: i32, frame_end: i32) -> Self {
        Self {
            frame_start,
            frame_end,
            ..Self::default()
        }
    }

    /// Set repeat frames from their text form ("100,150")
    pub fn with_repeat_frames(mut self, text: &str) -> Self {
        self.repeat_frames = FrameSet::parse(text);
        self
    }

    pub fn with_repeat_interval(mut self, interval: u32) -> Self {
        self.repeat_interval = interval;
        self
    }

    pub fn with_spectral_mod(mut self, spectral_mod: f32) -> Self {
        self.spectral_mod = spectral_mod;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_interval(self.frame_start, self.frame_end)
    }
}

fn validate_interval(start: i32, end: i32) -> Result<()> {
    if end < start {
        return Err(Error::InvalidInterval { start, end });
    }
    Ok(())
}

/// Binding of a sound to a scene object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub sound_name: String,
    pub frame_start: i32,
    pub frame_end: i32,
    #[serde(default)]
    pub repeat_frames: FrameSet,
    #[serde(default)]
    pub repeat_interval: u32,
    #[serde(default = "default_spectral_mod")]
    pub spectral_mod: f32,
    /// Frames at which a segment has already been placed
    #[serde(default)]
    pub added_frames: FrameSet,
}

impl Attachment {
    /// Create an attachment with no placements yet
    pub fn new(sound_name: impl Into<String>, settings: &AttachmentSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            sound_name: sound_name.into(),
            frame_start: settings.frame_start,
            frame_end: settings.frame_end,
            repeat_frames: settings.repeat_frames.clone(),
            repeat_interval: settings.repeat_interval,
            spectral_mod: clamp_spectral_mod(settings.spectral_mod),
            added_frames: FrameSet::new(),
        })
    }

    /// Length of the main interval in frames
    pub fn duration(&self) -> i32 {
        self.frame_end.saturating_sub(self.frame_start)
    }

    pub fn validate(&self) -> Result<()> {
        validate_interval(self.frame_start, self.frame_end)
    }

    /// Replace the editable fields and forget every placement so the new
    /// parameters can be placed again.
    pub fn apply_settings(&mut self, settings: &AttachmentSettings) -> Result<()> {
        settings.validate()?;
        self.frame_start = settings.frame_start;
        self.frame_end = settings.frame_end;
        self.repeat_frames = settings.repeat_frames.clone();
        self.repeat_interval = settings.repeat_interval;
        self.spectral_mod = clamp_spectral_mod(settings.spectral_mod);
        self.added_frames.clear();
        Ok(())
    }

    pub fn settings(&self) -> AttachmentSettings {
        AttachmentSettings {
            frame_start: self.frame_start,
            frame_end: self.frame_end,
            repeat_frames: self.repeat_frames.clone(),
            repeat_interval: self.repeat_interval,
            spectral_mod: self.spectral_mod,
        }
    }
}

fn clamp_spectral_mod(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(SPECTRAL_MOD_RANGE.0, SPECTRAL_MOD_RANGE.1)
    } else {
        default_spectral_mod()
    }
}

/// Bind `sound_name` to `object`, replacing any previous attachment.
pub fn attach<O: SceneObject>(
    object: &mut O,
    library: &SoundLibrary,
    sound_name: &str,
    settings: &AttachmentSettings,
) -> Result<()> {
    if !library.contains(sound_name) {
        return Err(Error::UnresolvedSound {
            object: object.name().to_string(),
            sound: sound_name.to_string(),
        });
    }
    let attachment = Attachment::new(sound_name, settings)?;
    log::info!("attached '{}' to '{}'", sound_name, object.name());
    object.set_attachment(Some(attachment));
    Ok(())
}

/// Rewrite the attachment settings of `object` and reset its placements.
pub fn update<O: SceneObject>(object: &mut O, settings: &AttachmentSettings) -> Result<()> {
    let name = object.name().to_string();
    let attachment = object
        .attachment_mut()
        .ok_or_else(|| Error::NoAttachment(name.clone()))?;
    attachment.apply_settings(settings)?;
    log::info!("updated sound settings for '{}'", name);
    Ok(())
}

/// Drop the attachment of `object`, returning it if there was one.
pub fn clear<O: SceneObject>(object: &mut O) -> Option<Attachment> {
    let previous = object.attachment().cloned();
    object.set_attachment(None);
    previous
}

/// Remove a sound from the library and clear every attachment bound to it.
///
/// Timeline segments that reference the sound are left in place.
pub fn remove_sound<S: SceneGraph>(
    library: &mut SoundLibrary,
    scene: &mut S,
    sound_name: &str,
) -> usize {
    if library.remove(sound_name).is_none() {
        log::warn!("sound '{}' is not loaded", sound_name);
    }

    let mut cleared = 0;
    for object in scene.objects_mut() {
        let bound = object
            .attachment()
            .is_some_and(|a| a.sound_name == sound_name);
        if bound {
            object.set_attachment(None);
            cleared += 1;
        }
    }
    log::info!("removed sound '{}' ({} attachments cleared)", sound_name, cleared);
    cleared
}
