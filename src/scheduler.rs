//! Playback scheduler
//!
//! Runs once per frame-change event. For each object with an attachment it
//! decides whether a segment is due at this frame, places it, records the frame
//! in `added_frames`, and refreshes the gain of every segment bound to the
//! attached sound from the object's distance to the camera.
//!
//! All state lives on the attachments themselves, so running the scheduler
//! twice at the same frame places nothing new.

use crate::assets::SoundLibrary;
use crate::attachment::Attachment;
use crate::attenuation::AttenuationSettings;
use crate::error::{Error, Result};
use crate::scene::{SceneGraph, SceneObject};
use crate::timeline::{insert_or_update, set_sound_gain, SegmentKey, Timeline};
use crate::trigger::is_periodic_repeat;

/// An object left out of a run and why
#[derive(Debug)]
pub struct SkippedObject {
    pub object: String,
    pub reason: Error,
}

/// Outcome of one scheduler run
#[derive(Debug, Default)]
pub struct FrameReport {
    pub frame: i32,
    /// Segments created or refreshed by placement this frame
    pub inserted: Vec<SegmentKey>,
    /// Number of segment volume writes from the gain refresh
    pub gain_updates: usize,
    pub skipped: Vec<SkippedObject>,
}

/// The frame range that should be placed for `attachment` at `frame`, if any.
///
/// The main interval is due on its start frame; explicit and periodic repeats
/// are due on their own frame and keep the main interval's duration. Frames
/// already in `added_frames` are never due again. At most one interval is due
/// per frame.
pub fn due_interval(attachment: &Attachment, frame: i32) -> Option<(i32, i32)> {
    if attachment.added_frames.contains(frame) {
        return None;
    }
    if frame == attachment.frame_start {
        return Some((attachment.frame_start, attachment.frame_end));
    }
    if attachment.repeat_frames.contains(frame) || is_periodic_repeat(attachment, frame) {
        let end = frame.checked_add(attachment.duration())?;
        return Some((frame, end));
    }
    None
}

/// Frame-change handler
#[derive(Clone, Debug, Default)]
pub struct PlaybackScheduler {
    attenuation: AttenuationSettings,
}

impl PlaybackScheduler {
    pub fn new(attenuation: AttenuationSettings) -> Self {
        Self { attenuation }
    }

    pub fn attenuation(&self) -> &AttenuationSettings {
        &self.attenuation
    }

    pub fn set_attenuation(&mut self, attenuation: AttenuationSettings) {
        self.attenuation = attenuation;
    }

    /// Handle the scene advancing to `frame`.
    ///
    /// Fails only with [`Error::MissingCamera`], in which case nothing was
    /// touched. Problems with individual objects are collected in the report
    /// and never stop the other objects from being processed.
    pub fn on_frame_change<S, T>(
        &self,
        scene: &mut S,
        timeline: &mut T,
        library: &SoundLibrary,
        frame: i32,
    ) -> Result<FrameReport>
    where
        S: SceneGraph,
        T: Timeline,
    {
        let Some(camera) = scene.camera_position() else {
            log::warn!("frame {}: no camera in scene, skipping sound update", frame);
            return Err(Error::MissingCamera);
        };

        let mut report = FrameReport {
            frame,
            ..FrameReport::default()
        };

        for object in scene.objects_mut() {
            let owner = object.name().to_string();
            let distance = object.position().distance(camera);
            let Some(attachment) = object.attachment_mut() else {
                continue;
            };

            let Some(sound) = library.get(&attachment.sound_name) else {
                log::warn!(
                    "frame {}: '{}' references missing sound '{}'",
                    frame,
                    owner,
                    attachment.sound_name
                );
                report.skipped.push(SkippedObject {
                    reason: Error::UnresolvedSound {
                        object: owner.clone(),
                        sound: attachment.sound_name.clone(),
                    },
                    object: owner,
                });
                continue;
            };

            if let Err(reason) = attachment.validate() {
                log::warn!("frame {}: skipping '{}': {}", frame, owner, reason);
                report.skipped.push(SkippedObject {
                    object: owner,
                    reason,
                });
                continue;
            }

            let gain = self.attenuation.gain(distance, attachment.spectral_mod);

            if let Some((start, end)) = due_interval(attachment, frame) {
                let placement = insert_or_update(timeline, &owner, sound, start, end, gain, 0.0);
                attachment.added_frames.insert(frame);
                report.inserted.push(placement.key);
            }

            let updated = set_sound_gain(timeline, &sound.name, gain);
            log::debug!(
                "frame {}: '{}' at distance {:.2}, volume {:.2} on {} segments",
                frame,
                sound.name,
                distance,
                gain,
                updated
            );
            report.gain_updates += updated;
        }

        if !report.inserted.is_empty() {
            log::info!("frame {}: placed {} segments", frame, report.inserted.len());
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::AttachmentSettings;

    fn attachment(settings: AttachmentSettings) -> Attachment {
        Attachment::new("bell", &settings).unwrap()
    }

    #[test]
    fn test_main_interval_due_on_start_only() {
        let a = attachment(AttachmentSettings::new(10, 20));
        assert_eq!(due_interval(&a, 10), Some((10, 20)));
        assert_eq!(due_interval(&a, 11), None);
        assert_eq!(due_interval(&a, 20), None);
    }

    #[test]
    fn test_repeat_keeps_duration() {
        let a = attachment(AttachmentSettings::new(1, 50).with_repeat_frames("100,150"));
        assert_eq!(due_interval(&a, 100), Some((100, 149)));
        assert_eq!(due_interval(&a, 150), Some((150, 199)));
        assert_eq!(due_interval(&a, 125), None);
    }

    #[test]
    fn test_added_frames_block_placement() {
        let mut a = attachment(AttachmentSettings::new(1, 50).with_repeat_frames("100"));
        a.added_frames.insert(1);
        a.added_frames.insert(100);
        assert_eq!(due_interval(&a, 1), None);
        assert_eq!(due_interval(&a, 100), None);
    }

    #[test]
    fn test_periodic_repeat_is_due() {
        let a = attachment(AttachmentSettings::new(10, 20).with_repeat_interval(5));
        assert_eq!(due_interval(&a, 25), Some((25, 35)));
        assert_eq!(due_interval(&a, 15), None);
    }
}
