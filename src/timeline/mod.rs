//! Timeline (sequencer) interface
//!
//! Segments are placed sounds spanning a frame range on a lane. The core only
//! ever enumerates, creates and edits segments; it never deletes them.

use crate::assets::Sound;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod channel;
pub mod insert;

pub use channel::{allocate_channel, MAX_CHANNELS};
pub use insert::{insert_or_update, place_with_repeats, set_sound_gain, Placement};

/// A placed instance of a sound
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    /// Name of the bound sound
    pub sound: String,
    pub source: PathBuf,
    pub channel: u8,
    pub frame_start: i32,
    pub frame_end: i32,
    pub volume: f32,
    pub pan: f32,
}

impl Segment {
    pub fn key(&self) -> SegmentKey {
        SegmentKey::new(self.sound.clone(), self.frame_start, self.frame_end)
    }

    pub fn matches(&self, sound: &str, start: i32, end: i32) -> bool {
        self.sound == sound && self.frame_start == start && self.frame_end == end
    }
}

/// Natural key of a segment: (sound, start, end)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentKey {
    pub sound: String,
    pub frame_start: i32,
    pub frame_end: i32,
}

impl SegmentKey {
    pub fn new(sound: impl Into<String>, frame_start: i32, frame_end: i32) -> Self {
        Self {
            sound: sound.into(),
            frame_start,
            frame_end,
        }
    }
}

/// Host timeline capabilities used by the core
pub trait Timeline {
    fn segments(&self) -> impl Iterator<Item = &Segment>;

    fn segments_mut(&mut self) -> impl Iterator<Item = &mut Segment>;

    /// Create a new segment starting at `start`. The end frame is left equal to
    /// the start; callers set it afterwards.
    fn create_segment(&mut self, name: &str, sound: &Sound, channel: u8, start: i32)
        -> &mut Segment;
}

/// In-memory timeline
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Sequence {
    segments: Vec<Segment>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, sound: &str, start: i32, end: i32) -> Option<&Segment> {
        self.segments.iter().find(|s| s.matches(sound, start, end))
    }

    /// Segments bound to `sound`, in creation order
    pub fn segments_for<'a>(&'a self, sound: &'a str) -> impl Iterator<Item = &'a Segment> + 'a {
        self.segments.iter().filter(move |s| s.sound == sound)
    }
}

impl Timeline for Sequence {
    fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    fn segments_mut(&mut self) -> impl Iterator<Item = &mut Segment> {
        self.segments.iter_mut()
    }

    fn create_segment(&mut self, name: &str, sound: &Sound, channel: u8, start: i32) -> &mut Segment {
        let index = self.segments.len();
        self.segments.push(Segment {
            name: name.to_string(),
            sound: sound.name.clone(),
            source: sound.path.clone(),
            channel,
            frame_start: start,
            frame_end: start,
            volume: 1.0,
            pan: 0.0,
        });
        &mut self.segments[index]
    }
}
