//! Frame-list codec
//!
//! Frame lists are persisted as comma separated text ("1,50,100"). The text form
//! only exists at the persistence boundary; everything else works on
//! [`FrameSet`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Extract every maximal run of decimal digits from `text`, left to right.
///
/// Separators of any kind are skipped, including minus signs, so `"-5"` yields
/// `5`. Duplicates are kept. Runs that do not fit in an `i32` are dropped, which
/// means malformed input degrades to fewer (or zero) frames instead of failing.
pub fn decode(text: &str) -> Vec<i32> {
    let mut frames = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, ch) in text.char_indices() {
        match (ch.is_ascii_digit(), run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                push_run(&text[start..i], &mut frames);
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        push_run(&text[start..], &mut frames);
    }

    frames
}

fn push_run(run: &str, frames: &mut Vec<i32>) {
    match run.parse::<i32>() {
        Ok(frame) => frames.push(frame),
        Err(_) => log::warn!("ignoring out of range frame number '{}'", run),
    }
}

/// Join frames with commas in the given order. No sorting, no dedup.
pub fn encode(frames: &[i32]) -> String {
    let mut out = String::with_capacity(frames.len() * 4);
    for (i, frame) in frames.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&frame.to_string());
    }
    out
}

/// An ordered set of frame numbers, each present at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameSet {
    frames: BTreeSet<i32>,
}

impl FrameSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the persisted text form. Duplicates collapse.
    pub fn parse(text: &str) -> Self {
        decode(text).into_iter().collect()
    }

    /// Returns `true` when the frame was not already present.
    pub fn insert(&mut self, frame: i32) -> bool {
        self.frames.insert(frame)
    }

    pub fn contains(&self, frame: i32) -> bool {
        self.frames.contains(&frame)
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Frames in ascending order
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.frames.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<i32> {
        self.iter().collect()
    }

    /// Text form used for persistence
    pub fn encode(&self) -> String {
        encode(&self.to_vec())
    }
}

impl FromIterator<i32> for FrameSet {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for FrameSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl Serialize for FrameSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for FrameSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::parse(&text))
    }
}
