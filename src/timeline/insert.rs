//! Idempotent segment placement

use super::{allocate_channel, SegmentKey, Timeline};
use crate::assets::Sound;
use crate::attachment::Attachment;

/// Where a sound ended up after [`insert_or_update`]
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub key: SegmentKey,
    pub channel: u8,
    /// False when an existing segment was updated in place
    pub created: bool,
}

/// Place `sound` over `[start, end]`, or refresh the segment already there.
///
/// Segments are matched on (sound, start, end). A match only gets its volume
/// and pan overwritten; otherwise a new segment named `{owner}_{sound}_{start}`
/// is created on a freshly allocated lane. Calling this every frame with the
/// same triple never grows the timeline.
pub fn insert_or_update<T: Timeline>(
    timeline: &mut T,
    owner: &str,
    sound: &Sound,
    start: i32,
    end: i32,
    volume: f32,
    pan: f32,
) -> Placement {
    let key = SegmentKey::new(sound.name.clone(), start, end);

    if let Some(segment) = timeline
        .segments_mut()
        .find(|s| s.matches(&sound.name, start, end))
    {
        segment.volume = volume;
        segment.pan = pan;
        return Placement {
            key,
            channel: segment.channel,
            created: false,
        };
    }

    let channel = allocate_channel(timeline, owner);
    let name = format!("{}_{}_{}", owner, sound.name, start);
    let segment = timeline.create_segment(&name, sound, channel, start);
    segment.frame_end = end;
    segment.volume = volume;
    segment.pan = pan;

    log::debug!(
        "added '{}' on lane {} at frames {}-{} (volume {:.2}, pan {:.2})",
        sound.name,
        channel,
        start,
        end,
        volume,
        pan
    );

    Placement {
        key,
        channel,
        created: true,
    }
}

/// Set the volume of every segment bound to `sound`. Returns the number of segments touched.
pub fn set_sound_gain<T: Timeline>(timeline: &mut T, sound: &str, volume: f32) -> usize {
    let mut count = 0;
    for segment in timeline.segments_mut().filter(|s| s.sound == sound) {
        segment.volume = volume;
        count += 1;
    }
    count
}

/// Place the main interval of `attachment` plus every periodic repeat that
/// starts before `scene_end`.
pub fn place_with_repeats<T: Timeline>(
    timeline: &mut T,
    owner: &str,
    sound: &Sound,
    attachment: &Attachment,
    scene_end: i32,
) -> Vec<Placement> {
    let mut placements = vec![insert_or_update(
        timeline,
        owner,
        sound,
        attachment.frame_start,
        attachment.frame_end,
        1.0,
        0.0,
    )];

    let interval = i64::from(attachment.repeat_interval);
    if interval > 0 {
        let duration = i64::from(attachment.duration());
        let mut start = i64::from(attachment.frame_end) + interval;
        while start < i64::from(scene_end) {
            let Ok(end) = i32::try_from(start + duration) else {
                break;
            };
            // start < scene_end so it fits
            let frame = start as i32;
            placements.push(insert_or_update(timeline, owner, sound, frame, end, 1.0, 0.0));
            start += interval;
        }
    }

    placements
}
