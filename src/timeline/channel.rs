//! Lane allocation for new segments

use super::Timeline;

/// Number of timeline lanes, numbered `1..=MAX_CHANNELS`
pub const MAX_CHANNELS: u8 = 32;

/// Pick a lane for a new segment owned by `owner`.
///
/// A segment belongs to `owner` when its name starts with the owner name. The
/// lowest lane that no segment uses at all wins; failing that, the lowest lane
/// the owner does not use yet. When the owner already occupies every lane the
/// result is lane 1, which is then shared.
///
/// While any lane is free, a new segment never shares a lane with a segment of
/// a different owner, so the owner-only rule applies only once all lanes are
/// taken.
pub fn allocate_channel<T: Timeline>(timeline: &T, owner: &str) -> u8 {
    // Bit n set = lane n in use
    let mut used_by_owner: u64 = 0;
    let mut used_by_any: u64 = 0;
    for segment in timeline.segments() {
        if segment.channel == 0 || segment.channel > MAX_CHANNELS {
            continue;
        }
        let bit = 1u64 << segment.channel;
        used_by_any |= bit;
        if segment.name.starts_with(owner) {
            used_by_owner |= bit;
        }
    }

    let lowest_free = |used: u64| (1..=MAX_CHANNELS).find(|&c| used & (1u64 << c) == 0);

    lowest_free(used_by_any)
        .or_else(|| lowest_free(used_by_owner))
        .unwrap_or(1)
}
