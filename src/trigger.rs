//! Trigger policy: should an attachment sound at a given frame?

use crate::attachment::Attachment;

/// True when `frame` lies in the main interval, is one of the repeat frames, or
/// falls on the periodic repeat grid after the main interval.
///
/// Placement history (`added_frames`) is not consulted here.
pub fn should_trigger(attachment: &Attachment, frame: i32) -> bool {
    let in_main = attachment.frame_start <= frame && frame <= attachment.frame_end;
    in_main || attachment.repeat_frames.contains(frame) || is_periodic_repeat(attachment, frame)
}

/// True when `frame` is `frame_end + k * repeat_interval` for some `k >= 1`.
pub fn is_periodic_repeat(attachment: &Attachment, frame: i32) -> bool {
    let interval = i64::from(attachment.repeat_interval);
    if interval == 0 || frame <= attachment.frame_end {
        return false;
    }
    (i64::from(frame) - i64::from(attachment.frame_end)) % interval == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::AttachmentSettings;

    fn attachment(settings: AttachmentSettings) -> Attachment {
        Attachment::new("bell", &settings).unwrap()
    }

    #[test]
    fn test_main_interval_and_periodic_repeats() {
        let a = attachment(AttachmentSettings::new(10, 20).with_repeat_interval(5));

        for frame in [10, 15, 20, 25, 30, 35] {
            assert!(should_trigger(&a, frame), "frame {} should trigger", frame);
        }
        for frame in [9, 21, 22, 23, 24, 26] {
            assert!(!should_trigger(&a, frame), "frame {} should not trigger", frame);
        }
    }

    #[test]
    fn test_repeat_frames() {
        let a = attachment(AttachmentSettings::new(1, 5).with_repeat_frames("40,-60"));
        assert!(should_trigger(&a, 40));
        assert!(should_trigger(&a, 60));
        assert!(!should_trigger(&a, 41));
    }

    #[test]
    fn test_zero_interval_never_repeats() {
        let a = attachment(AttachmentSettings::new(1, 5));
        assert!(!is_periodic_repeat(&a, 10));
        assert!(!should_trigger(&a, 6));
    }

    #[test]
    fn test_ignores_added_frames() {
        let mut a = attachment(AttachmentSettings::new(1, 5));
        a.added_frames.insert(3);
        assert!(should_trigger(&a, 3));
    }
}
