// Integration tests for the playback scheduler

use glam::Vec3;
use scenesound::attachment::{attach, remove_sound, update};
use scenesound::{
    AttachmentSettings, AttenuationSettings, Error, Object, PlaybackScheduler, Scene, SceneGraph,
    SceneObject, Sequence, Sound, SoundLibrary, Timeline,
};

fn library() -> SoundLibrary {
    let mut library = SoundLibrary::new();
    library
        .insert(Sound::new("bell", "/sounds/bell.wav", 44100))
        .unwrap();
    library
        .insert(Sound::new("gong", "/sounds/gong.wav", 48000))
        .unwrap();
    library
}

/// Camera at the origin, one object 10 units away
fn scene_with(name: &str, position: Vec3) -> Scene {
    let mut scene = Scene::new().with_camera(Vec3::ZERO);
    scene.add_object(Object::new(name, position));
    scene
}

#[test]
fn test_main_interval_and_repeats() {
    let library = library();
    let mut scene = scene_with("cube", Vec3::new(10.0, 0.0, 0.0));
    let mut timeline = Sequence::new();
    let scheduler = PlaybackScheduler::default();

    let settings = AttachmentSettings::new(1, 50).with_repeat_frames("100,150");
    attach(scene.object_mut("cube").unwrap(), &library, "bell", &settings).unwrap();

    for frame in [1, 50, 100, 150, 200] {
        scheduler
            .on_frame_change(&mut scene, &mut timeline, &library, frame)
            .unwrap();
    }

    let starts: Vec<(i32, i32)> = timeline
        .segments()
        .map(|s| (s.frame_start, s.frame_end))
        .collect();
    assert_eq!(starts, vec![(1, 50), (100, 149), (150, 199)]);
    assert!(
        timeline.segments().all(|s| (s.volume - 0.5).abs() < 1e-6),
        "every segment of the sound should carry the distance gain"
    );

    // Running again at a repeat frame places nothing new
    let report = scheduler
        .on_frame_change(&mut scene, &mut timeline, &library, 100)
        .unwrap();
    assert!(report.inserted.is_empty());
    assert_eq!(timeline.len(), 3);

    let attachment = scene.object("cube").unwrap().attachment().unwrap();
    assert_eq!(attachment.added_frames.to_vec(), vec![1, 100, 150]);
}

#[test]
fn test_gain_follows_the_object() {
    let library = library();
    let mut scene = scene_with("cube", Vec3::new(5.0, 0.0, 0.0));
    let mut timeline = Sequence::new();
    let scheduler = PlaybackScheduler::default();

    attach(
        scene.object_mut("cube").unwrap(),
        &library,
        "bell",
        &AttachmentSettings::new(1, 100),
    )
    .unwrap();

    scheduler
        .on_frame_change(&mut scene, &mut timeline, &library, 1)
        .unwrap();
    assert!((timeline.get("bell", 1, 100).unwrap().volume - 0.75).abs() < 1e-6);

    scene.objects[0].position = Vec3::new(0.0, 30.0, 0.0);
    let report = scheduler
        .on_frame_change(&mut scene, &mut timeline, &library, 2)
        .unwrap();
    assert_eq!(report.gain_updates, 1);
    assert_eq!(timeline.get("bell", 1, 100).unwrap().volume, 0.0);

    // The legacy floor keeps far objects audible
    let legacy = PlaybackScheduler::new(AttenuationSettings::legacy());
    legacy
        .on_frame_change(&mut scene, &mut timeline, &library, 3)
        .unwrap();
    assert!((timeline.get("bell", 1, 100).unwrap().volume - 0.1).abs() < 1e-6);
}

#[test]
fn test_missing_camera_changes_nothing() {
    let library = library();
    let mut scene = Scene::new();
    scene.add_object(Object::new("cube", Vec3::ONE));
    attach(
        scene.object_mut("cube").unwrap(),
        &library,
        "bell",
        &AttachmentSettings::new(1, 10),
    )
    .unwrap();
    let mut timeline = Sequence::new();

    let result = PlaybackScheduler::default().on_frame_change(&mut scene, &mut timeline, &library, 1);

    assert!(matches!(result, Err(Error::MissingCamera)));
    assert!(timeline.is_empty());
    assert!(scene.objects[0].attachment().unwrap().added_frames.is_empty());
}

#[test]
fn test_broken_object_does_not_stop_the_others() {
    let library = library();
    let mut scene = scene_with("cube", Vec3::ZERO);
    scene.add_object(Object::new("sphere", Vec3::ZERO));
    let mut timeline = Sequence::new();

    attach(
        scene.object_mut("cube").unwrap(),
        &library,
        "bell",
        &AttachmentSettings::new(1, 10),
    )
    .unwrap();
    attach(
        scene.object_mut("sphere").unwrap(),
        &library,
        "gong",
        &AttachmentSettings::new(1, 20),
    )
    .unwrap();

    // The sound disappears from the table but the attachment keeps its name
    let mut reduced = SoundLibrary::new();
    reduced
        .insert(Sound::new("gong", "/sounds/gong.wav", 48000))
        .unwrap();

    let report = PlaybackScheduler::default()
        .on_frame_change(&mut scene, &mut timeline, &reduced, 1)
        .unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].object, "cube");
    assert!(matches!(
        report.skipped[0].reason,
        Error::UnresolvedSound { .. }
    ));
    assert_eq!(timeline.len(), 1);
    assert!(timeline.get("gong", 1, 20).is_some());
}

#[test]
fn test_objects_without_attachment_are_ignored() {
    let library = library();
    let mut scene = scene_with("lamp", Vec3::ZERO);
    scene.add_object(Object::new("cube", Vec3::new(10.0, 0.0, 0.0)));
    scene.add_object(Object::new("plane", Vec3::ONE));
    let mut timeline = Sequence::new();

    attach(
        scene.object_mut("cube").unwrap(),
        &library,
        "bell",
        &AttachmentSettings::new(1, 10),
    )
    .unwrap();

    let report = PlaybackScheduler::default()
        .on_frame_change(&mut scene, &mut timeline, &library, 1)
        .unwrap();

    assert!(
        report.skipped.is_empty(),
        "objects without a sound are not reported as skipped"
    );
    assert_eq!(report.inserted.len(), 1);
    assert_eq!(timeline.len(), 1);
    assert!((timeline.get("bell", 1, 10).unwrap().volume - 0.5).abs() < 1e-6);
    assert!(scene.object("lamp").unwrap().attachment().is_none());
}

#[test]
fn test_update_allows_replacement() {
    let library = library();
    let mut scene = scene_with("cube", Vec3::ZERO);
    let mut timeline = Sequence::new();
    let scheduler = PlaybackScheduler::default();

    attach(
        scene.object_mut("cube").unwrap(),
        &library,
        "bell",
        &AttachmentSettings::new(1, 10),
    )
    .unwrap();
    scheduler
        .on_frame_change(&mut scene, &mut timeline, &library, 1)
        .unwrap();

    // Same start, new end: a second segment once added_frames is reset
    update(
        scene.object_mut("cube").unwrap(),
        &AttachmentSettings::new(1, 30),
    )
    .unwrap();
    scheduler
        .on_frame_change(&mut scene, &mut timeline, &library, 1)
        .unwrap();

    assert_eq!(timeline.len(), 2);
    assert!(timeline.get("bell", 1, 30).is_some());
}

#[test]
fn test_periodic_repeats() {
    let library = library();
    let mut scene = scene_with("cube", Vec3::ZERO);
    let mut timeline = Sequence::new();
    let scheduler = PlaybackScheduler::default();

    let settings = AttachmentSettings::new(10, 20).with_repeat_interval(5);
    attach(scene.object_mut("cube").unwrap(), &library, "bell", &settings).unwrap();

    for frame in 1..=35 {
        scheduler
            .on_frame_change(&mut scene, &mut timeline, &library, frame)
            .unwrap();
    }

    let starts: Vec<i32> = timeline.segments().map(|s| s.frame_start).collect();
    assert_eq!(starts, vec![10, 25, 30, 35]);
}

#[test]
fn test_removed_sound_leaves_segments() {
    let mut library = library();
    let mut scene = scene_with("cube", Vec3::ZERO);
    let mut timeline = Sequence::new();

    attach(
        scene.object_mut("cube").unwrap(),
        &library,
        "bell",
        &AttachmentSettings::new(1, 10),
    )
    .unwrap();
    PlaybackScheduler::default()
        .on_frame_change(&mut scene, &mut timeline, &library, 1)
        .unwrap();

    assert_eq!(remove_sound(&mut library, &mut scene, "bell"), 1);
    assert!(scene.objects[0].attachment().is_none());
    assert!(!library.contains("bell"));
    assert_eq!(timeline.len(), 1);
}
