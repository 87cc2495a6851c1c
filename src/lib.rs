//! Sound attachments for animated 3D scenes
//!
//! Sounds are attached to scene objects and placed on a timeline when playback
//! reaches their frame ranges, with volume following the object's distance to
//! the camera. A separate set of offline effects renders processed copies of
//! audio files.

pub mod assets;
pub mod attachment;
pub mod attenuation;
#[cfg(feature = "bounce")]
pub mod bounce;
pub mod buffer;
pub mod effects;
pub mod error;
pub mod filters;
pub mod frames;
pub mod scene;
pub mod scheduler;
pub mod timeline;
pub mod trigger;
pub mod utils;

pub use assets::{Sound, SoundLibrary};
pub use attachment::{Attachment, AttachmentSettings};
pub use attenuation::AttenuationSettings;
pub use buffer::AudioBuffer;
pub use effects::{ChainSettings, Effect, EffectChain};
pub use error::{Error, Result};
pub use frames::FrameSet;
pub use scene::{Object, Scene, SceneGraph, SceneObject};
pub use scheduler::{FrameReport, PlaybackScheduler};
pub use timeline::{Segment, SegmentKey, Sequence, Timeline};
