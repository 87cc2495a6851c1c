//! Scene graph interface
//!
//! The scheduler only needs a camera position and, per object, a name, a
//! position and a slot holding the attachment. Hosts implement [`SceneGraph`]
//! and [`SceneObject`]; [`Scene`] is a plain in-memory implementation used by
//! the CLI and the tests.

use crate::attachment::Attachment;
use crate::attenuation::AttenuationSettings;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Something placed in the scene that can carry an attachment
pub trait SceneObject {
    fn name(&self) -> &str;

    fn position(&self) -> Vec3;

    fn attachment(&self) -> Option<&Attachment>;

    fn attachment_mut(&mut self) -> Option<&mut Attachment>;

    fn set_attachment(&mut self, attachment: Option<Attachment>);
}

/// Read access to the camera and mutable access to the objects
pub trait SceneGraph {
    type Object: SceneObject;

    /// World position of the active camera, `None` when there is no camera
    fn camera_position(&self) -> Option<Vec3>;

    fn objects(&self) -> impl Iterator<Item = &Self::Object>;

    fn objects_mut(&mut self) -> impl Iterator<Item = &mut Self::Object>;

    fn object(&self, name: &str) -> Option<&Self::Object> {
        self.objects().find(|o| o.name() == name)
    }

    fn object_mut(&mut self, name: &str) -> Option<&mut Self::Object> {
        self.objects_mut().find(|o| o.name() == name)
    }
}

/// In-memory scene object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub name: String,
    pub position: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

impl Object {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            attachment: None,
        }
    }
}

impl SceneObject for Object {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    fn attachment_mut(&mut self) -> Option<&mut Attachment> {
        self.attachment.as_mut()
    }

    fn set_attachment(&mut self, attachment: Option<Attachment>) {
        self.attachment = attachment;
    }
}

fn default_frame_start() -> i32 {
    1
}

fn default_frame_end() -> i32 {
    250
}

/// In-memory scene
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub camera: Option<Vec3>,
    #[serde(default)]
    pub objects: Vec<Object>,
    #[serde(default)]
    pub attenuation: AttenuationSettings,
    #[serde(default = "default_frame_start")]
    pub frame_start: i32,
    #[serde(default = "default_frame_end")]
    pub frame_end: i32,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            camera: None,
            objects: Vec::new(),
            attenuation: AttenuationSettings::default(),
            frame_start: default_frame_start(),
            frame_end: default_frame_end(),
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera(mut self, position: Vec3) -> Self {
        self.camera = Some(position);
        self
    }

    pub fn add_object(&mut self, object: Object) {
        self.objects.push(object);
    }
}

impl SceneGraph for Scene {
    type Object = Object;

    fn camera_position(&self) -> Option<Vec3> {
        self.camera
    }

    fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.iter()
    }

    fn objects_mut(&mut self) -> impl Iterator<Item = &mut Object> {
        self.objects.iter_mut()
    }
}
