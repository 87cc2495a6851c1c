//! Sound asset table
//!
//! The table is an ordinary value owned by whoever drives the scheduler and
//! passed in by reference. Names are unique.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name a sound loaded from `path` is registered under: its file name
pub fn sound_name_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A loadable audio asset
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sound {
    pub name: String,
    pub path: PathBuf,
    pub sample_rate: u32,
}

impl Sound {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, sample_rate: u32) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            sample_rate,
        }
    }

    /// Read the WAV header at `path` and describe it as a sound named after the file.
    #[cfg(feature = "bounce")]
    pub fn from_wav(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingFile(path.to_path_buf()));
        }
        let reader = hound::WavReader::open(path).map_err(|e| Error::BufferLoad {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        Ok(Self::new(sound_name_for(path), path, reader.spec().sample_rate))
    }
}

/// Name-keyed table of loaded sounds
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundLibrary {
    sounds: BTreeMap<String, Sound>,
}

impl SoundLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sound. A sound with the same name is never replaced.
    pub fn insert(&mut self, sound: Sound) -> Result<&Sound> {
        if self.sounds.contains_key(&sound.name) {
            return Err(Error::DuplicateSound(sound.name));
        }
        let name = sound.name.clone();
        log::info!("loaded sound '{}' ({} Hz)", name, sound.sample_rate);
        Ok(self.sounds.entry(name).or_insert(sound))
    }

    /// Add a sound, or keep the entry already registered for the same file.
    ///
    /// A name taken by a different file is still a [`Error::DuplicateSound`].
    pub fn insert_or_reuse(&mut self, sound: Sound) -> Result<&Sound> {
        let same_file = self.sounds.get(&sound.name).map(|e| e.path == sound.path);
        match same_file {
            Some(false) => Err(Error::DuplicateSound(sound.name)),
            Some(true) => {
                let entry = self
                    .sounds
                    .entry(sound.name.clone())
                    .and_modify(|e| e.sample_rate = sound.sample_rate)
                    .or_insert(sound);
                Ok(entry)
            }
            None => self.insert(sound),
        }
    }

    /// Load a WAV file from disk and add it
    #[cfg(feature = "bounce")]
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&Sound> {
        let sound = Sound::from_wav(path)?;
        self.insert(sound)
    }

    pub fn get(&self, name: &str) -> Option<&Sound> {
        self.sounds.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Sound> {
        self.sounds.remove(name)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sound> {
        self.sounds.values()
    }
}
