//! WAV file I/O and the offline effect chain runner
//!
//! Anything hound can read is accepted as input. Output is always 16-bit PCM
//! WAV, written to a sibling `.partial` file and renamed into place once
//! complete.

use crate::assets::{sound_name_for, Sound, SoundLibrary};
use crate::buffer::AudioBuffer;
use crate::effects::EffectChain;
use crate::error::{Error, Result};
use crate::scene::SceneObject;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::fs;
use std::path::{Path, PathBuf};

/// Bit depth of every exported file
pub const EXPORT_BITS_PER_SAMPLE: u16 = 16;

fn load_error(path: &Path, e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
    Error::BufferLoad {
        path: path.to_path_buf(),
        source: e.into(),
    }
}

fn export_error(path: &Path, e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
    Error::BufferExport {
        path: path.to_path_buf(),
        source: e.into(),
    }
}

/// Read a WAV file into a normalised buffer
pub fn load_wav(path: impl AsRef<Path>) -> Result<AudioBuffer> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::MissingFile(path.to_path_buf()));
    }

    let mut reader = WavReader::open(path).map_err(|e| load_error(path, e))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| load_error(path, e))?,
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(load_error(
                    path,
                    format!("unsupported bit depth {}", spec.bits_per_sample),
                ));
            }
            let scale = ((1u64 << (spec.bits_per_sample - 1)) - 1) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v as f32 / scale).clamp(-1.0, 1.0)))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| load_error(path, e))?
        }
    };

    let bits = match spec.sample_format {
        SampleFormat::Float => 32,
        SampleFormat::Int => spec.bits_per_sample,
    };
    log::debug!(
        "loaded {} ({} ch, {} Hz, {} bit, {} samples)",
        path.display(),
        spec.channels,
        spec.sample_rate,
        bits,
        samples.len()
    );

    Ok(AudioBuffer::new(samples, spec.channels, spec.sample_rate, bits))
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

fn write_wav(buffer: &AudioBuffer, path: &Path) -> std::result::Result<(), hound::Error> {
    let spec = WavSpec {
        channels: buffer.channels,
        sample_rate: buffer.sample_rate,
        bits_per_sample: EXPORT_BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &sample in &buffer.samples {
        let quantized = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16;
        writer.write_sample(quantized)?;
    }
    writer.finalize()
}

/// Write `buffer` as 16-bit PCM WAV.
///
/// On failure nothing is left at `path`; an existing file there is only
/// replaced once the new one is complete.
pub fn export_wav(buffer: &AudioBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let partial = partial_path(path);

    if let Err(e) = write_wav(buffer, &partial) {
        let _ = fs::remove_file(&partial);
        return Err(export_error(path, e));
    }
    if let Err(e) = fs::rename(&partial, path) {
        let _ = fs::remove_file(&partial);
        return Err(export_error(path, e));
    }

    log::debug!("exported {} frames to {}", buffer.frames(), path.display());
    Ok(())
}

/// Load `input`, run `chain` over it and export the result to `output`.
///
/// Returns the output path. When loading or exporting fails no output file is
/// written.
pub fn process_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    chain: &EffectChain,
) -> Result<PathBuf> {
    let input = input.as_ref();
    let output = output.as_ref();

    let buffer = load_wav(input)?;
    let processed = chain.apply(&buffer);
    export_wav(&processed, output)?;

    log::info!(
        "processed {} -> {} ({} effects, {:.0} ms)",
        input.display(),
        output.display(),
        chain.len(),
        processed.duration_ms()
    );
    Ok(output.to_path_buf())
}

/// Render the sound attached to `object` through `chain` into `output`,
/// register the result and rebind the attachment to it.
///
/// The new sound is named after the output file. Rendering again to the same
/// file reuses its library entry; a name already taken by another file is
/// rejected before anything is written. The attachment's `added_frames` are
/// reset so the rendered sound gets placed on the timeline again. Returns the
/// name of the new sound.
pub fn process_attached<O: SceneObject>(
    library: &mut SoundLibrary,
    object: &mut O,
    chain: &EffectChain,
    output: impl AsRef<Path>,
) -> Result<String> {
    let output = output.as_ref();
    let owner = object.name().to_string();

    let attachment = object
        .attachment()
        .ok_or_else(|| Error::NoAttachment(owner.clone()))?;
    let source = library
        .get(&attachment.sound_name)
        .ok_or_else(|| Error::UnresolvedSound {
            object: owner.clone(),
            sound: attachment.sound_name.clone(),
        })?
        .path
        .clone();

    let name = sound_name_for(output);
    if library.get(&name).is_some_and(|s| s.path != output) {
        return Err(Error::DuplicateSound(name));
    }

    process_file(&source, output, chain)?;
    let sound = Sound::from_wav(output)?;
    let name = library.insert_or_reuse(sound)?.name.clone();

    if let Some(attachment) = object.attachment_mut() {
        log::info!(
            "'{}' now plays '{}' (was '{}')",
            owner,
            name,
            attachment.sound_name
        );
        attachment.sound_name = name.clone();
        attachment.added_frames.clear();
    }
    Ok(name)
}
