//! Audio clips
//!
//! An [`AudioClip`] is a cheap, clonable handle to encoded audio bytes.
//! Clips compare by identity: two loads of the same file are different clips.

use crate::audio::AudioError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_CLIP_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique clip identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClipId(u64);

impl ClipId {
    fn next() -> Self {
        Self(NEXT_CLIP_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Supported audio formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// WAV uncompressed
    Wav,
    /// OGG Vorbis compressed
    Ogg,
    /// MP3 compressed
    Mp3,
    /// FLAC lossless
    Flac,
    /// Unknown format
    Unknown,
}

impl AudioFormat {
    /// Detect format from magic bytes
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.len() < 4 {
            return Self::Unknown;
        }

        match &bytes[0..4] {
            b"RIFF" => Self::Wav,
            b"OggS" => Self::Ogg,
            b"fLaC" => Self::Flac,
            // MP3 can start with ID3 tag or frame sync
            [0xFF, 0xFB, _, _] | [0xFF, 0xFA, _, _] | [b'I', b'D', b'3', _] => Self::Mp3,
            _ => Self::Unknown,
        }
    }
}

/// Handle to a loaded audio clip
#[derive(Clone)]
pub struct AudioClip {
    id: ClipId,
    name: Arc<str>,
    data: Arc<[u8]>,
    format: AudioFormat,
    duration: Option<f32>,
}

impl AudioClip {
    /// Create a clip from encoded bytes of a known format
    pub fn new<S: Into<String>>(name: S, data: Vec<u8>, format: AudioFormat) -> Self {
        let name: String = name.into();
        Self {
            id: ClipId::next(),
            name: Arc::from(name),
            data: Arc::from(data),
            format,
            duration: None,
        }
    }

    /// Create a clip from encoded bytes, detecting the format
    ///
    /// # Errors
    /// `InvalidClip` if the data is empty or its format is not recognised.
    /// Decoding is left to the backend at playback time.
    pub fn from_bytes<S: Into<String>>(name: S, bytes: &[u8]) -> Result<Self, AudioError> {
        let name: String = name.into();
        if bytes.is_empty() {
            return Err(AudioError::InvalidClip(format!("{name}: empty audio data")));
        }

        let format = AudioFormat::detect(bytes);
        if format == AudioFormat::Unknown {
            return Err(AudioError::InvalidClip(format!("{name}: unknown audio format")));
        }

        Ok(Self::new(name, bytes.to_vec(), format))
    }

    /// Load a clip from disk; the clip is named after the file stem
    ///
    /// # Errors
    /// - `Io` if the file cannot be read
    /// - `InvalidClip` if its contents are empty or of an unknown format
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AudioError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path.file_stem().map_or_else(
            || path.display().to_string(),
            |stem| stem.to_string_lossy().into_owned(),
        );

        let clip = Self::from_bytes(name, &bytes)?;
        log::debug!("Loaded clip '{}' ({:?}, {} bytes)", clip.name, clip.format, clip.data.len());
        Ok(clip)
    }

    /// Attach a known playback length in seconds
    #[must_use]
    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = Some(seconds.max(0.0));
        self
    }

    /// Clip identity
    pub fn id(&self) -> ClipId {
        self.id
    }

    /// Clip name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encoded audio bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Shared encoded bytes, for backends that decode on their own thread
    pub fn shared_data(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    /// Encoded format
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Playback length in seconds, if known
    pub fn duration(&self) -> Option<f32> {
        self.duration
    }
}

impl PartialEq for AudioClip {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AudioClip {}

impl Hash for AudioClip {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioClip")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("format", &self.format)
            .field("bytes", &self.data.len())
            .field("duration", &self.duration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(AudioFormat::detect(b"RIFF....WAVE"), AudioFormat::Wav);
        assert_eq!(AudioFormat::detect(b"OggS...."), AudioFormat::Ogg);
        assert_eq!(AudioFormat::detect(b"fLaC...."), AudioFormat::Flac);
        assert_eq!(AudioFormat::detect(b"ID3\x04...."), AudioFormat::Mp3);
        assert_eq!(AudioFormat::detect(b"ABCD"), AudioFormat::Unknown);
        assert_eq!(AudioFormat::detect(b"RI"), AudioFormat::Unknown);
    }

    #[test]
    fn test_empty_data_fails() {
        let result = AudioClip::from_bytes("empty", &[]);
        assert!(matches!(result, Err(AudioError::InvalidClip(_))));
    }

    #[test]
    fn test_unknown_format_fails() {
        let result = AudioClip::from_bytes("noise", b"not audio at all");
        assert!(matches!(result, Err(AudioError::InvalidClip(_))));
    }

    #[test]
    fn test_clips_compare_by_identity() {
        let a = AudioClip::from_bytes("theme", b"RIFF....WAVE").unwrap();
        let b = AudioClip::from_bytes("theme", b"RIFF....WAVE").unwrap();

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_duration_is_never_negative() {
        let clip = AudioClip::new("blip", vec![0; 8], AudioFormat::Wav).with_duration(-1.0);
        assert_eq!(clip.duration(), Some(0.0));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = AudioClip::from_file("definitely/not/here.wav");
        assert!(matches!(result, Err(AudioError::Io(_))));
    }
}
