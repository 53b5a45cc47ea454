//! Orientation-aware image loading.
//!
//! Sources are buffered once: the raw bytes are read a single time and both
//! the EXIF metadata pass and the pixel decode read from that buffer, so no
//! source needs to be opened twice. All handles are scope-bound and released
//! on every exit path.

use std::io::Cursor;
use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::error::DecodeError;
use crate::geometry::{self, Rotation};

/// Orientation correction derived from the EXIF orientation tag.
///
/// Only the pure rotations are distinguished; mirrored variants and unknown
/// values are treated as `Normal`, matching the capture pipeline this feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Display upright as stored.
    #[default]
    Normal,
    /// Needs a 90 degree clockwise turn.
    Rotate90,
    /// Needs a half turn.
    Rotate180,
    /// Needs a 270 degree clockwise turn.
    Rotate270,
}

impl Orientation {
    /// Map a raw EXIF orientation value (1..=8) to a correction.
    ///
    /// 6 -> Rotate90, 3 -> Rotate180, 8 -> Rotate270; everything else,
    /// including the mirrored variants, is Normal.
    pub fn from_exif(value: u32) -> Self {
        match value {
            3 => Orientation::Rotate180,
            6 => Orientation::Rotate90,
            8 => Orientation::Rotate270,
            _ => Orientation::Normal,
        }
    }

    /// The geometry rotation that corrects this orientation.
    pub fn correction(self) -> Rotation {
        match self {
            Orientation::Normal => Rotation::None,
            Orientation::Rotate90 => Rotation::Deg90,
            Orientation::Rotate180 => Rotation::Deg180,
            Orientation::Rotate270 => Rotation::Deg270,
        }
    }
}

/// Read the EXIF orientation from raw image bytes.
///
/// Best-effort: absent EXIF data, an unreadable container or a missing tag
/// all yield `Normal`. Metadata problems never fail a load.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    let reader = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(reader) => reader,
        Err(e) => {
            debug!("No usable EXIF data, assuming normal orientation: {}", e);
            return Orientation::Normal;
        }
    };

    let value = reader
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .unwrap_or(1);

    Orientation::from_exif(value)
}

/// Decode an image from an in-memory buffer, correcting EXIF orientation.
///
/// Returns `DecodeError` if the bytes do not decode; no partial result is
/// produced in that case.
pub fn load_from_bytes(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let orientation = read_orientation(bytes);

    let decoded = image::load_from_memory(bytes)?;

    let correction = orientation.correction();
    if correction != Rotation::None {
        debug!("Applying EXIF orientation correction: {:?}", orientation);
    }

    Ok(geometry::rotate(&decoded, correction))
}

/// Load and decode an image file, correcting EXIF orientation.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<DynamicImage, DecodeError> {
    let path = path.as_ref();
    debug!("Loading image from {}", path.display());

    let bytes = std::fs::read(path)?;
    load_from_bytes(&bytes)
}
