//! EXIF GPS tag reading for images

use super::{GpsTag, Rational, RawTags, TagValue};
use crate::error::{Error, Result};
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, trace};

/// Reads the GPS tags embedded in a media file
pub trait TagReader {
    /// Return the GPS tags found in `path`; a file without metadata yields an empty set
    fn read_tags(&self, path: &Path) -> Result<RawTags>;
}

/// [`TagReader`] backed by kamadak-exif
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifTagReader;

impl ExifTagReader {
    pub fn new() -> Self {
        Self
    }
}

impl TagReader for ExifTagReader {
    fn read_tags(&self, path: &Path) -> Result<RawTags> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut exif_reader = Reader::new();
        exif_reader.continue_on_error(true);

        let exif = match exif_reader.read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(exif::Error::PartialResult(partial)) => {
                let (exif, errors) = partial.into_inner();
                debug!(?path, errors = errors.len(), "EXIF data partially readable");
                exif
            }
            Err(exif::Error::NotFound(_)) | Err(exif::Error::InvalidFormat(_)) => {
                debug!(?path, "No EXIF container found");
                return Ok(RawTags::new());
            }
            Err(exif::Error::Io(e)) => return Err(Error::Io(e)),
            Err(e) => {
                return Err(Error::ExifRead {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };

        let mut tags = RawTags::new();
        for gps_tag in GpsTag::ALL {
            if let Some(field) = exif.get_field(exif_tag(gps_tag), In::PRIMARY)
                && let Some(value) = convert_value(&field.value)
            {
                trace!(?path, tag = gps_tag.name(), "Found GPS tag");
                tags.insert(gps_tag, value);
            }
        }

        Ok(tags)
    }
}

fn exif_tag(tag: GpsTag) -> Tag {
    match tag {
        GpsTag::LatitudeRef => Tag::GPSLatitudeRef,
        GpsTag::Latitude => Tag::GPSLatitude,
        GpsTag::LongitudeRef => Tag::GPSLongitudeRef,
        GpsTag::Longitude => Tag::GPSLongitude,
    }
}

/// Map an EXIF value onto the shapes the GPS adapter understands
fn convert_value(value: &Value) -> Option<TagValue> {
    match value {
        Value::Ascii(parts) => {
            let text = parts
                .first()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                .unwrap_or_default();
            Some(TagValue::Text(text))
        }
        Value::Rational(values) => Some(TagValue::Rationals(
            values
                .iter()
                .map(|r| Rational::new(r.num, r.denom))
                .collect(),
        )),
        _ => None,
    }
}
