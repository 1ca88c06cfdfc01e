//! Point file I/O.
//!
//! Point files are headerless: coordinates are stored point-major as
//! little-endian `f64` values, so a file of `n` points in `d` dimensions is
//! exactly `8 * n * d` bytes. The dimension is not recorded and must be
//! supplied when reading.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::buffer::PointBuffer;
use crate::error::{GridError, Result};

const COORDINATE_BYTES: usize = std::mem::size_of::<f64>();

/// Write every coordinate of `points` to `path`, replacing any existing file.
pub fn write_points(path: impl AsRef<Path>, points: &PointBuffer) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for coordinate in points.as_slice() {
        writer.write_all(&coordinate.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a point file written by [`write_points`].
///
/// # Errors
/// Fails if the file cannot be read, or its size is not a whole number of
/// `dimension`-sized points.
pub fn read_points(path: impl AsRef<Path>, dimension: usize) -> Result<PointBuffer> {
    if dimension == 0 {
        return Err(GridError::invalid_parameter("dimension must be greater than 0"));
    }

    let mut bytes = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;

    if !bytes.len().is_multiple_of(COORDINATE_BYTES * dimension) {
        return Err(GridError::invalid_format(format!(
            "file size {} is not a multiple of {} bytes per point",
            bytes.len(),
            COORDINATE_BYTES * dimension
        )));
    }

    let coordinates = bytes
        .chunks_exact(COORDINATE_BYTES)
        .map(|chunk| {
            let mut raw = [0u8; COORDINATE_BYTES];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect();

    PointBuffer::from_vec(dimension, coordinates)
}
