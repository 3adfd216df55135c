//! Reading and writing the `{"trajectory": [...]}` run document.
//!
//! A path ending in `.gz` is read and written through gzip; anything else is
//! plain JSON.

use crate::error::{IoError, Result};
use crate::serialization::{from_json, read_json_file, to_json, to_json_pretty, write_json_file};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use nob_data::TrajectoryLog;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Writes `log` to `path`, creating missing parent directories.
pub fn write_trajectory<P: AsRef<Path>>(log: &TrajectoryLog, path: P, pretty: bool) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            IoError::FileSystem(e).with_context(format!("creating {}", parent.display()))
        })?;
    }

    if !is_gzip(path) {
        return write_json_file(log, path, pretty);
    }

    let json = if pretty {
        to_json_pretty(log)?
    } else {
        to_json(log)?
    };
    let file = File::create(path).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("creating {}", path.display()))
    })?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder
        .write_all(json.as_bytes())
        .and_then(|()| encoder.finish().map(|_| ()))
        .map_err(|e| {
            IoError::compression(e.to_string()).with_context(format!("writing {}", path.display()))
        })
}

/// Reads a run document and checks that steps strictly increase.
pub fn read_trajectory<P: AsRef<Path>>(path: P) -> Result<TrajectoryLog> {
    let path = path.as_ref();
    let log: TrajectoryLog = if is_gzip(path) {
        from_json(&read_gzip(path)?)?
    } else {
        read_json_file(path)?
    };
    validate_order(&log)?;
    Ok(log)
}

fn read_gzip(path: &Path) -> Result<String> {
    let file = File::open(path)
        .map_err(|e| IoError::FileSystem(e).with_context(format!("opening {}", path.display())))?;
    let mut decoded = String::new();
    GzDecoder::new(file)
        .read_to_string(&mut decoded)
        .map_err(|e| {
            IoError::compression(e.to_string()).with_context(format!("reading {}", path.display()))
        })?;
    Ok(decoded)
}

fn validate_order(log: &TrajectoryLog) -> Result<()> {
    for pair in log.entries().windows(2) {
        if pair[1].step <= pair[0].step {
            return Err(IoError::validation(format!(
                "step {} follows step {}",
                pair[1].step, pair[0].step
            )));
        }
    }
    Ok(())
}
