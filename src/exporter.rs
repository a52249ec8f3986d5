//! profile.json trace writer

use crate::error::ExportError;
use crate::snapshot::Snapshot;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

pub const DEFAULT_TRACE_FILE: &str = "profile.json";

const INDENT: &[u8] = b"    ";

/// Render the snapshots as the pretty-printed JSON trace document.
pub fn to_json_string(snapshots: &[Snapshot]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_json(snapshots, &mut buf)?;
    String::from_utf8(buf).map_err(|e| {
        ExportError::Serialize(serde_json::Error::io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e,
        )))
    })
}

fn write_json<W: Write>(snapshots: &[Snapshot], writer: W) -> Result<(), serde_json::Error> {
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut ser = Serializer::with_formatter(writer, formatter);
    snapshots.serialize(&mut ser)
}

/// Write `snapshots` to `path` as a JSON array.
///
/// The document is written to a temporary file next to `path` and renamed
/// over it once fully flushed, so a failed export never leaves a truncated
/// trace behind.
pub fn export(snapshots: &[Snapshot], path: &Path) -> Result<(), ExportError> {
    let io_failure = |source: std::io::Error| ExportError::IoFailure {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = NamedTempFile::new_in(&dir).map_err(io_failure)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write_json(snapshots, &mut writer).map_err(|e| {
            if e.is_io() {
                io_failure(e.into())
            } else {
                ExportError::Serialize(e)
            }
        })?;
        writer.write_all(b"\n").map_err(io_failure)?;
        writer.flush().map_err(io_failure)?;
    }
    tmp.as_file().sync_all().map_err(io_failure)?;
    tmp.persist(path).map_err(|e| io_failure(e.error))?;

    info!(path = %path.display(), samples = snapshots.len(), "trace exported");
    Ok(())
}

/// Parse a previously exported trace.
pub fn read_trace(path: &Path) -> Result<Vec<Snapshot>, ExportError> {
    let content = fs::read_to_string(path).map_err(|source| ExportError::IoFailure {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}
