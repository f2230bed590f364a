use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::config::ColorizerConfig;
use crate::error::{ColorizerError, ColorizerResult};
use crate::pool::SlotRecord;

/// Serializes an object to a JSON file.
pub fn object_to_json<T: Serialize>(
    output_path: impl AsRef<Path>,
    object: &T,
) -> ColorizerResult<()> {
    let path = output_path.as_ref();
    let j = serde_json::to_string_pretty(object)?;
    std::fs::write(path, j).map_err(|e| ColorizerError::io(path, e))
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> ColorizerResult<T> {
    let path = file_path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| ColorizerError::io(path, e))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Where snapshot logs live: a shared location when it exists, otherwise an
/// application-private fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocation {
    pub preferred: Option<PathBuf>,
    pub fallback: PathBuf,
}

impl StorageLocation {
    pub fn from_config(config: &ColorizerConfig) -> StorageLocation {
        StorageLocation {
            preferred: config.preferred_dir(),
            fallback: config.fallback_dir.clone(),
        }
    }

    pub fn resolve(&self) -> &Path {
        match &self.preferred {
            Some(p) if p.is_dir() => p,
            _ => &self.fallback,
        }
    }
}

/// Appends slot records to one CSV file per calendar day.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    location: StorageLocation,
    subdir: String,
}

impl SnapshotWriter {
    pub fn new(location: StorageLocation, subdir: impl Into<String>) -> SnapshotWriter {
        SnapshotWriter {
            location,
            subdir: subdir.into(),
        }
    }

    pub fn from_config(config: &ColorizerConfig) -> SnapshotWriter {
        SnapshotWriter::new(
            StorageLocation::from_config(config),
            config.output_subdir.clone(),
        )
    }

    pub fn directory(&self) -> PathBuf {
        self.location.resolve().join(&self.subdir)
    }

    pub fn file_for(&self, date: Date) -> ColorizerResult<PathBuf> {
        let name = date.format(format_description!("[year][month][day]"))?;
        Ok(self.directory().join(format!("{}.csv", name)))
    }

    /// Appends `records` to today's file (local date, UTC if the offset is
    /// unavailable).
    pub fn fire(&self, records: &[SlotRecord]) -> ColorizerResult<PathBuf> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        self.fire_on(now.date(), records)
    }

    pub fn fire_on(&self, date: Date, records: &[SlotRecord]) -> ColorizerResult<PathBuf> {
        let dir = self.directory();
        if !dir.is_dir() {
            std::fs::create_dir_all(&dir).map_err(|e| ColorizerError::io(&dir, e))?;
        }
        let filepath = self.file_for(date)?;
        log::debug!("filepath: {}", filepath.display());

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&filepath)
            .map_err(|e| ColorizerError::io(&filepath, e))?;
        let mut writer = BufWriter::new(file);
        for record in records {
            writeln!(writer, "{}", csv_line(record))
                .map_err(|e| ColorizerError::io(&filepath, e))?;
        }
        writer.flush().map_err(|e| ColorizerError::io(&filepath, e))?;
        Ok(filepath)
    }
}

/// `index,pos.x,pos.y,pos.z,color.r,color.g,color.b,color.a`
pub fn csv_line(record: &SlotRecord) -> String {
    let p = record.position;
    let c = record.color;
    format!(
        "{},{},{},{},{},{},{},{}",
        record.index, p.x, p.y, p.z, c.r, c.g, c.b, c.a
    )
}
