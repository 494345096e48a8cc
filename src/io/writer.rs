use crate::io::error::{IoError, Result};
use crate::models::{ErrorRecord, OutputRecord};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Header of the success file.
pub const OUTPUT_HEADER: [&str; 10] = [
    "Index",
    "InputText",
    "InputLat",
    "InputLong",
    "OutputText",
    "OutputLat",
    "OutputLong",
    "Confidence",
    "Distance",
    "Status",
];

/// Header of the error file.
pub const ERROR_HEADER: [&str; 3] = ["Index", "Text", "Error"];

/// Where a run writes its two streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub output: PathBuf,
    pub errors: PathBuf,
}

impl OutputPaths {
    /// `{base}_{timestamp}.csv` and `err_{base}_{timestamp}.csv`, placed in
    /// `dir` when given. The `err_` prefix goes on the file name, not on any
    /// directory part of `base`.
    pub fn new(base: &str, dir: Option<&Path>, timestamp: i64) -> Self {
        let base = match dir {
            Some(dir) => dir.join(base),
            None => PathBuf::from(base),
        };
        let parent = base.parent().map(Path::to_path_buf).unwrap_or_default();
        let name = base
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            output: parent.join(format!("{}_{}.csv", name, timestamp)),
            errors: parent.join(format!("err_{}_{}.csv", name, timestamp)),
        }
    }
}

/// Write the success stream, header first.
pub fn write_output(records: &[OutputRecord], path: &Path) -> Result<()> {
    write_records(records, &OUTPUT_HEADER, path)
}

/// Write the error stream, header first.
pub fn write_errors(records: &[ErrorRecord], path: &Path) -> Result<()> {
    write_records(records, &ERROR_HEADER, path)
}

/// The header is written explicitly so an empty stream still gets one.
fn write_records<T: Serialize>(records: &[T], header: &[&str], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| IoError::FileCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file = File::create(path).map_err(|source| IoError::FileCreate {
        path: path.to_path_buf(),
        source,
    })?;

    let csv_error = |source| IoError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(header).map_err(csv_error)?;
    for record in records {
        writer.serialize(record).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), rows = records.len(), "Wrote result file");

    Ok(())
}
