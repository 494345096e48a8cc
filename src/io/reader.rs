use crate::io::error::{IoError, Result};
use crate::models::{ErrorRecord, InputRecord, OutputRecord};
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Read input records from a CSV file with a header row.
///
/// Columns are `text, lat, long`. Unless `strict` is set, a coordinate that
/// does not parse becomes `0.0`. Text that is not valid UTF-8 is decoded
/// lossily rather than failing the file.
pub fn read_input(path: &Path, strict: bool) -> Result<Vec<InputRecord>> {
    let file = open(path)?;
    read_input_from(file, strict).map_err(|e| with_path(e, path))
}

/// Same as [`read_input`] over any reader.
pub fn read_input_from<R: Read>(reader: R, strict: bool) -> Result<Vec<InputRecord>> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in csv.byte_records().enumerate() {
        let row = row.map_err(|source| IoError::Csv {
            path: PathBuf::new(),
            source,
        })?;

        let raw_text = row.get(0).unwrap_or_default();
        let text = match std::str::from_utf8(raw_text) {
            Ok(text) => text.to_string(),
            Err(_) => {
                tracing::warn!(row = index + 1, "Place text is not valid UTF-8, decoding lossily");
                String::from_utf8_lossy(raw_text).into_owned()
            }
        };
        let expected_lat = parse_coordinate(row.get(1), index, "latitude", strict)?;
        let expected_long = parse_coordinate(row.get(2), index, "longitude", strict)?;

        records.push(InputRecord {
            index,
            text,
            expected_lat,
            expected_long,
        });
    }

    tracing::debug!(records = records.len(), "Parsed input rows");

    Ok(records)
}

/// `index` is 0-based; errors and logs name the 1-based data row.
fn parse_coordinate(
    field: Option<&[u8]>,
    index: usize,
    column: &'static str,
    strict: bool,
) -> Result<f64> {
    let field = String::from_utf8_lossy(field.unwrap_or_default());
    let raw = field.trim();
    match raw.parse::<f64>() {
        Ok(value) => Ok(value),
        Err(_) if strict => Err(IoError::InvalidCoordinate {
            row: index + 1,
            column,
            value: raw.to_string(),
        }),
        Err(_) => {
            tracing::warn!(
                row = index + 1,
                column,
                value = raw,
                "Unparsable coordinate, using 0.0"
            );
            Ok(0.0)
        }
    }
}

/// Read back a success file written by [`super::write_output`].
pub fn read_output(path: &Path) -> Result<Vec<OutputRecord>> {
    read_records(path)
}

/// Read back an error file written by [`super::write_errors`].
pub fn read_errors(path: &Path) -> Result<Vec<ErrorRecord>> {
    read_records(path)
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = open(path)?;
    let mut csv = ReaderBuilder::new().has_headers(true).from_reader(file);

    csv.deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|source| IoError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| IoError::FileOpen {
        path: path.to_path_buf(),
        source,
    })
}

fn with_path(error: IoError, path: &Path) -> IoError {
    match error {
        IoError::Csv { source, .. } => IoError::Csv {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    }
}
