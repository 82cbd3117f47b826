//! # Route Files
//!
//! Recorded routes can be stored as CSV files with the header `x,y,z,heading`, one sample per
//! row in the order they were recorded. Headings are in radians.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::path::Path;

use crate::route::RoutePoint;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RouteFileError {
    #[error("Could not open the route file: {0}")]
    OpenError(csv::Error),

    #[error("Invalid sample on line {0}: {1}")]
    InvalidSample(u64, csv::Error),

    #[error("Could not write the route file: {0}")]
    WriteError(csv::Error),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Load the raw samples of a recorded route.
///
/// Samples are returned as they are in the file, without deduplication.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<RoutePoint>, RouteFileError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(RouteFileError::OpenError)?;

    let mut samples = Vec::new();

    for result in reader.deserialize() {
        match result {
            Ok(s) => samples.push(s),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                return Err(RouteFileError::InvalidSample(line, e));
            }
        }
    }

    Ok(samples)
}

/// Save route samples in the same format read by [`load_csv`].
pub fn save_csv<P: AsRef<Path>>(path: P, samples: &[RoutePoint]) -> Result<(), RouteFileError> {
    let mut writer = csv::Writer::from_path(path).map_err(RouteFileError::WriteError)?;

    for s in samples {
        writer.serialize(s).map_err(RouteFileError::WriteError)?;
    }

    writer
        .flush()
        .map_err(|e| RouteFileError::WriteError(e.into()))
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "x,y,z,heading\n0.0,0.0,0.0,0.0\n1.0, 0.5, 0.1, 1.5\n2.0,1.0,0.0,-3.0\n"
        )
        .unwrap();

        let samples = load_csv(file.path()).unwrap();

        assert_eq!(
            samples,
            vec![
                RoutePoint::new(0.0, 0.0, 0.0, 0.0),
                RoutePoint::new(1.0, 0.5, 0.1, 1.5),
                RoutePoint::new(2.0, 1.0, 0.0, -3.0),
            ]
        );
    }

    #[test]
    fn test_invalid_sample() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "x,y,z,heading\n0.0,0.0,0.0,0.0\n1.0,abc,0.0,0.0\n").unwrap();

        match load_csv(file.path()) {
            Err(RouteFileError::InvalidSample(line, _)) => assert_eq!(line, 3),
            other => panic!("Expected an invalid sample error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_csv(dir.path().join("missing.csv")),
            Err(RouteFileError::OpenError(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("route.csv");

        let samples: Vec<RoutePoint> = (0..5)
            .map(|i| RoutePoint::new(i as f64 * 0.5, 1.0, 0.0, 0.25))
            .collect();

        save_csv(&path, &samples).unwrap();
        assert_eq!(load_csv(&path).unwrap(), samples);
    }
}
