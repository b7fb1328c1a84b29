//! CSV adapter: Loads the labeled diabetes table.
//!
//! The header must list the eight feature columns in [`FIELD_SPECS`] order
//! followed by `Outcome`. Positional alignment with [`FeatureVector`] depends
//! on it, so a reordered or renamed column is rejected rather than remapped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::{
    Dataset, DatasetError, FeatureVector, Label, Sample, FEATURE_COUNT, FIELD_SPECS,
};

/// Name of the label column.
pub const OUTCOME_COLUMN: &str = "Outcome";

/// Expected header, in order.
#[must_use]
pub fn expected_header() -> Vec<&'static str> {
    FIELD_SPECS
        .iter()
        .map(|spec| spec.column)
        .chain(std::iter::once(OUTCOME_COLUMN))
        .collect()
}

/// Load a dataset from a CSV file.
///
/// # Errors
/// Returns [`DatasetError::Read`] if the file cannot be opened, or the
/// errors of [`read_dataset`].
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = read_dataset(file)?;
    tracing::info!(
        "Loaded {} rows from {} (fingerprint {})",
        dataset.len(),
        path.display(),
        &dataset.fingerprint()[..12]
    );
    Ok(dataset)
}

/// Parse a dataset from any CSV source.
///
/// # Errors
/// Returns [`DatasetError::Malformed`] for a wrong header, a row with the
/// wrong number of cells, a non-numeric cell or a label outside {0, 1};
/// [`DatasetError::Empty`] for a table without rows.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| DatasetError::Malformed(format!("header: {e}")))?
        .clone();
    let expected = expected_header();
    if headers.iter().ne(expected.iter().copied()) {
        return Err(DatasetError::Malformed(format!(
            "expected columns [{}], found [{}]",
            expected.join(", "),
            headers.iter().collect::<Vec<_>>().join(", ")
        )));
    }

    let mut samples = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| DatasetError::Malformed(e.to_string()))?;
        let line = record.position().map_or(0, |p| p.line());

        let mut features = [0.0; FEATURE_COUNT];
        for (i, slot) in features.iter_mut().enumerate() {
            *slot = parse_cell(&record, i, line)?;
        }

        let outcome = parse_cell(&record, FEATURE_COUNT, line)?;
        let label = if outcome.fract() == 0.0 && (0.0..=1.0).contains(&outcome) {
            Label::from_outcome(outcome as u8)
        } else {
            None
        }
        .ok_or_else(|| {
            DatasetError::Malformed(format!("line {line}: {OUTCOME_COLUMN} must be 0 or 1, got {outcome}"))
        })?;

        samples.push(Sample {
            features: FeatureVector(features),
            label,
        });
    }

    Dataset::new(samples)
}

fn parse_cell(record: &csv::StringRecord, column: usize, line: u64) -> Result<f64, DatasetError> {
    let cell = record.get(column).unwrap_or_default();
    let value: f64 = cell.parse().map_err(|_| {
        DatasetError::Malformed(format!(
            "line {line}: column {} is not a number: '{cell}'",
            expected_header()[column]
        ))
    })?;
    if !value.is_finite() {
        return Err(DatasetError::Malformed(format!(
            "line {line}: column {} is not finite",
            expected_header()[column]
        )));
    }
    Ok(value)
}

/// The frozen reference table shipped in `data/diabetes.csv`.
#[cfg(test)]
pub(crate) fn reference_dataset() -> Dataset {
    const REFERENCE_CSV: &str = include_str!("../../data/diabetes.csv");
    read_dataset(REFERENCE_CSV.as_bytes()).expect("Reference dataset should parse")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HealthField;
    use std::io::Write;

    const HEADER: &str =
        "Pregnancies,Glucose,BloodPressure,SkinThickness,Insulin,BMI,DiabetesPedigreeFunction,Age,Outcome";

    #[test]
    fn test_reference_dataset() {
        let dataset = reference_dataset();
        assert_eq!(dataset.len(), 50);

        let first = dataset.samples()[0];
        assert!((first.features.get(HealthField::Glucose) - 148.0).abs() < f64::EPSILON);
        assert!((first.features.get(HealthField::Bmi) - 33.6).abs() < f64::EPSILON);
        assert_eq!(first.label, Label::NotHealthy);

        let positives = dataset
            .samples()
            .iter()
            .filter(|s| s.label == Label::NotHealthy)
            .count();
        assert!(positives > 0 && positives < dataset.len());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "{HEADER}").expect("write");
        writeln!(file, "1,85,66,29,0,26.6,0.351,31,0").expect("write");
        writeln!(file, "8,183,64,0,0,23.3,0.672,32,1").expect("write");

        let dataset = load_dataset(file.path()).expect("Should load");
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.samples()[1].label, Label::NotHealthy);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = load_dataset(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(DatasetError::Read { .. })));
    }

    #[test]
    fn test_reordered_header_rejected() {
        let csv = "Glucose,Pregnancies,BloodPressure,SkinThickness,Insulin,BMI,DiabetesPedigreeFunction,Age,Outcome\n\
                   85,1,66,29,0,26.6,0.351,31,0\n";
        assert!(matches!(read_dataset(csv.as_bytes()), Err(DatasetError::Malformed(_))));
    }

    #[test]
    fn test_wrong_column_count_rejected() {
        let csv = format!("{HEADER}\n1,85,66,29,0,26.6,0.351,0\n");
        assert!(matches!(read_dataset(csv.as_bytes()), Err(DatasetError::Malformed(_))));
    }

    #[test]
    fn test_bad_cells_rejected() {
        let not_number = format!("{HEADER}\n1,high,66,29,0,26.6,0.351,31,0\n");
        let err = read_dataset(not_number.as_bytes()).expect_err("Should fail");
        assert!(err.to_string().contains("Glucose"));

        let bad_label = format!("{HEADER}\n1,85,66,29,0,26.6,0.351,31,2\n");
        assert!(matches!(read_dataset(bad_label.as_bytes()), Err(DatasetError::Malformed(_))));
    }

    #[test]
    fn test_header_only_is_empty() {
        let csv = format!("{HEADER}\n");
        assert!(matches!(read_dataset(csv.as_bytes()), Err(DatasetError::Empty)));
    }
}
