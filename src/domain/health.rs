//! Health measurements entered on the checkup form.
//!
//! Column order follows the Pima diabetes table
//! (Pregnancies, Glucose, BloodPressure, SkinThickness, Insulin, BMI,
//! DiabetesPedigreeFunction, Age). Both the dataset loader and the classifier
//! rely on that order through [`FeatureVector`].

/// Number of input features.
pub const FEATURE_COUNT: usize = 8;

/// One of the eight measurements collected by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthField {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    Bmi,
    DiabetesPedigreeFunction,
    Age,
}

/// Range and presentation metadata for a field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: HealthField,
    /// Human-readable label shown on the form
    pub label: &'static str,
    /// Header of the matching dataset column
    pub column: &'static str,
    pub min: f64,
    pub max: f64,
    /// Whole numbers only
    pub integer: bool,
    /// Pre-filled form value
    pub default: f64,
}

/// Field table in feature order.
pub static FIELD_SPECS: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec {
        field: HealthField::Pregnancies,
        label: "Pregnancies",
        column: "Pregnancies",
        min: 0.0,
        max: 17.0,
        integer: true,
        default: 3.0,
    },
    FieldSpec {
        field: HealthField::Glucose,
        label: "Glucose",
        column: "Glucose",
        min: 0.0,
        max: 200.0,
        integer: true,
        default: 120.0,
    },
    FieldSpec {
        field: HealthField::BloodPressure,
        label: "Blood Pressure",
        column: "BloodPressure",
        min: 0.0,
        max: 122.0,
        integer: true,
        default: 70.0,
    },
    FieldSpec {
        field: HealthField::SkinThickness,
        label: "Skin Thickness",
        column: "SkinThickness",
        min: 0.0,
        max: 100.0,
        integer: true,
        default: 20.0,
    },
    FieldSpec {
        field: HealthField::Insulin,
        label: "Insulin",
        column: "Insulin",
        min: 0.0,
        max: 846.0,
        integer: true,
        default: 79.0,
    },
    FieldSpec {
        field: HealthField::Bmi,
        label: "BMI",
        column: "BMI",
        min: 0.0,
        max: 67.0,
        integer: true,
        default: 20.0,
    },
    FieldSpec {
        field: HealthField::DiabetesPedigreeFunction,
        label: "Diabetes Pedigree Function",
        column: "DiabetesPedigreeFunction",
        min: 0.0,
        max: 2.4,
        integer: false,
        default: 0.47,
    },
    FieldSpec {
        field: HealthField::Age,
        label: "Age",
        column: "Age",
        min: 21.0,
        max: 88.0,
        integer: true,
        default: 33.0,
    },
];

impl HealthField {
    /// All fields in feature order.
    pub const ALL: [HealthField; FEATURE_COUNT] = [
        Self::Pregnancies,
        Self::Glucose,
        Self::BloodPressure,
        Self::SkinThickness,
        Self::Insulin,
        Self::Bmi,
        Self::DiabetesPedigreeFunction,
        Self::Age,
    ];

    /// Position of this field in a [`FeatureVector`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn spec(self) -> &'static FieldSpec {
        &FIELD_SPECS[self.index()]
    }
}

impl std::fmt::Display for HealthField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spec().label)
    }
}

/// A single problem with one form field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldIssue {
    #[error("{0}: Missing value")]
    Missing(HealthField),

    #[error("{field}: Invalid number '{input}'")]
    NotANumber { field: HealthField, input: String },

    #[error("{0}: Must be a whole number")]
    NotWhole(HealthField),

    #[error("{field}: Value must be between {min} and {max}")]
    OutOfRange {
        field: HealthField,
        min: f64,
        max: f64,
    },
}

impl FieldIssue {
    #[must_use]
    pub fn field(&self) -> HealthField {
        match self {
            Self::Missing(field) | Self::NotWhole(field) => *field,
            Self::NotANumber { field, .. } | Self::OutOfRange { field, .. } => *field,
        }
    }
}

/// Rejected form input. Carries every problem found, not just the first.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", .issues.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

/// Eight features in dataset column order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    #[must_use]
    pub fn get(&self, field: HealthField) -> f64 {
        self.0[field.index()]
    }
}

/// Unvalidated measurements, as typed by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthInput {
    pub pregnancies: i64,
    pub glucose: i64,
    pub blood_pressure: i64,
    pub skin_thickness: i64,
    pub insulin: i64,
    pub bmi: i64,
    pub diabetes_pedigree_function: f64,
    pub age: i64,
}

impl Default for HealthInput {
    /// The values the form starts with.
    fn default() -> Self {
        Self {
            pregnancies: 3,
            glucose: 120,
            blood_pressure: 70,
            skin_thickness: 20,
            insulin: 79,
            bmi: 20,
            diabetes_pedigree_function: 0.47,
            age: 33,
        }
    }
}

impl HealthInput {
    fn values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.pregnancies as f64,
            self.glucose as f64,
            self.blood_pressure as f64,
            self.skin_thickness as f64,
            self.insulin as f64,
            self.bmi as f64,
            self.diabetes_pedigree_function,
            self.age as f64,
        ]
    }

    /// Check every field against its declared range.
    ///
    /// # Errors
    /// Returns all out-of-range fields.
    pub fn validate(self) -> Result<HealthRecord, ValidationError> {
        let issues: Vec<FieldIssue> = FIELD_SPECS
            .iter()
            .zip(self.values())
            .filter(|(spec, value)| !(spec.min..=spec.max).contains(value))
            .map(|(spec, _)| FieldIssue::OutOfRange {
                field: spec.field,
                min: spec.min,
                max: spec.max,
            })
            .collect();

        if !issues.is_empty() {
            return Err(ValidationError { issues });
        }

        Ok(HealthRecord { input: self })
    }
}

/// A validated set of measurements.
///
/// Only obtainable through [`HealthInput::validate`] or
/// [`HealthRecord::from_text`], so every instance is within range.
#[derive(Clone, Copy, PartialEq)]
pub struct HealthRecord {
    input: HealthInput,
}

impl HealthRecord {
    /// Parse and validate the eight form strings, in field order.
    ///
    /// # Errors
    /// Returns every missing, unparsable, fractional or out-of-range field.
    pub fn from_text(values: [&str; FEATURE_COUNT]) -> Result<Self, ValidationError> {
        let mut issues = Vec::new();
        let mut parsed = [0.0; FEATURE_COUNT];

        for ((spec, raw), slot) in FIELD_SPECS.iter().zip(values).zip(parsed.iter_mut()) {
            let raw = raw.trim();
            if raw.is_empty() {
                issues.push(FieldIssue::Missing(spec.field));
                continue;
            }

            let value: f64 = match raw.parse() {
                Ok(v) => v,
                Err(_) => {
                    issues.push(FieldIssue::NotANumber {
                        field: spec.field,
                        input: raw.to_string(),
                    });
                    continue;
                }
            };

            if !(spec.min..=spec.max).contains(&value) {
                issues.push(FieldIssue::OutOfRange {
                    field: spec.field,
                    min: spec.min,
                    max: spec.max,
                });
                continue;
            }

            if spec.integer && value.fract() != 0.0 {
                issues.push(FieldIssue::NotWhole(spec.field));
                continue;
            }

            *slot = value;
        }

        if !issues.is_empty() {
            return Err(ValidationError { issues });
        }

        HealthInput {
            pregnancies: parsed[0] as i64,
            glucose: parsed[1] as i64,
            blood_pressure: parsed[2] as i64,
            skin_thickness: parsed[3] as i64,
            insulin: parsed[4] as i64,
            bmi: parsed[5] as i64,
            diabetes_pedigree_function: parsed[6],
            age: parsed[7] as i64,
        }
        .validate()
    }

    /// Convert to the classifier's input, in dataset column order.
    #[must_use]
    pub fn features(&self) -> FeatureVector {
        FeatureVector(self.input.values())
    }

    #[must_use]
    pub fn input(&self) -> &HealthInput {
        &self.input
    }
}

// Measurements stay out of logs and panic messages.
impl std::fmt::Debug for HealthRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HealthRecord([redacted])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_text() -> [&'static str; FEATURE_COUNT] {
        ["3", "120", "70", "20", "79", "20", "0.47", "33"]
    }

    #[test]
    fn test_defaults_are_valid() {
        let record = HealthInput::default().validate().expect("Defaults should validate");
        let features = record.features();
        assert!((features.get(HealthField::Glucose) - 120.0).abs() < f64::EPSILON);
        assert!((features.get(HealthField::DiabetesPedigreeFunction) - 0.47).abs() < f64::EPSILON);
        assert!((features.get(HealthField::Age) - 33.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_field_specs_in_feature_order() {
        for (i, field) in HealthField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
            assert_eq!(field.spec().field, *field);
        }
    }

    #[test]
    fn test_range_boundaries_accepted() {
        let low = HealthInput {
            pregnancies: 0,
            glucose: 0,
            blood_pressure: 0,
            skin_thickness: 0,
            insulin: 0,
            bmi: 0,
            diabetes_pedigree_function: 0.0,
            age: 21,
        };
        let high = HealthInput {
            pregnancies: 17,
            glucose: 200,
            blood_pressure: 122,
            skin_thickness: 100,
            insulin: 846,
            bmi: 67,
            diabetes_pedigree_function: 2.4,
            age: 88,
        };
        assert!(low.validate().is_ok());
        assert!(high.validate().is_ok());
    }

    #[test]
    fn test_each_field_rejected_out_of_range() {
        let cases = [
            HealthInput { pregnancies: 18, ..Default::default() },
            HealthInput { glucose: 201, ..Default::default() },
            HealthInput { blood_pressure: -1, ..Default::default() },
            HealthInput { skin_thickness: 101, ..Default::default() },
            HealthInput { insulin: 847, ..Default::default() },
            HealthInput { bmi: 68, ..Default::default() },
            HealthInput { diabetes_pedigree_function: 2.41, ..Default::default() },
            HealthInput { age: 20, ..Default::default() },
        ];

        for (input, field) in cases.into_iter().zip(HealthField::ALL) {
            let err = input.validate().expect_err("Should be rejected");
            assert_eq!(err.issues.len(), 1);
            assert_eq!(err.issues[0].field(), field);
        }
    }

    #[test]
    fn test_nan_pedigree_rejected() {
        let input = HealthInput {
            diabetes_pedigree_function: f64::NAN,
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_from_text_round_trips_defaults() {
        let record = HealthRecord::from_text(default_text()).expect("Should parse");
        assert_eq!(record, HealthInput::default().validate().expect("valid"));
    }

    #[test]
    fn test_from_text_collects_all_issues() {
        let mut text = default_text();
        text[0] = "";
        text[1] = "abc";
        text[5] = "20.5";
        text[7] = "90";

        let err = HealthRecord::from_text(text).expect_err("Should fail");
        assert_eq!(err.issues.len(), 4);
        assert_eq!(err.issues[0], FieldIssue::Missing(HealthField::Pregnancies));
        assert!(matches!(err.issues[1], FieldIssue::NotANumber { field: HealthField::Glucose, .. }));
        assert_eq!(err.issues[2], FieldIssue::NotWhole(HealthField::Bmi));
        assert!(matches!(err.issues[3], FieldIssue::OutOfRange { field: HealthField::Age, .. }));
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = HealthInput { age: 10, ..Default::default() }
            .validate()
            .expect_err("Should fail");
        assert_eq!(err.to_string(), "Age: Value must be between 21 and 88");
    }

    #[test]
    fn test_debug_redacts_measurements() {
        let record = HealthInput::default().validate().expect("valid");
        let debug = format!("{record:?}");
        assert!(!debug.contains("120"));
        assert!(debug.contains("redacted"));
    }
}
