//! Audiogram validation.
//!
//! Validation walks the raw JSON value instead of deserializing straight into
//! typed points so that every problem is reported with its JSON path, and all
//! problems in a file are reported together.

use serde_json::Value;

use crate::audiogram::{Audiogram, AudiogramPoint, Ear, MIN_POINTS};
use crate::error::{ErrorCode, ValidationError};

/// Converts a parsed JSON value into a validated [`Audiogram`].
pub fn audiogram_from_value(value: &Value) -> Result<Audiogram, Vec<ValidationError>> {
    let (left, right, left_path, right_path) = match value {
        Value::Array(ears) if ears.len() == 2 => (&ears[0], &ears[1], "[0]", "[1]"),
        Value::Object(map) => match (map.get("left"), map.get("right")) {
            (Some(left), Some(right)) => (left, right, "left", "right"),
            _ => {
                return Err(vec![ValidationError::new(
                    ErrorCode::InvalidLayout,
                    "audiogram object must have both 'left' and 'right' keys",
                )])
            }
        },
        Value::Array(ears) => {
            return Err(vec![ValidationError::new(
                ErrorCode::InvalidLayout,
                format!(
                    "audiogram must list exactly 2 ears (left, right), found {}",
                    ears.len()
                ),
            )])
        }
        other => {
            return Err(vec![ValidationError::new(
                ErrorCode::InvalidLayout,
                format!(
                    "audiogram must be an array or object, found {}",
                    json_kind(other)
                ),
            )])
        }
    };

    let mut errors = Vec::new();
    let mut left = parse_ear(left, left_path, &mut errors);
    let mut right = parse_ear(right, right_path, &mut errors);

    if let Some(points) = left.as_mut() {
        validate_points(Ear::Left, points, left_path, &mut errors);
    }
    if let Some(points) = right.as_mut() {
        validate_points(Ear::Right, points, right_path, &mut errors);
    }

    match (left, right) {
        (Some(left), Some(right)) if errors.is_empty() => Ok(Audiogram::from_sorted(left, right)),
        _ => Err(errors),
    }
}

/// Checks one ear's points and sorts them by frequency.
///
/// Appends any problems to `errors`; point paths refer to input order.
pub fn validate_points(
    ear: Ear,
    points: &mut Vec<AudiogramPoint>,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    for (i, point) in points.iter().enumerate() {
        if !point.frequency_hz.is_finite() || !point.loss_db.is_finite() {
            errors.push(ValidationError::with_path(
                ErrorCode::NonFiniteValue,
                format!(
                    "{} ear point ({}, {}) is not finite",
                    ear, point.frequency_hz, point.loss_db
                ),
                format!("{}[{}]", path, i),
            ));
        } else if point.frequency_hz < 0.0 {
            errors.push(ValidationError::with_path(
                ErrorCode::NegativeFrequency,
                format!("{} ear frequency {} Hz is negative", ear, point.frequency_hz),
                format!("{}[{}][0]", path, i),
            ));
        }
    }

    points.sort_by(|a, b| a.frequency_hz.total_cmp(&b.frequency_hz));

    for pair in points.windows(2) {
        if pair[0].frequency_hz == pair[1].frequency_hz {
            errors.push(ValidationError::with_path(
                ErrorCode::DuplicateFrequency,
                format!(
                    "{} ear lists {} Hz more than once",
                    ear, pair[0].frequency_hz
                ),
                path,
            ));
        }
    }

    if points.len() < MIN_POINTS {
        errors.push(ValidationError::with_path(
            ErrorCode::TooFewPoints,
            format!(
                "{} ear needs at least {} points, found {}",
                ear,
                MIN_POINTS,
                points.len()
            ),
            path,
        ));
    }
}

fn parse_ear(
    value: &Value,
    path: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<Vec<AudiogramPoint>> {
    let Some(entries) = value.as_array() else {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidEar,
            format!("expected a list of points, found {}", json_kind(value)),
            path,
        ));
        return None;
    };

    let mut points = Vec::with_capacity(entries.len());
    let mut ok = true;
    for (i, entry) in entries.iter().enumerate() {
        let point_path = format!("{}[{}]", path, i);
        match entry.as_array() {
            Some(pair) if pair.len() == 2 => {
                let frequency = number_at(&pair[0], &point_path, 0, errors);
                let loss = number_at(&pair[1], &point_path, 1, errors);
                match (frequency, loss) {
                    (Some(f), Some(db)) => points.push(AudiogramPoint::new(f, db)),
                    _ => ok = false,
                }
            }
            _ => {
                errors.push(ValidationError::with_path(
                    ErrorCode::InvalidPoint,
                    "point must be a [frequency_hz, loss_db] pair",
                    point_path,
                ));
                ok = false;
            }
        }
    }

    ok.then_some(points)
}

fn number_at(
    value: &Value,
    point_path: &str,
    index: usize,
    errors: &mut Vec<ValidationError>,
) -> Option<f64> {
    let number = value.as_f64();
    if number.is_none() {
        errors.push(ValidationError::with_path(
            ErrorCode::NonNumericValue,
            format!("expected a number, found {}", json_kind(value)),
            format!("{}[{}]", point_path, index),
        ));
    }
    number
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
