//! Left-closed, right-open score intervals and rule-table validation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::InterpretationError;

/// Score interval `[min, max)`.
///
/// A score equal to `max` belongs to the next range up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    min: f64,
    max: f64,
}

impl ScoreRange {
    /// Creates a range without checking it; see [`ScoreRange::validate`].
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, score: f64) -> bool {
        score >= self.min && score < self.max
    }

    /// Ranges that only touch at a boundary do not overlap.
    pub fn is_overlapping(&self, other: &ScoreRange) -> bool {
        self.min < other.max && other.min < self.max
    }

    /// # Errors
    ///
    /// Returns [`InterpretationError::InvalidRange`] unless `min < max`.
    pub fn validate(&self) -> Result<(), InterpretationError> {
        if self.min < self.max {
            Ok(())
        } else {
            Err(InterpretationError::InvalidRange {
                min: self.min,
                max: self.max,
            })
        }
    }
}

impl fmt::Display for ScoreRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.2}, {:.2})", self.min, self.max)
    }
}

/// Checks that a rule table covers one contiguous span without overlaps.
///
/// Ranges may be given in any order; they are checked sorted by `min`.
///
/// # Errors
///
/// - [`InterpretationError::EmptyRuleSet`] for an empty table
/// - [`InterpretationError::InvalidRange`] for a range with `min >= max`
/// - [`InterpretationError::DiscontinuousRanges`] for a gap or overlap
///   between neighbours, naming the sorted index of the later range
/// - [`InterpretationError::OverlappingRanges`] for any other overlapping pair
pub fn validate_ranges(ranges: &[ScoreRange]) -> Result<(), InterpretationError> {
    if ranges.is_empty() {
        return Err(InterpretationError::EmptyRuleSet);
    }

    let mut sorted = ranges.to_vec();
    sorted.sort_by(|a, b| a.min.total_cmp(&b.min));

    for range in &sorted {
        range.validate()?;
    }

    for (index, pair) in sorted.windows(2).enumerate() {
        let (previous, current) = (pair[0], pair[1]);
        if previous.max != current.min {
            return Err(InterpretationError::DiscontinuousRanges {
                index: index + 1,
                previous_max: previous.max,
                current_min: current.min,
            });
        }
    }

    for (i, first) in sorted.iter().enumerate() {
        for second in &sorted[i + 1..] {
            if first.is_overlapping(second) {
                return Err(InterpretationError::OverlappingRanges {
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
        }
    }

    Ok(())
}

/// A score range with the text shown when a score falls inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleInterpretRule {
    range: ScoreRange,
    content: String,
}

impl SimpleInterpretRule {
    pub fn new(range: ScoreRange, content: impl Into<String>) -> Self {
        Self {
            range,
            content: content.into(),
        }
    }

    pub fn range(&self) -> &ScoreRange {
        &self.range
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn matches(&self, score: f64) -> bool {
        self.range.contains(score)
    }

    /// # Errors
    ///
    /// Fails if the range is inverted or the content is blank.
    pub fn validate(&self) -> Result<(), InterpretationError> {
        self.range.validate()?;
        if self.content.trim().is_empty() {
            return Err(InterpretationError::EmptyContent);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(min: f64, max: f64) -> ScoreRange {
        ScoreRange::new(min, max)
    }

    #[test]
    fn contains_is_left_closed_right_open() {
        let range = r(0.0, 10.0);
        assert!(range.contains(0.0));
        assert!(range.contains(9.999));
        assert!(!range.contains(10.0));
        assert!(!range.contains(-0.1));
    }

    #[test]
    fn shared_boundary_is_not_overlap() {
        assert!(!r(0.0, 10.0).is_overlapping(&r(10.0, 20.0)));
        assert!(r(0.0, 10.0).is_overlapping(&r(5.0, 20.0)));
        assert!(r(0.0, 30.0).is_overlapping(&r(10.0, 20.0)));
    }

    #[test]
    fn display_uses_two_decimals() {
        assert_eq!(r(0.0, 10.5).to_string(), "[0.00, 10.50)");
    }

    #[test]
    fn contiguous_ranges_validate() {
        assert!(validate_ranges(&[r(0.0, 10.0), r(10.0, 20.0), r(20.0, 30.0)]).is_ok());
    }

    #[test]
    fn unsorted_contiguous_ranges_validate() {
        assert!(validate_ranges(&[r(20.0, 30.0), r(0.0, 10.0), r(10.0, 20.0)]).is_ok());
    }

    #[test]
    fn empty_rule_set_fails() {
        assert_eq!(validate_ranges(&[]), Err(InterpretationError::EmptyRuleSet));
    }

    #[test]
    fn gap_fails_with_index_and_boundaries() {
        let err = validate_ranges(&[r(0.0, 10.0), r(15.0, 20.0)]).unwrap_err();
        assert_eq!(
            err,
            InterpretationError::DiscontinuousRanges {
                index: 1,
                previous_max: 10.0,
                current_min: 15.0,
            }
        );
        assert_eq!(err.to_string(), "discontinuous ranges at index 1: 10.00 != 15.00");
    }

    #[test]
    fn overlap_fails() {
        assert!(validate_ranges(&[r(0.0, 10.0), r(5.0, 20.0)]).is_err());
    }

    #[test]
    fn inverted_range_fails() {
        let err = validate_ranges(&[r(10.0, 0.0)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid range: [10.00, 0.00), min score must be less than max score"
        );
    }

    #[test]
    fn simple_rule_requires_content() {
        assert_eq!(
            SimpleInterpretRule::new(r(0.0, 5.0), "  ").validate(),
            Err(InterpretationError::EmptyContent)
        );
        let rule = SimpleInterpretRule::new(r(0.0, 5.0), "轻度");
        assert!(rule.validate().is_ok());
        assert!(rule.matches(4.5));
        assert!(!rule.matches(5.0));
    }
}
