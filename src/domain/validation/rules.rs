//! Answer validation rules and the default rule evaluator.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Kind of constraint a rule enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Required,
    MinLength,
    MaxLength,
    MinValue,
    MaxValue,
    MinSelections,
    MaxSelections,
    Pattern,
    OptionCode,
}

impl RuleType {
    pub const ALL: [RuleType; 9] = [
        RuleType::Required,
        RuleType::MinLength,
        RuleType::MaxLength,
        RuleType::MinValue,
        RuleType::MaxValue,
        RuleType::MinSelections,
        RuleType::MaxSelections,
        RuleType::Pattern,
        RuleType::OptionCode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Required => "required",
            RuleType::MinLength => "min_length",
            RuleType::MaxLength => "max_length",
            RuleType::MinValue => "min_value",
            RuleType::MaxValue => "max_value",
            RuleType::MinSelections => "min_selections",
            RuleType::MaxSelections => "max_selections",
            RuleType::Pattern => "pattern",
            RuleType::OptionCode => "option_code",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RuleType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleType::ALL
            .into_iter()
            .find(|rule| rule.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_format("rule_type", format!("unknown rule '{}'", s)))
    }
}

/// A rule type plus its target value as configured on the question.
///
/// Targets are kept as text: a length or count for the length and selection
/// rules, a number for the value rules, a regex for `pattern`, and a
/// comma-separated list of allowed codes for `option_code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    rule_type: RuleType,
    target_value: String,
}

impl ValidationRule {
    pub fn new(rule_type: RuleType, target_value: impl Into<String>) -> Self {
        Self {
            rule_type,
            target_value: target_value.into(),
        }
    }

    pub fn required() -> Self {
        Self::new(RuleType::Required, "true")
    }

    pub fn min_length(length: usize) -> Self {
        Self::new(RuleType::MinLength, length.to_string())
    }

    pub fn max_length(length: usize) -> Self {
        Self::new(RuleType::MaxLength, length.to_string())
    }

    pub fn min_value(value: f64) -> Self {
        Self::new(RuleType::MinValue, value.to_string())
    }

    pub fn max_value(value: f64) -> Self {
        Self::new(RuleType::MaxValue, value.to_string())
    }

    pub fn min_selections(count: usize) -> Self {
        Self::new(RuleType::MinSelections, count.to_string())
    }

    pub fn max_selections(count: usize) -> Self {
        Self::new(RuleType::MaxSelections, count.to_string())
    }

    pub fn pattern(regex: impl Into<String>) -> Self {
        Self::new(RuleType::Pattern, regex)
    }

    pub fn option_code<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = codes
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        Self::new(RuleType::OptionCode, joined)
    }

    pub fn rule_type(&self) -> RuleType {
        self.rule_type
    }

    pub fn target_value(&self) -> &str {
        &self.target_value
    }
}

/// Read-only view of an answer value for validation purposes.
pub trait ValidatableValue: Send + Sync {
    fn is_empty(&self) -> bool;

    fn as_string(&self) -> Option<&str>;

    fn as_number(&self) -> Option<f64>;

    fn as_array(&self) -> Option<&[String]>;
}

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub rule_type: RuleType,
    pub message: String,
}

impl RuleViolation {
    fn new(rule_type: RuleType, message: impl Into<String>) -> Self {
        Self {
            rule_type,
            message: message.into(),
        }
    }
}

/// Outcome of checking one value against its rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<RuleViolation>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[RuleViolation] {
        &self.errors
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }
}

/// Evaluates every rule against a value and collects the violations.
///
/// Only `required` looks at empty values; every other rule passes on an
/// empty value. A rule that does not apply to the value's shape (a length
/// rule on a number, say) also passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl DefaultValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_value(
        &self,
        value: &dyn ValidatableValue,
        rules: &[ValidationRule],
    ) -> ValidationResult {
        let errors = rules
            .iter()
            .filter_map(|rule| self.check(value, rule).err())
            .collect();
        ValidationResult { errors }
    }

    fn check(&self, value: &dyn ValidatableValue, rule: &ValidationRule) -> Result<(), RuleViolation> {
        let rule_type = rule.rule_type();
        if rule_type == RuleType::Required {
            return if value.is_empty() {
                Err(RuleViolation::new(rule_type, "answer is required"))
            } else {
                Ok(())
            };
        }
        if value.is_empty() {
            return Ok(());
        }

        match rule_type {
            RuleType::Required => Ok(()),
            RuleType::MinLength => {
                let min = parse_count(rule)?;
                match value.as_string() {
                    Some(s) if s.chars().count() < min => Err(RuleViolation::new(
                        rule_type,
                        format!("answer must be at least {} characters", min),
                    )),
                    _ => Ok(()),
                }
            }
            RuleType::MaxLength => {
                let max = parse_count(rule)?;
                match value.as_string() {
                    Some(s) if s.chars().count() > max => Err(RuleViolation::new(
                        rule_type,
                        format!("answer must be at most {} characters", max),
                    )),
                    _ => Ok(()),
                }
            }
            RuleType::MinValue => {
                let min = parse_number(rule)?;
                match value.as_number() {
                    Some(n) if n < min => Err(RuleViolation::new(
                        rule_type,
                        format!("answer must not be less than {}", min),
                    )),
                    _ => Ok(()),
                }
            }
            RuleType::MaxValue => {
                let max = parse_number(rule)?;
                match value.as_number() {
                    Some(n) if n > max => Err(RuleViolation::new(
                        rule_type,
                        format!("answer must not be greater than {}", max),
                    )),
                    _ => Ok(()),
                }
            }
            RuleType::MinSelections => {
                let min = parse_count(rule)?;
                match value.as_array() {
                    Some(selected) if selected.len() < min => Err(RuleViolation::new(
                        rule_type,
                        format!("select at least {} options", min),
                    )),
                    _ => Ok(()),
                }
            }
            RuleType::MaxSelections => {
                let max = parse_count(rule)?;
                match value.as_array() {
                    Some(selected) if selected.len() > max => Err(RuleViolation::new(
                        rule_type,
                        format!("select at most {} options", max),
                    )),
                    _ => Ok(()),
                }
            }
            RuleType::Pattern => {
                let regex = Regex::new(rule.target_value()).map_err(|e| {
                    RuleViolation::new(rule_type, format!("invalid pattern: {}", e))
                })?;
                match value.as_string() {
                    Some(s) if !regex.is_match(s) => Err(RuleViolation::new(
                        rule_type,
                        format!("answer must match pattern {}", rule.target_value()),
                    )),
                    _ => Ok(()),
                }
            }
            RuleType::OptionCode => {
                let allowed: Vec<&str> = rule
                    .target_value()
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .collect();
                let selected: Vec<&str> = match (value.as_string(), value.as_array()) {
                    (Some(code), _) => vec![code],
                    (None, Some(codes)) => codes.iter().map(String::as_str).collect(),
                    (None, None) => Vec::new(),
                };
                match selected.iter().find(|code| !allowed.contains(*code)) {
                    Some(code) => Err(RuleViolation::new(
                        rule_type,
                        format!("option '{}' is not allowed", code),
                    )),
                    None => Ok(()),
                }
            }
        }
    }
}

fn parse_count(rule: &ValidationRule) -> Result<usize, RuleViolation> {
    rule.target_value().trim().parse().map_err(|_| invalid_target(rule))
}

fn parse_number(rule: &ValidationRule) -> Result<f64, RuleViolation> {
    rule.target_value().trim().parse().map_err(|_| invalid_target(rule))
}

fn invalid_target(rule: &ValidationRule) -> RuleViolation {
    RuleViolation::new(
        rule.rule_type(),
        format!("invalid {} target '{}'", rule.rule_type(), rule.target_value()),
    )
}
