//! Questionnaire structure needed for scoring and validation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::calculation::OptionScores;
use crate::domain::validation::ValidationRule;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub code: String,
    pub content: String,
    #[serde(default)]
    pub score: f64,
}

impl QuestionOption {
    pub fn new(code: impl Into<String>, content: impl Into<String>, score: f64) -> Self {
        Self {
            code: code.into(),
            content: content.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub validation_rules: Vec<ValidationRule>,
}

impl Question {
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            options: Vec::new(),
            validation_rules: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: Vec<QuestionOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_rules(mut self, rules: Vec<ValidationRule>) -> Self {
        self.validation_rules = rules;
        self
    }

    pub fn option_scores(&self) -> OptionScores {
        self.options
            .iter()
            .map(|o| (o.code.clone(), o.score))
            .collect()
    }
}

/// A published questionnaire version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Questionnaire {
    pub code: String,
    pub version: String,
    pub title: String,
    pub questions: Vec<Question>,
}

impl Questionnaire {
    pub fn new(
        code: impl Into<String>,
        version: impl Into<String>,
        title: impl Into<String>,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            code: code.into(),
            version: version.into(),
            title: title.into(),
            questions,
        }
    }

    pub fn find_question(&self, code: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.code == code)
    }

    /// Option code to option content across every question.
    ///
    /// Option codes are expected to be unique within a questionnaire.
    pub fn option_contents(&self) -> HashMap<&str, &str> {
        self.questions
            .iter()
            .flat_map(|q| q.options.iter())
            .map(|o| (o.code.as_str(), o.content.as_str()))
            .collect()
    }
}
