//! Answer sheets as seen by the evaluation engine.

use serde::{Deserialize, Serialize};

use crate::domain::calculation::ScorableValue;
use crate::domain::foundation::{AnswerSheetId, ValidationError};
use crate::domain::validation::ValidatableValue;

/// Raw value of one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    Text(String),
    #[serde(rename = "option")]
    Choice(String),
    #[serde(rename = "options")]
    Choices(Vec<String>),
    Number(f64),
}

impl AnswerValue {
    pub fn text(value: impl Into<String>) -> Self {
        AnswerValue::Text(value.into())
    }

    pub fn choice(code: impl Into<String>) -> Self {
        AnswerValue::Choice(code.into())
    }

    pub fn choices<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnswerValue::Choices(codes.into_iter().map(Into::into).collect())
    }

    /// First selected option code, if the value is a selection.
    pub fn first_selection(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(code) | AnswerValue::Choice(code) if !code.is_empty() => {
                Some(code.as_str())
            }
            AnswerValue::Choices(codes) => codes.first().map(String::as_str),
            _ => None,
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Text(s) | AnswerValue::Choice(s) => s.is_empty(),
            AnswerValue::Choices(codes) => codes.is_empty(),
            AnswerValue::Number(_) => false,
        }
    }
}

// Text answers are offered as single selections too; the option table
// decides whether they score.
impl ScorableValue for AnswerValue {
    fn is_empty(&self) -> bool {
        self.is_blank()
    }

    fn as_single_selection(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) | AnswerValue::Choice(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn as_multiple_selections(&self) -> Option<&[String]> {
        match self {
            AnswerValue::Choices(codes) => Some(codes.as_slice()),
            _ => None,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl ValidatableValue for AnswerValue {
    fn is_empty(&self) -> bool {
        self.is_blank()
    }

    fn as_string(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) | AnswerValue::Choice(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn as_array(&self) -> Option<&[String]> {
        match self {
            AnswerValue::Choices(codes) => Some(codes.as_slice()),
            _ => None,
        }
    }
}

/// One answered question and the score it was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    question_code: String,
    value: AnswerValue,
    #[serde(default)]
    score: f64,
}

impl Answer {
    /// # Errors
    ///
    /// Returns `EmptyField` if `question_code` is blank.
    pub fn new(question_code: impl Into<String>, value: AnswerValue) -> Result<Self, ValidationError> {
        let question_code = question_code.into();
        if question_code.trim().is_empty() {
            return Err(ValidationError::empty_field("question_code"));
        }
        Ok(Self {
            question_code,
            value,
            score: 0.0,
        })
    }

    pub fn question_code(&self) -> &str {
        &self.question_code
    }

    pub fn value(&self) -> &AnswerValue {
        &self.value
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }
}

/// A submitted answer sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSheet {
    id: AnswerSheetId,
    questionnaire_code: String,
    questionnaire_version: String,
    answers: Vec<Answer>,
}

impl AnswerSheet {
    pub fn new(
        id: AnswerSheetId,
        questionnaire_code: impl Into<String>,
        questionnaire_version: impl Into<String>,
        answers: Vec<Answer>,
    ) -> Self {
        Self {
            id,
            questionnaire_code: questionnaire_code.into(),
            questionnaire_version: questionnaire_version.into(),
            answers,
        }
    }

    pub fn id(&self) -> AnswerSheetId {
        self.id
    }

    pub fn questionnaire_code(&self) -> &str {
        &self.questionnaire_code
    }

    pub fn questionnaire_version(&self) -> &str {
        &self.questionnaire_version
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn find_answer(&self, question_code: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_code == question_code)
    }

    /// Copies per-question scores onto the matching answers.
    ///
    /// Answers without a scored counterpart keep their current score.
    pub fn apply_scores(&mut self, scored: &super::ScoredAnswerSheet) {
        // Scored answers are a subsequence of the answers, in the same order.
        let mut pending = scored.scored_answers.iter().peekable();
        for answer in &mut self.answers {
            if let Some(s) = pending.next_if(|s| s.question_code == answer.question_code) {
                answer.score = s.score;
            }
        }
    }
}
