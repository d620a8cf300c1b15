//! Answer sheet scoring and validation against a questionnaire.

use serde::{Deserialize, Serialize};
use super::{AnswerSheet, Questionnaire};
use crate::domain::batch::{BatchError, BatchOptions};
use crate::domain::calculation::{BatchScorer, ScoreTask};
use crate::domain::foundation::{AnswerSheetId, CancellationToken};
use crate::domain::validation::{aggregate, AggregatedResult, BatchValidator, ValidationTask};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAnswer {
    pub question_code: String,
    pub score: f64,
    pub max_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAnswerSheet {
    pub answer_sheet_id: AnswerSheetId,
    pub total_score: f64,
    /// In answer order.
    pub scored_answers: Vec<ScoredAnswer>,
}

impl ScoredAnswerSheet {
    pub fn find(&self, question_code: &str) -> Option<&ScoredAnswer> {
        self.scored_answers
            .iter()
            .find(|a| a.question_code == question_code)
    }
}

/// Scores every answer of a sheet against its questionnaire's option table.
#[derive(Debug, Clone, Default)]
pub struct AnswerSheetScorer {
    batch: BatchScorer,
}

impl AnswerSheetScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BatchOptions) -> Self {
        Self {
            batch: BatchScorer::with_options(options),
        }
    }

    /// Answers whose question is not in the questionnaire are skipped.
    /// Repeated question codes are scored separately.
    pub fn score(&self, sheet: &AnswerSheet, questionnaire: &Questionnaire) -> ScoredAnswerSheet {
        let tasks: Vec<ScoreTask> = sheet
            .answers()
            .iter()
            .filter_map(|answer| {
                let question = questionnaire.find_question(answer.question_code())?;
                Some(ScoreTask::new(
                    answer.question_code(),
                    Box::new(answer.value().clone()),
                    question.option_scores(),
                ))
            })
            .collect();

        // Results come back in task order, which is answer order.
        let scored_answers: Vec<ScoredAnswer> = self
            .batch
            .score_all_concurrent(&tasks, 0)
            .into_iter()
            .map(|r| ScoredAnswer {
                question_code: r.id,
                score: r.score,
                max_score: r.max_score,
            })
            .collect();

        let total_score = scored_answers.iter().map(|a| a.score).sum();
        tracing::debug!(
            answer_sheet_id = %sheet.id(),
            scored = scored_answers.len(),
            total_score,
            "answer sheet scored"
        );

        ScoredAnswerSheet {
            answer_sheet_id: sheet.id(),
            total_score,
            scored_answers,
        }
    }
}

/// Checks every answer against its question's validation rules.
///
/// Questions without rules and answers to unknown questions are skipped.
///
/// # Errors
///
/// Returns [`BatchError::Cancelled`] if `token` is cancelled mid-batch.
pub fn validate_answer_sheet(
    sheet: &AnswerSheet,
    questionnaire: &Questionnaire,
    validator: &BatchValidator,
    token: &CancellationToken,
) -> Result<AggregatedResult, BatchError> {
    let tasks: Vec<ValidationTask> = sheet
        .answers()
        .iter()
        .filter_map(|answer| {
            let question = questionnaire.find_question(answer.question_code())?;
            if question.validation_rules.is_empty() {
                return None;
            }
            Some(ValidationTask::new(
                answer.question_code(),
                Box::new(answer.value().clone()),
                question.validation_rules.clone(),
            ))
        })
        .collect();

    let results = validator.validate_all_concurrent(&tasks, 0, token)?;
    Ok(aggregate(&results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::survey::{Answer, AnswerValue, Question, QuestionOption};
    use crate::domain::validation::ValidationRule;

    fn questionnaire() -> Questionnaire {
        Questionnaire::new(
            "Q",
            "1",
            "t",
            vec![
                Question::new("Q1", "radio").with_options(vec![
                    QuestionOption::new("A", "从不", 1.0),
                    QuestionOption::new("B", "经常", 3.0),
                ]),
                Question::new("Q2", "number")
                    .with_rules(vec![ValidationRule::required(), ValidationRule::max_value(10.0)]),
                Question::new("Q3", "checkbox").with_options(vec![
                    QuestionOption::new("X", "x", 2.0),
                    QuestionOption::new("Y", "y", 5.0),
                ]),
            ],
        )
    }

    fn sheet(answers: Vec<Answer>) -> AnswerSheet {
        AnswerSheet::new(AnswerSheetId::new(), "Q", "1", answers)
    }

    #[test]
    fn scores_radio_number_and_checkbox() {
        let sheet = sheet(vec![
            Answer::new("Q1", AnswerValue::choice("B")).unwrap(),
            Answer::new("Q2", AnswerValue::Number(7.0)).unwrap(),
            Answer::new("Q3", AnswerValue::choices(["X", "Y", "Z"])).unwrap(),
        ]);
        let scored = AnswerSheetScorer::new().score(&sheet, &questionnaire());

        // Q2 has no options, so its option table is empty and it scores zero.
        assert_eq!(scored.find("Q1").unwrap().score, 3.0);
        assert_eq!(scored.find("Q1").unwrap().max_score, 3.0);
        assert_eq!(scored.find("Q2").unwrap().score, 0.0);
        assert_eq!(scored.find("Q3").unwrap().score, 7.0);
        assert_eq!(scored.total_score, 10.0);
        assert_eq!(scored.answer_sheet_id, sheet.id());
    }

    #[test]
    fn unknown_questions_are_skipped() {
        let sheet = sheet(vec![
            Answer::new("Q1", AnswerValue::choice("A")).unwrap(),
            Answer::new("Q99", AnswerValue::choice("A")).unwrap(),
        ]);
        let scored = AnswerSheetScorer::new().score(&sheet, &questionnaire());
        assert_eq!(scored.scored_answers.len(), 1);
        assert!(scored.find("Q99").is_none());
    }

    #[test]
    fn apply_scores_updates_answers() {
        let mut sheet = sheet(vec![Answer::new("Q1", AnswerValue::choice("B")).unwrap()]);
        let scored = AnswerSheetScorer::new().score(&sheet, &questionnaire());
        sheet.apply_scores(&scored);
        assert_eq!(sheet.find_answer("Q1").unwrap().score(), 3.0);
    }

    #[test]
    fn repeated_question_codes_keep_their_own_scores() {
        let mut sheet = sheet(vec![
            Answer::new("Q1", AnswerValue::choice("A")).unwrap(),
            Answer::new("Q99", AnswerValue::choice("A")).unwrap(),
            Answer::new("Q1", AnswerValue::choice("B")).unwrap(),
        ]);
        let scored = AnswerSheetScorer::new().score(&sheet, &questionnaire());

        let scores: Vec<f64> = scored.scored_answers.iter().map(|a| a.score).collect();
        assert_eq!(scores, vec![1.0, 3.0]);
        assert_eq!(scored.total_score, 4.0);

        sheet.apply_scores(&scored);
        let applied: Vec<f64> = sheet.answers().iter().map(|a| a.score()).collect();
        assert_eq!(applied, vec![1.0, 0.0, 3.0]);
    }

    #[test]
    fn validation_reports_failures_per_question() {
        let sheet = sheet(vec![
            Answer::new("Q1", AnswerValue::choice("A")).unwrap(),
            Answer::new("Q2", AnswerValue::Number(12.0)).unwrap(),
        ]);
        let result = validate_answer_sheet(
            &sheet,
            &questionnaire(),
            &BatchValidator::new(),
            &CancellationToken::new(),
        )
        .unwrap();

        assert!(!result.valid);
        assert_eq!(result.total_tasks, 1);
        assert_eq!(result.failed_tasks, 1);
        assert!(result.failures.contains_key("Q2"));
    }

    #[test]
    fn validation_stops_when_cancelled() {
        let sheet = sheet(vec![Answer::new("Q2", AnswerValue::Number(1.0)).unwrap()]);
        let token = CancellationToken::new();
        token.cancel();
        let err = validate_answer_sheet(&sheet, &questionnaire(), &BatchValidator::new(), &token)
            .unwrap_err();
        assert_eq!(err, BatchError::Cancelled { completed: 0, total: 1 });
    }
}
