//! Raw factor scores from an answer sheet.

use std::collections::HashMap;

use super::{Factor, FactorScoringStrategy};
use crate::domain::calculation::{get_scorer, ScoringError, ScoringParams};
use crate::domain::survey::{Answer, AnswerSheet, Questionnaire};

/// Computes one factor's raw score.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactorScorer;

impl FactorScorer {
    pub fn new() -> Self {
        Self
    }

    /// Scores `factor` from the stored answer scores of `sheet`.
    ///
    /// A factor without questions scores zero. `sum` and `avg` use the
    /// scores of the answered questions. `cnt` resolves option contents
    /// through the questionnaire and counts nothing without one.
    ///
    /// # Errors
    ///
    /// `MissingParameter("cnt_option_contents")` for `cnt` with no targets.
    pub fn calculate(
        &self,
        factor: &Factor,
        sheet: &AnswerSheet,
        questionnaire: Option<&Questionnaire>,
    ) -> Result<f64, ScoringError> {
        if factor.question_codes.is_empty() {
            tracing::debug!(factor_code = %factor.code, "factor has no questions");
            return Ok(0.0);
        }

        let answers: HashMap<&str, &Answer> = sheet
            .answers()
            .iter()
            .map(|a| (a.question_code(), a))
            .collect();

        let values: Vec<f64> = match factor.scoring_strategy {
            FactorScoringStrategy::Sum | FactorScoringStrategy::Avg => factor
                .question_codes
                .iter()
                .filter_map(|code| answers.get(code.as_str()).map(|a| a.score()))
                .collect(),
            FactorScoringStrategy::Cnt => Self::count_matches(factor, &answers, questionnaire)?,
        };

        let reducer = factor.scoring_strategy.reducer();
        let score = match get_scorer(reducer) {
            Some(scorer) => scorer.calculate(&values, &ScoringParams::new())?,
            None => return Err(ScoringError::UnknownStrategy(reducer.to_string())),
        };

        tracing::debug!(
            factor_code = %factor.code,
            strategy = %factor.scoring_strategy,
            values = values.len(),
            score,
            "factor scored"
        );
        Ok(score)
    }

    /// One `1.0` per question whose first selected option has a target content.
    fn count_matches(
        factor: &Factor,
        answers: &HashMap<&str, &Answer>,
        questionnaire: Option<&Questionnaire>,
    ) -> Result<Vec<f64>, ScoringError> {
        let targets = &factor.scoring_params.cnt_option_contents;
        if targets.is_empty() {
            return Err(ScoringError::MissingParameter("cnt_option_contents".into()));
        }
        let Some(questionnaire) = questionnaire else {
            tracing::debug!(factor_code = %factor.code, "no questionnaire, cnt factor counts nothing");
            return Ok(Vec::new());
        };

        let contents = questionnaire.option_contents();
        let matches = factor
            .question_codes
            .iter()
            .filter_map(|code| answers.get(code.as_str()))
            .filter_map(|answer| answer.value().first_selection())
            .filter_map(|option| contents.get(option).copied())
            .filter(|content| targets.iter().any(|t| t.as_str() == *content))
            .map(|_| 1.0)
            .collect();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::AnswerSheetId;
    use crate::domain::survey::{AnswerValue, Question, QuestionOption};

    fn sheet() -> AnswerSheet {
        AnswerSheet::new(
            AnswerSheetId::new(),
            "Q",
            "1",
            vec![
                Answer::new("Q1", AnswerValue::choice("Q1_Y")).unwrap().with_score(3.0),
                Answer::new("Q2", AnswerValue::Number(7.0)).unwrap().with_score(7.0),
                Answer::new("Q3", AnswerValue::choices(["Q3_Y"])).unwrap().with_score(1.0),
            ],
        )
    }

    fn questionnaire() -> Questionnaire {
        let yes_no = |q: &str| {
            vec![
                QuestionOption::new(format!("{}_Y", q), "是", 1.0),
                QuestionOption::new(format!("{}_N", q), "否", 0.0),
            ]
        };
        Questionnaire::new(
            "Q",
            "1",
            "t",
            vec![
                Question::new("Q1", "a").with_options(yes_no("Q1")),
                Question::new("Q2", "b"),
                Question::new("Q3", "c").with_options(yes_no("Q3")),
            ],
        )
    }

    #[test]
    fn sum_uses_answered_questions() {
        let factor = Factor::new("F", "f").with_questions(["Q1", "Q2", "Q9"]);
        assert_eq!(FactorScorer::new().calculate(&factor, &sheet(), None).unwrap(), 10.0);
    }

    #[test]
    fn avg_divides_by_answered_count() {
        let factor = Factor::new("F", "f")
            .with_questions(["Q1", "Q2"])
            .with_strategy(FactorScoringStrategy::Avg);
        assert_eq!(FactorScorer::new().calculate(&factor, &sheet(), None).unwrap(), 5.0);
    }

    #[test]
    fn factor_without_questions_scores_zero() {
        let factor = Factor::new("F", "f").with_strategy(FactorScoringStrategy::Cnt);
        assert_eq!(FactorScorer::new().calculate(&factor, &sheet(), None).unwrap(), 0.0);
    }

    #[test]
    fn cnt_counts_matching_option_contents() {
        let factor = Factor::new("F", "f")
            .with_questions(["Q1", "Q2", "Q3"])
            .with_strategy(FactorScoringStrategy::Cnt)
            .with_cnt_option_contents(["是"]);
        let score = FactorScorer::new()
            .calculate(&factor, &sheet(), Some(&questionnaire()))
            .unwrap();
        assert_eq!(score, 2.0);
    }

    #[test]
    fn cnt_requires_targets() {
        let factor = Factor::new("F", "f")
            .with_questions(["Q1"])
            .with_strategy(FactorScoringStrategy::Cnt);
        assert_eq!(
            FactorScorer::new().calculate(&factor, &sheet(), Some(&questionnaire())),
            Err(ScoringError::MissingParameter("cnt_option_contents".into()))
        );
        assert_eq!(
            FactorScorer::new().calculate(&factor, &sheet(), None),
            Err(ScoringError::MissingParameter("cnt_option_contents".into()))
        );
    }

    #[test]
    fn cnt_without_questionnaire_counts_nothing() {
        let factor = Factor::new("F", "f")
            .with_questions(["Q1", "Q3"])
            .with_strategy(FactorScoringStrategy::Cnt)
            .with_cnt_option_contents(["是"]);
        assert_eq!(FactorScorer::new().calculate(&factor, &sheet(), None), Ok(0.0));
    }
}
