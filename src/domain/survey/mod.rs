//! Survey module - answer sheets and questionnaires consumed by evaluation.

mod answer_sheet;
mod questionnaire;
mod scoring;

pub use answer_sheet::{Answer, AnswerSheet, AnswerValue};
pub use questionnaire::{Question, QuestionOption, Questionnaire};
pub use scoring::{validate_answer_sheet, AnswerSheetScorer, ScoredAnswer, ScoredAnswerSheet};
