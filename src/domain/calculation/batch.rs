//! Batch scoring of independent answer values.

use std::collections::HashMap;

use super::{OptionScorer, OptionScores, ScorableValue};
use crate::domain::batch::{self, BatchOptions};

/// One value to score against its option table.
pub struct ScoreTask {
    pub id: String,
    pub value: Box<dyn ScorableValue>,
    pub option_scores: OptionScores,
}

impl ScoreTask {
    pub fn new(
        id: impl Into<String>,
        value: Box<dyn ScorableValue>,
        option_scores: OptionScores,
    ) -> Self {
        Self {
            id: id.into(),
            value,
            option_scores,
        }
    }
}

/// Score and ceiling for one task.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub id: String,
    pub score: f64,
    pub max_score: f64,
}

/// Scores many tasks, serially or over a worker pool.
#[derive(Debug, Clone, Default)]
pub struct BatchScorer {
    scorer: OptionScorer,
    options: BatchOptions,
}

impl BatchScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BatchOptions) -> Self {
        Self {
            scorer: OptionScorer::new(),
            options,
        }
    }

    /// Scores every task on the calling thread.
    pub fn score_all(&self, tasks: &[ScoreTask]) -> Vec<ScoreResult> {
        batch::run_serial(tasks, |task| self.score_one(task))
    }

    /// Scores every task, in input order. `workers == 0` sizes the pool
    /// automatically.
    pub fn score_all_concurrent(&self, tasks: &[ScoreTask], workers: usize) -> Vec<ScoreResult> {
        batch::run_concurrent(tasks, workers, &self.options, |task| self.score_one(task))
    }

    /// Scores every task and keys the results by task id.
    pub fn score_all_to_map(&self, tasks: &[ScoreTask]) -> HashMap<String, ScoreResult> {
        batch::index_by(self.score_all_concurrent(tasks, 0), |r| r.id.clone())
    }

    fn score_one(&self, task: &ScoreTask) -> ScoreResult {
        let (score, max_score) = self
            .scorer
            .score_with_max(task.value.as_ref(), &task.option_scores);
        ScoreResult {
            id: task.id.clone(),
            score,
            max_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::option_scorer::test_values::Raw;
    use super::*;

    fn tasks(n: usize) -> Vec<ScoreTask> {
        let options: OptionScores = [("yes".to_string(), 2.0), ("no".to_string(), 0.0)]
            .into_iter()
            .collect();
        (0..n)
            .map(|i| {
                let value = if i % 2 == 0 {
                    Raw::One("yes".into())
                } else {
                    Raw::Number(i as f64)
                };
                ScoreTask::new(format!("q{}", i), Box::new(value), options.clone())
            })
            .collect()
    }

    #[test]
    fn score_all_keeps_input_order() {
        let results = BatchScorer::new().score_all(&tasks(4));
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["q0", "q1", "q2", "q3"]);
        assert_eq!(results[0].score, 2.0);
        assert_eq!(results[3].score, 3.0);
        assert_eq!(results[3].max_score, 2.0);
    }

    #[test]
    fn concurrent_matches_serial_for_large_batches() {
        let input = tasks(250);
        let scorer = BatchScorer::new();
        for workers in [0, 1, 7, 64] {
            assert_eq!(scorer.score_all(&input), scorer.score_all_concurrent(&input, workers));
        }
    }

    #[test]
    fn to_map_indexes_by_id() {
        let map = BatchScorer::new().score_all_to_map(&tasks(12));
        assert_eq!(map.len(), 12);
        assert_eq!(map["q11"].score, 11.0);
    }
}
