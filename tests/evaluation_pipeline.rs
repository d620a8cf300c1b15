//! Integration tests for the assessment evaluation pipeline.
//!
//! These tests drive the public API end to end:
//! 1. Answer sheets are scored and validated against their questionnaire
//! 2. Assessments are submitted and evaluated against a medical scale
//! 3. Failed evaluations are retried once the configuration is fixed
//! 4. Events reach the publisher in lifecycle order
//!
//! Uses the in-memory adapters, so no external services are needed.

use std::sync::Arc;

use qs_evaluation::adapters::{
    InMemoryAssessmentRepository, InMemoryCatalog, InMemoryEventBus, InMemoryScoreRepository,
};
use qs_evaluation::application::{EvaluateAssessmentHandler, EvaluationOutcome};
use qs_evaluation::config::AppConfig;
use qs_evaluation::domain::assessment::{
    AnswerSheetRef, Assessment, AssessmentError, AssessmentInterpreted, AssessmentStatus,
    MedicalScaleRef, QuestionnaireRef,
};
use qs_evaluation::domain::foundation::{
    AnswerSheetId, AssessmentId, CancellationToken, MedicalScaleId, OrgId, QuestionnaireId,
    RiskLevel, TesteeId,
};
use qs_evaluation::domain::interpretation::{
    ComparisonOperator, CompositeConfig, CompositeRule, DefaultInterpreter, FactorCondition,
    InterpretStrategyType, Interpreter, LogicalOperator, ScoreRange, ScoredFactor,
};
use qs_evaluation::domain::scale::{Factor, FactorInterpretRule, FactorScoringStrategy, MedicalScale};
use qs_evaluation::domain::survey::{
    validate_answer_sheet, Answer, AnswerSheet, AnswerSheetScorer, AnswerValue, Question,
    QuestionOption, Questionnaire,
};
use qs_evaluation::domain::validation::{BatchValidator, ValidationRule};
use qs_evaluation::ports::{AssessmentRepository, AssessmentScoreRepository, EventPublisher};

// =============================================================================
// Test Infrastructure
// =============================================================================

const SCALE_CODE: &str = "ANX";

fn questionnaire() -> Questionnaire {
    Questionnaire::new(
        "ANX",
        "1.0",
        "焦虑自评",
        vec![
            Question::new("Q1", "最近是否感到紧张")
                .with_options(vec![
                    QuestionOption::new("Q1_A", "从不", 0.0),
                    QuestionOption::new("Q1_B", "有时", 1.0),
                    QuestionOption::new("Q1_C", "经常", 3.0),
                ])
                .with_rules(vec![ValidationRule::required()]),
            Question::new("Q2", "紧张程度评分")
                .with_options(
                    (0..=10)
                        .map(|n| QuestionOption::new(format!("Q2_{}", n), n.to_string(), n as f64))
                        .collect(),
                )
                .with_rules(vec![
                    ValidationRule::min_value(0.0),
                    ValidationRule::max_value(10.0),
                ]),
        ],
    )
}

/// Unscored answers: the radio option is worth 3 and the rating is worth 7.
fn answer_sheet() -> AnswerSheet {
    AnswerSheet::new(
        AnswerSheetId::new(),
        "ANX",
        "1.0",
        vec![
            Answer::new("Q1", AnswerValue::choice("Q1_C")).unwrap(),
            Answer::new("Q2", AnswerValue::Number(7.0)).unwrap(),
        ],
    )
}

fn scale() -> MedicalScale {
    MedicalScale::new(
        MedicalScaleId::new(),
        SCALE_CODE,
        "焦虑量表",
        "ANX",
        "1.0",
        vec![Factor::new("TOTAL", "总分")
            .total_score()
            .with_questions(["Q1", "Q2"])
            .with_rules(vec![
                FactorInterpretRule::new(ScoreRange::new(0.0, 10.0), RiskLevel::Low, "", ""),
                FactorInterpretRule::new(
                    ScoreRange::new(10.0, 100.0),
                    RiskLevel::High,
                    "焦虑水平偏高",
                    "建议尽快咨询专业人员",
                ),
            ])],
    )
}

struct Harness {
    repo: Arc<InMemoryAssessmentRepository>,
    scores: Arc<InMemoryScoreRepository>,
    catalog: Arc<InMemoryCatalog>,
    bus: Arc<InMemoryEventBus>,
    handler: EvaluateAssessmentHandler,
}

impl Harness {
    fn new() -> Self {
        let repo = Arc::new(InMemoryAssessmentRepository::new());
        let scores = Arc::new(InMemoryScoreRepository::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = EvaluateAssessmentHandler::new(
            repo.clone(),
            scores.clone(),
            catalog.clone(),
            catalog.clone(),
            catalog.clone(),
            bus.clone(),
        )
        .configured(&AppConfig::default());
        Self {
            repo,
            scores,
            catalog,
            bus,
            handler,
        }
    }

    /// Creates, submits and stores an assessment bound to `SCALE_CODE`.
    async fn submitted_assessment(&self) -> Assessment {
        self.catalog.add_questionnaire(questionnaire()).await;
        self.submitted_without_questionnaire().await
    }

    /// Same as `submitted_assessment`, but the catalog never sees the questionnaire.
    async fn submitted_without_questionnaire(&self) -> Assessment {
        let sheet = answer_sheet();
        let mut assessment = Assessment::new_screening(
            OrgId::new(42).unwrap(),
            TesteeId::new(),
            QuestionnaireRef::new(QuestionnaireId::new(), "ANX", "1.0"),
            AnswerSheetRef::new(sheet.id()),
            Some(MedicalScaleRef::new(MedicalScaleId::new(), SCALE_CODE, "焦虑量表")),
            "screening-2026",
        )
        .unwrap();
        assessment.submit().unwrap();

        self.catalog.add_answer_sheet(sheet).await;
        self.repo.save(&assessment).await.unwrap();
        for event in assessment.take_events() {
            self.bus.publish(event.to_envelope().unwrap()).await.unwrap();
        }
        assessment
    }

    async fn status(&self, id: AssessmentId) -> AssessmentStatus {
        self.repo.find_by_id(&id).await.unwrap().unwrap().status()
    }
}

// =============================================================================
// Scoring and validation
// =============================================================================

#[test]
fn radio_answer_scores_its_option() {
    let scored = AnswerSheetScorer::new().score(&answer_sheet(), &questionnaire());
    let q1 = scored.find("Q1").unwrap();
    assert_eq!(q1.score, 3.0);
    assert_eq!(q1.max_score, 3.0);
}

#[test]
fn answer_sheet_validation_reports_violations() {
    let sheet = AnswerSheet::new(
        AnswerSheetId::new(),
        "ANX",
        "1.0",
        vec![
            Answer::new("Q1", AnswerValue::choice("Q1_A")).unwrap(),
            Answer::new("Q2", AnswerValue::Number(30.0)).unwrap(),
        ],
    );
    let result = validate_answer_sheet(
        &sheet,
        &questionnaire(),
        &BatchValidator::new(),
        &CancellationToken::new(),
    )
    .unwrap();

    assert!(!result.valid);
    assert_eq!(result.total_tasks, 2);
    assert_eq!(result.failed_tasks, 1);
    assert!(result.failures.contains_key("Q2"));
}

#[test]
fn cancelled_validation_returns_no_results() {
    let token = CancellationToken::new();
    token.cancel();
    let result = validate_answer_sheet(
        &answer_sheet(),
        &questionnaire(),
        &BatchValidator::new(),
        &token,
    );
    assert!(result.is_err());
}

#[test]
fn composite_rule_needs_every_condition() {
    let config = CompositeConfig {
        rules: vec![CompositeRule {
            conditions: vec![
                FactorCondition::new("A", ComparisonOperator::Gt, 5.0),
                FactorCondition::new("B", ComparisonOperator::Lt, 3.0),
            ],
            operator: LogicalOperator::And,
            risk_level: RiskLevel::High,
            label: "组合风险".into(),
            description: "A高B低".into(),
            suggestion: "复查".into(),
        }],
        ..CompositeConfig::default()
    };
    let interpreter = DefaultInterpreter::new();
    let run = |scores: Vec<ScoredFactor>| {
        interpreter
            .interpret_multiple_factors(&scores, &config, InterpretStrategyType::Composite)
            .unwrap()
            .risk_level
    };

    let a_high = ScoredFactor::new("A", 6.0);
    assert_eq!(
        run(vec![a_high.clone(), ScoredFactor::new("B", 2.0)]),
        RiskLevel::High
    );
    assert_eq!(
        run(vec![a_high.clone(), ScoredFactor::new("B", 4.0)]),
        RiskLevel::None
    );
    // A missing factor fails its condition.
    assert_eq!(run(vec![a_high]), RiskLevel::None);
}

// =============================================================================
// Pipeline
// =============================================================================

#[tokio::test]
async fn sum_of_ten_on_boundary_is_interpreted_high() {
    let h = Harness::new();
    h.catalog.add_scale(scale()).await;
    let assessment = h.submitted_assessment().await;

    let outcome = h.handler.handle(assessment.id()).await.unwrap();
    assert_eq!(
        outcome,
        EvaluationOutcome::Interpreted {
            total_score: 10.0,
            risk_level: RiskLevel::High,
        }
    );
    assert_eq!(h.status(assessment.id()).await, AssessmentStatus::Interpreted);

    let score = h
        .scores
        .find_by_assessment_id(&assessment.id())
        .await
        .unwrap()
        .unwrap();
    let total = score.total_score_factor().unwrap();
    assert_eq!(total.raw_score, 10.0);
    assert_eq!(total.risk_level, RiskLevel::High);

    let interpreted = h.bus.events_of_type("assessment.interpreted.v1").await;
    assert_eq!(interpreted.len(), 1);
    let payload: AssessmentInterpreted = interpreted[0].payload_as().unwrap();
    assert_eq!(payload.assessment_id, assessment.id());
    assert_eq!(payload.scale_code, SCALE_CODE);
    assert_eq!(payload.total_score, 10.0);
    assert_eq!(payload.risk_level, RiskLevel::High);
}

#[tokio::test]
async fn unscored_answers_are_scored_from_the_questionnaire() {
    let h = Harness::new();
    h.catalog.add_scale(scale()).await;
    let assessment = h.submitted_assessment().await;

    let sheet = answer_sheet();
    assert!(sheet.answers().iter().all(|a| a.score() == 0.0));

    h.handler.handle(assessment.id()).await.unwrap();
    let score = h
        .scores
        .find_by_assessment_id(&assessment.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(score.total_score_factor().unwrap().raw_score, 10.0);
}

#[tokio::test]
async fn count_factor_without_questionnaire_scores_zero() {
    let h = Harness::new();
    h.catalog
        .add_scale(MedicalScale::new(
            MedicalScaleId::new(),
            SCALE_CODE,
            "焦虑量表",
            "ANX",
            "1.0",
            vec![Factor::new("OFTEN", "经常次数")
                .with_questions(["Q1"])
                .with_strategy(FactorScoringStrategy::Cnt)
                .with_cnt_option_contents(["经常"])],
        ))
        .await;
    let assessment = h.submitted_without_questionnaire().await;

    let outcome = h.handler.handle(assessment.id()).await.unwrap();
    assert_eq!(
        outcome,
        EvaluationOutcome::Interpreted {
            total_score: 0.0,
            risk_level: RiskLevel::None,
        }
    );
    assert_eq!(h.status(assessment.id()).await, AssessmentStatus::Interpreted);
}

#[tokio::test]
async fn count_factor_with_questionnaire_counts_matches() {
    let h = Harness::new();
    h.catalog
        .add_scale(MedicalScale::new(
            MedicalScaleId::new(),
            SCALE_CODE,
            "焦虑量表",
            "ANX",
            "1.0",
            vec![Factor::new("OFTEN", "经常次数")
                .with_questions(["Q1"])
                .with_strategy(FactorScoringStrategy::Cnt)
                .with_cnt_option_contents(["经常"])],
        ))
        .await;
    let assessment = h.submitted_assessment().await;

    let outcome = h.handler.handle(assessment.id()).await.unwrap();
    assert!(matches!(
        outcome,
        EvaluationOutcome::Interpreted { total_score, .. } if total_score == 1.0
    ));
}

#[tokio::test]
async fn missing_scale_fails_then_retry_succeeds() {
    let h = Harness::new();
    let assessment = h.submitted_assessment().await;
    let id = assessment.id();

    let outcome = h.handler.handle(id).await.unwrap();
    assert!(matches!(
        outcome,
        EvaluationOutcome::Failed { ref reason } if reason.contains(SCALE_CODE)
    ));
    assert_eq!(h.status(id).await, AssessmentStatus::Failed);

    // Fix the configuration and retry.
    h.catalog.add_scale(scale()).await;
    let mut failed = h.repo.find_by_id(&id).await.unwrap().unwrap();
    assert!(failed.failure_reason().is_some());
    failed.retry_from_failed().unwrap();
    assert_eq!(failed.failure_reason(), None);
    assert_eq!(failed.failed_at(), None);
    h.repo.save(&failed).await.unwrap();

    let outcome = h.handler.handle(id).await.unwrap();
    assert!(matches!(outcome, EvaluationOutcome::Interpreted { .. }));

    let types: Vec<String> = h
        .bus
        .events_for_aggregate(&id.to_string())
        .await
        .into_iter()
        .map(|e| e.event_type)
        .collect();
    assert_eq!(
        types,
        vec![
            "assessment.submitted.v1",
            "assessment.failed.v1",
            "assessment.interpreted.v1",
        ]
    );
}

#[tokio::test]
async fn batch_evaluation_reports_failures() {
    let h = Harness::new();
    h.catalog.add_scale(scale()).await;
    let first = h.submitted_assessment().await.id();
    let second = h.submitted_assessment().await.id();
    let unknown = AssessmentId::new();

    let summary = h.handler.evaluate_batch(&[first, unknown, second]).await;
    assert_eq!(summary.total, 3);
    assert_eq!(summary.success, 2);
    assert_eq!(summary.failed_ids, vec![unknown]);
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn lifecycle_rejects_out_of_order_transitions() {
    let mut assessment = Assessment::new_adhoc(
        OrgId::new(1).unwrap(),
        TesteeId::new(),
        QuestionnaireRef::new(QuestionnaireId::new(), "ANX", "1.0"),
        AnswerSheetRef::new(AnswerSheetId::new()),
        None,
    )
    .unwrap();

    assert!(matches!(
        assessment.mark_as_failed("too early"),
        Err(AssessmentError::InvalidStatus { .. })
    ));
    assessment.submit().unwrap();
    assert!(matches!(
        assessment.submit(),
        Err(AssessmentError::InvalidStatus { .. })
    ));
    assert_eq!(assessment.events().len(), 1);
}
