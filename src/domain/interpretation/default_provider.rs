//! Boilerplate interpretation keyed only by risk tier.
//!
//! Used when a factor or the overall score has no configured rule text, so
//! that every evaluation still carries a readable conclusion.

use super::InterpretResult;
use crate::domain::foundation::RiskLevel;

struct Tier {
    label: &'static str,
    level_text: &'static str,
    suggestion: &'static str,
}

fn factor_tier(risk_level: RiskLevel) -> Tier {
    match risk_level {
        RiskLevel::Severe => Tier {
            label: "严重异常",
            level_text: "严重异常",
            suggestion: "建议立即寻求专业帮助，进行进一步评估",
        },
        RiskLevel::High => Tier {
            label: "较高风险",
            level_text: "较高风险",
            suggestion: "建议尽快咨询专业人员，了解更多信息",
        },
        RiskLevel::Medium => Tier {
            label: "中等水平",
            level_text: "中等",
            suggestion: "建议关注相关方面，适当调整生活方式",
        },
        RiskLevel::Low => Tier {
            label: "正常偏低",
            level_text: "正常偏低",
            suggestion: "整体情况良好，保持当前状态",
        },
        RiskLevel::None => Tier {
            label: "正常",
            level_text: "正常",
            suggestion: "状态良好，继续保持",
        },
    }
}

/// Default interpretation text for factors and overall results.
///
/// Results carry an empty `factor_code`; callers fill it in.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInterpretationProvider;

impl DefaultInterpretationProvider {
    pub fn new() -> Self {
        Self
    }

    /// "{name}得分{score:.1}分，处于{tier}水平" plus the tier's suggestion.
    pub fn provide_factor(&self, factor_name: &str, score: f64, risk_level: RiskLevel) -> InterpretResult {
        let tier = factor_tier(risk_level);
        InterpretResult {
            factor_code: String::new(),
            score,
            risk_level,
            label: tier.label.to_string(),
            description: format!("{}得分{:.1}分，处于{}水平", factor_name, score, tier.level_text),
            suggestion: tier.suggestion.to_string(),
            out_of_coverage: false,
        }
    }

    pub fn provide_overall(&self, total_score: f64, risk_level: RiskLevel) -> InterpretResult {
        let (label, description, suggestion) = match risk_level {
            RiskLevel::Severe => (
                "严重问题",
                "测评结果显示存在严重问题，需要立即关注",
                "强烈建议尽快寻求专业帮助，进行全面评估和干预",
            ),
            RiskLevel::High => (
                "较高风险",
                "测评结果显示存在较高风险，需要重点关注",
                "建议尽快咨询专业人员，获取更详细的评估和指导",
            ),
            RiskLevel::Medium => (
                "一定风险",
                "测评结果显示存在一定风险，需要适度关注",
                "建议关注相关方面的变化，必要时寻求专业帮助",
            ),
            RiskLevel::Low => (
                "基本良好",
                "测评结果显示整体情况良好，少数方面需要注意",
                "保持健康的生活方式，定期进行自我检查",
            ),
            RiskLevel::None => ("正常", "测评已完成，整体情况良好", "保持健康的生活方式"),
        };

        InterpretResult {
            factor_code: String::new(),
            score: total_score,
            risk_level,
            label: label.to_string(),
            description: description.to_string(),
            suggestion: suggestion.to_string(),
            out_of_coverage: false,
        }
    }

    /// Fills `{name}` and `{score}` (one decimal) in `template`.
    ///
    /// The label is the risk tier key. An empty `suggestion` falls back to
    /// the tier's default suggestion.
    pub fn provide_factor_with_template(
        &self,
        template: &str,
        factor_name: &str,
        score: f64,
        risk_level: RiskLevel,
        suggestion: &str,
    ) -> InterpretResult {
        let description = template
            .replace("{name}", factor_name)
            .replace("{score}", &format!("{:.1}", score));
        let suggestion = if suggestion.is_empty() {
            factor_tier(risk_level).suggestion.to_string()
        } else {
            suggestion.to_string()
        };

        InterpretResult {
            factor_code: String::new(),
            score,
            risk_level,
            label: risk_level.as_str().to_string(),
            description,
            suggestion,
            out_of_coverage: false,
        }
    }
}
