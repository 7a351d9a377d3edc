use chrono::Utc;

use crate::catalog::CropType;
use crate::models::{
    AnalysisReport, ClassificationResult, ColorStatistics, Progression, ValidationVerdict,
};

const HEALTHY_RECOMMENDATIONS: &[&str] = &[
    "Continue current agricultural practices",
    "Maintain regular monitoring schedule",
    "Consider documenting for credit application",
];

const DISEASE_RECOMMENDATIONS: &[&str] = &[
    "Apply fungicide treatment within 48 hours",
    "Adjust irrigation to reduce leaf wetness",
    "Monitor daily for the next week",
    "Consider consulting with an agronomist",
];

pub fn progression_for(affected_area_percent: f32) -> Progression {
    if affected_area_percent < 25.0 {
        Progression::Early
    } else if affected_area_percent < 50.0 {
        Progression::Moderate
    } else {
        Progression::Advanced
    }
}

pub fn yield_impact_for(progression: Progression) -> &'static str {
    match progression {
        Progression::Early => "10-20% if untreated",
        Progression::Moderate => "30-40% if untreated",
        Progression::Advanced => "50-70% if untreated",
    }
}

/// Assemble the user-facing report from the pipeline outputs.
pub fn build_report(
    filename: &str,
    crop: CropType,
    verdict: ValidationVerdict,
    statistics: Option<ColorStatistics>,
    classification: Option<ClassificationResult>,
) -> AnalysisReport {
    let (summary, recommendations, progression) = match (&classification, &verdict.reason) {
        (Some(result), _) if result.is_diseased => {
            let progression = progression_for(result.affected_area_percent);
            let name = result.disease_name.as_deref().unwrap_or("an unidentified disease");
            (
                format!(
                    "Signs of {name} detected in your {crop} crop ({:.0}% confidence). Early intervention is recommended to prevent spread.",
                    result.confidence_percent
                ),
                to_owned(DISEASE_RECOMMENDATIONS),
                Some(progression),
            )
        }
        (Some(result), _) => (
            format!(
                "Your {crop} crop appears healthy with good leaf coloration ({:.0}% confidence). No signs of common diseases detected.",
                result.confidence_percent
            ),
            to_owned(HEALTHY_RECOMMENDATIONS),
            None,
        ),
        (None, Some(reason)) => (format!("Analysis blocked: {reason}"), Vec::new(), None),
        (None, None) => ("No analysis was performed".to_string(), Vec::new(), None),
    };

    AnalysisReport {
        filename: filename.to_string(),
        crop,
        verdict,
        statistics,
        classification,
        progression,
        potential_yield_impact: progression.map(|p| yield_impact_for(p).to_string()),
        summary,
        recommendations,
        analyzed_at: Utc::now(),
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rejection;

    fn result(is_diseased: bool, area: f32) -> ClassificationResult {
        ClassificationResult {
            is_diseased,
            disease_name: is_diseased.then(|| "Late Blight".to_string()),
            confidence_percent: 88.0,
            affected_area_percent: area,
            symptom_description: None,
            disease_score: area,
        }
    }

    #[test]
    fn progression_thresholds() {
        assert_eq!(progression_for(10.0), Progression::Early);
        assert_eq!(progression_for(25.0), Progression::Moderate);
        assert_eq!(progression_for(49.9), Progression::Moderate);
        assert_eq!(progression_for(85.0), Progression::Advanced);
    }

    #[test]
    fn diseased_report_carries_treatment_advice() {
        let report = build_report(
            "a.jpg",
            CropType::Potato,
            ValidationVerdict::valid(),
            None,
            Some(result(true, 60.0)),
        );
        assert_eq!(report.progression, Some(Progression::Advanced));
        assert_eq!(report.potential_yield_impact.as_deref(), Some("50-70% if untreated"));
        assert!(report.summary.contains("Late Blight"));
        assert_eq!(report.recommendations.len(), 4);
    }

    #[test]
    fn healthy_report_has_no_progression() {
        let report = build_report(
            "a.jpg",
            CropType::Rice,
            ValidationVerdict::valid(),
            None,
            Some(result(false, 0.0)),
        );
        assert!(report.progression.is_none());
        assert!(report.summary.contains("healthy"));
        assert_eq!(report.recommendations.len(), 3);
    }

    #[test]
    fn rejected_report_explains_the_block() {
        let report = build_report(
            "car.jpg",
            CropType::Rice,
            ValidationVerdict::invalid(Rejection::NonCropFilename),
            None,
            None,
        );
        assert!(report.summary.contains("filename suggests non-crop image"));
        assert!(report.recommendations.is_empty());
    }
}
