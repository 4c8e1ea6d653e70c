//! Page-path classification.
//!
//! An ordered list of substring rules over the lowercased path; the first
//! matching rule wins, so no path can receive two categories. The ordering
//! is load-bearing: `academics`/`curriculum`/`capstone` are checked before
//! the competitor-program keywords, so `/mba/curriculum` classifies as
//! Academics.

use fl_common::{Category, FunnelStage};

/// Ordered substring rules, first match wins. The Homepage rule is an exact
/// match and handled separately after these.
const CONTAINS_RULES: &[(&[&str], Category)] = &[
    (&["apply"], Category::Application),
    (&["career", "placement", "outcomes"], Category::Career),
    (&["financing", "tuition", "fellows", "fees"], Category::Finance),
    (
        &["admissions", "prerequisites", "requirements", "faq"],
        Category::Admissions,
    ),
    (&["academics", "curriculum", "capstone"], Category::Academics),
    (
        &["mba", "financial-engineering", "phd"],
        Category::CompetitorProgram,
    ),
    (&["faculty", "team"], Category::Faculty),
    (&["company", "companies"], Category::Corporate),
];

/// Classifies page paths into categories and funnel stages.
#[derive(Debug, Clone)]
pub struct Classifier {
    home_path: String,
}

impl Classifier {
    /// `home_path` is the program home page matched exactly (besides `/`)
    /// by the Homepage rule.
    pub fn new(home_path: &str) -> Classifier {
        Classifier {
            home_path: home_path.to_lowercase(),
        }
    }

    /// Category of a page path. Total: every input yields exactly one label.
    pub fn categorize(&self, path: &str) -> Category {
        let p = path.to_lowercase();
        for (keywords, category) in CONTAINS_RULES {
            if keywords.iter().any(|k| p.contains(k)) {
                return *category;
            }
        }
        if p == "/" || p == self.home_path {
            return Category::Homepage;
        }
        Category::GeneralInfo
    }

    /// Category plus the funnel stage it implies.
    pub fn classify(&self, path: &str) -> (Category, FunnelStage) {
        let category = self.categorize(path);
        (category, category.stage())
    }
}

/// First-pass coarse stage heuristic used by the initial engagement-time
/// model, before categories exist: apply → Bottom;
/// career/finance/admissions → Middle; everything else Top.
///
/// `finance` is a substring check, so `financing` and `financial-engineering`
/// land in Middle here even though the refined rules separate them.
pub fn coarse_stage(path: &str) -> FunnelStage {
    let p = path.to_lowercase();
    if p.contains("apply") {
        return FunnelStage::Bottom;
    }
    if ["career", "finance", "admissions"].iter().any(|k| p.contains(k)) {
        return FunnelStage::Middle;
    }
    FunnelStage::Top
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HOME: &str = "/degrees/master-of-science-in-business-analytics-msba";

    fn classifier() -> Classifier {
        Classifier::new(HOME)
    }

    #[test]
    fn apply_beats_everything() {
        // Contains both "apply" and "career": the apply rule is first.
        let (category, stage) = classifier().classify("/apply/career-info");
        assert_eq!(category, Category::Application);
        assert_eq!(stage, FunnelStage::Bottom);
    }

    #[test]
    fn apply_now_is_application_bottom() {
        let (category, stage) = classifier().classify("/apply-now");
        assert_eq!(category, Category::Application);
        assert_eq!(stage, FunnelStage::Bottom);
    }

    #[test]
    fn program_home_is_homepage_top() {
        let (category, stage) = classifier().classify(HOME);
        assert_eq!(category, Category::Homepage);
        assert_eq!(stage, FunnelStage::Top);
        assert_eq!(classifier().categorize("/"), Category::Homepage);
    }

    #[test]
    fn mba_curriculum_is_academics_not_competitor() {
        // Curriculum is checked before the competitor keywords.
        assert_eq!(classifier().categorize("/mba/curriculum"), Category::Academics);
        // A pure competitor path still classifies as such.
        assert_eq!(
            classifier().categorize("/mba"),
            Category::CompetitorProgram
        );
        assert_eq!(
            classifier().categorize("/financial-engineering/overview"),
            Category::CompetitorProgram
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classifier().categorize("/APPLY-NOW"), Category::Application);
        assert_eq!(
            classifier().categorize(&HOME.to_uppercase()),
            Category::Homepage
        );
    }

    #[test]
    fn keyword_buckets() {
        let c = classifier();
        assert_eq!(c.categorize("/career-placement"), Category::Career);
        assert_eq!(c.categorize("/student-outcomes"), Category::Career);
        assert_eq!(c.categorize("/tuition-and-fees"), Category::Finance);
        assert_eq!(c.categorize("/admissions/faq"), Category::Admissions);
        assert_eq!(c.categorize("/capstone-projects"), Category::Academics);
        assert_eq!(c.categorize("/faculty"), Category::Faculty);
        assert_eq!(c.categorize("/our-team"), Category::Faculty);
        assert_eq!(c.categorize("/hiring-companies"), Category::Corporate);
        assert_eq!(c.categorize("/about-the-neighborhood"), Category::GeneralInfo);
        assert_eq!(c.categorize(""), Category::GeneralInfo);
    }

    #[test]
    fn coarse_stage_heuristic() {
        assert_eq!(coarse_stage("/apply-now"), FunnelStage::Bottom);
        assert_eq!(coarse_stage("/career"), FunnelStage::Middle);
        assert_eq!(coarse_stage("/financing"), FunnelStage::Middle);
        assert_eq!(coarse_stage("/financial-engineering"), FunnelStage::Middle);
        assert_eq!(coarse_stage("/"), FunnelStage::Top);
    }

    proptest! {
        #[test]
        fn classifier_is_total_and_consistent(path in ".{0,80}") {
            let c = classifier();
            let (category, stage) = c.classify(&path);
            // Stage always agrees with the category mapping.
            prop_assert_eq!(stage, category.stage());
            // Deterministic.
            prop_assert_eq!(c.categorize(&path), category);
        }
    }
}
