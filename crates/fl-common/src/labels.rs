//! Funnel label sets.
//!
//! Stage and category are closed sets: the classifier is total, so every
//! page path maps to exactly one `Category` and every category to exactly
//! one `FunnelStage`. `UserType` keeps a passthrough variant because the
//! analytics export occasionally emits values beyond the documented three.

use serde::{Deserialize, Serialize};

/// Coarse stage of the user journey, derived from the page path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FunnelStage {
    Top,
    Middle,
    Bottom,
    CrossShopping,
}

impl FunnelStage {
    /// All stages in funnel order, top of funnel first.
    pub const ALL: [FunnelStage; 4] = [
        FunnelStage::Top,
        FunnelStage::Middle,
        FunnelStage::Bottom,
        FunnelStage::CrossShopping,
    ];

    /// The three-stage conversion funnel, excluding the cross-shopping segment.
    pub const CONVERSION: [FunnelStage; 3] =
        [FunnelStage::Top, FunnelStage::Middle, FunnelStage::Bottom];

    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelStage::Top => "Top",
            FunnelStage::Middle => "Middle",
            FunnelStage::Bottom => "Bottom",
            FunnelStage::CrossShopping => "Cross-Shopping",
        }
    }
}

impl std::fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finer-grained page category, derived from the page path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Application,
    Career,
    Finance,
    Admissions,
    Academics,
    CompetitorProgram,
    Faculty,
    Corporate,
    Homepage,
    GeneralInfo,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Application => "Application",
            Category::Career => "Career",
            Category::Finance => "Finance",
            Category::Admissions => "Admissions",
            Category::Academics => "Academics",
            Category::CompetitorProgram => "Competitor Program",
            Category::Faculty => "Faculty",
            Category::Corporate => "Corporate",
            Category::Homepage => "Homepage",
            Category::GeneralInfo => "General Info",
        }
    }

    /// Funnel stage implied by this category.
    ///
    /// Academics, Homepage, and GeneralInfo all land in Top: Academics is
    /// deliberately routed through the catch-all rather than to Middle.
    pub fn stage(&self) -> FunnelStage {
        match self {
            Category::Application => FunnelStage::Bottom,
            Category::Admissions
            | Category::Finance
            | Category::Career
            | Category::Faculty
            | Category::Corporate => FunnelStage::Middle,
            Category::CompetitorProgram => FunnelStage::CrossShopping,
            Category::Academics | Category::Homepage | Category::GeneralInfo => FunnelStage::Top,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User type as reported by the analytics platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UserType {
    New,
    Established,
    NotSet,
    /// Anything the export emits outside the documented set.
    Other(String),
}

impl UserType {
    pub fn parse(raw: &str) -> UserType {
        match raw {
            "new" => UserType::New,
            "established" => UserType::Established,
            "(not set)" => UserType::NotSet,
            other => UserType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            UserType::New => "new",
            UserType::Established => "established",
            UserType::NotSet => "(not set)",
            UserType::Other(s) => s.as_str(),
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_mapping_per_category() {
        assert_eq!(Category::Application.stage(), FunnelStage::Bottom);
        assert_eq!(Category::Admissions.stage(), FunnelStage::Middle);
        assert_eq!(Category::Finance.stage(), FunnelStage::Middle);
        assert_eq!(Category::Career.stage(), FunnelStage::Middle);
        assert_eq!(Category::Faculty.stage(), FunnelStage::Middle);
        assert_eq!(Category::Corporate.stage(), FunnelStage::Middle);
        assert_eq!(Category::CompetitorProgram.stage(), FunnelStage::CrossShopping);
        // Academics deliberately falls through to Top.
        assert_eq!(Category::Academics.stage(), FunnelStage::Top);
        assert_eq!(Category::Homepage.stage(), FunnelStage::Top);
        assert_eq!(Category::GeneralInfo.stage(), FunnelStage::Top);
    }

    #[test]
    fn user_type_round_trips_documented_values() {
        for raw in ["new", "established", "(not set)"] {
            assert_eq!(UserType::parse(raw).as_str(), raw);
        }
        assert_eq!(UserType::parse("returning"), UserType::Other("returning".into()));
    }

    #[test]
    fn stage_display_labels() {
        assert_eq!(FunnelStage::CrossShopping.to_string(), "Cross-Shopping");
        assert_eq!(FunnelStage::Top.to_string(), "Top");
    }
}
