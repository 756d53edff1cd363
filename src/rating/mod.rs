use serde::{Deserialize, Serialize};

use crate::analysis::ClearanceResult;

/// How often a path is expected to work, from its normalized clearance margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkRating {
    Rarely = 1,
    Sometimes = 2,
    Often = 3,
    MostOfTheTime = 4,
    Always = 5,
}

impl LinkRating {
    pub fn from_margin(margin: f64) -> Self {
        if margin >= 0.20 {
            LinkRating::Always
        } else if margin >= -0.20 {
            LinkRating::MostOfTheTime
        } else if margin >= -0.60 {
            LinkRating::Often
        } else if margin >= -1.00 {
            LinkRating::Sometimes
        } else {
            LinkRating::Rarely
        }
    }

    pub fn for_result(result: &ClearanceResult) -> Self {
        match result.margin_ratio() {
            Some(m) => Self::from_margin(m),
            None if result.has_line_of_sight => LinkRating::Always,
            None => LinkRating::Rarely,
        }
    }

    pub fn stars(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            LinkRating::Rarely => "Rarely",
            LinkRating::Sometimes => "Sometimes",
            LinkRating::Often => "Often",
            LinkRating::MostOfTheTime => "Most of the time",
            LinkRating::Always => "Always",
        }
    }
}

impl std::fmt::Display for LinkRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let n = self.stars() as usize;
        write!(f, "{}{} ({})", "★".repeat(n), "☆".repeat(5 - n), self.label())
    }
}
