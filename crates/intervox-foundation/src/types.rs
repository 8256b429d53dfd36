//! Core domain types shared across the Intervox crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interview question category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Behavioral,
    Technical,
    Situational,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Behavioral => "Behavioral",
            Category::Technical => "Technical",
            Category::Situational => "Situational",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "behavioral" => Ok(Category::Behavioral),
            "technical" => Ok(Category::Technical),
            "situational" => Ok(Category::Situational),
            _ => Err(()),
        }
    }
}

/// A generated interview question. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u64,
    pub text: String,
    pub category: Category,
}

/// How many questions of each category a session should generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPlan {
    pub behavioral: usize,
    pub technical: usize,
    pub situational: usize,
}

impl QuestionPlan {
    pub fn total(&self) -> usize {
        self.behavioral + self.technical + self.situational
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl Default for QuestionPlan {
    fn default() -> Self {
        Self {
            behavioral: 2,
            technical: 2,
            situational: 2,
        }
    }
}

/// Per-question feedback inside an [`Analysis`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionFeedback {
    /// 0-based index into the session's question list.
    pub question_index: usize,
    /// Score out of 10.
    pub score: f32,
    pub comment: String,
}

/// Terminal analysis of a completed session. Produced at most once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Overall score out of 10.
    pub overall_score: f32,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub feedback: Vec<QuestionFeedback>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("behavioral".parse::<Category>(), Ok(Category::Behavioral));
        assert_eq!("Technical".parse::<Category>(), Ok(Category::Technical));
        assert_eq!(" SITUATIONAL ".parse::<Category>(), Ok(Category::Situational));
        assert!("introduction".parse::<Category>().is_err());
    }

    #[test]
    fn category_display_round_trips() {
        for c in [Category::Behavioral, Category::Technical, Category::Situational] {
            assert_eq!(c.to_string().parse::<Category>(), Ok(c));
        }
    }

    #[test]
    fn plan_totals() {
        let plan = QuestionPlan::default();
        assert_eq!(plan.total(), 6);
        assert!(!plan.is_empty());
        let empty = QuestionPlan {
            behavioral: 0,
            technical: 0,
            situational: 0,
        };
        assert!(empty.is_empty());
    }
}
