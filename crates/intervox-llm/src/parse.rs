//! Pure parsers for the semi-structured model response formats.

use intervox_foundation::{Analysis, Category, Question, QuestionFeedback};
use regex::Regex;

use crate::error::LlmError;
use crate::next_question_id;

/// Parse a question-generation response.
///
/// Accepts lines of the form `<Category>: <question text>`, with an optional
/// leading list number. Chatter lines that match no known category are
/// skipped; a response with no question lines at all is a parse error.
pub fn parse_questions(text: &str) -> Result<Vec<Question>, LlmError> {
    let line_re = Regex::new(r"^\s*(?:\d+[.)]\s*)?([A-Za-z]+)\s*:\s*(.+?)\s*$").unwrap();

    let mut questions = Vec::new();
    for line in text.lines() {
        let Some(caps) = line_re.captures(line) else {
            continue;
        };
        let Ok(category) = caps[1].parse::<Category>() else {
            continue;
        };
        questions.push(Question {
            id: next_question_id(),
            text: caps[2].to_string(),
            category,
        });
    }

    if questions.is_empty() {
        return Err(LlmError::Parse(
            "no question lines found in response".to_string(),
        ));
    }
    Ok(questions)
}

#[derive(PartialEq)]
enum Section {
    None,
    Overall,
    Strengths,
    Improvements,
    Feedback,
}

/// Parse an analysis response.
///
/// Expects the marked sections `OVERALL_SCORE:`, `STRENGTHS:`,
/// `IMPROVEMENTS:`, and `DETAILED_FEEDBACK:`. A missing overall score is a
/// parse error; there is no best-effort partial Analysis.
pub fn parse_analysis(text: &str) -> Result<Analysis, LlmError> {
    let number_re = Regex::new(r"(\d+(?:\.\d+)?)").unwrap();
    let feedback_re = Regex::new(
        r"^\s*(?:[-*]\s*)?[Qq]uestion\s+(\d+)\s*\(\s*(\d+(?:\.\d+)?)\s*/\s*10\s*\)\s*:\s*(.+?)\s*$",
    )
    .unwrap();

    let mut overall: Option<f32> = None;
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    let mut feedback = Vec::new();
    let mut section = Section::None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("OVERALL_SCORE:") {
            section = Section::Overall;
            if let Some(score) = first_number(&number_re, rest) {
                overall = Some(score);
                section = Section::None;
            }
            continue;
        }
        if line.starts_with("STRENGTHS:") {
            section = Section::Strengths;
            continue;
        }
        if line.starts_with("IMPROVEMENTS:") {
            section = Section::Improvements;
            continue;
        }
        if line.starts_with("DETAILED_FEEDBACK:") {
            section = Section::Feedback;
            continue;
        }

        match section {
            Section::Overall => {
                if let Some(score) = first_number(&number_re, line) {
                    overall = Some(score);
                    section = Section::None;
                }
            }
            Section::Strengths => strengths.push(strip_bullet(line).to_string()),
            Section::Improvements => improvements.push(strip_bullet(line).to_string()),
            Section::Feedback => {
                if let Some(caps) = feedback_re.captures(line) {
                    let number: usize = caps[1].parse().unwrap_or(0);
                    let score: f32 = caps[2].parse().unwrap_or(0.0);
                    if number > 0 {
                        feedback.push(QuestionFeedback {
                            question_index: number - 1,
                            score,
                            comment: caps[3].to_string(),
                        });
                    }
                }
            }
            Section::None => {}
        }
    }

    let overall_score = overall.ok_or_else(|| {
        LlmError::Parse("analysis response is missing OVERALL_SCORE".to_string())
    })?;

    Ok(Analysis {
        overall_score,
        strengths,
        improvements,
        feedback,
    })
}

fn first_number(re: &Regex, text: &str) -> Option<f32> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim_start_matches(['-', '*']).trim_start();
    // Numbered items: "1. strength" / "2) strength"
    let re_stripped = line
        .split_once(['.', ')'])
        .filter(|(head, _)| !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()))
        .map(|(_, tail)| tail.trim_start());
    re_stripped.unwrap_or(line)
}
