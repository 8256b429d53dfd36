//! Prompt builders for question generation and session analysis.

use intervox_foundation::{Question, QuestionPlan};
use std::fmt::Write;

/// Build the question-generation prompt.
///
/// The response contract matches [`crate::parse::parse_questions`]: one
/// question per line, `<Category>: <question text>`.
pub fn question_prompt(
    job_title: &str,
    experience_level: &str,
    plan: &QuestionPlan,
    resume_summary: Option<&str>,
) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are preparing a mock interview for a {experience_level} {job_title} candidate."
    );
    let _ = writeln!(
        prompt,
        "Generate exactly {} behavioral, {} technical, and {} situational interview questions.",
        plan.behavioral, plan.technical, plan.situational
    );
    if let Some(summary) = resume_summary {
        let _ = writeln!(
            prompt,
            "Tailor the questions to this candidate background: {summary}"
        );
    }
    let _ = writeln!(
        prompt,
        "Respond with one question per line, formatted exactly as `<Category>: <question>`, \
         where <Category> is Behavioral, Technical, or Situational. No other text."
    );
    prompt
}

/// Build the analysis prompt over the collected question/response pairs.
///
/// Only answered questions are included; an early-ended session simply omits
/// the rest. The response contract matches
/// [`crate::parse::parse_analysis`].
pub fn analysis_prompt(questions: &[Question], responses: &[String]) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "Evaluate this mock interview. For each pair, the question is followed by the candidate's answer."
    );
    let _ = writeln!(prompt);
    for (i, (question, response)) in questions.iter().zip(responses.iter()).enumerate() {
        let _ = writeln!(prompt, "Question {}: {}", i + 1, question.text);
        let _ = writeln!(prompt, "Answer {}: {}", i + 1, response);
        let _ = writeln!(prompt);
    }
    let _ = writeln!(
        prompt,
        "Respond using exactly these sections:\n\
         OVERALL_SCORE: <score out of 10>\n\
         STRENGTHS:\n- <one strength per line>\n\
         IMPROVEMENTS:\n- <one improvement per line>\n\
         DETAILED_FEEDBACK:\n\
         Question <n> (<score>/10): <feedback for that answer>"
    );
    prompt
}
