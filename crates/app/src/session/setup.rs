//! One-shot question generation before the session starts.

use intervox_foundation::{Question, QuestionPlan, SessionError};
use intervox_llm::{collect_stream, parse_questions, prompt, ResponseStream};
use tracing::info;

use crate::entitlement::EntitlementGate;
use crate::session::SessionConfig;

/// Generate the interview's question list.
///
/// Validates the configuration, reserves a session against the entitlement
/// gate, then runs one streaming generation and parses the result. Failures
/// here leave no session behind; the caller never reaches the state machine.
pub async fn generate_questions(
    config: &SessionConfig,
    plan: &QuestionPlan,
    llm: &dyn ResponseStream,
    gate: &dyn EntitlementGate,
) -> Result<Vec<Question>, SessionError> {
    if config.job_title.trim().is_empty() {
        return Err(SessionError::InvalidConfiguration(
            "A job title is required to generate questions.".to_string(),
        ));
    }
    if plan.is_empty() {
        return Err(SessionError::InvalidConfiguration(
            "The question plan requests zero questions.".to_string(),
        ));
    }

    gate.reserve_session().await?;

    let generation_prompt = prompt::question_prompt(
        &config.job_title,
        &config.experience_level,
        plan,
        config.resume_summary.as_deref(),
    );
    let rx = llm.generate(&generation_prompt).await?;
    let text = collect_stream(rx).await?;
    let questions = parse_questions(&text)?;
    info!(
        target: "session",
        "Generated {} question(s) for {} ({} requested)",
        questions.len(),
        config.job_title,
        plan.total()
    );
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitlement::{PrepaidCredits, UnlimitedEntitlements};
    use intervox_llm::ScriptedResponses;

    fn config() -> SessionConfig {
        SessionConfig {
            job_title: "Backend Engineer".to_string(),
            ..SessionConfig::default()
        }
    }

    #[tokio::test]
    async fn generates_questions_from_model_response() {
        let llm = ScriptedResponses::from_texts(&[
            "Behavioral: Tell me about a conflict.\nTechnical: Explain indexing.",
        ]);
        let questions = generate_questions(
            &config(),
            &QuestionPlan::default(),
            &llm,
            &UnlimitedEntitlements,
        )
        .await
        .unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text, "Tell me about a conflict.");
    }

    #[tokio::test]
    async fn blank_job_title_is_rejected_before_any_model_call() {
        let llm = ScriptedResponses::from_texts(&[]);
        let err = generate_questions(
            &SessionConfig::default(),
            &QuestionPlan::default(),
            &llm,
            &UnlimitedEntitlements,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SessionError::InvalidConfiguration(_)));
    }

    #[tokio::test]
    async fn empty_plan_is_rejected() {
        let llm = ScriptedResponses::from_texts(&[]);
        let plan = QuestionPlan {
            behavioral: 0,
            technical: 0,
            situational: 0,
        };
        let err = generate_questions(&config(), &plan, &llm, &UnlimitedEntitlements)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidConfiguration(_)));
    }

    #[tokio::test]
    async fn exhausted_entitlements_block_generation() {
        let llm = ScriptedResponses::from_texts(&["Behavioral: unused"]);
        let gate = PrepaidCredits::new(0);
        let err = generate_questions(&config(), &QuestionPlan::default(), &llm, &gate)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidConfiguration(_)));
    }
}
