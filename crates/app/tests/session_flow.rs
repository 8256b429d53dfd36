//! End-to-end session flow over the spawned control loop, with scripted
//! providers standing in for the microphone, the speaker, and the model.

use std::sync::Arc;
use std::time::Duration;

use intervox_app::runtime::{launch, RuntimeOptions};
use intervox_app::session::{SessionConfig, SessionNotice};
use intervox_app::UnlimitedEntitlements;
use intervox_foundation::{Analysis, QuestionPlan, SessionPhase};
use intervox_llm::{ResponseStream, ScriptedResponses};
use intervox_stt::{ScriptedSpeechInput, SpeechInput};
use intervox_tts::{NullSpeechOutput, SpeechOutput};

const QUESTIONS_TEXT: &str = "\
Behavioral: Tell me about a challenge you overcame.\n\
Technical: How do you debug a flaky test?";

const ANALYSIS_TEXT: &str = "\
OVERALL_SCORE: 9\n\
STRENGTHS:\n\
- Direct, honest answers\n\
IMPROVEMENTS:\n\
- More detail on tooling\n\
DETAILED_FEEDBACK:\n\
Question 1 (9/10): Strong story.\n\
Question 2 (8/10): Reasonable process.";

fn options(conversational: bool) -> RuntimeOptions {
    RuntimeOptions {
        config: SessionConfig {
            job_title: "QA Engineer".to_string(),
            listen_debounce: Duration::ZERO,
            ..SessionConfig::default()
        },
        plan: QuestionPlan {
            behavioral: 1,
            technical: 1,
            situational: 0,
        },
        conversational,
    }
}

#[tokio::test]
async fn scripted_interview_runs_to_analysis() {
    let llm: Arc<dyn ResponseStream> =
        Arc::new(ScriptedResponses::from_texts(&[QUESTIONS_TEXT, ANALYSIS_TEXT]));
    let input: Arc<dyn SpeechInput> =
        Arc::new(ScriptedSpeechInput::from_answers(&["answer one", "answer two"]));
    let output: Arc<dyn SpeechOutput> = Arc::new(NullSpeechOutput::new());

    let runtime = launch(options(true), input, output, llm, &UnlimitedEntitlements)
        .await
        .expect("launch should succeed");
    let mut notices = runtime.notices;
    let handle = runtime.handle;

    handle.start().await;

    let mut phases: Vec<SessionPhase> = Vec::new();
    let mut analysis: Option<Analysis> = None;

    tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(notice) = notices.recv().await {
            match notice {
                SessionNotice::Phase(phase) => phases.push(phase),
                // The scripted provider emits one final hypothesis per turn;
                // submit once it shows up.
                SessionNotice::Transcript(_) => handle.submit().await,
                SessionNotice::AnalysisReady(a) => {
                    analysis = Some(a);
                    break;
                }
                SessionNotice::Error { message } => panic!("unexpected error: {message}"),
            }
        }
    })
    .await
    .expect("session should reach an analysis within the deadline");

    let analysis = analysis.expect("analysis should be delivered");
    assert_eq!(analysis.overall_score, 9.0);
    assert_eq!(analysis.feedback.len(), 2);

    assert!(phases.contains(&SessionPhase::Processing));
    assert_eq!(phases.last(), Some(&SessionPhase::Reviewing));
    // Two spoken questions, two listening turns.
    let speaking = phases
        .iter()
        .filter(|p| **p == SessionPhase::AiSpeaking)
        .count();
    let recording = phases
        .iter()
        .filter(|p| **p == SessionPhase::Recording)
        .count();
    assert_eq!(speaking, 2);
    assert_eq!(recording, 2);

    handle.shutdown().await;
}

#[tokio::test]
async fn manual_mode_waits_for_the_user_after_each_question() {
    let llm: Arc<dyn ResponseStream> =
        Arc::new(ScriptedResponses::from_texts(&[QUESTIONS_TEXT, ANALYSIS_TEXT]));
    let input: Arc<dyn SpeechInput> = Arc::new(ScriptedSpeechInput::from_answers(&["unused"]));
    let output: Arc<dyn SpeechOutput> = Arc::new(NullSpeechOutput::new());

    let runtime = launch(options(false), input, output, llm, &UnlimitedEntitlements)
        .await
        .expect("launch should succeed");
    let mut notices = runtime.notices;
    let handle = runtime.handle;

    handle.start().await;

    let waiting = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(notice) = notices.recv().await {
            if let SessionNotice::Phase(phase) = notice {
                if phase == SessionPhase::WaitingForUserInput {
                    return true;
                }
                assert_ne!(phase, SessionPhase::Recording, "capture must not auto-start");
            }
        }
        false
    })
    .await
    .expect("question playback should finish within the deadline");

    assert!(waiting);
    handle.shutdown().await;
}
