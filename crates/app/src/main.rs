use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;

use intervox_app::config::AppConfig;
use intervox_app::entitlement::{EntitlementGate, PrepaidCredits, UnlimitedEntitlements};
use intervox_app::runtime::{launch, RuntimeOptions};
use intervox_app::session::{SessionConfig, SessionNotice};
use intervox_foundation::{Analysis, QuestionPlan};
use intervox_llm::{ChatStreamClient, ResponseStream, ScriptedResponses};
use intervox_stt::{PushSpeechInput, SpeechInput};
use intervox_tts::{NullSpeechOutput, SpeechOutput};
use intervox_tts_espeak::EspeakSpeech;

/// Voice-driven mock interview practice at the terminal.
#[derive(Parser, Debug)]
#[command(name = "intervox", version)]
struct Cli {
    /// Job title to interview for
    #[arg(long)]
    job_title: String,

    /// Candidate experience level
    #[arg(long, default_value = "mid-level")]
    experience: String,

    /// Number of behavioral questions
    #[arg(long, default_value_t = 2)]
    behavioral: usize,

    /// Number of technical questions
    #[arg(long, default_value_t = 2)]
    technical: usize,

    /// Number of situational questions
    #[arg(long, default_value_t = 2)]
    situational: usize,

    /// Config file path
    #[arg(long, default_value = "intervox.toml")]
    config: PathBuf,

    /// One-paragraph resume summary used to bias question generation
    #[arg(long)]
    resume_summary: Option<String>,

    /// Use canned model responses instead of a live API
    #[arg(long)]
    offline: bool,

    /// Print questions instead of speaking them aloud
    #[arg(long)]
    silent: bool,

    /// Disable the automatic speak-listen-advance flow
    #[arg(long)]
    manual: bool,

    /// Limit the number of sessions this invocation may start
    #[arg(long)]
    credits: Option<u32>,
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all("logs")?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, "logs", "intervox.log");
    let (non_blocking_file, _guard) = tracing_appender::non_blocking(file_appender);
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr.and(non_blocking_file))
        .with_env_filter(log_level)
        .init();
    std::mem::forget(_guard);
    Ok(())
}

const OFFLINE_QUESTIONS: &str = "\
Behavioral: Tell me about a time you disagreed with a teammate.\n\
Behavioral: Describe a project you are proud of.\n\
Technical: How would you find a memory leak in a long-running service?\n\
Technical: Explain the trade-offs of eventual consistency.\n\
Situational: Your release is blocked an hour before the deadline. What do you do?\n\
Situational: A stakeholder keeps changing requirements. How do you respond?";

const OFFLINE_ANALYSIS: &str = "\
OVERALL_SCORE: 7.5\n\
STRENGTHS:\n\
- Clear, structured answers\n\
- Concrete examples\n\
IMPROVEMENTS:\n\
- Quantify outcomes\n\
- Slow down on technical depth\n\
DETAILED_FEEDBACK:\n\
Question 1 (8/10): Good conflict framing, strong resolution.\n\
Question 2 (7/10): Solid project walkthrough, missing metrics.";

fn build_llm(cli: &Cli, config: &AppConfig) -> anyhow::Result<Arc<dyn ResponseStream>> {
    if cli.offline {
        return Ok(Arc::new(ScriptedResponses::from_texts(&[
            OFFLINE_QUESTIONS,
            OFFLINE_ANALYSIS,
        ])));
    }
    let api_key = std::env::var(&config.llm.api_key_env)
        .with_context(|| format!("environment variable {} is not set", config.llm.api_key_env))?;
    Ok(Arc::new(ChatStreamClient::new(
        config.llm.base_url.clone(),
        config.llm.model.clone(),
        Some(api_key),
    )))
}

async fn build_output(cli: &Cli, config: &AppConfig) -> Arc<dyn SpeechOutput> {
    if !cli.silent && EspeakSpeech::is_available().await {
        Arc::new(EspeakSpeech::new(config.voice.clone()))
    } else {
        if !cli.silent {
            tracing::warn!("espeak not found; questions will be printed, not spoken");
        }
        Arc::new(NullSpeechOutput::new())
    }
}

fn render_analysis(analysis: &Analysis) {
    println!("\n================ INTERVIEW ANALYSIS ================");
    println!("Overall score: {:.1}/10", analysis.overall_score);
    if !analysis.strengths.is_empty() {
        println!("\nStrengths:");
        for s in &analysis.strengths {
            println!("  - {s}");
        }
    }
    if !analysis.improvements.is_empty() {
        println!("\nAreas to improve:");
        for s in &analysis.improvements {
            println!("  - {s}");
        }
    }
    if !analysis.feedback.is_empty() {
        println!("\nPer-question feedback:");
        for f in &analysis.feedback {
            println!("  Question {} ({:.0}/10): {}", f.question_index + 1, f.score, f.comment);
        }
    }
    println!("====================================================");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;
    let cli = Cli::parse();
    tracing::info!("Starting Intervox");

    let config = AppConfig::load(&cli.config)?;

    let plan = QuestionPlan {
        behavioral: cli.behavioral,
        technical: cli.technical,
        situational: cli.situational,
    };
    let session_config = SessionConfig {
        job_title: cli.job_title.clone(),
        experience_level: cli.experience.clone(),
        resume_summary: cli.resume_summary.clone(),
        listen_debounce: Duration::from_millis(config.session.listen_debounce_ms),
    };

    let llm = build_llm(&cli, &config)?;
    let output = build_output(&cli, &config).await;
    let input = Arc::new(PushSpeechInput::new());
    let gate: Box<dyn EntitlementGate> = match cli.credits {
        Some(n) => Box::new(PrepaidCredits::new(n)),
        None => Box::new(UnlimitedEntitlements),
    };

    let options = RuntimeOptions {
        config: session_config,
        plan,
        conversational: config.session.conversational && !cli.manual,
    };
    let runtime = launch(
        options,
        Arc::clone(&input) as Arc<dyn SpeechInput>,
        output,
        llm,
        gate.as_ref(),
    )
    .await
    .map_err(|e| anyhow!(e.user_message()))?;

    let mut notices = runtime.notices;
    let handle = runtime.handle;

    println!("Type your answer and press Enter; it is captured as transcript text.");
    println!("Commands: /submit /cancel /listen /end /retry /quit");

    handle.start().await;

    let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();
    let mut final_analysis: Option<Analysis> = None;

    loop {
        tokio::select! {
            maybe_notice = notices.recv() => {
                let Some(notice) = maybe_notice else { break };
                match notice {
                    SessionNotice::Phase(phase) => println!("[phase] {phase:?}"),
                    SessionNotice::Transcript(text) => println!("[heard] {text}"),
                    SessionNotice::Error { message } => eprintln!("[error] {message}"),
                    SessionNotice::AnalysisReady(analysis) => {
                        render_analysis(&analysis);
                        final_analysis = Some(analysis);
                    }
                }
            }
            maybe_line = stdin_lines.next_line() => {
                let line = match maybe_line {
                    Ok(Some(line)) => line,
                    _ => break,
                };
                match line.trim() {
                    "/quit" => break,
                    "/submit" => handle.submit().await,
                    "/cancel" => handle.cancel().await,
                    "/listen" => handle.listen().await,
                    "/end" => handle.end_early().await,
                    "/retry" => handle.retry_analysis().await,
                    "" => {}
                    text => input.push(text),
                }
            }
        }
    }

    handle.shutdown().await;
    if final_analysis.is_none() {
        tracing::info!("Session ended without an analysis");
    }
    tracing::info!("Intervox shutdown complete");
    Ok(())
}
