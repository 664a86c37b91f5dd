use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use voice_chatbot::agent::Chatbot;
use voice_chatbot::api::ApiServerBuilder;
use voice_chatbot::config::ServerConfig;
use voice_chatbot::llm::GeminiClient;
use voice_chatbot::voice::{self, AudioOutput, ElevenLabsClient, SpeechOutcome};
use voice_chatbot::Config;

/// Voice chatbot - type a message, hear the reply
#[derive(Parser)]
#[command(name = "voice-chatbot", version, about)]
struct Cli {
    /// Port to listen on (overrides `PORT`)
    #[arg(long)]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single turn from the terminal
    Chat {
        /// Message to send
        message: String,
    },
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,voice_chatbot=info",
        1 => "info,voice_chatbot=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Missing credentials stop the process here
    let config = Config::load()?;
    tracing::debug!(?config, "loaded configuration");

    let (chatbot, server) = build_chatbot(config)?;

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Chat { message } => chat_once(&chatbot, &message).await,
            Command::TestTts { text } => test_tts(&chatbot, &text).await,
        };
    }

    if let AudioOutput::Shared(path) = chatbot.audio_output() {
        tracing::warn!(
            path = %path.display(),
            "all sessions share one audio file; concurrent turns may overwrite each other"
        );
    }

    let port = cli.port.unwrap_or(server.port);
    tracing::info!(host = %server.host, port, "starting voice chatbot");

    ApiServerBuilder::new(chatbot)
        .host(server.host)
        .port(port)
        .build()
        .run()
        .await?;

    Ok(())
}

/// Construct the provider clients and the chatbot that drives them
fn build_chatbot(config: Config) -> anyhow::Result<(Chatbot, ServerConfig)> {
    let Config {
        api_keys,
        server,
        llm,
        voice,
    } = config;

    let generator = GeminiClient::new(api_keys.google, llm.model, llm.max_output_tokens)?;
    let synthesizer = ElevenLabsClient::new(api_keys.elevenlabs, voice.voice_id, voice.model_id)?;

    let chatbot = Chatbot::new(Arc::new(generator), Arc::new(synthesizer), voice.audio_output);
    Ok((chatbot, server))
}

/// Run one turn with an empty history and print the result
async fn chat_once(chatbot: &Chatbot, message: &str) -> anyhow::Result<()> {
    let turn = chatbot.respond(message, None).await?;

    println!("AI: {}", turn.reply);
    match turn.audio {
        Some(path) => println!("Audio: {}", path.display()),
        None => println!("Audio: unavailable (see log)"),
    }

    Ok(())
}

/// Test TTS output
async fn test_tts(chatbot: &Chatbot, text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    match voice::speak_to_file(chatbot.synthesizer(), text, chatbot.audio_output()).await {
        SpeechOutcome::Saved(path) => {
            let size = std::fs::metadata(&path)?.len();
            println!("Wrote {size} bytes to {}", path.display());
            println!("\n---");
            println!("If the file plays, TTS is working!");
            Ok(())
        }
        SpeechOutcome::Failed(e) => Err(anyhow::anyhow!("TTS synthesis failed: {e}")),
    }
}
