//! detection-sync CLI
//!
//! Usage:
//!   detection-sync                                   # face + objects against localhost:5000
//!   detection-sync --base-url http://cam.local:5000  # another backend
//!   detection-sync --no-objects --admin              # face only, admin registrations
//!   detection-sync --speech-command espeak-ng        # real TTS instead of console
//!   detection-sync --json                            # JSON lines output
//!   detection-sync --stub --addr 127.0.0.1:5000      # serve the stub backend

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use detection_sync::core::{
    run, run_stub_server, CommandSpeech, ConsoleSpeech, HttpBackend, RunConfig, Session,
    SpeechChannel, TerminalOptions, TerminalView,
};
use detection_sync::{logging, DEFAULT_BASE_URL, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "detection-sync",
    version = VERSION,
    about = "Live face and object detection status with voice announcements",
    long_about = "detection-sync polls a detection backend for face and object status,\n\
                  keeps a local view in sync and announces what it sees.\n\n\
                  Face status is polled every 500 ms; an unknown face opens a\n\
                  registration prompt once per episode. Object counts are refreshed\n\
                  at most every 2 s and announced at most every 3 s.\n\n\
                  Type 'help' while running for commands."
)]
struct Args {
    /// Detection backend base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Send registrations in admin mode
    #[arg(long)]
    admin: bool,

    /// Do not poll face status
    #[arg(long)]
    no_face: bool,

    /// Do not poll object status
    #[arg(long)]
    no_objects: bool,

    /// External TTS program taking `-s <wpm> <text>` (e.g. espeak-ng)
    #[arg(long)]
    speech_command: Option<String>,

    /// Output applied intents as JSON lines
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Do not open registration redirects in the browser
    #[arg(long)]
    no_open: bool,

    /// Do not read commands from stdin
    #[arg(long)]
    no_input: bool,

    /// Run the stub detection backend instead of the client
    #[arg(long)]
    stub: bool,

    /// Stub backend address
    #[arg(long, default_value = "127.0.0.1:5000")]
    addr: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    if let Err(e) = logging::init(!args.no_color) {
        eprintln!("Logging disabled: {}", e);
    }

    let result = if args.stub {
        run_stub_server(&args.addr).await
    } else {
        run_client(&args).await
    };

    if let Err(e) = result {
        error!(error = %e, "fatal");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // a pending stdin read would otherwise hold the runtime open
    std::process::exit(0);
}

fn speech_channel(args: &Args) -> Box<dyn SpeechChannel> {
    match &args.speech_command {
        Some(program) => Box::new(CommandSpeech::new(program.clone())),
        None if args.json => Box::new(ConsoleSpeech::json()),
        None => Box::new(ConsoleSpeech::new(args.no_color)),
    }
}

/// Run the polling client
async fn run_client(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let backend = HttpBackend::new(&args.base_url)?;
    let view = TerminalView::new(
        TerminalOptions {
            json: args.json,
            no_color: args.no_color,
            open_links: !args.no_open,
        },
        backend.base_url().clone(),
    );

    let mut session = Session::new(view, speech_channel(args), speech_channel(args), args.admin);
    if args.no_objects {
        session = session.without_objects();
    }

    info!(base_url = %backend.base_url(), version = VERSION, "detection-sync starting");
    if !args.no_input && !args.json {
        println!("Type 'help' for commands.");
    }

    run(
        Arc::new(backend),
        session,
        RunConfig {
            face_enabled: !args.no_face,
            interactive: !args.no_input,
        },
    )
    .await;
    Ok(())
}
