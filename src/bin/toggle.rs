//! Interactive recording toggle: press Enter to flip, q to quit.

use anyhow::Result;
use clap::Parser;
use room_recorder::{RecordingToggle, ToggleEvent, ToggleState, DEFAULT_ROOM};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "toggle", about = "Recording toggle for a room")]
struct Args {
    /// room-recorder server URL
    #[arg(long, default_value = "http://127.0.0.1:3111")]
    server: String,

    /// Room to control
    #[arg(long, default_value = DEFAULT_ROOM)]
    room: String,
}

fn describe(state: &ToggleState) -> &'static str {
    match state {
        ToggleState::Idle => "not recording",
        ToggleState::Busy => "working...",
        ToggleState::Recording { .. } => "RECORDING",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut toggle = RecordingToggle::new(args.server, args.room);

    if let Err(e) = toggle.sync().await {
        eprintln!("could not reach server: {}", e);
        std::process::exit(1);
    }

    println!("room: {}", toggle.room());
    println!("[{}] Enter toggles, q quits", describe(toggle.state()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "q" {
            break;
        }

        match toggle.press().await {
            Ok(ToggleEvent::Ignored) => println!("(busy, ignored)"),
            Ok(ToggleEvent::Started { egress_id }) => {
                println!("recording started (egress {})", egress_id);
            }
            Ok(ToggleEvent::Stopped { status, message }) => {
                match message {
                    Some(msg) => println!("{} ({:?})", msg, status),
                    None => println!("recording stopped ({:?})", status),
                }
            }
            // The UI equivalent is a blocking alert; here it is a line on
            // stderr and the toggle stays usable.
            Err(e) => eprintln!("error: {}", e),
        }

        println!("[{}]", describe(toggle.state()));
    }

    Ok(())
}
