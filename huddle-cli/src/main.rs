use anyhow::Result;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use colored::*;
use huddle_client::webrtc::track::track_remote::TrackRemote;
use huddle_client::{
    RoomClient, RoomEvents, SampleMediaSource, SessionState, TransportConfig, WsChannel,
};
use huddle_core::{EndpointId, Participant, RoomId};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "huddle")]
#[command(about = "Join a peer-to-peer room call from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join a room (a fresh invite code is generated when ROOM is omitted).
    Join {
        /// Room invite code, e.g. abc-def-ghi.
        room: Option<String>,

        /// WebSocket URL of the signaling relay.
        #[arg(long, default_value = "ws://127.0.0.1:8080/ws")]
        relay: String,

        /// Display name announced to other participants.
        #[arg(long)]
        name: Option<String>,
    },
}

struct ConsoleEvents;

#[async_trait]
impl RoomEvents for ConsoleEvents {
    async fn on_participant_joined(&self, participant: &Participant) {
        println!(
            "{} {} ({})",
            "+".green().bold(),
            participant.display_name.bold(),
            participant.endpoint
        );
    }

    async fn on_participant_left(&self, endpoint: &EndpointId) {
        println!("{} {}", "-".red().bold(), endpoint);
    }

    async fn on_session_state(&self, endpoint: &EndpointId, state: SessionState) {
        let state = match state {
            SessionState::Connected => format!("{state:?}").green(),
            SessionState::Closed => format!("{state:?}").red(),
            _ => format!("{state:?}").yellow(),
        };
        println!("  {endpoint}: {state}");
    }

    async fn on_remote_track(&self, endpoint: &EndpointId, track: Arc<TrackRemote>) {
        println!(
            "  {} {} (ssrc {}) from {endpoint}",
            "media".cyan(),
            track.kind(),
            track.ssrc()
        );
    }

    async fn on_channel_disconnected(&self) {
        println!("{}", "Relay connection lost.".red().bold());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Join { room, relay, name } => {
            let room = match room {
                Some(code) => RoomId::from(code),
                None => {
                    let code = RoomId::generate();
                    println!("Room code: {}", code.to_string().bold());
                    code
                }
            };

            let name = match name {
                Some(name) => name,
                None => dialoguer::Input::<String>::new()
                    .with_prompt("Display name")
                    .interact_text()?,
            };

            let channel = Arc::new(WsChannel::new(relay));
            let media = Arc::new(SampleMediaSource::new("huddle-cli"));
            let client = RoomClient::spawn(
                channel,
                media,
                Arc::new(ConsoleEvents),
                TransportConfig::default(),
            );

            client.join(room.clone(), &name).await?;
            println!(
                "{} {} {}",
                "Joined".green().bold(),
                room.to_string().bold(),
                "(Ctrl-C to leave)".dimmed()
            );

            tokio::signal::ctrl_c().await?;
            client.leave().await?;
            println!("{}", "Left the room.".green());
        }
    }

    Ok(())
}
