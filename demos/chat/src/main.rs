use std::io::{self, BufRead, Write};

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cloudmodel_engine::{ClientReplica, EngineError, LocalOrigin, RejectionStrategy};
use cloudmodel_protocol::WsMessage;
use cloudmodel_transport::{MessageChannel, WsClientChannel};

use chat::app::{ChatApp, LocalInput};

#[derive(Parser, Debug)]
#[command(name = "cloudmodel-chat", about = "Demo CloudModel chat client")]
struct Args {
    /// WebSocket URL of the server, e.g. ws://127.0.0.1:3000/ws
    #[arg(long, default_value = "ws://127.0.0.1:3000/ws")]
    server: String,

    /// Display name attached to every message this client sends.
    #[arg(long, default_value = "anonymous")]
    name: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut channel = match WsClientChannel::connect(&args.server).await {
        Ok(channel) => channel,
        Err(e) => {
            error!("failed to connect to {}: {e}", args.server);
            std::process::exit(1);
        }
    };

    let mut replica = ClientReplica::new(ChatApp { author: args.name.clone() }, RejectionStrategy::ReapplyAllPending);

    let (input_tx, mut input_rx) = mpsc::channel::<String>(16);
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    println!("connected as {} to {}. type a message and press enter.", args.name, args.server);

    loop {
        tokio::select! {
            line = input_rx.recv() => {
                let Some(line) = line else {
                    info!("stdin closed, shutting down");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let proposals = replica.dispatch_local_origin(LocalOrigin::local(LocalInput::Send(line)));
                for proposal in proposals {
                    if let Err(e) = channel.send(&WsMessage::Propose(proposal)).await {
                        warn!("send failed: {e}");
                    }
                }
                render(&replica);
            }
            incoming = channel.recv() => {
                match incoming {
                    Ok(Some(msg)) => {
                        if let Err(e) = handle_message(&mut replica, &mut channel, msg).await {
                            error!("fatal protocol error: {e}");
                            break;
                        }
                        render(&replica);
                    }
                    Ok(None) => {
                        info!("server closed the connection");
                        break;
                    }
                    Err(e) => {
                        error!("transport error: {e}");
                        break;
                    }
                }
            }
        }
    }
}

async fn handle_message(
    replica: &mut ClientReplica<ChatApp>,
    channel: &mut impl MessageChannel,
    msg: WsMessage,
) -> Result<(), EngineError> {
    let proposals = match msg {
        WsMessage::Catchup(catchup) => replica.apply_catchup(catchup),
        WsMessage::Event(event) => replica.dispatch_remote_events(vec![event]),
        WsMessage::Accept(accept) => replica.dispatch_accept(accept)?,
        WsMessage::Reject(reject) => replica.dispatch_reject(reject),
        WsMessage::Error(err) => {
            warn!(code = %err.code, "server reported an error: {}", err.message);
            Vec::new()
        }
        WsMessage::Propose(_) => {
            warn!("server sent a propose message, ignoring");
            Vec::new()
        }
    };

    for proposal in proposals {
        if channel.send(&WsMessage::Propose(proposal)).await.is_err() {
            break;
        }
    }
    Ok(())
}

fn render(replica: &ClientReplica<ChatApp>) {
    print!("\x1b[2J\x1b[H");
    for msg in &replica.predicted_shared_state().0 {
        println!("{}: {}", msg.author, msg.text);
    }
    for notice in replica.local_state() {
        println!("* {notice}");
    }
    let _ = io::stdout().flush();
}
