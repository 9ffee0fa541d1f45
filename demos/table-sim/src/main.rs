//! Seats a table of bots in one lobby and plays a game to the end.
//!
//! Usage: `table-sim [players] [seed]`. Set `RUST_LOG=debug` to also see
//! rejected actions.

use std::sync::Arc;

use rand::Rng;
use traitor::prelude::*;

const DEFAULT_PLAYERS: usize = 5;

// ---------------------------------------------------------------------------
// Outbox helpers
// ---------------------------------------------------------------------------

/// Takes everything queued for one seat. The lobby delivers before it
/// replies, so nothing is ever in flight here.
fn drain(rx: &mut PlayerReceiver) -> Vec<Arc<LobbyMessage>> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

/// Logs what seat 0 sees and empties every other outbox.
fn watch(rxs: &mut [PlayerReceiver]) -> Vec<Arc<LobbyMessage>> {
    let seen = drain(&mut rxs[0]);
    for msg in &seen {
        match JsonCodec.encode(msg.as_ref()) {
            Ok(bytes) => tracing::info!(kind = msg.kind(), "{}", String::from_utf8_lossy(&bytes)),
            Err(err) => tracing::warn!(%err, "could not encode message"),
        }
    }
    for rx in &mut rxs[1..] {
        drain(rx);
    }
    seen
}

fn own_hand(rx: &mut PlayerReceiver) -> Option<Cards> {
    drain(rx).iter().rev().find_map(|msg| match msg.as_ref() {
        LobbyMessage::Hand(m) => m.hand.clone().ok(),
        _ => None,
    })
}

fn last_phase(seen: &[Arc<LobbyMessage>]) -> Option<Phase> {
    seen.iter().rev().find_map(|msg| match msg.as_ref() {
        LobbyMessage::State(m) => m.phase.clone().ok(),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), TraitorError> {
    traitor::telemetry::init();

    let mut args = std::env::args().skip(1);
    let players = match args.next().map(|a| a.parse::<usize>()) {
        None => DEFAULT_PLAYERS,
        Some(Ok(n)) => n,
        Some(Err(_)) => {
            eprintln!("usage: table-sim [players] [seed]");
            std::process::exit(2);
        }
    };
    let seed = args.next().and_then(|a| a.parse::<u64>().ok());

    let registry = LobbyRegistry::new(LobbyConfig {
        seed,
        ..LobbyConfig::default()
    });

    let host = registry.create_lobby("bot-0").await?;
    let lobby_id = host.lobby_id;
    for i in 1..players {
        registry.join(lobby_id, format!("bot-{i}")).await?;
    }

    let mut rxs = Vec::with_capacity(players);
    for i in 0..players {
        rxs.push(registry.connect(lobby_id, Seat(i as u8)).await?);
    }

    registry.start(lobby_id).await?;
    watch(&mut rxs);

    let mut rng = rand::rng();
    let mut current = Seat(0);
    let phase = 'game: loop {
        // Every bot claims exactly what it holds.
        let mut left = vec![0u8; players];
        for i in 0..players {
            let seat = Seat(i as u8);
            registry.get_hand(lobby_id, seat).await?;
            let Some(hand) = own_hand(&mut rxs[i]) else {
                tracing::warn!(%seat, "no hand received, stopping");
                break 'game None;
            };
            left[i] = hand.sum();
            registry.claim(lobby_id, seat, hand).await?;
        }
        watch(&mut rxs);

        for _ in 0..players {
            let targets: Vec<usize> =
                (0..players).filter(|&i| left[i] > 0).collect();
            if targets.is_empty() {
                break;
            }
            let to = targets[rng.random_range(0..targets.len())];
            left[to] -= 1;

            registry.play(lobby_id, current, Seat(to as u8)).await?;
            current = Seat(to as u8);
            registry.get_game_state(lobby_id).await?;

            if let Some(phase) = last_phase(&watch(&mut rxs)) {
                if phase.is_terminal() {
                    break 'game Some(phase);
                }
            }
        }
    };

    if let Some(phase) = phase {
        tracing::info!(%lobby_id, %phase, "game finished");
    }
    for i in 0..players {
        let seat = Seat(i as u8);
        registry.get_role(lobby_id, seat).await?;
        for msg in drain(&mut rxs[i]) {
            if let LobbyMessage::Role(m) = msg.as_ref() {
                if let Ok(role) = &m.role {
                    tracing::info!(%seat, ?role, "role revealed");
                }
            }
        }
    }

    registry.shutdown().await;
    Ok(())
}
