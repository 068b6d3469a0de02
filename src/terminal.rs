//! Terminal frontend — a stdin/stdout rendition of the landing funnel and
//! the lobby. Presentation glue only; all behavior lives in the library.

use futures::stream;
use futures::{Stream, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::assistant::PitBoss;
use crate::config::LobbyConfig;
use crate::error::Result;
use crate::lobby::{LobbySession, format_coins};
use crate::player::PlayerIdentity;
use crate::sequencer::{Phase, Sequencer, SequencerConfig, SequencerEvent};
use crate::ticker::{AmbientEvent, AmbientFeed};

type LineStream = std::pin::Pin<Box<dyn Stream<Item = String> + Send>>;

/// Run the full flow: landing form → onboarding funnel → lobby chat.
pub async fn run(config: LobbyConfig, pit_boss: PitBoss) -> Result<()> {
    let mut input = spawn_stdin_lines();

    eprintln!("★ {} — {}", config.theme.title, config.theme.tagline);
    eprintln!();

    // Ambient decoration runs while the landing page is up and freezes
    // once the lobby takes over.
    let feed = AmbientFeed::spawn(config.theme.clone(), &config.timings);
    let ambient = tokio::spawn(render_ambient(feed.subscribe()));

    let Some(identity) = read_identity(&config, &mut input).await else {
        feed.dispose();
        ambient.abort();
        return Ok(());
    };

    let (done_tx, done_rx) = tokio::sync::oneshot::channel();
    let sequencer = Sequencer::new(SequencerConfig::from_lobby(&config), move |identity| {
        let _ = done_tx.send(identity);
    });
    let mut events = sequencer.subscribe();

    let submitted = identity.clone();
    sequencer.start(identity).await?;
    render_until(&mut events, Phase::PreEntry).await;

    let reward = sequencer.reward().await.unwrap_or_default();
    eprintln!();
    eprintln!("   Account       {}", submitted.display_name().to_uppercase());
    eprintln!("   Ready Balance ${}", format_coins(reward));
    eprintln!("   Cabinet       {}", submitted.chosen_game());
    eprintln!();
    eprint!("Press Enter to ENTER GAME ");
    let _ = input.next().await;

    sequencer.confirm_entry().await?;
    render_until(&mut events, Phase::SecurityFlagged).await;

    eprintln!("   Security verification required before reward release.");
    eprintln!("   Pending release: ${}", format_coins(reward));
    eprint!("Press Enter to VERIFY IDENTITY ");
    let _ = input.next().await;

    sequencer.confirm_verification().await?;
    render_until(&mut events, Phase::Verified).await;

    let player = done_rx.await.unwrap_or(submitted);
    feed.dispose();
    ambient.abort();

    lobby_loop(&config, &pit_boss, player, &mut input).await
}

/// Read stdin lines on a background task, exposed as a stream.
fn spawn_stdin_lines() -> LineStream {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

    tokio::spawn(async move {
        let stdin = tokio::io::stdin();
        let reader = BufReader::new(stdin);
        let mut lines = reader.lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break, // EOF
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    break;
                }
            }
        }
    });

    Box::pin(stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|line| (line, rx))
    }))
}

/// The landing form: pick a cabinet, pick a name, validate, repeat on error.
async fn read_identity(config: &LobbyConfig, input: &mut LineStream) -> Option<PlayerIdentity> {
    let games = &config.theme.games;
    loop {
        eprintln!("Game cabinets:");
        for (i, game) in games.iter().enumerate() {
            eprintln!("  {}. {} ({})", i + 1, game.name, game.kind.label());
        }
        eprint!("Pick a cabinet [1-{}]: ", games.len());
        let line = input.next().await?;
        let game = match line.trim().parse::<usize>() {
            Ok(n) if (1..=games.len()).contains(&n) => games[n - 1].name.clone(),
            _ => {
                eprintln!("❌ Not a cabinet number. Try again.\n");
                continue;
            }
        };

        eprint!("Create username: ");
        let line = input.next().await?;
        match PlayerIdentity::new(&line, &game, &config.theme) {
            Ok(identity) => return Some(identity),
            Err(e) => {
                eprintln!("❌ {e}\n");
            }
        }
    }
}

/// Render sequencer events until the funnel reaches `target`.
async fn render_until(events: &mut broadcast::Receiver<SequencerEvent>, target: Phase) {
    loop {
        match events.recv().await {
            Ok(event) => {
                let reached = matches!(
                    &event,
                    SequencerEvent::PhaseChanged { to, .. } if *to == target
                );
                render_event(&event);
                if reached {
                    return;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "terminal fell behind sequencer events");
            }
            Err(RecvError::Closed) => return,
        }
    }
}

fn render_event(event: &SequencerEvent) {
    match event {
        SequencerEvent::StepStarted { label, .. } => eprintln!("⏳ {label}"),
        SequencerEvent::CounterTick { displayed } => {
            eprint!("\r💰 ${}   ", format_coins(*displayed));
        }
        SequencerEvent::PhaseChanged { to, .. } => match to {
            Phase::PreEntry => eprintln!("\n✅ ALL SYSTEMS GO — funds allocated."),
            Phase::Scanning => eprintln!("🔎 Validating Connection..."),
            Phase::SecurityFlagged => eprintln!("\n⚠️  STANDARD CHECK"),
            Phase::Verifying => eprintln!("⏳ Finalizing..."),
            Phase::Verified => eprintln!("✅ Verification complete."),
            _ => {}
        },
        _ => {}
    }
}

/// Render ambient decoration lines until the feed is disposed.
async fn render_ambient(mut rx: broadcast::Receiver<AmbientEvent>) {
    loop {
        match rx.recv().await {
            Ok(AmbientEvent::Winner(item)) => {
                eprintln!("📣 {} just won {}", item.user, item.prize);
            }
            Ok(AmbientEvent::SlotsLeft(n)) => eprintln!("⏱️  Slots left: {n}"),
            Ok(AmbientEvent::OnlineCount(n)) => {
                tracing::debug!(online = n, "online count drifted");
            }
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        }
    }
}

/// The lobby chat REPL.
async fn lobby_loop(
    config: &LobbyConfig,
    pit_boss: &PitBoss,
    player: PlayerIdentity,
    input: &mut LineStream,
) -> Result<()> {
    let mut session = LobbySession::new(player, config);

    eprintln!();
    eprintln!(
        "🎰 ONGAMES PLATFORM — PLAYER: {}  BALANCE: {}  JACKPOT: ${}",
        session.player().display_name().to_uppercase(),
        format_coins(session.balance()),
        format_coins(session.jackpot())
    );
    eprintln!("   SESSION: {}", session.id());
    if let Some(greeting) = session.transcript().first() {
        println!("\n🎩 {}\n", greeting.content);
    }
    eprintln!("Chat with the Pit Boss. /balance shows coins, /quit exits.");

    loop {
        eprint!("> ");
        let Some(line) = input.next().await else {
            break;
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        match line.as_str() {
            "/quit" => break,
            "/balance" => eprintln!(
                "💰 {} coins (jackpot ${})",
                format_coins(session.balance()),
                format_coins(session.jackpot())
            ),
            _ => {
                let reply = session.chat(pit_boss, &line).await;
                println!("\n🎩 {}\n", reply);
            }
        }
    }

    tracing::info!(session = %session.id(), "lobby session closed");
    Ok(())
}
