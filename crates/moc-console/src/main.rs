//! MOC maintenance assistant: interactive terminal session.
//!
//! Reads one message per line from stdin and prints the reply. Logs go to
//! stderr in the compact format so they do not mix with the chat.

use std::fmt::Write as _;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use moc_dialogue::{BotConfig, ChatService};
use moc_protocol::StatsSnapshot;

/// Session id used for the single local user.
const LOCAL_USER: &str = "local_user";

const EXIT_WORDS: &[&str] = &["exit", "quit", "salir"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .compact()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "moc-console starting");

    // ── Load config ─────────────────────────────────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => BotConfig::from_file(&path)?,
        None => BotConfig::default(),
    };
    let chat = ChatService::from_config(&config);

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(
            b"MOC maintenance assistant started.\n\
              Type 'exit' to quit, 'help' for available commands, 'stats' for counters.\n",
        )
        .await?;

    // ── Chat loop ───────────────────────────────────────────────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"\nYou: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if is_exit(&line) {
            stdout
                .write_all(b"\nBot: Thank you for using the MOC maintenance assistant. Goodbye!\n")
                .await?;
            break;
        }

        let reply = chat.process_turn(&line, LOCAL_USER).await;
        stdout.write_all(format!("\nBot: {reply}\n").as_bytes()).await?;

        if line.trim().eq_ignore_ascii_case("stats") {
            let stats = chat.stats().await;
            stdout.write_all(render_stats(&stats).as_bytes()).await?;
        }
    }

    stdout.flush().await?;
    Ok(())
}

fn is_exit(line: &str) -> bool {
    let line = line.trim().to_lowercase();
    EXIT_WORDS.contains(&line.as_str())
}

fn render_stats(stats: &StatsSnapshot) -> String {
    let mut out = String::from("\n--- STATS ---\n");
    let _ = writeln!(out, "Conversations: {}", stats.total_conversations);
    let _ = writeln!(out, "Total messages: {}", stats.total_turns);
    let _ = writeln!(
        out,
        "Average response time: {:.3} ms",
        stats.average_latency_ms
    );
    let _ = writeln!(out, "Urgent inquiries: {}", stats.urgent);
    let _ = writeln!(out, "Agent hand-offs: {}", stats.handoffs);
    let _ = writeln!(out, "Automated answers: {}", stats.automated_answers);
    let _ = writeln!(
        out,
        "Surveys: {} ({} satisfied)",
        stats.total_surveys, stats.satisfied_surveys
    );
    out.push_str("--- SYSTEMS ---\n");
    for (system, count) in &stats.by_system {
        let _ = writeln!(out, "  {system}: {count}");
    }
    out.push_str("--- PROBLEMS ---\n");
    for (problem, count) in &stats.by_problem {
        let _ = writeln!(out, "  {problem}: {count}");
    }
    out.push_str("-------------\n");
    out
}
