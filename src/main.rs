//! factlens interactive shell.
//! Reads lines from stdin, drives a `Session`, and prints verdicts, previews and
//! notices. Runs on a single-threaded runtime.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use factlens::api::build_classifier;
use factlens::notify::{ConsoleNotifier, NotifierMux, TracingNotifier};
use factlens::{render, ClientConfig, InputKind, Session, Theme};

const HELP: &str = "\
Type text and press enter to analyze it.
  :kind headline|article|url   choose what the input is
  :advanced on|off             request advanced analysis
  :set <text>                  change the input without submitting
  :go                          submit the current input
  :history                     list past analyses (newest first)
  :replay <n>                  show entry n again and restore its text
  :theme [light|dark|system]   show or change the theme
  :quit
";

/// Logs go to stderr so they never interleave with the shell output.
/// Set FACTLENS_LOG=0 to silence them.
fn init_tracing() {
    if std::env::var("FACTLENS_LOG").is_ok_and(|v| v == "0") {
        return;
    }
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("factlens=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op otherwise.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = ClientConfig::load_default().context("loading client config")?;
    let api = build_classifier(&config)?;
    let notifier = NotifierMux::new()
        .with(Arc::new(ConsoleNotifier))
        .with(Arc::new(TracingNotifier));
    let mut session = Session::new(&config, api, notifier);
    tracing::info!(
        base_url = %config.base_url,
        history_cap = config.history_cap,
        theme = session.theme().as_str(),
        "session started"
    );

    // Print preview transitions as they happen.
    let mut previews = session.preview_fetcher().subscribe();
    tokio::spawn(async move {
        while previews.changed().await.is_ok() {
            let text = render::preview_state(&previews.borrow_and_update());
            if !text.is_empty() {
                print!("{text}");
            }
        }
    });

    print!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim_end();
        let (cmd, arg) = match line.strip_prefix(':') {
            Some(rest) => {
                let (c, a) = rest.split_once(' ').unwrap_or((rest, ""));
                (Some(c), a.trim())
            }
            None => (None, line),
        };

        match cmd {
            None => {
                session.set_input(arg);
                submit(&session).await;
            }
            Some("go") => submit(&session).await,
            Some("set") => session.set_input(arg),
            Some("kind") => match InputKind::parse(arg) {
                Some(k) => {
                    session.set_kind(k);
                    println!("input kind: {}", k.as_str());
                }
                None => println!("unknown kind '{arg}'"),
            },
            Some("advanced") => {
                session.set_advanced(matches!(arg, "on" | "1" | "true" | "yes"));
                println!("advanced analysis: {}", session.advanced());
            }
            Some("history") => print!("{}", render::history_list(&session.history().all())),
            Some("replay") => match arg.parse::<usize>().ok().and_then(|i| session.replay(i)) {
                Some(entry) => {
                    println!("> {}", entry.content);
                    print!("{}", render::analysis_card(&entry));
                }
                None => println!("no history entry '{arg}'"),
            },
            Some("theme") if arg.is_empty() => println!("theme: {}", session.theme().as_str()),
            Some("theme") => match Theme::parse(arg) {
                Some(t) => {
                    if let Err(e) = session.set_theme(t) {
                        tracing::warn!("saving theme failed: {e:#}");
                    }
                    println!("theme: {}", t.as_str());
                }
                None => println!("unknown theme '{arg}'"),
            },
            Some("help") => print!("{HELP}"),
            Some("quit") | Some("q") => break,
            Some(other) => println!("unknown command ':{other}' (try :help)"),
        }
    }
    Ok(())
}

async fn submit(session: &Session) {
    if session.submit().await.is_ok() {
        print!("{}", render::analysis_state(&session.analysis()));
    }
}
