mod cli;
mod repl;

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use nova_client::{
    ChatWidget, FileSessionStore, HttpConfig, HttpTransport, MemorySessionStore, SendPolicy,
    SessionStore, WidgetOptions,
};
use nova_common::{ConfigError, NovaError, WidgetEvent};
use nova_config::NovaConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::repl::Command;

const LOG_TARGETS: [&str; 4] = ["nova", "nova_client", "nova_config", "nova_common"];

fn init_logging(level: &str) {
    let mut filter = EnvFilter::from_default_env();
    for target in LOG_TARGETS {
        let directive = format!("{target}={level}")
            .parse::<Directive>()
            .unwrap_or_else(|_| LevelFilter::INFO.into());
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn transport_from(config: &NovaConfig) -> nova_common::Result<HttpTransport> {
    let service = &config.service;
    let http = HttpConfig::new(&service.base_url)
        .map_err(|e| NovaError::Network(e.to_string()))?
        .with_chat_path(&service.chat_path)
        .with_chat_stream_path(&service.chat_stream_path)
        .with_build_path(&service.build_path)
        .with_chat_timeout(Duration::from_secs(u64::from(service.chat_timeout_secs)))
        .with_build_timeout(Duration::from_secs(u64::from(service.build_timeout_secs)));
    HttpTransport::new(http).map_err(|e| NovaError::Network(e.to_string()))
}

fn store_from(config: &NovaConfig, ephemeral: bool) -> Arc<dyn SessionStore> {
    if ephemeral {
        tracing::info!("ephemeral session, nothing will be persisted");
        return Arc::new(MemorySessionStore::new());
    }
    let path = match &config.storage.session_file {
        Some(path) => path.clone(),
        None => match nova_config::default_session_file() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("no session file location ({e}), keeping session in memory");
                return Arc::new(MemorySessionStore::new());
            }
        },
    };
    tracing::info!(path = %path.display(), "session file");
    Arc::new(FileSessionStore::new(path).with_key(&config.storage.session_key))
}

fn print_events(widget: &ChatWidget) {
    let mut rx = widget.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(WidgetEvent::BuildStateChanged { state, preview_url }) => match preview_url {
                    Some(url) => println!("[build] {state}: {url}"),
                    None => println!("[build] {state}"),
                },
                Ok(WidgetEvent::SessionChanged { session_id }) => {
                    println!("[session] {session_id}")
                }
                Ok(_) => {}
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    tracing::debug!("event printer lagged by {n}");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

async fn chat(widget: &ChatWidget, text: &str, stream: bool) {
    let result = if stream {
        let on_chunk = Box::new(|chunk: String| {
            print!("{chunk}");
            let _ = std::io::stdout().flush();
        });
        widget
            .conversation()
            .send_message_streaming(text, on_chunk)
            .await
            .map(|reply| {
                println!();
                reply
            })
    } else {
        widget.send_message(text).await.map(|reply| {
            if let Some(reply) = &reply {
                println!("{}", reply.text());
            }
            reply
        })
    };

    if let Err(e) = result {
        // The user turn is already in history; sending the text again retries.
        println!("! {e}");
    }
}

fn start_build(widget: &Arc<ChatWidget>, prompt: String) {
    let widget = widget.clone();
    tokio::spawn(async move {
        match widget.start_build(&prompt).await {
            Ok(job) => {
                if let Some(error) = job.error {
                    println!("! build failed: {error}");
                }
            }
            Err(e) => println!("! {e}"),
        }
    });
}

async fn run(args: cli::Args, mut config: NovaConfig) -> nova_common::Result<()> {
    if let Some(base_url) = args.base_url {
        config.service.base_url = base_url;
    }
    let stream = args.stream || config.chat.streaming;

    let transport = Arc::new(transport_from(&config)?);
    let store = store_from(&config, args.ephemeral);
    let options = WidgetOptions {
        send_policy: if config.chat.serialize_sends {
            SendPolicy::Serialized
        } else {
            SendPolicy::Concurrent
        },
        default_prompt: config.build.default_prompt.clone(),
        ..WidgetOptions::default()
    };
    let widget = Arc::new(ChatWidget::new(transport, store, options));
    print_events(&widget);

    tracing::info!(base_url = %config.service.base_url, stream, "ready");
    println!("{}", repl::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match repl::parse(&line) {
            Command::Send(text) => chat(&widget, &text, stream).await,
            Command::Build(prompt) => start_build(&widget, prompt),
            Command::Status => {
                let job = widget.builder().job();
                match (job.preview_url, job.error) {
                    (Some(url), _) => println!("{}: {url}", job.state),
                    (None, Some(error)) => println!("{}: {error}", job.state),
                    (None, None) => println!("{}", job.state),
                }
            }
            Command::History => {
                for message in widget.conversation().history() {
                    println!("{}: {}", message.role(), message.text());
                }
            }
            Command::Session => match widget.session_id() {
                Some(id) => println!("{id}"),
                None => println!("(no session yet)"),
            },
            Command::Help => println!("{}", repl::HELP),
            Command::Quit => break,
            Command::Unknown(name) => println!("unknown command /{name}, try /help"),
            Command::Empty => {}
        }
    }

    tracing::info!("shutdown complete");
    Ok(())
}

/// An explicit `--config` that fails to load is fatal; otherwise fall back
/// to defaults.
fn resolve_config(
    loaded: Result<NovaConfig, ConfigError>,
    explicit: bool,
) -> nova_common::Result<NovaConfig> {
    match loaded {
        Ok(config) => Ok(config),
        Err(e) if explicit => Err(e.into()),
        Err(e) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            Ok(NovaConfig::default())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    let loaded = nova_config::load_config(args.config.as_deref());
    let config_level = loaded
        .as_ref()
        .map(|c| c.logging.level.as_directive())
        .unwrap_or("info");
    let level = args.log_level.clone().unwrap_or_else(|| config_level.to_string());
    init_logging(&level);

    tracing::info!("Nova v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = match resolve_config(loaded, args.config.is_some()) {
        Ok(config) => run(args, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
