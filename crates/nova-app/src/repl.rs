//! Line commands for the interactive prompt.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: one chat turn.
    Send(String),
    /// `/build [prompt]`; an empty prompt means the configured default.
    Build(String),
    Status,
    History,
    Session,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Send(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "build" => Command::Build(arg.to_string()),
        "status" => Command::Status,
        "history" => Command::History,
        "session" => Command::Session,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

pub const HELP: &str = "\
commands:
  <text>           send a chat message
  /build [prompt]  start a site build in the background
  /status          show the build state and preview link
  /history         print the conversation so far
  /session         show the current session id
  /quit            exit";
