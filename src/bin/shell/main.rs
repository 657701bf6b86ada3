//! Terminal front end for the demo page.
//!
//! Reads commands from stdin and drives the same tab/overlay navigator and
//! chat session the page uses. Plain lines are chat messages (chat tab
//! only); lines starting with `:` are commands, `#key` navigates.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use demo_shell::answer::AnswerComposer;
use demo_shell::chat::ChatSession;
use demo_shell::config::{Config, ConfigError};
use demo_shell::navigator::{CloseReason, Navigator, OpenTicket, Tab};
use demo_shell::presets::{PresetError, PresetTable};
use demo_shell::random::{RandomSource, ThreadRandom};
use demo_shell::telemetry;
use demo_shell::transcript::{MessageBlock, TYPING_TEXT};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[cfg(test)]
#[path = "shell_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
enum ShellError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("preset table invalid: {0}")]
    Presets(#[from] PresetError),
    #[error("stdin read failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "shell", about = "Drive the demo page from a terminal")]
struct Cli {
    /// Overrides `REPLY_DELAY_MS`.
    #[arg(long)]
    reply_delay_ms: Option<u64>,

    /// Overrides `OVERLAY_OPEN_DELAY_MS`.
    #[arg(long)]
    overlay_delay_ms: Option<u64>,

    /// Height of the page header the overlay sits under.
    #[arg(long, default_value_t = 64.0)]
    header_height: f64,
}

#[derive(Debug, PartialEq)]
enum Command {
    Say(String),
    Ask(usize),
    Presets,
    Tab(String),
    Navigate(String),
    Open(String),
    Close,
    Backdrop,
    Escape,
    Resize(f64),
    Status,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line.starts_with('#') {
        return Some(Command::Navigate(line.to_string()));
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Some(Command::Say(line.to_string()));
    };
    let (name, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let arg = arg.trim();
    let command = match name {
        "ask" => arg.parse().map_or_else(|_| Command::Unknown(line.to_string()), Command::Ask),
        "presets" => Command::Presets,
        "tab" => Command::Tab(arg.to_string()),
        "open" => Command::Open(arg.to_string()),
        "close" => Command::Close,
        "backdrop" => Command::Backdrop,
        "esc" => Command::Escape,
        "resize" => arg.parse().map_or_else(|_| Command::Unknown(line.to_string()), Command::Resize),
        "status" => Command::Status,
        "help" => Command::Help,
        "quit" | "q" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    };
    Some(command)
}

enum Event {
    Line(Option<String>),
    Reply,
    OverlayReady(OpenTicket),
}

struct Shell<R> {
    navigator: Navigator,
    chat: ChatSession<R>,
    overlay_tx: mpsc::UnboundedSender<OpenTicket>,
    overlay_delay: Duration,
    header_height: f64,
}

impl<R: RandomSource> Shell<R> {
    /// Apply one command. Returns `false` to quit.
    fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Say(text) => self.say(&text),
            Command::Ask(n) => {
                let question = n
                    .checked_sub(1)
                    .and_then(|i| self.chat.composer().presets().entries().get(i))
                    .map(|entry| entry.trigger_phrase.clone());
                match question {
                    Some(question) => self.say(&question),
                    None => println!("no preset #{n}; see :presets"),
                }
            }
            Command::Presets => {
                for (i, entry) in self.chat.composer().presets().entries().iter().enumerate() {
                    println!("  {}. {}", i + 1, entry.trigger_phrase);
                }
            }
            Command::Tab(key) => match Tab::from_key(&key) {
                Some(tab) => {
                    self.navigator.select_tab(tab);
                    self.print_status();
                }
                None => println!("unknown tab `{key}`; one of: loader1, chat, loader2"),
            },
            Command::Navigate(fragment) => {
                self.navigator.navigate(&fragment);
                self.print_status();
            }
            Command::Open(url) => self.open(&url),
            Command::Close => {
                if self.navigator.close(CloseReason::ExitButton) {
                    println!("overlay closed");
                }
            }
            Command::Backdrop => {
                if self.navigator.backdrop_click() {
                    println!("overlay closed");
                }
            }
            Command::Escape => {
                if self.navigator.escape() {
                    println!("overlay closed");
                }
            }
            Command::Resize(height) => {
                self.header_height = height;
                self.navigator.resize(height);
            }
            Command::Status => self.print_status(),
            Command::Help => print_help(),
            Command::Quit => return false,
            Command::Unknown(line) => println!("unknown command `{line}`; try :help"),
        }
        true
    }

    fn say(&mut self, text: &str) {
        if self.navigator.active_tab() != Tab::Chat {
            println!("chat is on the chat tab; use :tab chat");
            return;
        }
        if self.chat.submit(text).is_some() {
            println!("你: {}", text.trim());
            println!("助手: {TYPING_TEXT}");
        }
    }

    fn open(&mut self, url: &str) {
        let Some(ticket) = self.navigator.request_open(url, self.header_height) else {
            println!("usage: :open <url>");
            return;
        };
        println!("loading {}…", url.trim());
        let tx = self.overlay_tx.clone();
        let delay = self.overlay_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(ticket);
        });
    }

    fn overlay_ready(&mut self, ticket: OpenTicket) {
        if self.navigator.complete_open(ticket) {
            println!(
                "overlay open: {} (top {}px, fullscreen)",
                self.navigator.overlay_url(),
                self.navigator.overlay_top_px()
            );
        }
    }

    /// Input is exhausted: deliver the reply still in flight, if any.
    async fn finish(&mut self) {
        if self.chat.next_reply().await.is_some() {
            self.print_reply();
        }
    }

    fn print_reply(&self) {
        let answer = self
            .chat
            .transcript()
            .exchanges()
            .iter()
            .rev()
            .find_map(|unit| unit.assistant.as_ref());
        if let Some(block) = answer {
            print!("{}", render_block(block));
        }
    }

    fn print_status(&self) {
        let tabs: Vec<String> = Tab::ALL
            .iter()
            .map(|tab| {
                if self.navigator.is_selected(*tab) {
                    format!("[{}]", tab.key())
                } else {
                    tab.key().to_string()
                }
            })
            .collect();
        println!("tabs: {}", tabs.join(" "));
        if self.navigator.is_loading() {
            println!("overlay: loading");
        } else if self.navigator.is_overlay_open() {
            println!("overlay: {}", self.navigator.overlay_url());
        }
    }
}

fn render_block(block: &MessageBlock) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(out, "助手: {}", block.text);
    if let Some(chart) = &block.chart {
        let _ = writeln!(out, "  [{:?} chart: {}]", chart.kind, chart.label);
        for (day, value) in chart.categories.iter().zip(&chart.series) {
            let _ = writeln!(out, "  {day} {value:>4} {}", "▇".repeat(usize::try_from(*value / 10).unwrap_or(0)));
        }
    }
    if let Some(table) = &block.table {
        let _ = writeln!(out, "  | {} |", table.headers.join(" | "));
        for row in &table.rows {
            let _ = writeln!(out, "  | {} |", row.join(" | "));
        }
    }
    if let Some(image) = &block.image {
        let _ = writeln!(out, "  [image: {} ({})]", image.alt, image.src);
        if let Some(caption) = &image.caption {
            let _ = writeln!(out, "  {caption}");
        }
    }
    if let Some(items) = &block.list {
        for item in items {
            let _ = writeln!(out, "  • {item}");
        }
    }
    out
}

fn print_help() {
    println!(
        "\
<text>          send a chat message (chat tab)
:ask <n>        send preset question n
:presets        list preset questions
:tab <key>      switch tab (loader1, chat, loader2)
#<key>          navigate by fragment
:open <url>     open the overlay on url
:close | :backdrop | :esc
:resize <px>    header height
:status | :help | :quit"
    );
}

#[tokio::main]
async fn main() -> Result<(), ShellError> {
    let _ = dotenvy::dotenv();
    telemetry::init();
    let cli = Cli::parse();
    let config = Config::from_env()?;
    let reply_delay = cli.reply_delay_ms.map_or(config.reply_delay, Duration::from_millis);
    let overlay_delay = cli.overlay_delay_ms.map_or(config.overlay_open_delay, Duration::from_millis);

    let composer = AnswerComposer::new(Arc::new(PresetTable::builtin()?));
    let (overlay_tx, mut overlay_rx) = mpsc::unbounded_channel();
    let mut shell = Shell {
        navigator: Navigator::new(),
        chat: ChatSession::new(composer, ThreadRandom, reply_delay),
        overlay_tx,
        overlay_delay,
        header_height: cli.header_height,
    };

    shell.print_status();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let waiting = shell.chat.pending().is_some();
        let event = tokio::select! {
            line = lines.next_line() => Event::Line(line?),
            Some(_) = shell.chat.next_reply(), if waiting => Event::Reply,
            Some(ticket) = overlay_rx.recv() => Event::OverlayReady(ticket),
        };
        match event {
            Event::Line(None) => {
                shell.finish().await;
                break;
            }
            Event::Line(Some(line)) => {
                if let Some(command) = parse_command(&line) {
                    if !shell.apply(command) {
                        break;
                    }
                }
            }
            Event::Reply => shell.print_reply(),
            Event::OverlayReady(ticket) => shell.overlay_ready(ticket),
        }
    }
    Ok(())
}
