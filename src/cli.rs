// File: ./src/cli.rs
//! Command-line parsing, help text, and the plain-text front end used by
//! one-shot subcommands.
use crate::config::Config;
use crate::context::AppContext;
use crate::controller::{ListManager, MSG_REMOVE_FAILED, ManagerSettings};
use crate::gateway::PersistenceGateway;
use crate::status::StatusMessage;
use crate::store::FileStore;
use crate::timer::SystemClock;
use crate::view::{Intent, ListView, Row};
use anyhow::{Result, bail};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tui,
    Help,
    List,
    Export,
    Add(String),
    /// `None` when the argument was not a valid index.
    Remove(Option<usize>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub command: Command,
}

pub fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut root = None;
    let mut rest = Vec::new();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-r" | "--root" => match iter.next() {
                Some(path) => root = Some(PathBuf::from(path)),
                None => bail!("--root requires a path"),
            },
            "-h" | "--help" | "help" if rest.is_empty() => {
                return Ok(CliArgs {
                    root,
                    command: Command::Help,
                });
            }
            _ => rest.push(arg),
        }
    }

    let command = match rest.first().map(String::as_str) {
        None => Command::Tui,
        Some("list") => Command::List,
        Some("export") => Command::Export,
        Some("add") => Command::Add(rest[1..].join(" ")),
        Some("remove") => match rest.get(1) {
            Some(raw) => Command::Remove(raw.parse::<usize>().ok()),
            None => bail!("remove requires an index"),
        },
        Some(other) => bail!("Unknown command '{}'. Try --help.", other),
    };

    Ok(CliArgs { root, command })
}

pub fn print_help(binary_name: &str) {
    println!(
        "Stellar v{} - A small persistent task list",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>]", binary_name);
    println!("    {} list", binary_name);
    println!("    {} add <text...>", binary_name);
    println!("    {} remove <index>", binary_name);
    println!("    {} export", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("KEYBINDINGS (interactive mode):");
    println!("    Enter                 Add the typed task");
    println!("    Tab                   Switch between input and list");
    println!("    j/k, Up/Down          Select a task");
    println!("    d, Delete             Remove the selected task");
    println!("    Esc, Ctrl-C           Quit");
}

/// Writes rows as plain lines. Status is read back from the manager once the
/// command has run.
pub struct PlainView<W: Write> {
    out: W,
    show_rows: bool,
}

impl<W: Write> PlainView<W> {
    pub fn new(out: W, show_rows: bool) -> Self {
        Self { out, show_rows }
    }
}

impl<W: Write> ListView for PlainView<W> {
    fn render_list(&mut self, rows: &[Row]) {
        if !self.show_rows {
            return;
        }
        for row in rows {
            let _ = writeln!(self.out, "{:>3}  {}", row.index, row.text);
        }
    }

    fn render_status(&mut self, _status: Option<&StatusMessage>) {}

    fn clear_input(&mut self) {}

    fn focus_input(&mut self) {}
}

/// Runs a one-shot subcommand against the stored list.
/// Returns an error when the command was rejected.
pub fn run_command<W: Write>(
    ctx: &dyn AppContext,
    cfg: &Config,
    command: Command,
    out: W,
) -> Result<()> {
    let store = FileStore::new(ctx.get_store_path()?).with_quota(cfg.storage_quota_bytes);
    let gateway = PersistenceGateway::new(Box::new(store));
    let show_rows = command == Command::List;
    let mut manager = ListManager::initialize(
        gateway,
        PlainView::new(out, show_rows),
        Box::new(SystemClock),
        ManagerSettings::from(cfg),
    );

    match command {
        Command::List => {
            if !manager.is_empty() {
                return Ok(());
            }
        }
        Command::Export => {
            let raw = manager.stored_value()?.unwrap_or_else(|| "[]".to_string());
            writeln!(manager.view_mut().out, "{}", raw)?;
            return Ok(());
        }
        Command::Add(text) => manager.dispatch(Intent::Submit(text)),
        Command::Remove(Some(index)) => manager.dispatch(Intent::Remove(index)),
        Command::Remove(None) => {
            log::warn!("Attempted to remove task with an index that is not a position");
            bail!(MSG_REMOVE_FAILED);
        }
        Command::Tui | Command::Help => return Ok(()),
    }

    match manager.status() {
        Some(msg) if msg.is_error() => bail!("{}", msg.text),
        Some(msg) => {
            let text = msg.text.clone();
            writeln!(manager.view_mut().out, "{}", text)?;
            Ok(())
        }
        None => Ok(()),
    }
}
