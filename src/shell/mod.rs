//! Interactive shell
//!
//! A line-oriented read/dispatch loop over an abstract [`LineSource`]. Each
//! command runs to completion before the next line is read. The session owns
//! the access graph and the tracer; `sync` swaps in a new graph wholesale.

mod commands;
mod console;
mod format;
mod suggest;

pub use commands::{COMMANDS, Command, CommandSpec, find_matching_commands};
pub use console::Console;
pub use format::{
    format_caller, format_pod, format_policy, format_role, format_secret, format_service_account,
};
pub use suggest::{SelectionInput, suggest};

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::error::ExportError;
use crate::export::{ExportReport, Exporter};
use crate::graph::{AccessGraph, Record, synchronize};
use crate::models::{EntryKind, split_key};
use crate::sources::{ClusterSource, IdentitySource};
use crate::trace::{HistoryEntry, Tracer};

const TOP_PROMPT: &str = "? ";
const SELECT_PROMPT: &str = "  ↪ ";
const GATHERING: &str =
    "Gathering info from IAM and Kubernetes. This may take a bit, please stand by ...\n";

/// Source of operator input, one line per call; `None` is end of input
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Reads lines from stdin, printing the prompt to stdout first
pub struct StdinLines {
    stdin: std::io::Stdin,
}

impl StdinLines {
    pub fn new() -> Self {
        Self {
            stdin: std::io::stdin(),
        }
    }
}

impl Default for StdinLines {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for StdinLines {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        if self.stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Whether the loop keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<W: Write> {
    graph: AccessGraph,
    tracer: Tracer,
    exporter: Exporter,
    identity: Box<dyn IdentitySource>,
    cluster: Box<dyn ClusterSource>,
    console: Console<W>,
    max_suggestions: usize,
}

impl<W: Write> Session<W> {
    pub fn new(
        graph: AccessGraph,
        identity: Box<dyn IdentitySource>,
        cluster: Box<dyn ClusterSource>,
        exporter: Exporter,
        console: Console<W>,
        max_suggestions: usize,
    ) -> Self {
        Self {
            graph,
            tracer: Tracer::new(),
            exporter,
            identity,
            cluster,
            console,
            max_suggestions,
        }
    }

    pub fn graph(&self) -> &AccessGraph {
        &self.graph
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    pub fn console(&self) -> &Console<W> {
        &self.console
    }

    /// Run until `quit` or end of input, starting with the help text
    pub async fn run(&mut self, lines: &mut dyn LineSource) -> Result<()> {
        self.help()?;
        loop {
            let Some(line) = lines.read_line(TOP_PROMPT)? else {
                self.console.result("bye!\n")?;
                return Ok(());
            };
            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if input == "?" {
                self.list_commands()?;
                continue;
            }

            let Some(command) = Command::parse(input) else {
                self.unknown(input)?;
                continue;
            };
            if self.execute(command, lines).await? == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Dispatch a single command
    pub async fn execute(&mut self, command: Command, lines: &mut dyn LineSource) -> Result<Flow> {
        tracing::debug!("Executing {:?}", command);
        match command {
            Command::IamUser => {
                self.console.result(&format_caller(&self.graph))?;
            }
            Command::IamRoles
            | Command::IamPolicies
            | Command::K8sServiceAccounts
            | Command::K8sSecrets
            | Command::K8sPods => {
                if let Some(kind) = command.entry_kind() {
                    self.select(kind, lines)?;
                }
            }
            Command::History => self.history()?,
            Command::Sync => self.resync().await?,
            Command::Trace => {
                self.tracer.start_trace();
                self.console.result(
                    "Starting to trace now. Use an 'export-xxx' command to stop tracing and export to one of the supported formats.\n",
                )?;
            }
            Command::ExportRaw => {
                let window = self.tracer.stop_trace_and_extract();
                let outcome = self.exporter.export_raw(&window, &self.graph);
                self.report_export("Raw trace", outcome)?;
            }
            Command::ExportGraph => {
                let window = self.tracer.stop_trace_and_extract();
                let outcome = self.exporter.export_graph(&window, &self.graph);
                self.report_export("Graph trace", outcome)?;
            }
            Command::Help => self.help()?,
            Command::Quit => {
                self.console.result("bye!\n")?;
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Selection sub-prompt for one collection
    fn select(&mut self, kind: EntryKind, lines: &mut dyn LineSource) -> Result<()> {
        let keys: Vec<String> = self
            .graph
            .keys(kind)
            .into_iter()
            .map(str::to_string)
            .collect();
        if keys.is_empty() {
            self.console
                .warning(&format!("No {} entries in the access graph\n", kind))?;
            return Ok(());
        }
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();

        loop {
            let Some(line) = lines.read_line(SELECT_PROMPT)? else {
                return Ok(());
            };
            match SelectionInput::parse(&line) {
                SelectionInput::Suggest(filter) => {
                    let matches = suggest(&keys, filter, self.max_suggestions);
                    if matches.is_empty() {
                        self.console
                            .warning(&format!("Nothing matches '{}'\n", filter))?;
                    }
                    for key in matches {
                        self.console.result(&format!("  {}\n", key))?;
                    }
                }
                SelectionInput::Select(key) => {
                    self.show(kind, key)?;
                    return Ok(());
                }
            }
        }
    }

    /// Print a record and record the lookup, or warn when it doesn't resolve
    fn show(&mut self, kind: EntryKind, key: &str) -> Result<()> {
        let entry = HistoryEntry::new(kind, key);
        let text = match self.graph.resolve(&entry) {
            Ok(Record::Role(role)) => format_role(role),
            Ok(Record::Policy(policy)) => format_policy(policy),
            Ok(Record::ServiceAccount(sa)) => format_service_account(sa),
            Ok(Record::Secret(secret)) => format_secret(secret),
            Ok(Record::Pod(pod)) => format_pod(pod),
            Err(_) => {
                let hint = if kind.is_namespaced() && split_key(key).is_none() {
                    " (keys have the form namespace:name)"
                } else {
                    ""
                };
                self.console
                    .warning(&format!("No {} with key {}{}\n", kind, key, hint))?;
                return Ok(());
            }
        };
        self.console.result(&text)?;
        self.tracer.record_selection(kind, key);
        Ok(())
    }

    fn history(&mut self) -> Result<()> {
        if self.tracer.history().is_empty() {
            self.console.result("No history yet\n")?;
            return Ok(());
        }
        let text: String = self
            .tracer
            .history()
            .iter()
            .map(|entry| format!("{}\n", entry))
            .collect();
        self.console.result(&text)?;
        if self.tracer.is_tracing() {
            self.console.result(&format!(
                "Tracing, {} entries in the current window\n",
                self.tracer.window_count()
            ))?;
        }
        Ok(())
    }

    async fn resync(&mut self) -> Result<()> {
        self.console.result(GATHERING)?;
        match synchronize(self.identity.as_ref(), self.cluster.as_ref()).await {
            Ok(outcome) => {
                for warning in &outcome.warnings {
                    self.console.warning(&format!("{}\n", warning))?;
                }
                self.graph = outcome.graph;
                self.console
                    .result(&format!("Synchronized: {}\n", self.graph.summary()))?;
            }
            Err(err) => {
                tracing::warn!("Resync failed: {}", err);
                self.console.warning(&format!(
                    "{}. Keeping the previous access graph.\n",
                    err
                ))?;
            }
        }
        Ok(())
    }

    fn report_export(
        &mut self,
        what: &str,
        outcome: std::result::Result<ExportReport, ExportError>,
    ) -> Result<()> {
        match outcome {
            Ok(report) => {
                for skipped in &report.skipped {
                    self.console.warning(&format!("Skipped: {}\n", skipped))?;
                }
                self.console.result(&format!(
                    "{} exported to {}\n",
                    what,
                    report.path.display()
                ))?;
            }
            Err(err) => {
                self.console
                    .warning(&format!("Can't export trace: {}\n", err))?;
            }
        }
        Ok(())
    }

    fn help(&mut self) -> Result<()> {
        let mut text = format!("\nThis is rbiam in version {}\n\n", env!("CARGO_PKG_VERSION"));
        text.push_str(&"-".repeat(80));
        text.push_str("\nSelect one of the supported commands:\n");
        for spec in COMMANDS {
            text.push_str(&format!("- {} … to {}\n", spec.name, spec.description));
        }
        text.push_str(&"-".repeat(80));
        text.push_str(
            "\n\nAt a selection prompt type part of a key followed by '?' to list matches,\n",
        );
        text.push_str(
            "or just '?' to list them all. Type 'help' if you're stuck or 'quit' to leave.\n\n",
        );
        self.console.result(&text)?;
        Ok(())
    }

    fn list_commands(&mut self) -> Result<()> {
        let text: String = COMMANDS
            .iter()
            .map(|spec| format!("  {:<14}{}\n", spec.name, spec.description))
            .collect();
        self.console.result(&text)?;
        Ok(())
    }

    fn unknown(&mut self, input: &str) -> Result<()> {
        let candidates = find_matching_commands(input);
        if candidates.is_empty() {
            self.console
                .warning(&format!("Unknown command: {}\n", input))?;
        } else {
            self.console.warning(&format!(
                "Unknown command: {} (did you mean {}?)\n",
                input,
                candidates.join(", ")
            ))?;
        }
        Ok(())
    }
}
