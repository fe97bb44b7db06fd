//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::csv_adapter::{CsvScriptAdapter, ScriptStep};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::static_price_adapter::StaticPriceOracle;
use crate::domain::command::{self, Command, HELP};
use crate::domain::config_validation::{self, validate_account_config};
use crate::domain::error::TradeLedgerError;
use crate::domain::ledger::Ledger;
use crate::domain::registry::AccountRegistry;
use crate::domain::report::AccountReport;
use crate::domain::transaction::format_amount;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PriceOracle;

#[derive(Parser, Debug)]
#[command(name = "tradeledger", about = "Trading account ledger")]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Apply a CSV script of operations to a fresh account and print the result
    Replay {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        script: PathBuf,
        /// Stop at the first rejected operation
        #[arg(long)]
        strict: bool,
    },
    /// Interactive session reading commands from stdin
    Shell {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print current prices for symbols
    Quote {
        #[arg(short, long)]
        config: Option<PathBuf>,
        symbols: Vec<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        CliCommand::Replay {
            config,
            script,
            strict,
        } => run_replay(config.as_ref(), &script, strict),
        CliCommand::Shell { config } => run_shell(config.as_ref()),
        CliCommand::Quote { config, symbols } => run_quote(config.as_ref(), &symbols),
        CliCommand::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TradeLedgerError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_optional_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        Some(p) => {
            eprintln!("Loading config from {}", p.display());
            let adapter = load_config(p)?;
            if let Err(e) = validate_account_config(&adapter) {
                eprintln!("error: {e}");
                return Err((&e).into());
            }
            Ok(adapter)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// Build the registry and open the configured account in it.
///
/// Returns the registry together with the id of the opened account.
pub fn build_registry(
    config: &dyn ConfigPort,
) -> Result<(AccountRegistry, String), TradeLedgerError> {
    let oracle: Arc<dyn PriceOracle> = Arc::new(StaticPriceOracle::from_config(config)?);
    let registry = AccountRegistry::new(oracle);
    let account_id = config_validation::account_id(config);
    registry.open(&account_id, config_validation::initial_deposit(config))?;
    Ok((registry, account_id))
}

/// Outcome counts of a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub rejected: usize,
}

/// Apply script steps in order, writing one response line per step to `out`.
///
/// A rejected step is reported and skipped; with `strict` it aborts the replay.
pub fn replay_steps(
    ledger: &mut Ledger,
    steps: &[ScriptStep],
    strict: bool,
    out: &mut dyn Write,
) -> Result<ReplaySummary, TradeLedgerError> {
    let mut summary = ReplaySummary::default();
    for step in steps {
        match step.command.apply(ledger) {
            Ok(response) => {
                summary.applied += 1;
                writeln!(out, "{response}")?;
            }
            Err(e) => {
                summary.rejected += 1;
                warn!(line = step.line, command = %step.command, "rejected: {}", e);
                if strict {
                    return Err(e.into());
                }
                writeln!(out, "line {}: {}: {}", step.line, step.command, e)?;
            }
        }
    }
    Ok(summary)
}

fn run_replay(config_path: Option<&PathBuf>, script_path: &PathBuf, strict: bool) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let strict = strict || config.get_bool("replay", "strict", false);

    eprintln!("Loading script from {}", script_path.display());
    let steps = match CsvScriptAdapter::new(script_path).load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let (registry, account_id) = match build_registry(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Replaying {} operations on account {}", steps.len(), account_id);
    let stdout = io::stdout();
    let outcome = registry.with_account(&account_id, |ledger| {
        let mut out = stdout.lock();
        let summary = replay_steps(ledger, &steps, strict, &mut out)?;
        writeln!(out)?;
        write!(out, "{}", AccountReport::capture(ledger))?;
        Ok::<_, TradeLedgerError>(summary)
    });

    match outcome.and_then(|inner| inner) {
        Ok(summary) => {
            info!(
                applied = summary.applied,
                rejected = summary.rejected,
                "replay complete"
            );
            eprintln!(
                "\nReplay complete: {} applied, {} rejected",
                summary.applied, summary.rejected
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Interactive session state: the registry and the account commands act on.
pub struct Session {
    pub registry: AccountRegistry,
    pub current: String,
}

impl Session {
    pub fn new(registry: AccountRegistry, current: String) -> Self {
        Self { registry, current }
    }

    /// Handle one input line. Returns the response text, or `None` on quit.
    pub fn handle_line(&mut self, line: &str) -> Option<String> {
        let cmd = match command::parse(line) {
            Ok(c) => c,
            Err(e) => return Some(format!("error: {}", e.display_with_context(line))),
        };

        let result = match cmd {
            Command::Quit => return None,
            Command::Help => Ok(HELP.to_string()),
            Command::Ledger(op) => self
                .registry
                .with_account(&self.current, |ledger| op.apply(ledger))
                .and_then(|r| r.map_err(TradeLedgerError::from)),
            Command::Open {
                account_id,
                initial_deposit,
            } => self
                .registry
                .open(&account_id, initial_deposit)
                .map(|()| {
                    let msg = format!(
                        "Opened account {} with {}",
                        account_id,
                        format_amount(initial_deposit)
                    );
                    self.current = account_id;
                    msg
                }),
            Command::Use { account_id } => {
                if self.registry.contains(&account_id) {
                    let msg = format!("Using account {account_id}");
                    self.current = account_id;
                    Ok(msg)
                } else {
                    Err(TradeLedgerError::AccountNotFound { id: account_id })
                }
            }
            Command::Accounts => Ok(self
                .registry
                .account_ids()
                .iter()
                .map(|id| {
                    if *id == self.current {
                        format!("* {id}")
                    } else {
                        format!("  {id}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")),
            Command::Quote { symbol } => {
                let price = self.registry.oracle().price_of(&symbol);
                if price == 0.0 {
                    Ok(format!("{symbol}: {} (no price available)", format_amount(price)))
                } else {
                    Ok(format!("{symbol}: {}", format_amount(price)))
                }
            }
        };

        Some(match result {
            Ok(text) => text,
            Err(e) => format!("error: {e}"),
        })
    }

    /// Read lines from `input` until end of input or `quit`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> io::Result<()> {
        write!(output, "{}> ", self.current)?;
        output.flush()?;
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                write!(output, "{}> ", self.current)?;
                output.flush()?;
                continue;
            }
            match self.handle_line(&line) {
                Some(response) => writeln!(output, "{response}")?,
                None => break,
            }
            write!(output, "{}> ", self.current)?;
            output.flush()?;
        }
        writeln!(output)?;
        Ok(())
    }
}

fn run_shell(config_path: Option<&PathBuf>) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let (registry, account_id) = match build_registry(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Account {account_id} ready. Type 'help' for commands.");
    let mut session = Session::new(registry, account_id);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    match session.run(stdin.lock(), &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let err = TradeLedgerError::from(e);
            eprintln!("error: {err}");
            (&err).into()
        }
    }
}

fn run_quote(config_path: Option<&PathBuf>, symbols: &[String]) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let oracle = match StaticPriceOracle::from_config(&config) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols: Vec<String> = if symbols.is_empty() {
        oracle.symbols()
    } else {
        symbols.iter().map(|s| s.trim().to_uppercase()).collect()
    };

    for symbol in &symbols {
        let price = oracle.price_of(symbol);
        if price == 0.0 {
            eprintln!("warning: no price for {symbol}");
        }
        println!("{}: {}", symbol, format_amount(price));
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_account_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("\nAccount:");
    eprintln!("  id:              {}", config_validation::account_id(&adapter));
    eprintln!(
        "  initial_deposit: {}",
        format_amount(config_validation::initial_deposit(&adapter))
    );

    match adapter.section_keys("prices") {
        Some(keys) => eprintln!("\nPrices: {} symbols configured", keys.len()),
        None => eprintln!("\nPrices: default table"),
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
