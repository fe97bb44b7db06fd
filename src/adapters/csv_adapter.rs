//! CSV replay script adapter.
//!
//! A script is a CSV file with header `op,symbol,value`, one ledger operation
//! per row. `symbol` is left empty for cash moves and report rows:
//!
//! ```text
//! op,symbol,value
//! deposit,,500
//! buy,AAPL,2
//! pnl,,
//! ```

use crate::domain::command::{self, LedgerCommand};
use crate::domain::error::TradeLedgerError;
use std::fs;
use std::path::{Path, PathBuf};

/// One parsed script row with its 1-based line number in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    pub line: usize,
    pub command: LedgerCommand,
}

pub struct CsvScriptAdapter {
    path: PathBuf,
}

impl CsvScriptAdapter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<Vec<ScriptStep>, TradeLedgerError> {
        let content = fs::read_to_string(&self.path)?;
        parse_script(&content)
    }
}

pub fn parse_script(content: &str) -> Result<Vec<ScriptStep>, TradeLedgerError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(content.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| TradeLedgerError::Script {
            line: 1,
            reason: format!("CSV header error: {}", e),
        })?
        .clone();
    if headers.get(0).map(|h| h.to_lowercase()) != Some("op".to_string()) {
        return Err(TradeLedgerError::Script {
            line: 1,
            reason: "expected header op,symbol,value".into(),
        });
    }

    let mut steps = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| TradeLedgerError::Script {
            line: e.position().map(|p| p.line() as usize).unwrap_or(0),
            reason: format!("CSV parse error: {}", e),
        })?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        let op = record.get(0).unwrap_or_default();
        if op.is_empty() {
            continue;
        }
        let text = [op, record.get(1).unwrap_or_default(), record.get(2).unwrap_or_default()]
            .iter()
            .filter(|field| !field.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        let command = command::parse_ledger_command(&text).map_err(|e| {
            TradeLedgerError::Script {
                line,
                reason: format!("'{}': {}", text, e.message),
            }
        })?;
        steps.push(ScriptStep { line, command });
    }

    Ok(steps)
}
