//! Console output: aligned listings and the terminal handoff for attach/exec.

use crate::executor::{ExecutionResult, TerminalHandoff};
use crate::normalize::NormalizedTable;
use std::io::{self, Write};

const COLUMN_GAP: usize = 3;

/// Render a table with every column padded to its widest cell.
pub fn render_table(table: &NormalizedTable) -> String {
    let rows = table.rows();
    let mut widths = vec![0; table.header().len()];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &rows {
        let last = row.len().saturating_sub(1);
        for (i, (cell, width)) in row.iter().zip(&widths).enumerate() {
            out.push_str(cell);
            if i < last {
                let pad = width - cell.chars().count() + COLUMN_GAP;
                out.extend(std::iter::repeat_n(' ', pad));
            }
        }
        out.push('\n');
    }
    out
}

/// One-line outcome of a mutating action
pub fn render_outcome(action: &str, target: &str, result: &ExecutionResult) -> String {
    if result.success() {
        format!("{} {}: ok", action, target)
    } else {
        let stderr = result.stderr_text().trim();
        if stderr.is_empty() {
            format!("{} {}: failed (exit {})", action, target, result.exit_code)
        } else {
            format!(
                "{} {}: failed (exit {}): {}",
                action, target, result.exit_code, stderr
            )
        }
    }
}

/// Plain console handoff: flushes pending output before the child takes the
/// terminal and prints a separator after.
#[derive(Debug, Default)]
pub struct ConsoleTerminal;

impl TerminalHandoff for ConsoleTerminal {
    fn suspend(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        io::stderr().flush()
    }

    fn resume(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        writeln!(stdout)?;
        stdout.flush()
    }
}
