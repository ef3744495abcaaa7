//! Interactive terminal handoff.
//!
//! Subcommands such as `attach` and `exec -it` take over stdin/stdout of the
//! controlling terminal. Whoever draws on that terminal has to let go first and
//! redraw afterwards; [`run_attached`] makes that bracket explicit instead of
//! burying it inside the executor.

use super::{CommandExecutor, CommandInvocation, ExecutorError};
use std::io;
use tracing::{debug, warn};

/// Owner of the terminal that must step aside for an interactive child.
pub trait TerminalHandoff: Send {
    /// Stop drawing and release the terminal.
    fn suspend(&mut self) -> io::Result<()>;

    /// Take the terminal back and redraw.
    fn resume(&mut self) -> io::Result<()>;
}

/// Handoff for callers that never draw on the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTerminal;

impl TerminalHandoff for NoopTerminal {
    fn suspend(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn resume(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Suspend `terminal`, run `invocation` attached to it, then resume.
///
/// Resume is attempted even when the child could not be started, so the
/// caller always gets its terminal back.
///
/// # Errors
///
/// Returns the executor error if the child failed to start, otherwise
/// [`ExecutorError::Terminal`] if suspend or resume failed.
pub async fn run_attached<E, T>(
    executor: &E,
    invocation: &CommandInvocation,
    terminal: &mut T,
) -> Result<(), ExecutorError>
where
    E: CommandExecutor + ?Sized,
    T: TerminalHandoff + ?Sized,
{
    terminal.suspend().map_err(ExecutorError::Terminal)?;
    debug!("Terminal suspended for {}", invocation.program());

    let outcome = executor.run_interactive(invocation).await;

    let resumed = terminal.resume();
    if let Err(ref e) = resumed {
        warn!("Failed to resume terminal: {}", e);
    }

    outcome?;
    resumed.map_err(ExecutorError::Terminal)
}
