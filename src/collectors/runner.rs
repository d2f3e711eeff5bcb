use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

/// Runs a vendor utility and hands back its raw stdout.
///
/// Any error means "command unavailable": the binary is missing, it hung,
/// or it printed nothing.
pub trait CommandRunner {
    fn run(&self, binary: &str, args: &[String]) -> Result<Vec<u8>>;

    /// The executable a utility name ends up running, if it can be found.
    /// Names resolving to the same file are queried once.
    fn resolve(&self, _binary: &str) -> Option<PathBuf> {
        None
    }
}

/// Process-backed runner with a hard per-invocation timeout
pub struct StorcliRunner {
    timeout: Duration,
    runtime: tokio::runtime::Runtime,
}

impl StorcliRunner {
    pub fn new(timeout: Duration) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to create command runtime")?;

        Ok(Self { timeout, runtime })
    }
}

impl CommandRunner for StorcliRunner {
    fn run(&self, binary: &str, args: &[String]) -> Result<Vec<u8>> {
        debug!("Running {} {}", binary, args.join(" "));

        self.runtime.block_on(async {
            let mut cmd = tokio::process::Command::new(binary);
            cmd.args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
                Ok(result) => result.with_context(|| format!("Failed to execute {}", binary))?,
                Err(_) => anyhow::bail!("{} timed out after {}s", binary, self.timeout.as_secs()),
            };

            // storcli exits non-zero on failed commands but still reports the
            // failure in its JSON, so only an empty stdout is fatal here
            if output.stdout.is_empty() {
                anyhow::bail!(
                    "{} produced no output ({}): {}",
                    binary,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
            }

            Ok(output.stdout)
        })
    }

    fn resolve(&self, binary: &str) -> Option<PathBuf> {
        let path = which::which(binary).ok()?;
        Some(path.canonicalize().unwrap_or(path))
    }
}
