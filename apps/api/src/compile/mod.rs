//! LaTeX → PDF compilation through an external TeX engine.
//!
//! `AppState` holds an `Arc<dyn LatexCompiler>`; the default backend shells out to
//! `pdflatex` inside a private temporary directory that is removed on drop.

pub mod handlers;

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

/// Base name for the source, log and PDF inside the working directory.
const JOB_NAME: &str = "resume";
/// Lines of compiler output kept when no `!` error marker is found.
const LOG_TAIL_LINES: usize = 40;
/// Lines kept after the first `!` error marker.
const ERROR_CONTEXT_LINES: usize = 20;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to start LaTeX compiler '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("LaTeX compilation timed out after {0} seconds")]
    Timeout(u64),

    #[error("LaTeX compiler reported errors")]
    Failed { log: String },

    #[error("I/O error during compilation: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    /// Text returned to the client in the `error` field.
    pub fn diagnostics(&self) -> String {
        match self {
            CompileError::Failed { log } => log.clone(),
            other => other.to_string(),
        }
    }
}

/// Pluggable compiler backend. Implement this to swap engines without touching handlers.
#[async_trait]
pub trait LatexCompiler: Send + Sync {
    async fn compile(&self, source: &str) -> Result<Vec<u8>, CompileError>;
}

/// Runs a TeX engine as a subprocess.
///
/// The command line is split on whitespace, so `LATEX_COMPILER="xelatex"` or
/// `LATEX_COMPILER="lualatex --halt-on-error"` both work.
pub struct PdfLatexCompiler {
    program: String,
    leading_args: Vec<String>,
    timeout: Duration,
}

impl PdfLatexCompiler {
    pub fn new(command_line: &str, timeout: Duration) -> Self {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_else(|| "pdflatex".to_string());
        Self {
            program,
            leading_args: parts.collect(),
            timeout,
        }
    }
}

#[async_trait]
impl LatexCompiler for PdfLatexCompiler {
    async fn compile(&self, source: &str) -> Result<Vec<u8>, CompileError> {
        let workdir = tempfile::Builder::new().prefix("tailor-latex-").tempdir()?;
        let tex_path = workdir.path().join(format!("{JOB_NAME}.tex"));
        tokio::fs::write(&tex_path, source).await?;

        debug!("Compiling {} bytes of LaTeX in {:?}", source.len(), workdir.path());

        let child = Command::new(&self.program)
            .args(&self.leading_args)
            .arg("-interaction=nonstopmode")
            .arg("-halt-on-error")
            .arg("-no-shell-escape")
            .arg(format!("-output-directory={}", workdir.path().display()))
            .arg(format!("{JOB_NAME}.tex"))
            .current_dir(workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CompileError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(CompileError::Io(e)),
            // Dropping the future drops the child, which kills it.
            Err(_) => return Err(CompileError::Timeout(self.timeout.as_secs())),
        };

        if !output.status.success() {
            let log = read_compiler_log(workdir.path(), &output.stdout, &output.stderr).await;
            return Err(CompileError::Failed {
                log: extract_diagnostics(&log),
            });
        }

        let pdf_path = workdir.path().join(format!("{JOB_NAME}.pdf"));
        match tokio::fs::read(&pdf_path).await {
            Ok(pdf) => {
                info!("Compiled LaTeX to PDF ({} bytes)", pdf.len());
                Ok(pdf)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let log = read_compiler_log(workdir.path(), &output.stdout, &output.stderr).await;
                Err(CompileError::Failed {
                    log: format!(
                        "Compiler produced no PDF output.\n{}",
                        extract_diagnostics(&log)
                    ),
                })
            }
            Err(e) => Err(CompileError::Io(e)),
        }
    }
}

/// Prefers the engine's `.log` file; falls back to captured stdout and stderr.
async fn read_compiler_log(workdir: &Path, stdout: &[u8], stderr: &[u8]) -> String {
    let log_path = workdir.join(format!("{JOB_NAME}.log"));
    match tokio::fs::read(&log_path).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => format!(
            "{}{}",
            String::from_utf8_lossy(stdout),
            String::from_utf8_lossy(stderr)
        ),
    }
}

/// Trims a TeX log to the part a user needs.
///
/// TeX marks errors with lines starting `!`; when present, the first one and a
/// few lines of context are kept. Otherwise the tail of the log is returned.
pub fn extract_diagnostics(log: &str) -> String {
    let lines: Vec<&str> = log.lines().collect();

    if let Some(first_error) = lines.iter().position(|line| line.starts_with('!')) {
        let end = (first_error + ERROR_CONTEXT_LINES).min(lines.len());
        return lines[first_error..end].join("\n");
    }

    let start = lines.len().saturating_sub(LOG_TAIL_LINES);
    lines[start..].join("\n")
}
