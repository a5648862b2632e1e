//! Stork index builder invocation.
//!
//! Process execution sits behind [`CommandRunner`] so the failure contract
//! can be exercised without a real `stork` binary.

use std::{
    env,
    ffi::{OsStr, OsString},
    io::Read,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use thiserror::Error;
use tracing::{trace, warn};

/// Executable name of the index builder.
pub const STORK_PROGRAM: &str = "stork";

/// File name of the generated index inside the output directory.
pub const INDEX_FILE_NAME: &str = "search-index.st";

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Index build errors.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The index builder is not on the executable search path.
    #[error("Stork must be installed and available on $PATH (looked for `{program}`)")]
    MissingDependency { program: String },

    /// The index builder exited unsuccessfully; carries its stdout then stderr.
    #[error("Search plugin reported {0}")]
    ToolFailure(String),

    /// The index builder did not finish in time and was killed.
    #[error("`{program}` did not finish within {}s", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },

    /// The process could not be started.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error while waiting on the process.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when terminated by a signal.
    pub status: Option<i32>,

    /// Captured standard output.
    pub stdout: String,

    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited with code zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Standard output followed by standard error.
    #[must_use]
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Locates and runs external programs.
pub trait CommandRunner {
    /// Resolve `program` on the executable search path.
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Run `program` to completion, capturing its output.
    fn run(
        &self,
        program: &Path,
        args: &[OsString],
        timeout: Option<Duration>,
    ) -> Result<CommandOutput>;
}

/// Runs real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        find_on_path(program, env::var_os("PATH").as_deref())
    }

    fn run(
        &self,
        program: &Path,
        args: &[OsString],
        timeout: Option<Duration>,
    ) -> Result<CommandOutput> {
        let program_name = program.display().to_string();
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| IndexError::Spawn {
                program: program_name.clone(),
                source,
            })?;

        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let start = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if let Some(limit) = timeout
                && start.elapsed() >= limit
            {
                warn!(
                    program = %program_name,
                    timeout_secs = limit.as_secs(),
                    "killing stalled process"
                );
                child.kill()?;
                child.wait()?;
                return Err(IndexError::Timeout {
                    program: program_name,
                    timeout: limit,
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        Ok(CommandOutput {
            status: status.code(),
            stdout: join_reader(stdout),
            stderr: join_reader(stderr),
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut stream: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        // A read error leaves whatever arrived before it.
        let _ = stream.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Find an executable named `program` in the directories of `path_var`.
pub fn find_on_path(program: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    env::split_paths(path_var?).find_map(|dir| {
        executable_names(program)
            .into_iter()
            .map(|name| dir.join(name))
            .find(|path| is_executable(path))
    })
}

#[cfg(windows)]
fn executable_names(program: &str) -> Vec<String> {
    vec![format!("{program}.exe"), program.to_string()]
}

#[cfg(not(windows))]
fn executable_names(program: &str) -> Vec<String> {
    vec![program.to_string()]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Drives `stork build`.
#[derive(Debug, Clone)]
pub struct StorkIndexer<R = SystemRunner> {
    runner: R,
    program: String,
    timeout: Option<Duration>,
}

impl StorkIndexer<SystemRunner> {
    /// Indexer using real processes.
    #[must_use]
    pub fn new(timeout: Option<Duration>) -> Self {
        Self::with_runner(SystemRunner, timeout)
    }
}

impl<R: CommandRunner> StorkIndexer<R> {
    /// Indexer using a custom runner.
    #[must_use]
    pub fn with_runner(runner: R, timeout: Option<Duration>) -> Self {
        Self {
            runner,
            program: STORK_PROGRAM.to_string(),
            timeout,
        }
    }

    /// Use a differently named executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// The runner in use.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Build `<output_dir>/search-index.st` from the document at `config_path`.
    ///
    /// Returns the builder's standard output.
    pub fn build_index(&self, config_path: &Path, output_dir: &Path) -> Result<String> {
        let program = self
            .runner
            .locate(&self.program)
            .ok_or_else(|| IndexError::MissingDependency {
                program: self.program.clone(),
            })?;

        let index_path = output_dir.join(INDEX_FILE_NAME);
        let args: Vec<OsString> = vec![
            "build".into(),
            "--input".into(),
            config_path.into(),
            "--output".into(),
            index_path.clone().into(),
        ];

        trace!(
            program = %program.display(),
            input = %config_path.display(),
            output = %index_path.display(),
            "building search index"
        );

        let output = self.runner.run(&program, &args, self.timeout)?;
        if !output.success() {
            trace!(status = ?output.status, "index builder failed");
            return Err(IndexError::ToolFailure(output.combined()));
        }

        Ok(output.stdout)
    }
}
