//! Process-based execution strategy
//!
//! Each worker is a `slugline-worker` child process. One parent thread per
//! worker pulls the next chunk index from a shared counter, sends the chunk
//! and waits for its slugs, so fast workers take more chunks. Workers hold
//! no cache.

use crate::{
    assembler::ChunkOutput,
    chunker::Chunk,
    error::{EngineError, Result},
    executor::{ExecutionMode, Executor},
    worker::{read_frame, write_frame, Request, Response},
};
use slugline_core::SlugConfig;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Environment variable naming the worker executable
pub const WORKER_ENV: &str = "SLUGLINE_WORKER";

/// File name of the worker executable
pub fn worker_file_name() -> String {
    format!("slugline-worker{}", std::env::consts::EXE_SUFFIX)
}

/// Locate the worker executable
///
/// Order: `explicit`, then [`WORKER_ENV`], then a `slugline-worker` next to
/// the current executable or one directory above it (test binaries live in
/// `target/<profile>/deps`).
pub fn resolve_worker_program(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(WORKER_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let name = worker_file_name();
    let exe = std::env::current_exe().map_err(|e| {
        EngineError::WorkerUnavailable(format!("cannot locate current executable: {e}"))
    })?;

    exe.ancestors()
        .skip(1)
        .take(2)
        .map(|dir| dir.join(&name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| {
            EngineError::WorkerUnavailable(format!(
                "{name} not found near {}; set {WORKER_ENV} or configure worker_program",
                exe.display()
            ))
        })
}

/// Executor that fans chunks out to worker processes
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    program: Option<PathBuf>,
    workers: usize,
}

impl ProcessExecutor {
    /// Create an executor with up to `workers` processes
    ///
    /// `program` is resolved on first use, so an empty batch never needs a
    /// worker.
    pub fn new(program: Option<PathBuf>, workers: usize) -> Self {
        Self {
            program,
            workers: workers.max(1),
        }
    }

    /// Maximum number of worker processes
    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Executor for ProcessExecutor {
    fn execute(&self, chunks: &[Chunk<'_>], config: &Arc<SlugConfig>) -> Result<Vec<ChunkOutput>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let program = resolve_worker_program(self.program.as_deref())?;
        let count = self.workers.min(chunks.len());
        log::debug!("spawning {count} workers from {}", program.display());

        let next = AtomicUsize::new(0);
        let failed = AtomicBool::new(false);

        let results: Vec<Result<Vec<ChunkOutput>>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..count)
                .map(|_| {
                    scope.spawn(|| {
                        let result = drive_worker(&program, config, chunks, &next, &failed);
                        if result.is_err() {
                            failed.store(true, Ordering::Relaxed);
                        }
                        result
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        Err(EngineError::WorkerFailed("worker thread panicked".to_string()))
                    })
                })
                .collect()
        });

        let mut outputs = Vec::with_capacity(chunks.len());
        for result in results {
            outputs.extend(result?);
        }
        Ok(outputs)
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Process
    }
}

/// Run one worker until the chunk queue is drained or a worker fails
fn drive_worker(
    program: &Path,
    config: &SlugConfig,
    chunks: &[Chunk<'_>],
    next: &AtomicUsize,
    failed: &AtomicBool,
) -> Result<Vec<ChunkOutput>> {
    let mut worker = WorkerProcess::spawn(program, config)?;
    let mut outputs = Vec::new();

    while !failed.load(Ordering::Relaxed) {
        let index = next.fetch_add(1, Ordering::Relaxed);
        let Some(chunk) = chunks.get(index) else {
            break;
        };
        let slugs = worker.slugify(chunk)?;
        outputs.push(ChunkOutput {
            start: chunk.start,
            slugs,
        });
    }

    worker.finish()?;
    Ok(outputs)
}

/// A running worker with its pipes
struct WorkerProcess {
    child: Child,
    stdin: Option<BufWriter<ChildStdin>>,
    stdout: BufReader<ChildStdout>,
}

impl WorkerProcess {
    /// Start a worker and wait until it accepts `config`
    fn spawn(program: &Path, config: &SlugConfig) -> Result<Self> {
        let mut child = Command::new(program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| EngineError::WorkerSpawn {
                program: program.display().to_string(),
                reason: e.to_string(),
            })?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(EngineError::WorkerFailed("worker pipes unavailable".to_string()));
            }
        };

        let mut worker = Self {
            child,
            stdin: Some(BufWriter::new(stdin)),
            stdout: BufReader::new(stdout),
        };

        let configure = Request::Configure {
            config: config.clone(),
        };
        match worker.round_trip(&configure)? {
            Response::Ready => Ok(worker),
            other => Err(unexpected(other)),
        }
    }

    /// Slugify one chunk
    fn slugify(&mut self, chunk: &Chunk<'_>) -> Result<Vec<String>> {
        let request = Request::Chunk {
            start: chunk.start,
            items: chunk.items.iter().map(|s| s.to_string()).collect(),
        };

        match self.round_trip(&request)? {
            Response::Slugs { start, slugs }
                if start == chunk.start && slugs.len() == chunk.len() =>
            {
                Ok(slugs)
            }
            Response::Slugs { start, slugs } => Err(EngineError::Protocol(format!(
                "expected {} slugs for chunk at {}, got {} at {start}",
                chunk.len(),
                chunk.start,
                slugs.len()
            ))),
            other => Err(unexpected(other)),
        }
    }

    fn round_trip(&mut self, request: &Request) -> Result<Response> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| EngineError::WorkerFailed("worker input already closed".to_string()))?;
        write_frame(stdin, request)?;

        read_frame(&mut self.stdout)?
            .ok_or_else(|| EngineError::WorkerFailed("worker exited before responding".to_string()))
    }

    /// Close the worker's input and wait for a clean exit
    fn finish(&mut self) -> Result<()> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| EngineError::WorkerFailed(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(EngineError::WorkerFailed(format!("worker exited with {status}")))
        }
    }
}

impl Drop for WorkerProcess {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

fn unexpected(response: Response) -> EngineError {
    match response {
        Response::Error { message } => EngineError::WorkerFailed(message),
        other => EngineError::Protocol(format!("unexpected frame {other:?}")),
    }
}
