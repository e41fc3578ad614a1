//! Blocking process runner.
//!
//! `ProcessRunner` is the seam between the pipelines and the operating
//! system: production code uses `SystemRunner`, tests script the outputs.

use crate::error::{Error, Result};
use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread;

/// One process to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Written to the child's stdin, which is then closed. `None` gives the
    /// child a null stdin.
    pub input: Option<String>,
    /// Value for the child's `PATH`; inherits the parent's when `None`.
    pub path: Option<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn path(mut self, path: Option<&str>) -> Self {
        self.path = path.map(str::to_string);
        self
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code; -1 when the process was terminated by a signal.
    pub exit_code: i32,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

pub trait ProcessRunner {
    /// Run to completion and capture both output streams.
    fn run(&mut self, inv: &Invocation) -> Result<ProcessOutput>;
}

/// Runs real processes via `std::process::Command`.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&mut self, inv: &Invocation) -> Result<ProcessOutput> {
        log::debug!("running {} {:?}", inv.program, inv.args);
        let mut cmd = Command::new(&inv.program);
        cmd.args(&inv.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if inv.input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });
        if let Some(path) = &inv.path {
            cmd.env("PATH", path);
        }
        let mut child = cmd.spawn().map_err(|source| Error::Spawn {
            program: inv.program.clone(),
            source,
        })?;

        // Drain both pipes while stdin is written so a large document cannot
        // stall on a full pipe buffer.
        let stdout_handle = child
            .stdout
            .take()
            .map(|pipe| thread::spawn(move || read_pipe_to_string(pipe)));
        let stderr_handle = child
            .stderr
            .take()
            .map(|pipe| thread::spawn(move || read_pipe_to_string(pipe)));

        if let (Some(input), Some(mut stdin)) = (inv.input.as_ref(), child.stdin.take()) {
            // A tool that exits without reading stdin closes the pipe; its
            // status and stderr carry the real failure.
            if let Err(e) = stdin.write_all(input.as_bytes()) {
                log::warn!("{}: writing stdin failed: {}", inv.program, e);
            }
        }

        let status = child.wait()?;
        let stdout = join_reader(stdout_handle)?;
        let stderr = join_reader(stderr_handle)?;
        let exit_code = status.code().unwrap_or(-1);
        log::debug!(
            "{} exited with {} ({} bytes stdout, {} bytes stderr)",
            inv.program,
            exit_code,
            stdout.len(),
            stderr.len()
        );
        Ok(ProcessOutput {
            stdout,
            stderr,
            exit_code,
        })
    }
}

fn read_pipe_to_string<R: Read>(mut pipe: R) -> std::io::Result<String> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn join_reader(handle: Option<thread::JoinHandle<std::io::Result<String>>>) -> Result<String> {
    match handle {
        Some(handle) => match handle.join() {
            Ok(res) => Ok(res?),
            Err(_) => Err(Error::Io(std::io::Error::other("output reader thread panicked"))),
        },
        None => Ok(String::new()),
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted runner for pipeline tests.

    use super::*;
    use std::collections::VecDeque;

    /// Answers invocations in order from a queue and records each call.
    #[derive(Default)]
    pub struct ScriptedRunner {
        pub calls: Vec<Invocation>,
        replies: VecDeque<ProcessOutput>,
    }

    impl ScriptedRunner {
        pub fn reply(mut self, stdout: &str, stderr: &str, exit_code: i32) -> Self {
            self.replies.push_back(ProcessOutput {
                stdout: stdout.into(),
                stderr: stderr.into(),
                exit_code,
            });
            self
        }

        pub fn ok(self, stdout: &str) -> Self {
            self.reply(stdout, "", 0)
        }

        pub fn programs(&self) -> Vec<&str> {
            self.calls.iter().map(|c| c.program.as_str()).collect()
        }
    }

    impl ProcessRunner for ScriptedRunner {
        fn run(&mut self, inv: &Invocation) -> Result<ProcessOutput> {
            self.calls.push(inv.clone());
            self.replies.pop_front().ok_or_else(|| Error::Spawn {
                program: inv.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no scripted reply"),
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_system_runner_pipes_stdin_to_stdout() {
        let out = SystemRunner
            .run(&Invocation::new("cat").input("x = 1\n"))
            .unwrap();
        assert_eq!(out.stdout, "x = 1\n");
        assert!(out.stderr.is_empty());
        assert!(out.success());
    }

    #[test]
    fn test_system_runner_captures_stderr_and_status() {
        let out = SystemRunner
            .run(&Invocation::new("sh").args(["-c", "echo oops >&2; exit 3"]))
            .unwrap();
        assert_eq!(out.stderr, "oops\n");
        assert_eq!(out.exit_code, 3);
    }

    #[test]
    fn test_system_runner_reports_spawn_failure() {
        let err = SystemRunner
            .run(&Invocation::new("/nonexistent/pysave-tool-xyz"))
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }
}
