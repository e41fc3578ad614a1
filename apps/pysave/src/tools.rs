//! The four external Python tools and how each one is located, invoked,
//! and judged.

use crate::aggregate::DELIMITER;
use crate::config::Effective;
use crate::error::{Error, Result};
use crate::runner::{Invocation, ProcessOutput, ProcessRunner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Black,
    Isort,
    Flake8,
    Pylint,
}

/// What counts as a failed run for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Any stderr output. Linters exit non-zero whenever they find issues,
    /// so the status alone says nothing.
    AnyStderr,
    /// Non-zero exit status. black narrates its progress on stderr even
    /// when it succeeds.
    NonZeroExit,
}

impl Tool {
    pub fn name(self) -> &'static str {
        match self {
            Tool::Black => "black",
            Tool::Isort => "isort",
            Tool::Flake8 => "flake8",
            Tool::Pylint => "pylint",
        }
    }

    /// Environment variable holding an explicit binary path.
    pub fn env_var(self) -> &'static str {
        match self {
            Tool::Black => "TM_PYTHON_FMT_BLACK",
            Tool::Isort => "TM_PYTHON_FMT_ISORT",
            Tool::Flake8 => "TM_PYTHON_FMT_FLAKE8",
            Tool::Pylint => "TM_PYTHON_FMT_PYLINT",
        }
    }

    pub fn failure_mode(self) -> FailureMode {
        match self {
            Tool::Black => FailureMode::NonZeroExit,
            _ => FailureMode::AnyStderr,
        }
    }

    /// Arguments for one run. Formatters read the document from stdin;
    /// linters get `file` appended and print one finding per line in the
    /// `line || column || code || message` shape.
    pub fn args(self, eff: &Effective, file: Option<&str>) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        match self {
            Tool::Black => args.push("-".into()),
            Tool::Isort => {
                if let Some(venv) = eff.virtual_env.as_ref() {
                    args.push("--virtual-env".into());
                    args.push(venv.clone());
                }
                args.push("-".into());
            }
            Tool::Flake8 => {
                args.push("--format".into());
                args.push(["%(row)d", "%(col)d", "%(code)s", "%(text)s"].join(DELIMITER));
            }
            Tool::Pylint => {
                args.push("--errors-only".into());
                args.push("--msg-template".into());
                args.push(["{line}", "{column}", "{msg_id}", "{msg}"].join(DELIMITER));
                args.extend(eff.pylint_extra.iter().cloned());
            }
        }
        if matches!(self, Tool::Flake8 | Tool::Pylint) {
            if let Some(f) = file {
                args.push(f.to_string());
            }
        }
        args
    }

    /// Turn a finished run into its stdout, or the tool failure.
    pub fn check(self, out: ProcessOutput) -> Result<String> {
        let failed = match self.failure_mode() {
            FailureMode::AnyStderr => !out.stderr.is_empty(),
            FailureMode::NonZeroExit => !out.success(),
        };
        if failed {
            return Err(Error::ToolFailed {
                tool: self.name().to_string(),
                stderr: out.stderr,
                exit_code: out.exit_code,
            });
        }
        Ok(out.stdout)
    }
}

/// Locate the binary for `tool`: an explicit override wins, otherwise the
/// shell's `command -v` is asked with the effective `PATH`.
///
/// A blank answer from either source means the tool is missing.
pub fn resolve_binary(
    tool: Tool,
    eff: &Effective,
    runner: &mut dyn ProcessRunner,
    path: &str,
) -> Result<String> {
    let cmd = match eff.tool_override(tool) {
        Some(explicit) => explicit.to_string(),
        None => {
            let lookup_cmd = format!("command -v {}", tool.name());
            let lookup = Invocation::new("sh")
                .args(["-c", lookup_cmd.as_str()])
                .path(Some(path));
            // A failed lookup prints nothing, which is handled below.
            let out = runner.run(&lookup)?;
            out.stdout.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    if cmd.is_empty() {
        return Err(Error::ToolNotFound(tool.name().to_string()));
    }
    log::debug!("{} resolved to {}", tool.name(), cmd);
    Ok(cmd)
}

/// Resolve `tool`, run it with `input` on stdin (if any), and return its
/// checked stdout.
pub fn run_tool(
    tool: Tool,
    eff: &Effective,
    runner: &mut dyn ProcessRunner,
    path: &str,
    input: Option<&str>,
) -> Result<String> {
    let program = resolve_binary(tool, eff, runner, path)?;
    let mut inv = Invocation::new(program)
        .args(tool.args(eff, eff.filepath.as_deref()))
        .path(Some(path));
    if let Some(text) = input {
        inv = inv.input(text);
    }
    log::info!("running {}", tool.name());
    tool.check(runner.run(&inv)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::fake::ScriptedRunner;

    #[test]
    fn test_linter_args_use_delimited_templates() {
        let eff = Effective {
            pylint_extra: vec!["--disable=E0401".into()],
            ..Effective::default()
        };
        assert_eq!(
            Tool::Flake8.args(&eff, Some("/p/a.py")),
            vec![
                "--format",
                "%(row)d || %(col)d || %(code)s || %(text)s",
                "/p/a.py"
            ]
        );
        assert_eq!(
            Tool::Pylint.args(&eff, Some("/p/a.py")),
            vec![
                "--errors-only",
                "--msg-template",
                "{line} || {column} || {msg_id} || {msg}",
                "--disable=E0401",
                "/p/a.py"
            ]
        );
    }

    #[test]
    fn test_formatter_args_read_stdin() {
        let mut eff = Effective::default();
        assert_eq!(Tool::Black.args(&eff, Some("/p/a.py")), vec!["-"]);
        assert_eq!(Tool::Isort.args(&eff, None), vec!["-"]);
        eff.virtual_env = Some("/p/.venv".into());
        assert_eq!(
            Tool::Isort.args(&eff, None),
            vec!["--virtual-env", "/p/.venv", "-"]
        );
    }

    #[test]
    fn test_override_skips_shell_lookup() {
        let eff = Effective {
            flake8: Some("/opt/flake8".into()),
            ..Effective::default()
        };
        let mut runner = ScriptedRunner::default();
        let bin = resolve_binary(Tool::Flake8, &eff, &mut runner, "/bin").unwrap();
        assert_eq!(bin, "/opt/flake8");
        assert!(runner.calls.is_empty());
    }

    #[test]
    fn test_shell_lookup_uses_effective_path() {
        let eff = Effective::default();
        let mut runner = ScriptedRunner::default().ok("/venv/bin/black\n");
        let bin = resolve_binary(Tool::Black, &eff, &mut runner, "/venv/bin:/bin").unwrap();
        assert_eq!(bin, "/venv/bin/black");
        assert_eq!(runner.calls[0].program, "sh");
        assert_eq!(runner.calls[0].args, vec!["-c", "command -v black"]);
        assert_eq!(runner.calls[0].path.as_deref(), Some("/venv/bin:/bin"));
    }

    #[test]
    fn test_blank_lookup_is_not_found() {
        let eff = Effective::default();
        let mut runner = ScriptedRunner::default().reply("", "", 1);
        let err = resolve_binary(Tool::Isort, &eff, &mut runner, "/bin").unwrap_err();
        assert_eq!(err.to_string(), "isort binary not found!");
        // only the lookup ran
        assert_eq!(runner.programs(), vec!["sh"]);
    }

    #[test]
    fn test_check_failure_modes() {
        let noisy_ok = ProcessOutput {
            stdout: "x = 1\n".into(),
            stderr: "reformatted -\nAll done!\n".into(),
            exit_code: 0,
        };
        assert_eq!(Tool::Black.check(noisy_ok.clone()).unwrap(), "x = 1\n");
        assert!(matches!(
            Tool::Isort.check(noisy_ok),
            Err(Error::ToolFailed { .. })
        ));

        let findings = ProcessOutput {
            stdout: "1 || 1 || F401 || unused".into(),
            stderr: String::new(),
            exit_code: 1,
        };
        assert!(Tool::Flake8.check(findings).is_ok());

        let crashed = ProcessOutput {
            stdout: String::new(),
            stderr: "error: cannot format -: Cannot parse".into(),
            exit_code: 123,
        };
        let err = Tool::Black.check(crashed).unwrap_err();
        assert_eq!(err.tooltip(), "error: cannot format -: Cannot parse");
    }

    #[test]
    fn test_black_silent_failure_still_shows_tooltip() {
        let silent = ProcessOutput {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 123,
        };
        let tip = Tool::Black.check(silent).unwrap_err().tooltip();
        assert!(!tip.is_empty());
        assert!(tip.contains("black failed (exit 123)"));
    }
}
