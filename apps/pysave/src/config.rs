//! Settings discovery and effective configuration resolution.
//!
//! Settings come from the editor's environment (`TM_*` variables). An
//! optional `pysave.toml|yaml|yml` found at the project root (or closest
//! ancestor of the saved file) can pin tool paths and options for a project.
//!
//! Overrides precedence: CLI > environment > config file > shell lookup.
//!
//! Environment is read through a lookup function rather than `std::env`
//! directly, so resolution can be exercised without touching process state.

use crate::error::{Error, Result};
use crate::tools::Tool;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_PYTHON: &str = "TM_PYTHON";
pub const ENV_VIRTUAL_ENV: &str = "TM_PYTHON_FMT_VIRTUAL_ENV";
pub const ENV_PYLINT_EXTRA: &str = "TM_PYTHON_FMT_PYLINT_EXTRA_OPTIONS";
pub const ENV_DOCUMENT_UUID: &str = "TM_DOCUMENT_UUID";
pub const ENV_MATE: &str = "TM_MATE";
pub const ENV_FILEPATH: &str = "TM_FILEPATH";

const CONFIG_NAMES: [&str; 3] = ["pysave.toml", "pysave.yaml", "pysave.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Per-tool binary paths under `[tools]`.
pub struct ToolsCfg {
    pub black: Option<String>,
    pub isort: Option<String>,
    pub flake8: Option<String>,
    pub pylint: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `pysave.toml|yaml`.
pub struct PysaveConfig {
    #[serde(default)]
    pub tools: Option<ToolsCfg>,
    pub virtual_env: Option<String>,
    pub pylint_extra_options: Option<String>,
}

#[derive(Debug, Default, Clone)]
/// Values given on the command line; each wins over every other source.
pub struct CliOverrides {
    pub repo_root: Option<String>,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Default)]
/// Fully-resolved settings used by the pipelines.
pub struct Effective {
    pub python: Option<String>,
    pub black: Option<String>,
    pub isort: Option<String>,
    pub flake8: Option<String>,
    pub pylint: Option<String>,
    pub virtual_env: Option<String>,
    pub pylint_extra: Vec<String>,
    pub document_uuid: Option<String>,
    pub mate: Option<String>,
    pub filepath: Option<String>,
    /// `PATH` inherited from the editor.
    pub base_path: Option<String>,
    /// Config file that contributed to these settings, if any.
    pub config_path: Option<PathBuf>,
}

impl Effective {
    /// Explicit binary path for `tool`, if one was configured.
    pub fn tool_override(&self, tool: Tool) -> Option<&str> {
        match tool {
            Tool::Black => self.black.as_deref(),
            Tool::Isort => self.isort.as_deref(),
            Tool::Flake8 => self.flake8.as_deref(),
            Tool::Pylint => self.pylint.as_deref(),
        }
    }

    /// Check the interpreter setting and compute the `PATH` handed to child
    /// processes: the interpreter's directory first, then the inherited path.
    pub fn setup(&self) -> Result<String> {
        let python = self
            .python
            .as_deref()
            .ok_or_else(|| Error::MissingSetting(ENV_PYTHON.into()))?;
        let dir = Path::new(python)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = if dir.is_empty() { ".".to_string() } else { dir };
        Ok(match self.base_path.as_deref() {
            Some(base) => format!("{}:{}", dir, base),
            None => dir,
        })
    }
}

/// Return a required setting or the matching setup error.
pub fn require<'a>(value: &'a Option<String>, var: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| Error::MissingSetting(var.to_string()))
}

/// Walk upward from `start` to find the project root.
///
/// Stops when a `pysave.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `PysaveConfig` from `root`, if a config file is present there.
pub fn load_config(root: &Path) -> Result<Option<(PathBuf, PysaveConfig)>> {
    let toml_path = root.join("pysave.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path)?;
        let cfg: PysaveConfig = toml::from_str(&s).map_err(|e| Error::Config {
            path: toml_path.to_string_lossy().into_owned(),
            message: e.to_string(),
        })?;
        return Ok(Some((toml_path, cfg)));
    }
    for yml in ["pysave.yaml", "pysave.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p)?;
            let cfg: PysaveConfig = serde_yaml::from_str(&s).map_err(|e| Error::Config {
                path: p.to_string_lossy().into_owned(),
                message: e.to_string(),
            })?;
            return Ok(Some((p, cfg)));
        }
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI values, the environment (via `env`),
/// and a discovered config file.
///
/// Discovery starts from `--repo-root`, else the saved file's directory,
/// else the current directory.
pub fn resolve_effective<F>(cli: &CliOverrides, env: F) -> Result<Effective>
where
    F: Fn(&str) -> Option<String>,
{
    let filepath = cli.file.clone().or_else(|| env(ENV_FILEPATH));
    let start = match (&cli.repo_root, &filepath) {
        (Some(root), _) => PathBuf::from(root),
        (None, Some(file)) => Path::new(file)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
        (None, None) => PathBuf::from("."),
    };
    let repo_root = detect_repo_root(&start);
    let (config_path, cfg) = match load_config(&repo_root)? {
        Some((p, c)) => (Some(p), c),
        None => (None, PysaveConfig::default()),
    };
    let tools = cfg.tools.unwrap_or_default();

    let pylint_extra = env(ENV_PYLINT_EXTRA)
        .or(cfg.pylint_extra_options)
        .map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    Ok(Effective {
        python: env(ENV_PYTHON),
        black: env(Tool::Black.env_var()).or(tools.black),
        isort: env(Tool::Isort.env_var()).or(tools.isort),
        flake8: env(Tool::Flake8.env_var()).or(tools.flake8),
        pylint: env(Tool::Pylint.env_var()).or(tools.pylint),
        virtual_env: env(ENV_VIRTUAL_ENV).or(cfg.virtual_env),
        pylint_extra,
        document_uuid: env(ENV_DOCUMENT_UUID),
        mate: env(ENV_MATE),
        filepath,
        base_path: env("PATH"),
        config_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::tempdir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    fn cli_at(root: &Path) -> CliOverrides {
        CliOverrides {
            repo_root: root.to_str().map(str::to_string),
            file: None,
        }
    }

    #[test]
    fn test_env_only() {
        let dir = tempdir().unwrap();
        let env = env_of(&[
            ("TM_PYTHON", "/opt/py/bin/python3"),
            ("TM_PYTHON_FMT_BLACK", "/opt/py/bin/black"),
            (
                "TM_PYTHON_FMT_PYLINT_EXTRA_OPTIONS",
                "  --disable=C0114   -j 2 ",
            ),
            ("TM_FILEPATH", "/tmp/x.py"),
        ]);
        let eff = resolve_effective(&cli_at(dir.path()), env).unwrap();
        assert_eq!(eff.python.as_deref(), Some("/opt/py/bin/python3"));
        assert_eq!(eff.tool_override(Tool::Black), Some("/opt/py/bin/black"));
        assert_eq!(eff.tool_override(Tool::Isort), None);
        assert_eq!(eff.pylint_extra, vec!["--disable=C0114", "-j", "2"]);
        assert_eq!(eff.filepath.as_deref(), Some("/tmp/x.py"));
        assert!(eff.config_path.is_none());
    }

    #[test]
    fn test_config_file_fills_gaps_and_env_wins() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("pysave.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
virtual_env = ".venv"
pylint_extra_options = "--disable=all"
[tools]
isort = "/cfg/isort"
flake8 = "/cfg/flake8"
            "#
        )
        .unwrap();
        let env = env_of(&[("TM_PYTHON_FMT_FLAKE8", "/env/flake8")]);
        let eff = resolve_effective(&cli_at(root), env).unwrap();
        assert_eq!(eff.tool_override(Tool::Isort), Some("/cfg/isort"));
        assert_eq!(eff.tool_override(Tool::Flake8), Some("/env/flake8"));
        assert_eq!(eff.virtual_env.as_deref(), Some(".venv"));
        assert_eq!(eff.pylint_extra, vec!["--disable=all"]);
        assert_eq!(eff.config_path, Some(root.join("pysave.toml")));
    }

    #[test]
    fn test_yaml_config_found_from_file_dir() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("pysave.yaml"), "tools:\n  black: /yaml/black\n").unwrap();
        let pkg = root.join("pkg");
        fs::create_dir_all(&pkg).unwrap();
        let file = pkg.join("mod.py");
        let env = env_of(&[("TM_FILEPATH", file.to_str().unwrap())]);
        let eff = resolve_effective(&CliOverrides::default(), env).unwrap();
        assert_eq!(eff.tool_override(Tool::Black), Some("/yaml/black"));
    }

    #[test]
    fn test_cli_file_beats_env() {
        let dir = tempdir().unwrap();
        let env = env_of(&[("TM_FILEPATH", "/env/a.py")]);
        let cli = CliOverrides {
            repo_root: dir.path().to_str().map(str::to_string),
            file: Some("/cli/b.py".into()),
        };
        let eff = resolve_effective(&cli, env).unwrap();
        assert_eq!(eff.filepath.as_deref(), Some("/cli/b.py"));
    }

    #[test]
    fn test_malformed_config_is_reported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("pysave.toml"), "tools = 3\n").unwrap();
        let err = resolve_effective(&cli_at(dir.path()), env_of(&[])).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_setup_requires_python_and_prefixes_path() {
        let eff = Effective::default();
        let err = eff.setup().unwrap_err();
        assert_eq!(err.to_string(), "err: TM_PYTHON");

        let eff = Effective {
            python: Some("/opt/py/bin/python3".into()),
            base_path: Some("/usr/bin:/bin".into()),
            ..Effective::default()
        };
        assert_eq!(eff.setup().unwrap(), "/opt/py/bin:/usr/bin:/bin");
    }
}
