use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Runs the `memora` binary inside a private temporary directory with every
/// `MEMORA_*` variable cleared, so the host environment never leaks in.
#[derive(Debug)]
pub struct CliRunner {
    binary_path: PathBuf,
    temp_dir: tempfile::TempDir,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct CliResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

const MEMORA_VARS: &[&str] = &[
    "MEMORA_CONFIG",
    "MEMORA_SEED",
    "MEMORA_REVEAL_DELAY_MS",
    "MEMORA_CONCEAL_DELAY_MS",
    "MEMORA_SCORE_FILE",
    "MEMORA_KINDS",
    "MEMORA_SIM_BREAK_AFTER",
];

#[allow(dead_code)]
impl CliRunner {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_memora")),
            temp_dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn run(&self, args: &[&str]) -> CliResult {
        self.run_inner(args, &[], None)
    }

    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> CliResult {
        self.run_inner(args, env, None)
    }

    pub fn run_with_stdin(&self, args: &[&str], stdin: &str) -> CliResult {
        self.run_inner(args, &[], Some(stdin))
    }

    fn run_inner(&self, args: &[&str], env: &[(&str, &str)], stdin: Option<&str>) -> CliResult {
        let mut cmd = Command::new(&self.binary_path);
        cmd.args(args)
            .current_dir(self.temp_dir.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for var in MEMORA_VARS {
            cmd.env_remove(var);
        }
        cmd.env_remove("RUST_LOG");
        for (key, value) in env {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn().expect("spawn memora");
        {
            let mut pipe = child.stdin.take().expect("stdin pipe");
            if let Some(input) = stdin {
                pipe.write_all(input.as_bytes()).expect("write stdin");
            }
        }
        let output = child.wait_with_output().expect("wait for memora");
        CliResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}
