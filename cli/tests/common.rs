use std::{
    ffi::OsStr,
    path::PathBuf,
    process::{Command, Output, Stdio},
};

const ENV_VARIABLES: [&str; 6] = [
    "TABLEAU_URL",
    "TABLEAU_SITE",
    "TABLEAU_TOKEN_NAME",
    "TABLEAU_TOKEN",
    "TABLEAU_PASSWORD",
    "RUST_LOG",
];

pub struct TestCli {
    cli_path: PathBuf,
}

impl TestCli {
    pub fn get() -> Self {
        TestCli {
            cli_path: PathBuf::from(env!("CARGO_BIN_EXE_connections-tableau")),
        }
    }

    /// A command which never prompts (stdin is not a terminal) and ignores any
    /// Tableau settings from the environment of the test runner.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.cli_path);
        for variable in ENV_VARIABLES {
            command.env_remove(variable);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    pub fn run(&self, args: impl IntoIterator<Item = impl AsRef<OsStr>>) -> String {
        let output = self.output(args);

        if !output.status.success() {
            panic!(
                "failed to run command:\n{}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        String::from_utf8(output.stdout).unwrap()
    }

    pub fn run_and_error(&self, args: impl IntoIterator<Item = impl AsRef<OsStr>>) -> String {
        let output = self.output(args);

        if output.status.success() {
            panic!(
                "succeeded running command (expected failure):\n{}",
                String::from_utf8_lossy(&output.stdout)
            );
        }

        String::from_utf8(output.stderr).unwrap()
    }

    fn output(&self, args: impl IntoIterator<Item = impl AsRef<OsStr>>) -> Output {
        self.command().args(args).output().unwrap()
    }
}
