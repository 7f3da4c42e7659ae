use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

// Nothing listens on the discard port, so any accidental network access fails fast.
const UNREACHABLE_URL: &str = "http://127.0.0.1:9/unreachable";

#[allow(dead_code)]
pub struct TestContext {
    pub _temp_dir: TempDir,
    pub home: PathBuf,
    pub dotnet_root: PathBuf,
    pub script_path: PathBuf,
    pub log_path: PathBuf,
    pub bin_path: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let home = temp_dir.path().to_path_buf();

        Self {
            dotnet_root: home.join(".dotnet"),
            script_path: home.join("Downloads").join("dotnet-install.sh"),
            log_path: home.join("install.log"),
            bin_path: PathBuf::from(env!("CARGO_BIN_EXE_dotnetman")),
            home,
            _temp_dir: temp_dir,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(&self.bin_path);
        cmd.env("HOME", &self.home);
        cmd.env("DOTNETMAN_INSTALL_SCRIPT_URL", UNREACHABLE_URL);
        cmd.env("DOTNETMAN_LIFECYCLE_URL", UNREACHABLE_URL);
        cmd.env("DOTNETMAN_TEST_LOG", &self.log_path);
        cmd.env_remove("LIST_PREFERENCE");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Create empty installation directories relative to the .NET root.
    pub fn install_dirs(&self, dirs: &[&str]) {
        for dir in dirs {
            fs::create_dir_all(self.dotnet_root.join(dir)).expect("Failed to create install dir");
        }
    }

    /// Put a fake install script in the cache that logs each invocation and exits with `code`.
    pub fn fake_install_script(&self, code: i32) {
        fs::create_dir_all(self.script_path.parent().unwrap()).unwrap();
        let script = format!(
            "#!/bin/bash\necho \"DOTNET_ROOT=$DOTNET_ROOT $*\" >> \"$DOTNETMAN_TEST_LOG\"\nexit {}\n",
            code
        );
        fs::write(&self.script_path, script).expect("Failed to write fake install script");
    }

    pub fn install_log(&self) -> Vec<String> {
        fs::read_to_string(&self.log_path)
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.home.join(name);
        fs::write(&path, content).expect("Failed to write file");
        path
    }
}

#[allow(dead_code)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }
}

#[allow(dead_code)]
impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        if !self.status.success() {
            panic!(
                "Command failed with status {:?}\nstdout: {}\nstderr: {}",
                self.status.code(),
                self.stdout,
                self.stderr
            );
        }
        self
    }

    pub fn assert_failure(&self) -> &Self {
        assert!(
            !self.status.success(),
            "Command unexpectedly succeeded\nstdout: {}\nstderr: {}",
            self.stdout,
            self.stderr
        );
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Stdout did not contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Stderr did not contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}
