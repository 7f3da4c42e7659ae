use crate::config::Settings;
use crate::download::download_file;
use crate::error::DotnetmanError;
use crate::types::{InstallKind, SyncTarget};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

pub const DOTNET_ROOT_ENV: &str = "DOTNET_ROOT";
pub const POWERSHELL_TOOL: &str = "PowerShell";

/// Something that can install a single channel.
pub trait ChannelInstaller {
    fn install(&self, target: &SyncTarget) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptState {
    Absent,
    Present(PathBuf),
}

/// The vendor `dotnet-install.sh`, cached under the user's downloads directory.
#[derive(Debug, Clone)]
pub struct InstallScript {
    path: PathBuf,
    url: String,
}

impl InstallScript {
    pub fn new(settings: &Settings) -> Self {
        Self {
            path: settings.install_script_path.clone(),
            url: settings.install_script_url.clone(),
        }
    }

    pub fn state(&self) -> ScriptState {
        if self.path.is_file() {
            ScriptState::Present(self.path.clone())
        } else {
            ScriptState::Absent
        }
    }

    /// Download the script if it is not cached yet and return its path.
    pub async fn ensure(&self, client: &reqwest::Client) -> Result<PathBuf> {
        match self.state() {
            ScriptState::Present(path) => {
                tracing::debug!("Using cached install script at {}", path.display());
                Ok(path)
            }
            ScriptState::Absent => {
                tracing::info!("Install script not found at {}", self.path.display());
                download_file(client, &self.url, &self.path)
                    .await
                    .context("Could not download the .NET install script")?;
                Ok(self.path.clone())
            }
        }
    }
}

/// Installs channels by running the install script once per target.
#[derive(Debug, Clone)]
pub struct ScriptInstaller {
    script: PathBuf,
    dotnet_root: PathBuf,
}

impl ScriptInstaller {
    pub fn new(script: PathBuf, dotnet_root: PathBuf) -> Self {
        Self {
            script,
            dotnet_root,
        }
    }

    pub fn command(&self, target: &SyncTarget) -> Result<Command, DotnetmanError> {
        let mut cmd = Command::new("bash");
        cmd.arg(&self.script)
            .arg("--channel")
            .arg(&target.channel)
            .arg("--install-dir")
            .arg(&self.dotnet_root);

        if let InstallKind::Runtime(family) = target.kind {
            let flag = family.install_flag().ok_or_else(|| {
                DotnetmanError::Validation(format!(
                    "the install script cannot install {} runtimes",
                    family.dir_name()
                ))
            })?;
            cmd.arg("--runtime").arg(flag);
        }

        cmd.env(DOTNET_ROOT_ENV, &self.dotnet_root);
        Ok(cmd)
    }
}

impl ChannelInstaller for ScriptInstaller {
    fn install(&self, target: &SyncTarget) -> Result<()> {
        let mut cmd = self.command(target)?;
        tracing::debug!("Executing: {:?}", cmd);

        let status = cmd
            .status()
            .with_context(|| format!("Could not start install script for {}", target))?;

        if !status.success() {
            return Err(DotnetmanError::Subprocess {
                command: format!("install script for {}", target),
                status: status.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolAction {
    Install,
    Update,
}

impl ToolAction {
    fn verb(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Update => "update",
        }
    }
}

/// The `dotnet` host inside the managed root, falling back to whatever is on `PATH`.
pub fn dotnet_executable(dotnet_root: &Path) -> PathBuf {
    let bundled = dotnet_root.join(if cfg!(windows) { "dotnet.exe" } else { "dotnet" });
    if bundled.is_file() {
        bundled
    } else {
        PathBuf::from("dotnet")
    }
}

pub fn global_tool_command(settings: &Settings, action: ToolAction, package: &str) -> Command {
    let mut cmd = Command::new(dotnet_executable(&settings.dotnet_root));
    cmd.args(["tool", action.verb(), "--global", package])
        .env(DOTNET_ROOT_ENV, &settings.dotnet_root);
    cmd
}

pub fn run_global_tool(settings: &Settings, action: ToolAction, package: &str) -> Result<()> {
    let mut cmd = global_tool_command(settings, action, package);
    tracing::debug!("Executing: {:?}", cmd);

    let status = cmd
        .status()
        .with_context(|| format!("Could not run 'dotnet tool {}'. Is .NET installed?", action.verb()))?;

    if !status.success() {
        return Err(DotnetmanError::Subprocess {
            command: format!("dotnet tool {} {}", action.verb(), package),
            status: status.to_string(),
        }
        .into());
    }

    tracing::info!("dotnet tool {} {} finished", action.verb(), package);
    Ok(())
}
