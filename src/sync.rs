use crate::config::{load_version_config, Settings};
use crate::install::ChannelInstaller;
use crate::scanner::{scan_runtimes, scan_sdks};
use crate::types::{RuntimeFamily, SyncTarget};
use crate::version::channel_of;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SyncScope {
    #[default]
    All,
    Sdk,
    Runtime,
}

impl SyncScope {
    fn includes_sdk(self) -> bool {
        matches!(self, Self::All | Self::Sdk)
    }

    fn includes_runtime(self) -> bool {
        matches!(self, Self::All | Self::Runtime)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncRequest {
    pub scope: SyncScope,
    pub channels: Vec<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub installed: Vec<SyncTarget>,
}

/// Work out which channels to install, without touching the network or spawning anything.
pub fn plan(request: &SyncRequest, settings: &Settings) -> Result<Vec<SyncTarget>> {
    let mut targets = Vec::new();

    if let Some(file) = &request.file {
        let config = load_version_config(file)?;
        tracing::info!(
            "Loaded {} SDK and {} runtime channel(s) from {}",
            config.sdk_channels.len(),
            config.runtime_channels.len(),
            file.display()
        );
        targets.extend(config.sdk_channels.iter().map(SyncTarget::sdk));
        targets.extend(
            config
                .runtime_channels
                .iter()
                .map(|c| SyncTarget::runtime(RuntimeFamily::CoreRuntime, c)),
        );
        return Ok(dedup(targets));
    }

    if request.scope.includes_sdk() {
        if request.channels.is_empty() {
            let sdks = scan_sdks(&settings.dotnet_root).context("Could not scan installed SDKs")?;
            targets.extend(sdks.iter().map(|sdk| SyncTarget::sdk(channel_of(&sdk.version))));
        } else {
            targets.extend(request.channels.iter().map(SyncTarget::sdk));
        }
    }

    if request.scope.includes_runtime() {
        if request.channels.is_empty() {
            let runtimes =
                scan_runtimes(&settings.dotnet_root).context("Could not scan installed runtimes")?;
            for runtime in &runtimes {
                if runtime.family.install_flag().is_none() {
                    tracing::warn!(
                        "Skipping {} {}: the install script cannot install this runtime",
                        runtime.family.dir_name(),
                        runtime.version
                    );
                    continue;
                }
                targets.push(SyncTarget::runtime(runtime.family, channel_of(&runtime.version)));
            }
        } else {
            targets.extend(
                request
                    .channels
                    .iter()
                    .map(|c| SyncTarget::runtime(RuntimeFamily::CoreRuntime, c)),
            );
        }
    }

    Ok(dedup(targets))
}

/// Keeps the first occurrence of every target.
/// Runtime targets compare by family too: `dotnet 8.0` and `aspnetcore 8.0`
/// are separate installs and both are kept.
fn dedup(targets: Vec<SyncTarget>) -> Vec<SyncTarget> {
    let mut seen = HashSet::new();
    targets
        .into_iter()
        .filter(|target| seen.insert(target.clone()))
        .collect()
}

/// Install every target in order, stopping at the first failure.
pub fn execute<I: ChannelInstaller>(plan: &[SyncTarget], installer: &I) -> Result<SyncSummary> {
    let mut summary = SyncSummary::default();

    for (index, target) in plan.iter().enumerate() {
        eprintln!(
            "{} Synchronizing {}...",
            console::style(format!("[{}/{}]", index + 1, plan.len())).cyan(),
            target
        );

        installer.install(target).with_context(|| {
            format!(
                "Failed to synchronize {} ({} of {} completed)",
                target,
                summary.installed.len(),
                plan.len()
            )
        })?;

        tracing::info!("{} synchronized", target);
        summary.installed.push(target.clone());
    }

    Ok(summary)
}
