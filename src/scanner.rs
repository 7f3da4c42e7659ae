use crate::types::{RuntimeFamily, RuntimeRecord, SdkRecord, VersionRecord};
use crate::version::parse_version;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const SDK_DIR_NAME: &str = "sdk";
pub const SHARED_DIR_NAME: &str = "shared";

/// Runtime roots under `shared/`, in the order their results are reported.
pub const RUNTIME_FAMILIES: [RuntimeFamily; 4] = [
    RuntimeFamily::CoreRuntime,
    RuntimeFamily::AspNetCoreAll,
    RuntimeFamily::AspNetCoreApp,
    RuntimeFamily::WindowsDesktopApp,
];

pub fn scan_sdks(dotnet_root: &Path) -> Result<Vec<SdkRecord>> {
    let sdk_root = dotnet_root.join(SDK_DIR_NAME);
    let records = list_versions(&sdk_root)?
        .into_iter()
        .map(|(version, path)| SdkRecord { version, path })
        .collect::<Vec<_>>();

    tracing::debug!("Found {} SDK(s) under {}", records.len(), sdk_root.display());
    Ok(records)
}

pub fn scan_runtimes(dotnet_root: &Path) -> Result<Vec<RuntimeRecord>> {
    let shared_root = dotnet_root.join(SHARED_DIR_NAME);
    let mut records = Vec::new();

    for family in RUNTIME_FAMILIES {
        let family_root = shared_root.join(family.dir_name());
        let found = list_versions(&family_root)?;
        tracing::debug!(
            "Found {} runtime(s) under {}",
            found.len(),
            family_root.display()
        );
        records.extend(found.into_iter().map(|(version, path)| RuntimeRecord {
            family,
            version,
            path,
        }));
    }

    Ok(records)
}

/// Versioned subdirectories of `root`, oldest first. A missing root yields nothing.
fn list_versions(root: &Path) -> Result<Vec<(VersionRecord, PathBuf)>> {
    if !root.is_dir() {
        tracing::debug!("{} does not exist, skipping", root.display());
        return Ok(Vec::new());
    }

    let mut versions = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Could not read {}", root.display()))?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        match parse_version(&name) {
            Ok(version) => versions.push((version, entry.path().to_path_buf())),
            Err(e) => tracing::warn!("Skipping {}: {}", entry.path().display(), e),
        }
    }

    versions.sort_by_key(|(version, _)| version.triple());
    Ok(versions)
}
