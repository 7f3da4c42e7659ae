use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VersionRecord {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<LifecycleEntry>,
}

impl VersionRecord {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            lifecycle: None,
        }
    }

    pub fn triple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }
}

impl fmt::Display for VersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SdkRecord {
    #[serde(flatten)]
    pub version: VersionRecord,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum RuntimeFamily {
    #[serde(rename = "Microsoft.NETCore.App")]
    CoreRuntime,
    #[serde(rename = "Microsoft.AspNetCore.All")]
    AspNetCoreAll,
    #[serde(rename = "Microsoft.AspNetCore.App")]
    AspNetCoreApp,
    #[serde(rename = "Microsoft.WindowsDesktop.App")]
    WindowsDesktopApp,
}

impl RuntimeFamily {
    /// Directory under `shared/` holding this family's versions.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::CoreRuntime => "Microsoft.NETCore.App",
            Self::AspNetCoreAll => "Microsoft.AspNetCore.All",
            Self::AspNetCoreApp => "Microsoft.AspNetCore.App",
            Self::WindowsDesktopApp => "Microsoft.WindowsDesktop.App",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Self::CoreRuntime => "dotnet",
            Self::AspNetCoreAll | Self::AspNetCoreApp => "aspnetcore",
            Self::WindowsDesktopApp => "windowsdesktop",
        }
    }

    /// Value passed to the install script's `--runtime` option.
    /// `dotnet-install.sh` only knows `dotnet` and `aspnetcore`.
    pub fn install_flag(self) -> Option<&'static str> {
        match self {
            Self::WindowsDesktopApp => None,
            other => Some(other.short_name()),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RuntimeRecord {
    pub family: RuntimeFamily,
    #[serde(flatten)]
    pub version: VersionRecord,
    pub path: PathBuf,
}

/// One cycle of the endoflife.date schedule for .NET.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleEntry {
    pub cycle: String,
    pub release_date: NaiveDate,
    #[serde(default, deserialize_with = "date_or_flag")]
    pub eol: Option<NaiveDate>,
    #[serde(rename = "lts")]
    pub is_lts: bool,
    #[serde(rename = "latest")]
    pub latest_patch: String,
    #[serde(default)]
    pub latest_release_date: Option<NaiveDate>,
}

// endoflife.date sends either a date or `false` for cycles without an EOL date.
fn date_or_flag<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DateOrFlag {
        Date(NaiveDate),
        Flag(bool),
    }

    match Option::<DateOrFlag>::deserialize(deserializer)? {
        Some(DateOrFlag::Date(date)) => Ok(Some(date)),
        Some(DateOrFlag::Flag(_)) | None => Ok(None),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallKind {
    Sdk,
    Runtime(RuntimeFamily),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyncTarget {
    pub kind: InstallKind,
    pub channel: String,
}

impl SyncTarget {
    pub fn sdk(channel: impl Into<String>) -> Self {
        Self {
            kind: InstallKind::Sdk,
            channel: channel.into(),
        }
    }

    pub fn runtime(family: RuntimeFamily, channel: impl Into<String>) -> Self {
        Self {
            kind: InstallKind::Runtime(family),
            channel: channel.into(),
        }
    }
}

impl fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            InstallKind::Sdk => write!(f, "SDK {}", self.channel),
            InstallKind::Runtime(family) => {
                write!(f, "{} runtime {}", family.short_name(), self.channel)
            }
        }
    }
}

/// Declarative list of channels to synchronize, read from `sync --file`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VersionConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub sdk_channels: Vec<String>,
    #[serde(default)]
    pub runtime_channels: Vec<String>,
}
