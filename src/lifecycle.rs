use crate::error::DotnetmanError;
use crate::types::{LifecycleEntry, RuntimeRecord, SdkRecord, VersionRecord};
use anyhow::Result;

pub async fn fetch_schedule(client: &reqwest::Client, url: &str) -> Result<Vec<LifecycleEntry>> {
    tracing::debug!("Fetching .NET lifecycle schedule from: {}", url);

    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| DotnetmanError::network(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DotnetmanError::network(url, format!("status {}", status)).into());
    }

    let schedule: Vec<LifecycleEntry> = response
        .json()
        .await
        .map_err(|e| DotnetmanError::network(url, format!("unexpected response body: {}", e)))?;

    tracing::info!("Fetched {} lifecycle cycle(s)", schedule.len());
    Ok(schedule)
}

/// First cycle whose leading component equals `major` (`8` matches `8.0`).
pub fn match_lifecycle(major: u64, schedule: &[LifecycleEntry]) -> Option<&LifecycleEntry> {
    let major = major.to_string();
    schedule
        .iter()
        .find(|entry| entry.cycle.split('.').next() == Some(major.as_str()))
}

fn attach(version: &mut VersionRecord, schedule: &[LifecycleEntry]) {
    version.lifecycle = match_lifecycle(version.major, schedule).cloned();
    if version.lifecycle.is_none() {
        tracing::debug!("No lifecycle entry for {}", version);
    }
}

pub fn attach_to_sdks(sdks: &mut [SdkRecord], schedule: &[LifecycleEntry]) {
    for sdk in sdks {
        attach(&mut sdk.version, schedule);
    }
}

pub fn attach_to_runtimes(runtimes: &mut [RuntimeRecord], schedule: &[LifecycleEntry]) {
    for runtime in runtimes {
        attach(&mut runtime.version, schedule);
    }
}
