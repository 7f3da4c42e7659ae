use crate::error::DotnetmanError;
use crate::types::VersionRecord;

/// Parse an installation directory name such as `8.0.101` into a version record.
///
/// Only the first three dot-separated components count. The third keeps its
/// leading digits, so pre-release suffixes (`9.0.100-preview.1.24101.2`) are
/// dropped and a fourth component (`8.0.100.1`) is ignored.
pub fn parse_version(name: &str) -> Result<VersionRecord, DotnetmanError> {
    let invalid = || DotnetmanError::Parse(name.to_string());

    let mut parts = name.trim().split('.');
    let (Some(major), Some(minor), Some(patch)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    let patch_digits = patch
        .find(|c: char| !c.is_ascii_digit())
        .map_or(patch, |end| &patch[..end]);

    Ok(VersionRecord::new(
        number(major).ok_or_else(invalid)?,
        number(minor).ok_or_else(invalid)?,
        number(patch_digits).ok_or_else(invalid)?,
    ))
}

fn number(component: &str) -> Option<u64> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    component.parse().ok()
}

/// The `major.minor` update track a version belongs to.
pub fn channel_of(record: &VersionRecord) -> String {
    format!("{}.{}", record.major, record.minor)
}
