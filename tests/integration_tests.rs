mod common;

use common::{CommandOutput, TestContext};

#[test]
fn test_help_and_version() {
    let ctx = TestContext::new();

    let output: CommandOutput = ctx
        .cmd()
        .arg("--help")
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output
        .assert_success()
        .assert_stdout_contains("A CLI manager for .NET SDK and runtime installations")
        .assert_stdout_contains("Usage: dotnetman");

    let output: CommandOutput = ctx
        .cmd()
        .arg("version")
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output.assert_success().assert_stdout_contains("dotnetman");
}

#[test]
fn test_missing_home_is_an_error() {
    let ctx = TestContext::new();

    let output: CommandOutput = ctx
        .cmd()
        .env_remove("HOME")
        .args(["list", "--no-lifecycle"])
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output.assert_failure().assert_stderr_contains("HOME");
}

#[test]
fn test_list_sdks_as_json() {
    let ctx = TestContext::new();
    ctx.install_dirs(&["sdk/8.0.101", "sdk/6.0.200", "sdk/not-a-version"]);

    let output: CommandOutput = ctx
        .cmd()
        .args(["list", "sdk", "--no-lifecycle", "--output", "json"])
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output.assert_success();
    let sdks: serde_json::Value =
        serde_json::from_str(&output.stdout).expect("Output was not valid JSON");
    let sdks = sdks.as_array().expect("Expected a JSON array");
    assert_eq!(sdks.len(), 2);
    assert_eq!(sdks[0]["major"], 6);
    assert_eq!(sdks[1]["patch"], 101);
    assert!(sdks[1].get("lifecycle").is_none());
}

#[test]
fn test_list_uses_list_preference() {
    let ctx = TestContext::new();
    ctx.install_dirs(&["sdk/8.0.101", "shared/Microsoft.NETCore.App/8.0.1"]);

    let output: CommandOutput = ctx
        .cmd()
        .env("LIST_PREFERENCE", "yaml")
        .args(["list", "--no-lifecycle"])
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output.assert_success();
    let listing: serde_yaml::Value =
        serde_yaml::from_str(&output.stdout).expect("Output was not valid YAML");
    assert_eq!(listing["sdks"][0]["minor"].as_u64(), Some(0));
    assert_eq!(
        listing["runtimes"][0]["family"].as_str(),
        Some("Microsoft.NETCore.App")
    );
}

#[test]
fn test_list_runtime_properties_as_tsv() {
    let ctx = TestContext::new();
    ctx.install_dirs(&[
        "shared/Microsoft.AspNetCore.App/8.0.1",
        "shared/Microsoft.NETCore.App/6.0.25",
    ]);

    let output: CommandOutput = ctx
        .cmd()
        .args(["ls", "runtime", "--no-lifecycle", "-p", "/family", "-p", "/major"])
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output.assert_success();
    assert_eq!(
        output.stdout,
        "family\tmajor\nMicrosoft.NETCore.App\t6\nMicrosoft.AspNetCore.App\t8\n"
    );
}

#[test]
fn test_list_lifecycle_failure_is_reported() {
    let ctx = TestContext::new();
    ctx.install_dirs(&["sdk/8.0.101"]);

    let output: CommandOutput = ctx
        .cmd()
        .args(["list", "sdk"])
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output
        .assert_failure()
        .assert_stderr_contains("127.0.0.1:9");
}

#[test]
fn test_sync_nothing_installed_does_nothing() {
    let ctx = TestContext::new();

    let output: CommandOutput = ctx
        .cmd()
        .arg("sync")
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output
        .assert_success()
        .assert_stderr_contains("Nothing to synchronize");
    assert!(!ctx.script_path.exists());
}

#[cfg(unix)]
#[test]
fn test_sync_sdk_channel_runs_installer_once() {
    let ctx = TestContext::new();
    ctx.fake_install_script(0);

    let output: CommandOutput = ctx
        .cmd()
        .args(["sync", "sdk", "--channel", "8.0"])
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output.assert_success();
    let root = ctx.dotnet_root.display().to_string();
    assert_eq!(
        ctx.install_log(),
        vec![format!(
            "DOTNET_ROOT={} --channel 8.0 --install-dir {}",
            root, root
        )]
    );
}

#[cfg(unix)]
#[test]
fn test_sync_all_installed_channels() {
    let ctx = TestContext::new();
    ctx.fake_install_script(0);
    ctx.install_dirs(&[
        "sdk/6.0.100",
        "sdk/6.0.200",
        "sdk/8.0.101",
        "shared/Microsoft.NETCore.App/8.0.1",
    ]);

    let output: CommandOutput = ctx
        .cmd()
        .arg("sync")
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output.assert_success();
    let log = ctx.install_log();
    assert_eq!(log.len(), 3, "unexpected installs: {:?}", log);
    assert!(log[0].contains("--channel 6.0 "));
    assert!(log[1].contains("--channel 8.0 "));
    assert!(!log[1].contains("--runtime"));
    assert!(log[2].ends_with("--runtime dotnet"));
}

#[cfg(unix)]
#[test]
fn test_install_dotnet_channel_installs_sdk() {
    let ctx = TestContext::new();
    ctx.fake_install_script(0);

    let output: CommandOutput = ctx
        .cmd()
        .args(["install", "dotnet", "--channel", "8.0"])
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output.assert_success();
    let root = ctx.dotnet_root.display().to_string();
    assert_eq!(
        ctx.install_log(),
        vec![format!(
            "DOTNET_ROOT={} --channel 8.0 --install-dir {}",
            root, root
        )]
    );
}

#[cfg(unix)]
#[test]
fn test_sync_skips_windows_desktop_runtime() {
    let ctx = TestContext::new();
    ctx.fake_install_script(0);
    ctx.install_dirs(&[
        "shared/Microsoft.WindowsDesktop.App/8.0.1",
        "shared/Microsoft.NETCore.App/8.0.1",
    ]);

    let output: CommandOutput = ctx
        .cmd()
        .args(["sync", "runtime"])
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output
        .assert_success()
        .assert_stderr_contains("Microsoft.WindowsDesktop.App");
    let log = ctx.install_log();
    assert_eq!(log.len(), 1, "unexpected installs: {:?}", log);
    assert!(log[0].ends_with("--runtime dotnet"));
}

#[cfg(unix)]
#[test]
fn test_sync_stops_when_installer_fails() {
    let ctx = TestContext::new();
    ctx.fake_install_script(1);

    let output: CommandOutput = ctx
        .cmd()
        .args(["sync", "sdk", "--channel", "6.0", "--channel", "8.0"])
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output.assert_failure().assert_stderr_contains("SDK 6.0");
    assert_eq!(ctx.install_log().len(), 1);
}

#[cfg(unix)]
#[test]
fn test_sync_file_installs_listed_channels() {
    let ctx = TestContext::new();
    ctx.fake_install_script(0);
    let file = ctx.write_file(
        "dotnet.json",
        r#"{"version": "1.0", "sdkChannels": ["8.0"], "runtimeChannels": ["6.0"]}"#,
    );

    let output: CommandOutput = ctx
        .cmd()
        .arg("sync")
        .arg("--file")
        .arg(&file)
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output.assert_success();
    let log = ctx.install_log();
    assert_eq!(log.len(), 2);
    assert!(log[0].contains("--channel 8.0 "));
    assert!(log[1].contains("--channel 6.0 ") && log[1].ends_with("--runtime dotnet"));
}

#[test]
fn test_sync_file_rejects_unsupported_schema() {
    let ctx = TestContext::new();
    ctx.fake_install_script(0);
    let file = ctx.write_file("dotnet.json", r#"{"version": "2.0", "sdkChannels": ["8.0"]}"#);

    let output: CommandOutput = ctx
        .cmd()
        .arg("sync")
        .arg("--file")
        .arg(&file)
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output
        .assert_failure()
        .assert_stderr_contains("schema version 2.0 is not supported");
    assert!(ctx.install_log().is_empty());
}

#[test]
fn test_sync_file_requires_version() {
    let ctx = TestContext::new();
    ctx.fake_install_script(0);
    let file = ctx.write_file("dotnet.json", r#"{"sdkChannels": ["8.0"]}"#);

    let output: CommandOutput = ctx
        .cmd()
        .arg("sync")
        .arg("--file")
        .arg(&file)
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output
        .assert_failure()
        .assert_stderr_contains("missing 'version' field");
    assert!(ctx.install_log().is_empty());
}

#[test]
fn test_sync_file_conflicts_with_channel() {
    let ctx = TestContext::new();
    let file = ctx.write_file("dotnet.json", r#"{"version": "1.0"}"#);

    let output: CommandOutput = ctx
        .cmd()
        .arg("sync")
        .arg("--file")
        .arg(&file)
        .args(["--channel", "8.0"])
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output.assert_failure().assert_stderr_contains("cannot be used with");
}
