mod common;

use common::{CommandOutput, TestContext};

#[test]
#[cfg(feature = "e2e")]
fn e2e_list_with_lifecycle() {
    let ctx = TestContext::new();
    ctx.install_dirs(&["sdk/8.0.101"]);

    // Example: dotnetman list sdk -o json
    let output: CommandOutput = ctx
        .cmd()
        .env_remove("DOTNETMAN_LIFECYCLE_URL")
        .args(["list", "sdk", "-o", "json"])
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output.assert_success();
    let sdks: serde_json::Value =
        serde_json::from_str(&output.stdout).expect("Output was not valid JSON");
    assert_eq!(sdks[0]["lifecycle"]["cycle"], "8.0");
    assert_eq!(sdks[0]["lifecycle"]["lts"], true);
}

#[test]
#[cfg(feature = "e2e")]
fn e2e_lifecycle_projection() {
    let ctx = TestContext::new();
    ctx.install_dirs(&["sdk/8.0.101", "shared/Microsoft.NETCore.App/8.0.1"]);

    // Example: dotnetman list -p /lifecycle/eol --exclude-empty
    let output: CommandOutput = ctx
        .cmd()
        .env_remove("DOTNETMAN_LIFECYCLE_URL")
        .args(["list", "-p", "/lifecycle/eol", "--exclude-empty"])
        .output()
        .expect("Failed to run dotnetman")
        .into();

    output.assert_success().assert_stdout_contains("eol\n");
}
