mod cli;
mod config;
mod download;
mod error;
mod install;
mod lifecycle;
mod output;
mod scanner;
mod sync;
mod types;
mod version;


use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, InstallTarget, ListTarget, OutputArgs, UpdateTarget};
use config::Settings;
use download::http_client;
use install::{
    run_global_tool, ChannelInstaller, InstallScript, ScriptInstaller, ToolAction, POWERSHELL_TOOL,
};
use output::{Listing, PropertyOptions};
use sync::SyncRequest;
use types::SyncTarget;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli)?;

    match cli.command {
        Commands::Version => {
            println!("dotnetman v{}", env!("CARGO_PKG_VERSION"));
        }

        Commands::List {
            target,
            display,
            no_lifecycle,
        } => {
            let settings = Settings::from_env()?;
            list(&settings, target, &display, !no_lifecycle).await?;
        }

        Commands::Sync {
            target,
            channels,
            file,
        } => {
            let settings = Settings::from_env()?;
            let request = SyncRequest {
                scope: target,
                channels,
                file,
            };
            synchronize(&settings, &request).await?;
        }

        Commands::Install { what } => {
            let settings = Settings::from_env()?;
            match what {
                InstallTarget::Dotnet { channel } => {
                    let installer = script_installer(&settings).await?;
                    let target = SyncTarget::sdk(channel);
                    tracing::info!("Installing .NET {}...", target);
                    installer.install(&target)?;
                }
                InstallTarget::Pwsh => {
                    run_global_tool(&settings, ToolAction::Install, POWERSHELL_TOOL)?;
                }
            }
        }

        Commands::Update { what } => {
            let settings = Settings::from_env()?;
            match what {
                UpdateTarget::Pwsh => {
                    run_global_tool(&settings, ToolAction::Update, POWERSHELL_TOOL)?;
                }
            }
        }
    }

    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.quiet {
        "error"
    } else if cli.verbose == 0 {
        "warn"
    } else if cli.verbose == 1 {
        "info"
    } else {
        "debug"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}

async fn list(
    settings: &Settings,
    target: Option<ListTarget>,
    display: &OutputArgs,
    with_lifecycle: bool,
) -> Result<()> {
    let want_sdks = target != Some(ListTarget::Runtime);
    let want_runtimes = target != Some(ListTarget::Sdk);

    let mut sdks = if want_sdks {
        scanner::scan_sdks(&settings.dotnet_root)?
    } else {
        Vec::new()
    };
    let mut runtimes = if want_runtimes {
        scanner::scan_runtimes(&settings.dotnet_root)?
    } else {
        Vec::new()
    };

    if with_lifecycle && !(sdks.is_empty() && runtimes.is_empty()) {
        let client = http_client()?;
        let schedule = lifecycle::fetch_schedule(&client, &settings.lifecycle_url).await?;
        lifecycle::attach_to_sdks(&mut sdks, &schedule);
        lifecycle::attach_to_runtimes(&mut runtimes, &schedule);
    }

    let listing = match target {
        Some(ListTarget::Sdk) => Listing::Sdks(sdks),
        Some(ListTarget::Runtime) => Listing::Runtimes(runtimes),
        None => Listing::All { sdks, runtimes },
    };

    let format = display
        .output
        .or(settings.list_preference)
        .unwrap_or_default();
    let options = PropertyOptions {
        paths: display.properties.clone(),
        exclude_empty: display.exclude_empty,
    };

    print!("{}", output::render(&listing, format, &options)?);
    Ok(())
}

async fn synchronize(settings: &Settings, request: &SyncRequest) -> Result<()> {
    let plan = sync::plan(request, settings)?;
    if plan.is_empty() {
        eprintln!("Nothing to synchronize.");
        return Ok(());
    }

    tracing::info!("Synchronizing {} channel(s)", plan.len());
    let installer = script_installer(settings).await?;
    let summary = sync::execute(&plan, &installer)?;

    eprintln!(
        "{} {} channel(s) synchronized.",
        console::style("Done.").green(),
        summary.installed.len()
    );
    Ok(())
}

async fn script_installer(settings: &Settings) -> Result<ScriptInstaller> {
    let client = http_client()?;
    let script = InstallScript::new(settings).ensure(&client).await?;
    Ok(ScriptInstaller::new(script, settings.dotnet_root.clone()))
}
