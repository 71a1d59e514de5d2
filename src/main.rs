use color_eyre::eyre::{Result, WrapErr, eyre};
use lottery_picker::GameFilter;
use std::path::{Path, PathBuf};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt};

mod controller;
mod ui;

fn print_usage_and_exit() -> ! {
    println!(
        "Usage: lottery-picker [--data-dir <path>] [--log-dir <path>]\n\
         [--filter all|lotomania|lotofacil] [--import-legacy]\n\
         \n\
         Flags:\n\
           --data-dir <path>   Where bet history is stored (default {})\n\
           --log-dir <path>    Where log files are written (default <data-dir>/logs)\n\
           --filter <game>     Initial history filter\n\
           --import-legacy     Import the old Lotomania-only history before starting",
        controller::DEFAULT_DATA_DIR,
    );
    std::process::exit(0);
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

fn parse_cli_args(args: impl IntoIterator<Item = String>) -> Result<controller::AppConfig> {
    let mut args = args.into_iter();
    let mut data_dir: Option<String> = None;
    let mut log_dir: Option<String> = None;
    let mut filter: Option<GameFilter> = None;
    let mut import_legacy = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data-dir" => {
                let dir = args
                    .next()
                    .ok_or_else(|| eyre!("--data-dir requires a path argument"))?;
                if data_dir.is_some() {
                    return Err(eyre!("--data-dir may only be specified once"));
                }
                data_dir = Some(dir);
            }
            "--log-dir" => {
                let dir = args
                    .next()
                    .ok_or_else(|| eyre!("--log-dir requires a path argument"))?;
                if log_dir.is_some() {
                    return Err(eyre!("--log-dir may only be specified once"));
                }
                log_dir = Some(dir);
            }
            "--filter" => {
                let value = args
                    .next()
                    .ok_or_else(|| eyre!("--filter requires all, lotomania or lotofacil"))?;
                if filter.is_some() {
                    return Err(eyre!("--filter may only be specified once"));
                }
                filter = Some(value.parse().map_err(|e: String| eyre!(e))?);
            }
            "--import-legacy" => import_legacy = true,
            "--help" | "-h" => print_usage_and_exit(),
            other => return Err(eyre!("Unknown argument: {other}")),
        }
    }

    let data_dir = expand_path(data_dir.as_deref().unwrap_or(controller::DEFAULT_DATA_DIR));
    let log_dir = match log_dir {
        Some(dir) => expand_path(&dir),
        None => data_dir.join("logs"),
    };

    Ok(controller::AppConfig {
        data_dir,
        log_dir,
        filter: filter.unwrap_or_default(),
        import_legacy,
    })
}

/// Logs go to a daily rolling file; the terminal belongs to the UI.
fn init_tracing(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)
        .wrap_err_with(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let appender = rolling::daily(log_dir, "lottery-picker.log");
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(appender)
        .with_ansi(false)
        .try_init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let app_config = parse_cli_args(std::env::args().skip(1))?;
    init_tracing(&app_config.log_dir)?;
    tracing::info!("starting lottery-picker");
    controller::run_app(app_config).await
}
