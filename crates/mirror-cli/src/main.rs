// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use mirror_app::AppState;
use mirror_source::Client;
use runtime::{DEMO_RECORD_COUNT, DEMO_SEED, DemoRuntime, HttpRuntime};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `mirror --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    init_tracing(&config)?;

    let mut state = AppState::default();
    if options.demo {
        info!(seed = DEMO_SEED, "starting with demo records");
        if options.check_only {
            return Ok(());
        }
        let mut runtime = DemoRuntime::new(DEMO_SEED, DEMO_RECORD_COUNT);
        return mirror_tui::run_app(&mut state, &mut runtime);
    }

    let endpoint = match &options.endpoint {
        Some(endpoint) => endpoint.clone(),
        None => config.endpoint()?,
    };
    let client = Client::new(&endpoint, config.source_timeout()?).with_context(|| {
        format!(
            "invalid [source] config in {}; fix endpoint/timeout values or pass --endpoint",
            options.config_path.display()
        )
    })?;
    if options.check_only {
        return Ok(());
    }

    info!(
        endpoint = client.endpoint(),
        timeout_ms = client.timeout().as_millis() as u64,
        "starting"
    );
    let mut runtime = HttpRuntime::new(client);
    mirror_tui::run_app(&mut state, &mut runtime)
}

fn init_tracing(config: &Config) -> Result<()> {
    let log_path = config.log_path()?;
    if let Some(parent) = log_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level()))
        .context("build log filter; check RUST_LOG or [log].level")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    endpoint: Option<String>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        endpoint: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--endpoint" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--endpoint requires a URL"))?;
                mirror_source::parse_endpoint(value.as_ref()).context("invalid --endpoint")?;
                options.endpoint = Some(value.as_ref().trim().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("mirror: browse a remote record list in the terminal");
    println!("  --config <path>          Use a specific config path");
    println!("  --endpoint <url>         Fetch records from this URL for this run");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Launch with seeded fake records (no network)");
    println!("  --check                  Validate config and endpoint, then exit");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use anyhow::Result;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/mirror-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                endpoint: None,
                print_config_path: false,
                demo: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_config_value() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_sets_endpoint_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--endpoint", "http://127.0.0.1:8080/users"],
            default_options_path(),
        )?;
        assert_eq!(
            options.endpoint.as_deref(),
            Some("http://127.0.0.1:8080/users")
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_rejects_invalid_endpoint() {
        let error = parse_cli_args(vec!["--endpoint", "ftp://host/users"], default_options_path())
            .expect_err("ftp endpoint should fail");
        let message = format!("{error:#}");
        assert!(message.contains("invalid --endpoint"));
        assert!(message.contains("unsupported scheme"));

        let error = parse_cli_args(vec!["--endpoint"], default_options_path())
            .expect_err("missing endpoint value should fail");
        assert!(error.to_string().contains("--endpoint requires a URL"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_demo_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--print-config-path",
                "--print-example-config",
                "--demo",
                "--check",
            ],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.demo);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }
}
