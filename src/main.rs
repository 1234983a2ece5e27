//! Rolling Token CLI - generate and verify rolling shared-secret tokens.

use std::env;
use std::process::ExitCode;

use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rolling_token::config::Settings;
use rolling_token::{parse_bearer, TokenResult};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");
const DEFAULT_CONFIG_PATH: &str = "/etc/rolling-token/config.toml";

/// Subcommand selected on the command line.
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Generate { offset: i64, json: bool },
    Verify { token: String },
}

fn main() -> ExitCode {
    // Parse command line arguments (simple std::env approach)
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{} {}", NAME, VERSION);
        return ExitCode::SUCCESS;
    }

    let action = match parse_action(&args) {
        Ok(action) => action,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Run '{} --help' for usage.", NAME);
            return ExitCode::from(2);
        }
    };

    let config_path = get_config_path(&args);

    let settings = match Settings::load(&config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&settings) {
        eprintln!("Error initializing logging: {}", e);
        return ExitCode::FAILURE;
    }

    debug!("Configuration loaded from: {}", config_path);
    debug!(
        interval_seconds = settings.token.interval_seconds,
        tolerance = settings.token.tolerance,
        "Token settings"
    );

    match run(&settings, action) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Execute the selected action.
fn run(settings: &Settings, action: Action) -> TokenResult<ExitCode> {
    match action {
        Action::Generate { offset, json } => {
            let token = settings.generator()?.generate(offset);
            info!(bucket = token.bucket, "Generated token");
            if json {
                println!("{}", serde_json::to_string(&token)?);
            } else {
                println!("{}", token);
            }
            Ok(ExitCode::SUCCESS)
        }
        Action::Verify { token } => {
            // Accept either a bare token or a full "Bearer <token>" header value
            let candidate = parse_bearer(&token).unwrap_or(token.trim());
            let mut validator = settings.validator()?;
            if validator.is_valid(candidate) {
                info!("Token accepted");
                println!("valid");
                Ok(ExitCode::SUCCESS)
            } else {
                warn!("Token rejected");
                println!("invalid");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

/// Parse the subcommand and its arguments.
fn parse_action(args: &[String]) -> Result<Action, String> {
    let mut positional = Vec::new();
    let mut offset = 0i64;
    let mut json = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                iter.next();
            }
            "--offset" | "-o" => {
                let value = iter.next().ok_or("--offset requires a value")?;
                offset = parse_offset(value)?;
            }
            "--json" => json = true,
            _ if arg.starts_with("--config=") => {}
            _ if arg.starts_with("--offset=") => {
                offset = parse_offset(&arg["--offset=".len()..])?;
            }
            _ => positional.push(arg.as_str()),
        }
    }

    match positional.as_slice() {
        ["generate"] => Ok(Action::Generate { offset, json }),
        ["verify", token] => Ok(Action::Verify {
            token: token.to_string(),
        }),
        ["verify"] => Err("verify requires a token".to_string()),
        [] => Err("missing command".to_string()),
        [other, ..] => Err(format!("unexpected argument '{}'", other)),
    }
}

fn parse_offset(value: &str) -> Result<i64, String> {
    value
        .parse()
        .map_err(|_| format!("invalid offset '{}', expected an integer", value))
}

/// Print help message.
fn print_help() {
    println!(
        r#"{} {}
Generate and verify rolling shared-secret tokens.

USAGE:
    {} [OPTIONS] generate [--offset <N>] [--json]
    {} [OPTIONS] verify <TOKEN>

COMMANDS:
    generate               Print the token for the current bucket
    verify <TOKEN>         Exit 0 if TOKEN (or "Bearer TOKEN") is valid now

OPTIONS:
    -c, --config <PATH>    Path to configuration file
                           [default: {}]
    -o, --offset <N>       Buckets to shift from now (negative is past)
        --json             Print the token and its bucket as JSON
    -h, --help             Print help information
    -V, --version          Print version information
"#,
        NAME, VERSION, NAME, NAME, DEFAULT_CONFIG_PATH
    );
}

/// Get configuration file path from command line arguments.
fn get_config_path(args: &[String]) -> String {
    for (i, arg) in args.iter().enumerate() {
        if (arg == "--config" || arg == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        }
    }
    DEFAULT_CONFIG_PATH.to_string()
}

/// Initialize logging based on settings.
///
/// Logs go to stderr so stdout only carries command output.
fn init_logging(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    match settings.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}
