//! Command-line and environment configuration for the `larisa` binary.
//!
//! Every setting can come from a flag or its environment variable; a `.env`
//! file in the working directory is loaded before parsing.

use clap::Parser;

use larisa_core::chat::session::DEFAULT_HISTORY_WINDOW;
use larisa_core::relay::config::DEFAULT_MODEL;
use larisa_infra::llm::openrouter::DEFAULT_BASE_URL;

/// Telegram bot that relays questions to an OpenRouter model.
#[derive(Parser)]
#[command(name = "larisa", version, about, long_about = None)]
pub struct Cli {
    /// Telegram bot token from @BotFather.
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub telegram_token: String,

    /// OpenRouter API key.
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Model id requested from OpenRouter.
    #[arg(long, env = "MODEL_NAME", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// OpenRouter API base URL.
    #[arg(long, env = "OPENROUTER_API_BASE", default_value = DEFAULT_BASE_URL)]
    pub api_base: String,

    /// Number of most recent turns sent as context.
    #[arg(long, env = "HISTORY_WINDOW", default_value_t = DEFAULT_HISTORY_WINDOW)]
    pub history_window: usize,

    /// Completion request timeout in seconds.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long)]
    pub otel: bool,

    /// Suppress all log output except errors.
    #[arg(long)]
    pub quiet: bool,

    /// Detailed output (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default log filter implied by `--quiet` / `-v`.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["larisa", "--telegram-token", "1:abc", "--api-key", "sk-or"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.model, "deepseek/deepseek-chat-v3.1:free");
        assert_eq!(cli.api_base, "https://openrouter.ai/api/v1");
        assert_eq!(cli.history_window, 10);
        assert_eq!(cli.request_timeout_secs, 30);
        assert!(!cli.otel);
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["--quiet"]).log_filter(), "error");
        assert_eq!(parse(&["-v"]).log_filter(), "info");
        assert_eq!(parse(&["-vv"]).log_filter(), "debug");
        assert_eq!(parse(&["-vvv"]).log_filter(), "trace");
    }

    #[test]
    fn test_overrides() {
        let cli = parse(&[
            "--model",
            "openai/gpt-4o-mini",
            "--history-window",
            "4",
            "--request-timeout-secs",
            "60",
        ]);
        assert_eq!(cli.model, "openai/gpt-4o-mini");
        assert_eq!(cli.history_window, 4);
        assert_eq!(cli.request_timeout_secs, 60);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }
}
