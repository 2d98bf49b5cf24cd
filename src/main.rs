use anyhow::Context;
use clap::{Parser, ValueEnum};
use termin_booker::utils::error::ErrorSeverity;
use termin_booker::utils::logger;
use termin_booker::{
    BookingAttempt, BookingConfig, BookingError, RetryLoop, TokioSleeper, TomlConfig,
    WebDriverPage,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "termin-booker")]
#[command(about = "Polls a test station calendar and books the first slot in your time window")]
#[command(after_help = "Exit status: 0 after a booking (or a successful --dry-run), \
1 for configuration errors, 2 when the day is missing or the attempt cap is reached, \
3 for browser and system failures.")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "booking.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Show the browser window (overrides browser.show_ui)
    #[arg(long, conflicts_with = "headless")]
    show_ui: bool,

    /// Run the browser without a window (overrides browser.show_ui)
    #[arg(long)]
    headless: bool,

    /// WebDriver server URL (overrides browser.webdriver_url)
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Log resource usage after every attempt
    #[arg(long)]
    monitor: bool,

    /// Validate the configuration and print it without opening a browser.
    /// Exits 0 when the configuration is valid even though nothing is booked
    #[arg(long)]
    dry_run: bool,

    #[arg(long, value_enum, default_value = "compact")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match args.log_format {
        LogFormat::Compact => logger::init_cli_logger(args.verbose),
        LogFormat::Json => logger::init_json_logger(args.verbose),
    }

    tracing::info!("🚀 Starting termin-booker");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {:#}", e);
            if let Some(booking_error) = e.downcast_ref::<BookingError>() {
                tracing::error!("💡 Suggestion: {}", booking_error.recovery_suggestion());
                eprintln!("❌ {}", booking_error.user_friendly_message());
            } else {
                eprintln!("❌ {:#}", e);
            }
            std::process::exit(1);
        }
    };

    display_config_summary(&config, &args);
    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - configuration is valid, no browser was started");
        return;
    }

    if let Err(e) = run(&config, args.monitor || config.monitoring).await {
        tracing::error!(
            "❌ Booking failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

fn load_config(args: &Args) -> anyhow::Result<BookingConfig> {
    let mut toml_config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    // 命令列覆蓋設定
    if args.show_ui || args.headless || args.webdriver_url.is_some() {
        let browser = toml_config.browser.get_or_insert_with(Default::default);
        if args.show_ui || args.headless {
            browser.show_ui = Some(args.show_ui);
        }
        if let Some(url) = &args.webdriver_url {
            browser.webdriver_url = Some(url.clone());
        }
    }

    let config = toml_config
        .resolve()
        .context("Configuration validation failed")?;
    tracing::info!("✅ Configuration loaded and validated successfully");
    Ok(config)
}

async fn run(config: &BookingConfig, monitor_enabled: bool) -> termin_booker::Result<()> {
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let page = WebDriverPage::start(&config.webdriver).await?;
    let sleeper = TokioSleeper;

    let attempt = BookingAttempt::new(&page, &sleeper, config);
    let result = RetryLoop::new_with_monitoring(
        attempt,
        &sleeper,
        config.refresh_interval,
        monitor_enabled,
    )
    .with_max_attempts(config.max_attempts)
    .run()
    .await;

    match result {
        Ok(report) => {
            tracing::info!(
                "✅ Booking completed after {} attempt(s): {}",
                report.attempts,
                report.outcome
            );
            println!("✅ Done: {}", report.outcome);
            if let Err(e) = page.close().await {
                tracing::warn!("⚠️ Could not close browser session: {}", e);
            }
            Ok(())
        }
        Err(e) => {
            if let Err(close_error) = page.close().await {
                tracing::warn!("⚠️ Could not close browser session: {}", close_error);
            }
            Err(e)
        }
    }
}

fn display_config_summary(config: &BookingConfig, args: &Args) {
    println!("📋 Booking Summary:");
    println!("  Day: {}", config.target_day());
    println!("  Time window: {}", config.window);
    println!("  Station: {}", config.station_url);
    println!("  Reason: {}", config.reason);
    println!("  Share with warn app: {}", config.share_with_warn_app);
    println!("  Refresh interval: {}s", config.refresh_interval.as_secs());
    match config.max_attempts {
        Some(max) => println!("  Max attempts: {}", max),
        None => println!("  Max attempts: unlimited"),
    }
    println!(
        "  Browser: {:?} via {} ({})",
        config.webdriver.kind,
        config.webdriver.url,
        if config.show_browser_ui { "visible" } else { "headless" }
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_help_documents_dry_run_exit_status() {
        let help = Args::command().render_long_help().to_string();
        assert!(help.contains("Exits 0 when the configuration is valid"));
        assert!(help.contains("successful --dry-run"));
    }

    #[test]
    fn test_dry_run_flag() {
        let args = Args::try_parse_from(["termin-booker", "--dry-run", "-c", "my.toml"]).unwrap();
        assert!(args.dry_run);
        assert_eq!(args.config, "my.toml");
        assert!(Args::try_parse_from(["termin-booker", "--show-ui", "--headless"]).is_err());
    }
}
