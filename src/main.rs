use clap::Parser;
use pdfconcat::{Cli, Config, OutputFormatter, OutputMode, PdfConcat, PdfConcatError, UserFriendlyError};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let app = match PdfConcat::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return e.exit_code();
        }
    };

    setup_logging(app.config());

    if cli.dry_run {
        return handle_dry_run(&app);
    }

    // Missing or unreadable inputs are reported inside the output file and
    // still count as a normal completion.
    match app.run() {
        Ok(_) => 0,
        Err(e) => {
            log::debug!("run aborted: {:?}", e);
            app.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "pdfconcat.toml".to_string());

    match PdfConcat::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  pdfconcat --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(app: &PdfConcat) -> i32 {
    let formatter = app.output_formatter();
    let extraction = &app.config().extraction;

    formatter.info("DRY RUN MODE - No output will be written");
    formatter.print_separator();

    let plan = match app.plan() {
        Ok(plan) => plan,
        Err(e) => {
            app.handle_error(&e);
            return e.exit_code();
        }
    };

    formatter.print_plan(&plan);
    formatter.print_separator();
    formatter.success(&format!(
        "Would write {} block(s) to {}",
        plan.len(),
        extraction.resolved_output_path().display()
    ));

    0
}

fn print_startup_error(error: &PdfConcatError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(config: &Config) {
    // RUST_LOG wins over the configured level when present.
    let mut builder = env_logger::Builder::new();
    builder.filter_level(config.log_level_filter());
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.format_timestamp_secs();

    if builder.try_init().is_ok() {
        log::debug!("Logging initialized at level: {}", config.logging.level);
    }
}
