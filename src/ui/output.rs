use crate::error::{PdfConcatError, UserFriendlyError};
use crate::extractor::{ExtractionReport, FileReport, FileStatus, PlannedBlock};
use console::{style, Emoji, Term};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");

/// Kind of status line. Decides the prefix, colour, JSON level and stream.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Tone {
    Start,
    Success,
    Warning,
    Info,
    Debug,
    Error,
}

impl Tone {
    /// Minimum verbosity at which the line shows. Errors always show.
    fn min_verbosity(self) -> Option<u8> {
        match self {
            Tone::Start | Tone::Success | Tone::Warning => Some(0),
            Tone::Info => Some(1),
            Tone::Debug => Some(2),
            Tone::Error => None,
        }
    }

    fn json_level(self) -> &'static str {
        match self {
            Tone::Start => "operation_start",
            Tone::Success => "success",
            Tone::Warning => "warning",
            Tone::Info => "info",
            Tone::Debug => "debug",
            Tone::Error => "error",
        }
    }

    fn plain_prefix(self) -> &'static str {
        match self {
            Tone::Start => "STARTING",
            Tone::Success => "SUCCESS",
            Tone::Warning => "WARNING",
            Tone::Info => "INFO",
            Tone::Debug => "DEBUG",
            Tone::Error => "ERROR",
        }
    }
}

/// Status output on stdout/stderr. The extracted text itself only ever goes
/// to the output file.
pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = mode == OutputMode::Human
            && !quiet
            && Term::stdout().features().colors_supported();

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn start_operation(&self, message: &str) {
        self.emit(Tone::Start, message);
    }

    pub fn success(&self, message: &str) {
        self.emit(Tone::Success, message);
    }

    pub fn warning(&self, message: &str) {
        self.emit(Tone::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.emit(Tone::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.emit(Tone::Debug, message);
    }

    /// Errors are shown even in quiet mode.
    pub fn error(&self, message: &str) {
        self.emit(Tone::Error, message);
    }

    pub fn print_user_friendly_error(&self, error: &PdfConcatError) {
        self.error(&error.user_message());

        let Some(suggestion) = error.suggestion() else {
            return;
        };
        match self.mode {
            OutputMode::Json => print_json(&json!({
                "type": "suggestion",
                "message": suggestion
            })),
            OutputMode::Plain => eprintln!("SUGGESTION: {}", suggestion),
            OutputMode::Human if self.use_colors => {
                eprintln!();
                eprintln!("{}{}", INFO, style(format!("Suggestion: {}", suggestion)).cyan());
            }
            OutputMode::Human => {
                eprintln!();
                eprintln!("Suggestion: {}", suggestion);
            }
        }
    }

    /// The JSON report is printed even in quiet mode so scripts can rely on it.
    pub fn print_extraction_report(&self, report: &ExtractionReport) {
        match self.mode {
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            _ if self.quiet => {}
            OutputMode::Human => self.print_human_report(report),
            OutputMode::Plain => print_plain_report(report),
        }
    }

    pub fn print_plan(&self, plan: &[PlannedBlock]) {
        if self.mode == OutputMode::Json {
            let blocks: Vec<_> = plan
                .iter()
                .map(|b| {
                    json!({
                        "filename": b.filename,
                        "path": b.path.display().to_string(),
                        "exists": b.exists,
                    })
                })
                .collect();
            print_json(&json!({ "type": "plan", "blocks": blocks }));
            return;
        }

        for block in plan {
            let line = format!("{} -> {}", block.filename, block.path.display());
            if block.exists {
                self.success(&line);
            } else {
                self.warning(&format!("{} (missing, would write a not-found block)", line));
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet || self.mode == OutputMode::Json {
            return;
        }
        if self.use_colors {
            println!("{}", style("─".repeat(60)).dim());
        } else {
            println!("{}", "-".repeat(60));
        }
    }

    fn should_show(&self, tone: Tone) -> bool {
        match tone.min_verbosity() {
            None => true,
            Some(level) => !self.quiet && self.verbose_level >= level,
        }
    }

    fn emit(&self, tone: Tone, message: &str) {
        if !self.should_show(tone) {
            return;
        }

        match self.mode {
            OutputMode::Json => print_json(&json!({
                "type": "message",
                "level": tone.json_level(),
                "message": message,
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
            OutputMode::Plain if tone == Tone::Error => {
                eprintln!("{}: {}", tone.plain_prefix(), message)
            }
            OutputMode::Plain => println!("{}: {}", tone.plain_prefix(), message),
            OutputMode::Human => {
                let line = self.human_line(tone, message);
                if tone == Tone::Error {
                    eprintln!("{}", line);
                } else {
                    println!("{}", line);
                }
            }
        }
    }

    fn human_line(&self, tone: Tone, message: &str) -> String {
        if !self.use_colors {
            return match tone {
                Tone::Start => format!("> {}", message),
                Tone::Success => format!("✓ {}", message),
                Tone::Warning => format!("! {}", message),
                Tone::Info => format!("i {}", message),
                Tone::Debug => format!("  DEBUG: {}", message),
                Tone::Error => format!("✗ {}", message),
            };
        }

        match tone {
            Tone::Start => format!("{}{}", ROCKET, style(message).bold()),
            Tone::Success => format!("{}{}", CHECKMARK, style(message).green().bold()),
            Tone::Warning => format!("{}{}", WARNING, style(message).yellow().bold()),
            Tone::Info => format!("{}{}", INFO, style(message).cyan()),
            Tone::Debug => format!("  {}", style(message).dim()),
            Tone::Error => format!("{}{}", CROSS, style(message).red().bold()),
        }
    }

    fn print_human_report(&self, report: &ExtractionReport) {
        println!();
        if self.use_colors {
            println!("{}", style("Extraction Report").bold().cyan());
        } else {
            println!("=== Extraction Report ===");
        }
        println!();

        for file in &report.files {
            let line = describe_file(file);
            match file.status {
                FileStatus::Extracted { .. } => self.success(&line),
                _ => self.warning(&line),
            }
        }

        println!();
        self.print_separator();

        let summary = &report.summary;
        let highlight = |value: String| {
            if self.use_colors {
                style(value).cyan().bold().to_string()
            } else {
                value
            }
        };

        println!("  Output file:     {}", highlight(report.output_path.clone()));
        println!("  Blocks written:  {}", highlight(summary.total_files.to_string()));
        println!("  Pages extracted: {}", highlight(summary.total_pages.to_string()));
        println!("  Bytes written:   {}", highlight(format_bytes(summary.bytes_written)));
        println!("  Time taken:      {}", highlight(format_duration(summary.duration)));

        if report.has_problems() {
            println!(
                "  Problems:        {} not found, {} failed",
                summary.not_found, summary.failed
            );
        }

        self.print_separator();
    }
}

fn print_plain_report(report: &ExtractionReport) {
    println!("REPORT: Extraction completed");
    println!("Output: {}", report.output_path);
    for file in &report.files {
        println!("{}", describe_file(file));
    }
    println!("Blocks: {}", report.summary.total_files);
    println!("Pages: {}", report.summary.total_pages);
    println!("Size: {} bytes", report.summary.bytes_written);
    println!("Duration: {:?}", report.summary.duration);

    if report.has_problems() {
        println!(
            "Problems: {} not found, {} failed",
            report.summary.not_found, report.summary.failed
        );
    }
}

fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn describe_file(file: &FileReport) -> String {
    match &file.status {
        FileStatus::Extracted { pages } => {
            format!("{}: {} page(s), {}", file.filename, pages, format_bytes(file.bytes_written))
        }
        FileStatus::NotFound => format!("{}: not found at {}", file.filename, file.path),
        FileStatus::Failed { message } => format!("{}: failed ({})", file.filename, message),
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}
