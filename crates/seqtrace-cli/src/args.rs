use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seqtrace")]
#[command(about = "Reconstruct sequence diagrams and test evidence from logcat files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a log file and write diagrams, JSON export, and reports
    Analyze(AnalyzeArgs),

    /// Inspect and validate the template configuration
    Templates {
        #[command(subcommand)]
        command: TemplatesCommand,
    },
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Log file to analyze (.txt, .log, or .logcat)
    pub log_file: PathBuf,

    /// Keep only records whose message contains this keyword
    #[arg(long)]
    pub keyword: Option<String>,

    /// Keep only records with this exact tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Keep only records at or above this level (V, D, I, W, E, F)
    #[arg(long)]
    pub level: Option<String>,

    /// Template configuration file (JSON), overrides the config file
    #[arg(long)]
    pub template_file: Option<PathBuf>,

    /// Directory for generated artifacts
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Test identifier; also triggers evidence report generation
    #[arg(long)]
    pub test_id: Option<String>,

    /// Environment recorded in the evidence report
    #[arg(long, default_value = "Test")]
    pub environment: String,

    /// Add compliance sections to the evidence report
    #[arg(long)]
    pub compliance: bool,
}

#[derive(Subcommand)]
pub enum TemplatesCommand {
    /// List the active templates in priority order
    List {
        /// Template configuration file (JSON)
        #[arg(long)]
        template_file: Option<PathBuf>,
    },

    /// Validate a template configuration file
    Validate {
        /// Template configuration file (JSON)
        template_file: PathBuf,
    },

    /// Render the active templates as a Mermaid flowchart
    Diagram {
        /// Template configuration file (JSON)
        #[arg(long)]
        template_file: Option<PathBuf>,

        /// Write the diagram here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}
