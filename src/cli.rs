use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tokensync_common::Platform;
use tokensync_pipeline::Category;

#[derive(Parser)]
#[command(name = "tokensync")]
#[command(version = "0.1.0")]
#[command(about = "Generate platform source files from design-token exports")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json or pretty (default)
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    pub format: OutputMode,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Json,
    Pretty,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate source files and write them under the output directory
    Generate {
        #[command(flatten)]
        inputs: TokenArgs,

        #[command(flatten)]
        references: ReferenceArgs,

        /// Output directory; files land in <out>/<platform>/
        #[arg(long, default_value = "tokens-out")]
        out: PathBuf,

        /// Print what would be written without touching the filesystem
        #[arg(long)]
        dry_run: bool,
    },

    /// Detect conventions from reference files and print them
    Detect {
        #[command(flatten)]
        references: ReferenceArgs,
    },

    /// Compare what would be generated against an existing output directory
    Check {
        #[command(flatten)]
        inputs: TokenArgs,

        #[command(flatten)]
        references: ReferenceArgs,

        /// Directory holding previously generated files
        #[arg(long, default_value = "tokens-out")]
        out: PathBuf,
    },
}

/// Token inputs and generation options shared by `generate` and `check`
#[derive(Args)]
pub struct TokenArgs {
    /// Light-mode color tokens (JSON)
    #[arg(long)]
    pub light: PathBuf,

    /// Dark-mode color tokens (JSON)
    #[arg(long)]
    pub dark: PathBuf,

    /// Numeric value tokens (JSON)
    #[arg(long)]
    pub values: PathBuf,

    /// Typography tokens (JSON)
    #[arg(long)]
    pub typography: Option<PathBuf>,

    /// Primitive color tokens (JSON); defaults to alias targets of the color trees
    #[arg(long)]
    pub primitives: Option<PathBuf>,

    /// Platforms to generate (repeatable); all when omitted
    #[arg(long = "platform", short = 'p', value_enum)]
    pub platforms: Vec<PlatformArg>,

    /// Categories to generate (repeatable); all when omitted
    #[arg(long = "category", short = 'c', value_enum)]
    pub categories: Vec<CategoryArg>,

    /// JSON generation config (confidence_threshold, max_alias_depth, kotlin_package, include_timestamp)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Kotlin package for generated files
    #[arg(long)]
    pub kotlin_package: Option<String>,

    /// Leave the generated-at line out of file headers
    #[arg(long)]
    pub no_timestamp: bool,
}

/// Where reference files come from
#[derive(Args)]
pub struct ReferenceArgs {
    /// Directory scanned for existing token source files
    #[arg(long = "references", short = 'r')]
    pub reference_dir: Option<PathBuf>,

    /// Explicit reference file as role=path, e.g. web-colors-scss=src/Colors.scss (repeatable)
    #[arg(long = "reference")]
    pub reference_files: Vec<String>,

    /// Ignore reference files and use best-practice conventions
    #[arg(long)]
    pub best_practice: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    Web,
    Ios,
    Android,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Web => Platform::Web,
            PlatformArg::Ios => Platform::Ios,
            PlatformArg::Android => Platform::Android,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Colors,
    Typography,
    Spacing,
    Effects,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Colors => Category::Colors,
            CategoryArg::Typography => Category::Typography,
            CategoryArg::Spacing => Category::Spacing,
            CategoryArg::Effects => Category::Effects,
        }
    }
}
