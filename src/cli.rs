use clap::Parser;
use std::path::PathBuf;

/// Environment fallback for `--document-root`.
pub const DOCUMENT_ROOT_ENV: &str = "FOLDVIEW_DOCUMENT_ROOT";
/// Environment fallback for the positional root path.
pub const ROOT_PATH_ENV: &str = "FOLDVIEW_ROOT_PATH";

const EXAMPLES: &str = "\
Examples:
  foldview -d /srv/docs reports
  foldview -d /srv/docs reports -e 'reports|reports/2024'
  FOLDVIEW_DOCUMENT_ROOT=/srv/docs foldview --watch reports";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "foldview",
    version,
    about = "Render a lazily expanded directory tree as HTML",
    after_help = EXAMPLES
)]
pub struct Args {
    /// Directory to render, relative to the document root
    pub root_path: Option<String>,

    /// Directory no rendered path may escape
    #[arg(short = 'd', long = "document-root")]
    pub document_root: Option<PathBuf>,

    /// Open directories, '|'-separated and relative to the document root
    #[arg(short = 'e', long = "expanded")]
    pub expanded: Option<String>,

    /// Show hidden files (dotfiles)
    #[arg(short = 'a', long = "all")]
    pub show_hidden: bool,

    /// Omit <img> icons from the markup
    #[arg(long = "no-icons")]
    pub no_icons: bool,

    /// URL prefix for icon images
    #[arg(long = "icon-root", default_value = "/images")]
    pub icon_root: String,

    /// Re-render whenever the directory changes
    #[arg(short = 'w', long = "watch")]
    pub watch: bool,

    /// Debounce interval in milliseconds for --watch (minimum 50)
    #[arg(long = "debounce", default_value = "200")]
    pub debounce_ms: u64,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Args {
    /// Enforce invariants after parsing.
    pub fn validated(mut self) -> Self {
        if self.debounce_ms < 50 {
            self.debounce_ms = 50;
        }
        if self.quiet {
            self.verbose = 0;
        }
        if self.document_root.is_none() {
            self.document_root = std::env::var_os(DOCUMENT_ROOT_ENV).map(PathBuf::from);
        }
        if self.root_path.is_none() {
            self.root_path = std::env::var(ROOT_PATH_ENV).ok();
        }
        self
    }

    pub fn document_root(&self) -> PathBuf {
        self.document_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn root_path(&self) -> &str {
        self.root_path.as_deref().unwrap_or("")
    }

    /// Default tracing filter directive for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
