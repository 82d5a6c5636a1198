use crate::core::report::OutputFormat;
use crate::domain::model::Scope;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "site-widgets")]
#[command(about = "Related content, navigation, breadcrumbs and consent state for the site")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// TOML catalog overriding the built-in site content
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    /// Output format: text, json or csv
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    /// Page path, e.g. /resources/ai-guardrails.html
    pub path: String,

    /// Comma-separated page tags
    #[arg(long)]
    pub tags: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub series: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    /// Read page meta and title from a rendered HTML file
    #[arg(long, conflicts_with_all = ["tags", "category", "series", "title"])]
    pub html: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Content ranked by tag similarity to the page
    Related {
        #[command(flatten)]
        page: PageArgs,

        #[arg(long, default_value = "all")]
        scope: Scope,
    },
    /// Services to cross-link from the page
    Services {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Entries the page's own catalog record lists in `related`
    Curated {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Previous and next pages
    Nav {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Everything the related-posts widget would show
    View {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Breadcrumb trail for a path
    Breadcrumbs {
        path: String,

        /// Show every crumb instead of the collapsed trail
        #[arg(long)]
        full: bool,
    },
    /// Cookie-consent preference
    Consent {
        #[command(subcommand)]
        action: ConsentAction,

        /// Override the preference file from the configuration
        #[arg(long)]
        store: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConsentAction {
    Status,
    Accept,
    Decline,
    Reset,
}
