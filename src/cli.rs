use clap::Parser;
use std::path::PathBuf;

use crate::view::ViewMode;

/// deptlist – browse, filter and delete departments from the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "PATH", default_value = "deptlist.toml")]
    pub config: PathBuf,

    /// API base URL (overrides `api.base_url`)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Role to run as; only ADMIN may delete. Falls back to DEPTLIST_ROLE, then the config file.
    #[arg(long)]
    pub role: Option<String>,

    /// On delete, drop the position captured at request time instead of matching by id.
    #[arg(long)]
    pub captured_index: bool,

    /// Print the filtered list and exit without the TUI.
    #[arg(long)]
    pub headless: bool,

    /// Initial search text (name or tags)
    #[arg(long, value_name = "QUERY", default_value = "")]
    pub filter: String,

    /// Initial presentation
    #[arg(long, value_enum, default_value_t = ViewMode::Grid)]
    pub view: ViewMode,

    /// Log file for interactive sessions (defaults to deptlist.log in the temp dir)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["deptlist"]);
        assert_eq!(cli.config, PathBuf::from("deptlist.toml"));
        assert_eq!(cli.view, ViewMode::Grid);
        assert!(!cli.headless && !cli.captured_index);
    }

    #[test]
    fn test_headless_list_view() {
        let cli = Cli::parse_from([
            "deptlist",
            "--headless",
            "--filter",
            "finance",
            "--view",
            "list",
            "--role",
            "ADMIN",
        ]);
        assert!(cli.headless);
        assert_eq!(cli.filter, "finance");
        assert_eq!(cli.view, ViewMode::List);
        assert_eq!(cli.role.as_deref(), Some("ADMIN"));
    }
}
