//! refscope - Entry Point

use clap::Parser;
use refscope::repo::{GitCliRepo, RepoData};
use refscope::view::AppOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// refscope - browse branches, tags and history of a git repository
#[derive(Parser, Debug)]
#[command(name = "refscope")]
#[command(version)]
#[command(about = "Terminal browser for git branches, tags and commit history")]
pub struct Args {
    /// Path to the repository (defaults to the current directory)
    #[arg(default_value = ".")]
    pub repo: PathBuf,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Width of the ref pane in columns
    #[arg(long, value_parser = clap::value_parser!(u16).range(8..))]
    pub ref_pane_width: Option<u16>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = refscope::config::load_config_with_precedence(args.config.clone())?;
        let merged = refscope::config::merge_config(config_file);
        let with_env = refscope::config::apply_env_overrides(merged);

        // Flags only override when explicitly set
        let no_color_override = args.no_color.then_some(true);
        refscope::config::apply_cli_overrides(with_env, args.ref_pane_width, no_color_override)
    };

    // Flushes buffered log lines on drop; must outlive the TUI.
    let _log_guard = refscope::logging::init(&config.log_file_path, &config.log_level)?;

    info!(
        config = ?config,
        repo = %args.repo.display(),
        "Configuration loaded and resolved"
    );

    let repo: Arc<dyn RepoData> = Arc::new(GitCliRepo::new(args.repo.clone()));
    refscope::view::run_with_repo(repo, AppOptions::from(&config))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["refscope", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["refscope", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["refscope"]);
        assert_eq!(args.repo, PathBuf::from("."));
        assert_eq!(args.config, None);
        assert!(!args.no_color);
        assert_eq!(args.ref_pane_width, None);
    }

    #[test]
    fn test_repo_path_positional() {
        let args = Args::parse_from(["refscope", "/src/project"]);
        assert_eq!(args.repo, PathBuf::from("/src/project"));
    }

    #[test]
    fn test_config_path() {
        let args = Args::parse_from(["refscope", "--config", "/custom/config.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_no_color_flag() {
        let args = Args::parse_from(["refscope", "--no-color"]);
        assert!(args.no_color);
    }

    #[test]
    fn test_ref_pane_width() {
        let args = Args::parse_from(["refscope", "--ref-pane-width", "40"]);
        assert_eq!(args.ref_pane_width, Some(40));
    }

    #[test]
    fn test_ref_pane_width_rejects_tiny_values() {
        let result = Args::try_parse_from(["refscope", "--ref-pane-width", "3"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_flags_flow_through_config_precedence_chain() {
        use refscope::config::{apply_cli_overrides, merge_config, ConfigFile};

        let config_file = ConfigFile {
            ref_pane_width: Some(24),
            no_color: Some(false),
            ..ConfigFile::default()
        };

        let merged = merge_config(Some(config_file));
        assert_eq!(merged.ref_pane_width, 24, "Config file overrides default");

        let with_cli = apply_cli_overrides(merged, Some(50), Some(true));
        assert_eq!(with_cli.ref_pane_width, 50, "CLI overrides config file");
        assert!(with_cli.no_color);

        let options = AppOptions::from(&with_cli);
        assert!(!options.colors_enabled);
    }
}
