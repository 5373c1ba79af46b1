//! gitferry - move a repository between GitHub, GitLab and Gitea.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use gitferry_migrate::{
    ConsoleProgressReporter, MigrationConfig, MigrationPhase, MigrationProgress, Migrator,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Mirror a Git repository, with every branch and tag, onto another platform
#[derive(Parser, Debug)]
#[command(name = "gitferry")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Platform to migrate from (github, gitlab, gitea)
    #[arg(long)]
    source_platform: String,

    /// Platform to migrate to (github, gitlab, gitea)
    #[arg(long)]
    target_platform: String,

    /// API token for the source platform (may be empty for public sources)
    #[arg(long, env = "GITFERRY_SOURCE_TOKEN", hide_env_values = true)]
    source_token: String,

    /// API token for the target platform
    #[arg(long, env = "GITFERRY_TARGET_TOKEN", hide_env_values = true)]
    target_token: String,

    /// Clone URL of the repository to migrate
    #[arg(long)]
    source_url: String,

    /// User or group that will own the new repository
    #[arg(long)]
    target_namespace: String,

    /// Base URL of the Gitea instance, required when either side is gitea
    #[arg(long)]
    gitea_url: Option<String>,

    /// Description of the created repository
    #[arg(long, default_value = "")]
    description: String,

    /// Directory the temporary workspace is created in
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,

    /// Timeout for platform API requests in seconds (0 waits indefinitely)
    #[arg(long, default_value_t = 30)]
    http_timeout: u64,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn http_timeout(&self) -> Option<Duration> {
        (self.http_timeout > 0).then(|| Duration::from_secs(self.http_timeout))
    }

    fn into_config(self) -> gitferry_migrate::Result<MigrationConfig> {
        let timeout = self.http_timeout();
        Ok(MigrationConfig::configure(
            self.source_token,
            self.target_token,
            &self.source_platform,
            &self.target_platform,
            self.gitea_url.as_deref(),
        )?
        .with_work_root(self.work_dir)
        .with_description(self.description)
        .with_http_timeout(timeout))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("gitferry={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!(error = %format!("{e:#}"), "Migration aborted");
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

/// Run one migration. Returns whether it succeeded.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let source_url = cli.source_url.clone();
    let namespace = cli.target_namespace.clone();

    let reporter = ConsoleProgressReporter::new();
    let progress = MigrationProgress::with_callback(reporter.callback());
    progress.set_phase(MigrationPhase::Configuring);

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            progress.fail(&e.to_string());
            reporter.finish();
            return Err(e).context("invalid configuration");
        }
    };
    info!(
        source = %config.source.kind(),
        target = %config.target.kind(),
        work_root = %config.work_root.display(),
        "Configuration loaded"
    );

    let migrator = Migrator::new(config)
        .context("failed to build HTTP client")?
        .with_progress(progress);
    let result = migrator.migrate(&source_url, &namespace).await;
    reporter.finish();

    result.print_summary();
    Ok(result.success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitferry_migrate::PlatformKind;

    const REQUIRED: [&str; 13] = [
        "gitferry",
        "--source-platform",
        "github",
        "--target-platform",
        "gitlab",
        "--source-token",
        "s",
        "--target-token",
        "t",
        "--source-url",
        "https://github.com/org/repo.git",
        "--target-namespace",
        "grp",
    ];

    fn parse(extra: &[&str]) -> Cli {
        let args = REQUIRED.iter().chain(extra).copied();
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.work_dir, PathBuf::from("."));
        assert_eq!(cli.description, "");
        assert_eq!(cli.http_timeout(), Some(Duration::from_secs(30)));
        assert!(cli.gitea_url.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let cli = parse(&["--http-timeout", "0"]);
        assert_eq!(cli.http_timeout(), None);
    }

    #[test]
    fn test_missing_source_url_rejected() {
        let args: Vec<&str> = REQUIRED
            .iter()
            .copied()
            .filter(|a| *a != "--source-url" && *a != "https://github.com/org/repo.git")
            .collect();
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_into_config() {
        let cli = parse(&[
            "--description",
            "mirrored",
            "--work-dir",
            "/tmp/migrations",
            "--debug",
        ]);
        assert!(cli.debug);

        let config = cli.into_config().unwrap();
        assert_eq!(config.source.kind(), PlatformKind::GitHub);
        assert_eq!(config.target.kind(), PlatformKind::GitLab);
        assert_eq!(config.description, "mirrored");
        assert_eq!(config.work_root, PathBuf::from("/tmp/migrations"));
        assert_eq!(config.credentials.target_token.expose(), "t");
    }

    #[test]
    fn test_gitea_without_url_is_config_error() {
        let cli = Cli::try_parse_from([
            "gitferry",
            "--source-platform",
            "gitea",
            "--target-platform",
            "github",
            "--source-token",
            "",
            "--target-token",
            "t",
            "--source-url",
            "https://git.example.com/org/repo.git",
            "--target-namespace",
            "ns",
        ])
        .unwrap();
        assert!(cli.into_config().is_err());
    }
}
