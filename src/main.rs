use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use gh_publish::config::{self, Config};
use gh_publish::hosting::{Committer, FileUpsertRequest, GithubClient, ReleaseRequest};
use gh_publish::resolver::{self, Resolution};
use gh_publish::{publisher, ui, upsert};

#[derive(Parser)]
#[command(
    name = "gh-publish",
    about = "Resolve and publish releases from pull request labels"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "API token (defaults to the GITHUB_TOKEN environment variable)")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the next version for a commit from its pull request labels
    NextVersion {
        #[arg(short, long)]
        owner: String,
        #[arg(short, long)]
        repo: String,
        #[arg(short, long, help = "Full SHA of the commit to resolve")]
        sha: String,
    },

    /// Create a release under an explicit tag, uploading assets if given
    Release {
        #[arg(short, long)]
        owner: String,
        #[arg(short, long)]
        repo: String,
        #[arg(short, long)]
        tag: String,
        #[arg(short, long, help = "Commit the release and tag point at")]
        sha: String,
        #[arg(long, help = "Display name (defaults to the tag)")]
        name: Option<String>,
        #[arg(long, help = "Directory whose top-level files become release assets")]
        assets: Option<PathBuf>,
    },

    /// Resolve the next version, then create the release in one step
    Publish {
        #[arg(short, long)]
        owner: String,
        #[arg(short, long)]
        repo: String,
        #[arg(short, long, help = "Full SHA of the commit to release")]
        sha: String,
        #[arg(long, help = "Directory whose top-level files become release assets")]
        assets: Option<PathBuf>,
    },

    /// Create or update a single file on a branch
    CommitFile {
        #[arg(short, long)]
        owner: String,
        #[arg(short, long)]
        repo: String,
        #[arg(short, long, help = "Repository path to write")]
        path: String,
        #[arg(long, help = "Local file whose content is committed")]
        source: PathBuf,
        #[arg(short, long, help = "Target branch (repository default if omitted)")]
        branch: Option<String>,
        #[arg(short, long, help = "Commit message")]
        message: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Failed to load configuration: {}", e));
            process::exit(1);
        }
    };

    let token = args
        .token
        .clone()
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .unwrap_or_default();

    let client = match build_client(&token, &config) {
        Ok(client) => client,
        Err(e) => {
            ui::display_error(&e.to_string());
            process::exit(1);
        }
    };

    match args.command {
        Command::NextVersion { owner, repo, sha } => next_version(&client, &config, &owner, &repo, &sha),
        Command::Release {
            owner,
            repo,
            tag,
            sha,
            name,
            assets,
        } => release(
            &client,
            ReleaseRequest {
                owner,
                repo,
                tag,
                target_commit: sha,
                name,
                assets,
            },
        ),
        Command::Publish {
            owner,
            repo,
            sha,
            assets,
        } => publish(&client, &config, &owner, &repo, &sha, assets),
        Command::CommitFile {
            owner,
            repo,
            path,
            source,
            branch,
            message,
        } => commit_file(&client, &config, owner, repo, path, &source, branch, message),
    }
}

fn build_client(token: &str, config: &Config) -> gh_publish::Result<GithubClient> {
    Ok(GithubClient::new(token)?
        .with_base_url(&config.api.base_url)
        .with_upload_url(&config.api.upload_url))
}

fn next_version(
    client: &GithubClient,
    config: &Config,
    owner: &str,
    repo: &str,
    sha: &str,
) -> Result<()> {
    ui::display_status(&format!("Resolving next version for {}/{}", owner, repo));

    match resolver::resolve_next_version(client, owner, repo, sha) {
        Ok(Resolution::Release(version)) => {
            let tag = config.release.format_tag(&version);
            ui::display_success(&format!("Next version: {}", version));
            println!("{}", tag);
        }
        Ok(Resolution::NoRelease(reason)) => {
            ui::display_no_release(&reason);
        }
        Err(e) => {
            ui::display_error(&format!("Failed to resolve next version: {}", e));
            process::exit(1);
        }
    }

    Ok(())
}

fn release(client: &GithubClient, request: ReleaseRequest) -> Result<()> {
    ui::display_status(&format!("Creating release {}", request.tag));

    match publisher::publish(client, &request) {
        Ok(_) => {
            ui::display_success(&format!("Created release {}", request.tag));
            Ok(())
        }
        Err(e) => {
            ui::display_error(&format!("Failed to publish release '{}': {}", request.tag, e));
            process::exit(1);
        }
    }
}

fn publish(
    client: &GithubClient,
    config: &Config,
    owner: &str,
    repo: &str,
    sha: &str,
    assets: Option<PathBuf>,
) -> Result<()> {
    ui::display_status(&format!("Resolving next version for {}/{}", owner, repo));

    let version = match resolver::resolve_next_version(client, owner, repo, sha) {
        Ok(Resolution::Release(version)) => version,
        Ok(Resolution::NoRelease(reason)) => {
            ui::display_no_release(&reason);
            return Ok(());
        }
        Err(e) => {
            ui::display_error(&format!("Failed to resolve next version: {}", e));
            process::exit(1);
        }
    };

    let tag = config.release.format_tag(&version);
    release(
        client,
        ReleaseRequest {
            owner: owner.to_string(),
            repo: repo.to_string(),
            tag,
            target_commit: sha.to_string(),
            name: None,
            assets,
        },
    )
}

#[allow(clippy::too_many_arguments)]
fn commit_file(
    client: &GithubClient,
    config: &Config,
    owner: String,
    repo: String,
    path: String,
    source: &PathBuf,
    branch: Option<String>,
    message: Option<String>,
) -> Result<()> {
    let content = match std::fs::read(source) {
        Ok(content) => content,
        Err(e) => {
            ui::display_error(&format!("Failed to read '{}': {}", source.display(), e));
            process::exit(1);
        }
    };

    let request = FileUpsertRequest {
        owner,
        repo,
        path,
        content,
        message: message.unwrap_or_else(|| config.release.commit_message.clone()),
        committer: Committer {
            name: config.committer.name.clone(),
            email: config.committer.email.clone(),
        },
        branch,
    };

    ui::display_status(&format!("Committing {}", request.path));
    match upsert::upsert(client, &request) {
        Ok(sha) => {
            ui::display_success(&format!("Committed {} at {}", request.path, sha));
            println!("{}", sha);
            Ok(())
        }
        Err(e) => {
            ui::display_error(&format!("Failed to commit '{}': {}", request.path, e));
            process::exit(1);
        }
    }
}
