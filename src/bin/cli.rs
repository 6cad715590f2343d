//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! CLI for setting canned ACLs on buckets, objects and prefixes.
//!
//! Examples:
//! ```bash
//! s3acl s3://bucket -b private               # bucket ACL
//! s3acl s3://bucket -b -f private            # create the bucket if missing
//! s3acl s3://bucket/key.npz default          # single object
//! s3acl s3://bucket/prefix/ -r public-read   # every object under the prefix
//! s3acl s3://bucket/prefix/ -r -f -j 64 private
//! ```

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use s3acl::constants::DEFAULT_JOBS;
use s3acl::progress::{AclProgressTracker, ProgressCallback};
use s3acl::s3_store::S3AclStore;
use s3acl::{BatchOptions, CannedAcl, CloudUri, Scope, SetAclEngine};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Target bucket or object, e.g. s3://bucket/key
    uri: String,

    /// ACL to apply: private, public-read, public-read-write or (objects only) default
    acl: String,

    /// Address the bucket itself instead of an object
    #[arg(short = 'b', long)]
    bucket: bool,

    /// Apply to every object under the key prefix
    #[arg(short = 'r', long)]
    recursive: bool,

    /// Create a missing bucket; with -r, also skip the confirmation prompt
    #[arg(short = 'f', long)]
    force: bool,

    /// Concurrent ACL updates in recursive mode
    #[arg(short = 'j', long, default_value_t = DEFAULT_JOBS)]
    jobs: usize,

    #[arg(
        short = 'v',
        long,
        action = ArgAction::Count,
        help = "Increase log verbosity: -v = Info, -vv = Debug",
    )]
    verbose: u8,
}

fn check_aws_credentials() -> Result<()> {
    if std::env::var("AWS_ACCESS_KEY_ID").is_err() || std::env::var("AWS_SECRET_ACCESS_KEY").is_err()
    {
        anyhow::bail!(
            "Missing required AWS environment variables. Please set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY (and optionally AWS_REGION) either in your environment or in a .env file."
        );
    }
    Ok(())
}

/// Ask before an unforced recursive batch. Anything but an explicit yes,
/// including closed stdin, cancels the run.
fn confirm_batch(uri: &CloudUri, acl: CannedAcl) -> Result<bool> {
    print!("Apply ACL '{}' to every object under {}? [y/N] ", acl, uri);
    io::stdout().flush()?;
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Loads any variables from .env file that are not already set
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialise logging once, based on how many `-v` flags were given
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    check_aws_credentials()?;

    let uri: CloudUri = cli.uri.parse()?;
    let scope = if cli.bucket {
        Scope::Bucket
    } else {
        Scope::Object
    };
    let acl = CannedAcl::parse(&cli.acl, scope)?;
    let opts = BatchOptions::new(scope, cli.recursive, cli.force, cli.jobs)?;

    if cli.recursive && !cli.force && !confirm_batch(&uri, acl)? {
        println!("Cancelled; nothing changed.");
        return Ok(());
    }

    let store = Arc::new(S3AclStore::from_env().await?);
    let mut engine = SetAclEngine::new(store);
    let progress = if cli.recursive {
        let tracker = Arc::new(AclProgressTracker::new("SET-ACL"));
        engine = engine.with_progress(Arc::new(ProgressCallback::new(tracker.clone())));
        Some(tracker)
    } else {
        None
    };

    match engine.run(&uri, acl, &opts).await {
        Ok(summary) => {
            if let Some(tracker) = &progress {
                tracker.finish(summary.updated as u64, summary.elapsed);
            }
            match scope {
                Scope::Bucket => {
                    println!(
                        "Set ACL '{}' on {} in {:.2}s",
                        acl,
                        uri,
                        summary.elapsed.as_secs_f64()
                    );
                }
                Scope::Object if summary.nothing_matched() => {
                    println!("No objects matched {}; nothing to do.", uri);
                }
                Scope::Object => {
                    println!(
                        "Set ACL '{}' on {} of {} objects in {:.2}s",
                        acl,
                        summary.updated,
                        summary.matched,
                        summary.elapsed.as_secs_f64()
                    );
                }
            }
            Ok(())
        }
        Err(e) => {
            if let Some(tracker) = &progress {
                tracker.progress_bar.finish_and_clear();
            }
            if e.is_not_found() && scope == Scope::Bucket && !cli.force {
                eprintln!("Hint: pass --force to create the bucket first.");
            }
            Err(e.into())
        }
    }
}
