//! # TendRS Image Pull Handler
//!
//! File: cli/src/commands/container/pull.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! Pulls container images as a best-effort batch. With explicit image
//! references on the command line those are pulled directly; with none, the
//! compose manifest is parsed and every service that declares an image is
//! pulled. Build-context services (no `image:` key) are reported and
//! skipped.
//!
//! ## Usage
//!
//! ```bash
//! tendrs container pull                    # images from the compose manifest
//! tendrs container pull nginx:1.27 redis  # explicit images
//! tendrs container pull --file infra/compose.yml
//! ```
//!
use crate::common::compose;
use crate::common::docker::{batch::Batch, daemon::Daemon};
use crate::common::exec::{CommandRunner, Executor};
use crate::core::{config, error::Result, error::TendrsError};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(about = "Pull images, explicit or discovered from the compose manifest")]
pub struct PullArgs {
    /// Image references to pull. When empty, images come from the compose
    /// manifest's services.
    images: Vec<String>,

    /// Compose manifest to read when no explicit images are given.
    /// Defaults to the configured `compose.file`.
    #[arg(long)]
    file: Option<PathBuf>,
}

pub async fn handle_pull(args: PullArgs) -> Result<()> {
    debug!("Pull args: {:?}", args);
    let cfg = config::load_config().context("Failed to load TendRS configuration")?;
    let runner: Arc<dyn CommandRunner> = Arc::new(Executor::silent());
    let daemon = Arc::new(Daemon::new(&cfg.daemon, Arc::clone(&runner)));

    let images = if args.images.is_empty() {
        let path = args
            .file
            .unwrap_or_else(|| PathBuf::from(&cfg.compose.file));
        if !path.is_file() {
            return Err(TendrsError::ManifestFetch(format!(
                "'{}' does not exist",
                path.display()
            ))
            .into());
        }
        info!("Discovering images from '{}'...", path.display());
        let services =
            compose::parse_services(&path, Arc::clone(&runner), &cfg.daemon.binary).await;
        if services.is_empty() {
            return Err(TendrsError::ManifestParse(format!(
                "no services found in '{}'",
                path.display()
            ))
            .into());
        }
        let mut images = Vec::new();
        for service in services {
            match service.image {
                Some(image) => images.push(image),
                None => println!("{}: no image declared, skipping", service.name),
            }
        }
        images
    } else {
        args.images
    };

    if images.is_empty() {
        println!("Nothing to pull.");
        return Ok(());
    }

    let results = Batch::new(daemon).pull_images(&images).await?;
    super::report_batch("pull", &results)
}
