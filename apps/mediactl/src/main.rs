#![allow(clippy::print_stdout)]

mod args;
mod handlers;

use crate::args::{Cli, Command};
use anyhow::{Context, Result};
use cadenza_config::{LogSettings, load_settings};
use cadenza_logger::{LevelFilter, Logger};
use cadenza_media::MediaStore;
use clap::Parser;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings =
        load_settings(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    if let Some(root) = cli.root {
        settings.storage.root = root;
    }

    let _log = init_logging(&settings.log)?;
    info!(
        config = ?cli.config,
        root = %settings.storage.root.display(),
        "Settings loaded"
    );

    // Classification is pure; it never needs the storage root.
    if let Command::Classify { content_type, filename } = &cli.command {
        handlers::classify_upload(content_type, filename);
        return Ok(());
    }

    let media = MediaStore::builder()
        .root(&settings.storage.root)
        .create(settings.storage.create)
        .open()
        .await
        .with_context(|| {
            format!("Cannot open storage root {}", settings.storage.root.display())
        })?;

    match cli.command {
        Command::Store { file, subdir, content_type, kind, name } => {
            handlers::store(&media, &file, &subdir, content_type, kind, name).await?;
        },
        Command::Delete { reference } => handlers::delete(&media, &reference).await?,
        Command::Purge {} => handlers::purge(&media).await,
        Command::Classify { .. } => {},
    }

    Ok(())
}

fn init_logging(log: &LogSettings) -> Result<Logger> {
    let level: LevelFilter =
        log.level.parse().with_context(|| format!("Invalid log level '{}'", log.level))?;

    let builder = Logger::builder().name("mediactl").level(level).console(log.console);
    let builder = match &log.directive {
        Some(directive) => builder.directive(directive),
        None => builder,
    };

    let logger = match &log.dir {
        Some(dir) => builder.path(dir).max_files(log.max_files).json(log.json).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}
