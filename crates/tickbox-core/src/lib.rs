pub mod cli;
pub mod commands;
pub mod config;
pub mod datastore;
pub mod render;

use std::ffi::OsString;
use std::io::Write;

use anyhow::Context;
use clap::Parser;
use tracing::info;

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);
  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  let settings =
    config::Settings::resolve(&cli)?;
  info!(
    data_dir = %settings.data_dir.display(),
    collection = %settings.collection,
    "starting tickbox CLI"
  );

  let inv =
    cli::Invocation::parse(cli.rest)?;

  let store =
    datastore::FileStore::open(
      &settings.data_dir,
      &settings.collection
    )
    .with_context(|| {
      format!(
        "failed to open datastore at \
         {}",
        settings.data_dir.display()
      )
    })?;

  let (mut view, mut router) =
    tickbox_app::headless(store, "")?;

  let renderer =
    render::Renderer::new(settings.color);
  let mut out = std::io::stdout().lock();
  commands::dispatch(
    &mut view,
    &mut router,
    &renderer,
    inv,
    &mut out
  )?;
  out.flush()?;

  info!("done");
  Ok(())
}
