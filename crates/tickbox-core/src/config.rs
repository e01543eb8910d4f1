use std::io::IsTerminal;
use std::path::{
  Path,
  PathBuf
};

use anyhow::anyhow;
use tracing::debug;

use crate::cli::GlobalCli;

/// Where the headless driver keeps its
/// data and how it prints.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
)]
pub struct Settings {
  pub data_dir:   PathBuf,
  pub collection: String,
  pub color:      bool
}

impl Settings {
  #[tracing::instrument(skip_all)]
  pub fn resolve(
    cli: &GlobalCli
  ) -> anyhow::Result<Self> {
    let data_dir = match &cli.data {
      | Some(dir) => expand_tilde(dir)?,
      | None => default_data_dir()?
    };
    let color = cli
      .color
      .enabled(std::io::stdout().is_terminal());

    debug!(
      data_dir = %data_dir.display(),
      collection = %cli.collection,
      color,
      "resolved settings"
    );
    Ok(Self {
      data_dir,
      collection: cli.collection.clone(),
      color
    })
  }
}

/// `tickbox` under the platform's local
/// data directory, or `~/.tickbox` where
/// the platform has none.
pub fn default_data_dir()
-> anyhow::Result<PathBuf> {
  if let Some(base) = dirs::data_local_dir()
  {
    return Ok(base.join("tickbox"));
  }
  dirs::home_dir()
    .map(|home| home.join(".tickbox"))
    .ok_or_else(|| {
      anyhow!(
        "no data directory; pass --data"
      )
    })
}

fn expand_tilde(
  path: &Path
) -> anyhow::Result<PathBuf> {
  let Ok(rest) = path.strip_prefix("~")
  else {
    return Ok(path.to_path_buf());
  };
  let home =
    dirs::home_dir().ok_or_else(|| {
      anyhow!(
        "cannot expand ~ without a home \
         directory"
      )
    })?;
  Ok(home.join(rest))
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::*;

  #[test]
  fn explicit_data_dir_is_kept() {
    let cli = GlobalCli::try_parse_from([
      "tickbox",
      "--data",
      "/srv/todos",
      "--color",
      "always"
    ])
    .unwrap();
    let settings =
      Settings::resolve(&cli).unwrap();
    assert_eq!(
      settings.data_dir,
      PathBuf::from("/srv/todos")
    );
    assert!(settings.color);
  }

  #[test]
  fn tilde_expands_to_home() {
    let Some(home) = dirs::home_dir() else {
      return;
    };
    assert_eq!(
      expand_tilde(Path::new("~/lists"))
        .unwrap(),
      home.join("lists")
    );
    assert_eq!(
      expand_tilde(Path::new("~"))
        .unwrap(),
      home
    );
    assert_eq!(
      expand_tilde(Path::new("rel/~"))
        .unwrap(),
      PathBuf::from("rel/~")
    );
  }

  #[test]
  fn default_dir_ends_in_tickbox() {
    if let Ok(dir) = default_data_dir() {
      let name = dir
        .file_name()
        .and_then(|name| name.to_str());
      assert!(matches!(
        name,
        Some("tickbox" | ".tickbox")
      ));
    }
  }
}
