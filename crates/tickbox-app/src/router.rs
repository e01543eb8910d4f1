use tracing::{
  debug,
  info
};

use crate::dom::Dom;
use crate::filter::{
  self,
  Filter
};
use crate::views::ListView;

/// Extracts the route parameter from a
/// URL fragment such as `#/active`.
///
/// Every fragment matches; an empty one
/// yields `None`.
pub fn parse_fragment(
  raw: &str
) -> Option<String> {
  let stripped = raw
    .strip_prefix('#')
    .unwrap_or(raw);
  let stripped = stripped
    .strip_prefix('/')
    .unwrap_or(stripped)
    .trim_end();

  let decoded =
    urlencoding::decode(stripped)
      .map(|cow| cow.into_owned())
      .unwrap_or_else(|_| {
        stripped.to_string()
      });

  if decoded.is_empty() {
    None
  } else {
    Some(decoded)
  }
}

/// Turns fragment changes into the
/// thread's filter state and announces
/// them on the collection.
#[derive(Debug, Default)]
pub struct FilterRouter {
  history: Vec<String>
}

impl FilterRouter {
  pub fn new() -> Self {
    Self::default()
  }

  /// Runs the route once for the initial
  /// fragment, which may be empty.
  pub fn start<D: Dom>(
    &mut self,
    fragment: &str,
    view: &mut ListView<D>
  ) -> anyhow::Result<()> {
    info!(fragment, "router started");
    self.navigate(fragment, view)
  }

  pub fn navigate<D: Dom>(
    &mut self,
    fragment: &str,
    view: &mut ListView<D>
  ) -> anyhow::Result<()> {
    self.history.push(fragment.to_string());
    let param = parse_fragment(fragment);
    self.set_filter(param.as_deref(), view)
  }

  /// Navigates to `fragment` unless it is
  /// already the newest history entry.
  /// Returns whether a route ran.
  pub fn sync<D: Dom>(
    &mut self,
    fragment: &str,
    view: &mut ListView<D>
  ) -> anyhow::Result<bool> {
    if self.history.last().is_some_and(|last| last == fragment) {
      return Ok(false);
    }
    self.navigate(fragment, view)?;
    Ok(true)
  }

  /// Returns to the previous fragment, if
  /// there is one.
  pub fn back<D: Dom>(
    &mut self,
    view: &mut ListView<D>
  ) -> anyhow::Result<Option<String>> {
    if self.history.len() < 2 {
      return Ok(None);
    }
    self.history.pop();
    let Some(previous) =
      self.history.last().cloned()
    else {
      return Ok(None);
    };
    let param = parse_fragment(&previous);
    self.set_filter(param.as_deref(), view)?;
    Ok(Some(previous))
  }

  pub fn history(&self) -> &[String] {
    &self.history
  }

  #[tracing::instrument(skip(self, view))]
  pub fn set_filter<D: Dom>(
    &self,
    param: Option<&str>,
    view: &mut ListView<D>
  ) -> anyhow::Result<()> {
    let filter = param
      .map(Filter::from_keyword)
      .unwrap_or_default();
    debug!(filter = %filter, "filter selected");
    filter::publish(filter);
    view.trigger_filter()
  }
}
