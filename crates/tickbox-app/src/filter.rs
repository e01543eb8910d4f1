use std::cell::RefCell;
use std::fmt;

use tracing::trace;

/// Display filter selected through the
/// URL fragment.
#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
)]
pub enum Filter {
  #[default]
  All,
  Active,
  Completed,
  /// Any other keyword. Hides nothing and
  /// matches no filter link.
  Other(String)
}

impl Filter {
  pub fn from_keyword(
    keyword: &str
  ) -> Self {
    match keyword.trim() {
      | "" => Self::All,
      | "active" => Self::Active,
      | "completed" => Self::Completed,
      | other => {
        Self::Other(other.to_string())
      }
    }
  }

  pub fn keyword(&self) -> &str {
    match self {
      | Self::All => "",
      | Self::Active => "active",
      | Self::Completed => "completed",
      | Self::Other(keyword) => keyword
    }
  }

  /// The `href` of the filter link that
  /// represents this filter.
  pub fn href(&self) -> String {
    format!("#/{}", self.keyword())
  }
}

impl fmt::Display for Filter {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.keyword())
  }
}

thread_local! {
  static CURRENT: RefCell<Filter> =
    RefCell::new(Filter::All);
}

/// Snapshot of the filter in effect on
/// this thread.
pub fn current() -> Filter {
  CURRENT.with(|cell| cell.borrow().clone())
}

/// Only the router publishes.
pub(crate) fn publish(filter: Filter) {
  trace!(filter = %filter, "publishing filter");
  CURRENT.with(|cell| {
    *cell.borrow_mut() = filter;
  });
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keywords_round_trip() {
    for keyword in
      ["", "active", "completed", "later"]
    {
      assert_eq!(
        Filter::from_keyword(keyword)
          .keyword(),
        keyword
      );
    }
    assert_eq!(
      Filter::from_keyword(" active "),
      Filter::Active
    );
  }

  #[test]
  fn hrefs_match_filter_links() {
    assert_eq!(Filter::All.href(), "#/");
    assert_eq!(
      Filter::Completed.href(),
      "#/completed"
    );
  }

  #[test]
  fn state_is_per_thread() {
    publish(Filter::Completed);
    assert_eq!(current(), Filter::Completed);

    let other = std::thread::spawn(current)
      .join()
      .unwrap();
    assert_eq!(other, Filter::All);

    publish(Filter::All);
  }
}
