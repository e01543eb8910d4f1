pub mod memory;

use std::fmt;

pub use memory::VirtualDom;

/// Keystrokes the views react to.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum Key {
  Enter,
  Other
}

impl Key {
  /// From a `KeyboardEvent.key` name.
  pub fn from_name(name: &str) -> Self {
    if name == "Enter" {
      Self::Enter
    } else {
      Self::Other
    }
  }
}

/// Commands the views issue to the page.
///
/// Selectors are descendant chains of
/// simple `tag`, `#id` and `.class`
/// parts, e.g. `#filters li a`.
pub trait Dom {
  type Node: Clone + PartialEq + fmt::Debug;

  fn element_by_id(
    &self,
    id: &str
  ) -> Option<Self::Node>;

  /// A detached element.
  fn create_element(
    &mut self,
    tag: &str
  ) -> anyhow::Result<Self::Node>;

  fn query(
    &self,
    scope: &Self::Node,
    selector: &str
  ) -> Option<Self::Node> {
    self
      .query_all(scope, selector)
      .into_iter()
      .next()
  }

  fn query_all(
    &self,
    scope: &Self::Node,
    selector: &str
  ) -> Vec<Self::Node>;

  fn set_inner_html(
    &mut self,
    node: &Self::Node,
    html: &str
  ) -> anyhow::Result<()>;

  fn append_child(
    &mut self,
    parent: &Self::Node,
    child: &Self::Node
  ) -> anyhow::Result<()>;

  /// Takes `node` out of the page for
  /// good; the handle is dead afterwards.
  fn remove(
    &mut self,
    node: &Self::Node
  ) -> anyhow::Result<()>;

  fn toggle_class(
    &mut self,
    node: &Self::Node,
    class: &str,
    on: bool
  ) -> anyhow::Result<()>;

  fn has_class(
    &self,
    node: &Self::Node,
    class: &str
  ) -> bool;

  fn set_shown(
    &mut self,
    node: &Self::Node,
    shown: bool
  ) -> anyhow::Result<()>;

  fn is_shown(
    &self,
    node: &Self::Node
  ) -> bool;

  fn attribute(
    &self,
    node: &Self::Node,
    name: &str
  ) -> Option<String>;

  fn set_attribute(
    &mut self,
    node: &Self::Node,
    name: &str,
    value: &str
  ) -> anyhow::Result<()>;

  /// Current value of a form control.
  fn value(&self, node: &Self::Node)
  -> String;

  fn set_value(
    &mut self,
    node: &Self::Node,
    value: &str
  ) -> anyhow::Result<()>;

  fn checked(
    &self,
    node: &Self::Node
  ) -> bool;

  fn set_checked(
    &mut self,
    node: &Self::Node,
    checked: bool
  ) -> anyhow::Result<()>;

  fn focus(
    &mut self,
    node: &Self::Node
  ) -> anyhow::Result<()>;
}
