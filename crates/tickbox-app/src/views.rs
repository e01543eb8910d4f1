pub mod item;
pub mod list;

pub use item::{
  ItemHost,
  ItemView,
  is_hidden
};
pub use list::ListView;
use uuid::Uuid;

use crate::dom::Key;

/// Delegated DOM events, one variant per
/// `(event, selector)` pair the page
/// listens to.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum UiEvent {
  /// `keypress #new-todo`
  NewTodoKeyPress(Key),
  /// `click #clear-completed`
  ClearCompletedClick,
  /// `click #toggle-all`, after the
  /// checkbox has flipped.
  ToggleAllClick,
  /// `click .toggle`
  ItemToggleClick(Uuid),
  /// `dblclick label`
  ItemLabelDoubleClick(Uuid),
  /// `click .destroy`
  ItemDestroyClick(Uuid),
  /// `keypress .edit`
  ItemEditKeyPress(Uuid, Key),
  /// `blur .edit`
  ItemEditBlur(Uuid)
}
