use tracing::debug;
use uuid::Uuid;

use crate::collection::TaskCollection;
use crate::dom::{
  Dom,
  Key
};
use crate::events::CollectionObserver;
use crate::filter::Filter;
use crate::task::{
  TaskPatch,
  TaskRecord
};
use crate::template::{
  self,
  ItemAttrs
};

/// The view that owns item views: it
/// receives the collection signals their
/// actions cause and lends them the page.
pub trait ItemHost: CollectionObserver {
  type Dom: Dom;

  fn dom(&mut self) -> &mut Self::Dom;
}

/// Filter-driven visibility for one
/// record.
pub fn is_hidden(
  record: &TaskRecord,
  filter: &Filter
) -> bool {
  (!record.completed
    && *filter == Filter::Completed)
    || (record.completed
      && *filter == Filter::Active)
}

/// Renders one record as an `li` and
/// handles its interactions.
///
/// Holds the record's id and node handles
/// only, so clones are cheap and refer to
/// the same row.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView<N> {
  id:    Uuid,
  el:    N,
  input: Option<N>
}

impl<N> ItemView<N>
where
  N: Clone + PartialEq + std::fmt::Debug
{
  pub fn new<D: Dom<Node = N>>(
    dom: &mut D,
    record: &TaskRecord
  ) -> anyhow::Result<Self> {
    let el = dom.create_element("li")?;
    dom.set_attribute(
      &el,
      "data-id",
      &record.id.to_string()
    )?;
    Ok(Self {
      id: record.id,
      el,
      input: None
    })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn el(&self) -> &N {
    &self.el
  }

  pub fn render<D: Dom<Node = N>>(
    &mut self,
    dom: &mut D,
    record: &TaskRecord,
    filter: &Filter
  ) -> anyhow::Result<&mut Self> {
    dom.set_inner_html(
      &self.el,
      &template::item(&ItemAttrs {
        title:     &record.title,
        completed: record.completed
      })
    )?;
    dom.toggle_class(
      &self.el,
      "completed",
      record.completed
    )?;
    self.toggle_visible(dom, record, filter)?;
    self.input = dom.query(&self.el, ".edit");
    Ok(self)
  }

  pub fn is_hidden(
    &self,
    record: &TaskRecord,
    filter: &Filter
  ) -> bool {
    is_hidden(record, filter)
  }

  pub fn toggle_visible<D: Dom<Node = N>>(
    &self,
    dom: &mut D,
    record: &TaskRecord,
    filter: &Filter
  ) -> anyhow::Result<()> {
    dom.toggle_class(
      &self.el,
      "hidden",
      self.is_hidden(record, filter)
    )
  }

  pub fn toggle_completed<H>(
    &self,
    todos: &mut TaskCollection,
    host: &mut H
  ) -> anyhow::Result<()>
  where
    H: ItemHost
  {
    todos.toggle(self.id, host)
  }

  /// Switches the row into editing mode.
  pub fn edit<D: Dom<Node = N>>(
    &self,
    dom: &mut D
  ) -> anyhow::Result<()> {
    dom.toggle_class(
      &self.el, "editing", true
    )?;
    if let Some(input) = &self.input {
      dom.focus(input)?;
    }
    Ok(())
  }

  /// Saves a non-blank edit, then leaves
  /// editing mode either way.
  pub fn close<H, D>(
    &self,
    todos: &mut TaskCollection,
    host: &mut H
  ) -> anyhow::Result<()>
  where
    H: ItemHost<Dom = D>,
    D: Dom<Node = N>
  {
    let value = self
      .input
      .as_ref()
      .map(|input| host.dom().value(input))
      .unwrap_or_default();
    let value = value.trim();

    if value.is_empty() {
      debug!(id = %self.id, "blank edit; keeping title");
    } else {
      todos.save(
        self.id,
        &TaskPatch::title(value),
        host
      )?;
    }

    host.dom().toggle_class(
      &self.el, "editing", false
    )
  }

  pub fn update_on_enter<H, D>(
    &self,
    key: Key,
    todos: &mut TaskCollection,
    host: &mut H
  ) -> anyhow::Result<()>
  where
    H: ItemHost<Dom = D>,
    D: Dom<Node = N>
  {
    if key == Key::Enter {
      self.close(todos, host)?;
    }
    Ok(())
  }

  /// Destroys the record; the `destroyed`
  /// signal takes the row out of the page.
  pub fn clear<H>(
    &self,
    todos: &mut TaskCollection,
    host: &mut H
  ) -> anyhow::Result<()>
  where
    H: ItemHost
  {
    todos.destroy(self.id, host)
  }

  pub fn remove<D: Dom<Node = N>>(
    &self,
    dom: &mut D
  ) -> anyhow::Result<()> {
    dom.remove(&self.el)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dom::VirtualDom;
  use crate::task::NewTask;

  fn record(completed: bool) -> TaskRecord {
    let mut record = TaskRecord::from_new(
      NewTask::new("Buy milk", 1)
    )
    .unwrap();
    record.completed = completed;
    record
  }

  #[test]
  fn hidden_truth_table() {
    let open = record(false);
    let done = record(true);
    let other =
      Filter::Other("later".to_string());

    assert!(is_hidden(&open, &Filter::Completed));
    assert!(is_hidden(&done, &Filter::Active));

    assert!(!is_hidden(&open, &Filter::All));
    assert!(!is_hidden(&done, &Filter::All));
    assert!(!is_hidden(&open, &Filter::Active));
    assert!(!is_hidden(&done, &Filter::Completed));
    assert!(!is_hidden(&open, &other));
    assert!(!is_hidden(&done, &other));
  }

  #[test]
  fn render_fills_row_from_record() {
    let mut dom = VirtualDom::new();
    let done = record(true);
    let mut view =
      ItemView::new(&mut dom, &done).unwrap();
    view
      .render(&mut dom, &done, &Filter::Active)
      .unwrap();

    let el = *view.el();
    assert!(dom.has_class(&el, "completed"));
    assert!(dom.has_class(&el, "hidden"));
    assert_eq!(
      dom.attribute(&el, "data-id"),
      Some(done.id.to_string())
    );

    let toggle =
      dom.query(&el, ".toggle").unwrap();
    assert!(dom.checked(&toggle));
    let edit = dom.query(&el, ".edit").unwrap();
    assert_eq!(dom.value(&edit), "Buy milk");
  }

  #[test]
  fn render_chains_and_rerender_clears_classes()
  {
    let mut dom = VirtualDom::new();
    let mut rec = record(true);
    let mut view =
      ItemView::new(&mut dom, &rec).unwrap();
    let el = *view
      .render(&mut dom, &rec, &Filter::All)
      .unwrap()
      .el();
    assert!(dom.has_class(&el, "completed"));

    rec.completed = false;
    view.render(&mut dom, &rec, &Filter::All).unwrap();
    assert!(!dom.has_class(&el, "completed"));
    assert!(!dom.has_class(&el, "hidden"));
  }

  #[test]
  fn edit_focuses_the_edit_field() {
    let mut dom = VirtualDom::new();
    let rec = record(false);
    let mut view =
      ItemView::new(&mut dom, &rec).unwrap();
    view.render(&mut dom, &rec, &Filter::All).unwrap();
    view.edit(&mut dom).unwrap();

    let el = *view.el();
    assert!(dom.has_class(&el, "editing"));
    assert_eq!(
      dom.focused(),
      dom.query(&el, ".edit")
    );
  }
}
