use anyhow::{
  Context,
  anyhow
};
use tracing::{
  debug,
  info,
  warn
};
use uuid::Uuid;

use super::UiEvent;
use super::item::{
  ItemHost,
  ItemView
};
use crate::collection::TaskCollection;
use crate::dom::{
  Dom,
  Key
};
use crate::events::{
  CollectionEvent,
  CollectionObserver
};
use crate::filter::{
  self,
  Filter
};
use crate::task::{
  NewTask,
  TaskPatch,
  TaskRecord
};
use crate::template::{
  self,
  StatsAttrs
};

/// The page chrome plus the registry of
/// item views. Receives every collection
/// signal.
#[derive(Debug)]
pub struct Page<D: Dom> {
  dom:        D,
  input:      D::Node,
  toggle_all: D::Node,
  main:       D::Node,
  footer:     D::Node,
  list:       D::Node,
  items:      Vec<ItemView<D::Node>>
}

impl<D: Dom> Page<D> {
  fn bind(dom: D) -> anyhow::Result<Self> {
    let find = |id: &str| {
      dom.element_by_id(id).ok_or_else(|| {
        anyhow!("missing #{id} element")
      })
    };

    Ok(Self {
      input: find("new-todo")?,
      toggle_all: find("toggle-all")?,
      main: find("main")?,
      footer: find("footer")?,
      list: find("todo-list")?,
      items: vec![],
      dom
    })
  }

  fn item(
    &self,
    id: Uuid
  ) -> anyhow::Result<&ItemView<D::Node>> {
    self
      .items
      .iter()
      .find(|item| item.id() == id)
      .ok_or_else(|| {
        anyhow!("no item view for {id}")
      })
  }

  fn render(
    &mut self,
    todos: &TaskCollection
  ) -> anyhow::Result<()> {
    let filter = filter::current();
    let completed =
      todos.completed().count();
    let remaining =
      todos.remaining().count();

    if todos.is_empty() {
      self.dom.set_shown(&self.main, false)?;
      self
        .dom
        .set_shown(&self.footer, false)?;
    } else {
      self.dom.set_shown(&self.main, true)?;
      self
        .dom
        .set_shown(&self.footer, true)?;
      self.dom.set_inner_html(
        &self.footer,
        &template::stats(&StatsAttrs {
          completed,
          remaining
        })
      )?;

      let selected = filter.href();
      for link in self
        .dom
        .query_all(&self.footer, "#filters li a")
      {
        let on = self
          .dom
          .attribute(&link, "href")
          .is_some_and(|href| href == selected);
        self
          .dom
          .toggle_class(&link, "selected", on)?;
      }
    }

    self
      .dom
      .set_checked(&self.toggle_all, remaining == 0)
  }

  fn add_one(
    &mut self,
    record: &TaskRecord,
    filter: &Filter
  ) -> anyhow::Result<()> {
    let mut view =
      ItemView::new(&mut self.dom, record)?;
    let el = view
      .render(&mut self.dom, record, filter)?
      .el()
      .clone();
    self.dom.append_child(&self.list, &el)?;
    self.items.push(view);
    Ok(())
  }

  fn add_all(
    &mut self,
    todos: &TaskCollection
  ) -> anyhow::Result<()> {
    let filter = filter::current();
    self.dom.set_inner_html(&self.list, "")?;
    self.items.clear();
    for record in todos.iter() {
      self.add_one(record, &filter)?;
    }
    debug!(
      count = self.items.len(),
      "rebuilt item views"
    );
    Ok(())
  }

  fn filter_one(
    &mut self,
    record: &TaskRecord,
    filter: &Filter
  ) -> anyhow::Result<()> {
    let Some(view) = self
      .items
      .iter()
      .find(|item| item.id() == record.id)
    else {
      warn!(id = %record.id, "no item view to filter");
      return Ok(());
    };
    view.toggle_visible(
      &mut self.dom,
      record,
      filter
    )
  }

  fn filter_all(
    &mut self,
    todos: &TaskCollection
  ) -> anyhow::Result<()> {
    let filter = filter::current();
    for record in todos.iter() {
      self.filter_one(record, &filter)?;
    }
    Ok(())
  }
}

impl<D: Dom> CollectionObserver for Page<D> {
  fn added(
    &mut self,
    _todos: &TaskCollection,
    record: &TaskRecord
  ) -> anyhow::Result<()> {
    self.add_one(record, &filter::current())
  }

  fn reset(
    &mut self,
    todos: &TaskCollection
  ) -> anyhow::Result<()> {
    self.add_all(todos)
  }

  fn completed_changed(
    &mut self,
    _todos: &TaskCollection,
    record: &TaskRecord
  ) -> anyhow::Result<()> {
    self.filter_one(record, &filter::current())
  }

  fn changed(
    &mut self,
    _todos: &TaskCollection,
    record: &TaskRecord
  ) -> anyhow::Result<()> {
    let filter = filter::current();
    let Some(view) = self
      .items
      .iter_mut()
      .find(|item| item.id() == record.id)
    else {
      warn!(id = %record.id, "no item view to re-render");
      return Ok(());
    };
    view.render(&mut self.dom, record, &filter)?;
    Ok(())
  }

  fn destroyed(
    &mut self,
    _todos: &TaskCollection,
    record: &TaskRecord
  ) -> anyhow::Result<()> {
    let Some(idx) = self
      .items
      .iter()
      .position(|item| item.id() == record.id)
    else {
      return Ok(());
    };
    let view = self.items.remove(idx);
    view.remove(&mut self.dom)
  }

  fn filtered(
    &mut self,
    todos: &TaskCollection
  ) -> anyhow::Result<()> {
    self.filter_all(todos)
  }

  fn any(
    &mut self,
    todos: &TaskCollection,
    _event: CollectionEvent
  ) -> anyhow::Result<()> {
    self.render(todos)
  }
}

impl<D: Dom> ItemHost for Page<D> {
  type Dom = D;

  fn dom(&mut self) -> &mut D {
    &mut self.dom
  }
}

/// Top-level controller: the new-todo
/// input, the list, the footer and the
/// toggle-all control.
#[derive(Debug)]
pub struct ListView<D: Dom> {
  todos: TaskCollection,
  page:  Page<D>
}

impl<D: Dom> ListView<D> {
  /// Binds to the page skeleton already
  /// in `dom`, then fetches the stored
  /// todos.
  #[tracing::instrument(skip_all)]
  pub fn start(
    todos: TaskCollection,
    dom: D
  ) -> anyhow::Result<Self> {
    let page = Page::bind(dom)
      .context("page skeleton incomplete")?;
    let mut view = Self { todos, page };
    view.todos.fetch(&mut view.page)?;
    info!(
      count = view.todos.len(),
      "list view started"
    );
    Ok(view)
  }

  pub fn todos(&self) -> &TaskCollection {
    &self.todos
  }

  pub fn dom(&self) -> &D {
    &self.page.dom
  }

  pub fn dom_mut(&mut self) -> &mut D {
    &mut self.page.dom
  }

  pub fn items(&self) -> &[ItemView<D::Node>] {
    &self.page.items
  }

  pub fn item(
    &self,
    id: Uuid
  ) -> Option<&ItemView<D::Node>> {
    self.page.item(id).ok()
  }

  pub fn new_todo_input(&self) -> &D::Node {
    &self.page.input
  }

  pub fn toggle_all_control(&self) -> &D::Node {
    &self.page.toggle_all
  }

  pub fn main_section(&self) -> &D::Node {
    &self.page.main
  }

  pub fn footer(&self) -> &D::Node {
    &self.page.footer
  }

  pub fn todo_list(&self) -> &D::Node {
    &self.page.list
  }

  /// Reloads every record from storage
  /// and rebuilds the rows.
  pub fn fetch(&mut self) -> anyhow::Result<()> {
    self.todos.fetch(&mut self.page)
  }

  pub fn render(&mut self) -> anyhow::Result<()> {
    self.page.render(&self.todos)
  }

  pub fn add_one(
    &mut self,
    record: &TaskRecord
  ) -> anyhow::Result<()> {
    self
      .page
      .add_one(record, &filter::current())
  }

  pub fn add_all(&mut self) -> anyhow::Result<()> {
    self.page.add_all(&self.todos)
  }

  pub fn filter_one(
    &mut self,
    id: Uuid
  ) -> anyhow::Result<()> {
    let record = self
      .todos
      .get(id)
      .ok_or_else(|| anyhow!("todo not found: {id}"))?;
    self
      .page
      .filter_one(record, &filter::current())
  }

  pub fn filter_all(&mut self) -> anyhow::Result<()> {
    self.page.filter_all(&self.todos)
  }

  /// Announces a filter change to every
  /// listener of the collection.
  pub fn trigger_filter(
    &mut self
  ) -> anyhow::Result<()> {
    self.todos.trigger_filter(&mut self.page)
  }

  pub fn create_on_enter(
    &mut self,
    key: Key
  ) -> anyhow::Result<()> {
    if key != Key::Enter {
      return Ok(());
    }
    let raw = self.page.dom.value(&self.page.input);
    let title = raw.trim();
    if title.is_empty() {
      return Ok(());
    }

    let attrs = NewTask {
      title:     title.to_string(),
      order:     self.todos.next_order()?,
      completed: false
    };
    self.todos.create(attrs, &mut self.page)?;
    self.page.dom.set_value(&self.page.input, "")
  }

  pub fn clear_completed(
    &mut self
  ) -> anyhow::Result<()> {
    let ids: Vec<Uuid> = self
      .todos
      .completed()
      .map(|record| record.id)
      .collect();
    debug!(count = ids.len(), "clearing completed");
    for id in ids {
      self.todos.destroy(id, &mut self.page)?;
    }
    Ok(())
  }

  pub fn toggle_all_complete(
    &mut self
  ) -> anyhow::Result<()> {
    let completed = self
      .page
      .dom
      .checked(&self.page.toggle_all);
    let ids: Vec<Uuid> =
      self.todos.iter().map(|record| record.id).collect();
    debug!(completed, count = ids.len(), "toggling all");
    for id in ids {
      self.todos.save(
        id,
        &TaskPatch::completed(completed),
        &mut self.page
      )?;
    }
    Ok(())
  }

  pub fn toggle_completed(
    &mut self,
    id: Uuid
  ) -> anyhow::Result<()> {
    let view = self.page.item(id)?.clone();
    view.toggle_completed(&mut self.todos, &mut self.page)
  }

  pub fn edit(&mut self, id: Uuid) -> anyhow::Result<()> {
    let view = self.page.item(id)?.clone();
    view.edit(&mut self.page.dom)
  }

  pub fn close(&mut self, id: Uuid) -> anyhow::Result<()> {
    let view = self.page.item(id)?.clone();
    view.close(&mut self.todos, &mut self.page)
  }

  pub fn update_on_enter(
    &mut self,
    id: Uuid,
    key: Key
  ) -> anyhow::Result<()> {
    let view = self.page.item(id)?.clone();
    view.update_on_enter(
      key,
      &mut self.todos,
      &mut self.page
    )
  }

  pub fn clear(&mut self, id: Uuid) -> anyhow::Result<()> {
    let view = self.page.item(id)?.clone();
    view.clear(&mut self.todos, &mut self.page)
  }

  #[tracing::instrument(skip(self))]
  pub fn dispatch(
    &mut self,
    event: UiEvent
  ) -> anyhow::Result<()> {
    match event {
      | UiEvent::NewTodoKeyPress(key) => {
        self.create_on_enter(key)
      }
      | UiEvent::ClearCompletedClick => {
        self.clear_completed()
      }
      | UiEvent::ToggleAllClick => {
        self.toggle_all_complete()
      }
      | UiEvent::ItemToggleClick(id) => {
        self.toggle_completed(id)
      }
      | UiEvent::ItemLabelDoubleClick(id) => {
        self.edit(id)
      }
      | UiEvent::ItemDestroyClick(id) => {
        self.clear(id)
      }
      | UiEvent::ItemEditKeyPress(id, key) => {
        self.update_on_enter(id, key)
      }
      | UiEvent::ItemEditBlur(id) => {
        self.close(id)
      }
    }
  }
}
