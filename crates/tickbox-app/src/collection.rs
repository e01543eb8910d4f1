use std::fmt;

use anyhow::{
  Context,
  anyhow
};
use tracing::{
  debug,
  info
};
use uuid::Uuid;

use crate::events::{
  CollectionEvent,
  CollectionObserver
};
use crate::store::Store;
use crate::task::{
  NewTask,
  TaskPatch,
  TaskRecord
};

/// Ordered set of task records bound to
/// a [`Store`].
///
/// Mutations persist first, then update
/// memory, then fire the observer's
/// callbacks. A persistence error returns
/// before anything in memory changes.
pub struct TaskCollection {
  records: Vec<TaskRecord>,
  store:   Box<dyn Store>
}

impl fmt::Debug for TaskCollection {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.debug_struct("TaskCollection")
      .field("records", &self.records)
      .finish_non_exhaustive()
  }
}

impl TaskCollection {
  pub fn new(
    store: impl Store + 'static
  ) -> Self {
    Self {
      records: vec![],
      store:   Box::new(store)
    }
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn iter(
    &self
  ) -> impl Iterator<Item = &TaskRecord>
  {
    self.records.iter()
  }

  pub fn get(
    &self,
    id: Uuid
  ) -> Option<&TaskRecord> {
    self
      .records
      .iter()
      .find(|record| record.id == id)
  }

  pub fn completed(
    &self
  ) -> impl Iterator<Item = &TaskRecord>
  {
    self
      .records
      .iter()
      .filter(|record| record.completed)
  }

  pub fn remaining(
    &self
  ) -> impl Iterator<Item = &TaskRecord>
  {
    self
      .records
      .iter()
      .filter(|record| !record.completed)
  }

  /// One past the highest order in the
  /// collection, or 1 when empty. Fails
  /// when stored data already holds
  /// `u64::MAX`.
  pub fn next_order(
    &self
  ) -> anyhow::Result<u64> {
    let Some(max) = self
      .records
      .iter()
      .map(|record| record.order)
      .max()
    else {
      return Ok(1);
    };
    max.checked_add(1).ok_or_else(|| {
      anyhow!("no order left after {max}")
    })
  }

  /// Loads every stored record, replacing
  /// what is in memory.
  #[tracing::instrument(skip_all)]
  pub fn fetch(
    &mut self,
    observer: &mut dyn CollectionObserver
  ) -> anyhow::Result<()> {
    let mut records = self
      .store
      .load_all()
      .context("failed to load todos")?;
    records.sort_by_key(|record| {
      record.order
    });
    info!(
      count = records.len(),
      "fetched todos"
    );
    self.records = records;

    observer.reset(self)?;
    observer
      .any(self, CollectionEvent::Reset)
  }

  /// Returns `None` without touching the
  /// store when the title is blank.
  #[tracing::instrument(skip(self, observer))]
  pub fn create(
    &mut self,
    attrs: NewTask,
    observer: &mut dyn CollectionObserver
  ) -> anyhow::Result<Option<Uuid>> {
    let Some(record) =
      TaskRecord::from_new(attrs)
    else {
      debug!("blank title; nothing created");
      return Ok(None);
    };

    self.store.save(&record).with_context(
      || {
        format!(
          "failed to persist new todo {}",
          record.id
        )
      }
    )?;

    let idx =
      self.records.partition_point(
        |existing| {
          existing.order <= record.order
        }
      );
    let id = record.id;
    self.records.insert(idx, record.clone());
    info!(id = %id, order = record.order, "created todo");

    observer.added(self, &record)?;
    observer.any(
      self,
      CollectionEvent::Add(id)
    )?;
    Ok(Some(id))
  }

  #[tracing::instrument(skip(self, observer))]
  pub fn save(
    &mut self,
    id: Uuid,
    patch: &TaskPatch,
    observer: &mut dyn CollectionObserver
  ) -> anyhow::Result<()> {
    let idx = self.position(id)?;
    let before = &self.records[idx];
    let after = before.patched(patch);
    let completed_changed =
      before.completed != after.completed;
    let changed = *before != after;

    self.store.save(&after).with_context(
      || {
        format!(
          "failed to persist todo {id}"
        )
      }
    )?;
    self.records[idx] = after.clone();
    debug!(
      id = %id,
      changed,
      completed = after.completed,
      "saved todo"
    );

    if completed_changed {
      observer
        .completed_changed(self, &after)?;
    }
    if changed {
      observer.changed(self, &after)?;
      observer.any(
        self,
        CollectionEvent::Change(id)
      )
    } else {
      observer.any(
        self,
        CollectionEvent::Sync(id)
      )
    }
  }

  pub fn toggle(
    &mut self,
    id: Uuid,
    observer: &mut dyn CollectionObserver
  ) -> anyhow::Result<()> {
    let completed =
      self.records[self.position(id)?]
        .completed;
    self.save(
      id,
      &TaskPatch::completed(!completed),
      observer
    )
  }

  #[tracing::instrument(skip(self, observer))]
  pub fn destroy(
    &mut self,
    id: Uuid,
    observer: &mut dyn CollectionObserver
  ) -> anyhow::Result<()> {
    let idx = self.position(id)?;
    self.store.delete(id).with_context(
      || {
        format!(
          "failed to delete todo {id}"
        )
      }
    )?;
    let record = self.records.remove(idx);
    info!(id = %id, "destroyed todo");

    observer.destroyed(self, &record)?;
    observer.any(
      self,
      CollectionEvent::Destroy(id)
    )
  }

  /// Broadcasts a filter change to the
  /// observer.
  pub fn trigger_filter(
    &self,
    observer: &mut dyn CollectionObserver
  ) -> anyhow::Result<()> {
    observer.filtered(self)?;
    observer
      .any(self, CollectionEvent::Filter)
  }

  fn position(
    &self,
    id: Uuid
  ) -> anyhow::Result<usize> {
    self
      .records
      .iter()
      .position(|record| record.id == id)
      .ok_or_else(|| {
        anyhow!("todo not found: {id}")
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::events::EventLog;
  use crate::store::memory_store;

  fn collection() -> TaskCollection {
    TaskCollection::new(memory_store(
      "todos"
    ))
  }

  fn add(
    todos: &mut TaskCollection,
    title: &str
  ) -> Uuid {
    let order = todos.next_order().unwrap();
    todos
      .create(
        NewTask::new(title, order),
        &mut EventLog::new()
      )
      .unwrap()
      .unwrap()
  }

  #[test]
  fn next_order_starts_at_one_and_follows_max()
  {
    let mut todos = collection();
    assert_eq!(todos.next_order().unwrap(), 1);

    let a = add(&mut todos, "a");
    add(&mut todos, "b");
    let c = add(&mut todos, "c");
    assert_eq!(todos.next_order().unwrap(), 4);

    todos
      .destroy(a, &mut EventLog::new())
      .unwrap();
    assert_eq!(todos.next_order().unwrap(), 4);

    todos
      .destroy(c, &mut EventLog::new())
      .unwrap();
    assert_eq!(todos.next_order().unwrap(), 3);
  }

  #[test]
  fn create_appends_with_greater_order() {
    let mut todos = collection();
    for title in ["one", "two", "three"] {
      let before: Vec<u64> = todos
        .iter()
        .map(|r| r.order)
        .collect();
      let id = add(&mut todos, title);
      let created =
        todos.get(id).unwrap().order;
      assert!(
        before.iter().all(|o| *o < created)
      );
    }
    assert_eq!(todos.len(), 3);
  }

  #[test]
  fn blank_create_changes_nothing() {
    let mut todos = collection();
    let mut log = EventLog::new();
    let created = todos
      .create(NewTask::new("  \t ", 1), &mut log)
      .unwrap();
    assert!(created.is_none());
    assert!(todos.is_empty());
    assert!(log.fired.is_empty());
  }

  #[test]
  fn signals_fire_in_order() {
    let mut todos = collection();
    let mut log = EventLog::new();
    let id = todos
      .create(NewTask::new("milk", 1), &mut log)
      .unwrap()
      .unwrap();
    assert_eq!(
      log.take(),
      vec!["add:milk", "all:add"]
    );

    todos.toggle(id, &mut log).unwrap();
    assert_eq!(
      log.take(),
      vec![
        "change:completed:milk",
        "change:milk",
        "all:change"
      ]
    );

    todos
      .save(id, &TaskPatch::title("milk"), &mut log)
      .unwrap();
    assert_eq!(log.take(), vec!["all:sync"]);

    todos.trigger_filter(&mut log).unwrap();
    assert_eq!(
      log.take(),
      vec!["filter", "all:filter"]
    );

    todos.destroy(id, &mut log).unwrap();
    assert_eq!(
      log.take(),
      vec!["destroy:milk", "all:destroy"]
    );
  }

  #[test]
  fn derived_subsets_are_live() {
    let mut todos = collection();
    let a = add(&mut todos, "a");
    add(&mut todos, "b");
    assert_eq!(todos.remaining().count(), 2);
    assert_eq!(todos.completed().count(), 0);

    todos
      .toggle(a, &mut EventLog::new())
      .unwrap();
    assert_eq!(todos.remaining().count(), 1);
    assert_eq!(todos.completed().count(), 1);
  }

  #[test]
  fn unknown_id_is_an_error() {
    let mut todos = collection();
    let err = todos
      .toggle(
        Uuid::new_v4(),
        &mut EventLog::new()
      )
      .unwrap_err();
    assert!(
      err.to_string().contains("not found")
    );
  }
}
