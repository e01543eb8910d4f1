use uuid::Uuid;

use crate::collection::TaskCollection;
use crate::task::TaskRecord;

/// Signal names fired by a
/// [`TaskCollection`], as seen by the
/// catch-all [`CollectionObserver::any`].
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum CollectionEvent {
  Add(Uuid),
  Reset,
  Change(Uuid),
  /// A save that persisted without
  /// changing any attribute.
  Sync(Uuid),
  Destroy(Uuid),
  Filter
}

/// Named callbacks invoked synchronously
/// by every mutating collection call,
/// after the mutation is applied.
///
/// Every method defaults to a no-op so
/// observers only implement what they
/// listen to.
pub trait CollectionObserver {
  fn added(
    &mut self,
    _todos: &TaskCollection,
    _record: &TaskRecord
  ) -> anyhow::Result<()> {
    Ok(())
  }

  fn reset(
    &mut self,
    _todos: &TaskCollection
  ) -> anyhow::Result<()> {
    Ok(())
  }

  fn completed_changed(
    &mut self,
    _todos: &TaskCollection,
    _record: &TaskRecord
  ) -> anyhow::Result<()> {
    Ok(())
  }

  fn changed(
    &mut self,
    _todos: &TaskCollection,
    _record: &TaskRecord
  ) -> anyhow::Result<()> {
    Ok(())
  }

  fn destroyed(
    &mut self,
    _todos: &TaskCollection,
    _record: &TaskRecord
  ) -> anyhow::Result<()> {
    Ok(())
  }

  fn filtered(
    &mut self,
    _todos: &TaskCollection
  ) -> anyhow::Result<()> {
    Ok(())
  }

  fn any(
    &mut self,
    _todos: &TaskCollection,
    _event: CollectionEvent
  ) -> anyhow::Result<()> {
    Ok(())
  }
}

/// Records every signal by name, in
/// firing order.
#[derive(Debug, Default)]
pub struct EventLog {
  pub fired: Vec<String>
}

impl EventLog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn take(&mut self) -> Vec<String> {
    std::mem::take(&mut self.fired)
  }
}

impl CollectionObserver for EventLog {
  fn added(
    &mut self,
    _todos: &TaskCollection,
    record: &TaskRecord
  ) -> anyhow::Result<()> {
    self
      .fired
      .push(format!("add:{}", record.title));
    Ok(())
  }

  fn reset(
    &mut self,
    todos: &TaskCollection
  ) -> anyhow::Result<()> {
    self
      .fired
      .push(format!("reset:{}", todos.len()));
    Ok(())
  }

  fn completed_changed(
    &mut self,
    _todos: &TaskCollection,
    record: &TaskRecord
  ) -> anyhow::Result<()> {
    self.fired.push(format!(
      "change:completed:{}",
      record.title
    ));
    Ok(())
  }

  fn changed(
    &mut self,
    _todos: &TaskCollection,
    record: &TaskRecord
  ) -> anyhow::Result<()> {
    self.fired.push(format!(
      "change:{}",
      record.title
    ));
    Ok(())
  }

  fn destroyed(
    &mut self,
    _todos: &TaskCollection,
    record: &TaskRecord
  ) -> anyhow::Result<()> {
    self.fired.push(format!(
      "destroy:{}",
      record.title
    ));
    Ok(())
  }

  fn filtered(
    &mut self,
    _todos: &TaskCollection
  ) -> anyhow::Result<()> {
    self.fired.push("filter".to_string());
    Ok(())
  }

  fn any(
    &mut self,
    _todos: &TaskCollection,
    event: CollectionEvent
  ) -> anyhow::Result<()> {
    let name = match event {
      | CollectionEvent::Add(_) => "add",
      | CollectionEvent::Reset => "reset",
      | CollectionEvent::Change(_) => {
        "change"
      }
      | CollectionEvent::Sync(_) => "sync",
      | CollectionEvent::Destroy(_) => {
        "destroy"
      }
      | CollectionEvent::Filter => {
        "filter"
      }
    };
    self.fired.push(format!("all:{name}"));
    Ok(())
  }
}
