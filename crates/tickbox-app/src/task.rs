use serde::{
  Deserialize,
  Serialize
};
use uuid::Uuid;

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskRecord {
  pub id:        Uuid,
  #[serde(default)]
  pub title:     String,
  #[serde(default)]
  pub completed: bool,
  #[serde(default)]
  pub order:     u64
}

/// Attributes for a record that does not
/// exist yet.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct NewTask {
  pub title:     String,
  pub order:     u64,
  pub completed: bool
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
)]
pub struct TaskPatch {
  pub title:     Option<String>,
  pub completed: Option<bool>
}

impl NewTask {
  pub fn new(
    title: impl Into<String>,
    order: u64
  ) -> Self {
    Self {
      title: title.into(),
      order,
      completed: false
    }
  }
}

impl TaskPatch {
  pub fn title(
    title: impl Into<String>
  ) -> Self {
    Self {
      title: Some(title.into()),
      ..Self::default()
    }
  }

  pub fn completed(
    completed: bool
  ) -> Self {
    Self {
      completed: Some(completed),
      ..Self::default()
    }
  }
}

impl TaskRecord {
  /// Builds a record with a fresh id.
  /// Returns `None` when the title is
  /// blank once trimmed.
  pub fn from_new(
    attrs: NewTask
  ) -> Option<Self> {
    let title = attrs.title.trim();
    if title.is_empty() {
      return None;
    }

    Some(Self {
      id:        Uuid::new_v4(),
      title:     title.to_string(),
      completed: attrs.completed,
      order:     attrs.order
    })
  }

  pub fn patched(
    &self,
    patch: &TaskPatch
  ) -> Self {
    let mut next = self.clone();
    if let Some(title) = &patch.title
      && !title.trim().is_empty()
    {
      next.title =
        title.trim().to_string();
    }
    if let Some(completed) =
      patch.completed
    {
      next.completed = completed;
    }
    next
  }
}
