use std::collections::BTreeMap;

use anyhow::Context;
use tracing::{
  debug,
  warn
};
use uuid::Uuid;

use crate::task::TaskRecord;

pub const DEFAULT_COLLECTION: &str =
  "todos-backbone";

/// Durable storage behind a
/// [`crate::collection::TaskCollection`].
///
/// Every call completes before the
/// collection applies the change in
/// memory, so an `Err` leaves the
/// collection untouched.
pub trait Store {
  fn load_all(
    &self
  ) -> anyhow::Result<Vec<TaskRecord>>;

  /// Creates or replaces the record
  /// with the same id.
  fn save(
    &mut self,
    record: &TaskRecord
  ) -> anyhow::Result<()>;

  fn delete(
    &mut self,
    id: Uuid
  ) -> anyhow::Result<()>;
}

/// String key-value backend, the shape
/// of `window.localStorage`.
pub trait KeyValue {
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>>;

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()>;

  fn remove(
    &mut self,
    key: &str
  ) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
  entries: BTreeMap<String, String>
}

impl MemoryKv {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl KeyValue for MemoryKv {
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    Ok(self.entries.get(key).cloned())
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self.entries.insert(
      key.to_string(),
      value.to_string()
    );
    Ok(())
  }

  fn remove(
    &mut self,
    key: &str
  ) -> anyhow::Result<()> {
    self.entries.remove(key);
    Ok(())
  }
}

/// Stores a collection under `name`:
/// the key `name` holds the comma-joined
/// id list and `name-<id>` holds each
/// record as JSON.
#[derive(Debug, Clone)]
pub struct KeyValueStore<K> {
  name:    String,
  backend: K
}

impl<K: KeyValue> KeyValueStore<K> {
  pub fn new(
    name: impl Into<String>,
    backend: K
  ) -> Self {
    Self {
      name: name.into(),
      backend
    }
  }

  fn record_key(
    &self,
    id: Uuid
  ) -> String {
    format!("{}-{id}", self.name)
  }

  fn ids(
    &self
  ) -> anyhow::Result<Vec<String>> {
    let raw = self
      .backend
      .get(&self.name)
      .with_context(|| {
        format!(
          "failed reading index {}",
          self.name
        )
      })?
      .unwrap_or_default();

    Ok(
      raw
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
    )
  }

  fn write_ids(
    &mut self,
    ids: &[String]
  ) -> anyhow::Result<()> {
    let joined = ids.join(",");
    let name = self.name.clone();
    self
      .backend
      .set(&name, &joined)
      .with_context(|| {
        format!(
          "failed writing index {name}"
        )
      })
  }
}

impl<K: KeyValue> Store
  for KeyValueStore<K>
{
  #[tracing::instrument(skip(self), fields(collection = %self.name))]
  fn load_all(
    &self
  ) -> anyhow::Result<Vec<TaskRecord>> {
    let ids = self.ids()?;
    let mut out =
      Vec::with_capacity(ids.len());

    for id in ids {
      let key =
        format!("{}-{id}", self.name);
      let Some(raw) =
        self.backend.get(&key)?
      else {
        warn!(key = %key, "indexed record missing; skipping");
        continue;
      };
      let record: TaskRecord =
        serde_json::from_str(&raw)
          .with_context(|| {
            format!(
              "failed parsing {key}"
            )
          })?;
      out.push(record);
    }

    debug!(
      count = out.len(),
      "loaded records"
    );
    Ok(out)
  }

  #[tracing::instrument(skip(self, record), fields(collection = %self.name, id = %record.id))]
  fn save(
    &mut self,
    record: &TaskRecord
  ) -> anyhow::Result<()> {
    let key = self.record_key(record.id);
    let json =
      serde_json::to_string(record)?;
    self
      .backend
      .set(&key, &json)
      .with_context(|| {
        format!("failed writing {key}")
      })?;

    let mut ids = self.ids()?;
    let id = record.id.to_string();
    if !ids.contains(&id) {
      ids.push(id);
      self.write_ids(&ids)?;
    }
    Ok(())
  }

  #[tracing::instrument(skip(self), fields(collection = %self.name))]
  fn delete(
    &mut self,
    id: Uuid
  ) -> anyhow::Result<()> {
    let key = self.record_key(id);
    self
      .backend
      .remove(&key)
      .with_context(|| {
        format!("failed removing {key}")
      })?;

    let id = id.to_string();
    let ids: Vec<String> = self
      .ids()?
      .into_iter()
      .filter(|existing| {
        *existing != id
      })
      .collect();
    self.write_ids(&ids)
  }
}

/// Key-value store over a fresh
/// [`MemoryKv`].
pub fn memory_store(
  name: &str
) -> KeyValueStore<MemoryKv> {
  KeyValueStore::new(
    name,
    MemoryKv::new()
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::task::NewTask;

  fn record(
    title: &str,
    order: u64
  ) -> TaskRecord {
    TaskRecord::from_new(NewTask::new(
      title, order
    ))
    .unwrap()
  }

  #[test]
  fn layout_matches_local_storage_adapter()
  {
    let mut store = memory_store("todos");
    let a = record("a", 1);
    let b = record("b", 2);
    store.save(&a).unwrap();
    store.save(&b).unwrap();

    let index = store
      .backend
      .get("todos")
      .unwrap()
      .unwrap();
    assert_eq!(
      index,
      format!("{},{}", a.id, b.id)
    );

    let raw = store
      .backend
      .get(&format!("todos-{}", a.id))
      .unwrap()
      .unwrap();
    let parsed: TaskRecord =
      serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, a);
  }

  #[test]
  fn save_twice_updates_in_place() {
    let mut store = memory_store("todos");
    let mut a = record("a", 1);
    store.save(&a).unwrap();
    a.completed = true;
    store.save(&a).unwrap();

    let all = store.load_all().unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].completed);
  }

  #[test]
  fn delete_drops_record_and_index_entry()
  {
    let mut store = memory_store("todos");
    let a = record("a", 1);
    let b = record("b", 2);
    store.save(&a).unwrap();
    store.save(&b).unwrap();
    store.delete(a.id).unwrap();

    let all = store.load_all().unwrap();
    assert_eq!(all, vec![b.clone()]);
    assert_eq!(
      store.backend.get("todos").unwrap(),
      Some(b.id.to_string())
    );
    // index + one record
    assert_eq!(store.backend.len(), 2);
  }

  #[test]
  fn corrupt_record_reports_its_key() {
    let mut kv = MemoryKv::new();
    let id = Uuid::new_v4();
    kv.set("todos", &id.to_string())
      .unwrap();
    kv.set(
      &format!("todos-{id}"),
      "{not json"
    )
    .unwrap();

    let store =
      KeyValueStore::new("todos", kv);
    let err = store
      .load_all()
      .unwrap_err()
      .to_string();
    assert!(err.contains(&format!(
      "todos-{id}"
    )));
  }
}
