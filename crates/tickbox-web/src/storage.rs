use anyhow::anyhow;
use tickbox_app::KeyValue;
use web_sys::Storage;

use crate::dom::js_err;

/// `window.localStorage` as a key-value
/// backend.
#[derive(Debug, Clone)]
pub struct LocalStorageKv {
  storage: Storage
}

impl LocalStorageKv {
  pub fn open() -> anyhow::Result<Self> {
    let storage = web_sys::window()
      .ok_or_else(|| {
        anyhow!("no window available")
      })?
      .local_storage()
      .map_err(js_err)?
      .ok_or_else(|| {
        anyhow!(
          "localStorage is disabled"
        )
      })?;
    Ok(Self { storage })
  }
}

impl KeyValue for LocalStorageKv {
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    self
      .storage
      .get_item(key)
      .map_err(js_err)
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self
      .storage
      .set_item(key, value)
      .map_err(js_err)
  }

  fn remove(
    &mut self,
    key: &str
  ) -> anyhow::Result<()> {
    self
      .storage
      .remove_item(key)
      .map_err(js_err)
  }
}
