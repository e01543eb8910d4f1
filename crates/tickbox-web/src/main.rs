mod dom;
mod events;
mod storage;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{
  Context,
  anyhow
};
use tickbox_app::store::DEFAULT_COLLECTION;
use tickbox_app::{
  Dom,
  FilterRouter,
  KeyValueStore,
  ListView,
  TaskCollection,
  template
};

use crate::dom::{
  WebDom,
  js_err
};
use crate::events::App;
use crate::storage::LocalStorageKv;

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting tickbox frontend"
  );

  if let Err(err) = start() {
    tracing::error!(error = %format!("{err:#}"), "tickbox failed to start");
  }
}

fn start() -> anyhow::Result<()> {
  let window = web_sys::window()
    .ok_or_else(|| {
      anyhow!("no window available")
    })?;

  let mut dom = WebDom::new()?;
  dom.add_styles(template::PAGE_STYLES)?;
  let mount = dom
    .element_by_id("app")
    .ok_or_else(|| {
      anyhow!(
        "missing #app mount element"
      )
    })?;
  dom.set_inner_html(
    &mount,
    template::PAGE_SKELETON
  )?;

  let store = KeyValueStore::new(
    DEFAULT_COLLECTION,
    LocalStorageKv::open()?
  );
  let mut view = ListView::start(
    TaskCollection::new(store),
    dom
  )
  .context("failed to start list view")?;

  let fragment = window
    .location()
    .hash()
    .map_err(js_err)?;
  let mut router = FilterRouter::new();
  router.start(&fragment, &mut view)?;

  let root = view
    .dom()
    .element_by_id("todoapp")
    .ok_or_else(|| {
      anyhow!("missing #todoapp element")
    })?;

  let app =
    Rc::new(RefCell::new(App {
      view,
      router
    }));
  events::bind(&app, &root, &window);
  Ok(())
}
