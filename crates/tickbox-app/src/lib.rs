pub mod collection;
pub mod dom;
pub mod events;
pub mod filter;
pub mod router;
pub mod store;
pub mod task;
pub mod template;
pub mod views;

pub use collection::TaskCollection;
pub use dom::{
  Dom,
  Key,
  VirtualDom
};
pub use events::{
  CollectionEvent,
  CollectionObserver
};
pub use filter::Filter;
pub use router::FilterRouter;
pub use store::{
  KeyValue,
  KeyValueStore,
  MemoryKv,
  Store
};
pub use task::{
  NewTask,
  TaskPatch,
  TaskRecord
};
pub use views::{
  ItemView,
  ListView,
  UiEvent
};

/// A list view over the page skeleton in
/// a fresh [`VirtualDom`], with the
/// router already run for `fragment`.
pub fn headless(
  store: impl Store + 'static,
  fragment: &str
) -> anyhow::Result<(
  ListView<VirtualDom>,
  FilterRouter
)> {
  let dom = VirtualDom::from_html(
    template::PAGE_SKELETON
  )?;
  let mut view = ListView::start(
    TaskCollection::new(store),
    dom
  )?;
  let mut router = FilterRouter::new();
  router.start(fragment, &mut view)?;
  Ok((view, router))
}
