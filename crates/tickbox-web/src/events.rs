use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use tickbox_app::{
  FilterRouter,
  Key,
  ListView,
  UiEvent
};
use tracing::{
  debug,
  error
};
use uuid::Uuid;
use wasm_bindgen::JsCast;
use web_sys::{
  Element,
  Event,
  KeyboardEvent,
  Location,
  Window
};

use crate::dom::WebDom;

/// Everything the listeners share.
#[derive(Debug)]
pub struct App {
  pub view:   ListView<WebDom>,
  pub router: FilterRouter
}

pub type Shared = Rc<RefCell<App>>;

const DELEGATED: &[&str] =
  &["click", "dblclick", "keypress", "focusout"];

/// Listens on `root` for every page
/// event and on `window` for fragment
/// changes, for the life of the page.
pub fn bind(
  app: &Shared,
  root: &Element,
  window: &Window
) {
  for kind in DELEGATED {
    let app = app.clone();
    EventListener::new(
      root,
      *kind,
      move |event| {
        if let Some(ui) =
          ui_event(kind, event)
        {
          deliver(&app, ui);
        }
      }
    )
    .forget();
  }

  let app = app.clone();
  let location = window.location();
  EventListener::new(
    window,
    "hashchange",
    move |_| {
      follow_hash(&app, &location);
    }
  )
  .forget();
}

/// Routes to the window's current
/// fragment. A change that lands while a
/// handler holds the app is retried after
/// that handler returns, reading the hash
/// again at that point.
fn follow_hash(
  app: &Shared,
  location: &Location
) {
  let Ok(mut state) = app.try_borrow_mut()
  else {
    debug!("hashchange while busy; deferred");
    let app = app.clone();
    let location = location.clone();
    Timeout::new(0, move || {
      follow_hash(&app, &location);
    })
    .forget();
    return;
  };
  let fragment =
    location.hash().unwrap_or_default();
  let App { view, router } = &mut *state;
  if let Err(err) =
    router.sync(&fragment, view)
  {
    error!(error = %format!("{err:#}"), fragment, "route failed");
  }
}

/// Matches an event against the page's
/// `(event, selector)` table.
fn ui_event(
  kind: &str,
  event: &Event
) -> Option<UiEvent> {
  let target = event
    .target()?
    .dyn_into::<Element>()
    .ok()?;
  let id = target.id();
  let classes = target.class_list();

  match kind {
    | "click" if id == "clear-completed" => {
      Some(UiEvent::ClearCompletedClick)
    }
    | "click" if id == "toggle-all" => {
      Some(UiEvent::ToggleAllClick)
    }
    | "click" if classes.contains("toggle") => {
      row_id(&target)
        .map(UiEvent::ItemToggleClick)
    }
    | "click" if classes.contains("destroy") => {
      row_id(&target)
        .map(UiEvent::ItemDestroyClick)
    }
    | "dblclick"
      if target.tag_name().eq_ignore_ascii_case("label") =>
    {
      row_id(&target)
        .map(UiEvent::ItemLabelDoubleClick)
    }
    | "keypress" if id == "new-todo" => {
      Some(UiEvent::NewTodoKeyPress(key(
        event
      )))
    }
    | "keypress" if classes.contains("edit") => {
      row_id(&target).map(|row| {
        UiEvent::ItemEditKeyPress(
          row,
          key(event)
        )
      })
    }
    | "focusout" if classes.contains("edit") => {
      row_id(&target)
        .map(UiEvent::ItemEditBlur)
    }
    | _ => None
  }
}

fn key(event: &Event) -> Key {
  event
    .dyn_ref::<KeyboardEvent>()
    .map_or(Key::Other, |ke| {
      Key::from_name(&ke.key())
    })
}

fn row_id(target: &Element) -> Option<Uuid> {
  target
    .closest("li[data-id]")
    .ok()
    .flatten()
    .and_then(|li| li.get_attribute("data-id"))
    .and_then(|raw| Uuid::parse_str(&raw).ok())
}

/// Runs one event against the view.
///
/// Re-rendering a row removes its focused
/// edit field, which fires `focusout`
/// while the view is still borrowed; that
/// nested event is dropped.
fn deliver(app: &Shared, event: UiEvent) {
  let Ok(mut state) = app.try_borrow_mut()
  else {
    debug!(?event, "nested event skipped");
    return;
  };
  if let Err(err) =
    state.view.dispatch(event)
  {
    error!(error = %format!("{err:#}"), ?event, "event handler failed");
  }
}
