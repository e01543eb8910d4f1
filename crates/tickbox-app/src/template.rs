//! Markup for the page skeleton, one todo
//! row, and the footer statistics.

/// Body of the page the list view binds
/// to.
pub const PAGE_SKELETON: &str = r#"<section id="todoapp"><header id="header"><h1>todos</h1><input id="new-todo" placeholder="What needs to be done?" autofocus></header><section id="main"><input id="toggle-all" type="checkbox"><label for="toggle-all">Mark all as complete</label><ul id="todo-list"></ul></section><footer id="footer"></footer></section>"#;

/// Stylesheet for the skeleton. Rows
/// marked `hidden` and the edit field of
/// rows not being edited stay out of view.
pub const PAGE_STYLES: &str =
  include_str!("../assets/page.css");

#[derive(Debug, Clone, Copy)]
pub struct ItemAttrs<'a> {
  pub title:     &'a str,
  pub completed: bool
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub struct StatsAttrs {
  pub completed: usize,
  pub remaining: usize
}

pub fn item(attrs: &ItemAttrs<'_>) -> String {
  let title = escape(attrs.title);
  let checked = if attrs.completed {
    " checked"
  } else {
    ""
  };

  format!(
    "<div class=\"view\"><input class=\"toggle\" type=\"checkbox\"{checked}><label>{title}</label><button class=\"destroy\"></button></div><input class=\"edit\" value=\"{title}\">"
  )
}

pub fn stats(attrs: &StatsAttrs) -> String {
  let mut out = format!(
    "<span id=\"todo-count\"><strong>{}</strong> {} left</span>",
    attrs.remaining,
    pluralize(attrs.remaining, "item")
  );
  out.push_str(
    "<ul id=\"filters\"><li><a href=\"#/\">All</a></li><li><a href=\"#/active\">Active</a></li><li><a href=\"#/completed\">Completed</a></li></ul>"
  );
  if attrs.completed > 0 {
    out.push_str(&format!(
      "<button id=\"clear-completed\">Clear completed ({})</button>",
      attrs.completed
    ));
  }
  out
}

/// `item` for exactly one, `items`
/// otherwise (zero included).
pub fn pluralize(
  count: usize,
  noun: &str
) -> String {
  if count == 1 {
    noun.to_string()
  } else {
    format!("{noun}s")
  }
}

pub fn escape(raw: &str) -> String {
  let mut out =
    String::with_capacity(raw.len());
  for ch in raw.chars() {
    match ch {
      | '&' => out.push_str("&amp;"),
      | '<' => out.push_str("&lt;"),
      | '>' => out.push_str("&gt;"),
      | '"' => out.push_str("&quot;"),
      | '\'' => out.push_str("&#x27;"),
      | '`' => out.push_str("&#x60;"),
      | other => out.push(other)
    }
  }
  out
}
