use std::io::Write;

use anyhow::anyhow;
use tickbox_app::{Dom, ListView, VirtualDom};
use tracing::warn;
use uuid::Uuid;

/// One item row as the page currently shows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub position: usize,
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
}

/// Reads the rendered, unhidden `li` rows out of the list, in page order.
/// Positions are 1-based.
pub fn visible_rows(view: &ListView<VirtualDom>) -> Vec<Row> {
    let dom = view.dom();
    let mut rows = Vec::new();

    for li in dom.query_all(view.todo_list(), "li") {
        if dom.has_class(&li, "hidden") {
            continue;
        }

        let Some(id) = dom
            .attribute(&li, "data-id")
            .and_then(|raw| Uuid::parse_str(&raw).ok())
        else {
            warn!(?li, "list row without a usable data-id");
            continue;
        };

        let title = dom
            .query(&li, "label")
            .map(|label| dom.text(label))
            .unwrap_or_default();

        rows.push(Row {
            position: rows.len() + 1,
            id,
            title,
            completed: dom.has_class(&li, "completed"),
        });
    }

    rows
}

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Prints the page as text: numbered rows, then the footer.
    #[tracing::instrument(skip_all)]
    pub fn write_list<W: Write>(
        &self,
        out: &mut W,
        view: &ListView<VirtualDom>,
    ) -> anyhow::Result<()> {
        let dom = view.dom();
        if !dom.is_shown(view.main_section()) {
            writeln!(out, "nothing to do")?;
            return Ok(());
        }

        for row in visible_rows(view) {
            let mark = if row.completed { "[x]" } else { "[ ]" };
            let title = if row.completed {
                self.paint(&row.title, "2")
            } else {
                row.title
            };
            writeln!(out, "{:>3} {} {}", self.paint(&row.position.to_string(), "33"), mark, title)?;
        }

        let footer = view.footer();
        if !dom.is_shown(footer) {
            return Ok(());
        }
        writeln!(out)?;

        let count = dom
            .query(footer, "#todo-count")
            .ok_or_else(|| anyhow!("footer has no #todo-count"))?;
        writeln!(out, "{}", dom.text(count).trim())?;

        let links: Vec<String> = dom
            .query_all(footer, "#filters li a")
            .into_iter()
            .map(|link| {
                let label = dom.text(link);
                if dom.has_class(&link, "selected") {
                    self.paint(&format!("[{label}]"), "1")
                } else {
                    label
                }
            })
            .collect();
        writeln!(out, "{}", links.join("  "))?;

        if let Some(clear) = dom.query(footer, "#clear-completed") {
            writeln!(out, "{}", dom.text(clear).trim())?;
        }

        Ok(())
    }

    /// Prints the markup of the whole `#todoapp` section.
    pub fn write_html<W: Write>(&self, out: &mut W, view: &ListView<VirtualDom>) -> anyhow::Result<()> {
        let dom = view.dom();
        let app = dom
            .element_by_id("todoapp")
            .ok_or_else(|| anyhow!("missing #todoapp element"))?;
        writeln!(out, "{}", dom.outer_html(app))?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}
