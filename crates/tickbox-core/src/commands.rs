use std::fmt;
use std::io::Write;

use anyhow::{Context, anyhow, bail};
use tickbox_app::{Dom, FilterRouter, Key, ListView, UiEvent, VirtualDom};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::cli::Invocation;
use crate::render::{Renderer, visible_rows};

/// One headless action on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Toggle,
    ToggleAll,
    Edit,
    Delete,
    ClearCompleted,
    List,
    Html,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::Add,
        Command::Toggle,
        Command::ToggleAll,
        Command::Edit,
        Command::Delete,
        Command::ClearCompleted,
        Command::List,
        Command::Html,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Add => "add",
            Command::Toggle => "toggle",
            Command::ToggleAll => "toggle-all",
            Command::Edit => "edit",
            Command::Delete => "delete",
            Command::ClearCompleted => "clear-completed",
            Command::List => "list",
            Command::Html => "html",
        }
    }

    /// The command named `token`, or the only one it is a prefix of.
    pub fn resolve(token: &str) -> anyhow::Result<Self> {
        if let Some(exact) = Self::ALL.into_iter().find(|cmd| cmd.name() == token) {
            return Ok(exact);
        }
        let candidates: Vec<Command> = Self::ALL
            .into_iter()
            .filter(|cmd| !token.is_empty() && cmd.name().starts_with(token))
            .collect();
        match candidates.as_slice() {
            [only] => Ok(*only),
            [] => bail!("unknown command: {token}"),
            several => {
                let names: Vec<&str> = several.iter().map(|cmd| cmd.name()).collect();
                bail!("ambiguous command {token}: {}", names.join(", "))
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Routes each fragment, performs the command as the page events a user
/// would cause, then prints the page.
#[instrument(skip(view, router, renderer, inv, out))]
pub fn dispatch<W: Write>(
    view: &mut ListView<VirtualDom>,
    router: &mut FilterRouter,
    renderer: &Renderer,
    inv: Invocation,
    out: &mut W,
) -> anyhow::Result<()> {
    for fragment in &inv.routes {
        router
            .navigate(fragment, view)
            .with_context(|| format!("failed to route {fragment}"))?;
    }

    debug!(command = %inv.command, args = ?inv.args, "dispatching command");

    match inv.command {
        Command::Add => cmd_add(view, &inv.args)?,
        Command::Toggle => cmd_toggle(view, &inv.args)?,
        Command::ToggleAll => cmd_toggle_all(view)?,
        Command::Edit => cmd_edit(view, &inv.args)?,
        Command::Delete => cmd_delete(view, &inv.args)?,
        Command::ClearCompleted => view.dispatch(UiEvent::ClearCompletedClick)?,
        Command::List => {}
        Command::Html => return renderer.write_html(out, view),
    }

    renderer.write_list(out, view)
}

fn cmd_add(view: &mut ListView<VirtualDom>, args: &[String]) -> anyhow::Result<()> {
    let title = args.join(" ");
    let input = view.new_todo_input().clone();
    view.dom_mut().set_value(&input, &title)?;
    let before = view.todos().len();
    view.dispatch(UiEvent::NewTodoKeyPress(Key::Enter))?;

    if view.todos().len() > before {
        info!(title = %title.trim(), "added todo");
    } else {
        info!("blank title, nothing added");
    }
    Ok(())
}

fn cmd_toggle(view: &mut ListView<VirtualDom>, args: &[String]) -> anyhow::Result<()> {
    let id = row_id(view, args)?;
    view.dispatch(UiEvent::ItemToggleClick(id))
}

fn cmd_toggle_all(view: &mut ListView<VirtualDom>) -> anyhow::Result<()> {
    let control = view.toggle_all_control().clone();
    let next = !view.dom().checked(&control);
    view.dom_mut().set_checked(&control, next)?;
    view.dispatch(UiEvent::ToggleAllClick)
}

fn cmd_edit(view: &mut ListView<VirtualDom>, args: &[String]) -> anyhow::Result<()> {
    let id = row_id(view, args)?;
    let title = args[1..].join(" ");

    view.dispatch(UiEvent::ItemLabelDoubleClick(id))?;
    let input = view
        .item(id)
        .and_then(|item| view.dom().query(item.el(), ".edit"))
        .ok_or_else(|| anyhow!("todo {id} has no edit field"))?;
    view.dom_mut().set_value(&input, &title)?;
    view.dispatch(UiEvent::ItemEditKeyPress(id, Key::Enter))
}

fn cmd_delete(view: &mut ListView<VirtualDom>, args: &[String]) -> anyhow::Result<()> {
    let id = row_id(view, args)?;
    view.dispatch(UiEvent::ItemDestroyClick(id))
}

/// Resolves the leading `<n>` argument against the rows now on screen.
fn row_id(view: &ListView<VirtualDom>, args: &[String]) -> anyhow::Result<Uuid> {
    let raw = args.first().ok_or_else(|| anyhow!("expected a row number"))?;
    let position: usize = raw
        .parse()
        .with_context(|| format!("invalid row number: {raw}"))?;

    let rows = visible_rows(view);
    rows.iter()
        .find(|row| row.position == position)
        .map(|row| row.id)
        .ok_or_else(|| anyhow!("no row {position} (showing {})", rows.len()))
}
