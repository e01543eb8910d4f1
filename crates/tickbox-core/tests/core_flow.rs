use std::fs;

use tempfile::tempdir;
use tickbox_app::{FilterRouter, ListView, Store, VirtualDom};
use tickbox_core::cli::Invocation;
use tickbox_core::commands::{Command, dispatch};
use tickbox_core::datastore::FileStore;
use tickbox_core::render::{Renderer, visible_rows};

fn invocation(routes: &[&str], command: &str, args: &[&str]) -> Invocation {
    Invocation {
        routes: routes.iter().map(|r| r.to_string()).collect(),
        command: Command::resolve(command).expect("known command"),
        args: args.iter().map(|a| a.to_string()).collect(),
    }
}

fn run(
    view: &mut ListView<VirtualDom>,
    router: &mut FilterRouter,
    inv: Invocation,
) -> anyhow::Result<String> {
    let mut out = Vec::new();
    dispatch(view, router, &Renderer::new(false), inv, &mut out)?;
    Ok(String::from_utf8(out).expect("utf8 output"))
}

#[test]
fn datastore_survives_reopen() {
    let temp = tempdir().expect("tempdir");
    let store = FileStore::open(temp.path(), "todos-backbone").expect("open datastore");
    let (mut view, mut router) = tickbox_app::headless(store, "").expect("headless page");

    run(&mut view, &mut router, invocation(&[], "add", &["Buy", "milk"])).expect("add");
    run(&mut view, &mut router, invocation(&[], "add", &["Walk", "dog"])).expect("add");
    run(&mut view, &mut router, invocation(&[], "toggle", &["1"])).expect("toggle");

    let reopened = FileStore::open(temp.path(), "todos-backbone").expect("reopen datastore");
    let mut records = reopened.load_all().expect("load");
    records.sort_by_key(|r| r.order);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "Buy milk");
    assert!(records[0].completed);
    assert_eq!(records[1].title, "Walk dog");
    assert!(!records[1].completed);

    let (view, _router) = tickbox_app::headless(reopened, "").expect("second page");
    let titles: Vec<String> = visible_rows(&view).into_iter().map(|row| row.title).collect();
    assert_eq!(titles, vec!["Buy milk".to_string(), "Walk dog".to_string()]);
}

#[test]
fn corrupt_lines_are_reported_with_position() {
    let temp = tempdir().expect("tempdir");
    let store = FileStore::open(temp.path(), "work").expect("open datastore");
    fs::write(
        &store.path,
        "{\"id\":\"6f1c2a52-2f4e-4f3e-9a57-0c1d7a3c9b10\",\"title\":\"ok\",\"completed\":false,\"order\":1}\nnot json\n",
    )
    .expect("write data file");

    let err = store.load_all().expect_err("corrupt file must fail");
    let message = format!("{err:#}");
    assert!(message.contains("line 2"), "{message}");
    assert!(tickbox_app::headless(store, "").is_err());
}

#[test]
fn collection_names_cannot_escape_the_data_dir() {
    let temp = tempdir().expect("tempdir");
    assert!(FileStore::open(temp.path(), "../elsewhere").is_err());
    assert!(FileStore::open(temp.path(), "").is_err());
}

#[test]
fn run_opens_the_named_collection() {
    let temp = tempdir().expect("tempdir");
    let data = temp.path().join("nested");
    let args = |tail: &[&str]| -> Vec<std::ffi::OsString> {
        let mut args: Vec<std::ffi::OsString> = ["tickbox", "-q", "--color", "never", "--data"]
            .iter()
            .map(Into::into)
            .collect();
        args.push(data.clone().into_os_string());
        args.extend(tail.iter().map(Into::into));
        args
    };

    tickbox_core::run(args(&["-c", "chores", "add", "Sweep", "floor"])).expect("add");
    tickbox_core::run(args(&["-c", "chores", "#/completed", "tog", "1"]))
        .expect_err("no row 1 under #/completed");
    tickbox_core::run(args(&["-c", "chores", "toggle", "1"])).expect("toggle");
    assert!(tickbox_core::run(args(&["-c", "chores", "t"])).is_err());

    let chores = FileStore::open(&data, "chores").expect("open chores");
    let records = chores.load_all().expect("load chores");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Sweep floor");
    assert!(records[0].completed);

    let default = FileStore::open(&data, "todos-backbone").expect("open default");
    assert!(default.load_all().expect("load default").is_empty());
}

#[test]
fn commands_drive_the_page() {
    let temp = tempdir().expect("tempdir");
    let store = FileStore::open(temp.path(), "todos-backbone").expect("open datastore");
    let (mut view, mut router) = tickbox_app::headless(store, "").expect("headless page");

    let empty = run(&mut view, &mut router, invocation(&[], "list", &[])).expect("list");
    assert_eq!(empty, "nothing to do\n");

    let added = run(&mut view, &mut router, invocation(&[], "add", &["Buy", "milk"])).expect("add");
    assert_eq!(added, "  1 [ ] Buy milk\n\n1 item left\n[All]  Active  Completed\n");

    let toggled =
        run(&mut view, &mut router, invocation(&["#/active"], "toggle", &["1"])).expect("toggle");
    assert_eq!(
        toggled,
        "\n0 items left\nAll  [Active]  Completed\nClear completed (1)\n"
    );

    let cleared =
        run(&mut view, &mut router, invocation(&["#/"], "clear-completed", &[])).expect("clear");
    assert_eq!(cleared, "nothing to do\n");
    assert!(view.todos().is_empty());
}

#[test]
fn edit_and_delete_address_visible_rows() {
    let temp = tempdir().expect("tempdir");
    let store = FileStore::open(temp.path(), "todos-backbone").expect("open datastore");
    let (mut view, mut router) = tickbox_app::headless(store, "").expect("headless page");

    for title in ["one", "two", "three"] {
        run(&mut view, &mut router, invocation(&[], "add", &[title])).expect("add");
    }
    run(&mut view, &mut router, invocation(&[], "toggle", &["1"])).expect("toggle");

    // "two" is the first row once "one" is filtered out.
    run(&mut view, &mut router, invocation(&["#/active"], "edit", &["1", "  second  "]))
        .expect("edit");
    let titles: Vec<&str> = view.todos().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["one", "second", "three"]);

    run(&mut view, &mut router, invocation(&[], "delete", &["2"])).expect("delete");
    let titles: Vec<&str> = view.todos().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["one", "second"]);

    assert!(run(&mut view, &mut router, invocation(&[], "delete", &["9"])).is_err());
    assert!(run(&mut view, &mut router, invocation(&[], "toggle", &["x"])).is_err());
}

#[test]
fn toggle_all_flips_every_record() {
    let temp = tempdir().expect("tempdir");
    let store = FileStore::open(temp.path(), "todos-backbone").expect("open datastore");
    let (mut view, mut router) = tickbox_app::headless(store, "").expect("headless page");

    run(&mut view, &mut router, invocation(&[], "add", &["a"])).expect("add");
    run(&mut view, &mut router, invocation(&[], "add", &["b"])).expect("add");

    let out = run(&mut view, &mut router, invocation(&[], "toggle-all", &[])).expect("toggle-all");
    assert!(view.todos().iter().all(|r| r.completed));
    assert!(out.contains("Clear completed (2)"));

    run(&mut view, &mut router, invocation(&[], "toggle-all", &[])).expect("toggle-all");
    assert!(view.todos().iter().all(|r| !r.completed));
}

#[test]
fn html_prints_the_app_section() {
    let temp = tempdir().expect("tempdir");
    let store = FileStore::open(temp.path(), "todos-backbone").expect("open datastore");
    let (mut view, mut router) = tickbox_app::headless(store, "#/completed").expect("headless page");

    run(&mut view, &mut router, invocation(&[], "add", &["a < b"])).expect("add");
    let html = run(&mut view, &mut router, invocation(&[], "html", &[])).expect("html");
    assert!(html.starts_with("<section id=\"todoapp\">"), "{html}");
    assert!(html.contains("<label>a &lt; b</label>"), "{html}");
    assert!(html.contains("class=\"hidden\""), "{html}");
}
