//! End-to-end behavior of the link algebra over a `StateCell` host.

use std::collections::BTreeMap;
use std::rc::Rc;

use valink::{Data, Link, StateCell};

/// Routes `trace!`/`warn!` output from the write paths into the test
/// harness; filter with `RUST_LOG=valink=trace`.
fn trace_init() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

#[derive(Clone, Debug, PartialEq)]
struct User {
    name: String,
}

impl Data for User {
    fn same(&self, other: &Self) -> bool {
        self.name.same(&other.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
struct AppState {
    users: Vec<User>,
}

impl Data for AppState {
    fn same(&self, other: &Self) -> bool {
        self.users.same(&other.users)
    }
}

fn user(name: &str) -> User {
    User {
        name: name.to_string(),
    }
}

#[test]
fn end_to_end_nested_edit() {
    trace_init();
    let cell = StateCell::new(AppState {
        users: vec![user("A"), user("B")],
    });
    let original = cell.get();

    let root = cell.link();
    let users = root.field(|s| s.users.clone(), |s, v| s.users = v);
    let first = users.at(0);
    first.field(|u| u.name.clone(), |u, n| u.name = n).set("Z".to_string());

    let committed = cell.get();
    assert_eq!(committed.users[0].name, "Z");
    assert_eq!(committed.users[1].name, "B");

    // the original snapshot and the pre-commit link are untouched
    assert_eq!(original.users[0].name, "A");
    assert_eq!(root.value().users[0].name, "A");
}

#[test]
fn structural_sharing_preserves_siblings() {
    trace_init();
    let mut inner = BTreeMap::new();
    inner.insert("b".to_string(), 1i32);
    inner.insert("c".to_string(), 2i32);
    let mut state = BTreeMap::new();
    state.insert("a".to_string(), inner);

    let cell = StateCell::new(state);
    cell.link().at("a".to_string()).at("b".to_string()).set(5);

    let committed = cell.get();
    assert_eq!(committed["a"]["b"], 5);
    assert_eq!(committed["a"]["c"], 2);
}

#[test]
fn structural_sharing_reuses_sibling_references() {
    trace_init();
    let mut state = BTreeMap::new();
    state.insert("x".to_string(), Rc::new("left".to_string()));
    state.insert("y".to_string(), Rc::new("right".to_string()));
    let sibling = state["y"].clone();

    let cell = StateCell::new(state);
    cell.link()
        .at("x".to_string())
        .set(Rc::new("changed".to_string()));

    let committed = cell.get();
    assert_eq!(*committed["x"], "changed");
    // the untouched sibling is the same allocation, not a copy
    assert!(Rc::ptr_eq(&committed["y"], &sibling));
}

#[test]
fn map_skips_none_results_in_order() {
    trace_init();
    let cell = StateCell::new(vec![1i32, 2, 3, 4]);
    let link = cell.link();

    let even_tens = link.map(|item, _key| {
        let v = *item.value();
        (v % 2 == 0).then(|| v * 10)
    });
    assert_eq!(even_tens, vec![20, 40]);
}

#[test]
fn map_over_mapping_yields_plain_sequence() {
    trace_init();
    let mut state = BTreeMap::new();
    state.insert("a".to_string(), 1i32);
    state.insert("b".to_string(), 2i32);
    let cell = StateCell::new(state);

    let keys = cell.link().map(|_item, key| Some(key.clone()));
    assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn pick_skips_absent_keys() {
    trace_init();
    let mut state = BTreeMap::new();
    state.insert("a".to_string(), 1i32);
    state.insert("b".to_string(), 2i32);
    let cell = StateCell::new(state);
    let link = cell.link();

    let picked = link.pick(vec!["a".to_string(), "z".to_string()]);
    assert_eq!(picked.len(), 1);
    assert_eq!(*picked[&"a".to_string()].value(), 1);

    let all = link.pick_all();
    assert_eq!(all.len(), 2);
}

#[test]
fn remove_at_compacts_sequence() {
    trace_init();
    let cell = StateCell::new(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
    cell.link().remove_at(&1);
    assert_eq!(cell.get(), vec!["a".to_string(), "c".to_string()]);
}

#[test]
fn pipe_coerces_on_write() {
    trace_init();
    let cell = StateCell::new("hi".to_string());
    let upper = cell.link().pipe(|next, _prev| Some(next.to_uppercase()));
    upper.set("hello".to_string());
    assert_eq!(cell.get(), "HELLO");
}

#[test]
fn pipe_none_suppresses_write() {
    trace_init();
    let cell = StateCell::new("keep".to_string());
    let bounded = cell
        .link()
        .pipe(|next, _prev| (next.len() <= 4).then_some(next));
    bounded.set("way too long".to_string());
    assert_eq!(cell.get(), "keep");
    assert_eq!(cell.revision(), 0);
}

#[test]
fn on_change_runs_before_commit() {
    trace_init();
    use std::cell::RefCell;

    let events: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    let handler_log = events.clone();
    let commit_log = events.clone();
    let root = Link::from_value_and_setter(0i32, move |_| commit_log.borrow_mut().push("commit"));
    let observed = root.on_change(move |_| handler_log.borrow_mut().push("handler"));

    observed.set(1);
    assert_eq!(*events.borrow(), vec!["handler", "commit"]);
}

#[test]
fn equals_view_translates_boolean_writes() {
    trace_init();
    let cell = StateCell::new("red".to_string());

    let is_red = cell.link().equals("red".to_string());
    assert!(is_red.get());
    is_red.set(false);
    assert_eq!(cell.get(), String::default());

    let is_blue = cell.link().equals("blue".to_string());
    assert!(!is_blue.get());
    is_blue.set(true);
    assert_eq!(cell.get(), "blue");
}

#[test]
fn enabled_view_over_option() {
    trace_init();
    let cell: StateCell<Option<String>> = StateCell::new(None);

    let enabled = cell.link().enabled("default".to_string());
    assert!(!enabled.get());
    enabled.set(true);
    assert_eq!(cell.get(), Some("default".to_string()));

    let enabled = cell.link().enabled("default".to_string());
    assert!(enabled.get());
    enabled.set(false);
    assert_eq!(cell.get(), None);
}

#[test]
fn action_funnels_events_through_update() {
    trace_init();
    let cell = StateCell::new(String::new());
    let on_input = cell
        .link()
        .action(|value: &mut String, event: &String| {
            *value = event.clone();
            true
        });
    on_input(&"typed".to_string());
    assert_eq!(cell.get(), "typed");
}

#[test]
fn field_write_skips_when_same() {
    trace_init();
    let cell = StateCell::new(AppState {
        users: vec![user("A")],
    });
    let users = cell.link().field(|s| s.users.clone(), |s, v| s.users = v);
    users.set(vec![user("A")]);
    assert_eq!(cell.revision(), 0);
    users.set(vec![user("A"), user("B")]);
    assert_eq!(cell.revision(), 1);
}
