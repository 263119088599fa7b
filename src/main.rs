use mimalloc::MiMalloc;
use reconciler::{Dispatcher, ReconcilerConfig, Renderer, node_at_mut};
use std::error::Error;
use std::sync::mpsc;
use vdom::{EventHandler, VNode};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Clone, Debug)]
enum Msg {
    Increment,
    DraftChanged(String),
    Add,
    SetDone(usize, bool),
    ClearDone,
}

struct Todo {
    title: String,
    done: bool,
}

#[derive(Default)]
struct State {
    clicks: i64,
    draft: String,
    todos: Vec<Todo>,
}

fn update(state: &mut State, msg: Msg) {
    match msg {
        Msg::Increment => state.clicks += 1,
        Msg::DraftChanged(text) => state.draft = text,
        Msg::Add => {
            let title = state.draft.trim().to_string();
            if !title.is_empty() {
                state.todos.push(Todo { title, done: false });
            }
            state.draft.clear();
        }
        Msg::SetDone(index, done) => {
            if let Some(todo) = state.todos.get_mut(index) {
                todo.done = done;
            }
        }
        Msg::ClearDone => state.todos.retain(|todo| !todo.done),
    }
}

fn view(state: &State) -> VNode<Msg> {
    let counter = VNode::new("Stack")
        .property("orientation", "horizontal")
        .property("spacing", 8)
        .child(VNode::new("Label").property("text", format!("clicks: {}", state.clicks)))
        .child(
            VNode::new("Button")
                .property("text", "+")
                .on("action", EventHandler::emit(Msg::Increment)),
        );

    let input = VNode::new("Stack")
        .property("orientation", "horizontal")
        .child(
            VNode::new("TextField")
                .bind("text", state.draft.as_str(), |value| {
                    value.as_str().map(|text| Msg::DraftChanged(text.to_string()))
                })
                .property("promptText", "what needs doing?")
                .on("action", EventHandler::emit(Msg::Add)),
        )
        .child(
            VNode::new("Button")
                .property("text", "add")
                .property("disabled", state.draft.trim().is_empty())
                .on("action", EventHandler::emit(Msg::Add)),
        );

    let list = VNode::new("Stack").children_from(state.todos.iter().enumerate().map(|(i, todo)| {
        VNode::new("CheckBox")
            .property("text", todo.title.as_str())
            .property("data-index", i)
            .bind("selected", todo.done, move |value| {
                value.as_bool().map(|done| Msg::SetDone(i, done))
            })
    }));

    let any_done = state.todos.iter().any(|todo| todo.done);
    VNode::new("Pane")
        .property("width", 480)
        .property("height", 320)
        .child(
            VNode::new("Stack")
                .property("spacing", 4)
                .child(counter)
                .child(input)
                .child(list)
                .child(
                    VNode::new("Button")
                        .property("text", "clear done")
                        .property("disabled", !any_done)
                        .on("action", EventHandler::emit(Msg::ClearDone)),
                ),
        )
}

/// A simulated user gesture aimed at the node at `path` below the root.
enum Input {
    Click(&'static [usize]),
    Type(&'static [usize], &'static str),
    Toggle(&'static [usize]),
}

const COUNTER_BUTTON: &[usize] = &[0, 0, 1];
const TEXT_FIELD: &[usize] = &[0, 1, 0];
const ADD_BUTTON: &[usize] = &[0, 1, 1];
const FIRST_TODO: &[usize] = &[0, 2, 0];
const CLEAR_BUTTON: &[usize] = &[0, 3];

const SCRIPT: &[Input] = &[
    Input::Click(COUNTER_BUTTON),
    Input::Click(ADD_BUTTON),
    Input::Type(TEXT_FIELD, "water the plants"),
    Input::Click(ADD_BUTTON),
    Input::Type(TEXT_FIELD, "write release notes"),
    Input::Click(ADD_BUTTON),
    Input::Toggle(FIRST_TODO),
    Input::Click(CLEAR_BUTTON),
    Input::Click(COUNTER_BUTTON),
];

fn apply_input(renderer: &mut Renderer<Msg>, input: &Input) -> bool {
    let Some(root) = renderer.root_mut() else {
        return false;
    };
    let (path, label) = match input {
        Input::Click(path) => (*path, "click"),
        Input::Type(path, _) => (*path, "type"),
        Input::Toggle(path) => (*path, "toggle"),
    };
    let Some(node) = node_at_mut(root, path) else {
        log::warn!(target: "demo", "no node at {path:?} for {label}");
        return false;
    };
    match input {
        Input::Click(_) => memory_toolkit::fire(node, "action", &memory_toolkit::ActionEvent),
        Input::Type(_, text) => memory_toolkit::type_text(node, text),
        Input::Toggle(_) => memory_toolkit::toggle(node),
    }
}

fn print_tree(renderer: &Renderer<Msg>) {
    match renderer.root() {
        Some(root) => print!("{}", memory_toolkit::outline(root, 64)),
        None => println!("(no root)"),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let (sender, receiver) = mpsc::channel();
    let mut renderer = Renderer::new(memory_toolkit::registry(), Dispatcher::from_sender(sender))
        .with_config(ReconcilerConfig::from_env());
    let mut state = State::default();

    let stats = renderer.render(view(&state))?;
    println!("=== initial render: {} patches, {} nodes ===", stats.patches, stats.live_nodes);
    print_tree(&renderer);

    for (step, input) in SCRIPT.iter().enumerate() {
        if !apply_input(&mut renderer, input) {
            println!("--- step {step}: input had no effect");
            continue;
        }
        let messages: Vec<Msg> = receiver.try_iter().collect();
        if messages.is_empty() {
            println!("--- step {step}: no messages");
            continue;
        }
        for msg in messages {
            log::debug!(target: "demo", "update {msg:?}");
            update(&mut state, msg);
        }
        let stats = renderer.render(view(&state))?;
        println!(
            "=== step {step}: {} patches, {} nodes{} ===",
            stats.patches,
            stats.live_nodes,
            if stats.rebuilt { ", rebuilt" } else { "" }
        );
        print_tree(&renderer);
    }
    Ok(())
}
