#![no_main]

//! Builds two trees from the input bytes, renders the first, patches to the
//! second and checks the result against a fresh build of the second.

use libfuzzer_sys::fuzz_target;
use reconciler::{Dispatcher, ReconcilerConfig, Renderer, StructuralPolicy};
use vdom::{EventHandler, VNode};

const TYPES: &[&str] = &["Pane", "Stack", "Label", "Button", "CheckBox", "TextField", "Bogus"];
const MAX_NODES: usize = 256;

struct Bytes<'a> {
    data: &'a [u8],
    pos: usize,
    nodes: usize,
}

impl Bytes<'_> {
    fn next(&mut self) -> u8 {
        let byte = self.data.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        byte
    }

    fn exhausted(&self) -> bool {
        self.pos >= self.data.len()
    }
}

fn gen_node(bytes: &mut Bytes<'_>, depth: usize) -> VNode<u8> {
    bytes.nodes += 1;
    let node_type = TYPES[bytes.next() as usize % TYPES.len()];
    let mut node = VNode::new(node_type);
    let flags = bytes.next();
    if flags & 1 != 0 {
        node = node.property("text", format!("t{}", bytes.next() % 4));
    }
    if flags & 2 != 0 {
        node = node.property("width", (bytes.next() % 8) as i64 * 10);
    }
    if flags & 4 != 0 {
        node = node.property("data-k", (bytes.next() % 3) as i64);
    }
    if flags & 8 != 0 {
        node = node.property("selected", bytes.next() & 1 == 1);
    }
    if flags & 16 != 0 {
        // Some types reject this; the diagnostics path is exercised too.
        node = node.property("spacing", "wide");
    }
    if flags & 32 != 0 {
        node = node.on("action", EventHandler::emit(bytes.next()));
    }
    if depth < 4 && matches!(node_type, "Pane" | "Stack") {
        let count = bytes.next() % 5;
        for _ in 0..count {
            if bytes.exhausted() || bytes.nodes >= MAX_NODES {
                break;
            }
            node = node.child(gen_node(bytes, depth + 1));
        }
    }
    node
}

fn renderer() -> Renderer<u8> {
    Renderer::new(memory_toolkit::registry(), Dispatcher::discard())
        .with_config(ReconcilerConfig::default().with_structural(StructuralPolicy::FailFast))
}

fuzz_target!(|data: &[u8]| {
    let mut bytes = Bytes { data, pos: 0, nodes: 0 };
    let prev = gen_node(&mut bytes, 0);
    bytes.nodes = 0;
    let next = gen_node(&mut bytes, 0);

    let mut live = renderer();
    if live.render(prev).is_err() {
        return;
    }
    if let Err(err) = live.render(next.clone()) {
        panic!("patching failed: {err}");
    }

    let mut fresh = renderer();
    if fresh.render(next).is_err() {
        return;
    }
    assert_eq!(live.snapshot(), fresh.snapshot());
});
