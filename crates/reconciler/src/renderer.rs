//! Caller-side render loop state: previous tree, live root, collaborators.

use crate::builder::NodeBuilder;
use crate::config::ReconcilerConfig;
use crate::diagnostics::{DiagnosticSink, LogSink};
use crate::dispatch::Dispatcher;
use crate::inspect::{NodeSnapshot, snapshot_root};
use crate::native::{NativeNode, subtree_len};
use crate::patcher::{PatchError, Patcher};
use crate::registry::AccessorRegistry;
use std::rc::Rc;
use vdom::{VNode, diff};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub patches: usize,
    pub live_nodes: usize,
    /// The whole tree was built from scratch.
    pub rebuilt: bool,
}

/// Owns a live tree and keeps it in step with successive virtual trees.
///
/// `render` is synchronous and does no scheduling; call it whenever the
/// application state changes.
pub struct Renderer<A> {
    registry: AccessorRegistry,
    dispatcher: Dispatcher<A>,
    diagnostics: Rc<dyn DiagnosticSink>,
    config: ReconcilerConfig,
    current: Option<VNode<A>>,
    root: Option<Box<dyn NativeNode>>,
}

impl<A: 'static> Renderer<A> {
    pub fn new(registry: AccessorRegistry, dispatcher: Dispatcher<A>) -> Self {
        Self {
            registry,
            dispatcher,
            diagnostics: Rc::new(LogSink),
            config: ReconcilerConfig::default(),
            current: None,
            root: None,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Rc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_config(mut self, config: ReconcilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Diffs `next` against the previously rendered tree and patches the live
    /// tree to match.
    ///
    /// Without a live root (first render, or a root that failed to build) the
    /// tree is built from scratch. After an error, or when a node failed to
    /// build and left its slot empty, the previous tree no longer describes
    /// the live one and is forgotten, so the next call rebuilds.
    pub fn render(&mut self, next: VNode<A>) -> Result<RenderStats, PatchError> {
        let prev = match self.root {
            Some(_) => self.current.as_ref(),
            None => None,
        };
        let rebuilt = prev.is_none();
        let patches = diff(prev, &next);
        let builder = NodeBuilder::new(
            &self.registry,
            self.dispatcher.clone(),
            Rc::clone(&self.diagnostics),
        );
        let applied = Patcher::new(&builder, self.config.structural).apply(&mut self.root, &patches);
        if let Err(error) = applied {
            log::error!(target: "reconciler.patch", "render aborted: {error}");
            self.current = None;
            return Err(error);
        }
        let vacated = builder.vacated();
        if vacated > 0 {
            log::debug!(
                target: "reconciler.patch",
                "{vacated} slot(s) left empty; next render rebuilds"
            );
            self.current = None;
        } else {
            self.current = Some(next);
        }
        let stats = RenderStats {
            patches: patches.len(),
            live_nodes: self.root.as_deref().map_or(0, |root| subtree_len(root)),
            rebuilt,
        };
        log::debug!(
            target: "reconciler.patch",
            "rendered: {} patches, {} live nodes{}",
            stats.patches,
            stats.live_nodes,
            if rebuilt { " (rebuilt)" } else { "" }
        );
        Ok(stats)
    }

    pub fn root(&self) -> Option<&dyn NativeNode> {
        self.root.as_deref()
    }

    pub fn root_mut(&mut self) -> Option<&mut (dyn NativeNode + 'static)> {
        self.root.as_deref_mut()
    }

    /// The last successfully rendered virtual tree.
    pub fn current(&self) -> Option<&VNode<A>> {
        self.current.as_ref()
    }

    pub fn registry(&self) -> &AccessorRegistry {
        &self.registry
    }

    pub fn config(&self) -> ReconcilerConfig {
        self.config
    }

    pub fn snapshot(&self) -> Option<NodeSnapshot> {
        snapshot_root(&self.registry, self.root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::ReadWriteAccessor;
    use crate::config::StructuralPolicy;
    use crate::diagnostics::RecordingSink;
    use crate::native::test_nodes::{Frame, Text};
    use crate::native::{downcast_ref, node_at};

    fn renderer() -> (Renderer<()>, Rc<RecordingSink>) {
        let mut registry = AccessorRegistry::new();
        registry
            .register_type::<Frame>("Frame")
            .register_type::<Text>("Text")
            .register_property::<Text>(
                "text",
                ReadWriteAccessor::<Text, String>::new(|t| t.text.clone(), |t, v| t.text = v),
            );
        let sink = Rc::new(RecordingSink::new());
        let renderer = Renderer::new(registry, Dispatcher::discard())
            .with_diagnostics(sink.clone())
            .with_config(ReconcilerConfig::default().with_structural(StructuralPolicy::FailFast));
        (renderer, sink)
    }

    fn view(items: &[&str]) -> VNode<()> {
        VNode::new("Frame").children_from(items.iter().map(|s| VNode::new("Text").property("text", *s)))
    }

    #[test]
    fn first_render_rebuilds_then_patches() {
        let (mut r, sink) = renderer();
        let stats = r.render(view(&["a"])).unwrap();
        assert_eq!(stats, RenderStats { patches: 1, live_nodes: 2, rebuilt: true });
        let stats = r.render(view(&["a", "b"])).unwrap();
        assert_eq!(stats, RenderStats { patches: 1, live_nodes: 3, rebuilt: false });
        let stats = r.render(view(&["a", "b"])).unwrap();
        assert_eq!(stats.patches, 0);
        assert!(sink.is_empty());
        assert_eq!(r.current(), Some(&view(&["a", "b"])));
    }

    #[test]
    fn failed_root_build_forces_rebuild_next_time() {
        let (mut r, sink) = renderer();
        let stats = r.render(VNode::new("Unknown")).unwrap();
        assert_eq!(stats.live_nodes, 0);
        assert!(r.root().is_none());
        assert_eq!(sink.len(), 1);
        let stats = r.render(view(&["a"])).unwrap();
        assert!(stats.rebuilt);
        assert_eq!(stats.live_nodes, 2);
    }

    fn texts(r: &Renderer<()>) -> Vec<String> {
        let Some(root) = r.root() else {
            return Vec::new();
        };
        (0..root.children().map_or(0, |c| c.len()))
            .filter_map(|i| node_at(root, &[i]).and_then(downcast_ref::<Text>))
            .map(|t| t.text.clone())
            .collect()
    }

    #[test]
    fn empty_slot_from_failed_child_forces_rebuild() {
        let (mut r, sink) = renderer();
        let broken = VNode::new("Frame")
            .child(VNode::new("Text").property("text", "a"))
            .child(VNode::new("Slider"))
            .child(VNode::new("Text").property("text", "c"));
        r.render(broken).unwrap();
        assert_eq!(texts(&r), vec!["a", "c"]);
        assert!(r.current().is_none());
        assert_eq!(sink.take().len(), 1);

        let stats = r.render(view(&["a", "b", "c"])).unwrap();
        assert!(stats.rebuilt);
        assert_eq!(texts(&r), vec!["a", "b", "c"]);
        assert_eq!(r.current(), Some(&view(&["a", "b", "c"])));

        let stats = r.render(view(&["a", "b", "c"])).unwrap();
        assert_eq!(stats.patches, 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn snapshot_matches_fresh_build() {
        let (mut a, _) = renderer();
        a.render(view(&["a", "b", "c"])).unwrap();
        a.render(view(&["x", "b"])).unwrap();
        let (mut b, _) = renderer();
        b.render(view(&["x", "b"])).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
