use indexmap::IndexMap;

use super::event::{EventKind, Handler};

/// Handle to an element in a [`Document`]. Only meaningful for the document
/// that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Whether an element takes part in rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Display {
    #[default]
    Block,
    None,
}

/// Document lifecycle. While `Loading`, elements appended directly under the
/// root are accepted but stay detached: they never become queryable, which
/// is how a deferred rendering environment looks from the outside.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    #[default]
    Complete,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub text: String,
    /// Current value of an input-like element
    pub value: String,
    pub attrs: IndexMap<String, String>,
    pub classes: Vec<String>,
    pub display: Display,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attached: bool,
    /// Slot is on the free list
    freed: bool,
}

impl Element {
    fn new(tag: &str, text: &str) -> Self {
        Element {
            tag: tag.to_string(),
            text: text.to_string(),
            value: String::new(),
            attrs: IndexMap::new(),
            classes: Vec::new(),
            display: Display::Block,
            parent: None,
            children: Vec::new(),
            attached: false,
            freed: false,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(|s| s.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// An event listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Listener {
    node: NodeId,
    kind: EventKind,
    handler: Handler,
}

/// A retained element tree with id/class/attribute queries and event
/// listener registrations.
///
/// Removed elements give their arena slots back; later elements reuse them,
/// so a [`NodeId`] must not be used after its element was removed.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    free: Vec<usize>,
    listeners: Vec<Listener>,
    ready_state: ReadyState,
    /// Bumped on every structural or content change
    mutations: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut root = Element::new("body", "");
        root.attached = true;
        Document {
            nodes: vec![root],
            free: Vec::new(),
            listeners: Vec::new(),
            ready_state: ReadyState::Complete,
            mutations: 0,
        }
    }

    /// A document whose root does not accept mounts yet
    pub fn loading() -> Self {
        let mut doc = Self::new();
        doc.ready_state = ReadyState::Loading;
        doc
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    /// Arena slots in use, including detached elements not yet removed
    pub fn live_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn alloc(&mut self, element: Element) -> NodeId {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = element;
                NodeId(slot)
            }
            None => {
                self.nodes.push(element);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    pub fn element(&self, node: NodeId) -> &Element {
        &self.nodes[node.0]
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.nodes[node.0].attached
    }

    /// Append a new element under `parent`, set its attributes and classes,
    /// and return it for further nesting.
    pub fn create(
        &mut self,
        tag: &str,
        text: &str,
        parent: NodeId,
        attrs: &[(&str, &str)],
        classes: &[&str],
    ) -> NodeId {
        let mut element = Element::new(tag, text);
        for (name, value) in attrs {
            element.attrs.insert((*name).to_string(), (*value).to_string());
        }
        element.classes = classes.iter().map(|c| (*c).to_string()).collect();
        if parent == self.root() && self.ready_state == ReadyState::Loading {
            // Orphaned: never reachable from the root
            return self.alloc(element);
        }
        element.parent = Some(parent);
        element.attached = self.nodes[parent.0].attached;
        let node = self.alloc(element);
        self.nodes[parent.0].children.push(node);
        self.mutations += 1;
        node
    }

    /// Remove `node` and its subtree. Listeners on the subtree are dropped
    /// and the slots are reused by later elements. Removing an element that
    /// is already gone does nothing.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.root() || self.nodes[node.0].freed {
            return;
        }
        let was_attached = self.nodes[node.0].attached;
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
        let subtree = self.subtree(node);
        for n in &subtree {
            let element = &mut self.nodes[n.0];
            element.attached = false;
            element.freed = true;
            element.children.clear();
            self.free.push(n.0);
        }
        self.listeners.retain(|l| !subtree.contains(&l.node));
        if was_attached {
            self.mutations += 1;
        }
    }

    /// Put `new` where `old` currently is, detaching `old`
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        let Some(parent) = self.nodes[old.0].parent else {
            return;
        };
        if let Some(prev) = self.nodes[new.0].parent.take() {
            self.nodes[prev.0].children.retain(|c| *c != new);
        }
        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|c| *c == old)
            .unwrap_or(self.nodes[parent.0].children.len());
        self.remove(old);
        let index = index.min(self.nodes[parent.0].children.len());
        self.nodes[parent.0].children.insert(index, new);
        self.nodes[new.0].parent = Some(parent);
        let attached = self.nodes[parent.0].attached;
        for n in self.subtree(new) {
            self.nodes[n.0].attached = attached;
        }
        self.mutations += 1;
    }

    /// `node` and all of its descendants, in tree order
    fn subtree(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.nodes[n.0].children.iter().rev());
        }
        out
    }

    /// Attached elements in tree order
    fn attached_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.subtree(self.root())
            .into_iter()
            .skip(1)
            .filter(|n| self.nodes[n.0].attached)
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.attached_nodes()
            .find(|n| self.nodes[n.0].id() == Some(id))
    }

    pub fn get_elements_by_class(&self, class: &str) -> Vec<NodeId> {
        self.attached_nodes()
            .filter(|n| self.nodes[n.0].has_class(class))
            .collect()
    }

    /// Attached elements carrying attribute `name`
    pub fn query_attr(&self, name: &str) -> Vec<NodeId> {
        self.attached_nodes()
            .filter(|n| self.nodes[n.0].attrs.contains_key(name))
            .collect()
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attrs.get(name).map(|s| s.as_str())
    }

    pub fn text(&self, node: NodeId) -> &str {
        &self.nodes[node.0].text
    }

    /// Text of the element with `id`, or empty when there is none
    pub fn text_of(&self, id: &str) -> String {
        self.get_element_by_id(id)
            .map(|n| self.nodes[n.0].text.clone())
            .unwrap_or_default()
    }

    pub fn value(&self, node: NodeId) -> &str {
        &self.nodes[node.0].value
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if self.nodes[node.0].value != value {
            self.nodes[node.0].value = value.to_string();
            self.mutations += 1;
        }
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if self.nodes[node.0].text != text {
            self.nodes[node.0].text = text.to_string();
            self.mutations += 1;
        }
    }

    pub fn set_display(&mut self, node: NodeId, display: Display) {
        if self.nodes[node.0].display != display {
            self.nodes[node.0].display = display;
            self.mutations += 1;
        }
    }

    /// Attached, and neither it nor any ancestor is hidden
    pub fn is_displayed(&self, node: NodeId) -> bool {
        if !self.nodes[node.0].attached {
            return false;
        }
        let mut current = Some(node);
        while let Some(n) = current {
            if self.nodes[n.0].display == Display::None {
                return false;
            }
            current = self.nodes[n.0].parent;
        }
        true
    }

    /// Register a listener. Registering the same handler twice for the same
    /// element and event, or on a detached element, is a no-op; returns
    /// whether it was added.
    pub fn add_listener(&mut self, node: NodeId, kind: EventKind, handler: Handler) -> bool {
        if !self.nodes[node.0].attached {
            return false;
        }
        let listener = Listener {
            node,
            kind,
            handler,
        };
        if self.listeners.contains(&listener) {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Handlers that fire for an event on `target`, bubbling towards the
    /// root. Each handler is paired with the element it is registered on.
    pub fn dispatch(&self, target: NodeId, kind: EventKind) -> Vec<(NodeId, Handler)> {
        let mut fired = Vec::new();
        if !self.nodes[target.0].attached {
            return fired;
        }
        let mut current = Some(target);
        while let Some(node) = current {
            fired.extend(
                self.listeners
                    .iter()
                    .filter(|l| l.node == node && l.kind == kind)
                    .map(|l| (node, l.handler)),
            );
            current = self.nodes[node.0].parent;
        }
        fired
    }
}
