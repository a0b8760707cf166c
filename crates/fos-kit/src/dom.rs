//! Host DOM handle
//!
//! [`Dom`] bundles the document, its listener registry, the task queue that
//! stands in for the event loop, and the toolkit configuration. It is a
//! cheap `Rc` handle; every toolkit function takes `&Dom`.
//!
//! No `RefCell` borrow is held while user callbacks run, so listeners and
//! tasks may freely query, mutate, register or dispatch.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::rc::{Rc, Weak};

use fos_css::{ComputedStyle, SelectorList, StyleResolver};
use fos_dom::{
    event_types, Document, DomTree, Event, EventInit, EventPhase, EventTarget, ListenerId,
    ListenerOptions, ListenerRegistry, NodeId, ReadyState,
};

use crate::{KitConfig, Result};

/// Listener callback as stored in the registry
pub type EventHandler = Rc<dyn Fn(&Event)>;

type Task = Box<dyn FnOnce()>;

pub(crate) struct DomInner {
    document: RefCell<Document>,
    listeners: RefCell<ListenerRegistry<EventHandler>>,
    tasks: RefCell<VecDeque<Task>>,
    loaded: RefCell<HashSet<NodeId>>,
    config: KitConfig,
}

/// Shared handle to the host document
#[derive(Clone)]
pub struct Dom {
    inner: Rc<DomInner>,
}

/// Non-owning [`Dom`] handle held by disposers and bound handlers
#[derive(Clone)]
pub(crate) struct WeakDom(Weak<DomInner>);

impl WeakDom {
    pub(crate) fn upgrade(&self) -> Option<Dom> {
        self.0.upgrade().map(|inner| Dom { inner })
    }
}

impl Dom {
    /// Wrap a document with the default configuration
    pub fn new(document: Document) -> Self {
        Self::with_config(document, KitConfig::default())
    }

    pub fn with_config(document: Document, config: KitConfig) -> Self {
        Self {
            inner: Rc::new(DomInner {
                document: RefCell::new(document),
                listeners: RefCell::new(ListenerRegistry::new()),
                tasks: RefCell::new(VecDeque::new()),
                loaded: RefCell::new(HashSet::new()),
                config,
            }),
        }
    }

    /// Parse an HTML document
    pub fn parse(html: &str) -> Self {
        Self::new(fos_html::parse(html))
    }

    pub fn parse_with_config(html: &str, config: KitConfig) -> Self {
        Self::with_config(fos_html::parse(html), config)
    }

    pub(crate) fn downgrade(&self) -> WeakDom {
        WeakDom(Rc::downgrade(&self.inner))
    }

    pub fn config(&self) -> &KitConfig {
        &self.inner.config
    }

    /// Borrow the document. Do not hold across calls that mutate it.
    pub fn document(&self) -> Ref<'_, Document> {
        self.inner.document.borrow()
    }

    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.inner.document.borrow_mut()
    }

    /// Run `f` against the tree
    pub fn with_tree<R>(&self, f: impl FnOnce(&DomTree) -> R) -> R {
        f(self.document().tree())
    }

    pub fn document_element(&self) -> Option<NodeId> {
        self.document().document_element()
    }

    pub fn body(&self) -> Option<NodeId> {
        self.document().body()
    }

    pub fn ready_state(&self) -> ReadyState {
        self.document().ready_state()
    }

    // === Tree ===

    pub fn create_element(&self, tag_name: &str) -> NodeId {
        self.document_mut().tree_mut().create_element(tag_name)
    }

    pub fn create_text(&self, text: &str) -> NodeId {
        self.document_mut().tree_mut().create_text(text)
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        Ok(self.document_mut().tree_mut().append_child(parent, child)?)
    }

    /// Detach a node from its parent. The node and its descendants
    /// forget that they finished loading.
    pub fn remove(&self, node: NodeId) {
        let removed: Vec<NodeId> =
            self.with_tree(|tree| std::iter::once(node).chain(tree.descendants(node)).collect());
        self.document_mut().tree_mut().detach(node);

        let mut loaded = self.inner.loaded.borrow_mut();
        for id in removed {
            loaded.remove(&id);
        }
    }

    /// Parse markup into detached nodes (`innerHTML` on a detached container)
    pub fn parse_fragment(&self, html: &str) -> Vec<NodeId> {
        fos_html::parse_fragment(self.document_mut().tree_mut(), html)
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.document().tree().is_element(node)
    }

    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.document().tree().parent_element(node)
    }

    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.document()
            .tree()
            .element(node)
            .map(|e| e.tag_name().to_string())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.document()
            .tree()
            .element(node)
            .is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&self, node: NodeId, class: &str) {
        if let Some(elem) = self.document_mut().tree_mut().element_mut(node) {
            elem.add_class(class);
        }
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.document()
            .tree()
            .element(node)
            .and_then(|e| e.get_attribute(name))
            .map(str::to_string)
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(elem) = self.document_mut().tree_mut().element_mut(node) {
            elem.set_attribute(name, value);
        }
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        if let Some(elem) = self.document_mut().tree_mut().element_mut(node) {
            elem.remove_attribute(name);
        }
    }

    /// Inline style property (`element.style[name]`), `""` when unset
    pub fn inline_style(&self, node: NodeId, name: &str) -> String {
        self.document()
            .tree()
            .element(node)
            .and_then(|e| e.style().get_property_value(name))
            .unwrap_or_default()
            .to_string()
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.document().tree().text_content(node)
    }

    // === Queries ===

    /// First element under `scope` matching `selector`.
    ///
    /// Invalid selectors match nothing and log a warning.
    pub fn query_selector(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        let selectors = parse_selector(selector)?;
        fos_css::query_selector(self.document().tree(), scope, &selectors)
    }

    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        match parse_selector(selector) {
            Some(selectors) => fos_css::query_selector_all(self.document().tree(), scope, &selectors),
            None => Vec::new(),
        }
    }

    /// `getComputedStyle(node)` against the document's `<style>` sheets
    pub fn computed_style(&self, node: NodeId) -> ComputedStyle {
        let document = self.document();
        StyleResolver::from_document(&document).compute_style(document.tree(), node)
    }

    // === Events ===

    pub fn add_event_listener(
        &self,
        target: impl Into<EventTarget>,
        event_type: &str,
        handler: EventHandler,
        options: ListenerOptions,
    ) -> ListenerId {
        let target = target.into();
        tracing::trace!(%target, event = event_type, "addEventListener");
        self.inner
            .listeners
            .borrow_mut()
            .add(target, event_type, handler, options)
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.inner.listeners.borrow_mut().remove(id)
    }

    /// Number of listeners attached to `target`, all event types
    pub fn listener_count(&self, target: impl Into<EventTarget>) -> usize {
        self.inner.listeners.borrow().count_for(target.into())
    }

    /// Dispatch `event` at `target` through capture, target and bubble
    /// phases. Returns `false` when a listener prevented the default.
    pub fn dispatch_event(&self, target: impl Into<EventTarget>, event: &Event) -> bool {
        let target = target.into();
        let path = self.document().tree().propagation_path(target);
        if path.is_empty() {
            return true;
        }

        tracing::debug!(event = event.event_type(), %target, "Dispatching event");
        event.begin_dispatch(target);

        let ancestors = &path[1..];
        for &current in ancestors.iter().rev() {
            self.invoke_listeners(current, event, EventPhase::Capturing);
            if event.is_propagation_stopped() {
                break;
            }
        }
        if !event.is_propagation_stopped() {
            self.invoke_listeners(target, event, EventPhase::AtTarget);
        }
        if event.bubbles() {
            for &current in ancestors {
                if event.is_propagation_stopped() {
                    break;
                }
                self.invoke_listeners(current, event, EventPhase::Bubbling);
            }
        }

        event.end_dispatch();
        !event.is_default_prevented()
    }

    fn invoke_listeners(&self, current: EventTarget, event: &Event, phase: EventPhase) {
        let listeners = self
            .inner
            .listeners
            .borrow()
            .snapshot(current, event.event_type());
        if listeners.is_empty() {
            return;
        }

        event.enter(current, phase);
        for (id, options, handler) in listeners {
            match phase {
                EventPhase::Capturing if !options.capture => continue,
                EventPhase::Bubbling if options.capture => continue,
                _ => {}
            }
            // Removed by an earlier listener of this dispatch
            if !self.inner.listeners.borrow().contains(id) {
                continue;
            }
            if options.once {
                self.inner.listeners.borrow_mut().remove(id);
            }

            event.set_passive(options.passive);
            handler(event);
            event.set_passive(false);

            if event.is_immediate_propagation_stopped() {
                break;
            }
        }
    }

    // === Task queue ===

    /// Queue a task for the next turn
    pub fn queue_task(&self, task: impl FnOnce() + 'static) {
        self.inner.tasks.borrow_mut().push_back(Box::new(task));
    }

    pub fn pending_tasks(&self) -> usize {
        self.inner.tasks.borrow().len()
    }

    /// Run queued tasks, including ones queued while running, until the
    /// queue is empty. Returns how many ran.
    pub fn run_tasks(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.inner.tasks.borrow_mut().pop_front();
            let Some(task) = task else {
                break;
            };
            task();
            ran += 1;
        }
        if ran > 0 {
            tracing::debug!(tasks = ran, "Ran queued tasks");
        }
        ran
    }

    // === Loading ===

    /// Parsing is done: `interactive` and `DOMContentLoaded`
    pub fn finish_parsing(&self) {
        if self.ready_state() != ReadyState::Loading {
            return;
        }
        self.document_mut().set_ready_state(ReadyState::Interactive);
        let event = Event::with_init(
            event_types::DOM_CONTENT_LOADED,
            EventInit {
                bubbles: true,
                cancelable: false,
            },
        );
        self.dispatch_event(EventTarget::DOCUMENT, &event);
    }

    /// Everything is loaded: `complete`, then `load` at the body and window
    pub fn finish_loading(&self) {
        self.finish_parsing();
        if self.ready_state() == ReadyState::Complete {
            return;
        }
        self.document_mut().set_ready_state(ReadyState::Complete);

        if let Some(body) = self.body() {
            self.mark_loaded(body);
        }
        self.dispatch_event(EventTarget::Window, &Event::new(event_types::LOAD));
    }

    /// Fire `load` at an element and remember it as complete
    pub fn mark_loaded(&self, node: NodeId) {
        self.inner.loaded.borrow_mut().insert(node);
        self.dispatch_event(node, &Event::new(event_types::LOAD));
    }

    /// Fire `error` at an element
    pub fn mark_failed(&self, node: NodeId) {
        self.dispatch_event(node, &Event::new(event_types::ERROR));
    }

    /// Whether the element finished loading (`element.complete`)
    pub fn is_loaded(&self, node: NodeId) -> bool {
        if self.inner.loaded.borrow().contains(&node) {
            return true;
        }
        Some(node) == self.body() && self.ready_state() == ReadyState::Complete
    }
}

fn parse_selector(selector: &str) -> Option<SelectorList> {
    match SelectorList::parse(selector) {
        Ok(selectors) => Some(selectors),
        Err(err) => {
            tracing::warn!(selector, error = %err, "Invalid selector");
            None
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new(Document::default())
    }
}

impl fmt::Debug for Dom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dom")
            .field("url", &self.document().url())
            .field("ready_state", &self.ready_state())
            .field("listeners", &self.inner.listeners.borrow().len())
            .field("pending_tasks", &self.pending_tasks())
            .finish()
    }
}
