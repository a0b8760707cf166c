//! DOM Events
//!
//! Event objects, listener options and the per-target listener registry.
//! The registry is generic over the handler type so the host decides how
//! callbacks are represented; dispatch itself lives with the host.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;

use crate::{DomTree, NodeId};

/// Well-known event type names
pub mod event_types {
    pub const DOM_CONTENT_LOADED: &str = "DOMContentLoaded";
    pub const LOAD: &str = "load";
    pub const ERROR: &str = "error";
    pub const CLICK: &str = "click";
}

/// Something listeners can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// A node; the document is `Node(NodeId::ROOT)`
    Node(NodeId),
    /// The global window
    Window,
}

impl EventTarget {
    pub const DOCUMENT: EventTarget = EventTarget::Node(NodeId::ROOT);

    pub fn node(self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(id),
            Self::Window => None,
        }
    }
}

impl From<NodeId> for EventTarget {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl fmt::Display for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) if *id == NodeId::ROOT => f.write_str("document"),
            Self::Node(id) => write!(f, "node {id}"),
            Self::Window => f.write_str("window"),
        }
    }
}

/// Dispatch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// Event construction flags
#[derive(Debug, Clone, Copy, Default)]
pub struct EventInit {
    pub bubbles: bool,
    pub cancelable: bool,
}

/// DOM event
///
/// Dispatch state uses interior mutability so listeners only need `&Event`.
/// A clone copies that state once; flags set on the clone do not reach the
/// dispatch the original belongs to.
#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    bubbles: bool,
    cancelable: bool,
    detail: Option<String>,
    target: Cell<Option<EventTarget>>,
    current_target: Cell<Option<EventTarget>>,
    phase: Cell<EventPhase>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
    immediate_propagation_stopped: Cell<bool>,
    in_passive_listener: Cell<bool>,
}

impl Event {
    /// Non-bubbling, non-cancelable event (`new Event(type)`)
    pub fn new(event_type: &str) -> Self {
        Self::with_init(event_type, EventInit::default())
    }

    pub fn with_init(event_type: &str, init: EventInit) -> Self {
        Self {
            event_type: event_type.to_string(),
            bubbles: init.bubbles,
            cancelable: init.cancelable,
            detail: None,
            target: Cell::new(None),
            current_target: Cell::new(None),
            phase: Cell::new(EventPhase::None),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
            immediate_propagation_stopped: Cell::new(false),
            in_passive_listener: Cell::new(false),
        }
    }

    /// Bubbling, cancelable event, the shape of user input events
    pub fn bubbling(event_type: &str) -> Self {
        Self::with_init(
            event_type,
            EventInit {
                bubbles: true,
                cancelable: true,
            },
        )
    }

    /// Attach a string payload (`CustomEvent.detail`)
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn target(&self) -> Option<EventTarget> {
        self.target.get()
    }

    pub fn current_target(&self) -> Option<EventTarget> {
        self.current_target.get()
    }

    pub fn phase(&self) -> EventPhase {
        self.phase.get()
    }

    /// Prevent default action; ignored for non-cancelable events and
    /// inside passive listeners
    pub fn prevent_default(&self) {
        if self.cancelable && !self.in_passive_listener.get() {
            self.default_prevented.set(true);
        }
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Stop propagation after the current target
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Stop propagation and skip remaining listeners on the current target
    pub fn stop_immediate_propagation(&self) {
        self.propagation_stopped.set(true);
        self.immediate_propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped.get()
    }

    // === Dispatcher bookkeeping ===

    /// Reset per-dispatch flags and set the target
    pub fn begin_dispatch(&self, target: EventTarget) {
        self.target.set(Some(target));
        self.propagation_stopped.set(false);
        self.immediate_propagation_stopped.set(false);
    }

    pub fn enter(&self, current: EventTarget, phase: EventPhase) {
        self.current_target.set(Some(current));
        self.phase.set(phase);
    }

    pub fn set_passive(&self, passive: bool) {
        self.in_passive_listener.set(passive);
    }

    pub fn end_dispatch(&self) {
        self.current_target.set(None);
        self.phase.set(EventPhase::None);
        self.in_passive_listener.set(false);
    }
}

/// addEventListener options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    pub capture: bool,
    pub once: bool,
    pub passive: bool,
}

impl ListenerOptions {
    pub fn capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    pub fn passive(mut self, passive: bool) -> Self {
        self.passive = passive;
        self
    }
}

/// Registration handle returned by [`ListenerRegistry::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Registered<H> {
    id: ListenerId,
    options: ListenerOptions,
    handler: H,
}

type ListenerKey = (EventTarget, String);

/// Listener storage keyed by (target, event type), in registration order
pub struct ListenerRegistry<H> {
    next_id: u64,
    listeners: HashMap<ListenerKey, Vec<Registered<H>>>,
    index: HashMap<ListenerId, ListenerKey>,
}

impl<H: Clone> ListenerRegistry<H> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            listeners: HashMap::new(),
            index: HashMap::new(),
        }
    }

    /// Register a handler
    pub fn add(
        &mut self,
        target: EventTarget,
        event_type: &str,
        handler: H,
        options: ListenerOptions,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        let key = (target, event_type.to_string());
        self.listeners.entry(key.clone()).or_default().push(Registered {
            id,
            options,
            handler,
        });
        self.index.insert(id, key);
        id
    }

    /// Remove a handler, returns whether it was registered
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let Some(key) = self.index.remove(&id) else {
            return false;
        };
        if let Some(list) = self.listeners.get_mut(&key) {
            list.retain(|l| l.id != id);
            if list.is_empty() {
                self.listeners.remove(&key);
            }
        }
        true
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.index.contains_key(&id)
    }

    /// Copy of the listeners for a (target, type) pair
    pub fn snapshot(
        &self,
        target: EventTarget,
        event_type: &str,
    ) -> Vec<(ListenerId, ListenerOptions, H)> {
        self.listeners
            .get(&(target, event_type.to_string()))
            .map(|list| {
                list.iter()
                    .map(|l| (l.id, l.options, l.handler.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of listeners attached to a target, all types
    pub fn count_for(&self, target: EventTarget) -> usize {
        self.listeners
            .iter()
            .filter(|((t, _), _)| *t == target)
            .map(|(_, list)| list.len())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl<H: Clone> Default for ListenerRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for ListenerRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.index.len())
            .field("keys", &self.listeners.len())
            .finish()
    }
}

impl DomTree {
    /// Event path from the target up: target, ancestors, document, then the
    /// window when the node is connected.
    pub fn propagation_path(&self, target: EventTarget) -> Vec<EventTarget> {
        let EventTarget::Node(id) = target else {
            return vec![EventTarget::Window];
        };
        if self.get(id).is_none() {
            return Vec::new();
        }

        let mut path = vec![target];
        path.extend(self.ancestors(id).map(EventTarget::Node));
        if path.last() == Some(&EventTarget::DOCUMENT) {
            path.push(EventTarget::Window);
        }
        path
    }
}
