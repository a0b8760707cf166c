//! Event wiring
//!
//! `on`/`once` attach one handler for several event names to several
//! targets and hand back a [`Disposer`] that detaches exactly those
//! bindings.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use fos_dom::{Event, EventTarget, ListenerId, ListenerOptions, NodeId};

use crate::dom::{EventHandler, WeakDom};
use crate::{find, Dom, KitError, Result};

/// Handler shape used by the toolkit; `None` for `dispatch_at_init` calls
pub type Handler = Rc<dyn Fn(Option<&Event>)>;

/// What to bind to
#[derive(Debug, Clone, PartialEq)]
pub enum Targets {
    /// Resolved with `find_all` against the document
    Selector(String),
    One(EventTarget),
    Many(Vec<EventTarget>),
}

impl From<&str> for Targets {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for Targets {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<NodeId> for Targets {
    fn from(node: NodeId) -> Self {
        Self::One(node.into())
    }
}

impl From<EventTarget> for Targets {
    fn from(target: EventTarget) -> Self {
        Self::One(target)
    }
}

impl From<Vec<NodeId>> for Targets {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self::Many(nodes.into_iter().map(EventTarget::Node).collect())
    }
}

impl From<&[NodeId]> for Targets {
    fn from(nodes: &[NodeId]) -> Self {
        Self::Many(nodes.iter().copied().map(EventTarget::Node).collect())
    }
}

impl From<Vec<EventTarget>> for Targets {
    fn from(targets: Vec<EventTarget>) -> Self {
        Self::Many(targets)
    }
}

impl fmt::Display for Targets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector(selector) => write!(f, "selector '{selector}'"),
            Self::One(target) => write!(f, "{target}"),
            Self::Many(targets) => write!(f, "{} targets", targets.len()),
        }
    }
}

/// One or several event names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventNames(Vec<String>);

impl EventNames {
    /// Split a space-separated list such as `"mouseenter mouseleave"`
    pub fn split(names: &str) -> Self {
        Self(names.split_whitespace().map(str::to_string).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for EventNames {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for EventNames {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl<const N: usize> From<[&str; N]> for EventNames {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|n| n.to_string()).collect())
    }
}

impl From<&[&str]> for EventNames {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|n| n.to_string()).collect())
    }
}

impl From<Vec<String>> for EventNames {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

/// Options for `on`/`once`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindOptions {
    pub listener: ListenerOptions,
    /// Call the handler once right after wiring, with no event
    pub dispatch_at_init: bool,
}

impl BindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture(mut self, capture: bool) -> Self {
        self.listener.capture = capture;
        self
    }

    pub fn passive(mut self, passive: bool) -> Self {
        self.listener.passive = passive;
        self
    }

    pub fn dispatch_at_init(mut self, dispatch: bool) -> Self {
        self.dispatch_at_init = dispatch;
        self
    }
}

impl From<ListenerOptions> for BindOptions {
    fn from(listener: ListenerOptions) -> Self {
        Self {
            listener,
            dispatch_at_init: false,
        }
    }
}

/// Detaches the bindings it was returned for.
///
/// Clones share the same bindings. Disposing twice is a no-op.
#[derive(Clone)]
pub struct Disposer {
    dom: WeakDom,
    bindings: Rc<RefCell<Vec<ListenerId>>>,
}

impl Disposer {
    fn new(dom: &Dom) -> Self {
        Self {
            dom: dom.downgrade(),
            bindings: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn dispose(&self) {
        let bindings = std::mem::take(&mut *self.bindings.borrow_mut());
        if bindings.is_empty() {
            return;
        }
        let Some(dom) = self.dom.upgrade() else {
            return;
        };
        for id in &bindings {
            dom.remove_event_listener(*id);
        }
        tracing::debug!(bindings = bindings.len(), "Disposed event bindings");
    }

    /// Bindings still attached
    pub fn len(&self) -> usize {
        self.bindings.borrow().len()
    }

    pub fn is_disposed(&self) -> bool {
        self.bindings.borrow().is_empty()
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("bindings", &self.len())
            .finish()
    }
}

/// Listen to one or several events on one or several targets.
///
/// A string target is a selector resolved against the document. Fails with
/// [`KitError::EmptyTargets`] when nothing resolves and the configuration
/// is strict; otherwise an empty target set binds nothing.
pub fn on(
    dom: &Dom,
    targets: impl Into<Targets>,
    events: impl Into<EventNames>,
    handler: impl Fn(Option<&Event>) + 'static,
    options: BindOptions,
) -> Result<Disposer> {
    let targets = resolve_targets(dom, targets.into())?;
    Ok(bind(dom, &targets, &events.into(), Rc::new(handler), options))
}

/// Like [`on`], but the first event on any target detaches every binding
/// before the handler runs, so the handler fires at most once in total.
///
/// The coupling is deliberate: one firing ends the listeners of all the
/// other targets and event names too.
pub fn once(
    dom: &Dom,
    targets: impl Into<Targets>,
    events: impl Into<EventNames>,
    handler: impl Fn(Option<&Event>) + 'static,
    options: BindOptions,
) -> Result<Disposer> {
    let targets = resolve_targets(dom, targets.into())?;
    Ok(bind_once(dom, &targets, &events.into(), Rc::new(handler), options))
}

pub(crate) fn bind(
    dom: &Dom,
    targets: &[EventTarget],
    events: &EventNames,
    handler: Handler,
    options: BindOptions,
) -> Disposer {
    let disposer = Disposer::new(dom);
    let listener: EventHandler = {
        let handler = handler.clone();
        Rc::new(move |event: &Event| handler(Some(event)))
    };
    wire(dom, targets, events, listener, options.listener, &disposer);
    if options.dispatch_at_init {
        handler(None);
    }
    disposer
}

pub(crate) fn bind_once(
    dom: &Dom,
    targets: &[EventTarget],
    events: &EventNames,
    handler: Handler,
    options: BindOptions,
) -> Disposer {
    let disposer = Disposer::new(dom);
    let proxy: EventHandler = {
        let handler = handler.clone();
        let disposer = disposer.clone();
        Rc::new(move |event: &Event| {
            disposer.dispose();
            handler(Some(event));
        })
    };
    wire(dom, targets, events, proxy, options.listener, &disposer);
    if options.dispatch_at_init {
        handler(None);
    }
    disposer
}

fn wire(
    dom: &Dom,
    targets: &[EventTarget],
    events: &EventNames,
    listener: EventHandler,
    options: ListenerOptions,
    disposer: &Disposer,
) {
    let mut bindings = disposer.bindings.borrow_mut();
    for &target in targets {
        for event in events.iter() {
            bindings.push(dom.add_event_listener(target, event, listener.clone(), options));
        }
    }
    tracing::debug!(
        targets = targets.len(),
        events = events.len(),
        "Bound event handler"
    );
}

fn resolve_targets(dom: &Dom, targets: Targets) -> Result<Vec<EventTarget>> {
    let resolved = match &targets {
        Targets::Selector(selector) => find::find_all(dom, selector)
            .into_iter()
            .map(EventTarget::Node)
            .collect(),
        Targets::One(target) => vec![*target],
        Targets::Many(list) => list.clone(),
    };

    if resolved.is_empty() {
        if dom.config().strict_targets {
            return Err(KitError::EmptyTargets(targets.to_string()));
        }
        tracing::debug!(%targets, "No event targets resolved");
    }
    Ok(resolved)
}
