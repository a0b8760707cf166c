//! DOM Components
//!
//! A component wraps a root element. It finds its children through the
//! `ComponentName_child` class convention, nests child components, and
//! owns the event bindings it creates until [`DomComponent::dispose`].
//!
//! Instances live in [`ComponentRef`]s. Bound handlers keep only a weak
//! reference, so a dropped component stops reacting without leaking.
//!
//! A handler that fires while the component is already borrowed (for
//! example, an event dispatched from inside another of its handlers) is
//! queued and replayed as soon as the borrow is released.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use fos_dom::{Event, NodeId};

use crate::events::{bind, BindOptions, Disposer, EventNames};
use crate::{find, Dom, KitError, Result};

/// Shared handle to a component instance
pub type ComponentRef<C> = Rc<RefCell<C>>;

/// Handler invocation waiting for the component borrow
type Deferred<C> = Box<dyn FnOnce(&mut C)>;

type DeferredQueue<C> = Rc<RefCell<VecDeque<Deferred<C>>>>;

/// Component behavior on top of a [`DomComponent`] base
pub trait Component: Sized + 'static {
    /// Identifier used for the default selector (`.NAME`) and for
    /// `_child` selectors (`.NAME_child`)
    const NAME: &'static str = "Component";

    /// Caller-supplied configuration
    type Props: Clone + 'static;

    /// Build the instance around its base
    fn create(base: DomComponent<Self>) -> Self;

    fn component(&self) -> &DomComponent<Self>;

    fn component_mut(&mut self) -> &mut DomComponent<Self>;

    /// Runs once, on the next turn of the task queue or on [`Component::mount`]
    fn init(&mut self) {}

    /// Construct a component. Without `base`, the first element of the
    /// document carrying class `NAME` is used.
    fn new(dom: &Dom, base: Option<NodeId>, props: Option<Self::Props>) -> ComponentRef<Self> {
        construct(dom, base, ComponentProps { index: None, value: props })
    }

    /// Run `init` now instead of waiting for the task queue. Later calls,
    /// and the queued one, do nothing.
    fn mount(this: &ComponentRef<Self>) {
        let Ok(mut component) = this.try_borrow_mut() else {
            tracing::warn!(component = Self::NAME, "Component is busy, mount skipped");
            return;
        };
        if component.component().mounted {
            return;
        }
        component.component_mut().mounted = true;
        tracing::debug!(component = Self::NAME, "Mounting component");
        component.init();

        let deferred = component.component().deferred.clone();
        run_deferred(&mut *component, &deferred);
    }

    /// Detach every event bound through this component
    fn dispose(&mut self) {
        self.component_mut().dispose();
    }
}

fn construct<C: Component>(
    dom: &Dom,
    base: Option<NodeId>,
    props: ComponentProps<C::Props>,
) -> ComponentRef<C> {
    let base = base.or_else(|| find::find(dom, &format!(".{}", C::NAME)));
    if base.is_none() {
        tracing::debug!(component = C::NAME, "No root element for component");
    }

    let component = Rc::new_cyclic(|this: &Weak<RefCell<C>>| {
        RefCell::new(C::create(DomComponent {
            dom: dom.clone(),
            base,
            props,
            this: this.clone(),
            events: Vec::new(),
            deferred: Rc::default(),
            mounted: false,
        }))
    });

    let pending = Rc::downgrade(&component);
    dom.queue_task(move || {
        if let Some(component) = pending.upgrade() {
            C::mount(&component);
        }
    });
    component
}

fn run_deferred<C: Component>(component: &mut C, deferred: &RefCell<VecDeque<Deferred<C>>>) {
    loop {
        let next = deferred.borrow_mut().pop_front();
        let Some(call) = next else {
            break;
        };
        call(component);
    }
}

/// Props as seen by a component: the caller's value plus the index
/// injected by [`DomComponent::multi_ref`]
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentProps<P> {
    pub index: Option<usize>,
    pub value: Option<P>,
}

impl<P> Default for ComponentProps<P> {
    fn default() -> Self {
        Self {
            index: None,
            value: None,
        }
    }
}

/// Props for [`DomComponent::multi_ref`]
pub enum MultiProps<P> {
    None,
    /// `values[i]` for the i-th match, nothing past the end
    Each(Vec<P>),
    /// The same value for every match
    Shared(P),
    /// Computed per match from its index and element
    With(Rc<dyn Fn(usize, NodeId) -> P>),
}

impl<P: Clone> MultiProps<P> {
    pub fn with(f: impl Fn(usize, NodeId) -> P + 'static) -> Self {
        Self::With(Rc::new(f))
    }

    fn resolve(&self, index: usize, element: NodeId) -> Option<P> {
        match self {
            Self::None => None,
            Self::Each(values) => values.get(index).cloned(),
            Self::Shared(value) => Some(value.clone()),
            Self::With(f) => Some(f(index, element)),
        }
    }
}

/// Handler in an [`EventMap`], called with the bound component
pub type ComponentHandler<C> = Rc<dyn Fn(&mut C, Option<&Event>)>;

/// Event names (space-separated lists allowed) mapped to handlers
pub struct EventMap<C> {
    entries: Vec<(String, ComponentHandler<C>)>,
}

impl<C: Component> EventMap<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn on(mut self, events: &str, handler: impl Fn(&mut C, Option<&Event>) + 'static) -> Self {
        let handler: ComponentHandler<C> = Rc::new(handler);
        self.entries.push((events.to_string(), handler));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: Component> Default for EventMap<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for EventMap<C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

/// State every component carries: root element, props and event bindings
pub struct DomComponent<C: Component> {
    dom: Dom,
    base: Option<NodeId>,
    props: ComponentProps<C::Props>,
    this: Weak<RefCell<C>>,
    events: Vec<Disposer>,
    deferred: DeferredQueue<C>,
    mounted: bool,
}

impl<C: Component> DomComponent<C> {
    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Root element, `None` when it could not be resolved
    pub fn base(&self) -> Option<NodeId> {
        self.base
    }

    pub fn props(&self) -> &ComponentProps<C::Props> {
        &self.props
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Strong handle to the owning component, while it is alive
    pub fn this(&self) -> Option<ComponentRef<C>> {
        self.this.upgrade()
    }

    /// Rewrite `_child` to `.Name_child`; other selectors pass through
    pub fn child_selector(&self, selector: &str) -> String {
        if selector.starts_with('_') {
            format!(".{}{}", C::NAME, selector)
        } else {
            selector.to_string()
        }
    }

    /// First element under the base matching `selector`
    pub fn find(&self, selector: &str) -> Option<NodeId> {
        let base = self.base?;
        find::find_in(&self.dom, base, &self.child_selector(selector))
    }

    /// [`find`](Self::find), then bind `events` to the element for the
    /// lifetime of this component
    pub fn find_with(&mut self, selector: &str, events: &EventMap<C>) -> Option<NodeId> {
        let element = self.find(selector)?;
        self.add_events_to_element(element, events);
        Some(element)
    }

    /// All elements under the base matching `selector`
    pub fn multi_find(&self, selector: &str) -> Vec<NodeId> {
        match self.base {
            Some(base) => find::find_all_in(&self.dom, base, &self.child_selector(selector)),
            None => Vec::new(),
        }
    }

    pub fn multi_find_with(&mut self, selector: &str, events: &EventMap<C>) -> Vec<NodeId> {
        let elements = self.multi_find(selector);
        for &element in &elements {
            self.add_events_to_element(element, events);
        }
        elements
    }

    /// Construct child component `R` on the first matching element.
    ///
    /// Without a selector, `.R::NAME` is used. Fails when nothing matches.
    pub fn ref_component<R: Component>(
        &self,
        selector: Option<&str>,
        props: Option<R::Props>,
    ) -> Result<ComponentRef<R>> {
        let selector = self.ref_selector::<R>(selector);
        match self.find_child(&selector) {
            Some(element) => Ok(R::new(&self.dom, Some(element), props)),
            None => Err(KitError::ComponentNotFound {
                selector,
                component: C::NAME,
            }),
        }
    }

    /// Like [`ref_component`](Self::ref_component), `None` when nothing matches
    pub fn lazy_ref<R: Component>(
        &self,
        selector: Option<&str>,
        props: Option<R::Props>,
    ) -> Option<ComponentRef<R>> {
        let selector = self.ref_selector::<R>(selector);
        let element = self.find_child(&selector)?;
        Some(R::new(&self.dom, Some(element), props))
    }

    /// Construct one `R` per matching element, each with its index
    pub fn multi_ref<R: Component>(
        &self,
        selector: Option<&str>,
        props: MultiProps<R::Props>,
    ) -> Vec<ComponentRef<R>> {
        let selector = self.ref_selector::<R>(selector);
        let Some(base) = self.base else {
            return Vec::new();
        };

        find::find_all_in(&self.dom, base, &selector)
            .into_iter()
            .enumerate()
            .map(|(index, element)| {
                let props = ComponentProps {
                    index: Some(index),
                    value: props.resolve(index, element),
                };
                construct::<R>(&self.dom, Some(element), props)
            })
            .collect()
    }

    /// Bind each entry of `events` on `element` to this component. The
    /// bindings are released by [`dispose`](Self::dispose).
    pub fn add_events_to_element(&mut self, element: NodeId, events: &EventMap<C>) {
        for (names, handler) in &events.entries {
            let this = self.this.clone();
            let handler = handler.clone();
            let deferred = self.deferred.clone();
            let dom = self.dom.downgrade();
            let bound = Rc::new(move |event: Option<&Event>| {
                let Some(component) = this.upgrade() else {
                    return;
                };
                if let Ok(mut component) = component.try_borrow_mut() {
                    handler(&mut *component, event);
                    run_deferred(&mut *component, &deferred);
                    return;
                }

                // Replayed with a copy of the event once the borrow is released
                tracing::debug!(component = C::NAME, "Component is busy, handler deferred");
                let event = event.cloned();
                let call = {
                    let handler = handler.clone();
                    move |component: &mut C| handler(component, event.as_ref())
                };
                deferred.borrow_mut().push_back(Box::new(call));

                // The borrow may be held outside any handler of this component
                if let Some(dom) = dom.upgrade() {
                    let this = this.clone();
                    let deferred = deferred.clone();
                    dom.queue_task(move || {
                        let Some(component) = this.upgrade() else {
                            return;
                        };
                        if let Ok(mut component) = component.try_borrow_mut() {
                            run_deferred(&mut *component, &deferred);
                        }
                    });
                }
            });

            let disposer = bind(
                &self.dom,
                &[element.into()],
                &EventNames::split(names),
                bound,
                BindOptions::default(),
            );
            self.events.push(disposer);
        }
    }

    /// Release every binding made through this component. Child
    /// components, base and props are left alone.
    pub fn dispose(&mut self) {
        let count = self.events.len();
        for disposer in self.events.drain(..) {
            disposer.dispose();
        }
        self.deferred.borrow_mut().clear();
        tracing::debug!(component = C::NAME, disposers = count, "Disposed component");
    }

    /// Disposers recorded since the last dispose
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    fn ref_selector<R: Component>(&self, selector: Option<&str>) -> String {
        match selector {
            Some(selector) if !selector.is_empty() => self.child_selector(selector),
            _ => format!(".{}", R::NAME),
        }
    }

    fn find_child(&self, selector: &str) -> Option<NodeId> {
        find::find_in(&self.dom, self.base?, selector)
    }
}

impl<C: Component> fmt::Debug for DomComponent<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomComponent")
            .field("name", &C::NAME)
            .field("base", &self.base)
            .field("index", &self.props.index)
            .field("events", &self.events.len())
            .field("mounted", &self.mounted)
            .finish()
    }
}
