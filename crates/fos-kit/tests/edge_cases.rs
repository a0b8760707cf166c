//! Edge case tests for fos-kit
//!
//! Tests re-entrant dispatch, dropped handles, missing roots and
//! malformed input.

use std::cell::Cell;
use std::rc::Rc;

use fos_kit::{
    element, find, on, on_load, once, rem_to_pixels, split_size_and_unit, BindOptions, Component,
    Dom, DomComponent, Event, EventMap, EventNames, KitConfig, KitError, MultiProps, StyleObject,
    StyleValue,
};

struct Panel {
    base: DomComponent<Self>,
    opened: u32,
    closed: u32,
}

impl Component for Panel {
    const NAME: &'static str = "Panel";
    type Props = u32;

    fn create(base: DomComponent<Self>) -> Self {
        Self {
            base,
            opened: 0,
            closed: 0,
        }
    }

    fn component(&self) -> &DomComponent<Self> {
        &self.base
    }

    fn component_mut(&mut self) -> &mut DomComponent<Self> {
        &mut self.base
    }
}

#[test]
fn test_handler_disposing_itself_during_dispatch() {
    let dom = Dom::parse(r#"<button id="b"></button>"#);
    let button = find(&dom, "#b").unwrap();
    let count = Rc::new(Cell::new(0));

    let slot: Rc<Cell<Option<fos_kit::Disposer>>> = Rc::new(Cell::new(None));
    let counter = count.clone();
    let own = slot.clone();
    let disposer = on(
        &dom,
        button,
        "click",
        move |_| {
            counter.set(counter.get() + 1);
            if let Some(d) = own.take() {
                d.dispose();
            }
        },
        BindOptions::default(),
    )
    .unwrap();
    slot.set(Some(disposer));

    dom.dispatch_event(button, &Event::new("click"));
    dom.dispatch_event(button, &Event::new("click"));
    assert_eq!(count.get(), 1);
}

#[test]
fn test_once_handler_may_dispatch_again() {
    let dom = Dom::parse(r#"<button id="b"></button>"#);
    let button = find(&dom, "#b").unwrap();
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    let inner = dom.clone();

    once(
        &dom,
        button,
        "click",
        move |_| {
            counter.set(counter.get() + 1);
            // Bindings are already gone
            inner.dispatch_event(button, &Event::new("click"));
        },
        BindOptions::default(),
    )
    .unwrap();

    dom.dispatch_event(button, &Event::new("click"));
    assert_eq!(count.get(), 1);
}

#[test]
fn test_dispose_twice_and_after_dom_dropped() {
    let dom = Dom::parse(r#"<p id="p"></p>"#);
    let disposer = on(&dom, "#p", "click", |_| {}, BindOptions::default()).unwrap();
    let copy = disposer.clone();

    disposer.dispose();
    copy.dispose();
    assert!(copy.is_disposed());

    let disposer = on(&dom, "#p", "click", |_| {}, BindOptions::default()).unwrap();
    drop(dom);
    disposer.dispose();
}

#[test]
fn test_blank_event_list_binds_nothing() {
    let dom = Dom::parse(r#"<p id="p"></p>"#);
    let p = find(&dom, "#p").unwrap();
    let disposer = on(&dom, p, EventNames::split("   "), |_| {}, BindOptions::default()).unwrap();
    assert_eq!(disposer.len(), 0);
    assert!(disposer.is_disposed());
    assert_eq!(dom.listener_count(p), 0);
}

#[test]
fn test_component_without_root() {
    let dom = Dom::parse("<main></main>");
    let panel = Panel::new(&dom, None, Some(7));
    dom.run_tasks();

    let mut panel = panel.borrow_mut();
    assert_eq!(panel.component().base(), None);
    assert_eq!(panel.component().props().value, Some(7));
    assert_eq!(panel.component().find("main"), None);

    let events = EventMap::new().on("click", |this: &mut Panel, _| this.opened += 1);
    assert_eq!(panel.component_mut().find_with("_toggle", &events), None);
    assert_eq!(panel.component().event_count(), 0);

    assert!(panel
        .component()
        .multi_ref::<Panel>(None, MultiProps::None)
        .is_empty());
    assert!(matches!(
        panel.component().ref_component::<Panel>(None, None),
        Err(KitError::ComponentNotFound { .. })
    ));
}

#[test]
fn test_explicit_root_overrides_name_lookup() {
    let dom = Dom::parse(
        r#"<div class="Panel"></div><section id="s"><b class="Panel_x"></b></section>"#,
    );
    let section = find(&dom, "#s").unwrap();
    let panel = Panel::new(&dom, Some(section), None);
    assert_eq!(panel.borrow().component().base(), Some(section));
    assert!(panel.borrow().component().find("_x").is_some());
}

#[test]
fn test_dropped_component_ignores_events() {
    let dom = Dom::parse(r#"<div class="Panel"><a class="Panel_toggle"></a></div>"#);
    let toggle = find(&dom, ".Panel_toggle").unwrap();
    let panel = Panel::new(&dom, None, None);
    let events = EventMap::new().on("click", |this: &mut Panel, _| this.opened += 1);
    panel.borrow_mut().component_mut().multi_find_with("_toggle", &events);

    dom.dispatch_event(toggle, &Event::new("click"));
    assert_eq!(panel.borrow().opened, 1);

    drop(panel);
    // Bound handlers hold a weak reference only; the queued init is skipped
    dom.dispatch_event(toggle, &Event::new("click"));
    assert_eq!(dom.run_tasks(), 1);
}

#[test]
fn test_handler_dispatching_to_own_component() {
    let dom = Dom::parse(
        r#"<div class="Panel"><a class="Panel_toggle"></a><a class="Panel_close"></a></div>"#,
    );
    let toggle = find(&dom, ".Panel_toggle").unwrap();
    let close = find(&dom, ".Panel_close").unwrap();
    let panel = Panel::new(&dom, None, None);

    let on_toggle = EventMap::new().on("click", move |this: &mut Panel, _| {
        this.opened += 1;
        this.component().dom().dispatch_event(close, &Event::bubbling("click"));
        // Replayed after this handler returns
        assert_eq!(this.closed, 0);
    });
    let on_close = EventMap::new().on("click", |this: &mut Panel, event| {
        assert_eq!(event.map(Event::event_type), Some("click"));
        this.closed += 1;
    });
    {
        let mut panel = panel.borrow_mut();
        panel.component_mut().find_with("_toggle", &on_toggle);
        panel.component_mut().find_with("_close", &on_close);
    }

    dom.dispatch_event(toggle, &Event::bubbling("click"));
    assert_eq!(panel.borrow().opened, 1);
    assert_eq!(panel.borrow().closed, 1);
}

#[test]
fn test_event_while_component_borrowed_runs_later() {
    let dom = Dom::parse(r#"<div class="Panel"><a class="Panel_toggle"></a></div>"#);
    let toggle = find(&dom, ".Panel_toggle").unwrap();
    let panel = Panel::new(&dom, None, None);
    let events = EventMap::new().on("click", |this: &mut Panel, _| this.opened += 1);
    panel.borrow_mut().component_mut().find_with("_toggle", &events);

    {
        let _held = panel.borrow();
        dom.dispatch_event(toggle, &Event::new("click"));
    }
    assert_eq!(panel.borrow().opened, 0);

    dom.run_tasks();
    assert_eq!(panel.borrow().opened, 1);

    dom.dispatch_event(toggle, &Event::new("click"));
    assert_eq!(panel.borrow().opened, 2);
}

#[test]
fn test_element_markup_without_elements() {
    let dom = Dom::default();
    assert_eq!(element(&dom, "just text < not a tag", None, None), None);
    assert!(element(&dom, "<svg><circle r='2'/></svg>", None, None).is_some());
}

#[test]
fn test_computed_style_value_can_clear() {
    let dom = Dom::default();
    let div = dom.create_element("div");
    fos_kit::set_style(&dom, &div, &StyleObject::new().with("color", "red"));
    fos_kit::set_style(
        &dom,
        &div,
        &StyleObject::new().with("color", StyleValue::computed(|_, _, _| StyleValue::Null)),
    );
    assert_eq!(dom.inline_style(div, "color"), "");
}

#[test]
fn test_malformed_sizes() {
    assert_eq!(split_size_and_unit("px"), (0.0, "px".to_string()));
    assert_eq!(split_size_and_unit("--5px"), (0.0, "-5px".to_string()));
    assert_eq!(split_size_and_unit("1.2.3em"), (1.2, ".3em".to_string()));
    assert_eq!(split_size_and_unit("+4 vh"), (4.0, "vh".to_string()));
}

#[test]
fn test_rem_fallback_without_document_element() {
    let dom = Dom::with_config(
        fos_kit::Document::empty("about:blank"),
        KitConfig::default().with_root_font_size_fallback(20.0),
    );
    assert_eq!(rem_to_pixels(&dom, "1rem"), 20.0);
    assert_eq!(rem_to_pixels(&dom, "7px"), 7.0);
}

#[test]
fn test_on_load_without_body() {
    let dom = Dom::new(fos_kit::Document::empty("about:blank"));
    let result = smol::block_on(on_load(&dom, None));
    assert!(matches!(result, Err(KitError::LoadFailed(_))));
}
