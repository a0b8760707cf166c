//! Document and element load waits
//!
//! The futures register their listeners eagerly, when created, and remove
//! them when they complete or are dropped.

use std::future::Future;
use std::rc::Rc;

use fos_dom::{event_types, Event, EventTarget, NodeId, ReadyState};

use crate::events::{bind_once, BindOptions, Disposer, EventNames};
use crate::{Dom, KitError, Result};

/// Detaches the wrapped bindings when dropped
struct ListenerGuard(Option<Disposer>);

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(disposer) = &self.0 {
            disposer.dispose();
        }
    }
}

/// Resolves once the document is parsed (`DOMContentLoaded`), immediately
/// if it already is
pub fn dom_ready(dom: &Dom) -> impl Future<Output = ()> + use<> {
    let (tx, rx) = smol::channel::bounded::<()>(1);

    let guard = if dom.ready_state() != ReadyState::Loading {
        let _ = tx.try_send(());
        ListenerGuard(None)
    } else {
        let disposer = bind_once(
            dom,
            &[EventTarget::DOCUMENT],
            &EventNames::from(event_types::DOM_CONTENT_LOADED),
            Rc::new(move |_: Option<&Event>| {
                let _ = tx.try_send(());
            }),
            BindOptions::default(),
        );
        ListenerGuard(Some(disposer))
    };

    async move {
        let _guard = guard;
        let _ = rx.recv().await;
    }
}

/// Resolves when `element` (default `<body>`) fires `load`, immediately if
/// it is already complete. An `error` event fails with
/// [`KitError::LoadFailed`].
pub fn on_load(dom: &Dom, element: Option<NodeId>) -> impl Future<Output = Result<()>> + use<> {
    let (tx, rx) = smol::channel::bounded::<Result<()>>(1);

    let guard = match element.or_else(|| dom.body()) {
        None => {
            let _ = tx.try_send(Err(KitError::LoadFailed("document without <body>".to_string())));
            ListenerGuard(None)
        }
        Some(node) if dom.is_loaded(node) => {
            let _ = tx.try_send(Ok(()));
            ListenerGuard(None)
        }
        Some(node) => {
            let disposer = bind_once(
                dom,
                &[EventTarget::Node(node)],
                &EventNames::from([event_types::LOAD, event_types::ERROR]),
                Rc::new(move |event: Option<&Event>| {
                    let outcome = match event {
                        Some(e) if e.event_type() == event_types::LOAD => Ok(()),
                        _ => Err(KitError::LoadFailed(format!("node {node}"))),
                    };
                    let _ = tx.try_send(outcome);
                }),
                BindOptions::default(),
            );
            ListenerGuard(Some(disposer))
        }
    };

    async move {
        let _guard = guard;
        rx.recv()
            .await
            .unwrap_or_else(|_| Err(KitError::LoadFailed("listener dropped".to_string())))
    }
}
