//! fOS Kit - DOM utility toolkit
//!
//! Helpers for scripting a parsed [`Document`]:
//! - selector lookups (`find`, `find_all`, `get_parent_with_class`)
//! - multi-target event wiring with disposers (`on`, `once`)
//! - class-convention components ([`Component`], [`DomComponent`])
//! - element, attribute and style helpers
//! - rem and unit conversion, SVG attribute formatting
//! - `dom_ready` and `on_load` futures
//!
//! Everything runs on one thread against a shared [`Dom`] handle. Event
//! dispatch and the task queue are driven explicitly by the host.

mod component;
mod config;
mod dom;
mod element;
mod error;
mod events;
mod find;
mod load;
mod svg;
mod units;

pub use component::{
    Component, ComponentHandler, ComponentProps, ComponentRef, DomComponent, EventMap, MultiProps,
};
pub use config::KitConfig;
pub use dom::{Dom, EventHandler};
pub use element::{
    element, get_style, get_style_part, set_attributes, set_style, AttrValue, StyleFn,
    StyleObject, StylePart, StyleReading, StyleTargets, StyleValue,
};
pub use error::{KitError, Result};
pub use events::{on, once, BindOptions, Disposer, EventNames, Handler, Targets};
pub use find::{find, find_all, find_all_in, find_in, get_parent_with_class};
pub use load::{dom_ready, on_load};
pub use svg::{svg_color, svg_position, SvgColor};
pub use units::{format_number, rem_to_pixels, root_font_size, split_size_and_unit, Size};

pub use fos_dom::{
    event_types, Document, Event, EventInit, EventPhase, EventTarget, ListenerOptions, NodeId,
    ReadyState,
};
