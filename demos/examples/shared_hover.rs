// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared hover and selection across the parts of a composite chart.
//!
//! This example shows how to combine:
//! - `trellis_tree` for the renderable tree and the base-props capability,
//! - `trellis_events` for declarative events and mutations,
//! - `trellis_shared_events` for the coordinator that ties them together.
//!
//! Run:
//! - `cargo run -p trellis_demos --example shared_hover`

use std::rc::Rc;

use kurbo::Point;
use serde_json::json;
use trellis_events::{
    attributes_of, base_props_from, event_handler, mutation_fn, BaseProps, ChildSelector,
    EventDescriptor, EventKey, InteractionEvent, KeySelector, MutationDescriptor, StateChange,
    Target, TargetSelector,
};
use trellis_shared_events::coordinator::{CoordinatorProps, SharedEventCoordinator};
use trellis_shared_events::EventBinding;
use trellis_tree::{group, Element, Props, Renderable, Role};

/// A bar series with one base-props coordinate per datum.
struct BarSeries {
    fills: &'static [&'static str],
}

impl Renderable for BarSeries {
    fn base_props(&self, _props: &Props) -> Option<BaseProps> {
        Some(base_props_from(self.fills.iter().enumerate().flat_map(
            |(i, fill)| {
                let i = u32::try_from(i).expect("few bars");
                [
                    (
                        EventKey::Index(i),
                        Target::Data,
                        attributes_of(json!({ "fill": fill })),
                    ),
                    (
                        EventKey::Index(i),
                        Target::Labels,
                        attributes_of(json!({ "text": format!("bar {i}") })),
                    ),
                ]
            },
        )))
    }

    fn type_name(&self) -> &str {
        "bar-series"
    }
}

/// The chart surface: a container-role root, so computed events are handed
/// over as a deferred set instead of being bound directly.
struct ChartSurface;

impl Renderable for ChartSurface {
    fn role(&self) -> Role {
        Role::Container
    }

    fn type_name(&self) -> &str {
        "chart-surface"
    }
}

fn main() {
    // Hovering a bar highlights it and dims every bar of the other series.
    let hover = EventDescriptor::new(ChildSelector::many(["north", "south"]), Target::Data)
        .on(
            "pointerover",
            event_handler(|_, scope, _| {
                let other = if scope.child_name == Some("north") {
                    "south"
                } else {
                    "north"
                };
                vec![
                    StateChange::patch(attributes_of(json!({ "fill": "tomato" }))),
                    StateChange::patch(attributes_of(json!({ "opacity": 0.4 })))
                        .for_child(other)
                        .for_key(EventKey::All),
                ]
            }),
        )
        .on(
            "pointerout",
            event_handler(|_, scope, _| {
                let other = if scope.child_name == Some("north") {
                    "south"
                } else {
                    "north"
                };
                vec![
                    StateChange::clear(),
                    StateChange::clear().for_child(other).for_key(EventKey::All),
                ]
            }),
        );

    // Clicking anywhere on the surface toggles a zoom flag on the parent.
    let zoom = EventDescriptor::new(ChildSelector::All, Target::Parent).on(
        "pointerdown",
        event_handler(|event, scope, state| {
            let zoomed = state
                .get("parent", &EventKey::parent(), scope.target)
                .is_some();
            if zoomed {
                vec![StateChange::clear().for_key(EventKey::parent())]
            } else {
                let center = event.position.unwrap_or(Point::ZERO);
                vec![StateChange::patch(attributes_of(
                    json!({ "zoom": { "x": center.x, "y": center.y } }),
                ))
                .for_key(EventKey::parent())]
            }
        }),
    );

    // Preselect the second bar of the north series at mount.
    let preselect = MutationDescriptor::new(
        ChildSelector::one("north"),
        TargetSelector::one(Target::Data),
        KeySelector::one(EventKey::Index(1)),
        mutation_fn(|_, _| Some(attributes_of(json!({ "selected": true })))),
    );

    let container = Element::new(
        Rc::new(ChartSurface),
        Props::new().with_attrs(attributes_of(json!({ "width": 400, "height": 300 }))),
    );
    let children = vec![
        Element::new(
            Rc::new(BarSeries {
                fills: &["steelblue", "steelblue", "steelblue"],
            }),
            Props::named("north"),
        ),
        Element::new(
            Rc::new(BarSeries {
                fills: &["seagreen", "seagreen"],
            }),
            Props::named("south"),
        ),
        group(), // a legend placeholder: no capability, passes through untouched
    ];

    let props = CoordinatorProps::new(children)
        .with_container(container)
        .with_events(vec![hover, zoom])
        .with_initial_mutations(vec![preselect]);

    let mut coordinator = SharedEventCoordinator::new(props);
    coordinator.mount();

    println!("== After mount ==");
    println!(
        "north[1].data selection: {:?}",
        coordinator
            .state()
            .borrow()
            .get("north", &EventKey::Index(1), &Target::Data)
    );

    // First render: participating children get their bundles, the legend
    // passes through untouched.
    let rendered = coordinator.render();
    println!("\n== First render ==");
    for child in rendered.element.children() {
        println!(
            "child {:?}: bundle = {}",
            child.props.name,
            child.props.shared.is_some()
        );
    }
    match &rendered.binding {
        EventBinding::Deferred(handlers) => {
            println!("container-role root defers {} handler(s)", handlers.len());
        }
        EventBinding::Direct(handlers) => {
            println!("root binds {} handler(s) directly", handlers.len());
        }
    }

    // Hover the first bar of the north series.
    let north = rendered.element.children()[0]
        .props
        .shared
        .clone()
        .expect("north participates");
    let handlers = north.resolve(north.events(), &Target::Data);
    handlers["pointerover"].call(&InteractionEvent::at(Point::new(42.0, 17.0)).on_key(EventKey::Index(0)));

    println!("\n== After pointerover on north[0] ==");
    let rendered = coordinator.render();
    let north = rendered.element.children()[0].props.shared.clone().unwrap();
    let south = rendered.element.children()[1].props.shared.clone().unwrap();
    println!(
        "north[0].data: {}",
        serde_json::Value::Object(north.event_state(&EventKey::Index(0), &Target::Data))
    );
    println!(
        "south[all].data: {}",
        serde_json::Value::Object(south.event_state(&EventKey::All, &Target::Data))
    );

    // Click the surface: the parent handler stores the zoom center.
    rendered.handlers()["pointerdown"].call(&InteractionEvent::at(Point::new(200.0, 150.0)));
    println!("\n== After pointerdown on the surface ==");
    println!(
        "parent state: {:?}",
        coordinator
            .state()
            .borrow()
            .get("parent", &EventKey::parent(), &Target::Parent)
    );

    // Externally triggered mutation: a host-side "clear selection" button.
    let clear_selection = MutationDescriptor::new(
        ChildSelector::one("north"),
        TargetSelector::one(Target::Data),
        KeySelector::one(EventKey::Index(1)),
        mutation_fn(|_, _| None),
    )
    .with_callback(Rc::new(|| println!("selection cleared, notifying host")));

    let mut next = coordinator.props().clone();
    next.external_event_mutations = vec![clear_selection];
    println!("\n== After external clear-selection update ==");
    let effects = coordinator.update(next);
    println!("update effects: {effects:?}");
    println!(
        "north[1].data selection: {:?}",
        coordinator
            .state()
            .borrow()
            .get("north", &EventKey::Index(1), &Target::Data)
    );
}
