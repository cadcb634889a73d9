// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtualized card grid driven by a simulated page.
//!
//! This example shows how a host wires `understory_virtual_grid` up:
//! - a probe that resolves the grid's column template from the page width,
//! - scroll events from the document root and body,
//! - post-layout row measurements fed back into the view,
//! - incremental loading when the window nears the end.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example virtual_grid_scroll`

use std::cell::{Cell, RefCell};
use std::fmt::Write as _;
use std::rc::Rc;

use kurbo::Size;
use tracing_subscriber::EnvFilter;
use understory_virtual_grid::{
    GridOptions, GridView, ScrollMetrics, Subscription, count_template_tracks,
};

const CARD_MIN_WIDTH: f64 = 240.0;
const GAP: f64 = 16.0;
const VIEWPORT_HEIGHT: f64 = 900.0;
const PAGE_SIZE: usize = 60;
const MAX_ITEMS: usize = 240;

#[derive(Clone, Debug)]
struct Card {
    title: String,
    lines: usize,
}

/// Stand-in for the layout engine: resolves `repeat(auto-fill, minmax(240px, 1fr))`.
fn resolved_template(width: f64) -> String {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Width is positive and small"
    )]
    let tracks = ((width + GAP) / (CARD_MIN_WIDTH + GAP)).floor().max(0.0) as usize;
    if tracks == 0 {
        return String::from("none");
    }
    let track = (width - GAP * (tracks as f64 - 1.0)) / tracks as f64;
    let mut out = String::new();
    for i in 0..tracks {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{track:.1}px");
    }
    out
}

fn load_page(items: &mut Vec<Card>) {
    let start = items.len();
    items.extend((start..start + PAGE_SIZE).map(|i| Card {
        title: format!("Card {i}"),
        lines: 1 + (i * 7) % 5,
    }));
}

/// Height a rendered card would lay out at.
fn card_height(card: &Card) -> f64 {
    160.0 + 18.0 * card.lines as f64
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let template = Rc::new(RefCell::new(resolved_template(1280.0)));
    let probe = {
        let template = template.clone();
        move || count_template_tracks(&template.borrow())
    };

    let options = GridOptions::default()
        .with_class_name("card-grid")
        .with_row_gap(GAP)
        .with_scroll_margin(64.0);
    let mut grid = GridView::new(probe, options);

    let wants_more = Rc::new(Cell::new(false));
    {
        let wants_more = wants_more.clone();
        grid.set_end_reached(move || wants_more.set(true));
    }
    grid.attach(Subscription::new(|| tracing::info!("resize observer disconnected")));
    grid.attach(Subscription::new(|| tracing::info!("scroll listener removed")));

    tracing::info!(
        class_name = grid.class_name(),
        columns = grid.column_count().get(),
        "grid mounted"
    );

    let mut items = Vec::new();
    load_page(&mut items);

    let mut scroll = 0.0;
    for step in 0..40 {
        if step == 20 {
            // Narrow the window: the probe now resolves fewer tracks.
            *template.borrow_mut() = resolved_template(800.0);
            if grid.on_probe_resize(Size::new(800.0, 0.0)) {
                tracing::info!(columns = grid.column_count().get(), "layout changed");
            }
        }

        let content = grid.total_size() + 64.0;
        let root = ScrollMetrics::new(scroll, VIEWPORT_HEIGHT, content.max(VIEWPORT_HEIGHT));
        let body = ScrollMetrics::new(0.0, VIEWPORT_HEIGHT, VIEWPORT_HEIGHT);
        grid.on_scroll(&root, &body);

        if grid.needs_render() {
            let frame = grid.render(&items, |card, index| (index, card.title.clone()));
            // Lay out: each row is as tall as its tallest card.
            for row in &frame.rows {
                let height = items[row.items.clone()]
                    .iter()
                    .map(card_height)
                    .fold(0.0, f64::max);
                grid.report_measured(row.index, height);
            }
            let first = frame.rows.first().map(|row| row.cells[0].1.as_str());
            tracing::info!(
                step,
                rows = ?frame.window.rows(),
                translate = frame.translation().y,
                total = frame.total_size(),
                first,
                "frame"
            );
        }

        if wants_more.replace(false) && items.len() < MAX_ITEMS {
            load_page(&mut items);
            grid.set_item_count(items.len());
            tracing::info!(items = items.len(), "loaded more cards");
        }

        scroll += 450.0;
    }

    grid.teardown();
}
