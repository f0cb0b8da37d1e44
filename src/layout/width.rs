//! Width pass: intrinsic column widths, column widening and slot widths.

use std::collections::HashMap;

use log::{debug, info};

use crate::config::LayoutConfig;
use crate::template::{Template, Width};

use super::host::{ElementId, Measure};

/// Compute every column's and slot's width for a materialized template.
///
/// # Panics
///
/// Panics if the template or one of its non-empty slots has no element, or
/// if widening does not converge within the configured cap.
pub fn compute_widths<M: Measure + ?Sized>(template: &mut Template, measure: &M, config: &LayoutConfig) {
    let container = template_element(template);
    info!("computing widths for template {}", template.id);

    let slot_widths = measure_slots(template, measure);
    let available = measure.available_width(container);

    let columns = template.columns();
    for column in columns.iter_mut() {
        if column.intrinsic_widths().is_some() {
            continue;
        }
        let contents = column.slots.iter().filter_map(|name| slot_widths.get(name));
        let (minimum, preferred) = match column.width {
            Width::Length(length) => {
                let px = measure.resolve_length(&length, container);
                (px, px)
            }
            Width::Equal => (0.0, f64::INFINITY),
            Width::MinContent => {
                let px = contents.map(|w| w.0).fold(0.0, f64::max);
                (px, px)
            }
            Width::MaxContent => {
                let px = contents.map(|w| w.1).fold(0.0, f64::max);
                (px, px)
            }
            Width::FitContent => contents.fold((0.0, 0.0), |(min, pref), w| {
                (f64::max(min, w.0), f64::max(pref, w.1))
            }),
            Width::MinMax(low, high) => (
                measure.resolve_length(&low, container),
                measure.resolve_length(&high, container),
            ),
        };
        debug!(
            "column {} ({}): minimum {minimum}, preferred {preferred}",
            column.index, column.width
        );
        column.intrinsic_minimum_width = Some(minimum);
        column.intrinsic_preferred_width = Some(preferred);
    }

    let minimums: Vec<f64> = columns
        .iter()
        .map(|c| c.intrinsic_minimum_width.unwrap_or(0.0))
        .collect();
    let preferred: Vec<f64> = columns
        .iter()
        .map(|c| c.intrinsic_preferred_width.unwrap_or(0.0))
        .collect();
    let minimum_total: f64 = minimums.iter().sum();

    let widths = if minimum_total > available {
        debug!("minimum widths {minimum_total} exceed available {available}; content overflows");
        minimums
    } else {
        widen(&preferred, available, config.widening_cap(preferred.len()))
    };

    for (column, width) in columns.iter_mut().zip(&widths) {
        column.computed_width = *width;
    }
    for slot in &mut template.slots {
        let width: f64 = widths[slot.start_column..=slot.end_column()].iter().sum();
        slot.computed_width = Some(width);
    }
    template.computed_width = widths.iter().sum();
    debug!("template {} column widths {widths:?}", template.id);
}

/// Distribute `available` across columns, pinning each column whose fair
/// share would exceed its preferred width at that preferred width.
///
/// # Panics
///
/// Panics if more than `cap` rounds are needed.
pub fn widen(preferred: &[f64], available: f64, cap: usize) -> Vec<f64> {
    let mut widths = vec![0.0; preferred.len()];
    let mut pinned = vec![false; preferred.len()];
    let mut steps = 0;

    loop {
        steps += 1;
        assert!(steps <= cap, "column widening did not converge within {cap} steps");

        let expandable = pinned.iter().filter(|p| !**p).count();
        if expandable == 0 {
            break;
        }
        let pinned_total: f64 = widths
            .iter()
            .zip(&pinned)
            .filter(|(_, p)| **p)
            .map(|(w, _)| w)
            .sum();
        let share = (available - pinned_total) / expandable as f64;

        let mut pinned_now = false;
        for (i, &pref) in preferred.iter().enumerate() {
            if !pinned[i] && pref < share {
                pinned[i] = true;
                widths[i] = pref;
                pinned_now = true;
            }
        }
        if !pinned_now {
            for (width, _) in widths.iter_mut().zip(&pinned).filter(|(_, p)| !**p) {
                *width = share;
            }
            break;
        }
    }

    widths
}

/// Intrinsic (minimum, preferred) widths of every slot, measured once.
fn measure_slots<M: Measure + ?Sized>(template: &mut Template, measure: &M) -> HashMap<char, (f64, f64)> {
    let mut widths = HashMap::new();
    for slot in &mut template.slots {
        let measured = match slot.intrinsic_widths() {
            Some(cached) => cached,
            None if slot.is_empty_slot() => (0.0, 0.0),
            None => {
                let element = slot_element(slot.element, slot.name);
                let preferred = measure.intrinsic_preferred_width(element);
                // A spanning slot constrains no single column.
                let minimum = if slot.colspan > 1 {
                    0.0
                } else {
                    measure.intrinsic_minimum_width(element)
                };
                (minimum, preferred)
            }
        };
        slot.intrinsic_minimum_width = Some(measured.0);
        slot.intrinsic_preferred_width = Some(measured.1);
        widths.insert(slot.name, measured);
    }
    widths
}

pub(crate) fn template_element(template: &Template) -> ElementId {
    match template.element {
        Some(element) => element,
        None => panic!(
            "template {} ({}) must be materialized before sizing",
            template.id, template.selector_text
        ),
    }
}

pub(crate) fn slot_element(element: Option<ElementId>, name: char) -> ElementId {
    match element {
        Some(element) => element,
        None => panic!("slot '{name}' must have an element before sizing"),
    }
}
