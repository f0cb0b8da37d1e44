//! Height pass: row heights, multi-row reconciliation and slot heights.
//!
//! Runs after the width pass, since content height depends on each slot's
//! computed width. Every run starts from the declared heights and fresh
//! content measurements, so running it twice gives the same result.

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::template::{Height, Row, Slot, Template};

use super::host::Measure;
use super::width::{slot_element, template_element};

/// Compute every row's and slot's height, and the template's height.
///
/// # Panics
///
/// Panics if the template is not materialized or a slot has no computed
/// width yet.
pub fn compute_heights<M: Measure + ?Sized>(template: &mut Template, measure: &M) {
    let container = template_element(template);
    info!("computing heights for template {}", template.id);

    let content = measure_content(template, measure);
    let Template { rows, slots, .. } = template;

    // Explicit lengths are final; auto and `*` rows fit their single-row slots.
    for (index, row) in rows.iter_mut().enumerate() {
        row.computed_height = match row.height {
            Height::Length(length) => measure.resolve_length(&length, container),
            Height::Auto | Height::Equal => slots
                .iter()
                .filter(|slot| slot.rowspan == 1 && slot.start_row == index && !slot.is_empty_slot())
                .map(|slot| content[&slot.name])
                .fold(0.0, f64::max),
        };
    }
    equalize_star_rows(rows);

    for slot in slots.iter_mut().filter(|slot| slot.rowspan > 1) {
        reconcile_multi_row_slot(slot, content[&slot.name], rows);
    }
    equalize_star_rows(rows);

    assign_single_row_heights(slots.iter_mut(), rows);
    for slot in slots.iter_mut().filter(|slot| slot.rowspan > 1) {
        let spanned = span_height(slot, rows);
        if slot.computed_height < spanned {
            slot.computed_height = spanned;
        }
    }

    template.computed_height = template.rows.iter().map(|row| row.computed_height).sum();
    debug!(
        "template {} row heights {:?}",
        template.id,
        template.rows.iter().map(|row| row.computed_height).collect::<Vec<_>>()
    );
}

/// Content height of every slot at its computed width. The empty slot has
/// no content.
fn measure_content<M: Measure + ?Sized>(template: &Template, measure: &M) -> HashMap<char, f64> {
    template
        .slots
        .iter()
        .map(|slot| {
            if slot.is_empty_slot() {
                return (slot.name, 0.0);
            }
            let Some(width) = slot.computed_width else {
                panic!("slot '{}' needs a computed width before its height", slot.name);
            };
            let element = slot_element(slot.element, slot.name);
            (slot.name, measure.content_height_for_width(element, width))
        })
        .collect()
}

fn assign_single_row_heights<'s>(slots: impl Iterator<Item = &'s mut Slot>, rows: &[Row]) {
    for slot in slots.filter(|slot| slot.rowspan == 1) {
        slot.computed_height = rows[slot.start_row].computed_height;
    }
}

/// Raise every `*` row to the tallest `*` row.
fn equalize_star_rows(rows: &mut [Row]) {
    let tallest = rows
        .iter()
        .filter(|row| row.height == Height::Equal)
        .map(|row| row.computed_height)
        .fold(0.0, f64::max);
    for row in rows.iter_mut().filter(|row| row.height == Height::Equal) {
        row.computed_height = tallest;
    }
}

fn span_height(slot: &Slot, rows: &[Row]) -> f64 {
    rows[slot.start_row..=slot.end_row()]
        .iter()
        .map(|row| row.computed_height)
        .sum()
}

/// Fit a multi-row slot's content into its rows. Excess height goes to the
/// spanned auto and `*` rows in proportion to their current heights, or
/// evenly when those are all zero.
fn reconcile_multi_row_slot(slot: &mut Slot, content_height: f64, rows: &mut [Row]) {
    let spanned = span_height(slot, rows);
    if content_height <= spanned {
        slot.computed_height = spanned;
        return;
    }

    slot.computed_height = content_height;
    let excess = content_height - spanned;
    let span = &mut rows[slot.start_row..=slot.end_row()];
    let expandable: Vec<usize> = (0..span.len())
        .filter(|&i| span[i].height.is_expandable())
        .collect();
    if expandable.is_empty() {
        warn!(
            "slot '{}' overflows its fixed-height rows by {excess}px",
            slot.name
        );
        return;
    }

    let total: f64 = expandable.iter().map(|&i| span[i].computed_height).sum();
    for &i in &expandable {
        let share = if total > 0.0 {
            excess * span[i].computed_height / total
        } else {
            excess / expandable.len() as f64
        };
        span[i].computed_height += share;
    }
    debug!("slot '{}' spread {excess}px over {} rows", slot.name, expandable.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::testing::FixedMeasure;
    use crate::layout::width::compute_widths;
    use crate::template::{create_template, Length, Width};
    use pretty_assertions::assert_eq;

    fn template(rows: &[(&str, Height)]) -> Template {
        let rows = rows.iter().map(|(r, h)| Row::new(r, *h)).collect();
        create_template(rows, Vec::new(), "#t".into(), String::new()).unwrap()
    }

    fn size(template: &mut Template, measure: &FixedMeasure) {
        compute_widths(template, measure, &LayoutConfig::default());
        compute_heights(template, measure);
    }

    fn row_heights(template: &Template) -> Vec<f64> {
        template.rows.iter().map(|r| r.computed_height).collect()
    }

    fn px(value: f64) -> Height {
        Height::Length(Length::px(value))
    }

    #[test]
    fn explicit_rows_ignore_content() {
        let mut t = template(&[("ab", px(30.0)), ("cd", Height::Auto)]);
        let measure = FixedMeasure::new(200.0)
            .with_height('a', 100.0)
            .with_height('c', 12.0)
            .with_height('d', 18.0)
            .materialize(&mut t);
        size(&mut t, &measure);
        assert_eq!(row_heights(&t), vec![30.0, 18.0]);
        assert_eq!(t.slot('a').unwrap().computed_height, 30.0);
        assert_eq!(t.slot('c').unwrap().computed_height, 18.0);
        assert_eq!(t.computed_height, 48.0);
    }

    #[test]
    fn star_rows_are_equalized() {
        let mut t = template(&[("a", Height::Equal), ("b", Height::Auto), ("c", Height::Equal)]);
        let measure = FixedMeasure::new(100.0)
            .with_height('a', 10.0)
            .with_height('b', 5.0)
            .with_height('c', 40.0)
            .materialize(&mut t);
        size(&mut t, &measure);
        assert_eq!(row_heights(&t), vec![40.0, 5.0, 40.0]);
        assert_eq!(t.slot('a').unwrap().computed_height, 40.0);
    }

    #[test]
    fn tall_multi_row_slot_grows_rows_proportionally() {
        let mut t = template(&[("ab", Height::Auto), ("ac", Height::Auto)]);
        let measure = FixedMeasure::new(200.0)
            .with_height('a', 120.0)
            .with_height('b', 20.0)
            .with_height('c', 60.0)
            .materialize(&mut t);
        size(&mut t, &measure);
        // 40px excess split 1:3.
        assert_eq!(row_heights(&t), vec![30.0, 90.0]);
        assert_eq!(t.slot('a').unwrap().computed_height, 120.0);
        assert_eq!(t.slot('b').unwrap().computed_height, 30.0);
        assert_eq!(t.slot('c').unwrap().computed_height, 90.0);
    }

    #[test]
    fn short_multi_row_slot_fills_its_rows() {
        let mut t = template(&[("ab", Height::Auto), ("ac", Height::Auto)]);
        let measure = FixedMeasure::new(200.0)
            .with_height('a', 10.0)
            .with_height('b', 20.0)
            .with_height('c', 30.0)
            .materialize(&mut t);
        size(&mut t, &measure);
        assert_eq!(row_heights(&t), vec![20.0, 30.0]);
        assert_eq!(t.slot('a').unwrap().computed_height, 50.0);
    }

    #[test]
    fn excess_skips_fixed_rows() {
        let mut t = template(&[("ab", px(10.0)), ("ac", Height::Auto)]);
        let measure = FixedMeasure::new(200.0)
            .with_height('a', 100.0)
            .with_height('c', 30.0)
            .materialize(&mut t);
        size(&mut t, &measure);
        assert_eq!(row_heights(&t), vec![10.0, 90.0]);
    }

    #[test]
    fn excess_over_fixed_rows_overflows() {
        let mut t = template(&[("ab", px(10.0)), ("ac", px(10.0))]);
        let measure = FixedMeasure::new(200.0).with_height('a', 100.0).materialize(&mut t);
        size(&mut t, &measure);
        assert_eq!(row_heights(&t), vec![10.0, 10.0]);
        assert_eq!(t.slot('a').unwrap().computed_height, 100.0);
    }

    #[test]
    fn reconciliation_never_shrinks_rows() {
        let mut t = template(&[("ab", Height::Equal), ("ac", Height::Auto), ("ad", px(15.0))]);
        for (row, height) in t.rows.iter_mut().zip([20.0, 10.0, 15.0]) {
            row.computed_height = height;
        }
        let Template { rows, slots, .. } = &mut t;
        let slot = slots.iter_mut().find(|slot| slot.name == 'a').unwrap();

        for content in [100.0, 45.0, 5.0] {
            let before: Vec<f64> = rows.iter().map(|r| r.computed_height).collect();
            reconcile_multi_row_slot(slot, content, rows);
            for (row, earlier) in rows.iter().zip(&before) {
                assert!(row.computed_height >= *earlier);
            }
            assert_eq!(rows[2].computed_height, 15.0);
        }
        let total: f64 = rows.iter().map(|r| r.computed_height).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn excess_over_empty_rows_splits_evenly() {
        let mut t = template(&[("a.", Height::Auto), ("a.", Height::Auto)]);
        let measure = FixedMeasure::new(200.0).with_height('a', 50.0).materialize(&mut t);
        size(&mut t, &measure);
        assert_eq!(row_heights(&t), vec![25.0, 25.0]);
    }

    #[test]
    fn star_rows_reequalized_after_reconciliation() {
        let mut t = template(&[
            ("ab", Height::Equal),
            ("ac", Height::Equal),
            ("dd", Height::Equal),
        ]);
        let measure = FixedMeasure::new(200.0)
            .with_height('a', 100.0)
            .with_height('b', 10.0)
            .with_height('c', 10.0)
            .with_height('d', 10.0)
            .materialize(&mut t);
        size(&mut t, &measure);
        assert_eq!(row_heights(&t), vec![50.0, 50.0, 50.0]);
        assert_eq!(t.slot('d').unwrap().computed_height, 50.0);
    }

    #[test]
    fn multi_row_slot_follows_rows_grown_later() {
        // 'a' is reconciled first; 'b' then grows row 1, which 'a' spans.
        let mut t = template(&[("ac", Height::Auto), ("ab", Height::Auto), (".b", Height::Auto)]);
        let measure = FixedMeasure::new(200.0)
            .with_height('a', 20.0)
            .with_height('b', 100.0)
            .with_height('c', 10.0)
            .materialize(&mut t);
        size(&mut t, &measure);
        let rows = row_heights(&t);
        let a = t.slot('a').unwrap().computed_height;
        assert_eq!(a, rows[0] + rows[1]);
        assert!(t.slot('b').unwrap().computed_height >= rows[1] + rows[2]);
    }

    #[test]
    fn multi_row_slot_at_least_its_rows() {
        let mut t = template(&[("ab", Height::Auto), ("ac", Height::Equal), ("dd", Height::Equal)]);
        let measure = FixedMeasure::new(200.0)
            .with_height('a', 70.0)
            .with_height('b', 10.0)
            .with_height('c', 20.0)
            .with_height('d', 40.0)
            .materialize(&mut t);
        compute_widths(&mut t, &measure, &LayoutConfig::default());
        compute_heights(&mut t, &measure);
        let a = t.slot('a').unwrap();
        assert!(a.computed_height >= t.rows[0].computed_height + t.rows[1].computed_height);
    }

    #[test]
    fn height_pass_is_idempotent() {
        let mut t = template(&[("ab", Height::Equal), ("ac", Height::Auto), ("dd", Height::Equal)]);
        let measure = FixedMeasure::new(300.0)
            .with_height('a', 200.0)
            .with_height('b', 30.0)
            .with_height('c', 10.0)
            .with_height('d', 50.0)
            .materialize(&mut t);
        size(&mut t, &measure);
        let first: Vec<f64> = t.slots.iter().map(|s| s.computed_height).collect();
        let first_rows = row_heights(&t);
        compute_heights(&mut t, &measure);
        let second: Vec<f64> = t.slots.iter().map(|s| s.computed_height).collect();
        assert_eq!(first, second);
        assert_eq!(first_rows, row_heights(&t));
    }

    #[test]
    #[should_panic(expected = "computed width")]
    fn height_requires_width_pass() {
        let mut t = template(&[("a", Height::Auto)]);
        let measure = FixedMeasure::new(100.0).materialize(&mut t);
        compute_heights(&mut t, &measure);
    }

    #[test]
    fn explicit_row_width_columns() {
        let rows = vec![Row::new("ab", Height::Auto)];
        let mut t = create_template(
            rows,
            vec![Width::Length(Length::px(50.0)), Width::Equal],
            "#t".into(),
            String::new(),
        )
        .unwrap();
        let measure = FixedMeasure::new(150.0)
            .with_height('a', 10.0)
            .with_height('b', 12.0)
            .materialize(&mut t);
        size(&mut t, &measure);
        assert_eq!(t.computed_column_widths(), vec![50.0, 100.0]);
        assert_eq!(row_heights(&t), vec![12.0]);
    }
}
