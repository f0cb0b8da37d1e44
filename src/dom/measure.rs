//! Measurement services of the reference document.
//!
//! Each query lays out a fresh taffy tree mirroring the element's subtree:
//! every element is a column flex container, every run of text a leaf
//! measured with the document's [`TextMetrics`].

use log::warn;
use taffy::prelude::*;

use crate::config::TextMetrics;
use crate::layout::host::Measure;
use crate::template::{Length, LengthUnit};

use super::node::ElementId;
use super::tree::Dom;

/// Text leaf of a measurement tree.
struct TextRun {
    words: Vec<usize>,
}

impl TextRun {
    fn new(text: &str) -> Self {
        Self {
            words: text.split_whitespace().map(|w| w.chars().count()).collect(),
        }
    }

    /// Width of the run on one line, in characters.
    fn max_content(&self) -> usize {
        self.words.iter().sum::<usize>() + self.words.len().saturating_sub(1)
    }

    /// Width of the longest word, in characters.
    fn min_content(&self) -> usize {
        self.words.iter().copied().max().unwrap_or(0)
    }

    /// Lines needed when wrapping greedily at `limit` characters. A word
    /// longer than a line gets a line of its own.
    fn lines(&self, limit: usize) -> usize {
        let mut lines = 0;
        let mut current = 0;
        for &word in &self.words {
            if current == 0 {
                current = word;
                lines += 1;
            } else if current + 1 + word <= limit {
                current += 1 + word;
            } else {
                current = word;
                lines += 1;
            }
        }
        lines
    }

    fn measure(
        &self,
        known: taffy::geometry::Size<Option<f32>>,
        available: taffy::geometry::Size<AvailableSpace>,
        metrics: &TextMetrics,
    ) -> taffy::geometry::Size<f32> {
        let char_width = metrics.char_width.max(f32::EPSILON);
        let natural = self.max_content() as f32 * char_width;
        let width = known.width.unwrap_or(match available.width {
            AvailableSpace::MinContent => self.min_content() as f32 * char_width,
            AvailableSpace::MaxContent => natural,
            AvailableSpace::Definite(limit) => natural.min(limit),
        });
        let limit = (width / char_width).floor() as usize;
        let height = self.lines(limit) as f32 * metrics.line_height;
        taffy::geometry::Size {
            width,
            height: known.height.unwrap_or(height),
        }
    }
}

impl Dom {
    fn build_measure_tree(
        &self,
        tree: &mut TaffyTree<TextRun>,
        element: ElementId,
        forced_width: Option<f32>,
    ) -> taffy::TaffyResult<NodeId> {
        let mut style = Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            ..Default::default()
        };
        let data = self.get(element);
        if let Some(width) = forced_width.or(data.and_then(|d| d.width)) {
            style.size.width = Dimension::from_length(width);
        }

        let mut children = Vec::new();
        if let Some(text) = data.map(|d| d.text.as_str()).filter(|t| !t.trim().is_empty()) {
            children.push(tree.new_leaf_with_context(Style::default(), TextRun::new(text))?);
        }
        for &child in self.children(element) {
            children.push(self.build_measure_tree(tree, child, None)?);
        }
        tree.new_with_children(style, &children)
    }

    /// Lay out `element`'s subtree in `available` width and return its size.
    fn measure_subtree(
        &self,
        element: ElementId,
        available: AvailableSpace,
        forced_width: Option<f32>,
    ) -> taffy::geometry::Size<f32> {
        let metrics = self.metrics;
        let mut tree: TaffyTree<TextRun> = TaffyTree::new();
        let result = self
            .build_measure_tree(&mut tree, element, forced_width)
            .and_then(|root| {
                tree.compute_layout_with_measure(
                    root,
                    taffy::geometry::Size {
                        width: available,
                        height: AvailableSpace::MaxContent,
                    },
                    |known, available, _node, run, _style| match run {
                        Some(run) => run.measure(known, available, &metrics),
                        None => taffy::geometry::Size::ZERO,
                    },
                )?;
                Ok(tree.layout(root)?.size)
            });
        match result {
            Ok(size) => size,
            Err(err) => {
                warn!("measuring element failed: {err}");
                taffy::geometry::Size::ZERO
            }
        }
    }

    /// Width of the nearest element at or above `element` with an explicit
    /// or a computed slot width, or the viewport width.
    fn containing_width(&self, element: ElementId) -> f32 {
        std::iter::once(element)
            .chain(self.ancestors(element))
            .find_map(|id| {
                self.get(id)
                    .and_then(|d| d.width)
                    .or_else(|| self.slot_widths.get(id).copied())
            })
            .unwrap_or(self.viewport.width)
    }
}

impl Measure for Dom {
    fn available_width(&self, element: ElementId) -> f64 {
        f64::from(self.containing_width(element))
    }

    fn resolve_length(&self, length: &Length, reference: ElementId) -> f64 {
        let font_size = f64::from(self.metrics.font_size);
        let factor = match length.unit {
            LengthUnit::Px => 1.0,
            LengthUnit::Em => font_size,
            LengthUnit::Ex => font_size / 2.0,
            LengthUnit::In => 96.0,
            LengthUnit::Cm => 96.0 / 2.54,
            LengthUnit::Mm => 96.0 / 25.4,
            LengthUnit::Pt => 96.0 / 72.0,
            LengthUnit::Pc => 16.0,
            LengthUnit::Percent => self.available_width(reference) / 100.0,
            LengthUnit::Vw => f64::from(self.viewport.width) / 100.0,
            LengthUnit::Vh => f64::from(self.viewport.height) / 100.0,
        };
        length.value * factor
    }

    fn intrinsic_preferred_width(&self, element: ElementId) -> f64 {
        f64::from(self.measure_subtree(element, AvailableSpace::MaxContent, None).width)
    }

    fn intrinsic_minimum_width(&self, element: ElementId) -> f64 {
        f64::from(self.measure_subtree(element, AvailableSpace::MinContent, None).width)
    }

    fn content_height_for_width(&self, element: ElementId, width: f64) -> f64 {
        let width = width as f32;
        f64::from(
            self.measure_subtree(element, AvailableSpace::Definite(width), Some(width))
                .height,
        )
    }
}
