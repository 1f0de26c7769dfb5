use std::f32::consts::{FRAC_PI_2, PI, TAU};

use eframe::egui::{self, Align2, FontId, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::ColorMap;
use crate::data::summary::{Distribution, DistributionEntry};
use crate::state::{PieShape, ValueDisplay};

const CHART_HEIGHT: f32 = 420.0;

/// Radii as fractions of half the drawing area's shorter side.
const OUTER_RADIUS: f32 = 0.70;
const DONUT_INNER_RADIUS: f32 = 0.40;

/// Largest angle a single polygon of a slice may span.
const SEGMENT_STEP: f32 = PI / 90.0;

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

/// One bar per category, in distribution order.
pub fn bar_chart(ui: &mut Ui, distribution: &Distribution, colors: &ColorMap) {
    let labels = distribution.labels();

    let bars: Vec<Bar> = distribution
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            Bar::new(i as f64, entry.count as f64)
                .name(entry.value.to_string())
                .fill(colors.color_for(&entry.value))
                .width(0.7)
        })
        .collect();

    Plot::new("distribution_bar")
        .height(CHART_HEIGHT)
        .y_axis_label("Members")
        .x_axis_formatter(move |mark, _range| tick_label(&labels, mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Members"));
        });
}

/// Category name for integer ticks, nothing between bars.
fn tick_label(labels: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Pie / donut chart
// ---------------------------------------------------------------------------

/// Painted pie or donut with a legend above it.
pub fn circular_chart(
    ui: &mut Ui,
    distribution: &Distribution,
    colors: &ColorMap,
    shape: PieShape,
    display: ValueDisplay,
) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for entry in &distribution.entries {
            ui.label(RichText::new("■").color(colors.color_for(&entry.value)));
            ui.label(entry.value.to_string());
            ui.add_space(8.0);
        }
    });

    let size = Vec2::new(ui.available_width(), CHART_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect;
    let center = rect.center();
    let half = rect.width().min(rect.height()) / 2.0;
    let outer = half * OUTER_RADIUS;
    let inner = match shape {
        PieShape::Pie => 0.0,
        PieShape::Donut => half * DONUT_INNER_RADIUS,
    };
    let text_color = ui.visuals().text_color();

    for (entry, (start, end)) in distribution.entries.iter().zip(slice_angles(distribution)) {
        let fill = colors.color_for(&entry.value);
        for segment in ring_segments(center, inner, outer, start, end) {
            painter.add(Shape::convex_polygon(segment, fill, Stroke::NONE));
        }

        let mid = (start + end) / 2.0;
        let anchor = if mid.cos() >= 0.0 {
            Align2::LEFT_CENTER
        } else {
            Align2::RIGHT_CENTER
        };
        painter.text(
            polar(center, outer + 12.0, mid),
            anchor,
            slice_label(entry, display),
            FontId::proportional(13.0),
            text_color,
        );
    }
}

/// Start/end angle of each slice, clockwise from 12 o'clock.
fn slice_angles(distribution: &Distribution) -> Vec<(f32, f32)> {
    if distribution.total == 0 {
        return Vec::new();
    }
    let total = distribution.total as f32;
    let mut start = -FRAC_PI_2;
    distribution
        .entries
        .iter()
        .map(|entry| {
            let end = start + entry.count as f32 / total * TAU;
            let span = (start, end);
            start = end;
            span
        })
        .collect()
}

/// Convex pieces covering the ring sector between `start` and `end`.
fn ring_segments(center: Pos2, inner: f32, outer: f32, start: f32, end: f32) -> Vec<Vec<Pos2>> {
    let steps = ((end - start) / SEGMENT_STEP).ceil().max(1.0) as usize;
    let step = (end - start) / steps as f32;
    (0..steps)
        .map(|i| {
            let a = start + step * i as f32;
            let b = a + step;
            if inner <= 0.0 {
                vec![center, polar(center, outer, a), polar(center, outer, b)]
            } else {
                vec![
                    polar(center, inner, a),
                    polar(center, outer, a),
                    polar(center, outer, b),
                    polar(center, inner, b),
                ]
            }
        })
        .collect()
}

fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + egui::vec2(angle.cos(), angle.sin()) * radius
}

fn slice_label(entry: &DistributionEntry, display: ValueDisplay) -> String {
    match display {
        ValueDisplay::Count => format!("{}: {}", entry.value, entry.count),
        ValueDisplay::Percentage => format!("{}: {}%", entry.value, entry.percentage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Dimension, MemberRecord};
    use crate::data::summary::summarize;

    fn statuses(values: &[&str]) -> Distribution {
        let rows: Vec<MemberRecord> = values
            .iter()
            .map(|s| MemberRecord {
                status: Some(s.to_string()),
                ..Default::default()
            })
            .collect();
        summarize(&rows, Dimension::Status)
    }

    #[test]
    fn ticks_only_label_bar_positions() {
        let labels = vec!["Student".to_string(), "Professor".to_string()];
        assert_eq!(tick_label(&labels, 0.0), "Student");
        assert_eq!(tick_label(&labels, 1.0), "Professor");
        assert_eq!(tick_label(&labels, 0.5), "");
        assert_eq!(tick_label(&labels, 2.0), "");
        assert_eq!(tick_label(&labels, -1.0), "");
    }

    #[test]
    fn slices_cover_the_full_circle() {
        let dist = statuses(&["Student", "Student", "Student", "Professor"]);
        let angles = slice_angles(&dist);
        assert_eq!(angles.len(), 2);
        assert!((angles[0].0 + FRAC_PI_2).abs() < 1e-6);
        assert!((angles[0].1 - angles[0].0 - 0.75 * TAU).abs() < 1e-5);
        assert!((angles[1].1 - (-FRAC_PI_2 + TAU)).abs() < 1e-5);
        assert!(slice_angles(&statuses(&[])).is_empty());
    }

    #[test]
    fn segments_are_small_and_shaped_by_ring() {
        let center = Pos2::new(0.0, 0.0);
        let pie = ring_segments(center, 0.0, 10.0, 0.0, FRAC_PI_2);
        assert!((45..=46).contains(&pie.len()));
        assert!(pie.iter().all(|p| p.len() == 3));

        let donut = ring_segments(center, 5.0, 10.0, 0.0, 0.01);
        assert_eq!(donut.len(), 1);
        assert_eq!(donut[0].len(), 4);
    }

    #[test]
    fn labels_follow_value_display() {
        let dist = statuses(&["Student", "Student", "Researcher"]);
        assert_eq!(slice_label(&dist.entries[0], ValueDisplay::Count), "Student: 2");
        assert_eq!(slice_label(&dist.entries[1], ValueDisplay::Percentage), "Researcher: 33.3%");
    }
}
