use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::growth::{GrowthResult, MemberPredicate};
use crate::data::model::MemberTable;
use crate::state::{admission_years, Session};

// ---------------------------------------------------------------------------
// Metrics tab
// ---------------------------------------------------------------------------

pub fn metrics_tab(ui: &mut Ui, table: &MemberTable, session: &mut Session) {
    ui.heading("Metrics");

    let years = admission_years(table);
    if years.is_empty() {
        ui.label("The dataset has no admission dates to compare.");
        return;
    }

    let metrics = &mut session.metrics;
    ui.columns(2, |cols: &mut [Ui]| {
        year_picker(&mut cols[0], "start_year", "Start Year:", &years, &mut metrics.start_year);
        year_picker(&mut cols[1], "end_year", "End Year:", &years, &mut metrics.end_year);
    });

    ui.label("Metric Field:");
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for predicate in MemberPredicate::ALL {
            ui.radio_value(&mut metrics.predicate, predicate, predicate.label());
        }
    });
    ui.separator();

    let (Some(start), Some(end)) = (metrics.start_year, metrics.end_year) else {
        ui.label("Pick a start and an end year.");
        return;
    };
    let predicate = metrics.predicate;
    let Some(result) = session.growth(table) else {
        return;
    };
    metric_widget(ui, &metric_title(predicate, start, end), &result);
    if result.baseline_empty() {
        ui.weak(format!(
            "No {} in {start}; the percentage shown is a fixed placeholder, not a ratio.",
            predicate.label().to_lowercase()
        ));
    }
}

fn year_picker(ui: &mut Ui, id: &str, label: &str, years: &[i32], selected: &mut Option<i32>) {
    ui.label(label);
    let text = selected.map(|y| y.to_string()).unwrap_or_default();
    egui::ComboBox::from_id_salt(id)
        .selected_text(text)
        .show_ui(ui, |ui: &mut Ui| {
            for &year in years {
                ui.selectable_value(&mut *selected, Some(year), year.to_string());
            }
        });
}

/// Label, big value and coloured delta, like a dashboard metric card.
fn metric_widget(ui: &mut Ui, title: &str, result: &GrowthResult) {
    ui.label(title);
    ui.label(RichText::new(format!("{} members", result.count_end)).size(32.0).strong());
    let color = match result.difference {
        d if d > 0 => Color32::from_rgb(0x21, 0xc3, 0x54),
        d if d < 0 => Color32::from_rgb(0xff, 0x4b, 0x4b),
        _ => ui.visuals().weak_text_color(),
    };
    let arrow = if result.difference >= 0 { "⬆" } else { "⬇" };
    ui.label(RichText::new(format!("{arrow} {}", result.delta_label())).color(color));
}

fn metric_title(predicate: MemberPredicate, start: i32, end: i32) -> String {
    format!("{} Growth {start} to {end}", predicate.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_names_metric_and_years() {
        assert_eq!(
            metric_title(MemberPredicate::Doctoral, 2020, 2023),
            "Doctoral (PhDs) Growth 2020 to 2023"
        );
        assert_eq!(
            metric_title(MemberPredicate::AllMembers, 2019, 2019),
            "All Members Growth 2019 to 2019"
        );
    }
}
