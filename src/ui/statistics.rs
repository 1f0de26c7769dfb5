use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::ColorMap;
use crate::data::loader::ADMISSION_DATE_FORMAT;
use crate::data::model::{Dimension, MemberRecord, MemberTable};
use crate::state::{ChartType, PieShape, Session, ValueDisplay};
use crate::ui::plot;

/// Dimensions offered on the statistics tab, in display order.
const CHART_DIMENSIONS: [Dimension; 8] = [
    Dimension::Continent,
    Dimension::Region,
    Dimension::Country,
    Dimension::AcademicDegree,
    Dimension::Gender,
    Dimension::Status,
    Dimension::MembershipStatus,
    Dimension::AdmissionYear,
];

const TABLE_COLUMNS: [&str; 9] = [
    "Continent",
    "Region",
    "Country",
    "Admission Date",
    "Admission Year",
    "Academic Degree",
    "Gender",
    "Status",
    "Membership Status",
];

// ---------------------------------------------------------------------------
// Statistics tab
// ---------------------------------------------------------------------------

pub fn statistics_tab(ui: &mut Ui, table: &MemberTable, session: &mut Session) {
    ui.heading("Statistics");

    ui.label("Select Member Attribute to Visualize:");
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for dimension in CHART_DIMENSIONS {
            ui.radio_value(&mut session.statistics.dimension, dimension, dimension.column_name());
        }
    });
    ui.separator();

    let view = &mut session.statistics;
    ui.columns(3, |cols: &mut [Ui]| {
        cols[0].label("Chart Type:");
        cols[0].radio_value(&mut view.chart_type, ChartType::Bar, "Bar");
        cols[0].radio_value(&mut view.chart_type, ChartType::Circular, "Circular");

        let circular = view.chart_type == ChartType::Circular;
        cols[1].add_enabled_ui(circular, |ui: &mut Ui| {
            ui.label("Shape:");
            ui.radio_value(&mut view.pie_shape, PieShape::Pie, "Pie");
            ui.radio_value(&mut view.pie_shape, PieShape::Donut, "Donut");
        });
        cols[2].add_enabled_ui(circular, |ui: &mut Ui| {
            ui.label("Show Values As:");
            ui.radio_value(&mut view.value_display, ValueDisplay::Count, "Count");
            ui.radio_value(&mut view.value_display, ValueDisplay::Percentage, "Percentage");
        });
    });
    ui.separator();

    let view = session.statistics;
    let distribution = session.distribution(table);
    if distribution.is_empty() {
        ui.label(format!("No {} values among the filtered members.", view.dimension));
    } else {
        let colors = ColorMap::for_distribution(&distribution);
        match view.chart_type {
            ChartType::Bar => plot::bar_chart(ui, &distribution, &colors),
            ChartType::Circular => {
                plot::circular_chart(ui, &distribution, &colors, view.pie_shape, view.value_display)
            }
        }
    }

    ui.add_space(8.0);
    egui::CollapsingHeader::new("⚠️ Filtered Data Table For Verification Purposes")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            member_table(ui, table, &session.visible_indices);
        });
}

/// Rows of the filtered subset, virtualised by the table builder.
fn member_table(ui: &mut Ui, table: &MemberTable, indices: &[usize]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .columns(Column::auto().at_least(80.0), TABLE_COLUMNS.len())
        .header(20.0, |mut header| {
            for name in TABLE_COLUMNS {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, indices.len(), |mut row| {
                let Some(record) = table.records().get(indices[row.index()]) else {
                    return;
                };
                for cell in record_cells(record) {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}

/// Display strings in [`TABLE_COLUMNS`] order; missing cells are blank.
fn record_cells(record: &MemberRecord) -> [String; 9] {
    let text = |d: Dimension| record.text(d).unwrap_or_default().to_string();
    [
        text(Dimension::Continent),
        text(Dimension::Region),
        text(Dimension::Country),
        record
            .admission_date
            .map(|d| d.format(ADMISSION_DATE_FORMAT).to_string())
            .unwrap_or_default(),
        record
            .admission_year
            .map(|y| y.to_string())
            .unwrap_or_default(),
        text(Dimension::AcademicDegree),
        text(Dimension::Gender),
        text(Dimension::Status),
        text(Dimension::MembershipStatus),
    ]
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn cells_follow_column_order() {
        let record = MemberRecord {
            continent: Some("Europe".into()),
            country: Some("Portugal".into()),
            status: Some("Student".into()),
            ..Default::default()
        }
        .with_admission_date(NaiveDate::from_ymd_opt(2020, 2, 1));
        let cells = record_cells(&record);
        assert_eq!(cells.len(), TABLE_COLUMNS.len());
        assert_eq!(cells[0], "Europe");
        assert_eq!(cells[1], "");
        assert_eq!(cells[3], "01/02/2020");
        assert_eq!(cells[4], "2020");
        assert_eq!(cells[7], "Student");
    }

    #[test]
    fn every_dimension_can_be_charted() {
        for dimension in Dimension::ALL {
            assert!(CHART_DIMENSIONS.contains(&dimension));
        }
    }
}
