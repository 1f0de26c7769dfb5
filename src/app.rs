use eframe::egui::{self, ScrollArea, Ui};

use crate::state::{AppState, Tab};
use crate::ui::{metrics, panels, statistics};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Not logged in: only the login form ----
        if self.state.session.is_none() {
            egui::CentralPanel::default().show(ctx, |ui| {
                panels::login_screen(ui, &mut self.state);
            });
            return;
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: statistics / metrics tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central_panel(ui, &mut self.state);
        });
    }
}

fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(table) = state.dataset.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a member file to begin  (File → Open…)");
        });
        return;
    };
    let Some(session) = state.session.as_mut() else {
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut session.tab, Tab::Statistics, "📊 Statistics");
        ui.selectable_value(&mut session.tab, Tab::Metrics, "📈 Metrics");
    });
    ui.separator();

    let tab = session.tab;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match tab {
            Tab::Statistics => statistics::statistics_tab(ui, &table, session),
            Tab::Metrics => metrics::metrics_tab(ui, &table, session),
        });
}
