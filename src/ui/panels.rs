use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::{Dimension, MemberTable};
use crate::state::{AppState, Session};

// ---------------------------------------------------------------------------
// Login screen
// ---------------------------------------------------------------------------

/// Render the login form shown until someone logs in.
pub fn login_screen(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(80.0);
        ui.heading("Login to CSH Dashboard");
        ui.add_space(12.0);
        ui.set_max_width(320.0);

        ui.label("Username");
        ui.text_edit_singleline(&mut state.login.username);
        ui.label("Password");
        let password = ui.add(egui::TextEdit::singleline(&mut state.login.password).password(true));
        let submitted = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        ui.add_space(8.0);
        if ui.button("Login").clicked() || submitted {
            state.try_login();
        }
        if let Some(err) = &state.login.error {
            ui.label(RichText::new(err).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Sidebar layout: (dimension, label) per section.
const DEMOGRAPHICS: [(Dimension, &str); 3] = [
    (Dimension::Continent, "1.1 Continent(s)"),
    (Dimension::Region, "1.2 Region(s)"),
    (Dimension::Country, "1.3 Country(ies)"),
];

const ATTRIBUTES: [(Dimension, &str); 5] = [
    (Dimension::AdmissionYear, "Admission Date"),
    (Dimension::AcademicDegree, "Academic Level"),
    (Dimension::Gender, "Gender"),
    (Dimension::Status, "Status"),
    (Dimension::MembershipStatus, "Membership"),
];

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    let mut logout = false;
    if let Some(session) = &state.session {
        ui.label(RichText::new(format!("Logged in as {}", session.user.name)).color(Color32::DARK_GREEN));
        logout = ui.button("Logout").clicked();
    }
    if logout {
        state.logout();
        return;
    }
    ui.separator();

    ui.heading("🔍 Filters");
    ui.separator();

    let Some(table) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };
    let Some(session) = state.session.as_mut() else {
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("1. Demographics");
            for (dimension, title) in DEMOGRAPHICS {
                filter_group(ui, &table, session, dimension, title);
            }
            ui.separator();

            ui.strong("2. Filters");
            for (dimension, title) in ATTRIBUTES {
                filter_group(ui, &table, session, dimension, title);
            }
        });
}

/// One collapsible multiselect. Changes go through the session so the
/// cascade and the visible rows stay in sync.
fn filter_group(
    ui: &mut Ui,
    table: &MemberTable,
    session: &mut Session,
    dimension: Dimension,
    title: &str,
) {
    let options = session.options(table, dimension);
    let n_selected = session.selection.values(dimension).map_or(0, |s| s.len());
    let header_text = format!("{title}  ({n_selected}/{})", options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(dimension.column_name())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if options.is_empty() {
                ui.weak("No values");
                return;
            }
            if ui.small_button("Clear").clicked() {
                session.clear_filter(table, dimension);
            }
            for value in &options {
                let mut checked = session.selection.contains(dimension, value);
                if ui.checkbox(&mut checked, value.to_string()).changed() {
                    session.toggle_filter_value(table, dimension, value);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let visible = state
                .session
                .as_ref()
                .map_or(ds.len(), |s| s.visible_indices.len());
            ui.label(format!("{} members loaded, {visible} visible", ds.len()));
        }
        if let Some(path) = &state.dataset_path {
            ui.weak(path.display().to_string());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open member data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(table) => state.set_dataset(table, Some(path)),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
