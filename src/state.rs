use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::{self, UserProfile};
use crate::config::{DashboardConfig, UserEntry};
use crate::data::filter::{
    country_options, dimension_options, filtered_indices, region_options, FilterSelection,
};
use crate::data::growth::{growth, GrowthResult, MemberPredicate};
use crate::data::model::{Dimension, FieldValue, MemberTable};
use crate::data::summary::{summarize, Distribution};

// ---------------------------------------------------------------------------
// View choices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Statistics,
    Metrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartType {
    #[default]
    Bar,
    Circular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PieShape {
    #[default]
    Pie,
    Donut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueDisplay {
    #[default]
    Count,
    Percentage,
}

/// Options of the statistics tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsView {
    pub dimension: Dimension,
    pub chart_type: ChartType,
    pub pie_shape: PieShape,
    pub value_display: ValueDisplay,
}

impl Default for StatisticsView {
    fn default() -> Self {
        Self {
            dimension: Dimension::Continent,
            chart_type: ChartType::default(),
            pie_shape: PieShape::default(),
            value_display: ValueDisplay::default(),
        }
    }
}

/// Options of the metrics tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsView {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub predicate: MemberPredicate,
}

// ---------------------------------------------------------------------------
// Session – everything one logged-in user has chosen
// ---------------------------------------------------------------------------

/// Per-session context. The member table is passed in explicitly and never
/// stored here, so sessions cannot see each other's selections.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: UserProfile,
    pub selection: FilterSelection,
    /// Indices of members passing the current filters (cached).
    pub visible_indices: Vec<usize>,
    pub tab: Tab,
    pub statistics: StatisticsView,
    pub metrics: MetricsView,
}

impl Session {
    pub fn new(user: UserProfile, table: Option<&MemberTable>) -> Self {
        let mut session = Self {
            user,
            selection: FilterSelection::new(),
            visible_indices: Vec::new(),
            tab: Tab::default(),
            statistics: StatisticsView::default(),
            metrics: MetricsView::default(),
        };
        if let Some(table) = table {
            session.reset_for(table);
        }
        session
    }

    /// Forget the selection and pick default years for a freshly loaded table.
    pub fn reset_for(&mut self, table: &MemberTable) {
        self.selection = FilterSelection::new();
        let years = admission_years(table);
        self.metrics.start_year = years.first().copied();
        self.metrics.end_year = years.last().copied();
        self.refilter(table);
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self, table: &MemberTable) {
        self.visible_indices = filtered_indices(table, &self.selection);
        log::debug!(
            "{} of {} members visible",
            self.visible_indices.len(),
            table.len()
        );
    }

    /// Toggle a single value in a dimension's filter.
    pub fn toggle_filter_value(&mut self, table: &MemberTable, dimension: Dimension, value: &FieldValue) {
        self.selection.toggle(dimension, value);
        self.prune_cascade(table, dimension);
        self.refilter(table);
    }

    /// Deselect every value of a dimension.
    pub fn clear_filter(&mut self, table: &MemberTable, dimension: Dimension) {
        self.selection.clear(dimension);
        self.prune_cascade(table, dimension);
        self.refilter(table);
    }

    /// Options offered for a dimension given the broader selections made so far.
    pub fn options(&self, table: &MemberTable, dimension: Dimension) -> Vec<FieldValue> {
        match dimension {
            Dimension::Region => region_options(table, self.selected(Dimension::Continent)),
            Dimension::Country => country_options(
                table,
                self.selected(Dimension::Region),
                self.selected(Dimension::Continent),
            ),
            other => dimension_options(table, other),
        }
    }

    /// Distribution of the chosen statistics dimension over the visible members.
    pub fn distribution(&self, table: &MemberTable) -> Distribution {
        summarize(table.rows_at(&self.visible_indices), self.statistics.dimension)
    }

    /// Growth for the chosen metric; `None` until both years are picked.
    /// Computed on the full table, not on the filtered subset.
    pub fn growth(&self, table: &MemberTable) -> Option<GrowthResult> {
        let start = self.metrics.start_year?;
        let end = self.metrics.end_year?;
        Some(growth(table, start, end, Some(self.metrics.predicate)))
    }

    fn selected(&self, dimension: Dimension) -> &BTreeSet<FieldValue> {
        static EMPTY: BTreeSet<FieldValue> = BTreeSet::new();
        self.selection.values(dimension).unwrap_or(&EMPTY)
    }

    /// Drop narrower selections that the new broader selection no longer offers.
    fn prune_cascade(&mut self, table: &MemberTable, changed: Dimension) {
        if changed == Dimension::Continent {
            let regions = self.options(table, Dimension::Region);
            self.selection.retain_within(Dimension::Region, &regions);
        }
        if matches!(changed, Dimension::Continent | Dimension::Region) {
            let countries = self.options(table, Dimension::Country);
            self.selection.retain_within(Dimension::Country, &countries);
        }
    }
}

/// Sorted distinct admission years, the choices of the metrics year pickers.
pub fn admission_years(table: &MemberTable) -> Vec<i32> {
    dimension_options(table, Dimension::AdmissionYear)
        .into_iter()
        .filter_map(|v| match v {
            FieldValue::Year(y) => Some(y),
            FieldValue::Text(_) => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Login form contents.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub error: Option<String>,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded member table, shared read-only.
    pub dataset: Option<Arc<MemberTable>>,

    /// Where `dataset` came from.
    pub dataset_path: Option<PathBuf>,

    /// Accounts allowed to log in.
    pub users: Vec<UserEntry>,

    /// `None` until someone logs in.
    pub session: Option<Session>,

    pub login: LoginForm,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            dataset: None,
            dataset_path: None,
            users: config.users.clone(),
            session: None,
            login: LoginForm::default(),
            status_message: None,
        }
    }

    /// Ingest a newly loaded table and reset the current session's filters.
    pub fn set_dataset(&mut self, table: MemberTable, path: Option<PathBuf>) {
        let table = Arc::new(table);
        if let Some(session) = &mut self.session {
            session.reset_for(&table);
        }
        self.dataset = Some(table);
        self.dataset_path = path;
        self.status_message = None;
    }

    /// Check the login form; on success start a fresh session.
    pub fn try_login(&mut self) -> bool {
        match auth::authenticate(&self.users, &self.login.username, &self.login.password) {
            Some(user) => {
                self.session = Some(Session::new(user, self.dataset.as_deref()));
                self.login = LoginForm::default();
                true
            }
            None => {
                self.login.error = Some("Invalid username or password.".to_string());
                self.login.password.clear();
                false
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            log::info!("{} logged out", session.user.username);
        }
        self.login = LoginForm::default();
    }
}
