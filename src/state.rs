use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::Selection;
use crate::data::model::IndicatorRecord;
use crate::data::query::{QueryEngine, QueryError, QueryResult};
use crate::data::series::Tab;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Query engine over the loaded table (None until a table is loaded).
    pub engine: Option<QueryEngine>,

    /// Country shown in the headline metrics.
    pub selected_country: Option<String>,

    /// Countries and years compared in the charts.
    pub selection: Selection,

    pub active_tab: Tab,

    /// Per-country line colours.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            engine: None,
            selected_country: None,
            selection: Selection::default(),
            active_tab: Tab::default(),
            color_map: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded table and reset selections to their defaults.
    pub fn set_engine(&mut self, engine: QueryEngine) {
        let country = self.default_country(&engine);

        let mut comparison: Vec<&str> = country.iter().map(String::as_str).collect();
        comparison.extend(
            self.config
                .comparison_countries
                .iter()
                .map(String::as_str)
                .filter(|c| engine.contains_country(c)),
        );
        let years = self
            .config
            .default_years
            .iter()
            .filter(|y| engine.years().iter().any(|have| have.label() == y.as_str()));
        self.selection = Selection::new(comparison, years.cloned());

        self.color_map = Some(ColorMap::new(engine.countries()));
        self.selected_country = country;
        self.engine = Some(engine);
        self.status_message = None;
    }

    /// Configured default country if present, else the first in the table.
    fn default_country(&self, engine: &QueryEngine) -> Option<String> {
        if engine.contains_country(&self.config.default_country) {
            Some(self.config.default_country.clone())
        } else {
            engine.countries().first().cloned()
        }
    }

    /// Change the headline country; it also joins the comparison.
    pub fn select_country(&mut self, country: String) {
        self.selection.countries.insert(country.clone());
        self.selected_country = Some(country);
    }

    /// Check the headline country against the table.
    ///
    /// A `NotFound` falls back to the default country so the session keeps
    /// working; the error is recorded in the status message and returned.
    pub fn refresh_headline(&mut self) -> Option<QueryError> {
        let engine = self.engine.as_ref()?;
        let country = self.selected_country.as_deref()?;

        let err = engine.latest_record(country).err()?;
        log::warn!("{err}; falling back to the default country");
        self.selected_country = self.default_country(engine);
        self.status_message = Some(err.to_string());
        Some(err)
    }

    /// Latest record for the selected country.
    pub fn headline(&self) -> Option<QueryResult<&IndicatorRecord>> {
        let engine = self.engine.as_ref()?;
        let country = self.selected_country.as_deref()?;
        Some(engine.latest_record(country))
    }

    /// Records currently selected for comparison, in table order.
    pub fn comparison(&self) -> Vec<&IndicatorRecord> {
        self.engine
            .as_ref()
            .map(|engine| engine.select(&self.selection))
            .unwrap_or_default()
    }

    pub fn select_all_countries(&mut self) {
        if let Some(engine) = &self.engine {
            self.selection.countries = engine.countries().iter().cloned().collect();
        }
    }

    pub fn select_all_years(&mut self) {
        if let Some(engine) = &self.engine {
            self.selection.years = engine.years().iter().map(|y| y.label().to_string()).collect();
        }
    }

    pub fn clear_countries(&mut self) {
        self.selection.countries.clear();
    }

    pub fn clear_years(&mut self) {
        self.selection.years.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{self, record};
    use crate::data::model::IndicatorTable;

    fn state() -> AppState {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_engine(QueryEngine::new(fixtures::south_america()));
        state
    }

    #[test]
    fn defaults_follow_config_and_table() {
        let state = state();
        assert_eq!(state.selected_country.as_deref(), Some("Brazil"));
        // "United States" is configured but absent from the table.
        assert_eq!(state.selection, Selection::new(["Brazil"], ["2019", "2020", "2021"]));
        assert_eq!(state.active_tab, Tab::Economic);
    }

    #[test]
    fn falls_back_to_first_country_without_default() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_engine(QueryEngine::new(IndicatorTable::from_records(vec![
            record("Peru", 2020),
            record("Chile", 2020),
        ])));
        assert_eq!(state.selected_country.as_deref(), Some("Peru"));
    }

    #[test]
    fn selecting_a_country_adds_it_to_the_comparison() {
        let mut state = state();
        state.select_country("Chile".to_string());
        assert!(state.selection.countries.contains("Chile"));
        assert!(state.selection.countries.contains("Brazil"));
        assert!(state.refresh_headline().is_none());
        let latest = state.headline().expect("loaded").expect("chile");
        assert_eq!(latest.year().label(), "2021");
    }

    #[test]
    fn unknown_headline_country_recovers() {
        let mut state = state();
        state.selected_country = Some("Atlantis".to_string());

        assert!(matches!(state.headline(), Some(Err(QueryError::NotFound { .. }))));

        let err = state.refresh_headline().expect("unknown country");
        assert!(matches!(err, QueryError::NotFound { .. }));
        assert_eq!(state.selected_country.as_deref(), Some("Brazil"));
        assert!(state.status_message.is_some());

        assert!(state.refresh_headline().is_none());
        let latest = state.headline().expect("loaded").expect("recovered");
        assert_eq!(latest.country(), "Brazil");
        assert_eq!(latest.year().label(), "2021");
    }

    #[test]
    fn clearing_a_dimension_empties_the_comparison() {
        let mut state = state();
        assert_eq!(state.comparison().len(), 2);
        state.clear_years();
        assert!(state.comparison().is_empty());
        state.select_all_years();
        state.select_all_countries();
        assert_eq!(state.comparison().len(), 6);
        state.clear_countries();
        assert!(state.comparison().is_empty());
    }
}
