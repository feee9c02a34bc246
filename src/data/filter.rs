use std::collections::BTreeSet;

use super::model::{IndicatorRecord, IndicatorTable};

// ---------------------------------------------------------------------------
// Selection: which countries and years are being compared
// ---------------------------------------------------------------------------

/// Comparison selection: sets of country names and year labels.
///
/// Unlike a "no filter" convention, an empty set selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub countries: BTreeSet<String>,
    pub years: BTreeSet<String>,
}

impl Selection {
    pub fn new<C, Y>(countries: C, years: Y) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        Y: IntoIterator,
        Y::Item: Into<String>,
    {
        Selection {
            countries: countries.into_iter().map(Into::into).collect(),
            years: years.into_iter().map(Into::into).collect(),
        }
    }

    /// Flip membership of a single country.
    pub fn toggle_country(&mut self, country: &str) {
        if !self.countries.remove(country) {
            self.countries.insert(country.to_string());
        }
    }

    /// Flip membership of a single year label.
    pub fn toggle_year(&mut self, year: &str) {
        if !self.years.remove(year) {
            self.years.insert(year.to_string());
        }
    }
}

/// Records whose country is in `countries` AND whose year label is in
/// `years`, in table order. Either set being empty yields no rows.
pub fn filter_records<'a>(
    table: &'a IndicatorTable,
    countries: &BTreeSet<String>,
    years: &BTreeSet<String>,
) -> Vec<&'a IndicatorRecord> {
    if countries.is_empty() || years.is_empty() {
        return Vec::new();
    }
    table
        .records()
        .iter()
        .filter(|rec| countries.contains(rec.country()) && years.contains(rec.year().label()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    #[test]
    fn empty_sets_select_nothing() {
        let table = fixtures::south_america();
        let all_years: BTreeSet<String> = ["2020", "2021"].map(String::from).into();
        let all_countries: BTreeSet<String> = ["Brazil", "Argentina"].map(String::from).into();

        assert!(filter_records(&table, &BTreeSet::new(), &all_years).is_empty());
        assert!(filter_records(&table, &all_countries, &BTreeSet::new()).is_empty());
        let none = Selection::default();
        assert!(filter_records(&table, &none.countries, &none.years).is_empty());
    }

    #[test]
    fn filter_is_membership_and_preserves_order() {
        let table = fixtures::south_america();
        let selection = Selection::new(["Brazil", "Argentina"], ["2020", "2021"]);

        let rows = filter_records(&table, &selection.countries, &selection.years);
        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.country(), r.year().label()))
            .collect();
        assert_eq!(
            keys,
            [("Brazil", "2021"), ("Argentina", "2021"), ("Brazil", "2020")]
        );
        let records = table.records();
        assert!(rows
            .iter()
            .zip(&records[..3])
            .all(|(row, rec)| std::ptr::eq(*row, rec)));
    }

    #[test]
    fn years_are_a_set_not_a_range() {
        let table = fixtures::south_america();
        let selection = Selection::new(["Brazil", "Chile"], ["2019", "2021"]);

        let rows = filter_records(&table, &selection.countries, &selection.years);
        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.country(), r.year().label()))
            .collect();
        assert_eq!(keys, [("Brazil", "2021"), ("Chile", "2019"), ("Chile", "2021")]);
    }

    #[test]
    fn unknown_values_are_not_errors() {
        let table = fixtures::south_america();
        let selection = Selection::new(["Atlantis"], ["2020"]);
        assert!(filter_records(&table, &selection.countries, &selection.years).is_empty());
    }

    #[test]
    fn toggles_flip_membership() {
        let mut selection = Selection::new(["Brazil"], ["2020"]);
        selection.toggle_country("Chile");
        selection.toggle_country("Brazil");
        selection.toggle_year("2020");
        selection.toggle_year("2021");
        assert_eq!(selection, Selection::new(["Chile"], ["2021"]));
    }
}
