//! Date granularity resolution.
//!
//! A date facet's display format decides the levels it can be browsed at.
//! Formats use PHP `date()` style tokens:
//! - year: `Y`, `y`, `o`
//! - month: `F`, `m`, `M`, `n`
//! - day: `d`, `j`

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::config::ColumnMap;
use crate::{Error, Result};

/// Precision level of a date facet, ordered year < month < day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Year,
    Month,
    Day,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Self::Year, Self::Month, Self::Day];

    /// Format tokens that indicate this granularity.
    pub fn tokens(self) -> &'static [char] {
        match self {
            Self::Year => &['Y', 'y', 'o'],
            Self::Month => &['F', 'm', 'M', 'n'],
            Self::Day => &['d', 'j'],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
        }
    }

    /// Granularity of a selected date value, classified by length:
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub fn from_value_len(len: usize) -> Option<Self> {
        match len {
            4 => Some(Self::Year),
            7 => Some(Self::Month),
            10 => Some(Self::Day),
            _ => None,
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Granularities supported by a single display format, in year/month/day order.
pub fn granularities_for_format(format: &str) -> Vec<Granularity> {
    let mut found: Vec<Granularity> = Granularity::ALL
        .into_iter()
        .filter(|g| format.contains(g.tokens()))
        .collect();
    found.sort();
    found
}

/// Column → supported granularities, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateGranularities {
    columns: Vec<(String, Vec<Granularity>)>,
}

impl DateGranularities {
    pub fn get(&self, column: &str) -> Option<&[Granularity]> {
        self.columns
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, g)| g.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Granularity])> {
        self.columns.iter().map(|(c, g)| (c.as_str(), g.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Serializes as a column → granularity list map in configuration order.
impl Serialize for DateGranularities {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, granularities) in &self.columns {
            map.serialize_entry(column, granularities)?;
        }
        map.end()
    }
}

/// Resolve the supported granularities of every configured date column.
///
/// A format that matches none of the token sets is a configuration bug and
/// is reported as [`Error::Config`].
pub fn resolve_granularities(date_formats: &ColumnMap) -> Result<DateGranularities> {
    let mut columns = Vec::with_capacity(date_formats.len());
    for (column, format) in date_formats.iter() {
        let granularities = granularities_for_format(format);
        if granularities.is_empty() {
            return Err(Error::Config(format!(
                "date format '{format}' for column '{column}' has no year, month or day token"
            )));
        }
        columns.push((column.to_string(), granularities));
    }
    Ok(DateGranularities { columns })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_level() {
        assert_eq!(granularities_for_format("Y"), vec![Granularity::Year]);
        assert_eq!(granularities_for_format("F"), vec![Granularity::Month]);
        assert_eq!(granularities_for_format("j"), vec![Granularity::Day]);
        assert_eq!(
            granularities_for_format("F j, Y"),
            vec![Granularity::Year, Granularity::Month, Granularity::Day]
        );
    }

    #[test]
    fn orders_by_level_not_by_position_in_format() {
        assert_eq!(
            granularities_for_format("d/m/y"),
            vec![Granularity::Year, Granularity::Month, Granularity::Day]
        );
        assert_eq!(
            granularities_for_format("n-j"),
            vec![Granularity::Month, Granularity::Day]
        );
    }

    #[test]
    fn classifies_values_by_length() {
        assert_eq!(Granularity::from_value_len(4), Some(Granularity::Year));
        assert_eq!(Granularity::from_value_len(7), Some(Granularity::Month));
        assert_eq!(Granularity::from_value_len(10), Some(Granularity::Day));
        assert_eq!(Granularity::from_value_len(2), None);
        assert_eq!(Granularity::from_value_len(8), None);
    }

    #[test]
    fn format_without_tokens_is_config_error() {
        let formats: ColumnMap = [("created", "H:i")].into_iter().collect();
        let err = resolve_granularities(&formats).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("created")));
    }

    #[test]
    fn resolves_in_configuration_order() {
        let formats: ColumnMap = [("updated", "Y"), ("created", "Y-m-d")]
            .into_iter()
            .collect();
        let resolved = resolve_granularities(&formats).unwrap();
        let columns: Vec<&str> = resolved.iter().map(|(c, _)| c).collect();
        assert_eq!(columns, vec!["updated", "created"]);
        assert_eq!(resolved.get("updated"), Some(&[Granularity::Year][..]));
        assert_eq!(resolved.get("missing"), None);
    }
}
