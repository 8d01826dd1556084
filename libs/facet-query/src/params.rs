//! Request parameter parsing
//!
//! Turns decoded query-string pairs into the parameter structure the query
//! builders consume. Only facet columns and the reserved parameters
//! (`keys`, `sort`, `sort_direction`, `page`, `full_text`) survive; every
//! other name is dropped here and never reaches the database.
//!
//! List parameters use the bracket convention: `category[]=books&category[]=films`.

use url::form_urlencoded;

use crate::FacetConfig;

pub const KEYWORDS_PARAM: &str = "keys";
pub const SORT_PARAM: &str = "sort";
pub const SORT_DIRECTION_PARAM: &str = "sort_direction";
pub const PAGE_PARAM: &str = "page";
pub const FULL_TEXT_PARAM: &str = "full_text";

/// Reserved parameter names that are not facets.
pub const EXTRA_PARAMETERS: [&str; 5] = [
    KEYWORDS_PARAM,
    SORT_PARAM,
    SORT_DIRECTION_PARAM,
    PAGE_PARAM,
    FULL_TEXT_PARAM,
];

/// A parameter value as written in the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    List(Vec<String>),
}

impl ParamValue {
    pub fn values(&self) -> &[String] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::List(vs) => vs,
        }
    }

    /// Last value given; the one that wins for single-valued parameters.
    pub fn last(&self) -> Option<&str> {
        self.values().last().map(String::as_str)
    }
}

/// Selected values of one facet, in query-string order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetSelection {
    pub facet: String,
    pub values: Vec<String>,
}

impl FacetSelection {
    pub fn new<I, S>(facet: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            facet: facet.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Allowed request parameters, ordered facets first (configuration order)
/// then reserved parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParameters {
    entries: Vec<(String, ParamValue)>,
}

impl RequestParameters {
    /// Parse a raw (still percent-encoded) query string, with or without a
    /// leading `?`.
    pub fn from_query_string(config: &FacetConfig, query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let items: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        Self::from_items(config, &items)
    }

    /// Build from ordered, already-decoded `(name, value)` pairs.
    pub fn from_items(config: &FacetConfig, items: &[(String, String)]) -> Self {
        let allowed = config.allowed_parameters();
        let mut collected: Vec<(String, ParamValue)> = Vec::new();

        for (key, value) in items {
            let (name, is_list) = split_list_key(key);
            if !allowed.contains(&name) {
                tracing::debug!(parameter = %key, "Ignoring unrecognized query parameter");
                continue;
            }
            if value.is_empty() {
                continue;
            }

            let existing = collected.iter_mut().find(|(n, _)| n == name);
            match (existing, is_list) {
                (Some((_, ParamValue::List(values))), true) => values.push(value.clone()),
                (Some((_, slot)), true) => *slot = ParamValue::List(vec![value.clone()]),
                (Some((_, slot)), false) => *slot = ParamValue::Single(value.clone()),
                (None, true) => {
                    collected.push((name.to_string(), ParamValue::List(vec![value.clone()])))
                }
                (None, false) => {
                    collected.push((name.to_string(), ParamValue::Single(value.clone())))
                }
            }
        }

        let mut entries = Vec::with_capacity(collected.len());
        for name in allowed {
            if let Some(pos) = collected.iter().position(|(n, _)| n == name) {
                entries.push(collected.swap_remove(pos));
            }
        }

        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Raw keyword string (`keys`). Repeated values are joined with a space.
    pub fn keywords(&self) -> Option<String> {
        self.get(KEYWORDS_PARAM).map(|v| v.values().join(" "))
    }

    pub fn sort(&self) -> Option<&str> {
        self.get(SORT_PARAM).and_then(ParamValue::last)
    }

    /// Requested sort direction. Unrecognized values fall back to ascending.
    pub fn sort_direction(&self) -> SortDirection {
        self.get(SORT_DIRECTION_PARAM)
            .and_then(ParamValue::last)
            .and_then(SortDirection::parse)
            .unwrap_or_default()
    }

    /// Zero-based page number. Unparsable values mean the first page.
    pub fn page(&self) -> usize {
        self.get(PAGE_PARAM)
            .and_then(ParamValue::last)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn full_text(&self) -> bool {
        match self.get(FULL_TEXT_PARAM).and_then(ParamValue::last) {
            Some(v) => !matches!(v, "0" | "false"),
            None => false,
        }
    }

    /// Facet selections with the reserved parameters removed. A facet given
    /// as a single value is a one-element selection.
    pub fn facet_selections(&self) -> Vec<FacetSelection> {
        self.entries
            .iter()
            .filter(|(name, _)| !EXTRA_PARAMETERS.contains(&name.as_str()))
            .map(|(name, value)| FacetSelection::new(name.clone(), value.values().iter().cloned()))
            .collect()
    }

    /// Re-encode as a query string, list parameters with `[]` suffixes.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.entries {
            match value {
                ParamValue::Single(v) => {
                    serializer.append_pair(name, v);
                }
                ParamValue::List(vs) => {
                    let key = format!("{name}[]");
                    for v in vs {
                        serializer.append_pair(&key, v);
                    }
                }
            }
        }
        serializer.finish()
    }

    /// Copy with `value` added to `facet`'s selection. The page resets since
    /// the result set changes. A newly selected facet takes its configured
    /// position; names that are not facet columns are ignored.
    pub fn with_facet_value(&self, config: &FacetConfig, facet: &str, value: &str) -> Self {
        let mut next = self.without_page();
        if !config.is_facet(facet) {
            tracing::debug!(facet = %facet, "Ignoring value for unconfigured facet");
            return next;
        }
        match next.entries.iter_mut().find(|(n, _)| n == facet) {
            Some((_, slot)) => {
                let mut values = slot.values().to_vec();
                if !values.iter().any(|v| v == value) {
                    values.push(value.to_string());
                }
                *slot = ParamValue::List(values);
            }
            None => {
                let allowed = config.allowed_parameters();
                let rank = |name: &str| allowed.iter().position(|a| *a == name);
                let facet_rank = rank(facet);
                let at = next
                    .entries
                    .iter()
                    .position(|(n, _)| rank(n.as_str()) > facet_rank)
                    .unwrap_or(next.entries.len());
                next.entries.insert(
                    at,
                    (facet.to_string(), ParamValue::List(vec![value.to_string()])),
                );
            }
        }
        next
    }

    /// Copy with `value` removed from `facet`'s selection; the facet
    /// disappears once nothing is selected. The page resets.
    pub fn without_facet_value(&self, facet: &str, value: &str) -> Self {
        let mut next = self.without_page();
        if let Some(pos) = next.entries.iter().position(|(n, _)| n == facet) {
            let remaining: Vec<String> = next.entries[pos]
                .1
                .values()
                .iter()
                .filter(|v| *v != value)
                .cloned()
                .collect();
            if remaining.is_empty() {
                next.entries.remove(pos);
            } else {
                next.entries[pos].1 = ParamValue::List(remaining);
            }
        }
        next
    }

    fn without_page(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(n, _)| n != PAGE_PARAM)
                .cloned()
                .collect(),
        }
    }
}

/// Strip a `[]` / `[index]` suffix, reporting whether one was present.
fn split_list_key(key: &str) -> (&str, bool) {
    if key.ends_with(']') {
        if let Some(open) = key.find('[') {
            if open > 0 {
                return (&key[..open], true);
            }
        }
    }
    (key, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FacetConfig {
        FacetConfig::from_yaml_str(
            "
database table: docs
facet labels:
  category: Category
  published: Published
date formats:
  published: Y-m-d
",
        )
        .unwrap()
    }

    fn items(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn drops_unknown_and_empty_parameters() {
        let params = RequestParameters::from_items(
            &config(),
            &items(&[("evil", "1"), ("category[]", ""), ("keys", "tax")]),
        );
        assert!(params.get("evil").is_none());
        assert!(params.get("category").is_none());
        assert_eq!(params.keywords().as_deref(), Some("tax"));
    }

    #[test]
    fn collects_list_values_in_order_with_duplicates() {
        let params = RequestParameters::from_items(
            &config(),
            &items(&[
                ("category[]", "films"),
                ("category[]", "books"),
                ("category[]", "films"),
            ]),
        );
        assert_eq!(
            params.facet_selections(),
            vec![FacetSelection::new("category", ["films", "books", "films"])]
        );
    }

    #[test]
    fn orders_facets_by_configuration() {
        let params = RequestParameters::from_items(
            &config(),
            &items(&[("page", "2"), ("published[]", "2012"), ("category", "books")]),
        );
        let names: Vec<&str> = params.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["category", "published", "page"]);
    }

    #[test]
    fn single_value_facet_is_one_element_selection() {
        let params = RequestParameters::from_items(&config(), &items(&[("category", "books")]));
        assert_eq!(
            params.facet_selections(),
            vec![FacetSelection::new("category", ["books"])]
        );
    }

    #[test]
    fn reserved_parameters_are_not_facets() {
        let params = RequestParameters::from_items(
            &config(),
            &items(&[("keys", "a"), ("sort", "category"), ("full_text", "1")]),
        );
        assert!(params.facet_selections().is_empty());
        assert_eq!(params.sort(), Some("category"));
        assert!(params.full_text());
    }

    #[test]
    fn parses_control_parameters() {
        let params = RequestParameters::from_items(
            &config(),
            &items(&[("sort_direction", "desc"), ("page", "3")]),
        );
        assert_eq!(params.sort_direction(), SortDirection::Desc);
        assert_eq!(params.page(), 3);

        let params = RequestParameters::from_items(
            &config(),
            &items(&[("sort_direction", "sideways"), ("page", "x"), ("full_text", "0")]),
        );
        assert_eq!(params.sort_direction(), SortDirection::Asc);
        assert_eq!(params.page(), 0);
        assert!(!params.full_text());
    }

    #[test]
    fn decodes_query_strings() {
        let params = RequestParameters::from_query_string(
            &config(),
            "?keys=%22tax+law%22&category%5B%5D=books&category%5B%5D=films",
        );
        assert_eq!(params.keywords().as_deref(), Some("\"tax law\""));
        assert_eq!(
            params.get("category"),
            Some(&ParamValue::List(vec!["books".into(), "films".into()]))
        );
    }

    #[test]
    fn query_string_round_trip() {
        let config = config();
        let params = RequestParameters::from_query_string(
            &config,
            "category[]=books&category[]=films&keys=a+b",
        );
        let encoded = params.to_query_string();
        assert_eq!(encoded, "category%5B%5D=books&category%5B%5D=films&keys=a+b");
        assert_eq!(RequestParameters::from_query_string(&config, &encoded), params);
    }

    #[test]
    fn toggles_facet_values_and_resets_page() {
        let params = RequestParameters::from_items(
            &config(),
            &items(&[("category[]", "books"), ("page", "4")]),
        );

        let added = params.with_facet_value(&config(), "category", "films");
        assert_eq!(added.page(), 0);
        assert_eq!(
            added.facet_selections(),
            vec![FacetSelection::new("category", ["books", "films"])]
        );
        assert_eq!(added.with_facet_value(&config(), "category", "films"), added);
        assert_eq!(added.with_facet_value(&config(), "evil", "1"), added);

        let removed = added.without_facet_value("category", "books");
        assert_eq!(
            removed.facet_selections(),
            vec![FacetSelection::new("category", ["films"])]
        );
        assert!(removed
            .without_facet_value("category", "films")
            .facet_selections()
            .is_empty());
    }

    #[test]
    fn added_facet_takes_configured_position() {
        let config = config();
        let params = RequestParameters::from_query_string(&config, "published=2012&keys=x");
        let added = params.with_facet_value(&config, "category", "books");
        let names: Vec<&str> = added.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["category", "published", "keys"]);
        assert_eq!(
            added,
            RequestParameters::from_query_string(
                &config,
                "category[]=books&published=2012&keys=x"
            )
        );
    }

    #[test]
    fn splits_list_keys() {
        assert_eq!(split_list_key("a[]"), ("a", true));
        assert_eq!(split_list_key("a[0]"), ("a", true));
        assert_eq!(split_list_key("a"), ("a", false));
        assert_eq!(split_list_key("[]"), ("[]", false));
    }
}
