#![allow(dead_code)]

use std::sync::OnceLock;

use tablefacets_query::FacetConfig;

/// Library catalogue with one date facet, one aliased discrete facet and a
/// required column.
pub const CATALOGUE_YAML: &str = "
database table: items
facet labels:
  category: Category
  published: Published
  author: Author
keyword columns: [title, summary]
full text columns: [body]
output columns:
  title: Title
  published: Published
date formats:
  published: F j, Y
columns for additional values:
  category_secondary: category
  category_legacy: category
required columns: [status]
use AND for keyword logic by default: true
automatically put wildcards on keywords entered: true
pager limit: 25
location of assets: /assets
";

/// Smallest usable configuration: one discrete facet, nothing required.
pub const MINIMAL_YAML: &str = "
database table: items
facet labels:
  category: Category
";

static CATALOGUE: OnceLock<FacetConfig> = OnceLock::new();

pub fn catalogue() -> &'static FacetConfig {
    CATALOGUE.get_or_init(|| {
        FacetConfig::from_yaml_str(CATALOGUE_YAML).expect("catalogue fixture must load")
    })
}

pub fn minimal() -> FacetConfig {
    FacetConfig::from_yaml_str(MINIMAL_YAML).expect("minimal fixture must load")
}

/// Same as the minimal fixture with extra YAML lines appended.
pub fn minimal_with(extra: &str) -> FacetConfig {
    FacetConfig::from_yaml_str(&format!("{MINIMAL_YAML}{extra}"))
        .expect("extended fixture must load")
}
