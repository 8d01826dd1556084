use super::tokenize::{tokenize_quoted, DEFAULT_QUOTATION_MARKS};
use crate::FacetConfig;

/// Tokens that turn the implicit AND off for the token after them.
const OR_MARKERS: [&str; 2] = ["OR", "or"];

/// Leading characters that already carry a boolean-mode operator.
const OPERATOR_PREFIXES: &[char] = &['-', '~', '<', '>', '+'];

/// Trailing characters after which no wildcard is appended.
const WILDCARD_STOPPERS: &[char] = &['"', '\'', '*', ')'];

/// Rewrites keyword tokens into a boolean-mode full-text expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordQueryBuilder {
    default_and: bool,
    auto_wildcard: bool,
}

impl KeywordQueryBuilder {
    pub fn new(default_and: bool, auto_wildcard: bool) -> Self {
        Self {
            default_and,
            auto_wildcard,
        }
    }

    pub fn from_config(config: &FacetConfig) -> Self {
        Self::new(config.keyword_default_and(), config.keyword_auto_wildcard())
    }

    /// Tokenize `raw` and build the expression bound to the MATCH predicate.
    pub fn build(&self, raw: &str) -> String {
        let tokens = tokenize_quoted(raw, DEFAULT_QUOTATION_MARKS);
        self.build_tokens(tokens).join(" ")
    }

    /// Apply the enabled passes, default-AND first.
    pub fn build_tokens(&self, mut tokens: Vec<String>) -> Vec<String> {
        if self.default_and {
            tokens = apply_default_and(tokens);
        }
        if self.auto_wildcard {
            tokens = apply_auto_wildcard(tokens);
        }
        tokens
    }
}

/// Prefix every term with `+` (required) unless it directly follows an `OR`
/// marker or already starts with an operator. The markers themselves are
/// dropped. Suppression lasts for exactly one token.
pub fn apply_default_and(tokens: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut add_plus = true;

    for token in tokens {
        if OR_MARKERS.contains(&token.as_str()) {
            add_plus = false;
            continue;
        }
        if add_plus && !token.starts_with(OPERATOR_PREFIXES) {
            out.push(format!("+{token}"));
        } else {
            out.push(token);
        }
        add_plus = true;
    }

    out
}

/// Append `*` to every token that does not already end in a quote, a
/// wildcard or a closing parenthesis.
pub fn apply_auto_wildcard(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .map(|token| {
            if token.ends_with(WILDCARD_STOPPERS) {
                token
            } else {
                format!("{token}*")
            }
        })
        .collect()
}
