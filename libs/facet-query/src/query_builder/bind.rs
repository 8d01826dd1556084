use std::fmt;

/// Name of the placeholder carrying the keyword expression.
pub const KEYWORDS_PLACEHOLDER: &str = "keywords";

/// Reference to a bound value. Displays as `:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placeholder(String);

impl Placeholder {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

/// Named placeholder → value map for one query, in binding order.
///
/// User input only ever enters a query through here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: Vec<(String, String)>,
    counter: usize,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` under the next generated name (`p1`, `p2`, ...).
    pub fn bind(&mut self, value: impl Into<String>) -> Placeholder {
        self.counter += 1;
        let name = format!("p{}", self.counter);
        self.values.push((name.clone(), value.into()));
        Placeholder(name)
    }

    /// Bind `value` under a fixed name, replacing an earlier value.
    pub fn bind_named(&mut self, name: &str, value: impl Into<String>) -> Placeholder {
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.values.push((name.to_string(), value)),
        }
        Placeholder(name.to_string())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn value_of(&self, placeholder: &Placeholder) -> Option<&str> {
        self.get(placeholder.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
