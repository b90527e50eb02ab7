use std::fmt;

/// A `name`, `!name`, `name=value` or `name!=value` expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameValueExpression {
    name: String,
    value: Option<String>,
    negated: bool,
}

impl NameValueExpression {
    /// Parse an expression. Names are lowercased when `case_sensitive_name`
    /// is false so equality and lookup ignore case.
    #[must_use]
    pub fn parse(expression: &str, case_sensitive_name: bool) -> Self {
        let (name, value, negated) = match expression.find('=') {
            None => match expression.strip_prefix('!') {
                Some(name) => (name, None, true),
                None => (expression, None, false),
            },
            Some(sep) => {
                let (lhs, value) = (&expression[..sep], &expression[sep + 1..]);
                match lhs.strip_suffix('!') {
                    Some(name) => (name, Some(value), true),
                    None => (lhs, Some(value), false),
                }
            }
        };
        let name = name.trim();
        Self {
            name: if case_sensitive_name {
                name.to_string()
            } else {
                name.to_ascii_lowercase()
            },
            value: value.map(str::to_string),
            negated,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// `name=value` (not negated).
    pub(crate) fn is_positive_value(&self) -> bool {
        self.value.is_some() && !self.negated
    }

    /// Evaluate against the first value of the named entry, `None` when absent.
    pub(crate) fn matches(&self, first_value: Option<&str>) -> bool {
        let hit = match &self.value {
            Some(expected) => first_value == Some(expected.as_str()),
            None => first_value.is_some(),
        };
        hit != self.negated
    }
}

impl fmt::Display for NameValueExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, self.negated) {
            (Some(value), true) => write!(f, "{}!={}", self.name, value),
            (Some(value), false) => write!(f, "{}={}", self.name, value),
            (None, true) => write!(f, "!{}", self.name),
            (None, false) => f.write_str(&self.name),
        }
    }
}

/// Insert `expr` unless an equal expression is already present.
pub(crate) fn push_unique(target: &mut Vec<NameValueExpression>, expr: NameValueExpression) {
    if !target.contains(&expr) {
        target.push(expr);
    }
}

/// Order-insensitive equality of two expression lists.
pub(crate) fn same_set<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().all(|x| b.contains(x))
}

/// `[a=1 && !b]`
pub(crate) fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    infix: &str,
) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(infix)?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}
