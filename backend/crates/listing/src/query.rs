//! Typed parser for list-endpoint query strings.
//!
//! Rewriting the whole query payload textually to turn `gt`/`gte`/`lt`/
//! `lte`/`in` tokens into database operators corrupts values that merely
//! contain those words. This parser recognises operators structurally
//! instead: only a bracketed sub-key (`field[op]=value`) is ever treated as
//! an operator.

use std::fmt;

/// Default page number when the request omits `page`.
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size when the request omits `limit`.
pub const DEFAULT_LIMIT: u32 = 25;

/// Reserved control parameters that never become field filters.
const RESERVED: [&str; 4] = ["select", "sort", "page", "limit"];

/// A single field comparison parsed from the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// `field=value`
    Eq(String),
    /// `field[gt]=value`
    Gt(String),
    /// `field[gte]=value`
    Gte(String),
    /// `field[lt]=value`
    Lt(String),
    /// `field[lte]=value`
    Lte(String),
    /// `field[in]=a,b,c`
    In(Vec<String>),
}

impl Comparison {
    fn from_operator(op: &str, value: &str) -> Option<Self> {
        match op {
            "gt" => Some(Self::Gt(value.to_owned())),
            "gte" => Some(Self::Gte(value.to_owned())),
            "lt" => Some(Self::Lt(value.to_owned())),
            "lte" => Some(Self::Lte(value.to_owned())),
            "in" => Some(Self::In(
                value
                    .split(',')
                    .map(|part| part.trim().to_owned())
                    .filter(|part| !part.is_empty())
                    .collect(),
            )),
            _ => None,
        }
    }
}

/// A filter on a named field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Serialized field name as sent by the client (e.g. `averageCost`).
    pub field: String,
    /// Parsed comparison to apply.
    pub comparison: Comparison,
}

/// One sort key, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Serialized field name.
    pub field: String,
    /// `true` when the field was prefixed with `-`.
    pub descending: bool,
}

/// Errors raised while parsing a query string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A bracketed sub-key was not a recognised operator.
    #[error("unknown filter operator '{operator}' on field '{field}'")]
    UnknownOperator {
        /// Field carrying the bad operator.
        field: String,
        /// The unrecognised sub-key.
        operator: String,
    },
    /// A filter key was structurally malformed (e.g. unbalanced brackets).
    #[error("malformed filter key '{key}'")]
    MalformedKey {
        /// The offending raw key.
        key: String,
    },
    /// `page` was not a positive integer.
    #[error("'page' must be a positive integer, got '{value}'")]
    InvalidPage {
        /// The raw value supplied.
        value: String,
    },
    /// `limit` was not a positive integer.
    #[error("'limit' must be a positive integer, got '{value}'")]
    InvalidLimit {
        /// The raw value supplied.
        value: String,
    },
}

/// Fully parsed list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Field filters, in request order.
    pub filters: Vec<Filter>,
    /// Projection list from `select`, when present.
    pub select: Option<Vec<String>>,
    /// Sort keys from `sort`; empty means the caller's default applies.
    pub sort: Vec<SortKey>,
    /// One-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            select: None,
            sort: Vec::new(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListQuery {
    /// Parse a raw query string (without the leading `?`).
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when a bracketed operator is unrecognised or
    /// `page`/`limit` are not positive integers.
    pub fn from_query_str(raw: &str) -> Result<Self, ParseError> {
        let mut query = Self::default();

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let key = key.as_ref();
            let value = value.as_ref();
            match key {
                "select" => query.select = Some(split_field_list(value)),
                "sort" => query.sort = parse_sort(value),
                "page" => query.page = parse_positive(value).ok_or(ParseError::InvalidPage {
                    value: value.to_owned(),
                })?,
                "limit" => {
                    query.limit = parse_positive(value).ok_or(ParseError::InvalidLimit {
                        value: value.to_owned(),
                    })?;
                }
                _ => query.filters.push(parse_filter(key, value)?),
            }
        }

        Ok(query)
    }

    /// Zero-based row offset for the requested page.
    #[must_use]
    pub fn skip(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

fn parse_positive(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|n| *n >= 1)
}

fn split_field_list(value: &str) -> Vec<String> {
    // Comma and whitespace are interchangeable separators.
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_sort(value: &str) -> Vec<SortKey> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.strip_prefix('-') {
            Some(field) => SortKey {
                field: field.to_owned(),
                descending: true,
            },
            None => SortKey {
                field: part.to_owned(),
                descending: false,
            },
        })
        .collect()
}

fn parse_filter(key: &str, value: &str) -> Result<Filter, ParseError> {
    debug_assert!(!RESERVED.contains(&key));

    let Some(open) = key.find('[') else {
        return Ok(Filter {
            field: key.to_owned(),
            comparison: Comparison::Eq(value.to_owned()),
        });
    };

    let malformed = || ParseError::MalformedKey { key: key.to_owned() };
    let field = key.get(..open).ok_or_else(malformed)?;
    let rest = key.get(open + 1..).ok_or_else(malformed)?;
    let close = rest.find(']').ok_or_else(malformed)?;
    if field.is_empty() || close != rest.len() - 1 {
        return Err(malformed());
    }
    let operator = rest.get(..close).ok_or_else(malformed)?;

    let comparison =
        Comparison::from_operator(operator, value).ok_or_else(|| ParseError::UnknownOperator {
            field: field.to_owned(),
            operator: operator.to_owned(),
        })?;

    Ok(Filter {
        field: field.to_owned(),
        comparison,
    })
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn bracketed_operator_parses_structurally() {
        let query =
            ListQuery::from_query_str("careers=Web%20Development&averageCost[lte]=10000").unwrap();
        assert_eq!(query.filters.len(), 2);
        assert_eq!(
            query.filters[0],
            Filter {
                field: "careers".into(),
                comparison: Comparison::Eq("Web Development".into()),
            }
        );
        assert_eq!(
            query.filters[1],
            Filter {
                field: "averageCost".into(),
                comparison: Comparison::Lte("10000".into()),
            }
        );
    }

    #[rstest]
    #[case("shelter=open", "shelter", Comparison::Eq("open".into()))]
    #[case("name=florent", "name", Comparison::Eq("florent".into()))]
    #[case("description=gte%20standards", "description", Comparison::Eq("gte standards".into()))]
    fn operator_words_inside_values_or_names_stay_literal(
        #[case] raw: &str,
        #[case] field: &str,
        #[case] comparison: Comparison,
    ) {
        let query = ListQuery::from_query_str(raw).unwrap();
        assert_eq!(query.filters, vec![Filter { field: field.into(), comparison }]);
    }

    #[test]
    fn in_operator_splits_on_commas() {
        let query = ListQuery::from_query_str("careers[in]=Business,UI%2FUX").unwrap();
        assert_eq!(
            query.filters[0].comparison,
            Comparison::In(vec!["Business".into(), "UI/UX".into()])
        );
    }

    #[test]
    fn unknown_bracketed_operator_is_rejected() {
        let err = ListQuery::from_query_str("careers[regex]=x").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownOperator {
                field: "careers".into(),
                operator: "regex".into(),
            }
        );
    }

    #[rstest]
    #[case("careers[=x")]
    #[case("careers[in]x=y")]
    #[case("[in]=y")]
    fn malformed_keys_are_rejected(#[case] raw: &str) {
        assert!(matches!(
            ListQuery::from_query_str(raw),
            Err(ParseError::MalformedKey { .. })
        ));
    }

    #[test]
    fn reserved_keys_never_become_filters() {
        let query =
            ListQuery::from_query_str("select=name,description&sort=-name&page=2&limit=5").unwrap();
        assert!(query.filters.is_empty());
        assert_eq!(
            query.select.as_deref(),
            Some(&["name".to_owned(), "description".to_owned()][..])
        );
        assert_eq!(query.sort, vec![SortKey { field: "name".into(), descending: true }]);
        assert_eq!((query.page, query.limit), (2, 5));
        assert_eq!(query.skip(), 5);
    }

    #[test]
    fn select_accepts_whitespace_separators() {
        let query = ListQuery::from_query_str("select=name%20description,%20photo").unwrap();
        assert_eq!(
            query.select.as_deref(),
            Some(&["name".to_owned(), "description".to_owned(), "photo".to_owned()][..])
        );
    }

    #[rstest]
    #[case("page=0")]
    #[case("page=abc")]
    #[case("page=-2")]
    fn non_positive_page_is_rejected(#[case] raw: &str) {
        assert!(matches!(
            ListQuery::from_query_str(raw),
            Err(ParseError::InvalidPage { .. })
        ));
    }

    #[test]
    fn defaults_apply_when_query_is_empty() {
        let query = ListQuery::from_query_str("").unwrap();
        assert_eq!(query, ListQuery::default());
        assert_eq!(query.skip(), 0);
    }
}
