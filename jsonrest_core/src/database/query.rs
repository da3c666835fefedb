use log::*;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

use super::{
    page::Pagination,
    sort::{FindManyOrder, OrderDirection},
    value::{get_document_path, stringify},
};
use crate::resource::Document;

/// Query parameters consumed by the engine itself rather than matched against
/// document fields.
pub const RESERVED_KEYS: [&str; 11] = [
    "q", "_start", "_end", "_page", "_sort", "_order", "_limit", "_embed", "_expand", "_field",
    "_delay",
];

/// JSONP style parameters. They survive unknown-key pruning but never filter.
pub const PASS_THROUGH_KEYS: [&str; 2] = ["callback", "_"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Ne,
    Lte,
    Gte,
    Like,
}

impl Operator {
    /// Split an operator suffix off a query key: `views_gte` -> (`views`, Gte).
    ///
    /// ```
    /// use jsonrest_core::Operator;
    ///
    /// assert_eq!(Operator::split("author.name_like"), ("author.name", Operator::Like));
    /// assert_eq!(Operator::split("title"), ("title", Operator::Eq));
    /// ```
    pub fn split(key: &str) -> (&str, Operator) {
        let suffixes = [
            ("_ne", Operator::Ne),
            ("_lte", Operator::Lte),
            ("_gte", Operator::Gte),
            ("_like", Operator::Like),
        ];
        for (suffix, operator) in suffixes {
            if let Some(path) = key.strip_suffix(suffix) {
                return (path, operator);
            }
        }
        (key, Operator::Eq)
    }
}

/// One filter key of a query with every value it was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// The key as it appeared in the request, suffix included.
    pub key: String,
    pub path: String,
    pub operator: Operator,
    pub values: Vec<String>,
}

/// Compare a raw query value against a raw element value. Numbers compare
/// numerically, strings lexicographically; anything else is incomparable.
fn compare_raw(query_value: &str, element: &Value) -> Option<Ordering> {
    match element {
        Value::Number(n) => {
            let element = n.as_f64()?;
            let query_value = query_value.trim().parse::<f64>().ok()?;
            query_value.partial_cmp(&element)
        }
        Value::String(s) => Some(query_value.cmp(s.as_str())),
        _ => None,
    }
}

impl Predicate {
    pub fn new(key: &str, values: Vec<String>) -> Self {
        let (path, operator) = Operator::split(key);
        Predicate {
            key: key.to_string(),
            path: path.to_string(),
            operator,
            values,
        }
    }

    fn matches_value(&self, query_value: &str, element: &Value) -> bool {
        match self.operator {
            Operator::Gte => matches!(
                compare_raw(query_value, element),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Operator::Lte => matches!(
                compare_raw(query_value, element),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::Ne => query_value != stringify(element),
            Operator::Like => match RegexBuilder::new(query_value)
                .case_insensitive(true)
                .build()
            {
                Ok(re) => re.is_match(&stringify(element)),
                Err(err) => {
                    warn!("Invalid pattern for {}: {}", self.key, err);
                    false
                }
            },
            Operator::Eq => query_value == stringify(element),
        }
    }

    /// Repeated values combine with OR, except `_ne` where every value must
    /// differ. A missing or null element never matches.
    pub fn matches(&self, document: &Document) -> bool {
        let element = match get_document_path(document, &self.path) {
            Some(Value::Null) | None => return false,
            Some(element) => element,
        };
        let mut results = self
            .values
            .iter()
            .map(|query_value| self.matches_value(query_value, element));
        match self.operator {
            Operator::Ne => results.all(|matched| matched),
            _ => results.any(|matched| matched),
        }
    }
}

/// Case-insensitive substring search through every leaf of a value. `term`
/// must already be lowercase.
pub fn deep_query(value: &Value, term: &str) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) => items.iter().any(|item| deep_query(item, term)),
        Value::Object(map) => map.values().any(|item| deep_query(item, term)),
        other => stringify(other).to_lowercase().contains(term),
    }
}

/// Everything a read request asks of a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Free text term, matched against every field at any depth.
    pub q: Option<String>,
    pub predicates: Vec<Predicate>,
    /// `callback` and `_`, kept for the transport.
    pub pass_through: Vec<(String, String)>,
    pub order: Vec<FindManyOrder>,
    pub pagination: Pagination,
    pub embed: Vec<String>,
    pub expand: Vec<String>,
    pub fields: Vec<String>,
}

fn split_list(values: &[&str]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a query from decoded query string pairs. Repeated keys keep every
    /// value in order of appearance.
    ///
    /// ```
    /// use jsonrest_core::{Operator, Query};
    ///
    /// let query = Query::from_pairs([("id", "1"), ("id", "2"), ("views_gte", "10"), ("_sort", "title")]);
    /// assert_eq!(query.predicates.len(), 2);
    /// assert_eq!(query.predicates[0].values, vec!["1", "2"]);
    /// assert_eq!(query.predicates[1].operator, Operator::Gte);
    /// assert_eq!(query.order[0].property, "title");
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref().to_string());
            match grouped.iter_mut().find(|(k, _)| k == key) {
                Some((_, values)) => values.push(value),
                None => grouped.push((key.to_string(), vec![value])),
            }
        }

        let first = |name: &str| {
            grouped
                .iter()
                .find(|(key, _)| key == name)
                .and_then(|(_, values)| values.first().map(String::as_str))
        };
        let all = |name: &str| {
            grouped
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, values)| values.iter().map(String::as_str).collect::<Vec<_>>())
                .unwrap_or_default()
        };

        let q = first("q")
            .filter(|term| !term.is_empty())
            .map(str::to_string);

        let sort = split_list(&all("_sort"));
        let directions = split_list(&all("_order"));
        let order = sort
            .into_iter()
            .enumerate()
            .map(|(i, property)| FindManyOrder {
                property,
                direction: directions
                    .get(i)
                    .map(|d| OrderDirection::parse(d))
                    .unwrap_or_default(),
            })
            .collect();

        let pagination = Pagination::from_params(
            first("_page"),
            first("_limit"),
            first("_start"),
            first("_end"),
        );

        let mut predicates = Vec::new();
        let mut pass_through = Vec::new();
        for (key, values) in grouped.iter() {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            if PASS_THROUGH_KEYS.contains(&key.as_str()) {
                for value in values {
                    pass_through.push((key.clone(), value.clone()));
                }
                continue;
            }
            predicates.push(Predicate::new(key, values.clone()));
        }

        Query {
            q,
            predicates,
            pass_through,
            order,
            pagination,
            embed: split_list(&all("_embed")),
            expand: split_list(&all("_expand")),
            fields: split_list(&all("_field")),
        }
    }

    pub fn q(mut self, term: &str) -> Self {
        self.q = Some(term.to_string()).filter(|term| !term.is_empty());
        self
    }

    /// Add a value for a filter key, merging with earlier values of the key.
    pub fn filter(mut self, key: &str, value: &str) -> Self {
        match self.predicates.iter_mut().find(|p| p.key == key) {
            Some(predicate) => predicate.values.push(value.to_string()),
            None => self
                .predicates
                .push(Predicate::new(key, vec![value.to_string()])),
        }
        self
    }

    /// Replace every value of a filter key.
    pub fn set_filter(mut self, key: &str, value: &str) -> Self {
        self.predicates.retain(|p| p.key != key);
        self.predicates
            .push(Predicate::new(key, vec![value.to_string()]));
        self
    }

    pub fn sort_by(mut self, property: &str, direction: OrderDirection) -> Self {
        self.order.push(FindManyOrder {
            property: property.to_string(),
            direction,
        });
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn embed(mut self, resource: &str) -> Self {
        self.embed.push(resource.to_string());
        self
    }

    pub fn expand(mut self, resource: &str) -> Self {
        self.expand.push(resource.to_string());
        self
    }

    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Drop predicates whose key is not a path of any document. Operator keys
    /// are always kept.
    pub fn retain_known(mut self, documents: &[Document]) -> Self {
        self.predicates.retain(|predicate| {
            let known = predicate.operator != Operator::Eq
                || documents
                    .iter()
                    .any(|document| get_document_path(document, &predicate.key).is_some());
            if !known {
                debug!("Ignoring unknown query parameter: {}", predicate.key);
            }
            known
        });
        self
    }

    /// Free text search and every predicate must match.
    pub fn matches(&self, document: &Document) -> bool {
        if let Some(term) = &self.q {
            let term = term.to_lowercase();
            if !document.values().any(|value| deep_query(value, &term)) {
                return false;
            }
        }
        self.predicates
            .iter()
            .all(|predicate| predicate.matches(document))
    }
}
