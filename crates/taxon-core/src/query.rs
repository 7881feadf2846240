//! Store query description and its reference semantics.
//!
//! A [`Query`] is deliberately limited to what the backing stores can
//! express: equality on a field, array membership against at most
//! [`MAX_MEMBERSHIP_VALUES`] values, an OR of such predicates, one ascending
//! sort field, a start-after anchor, a limit and a field projection.
//! [`Query::evaluate`] spells out how a store must answer one.

use std::cmp::Ordering;

use serde_json::Value;

use crate::Result;
use crate::document::Document;
use crate::error::InvalidInputError;

/// Upper bound on values in a single array-membership predicate.
pub const MAX_MEMBERSHIP_VALUES: usize = 10;

/// Upper bound on ids in a single lookup-by-ids call.
pub const MAX_IDS_PER_LOOKUP: usize = 30;

/// A predicate over one document.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldFilter {
    /// The value at `field` equals `value`.
    Eq { field: String, value: Value },

    /// The array at `field` contains any of `values`.
    ArrayContainsAny { field: String, values: Vec<String> },

    /// Any child predicate holds.
    Or(Vec<FieldFilter>),
}

impl FieldFilter {
    /// Equality on a dotted field path.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        FieldFilter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Array membership on a dotted field path.
    pub fn array_contains_any(field: impl Into<String>, values: Vec<String>) -> Self {
        FieldFilter::ArrayContainsAny {
            field: field.into(),
            values,
        }
    }

    /// Disjunction of predicates.
    pub fn or(filters: Vec<FieldFilter>) -> Self {
        FieldFilter::Or(filters)
    }

    /// Returns true if the document satisfies this predicate.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            FieldFilter::Eq { field, value } => doc.get_path(field) == Some(value),
            FieldFilter::ArrayContainsAny { field, values } => doc
                .get_path(field)
                .and_then(Value::as_array)
                .is_some_and(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .any(|item| values.iter().any(|v| v == item))
                }),
            FieldFilter::Or(filters) => filters.iter().any(|f| f.matches(doc)),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            FieldFilter::Eq { .. } => Ok(()),
            FieldFilter::ArrayContainsAny { field, values } => {
                if values.is_empty() {
                    return Err(query_error(format!(
                        "membership filter on '{}' needs at least one value",
                        field
                    )));
                }
                if values.len() > MAX_MEMBERSHIP_VALUES {
                    return Err(query_error(format!(
                        "membership filter on '{}' has {} values, limit is {}",
                        field,
                        values.len(),
                        MAX_MEMBERSHIP_VALUES
                    )));
                }
                Ok(())
            }
            FieldFilter::Or(filters) => {
                if filters.is_empty() {
                    return Err(query_error("OR filter needs at least one branch".into()));
                }
                filters.iter().try_for_each(FieldFilter::validate)
            }
        }
    }
}

fn query_error(reason: String) -> crate::Error {
    InvalidInputError::Query { reason }.into()
}

/// A query against one collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Collection to read from.
    pub collection: String,

    /// Predicates, all of which must hold.
    pub filters: Vec<FieldFilter>,

    /// Ascending sort field; ties and unordered queries fall back to id order.
    pub order_by: Option<String>,

    /// Only return documents strictly after this one in sort order.
    pub start_after: Option<Document>,

    /// Maximum number of documents to return.
    pub limit: Option<usize>,

    /// Top-level fields to return; `None` returns every field.
    pub select: Option<Vec<String>>,
}

impl Query {
    /// Start a query over a collection.
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            ..Self::default()
        }
    }

    /// Add a predicate.
    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the sort field.
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    /// Set or clear the start-after anchor.
    pub fn start_after(mut self, anchor: Option<Document>) -> Self {
        self.start_after = anchor;
        self
    }

    /// Set the result limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the field projection.
    pub fn select<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.select = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Check that the query stays within what a store can express.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::Query`] for empty or oversized membership
    /// filters and empty OR branches.
    pub fn validate(&self) -> Result<()> {
        self.filters.iter().try_for_each(FieldFilter::validate)
    }

    /// Returns true if the document satisfies every predicate.
    pub fn matches(&self, doc: &Document) -> bool {
        self.filters.iter().all(|f| f.matches(doc))
    }

    /// Compare two documents in this query's sort order.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let by_field = match &self.order_by {
            Some(field) => compare_values(a.get_path(field), b.get_path(field)),
            None => Ordering::Equal,
        };
        by_field.then_with(|| a.id.cmp(&b.id))
    }

    /// Answer the query over an unordered set of candidate documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails [`Query::validate`].
    pub fn evaluate(&self, docs: impl IntoIterator<Item = Document>) -> Result<Vec<Document>> {
        self.validate()?;

        let mut matched: Vec<Document> = docs.into_iter().filter(|d| self.matches(d)).collect();
        matched.sort_by(|a, b| self.compare(a, b));

        let start = match &self.start_after {
            Some(anchor) => matched.partition_point(|d| self.compare(d, anchor) != Ordering::Greater),
            None => 0,
        };
        let limit = self.limit.unwrap_or(usize::MAX);

        Ok(matched
            .into_iter()
            .skip(start)
            .take(limit)
            .map(|d| match &self.select {
                Some(fields) => d.select(fields),
                None => d,
            })
            .collect())
    }

    /// Count matching documents, ignoring order, anchor, limit and projection.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails [`Query::validate`].
    pub fn count<'a>(&self, docs: impl IntoIterator<Item = &'a Document>) -> Result<u64> {
        self.validate()?;
        Ok(docs.into_iter().filter(|d| self.matches(d)).count() as u64)
    }
}

/// Total order over optional JSON values.
///
/// Missing and null sort first, then booleans, numbers, strings, arrays
/// and objects.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentId;
    use serde_json::json;

    fn doc(id: &str, fields: Value) -> Document {
        Document::new(
            DocumentId::new(id).unwrap(),
            fields.as_object().unwrap().clone(),
        )
    }

    fn animals() -> Vec<Document> {
        vec![
            doc(
                "b",
                json!({ "classId": "aves", "name": { "en": "Barn owl" }, "tokens": ["barn", "owl"] }),
            ),
            doc(
                "a",
                json!({ "classId": "mammalia", "name": { "en": "Red fox" }, "tokens": ["red", "fox"] }),
            ),
            doc(
                "c",
                json!({ "classId": "mammalia", "name": { "en": "Arctic fox" }, "tokens": ["arctic", "fox"] }),
            ),
            doc("d", json!({ "classId": "mammalia" })),
        ]
    }

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn orders_by_field_with_missing_first() {
        let result = Query::collection("species")
            .order_by("name.en")
            .evaluate(animals())
            .unwrap();
        assert_eq!(ids(&result), ["d", "c", "b", "a"]);
    }

    #[test]
    fn equality_and_membership_combine() {
        let result = Query::collection("species")
            .filter(FieldFilter::eq("classId", "mammalia"))
            .filter(FieldFilter::array_contains_any(
                "tokens",
                vec!["fox".into(), "owl".into()],
            ))
            .order_by("name.en")
            .evaluate(animals())
            .unwrap();
        assert_eq!(ids(&result), ["c", "a"]);
    }

    #[test]
    fn or_matches_either_branch() {
        let filter = FieldFilter::or(vec![
            FieldFilter::array_contains_any("tokens", vec!["owl".into()]),
            FieldFilter::eq("name.en", "Red fox"),
        ]);
        let result = Query::collection("species")
            .filter(filter)
            .evaluate(animals())
            .unwrap();
        assert_eq!(ids(&result), ["a", "b"]);
    }

    #[test]
    fn start_after_anchor_and_limit() {
        let query = Query::collection("species").order_by("name.en");
        let all = query.clone().evaluate(animals()).unwrap();

        let page = query
            .start_after(Some(all[1].clone()))
            .limit(1)
            .evaluate(animals())
            .unwrap();
        assert_eq!(ids(&page), ["b"]);
    }

    #[test]
    fn anchor_outside_filter_still_positions() {
        let anchor = doc("zz", json!({ "name": { "en": "Badger" } }));
        let result = Query::collection("species")
            .order_by("name.en")
            .start_after(Some(anchor))
            .evaluate(animals())
            .unwrap();
        assert_eq!(ids(&result), ["b", "a"]);
    }

    #[test]
    fn projection_drops_other_fields() {
        let result = Query::collection("species")
            .select(["classId"])
            .limit(1)
            .evaluate(animals())
            .unwrap();
        assert_eq!(result[0].fields.len(), 1);
    }

    #[test]
    fn count_ignores_limit() {
        let query = Query::collection("species")
            .filter(FieldFilter::eq("classId", "mammalia"))
            .limit(1);
        assert_eq!(query.count(&animals()).unwrap(), 3);
    }

    #[test]
    fn rejects_oversized_membership() {
        let values = (0..11).map(|i| format!("t{}", i)).collect();
        let query = Query::collection("species")
            .filter(FieldFilter::array_contains_any("tokens", values));
        assert!(query.evaluate(animals()).is_err());
    }

    #[test]
    fn numbers_sort_numerically() {
        assert_eq!(
            compare_values(Some(&json!(2)), Some(&json!(10))),
            Ordering::Less
        );
        assert_eq!(compare_values(None, Some(&json!("a"))), Ordering::Less);
    }
}
