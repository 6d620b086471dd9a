//! Request and response bodies for the task endpoints

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use task_core::TaskFilter;

/// Body of `POST /api/tasks`
///
/// `title` is optional here so a missing field reaches the handler and is
/// answered with the same 400 as a blank one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Option<String>,
}

/// Accept any scalar as a category; numbers and booleans keep their text form,
/// arrays and objects are dropped
fn lenient_category<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct CategoryVisitor;

    impl<'de> Visitor<'de> for CategoryVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a category")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(self)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(None)
        }
    }

    deserializer.deserialize_any(CategoryVisitor)
}

/// Query string of `GET /api/tasks`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTasksQuery {
    #[serde(default)]
    pub category: Option<String>,
}

impl ListTasksQuery {
    /// Build from decoded query pairs; the first `category` wins
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let category = pairs
            .into_iter()
            .find(|(key, _)| key == "category")
            .map(|(_, value)| value);
        Self { category }
    }
}

impl From<ListTasksQuery> for TaskFilter {
    /// An absent or empty `category` means no filter; anything else matches exactly
    fn from(query: ListTasksQuery) -> Self {
        match query.category {
            Some(category) if !category.is_empty() => TaskFilter::by_category(category),
            _ => TaskFilter::all(),
        }
    }
}

/// Body of a successful `DELETE /api/tasks/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn deleted() -> Self {
        Self {
            status: "deleted".to_string(),
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            details: None,
        }
    }

    pub fn error(details: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            details: Some(details.into()),
        }
    }
}

/// JSON error body, `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_to_filter() {
        let filter: TaskFilter = ListTasksQuery {
            category: Some("ci".to_string()),
        }
        .into();
        assert_eq!(filter, TaskFilter::by_category("ci"));

        for empty in [None, Some(String::new())] {
            let filter: TaskFilter = ListTasksQuery { category: empty }.into();
            assert_eq!(filter, TaskFilter::all());
        }

        // Whitespace is a real value and matches nothing stored
        let filter: TaskFilter = ListTasksQuery {
            category: Some("  ".to_string()),
        }
        .into();
        assert_eq!(filter, TaskFilter::by_category("  "));
    }

    #[test]
    fn test_query_first_category_wins() {
        let query = ListTasksQuery::from_pairs(vec![
            ("page".to_string(), "2".to_string()),
            ("category".to_string(), "ops".to_string()),
            ("category".to_string(), "x".to_string()),
        ]);
        assert_eq!(query.category.as_deref(), Some("ops"));

        assert!(ListTasksQuery::from_pairs(Vec::new()).category.is_none());
    }

    #[test]
    fn test_health_body_shape() {
        let ok = serde_json::to_value(HealthResponse::ok()).unwrap();
        assert_eq!(ok, serde_json::json!({"status": "ok"}));

        let err = serde_json::to_value(HealthResponse::error("refused")).unwrap();
        assert_eq!(err, serde_json::json!({"status": "error", "details": "refused"}));
    }

    #[test]
    fn test_create_request_tolerates_missing_fields() {
        let request: CreateTaskRequest = serde_json::from_str("{}").unwrap();
        assert!(request.title.is_none());
        assert!(request.category.is_none());
    }

    #[test]
    fn test_create_request_accepts_scalar_categories() {
        let cases = [
            (r#"{"title":"C","category":5}"#, Some("5")),
            (r#"{"title":"C","category":true}"#, Some("true")),
            (r#"{"title":"C","category":"ops"}"#, Some("ops")),
            (r#"{"title":"C","category":null}"#, None),
            (r#"{"title":"C","category":["a"]}"#, None),
            (r#"{"title":"C","category":{"a":1}}"#, None),
        ];
        for (body, expected) in cases {
            let request: CreateTaskRequest = serde_json::from_str(body).unwrap();
            assert_eq!(request.title.as_deref(), Some("C"));
            assert_eq!(request.category.as_deref(), expected, "{body}");
        }
    }
}
