//! Axum extractor for raw form submissions
//!
//! `FormFields` accepts `application/x-www-form-urlencoded` bodies and flat
//! JSON objects. Nothing is validated here; that is the schema's job.

use crate::core::error::{DashboardError, RequestError};
use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::Value;
use std::collections::HashMap;

/// Field name → raw submitted text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build from a JSON object. Strings, numbers and booleans are kept as
    /// text; nulls count as absent; nested values are rejected.
    pub fn from_json(value: Value) -> Result<Self, RequestError> {
        let Value::Object(map) = value else {
            return Err(RequestError::MalformedForm {
                message: "expected a JSON object".to_string(),
            });
        };

        let mut fields = HashMap::with_capacity(map.len());
        for (key, value) in map {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(RequestError::MalformedForm {
                        message: format!("field '{}' must be a scalar", key),
                    });
                }
            };
            fields.insert(key, text);
        }
        Ok(Self(fields))
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = DashboardError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields): Form<HashMap<String, String>> = Form::from_request(req, state)
                .await
                .map_err(|e| RequestError::MalformedForm {
                    message: e.body_text(),
                })?;
            Ok(Self(fields))
        } else if content_type.starts_with("application/json") {
            let Json(value): Json<Value> =
                Json::from_request(req, state)
                    .await
                    .map_err(|e| RequestError::MalformedForm {
                        message: e.body_text(),
                    })?;
            Ok(Self::from_json(value)?)
        } else {
            Err(RequestError::UnsupportedMediaType { content_type }.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_pairs_lookup() {
        let fields = FormFields::from_pairs([("customerId", "c1")]);
        assert_eq!(fields.get("customerId"), Some("c1"));
        assert_eq!(fields.get("amount"), None);
    }

    #[test]
    fn test_from_json_stringifies_scalars() {
        let fields = FormFields::from_json(json!({
            "amount": 9.99,
            "status": "paid",
            "flag": true
        }))
        .unwrap();

        assert_eq!(fields.get("amount"), Some("9.99"));
        assert_eq!(fields.get("status"), Some("paid"));
        assert_eq!(fields.get("flag"), Some("true"));
    }

    #[test]
    fn test_from_json_null_is_absent() {
        let fields = FormFields::from_json(json!({ "status": null })).unwrap();
        assert!(fields.get("status").is_none());
        assert!(fields.is_empty());
    }

    #[test]
    fn test_from_json_rejects_nested_values() {
        let err = FormFields::from_json(json!({ "amount": [1, 2] })).unwrap_err();
        assert!(matches!(err, RequestError::MalformedForm { .. }));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(FormFields::from_json(json!("paid")).is_err());
    }
}
