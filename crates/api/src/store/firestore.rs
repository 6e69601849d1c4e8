//! Firestore REST v1 client.
//!
//! Talks to `firestore.googleapis.com` with the service-account token
//! provider. Document ids are embedded in the resource path
//! (`projects/{p}/databases/(default)/documents/{collection}/{id}`).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::instrument;

use super::{DocumentStore, StoreError, fields_from_document, fields_to_document};
use crate::google::TokenProvider;

/// Page size for collection listing.
const LIST_PAGE_SIZE: u32 = 300;

/// Client for the Firestore REST v1 API.
pub struct FirestoreClient {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<TokenProvider>,
}

impl FirestoreClient {
    /// Create a client for the given project's `(default)` database.
    #[must_use]
    pub fn new(project_id: &str, tokens: Arc<TokenProvider>) -> Self {
        let base_url = format!(
            "https://firestore.googleapis.com/v1/projects/{project_id}/databases/(default)/documents"
        );
        Self {
            client: reqwest::Client::new(),
            base_url,
            tokens,
        }
    }

    fn doc_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.base_url)
    }

    async fn bearer(&self) -> Result<String, StoreError> {
        Ok(self.tokens.token().await?)
    }

    /// Turn a non-success response into a `StoreError`, mapping 404 onto
    /// `NotFound` for the given document.
    async fn check(
        response: reqwest::Response,
        collection: &str,
        id: &str,
    ) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    #[instrument(skip(self, fields))]
    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        // PATCH without an update mask replaces the whole document,
        // creating it if absent
        let response = self
            .client
            .patch(self.doc_url(collection, id))
            .bearer_auth(self.bearer().await?)
            .json(&json!({"fields": fields_to_document(&fields)}))
            .send()
            .await?;

        Self::check(response, collection, id).await?;
        Ok(())
    }

    #[instrument(skip(self, fields))]
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        // An update mask limits the write to the named top-level fields;
        // the existence precondition rejects updates to absent documents
        let mut query: Vec<(&str, String)> = fields
            .keys()
            .map(|name| ("updateMask.fieldPaths", name.clone()))
            .collect();
        query.push(("currentDocument.exists", "true".to_string()));

        let response = self
            .client
            .patch(self.doc_url(collection, id))
            .query(&query)
            .bearer_auth(self.bearer().await?)
            .json(&json!({"fields": fields_to_document(&fields)}))
            .send()
            .await?;

        Self::check(response, collection, id).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.doc_url(collection, id))
            .bearer_auth(self.bearer().await?)
            .send()
            .await?;

        Self::check(response, collection, id).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        let response = self
            .client
            .get(self.doc_url(collection, id))
            .bearer_auth(self.bearer().await?)
            .send()
            .await?;

        let response = Self::check(response, collection, id).await?;
        let document: Value = response.json().await?;
        Ok(fields_from_document(
            document.get("fields").unwrap_or(&Value::Null),
        ))
    }

    #[instrument(skip(self))]
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", LIST_PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self
                .client
                .get(format!("{}/{collection}", self.base_url))
                .query(&query)
                .bearer_auth(self.bearer().await?)
                .send()
                .await?;

            let response = Self::check(response, collection, "").await?;
            let page: Value = response.json().await?;

            if let Some(items) = page.get("documents").and_then(Value::as_array) {
                documents.extend(items.iter().map(|doc| {
                    fields_from_document(doc.get("fields").unwrap_or(&Value::Null))
                }));
            }

            match page.get("nextPageToken").and_then(Value::as_str) {
                Some(token) => page_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(documents)
    }

    #[instrument(skip(self))]
    async fn query_prefix(
        &self,
        collection: &str,
        field: &str,
        prefix: &str,
    ) -> Result<Vec<Value>, StoreError> {
        // Lexicographic range trick: field >= prefix AND field <= prefix + "z"
        let upper = format!("{prefix}z");
        let body = json!({
            "structuredQuery": {
                "from": [{"collectionId": collection}],
                "where": {
                    "compositeFilter": {
                        "op": "AND",
                        "filters": [
                            {
                                "fieldFilter": {
                                    "field": {"fieldPath": field},
                                    "op": "GREATER_THAN_OR_EQUAL",
                                    "value": {"stringValue": prefix}
                                }
                            },
                            {
                                "fieldFilter": {
                                    "field": {"fieldPath": field},
                                    "op": "LESS_THAN_OR_EQUAL",
                                    "value": {"stringValue": upper}
                                }
                            }
                        ]
                    }
                }
            }
        });

        let response = self
            .client
            .post(format!("{}:runQuery", self.base_url))
            .bearer_auth(self.bearer().await?)
            .json(&body)
            .send()
            .await?;

        let response = Self::check(response, collection, "").await?;
        let results: Vec<Value> = response.json().await?;

        // Each result holds either a matched document or only a read time
        Ok(results
            .iter()
            .filter_map(|entry| entry.get("document"))
            .map(|doc| fields_from_document(doc.get("fields").unwrap_or(&Value::Null)))
            .collect())
    }
}
