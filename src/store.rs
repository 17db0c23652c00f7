use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::sync::{PoisonError, RwLock};

use crate::error::StoreError;
use crate::models::ContactRecord;

const CONTACT_COLUMNS: &str = "address,phone,email,hours,location_image";

// Read access to the contact information table
#[async_trait]
pub trait ContactStore: Send + Sync + 'static {
    // newest record, None when the table is empty
    async fn latest(&self) -> Result<Option<ContactRecord>, StoreError>;
}

// Hosted Postgres behind a PostgREST endpoint, queried with the service key
pub struct PostgrestContactStore {
    client: reqwest::Client,
    base_url: String,
    table: String,
    service_key: String,
}

impl PostgrestContactStore {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        table: impl Into<String>,
        service_key: impl Into<String>,
    ) -> Self {
        // add https:// if not present
        let base_url = if base_url.starts_with("http") {
            base_url.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", base_url.trim_end_matches('/'))
        };

        Self {
            client,
            base_url,
            table: table.into(),
            service_key: service_key.into(),
        }
    }

    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

#[async_trait]
impl ContactStore for PostgrestContactStore {
    async fn latest(&self) -> Result<Option<ContactRecord>, StoreError> {
        let url = reqwest::Url::parse_with_params(
            &self.table_url(),
            &[
                ("select", CONTACT_COLUMNS),
                ("order", "created_at.desc"),
                ("limit", "1"),
            ],
        )
        .map_err(|e| StoreError::InvalidUrl(e.to_string()))?;

        let res = self
            .client
            .get(url)
            .header("apikey", &self.service_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.service_key))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = res.status();
        let body = res.bytes().await?;

        if !status.is_success() {
            return Err(StoreError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let mut rows: Vec<ContactRecord> = serde_json::from_slice(&body)?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }
}

struct StoredContact {
    created_at: DateTime<Utc>,
    record: ContactRecord,
}

// Process-local contact table for tests and runs without a backend
#[derive(Default)]
pub struct InMemoryContactStore {
    rows: RwLock<Vec<StoredContact>>,
    failure: RwLock<Option<String>>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, created_at: DateTime<Utc>, record: ContactRecord) {
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(StoredContact { created_at, record });
    }

    // Make every following read fail with the given reason
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = Some(reason.into());
    }

    pub fn recover(&self) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn latest(&self) -> Result<Option<ContactRecord>, StoreError> {
        if let Some(reason) = self
            .failure
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(StoreError::Unavailable(reason));
        }

        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Ok(rows
            .iter()
            .max_by_key(|row| row.created_at)
            .map(|row| row.record.clone()))
    }
}
