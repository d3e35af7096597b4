use std::{error, fmt};

use async_trait::async_trait;
use model::location::{NewRepairLocation, RepairLocation};
use query::{table_path, Accept, Select};
use repair_directory::store::{collect_valid_rows, LocationStore, StoreError, StoreResult, TABLE};
use reqwest::{header, StatusCode};
use row::{InsertRow, LocationRow};
use serde::{de::DeserializeOwned, Deserialize};
use utility::id::Id;

pub mod query;
pub mod row;

#[derive(Debug, Clone)]
pub struct SupabaseCredentials {
    pub url: String,
    pub anon_key: String,
}

impl SupabaseCredentials {
    pub fn new<U: Into<String>, K: Into<String>>(url: U, anon_key: K) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_owned(),
            anon_key: anon_key.into(),
        }
    }
}

/// The error object PostgREST puts in non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostgrestError {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    RequestError(reqwest::Error),
    InvalidHeader(String),
    InvalidResponse {
        status_code: StatusCode,
        url: String,
        error: Option<PostgrestError>,
        response: Option<String>,
    },
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::InvalidHeader(e) => write!(f, "Invalid header value: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                error,
                response,
            } => match (error.as_ref().and_then(|e| e.message.as_ref()), response) {
                (Some(message), _) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, message, url)
                }
                (None, Some(text)) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                (None, None) => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(e)
    }
}

impl From<ApiError> for StoreError {
    fn from(why: ApiError) -> Self {
        let absence = match &why {
            // `single()` found zero or several rows
            ApiError::InvalidResponse {
                status_code, error, ..
            } if *status_code == StatusCode::NOT_ACCEPTABLE => {
                let details = error
                    .as_ref()
                    .and_then(|error| error.details.as_deref())
                    .unwrap_or_default();
                if details.contains(" 0 rows") {
                    Some(StoreError::NotFound)
                } else {
                    Some(StoreError::Ambiguous)
                }
            }
            _ => None,
        };
        absence.unwrap_or_else(|| StoreError::Other(Box::new(why)))
    }
}

/// `repair_locations` behind a Supabase/PostgREST gateway.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: reqwest::Client,
    credentials: SupabaseCredentials,
}

impl SupabaseStore {
    pub fn new(credentials: SupabaseCredentials) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        let key = header::HeaderValue::from_str(&credentials.anon_key)
            .map_err(|why| ApiError::InvalidHeader(why.to_string()))?;
        let bearer = header::HeaderValue::from_str(&format!("Bearer {}", credentials.anon_key))
            .map_err(|why| ApiError::InvalidHeader(why.to_string()))?;
        headers.insert("apikey", key);
        headers.insert(header::AUTHORIZATION, bearer);

        let client = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.credentials.url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.credentials.url, path)
    }

    pub async fn select<T: DeserializeOwned>(&self, select: &Select) -> Result<T, ApiError> {
        let url = self.url(&select.path());
        log::debug!("Requesting '{url}'.");
        let response = self
            .client
            .get(&url)
            .query(&select.query_pairs())
            .header(header::ACCEPT, select.accept().text())
            .send()
            .await?;
        parse_response(url, response).await
    }

    pub async fn insert_returning<B, T>(&self, table: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(&table_path(table));
        log::debug!("Inserting into '{url}'.");
        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, Accept::SingleObject.text())
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        parse_response(url, response).await
    }
}

async fn parse_response<T: DeserializeOwned>(
    url: String,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status_code = response.status();
    if status_code.is_success() {
        return Ok(response.json().await?);
    }

    let response = response.text().await.ok();
    let error = response
        .as_deref()
        .and_then(|text| serde_json::from_str::<PostgrestError>(text).ok());
    Err(ApiError::InvalidResponse {
        status_code,
        url,
        error,
        response,
    })
}

#[async_trait]
impl LocationStore for SupabaseStore {
    async fn select_all_newest_first(&self) -> StoreResult<Vec<RepairLocation>> {
        let rows: Vec<serde_json::Value> = self
            .select(&Select::from(TABLE).order("created_at", false))
            .await?;
        Ok(collect_valid_rows(
            rows.into_iter()
                .map(|row| LocationRow::decode(row).map(LocationRow::to_model)),
        ))
    }

    async fn select_single(&self, id: &Id<RepairLocation>) -> StoreResult<RepairLocation> {
        let row: LocationRow = self
            .select(&Select::from(TABLE).eq("id", id).single())
            .await?;
        Ok(row.to_model())
    }

    async fn insert(&self, location: NewRepairLocation) -> StoreResult<RepairLocation> {
        let row: LocationRow = self
            .insert_returning(TABLE, &InsertRow::from(location))
            .await?;
        Ok(row.to_model())
    }
}
