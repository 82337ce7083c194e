// Google Sheets v4 REST backend
//
// Reads whole tabs through the values API and appends booking rows with
// USER_ENTERED input so the sheet applies its own number/date formatting.
// Authenticates with a bearer OAuth access token supplied by configuration.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::Value;

use super::{records_from_rows, SheetStore};
use crate::error::SheetError;
use crate::models::Record;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpreadsheetMeta {
    spreadsheet_id: String,
    #[serde(default)]
    properties: Option<SpreadsheetProperties>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetProperties {
    #[serde(default)]
    title: String,
}

#[derive(Clone)]
pub struct GoogleSheets {
    client: Client,
    api_base: Url,
    spreadsheet_id: String,
    access_token: Option<String>,
}

impl GoogleSheets {
    pub fn new(
        api_base: &str,
        spreadsheet_id: &str,
        access_token: Option<String>,
    ) -> Result<Self, SheetError> {
        let api_base = Url::parse(api_base)
            .map_err(|e| SheetError::Malformed(format!("invalid API base '{}': {}", api_base, e)))?;

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_base,
            spreadsheet_id: spreadsheet_id.to_string(),
            access_token,
        })
    }

    /// Build a client and confirm the spreadsheet is reachable.
    pub async fn connect(
        api_base: &str,
        spreadsheet_id: &str,
        access_token: Option<String>,
    ) -> Result<Self, SheetError> {
        let sheets = Self::new(api_base, spreadsheet_id, access_token)?;

        let mut url = sheets.url(&[])?;
        url.query_pairs_mut()
            .append_pair("fields", "spreadsheetId,properties.title");

        let response = sheets.send(sheets.client.get(url)).await?;
        let meta: SpreadsheetMeta = response
            .json()
            .await
            .map_err(|e| SheetError::Malformed(e.to_string()))?;

        let title = meta.properties.map(|p| p.title).unwrap_or_default();
        tracing::info!("Connected to spreadsheet {} ({})", meta.spreadsheet_id, title);

        Ok(sheets)
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// `{base}/v4/spreadsheets/{id}/{extra...}` with each segment escaped.
    fn url(&self, extra: &[&str]) -> Result<Url, SheetError> {
        let mut url = self.api_base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SheetError::Malformed("API base cannot be a base URL".to_string()))?;
            segments
                .pop_if_empty()
                .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str()])
                .extend(extra);
        }
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, SheetError> {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(SheetError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl SheetStore for GoogleSheets {
    async fn records(&self, tab: &str) -> Result<Vec<Record>, SheetError> {
        let mut url = self.url(&["values", tab])?;
        url.query_pairs_mut()
            .append_pair("majorDimension", "ROWS")
            .append_pair("valueRenderOption", "FORMATTED_VALUE");

        let response = match self.send(self.client.get(url)).await {
            // The values API reports an unknown tab as an unparseable range
            Err(SheetError::Status { status: 400, body })
                if body.contains("Unable to parse range") =>
            {
                return Err(SheetError::TabNotFound(tab.to_string()));
            }
            other => other?,
        };

        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| SheetError::Malformed(e.to_string()))?;

        tracing::debug!("Read {} rows from {}", range.values.len(), tab);
        Ok(records_from_rows(&range.values))
    }

    async fn append_row(&self, tab: &str, row: Vec<Value>) -> Result<(), SheetError> {
        let append = format!("{}:append", tab);
        let mut url = self.url(&["values", append.as_str()])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let body = serde_json::json!({
            "majorDimension": "ROWS",
            "values": [row],
        });

        self.send(self.client.post(url).json(&body)).await?;
        tracing::debug!("Appended row to {}", tab);
        Ok(())
    }
}
