use super::{parse_json_body, relay};
use crate::{
    auth::google::{service_account_token, SHEETS_SCOPE},
    errors::AppError,
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::Method,
    response::Response,
};
use reqwest::{RequestBuilder, Url};
use serde::Deserialize;
use tracing::info;

const CONTEXT: &str = "Failed to process Sheets API request";

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SheetsQuery {
    pub action: Option<String>,
    pub range: Option<String>,
    pub update_range: Option<String>,
}

/// What the client asked the spreadsheet to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetAction {
    Read { range: String },
    Append { range: String },
    Update { range: String },
}

impl SheetAction {
    /// Resolves the action from the query. `GET` always reads; `range`
    /// defaults to the whole configured sheet.
    pub fn resolve(method: &Method, query: &SheetsQuery, sheet_name: &str) -> Result<Self, AppError> {
        let range = query
            .range
            .clone()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| sheet_name.to_string());
        match query.action.as_deref() {
            _ if *method == Method::GET => Ok(SheetAction::Read { range }),
            Some("read") => Ok(SheetAction::Read { range }),
            Some("append") => Ok(SheetAction::Append { range }),
            Some("update") => Ok(SheetAction::Update {
                range: query
                    .update_range
                    .clone()
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or(range),
            }),
            _ => Err(AppError::BadRequest(
                "Invalid action parameter. Use: read, append, or update".to_string(),
            )),
        }
    }
}

/// Builds `<base>/<sheet id>/values/<range>[:append]`.
fn values_url(base: &str, sheet_id: &str, range_segment: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(base).map_err(|e| AppError::upstream(CONTEXT, e))?;
    url.path_segments_mut()
        .map_err(|_| AppError::Configuration(Some("sheets_api_base cannot be a base URL".to_string())))?
        .pop_if_empty()
        .push(sheet_id)
        .push("values")
        .push(range_segment);
    Ok(url)
}

/// `GET|POST /api/sheets?action=read|append|update&range=..&updateRange=..`
pub async fn sheets_handler(
    State(app_state): State<AppState>,
    method: Method,
    Query(query): Query<SheetsQuery>,
    body: Bytes,
) -> Result<Response, AppError> {
    let config = &app_state.config;
    let sheet_id = config.sheet_id().ok_or(AppError::Configuration(None))?;
    let service_account = config.service_account();
    if service_account.is_none() && config.sheets_key().is_none() {
        return Err(AppError::Configuration(None));
    }

    let action = SheetAction::resolve(&method, &query, &config.sheet_name)?;
    info!(?action, "Forwarding Sheets request");

    let request: RequestBuilder = match &action {
        SheetAction::Read { range } => {
            app_state
                .http
                .get(values_url(&config.sheets_api_base, sheet_id, range)?)
        }
        SheetAction::Append { range } => {
            let payload = parse_json_body(&body, CONTEXT)?;
            let url = values_url(&config.sheets_api_base, sheet_id, &format!("{range}:append"))?;
            app_state
                .http
                .post(url)
                .query(&[("valueInputOption", "USER_ENTERED")])
                .json(&payload)
        }
        SheetAction::Update { range } => {
            let payload = parse_json_body(&body, CONTEXT)?;
            let url = values_url(&config.sheets_api_base, sheet_id, range)?;
            app_state
                .http
                .put(url)
                .query(&[("valueInputOption", "USER_ENTERED")])
                .json(&payload)
        }
    };

    let request = match (&service_account, config.sheets_key()) {
        (Some(account), _) => {
            let token = service_account_token(
                &app_state.http,
                &config.oauth_token_url,
                account,
                SHEETS_SCOPE,
            )
            .await
            .map_err(|e| AppError::upstream(CONTEXT, e))?;
            request.bearer_auth(token)
        }
        (None, Some(key)) => request.query(&[("key", key)]),
        (None, None) => return Err(AppError::Configuration(None)),
    };

    let response = request
        .send()
        .await
        .map_err(|e| AppError::upstream(CONTEXT, e))?;
    relay(response, CONTEXT).await
}
