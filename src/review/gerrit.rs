//! Gerrit review service implementation

use crate::auth::GerritCredentials;
use crate::error::{Error, Result};
use crate::review::ReviewService;
use crate::types::{Change, ChangeKey, ChangeOption, ChangeStatus, GerritConfig, Label};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Gerrit service using reqwest
pub struct GerritService {
    client: Client,
    credentials: Option<GerritCredentials>,
    config: GerritConfig,
}

/// Prefix Gerrit puts in front of every JSON body
const XSSI_PREFIX: &str = ")]}'";

/// Timestamp layout used by the Gerrit REST API (always UTC)
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Default request timeout in seconds
///
/// Generous because a submit with `wait_for_merge` blocks until the merge ran.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Deserialize)]
struct ChangeInfo {
    #[serde(rename = "_number")]
    number: u64,
    project: String,
    branch: String,
    change_id: String,
    #[serde(default)]
    subject: String,
    status: String,
    current_revision: Option<String>,
    #[serde(default)]
    mergeable: bool,
    #[serde(default)]
    labels: BTreeMap<String, LabelInfo>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    updated: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct LabelInfo {
    #[serde(default)]
    optional: bool,
    approved: Option<AccountInfo>,
    rejected: Option<AccountInfo>,
}

#[derive(Deserialize)]
struct AccountInfo {
    #[serde(rename = "_account_id")]
    account_id: Option<u64>,
    name: Option<String>,
    email: Option<String>,
    username: Option<String>,
}

impl AccountInfo {
    fn display_name(self) -> String {
        self.name
            .or(self.username)
            .or(self.email)
            .or_else(|| self.account_id.map(|id| id.to_string()))
            .unwrap_or_else(|| "unknown".to_string())
    }
}

#[derive(Serialize)]
struct SubmitInput {
    wait_for_merge: bool,
}

fn deserialize_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| {
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT)
            .map(|t| t.and_utc())
            .map_err(serde::de::Error::custom)
    })
    .transpose()
}

impl From<ChangeInfo> for Change {
    fn from(info: ChangeInfo) -> Self {
        Self {
            number: info.number,
            project: info.project,
            branch: info.branch,
            change_id: info.change_id,
            subject: info.subject,
            status: ChangeStatus::from(info.status),
            current_revision: info.current_revision,
            mergeable: info.mergeable,
            labels: info
                .labels
                .into_iter()
                .map(|(name, label)| {
                    (
                        name,
                        Label {
                            optional: label.optional,
                            approved: label.approved.map(AccountInfo::display_name),
                            rejected: label.rejected.map(AccountInfo::display_name),
                        },
                    )
                })
                .collect(),
            updated: info.updated,
        }
    }
}

/// Decode a Gerrit JSON body, dropping the XSSI guard line
pub(crate) fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T> {
    let body = body.strip_prefix(XSSI_PREFIX).unwrap_or(body);
    Ok(serde_json::from_str(body)?)
}

impl GerritService {
    /// Create a new Gerrit service
    pub fn new(config: GerritConfig, credentials: Option<GerritCredentials>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            credentials,
            config,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/a{}", self.config.url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(credentials) => credentials.apply(request),
            None => request,
        }
    }

    /// Read a response body, turning error statuses into errors
    async fn read_body(response: Response, what: &str) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;

        match status {
            s if s.is_success() => Ok(body),
            StatusCode::NOT_FOUND => Err(Error::ChangeNotFound(what.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Auth(format!(
                "Gerrit rejected credentials ({status}) for {what}"
            ))),
            _ => Err(Error::Gerrit(format!("{what}: {status}: {}", body.trim()))),
        }
    }

    /// Name of the account the credentials belong to
    pub async fn current_account(&self) -> Result<String> {
        let url = self.api_url("/accounts/self");
        let response = self.authorize(self.client.get(&url)).send().await?;
        let body = Self::read_body(response, "accounts/self").await?;
        let account: AccountInfo = decode_json(&body)?;
        Ok(account.display_name())
    }
}

#[async_trait]
impl ReviewService for GerritService {
    async fn get_change(&self, key: &ChangeKey, options: &[ChangeOption]) -> Result<Change> {
        let url = self.api_url(&format!("/changes/{key}"));
        let query: Vec<(&str, &str)> = options.iter().map(|o| ("o", o.as_str())).collect();

        debug!("GET {url} {query:?}");

        let response = self
            .authorize(self.client.get(&url))
            .query(&query)
            .send()
            .await?;

        let body = Self::read_body(response, &key.to_string()).await?;
        let info: ChangeInfo = decode_json(&body)?;
        Ok(info.into())
    }

    async fn submit(&self, key: &ChangeKey, wait_for_merge: bool) -> Result<()> {
        let url = self.api_url(&format!("/changes/{key}/submit"));

        debug!("POST {url} wait_for_merge={wait_for_merge}");

        let response = self
            .authorize(self.client.post(&url))
            .json(&SubmitInput { wait_for_merge })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            // The reply is a ChangeInfo still in SUBMITTED state; callers
            // refetch with the details they need.
            return Ok(());
        }

        let body = response.text().await?;
        let reason = body.trim();
        Err(Error::SubmitRejected(if reason.is_empty() {
            status.to_string()
        } else {
            reason.to_string()
        }))
    }

    fn config(&self) -> &GerritConfig {
        &self.config
    }
}
