use crate::cli::SortKey;
use crate::model::{Release, SearchPage};
use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use thiserror::Error;

const SEARCH_LIMIT_MESSAGE: &str = "Only the first 1000 search results are available";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("请求失败: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API返回错误 (状态码: {status}) {message}")]
    Status { status: u16, message: String },
    #[error("已达到GitHub搜索API限制（最多返回1000条结果）")]
    SearchLimit,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait GitHubApi {
    fn search_repositories(
        &self,
        topic: &str,
        sort: SortKey,
        per_page: usize,
        page: usize,
    ) -> Result<SearchPage, ApiError>;

    fn latest_release(&self, full_name: &str) -> Result<Release, ApiError>;
}

pub struct GitHub {
    client: Client,
    api_url: String,
}

impl GitHub {
    pub fn new(token: &str, api_url: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("AppImageFinder/{}", env!("CARGO_PKG_VERSION")))?,
        );
        let client = Client::builder().default_headers(headers).build()?;
        Ok(GitHub {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().unwrap_or_default();
    if status == StatusCode::UNPROCESSABLE_ENTITY && text.contains(SEARCH_LIMIT_MESSAGE) {
        return Err(ApiError::SearchLimit);
    }
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.message)
        .unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

impl GitHubApi for GitHub {
    fn search_repositories(
        &self,
        topic: &str,
        sort: SortKey,
        per_page: usize,
        page: usize,
    ) -> Result<SearchPage, ApiError> {
        let url = format!("{}/search/repositories", self.api_url);
        debug!("GET {url} topic={topic} sort={sort} per_page={per_page} page={page}");
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("q", format!("topic:{topic}")),
                ("sort", sort.to_string()),
                ("order", "desc".to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ])
            .send()?;
        Ok(check_status(resp)?.json()?)
    }

    fn latest_release(&self, full_name: &str) -> Result<Release, ApiError> {
        let url = format!("{}/repos/{}/releases/latest", self.api_url, full_name);
        debug!("GET {url}");
        let resp = self.client.get(&url).send()?;
        Ok(check_status(resp)?.json()?)
    }
}
