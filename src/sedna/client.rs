//! HTTP client for the Sedna portal.

use std::time::{Duration, Instant};

use anyhow::Context;
use reqwest::{Client, header};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::sedna::errors::SednaError;
use crate::sedna::models::{Class, Department, ScheduleEvent, School, Semester, Subclass};
use crate::sedna::spacer::RequestSpacer;
use crate::sedna::{extract, schedule};
use crate::utils::log_if_slow;

pub const DEFAULT_BASE_URL: &str = "https://sedna.univ-fcomte.fr/jsp/custom/ufc/";

const USER_AGENT: &str = concat!("timetable/", env!("CARGO_PKG_VERSION"));
const SLOW_REQUEST: Duration = Duration::from_secs(3);

/// The two pages the portal serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `mselect.jsp`: hierarchy listings.
    Select,
    /// `mplanif.jsp`: planning for one subclass.
    Planning,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Select => "mselect.jsp",
            Self::Planning => "mplanif.jsp",
        }
    }
}

/// Fetches Sedna pages and runs them through the extractors.
///
/// Requests are spaced by a shared [`RequestSpacer`]; nothing is cached and
/// failures are not retried.
pub struct SednaClient {
    http: Client,
    select_url: Url,
    planning_url: Url,
    spacer: RequestSpacer,
}

impl SednaClient {
    pub fn new_with_config(
        base_url: &str,
        request_interval: Duration,
        request_timeout: Duration,
    ) -> anyhow::Result<Self> {
        // Without a trailing slash, `join` would replace the last path segment.
        let base = if base_url.ends_with('/') {
            Url::parse(base_url)
        } else {
            Url::parse(&format!("{base_url}/"))
        }
        .with_context(|| format!("Invalid Sedna base URL: {base_url}"))?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("fr-FR,fr;q=0.9,en;q=0.5"),
        );

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            select_url: base.join(Endpoint::Select.path())?,
            planning_url: base.join(Endpoint::Planning.path())?,
            http,
            spacer: RequestSpacer::new(request_interval),
        })
    }

    fn url(&self, endpoint: Endpoint) -> &Url {
        match endpoint {
            Endpoint::Select => &self.select_url,
            Endpoint::Planning => &self.planning_url,
        }
    }

    /// Issue one spaced GET and check the status.
    async fn fetch(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
    ) -> Result<reqwest::Response, SednaError> {
        self.spacer.acquire().await;

        let url = self.url(endpoint);
        debug!(url = %url, ?params, "Fetching Sedna page");
        let start = Instant::now();

        let result = self
            .http
            .get(url.clone())
            .query(params)
            .send()
            .await
            .and_then(|response| response.error_for_status());
        log_if_slow(start, SLOW_REQUEST, endpoint.path());

        result.map_err(|e| {
            let err = SednaError::transport(e);
            warn!(endpoint = endpoint.path(), status = ?err.http_status(), error = %err, "Sedna request failed");
            err
        })
    }

    /// Raw hierarchy page. `None` fetches the root listing.
    pub async fn fetch_listing(&self, id: Option<&str>) -> Result<String, SednaError> {
        let params: Vec<(&str, String)> = id.map(|id| ("id", id.to_string())).into_iter().collect();
        let response = self.fetch(Endpoint::Select, &params).await?;
        response.text().await.map_err(SednaError::transport)
    }

    /// Raw planning page bytes, left undecoded.
    pub async fn fetch_planning(&self, subclass_id: &str, days: u32) -> Result<Vec<u8>, SednaError> {
        let params = [("id", subclass_id.to_string()), ("jours", days.to_string())];
        let response = self.fetch(Endpoint::Planning, &params).await?;
        let bytes = response.bytes().await.map_err(SednaError::transport)?;
        Ok(bytes.to_vec())
    }

    #[instrument(skip(self))]
    pub async fn departments(&self) -> Result<Vec<Department>, SednaError> {
        let html = self.fetch_listing(None).await?;
        extract::departments(&html)
    }

    #[instrument(skip(self))]
    pub async fn schools(&self, department_id: &str) -> Result<Vec<School>, SednaError> {
        let html = self.fetch_listing(Some(department_id)).await?;
        extract::schools(&html, department_id)
    }

    #[instrument(skip(self))]
    pub async fn semesters(&self, school_id: &str) -> Result<Vec<Semester>, SednaError> {
        let html = self.fetch_listing(Some(school_id)).await?;
        extract::semesters(&html, school_id)
    }

    #[instrument(skip(self))]
    pub async fn classes(&self, semester_id: &str) -> Result<Vec<Class>, SednaError> {
        let html = self.fetch_listing(Some(semester_id)).await?;
        extract::classes(&html, semester_id)
    }

    #[instrument(skip(self))]
    pub async fn subclasses(&self, class_id: &str) -> Result<Vec<Subclass>, SednaError> {
        let html = self.fetch_listing(Some(class_id)).await?;
        extract::subclasses(&html, class_id)
    }

    /// Events for `subclass_id` over the next `days` days.
    #[instrument(skip(self))]
    pub async fn schedule(
        &self,
        subclass_id: &str,
        days: u32,
    ) -> Result<Vec<ScheduleEvent>, SednaError> {
        let bytes = self.fetch_planning(subclass_id, days).await?;
        schedule::extract_schedule(&bytes, subclass_id, days)
    }
}
