//! The OSS Index client.
//!
//! Every lookup is one request/response exchange, or a strictly sequential
//! chain of them. "Not found" is reported as `None` or an empty `Vec`; an
//! `Err` always means the exchange failed.
//!
//! # Example
//!
//! ```no_run
//! use ossindex::{Endpoint, OssIndexClient, PackageQuery};
//!
//! #[tokio::main]
//! async fn main() -> ossindex::Result<()> {
//!     let client = OssIndexClient::new(Endpoint::Production)?;
//!
//!     let queries = vec![
//!         PackageQuery::new("npm", "lodash").with_version("4.17.4"),
//!         PackageQuery::new("npm", "no-such-package").with_version("1.0.0"),
//!     ];
//!     for (query, found) in queries.iter().zip(client.lookup_packages_bulk(&queries).await?) {
//!         println!("{}: {}", query, if found.is_some() { "found" } else { "missing" });
//!     }
//!     Ok(())
//! }
//! ```

mod sequence;

pub use sequence::fold_sequential;

use crate::config::{Config, Endpoint};
use crate::error::{Error, Result};
use crate::model::{
    is_absent, ArtifactResult, CpeDetail, CpeTriple, CveDetail, PackageQuery, PackageRef,
    ScmDetail,
};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Transport};
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, trace, warn};

const ARTIFACT_SEARCH_PATH: &str = "/v1.0/search/artifact/";
const PACKAGE_V2_PATH: &str = "/v2.0/package";

pub struct OssIndexClient<T = HttpTransport> {
    transport: T,
    endpoint: Endpoint,
}

impl OssIndexClient<HttpTransport> {
    /// Creates a client over a default reqwest transport.
    pub fn new(endpoint: Endpoint) -> Result<Self> {
        Ok(Self::with_transport(endpoint, HttpTransport::new()?))
    }

    /// Creates a client from the endpoint and transport options in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = HttpTransport::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(Self::with_transport(config.endpoint()?, builder.build()?))
    }
}

impl<T: Transport> OssIndexClient<T> {
    pub fn with_transport(endpoint: Endpoint, transport: T) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// `GET /v1.0/search/artifact/:pm/:name/:version`
    ///
    /// Returns the best match: the service orders matches best-first, so this
    /// is the first element of the result array.
    pub async fn lookup_package(
        &self,
        package_manager: &str,
        name: &str,
        version: Option<&str>,
    ) -> Result<Option<ArtifactResult>> {
        let mut segments = vec!["v1.0", "search", "artifact", package_manager, name];
        segments.extend(version.filter(|v| !v.is_empty()));

        match self.get_v1(self.segment_url(&segments)?).await? {
            Some(Value::Array(matches)) => Ok(matches
                .into_iter()
                .next()
                .filter(|m| !is_absent(m))
                .map(ArtifactResult::from)),
            _ => Ok(None),
        }
    }

    /// `POST /v1.0/search/artifact/`
    ///
    /// The result has exactly one entry per query, in query order, with
    /// `None` where nothing matched. An empty slice sends no request.
    pub async fn lookup_packages_bulk(
        &self,
        queries: &[PackageQuery],
    ) -> Result<Vec<Option<ArtifactResult>>> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }

        let body = serde_json::to_value(queries)?;
        let entries = match self.post_v1(ARTIFACT_SEARCH_PATH, body).await? {
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                warn!(
                    kind = json_kind(&other),
                    "bulk artifact search returned a non-array body"
                );
                Vec::new()
            }
            None => Vec::new(),
        };

        Ok(align_results(entries, queries.len()))
    }

    /// One [`lookup_package`](Self::lookup_package) per query, in order.
    ///
    /// For services without the bulk endpoint. Stops at the first failed
    /// lookup and returns that error.
    pub async fn lookup_packages_sequential(
        &self,
        queries: &[PackageQuery],
    ) -> Result<Vec<Option<ArtifactResult>>> {
        let results = Vec::with_capacity(queries.len());
        fold_sequential(queries, results, |mut results, query| async move {
            trace!(%query, "sequential artifact lookup");
            let found = self
                .lookup_package(&query.package_manager, &query.name, query.version.as_deref())
                .await?;
            results.push(found);
            Ok(results)
        })
        .await
    }

    /// `GET /v1.0/scm/:id1,:id2,...`
    pub async fn lookup_scm_by_ids<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<ScmDetail>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = join_ids(ids);
        let url = self.segment_url(&["v1.0", "scm", joined.as_str()])?;
        Ok(into_records(self.get_v1(url).await?))
    }

    /// `GET /v1.0/uri/:hostAndPath`
    ///
    /// The scheme is dropped first: `https://github.com/x/y` is looked up as
    /// `github.com/x/y`. The remainder is sent unescaped, slashes included.
    pub async fn lookup_scm_by_uri(&self, uri: &str) -> Result<Option<ScmDetail>> {
        let url = self.url(&format!("/v1.0/uri/{}", strip_scheme(uri)));
        Ok(first_record(self.get_v1(url).await?))
    }

    /// `GET /v1.0/cpe/:part/:vendor/:product`
    pub async fn lookup_cpe(
        &self,
        part: &str,
        vendor: &str,
        product: &str,
    ) -> Result<Vec<CpeDetail>> {
        let url = self.segment_url(&["v1.0", "cpe", part, vendor, product])?;
        Ok(into_records(self.get_v1(url).await?))
    }

    /// Resolves each CPE URI in turn and concatenates the details.
    ///
    /// All URIs are parsed before any request is made. Lookups run one after
    /// another; the first failure ends the walk.
    pub async fn lookup_cpe_details<S: AsRef<str>>(&self, cpe_uris: &[S]) -> Result<Vec<CpeDetail>> {
        let triples = cpe_uris
            .iter()
            .map(|uri| CpeTriple::parse(uri.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        fold_sequential(triples, Vec::new(), |mut details, cpe| async move {
            trace!(%cpe, "sequential CPE lookup");
            details.extend(self.lookup_cpe(&cpe.part, &cpe.vendor, &cpe.product).await?);
            Ok(details)
        })
        .await
    }

    /// `GET /v1.0/cve/:id`
    pub async fn lookup_cve(&self, id: &str) -> Result<Option<CveDetail>> {
        let url = self.segment_url(&["v1.0", "cve", id])?;
        Ok(first_record(self.get_v1(url).await?))
    }

    /// `GET /v1.0/cve/:id1,:id2,...`
    pub async fn lookup_cve_details<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<CveDetail>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = join_ids(ids);
        let url = self.segment_url(&["v1.0", "cve", joined.as_str()])?;
        Ok(into_records(self.get_v1(url).await?))
    }

    /// One [`lookup_cve`](Self::lookup_cve) per id, in order, skipping ids
    /// with no record. Stops at the first failure.
    pub async fn lookup_cve_details_sequential<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<Vec<CveDetail>> {
        fold_sequential(ids, Vec::new(), |mut details, id| async move {
            if let Some(detail) = self.lookup_cve(id.as_ref()).await? {
                details.push(detail);
            }
            Ok(details)
        })
        .await
    }

    /// `POST /v2.0/package`
    ///
    /// Returns the service's JSON as-is (`[]` for an empty body). A non-2xx
    /// answer becomes [`Error::Service`] when the body carries an `error`
    /// field, and [`Error::UnknownServer`] otherwise.
    pub async fn lookup_packages_with_vulnerabilities(
        &self,
        packages: &[PackageRef],
    ) -> Result<Value> {
        if packages.is_empty() {
            return Ok(Value::Array(Vec::new()));
        }

        let request = HttpRequest::post(self.url(PACKAGE_V2_PATH), serde_json::to_value(packages)?);
        let response = self.send(request).await?;

        if !response.is_success() {
            return Err(service_error(&response));
        }

        match response.json()? {
            None | Some(Value::Null) => Ok(Value::Array(Vec::new())),
            Some(body) => Ok(body),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint.base_url(), path)
    }

    /// Appends each segment to the base URL, percent-encoding `/`, `?`, `#`
    /// and the like so a segment can never split or end the path.
    fn segment_url(&self, segments: &[&str]) -> Result<String> {
        let base = self.endpoint.base_url();
        let invalid = || Error::InvalidEndpoint(base.to_string());

        let mut url = Url::parse(base).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, bytes = response.body.len(), "received response");
        Ok(response)
    }

    async fn get_v1(&self, url: String) -> Result<Option<Value>> {
        let response = self.send(HttpRequest::get(url.clone())).await?;
        v1_body(response, url)
    }

    async fn post_v1(&self, path: &str, body: Value) -> Result<Option<Value>> {
        let url = self.url(path);
        let response = self.send(HttpRequest::post(url.clone(), body)).await?;
        v1_body(response, url)
    }
}

/// Body of a v1 answer, with every "nothing here" form mapped to `None`.
///
/// A 404 counts as not found; any other non-2xx status is an error.
fn v1_body(response: HttpResponse, url: String) -> Result<Option<Value>> {
    if response.status == 404 {
        return Ok(None);
    }
    if !response.is_success() {
        return Err(Error::UnexpectedStatus {
            status: response.status,
            url,
        });
    }

    Ok(response.json()?.filter(|body| !is_absent(body)))
}

fn service_error(response: &HttpResponse) -> Error {
    match serde_json::from_slice::<Value>(&response.body) {
        Ok(payload) if payload.get("error").is_some() => Error::Service(payload),
        _ => Error::UnknownServer {
            code: response.status,
        },
    }
}

/// Lines bulk search entries up with the queries that produced them.
///
/// An entry may be a single record or a best-first array of matches. Missing
/// trailing entries become `None`; surplus entries are dropped.
fn align_results(entries: Vec<Value>, expected: usize) -> Vec<Option<ArtifactResult>> {
    if entries.len() != expected {
        warn!(
            expected,
            received = entries.len(),
            "bulk artifact response does not match the request length"
        );
    }

    let mut results: Vec<Option<ArtifactResult>> = entries
        .into_iter()
        .take(expected)
        .map(|entry| {
            let best = match entry {
                Value::Array(matches) => matches.into_iter().next().unwrap_or(Value::Null),
                other => other,
            };
            (!is_absent(&best)).then(|| ArtifactResult::from(best))
        })
        .collect();

    results.resize(expected, None);
    results
}

fn into_records<R: From<Value>>(body: Option<Value>) -> Vec<R> {
    match body {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(|item| !is_absent(item))
            .map(R::from)
            .collect(),
        Some(record) => vec![R::from(record)],
        None => Vec::new(),
    }
}

fn first_record<R: From<Value>>(body: Option<Value>) -> Option<R> {
    match body? {
        Value::Array(items) => items.into_iter().next().filter(|item| !is_absent(item)).map(R::from),
        record => Some(R::from(record)),
    }
}

fn join_ids<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter().map(|id| id.as_ref()).collect::<Vec<&str>>().join(",")
}

/// Drops everything up to and including `://`.
fn strip_scheme(uri: &str) -> &str {
    match uri.find("://") {
        Some(idx) => &uri[idx + 3..],
        None => uri,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
