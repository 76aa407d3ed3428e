use crate::config::ApiConfig;
use crate::model::{MovieDetail, MovieSummary};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/500x750?text=No+Image";

/// Any failure of a catalog request.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },

    #[error("unexpected response from {endpoint}: {reason}")]
    Malformed {
        endpoint: &'static str,
        reason: String,
    },
}

#[derive(Deserialize)]
struct ResultsPage {
    results: Vec<MovieSummary>,
}

/// Marks a request as in flight for as long as it lives.
struct LoadingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl LoadingGuard {
    fn acquire(in_flight: &Arc<AtomicUsize>) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self {
            in_flight: Arc::clone(in_flight),
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Client for the three TMDB read endpoints used by the explorer.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    image_base_url: String,
    api_key: String,
    language: String,
    in_flight: Arc<AtomicUsize>,
}

impl CatalogClient {
    pub fn new(api: &ApiConfig, api_key: String) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .user_agent(concat!("movie-explorer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            image_base_url: api.image_base_url.trim_end_matches('/').to_string(),
            api_key,
            language: api.language.clone(),
            in_flight: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// True while any request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Default listing, most popular first.
    pub async fn fetch_popular(&self) -> Result<Vec<MovieSummary>, FetchError> {
        let page: ResultsPage = self
            .get(
                "discover",
                "/discover/movie",
                &[("sort_by", "popularity.desc")],
            )
            .await?;
        Ok(page.results)
    }

    /// Free-text search. A blank query is the popular listing.
    pub async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError> {
        if query.trim().is_empty() {
            return self.fetch_popular().await;
        }
        let page: ResultsPage = self
            .get(
                "search",
                "/search/movie",
                &[("query", query), ("include_adult", "false")],
            )
            .await?;
        Ok(page.results)
    }

    /// Detail record with videos and credits in one round trip.
    pub async fn fetch_detail(&self, id: u64) -> Result<MovieDetail, FetchError> {
        let detail: MovieDetail = self
            .get(
                "detail",
                &format!("/movie/{}", id),
                &[("append_to_response", "videos,credits")],
            )
            .await?;
        if detail.videos.is_none() {
            return Err(FetchError::Malformed {
                endpoint: "detail",
                reason: "missing videos.results".to_string(),
            });
        }
        Ok(detail)
    }

    pub fn poster_url(&self, poster_path: Option<&str>) -> String {
        match poster_path {
            Some(path) if !path.is_empty() => {
                format!("{}/{}", self.image_base_url, path.trim_start_matches('/'))
            }
            _ => PLACEHOLDER_IMAGE.to_string(),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let _loading = LoadingGuard::acquire(&self.in_flight);
        let started = Instant::now();
        let url = format!("{}{}", self.base_url, path);

        let sent = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .query(params)
            .send()
            .await;
        // The URL carries the API key, keep it out of errors and logs
        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                let e = e.without_url();
                tracing::error!(endpoint, error = %e, "request failed");
                return Err(e.into());
            }
        };

        let status = response.status();
        tracing::debug!(
            endpoint,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "response"
        );
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| e.without_url())?;
        serde_json::from_str(&body).map_err(|e| FetchError::Malformed {
            endpoint,
            reason: e.to_string(),
        })
    }
}

/// Public TMDB page for a movie.
pub fn tmdb_page_url(id: u64) -> String {
    format!("https://www.themoviedb.org/movie/{}", id)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;

    pub(crate) fn client_for(server: &MockServer) -> CatalogClient {
        let api = ApiConfig {
            base_url: server.base_url(),
            ..ApiConfig::default()
        };
        CatalogClient::new(&api, "test-key".to_string()).unwrap()
    }

    pub(crate) fn inception_json() -> serde_json::Value {
        json!({
            "id": 27205,
            "title": "Inception",
            "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
            "vote_average": 8.4,
            "release_date": "2010-07-15",
            "overview": "Cobb, a skilled thief who commits corporate espionage."
        })
    }

    #[tokio::test]
    async fn test_fetch_popular_sends_expected_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/discover/movie")
                    .query_param("api_key", "test-key")
                    .query_param("language", "en-US")
                    .query_param("sort_by", "popularity.desc");
                then.status(200)
                    .json_body(json!({ "page": 1, "results": [inception_json(), { "id": 2 }] }));
            })
            .await;

        let client = client_for(&server);
        let movies = client.fetch_popular().await.unwrap();

        mock.assert_async().await;
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, 27205);
        assert_eq!(movies[0].year().as_deref(), Some("2010"));
        assert!(!client.is_loading());
    }

    #[tokio::test]
    async fn test_search_encodes_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search/movie")
                    .query_param("query", "Amélie & co/?")
                    .query_param("include_adult", "false");
                then.status(200).json_body(json!({ "results": [] }));
            })
            .await;

        let movies = client_for(&server).search("Amélie & co/?").await.unwrap();
        mock.assert_async().await;
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn test_blank_search_is_popular_listing() {
        let server = MockServer::start_async().await;
        let popular = server
            .mock_async(|when, then| {
                when.method(GET).path("/discover/movie");
                then.status(200).json_body(json!({ "results": [inception_json()] }));
            })
            .await;
        let search = server
            .mock_async(|when, then| {
                when.method(GET).path("/search/movie");
                then.status(200).json_body(json!({ "results": [] }));
            })
            .await;

        let client = client_for(&server);
        let baseline = client.fetch_popular().await.unwrap();
        assert_eq!(client.search("").await.unwrap(), baseline);
        assert_eq!(client.search("   ").await.unwrap(), baseline);

        popular.assert_calls_async(3).await;
        search.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/discover/movie");
                then.status(401).json_body(json!({ "status_message": "Invalid API key" }));
            })
            .await;

        let client = client_for(&server);
        let err = client.fetch_popular().await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 401, .. }));
        assert!(!client.is_loading());
    }

    #[tokio::test]
    async fn test_missing_results_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search/movie");
                then.status(200).json_body(json!({ "results": "nope" }));
            })
            .await;

        let err = client_for(&server).search("Inception").await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed { endpoint: "search", .. }));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/discover/movie");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let err = client_for(&server).fetch_popular().await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_fetch_detail_appends_videos_and_credits() {
        let server = MockServer::start_async().await;
        let mut body = inception_json();
        body["runtime"] = json!(148);
        body["genres"] = json!([{ "id": 28, "name": "Action" }]);
        body["videos"] = json!({ "results": [
            { "key": "YoHD9XEInc0", "name": "Official Trailer", "site": "YouTube", "type": "Trailer" }
        ]});
        body["credits"] = json!({ "cast": [] });
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/movie/27205")
                    .query_param("append_to_response", "videos,credits");
                then.status(200).json_body(body);
            })
            .await;

        let detail = client_for(&server).fetch_detail(27205).await.unwrap();
        mock.assert_async().await;
        assert_eq!(detail.summary.title, "Inception");
        assert_eq!(detail.runtime, Some(148));
        assert_eq!(detail.videos().len(), 1);
    }

    #[tokio::test]
    async fn test_detail_without_videos_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/movie/1");
                then.status(200).json_body(json!({ "id": 1, "title": "x" }));
            })
            .await;

        let err = client_for(&server).fetch_detail(1).await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed { endpoint: "detail", .. }));
    }

    #[tokio::test]
    async fn test_transport_error_clears_loading() {
        let api = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..ApiConfig::default()
        };
        let client = CatalogClient::new(&api, "k".to_string()).unwrap();
        let err = client.fetch_popular().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
        assert!(!client.is_loading());
    }

    #[test]
    fn test_loading_guard_scopes_flag() {
        let server_less = CatalogClient::new(&ApiConfig::default(), "k".to_string()).unwrap();
        {
            let _a = LoadingGuard::acquire(&server_less.in_flight);
            assert!(server_less.is_loading());
            {
                let _b = LoadingGuard::acquire(&server_less.in_flight);
                assert!(server_less.is_loading());
            }
            assert!(server_less.is_loading());
        }
        assert!(!server_less.is_loading());
    }

    #[test]
    fn test_poster_url() {
        let client = CatalogClient::new(&ApiConfig::default(), "k".to_string()).unwrap();
        assert_eq!(
            client.poster_url(Some("/abc.jpg")),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(client.poster_url(None), PLACEHOLDER_IMAGE);
        assert_eq!(client.poster_url(Some("")), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_tmdb_page_url() {
        assert_eq!(tmdb_page_url(27205), "https://www.themoviedb.org/movie/27205");
    }
}
