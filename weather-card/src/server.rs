use axum::{
    Router,
    extract::{ConnectInfo, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use reqwest::Client;
use rusttype::Font;
use serde::Deserialize;
use std::{io, net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use weather_core::{
    CardError, Config, HttpIconSource, IconSource, Style, WeatherApiProvider, WeatherProvider,
    render_png,
};

/// The card server always listens here.
pub const PORT: u16 = 3000;

/// Read-only state shared by every request.
pub struct AppState {
    pub provider: Arc<dyn WeatherProvider>,
    pub icons: Arc<dyn IconSource>,
    pub style: Style,
    pub font: Arc<Font<'static>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("provider", &self.provider)
            .field("icons", &self.icons)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire up the WeatherAPI client and HTTP icon loader, sharing one reqwest client.
    pub fn from_config(config: &Config, font: Font<'static>) -> Result<Self, CardError> {
        let http = Client::new();

        Ok(Self {
            provider: Arc::new(WeatherApiProvider::from_config(config, http.clone())?),
            icons: Arc::new(HttpIconSource::new(http)),
            style: config.style()?,
            font: Arc::new(font),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CardQuery {
    location: Option<String>,
}

/// Location to look up: the query parameter, or the caller's IP when it's
/// missing or empty.
fn query_location(query: &CardQuery, remote: &SocketAddr) -> String {
    match query.location.as_deref() {
        Some(loc) if !loc.is_empty() => loc.to_string(),
        _ => remote.ip().to_string(),
    }
}

/// Failures surface as a bare 500; the cause only goes to the log.
#[derive(Debug)]
pub struct AppError(CardError);

impl From<CardError> for AppError {
    fn from(err: CardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Failed to produce weather card");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

async fn card_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    Query(query): Query<CardQuery>,
) -> Result<Response, AppError> {
    let location = query_location(&query, &remote);
    tracing::info!(%remote, %location, "Rendering weather card");

    let weather = state.provider.fetch_weather(&location).await?;
    let png = render_png(&weather, state.icons.as_ref(), &state.style, state.font.clone()).await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(card_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve the card endpoint on an already bound listener.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> io::Result<()> {
    let app = router(state).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::Json;
    use image::RgbaImage;
    use std::{collections::HashMap, sync::Mutex};
    use weather_core::{CardResult, surface::RasterSurface};

    type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

    const PARIS_BODY: &str = r#"{
        "location": {"name": "Paris", "region": "Ile-de-France", "country": "France",
                     "tz_id": "Europe/Paris", "localtime_epoch": 1717243200},
        "current": {
            "last_updated_epoch": 1717243200,
            "temp_c": 21,
            "condition": {"text": "Sunny", "icon": "//x/64.png", "code": 1000},
            "wind_kph": 10,
            "humidity": 40
        },
        "forecast": {"forecastday": [{"hour": [
            {"time_epoch": 1717239600, "temp_c": 20.2, "condition": {"text": "Sunny", "icon": "//x/64.png", "code": 1000}},
            {"time_epoch": 1717246800, "temp_c": 21.6, "condition": {"text": "Cloudy", "icon": "//x/cloud.png", "code": 1006}}
        ]}]}
    }"#;

    #[derive(Debug, Default)]
    struct RecordingIcons {
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl IconSource for RecordingIcons {
        async fn load(&self, url: &str) -> CardResult<RgbaImage> {
            self.requested.lock().unwrap().push(url.to_string());
            if url.contains("missing") {
                return Err(CardError::asset_load(url, "status 404 Not Found"));
            }
            Ok(RgbaImage::new(64, 64))
        }
    }

    async fn mock_forecast(
        State(seen): State<Seen>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Response {
        let q = params.get("q").cloned().unwrap_or_default();
        seen.lock().unwrap().push(params);

        match q.as_str() {
            "Nowhere" => (
                StatusCode::BAD_REQUEST,
                Json(error_body("No matching location found.")),
            )
                .into_response(),
            "Atlantis" => {
                let body = PARIS_BODY.replace("//x/cloud.png", "//x/missing.png");
                ([(header::CONTENT_TYPE, "application/json")], body).into_response()
            }
            _ => ([(header::CONTENT_TYPE, "application/json")], PARIS_BODY).into_response(),
        }
    }

    fn error_body(message: &str) -> HashMap<&'static str, HashMap<&'static str, String>> {
        HashMap::from([("error", HashMap::from([("message", message.to_string())]))])
    }

    async fn spawn_upstream(seen: Seen) -> SocketAddr {
        let app = Router::new().route("/v1/forecast.json", get(mock_forecast)).with_state(seen);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        addr
    }

    struct Harness {
        http: Client,
        card: SocketAddr,
        seen: Seen,
        icons: Arc<RecordingIcons>,
    }

    impl Harness {
        async fn start() -> Self {
            let font = RasterSurface::bundled_font().unwrap();

            let seen = Seen::default();
            let upstream = spawn_upstream(seen.clone()).await;
            let config = Config {
                api_key: Some("TEST_KEY".into()),
                api_base_url: format!("http://{upstream}/v1"),
                ..Config::default()
            };

            // loopback only; keep any proxy settings out of the way
            let http = Client::builder().no_proxy().build().unwrap();
            let icons = Arc::new(RecordingIcons::default());
            let state = AppState {
                provider: Arc::new(WeatherApiProvider::from_config(&config, http.clone()).unwrap()),
                icons: icons.clone(),
                style: config.style().unwrap(),
                font: Arc::new(font),
            };

            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let card = listener.local_addr().unwrap();
            tokio::spawn(serve(listener, Arc::new(state)));

            Self { http, card, seen, icons }
        }

        async fn get(&self, path_and_query: &str) -> reqwest::Response {
            self.http.get(format!("http://{}{}", self.card, path_and_query)).send().await.unwrap()
        }

        fn queries(&self) -> Vec<String> {
            self.seen.lock().unwrap().iter().map(|p| p["q"].clone()).collect()
        }
    }

    fn remote() -> SocketAddr {
        "203.0.113.7:51234".parse().unwrap()
    }

    #[test]
    fn explicit_location_is_used() {
        let query = CardQuery { location: Some("Paris".into()) };
        assert_eq!(query_location(&query, &remote()), "Paris");
    }

    #[test]
    fn missing_or_empty_location_falls_back_to_remote_ip() {
        assert_eq!(query_location(&CardQuery { location: None }, &remote()), "203.0.113.7");
        assert_eq!(query_location(&CardQuery { location: Some(String::new()) }, &remote()), "203.0.113.7");
    }

    #[test]
    fn state_debug_hides_api_key() {
        let config = Config { api_key: Some("SECRET_KEY_123".into()), ..Config::default() };
        let state = AppState::from_config(&config, RasterSurface::bundled_font().unwrap()).unwrap();

        let printed = format!("{state:?}");

        assert!(!printed.contains("SECRET_KEY_123"));
        assert!(printed.contains("<redacted>"));
    }

    #[tokio::test]
    async fn renders_png_card_for_location() {
        let h = Harness::start().await;

        let res = h.get("/?location=Paris").await;

        assert_eq!(res.status(), reqwest::StatusCode::OK);
        assert_eq!(res.headers()[reqwest::header::CONTENT_TYPE], "image/png");
        let png = res.bytes().await.unwrap();
        let card = image::load_from_memory(&png).unwrap();
        assert_eq!((card.width(), card.height()), (1170, 230));

        let seen = h.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["q"], "Paris");
        assert_eq!(seen[0]["key"], "TEST_KEY");

        let icons = h.icons.requested.lock().unwrap().clone();
        assert_eq!(icons, vec!["https://x/128.png".to_string(), "https://x/cloud.png".to_string()]);
    }

    #[tokio::test]
    async fn no_location_queries_remote_address() {
        let h = Harness::start().await;

        assert_eq!(h.get("/").await.status(), reqwest::StatusCode::OK);
        assert_eq!(h.get("/?location=").await.status(), reqwest::StatusCode::OK);

        assert_eq!(h.queries(), vec!["127.0.0.1".to_string(), "127.0.0.1".to_string()]);
    }

    #[tokio::test]
    async fn upstream_failure_is_a_bare_500() {
        let h = Harness::start().await;

        let res = h.get("/?location=Nowhere").await;

        assert_eq!(res.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.bytes().await.unwrap().is_empty());
        assert_eq!(h.queries(), vec!["Nowhere".to_string()]);
    }

    #[tokio::test]
    async fn icon_failure_is_a_bare_500() {
        let h = Harness::start().await;

        let res = h.get("/?location=Atlantis").await;

        assert_eq!(res.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.bytes().await.unwrap().is_empty());
        assert!(h.icons.requested.lock().unwrap().iter().any(|u| u.contains("missing")));
    }

    #[tokio::test]
    async fn other_paths_are_not_served() {
        let h = Harness::start().await;

        assert_eq!(h.get("/health").await.status(), reqwest::StatusCode::NOT_FOUND);
        assert!(h.queries().is_empty());
    }
}
