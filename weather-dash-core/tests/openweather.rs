//! OpenWeather adapter against a mock HTTP server.

use std::time::Duration;

use weather_dash_core::{
    Condition, Coordinates, LocationQuery, ProviderError, WeatherProvider,
    provider::openweather::OpenWeatherProvider,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 2.35, "lat": 48.85 },
        "weather": [
            { "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }
        ],
        "main": { "temp": 18.5, "feels_like": 18.1, "humidity": 80 },
        "wind": { "speed": 3.1 },
        "dt": 1_715_000_000,
        "name": "Paris",
        "cod": 200
    })
}

fn forecast_body(n: usize) -> serde_json::Value {
    let list: Vec<_> = (0..n)
        .map(|i| {
            let dt = 1_715_000_000 + i * 10_800;
            let temp = 10.0 + i as f64;
            let dt_txt = format!("2024-05-{:02} {:02}:00:00", 1 + i / 8, (i % 8) * 3);
            serde_json::json!({
                "dt": dt,
                "main": { "temp": temp, "humidity": 70 },
                "weather": [ { "main": "Clouds", "description": "broken clouds" } ],
                "dt_txt": dt_txt
            })
        })
        .collect();

    serde_json::json!({
        "cod": "200",
        "message": 0,
        "cnt": n,
        "list": list,
        "city": { "name": "Paris", "country": "FR" }
    })
}

async fn provider(server: &MockServer) -> OpenWeatherProvider {
    #[allow(clippy::expect_used)]
    OpenWeatherProvider::new("TEST_KEY", &server.uri(), Duration::from_secs(5))
        .expect("client builds")
}

#[tokio::test]
async fn current_by_city_sends_metric_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;

    let weather = provider(&server)
        .await
        .current(&LocationQuery::City("Paris".into()))
        .await
        .expect("current weather");

    assert_eq!(weather.location_name, "Paris");
    assert_eq!(weather.temperature_c, 18.5);
    assert_eq!(weather.condition, Condition::Rain);
    assert_eq!(weather.description, "light rain");
}

#[tokio::test]
async fn current_by_coordinates_uses_lat_lon() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;

    let location = LocationQuery::Coordinates(Coordinates {
        latitude: 48.85,
        longitude: 2.35,
    });
    let weather = provider(&server).await.current(&location).await.expect("current");
    assert_eq!(weather.location_name, "Paris");
}

#[tokio::test]
async fn unknown_city_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let err = provider(&server)
        .await
        .current(&LocationQuery::City("Zzzzz".into()))
        .await
        .unwrap_err();

    match err {
        ProviderError::Status { code, body } => {
            assert_eq!(code, 404);
            assert!(body.contains("city not found"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn cod_in_body_overrides_http_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let err = provider(&server)
        .await
        .current(&LocationQuery::City("Zzzzz".into()))
        .await
        .unwrap_err();
    assert!(err.is_status());
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .await
        .current(&LocationQuery::City("Paris".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind then release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    let uri = format!("http://127.0.0.1:{port}");

    let provider = OpenWeatherProvider::new("TEST_KEY", &uri, Duration::from_secs(2))
        .expect("client builds");
    let err = provider
        .current(&LocationQuery::City("Paris".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn forecast_keeps_provider_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(40)))
        .mount(&server)
        .await;

    let forecast = provider(&server)
        .await
        .forecast(&LocationQuery::City("Paris".into()))
        .await
        .expect("forecast");

    assert_eq!(forecast.len(), 40);
    let entries = forecast.entries();
    assert_eq!(entries[0].timestamp_local, "2024-05-01 00:00:00");
    assert_eq!(entries[1].timestamp_local, "2024-05-01 03:00:00");
    assert_eq!(entries[39].temperature_c, 49.0);
    assert_eq!(entries[0].condition, Condition::Clouds);
}

#[tokio::test]
async fn forecast_server_error_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .await
        .forecast(&LocationQuery::City("Paris".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Status { code: 500, .. }));
}
