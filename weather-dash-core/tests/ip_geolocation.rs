use std::time::Duration;

use weather_dash_core::{
    Coordinates, GeolocationError, GeolocationSource, geolocation::IpGeolocation,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn source_for(server: &MockServer) -> IpGeolocation {
    IpGeolocation::new(&format!("{}/json", server.uri()), Duration::from_secs(5))
        .expect("client builds")
}

#[tokio::test]
async fn success_yields_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "city": "Oslo",
            "lat": 59.91,
            "lon": 10.75
        })))
        .mount(&server)
        .await;

    let position = source_for(&server).await.current_position().await;
    assert_eq!(
        position,
        Ok(Coordinates {
            latitude: 59.91,
            longitude: 10.75
        })
    );
}

#[tokio::test]
async fn refused_lookup_is_denied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail",
            "message": "private range"
        })))
        .mount(&server)
        .await;

    let position = source_for(&server).await.current_position().await;
    assert_eq!(position, Err(GeolocationError::Denied));
}

#[tokio::test]
async fn server_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let position = source_for(&server).await.current_position().await;
    assert!(matches!(position, Err(GeolocationError::Unavailable(_))));
}
