//! End-to-end pipeline tests against mock geocoding and archive services

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skycast::config::SkycastConfig;
use skycast::pipeline::{City, CompareInput, Pipeline, RunOutcome};

const NEW_YORK: (f64, f64) = (40.7127, -74.006);
const LONDON: (f64, f64) = (51.5074, -0.1278);

fn test_config(geocoding: &MockServer, archive: &MockServer) -> SkycastConfig {
    let mut config = SkycastConfig::default();
    config.geocoding.base_url = geocoding.uri();
    config.archive.base_url = archive.uri();
    config.geocoding.timeout_seconds = 1;
    config.archive.timeout_seconds = 1;
    config
}

fn input(city_a: &str, city_b: &str, start: &str, end: &str) -> CompareInput {
    CompareInput {
        city_a: city_a.to_string(),
        city_b: city_b.to_string(),
        start: Some(NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap()),
        end: Some(NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap()),
    }
}

fn geocode_body(name: &str, (latitude, longitude): (f64, f64)) -> serde_json::Value {
    json!({
        "results": [{
            "name": name,
            "latitude": latitude,
            "longitude": longitude,
            "country": "Somewhere"
        }]
    })
}

fn archive_body(days: &[(&str, f64)]) -> serde_json::Value {
    json!({
        "daily": {
            "time": days.iter().map(|(d, _)| *d).collect::<Vec<_>>(),
            "temperature_2m_max": days.iter().map(|(_, t)| *t).collect::<Vec<_>>()
        }
    })
}

async fn mount_geocode(server: &MockServer, name: &str, coords: (f64, f64), hits: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", name))
        .and(query_param("count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_body(name, coords)))
        .expect(hits)
        .mount(server)
        .await;
}

async fn mount_archive(server: &MockServer, latitude: f64, body: serde_json::Value, hits: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .and(query_param("latitude", latitude.to_string()))
        .and(query_param("daily", "temperature_2m_max"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(hits)
        .mount(server)
        .await;
}

/// Healthy path: both cities resolve, both series arrive, comparison is ready.
#[tokio::test]
async fn healthy_run_reaches_ready() {
    let geocoding = MockServer::start().await;
    let archive = MockServer::start().await;

    mount_geocode(&geocoding, "New York", NEW_YORK, 1).await;
    mount_geocode(&geocoding, "London", LONDON, 1).await;
    mount_archive(
        &archive,
        NEW_YORK.0,
        archive_body(&[("2024-06-01", 24.0), ("2024-06-02", 26.0), ("2024-06-03", 28.0)]),
        1,
    )
    .await;
    mount_archive(
        &archive,
        LONDON.0,
        archive_body(&[("2024-06-01", 18.0), ("2024-06-02", 19.0), ("2024-06-03", 20.0)]),
        1,
    )
    .await;

    let pipeline = Pipeline::new(&test_config(&geocoding, &archive)).unwrap();
    let outcome = pipeline
        .run(&input("New York", "London", "2024-06-01", "2024-06-03"))
        .await;

    let RunOutcome::Ready(result) = outcome else {
        panic!("expected Ready, got {outcome:?}");
    };
    assert_eq!(result.rows.len(), 3);
    assert_eq!(result.city_a, "New York");
    assert_eq!(result.city_b, "London");
    assert_eq!(result.mean_a, 26.0);
    assert_eq!(result.mean_b, 19.0);
}

/// An empty city name stays idle: no upstream request of any kind is made.
#[tokio::test]
async fn empty_city_makes_no_network_calls() {
    let geocoding = MockServer::start().await;
    let archive = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&geocoding)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&archive)
        .await;

    let pipeline = Pipeline::new(&test_config(&geocoding, &archive)).unwrap();
    let outcome = pipeline
        .run(&input("", "London", "2024-06-01", "2024-06-03"))
        .await;

    assert_eq!(outcome, RunOutcome::Prompt);
}

/// An unknown city A halts the run before city B is geocoded or anything
/// is fetched.
#[tokio::test]
async fn unknown_city_a_skips_all_later_calls() {
    let geocoding = MockServer::start().await;
    let archive = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Zzznotacity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&geocoding)
        .await;
    mount_geocode(&geocoding, "London", LONDON, 0).await;
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&archive)
        .await;

    let pipeline = Pipeline::new(&test_config(&geocoding, &archive)).unwrap();
    let outcome = pipeline
        .run(&input("Zzznotacity", "London", "2024-06-01", "2024-06-03"))
        .await;

    assert_eq!(
        outcome,
        RunOutcome::LocationError {
            city: City::A,
            name: "Zzznotacity".to_string(),
        }
    );
    assert!(outcome.user_message().contains("City A"));
    assert!(outcome.user_message().contains("Zzznotacity"));
}

/// An archive timeout for one city ends in NoData with the busy message.
#[tokio::test]
async fn archive_timeout_for_city_b_is_no_data_busy() {
    let geocoding = MockServer::start().await;
    let archive = MockServer::start().await;

    mount_geocode(&geocoding, "New York", NEW_YORK, 1).await;
    mount_geocode(&geocoding, "London", LONDON, 1).await;
    mount_archive(
        &archive,
        NEW_YORK.0,
        archive_body(&[("2024-06-01", 24.0)]),
        1,
    )
    .await;
    // City B's archive answer arrives after the 1s client timeout
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .and(query_param("latitude", LONDON.0.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(archive_body(&[("2024-06-01", 18.0)]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&archive)
        .await;

    let pipeline = Pipeline::new(&test_config(&geocoding, &archive)).unwrap();
    let outcome = pipeline
        .run(&input("New York", "London", "2024-06-01", "2024-06-01"))
        .await;

    assert_eq!(outcome, RunOutcome::NoData { timed_out: true });
    assert!(outcome.user_message().contains("busy"));
}

/// An archive response with no data for the range ends in plain NoData.
#[tokio::test]
async fn empty_archive_response_is_no_data() {
    let geocoding = MockServer::start().await;
    let archive = MockServer::start().await;

    mount_geocode(&geocoding, "New York", NEW_YORK, 1).await;
    mount_geocode(&geocoding, "London", LONDON, 1).await;
    mount_archive(
        &archive,
        NEW_YORK.0,
        archive_body(&[("2024-06-01", 24.0)]),
        1,
    )
    .await;
    mount_archive(&archive, LONDON.0, json!({ "daily": { "time": [], "temperature_2m_max": [] } }), 1)
        .await;

    let pipeline = Pipeline::new(&test_config(&geocoding, &archive)).unwrap();
    let outcome = pipeline
        .run(&input("New York", "London", "2024-06-01", "2024-06-01"))
        .await;

    assert_eq!(outcome, RunOutcome::NoData { timed_out: false });
    assert!(outcome.user_message().contains("No weather data"));
}

/// Within the TTL, a repeated identical run answers from the caches: each
/// upstream endpoint is hit exactly once across both runs.
#[tokio::test]
async fn repeated_run_within_ttl_hits_caches() {
    let geocoding = MockServer::start().await;
    let archive = MockServer::start().await;

    mount_geocode(&geocoding, "New York", NEW_YORK, 1).await;
    mount_geocode(&geocoding, "London", LONDON, 1).await;
    mount_archive(
        &archive,
        NEW_YORK.0,
        archive_body(&[("2024-06-01", 24.0), ("2024-06-02", 26.0)]),
        1,
    )
    .await;
    mount_archive(
        &archive,
        LONDON.0,
        archive_body(&[("2024-06-01", 18.0), ("2024-06-02", 19.0)]),
        1,
    )
    .await;

    let pipeline = Pipeline::new(&test_config(&geocoding, &archive)).unwrap();
    let request = input("New York", "London", "2024-06-01", "2024-06-02");

    let first = pipeline.run(&request).await;
    let second = pipeline.run(&request).await;

    assert!(matches!(first, RunOutcome::Ready(_)));
    assert_eq!(first, second);
}

/// With no range supplied, the pipeline fills in the default trailing
/// window and still reaches Ready.
#[tokio::test]
async fn missing_range_falls_back_to_default_window() {
    let geocoding = MockServer::start().await;
    let archive = MockServer::start().await;

    mount_geocode(&geocoding, "New York", NEW_YORK, 1).await;
    mount_geocode(&geocoding, "London", LONDON, 1).await;
    mount_archive(
        &archive,
        NEW_YORK.0,
        archive_body(&[("2024-06-01", 24.0)]),
        1,
    )
    .await;
    mount_archive(&archive, LONDON.0, archive_body(&[("2024-06-01", 18.0)]), 1).await;

    let pipeline = Pipeline::new(&test_config(&geocoding, &archive)).unwrap();
    let outcome = pipeline
        .run(&CompareInput {
            city_a: "New York".to_string(),
            city_b: "London".to_string(),
            start: None,
            end: None,
        })
        .await;

    assert!(matches!(outcome, RunOutcome::Ready(_)));
}

/// A single-day range produces at most one entry per city.
#[tokio::test]
async fn single_day_range_yields_single_row() {
    let geocoding = MockServer::start().await;
    let archive = MockServer::start().await;

    mount_geocode(&geocoding, "New York", NEW_YORK, 1).await;
    mount_geocode(&geocoding, "London", LONDON, 1).await;
    mount_archive(
        &archive,
        NEW_YORK.0,
        archive_body(&[("2024-06-01", 24.0)]),
        1,
    )
    .await;
    mount_archive(&archive, LONDON.0, archive_body(&[("2024-06-01", 18.0)]), 1).await;

    let pipeline = Pipeline::new(&test_config(&geocoding, &archive)).unwrap();
    let outcome = pipeline
        .run(&input("New York", "London", "2024-06-01", "2024-06-01"))
        .await;

    let RunOutcome::Ready(result) = outcome else {
        panic!("expected Ready, got {outcome:?}");
    };
    assert_eq!(result.rows.len(), 1);
}

/// Unmatched dates drop out of the table while the means still cover each
/// city's full fetched series.
#[tokio::test]
async fn partially_overlapping_series_join_but_keep_full_means() {
    let geocoding = MockServer::start().await;
    let archive = MockServer::start().await;

    mount_geocode(&geocoding, "New York", NEW_YORK, 1).await;
    mount_geocode(&geocoding, "London", LONDON, 1).await;
    mount_archive(
        &archive,
        NEW_YORK.0,
        archive_body(&[("2024-06-01", 10.0), ("2024-06-02", 20.0), ("2024-06-03", 30.0)]),
        1,
    )
    .await;
    mount_archive(
        &archive,
        LONDON.0,
        archive_body(&[("2024-06-02", 15.0), ("2024-06-03", 17.0), ("2024-06-04", 19.0)]),
        1,
    )
    .await;

    let pipeline = Pipeline::new(&test_config(&geocoding, &archive)).unwrap();
    let outcome = pipeline
        .run(&input("New York", "London", "2024-06-01", "2024-06-04"))
        .await;

    let RunOutcome::Ready(result) = outcome else {
        panic!("expected Ready, got {outcome:?}");
    };
    let dates: Vec<String> = result
        .rows
        .iter()
        .map(|r| r.date.format("%Y-%m-%d").to_string())
        .collect();
    assert_eq!(dates, vec!["2024-06-02", "2024-06-03"]);
    assert_eq!(result.mean_a, 20.0);
    assert_eq!(result.mean_b, 17.0);
}
