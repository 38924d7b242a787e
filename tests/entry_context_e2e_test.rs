//! End-to-end acquisition scenarios through `ContextCoordinator`

mod common;

use chrono::Utc;
use common::*;
use flare_context::config::{ContextConfig, PlatformProfile};
use flare_context::models::{PhysiologicalReading, WearableKind};
use flare_context::CircuitStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

#[tokio::test(start_paused = true)]
async fn test_weather_and_location_without_wearable() {
    init_test_logging();
    info!("🧪 Location granted, weather healthy, no wearable connected");

    let config = ContextConfig::default();
    let weather = Arc::new(MockWeather::new(WeatherBehavior::Succeed(cloudy_in(
        "San Francisco",
    ))));
    let wearables = Arc::new(MockWearables::none());
    let coordinator = build_coordinator(
        &config,
        MockLocation::at(37.77, -122.41),
        Arc::clone(&weather),
        Arc::clone(&wearables),
    );

    let context = coordinator.get_entry_context().await;

    let environmental = context.environmental_data.expect("weather payload");
    assert_eq!(environmental.weather.condition, "Cloudy");
    assert_eq!(context.latitude, Some(37.77));
    assert_eq!(context.longitude, Some(-122.41));
    assert_eq!(context.city.as_deref(), Some("San Francisco"));
    assert!(context.physiological_data.is_none());

    assert_eq!(weather.calls(), 1);
    assert_eq!(weather.last_query(), Some((37.77, -122.41)));
    assert_eq!(wearables.sync_calls(), 0);
    assert!(coordinator
        .fetcher()
        .cache()
        .get::<serde_json::Value>("weather:37.77:-122.41")
        .is_some());
}

#[tokio::test(start_paused = true)]
async fn test_everything_unavailable_returns_empty_context_within_budget() {
    init_test_logging();
    info!("🧪 Location denied, wearable sync hangs");

    let mut config = ContextConfig::default();
    config.platform = PlatformProfile::Constrained;
    let weather = Arc::new(MockWeather::new(WeatherBehavior::Hang));
    let wearables = Arc::new(MockWearables::connected(
        WearableKind::Oura,
        SyncBehavior::Hang,
    ));
    let coordinator = build_coordinator(
        &config,
        MockLocation::denied(),
        Arc::clone(&weather),
        Arc::clone(&wearables),
    );

    let started = Instant::now();
    let context = coordinator.get_entry_context().await;
    let elapsed = started.elapsed();

    assert!(context.is_empty(), "unexpected context: {context:?}");
    assert!(elapsed <= Duration::from_secs(8) + Duration::from_millis(50));
    // Constrained sync budget (10s) exceeds the path budget, so the path bound fires
    assert!(elapsed >= Duration::from_secs(8));
    assert_eq!(weather.calls(), 0);
    assert_eq!(wearables.sync_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_standard_platform_gives_up_on_sync_first() {
    let config = ContextConfig::default();
    let stale = PhysiologicalReading::new(WearableKind::Whoop, Utc::now() - chrono::Duration::hours(2));
    let wearables = Arc::new(
        MockWearables::connected(WearableKind::Whoop, SyncBehavior::Hang).with_reading(stale.clone()),
    );
    let coordinator = build_coordinator(
        &config,
        MockLocation::denied(),
        Arc::new(MockWeather::new(WeatherBehavior::Fail)),
        wearables,
    );

    let started = Instant::now();
    let context = coordinator.get_entry_context().await;

    // Sync deadline (5s) fires inside the 8s path budget and the stale reading is kept
    assert_eq!(context.physiological_data, Some(stale));
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(5));
    assert!(elapsed < Duration::from_secs(8));
}

#[tokio::test(start_paused = true)]
async fn test_slow_location_is_abandoned() {
    let config = ContextConfig::for_test();
    let weather = Arc::new(MockWeather::new(WeatherBehavior::Succeed(cloudy_in("Oslo"))));
    let coordinator = build_coordinator(
        &config,
        MockLocation::at(59.91, 10.75).slow(Duration::from_secs(30)),
        Arc::clone(&weather),
        Arc::new(MockWearables::none()),
    );

    let context = coordinator.get_entry_context().await;
    assert!(context.is_empty());
    assert_eq!(weather.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_location_kept_when_weather_fails() {
    let config = ContextConfig::for_test();
    let weather = Arc::new(MockWeather::new(WeatherBehavior::Fail));
    let coordinator = build_coordinator(
        &config,
        MockLocation::at(48.85, 2.35),
        Arc::clone(&weather),
        Arc::new(MockWearables::none()),
    );

    let context = coordinator.get_entry_context().await;
    assert_eq!(context.latitude, Some(48.85));
    assert_eq!(context.longitude, Some(2.35));
    assert!(context.environmental_data.is_none());
    assert!(context.city.is_none());
    // One call plus two retries, each counted toward the breaker
    assert_eq!(weather.calls(), 3);

    let state = coordinator
        .fetcher()
        .breakers()
        .state("weather")
        .expect("weather domain tracked");
    assert_eq!(state.status(), CircuitStatus::Open);

    // Next entry fails fast without touching the provider
    let context = coordinator.get_entry_context().await;
    assert!(context.environmental_data.is_none());
    assert_eq!(weather.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_fresh_reading_skips_sync() {
    let config = ContextConfig::for_test();
    let mut fresh = PhysiologicalReading::new(WearableKind::Garmin, Utc::now());
    fresh.resting_heart_rate_bpm = Some(52.0);
    let wearables = Arc::new(
        MockWearables::connected(WearableKind::Garmin, SyncBehavior::Fail).with_reading(fresh.clone()),
    );
    let coordinator = build_coordinator(
        &config,
        MockLocation::denied(),
        Arc::new(MockWeather::new(WeatherBehavior::Fail)),
        Arc::clone(&wearables),
    );

    let context = coordinator.get_entry_context().await;
    assert_eq!(context.physiological_data, Some(fresh));
    assert_eq!(wearables.sync_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stale_reading_returned_when_sync_fails() {
    let config = ContextConfig::for_test();
    let stale = PhysiologicalReading::new(WearableKind::Fitbit, Utc::now() - chrono::Duration::hours(1));
    let wearables = Arc::new(
        MockWearables::connected(WearableKind::Fitbit, SyncBehavior::Fail).with_reading(stale.clone()),
    );
    let coordinator = build_coordinator(
        &config,
        MockLocation::denied(),
        Arc::new(MockWeather::new(WeatherBehavior::Fail)),
        Arc::clone(&wearables),
    );

    let context = coordinator.get_entry_context().await;
    assert_eq!(context.physiological_data, Some(stale));
    assert_eq!(wearables.sync_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_successful_sync_is_cached() {
    let config = ContextConfig::for_test();
    let wearables = Arc::new(MockWearables::connected(
        WearableKind::Oura,
        SyncBehavior::Refresh,
    ));
    let coordinator = build_coordinator(
        &config,
        MockLocation::denied(),
        Arc::new(MockWeather::new(WeatherBehavior::Fail)),
        Arc::clone(&wearables),
    );

    let first = coordinator.get_entry_context().await;
    assert_eq!(
        first.physiological_data.as_ref().and_then(|r| r.heart_rate_bpm),
        Some(60.0)
    );
    assert_eq!(wearables.sync_calls(), 1);

    let second = coordinator.get_entry_context().await;
    assert_eq!(second.physiological_data, first.physiological_data);
    assert_eq!(wearables.sync_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_serialized_context_uses_camel_case() {
    let config = ContextConfig::for_test();
    let coordinator = build_coordinator(
        &config,
        MockLocation::at(37.77, -122.41),
        Arc::new(MockWeather::new(WeatherBehavior::Succeed(cloudy_in(
            "San Francisco",
        )))),
        Arc::new(MockWearables::none()),
    );

    let json = serde_json::to_value(coordinator.get_entry_context().await).unwrap();
    assert_eq!(json["environmentalData"]["weather"]["condition"], "Cloudy");
    assert_eq!(json["city"], "San Francisco");
    assert!(json["physiologicalData"].is_null());
}
