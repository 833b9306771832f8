use anyhow::Result;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};

use sprinkler_agent::{
    parse_water_log, soil_history, summarize, watering_prompt, ForecastPeriod, InputShapeError,
    MetricFamily, SensorHistory, UserDurationLog, WateringHistory,
};

fn epoch(y: i32, m: u32, d: u32, h: u32) -> String {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
        .unwrap()
        .timestamp()
        .to_string()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sensor_payload(rain: Value, moisture: Value, ad: Value, temperature: Value) -> Value {
    json!({
        "code": 0,
        "msg": "success",
        "data": {
            "rainfall": { "daily": { "unit": "in", "list": rain } },
            "soil_ch1": {
                "soilmoisture": { "unit": "%", "list": moisture },
                "ad": { "list": ad }
            },
            "outdoor": { "temperature": { "unit": "℉", "list": temperature } }
        }
    })
}

#[test]
fn joined_record_uses_max_rain_and_zero_defaults() -> Result<()> {
    // ---
    let mut rain = serde_json::Map::new();
    rain.insert(epoch(2024, 7, 10, 15), json!("0.1"));
    rain.insert(epoch(2024, 7, 10, 20), json!("0.3"));
    let mut temperature = serde_json::Map::new();
    temperature.insert(epoch(2024, 7, 10, 18), json!("55.2"));

    let payload = sensor_payload(json!(rain), json!({}), json!({}), json!(temperature));
    let soil = soil_history(&SensorHistory::from_payload(&payload)?, 7.0);

    assert_eq!(soil.len(), 1);
    let day = soil.get(date(2024, 7, 10)).expect("dayA present");
    assert_eq!(day.rainfall, 0.3);
    assert_eq!(day.soil_percentage, 0.0);
    assert_eq!(day.soil_ad, 0.0);
    assert_eq!(day.temperature, 55.2);

    Ok(())
}

#[test]
fn early_utc_samples_land_on_previous_local_day() -> Result<()> {
    // ---
    let mut rain = serde_json::Map::new();
    rain.insert(epoch(2024, 1, 2, 3), json!("0.4"));
    rain.insert(epoch(2024, 1, 2, 12), json!("0.1"));

    let payload = sensor_payload(json!(rain), json!({}), json!({}), json!({}));
    let soil = soil_history(&SensorHistory::from_payload(&payload)?, 7.0);

    let dates: Vec<NaiveDate> = soil.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2)]);
    assert_eq!(soil.get(date(2024, 1, 1)).unwrap().rainfall, 0.4);

    Ok(())
}

#[test]
fn missing_series_names_the_family() {
    // ---
    let payload = json!({ "data": {
        "soil_ch1": { "soilmoisture": { "list": {} }, "ad": { "list": {} } },
        "outdoor": { "temperature": { "list": {} } }
    }});

    match SensorHistory::from_payload(&payload) {
        Err(InputShapeError::MissingMetric(family)) => assert_eq!(family, MetricFamily::Rainfall),
        other => panic!("expected missing rainfall, got {other:?}"),
    }
}

#[test]
fn watering_paths_round_differently() -> Result<()> {
    // ---
    let detailed = parse_water_log(&json!({ "waterLog": { "days": [
        { "date": "2024-07-08", "programs": [{ "zones": [
            { "cycles": [{ "realDuration": 300 }] },
            { "cycles": [{ "realDuration": 420 }] }
        ]}]},
        { "date": "2024-07-09", "programs": [{ "zones": [{ "cycles": [{ "realDuration": 480 }] }] }] },
        { "date": "2024-07-10" }
    ]}}))?;

    let history = summarize(&detailed, 10);
    assert_eq!(history.len(), 1);
    assert_eq!(history.days()[0].duration_minutes, 12.0);

    let flat: UserDurationLog = serde_json::from_value(json!({
        "days": [{ "date": "2024-07-08", "userDuration": 150 }]
    }))?;
    let flat_history = WateringHistory::from_user_log(&flat);
    assert_eq!(flat_history.days()[0].duration_minutes, 2.5);

    Ok(())
}

#[test]
fn prompt_renders_all_three_sources() -> Result<()> {
    // ---
    let mut rain = serde_json::Map::new();
    rain.insert(epoch(2024, 7, 10, 18), json!("0.0"));
    let mut moisture = serde_json::Map::new();
    moisture.insert(epoch(2024, 7, 10, 18), json!("27"));

    let payload = sensor_payload(json!(rain), json!(moisture), json!({}), json!({}));
    let soil = soil_history(&SensorHistory::from_payload(&payload)?, 7.0);

    let log = parse_water_log(&json!({ "days": [
        { "date": "2024-07-09", "programs": [{ "zones": [{ "cycles": [{ "realDuration": 6600 }] }] }] }
    ]}))?;
    let watering = summarize(&log, 100);

    let forecast: Vec<ForecastPeriod> = serde_json::from_value(json!([{
        "name": "Thursday",
        "temperature": 97,
        "temperatureUnit": "F",
        "shortForecast": "Sunny",
        "probabilityOfPrecipitation": { "value": null }
    }]))?;

    let prompt = watering_prompt("Farmington, Utah", &watering, &forecast, &soil);

    assert!(prompt.contains("Date: 2024-07-09, Duration: 110 minutes"));
    assert!(prompt.contains("Thursday: Sunny, Temp: 97F, Precip: N/A"));
    assert!(prompt.contains("Date: 2024-07-10, Rainfall: 0in, Soil Percentage: 27, Soil AD: 0"));

    Ok(())
}
