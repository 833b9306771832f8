//! Renders normalized watering, forecast and soil data into the text handed
//! to the decision model.

use crate::models::{ForecastPeriod, SoilHistory, WateringHistory};

/// Placeholder used when a history section has no rows.
const NO_DATA: &str = "No data available.";

const GUIDELINES: &str = "\
Guidelines:
- We strive to conserve water. We should water a maximum of 3 days per week.
- We should never water two days in a row.
- We should water the lawn when the soil is dry.
- We should avoid watering if there is a high chance of rain in the next 24 hours.";

// ---

/// One line per watering day, oldest first.
pub fn render_watering(history: &WateringHistory) -> String {
    // ---
    let lines: Vec<String> = history
        .iter()
        .map(|d| {
            format!(
                "Date: {}, Duration: {} minutes",
                d.date.format("%Y-%m-%d"),
                d.duration_minutes
            )
        })
        .collect();
    or_placeholder(lines)
}

pub fn render_forecast(forecast: &[ForecastPeriod]) -> String {
    // ---
    let lines: Vec<String> = forecast
        .iter()
        .map(|f| {
            let precip = f
                .precipitation_percent()
                .map(|p| format!("{p}%"))
                .unwrap_or_else(|| "N/A".to_string());
            format!(
                "{}: {}, Temp: {}{}, Precip: {}",
                f.name, f.short_forecast, f.temperature, f.temperature_unit, precip
            )
        })
        .collect();
    or_placeholder(lines)
}

pub fn render_soil(soil: &SoilHistory) -> String {
    // ---
    let lines: Vec<String> = soil
        .iter()
        .map(|h| {
            format!(
                "Date: {}, Rainfall: {}in, Soil Percentage: {}, Soil AD: {}, Temperature: {}F",
                h.date.format("%Y-%m-%d"),
                h.rainfall,
                h.soil_percentage,
                h.soil_ad,
                h.temperature
            )
        })
        .collect();
    or_placeholder(lines)
}

fn or_placeholder(lines: Vec<String>) -> String {
    if lines.is_empty() {
        NO_DATA.to_string()
    } else {
        lines.join("\n")
    }
}

/// Build the full decision prompt for `location`.
pub fn watering_prompt(
    location: &str,
    history: &WateringHistory,
    forecast: &[ForecastPeriod],
    soil: &SoilHistory,
) -> String {
    // ---
    format!(
        "You are a landscaper who is an expert in lawn watering practices. \
         You live in {location} where water is a precious resource.\n\n\
         Your job is to determine if we should water the lawn tomorrow. \
         Your decision should be based on the data provided.\n\n\
         Watering History:\n{}\n\n\
         Weather Forecast:\n{}\n\n\
         Soil history:\n{}\n\
         A soil or temperature value of 0 means the sensor had no reading that day, not a measured zero.\n\n\
         {GUIDELINES}\n\n\
         Provide a yes or no answer of whether we should water the lawn tomorrow. \
         Justify your answer based on the data provided.",
        render_watering(history),
        render_forecast(forecast),
        render_soil(soil),
    )
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::{Probability, SoilDayRecord, WateringDay};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(name: &str, precip: Option<f64>) -> ForecastPeriod {
        ForecastPeriod {
            name: name.to_string(),
            temperature: 82.0,
            temperature_unit: "F".to_string(),
            short_forecast: "Sunny".to_string(),
            probability_of_precipitation: Some(Probability { value: precip }),
            start_time: None,
            end_time: None,
            wind_speed: None,
            wind_direction: None,
            detailed_forecast: None,
        }
    }

    #[test]
    fn test_forecast_lines() {
        // ---
        let text = render_forecast(&[period("Today", Some(20.0)), period("Tonight", None)]);

        assert_eq!(
            text,
            "Today: Sunny, Temp: 82F, Precip: 20%\nTonight: Sunny, Temp: 82F, Precip: N/A"
        );
    }

    #[test]
    fn test_watering_lines_in_date_order() {
        // ---
        let history = WateringHistory::new(vec![
            WateringDay::new(date(2025, 6, 3), 120.0),
            WateringDay::new(date(2025, 6, 1), 110.0),
        ]);

        assert_eq!(
            render_watering(&history),
            "Date: 2025-06-01, Duration: 110 minutes\nDate: 2025-06-03, Duration: 120 minutes"
        );
    }

    #[test]
    fn test_prompt_sections() {
        // ---
        let soil = SoilHistory {
            records: vec![SoilDayRecord {
                date: date(2025, 6, 2),
                rainfall: 0.1,
                soil_percentage: 0.0,
                soil_ad: 0.0,
                temperature: 77.5,
            }],
            skipped_samples: 0,
        };
        let prompt = watering_prompt(
            "Farmington, Utah",
            &WateringHistory::default(),
            &[period("Today", Some(10.0))],
            &soil,
        );

        assert!(prompt.contains("You live in Farmington, Utah"));
        assert!(prompt.contains("Watering History:\nNo data available."));
        assert!(prompt.contains("Today: Sunny, Temp: 82F, Precip: 10%"));
        assert!(prompt.contains("Date: 2025-06-02, Rainfall: 0.1in, Soil Percentage: 0"));
        assert!(prompt.contains("value of 0 means the sensor had no reading"));
        assert!(prompt.contains("never water two days in a row"));
    }
}
