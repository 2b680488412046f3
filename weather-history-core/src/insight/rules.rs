use async_trait::async_trait;

use crate::{
    Result,
    model::{InsightDraft, InsightRequest},
};

use super::InsightGenerator;

const HEAT_ALERT_C: f64 = 35.0;
const WARM_C: f64 = 30.0;
const COLD_C: f64 = 5.0;
const DRY_PCT: f64 = 30.0;
const HUMID_PCT: f64 = 85.0;
const STRONG_WIND_KMH: f64 = 40.0;

/// Offline generator: threshold rules over the projection, no network.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedInsightGenerator;

impl RuleBasedInsightGenerator {
    pub fn draft(request: &InsightRequest) -> InsightDraft {
        let mut alerts = Vec::new();
        let mut recommendations = Vec::new();

        let t = request.temperature;
        let h = request.humidity;
        let wind = request.wind_speed;
        let condition = request.condition.to_lowercase();

        if t >= HEAT_ALERT_C {
            alerts.push(format!("Extreme heat: {t:.1}°C"));
            recommendations.push("Avoid sun exposure between 10h and 16h".to_string());
            recommendations.push("Drink water regularly".to_string());
        } else if t >= WARM_C {
            recommendations.push("Stay hydrated and prefer light clothing".to_string());
        } else if t <= COLD_C {
            alerts.push(format!("Low temperature: {t:.1}°C"));
            recommendations.push("Wear warm layers when going out".to_string());
        }

        if h < DRY_PCT {
            alerts.push(format!("Low air humidity: {h:.0}%"));
            recommendations.push("Use a humidifier and avoid strenuous outdoor exercise".to_string());
        } else if h > HUMID_PCT {
            alerts.push(format!("Very high humidity: {h:.0}%"));
        }

        if wind >= STRONG_WIND_KMH {
            alerts.push(format!("Strong winds: {wind:.1} km/h"));
            recommendations.push("Secure loose objects outdoors".to_string());
        }

        if condition.contains("thunder") || condition.contains("storm") {
            alerts.push("Thunderstorm activity".to_string());
            recommendations.push("Stay indoors and away from open areas".to_string());
        } else if condition.contains("rain") || condition.contains("drizzle") || condition.contains("shower") {
            recommendations.push("Carry an umbrella".to_string());
        }

        if recommendations.is_empty() {
            recommendations.push("Good conditions for outdoor activities".to_string());
        }

        let summary = format!(
            "{} with {t:.1}°C, {h:.0}% humidity and winds at {wind:.1} km/h.",
            request.condition
        );

        InsightDraft {
            summary,
            alerts,
            recommendations,
            trends: trend_for(t).to_string(),
        }
    }
}

fn trend_for(temperature: f64) -> &'static str {
    match temperature {
        t if t >= WARM_C => "Hot conditions; temperatures above the comfort range.",
        t if t >= 18.0 => "Mild conditions within the comfort range.",
        t if t > COLD_C => "Cool conditions; temperatures below the comfort range.",
        _ => "Cold conditions; risk of discomfort outdoors.",
    }
}

#[async_trait]
impl InsightGenerator for RuleBasedInsightGenerator {
    async fn generate(&self, request: &InsightRequest) -> Result<InsightDraft> {
        Ok(Self::draft(request))
    }
}
