//! Enrichment attached to one saved log entry

use crate::models::{Coordinates, EnvPayload, PhysiologicalReading};
use serde::{Deserialize, Serialize};

/// Best-effort context for one logging action.
///
/// Every field is independently optional; an absent field means the data
/// could not be acquired in time, never that an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryContext {
    pub environmental_data: Option<EnvPayload>,
    pub physiological_data: Option<PhysiologicalReading>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
}

/// What the environmental path produced
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct EnvironmentalContext {
    pub location: Option<Coordinates>,
    pub payload: Option<EnvPayload>,
}

impl EntryContext {
    pub(crate) fn merge(
        environmental: EnvironmentalContext,
        physiological: Option<PhysiologicalReading>,
    ) -> Self {
        let city = environmental
            .payload
            .as_ref()
            .and_then(|payload| payload.city())
            .map(str::to_string);

        Self {
            latitude: environmental.location.map(|c| c.latitude),
            longitude: environmental.location.map(|c| c.longitude),
            city,
            environmental_data: environmental.payload,
            physiological_data: physiological,
        }
    }

    /// True when nothing could be acquired
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocationInfo;

    #[test]
    fn test_merge_takes_city_from_weather_payload() {
        let mut payload = EnvPayload::with_condition("Cloudy");
        payload.location = Some(LocationInfo {
            city: Some("San Francisco".to_string()),
            ..LocationInfo::default()
        });

        let context = EntryContext::merge(
            EnvironmentalContext {
                location: Some(Coordinates::new(37.77, -122.41)),
                payload: Some(payload),
            },
            None,
        );

        assert_eq!(context.latitude, Some(37.77));
        assert_eq!(context.longitude, Some(-122.41));
        assert_eq!(context.city.as_deref(), Some("San Francisco"));
        assert!(context.physiological_data.is_none());
    }

    #[test]
    fn test_empty_merge_is_empty() {
        let context = EntryContext::merge(EnvironmentalContext::default(), None);
        assert!(context.is_empty());

        let json = serde_json::to_value(&context).unwrap();
        assert!(json["environmentalData"].is_null());
        assert!(json["physiologicalData"].is_null());
    }
}
