use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::PredictionError;

/// One of the seven feed-composition inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Dm,
    Cp,
    Cf,
    Ndf,
    Adf,
    Adl,
    Ash,
}

impl FieldKey {
    pub const ALL: [FieldKey; 7] = [
        FieldKey::Dm,
        FieldKey::Cp,
        FieldKey::Cf,
        FieldKey::Ndf,
        FieldKey::Adf,
        FieldKey::Adl,
        FieldKey::Ash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Dm => "DM",
            FieldKey::Cp => "CP",
            FieldKey::Cf => "CF",
            FieldKey::Ndf => "NDF",
            FieldKey::Adf => "ADF",
            FieldKey::Adl => "ADL",
            FieldKey::Ash => "ASH",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldKey::Dm => "Dry Matter",
            FieldKey::Cp => "Crude Protein",
            FieldKey::Cf => "Crude Fiber",
            FieldKey::Ndf => "Neutral Detergent Fiber",
            FieldKey::Adf => "Acid Detergent Fiber",
            FieldKey::Adl => "Acid Detergent Lignin",
            FieldKey::Ash => "Ash",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.as_str() == name)
    }
}

/// Raw form entries, sent to the prediction service exactly as typed.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct InputParameters {
    #[serde(rename = "DM", default)]
    pub dm: String,
    #[serde(rename = "CP", default)]
    pub cp: String,
    #[serde(rename = "CF", default)]
    pub cf: String,
    #[serde(rename = "NDF", default)]
    pub ndf: String,
    #[serde(rename = "ADF", default)]
    pub adf: String,
    #[serde(rename = "ADL", default)]
    pub adl: String,
    #[serde(rename = "ASH", default)]
    pub ash: String,
}

impl InputParameters {
    pub fn get(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::Dm => &self.dm,
            FieldKey::Cp => &self.cp,
            FieldKey::Cf => &self.cf,
            FieldKey::Ndf => &self.ndf,
            FieldKey::Adf => &self.adf,
            FieldKey::Adl => &self.adl,
            FieldKey::Ash => &self.ash,
        }
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        let slot = match key {
            FieldKey::Dm => &mut self.dm,
            FieldKey::Cp => &mut self.cp,
            FieldKey::Cf => &mut self.cf,
            FieldKey::Ndf => &mut self.ndf,
            FieldKey::Adf => &mut self.adf,
            FieldKey::Adl => &mut self.adl,
            FieldKey::Ash => &mut self.ash,
        };
        *slot = value.into();
    }

    pub fn entries(&self) -> impl Iterator<Item = (FieldKey, &str)> + '_ {
        FieldKey::ALL.iter().map(move |key| (*key, self.get(*key)))
    }
}

/// Metrics returned by the prediction service, in response order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredictionResult {
    pub metrics: Vec<(String, f64)>,
}

impl Serialize for PredictionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.metrics.len()))?;
        for (name, value) in &self.metrics {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl PredictionResult {
    pub fn from_json(body: Value) -> Result<Self, PredictionError> {
        let object = match body {
            Value::Object(object) => object,
            other => {
                return Err(PredictionError::Decode(format!(
                    "expected a JSON object, got {}",
                    other
                )))
            }
        };

        let metrics = object
            .into_iter()
            .map(|(name, value)| match value.as_f64() {
                Some(v) => Ok((name, v)),
                None => Err(PredictionError::Decode(format!(
                    "metric {} is not a number: {}",
                    name, value
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { metrics })
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.metrics
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| *value)
    }

    /// Two decimals, with exact halfway cases rounded away from zero.
    pub fn format_value(value: f64) -> String {
        // The only doubles sitting exactly on a .xx5 tie are odd multiples of 1/8.
        let eighths = value * 8.0;
        if eighths.is_finite() && eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
            let cents = (value * 100.0 + value.signum() * 0.5).trunc();
            return format!("{:.2}", cents / 100.0);
        }
        format!("{:.2}", value)
    }

    pub fn insights(&self) -> Insights {
        Insights::from_result(self)
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Insights {
    pub digestibility: String,
    pub degradation: String,
    pub energy: String,
    pub methane: String,
}

impl Insights {
    pub const DMD_THRESHOLD: f64 = 50.0;
    pub const OMD_THRESHOLD: f64 = 60.0;
    pub const ME_THRESHOLD: f64 = 10.0;
    pub const CH4_THRESHOLD: f64 = 25.0;

    pub fn from_result(result: &PredictionResult) -> Self {
        // An absent metric never counts as below its threshold.
        let below = |name: &str, threshold: f64| result.get(name).map_or(false, |v| v < threshold);

        let (level, quality) = if below("DMD", Self::DMD_THRESHOLD) {
            ("lower", "poor")
        } else {
            ("higher", "good")
        };
        let degradation = if below("OMD", Self::OMD_THRESHOLD) { "low" } else { "high" };
        let energy = if below("ME", Self::ME_THRESHOLD) { "low" } else { "high" };
        let methane = if below("CH4", Self::CH4_THRESHOLD) {
            "relatively low"
        } else {
            "significant"
        };

        Insights {
            digestibility: format!(
                "DMD is {} than average, indicating {} digestibility.",
                level, quality
            ),
            degradation: format!("OMD suggests {} organic matter degradation.", degradation),
            energy: format!("ME value indicates {} energy content in the feed.", energy),
            methane: format!(
                "CH4 production is {}, consider environmental impact.",
                methane
            ),
        }
    }

    pub fn sentences(&self) -> [&str; 4] {
        [
            self.digestibility.as_str(),
            self.degradation.as_str(),
            self.energy.as_str(),
            self.methane.as_str(),
        ]
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: &str) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_keys_round_trip_through_names() {
        for key in FieldKey::ALL {
            assert_eq!(FieldKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(FieldKey::parse("dm"), None);
        assert_eq!(FieldKey::parse("DMD"), None);
    }

    #[test]
    fn setting_one_field_leaves_the_others_alone() {
        for key in FieldKey::ALL {
            let mut inputs = InputParameters::default();
            for other in FieldKey::ALL {
                inputs.set(other, format!("{}-before", other.as_str()));
            }

            inputs.set(key, "not a number");

            for other in FieldKey::ALL {
                if other == key {
                    assert_eq!(inputs.get(other), "not a number");
                } else {
                    assert_eq!(inputs.get(other), format!("{}-before", other.as_str()));
                }
            }
        }
    }

    #[test]
    fn empty_inputs_serialize_all_seven_keys() {
        let body = serde_json::to_value(InputParameters::default()).unwrap();
        assert_eq!(
            body,
            json!({"DM": "", "CP": "", "CF": "", "NDF": "", "ADF": "", "ADL": "", "ASH": ""})
        );
    }

    #[test]
    fn result_keeps_server_order() {
        let result = PredictionResult::from_json(json!({"OMD": 1, "DMD": 2.5, "CH4": 3, "ME": 4})).unwrap();
        let names: Vec<&str> = result.metrics.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["OMD", "DMD", "CH4", "ME"]);
        assert_eq!(result.get("DMD"), Some(2.5));
        assert_eq!(result.get("XYZ"), None);
    }

    #[test]
    fn result_rejects_non_numeric_bodies() {
        assert!(PredictionResult::from_json(json!([1, 2])).is_err());
        assert!(PredictionResult::from_json(json!({"DMD": "45"})).is_err());
    }

    #[test]
    fn result_serializes_as_an_ordered_object() {
        let result = PredictionResult::from_json(json!({"ME": 8, "DMD": 45})).unwrap();
        assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"ME":8.0,"DMD":45.0}"#);
    }

    #[test]
    fn values_format_to_two_decimals() {
        assert_eq!(PredictionResult::format_value(45.0), "45.00");
        assert_eq!(PredictionResult::format_value(12.345_6), "12.35");
        assert_eq!(PredictionResult::format_value(-3.0), "-3.00");
    }

    #[test]
    fn exact_halfway_values_round_up() {
        assert_eq!(PredictionResult::format_value(45.125), "45.13");
        assert_eq!(PredictionResult::format_value(0.125), "0.13");
        assert_eq!(PredictionResult::format_value(0.375), "0.38");
        assert_eq!(PredictionResult::format_value(10.875), "10.88");
        assert_eq!(PredictionResult::format_value(-0.125), "-0.13");
    }

    #[test]
    fn near_halfway_values_keep_their_binary_value() {
        // These literals sit just below the tie once stored as f64.
        assert_eq!(PredictionResult::format_value(55.555), "55.55");
        assert_eq!(PredictionResult::format_value(2.675), "2.67");
        assert_eq!(PredictionResult::format_value(1.005), "1.00");
    }

    #[test]
    fn low_metrics_select_the_low_branches() {
        let result = PredictionResult::from_json(json!({"DMD": 45, "OMD": 55, "ME": 8, "CH4": 30})).unwrap();
        let insights = result.insights();
        assert_eq!(
            insights.digestibility,
            "DMD is lower than average, indicating poor digestibility."
        );
        assert_eq!(insights.degradation, "OMD suggests low organic matter degradation.");
        assert_eq!(insights.energy, "ME value indicates low energy content in the feed.");
        assert_eq!(
            insights.methane,
            "CH4 production is significant, consider environmental impact."
        );
    }

    #[test]
    fn high_metrics_select_the_opposite_branches() {
        let result = PredictionResult::from_json(json!({"DMD": 60, "OMD": 70, "ME": 12, "CH4": 10})).unwrap();
        let insights = result.insights();
        assert_eq!(
            insights.digestibility,
            "DMD is higher than average, indicating good digestibility."
        );
        assert_eq!(insights.degradation, "OMD suggests high organic matter degradation.");
        assert_eq!(insights.energy, "ME value indicates high energy content in the feed.");
        assert_eq!(
            insights.methane,
            "CH4 production is relatively low, consider environmental impact."
        );
    }

    #[test]
    fn thresholds_are_strict() {
        let result = PredictionResult::from_json(json!({"DMD": 50, "OMD": 60, "ME": 10, "CH4": 25})).unwrap();
        let insights = result.insights();
        assert!(insights.digestibility.contains("higher"));
        assert!(insights.degradation.contains("high"));
        assert!(insights.energy.contains("high"));
        assert!(insights.methane.contains("significant"));
    }

    #[test]
    fn missing_metrics_fall_on_the_high_side() {
        let insights = PredictionResult::default().insights();
        assert!(insights.digestibility.contains("good"));
        assert!(insights.methane.contains("significant"));
    }
}
