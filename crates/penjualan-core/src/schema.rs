//! Wire schema for the prediction endpoint.
//!
//! A request carries ten named numeric fields. Nine of them form the model's
//! input vector, in the exact column order the scaler was fitted with.
//! `Quarter_Q4` is accepted for client compatibility but never reaches the
//! model: the quarter indicators are one-hot encoded with Q4 as the dropped
//! baseline. Validation walks the whole schema before returning so a single
//! response can report every offending field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Year label attached to every prediction.
///
/// The training data ends in 2022; the service always answers with a
/// forecast for the following year.
pub const PREDICTED_YEAR: i32 = 2023;

/// Width of the vector fed to the scaler and the model.
pub const FEATURE_COUNT: usize = 9;

/// The nine feature fields, in fit order. `Quarter_Q4` is not among them.
pub const FEATURE_FIELDS: [&str; FEATURE_COUNT] = [
    "Produksi_kWh",
    "Kesusutan_kWh",
    "Persentase_",
    "Efficiency_",
    "Energy_Loss_kWh",
    "Customer_Growth_Rate",
    "Quarter_Q1",
    "Quarter_Q2",
    "Quarter_Q3",
];

/// The optional tenth field: defaulted to zero when absent, dropped before
/// scaling when present.
pub const OPTIONAL_FIELD: &str = "Quarter_Q4";

/// One quarter's grid observations as posted by clients.
///
/// Field names follow the training dataset's column headers, trailing
/// underscores included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesData {
    #[serde(rename = "Produksi_kWh")]
    pub produksi_kwh: f64,
    #[serde(rename = "Kesusutan_kWh")]
    pub kesusutan_kwh: f64,
    #[serde(rename = "Persentase_")]
    pub persentase: f64,
    #[serde(rename = "Efficiency_")]
    pub efficiency: f64,
    #[serde(rename = "Energy_Loss_kWh")]
    pub energy_loss_kwh: f64,
    #[serde(rename = "Customer_Growth_Rate")]
    pub customer_growth_rate: f64,
    #[serde(rename = "Quarter_Q1")]
    pub quarter_q1: f64,
    #[serde(rename = "Quarter_Q2")]
    pub quarter_q2: f64,
    #[serde(rename = "Quarter_Q3")]
    pub quarter_q3: f64,
    /// Unused by the model; kept so existing clients can keep sending it.
    #[serde(rename = "Quarter_Q4", default)]
    pub quarter_q4: f64,
}

impl SalesData {
    /// The nine model inputs in fit order. `quarter_q4` is intentionally
    /// absent.
    pub fn feature_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.produksi_kwh,
            self.kesusutan_kwh,
            self.persentase,
            self.efficiency,
            self.energy_loss_kwh,
            self.customer_growth_rate,
            self.quarter_q1,
            self.quarter_q2,
            self.quarter_q3,
        ]
    }
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn required(field: &str) -> Self {
        FieldError {
            field: field.to_string(),
            message: "field required".to_string(),
        }
    }

    fn not_numeric(field: &str, value: &Value) -> Self {
        FieldError {
            field: field.to_string(),
            message: format!("expected a number, got {}", json_type_name(value)),
        }
    }
}

/// Validate a raw JSON body against the request schema.
///
/// Every field is checked before returning, so the error list names all
/// problems in one round trip. Unknown fields are ignored. Values must be
/// JSON numbers; strings that merely look numeric are rejected.
pub fn parse_sales_data(body: &Value) -> Result<SalesData, Vec<FieldError>> {
    let Some(map) = body.as_object() else {
        return Err(vec![FieldError {
            field: "body".to_string(),
            message: format!("expected a JSON object, got {}", json_type_name(body)),
        }]);
    };

    // Collect values during the walk so the accepted numbers are exactly
    // the ones validation saw.
    let mut errors = Vec::new();
    let mut features = [0.0; FEATURE_COUNT];
    for (slot, field) in features.iter_mut().zip(FEATURE_FIELDS) {
        match map.get(field) {
            None => errors.push(FieldError::required(field)),
            Some(value) => match value.as_f64() {
                Some(number) => *slot = number,
                None => errors.push(FieldError::not_numeric(field, value)),
            },
        }
    }
    // Quarter_Q4 may be absent, but when present it must still be numeric.
    let mut quarter_q4 = 0.0;
    if let Some(value) = map.get(OPTIONAL_FIELD) {
        match value.as_f64() {
            Some(number) => quarter_q4 = number,
            None => errors.push(FieldError::not_numeric(OPTIONAL_FIELD, value)),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(SalesData {
        produksi_kwh: features[0],
        kesusutan_kwh: features[1],
        persentase: features[2],
        efficiency: features[3],
        energy_loss_kwh: features[4],
        customer_growth_rate: features[5],
        quarter_q1: features[6],
        quarter_q2: features[7],
        quarter_q3: features[8],
        quarter_q4,
    })
}

/// The prediction payload returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Always [`PREDICTED_YEAR`].
    pub tahun_prediksi: i32,
    pub prediksi_penjualan: f64,
}

impl Prediction {
    /// Label a raw model output with the fixed forecast year.
    pub fn new(value: f64) -> Self {
        Prediction {
            tahun_prediksi: PREDICTED_YEAR,
            prediksi_penjualan: value,
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
