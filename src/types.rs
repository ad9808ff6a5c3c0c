use serde::{Deserialize, Serialize};

// ---------- Column layout ----------

/// Authoritative input order; the expander and model were fitted against it.
pub const COLUMNS: [&str; 8] = [
    "Order_ID",
    "Distance_km",
    "Weather",
    "Traffic_Level",
    "Time_of_Day",
    "Vehicle_Type",
    "Preparation_Time_min",
    "Courier_Experience_yrs",
];

pub const N_COLUMNS: usize = COLUMNS.len();

/// Categorical columns, each backed by one fitted encoder.
pub const CATEGORICAL: [&str; 4] = ["Weather", "Traffic_Level", "Time_of_Day", "Vehicle_Type"];

// ---------- Request ----------

/// One form submission. Key order in the incoming JSON is irrelevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(alias = "Order_ID")]
    pub order_id: i64,
    #[serde(alias = "Distance_km")]
    pub distance_km: f64,
    #[serde(alias = "Weather")]
    pub weather: String,
    #[serde(alias = "Traffic_Level")]
    pub traffic_level: String,
    #[serde(alias = "Time_of_Day")]
    pub time_of_day: String,
    #[serde(alias = "Vehicle_Type")]
    pub vehicle_type: String,
    #[serde(alias = "Preparation_Time_min")]
    pub preparation_time_min: i64,
    #[serde(alias = "Courier_Experience_yrs")]
    pub courier_experience_yrs: i64,
}

// ---------- Result ----------

/// Pipeline output. `value` is canonical; `rounded()` is for display only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub value: f64,
}

impl Prediction {
    pub fn rounded(&self) -> f64 {
        round_half_even(self.value, 2)
    }

    pub fn message(&self) -> String {
        format!("Estimated Delivery Time: {:.2} minutes", self.rounded())
    }
}

// Enough fractional digits to print any f64 exactly.
const EXACT_DIGITS: usize = 1100;

/// Rounds to `digits` decimals on the exact binary value, ties to even.
/// Agrees with Python's `round(x, digits)`: 57.125 -> 57.12, 2.675 -> 2.67.
pub fn round_half_even(value: f64, digits: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (int_part, frac) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let (kept, rest) = frac.split_at(digits.min(frac.len()));

    let mut num: Vec<u8> = int_part.bytes().chain(kept.bytes()).collect();
    let last_odd = num.last().map_or(false, |d| (d - b'0') % 2 == 1);
    let round_up = match rest.as_bytes().first() {
        Some(b'6'..=b'9') => true,
        Some(b'5') => last_odd || rest[1..].bytes().any(|b| b != b'0'),
        _ => false,
    };

    if round_up {
        let mut i = num.len();
        loop {
            if i == 0 {
                num.insert(0, b'1');
                break;
            }
            i -= 1;
            if num[i] == b'9' {
                num[i] = b'0';
            } else {
                num[i] += 1;
                break;
            }
        }
    }

    let split = num.len() - kept.len();
    let mut text = String::from_utf8_lossy(&num[..split]).into_owned();
    if split < num.len() {
        text.push('.');
        text.push_str(&String::from_utf8_lossy(&num[split..]));
    }
    let magnitude = text.parse::<f64>().unwrap_or(value.abs());
    magnitude.copysign(value)
}

#[derive(Debug, Serialize)]
pub struct PredictionOut {
    pub prediction: f64,
    pub rounded: f64,
    pub message: String,
}

impl From<Prediction> for PredictionOut {
    fn from(p: Prediction) -> Self {
        Self {
            prediction: p.value,
            rounded: p.rounded(),
            message: p.message(),
        }
    }
}

// ---------- Form schema ----------

#[derive(Debug, Serialize)]
pub struct NumericField {
    pub name: &'static str,
    pub min: f64,
    pub step: f64,
    pub integer: bool,
}

#[derive(Debug, Serialize)]
pub struct CategoricalField {
    pub name: &'static str,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FormOptions {
    pub numeric: Vec<NumericField>,
    pub categorical: Vec<CategoricalField>,
}

pub fn numeric_fields() -> Vec<NumericField> {
    vec![
        NumericField { name: "Order_ID", min: 1.0, step: 1.0, integer: true },
        NumericField { name: "Distance_km", min: 0.0, step: 0.1, integer: false },
        NumericField { name: "Preparation_Time_min", min: 0.0, step: 1.0, integer: true },
        NumericField { name: "Courier_Experience_yrs", min: 0.0, step: 1.0, integer: true },
    ]
}
