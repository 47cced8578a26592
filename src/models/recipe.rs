use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::fmt::Display;
use std::hash::{Hash, Hasher};

/// Identifier of a recipe as written in the dataset
///
/// Ids compare by type as well as value: `1` and `"1"` are different recipes,
/// while `1` and `1.0` are the same one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeId {
    Number(Number),
    Text(String),
}

impl RecipeId {
    /// Reads an id out of an arbitrary JSON value, if it has an id shape
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(RecipeId::Number(n.clone())),
            Value::String(s) => Some(RecipeId::Text(s.clone())),
            _ => None,
        }
    }
}

impl From<i64> for RecipeId {
    fn from(id: i64) -> Self {
        RecipeId::Number(id.into())
    }
}

impl PartialEq for RecipeId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RecipeId::Number(a), RecipeId::Number(b)) => match (a.as_i64(), b.as_i64()) {
                (Some(a), Some(b)) => a == b,
                _ => a.as_f64() == b.as_f64(),
            },
            (RecipeId::Text(a), RecipeId::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for RecipeId {}

impl Hash for RecipeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            RecipeId::Number(n) => match n.as_i64() {
                Some(id) => id.hash(state),
                None => {
                    let id = n.as_f64().unwrap_or_default();
                    // integral floats hash like the matching integer
                    if id.fract() == 0.0 && id >= i64::MIN as f64 && id < i64::MAX as f64 {
                        (id as i64).hash(state)
                    } else {
                        id.to_bits().hash(state)
                    }
                }
            },
            RecipeId::Text(id) => id.hash(state),
        }
    }
}

impl Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecipeId::Number(id) => write!(f, "{}", id),
            RecipeId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// Reads an id leniently; values without an id shape count as missing
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<RecipeId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RecipeId::from_value(&Value::deserialize(deserializer)?))
}

/// Treats an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Bounds of a time range, e.g. `{"min": 30, "max": 45}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(default)]
    pub min: Option<Value>,
    #[serde(default)]
    pub max: Option<Value>,
}

/// Total preparation time as found in the dataset
///
/// The dataset is hand-written, so the value is kept raw and only coerced
/// to minutes when ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TotalTime {
    Range(TimeRange),
    Scalar(Value),
}

impl<'de> Deserialize<'de> for TotalTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Object(map) => serde_json::from_value(Value::Object(map))
                .map(TotalTime::Range)
                .map_err(serde::de::Error::custom),
            other => Ok(TotalTime::Scalar(other)),
        }
    }
}

impl Default for TotalTime {
    fn default() -> Self {
        TotalTime::Scalar(Value::from(0))
    }
}

impl TotalTime {
    /// Minutes used for filtering and ranking; 0 means unknown
    ///
    /// A range prefers its lower bound. Anything that cannot be read as a
    /// number degrades to 0.
    pub fn minutes(&self) -> i64 {
        match self {
            TotalTime::Range(range) => match (&range.min, &range.max) {
                (Some(min), _) => coerce_minutes(min),
                (None, Some(max)) => coerce_minutes(max),
                (None, None) => 0,
            },
            TotalTime::Scalar(value) => coerce_minutes(value),
        }
    }
}

/// Coerces a loosely typed JSON value to whole minutes
pub fn coerce_minutes(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                })
                .unwrap_or(0)
        }
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// A dessert recipe from the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<RecipeId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub total_time: TotalTime,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Recipe {
    /// Extracted total time in minutes (0 when unknown)
    pub fn minutes(&self) -> i64 {
        self.total_time.minutes()
    }

    /// Lowercased, space-joined ingredient text used for restriction checks
    pub fn ingredients_text(&self) -> String {
        self.ingredients.join(" ").to_lowercase()
    }

    /// Identity used to avoid recommending the same recipe twice
    pub fn identity(&self) -> (Option<&RecipeId>, &str) {
        (self.id.as_ref(), self.name.as_str())
    }
}
