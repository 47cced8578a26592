use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Dietary restriction a recommendation must honour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Restriction {
    #[serde(rename = "vegan")]
    Vegan,
    #[serde(rename = "no alcohol")]
    NoAlcohol,
    #[serde(rename = "no dairy")]
    NoDairy,
    #[serde(rename = "nut free")]
    NutFree,
}

impl Restriction {
    pub const ALL: [Restriction; 4] = [
        Restriction::Vegan,
        Restriction::NoAlcohol,
        Restriction::NoDairy,
        Restriction::NutFree,
    ];

    /// Ingredient fragments that disqualify a recipe
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Restriction::Vegan => &["蛋", "奶", "牛", "蜜", "鮮奶油"],
            Restriction::NoAlcohol => &["酒", "蘭姆", "威士忌", "啤酒"],
            Restriction::NoDairy => &["奶", "起司", "乳酪", "優格", "奶油"],
            Restriction::NutFree => &["杏仁", "核桃", "堅果", "花生", "開心果"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Restriction::Vegan => "vegan",
            Restriction::NoAlcohol => "no alcohol",
            Restriction::NoDairy => "no dairy",
            Restriction::NutFree => "nut free",
        }
    }
}

impl Display for Restriction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Restriction {
    type Err = String;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Restriction::ALL
            .into_iter()
            .find(|r| r.as_str() == key)
            .ok_or_else(|| format!("Unknown restriction: {}", s))
    }
}
