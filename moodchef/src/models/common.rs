use serde::{Deserialize, Serialize};

/// How the user feels at the moment they ask for a recipe or rate one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Stressed,
    Adventurous,
    Comfort,
    #[default]
    Neutral,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Stressed => "stressed",
            Self::Adventurous => "adventurous",
            Self::Comfort => "comfort",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "happy" => Ok(Self::Happy),
            "stressed" => Ok(Self::Stressed),
            "adventurous" => Ok(Self::Adventurous),
            "comfort" => Ok(Self::Comfort),
            "neutral" => Ok(Self::Neutral),
            _ => Err(format!("Unknown mood: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl EnergyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EnergyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown energy level: {s}")),
        }
    }
}

/// Sentinel cuisine value meaning "no preference".
pub const ANY_CUISINE: &str = "Any";

pub const DIETARY_OPTIONS: &[&str] = &[
    "Vegetarian",
    "Vegan",
    "Gluten-Free",
    "Dairy-Free",
    "Keto",
    "Paleo",
    "Low-Carb",
    "Nut-Free",
];

pub const CUISINE_OPTIONS: &[&str] = &[
    ANY_CUISINE,
    "Italian",
    "Mexican",
    "Chinese",
    "Japanese",
    "Thai",
    "Indian",
    "Mediterranean",
    "American",
    "French",
    "Korean",
];
