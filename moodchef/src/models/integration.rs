use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Third-party services a user can link. None of them sync yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationType {
    AppleHealth,
    GoogleFit,
    Fitbit,
    Instacart,
    UberEats,
    Doordash,
}

impl IntegrationType {
    pub const ALL: [IntegrationType; 6] = [
        Self::AppleHealth,
        Self::GoogleFit,
        Self::Fitbit,
        Self::Instacart,
        Self::UberEats,
        Self::Doordash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppleHealth => "apple_health",
            Self::GoogleFit => "google_fit",
            Self::Fitbit => "fitbit",
            Self::Instacart => "instacart",
            Self::UberEats => "uber_eats",
            Self::Doordash => "doordash",
        }
    }
}

impl std::fmt::Display for IntegrationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IntegrationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("Unknown integration type: {s}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationStatus {
    pub integration_type: IntegrationType,
    pub is_connected: bool,
    #[schema(value_type = Option<String>)]
    pub last_synced: Option<DateTime<Utc>>,
    pub status_message: Option<String>,
}

impl IntegrationStatus {
    pub fn disconnected(integration_type: IntegrationType) -> Self {
        Self {
            integration_type,
            is_connected: false,
            last_synced: None,
            status_message: None,
        }
    }
}
