use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::datetime;
use crate::utils::log_sanitizer::mask_secret;

// ============ Credentials ============

/// Porkbun API key pair.
///
/// Both keys are sent in the JSON body of every authenticated request.
/// `Debug` only ever prints the masked API key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// API key (`pk1_...`).
    pub api_key: String,
    /// Secret API key (`sk1_...`).
    pub secret_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Whether both keys are present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty()
    }

    /// API key reduced to its last four characters, safe for logs.
    pub fn masked_api_key(&self) -> String {
        mask_secret(&self.api_key)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.masked_api_key())
            .field("secret_key", &"***")
            .finish()
    }
}

// ============ Domain Types ============

/// Registration status of a domain.
///
/// Porkbun reports statuses as upper-case strings; unrecognised values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainStatus {
    Active,
    Expired,
    TransferPending,
    WhoisPending,
    Other(String),
}

impl DomainStatus {
    /// Parse the API status string (case-insensitive).
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "ACTIVE" => Self::Active,
            "EXPIRED" => Self::Expired,
            "TRANSFER PENDING" => Self::TransferPending,
            "WHOIS PENDING" => Self::WhoisPending,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// The API representation of the status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
            Self::TransferPending => "TRANSFER PENDING",
            Self::WhoisPending => "WHOIS PENDING",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DomainStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DomainStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// WHOIS privacy state of a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WhoisPrivacy {
    Enabled,
    Disabled,
    #[serde(rename = "NOT ELIGIBLE")]
    NotEligible,
}

impl WhoisPrivacy {
    /// Map Porkbun's privacy flag onto the privacy state.
    pub fn from_flag(flag: Option<bool>) -> Option<Self> {
        flag.map(|on| if on { Self::Enabled } else { Self::Disabled })
    }
}

/// A label attached to a domain in the Porkbun dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainLabel {
    #[serde(default, deserialize_with = "flexible_string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub color: String,
}

/// A domain registered in the Porkbun account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// Domain name (e.g. `"example.com"`).
    pub domain: String,
    /// Registration status.
    pub status: DomainStatus,
    /// Top-level domain without the leading dot.
    #[serde(default)]
    pub tld: String,
    /// Registration date.
    #[serde(default, with = "datetime")]
    pub create_date: Option<DateTime<Utc>>,
    /// Expiration date.
    #[serde(default, with = "datetime")]
    pub expire_date: Option<DateTime<Utc>>,
    /// Registrar lock.
    #[serde(default, deserialize_with = "flexible_bool")]
    pub security_lock: Option<bool>,
    /// WHOIS privacy enabled.
    #[serde(default, deserialize_with = "flexible_bool")]
    pub whois_privacy: Option<bool>,
    /// Auto-renew enabled.
    #[serde(default, deserialize_with = "flexible_bool")]
    pub auto_renew: Option<bool>,
    /// Whether the domain is not managed at Porkbun.
    #[serde(default, deserialize_with = "flexible_bool")]
    pub not_local: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<DomainLabel>,
}

impl Domain {
    /// WHOIS privacy expressed as a state.
    pub fn whois_privacy_state(&self) -> Option<WhoisPrivacy> {
        WhoisPrivacy::from_flag(self.whois_privacy)
    }
}

/// Transfer authorization (EPP) code of a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCode {
    pub domain: String,
    pub auth_code: String,
}

/// Outcome of a renewal request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewalResult {
    pub domain: String,
    pub years: u32,
    pub success: bool,
    pub message: String,
    /// New expiration date, when the API reports one.
    #[serde(default, with = "datetime")]
    pub new_expire_date: Option<DateTime<Utc>>,
}

/// Registration, renewal and transfer prices of a TLD.
///
/// Prices are the decimal strings sent by the API (USD).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingInfo {
    pub tld: String,
    pub registration: Option<String>,
    pub renewal: Option<String>,
    pub transfer: Option<String>,
}

// ============ Serde helpers ============

/// Accept `true`/`false`, `1`/`0` and `"1"`/`"0"`/`"yes"`/`"no"`.
///
/// Unrecognised strings are logged and read as unknown.
fn flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flag::Bool(b)) => Ok(Some(b)),
        Some(Flag::Int(i)) => Ok(Some(i != 0)),
        Some(Flag::Str(s)) => match s.trim().to_lowercase().as_str() {
            "" => Ok(None),
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            other => {
                log::warn!("Ignoring unrecognised flag value: {other}");
                Ok(None)
            }
        },
    }
}

/// Accept numbers and strings for identifiers.
fn flexible_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Int(i64),
        Str(String),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Int(i)) => i.to_string(),
        Some(Id::Str(s)) => s,
        None => String::new(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
