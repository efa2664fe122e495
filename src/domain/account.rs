use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named balance resource owned by the banking server.
///
/// The client only ever holds cached copies; the server assigns `id` and is
/// authoritative for `balance`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub owner: String,
    pub balance: f64,
    #[serde(default, with = "created_at")]
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        id: impl Into<String>,
        owner: impl Into<String>,
        balance: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            balance,
            created_at,
        }
    }

    /// Balance rendered with two decimals, e.g. `$150.00`.
    pub fn formatted_balance(&self) -> String {
        format_amount(self.balance)
    }

    /// Short label used by pickers: `Alice ($150.00)`.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.owner, self.formatted_balance())
    }
}

pub fn format_amount(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Payload for `POST /accounts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub owner: String,
    pub initial_deposit: f64,
}

impl NewAccount {
    pub fn new(owner: impl Into<String>, initial_deposit: f64) -> Self {
        Self {
            owner: owner.into(),
            initial_deposit,
        }
    }
}

/// `createdAt` is informational only. RFC 3339 text, bare dates, naive
/// date-times and epoch milliseconds are understood; anything else (including
/// `null`) falls back to the epoch so one odd record never fails a list decode.
mod created_at {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
    use serde::{de::IgnoredAny, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Millis(i64),
        FractionalMillis(f64),
        Other(IgnoredAny),
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Text(text) => parse_text(text.trim()),
            RawTimestamp::Millis(millis) => Utc.timestamp_millis_opt(millis).single(),
            RawTimestamp::FractionalMillis(millis) => {
                Utc.timestamp_millis_opt(millis as i64).single()
            }
            RawTimestamp::Other(_) => None,
        };
        if parsed.is_none() {
            tracing::debug!("unrecognised createdAt value; using the epoch");
        }
        Ok(parsed.unwrap_or_default())
    }

    fn parse_text(text: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
            return Some(parsed.with_timezone(&Utc));
        }
        ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .map(|naive| naive.and_utc())
    }
}
