use crate::utils::error::{RatesError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO code of the national currency every official rate is quoted against.
pub const BASE_CURRENCY: &str = "BYN";
pub const BASE_CURRENCY_ID: u32 = 1;
const BASE_CURRENCY_NAME: &str = "Belarusian ruble";

fn base_currency_since() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 7, 5).unwrap_or(NaiveDate::MIN)
}

pub fn is_base_currency(abbreviation: &str) -> bool {
    abbreviation.trim().eq_ignore_ascii_case(BASE_CURRENCY)
}

/// One row of the bank's currency listing, as stored in the mapping cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyMapping {
    #[serde(rename = "Cur_ID")]
    pub internal_id: u32,
    #[serde(rename = "Cur_Abbreviation")]
    pub abbreviation: String,
    #[serde(rename = "Cur_Name", default)]
    pub name: String,
    #[serde(rename = "Cur_Scale", default = "default_scale")]
    pub scale: u32,
    #[serde(rename = "Cur_DateStart", with = "bank_date")]
    pub valid_from: NaiveDate,
    #[serde(rename = "Cur_DateEnd", with = "bank_date")]
    pub valid_to: NaiveDate,
}

fn default_scale() -> u32 {
    1
}

impl CurrencyMapping {
    /// Synthetic record for the base currency. It never appears in the bank's
    /// own listing or rate feed.
    pub fn base() -> Self {
        Self {
            internal_id: BASE_CURRENCY_ID,
            abbreviation: BASE_CURRENCY.to_string(),
            name: BASE_CURRENCY_NAME.to_string(),
            scale: 1,
            valid_from: base_currency_since(),
            valid_to: NaiveDate::MAX,
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.valid_from <= date && date <= self.valid_to
    }

    pub fn overlaps(&self, other: &CurrencyMapping) -> bool {
        self.abbreviation.eq_ignore_ascii_case(&other.abbreviation)
            && self.valid_from <= other.valid_to
            && other.valid_from <= self.valid_to
    }
}

/// Rate row as the bank sends it. The range endpoint only fills
/// `Cur_ID`, `Date` and `Cur_OfficialRate`.
#[derive(Debug, Clone, Deserialize)]
pub struct RateDto {
    #[serde(rename = "Cur_ID")]
    pub internal_id: u32,
    #[serde(rename = "Date", with = "bank_date")]
    pub date: NaiveDate,
    #[serde(rename = "Cur_Abbreviation", default)]
    pub abbreviation: Option<String>,
    #[serde(rename = "Cur_Scale", default)]
    pub scale: Option<u32>,
    #[serde(rename = "Cur_Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Cur_OfficialRate", default)]
    pub official_rate: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRecord {
    pub date: NaiveDate,
    pub abbreviation: String,
    pub official_rate: Decimal,
    pub scale: u32,
}

impl RateRecord {
    pub fn base(date: NaiveDate) -> Self {
        Self {
            date,
            abbreviation: BASE_CURRENCY.to_string(),
            official_rate: Decimal::ONE,
            scale: 1,
        }
    }

    /// Builds a record from a wire row, taking missing abbreviation and scale
    /// from the currency the request was resolved to.
    pub fn from_dto(dto: RateDto, currency: Option<&CurrencyMapping>) -> Result<Self> {
        let abbreviation = dto
            .abbreviation
            .or_else(|| currency.map(|c| c.abbreviation.clone()))
            .unwrap_or_else(|| dto.internal_id.to_string());

        let official_rate = dto.official_rate.ok_or_else(|| RatesError::InvalidRate {
            abbreviation: abbreviation.clone(),
        })?;

        let scale = dto
            .scale
            .or_else(|| currency.map(|c| c.scale))
            .unwrap_or(1);

        Ok(Self {
            date: dto.date,
            abbreviation,
            official_rate,
            scale,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinancingRate {
    #[serde(rename = "Date", with = "bank_date")]
    pub date: NaiveDate,
    #[serde(rename = "Value")]
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub amount: Decimal,
    pub from: RateRecord,
    pub to: RateRecord,
    pub converted: Decimal,
}

/// The bank stamps every date as `YYYY-MM-DDT00:00:00`.
pub mod bank_date {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}T00:00:00", date.format("%Y-%m-%d")))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid bank date: {}", raw)))
    }

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        NaiveDateTime::parse_from_str(raw, FORMAT)
            .map(|dt| dt.date())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    }
}
