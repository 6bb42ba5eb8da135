use crate::core::dates::DateValue;
use crate::core::resolver::CurrencyResolver;
use crate::domain::model::{is_base_currency, CurrencyMapping, RateRecord};
use crate::domain::ports::Storage;
use crate::utils::error::{RatesError, Result};
use chrono::NaiveDate;
use url::Url;

const RATES_PATH: &str = "ExRates/Rates";
const CURRENCIES_PATH: &str = "ExRates/Currencies";
const REFINANCING_PATH: &str = "RefinancingRate";

/// Path and query of one bank API call, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub query: Vec<(&'static str, String)>,
}

impl Endpoint {
    fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    pub fn currencies() -> Self {
        Self::new(CURRENCIES_PATH)
    }

    pub fn to_url(&self, base_url: &str) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.path
        ))?;
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RateRequest {
    /// Today's rates of every currency.
    AllToday,
    AllOnDate { date: DateValue },
    /// Looked up by ISO code, so no mapping is needed.
    CurrencyToday { abbreviation: String },
    CurrencyOnDate {
        currency: CurrencyMapping,
        date: DateValue,
    },
    CurrencySeries {
        currency: CurrencyMapping,
        start: DateValue,
        end: DateValue,
    },
    /// The base currency is answered locally.
    Base { dates: Vec<NaiveDate> },
}

impl RateRequest {
    /// `None` for requests that never reach the network.
    pub fn endpoint(&self) -> Option<Endpoint> {
        let endpoint = match self {
            RateRequest::AllToday => Endpoint::new(RATES_PATH).param("Periodicity", "0"),
            RateRequest::AllOnDate { date } => Endpoint::new(RATES_PATH)
                .param("onDate", date.wire())
                .param("Periodicity", "0"),
            RateRequest::CurrencyToday { abbreviation } => {
                Endpoint::new(format!("{}/{}", RATES_PATH, abbreviation)).param("ParamMode", "2")
            }
            RateRequest::CurrencyOnDate { currency, date } => {
                Endpoint::new(format!("{}/{}", RATES_PATH, currency.internal_id))
                    .param("onDate", date.wire())
            }
            RateRequest::CurrencySeries {
                currency,
                start,
                end,
            } => Endpoint::new(format!("{}/Dynamics/{}", RATES_PATH, currency.internal_id))
                .param("startDate", start.wire())
                .param("endDate", end.wire()),
            RateRequest::Base { .. } => return None,
        };
        Some(endpoint)
    }

    /// Whether the bank answers with a single object instead of an array.
    pub fn expects_single(&self) -> bool {
        matches!(
            self,
            RateRequest::CurrencyToday { .. } | RateRequest::CurrencyOnDate { .. }
        )
    }

    pub fn currency(&self) -> Option<&CurrencyMapping> {
        match self {
            RateRequest::CurrencyOnDate { currency, .. }
            | RateRequest::CurrencySeries { currency, .. } => Some(currency),
            _ => None,
        }
    }

    pub fn is_series(&self) -> bool {
        matches!(self, RateRequest::CurrencySeries { .. })
            || matches!(self, RateRequest::Base { dates } if dates.len() > 1)
    }

    pub fn offline_records(&self) -> Option<Vec<RateRecord>> {
        match self {
            RateRequest::Base { dates } => {
                Some(dates.iter().copied().map(RateRecord::base).collect())
            }
            _ => None,
        }
    }
}

/// Raw user input for a rate lookup, dates not yet normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateQuery {
    pub currency: Option<String>,
    pub date: Option<String>,
    pub range: Option<(String, String)>,
}

impl RateQuery {
    pub fn today(currency: Option<&str>) -> Self {
        Self {
            currency: currency.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn on_date(currency: Option<&str>, date: &str) -> Self {
        Self {
            currency: currency.map(str::to_string),
            date: Some(date.to_string()),
            range: None,
        }
    }

    pub fn series(currency: &str, start: &str, end: &str) -> Self {
        Self {
            currency: Some(currency.to_string()),
            date: None,
            range: Some((start.to_string(), end.to_string())),
        }
    }
}

pub fn parse_range(start: &str, end: &str) -> Result<(DateValue, DateValue)> {
    let start_date = DateValue::parse(start)?;
    let end_date = DateValue::parse(end)?;
    if start_date > end_date {
        return Err(RatesError::InvalidDateRange {
            start: start_date.display(),
            end: end_date.display(),
        });
    }
    Ok((start_date, end_date))
}

/// ISO 4217 codes only; anything else would end up in the URL path.
fn check_currency_code(input: &str) -> Result<&str> {
    if input.len() == 3 && input.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(input)
    } else {
        Err(RatesError::InvalidCurrency {
            input: input.to_string(),
        })
    }
}

/// Turns a [`RateQuery`] into a concrete request. All dates are validated
/// before the mapping cache is read, so a bad date never costs a lookup.
pub async fn build_rate_request<S: Storage>(
    query: &RateQuery,
    resolver: &CurrencyResolver<S>,
    today: NaiveDate,
) -> Result<RateRequest> {
    let currency = query
        .currency
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(check_currency_code)
        .transpose()?;

    if let Some((start, end)) = &query.range {
        let (start, end) = parse_range(start, end)?;
        let Some(abbreviation) = currency else {
            return Err(RatesError::InvalidDateRange {
                start: start.display(),
                end: end.display(),
            });
        };

        if is_base_currency(abbreviation) {
            let mut dates = vec![start.date()];
            if end != start {
                dates.push(end.date());
            }
            return Ok(RateRequest::Base { dates });
        }

        let mapping = resolver.resolve(abbreviation, start).await?;
        return Ok(RateRequest::CurrencySeries {
            currency: mapping,
            start,
            end,
        });
    }

    let date = query.date.as_deref().map(DateValue::parse).transpose()?;

    match (currency, date) {
        (None, None) => Ok(RateRequest::AllToday),
        (None, Some(date)) => Ok(RateRequest::AllOnDate { date }),
        (Some(abbreviation), date) if is_base_currency(abbreviation) => Ok(RateRequest::Base {
            dates: vec![date.map(|d| d.date()).unwrap_or(today)],
        }),
        (Some(abbreviation), None) => Ok(RateRequest::CurrencyToday {
            abbreviation: abbreviation.to_uppercase(),
        }),
        (Some(abbreviation), Some(date)) => {
            let mapping = resolver.resolve(abbreviation, date).await?;
            Ok(RateRequest::CurrencyOnDate {
                currency: mapping,
                date,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefinancingRequest {
    OnDate { date: DateValue },
    /// Whole history, optionally cut down to `[start, end]` after the fetch.
    Series {
        range: Option<(DateValue, DateValue)>,
    },
}

impl RefinancingRequest {
    pub fn build(
        date: Option<&str>,
        all: bool,
        range: Option<(&str, &str)>,
        today: NaiveDate,
    ) -> Result<Self> {
        if let Some((start, end)) = range {
            let range = parse_range(start, end)?;
            return Ok(RefinancingRequest::Series { range: Some(range) });
        }
        if let Some(date) = date {
            return Ok(RefinancingRequest::OnDate {
                date: DateValue::parse(date)?,
            });
        }
        if all {
            return Ok(RefinancingRequest::Series { range: None });
        }
        Ok(RefinancingRequest::OnDate {
            date: DateValue::new(today),
        })
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            RefinancingRequest::OnDate { date } => {
                Endpoint::new(REFINANCING_PATH).param("onDate", date.wire())
            }
            RefinancingRequest::Series { .. } => Endpoint::new(REFINANCING_PATH),
        }
    }

    pub fn range(&self) -> Option<(DateValue, DateValue)> {
        match self {
            RefinancingRequest::Series { range } => *range,
            RefinancingRequest::OnDate { .. } => None,
        }
    }

    pub fn is_series(&self) -> bool {
        matches!(self, RefinancingRequest::Series { .. })
    }
}
