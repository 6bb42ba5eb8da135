use crate::core::conversion::parse_amount;
use crate::core::dates::DateValue;
use crate::core::request::{build_rate_request, RateQuery, RateRequest, RefinancingRequest};
use crate::core::resolver::{find_overlaps, CurrencyResolver, MappingCache};
use crate::domain::model::{Conversion, RateRecord, RefinancingRate};
use crate::domain::ports::{RateSource, Storage};
use crate::utils::error::{RatesError, Result};
use chrono::{Local, NaiveDate};

/// Result of a rate lookup together with the request that produced it.
#[derive(Debug, Clone)]
pub struct RateReport {
    pub request: RateRequest,
    pub records: Vec<RateRecord>,
}

#[derive(Debug, Clone)]
pub struct RefinancingReport {
    pub request: RefinancingRequest,
    pub rates: Vec<RefinancingRate>,
}

/// Command handlers behind the CLI subcommands.
pub struct RatesService<R: RateSource, S: Storage> {
    source: R,
    resolver: CurrencyResolver<S>,
    today: Option<NaiveDate>,
}

impl<R: RateSource, S: Storage> RatesService<R, S> {
    pub fn new(source: R, cache: MappingCache<S>) -> Self {
        Self {
            source,
            resolver: CurrencyResolver::new(cache),
            today: None,
        }
    }

    /// Pins "today" instead of reading the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn resolver(&self) -> &CurrencyResolver<S> {
        &self.resolver
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Downloads the currency listing and overwrites the mapping cache.
    pub async fn init_cache(&self) -> Result<usize> {
        tracing::info!("Downloading currency listing");
        let records = self.source.fetch_currencies().await?;
        if records.is_empty() {
            return Err(RatesError::EmptyMapping);
        }

        for (a, b) in find_overlaps(&records) {
            tracing::warn!(
                "Overlapping mapping for {}: id {} ({} - {}) and id {} ({} - {})",
                a.abbreviation,
                a.internal_id,
                a.valid_from,
                a.valid_to,
                b.internal_id,
                b.valid_from,
                b.valid_to
            );
        }

        self.resolver.cache().save(&records).await?;
        tracing::info!(
            "Saved {} currency mappings to {}",
            records.len(),
            self.resolver.cache().file_name()
        );
        Ok(records.len())
    }

    pub async fn rates(&self, query: &RateQuery) -> Result<RateReport> {
        let request = build_rate_request(query, &self.resolver, self.today()).await?;
        let records = self.fetch_rate_records(&request).await?;
        tracing::info!("Fetched {} rate records", records.len());
        Ok(RateReport { request, records })
    }

    async fn fetch_rate_records(&self, request: &RateRequest) -> Result<Vec<RateRecord>> {
        if let Some(records) = request.offline_records() {
            return Ok(records);
        }

        let rows = self.source.fetch_rates(request).await?;
        let currency = request.currency();
        rows.into_iter()
            .map(|row| RateRecord::from_dto(row, currency))
            .collect()
    }

    pub async fn refinancing(
        &self,
        date: Option<&str>,
        all: bool,
        range: Option<(&str, &str)>,
    ) -> Result<RefinancingReport> {
        let request = RefinancingRequest::build(date, all, range, self.today())?;
        let mut rates = self.source.fetch_refinancing(&request).await?;

        if let Some((start, end)) = request.range() {
            rates.retain(|r| start.date() <= r.date && r.date <= end.date());
        }
        rates.sort_by_key(|r| r.date);

        Ok(RefinancingReport { request, rates })
    }

    /// Converts `amount` between two currencies at the official rates of
    /// `date`, or today's rates when no date is given.
    pub async fn convert(
        &self,
        amount: &str,
        from: &str,
        to: &str,
        date: Option<&str>,
    ) -> Result<Conversion> {
        let amount = parse_amount(amount)?;
        if let Some(date) = date {
            DateValue::parse(date)?;
        }

        let rate_from = self.single_rate(from, date).await?;
        let rate_to = self.single_rate(to, date).await?;
        Conversion::new(amount, rate_from, rate_to)
    }

    async fn single_rate(&self, currency: &str, date: Option<&str>) -> Result<RateRecord> {
        let query = RateQuery {
            currency: Some(currency.to_string()),
            date: date.map(str::to_string),
            range: None,
        };
        let request = build_rate_request(&query, &self.resolver, self.today()).await?;
        let records = self.fetch_rate_records(&request).await?;

        records.into_iter().next().ok_or_else(|| RatesError::EmptyResponse {
            url: request
                .endpoint()
                .map(|e| e.path)
                .unwrap_or_else(|| currency.to_string()),
        })
    }
}
