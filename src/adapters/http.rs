use crate::core::request::{Endpoint, RateRequest, RefinancingRequest};
use crate::domain::model::{CurrencyMapping, RateDto, RefinancingRate};
use crate::domain::ports::{ConfigProvider, RateSource};
use crate::utils::error::{RatesError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.nbrb.by/API";

/// Client for the NBRB exchange rate API.
#[derive(Debug, Clone)]
pub struct NbrbClient {
    client: Client,
    base_url: String,
}

impl NbrbClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.base_url(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, endpoint: &Endpoint) -> Result<(String, Value)> {
        let url = endpoint.to_url(&self.base_url)?;
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(RatesError::UnexpectedStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let json_data: Value = response.json().await?;
        Ok((url.to_string(), json_data))
    }

    /// Fetches an endpoint that answers with an array, wrapping a lone object.
    async fn get_list<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<Vec<T>> {
        let (url, json_data) = self.get_json(endpoint).await?;
        let items = match json_data {
            Value::Array(items) => items,
            Value::Null => return Err(RatesError::EmptyResponse { url }),
            single => vec![single],
        };

        let parsed = items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<T>, _>>()?;
        tracing::debug!("Parsed {} records from {}", parsed.len(), url);
        Ok(parsed)
    }
}

#[async_trait]
impl RateSource for NbrbClient {
    async fn fetch_currencies(&self) -> Result<Vec<CurrencyMapping>> {
        self.get_list(&Endpoint::currencies()).await
    }

    async fn fetch_rates(&self, request: &RateRequest) -> Result<Vec<RateDto>> {
        let Some(endpoint) = request.endpoint() else {
            return Ok(Vec::new());
        };

        let rates: Vec<RateDto> = self.get_list(&endpoint).await?;
        if request.expects_single() && rates.is_empty() {
            return Err(RatesError::EmptyResponse {
                url: endpoint.to_url(&self.base_url)?.to_string(),
            });
        }
        Ok(rates)
    }

    async fn fetch_refinancing(
        &self,
        request: &RefinancingRequest,
    ) -> Result<Vec<RefinancingRate>> {
        self.get_list(&request.endpoint()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dates::DateValue;
    use httpmock::prelude::*;
    use rust_decimal_macros::dec;

    fn client(server: &MockServer) -> NbrbClient {
        NbrbClient::new(server.url("/API"), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_single_rate_object() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/API/ExRates/Rates/USD")
                .query_param("ParamMode", "2");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "Cur_ID": 431,
                    "Date": "2019-01-10T00:00:00",
                    "Cur_Abbreviation": "USD",
                    "Cur_Scale": 1,
                    "Cur_Name": "Доллар США",
                    "Cur_OfficialRate": 2.1598
                }));
        });

        let request = RateRequest::CurrencyToday {
            abbreviation: "USD".to_string(),
        };
        let rates = client(&server).fetch_rates(&request).await.unwrap();

        api_mock.assert();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].internal_id, 431);
        assert_eq!(rates[0].official_rate, Some(dec!(2.1598)));
    }

    #[tokio::test]
    async fn test_fetch_rate_list_on_date() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/API/ExRates/Rates")
                .query_param("onDate", "2016-07-06")
                .query_param("Periodicity", "0");
            then.status(200).json_body(serde_json::json!([
                {"Cur_ID": 170, "Date": "2016-07-06T00:00:00", "Cur_Abbreviation": "AUD",
                 "Cur_Scale": 1, "Cur_Name": "Австралийский доллар", "Cur_OfficialRate": 1.4959},
                {"Cur_ID": 298, "Date": "2016-07-06T00:00:00", "Cur_Abbreviation": "RUB",
                 "Cur_Scale": 100, "Cur_Name": "Российских рублей", "Cur_OfficialRate": 3.1026}
            ]));
        });

        let request = RateRequest::AllOnDate {
            date: DateValue::parse("06.07.2016").unwrap(),
        };
        let rates = client(&server).fetch_rates(&request).await.unwrap();

        api_mock.assert();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[1].scale, Some(100));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/API/ExRates/Rates/XYZ");
            then.status(404);
        });

        let request = RateRequest::CurrencyToday {
            abbreviation: "XYZ".to_string(),
        };
        let err = client(&server).fetch_rates(&request).await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, RatesError::UnexpectedStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/API/RefinancingRate");
            then.status(200).json_body(serde_json::json!([{"Date": "yesterday"}]));
        });

        let request = RefinancingRequest::Series { range: None };
        let err = client(&server).fetch_refinancing(&request).await.unwrap_err();
        assert!(matches!(err, RatesError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_base_request_skips_network() {
        let client = NbrbClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let request = RateRequest::Base { dates: vec![] };
        assert!(client.fetch_rates(&request).await.unwrap().is_empty());
    }
}
