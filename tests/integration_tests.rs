use chrono::NaiveDate;
use httpmock::prelude::*;
use nbrb_rates::render::{write_table, OutputFormat, Table};
use nbrb_rates::{LocalStorage, MappingCache, NbrbClient, RateQuery, RatesError, RatesService};
use rust_decimal_macros::dec;
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

fn currencies_body() -> serde_json::Value {
    json!([
        {"Cur_ID": 145, "Cur_Abbreviation": "USD", "Cur_Name": "Доллар США", "Cur_Scale": 1,
         "Cur_DateStart": "1991-01-01T00:00:00", "Cur_DateEnd": "2016-07-01T00:00:00"},
        {"Cur_ID": 431, "Cur_Abbreviation": "USD", "Cur_Name": "Доллар США", "Cur_Scale": 1,
         "Cur_DateStart": "2016-07-01T00:00:00", "Cur_DateEnd": "2050-01-01T00:00:00"},
        {"Cur_ID": 456, "Cur_Abbreviation": "RUB", "Cur_Name": "Российских рублей", "Cur_Scale": 100,
         "Cur_DateStart": "2016-07-01T00:00:00", "Cur_DateEnd": "2050-01-01T00:00:00"}
    ])
}

fn service(
    server: &MockServer,
    dir: &TempDir,
) -> RatesService<NbrbClient, LocalStorage> {
    let client = NbrbClient::new(server.url("/API"), Duration::from_secs(5)).unwrap();
    let cache = MappingCache::new(LocalStorage::new(dir.path()), "nbrb_rates.json");
    RatesService::new(client, cache).with_today(NaiveDate::from_ymd_opt(2019, 1, 10).unwrap())
}

fn mock_currencies(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/API/ExRates/Currencies");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(currencies_body());
    })
}

#[tokio::test]
async fn test_init_writes_cache_file() -> anyhow::Result<()> {
    let server = MockServer::start();
    let currencies = mock_currencies(&server);
    let dir = TempDir::new()?;

    let count = service(&server, &dir).init_cache().await?;

    currencies.assert();
    assert_eq!(count, 3);
    let saved: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("nbrb_rates.json"))?)?;
    assert_eq!(saved.as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn test_lookup_without_cache_makes_no_requests() -> anyhow::Result<()> {
    let server = MockServer::start();
    let rates = server.mock(|when, then| {
        when.method(GET).path_contains("/API/ExRates/Rates");
        then.status(200).json_body(json!([]));
    });
    let dir = TempDir::new()?;

    let err = service(&server, &dir)
        .rates(&RateQuery::on_date(Some("USD"), "10.01.2019"))
        .await
        .unwrap_err();

    assert!(matches!(err, RatesError::MappingNotInitialized { .. }));
    rates.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_rate_on_date_uses_id_valid_on_that_date() -> anyhow::Result<()> {
    let server = MockServer::start();
    mock_currencies(&server);
    let rate = server.mock(|when, then| {
        when.method(GET)
            .path("/API/ExRates/Rates/431")
            .query_param("onDate", "2019-01-10");
        then.status(200).json_body(json!({
            "Cur_ID": 431, "Date": "2019-01-10T00:00:00", "Cur_Abbreviation": "USD",
            "Cur_Scale": 1, "Cur_Name": "Доллар США", "Cur_OfficialRate": 2.1598
        }));
    });
    let dir = TempDir::new()?;
    let service = service(&server, &dir);
    service.init_cache().await?;

    let report = service
        .rates(&RateQuery::on_date(Some("usd"), "10.01.19"))
        .await?;

    rate.assert();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].official_rate, dec!(2.1598));
    assert!(!report.request.is_series());
    Ok(())
}

#[tokio::test]
async fn test_series_fills_in_abbreviation_and_scale() -> anyhow::Result<()> {
    let server = MockServer::start();
    mock_currencies(&server);
    let dynamics = server.mock(|when, then| {
        when.method(GET)
            .path("/API/ExRates/Rates/Dynamics/456")
            .query_param("startDate", "2019-01-01")
            .query_param("endDate", "2019-01-03");
        then.status(200).json_body(json!([
            {"Cur_ID": 456, "Date": "2019-01-01T00:00:00", "Cur_OfficialRate": 3.1},
            {"Cur_ID": 456, "Date": "2019-01-02T00:00:00", "Cur_OfficialRate": 3.12},
            {"Cur_ID": 456, "Date": "2019-01-03T00:00:00", "Cur_OfficialRate": 3.15}
        ]));
    });
    let dir = TempDir::new()?;
    let service = service(&server, &dir);
    service.init_cache().await?;

    let report = service
        .rates(&RateQuery::series("RUB", "01.01.2019", "03.01.2019"))
        .await?;

    dynamics.assert();
    assert!(report.request.is_series());
    assert_eq!(report.records.len(), 3);
    assert!(report
        .records
        .iter()
        .all(|r| r.abbreviation == "RUB" && r.scale == 100));

    let mut out = Vec::new();
    write_table(&Table::from_rates(&report.records, true), OutputFormat::Csv, &mut out)?;
    assert_eq!(
        String::from_utf8(out)?,
        "Date,RUB rate\n01.01.2019,3.1\n02.01.2019,3.12\n03.01.2019,3.15\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_conversion_through_today_rates() -> anyhow::Result<()> {
    let server = MockServer::start();
    for (abbreviation, id, rate) in [("AAA", 1001, 2.5), ("BBB", 1002, 0.5)] {
        server.mock(move |when, then| {
            when.method(GET)
                .path(format!("/API/ExRates/Rates/{}", abbreviation))
                .query_param("ParamMode", "2");
            then.status(200).json_body(json!({
                "Cur_ID": id, "Date": "2019-01-10T00:00:00", "Cur_Abbreviation": abbreviation,
                "Cur_Scale": 1, "Cur_OfficialRate": rate
            }));
        });
    }
    let dir = TempDir::new()?;

    let conversion = service(&server, &dir)
        .convert("100", "AAA", "BBB", None)
        .await?;

    assert_eq!(conversion.converted, dec!(500));
    let table = Table::from_conversion(&conversion, 4);
    assert!(table
        .to_psql()
        .contains("|    100 | AAA  | = |       500 | BBB |"));
    Ok(())
}

#[tokio::test]
async fn test_refinancing_on_date() -> anyhow::Result<()> {
    let server = MockServer::start();
    let refinancing = server.mock(|when, then| {
        when.method(GET)
            .path("/API/RefinancingRate")
            .query_param("onDate", "2019-01-10");
        then.status(200)
            .json_body(json!([{"Date": "2018-06-27T00:00:00", "Value": 10.0}]));
    });
    let dir = TempDir::new()?;

    let report = service(&server, &dir)
        .refinancing(Some("10.01.2019"), false, None)
        .await?;

    refinancing.assert();
    assert_eq!(report.rates.len(), 1);
    assert_eq!(report.rates[0].value, dec!(10));
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_reported() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/API/ExRates/Currencies");
        then.status(500);
    });
    let dir = TempDir::new()?;

    let err = service(&server, &dir).init_cache().await.unwrap_err();

    assert!(matches!(err, RatesError::UnexpectedStatus { status: 500, .. }));
    assert!(!dir.path().join("nbrb_rates.json").exists());
    Ok(())
}
