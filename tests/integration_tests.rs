use anyhow::Result;
use clap::Parser;
use httpmock::prelude::*;
use neighborhood_etl::adapters::xlsx_reader::read_sheet;
use neighborhood_etl::adapters::xlsx_writer::write_workbook;
use neighborhood_etl::core::{CellValue, ConfigProvider};
use neighborhood_etl::{
    CliConfig, EtlEngine, EtlError, LocalStorage, MapboxGeocoder, NeighborhoodPipeline,
    TomlConfig,
};
use std::path::Path;
use tempfile::TempDir;

fn firms_grid() -> Vec<Vec<CellValue>> {
    vec![
        vec!["Industry".into(), "Latitude".into(), "Longitude".into(), "Founded".into()],
        vec![
            "Tech".into(),
            CellValue::Float(40.7128),
            CellValue::Float(-74.0060),
            CellValue::Float(2015.0),
        ],
        vec![
            "Food".into(),
            CellValue::Float(40.7411),
            CellValue::Float(-73.9897),
            CellValue::Float(2011.0),
        ],
        vec![
            "Fashion".into(),
            CellValue::Float(40.7549),
            CellValue::Float(-73.9840),
            CellValue::Empty,
        ],
    ]
}

fn write_input(dir: &Path) -> String {
    let path = dir.join("firms.xlsx");
    std::fs::write(&path, write_workbook(&firms_grid(), "Sheet1").unwrap()).unwrap();
    path.to_str().unwrap().to_string()
}

fn mock_neighborhood<'a>(
    server: &'a MockServer,
    lon_lat: &str,
    neighborhood: &str,
) -> httpmock::Mock<'a> {
    let path = format!("/geocoding/v5/mapbox.places/{}.json", lon_lat);
    let body = serde_json::json!({
        "type": "FeatureCollection",
        "features": [{"context": [{"id": "neighborhood.1", "text": neighborhood}]}]
    });
    server.mock(move |when, then| {
        when.method(GET).path(path).query_param("access_token", "pk.test");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(body);
    })
}

fn cli_config(server: &MockServer, input: &str, output_stem: &str) -> CliConfig {
    CliConfig::try_parse_from([
        "neighborhood-etl",
        input,
        output_stem,
        "--access-token",
        "pk.test",
        "--endpoint",
        server.base_url().as_str(),
        "--progress-interval",
        "2",
    ])
    .unwrap()
}

async fn run_cli(config: CliConfig) -> neighborhood_etl::Result<String> {
    let geocoder = MapboxGeocoder::new(config.geocoder_settings())?;
    let pipeline = NeighborhoodPipeline::new(LocalStorage::default(), geocoder, config);
    EtlEngine::new(pipeline).run().await
}

fn read_output(path: &str) -> Vec<Vec<CellValue>> {
    let bytes = std::fs::read(path).unwrap();
    read_sheet(bytes, "data", 4)
        .unwrap()
        .into_iter()
        .map(|r| r.cells)
        .collect()
}

#[tokio::test]
async fn test_end_to_end_enriches_every_row() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_input(temp_dir.path());
    let stem = temp_dir.path().join("firms_neighborhoods");

    let server = MockServer::start();
    let chelsea = mock_neighborhood(&server, "-74.006,40.7128", "Chelsea");
    let flatiron = mock_neighborhood(&server, "-73.9897,40.7411", "Flatiron");
    let midtown = mock_neighborhood(&server, "-73.984,40.7549", "Midtown");

    let config = cli_config(&server, &input, stem.to_str().unwrap());
    let output_path = run_cli(config).await?;

    chelsea.assert();
    flatiron.assert();
    midtown.assert();
    assert!(output_path.ends_with("firms_neighborhoods.xlsx"));
    assert!(Path::new(&output_path).exists());

    let rows = read_output(&output_path);
    assert_eq!(rows.len(), 4);
    assert_eq!(
        rows[0],
        vec![
            CellValue::from("Industry"),
            CellValue::from("Latitude"),
            CellValue::from("Longitude"),
            CellValue::from("Neighborhood"),
        ]
    );
    assert_eq!(
        rows[1],
        vec![
            CellValue::from("Tech"),
            CellValue::Float(40.7128),
            CellValue::Float(-74.0060),
            CellValue::from("Chelsea"),
        ]
    );
    assert_eq!(rows[2][3], CellValue::from("Flatiron"));
    assert_eq!(rows[3][0], CellValue::from("Fashion"));
    assert_eq!(rows[3][3], CellValue::from("Midtown"));

    Ok(())
}

#[tokio::test]
async fn test_failed_lookup_leaves_no_output_and_rerun_succeeds() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_input(temp_dir.path());
    let stem = temp_dir.path().join("out");
    let output_file = temp_dir.path().join("out.xlsx");

    let server = MockServer::start();
    let mut chelsea = mock_neighborhood(&server, "-74.006,40.7128", "Chelsea");
    let mut broken = server.mock(|when, then| {
        when.method(GET)
            .path("/geocoding/v5/mapbox.places/-73.9897,40.7411.json");
        then.status(503);
    });
    let mut midtown = mock_neighborhood(&server, "-73.984,40.7549", "Midtown");

    let err = run_cli(cli_config(&server, &input, stem.to_str().unwrap()))
        .await
        .unwrap_err();

    assert!(matches!(err, EtlError::GeocodeStatus { status: 503, .. }));
    assert_eq!(err.exit_code(), 2);
    chelsea.assert_hits(1);
    broken.assert_hits(1);
    midtown.assert_hits(0);
    assert!(!output_file.exists());

    chelsea.delete();
    broken.delete();
    midtown.delete();

    let chelsea = mock_neighborhood(&server, "-74.006,40.7128", "Chelsea");
    let flatiron = mock_neighborhood(&server, "-73.9897,40.7411", "Flatiron");
    let midtown = mock_neighborhood(&server, "-73.984,40.7549", "Midtown");

    run_cli(cli_config(&server, &input, stem.to_str().unwrap())).await?;

    chelsea.assert();
    flatiron.assert();
    midtown.assert();
    let rows = read_output(output_file.to_str().unwrap());
    assert_eq!(rows.len(), 4);

    Ok(())
}

#[tokio::test]
async fn test_missing_sheet_fails_before_any_request() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_input(temp_dir.path());
    let stem = temp_dir.path().join("out");

    let server = MockServer::start();
    let any_request = server.mock(|when, then| {
        when.method(GET);
        then.status(200);
    });

    let mut config = cli_config(&server, &input, stem.to_str().unwrap());
    config.sheet = "Firms".to_string();

    let err = run_cli(config).await.unwrap_err();

    assert!(matches!(err, EtlError::SheetNotFound { .. }));
    any_request.assert_hits(0);
    assert!(!temp_dir.path().join("out.xlsx").exists());

    Ok(())
}

#[tokio::test]
async fn test_missing_input_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let missing = temp_dir.path().join("nope.xlsx");
    let stem = temp_dir.path().join("out");

    let err = run_cli(cli_config(
        &server,
        missing.to_str().unwrap(),
        stem.to_str().unwrap(),
    ))
    .await
    .unwrap_err();

    assert!(matches!(err, EtlError::IoError(_)));

    Ok(())
}

#[tokio::test]
async fn test_toml_configured_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_input(temp_dir.path());
    let stem = temp_dir.path().join("toml_out");

    let server = MockServer::start();
    let lookups = server.mock(|when, then| {
        when.method(GET)
            .query_param("access_token", "pk.test")
            .query_param("types", "neighborhood");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"features": [{"context": [{"text": "Midtown"}]}]}));
    });

    let content = format!(
        r#"
[pipeline]
name = "toml-test"

[source]
path = "{}"
max_column = "C"

[geocoder]
endpoint = "{}"
access_token = "pk.test"
types = ["neighborhood"]

[load]
output_stem = "{}"
"#,
        input,
        server.base_url(),
        stem.to_str().unwrap()
    );
    let config = TomlConfig::from_toml_str(&content)?;
    assert_eq!(config.max_columns(), 3);

    let geocoder = MapboxGeocoder::new(config.geocoder_settings())?;
    let pipeline = NeighborhoodPipeline::new(LocalStorage::default(), geocoder, config);
    let output_path = EtlEngine::new_with_monitoring(pipeline, true).run().await?;

    lookups.assert_hits(3);
    let rows = read_output(&output_path);
    assert_eq!(rows.len(), 4);
    assert!(rows[1..].iter().all(|r| r[3] == CellValue::from("Midtown")));
    assert_eq!(rows[2][1], CellValue::Float(40.7411));

    Ok(())
}
