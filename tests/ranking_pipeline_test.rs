use anyhow::Result;
use std::io::Read;
use tempfile::TempDir;
use unigoals_rank::config::toml_config::TomlConfig;
use unigoals_rank::{LocalStorage, RankError, RankingEngine, RankingPipeline};

fn write_units(dir: &TempDir, body: serde_json::Value) -> Result<String> {
    let path = dir.path().join("units.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&body)?)?;
    Ok(path.to_str().unwrap().replace('\\', "/"))
}

fn config(units_file: &str, output_path: &str, extra: &str) -> Result<TomlConfig> {
    let content = format!(
        r#"
[report]
name = "pipeline-test"

[source]
units_file = "{}"

[ranking]
search_query = "?year=2018"
{}

[load]
output_path = "{}"
output_formats = ["csv", "tsv", "json"]
"#,
        units_file, extra, output_path
    );
    Ok(TomlConfig::from_toml_str(&content)?)
}

fn engine(config: TomlConfig) -> RankingEngine<RankingPipeline<LocalStorage, TomlConfig>> {
    let source = LocalStorage::new(".".to_string());
    let sink = LocalStorage::new(config.load.output_path.clone());
    RankingEngine::new(RankingPipeline::new(source, sink, config))
}

fn semester_units() -> serde_json::Value {
    serde_json::json!({
        "0": {
            "title": "Programming",
            "content": {
                "a": { "name": "Coursework", "weighting": "0.5", "achieved": "60" },
                "b": { "name": "Exam", "weighting": "0.5", "achieved": "40" }
            }
        },
        "1": {
            "title": "Mathematics",
            "content": [
                { "weighting": 0.25, "achieved": 80 },
                { "weighting": "0.7", "achieved": "" }
            ]
        },
        "2": {
            "title": "Networks",
            "content": [
                { "weighting": "1", "achieved": "50%" }
            ]
        },
        "3": {
            "title": "Ethics",
            "content": [
                { "weighting": "0.4", "achieved": "0" }
            ]
        }
    })
}

#[tokio::test]
async fn test_end_to_end_ranking_writes_all_formats() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let units_file = write_units(&temp_dir, semester_units())?;
    let output_dir = temp_dir.path().join("out");
    let output_path = output_dir.to_str().unwrap().replace('\\', "/");

    let result = engine(config(&units_file, &output_path, "")?).run().await?;
    assert_eq!(result, output_path);

    let csv = std::fs::read_to_string(output_dir.join("leaderboard.csv"))?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "rank,title,total,link");
    assert_eq!(lines[1], "1,Networks,50.0,?year=2018#2");
    assert_eq!(lines[2], "2,Programming,50.0,?year=2018#0");
    assert_eq!(lines[3], "3,Mathematics,20.0,?year=2018#1");
    assert_eq!(lines[4], "4,Ethics,0.0,?year=2018#3");

    assert!(output_dir.join("leaderboard.tsv").exists());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output_dir.join("leaderboard.json"))?)?;
    assert_eq!(json["ranking"].as_array().unwrap().len(), 4);
    assert_eq!(json["ranking"][0]["title"], "Networks");
    assert_eq!(json["search_query"], "?year=2018");

    Ok(())
}

#[tokio::test]
async fn test_top_n_and_zip_archive() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let units_file = write_units(&temp_dir, semester_units())?;
    let output_dir = temp_dir.path().join("zipped");
    let output_path = output_dir.to_str().unwrap().replace('\\', "/");

    let content = format!(
        r#"
[report]
name = "zip-test"

[source]
units_file = "{}"

[ranking]
top_n = 2

[load]
output_path = "{}"
output_formats = ["csv", "json"]

[load.compression]
enabled = true
filename = "leaderboard.zip"
"#,
        units_file, output_path
    );
    let config = TomlConfig::from_toml_str(&content)?;

    let result = engine(config).run().await?;
    assert!(result.ends_with("leaderboard.zip"));

    let zip_data = std::fs::read(output_dir.join("leaderboard.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    assert_eq!(archive.len(), 2);

    let mut csv = String::new();
    archive.by_name("leaderboard.csv")?.read_to_string(&mut csv)?;
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("#2"));
    assert!(!csv.contains("Ethics"));

    assert!(archive.by_name("leaderboard.tsv").is_err());
    Ok(())
}

#[tokio::test]
async fn test_first_unit_without_content_writes_sentinel() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let units_file = write_units(
        &temp_dir,
        serde_json::json!([
            { "title": "Not started", "content": [] },
            { "title": "Graded", "content": [ { "weighting": "1", "achieved": "70" } ] }
        ]),
    )?;
    let output_dir = temp_dir.path().join("empty");
    let output_path = output_dir.to_str().unwrap().replace('\\', "/");

    engine(config(&units_file, &output_path, "")?).run().await?;

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output_dir.join("leaderboard.json"))?)?;
    assert_eq!(json["ranking"], serde_json::json!(0));
    assert_eq!(json["top"], serde_json::json!([]));

    let csv = std::fs::read_to_string(output_dir.join("leaderboard.csv"))?;
    assert_eq!(csv.trim_end(), "rank,title,total,link");
    Ok(())
}

#[tokio::test]
async fn test_profile_year_selection_and_literal_policy() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let units_file = write_units(
        &temp_dir,
        serde_json::json!({
            "years": {
                "y1": { "title": "First year", "units": { "0": { "title": "Old", "content": [ { "weighting": 1, "achieved": 1 } ] } } },
                "y2": { "title": "Second year", "units": {
                    "u7": { "title": "Typo", "content": [ { "weighting": "half", "achieved": "80" } ] },
                    "u9": { "title": "Clean", "content": [ { "weighting": "0.5", "achieved": "80" } ] }
                } }
            }
        }),
    )?;
    let output_dir = temp_dir.path().join("profile");
    let output_path = output_dir.to_str().unwrap().replace('\\', "/");

    let mut config = config(&units_file, &output_path, "nan_policy = \"literal\"")?;
    config.source.year = Some("y2".to_string());

    engine(config).run().await?;

    let csv = std::fs::read_to_string(output_dir.join("leaderboard.csv"))?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "1,Typo,NaN,?year=2018#u7");
    assert_eq!(lines[2], "2,Clean,40.0,?year=2018#u9");
    Ok(())
}

#[tokio::test]
async fn test_missing_year_is_document_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let units_file = write_units(&temp_dir, serde_json::json!({ "years": {} }))?;
    let output_path = temp_dir.path().to_str().unwrap().replace('\\', "/");

    let mut config = config(&units_file, &output_path, "")?;
    config.source.year = Some("2030".to_string());

    let err = engine(config).run().await.unwrap_err();
    assert!(matches!(err, RankError::DocumentError { .. }));
    Ok(())
}

#[tokio::test]
async fn test_invalid_json_is_serialization_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("units.json");
    std::fs::write(&path, "{ not json")?;
    let units_file = path.to_str().unwrap().replace('\\', "/");
    let output_path = temp_dir.path().to_str().unwrap().replace('\\', "/");

    let err = engine(config(&units_file, &output_path, "")?)
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, RankError::SerializationError(_)));
    Ok(())
}

#[tokio::test]
async fn test_extract_alone_writes_nothing() -> Result<()> {
    use unigoals_rank::core::Pipeline;

    let temp_dir = TempDir::new()?;
    let units_file = write_units(&temp_dir, semester_units())?;
    let output_dir = temp_dir.path().join("out");
    let output_path = output_dir.to_str().unwrap().replace('\\', "/");
    let config = config(&units_file, &output_path, "")?;

    let pipeline = RankingPipeline::new(
        LocalStorage::new(".".to_string()),
        LocalStorage::new(output_path.clone()),
        config,
    );
    let units = pipeline.extract().await?;

    let titles: Vec<&str> = units.iter().map(|(_, unit)| unit.title.as_str()).collect();
    assert_eq!(titles, vec!["Programming", "Mathematics", "Networks", "Ethics"]);
    assert!(!output_dir.exists());
    Ok(())
}
