// Integration tests for Geocode Audit

use async_trait::async_trait;
use geocode_audit::io::{self, OutputPaths};
use geocode_audit::models::{GeocodeResult, InputRecord, MatchStatus};
use geocode_audit::services::{GeocodeError, Geocoder};
use geocode_audit::{Pipeline, Reconciler};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Deterministic in-memory geocoder keyed by exact text
#[derive(Default)]
struct TableGeocoder {
    places: HashMap<String, GeocodeResult>,
    calls: AtomicUsize,
    seen_countries: std::sync::Mutex<Vec<Vec<String>>>,
}

impl TableGeocoder {
    fn with(mut self, text: &str, label: &str, confidence: f64, lat: f64, long: f64) -> Self {
        self.places.insert(
            text.to_string(),
            GeocodeResult {
                label: label.to_string(),
                confidence,
                resolved_lat: lat,
                resolved_long: long,
            },
        );
        self
    }
}

#[async_trait]
impl Geocoder for TableGeocoder {
    async fn resolve(
        &self,
        text: &str,
        countries: &[String],
    ) -> Result<GeocodeResult, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_countries.lock().unwrap().push(countries.to_vec());

        if text == "throttle me" {
            return Err(GeocodeError::Throttled);
        }
        self.places.get(text).cloned().ok_or(GeocodeError::NoMatch)
    }
}

fn sample_geocoder() -> TableGeocoder {
    TableGeocoder::default()
        .with("123 Main St", "123 Main Street, City", 0.95, 40.001, -74.001)
        .with("Town Hall", "Town Hall, Springfield", 0.5, 39.78, -89.65)
        .with("Big Ben", "Big Ben, London", 0.8, 51.5007, -0.1246)
}

fn sample_records() -> Vec<InputRecord> {
    vec![
        InputRecord::new(0, "123 Main St", 40.0, -74.0),
        InputRecord::new(1, "Atlantis", 0.0, 0.0),
        InputRecord::new(2, "Town Hall", 39.8, -89.6),
        InputRecord::new(3, "throttle me", 1.0, 1.0),
        InputRecord::new(4, "Big Ben", 51.5007, -0.1246),
        InputRecord::new(5, "", 0.0, 0.0),
    ]
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("geocode-audit-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[tokio::test]
async fn test_integration_end_to_end_reconciliation() {
    let pipeline = Pipeline::new(Reconciler::new(sample_geocoder(), vec![], 0.8));
    let records = sample_records();

    let result = pipeline.run(&records).await;

    assert_eq!(result.outputs.len() + result.errors.len(), records.len());

    let main_st = &result.outputs[0];
    assert_eq!(main_st.index, 0);
    assert_eq!(main_st.resolved_text, "123 Main Street, City");
    assert_eq!(main_st.status, MatchStatus::Ok);
    assert_eq!(main_st.distance_km, "0.140");

    let town_hall = &result.outputs[1];
    assert_eq!(town_hall.index, 2);
    assert_eq!(town_hall.status, MatchStatus::LowConfidence);
    assert_eq!(town_hall.resolved_lat, 39.78);

    // Confidence equal to the threshold is accepted
    let big_ben = &result.outputs[2];
    assert_eq!(big_ben.status, MatchStatus::Ok);
    assert_eq!(big_ben.distance_km, "0.000");

    let messages: Vec<(usize, &str)> = result
        .errors
        .iter()
        .map(|e| (e.index, e.error_message.as_str()))
        .collect();
    assert_eq!(
        messages,
        vec![
            (1, "no result found"),
            (3, "Request throttled by provider"),
            (5, "empty place text"),
        ]
    );
}

#[tokio::test]
async fn test_indices_partition_input() {
    let pipeline = Pipeline::new(Reconciler::new(sample_geocoder(), vec![], 0.8));
    let records = sample_records();

    let result = pipeline.run(&records).await;

    let ok: HashSet<usize> = result.outputs.iter().map(|o| o.index).collect();
    let failed: HashSet<usize> = result.errors.iter().map(|e| e.index).collect();
    let all: HashSet<usize> = records.iter().map(|r| r.index).collect();

    assert!(ok.is_disjoint(&failed));
    assert_eq!(ok.union(&failed).copied().collect::<HashSet<_>>(), all);

    // Each stream keeps input order
    assert!(result.outputs.windows(2).all(|w| w[0].index < w[1].index));
    assert!(result.errors.windows(2).all(|w| w[0].index < w[1].index));
}

#[tokio::test]
async fn test_one_provider_call_per_non_blank_record() {
    let geocoder = Arc::new(sample_geocoder());
    let countries = vec!["USA".to_string(), "GBR".to_string()];
    let pipeline = Pipeline::new(Reconciler::new(geocoder.clone(), countries.clone(), 0.8));

    pipeline.run(&sample_records()).await;

    // The blank record never reaches the provider
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 5);
    let seen = geocoder.seen_countries.lock().unwrap();
    assert!(seen.iter().all(|c| *c == countries));
}

#[tokio::test]
async fn test_output_files_round_trip() {
    let pipeline = Pipeline::new(Reconciler::new(sample_geocoder(), vec![], 0.8));
    let result = pipeline.run(&sample_records()).await;

    let dir = temp_dir("round-trip");
    let paths = OutputPaths::new("audit", Some(dir.as_path()), 1_700_000_000);
    io::write_output(&result.outputs, &paths.output).unwrap();
    io::write_errors(&result.errors, &paths.errors).unwrap();

    assert_eq!(io::read_output(&paths.output).unwrap(), result.outputs);
    assert_eq!(io::read_errors(&paths.errors).unwrap(), result.errors);

    let written = std::fs::read_to_string(&paths.output).unwrap();
    assert!(written.starts_with(
        "Index,InputText,InputLat,InputLong,OutputText,OutputLat,OutputLong,Confidence,Distance,Status\n"
    ));
    assert!(written.contains("LOW CONFIDENCE"));

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_empty_streams_still_get_headers() {
    let pipeline = Pipeline::new(Reconciler::new(TableGeocoder::default(), vec![], 0.8));
    let result = pipeline.run(&[]).await;

    let dir = temp_dir("empty");
    let paths = OutputPaths::new("empty", Some(dir.as_path()), 1);
    io::write_output(&result.outputs, &paths.output).unwrap();
    io::write_errors(&result.errors, &paths.errors).unwrap();

    assert_eq!(std::fs::read_to_string(&paths.errors).unwrap(), "Index,Text,Error\n");
    assert!(io::read_output(&paths.output).unwrap().is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_csv_input_through_pipeline() {
    let dir = temp_dir("input");
    let input = dir.join("places.csv");
    std::fs::write(
        &input,
        "text,lat,long\n123 Main St,40.0,-74.0\nAtlantis,not-a-number,\n",
    )
    .unwrap();

    let records = io::read_input(&input, false).unwrap();
    assert_eq!(records[1], InputRecord::new(1, "Atlantis", 0.0, 0.0));

    let pipeline = Pipeline::new(Reconciler::new(sample_geocoder(), vec![], 0.8));
    let summary = pipeline.run(&records).await.summary();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.ok, 1);
    assert_eq!(summary.failed, 1);

    std::fs::remove_dir_all(&dir).ok();
}
