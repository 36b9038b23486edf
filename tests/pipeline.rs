//! End-to-end prediction through artifacts written to a temporary directory

use std::fs;
use std::path::PathBuf;

use f1predict::data::{DriverTable, GridAssignment, GridError, GridSlot, Schedule};
use f1predict::predictor::{ArtifactError, Predictor};

const DRIVERS_CSV: &str = "\
Abbreviation,DriverName,Points,AvgQualiPosition,AvgRacePosition
VER,Max Verstappen,437,3.1,3.4
NOR,Lando Norris,374,3.4,4.5
LEC,Charles Leclerc,356,4.6,4.9
PIA,Oscar Piastri,292,5.3,5.6
SAI,Carlos Sainz,290,5.9,5.8
RUS,George Russell,245,5.1,6.6
HAM,Lewis Hamilton,223,7.8,6.9
PER,Sergio Perez,152,9.9,9.6
ALO,Fernando Alonso,70,9.8,11.0
GAS,Pierre Gasly,42,11.9,12.6
HUL,Nico Hulkenberg,41,10.8,12.3
TSU,Yuki Tsunoda,30,11.2,12.8
STR,Lance Stroll,24,14.1,13.2
OCO,Esteban Ocon,23,13.5,13.9
MAG,Kevin Magnussen,16,14.7,14.6
ALB,Alexander Albon,12,13.9,14.4
RIC,Daniel Ricciardo,12,13.8,14.1
ZHO,Zhou Guanyu,4,17.4,16.0
BOT,Valtteri Bottas,0,16.9,16.2
SAR,Logan Sargeant,0,18.6,16.9
";

const SCHEDULE_CSV: &str = "\
RoundNumber,EventName,Country,EventDate
0,Pre-Season Testing,Bahrain,2024-02-21
1,Bahrain Grand Prix,Bahrain,2024-03-02
8,Monaco Grand Prix,Monaco,2024-05-26
";

const FEATURE_COLUMNS: &str = r#"["Round","Abbreviation","GridPosition","Points","AvgQualiPosition","AvgRacePosition","QualifyingScore"]"#;
const SCALER: &str = r#"{"mean":[0,0,0,0,0,0,0],"scale":[1,1,1,1,1,1,1]}"#;
const LINEAR_MODEL: &str =
    r#"{"intercept":0.0,"coefficients":[0.0,0.0,0.7,-0.002,0.1,0.2,0.1]}"#;

const GRID: [&str; 20] = [
    "VER", "NOR", "HAM", "LEC", "PIA", "SAI", "RUS", "PER", "ALO", "GAS", "HUL", "TSU", "STR",
    "OCO", "MAG", "ALB", "RIC", "ZHO", "BOT", "SAR",
];

/// Temporary model directory, removed on drop
struct Fixture {
    dir: PathBuf,
}

impl Fixture {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "f1predict_pipeline_{}_{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(dir.join("DATA")).unwrap();
        fs::write(dir.join("DATA/drivers.csv"), DRIVERS_CSV).unwrap();
        fs::write(dir.join("DATA/schedule.csv"), SCHEDULE_CSV).unwrap();
        fs::write(dir.join("feature_columns.json"), FEATURE_COLUMNS).unwrap();
        fs::write(dir.join("scaler.json"), SCALER).unwrap();
        fs::write(dir.join("f1_race_predictor.json"), LINEAR_MODEL).unwrap();
        Self { dir }
    }

    fn drivers(&self) -> DriverTable {
        DriverTable::load(self.dir.join("DATA/drivers.csv")).unwrap()
    }

    fn schedule(&self) -> Schedule {
        Schedule::load(self.dir.join("DATA/schedule.csv"), 2024).unwrap()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.dir).ok();
    }
}

#[test]
fn test_full_race_prediction() {
    let fixture = Fixture::new("full");
    let drivers = fixture.drivers();
    let schedule = fixture.schedule();
    let mut predictor = Predictor::load(&fixture.dir, &drivers).unwrap();

    assert_eq!(schedule.len(), 2);
    let event = schedule.by_name("Monaco Grand Prix").unwrap();
    let grid = GridAssignment::from_order(&GRID, &drivers).unwrap();

    let response = predictor
        .predict_race(&drivers, schedule.season(), event, &grid)
        .unwrap();

    assert_eq!(response.season, 2024);
    assert_eq!(response.round, 8);
    assert_eq!(response.results.len(), 20);

    let ranks: Vec<u8> = response.results.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, (1..=20).collect::<Vec<u8>>());

    let ver = response.results.iter().find(|r| r.driver == "VER").unwrap();
    assert_eq!(ver.grid_position, 1);
    assert_eq!(response.results[0].predicted_points, 25);
    assert_eq!(response.results[9].predicted_points, 1);
    assert_eq!(response.results[10].predicted_points, 0);

    for pair in response.results.windows(2) {
        assert!(pair[0].predicted_position <= pair[1].predicted_position);
    }
    for row in &response.results {
        assert!((50.0..=100.0).contains(&row.confidence));
    }
}

#[test]
fn test_prediction_is_repeatable() {
    let fixture = Fixture::new("repeat");
    let drivers = fixture.drivers();
    let mut predictor = Predictor::load(&fixture.dir, &drivers).unwrap();
    let grid = GridAssignment::from_order(&GRID, &drivers).unwrap();

    let first = predictor.predict_grid(&drivers, 1, &grid).unwrap();
    let second = predictor.predict_grid(&drivers, 1, &grid).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_incomplete_grid_rejected() {
    let fixture = Fixture::new("incomplete");
    let drivers = fixture.drivers();

    let slots: Vec<GridSlot> = GRID[..19]
        .iter()
        .enumerate()
        .map(|(i, code)| GridSlot {
            position: i as u8 + 1,
            driver: code.to_string(),
        })
        .collect();

    assert_eq!(
        GridAssignment::from_slots(&slots, &drivers),
        Err(GridError::Incomplete {
            placed: 19,
            expected: 20
        })
    );
}

#[test]
fn test_missing_model_is_fatal() {
    let fixture = Fixture::new("missing");
    let drivers = fixture.drivers();
    fs::remove_file(fixture.dir.join("f1_race_predictor.json")).unwrap();

    assert!(matches!(
        Predictor::load(&fixture.dir, &drivers),
        Err(ArtifactError::MissingModel(_))
    ));
}

#[test]
fn test_scaler_mismatch_is_fatal() {
    let fixture = Fixture::new("scaler");
    let drivers = fixture.drivers();
    fs::write(
        fixture.dir.join("scaler.json"),
        r#"{"mean":[0,0,0],"scale":[1,1,1]}"#,
    )
    .unwrap();

    assert!(matches!(
        Predictor::load(&fixture.dir, &drivers),
        Err(ArtifactError::ScalerShape {
            scaler: 3,
            columns: 7
        })
    ));
}

#[test]
fn test_stale_driver_codes_are_fatal() {
    let fixture = Fixture::new("codes");
    let drivers = fixture.drivers();
    fs::write(fixture.dir.join("driver_codes.json"), r#"{"VER":0,"NOR":1}"#).unwrap();

    assert!(matches!(
        Predictor::load(&fixture.dir, &drivers),
        Err(ArtifactError::UnencodedDriver(_))
    ));
}
