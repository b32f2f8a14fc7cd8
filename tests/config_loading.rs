use std::io::Write;

use gamescreens::{Arcade, ConfigError, Tuning, shell::ScreenSnapshot};
use tempfile::NamedTempFile;

fn tuning_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(body.as_bytes()).expect("write tuning");
    file
}

#[test]
fn file_overrides_flow_into_the_screens() {
    let file = tuning_file(
        r#"{
            "garden": { "start_coins": 200 },
            "grid": { "cell_points": 25 }
        }"#,
    );
    let tuning = Tuning::load(file.path()).expect("tuning loads");
    assert_eq!(tuning.garden.start_coins, 200);
    assert_eq!(tuning.garden.plots, 6);

    let mut arcade = Arcade::new(tuning, 1);
    arcade.tap(0);
    let ScreenSnapshot::Grid(grid) = arcade.snapshot().view else {
        panic!("grid is first");
    };
    assert_eq!(grid.stats.score, 25);
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.json");
    let err = Tuning::load(&path).unwrap_err();
    assert!(matches!(&err, ConfigError::Read { path: p, .. } if *p == path));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn broken_json_is_a_parse_error() {
    let file = tuning_file("{ \"reveal\": ");
    let err = Tuning::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn invalid_values_are_rejected_after_parsing() {
    let file = tuning_file(r#"{ "combat": { "crit_chance": 1.5 } }"#);
    let err = Tuning::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let file = tuning_file(r#"{ "grid": { "columns": 0 } }"#);
    assert!(matches!(
        Tuning::load(file.path()),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn defaults_round_trip_through_json() {
    let json = serde_json::to_string(&Tuning::default()).expect("serializable");
    let parsed = Tuning::from_json_str(&json).expect("defaults are valid");
    assert_eq!(parsed, Tuning::default());
}

#[test]
fn overflowing_random_bounds_never_reach_the_screens() {
    for body in [
        r#"{ "reveal": { "max_value": 2147483647 } }"#,
        r#"{ "combat": { "max_damage": 2147483647 } }"#,
        r#"{ "grid": { "coin_drip_max": 4294967294 } }"#,
        r#"{ "reveal": { "ceiling_ms": 18446744073709551615, "increment_ms": 4611686018427387904 } }"#,
    ] {
        let file = tuning_file(body);
        assert!(
            matches!(Tuning::load(file.path()), Err(ConfigError::Invalid(_))),
            "accepted {body}"
        );
    }
}

#[test]
fn largest_valid_tuning_plays_through() {
    let tuning = Tuning::from_json_str(
        r#"{ "reveal": { "max_value": 1000000 },
             "combat": { "min_damage": 1000000, "max_damage": 1000000, "crit_chance": 1.0 },
             "grid": { "coin_drip_max": 1000000 } }"#,
    )
    .expect("upper bounds are accepted");
    let mut arcade = Arcade::new(tuning, 3);
    arcade.advance(30_000);
    arcade.press(gamescreens::Key::Tab);
    arcade.press(gamescreens::Key::Char('a'));
    arcade.press(gamescreens::Key::Char('d'));
    arcade.advance(10_000);
    let ScreenSnapshot::Combat(combat) = arcade.snapshot().view else {
        panic!("combat is second");
    };
    assert_eq!(combat.enemy_hp, combat.enemy_max_hp);
    assert_eq!(combat.level, 2);
    assert!(combat.dice.final_value.is_some_and(|v| (1..=1_000_000).contains(&v)));
}
