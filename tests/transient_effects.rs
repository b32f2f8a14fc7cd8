use gamescreens::{
    Arcade, Key, ScreenKind, Tuning,
    effects::{Banner, EffectBoard, Spawn},
    shell::Screen,
};

#[test]
fn entries_leave_exactly_once_after_their_lifetime() {
    let mut board = EffectBoard::new(800, 1);
    let first = board.spawn(100, Spawn::new("12"));
    let second = board.spawn(400, Spawn::new("CRIT!"));

    assert!(board.expire(899).is_empty());
    assert!(board.contains(first));

    let gone = board.expire(900);
    assert_eq!(gone.as_slice(), &[first]);
    assert!(!board.contains(first));
    assert!(board.contains(second));

    // Late sweeps never report an entry twice.
    let gone = board.expire(5_000);
    assert_eq!(gone.as_slice(), &[second]);
    assert!(board.expire(10_000).is_empty());
    assert!(board.active().is_empty());
}

#[test]
fn progress_runs_from_spawn_to_expiry() {
    let mut board = EffectBoard::new(800, 2);
    board.spawn(1_000, Spawn::new("+12").at(25.0, 70.0));
    let entry = &board.active()[0];
    assert_eq!(entry.anchor_x, 25.0);
    assert_eq!(entry.progress(1_000), 0.0);
    assert_eq!(entry.progress(1_400), 0.5);
    assert_eq!(entry.progress(2_000), 1.0);
    assert!((-10.0..=10.0).contains(&entry.tilt_deg));
}

#[test]
fn newer_banner_replaces_the_old_one() {
    let mut banner = Banner::new(3_000);
    banner.show(0, "Welcome");
    banner.show(2_500, "Cell 4 activated! +10 points");
    // The first message's deadline no longer applies.
    assert!(!banner.expire(3_000));
    assert_eq!(banner.text(), Some("Cell 4 activated! +10 points"));
    assert!(banner.expire(5_500));
    assert_eq!(banner.text(), None);
}

#[test]
fn combat_texts_fade_with_the_clock() {
    let mut arcade = Arcade::new(Tuning::default(), 4);
    arcade.switch_to(ScreenKind::Combat);
    arcade.press(Key::Char('b'));

    let Screen::Combat(view) = arcade.screen() else {
        panic!("combat mounted");
    };
    assert_eq!(view.effects().texts(), vec!["BLOCK!"]);

    arcade.advance(799);
    let Screen::Combat(view) = arcade.screen() else {
        panic!("combat mounted");
    };
    assert_eq!(view.effects().active().len(), 1);

    arcade.advance(1);
    let Screen::Combat(view) = arcade.screen() else {
        panic!("combat mounted");
    };
    assert!(view.effects().active().is_empty());
}

#[test]
fn grid_banner_hides_after_three_seconds() {
    let mut arcade = Arcade::new(Tuning::default(), 9);
    arcade.advance(2_000);
    let Screen::Grid(view) = arcade.screen() else {
        panic!("grid mounted");
    };
    assert!(view.banner().text().is_some_and(|t| t.starts_with("Welcome")));

    arcade.advance(2_999);
    let Screen::Grid(view) = arcade.screen() else {
        panic!("grid mounted");
    };
    assert!(view.banner().text().is_some());

    arcade.advance(1);
    let Screen::Grid(view) = arcade.screen() else {
        panic!("grid mounted");
    };
    assert_eq!(view.banner().text(), None);
}
