use std::str::FromStr;

use rogueweb::systems::{Facing, InputLatch, Key, PlayerAction};
use speculoos::prelude::*;
use strum::IntoEnumIterator;

mod common;

#[test]
fn test_key_names() {
    assert_that(&Key::from_str("ArrowLeft")).is_equal_to(Ok(Key::Left));
    assert_that(&Key::from_str("ArrowRight")).is_equal_to(Ok(Key::Right));
    assert_that(&Key::from_str("ArrowUp")).is_equal_to(Ok(Key::Jump));
    assert_that(&Key::from_str("ArrowDown")).is_equal_to(Ok(Key::Drop));
    assert_that(&Key::from_str("A")).is_equal_to(Ok(Key::Attack));
    assert_that(&Key::from_str(" ")).is_equal_to(Ok(Key::Dash));
    assert_that(&Key::from_str("Escape").is_err()).is_true();
}

#[test]
fn test_every_key_round_trips_through_its_name() {
    for key in Key::iter() {
        let name: &'static str = key.into();
        assert_that(&Key::from_str(name)).is_equal_to(Ok(key));
    }
}

#[test]
fn test_repeated_key_down_is_not_a_new_press() {
    let mut latch = InputLatch::default();

    latch.key_down(Key::Jump);
    assert_that(&latch.pressed(Key::Jump)).is_true();

    latch.clear_edges();
    latch.key_down(Key::Jump);
    assert_that(&latch.pressed(Key::Jump)).is_false();
    assert_that(&latch.held(Key::Jump)).is_true();
}

#[test]
fn test_release_edge() {
    let mut latch = InputLatch::default();

    latch.key_up(Key::Attack);
    assert_that(&latch.released(Key::Attack)).is_false();

    latch.key_down(Key::Attack);
    latch.key_up(Key::Attack);
    assert_that(&latch.released(Key::Attack)).is_true();
    assert_that(&latch.held(Key::Attack)).is_false();
    // A tap between two ticks still counts as engaged for the next one.
    assert_that(&latch.engaged(Key::Attack)).is_true();

    latch.clear_edges();
    assert_that(&latch.engaged(Key::Attack)).is_false();
}

#[test]
fn test_horizontal_prefers_right() {
    let mut latch = InputLatch::default();
    assert_that(&latch.horizontal()).is_none();

    latch.key_down(Key::Left);
    assert_that(&latch.horizontal()).is_equal_to(Some(Facing::Left));

    latch.key_down(Key::Right);
    assert_that(&latch.horizontal()).is_equal_to(Some(Facing::Right));
}

#[test]
fn test_key_event_by_name() {
    let mut sim = common::empty_sim();

    assert_that(&sim.key_event("ArrowRight", true)).is_true();
    assert_that(&sim.key_event("Shift", true)).is_false();
    sim.step();
    assert_that(&common::snapshot(&mut sim).player.action).is_equal_to(PlayerAction::Running);

    assert_that(&sim.key_event("ArrowRight", false)).is_true();
    sim.step();
    assert_that(&common::snapshot(&mut sim).player.action).is_equal_to(PlayerAction::Idle);
}
