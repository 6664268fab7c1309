//! When steps for relay correlation BDD scenarios.

use super::world::{Direction, RelayWorld, hash_from_byte};
use rstest_bdd_macros::when;

#[when(r#"relay event "{event}" is recorded for {direction} message "{hash}""#)]
fn relay_is_recorded(
    world: &mut RelayWorld,
    event: String,
    direction: String,
    hash: String,
) -> Result<(), eyre::Report> {
    let parsed = Direction::parse(&direction)?;
    let message_hash = hash_from_byte(&hash)?;
    let result = world.relay(parsed, message_hash, &event);
    world.last_relay_result = Some(result);
    Ok(())
}
