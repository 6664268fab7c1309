//! Then steps for relay correlation BDD scenarios.

use super::world::{Direction, RelayWorld, hash_from_byte};
use bridge_store::bridge_message::{
    domain::RelayStatus, ports::BridgeMessageStoreError, services::BridgeMessageServiceError,
};
use rstest_bdd_macros::then;

#[then(r#"the {direction} message "{hash}" is not relayed"#)]
fn message_not_relayed(
    world: &mut RelayWorld,
    direction: String,
    hash: String,
) -> Result<(), eyre::Report> {
    let status = world.relay_status(Direction::parse(&direction)?, hash_from_byte(&hash)?)?;
    if status != Some(RelayStatus::Sent) {
        return Err(eyre::eyre!("expected unrelayed message, found {status:?}"));
    }
    Ok(())
}

#[then(r#"the {direction} message "{hash}" is relayed by event "{event}""#)]
fn message_relayed_by(
    world: &mut RelayWorld,
    direction: String,
    hash: String,
    event: String,
) -> Result<(), eyre::Report> {
    let expected = world.event(&event);
    let status = world.relay_status(Direction::parse(&direction)?, hash_from_byte(&hash)?)?;
    if status != Some(RelayStatus::Relayed(expected)) {
        return Err(eyre::eyre!(
            "expected message relayed by '{event}', found {status:?}"
        ));
    }
    Ok(())
}

#[then("the relay succeeds")]
fn relay_succeeds(world: &RelayWorld) -> Result<(), eyre::Report> {
    match &world.last_relay_result {
        Some(Ok(())) => Ok(()),
        other => Err(eyre::eyre!("expected successful relay, got {other:?}")),
    }
}

#[then(r#"the relay is rejected as already relayed by event "{event}""#)]
fn relay_rejected_as_already_relayed(
    world: &mut RelayWorld,
    event: String,
) -> Result<(), eyre::Report> {
    let expected = world.event(&event);
    match &world.last_relay_result {
        Some(Err(BridgeMessageServiceError::Store(BridgeMessageStoreError::AlreadyRelayed {
            relayed_by,
            ..
        }))) if *relayed_by == expected => Ok(()),
        other => Err(eyre::eyre!(
            "expected relay rejected in favour of '{event}', got {other:?}"
        )),
    }
}

#[then(r#"the relay is rejected because {label} "{hash}" is not found"#)]
fn relay_rejected_as_missing(
    world: &RelayWorld,
    label: String,
    hash: String,
) -> Result<(), eyre::Report> {
    let message_hash = hash_from_byte(&hash)?;
    let expected = format!("{label} with message hash {message_hash} not found");
    match &world.last_relay_result {
        Some(Err(err)) if err.to_string() == expected => Ok(()),
        other => Err(eyre::eyre!("expected '{expected}', got {other:?}")),
    }
}

#[then(r#"no {direction} message "{hash}" exists"#)]
fn message_absent(
    world: &mut RelayWorld,
    direction: String,
    hash: String,
) -> Result<(), eyre::Report> {
    let status = world.relay_status(Direction::parse(&direction)?, hash_from_byte(&hash)?)?;
    if let Some(found) = status {
        return Err(eyre::eyre!("expected no message, found one in state {found:?}"));
    }
    Ok(())
}
