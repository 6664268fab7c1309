//! Environment setup for the embedded test cluster.

use super::BoxError;
use super::worker_helpers::prepare_pg_worker;
use camino::Utf8Path;
use pg_embedded_setup_unpriv::{ExecutionPrivileges, detect_execution_privileges};
use std::ffi::OsString;
use std::net::TcpListener;

pub(super) fn env_vars_to_os(
    env_vars: &[(String, Option<String>)],
) -> Vec<(OsString, Option<OsString>)> {
    env_vars
        .iter()
        .map(|(key, value)| (OsString::from(key), value.as_ref().map(OsString::from)))
        .collect()
}

/// Variables applied while bootstrapping.
///
/// Picks a free port unless `PG_PORT` is already set. Under root, points
/// `PG_EMBEDDED_WORKER` at this package's `pg_worker` binary unless the
/// caller supplied one.
pub(super) fn cluster_env_changes() -> Result<Vec<(OsString, Option<OsString>)>, BoxError> {
    let mut changes = Vec::new();
    if std::env::var_os("PG_PORT").is_none() {
        let port = free_local_port()?;
        changes.push((
            OsString::from("PG_PORT"),
            Some(OsString::from(port.to_string())),
        ));
    }

    if matches!(detect_execution_privileges(), ExecutionPrivileges::Root)
        && std::env::var_os("PG_EMBEDDED_WORKER").is_none()
    {
        let worker = prepare_pg_worker(Utf8Path::new(env!("CARGO_BIN_EXE_pg_worker")))?;
        changes.push((
            OsString::from("PG_EMBEDDED_WORKER"),
            Some(OsString::from(worker.as_str())),
        ));
    }
    Ok(changes)
}

fn free_local_port() -> Result<u16, BoxError> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).map_err(|err| Box::new(err) as BoxError)?;
    let port = listener
        .local_addr()
        .map_err(|err| Box::new(err) as BoxError)?
        .port();
    Ok(port)
}
