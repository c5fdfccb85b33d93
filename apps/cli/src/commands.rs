//! Subcommand execution and payload rendering.

use crate::args::{Cli, Command, Endpoint, EndpointWithBody};
use crate::error::CliError;

use guidelight::{Client, Payload, connect};

use std::io::Write;

use log::{debug, info};

/// Connects, runs the subcommand and writes the payload to `out`.
pub async fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let options = cli.global.client_options()?;
    let client = connect(options).await?;

    let payload = match &cli.command {
        Command::Auth => {
            info!("Authenticated with {}", client.host());
            writeln!(out, "Authenticated with {}", client.host())?;
            return Ok(());
        }
        Command::Get(endpoint) => get(&client, endpoint).await?,
        Command::Delete(endpoint) => delete(&client, endpoint).await?,
        Command::Post(request) => post(&client, request).await?,
        Command::Put(request) => put(&client, request).await?,
    };

    render(&payload, out)
}

async fn get(client: &Client, endpoint: &Endpoint) -> Result<Payload, CliError> {
    debug!("GET {:?}", endpoint.segments);
    Ok(client
        .get(&endpoint.segments, endpoint.query_params().as_ref())
        .await?)
}

async fn delete(client: &Client, endpoint: &Endpoint) -> Result<Payload, CliError> {
    debug!("DELETE {:?}", endpoint.segments);
    Ok(client
        .delete(&endpoint.segments, endpoint.query_params().as_ref())
        .await?)
}

async fn post(client: &Client, request: &EndpointWithBody) -> Result<Payload, CliError> {
    let endpoint = &request.endpoint;
    debug!("POST {:?}", endpoint.segments);
    Ok(client
        .post(&request.data, &endpoint.segments, endpoint.query_params().as_ref())
        .await?)
}

async fn put(client: &Client, request: &EndpointWithBody) -> Result<Payload, CliError> {
    let endpoint = &request.endpoint;
    debug!("PUT {:?}", endpoint.segments);
    Ok(client
        .put(&request.data, &endpoint.segments, endpoint.query_params().as_ref())
        .await?)
}

/// Pretty JSON with a trailing newline, raw bytes verbatim, nothing for an
/// empty response.
pub fn render(payload: &Payload, out: &mut impl Write) -> Result<(), CliError> {
    match payload {
        Payload::Empty => {}
        Payload::Json(value) => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        Payload::Bytes(bytes) => out.write_all(bytes)?,
    }
    out.flush()?;
    Ok(())
}
