//! `identity-admin` entry-point: loads settings, wires the Keycloak adapters
//! and runs one command.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use identity_admin::application::{Dispatcher, RepositoryPorts};
use identity_admin::config::AdminSettings;
use identity_admin::domain::{Error, RequestTenant, TenantContext};
use identity_admin::inbound::cli::Cli;
use identity_admin::outbound::keycloak::{
    KeycloakClient, KeycloakCredentials, KeycloakGroupRepository, KeycloakGroupUsersRepository,
    KeycloakTokenRepository, KeycloakUserRepository,
};

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = AdminSettings::load_from_iter([OsString::from("identity-admin")])
        .map_err(|error| eyre!("load settings: {error}"))?;
    let keycloak = settings.keycloak().wrap_err("validate settings")?;

    let context = RequestTenant::new();
    let tenant = match cli.tenant() {
        Ok(Some(tenant)) => Some(tenant),
        Ok(None) => settings.default_tenant().wrap_err("validate settings")?,
        Err(error) => return report(&error),
    };
    if let Err(error) = tenant.map_or(Ok(()), |tenant| context.set_tenant(tenant)) {
        return report(&error);
    }

    let client = Arc::new(
        KeycloakClient::new(
            keycloak.base_url,
            KeycloakCredentials {
                client_id: keycloak.client_id,
                client_secret: keycloak.client_secret,
            },
            keycloak.request_timeout,
            Arc::new(DefaultClock),
        )
        .wrap_err("build Keycloak client")?,
    );
    let dispatcher = Dispatcher::new(RepositoryPorts {
        users: Arc::new(KeycloakUserRepository::new(Arc::clone(&client))),
        groups: Arc::new(KeycloakGroupRepository::new(Arc::clone(&client))),
        group_users: Arc::new(KeycloakGroupUsersRepository::new(Arc::clone(&client))),
        tokens: Arc::new(KeycloakTokenRepository::new(client)),
    });

    let invocation = match cli.into_invocation(&context) {
        Ok(invocation) => invocation,
        Err(error) => return report(&error),
    };

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling");
            interrupt.cancel();
        }
    });

    match invocation.execute(&dispatcher, &cancel).await {
        Ok(payload) => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &payload).wrap_err("write output")?;
            writeln!(stdout).wrap_err("write output")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => report(&error),
    }
}

fn report(error: &Error) -> Result<ExitCode> {
    let mut stderr = io::stderr().lock();
    serde_json::to_writer_pretty(&mut stderr, error).wrap_err("write error")?;
    writeln!(stderr).wrap_err("write error")?;
    Ok(ExitCode::FAILURE)
}
