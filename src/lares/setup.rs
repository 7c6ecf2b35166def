use crate::app_config::AppConfig;
use crate::coordinator::Coordinator;
use crate::lares::client::{FetchError, LaresClient};
use crate::lares::domain::DeviceInfo;
use crate::lares::output::{OutputCoordinator, OutputLight, OutputStatusSource};
use crate::platform::Platform;
use reqwest::StatusCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

const OUTPUTS_COORDINATOR: &str = "lares_outputs";

/// What a configuration wizard needs to render a successful connection test.
#[derive(Debug, Clone, PartialEq)]
pub struct SetupInfo {
    pub title: String,
    pub id: String,
}

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("cannot connect to the panel: {0}")]
    CannotConnect(#[source] FetchError),
    #[error("invalid authentication")]
    InvalidAuth,
    #[error("device reports no controllable outputs")]
    NoOutputs,
    #[error("setup failed: {0}")]
    Unknown(#[source] FetchError),
}

impl From<FetchError> for SetupError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Status(status) if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN => SetupError::InvalidAuth,
            error @ FetchError::Request(_) => SetupError::CannotConnect(error),
            error => SetupError::Unknown(error),
        }
    }
}

/// Connection test for the setup wizard: one identity fetch, classified into
/// the wizard's coarse error categories.
pub async fn validate(client: &LaresClient) -> Result<SetupInfo, SetupError> {
    let info = client.general_info().await?;
    Ok(SetupInfo { title: info.name, id: info.id })
}

/// Everything `setup` wires together for one panel.
pub struct Integration {
    pub device: DeviceInfo,
    pub coordinator: Arc<OutputCoordinator>,
    pub outputs: usize,
}

/// Bootstraps the integration: resolves the device identity and PIN, reads
/// the output descriptions, primes the coordinator cache, and registers one
/// light entity per described output with the host platform.
#[instrument(skip_all)]
pub async fn setup(client: Arc<LaresClient>, config: &AppConfig, platform: Arc<dyn Platform>) -> Result<Integration, SetupError> {
    let device = client.device_info().await?;
    info!("✅  Found '{}' (sw {}, schema {})", device.name, device.sw_version, device.lares_version);

    let basis = client.basis_info().await?;
    let descriptions = client.output_descriptions(&device).await?;
    if descriptions.is_empty() {
        return Err(SetupError::NoOutputs);
    }

    let lares = config.lares();
    let coordinator = Arc::new(Coordinator::new(
        OUTPUTS_COORDINATOR,
        OutputStatusSource::new(client.clone(), device.clone()),
        lares.scan_interval(),
        lares.refresh_timeout(),
    ));
    coordinator.refresh().await;

    let entities = descriptions
        .into_iter()
        .map(|(index, name)| {
            Arc::new(OutputLight::new(
                client.clone(),
                coordinator.clone(),
                basis.pin_to_use.clone(),
                name,
                index,
                lares.confirm_attempts(),
                lares.confirm_delay(),
            ))
        })
        .collect::<Vec<_>>();
    let outputs = entities.len();

    platform.register(entities).await;
    info!("✅  Registered {} output(s)", outputs);

    Ok(Integration { device, coordinator, outputs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::AppConfigBuilder;
    use crate::platform::LogPlatform;
    use mockito::Server;
    use pretty_assertions::assert_eq;
    use std::error::Error;

    fn client_for(server: &Server) -> Arc<LaresClient> {
        let (host, port) = server.host_with_port().split_once(':').map(|(h, p)| (h.to_string(), p.to_string())).unwrap();
        let config = AppConfigBuilder::new().host(&host).port(port.parse().unwrap()).build();
        Arc::new(LaresClient::new(&config).unwrap())
    }

    #[tokio::test]
    async fn validate_returns_title_and_id() -> Result<(), Box<dyn Error>> {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/xml/info/generalInfo.xml")
            .with_status(200)
            .with_body(include_str!("../../tests/resources/general_info.xml"))
            .create_async()
            .await;

        let client = client_for(&server);
        let info = validate(&client).await?;

        assert_eq!(
            info,
            SetupInfo {
                title: "Lares 4.0".to_string(),
                id: server.host_with_port(),
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn validate_classifies_a_401_as_invalid_auth() {
        let mut server = Server::new_async().await;
        server.mock("GET", "/xml/info/generalInfo.xml").with_status(401).create_async().await;

        let client = client_for(&server);
        let result = validate(&client).await;

        assert!(matches!(result, Err(SetupError::InvalidAuth)));
    }

    #[tokio::test]
    async fn validate_classifies_a_refused_connection_as_cannot_connect() {
        let config = AppConfigBuilder::new().host("127.0.0.1").port(1).build();
        let client = LaresClient::new(&config).unwrap();

        let result = validate(&client).await;

        assert!(matches!(result, Err(SetupError::CannotConnect(_))));
    }

    #[tokio::test]
    async fn validate_classifies_other_failures_as_unknown() {
        let mut server = Server::new_async().await;
        server.mock("GET", "/xml/info/generalInfo.xml").with_status(200).with_body("not xml at all <").create_async().await;

        let client = client_for(&server);
        let result = validate(&client).await;

        assert!(matches!(result, Err(SetupError::Unknown(_))));
    }

    #[tokio::test]
    async fn setup_registers_one_entity_per_described_output() -> Result<(), Box<dyn Error>> {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/xml/info/generalInfo.xml")
            .with_status(200)
            .with_body(include_str!("../../tests/resources/general_info.xml"))
            .create_async()
            .await;
        server
            .mock("GET", "/xml/info/basisInfo.xml")
            .with_status(200)
            .with_body(include_str!("../../tests/resources/basis_info.xml"))
            .create_async()
            .await;
        server
            .mock("GET", "/xml/outputs/outputsDescription4.0.xml")
            .with_status(200)
            .with_body(include_str!("../../tests/resources/outputs_description.xml"))
            .create_async()
            .await;
        let status_mock = server
            .mock("GET", "/xml/outputs/outputsStatus4.0.xml")
            .with_status(200)
            .with_body(include_str!("../../tests/resources/outputs_status.xml"))
            .create_async()
            .await;

        let client = client_for(&server);
        let config = AppConfigBuilder::new().build();
        let integration = setup(client, &config, Arc::new(LogPlatform::new())).await?;

        // The prime refresh ran before registration.
        status_mock.assert();
        assert_eq!(integration.outputs, 2);
        assert_eq!(integration.device.lares_version, "4.0");
        assert!(!integration.coordinator.snapshot().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn setup_fails_without_described_outputs() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/xml/info/generalInfo.xml")
            .with_status(200)
            .with_body(include_str!("../../tests/resources/general_info.xml"))
            .create_async()
            .await;
        server
            .mock("GET", "/xml/info/basisInfo.xml")
            .with_status(200)
            .with_body(include_str!("../../tests/resources/basis_info.xml"))
            .create_async()
            .await;
        server
            .mock("GET", "/xml/outputs/outputsDescription4.0.xml")
            .with_status(200)
            .with_body("<outputsDescription><output/></outputsDescription>")
            .create_async()
            .await;

        let client = client_for(&server);
        let config = AppConfigBuilder::new().build();
        let result = setup(client, &config, Arc::new(LogPlatform::new())).await;

        assert!(matches!(result, Err(SetupError::NoOutputs)));
    }
}
