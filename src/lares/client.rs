use crate::app_config::AppConfig;
use crate::lares::domain::{BasisInfo, DeviceInfo, GeneralInfo, OutputStatus, Zone, ZoneStatus};
use crate::lares::mac;
use crate::lares::xml::{child_text, elements};
use reqwest::{Client, StatusCode};
use roxmltree::Document;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

const SCHEMA: &str = "http://";

const GENERAL_INFO: &str = "info/generalInfo.xml";
const BASIS_INFO: &str = "info/basisInfo.xml";
const OUTPUTS_DESCRIPTION: &str = "outputs/outputsDescription";
const OUTPUTS_STATUS: &str = "outputs/outputsStatus";
const ZONES_DESCRIPTION: &str = "zones/zonesDescription";
const ZONES_STATUS: &str = "zones/zonesStatus";
const COMMAND: &str = "cmd/cmdOk.xml";

/// HTTP/XML client for the panel's status endpoints.
///
/// Connection settings are fixed at construction. Endpoints other than
/// `info/*` are version-scoped: their path carries the `lares_version` token
/// resolved from [`DeviceInfo`], because the XML schema differs across panel
/// generations.
#[derive(Debug)]
pub struct LaresClient {
    client: Client,
    host: String,
    port: u16,
    username: String,
    password: String,
    base_url: String,
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code {0}")]
    Status(StatusCode),
    #[error("invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("missing element '{0}'")]
    MissingElement(&'static str),
}

impl LaresClient {
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        let lares = config.lares();
        // One connection per call; idle sockets are never reused.
        let client = Client::builder().pool_max_idle_per_host(0).build()?;

        Ok(LaresClient {
            client,
            host: lares.host().to_string(),
            port: lares.port(),
            username: lares.username().to_string(),
            password: lares.password().to_string(),
            base_url: format!("{}{}:{}", SCHEMA, lares.host(), lares.port()),
        })
    }

    #[instrument(skip(self))]
    pub async fn general_info(&self) -> Result<GeneralInfo, FetchError> {
        let body = self.get(GENERAL_INFO).await?;
        let document = Document::parse(&body)?;
        let root = document.root_element();

        let mac = mac::lookup(&self.host);
        let id = mac.clone().unwrap_or_else(|| format!("{}:{}", self.host, self.port));

        Ok(GeneralInfo {
            mac,
            id,
            name: child_text(root, "productName")?,
            info: child_text(root, "info1")?,
            version: child_text(root, "productHighRevision")?,
            revision: child_text(root, "productLowRevision")?,
            build: child_text(root, "productBuildRevision")?,
        })
    }

    #[instrument(skip(self))]
    pub async fn basis_info(&self) -> Result<BasisInfo, FetchError> {
        let body = self.get(BASIS_INFO).await?;
        let document = Document::parse(&body)?;
        let root = document.root_element();

        Ok(BasisInfo {
            ask_pin: child_text(root, "askPIN")?,
            pin_to_use: child_text(root, "PINToUse")?,
            pin_timeout: child_text(root, "PINTimeout")?,
            start_from_map: child_text(root, "startFromMap")?,
        })
    }

    pub async fn device_info(&self) -> Result<DeviceInfo, FetchError> {
        let general = self.general_info().await?;
        Ok(DeviceInfo::derive(&general))
    }

    /// Sparse positional index → label map. Outputs without a label are not
    /// exposed as entities, but their index slot stays reserved so rows from
    /// [`output_status`](Self::output_status) still line up.
    #[instrument(skip(self, device))]
    pub async fn output_descriptions(&self, device: &DeviceInfo) -> Result<BTreeMap<usize, String>, FetchError> {
        let body = self.get(&format!("{}{}.xml", OUTPUTS_DESCRIPTION, device.lares_version)).await?;
        let document = Document::parse(&body)?;

        let mut descriptions = BTreeMap::new();
        for (index, node) in elements(document.root_element(), "output").enumerate() {
            if let Some(label) = node.text().filter(|text| !text.trim().is_empty()) {
                descriptions.insert(index, label.to_string());
            }
        }
        Ok(descriptions)
    }

    /// Dense positional list. Unlabeled zones keep an empty slot so the index
    /// always lines up with [`zone_status`](Self::zone_status).
    #[instrument(skip(self, device))]
    pub async fn zone_descriptions(&self, device: &DeviceInfo) -> Result<Vec<String>, FetchError> {
        let body = self.get(&format!("{}{}.xml", ZONES_DESCRIPTION, device.lares_version)).await?;
        let document = Document::parse(&body)?;

        Ok(elements(document.root_element(), "zone")
            .map(|node| node.text().unwrap_or_default().to_string())
            .collect())
    }

    #[instrument(skip(self, device))]
    pub async fn output_status(&self, device: &DeviceInfo) -> Result<Vec<OutputStatus>, FetchError> {
        let body = self.get(&format!("{}{}.xml", OUTPUTS_STATUS, device.lares_version)).await?;
        let document = Document::parse(&body)?;

        let rows = elements(document.root_element(), "output")
            .enumerate()
            .filter_map(|(index, node)| match OutputStatus::parse(node) {
                Ok(row) => Some(row),
                Err(e) => {
                    error!("⚠️ Dropping output status row {}: {}", index, e);
                    None
                }
            })
            .collect();
        Ok(rows)
    }

    #[instrument(skip(self, device))]
    pub async fn zone_status(&self, device: &DeviceInfo) -> Result<Vec<ZoneStatus>, FetchError> {
        let body = self.get(&format!("{}{}.xml", ZONES_STATUS, device.lares_version)).await?;
        let document = Document::parse(&body)?;

        let rows = elements(document.root_element(), "zone")
            .enumerate()
            .filter_map(|(index, node)| match ZoneStatus::parse(node) {
                Ok(row) => Some(row),
                Err(e) => {
                    error!("⚠️ Dropping zone status row {}: {}", index, e);
                    None
                }
            })
            .collect();
        Ok(rows)
    }

    /// Zone labels paired by position with status rows. The two lists come
    /// from independent endpoints, so the counts are validated before pairing.
    pub async fn zones(&self, device: &DeviceInfo) -> Result<Vec<Zone>, FetchError> {
        let descriptions = self.zone_descriptions(device).await?;
        let status = self.zone_status(device).await?;

        if descriptions.len() != status.len() {
            #[rustfmt::skip]
            warn!("⚠️ Zone description/status counts differ ({} vs {}), pairing up to the shorter list", descriptions.len(), status.len());
        }

        Ok(descriptions
            .into_iter()
            .zip(status)
            .map(|(description, status)| Zone { description, status })
            .collect())
    }

    /// Fire-and-forget: the panel answers a command with a generic echo, so
    /// HTTP 200 is the only acknowledgement and callers verify by re-polling.
    #[instrument(skip(self, pin))]
    pub async fn send_output_command(&self, pin: &str, output_id: &str, value: &str) -> Result<(), FetchError> {
        self.get(&format!("{COMMAND}?cmd=setOutput&pin={pin}&outputId={output_id}&outputValue={value}")).await?;
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<String, FetchError> {
        let url = format!("{}/xml/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .inspect_err(|e| debug!("🔴 Host {}: connection error: {}", self.base_url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = %status, "🔴 Host {}: unexpected status code", self.base_url);
            return Err(FetchError::Status(status));
        }

        Ok(response.text().await?)
    }
}
