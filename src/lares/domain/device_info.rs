use crate::lares::domain::GeneralInfo;

pub const MANUFACTURER: &str = "KSENIA";

/// Identity view derived once from [`GeneralInfo`], used for registry purposes
/// and to select version-scoped endpoint paths.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    pub identifier: String,
    pub name: String,
    pub manufacturer: &'static str,
    pub model: String,
    pub sw_version: String,
    /// Last whitespace-separated token of the product name, e.g. "4.0" for
    /// "Lares 4.0". The panel offers no dedicated field for this, so a renamed
    /// device breaks version-scoped paths; kept isolated here so a shape
    /// change fails in one place.
    pub lares_version: String,
    pub mac: Option<String>,
}

impl DeviceInfo {
    pub fn derive(general: &GeneralInfo) -> Self {
        DeviceInfo {
            identifier: general.id.clone(),
            name: general.name.clone(),
            manufacturer: MANUFACTURER,
            model: general.name.clone(),
            sw_version: format!("{}.{}.{}", general.version, general.revision, general.build),
            lares_version: general.name.split_whitespace().last().unwrap_or_default().to_string(),
            mac: general.mac.clone(),
        }
    }
}
