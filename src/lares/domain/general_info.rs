/// Raw identity record from `info/generalInfo.xml`, one fetch per session.
///
/// `id` is the resolved MAC address when the ARP lookup succeeds and falls
/// back to `"{host}:{port}"` when it does not.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralInfo {
    pub mac: Option<String>,
    pub id: String,
    pub name: String,
    pub info: String,
    pub version: String,
    pub revision: String,
    pub build: String,
}
