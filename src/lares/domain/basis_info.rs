/// Panel-wide configuration from `info/basisInfo.xml`.
///
/// Values are kept exactly as the panel reports them; the only field the
/// bridge interprets is `pin_to_use`, which authorizes output commands.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct BasisInfo {
    pub ask_pin: String,
    pub pin_to_use: String,
    pub pin_timeout: String,
    pub start_from_map: String,
}
