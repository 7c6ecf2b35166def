use crate::lares::client::FetchError;
use crate::lares::xml::child_text;
use roxmltree::Node;

pub const OUTPUT_ON: &str = "ON";
pub const OUTPUT_OFF: &str = "OFF";
pub const OUTPUT_ON_VALUE: &str = "255";
pub const OUTPUT_OFF_VALUE: &str = "0";
pub const OUTPUT_CONTROL: &str = "TRUE";

/// One row of `outputs/outputsStatus{version}.xml`. The whole set is replaced
/// on every poll; rows are never updated in place.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct OutputStatus {
    pub status: String,
    pub r#type: String,
    pub value: String,
    pub no_pin: String,
    pub remote_control: String,
}

impl OutputStatus {
    pub(crate) fn parse(node: Node) -> Result<Self, FetchError> {
        Ok(OutputStatus {
            status: child_text(node, "status")?,
            r#type: child_text(node, "type")?,
            value: child_text(node, "value")?,
            no_pin: child_text(node, "noPIN")?,
            remote_control: child_text(node, "remoteControl")?,
        })
    }
}
