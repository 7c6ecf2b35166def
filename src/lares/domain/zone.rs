use crate::lares::client::FetchError;
use crate::lares::xml::child_text;
use roxmltree::Node;

const ZONE_STATUS_ALARM: &str = "ALARM";
const ZONE_STATUS_NOT_USED: &str = "NOT_USED";
const ZONE_BYPASS_ON: &str = "BYPASS";

/// One row of `zones/zonesStatus{version}.xml`. Zones are read-only; the
/// bridge never issues bypass or arming commands.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneStatus {
    pub status: String,
    pub bypass: String,
    pub alarm: String,
}

impl ZoneStatus {
    pub(crate) fn parse(node: Node) -> Result<Self, FetchError> {
        Ok(ZoneStatus {
            status: child_text(node, "status")?,
            bypass: child_text(node, "bypass")?,
            alarm: child_text(node, "alarm")?,
        })
    }

    pub fn in_alarm(&self) -> bool {
        self.status == ZONE_STATUS_ALARM
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypass == ZONE_BYPASS_ON
    }

    pub fn is_used(&self) -> bool {
        self.status != ZONE_STATUS_NOT_USED
    }
}

/// A zone description paired by position with its status row.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub description: String,
    pub status: ZoneStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn status(status: &str, bypass: &str) -> ZoneStatus {
        ZoneStatus {
            status: status.to_string(),
            bypass: bypass.to_string(),
            alarm: "NO_ALARM".to_string(),
        }
    }

    #[rstest]
    #[case("ALARM", true, true)]
    #[case("NORMAL", false, true)]
    #[case("NOT_USED", false, false)]
    fn status_projections(#[case] value: &str, #[case] in_alarm: bool, #[case] used: bool) {
        let zone_status = status(value, "UN_BYPASS");

        assert_eq!(zone_status.in_alarm(), in_alarm);
        assert_eq!(zone_status.is_used(), used);
        assert!(!zone_status.is_bypassed());
    }

    #[test]
    fn bypass_projection() {
        assert!(status("NORMAL", "BYPASS").is_bypassed());
    }

    #[test]
    fn parse_fails_on_a_missing_child_element() {
        let document = roxmltree::Document::parse("<zone><status>NORMAL</status></zone>").unwrap();

        let result = ZoneStatus::parse(document.root_element());

        assert!(matches!(result, Err(FetchError::MissingElement("bypass"))));
    }
}
