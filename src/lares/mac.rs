use std::fs;
use tracing::debug;

const ARP_TABLE: &str = "/proc/net/arp";
const EMPTY_MAC: &str = "00:00:00:00:00:00";

/// Best-effort MAC resolution for the panel's IP via the kernel ARP table.
/// Returns `None` for hostnames, unknown addresses, or unreadable tables;
/// callers fall back to a `host:port` identity.
pub fn lookup(ip: &str) -> Option<String> {
    match fs::read_to_string(ARP_TABLE) {
        Ok(table) => find_in_table(&table, ip),
        Err(e) => {
            debug!("Could not read {}: {}", ARP_TABLE, e);
            None
        }
    }
}

fn find_in_table(table: &str, ip: &str) -> Option<String> {
    // First line is the column header.
    table.lines().skip(1).find_map(|line| {
        let mut columns = line.split_whitespace();
        let entry_ip = columns.next()?;
        let mac = columns.nth(2)?;
        (entry_ip == ip && mac != EMPTY_MAC).then(|| mac.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TABLE: &str = "IP address       HW type     Flags       HW address            Mask     Device\n\
                         192.168.1.5      0x1         0x2         aa:bb:cc:dd:ee:ff     *        eth0\n\
                         192.168.1.9      0x1         0x0         00:00:00:00:00:00     *        eth0\n";

    #[test]
    fn find_in_table_returns_the_matching_mac() {
        assert_eq!(find_in_table(TABLE, "192.168.1.5"), Some("aa:bb:cc:dd:ee:ff".to_string()));
    }

    #[test]
    fn find_in_table_skips_incomplete_entries() {
        assert_eq!(find_in_table(TABLE, "192.168.1.9"), None);
    }

    #[test]
    fn find_in_table_returns_none_for_unknown_addresses() {
        assert_eq!(find_in_table(TABLE, "10.0.0.1"), None);
    }
}
