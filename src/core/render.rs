use crate::domain::model::{DomainSet, HostsDocument};
use chrono::{DateTime, Utc};

const STATIC_ENTRIES: &str = "\
127.0.0.1 localhost
127.0.0.1 localhost.localdomain
127.0.0.1 local
255.255.255.255 broadcasthost
::1 localhost
::1 ip6-localhost
::1 ip6-loopback
fe80::1%lo0 localhost
ff00::0 ip6-localnet
ff00::0 ip6-mcastprefix
ff02::1 ip6-allnodes
ff02::2 ip6-allrouters
ff02::3 ip6-allhosts
0.0.0.0 0.0.0.0
";

/// RFC 1123 with a numeric zone, e.g. `Mon, 02 Jan 2006 15:04:05 +0000`.
const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

pub fn format_timestamp(generated_at: DateTime<Utc>) -> String {
    generated_at.format(DATE_FORMAT).to_string()
}

/// Renders the hosts file: header, static entries, then one rule per host
/// in suffix-first order.
pub fn render_hosts(
    hosts: DomainSet,
    sources: &[String],
    generated_at: DateTime<Utc>,
) -> HostsDocument {
    let hosts = hosts.into_sorted();

    let included: String = sources.iter().map(|s| format!("# {}\n", s)).collect();
    let mut content = format!(
        "
# Amalgamated hosts file
#
# This is a hosts file generated from various sources.
#
# Date: {date}
# Number of unique domains: {count}
#
# Included hosts lists:
{included}#
# ===============================================================

{STATIC_ENTRIES}
# End preamble

",
        date = format_timestamp(generated_at),
        count = hosts.len(),
    );

    content.reserve(hosts.iter().map(|h| h.len() + 9).sum());
    for host in &hosts {
        content.push_str("0.0.0.0 ");
        content.push_str(host);
        content.push('\n');
    }

    HostsDocument {
        content,
        domain_count: hosts.len(),
    }
}
