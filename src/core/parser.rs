use crate::domain::model::DomainSet;
use crate::utils::error::{HostsError, Result};
use std::io::BufRead;

/// The only address recognised at the start of a blocking rule.
pub const SENTINEL_ADDRESS: &str = "0.0.0.0";

/// Typosquat artifact seen in some published lists.
const INVALID_HOST_SUFFIX: &str = ".001com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldVerdict {
    Accept,
    /// The rest of the line is a comment.
    Comment,
    IpAddress,
    InvalidHostName,
    Empty,
}

pub fn classify_field(field: &str) -> FieldVerdict {
    if field.is_empty() {
        FieldVerdict::Empty
    } else if field.starts_with('#') {
        FieldVerdict::Comment
    } else if field.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        FieldVerdict::IpAddress
    } else if field.ends_with(INVALID_HOST_SUFFIX) {
        FieldVerdict::InvalidHostName
    } else {
        FieldVerdict::Accept
    }
}

/// Reads `0.0.0.0 <host> [<host>...] [# comment]` lines into `hosts`.
///
/// Lines starting with anything else are ignored. Returns the number of
/// accepted fields, duplicates included, and fails when there were none.
pub fn parse_hosts<R: BufRead>(reader: R, origin: &str, hosts: &mut DomainSet) -> Result<usize> {
    let mut found = 0;

    for line in reader.split(b'\n') {
        let line = line.map_err(|e| HostsError::IoError(e).context("error reading hosts"))?;
        let line = String::from_utf8_lossy(&line);
        let mut fields = line.split_whitespace();

        if fields.next() != Some(SENTINEL_ADDRESS) {
            continue;
        }

        for field in fields {
            match classify_field(field) {
                FieldVerdict::Comment => break,
                FieldVerdict::IpAddress => {
                    tracing::warn!("{}: skipping IP address {}", origin, field);
                }
                FieldVerdict::InvalidHostName => {
                    tracing::warn!("{}: skipping invalid host name {}", origin, field);
                }
                FieldVerdict::Empty => {
                    tracing::debug!("{}: skipping empty field", origin);
                }
                FieldVerdict::Accept => {
                    hosts.insert(field);
                    found += 1;
                }
            }
        }
    }

    if found == 0 {
        return Err(HostsError::NoHostsFoundError);
    }

    tracing::info!("{}: found {} hosts", origin, found);
    Ok(found)
}
