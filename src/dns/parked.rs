//! Parked-domain detection.
//!
//! A domain counts as parked when either check fires:
//! - an A record falls inside a known parking provider's IP range
//!   (patricia-trie CIDR set), or
//! - an NS record matches a curated set of parking nameservers, on the raw
//!   host or on its registrable eTLD+1.

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::str::FromStr;

use ipnetwork::Ipv4Network;
use log::warn;

use super::parked_data::{PARKED_IP_RANGES, PARKED_NS_HOSTS};
use crate::storage::sqlite::registrable_domain;

/// Binary patricia trie over IPv4 prefixes.
///
/// Nodes are stored in a flat arena; a lookup walks the address bits from
/// the most significant end and matches as soon as it passes any inserted
/// prefix.
struct Ipv4PrefixTrie {
    nodes: Vec<TrieNode>,
}

#[derive(Default)]
struct TrieNode {
    children: [Option<usize>; 2],
    terminal: bool,
}

impl Ipv4PrefixTrie {
    fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    fn insert(&mut self, network: Ipv4Network) {
        let bits = u32::from(network.network());
        let mut node = 0usize;
        for i in 0..network.prefix() {
            let bit = ((bits >> (31 - i)) & 1) as usize;
            node = match self.nodes[node].children[bit] {
                Some(next) => next,
                None => {
                    self.nodes.push(TrieNode::default());
                    let next = self.nodes.len() - 1;
                    self.nodes[node].children[bit] = Some(next);
                    next
                }
            };
        }
        self.nodes[node].terminal = true;
    }

    fn contains(&self, addr: Ipv4Addr) -> bool {
        let bits = u32::from(addr);
        let mut node = 0usize;
        if self.nodes[node].terminal {
            return true;
        }
        for i in 0..32 {
            let bit = ((bits >> (31 - i)) & 1) as usize;
            match self.nodes[node].children[bit] {
                Some(next) => {
                    node = next;
                    if self.nodes[node].terminal {
                        return true;
                    }
                }
                None => return false,
            }
        }
        false
    }
}

/// Membership checks against the curated parking data.
pub struct ParkedDomainMatcher {
    ip_ranges: Ipv4PrefixTrie,
    ns_hosts: HashSet<&'static str>,
}

impl Default for ParkedDomainMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ParkedDomainMatcher {
    pub fn new() -> Self {
        let mut ip_ranges = Ipv4PrefixTrie::new();
        for cidr in PARKED_IP_RANGES {
            match Ipv4Network::from_str(cidr) {
                Ok(network) => ip_ranges.insert(network),
                Err(e) => warn!("Skipping malformed parked CIDR '{cidr}': {e}"),
            }
        }

        Self {
            ip_ranges,
            ns_hosts: PARKED_NS_HOSTS.iter().copied().collect(),
        }
    }

    /// Whether `ip` (an A record's data) sits in a parking provider range.
    /// Unparseable input and IPv6 addresses are not matches.
    pub fn is_parked_ip(&self, ip: &str) -> bool {
        match ip.parse::<Ipv4Addr>() {
            Ok(addr) => self.ip_ranges.contains(addr),
            Err(_) => false,
        }
    }

    /// Whether `host` (an NS record's data) is a known parking nameserver,
    /// matched on the host itself or on its registrable domain.
    pub fn is_parked_ns(&self, host: &str) -> bool {
        let host = host.strip_suffix('.').unwrap_or(host);
        let base = registrable_domain(host);
        self.ns_hosts.contains(host) || self.ns_hosts.contains(base)
    }
}
