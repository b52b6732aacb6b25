/// Running counters kept by a client across its lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientStats {
    pub datagrams_received: u64,
    pub bytes_received: u64,
    /// Datagrams discarded because they failed to decode.
    pub datagrams_dropped: u64,
    pub datagrams_oversize: u64,
    pub pdus_dispatched: u64,
    pub pdus_ignored: u64,
    pub entities_created: u64,
    pub entities_evicted: u64,
}

impl ClientStats {
    pub fn drop_percent(&self) -> f32 {
        let seen = self.datagrams_received + self.datagrams_oversize;
        if seen == 0 {
            return 0.0;
        }
        (self.datagrams_dropped + self.datagrams_oversize) as f32 / seen as f32 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_percent_of_idle_client_is_zero() {
        assert_eq!(ClientStats::default().drop_percent(), 0.0);
    }

    #[test]
    fn drop_percent_counts_malformed_and_oversize() {
        let stats = ClientStats {
            datagrams_received: 6,
            datagrams_dropped: 1,
            datagrams_oversize: 2,
            ..Default::default()
        };

        assert!((stats.drop_percent() - 37.5).abs() < 1e-4);
    }
}
