/// Ordering guard for remote search responses.
///
/// Every outgoing request is tagged with a monotonically increasing sequence
/// number. A response is accepted only if its number is higher than every
/// number already accepted and not below the invalidation floor, so responses
/// are applied in request-issued order and late arrivals are dropped.
#[derive(Debug, Clone, Default)]
pub struct SequenceGate {
    last_issued: u64,
    last_applied: u64,
    floor: u64,
}

impl SequenceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a new request.
    pub fn issue(&mut self) -> u64 {
        self.last_issued += 1;
        self.last_issued
    }

    /// Mark every request issued so far as stale.
    pub fn invalidate(&mut self) {
        self.floor = self.last_issued + 1;
    }

    /// Whether a response for `seq` may be applied; records it if so.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq < self.floor || seq <= self.last_applied || seq > self.last_issued {
            return false;
        }
        self.last_applied = seq;
        true
    }

    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }

    pub fn last_applied(&self) -> u64 {
        self.last_applied
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.last_issued
    }
}
