use super::model::Transfer;

/// A pending transfer tagged with its admission sequence number.
#[derive(Debug, Clone)]
struct Pending {
    seq: u64,
    transfer: Transfer,
}

/// Copy of the pool taken when a mining job starts.
///
/// `upto` is the highest sequence number included, so the job can later drain
/// exactly what it mined while newer submissions stay pending.
#[derive(Debug, Clone)]
pub struct PoolSnapshot {
    pub transfers: Vec<Transfer>,
    upto: Option<u64>,
}

/// Pending-transfer pool (mempool). Keeps insertion order.
#[derive(Debug, Default)]
pub struct TransferPool {
    entries: Vec<Pending>,
    next_seq: u64,
}

impl TransferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a transfer. Duplicates are allowed.
    pub fn submit(&mut self, transfer: Transfer) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Pending { seq, transfer });
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            transfers: self.entries.iter().map(|p| p.transfer.clone()).collect(),
            upto: self.entries.last().map(|p| p.seq),
        }
    }

    /// Remove everything captured by `snapshot`. Returns how many were removed.
    pub fn drain(&mut self, snapshot: &PoolSnapshot) -> usize {
        let Some(upto) = snapshot.upto else {
            return 0;
        };
        let before = self.entries.len();
        self.entries.retain(|p| p.seq > upto);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transfer> {
        self.entries.iter().map(|p| &p.transfer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_keeps_later_submissions() {
        let mut pool = TransferPool::new();
        pool.submit(Transfer::new("a", "b", 1.0));
        pool.submit(Transfer::new("a", "b", 1.0));
        let snap = pool.snapshot();
        assert_eq!(snap.transfers.len(), 2);

        pool.submit(Transfer::new("c", "d", 5.0));
        assert_eq!(pool.drain(&snap), 2);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.iter().next().unwrap().sender, "c");

        // draining twice is a no-op
        assert_eq!(pool.drain(&snap), 0);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn empty_snapshot_drains_nothing() {
        let mut pool = TransferPool::new();
        let snap = pool.snapshot();
        pool.submit(Transfer::new("a", "b", 1.0));
        assert_eq!(pool.drain(&snap), 0);
        assert!(!pool.is_empty());
    }
}
