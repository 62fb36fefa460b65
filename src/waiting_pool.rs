use crate::client::ClientId;

/// Clients waiting to be matched, in join order.
#[derive(Debug, Default)]
pub struct WaitingPool {
    members: Vec<ClientId>,
}

impl WaitingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the client was already waiting.
    pub fn join(&mut self, client_id: ClientId) -> bool {
        if self.contains(client_id) {
            return false;
        }
        self.members.push(client_id);
        true
    }

    /// Returns false if the client was not waiting.
    pub fn leave(&mut self, client_id: ClientId) -> bool {
        let before = self.members.len();
        self.members.retain(|&id| id != client_id);
        self.members.len() != before
    }

    pub fn contains(&self, client_id: ClientId) -> bool {
        self.members.contains(&client_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[ClientId] {
        &self.members
    }

    /// Removes and returns the `count` longest-waiting clients, or nothing if fewer are waiting.
    pub fn take_first(&mut self, count: usize) -> Option<Vec<ClientId>> {
        if count == 0 || self.members.len() < count {
            return None;
        }
        Some(self.members.drain(..count).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_join_is_idempotent() {
        let mut pool = WaitingPool::new();
        let a = Uuid::new_v4();

        assert!(pool.join(a));
        assert!(!pool.join(a));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_leave_absent_is_noop() {
        let mut pool = WaitingPool::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        pool.join(a);

        assert!(!pool.leave(b));
        assert!(pool.leave(a));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_take_first_in_join_order() {
        let mut pool = WaitingPool::new();
        let ids: Vec<ClientId> = (0..3).map(|_| Uuid::new_v4()).collect();
        for &id in &ids {
            pool.join(id);
        }

        assert_eq!(pool.take_first(2), Some(vec![ids[0], ids[1]]));
        assert_eq!(pool.members(), &[ids[2]]);
        assert_eq!(pool.take_first(2), None);
        assert_eq!(pool.len(), 1);
    }
}
