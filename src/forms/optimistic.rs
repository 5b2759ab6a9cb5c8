use uuid::Uuid;

use crate::core::models::voter::Voter;

pub trait Keyed {
    fn key(&self) -> Uuid;
}

impl Keyed for Voter {
    fn key(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    ticket: Ticket,
    action: Action,
    data: T,
}

/// A confirmed list plus in-flight changes layered over it.
///
/// Only pending changes are kept. Settling one either folds it into the
/// confirmed list (`commit`) or drops it (`rollback`).
#[derive(Debug, Clone)]
pub struct Optimistic<T> {
    confirmed: Vec<T>,
    pending: Vec<Entry<T>>,
    next: u64,
}

impl<T: Keyed + Clone> Optimistic<T> {
    pub fn new(confirmed: Vec<T>) -> Self {
        Self {
            confirmed,
            pending: vec![],
            next: 0,
        }
    }

    pub fn apply(&mut self, action: Action, data: T) -> Ticket {
        let ticket = Ticket(self.next);
        self.next += 1;
        self.pending.push(Entry { ticket, action, data });
        ticket
    }

    pub fn is_pending(&self, ticket: Ticket) -> bool {
        self.pending.iter().any(|e| e.ticket == ticket)
    }

    fn settle(&mut self, ticket: Ticket) -> Option<Entry<T>> {
        let i = self.pending.iter().position(|e| e.ticket == ticket)?;
        Some(self.pending.remove(i))
    }

    /// Confirms a pending change. `data` replaces the optimistic value when the
    /// store returned the real row.
    pub fn commit(&mut self, ticket: Ticket, data: Option<T>) -> bool {
        match self.settle(ticket) {
            Some(entry) => {
                apply_to(&mut self.confirmed, entry.action, data.unwrap_or(entry.data));
                true
            }
            None => false,
        }
    }

    pub fn rollback(&mut self, ticket: Ticket) -> bool {
        self.settle(ticket).is_some()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn confirmed(&self) -> &[T] {
        &self.confirmed
    }

    /// Replaces the confirmed list after a refresh; pending changes stay layered on top.
    pub fn refresh(&mut self, confirmed: Vec<T>) {
        self.confirmed = confirmed;
    }

    /// What the user sees: confirmed rows with pending changes applied in order.
    pub fn view(&self) -> Vec<T> {
        let mut rows = self.confirmed.clone();
        for entry in &self.pending {
            apply_to(&mut rows, entry.action, entry.data.clone());
        }
        rows
    }
}

fn apply_to<T: Keyed>(rows: &mut Vec<T>, action: Action, data: T) {
    match action {
        Action::Create => rows.push(data),
        Action::Update => {
            if let Some(row) = rows.iter_mut().find(|r| r.key() == data.key()) {
                *row = data;
            }
        }
        Action::Delete => rows.retain(|r| r.key() != data.key()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(Uuid, &'static str);

    impl Keyed for Row {
        fn key(&self) -> Uuid {
            self.0
        }
    }

    #[test]
    fn test_pending_create_then_commit() {
        let a = Row(Uuid::new_v4(), "a");
        let mut list = Optimistic::new(vec![a.clone()]);
        let ticket = list.apply(Action::Create, Row(Uuid::nil(), "b"));
        assert!(list.is_pending(ticket));
        assert_eq!(list.view().len(), 2);

        let real = Row(Uuid::new_v4(), "b");
        assert!(list.commit(ticket, Some(real.clone())));
        assert!(!list.is_pending(ticket));
        assert_eq!(list.view(), vec![a, real]);
        assert!(!list.commit(ticket, None));
    }

    #[test]
    fn test_rollback_restores_view() {
        let a = Row(Uuid::new_v4(), "a");
        let mut list = Optimistic::new(vec![a.clone()]);
        let ticket = list.apply(Action::Delete, a.clone());
        assert!(list.view().is_empty());
        assert!(list.rollback(ticket));
        assert!(!list.is_pending(ticket));
        assert!(!list.rollback(ticket));
        assert_eq!(list.view(), vec![a]);
        assert!(!list.has_pending());
    }

    #[test]
    fn test_update_replaces_by_key() {
        let id = Uuid::new_v4();
        let mut list = Optimistic::new(vec![Row(id, "old")]);
        list.apply(Action::Update, Row(id, "new"));
        assert_eq!(list.view(), vec![Row(id, "new")]);
        list.refresh(vec![Row(id, "server")]);
        assert_eq!(list.view(), vec![Row(id, "new")]);
    }

    #[test]
    fn test_settled_entries_are_pruned() {
        let mut list = Optimistic::new(vec![]);
        for i in 0..100 {
            let row = Row(Uuid::new_v4(), "row");
            let ticket = list.apply(Action::Create, row.clone());
            if i % 2 == 0 {
                list.commit(ticket, Some(row));
            } else {
                list.rollback(ticket);
            }
        }
        assert!(!list.has_pending());
        assert!(list.pending.is_empty());
        assert_eq!(list.confirmed().len(), 50);
        assert_eq!(list.view().len(), 50);
    }
}
