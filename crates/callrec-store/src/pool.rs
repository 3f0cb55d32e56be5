//! ModelPool: idle instances per type plus a global live-instance bound.
//!
//! `live` counts every instance the store has created and not yet dropped,
//! lent or idle. It acts as a fail-fast counting semaphore: reservations
//! never wait.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use callrec_core::TypeName;
use callrec_network::UsageNetwork;

/// Outcome of asking for a new live slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reservation {
    /// A free slot was taken.
    Fresh,
    /// The pool was full; an idle instance of this type was dropped and its
    /// slot handed over.
    Evicted(TypeName),
    /// Every slot is held by a lent instance.
    Exhausted { live: usize, max: usize },
}

pub struct ModelPool {
    idle: DashMap<TypeName, Vec<UsageNetwork>>,
    live: AtomicUsize,
    max_total: usize,
    max_idle_per_type: usize,
}

impl ModelPool {
    pub fn new(max_total: usize, max_idle_per_type: usize) -> Self {
        Self {
            idle: DashMap::new(),
            live: AtomicUsize::new(0),
            max_total,
            max_idle_per_type,
        }
    }

    /// Pop an idle instance of `type_name`, if any.
    pub fn take_idle(&self, type_name: &TypeName) -> Option<UsageNetwork> {
        self.idle.get_mut(type_name).and_then(|mut list| list.pop())
    }

    pub fn reserve(&self) -> Reservation {
        let reserved = self
            .live
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |live| {
                (live < self.max_total).then_some(live + 1)
            })
            .is_ok();
        if reserved {
            return Reservation::Fresh;
        }
        match self.evict_one() {
            Some(victim) => Reservation::Evicted(victim),
            None => Reservation::Exhausted {
                live: self.live(),
                max: self.max_total,
            },
        }
    }

    /// Give back a slot reserved for an instance that was never handed out
    /// or that has been dropped.
    pub fn free_slot(&self) {
        let _ = self
            .live
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |live| live.checked_sub(1));
    }

    /// Keep `network` for reuse if its type has room, otherwise drop it.
    /// Returns whether it was kept.
    pub fn put_back(&self, network: UsageNetwork) -> bool {
        let mut list = self.idle.entry(network.type_name().clone()).or_default();
        if list.len() < self.max_idle_per_type {
            list.push(network);
            return true;
        }
        drop(list);
        self.free_slot();
        false
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn idle(&self) -> usize {
        self.idle.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn idle_of(&self, type_name: &TypeName) -> usize {
        self.idle.get(type_name).map_or(0, |list| list.len())
    }

    pub fn max_total(&self) -> usize {
        self.max_total
    }

    fn evict_one(&self) -> Option<TypeName> {
        for mut entry in self.idle.iter_mut() {
            if entry.value_mut().pop().is_some() {
                return Some(entry.key().clone());
            }
        }
        None
    }
}
