//! Id-indexed registries
//!
//! Players and tournaments live in ordered vectors with an id → position map
//! kept alongside. The map is rebuilt only when membership changes
//! (`push`, `drain_where`), never on field updates.

use std::collections::HashMap;

use crate::models::{Player, PlayerId, Tournament, TournamentId};

pub trait Keyed {
    fn key(&self) -> u32;
}

impl Keyed for Player {
    fn key(&self) -> u32 {
        self.id
    }
}

impl Keyed for Tournament {
    fn key(&self) -> u32 {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct Registry<T: Keyed> {
    items: Vec<T>,
    index: HashMap<u32, usize>,
}

impl<T: Keyed> Default for Registry<T> {
    fn default() -> Self {
        Self { items: Vec::new(), index: HashMap::new() }
    }
}

impl<T: Keyed> Registry<T> {
    /// Later duplicates of an id shadow earlier ones in lookups.
    pub fn new(items: Vec<T>) -> Self {
        let mut registry = Self { items, index: HashMap::new() };
        registry.rebuild_index();
        registry
    }

    fn rebuild_index(&mut self) {
        self.index = self.items.iter().enumerate().map(|(i, item)| (item.key(), i)).collect();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.index.get(&id).map(|&i| &self.items[i])
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        match self.index.get(&id) {
            Some(&i) => self.items.get_mut(i),
            None => None,
        }
    }

    /// Two distinct entries mutably at once.
    pub fn get_pair_mut(&mut self, a: u32, b: u32) -> Option<(&mut T, &mut T)> {
        let ia = *self.index.get(&a)?;
        let ib = *self.index.get(&b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (left, right) = self.items.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.items.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    pub fn push(&mut self, item: T) {
        self.index.insert(item.key(), self.items.len());
        self.items.push(item);
    }

    /// Removes entries matching `remove` and returns them.
    pub fn drain_where<F>(&mut self, mut remove: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.items.len());
        for item in self.items.drain(..) {
            if remove(&item) {
                removed.push(item);
            } else {
                kept.push(item);
            }
        }
        self.items = kept;
        if !removed.is_empty() {
            self.rebuild_index();
        }
        removed
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

pub type Roster = Registry<Player>;
pub type Calendar = Registry<Tournament>;

impl Roster {
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.get(id)
    }

    pub fn active(&self) -> impl Iterator<Item = &Player> {
        self.iter().filter(|p| !p.retired)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn next_free_id(&self) -> PlayerId {
        self.iter().map(|p| p.id).max().map(|m| m + 1).unwrap_or(1)
    }
}

impl Calendar {
    pub fn tournament(&self, id: TournamentId) -> Option<&Tournament> {
        self.get(id)
    }

    /// Ids of tournaments scheduled for `week`, in calendar order.
    pub fn week_ids(&self, week: u32) -> Vec<TournamentId> {
        self.iter().filter(|t| t.week == week).map(|t| t.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Skills;

    fn roster(n: u32) -> Roster {
        Roster::new((1..=n).map(|i| Player::new(i, format!("P{}", i), 20, Skills::uniform(50))).collect())
    }

    #[test]
    fn test_lookup_by_id() {
        let r = roster(5);
        assert_eq!(r.get(3).unwrap().name, "P3");
        assert!(r.get(9).is_none());
        assert_eq!(r.next_free_id(), 6);
    }

    #[test]
    fn test_pair_mut_both_orders() {
        let mut r = roster(4);
        {
            let (a, b) = r.get_pair_mut(4, 1).unwrap();
            a.age = 30;
            b.age = 31;
        }
        assert_eq!(r.get(4).unwrap().age, 30);
        assert_eq!(r.get(1).unwrap().age, 31);
        assert!(r.get_pair_mut(2, 2).is_none());
    }

    #[test]
    fn test_drain_rebuilds_index() {
        let mut r = roster(5);
        let removed = r.drain_where(|p| p.id % 2 == 0);
        assert_eq!(removed.len(), 2);
        assert_eq!(r.len(), 3);
        assert_eq!(r.get(5).unwrap().id, 5);
        assert!(r.get(2).is_none());
    }

    #[test]
    fn test_push_indexes_new_entry() {
        let mut r = roster(2);
        r.push(Player::new(10, "New", 18, Skills::uniform(30)));
        assert_eq!(r.get(10).unwrap().name, "New");
    }
}
