// The set of players still available in one draft, kept in rank order.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::catalog::index::{rank_key, RankKey};
use crate::catalog::{Player, PlayerId, Position, YearIndex};

/// Available players of a draft.
///
/// Seeded from the year's pre-sorted rank lists and shrunk one player per
/// pick, so selecting the best remaining player never rescans the year.
#[derive(Debug, Clone)]
pub struct AvailablePool {
    ids: HashSet<PlayerId>,
    by_overall_rank: BTreeSet<RankKey>,
    by_position: HashMap<Position, BTreeSet<RankKey>>,
}

impl AvailablePool {
    /// Every player catalogued for the year.
    pub fn from_year(index: &YearIndex) -> Self {
        AvailablePool {
            ids: index.players().map(|p| p.id).collect(),
            by_overall_rank: index.overall_rank_keys().iter().copied().collect(),
            by_position: index
                .position_rank_keys()
                .iter()
                .map(|(pos, keys)| (pos.clone(), keys.iter().copied().collect()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.ids.iter().copied()
    }

    /// Remove a player. Returns false if the player was not available.
    pub fn remove(&mut self, player: &Player) -> bool {
        if !self.ids.remove(&player.id) {
            return false;
        }
        self.by_overall_rank
            .remove(&rank_key(player.overall_rank, player.id));
        if let Some(position) = &player.position {
            if let Some(keys) = self.by_position.get_mut(position) {
                keys.remove(&rank_key(player.position_rank, player.id));
            }
        }
        true
    }

    /// Best available player at `position` by position rank.
    pub fn best_at_position(&self, position: &Position) -> Option<PlayerId> {
        self.by_position
            .get(position)
            .and_then(|keys| keys.first())
            .map(|&(_, id)| id)
    }

    /// Best available player by overall rank.
    pub fn best_overall(&self) -> Option<PlayerId> {
        self.by_overall_rank.first().map(|&(_, id)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::player;

    fn index() -> YearIndex {
        let mut wr = player(3, 2021, None);
        wr.position = Position::parse("WR");
        wr.overall_rank = Some(1);
        wr.position_rank = Some(1);
        let mut qb_a = player(1, 2021, Some(1));
        qb_a.overall_rank = Some(2);
        qb_a.position_rank = Some(2);
        let mut qb_b = player(2, 2021, Some(2));
        qb_b.overall_rank = Some(3);
        qb_b.position_rank = Some(1);
        YearIndex::build(2021, vec![qb_a, qb_b, wr])
    }

    #[test]
    fn seeded_with_every_player() {
        let pool = AvailablePool::from_year(&index());
        assert_eq!(pool.len(), 3);
        assert!(pool.contains(1) && pool.contains(2) && pool.contains(3));
    }

    #[test]
    fn best_at_position_uses_position_rank() {
        let pool = AvailablePool::from_year(&index());
        let qb = Position::parse("QB").unwrap();
        assert_eq!(pool.best_at_position(&qb), Some(2));
        assert_eq!(pool.best_overall(), Some(3));
        assert_eq!(pool.best_at_position(&Position::parse("TE").unwrap()), None);
    }

    #[test]
    fn remove_updates_every_ordering() {
        let index = index();
        let mut pool = AvailablePool::from_year(&index);
        assert!(pool.remove(index.player(2).unwrap()));
        assert!(pool.remove(index.player(3).unwrap()));
        let qb = Position::parse("QB").unwrap();
        assert_eq!(pool.best_at_position(&qb), Some(1));
        assert_eq!(pool.best_overall(), Some(1));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn remove_twice_is_rejected() {
        let index = index();
        let mut pool = AvailablePool::from_year(&index);
        assert!(pool.remove(index.player(1).unwrap()));
        assert!(!pool.remove(index.player(1).unwrap()));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn empty_pool_has_no_best() {
        let index = index();
        let mut pool = AvailablePool::from_year(&index);
        for id in 1..=3 {
            pool.remove(index.player(id).unwrap());
        }
        assert!(pool.is_empty());
        assert_eq!(pool.best_overall(), None);
    }

    #[test]
    fn rank_ties_break_by_player_id() {
        let mut a = player(20, 2021, None);
        a.overall_rank = Some(4);
        let mut b = player(10, 2021, None);
        b.overall_rank = Some(4);
        let index = YearIndex::build(2021, vec![a, b]);
        let pool = AvailablePool::from_year(&index);
        assert_eq!(pool.best_overall(), Some(10));
    }
}
