//! Ranking
//!
//! Rank order is recomputed from scratch after every mutation.
//! `sort_by` is stable, so players with equal scores keep their
//! relative input order.

use crate::leaderboard::player::Player;

/// Sort players by descending score and assign dense ranks `1..=N`.
pub fn rank_players(mut players: Vec<Player>) -> Vec<Player> {
    players.sort_by(|a, b| b.score.cmp(&a.score));
    for (index, player) in players.iter_mut().enumerate() {
        player.rank = index as u32 + 1;
    }
    players
}

/// Check that ranks are dense and consistent with descending scores.
pub fn ranks_consistent(players: &[Player]) -> bool {
    players.iter().enumerate().all(|(index, p)| p.rank == index as u32 + 1)
        && players.windows(2).all(|w| w[0].score >= w[1].score)
}
