//! Game, set and match scoring
//!
//! Indices 0 and 1 are player1 and player2 throughout.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Game { winner: usize },
    Set { winner: usize },
    Match { winner: usize },
}

#[derive(Debug, Clone)]
pub struct Scoreboard {
    sets_to_win: u8,
    /// Deuces allowed before the next point decides the game
    deuce_limit: u8,
    deuces: u8,
    points: [u8; 2],
    games: [u8; 2],
    sets_won: [u8; 2],
    completed_sets: Vec<(u8, u8)>,
}

impl Scoreboard {
    pub fn new(sets_to_win: u8, deuce_limit: u8) -> Self {
        Self {
            sets_to_win: sets_to_win.max(1),
            deuce_limit,
            deuces: 0,
            points: [0; 2],
            games: [0; 2],
            sets_won: [0; 2],
            completed_sets: Vec::new(),
        }
    }

    /// Records a point for `side` (0 or 1) and reports what it closed.
    pub fn point_won(&mut self, side: usize) -> Transition {
        if self.is_over() {
            return Transition::None;
        }
        let other = 1 - side;
        self.points[side] = self.points[side].saturating_add(1);
        let (won, lost) = (self.points[side], self.points[other]);
        let clear = won >= 4 && won >= lost.saturating_add(2);
        let deciding = won > lost && self.deuces > self.deuce_limit;
        if !clear && !deciding {
            if won == lost && won >= 3 {
                self.deuces = self.deuces.saturating_add(1);
            }
            return Transition::None;
        }

        self.points = [0; 2];
        self.deuces = 0;
        self.games[side] = self.games[side].saturating_add(1);
        let (won, lost) = (self.games[side], self.games[other]);
        let set_over = (won >= 6 && won >= lost + 2) || won == 7;
        if !set_over {
            return Transition::Game { winner: side };
        }

        self.completed_sets.push((self.games[0], self.games[1]));
        self.games = [0; 2];
        self.sets_won[side] += 1;
        if self.sets_won[side] >= self.sets_to_win {
            Transition::Match { winner: side }
        } else {
            Transition::Set { winner: side }
        }
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    pub fn winner(&self) -> Option<usize> {
        (0..2).find(|&i| self.sets_won[i] >= self.sets_to_win)
    }

    pub fn games(&self) -> [u8; 2] {
        self.games
    }

    pub fn sets_won(&self) -> [u8; 2] {
        self.sets_won
    }

    /// Set number currently in play, starting at 1.
    pub fn current_set(&self) -> usize {
        self.completed_sets.len() + 1
    }

    pub fn completed_sets(&self) -> &[(u8, u8)] {
        &self.completed_sets
    }

    /// "g1-g2, g3-g4, ..." with player1's games first.
    pub fn score_string(&self) -> String {
        self.completed_sets
            .iter()
            .map(|(a, b)| format!("{}-{}", a, b))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn win_game(board: &mut Scoreboard, side: usize) -> Transition {
        let mut last = Transition::None;
        for _ in 0..4 {
            last = board.point_won(side);
        }
        last
    }

    #[test]
    fn test_game_needs_two_point_margin() {
        let mut board = Scoreboard::new(2, 3);
        for _ in 0..3 {
            board.point_won(0);
            board.point_won(1);
        }
        // deuce, then advantage
        assert_eq!(board.point_won(0), Transition::None);
        assert_eq!(board.point_won(1), Transition::None);
        assert_eq!(board.point_won(1), Transition::None);
        assert_eq!(board.point_won(1), Transition::Game { winner: 1 });
        assert_eq!(board.games(), [0, 1]);
    }

    #[test]
    fn test_set_rules() {
        let mut board = Scoreboard::new(2, 3);
        for _ in 0..5 {
            win_game(&mut board, 0);
            win_game(&mut board, 1);
        }
        // 5-5 -> 6-5 is not a set
        assert_eq!(win_game(&mut board, 0), Transition::Game { winner: 0 });
        // 6-6 then 7-6 closes it
        win_game(&mut board, 1);
        assert_eq!(win_game(&mut board, 1), Transition::Set { winner: 1 });
        assert_eq!(board.completed_sets(), &[(6, 7)]);
        assert_eq!(board.current_set(), 2);
    }

    #[test]
    fn test_best_of_three_and_score_string() {
        let mut board = Scoreboard::new(2, 3);
        for _ in 0..6 {
            win_game(&mut board, 0);
        }
        for _ in 0..4 {
            win_game(&mut board, 0);
            win_game(&mut board, 1);
        }
        win_game(&mut board, 1);
        win_game(&mut board, 1);
        assert_eq!(board.sets_won(), [1, 1]);
        let mut last = Transition::None;
        for _ in 0..6 {
            last = win_game(&mut board, 0);
        }
        assert_eq!(last, Transition::Match { winner: 0 });
        assert_eq!(board.winner(), Some(0));
        assert_eq!(board.score_string(), "6-0, 4-6, 6-0");
        assert_eq!(board.point_won(1), Transition::None);
    }

    #[test]
    fn test_best_of_five() {
        let mut board = Scoreboard::new(3, 3);
        for set in 0..3 {
            for _ in 0..6 {
                win_game(&mut board, 1);
            }
            assert_eq!(board.sets_won()[1], set + 1);
        }
        assert_eq!(board.winner(), Some(1));
        assert_eq!(board.score_string(), "0-6, 0-6, 0-6");
    }

    #[test]
    fn test_deuce_limit_forces_a_decision() {
        let mut board = Scoreboard::new(2, 1);
        for _ in 0..3 {
            board.point_won(0);
            board.point_won(1);
        }
        // first deuce, advantage, second deuce
        assert_eq!(board.point_won(0), Transition::None);
        assert_eq!(board.point_won(1), Transition::None);
        // past the limit the next point takes the game
        assert_eq!(board.point_won(1), Transition::Game { winner: 1 });
        assert_eq!(board.games(), [0, 1]);

        // the count starts over in the next game
        for _ in 0..3 {
            board.point_won(0);
            board.point_won(1);
        }
        assert_eq!(board.point_won(0), Transition::None);
        assert_eq!(board.games(), [0, 1]);
    }

    #[test]
    fn test_alternating_points_still_finish_the_match() {
        let mut board = Scoreboard::new(3, 0);
        let mut side = 0;
        let mut points = 0;
        while !board.is_over() {
            board.point_won(side);
            side = 1 - side;
            points += 1;
            assert!(points < 10_000, "match never ended");
        }
        assert_eq!(board.completed_sets().len(), 5);
        assert!(board.completed_sets().iter().all(|&(a, b)| a.max(b) == 7));
    }
}
