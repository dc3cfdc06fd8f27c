//! Property tests for engine invariants over generated sizes, seeds and inputs

use proptest::prelude::*;

use arcade_engines::core::blackjack::{card_value, hand_value, Card, Rank, Suit};
use arcade_engines::core::clock::FixedClock;
use arcade_engines::core::grid::Grid;
use arcade_engines::core::minesweeper::{self, MinesweeperStatus};
use arcade_engines::core::rng::{shuffle, SimpleRng};
use arcade_engines::core::tetris::TetrisState;
use arcade_engines::types::{TetrisAction, BOARD_HEIGHT};

const ACTIONS: [TetrisAction; 6] = [
    TetrisAction::MoveLeft,
    TetrisAction::MoveRight,
    TetrisAction::SoftDrop,
    TetrisAction::HardDrop,
    TetrisAction::Rotate,
    TetrisAction::Pause,
];

fn board_dims() -> impl Strategy<Value = (usize, usize, usize)> {
    (2usize..16, 2usize..16).prop_flat_map(|(w, h)| (Just(w), Just(h), 1..w * h))
}

proptest! {
    #[test]
    fn initial_minesweeper_state_is_blank((w, h, m) in board_dims()) {
        let state = minesweeper::create_initial_state(w, h, m);
        prop_assert_eq!(state.cells().len(), w * h);
        prop_assert_eq!(state.mines(), m);
        prop_assert_eq!(state.status(), MinesweeperStatus::Ready);
        prop_assert!(state.cells().iter().all(|c| !c.is_mine && !c.is_revealed && !c.is_flagged));
    }

    #[test]
    fn first_reveal_is_safe(
        (w, h, m) in board_dims(),
        seed in any::<u32>(),
        fx in 0usize..16,
        fy in 0usize..16,
    ) {
        let (x, y) = ((fx % w) as i32, (fy % h) as i32);
        let mut rng = SimpleRng::new(seed);
        let state = minesweeper::create_initial_state(w, h, m);
        let state = minesweeper::reveal_cell(&state, x, y, &mut rng, &FixedClock(7));

        prop_assert!(state.status() != MinesweeperStatus::Ready);
        prop_assert_ne!(state.status(), MinesweeperStatus::Lost);
        prop_assert_eq!(state.started_at(), Some(7));
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(cell) = minesweeper::get_cell(&state, x + dx, y + dy) {
                    prop_assert!(!cell.is_mine);
                }
            }
        }
        let placed = state.cells().iter().filter(|c| c.is_mine).count();
        prop_assert!(placed <= m);
        for cell in state.cells() {
            let counted = state
                .grid()
                .neighbors(cell.x, cell.y)
                .iter()
                .filter(|&&(nx, ny)| state.grid().get(nx as i32, ny as i32).map_or(false, |c| c.is_mine))
                .count();
            if !cell.is_mine {
                prop_assert_eq!(cell.adjacent_mines as usize, counted);
            }
        }
    }

    #[test]
    fn double_flag_is_identity(
        (w, h, m) in board_dims(),
        fx in 0usize..16,
        fy in 0usize..16,
    ) {
        let (x, y) = ((fx % w) as i32, (fy % h) as i32);
        let state = minesweeper::create_initial_state(w, h, m);
        let once = minesweeper::toggle_flag(&state, x, y);
        prop_assert_eq!(once.flagged_count(), 1);
        prop_assert_eq!(minesweeper::toggle_flag(&once, x, y), state);
    }

    #[test]
    fn tetris_rollout_keeps_invariants(
        seed in any::<u32>(),
        moves in proptest::collection::vec(0usize..ACTIONS.len(), 1..200),
    ) {
        let mut rng = SimpleRng::new(seed);
        let mut state = TetrisState::new(&mut rng);
        for idx in moves {
            let before = state.clone();
            state = state.apply_action(ACTIONS[idx], &mut rng);

            prop_assert!(state.score() >= before.score());
            prop_assert!(state.lines() >= before.lines());
            prop_assert!(state.level() >= 1);
            prop_assert_eq!(state.board().rows().count(), BOARD_HEIGHT);
            if !state.game_over() {
                let active = state.active().unwrap();
                prop_assert!(!state.board().collides(&active.shape, active.x, active.y));
            }
        }
    }

    #[test]
    fn shuffle_is_a_permutation(seed in any::<u32>(), len in 0usize..100) {
        let mut rng = SimpleRng::new(seed);
        let mut items: Vec<usize> = (0..len).collect();
        shuffle(&mut rng, &mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..len).collect::<Vec<_>>());
    }

    #[test]
    fn grid_neighbours_stay_in_bounds(w in 1usize..12, h in 1usize..12, x in 0usize..12, y in 0usize..12) {
        let grid = Grid::filled(w, h, 0u8);
        let (x, y) = (x % w, y % h);
        let neighbors = grid.neighbors(x, y);
        prop_assert!(neighbors.len() <= 8);
        prop_assert!(neighbors.iter().all(|&(nx, ny)| nx < w && ny < h && (nx, ny) != (x, y)));
        prop_assert!(grid.wrapping_neighbors(x, y).iter().all(|&(nx, ny)| nx < w && ny < h));
        if w >= 3 && h >= 3 {
            prop_assert_eq!(neighbors.len() == 8, x > 0 && y > 0 && x < w - 1 && y < h - 1);
        }
    }

    #[test]
    fn hand_value_demotes_aces_only_as_needed(ranks in proptest::collection::vec(0usize..13, 0..8)) {
        let hand: Vec<Card> = ranks.iter().map(|&r| Card::new(Suit::Hearts, Rank::ALL[r])).collect();
        let high: u32 = hand.iter().map(|c| card_value(c.rank)).sum();
        let aces = hand.iter().filter(|c| c.rank == Rank::Ace).count() as u32;
        let low = high - 10 * aces;
        let value = hand_value(&hand);

        prop_assert!(value >= low && value <= high);
        prop_assert_eq!((high - value) % 10, 0);
        if value > 21 {
            prop_assert_eq!(value, low);
        }
    }
}
