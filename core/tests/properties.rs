use std::collections::BTreeSet;

use kingfind_core::*;
use proptest::prelude::*;

fn moves() -> impl Strategy<Value = Vec<Coord2>> {
    prop::collection::vec((0..BOARD_SIZE, 0..BOARD_SIZE), 1..80)
}

fn variants() -> impl Strategy<Value = VariantConfig> {
    prop_oneof![
        Just(VariantConfig::canonical()),
        Just(VariantConfig::skulls()),
    ]
}

fn revealed_cells(game: &Game) -> BTreeSet<Coord2> {
    game.board()
        .iter()
        .filter(|(_, cell)| cell.revealed)
        .map(|(coords, _)| coords)
        .collect()
}

/// Plays `moves`, closing every cell the turn asks to re-close right away.
fn play<F: FnMut(&Game, &TurnOutcome)>(game: &mut Game, moves: &[Coord2], mut each: F) {
    for &coords in moves {
        let outcome = game.open_cell(coords).unwrap();
        if let Some(report) = outcome.report() {
            if report.reclose {
                game.close_cell(coords).unwrap();
            }
        }
        each(game, &outcome);
    }
}

proptest! {
    #[test]
    fn generated_board_is_a_permutation(seed in any::<u64>(), config in variants()) {
        let board = RandomBoardGenerator::new(seed).generate(&config.board_values).unwrap();

        let mut expected = config.board_values.clone();
        let mut actual: Vec<CellValue> = board.values().collect();
        expected.sort();
        actual.sort();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn knowledge_only_grows(seed in any::<u64>(), config in variants(), moves in moves()) {
        let mut game = Game::new(config, seed).unwrap();
        let mut revealed = revealed_cells(&game);
        let mut no_five = game.hints().no_five_cells().clone();

        play(&mut game, &moves, |game, _| {
            let now_revealed = revealed_cells(game);
            let now_no_five = game.hints().no_five_cells().clone();
            assert!(now_revealed.is_superset(&revealed));
            assert!(now_no_five.is_superset(&no_five));
            revealed = now_revealed;
            no_five = now_no_five;
        });
    }

    #[test]
    fn cards_are_conserved(seed in any::<u64>(), config in variants(), moves in moves()) {
        let mut game = Game::new(config, seed).unwrap();
        let initial = game.deck().initial_total();
        let mut spent = 0u16;

        play(&mut game, &moves, |game, outcome| {
            if let Some(report) = outcome.report() {
                if !report.reused {
                    spent += 1;
                }
            }
            assert_eq!(game.deck().total_remaining() + spent, initial);
            assert_eq!(game.deck().consumed(), spent);
        });
    }

    #[test]
    fn bonus_lines_pay_once(seed in any::<u64>(), moves in moves()) {
        let mut game = Game::new(VariantConfig::canonical(), seed).unwrap();
        let mut paid = Vec::new();

        play(&mut game, &moves, |_, outcome| {
            if let Some(report) = outcome.report() {
                paid.extend(report.bonus_awards.iter().map(|award| award.line));
            }
        });

        let unique: BTreeSet<_> = paid.iter().map(|line| format!("{line:?}")).collect();
        prop_assert_eq!(unique.len(), paid.len());
        for line in paid {
            prop_assert!(game.bonus().is_credited(line));
        }
    }

    #[test]
    fn score_is_the_sum_of_turns(seed in any::<u64>(), config in variants(), moves in moves()) {
        let mut game = Game::new(config, seed).unwrap();
        play(&mut game, &moves, |_, _| {});

        let total: i32 = game.history().iter().map(|turn| turn.score_delta).sum();
        prop_assert_eq!(game.score(), total);
    }

    #[test]
    fn nothing_happens_after_the_end(seed in any::<u64>(), config in variants(), moves in moves()) {
        let mut game = Game::new(config, seed).unwrap();
        play(&mut game, &moves, |_, _| {});

        if game.is_finished() {
            let turns = game.history().len();
            for coords in iter_coords() {
                prop_assert_eq!(game.open_cell(coords).unwrap(), TurnOutcome::Ignored);
                prop_assert!(!game.close_cell(coords).unwrap());
            }
            prop_assert_eq!(game.history().len(), turns);
        }
    }
}
