use alloc::vec::Vec;

use super::*;

/// Uniform shuffle of the value multiset, laid out row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, values: &[CellValue]) -> Result<Board> {
        use rand::prelude::*;

        if values.len() != CELL_COUNT {
            return Err(GameError::InvalidBoardSize {
                expected: CELL_COUNT,
                actual: values.len(),
            });
        }

        let mut shuffled: Vec<CellValue> = values.to_vec();
        let mut rng = SmallRng::seed_from_u64(self.seed);
        shuffled.shuffle(&mut rng);

        log::debug!("Generated board from seed {}", self.seed);
        Board::from_values(&shuffled)
    }
}
