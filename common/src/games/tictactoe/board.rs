use super::error::GameError;
use super::types::Mark;
use super::win_detector;

/// Row-major `size * size` grid. Cells only ever go from empty to marked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Mark>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Mark::Empty; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[Mark] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied()
    }

    pub fn place(&mut self, index: usize, mark: Mark) -> Result<(), GameError> {
        debug_assert!(!mark.is_empty(), "placing an empty mark is a no-op write");

        let cell = self
            .cells
            .get_mut(index)
            .ok_or(GameError::InvalidMove { index: index as i64 })?;
        if !cell.is_empty() {
            return Err(GameError::OccupiedCell { index });
        }
        *cell = mark;
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    pub fn is_winning_move(&self, index: usize, mark: Mark, win_length: usize) -> bool {
        win_detector::is_winning_move(self, index, mark, win_length)
    }
}
