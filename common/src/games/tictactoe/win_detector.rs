use super::board::Board;
use super::types::Mark;

// Row/column steps for horizontal, vertical, main diagonal and anti-diagonal.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Whether placing `mark` at `index` completes a run of `win_length`.
///
/// Only the four lines through `index` can gain a new run, so each is cut to
/// a window of at most `2 * win_length - 1` cells centered on `index`,
/// clipped at the board edges. A window shorter than `win_length` is skipped;
/// otherwise the longest contiguous run of `mark` inside it is measured.
/// Empty cells and opponent marks both break a run.
pub fn is_winning_move(board: &Board, index: usize, mark: Mark, win_length: usize) -> bool {
    let size = board.size();
    if mark.is_empty() || win_length == 0 || index >= size * size {
        return false;
    }

    let (row, col) = (index / size, index % size);

    DIRECTIONS.iter().any(|&(d_row, d_col)| {
        let window = line_window(size, row, col, d_row, d_col, win_length);
        window.len() >= win_length && longest_run(board.cells(), &window, mark) >= win_length
    })
}

fn line_window(
    size: usize,
    row: usize,
    col: usize,
    d_row: isize,
    d_col: isize,
    win_length: usize,
) -> Vec<usize> {
    let cell_at = |steps: isize| -> Option<usize> {
        let r = row.checked_add_signed(d_row * steps)?;
        let c = col.checked_add_signed(d_col * steps)?;
        (r < size && c < size).then_some(r * size + c)
    };

    let reach = win_length as isize - 1;
    let backward: Vec<usize> = (1..=reach).map_while(|steps| cell_at(-steps)).collect();
    let forward = (1..=reach).map_while(|steps| cell_at(steps));

    backward
        .into_iter()
        .rev()
        .chain(std::iter::once(row * size + col))
        .chain(forward)
        .collect()
}

fn longest_run(cells: &[Mark], window: &[usize], mark: Mark) -> usize {
    let (longest, _) = window.iter().fold((0, 0), |(longest, current), &index| {
        if cells[index] == mark {
            (longest.max(current + 1), current + 1)
        } else {
            (longest, 0)
        }
    });
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::SessionRng;

    const X: Mark = Mark::X;
    const O: Mark = Mark::O;
    const E: Mark = Mark::Empty;

    fn board_with(size: usize, marks: &[(usize, Mark)]) -> Board {
        let mut board = Board::new(size);
        for &(index, mark) in marks {
            board.place(index, mark).unwrap();
        }
        board
    }

    // Walks outward from the cell instead of windowing; independent check.
    fn run_through(board: &Board, index: usize, mark: Mark, win_length: usize) -> bool {
        let size = board.size() as isize;
        let (row, col) = ((index as isize) / size, (index as isize) % size);
        DIRECTIONS.iter().any(|&(dr, dc)| {
            let count_dir = |sign: isize| {
                let mut n = 0;
                let (mut r, mut c) = (row + dr * sign, col + dc * sign);
                while r >= 0 && r < size && c >= 0 && c < size && board.cells()[(r * size + c) as usize] == mark {
                    n += 1;
                    r += dr * sign;
                    c += dc * sign;
                }
                n
            };
            1 + count_dir(1) + count_dir(-1) >= win_length
        })
    }

    #[test]
    fn test_horizontal_run_wins() {
        let board = board_with(5, &[(5, X), (6, X), (7, X)]);
        assert!(is_winning_move(&board, 7, X, 3));
        assert!(is_winning_move(&board, 6, X, 3));
    }

    #[test]
    fn test_vertical_run_wins() {
        let board = board_with(3, &[(0, X), (3, X), (6, X)]);
        assert!(is_winning_move(&board, 6, X, 3));
    }

    #[test]
    fn test_main_diagonal_run_wins() {
        let board = board_with(4, &[(0, O), (5, O), (10, O), (15, O)]);
        assert!(is_winning_move(&board, 10, O, 4));
    }

    #[test]
    fn test_anti_diagonal_run_wins() {
        let board = board_with(5, &[(4, X), (8, X), (12, X)]);
        assert!(is_winning_move(&board, 12, X, 3));
    }

    #[test]
    fn test_run_one_short_does_not_win() {
        let board = board_with(6, &[(0, X), (1, X), (2, X)]);
        assert!(!is_winning_move(&board, 2, X, 4));

        let board = board_with(6, &[(0, O), (7, O), (14, O), (21, O)]);
        assert!(!is_winning_move(&board, 21, O, 5));
    }

    #[test]
    fn test_no_wraparound_between_rows() {
        // 3, 4 end row 0 of a 5x5 board; 5 starts row 1.
        let board = board_with(5, &[(3, X), (4, X), (5, X)]);
        assert!(!is_winning_move(&board, 5, X, 3));
        assert!(!is_winning_move(&board, 4, X, 3));
    }

    #[test]
    fn test_no_wraparound_on_anti_diagonal() {
        // 3, 6, 9 is a true anti-diagonal; corner 0 has no anti-diagonal window.
        let board = board_with(4, &[(3, X), (6, X), (9, X), (0, X)]);
        assert!(is_winning_move(&board, 9, X, 3));
        assert!(!is_winning_move(&board, 0, X, 3));
    }

    #[test]
    fn test_empty_gap_breaks_run() {
        let board = board_with(7, &[(0, X), (1, X), (3, X), (4, X)]);
        assert!(!is_winning_move(&board, 4, X, 4));
        assert!(!is_winning_move(&board, 0, X, 4));
    }

    #[test]
    fn test_opponent_mark_breaks_run() {
        let board = board_with(6, &[(0, X), (1, X), (2, O), (3, X), (4, X)]);
        assert!(!is_winning_move(&board, 4, X, 3));
    }

    #[test]
    fn test_longer_run_than_needed_still_wins() {
        let board = board_with(7, &[(0, X), (1, X), (2, X), (3, X), (4, X)]);
        assert!(is_winning_move(&board, 2, X, 3));
    }

    #[test]
    fn test_full_line_required_when_win_length_equals_size() {
        let partial = board_with(4, &[(4, O), (5, O), (6, O)]);
        assert!(!is_winning_move(&partial, 6, O, 4));

        let full = board_with(4, &[(4, O), (5, O), (6, O), (7, O)]);
        assert!(is_winning_move(&full, 7, O, 4));
    }

    #[test]
    fn test_empty_mark_or_out_of_range_never_wins() {
        let board = board_with(3, &[(0, X), (1, X), (2, X)]);
        assert!(!is_winning_move(&board, 1, E, 3));
        assert!(!is_winning_move(&board, 9, X, 3));
    }

    #[test]
    fn test_window_is_clipped_at_edges() {
        assert_eq!(line_window(5, 0, 0, 0, 1, 3), vec![0, 1, 2]);
        assert_eq!(line_window(5, 2, 2, 0, 1, 3), vec![10, 11, 12, 13, 14]);
        assert_eq!(line_window(5, 0, 4, 1, -1, 3), vec![4, 8, 12]);
        // Corner cell has no anti-diagonal at all.
        assert_eq!(line_window(5, 0, 0, 1, -1, 3), vec![0]);
    }

    #[test]
    fn test_matches_outward_walk_on_random_boards() {
        let mut rng = SessionRng::new(7);
        for _ in 0..200 {
            let size = 3 + rng.pick_index(12);
            let win_length = 3 + rng.pick_index(3.min(size - 2));
            let mut board = Board::new(size);
            for index in 0..size * size {
                let mark = match rng.pick_index(3) {
                    0 => X,
                    1 => O,
                    _ => continue,
                };
                board.place(index, mark).unwrap();
            }
            for index in 0..size * size {
                for mark in [X, O] {
                    if board.cells()[index] != mark {
                        continue;
                    }
                    assert_eq!(
                        is_winning_move(&board, index, mark, win_length),
                        run_through(&board, index, mark, win_length),
                        "size={size} win_length={win_length} index={index}"
                    );
                }
            }
        }
    }
}
