use rand::Rng;
use tracing::{debug, instrument};

use crate::{
    data::Grid,
    error::{GameError, Result},
};

fn validate_params(rows: usize, cols: usize, black_holes: usize) -> Result<usize> {
    let invalid = || GameError::InvalidDimensions {
        rows: rows as i64,
        cols: cols as i64,
        black_holes: black_holes as i64,
    };

    if rows == 0 || cols == 0 {
        return Err(invalid());
    }

    let total = rows
        .checked_mul(cols)
        .filter(|&total| u32::try_from(total).is_ok())
        .ok_or_else(invalid)?;

    if black_holes > total {
        return Err(invalid());
    }

    Ok(total)
}

/// Selection sampling: each cell is picked with probability
/// `remaining black holes / remaining cells`, which makes every
/// subset of `black_holes` cells equally likely.
fn place_black_holes<R: Rng + ?Sized>(total: usize, black_holes: usize, rng: &mut R) -> Vec<bool> {
    let mut mask = Vec::with_capacity(total);

    let mut left = black_holes;
    for cells_left in (1..=total).rev() {
        let value = rng.random_ratio(left as u32, cells_left as u32);
        mask.push(value);
        if value {
            left -= 1;
        }
    }

    mask
}

/// Builds a `rows` x `cols` grid with `black_holes` black holes placed uniformly at random.
#[instrument(level = "trace", skip(rng))]
pub fn generate<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    black_holes: usize,
    rng: &mut R,
) -> Result<Grid> {
    let total = validate_params(rows, cols, black_holes)?;
    let mask = place_black_holes(total, black_holes, rng);
    debug!(
        "Generated {}x{} board with {} black holes",
        rows, cols, black_holes
    );
    Ok(Grid::from_mask(rows, cols, &mask))
}
