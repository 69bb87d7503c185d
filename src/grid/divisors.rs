use tracing::*;

/// Returns every cell size that evenly divides both `width` and `height`, ascending.
///
/// These are exactly the divisors of `gcd(width, height)`; the result always
/// starts with 1 and ends with the gcd. Both dimensions must be positive.
///
/// # Example
/// ```
/// use gridcover::common_cell_sizes;
///
/// assert_eq!(common_cell_sizes(12, 18), vec![1, 2, 3, 6]);
/// assert_eq!(common_cell_sizes(7, 7), vec![1, 7]);
/// ```
pub fn common_cell_sizes(width: u32, height: u32) -> Vec<u32> {
    let g = gcd(width, height);
    trace!("Common divisors of {}x{} from gcd={}", width, height, g);

    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1u32;
    while (d as u64) * (d as u64) <= g as u64 {
        if g % d == 0 {
            small.push(d);
            if d != g / d {
                large.push(g / d);
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    small
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
