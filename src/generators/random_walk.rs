//! Seeded random walk

use crate::{rng::SeedStream, Bar, Price, Volatility};

/// Random-walk bars.
///
/// Per bar: `change ~ U(-v, v)`, `open = price`, `close = price + change`,
/// `high = max(open, close) + U(0, v/2)`, `low = min(open, close) - U(0, v/2)`,
/// then `price = close`. Draw order is fixed, so a fixed seed gives a fixed sequence.
pub fn random_walk(rng: &mut SeedStream, n: usize, base: Price, volatility: Volatility) -> Vec<Bar> {
    let v = volatility.get();
    let mut price = base.get();
    let mut bars = Vec::with_capacity(n);

    for _ in 0..n {
        let change = rng.uniform(-v, v);
        let open = price;
        let close = price + change;
        let high = open.max(close) + rng.uniform(0.0, v * 0.5);
        let low = open.min(close) - rng.uniform(0.0, v * 0.5);
        bars.push(Bar::new(open, high, low, close));
        price = close;
    }

    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::first_malformed;

    #[test]
    fn test_same_seed_same_bars() {
        let mut rng = SeedStream::new(5);
        let a = random_walk(&mut rng, 100, Price::new_const(100.0), Volatility::new_const(5.0));
        rng.reseed(5);
        let b = random_walk(&mut rng, 100, Price::new_const(100.0), Volatility::new_const(5.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_chained_opens() {
        let mut rng = SeedStream::new(11);
        let bars = random_walk(&mut rng, 50, Price::new_const(100.0), Volatility::new_const(5.0));
        assert_eq!(bars[0].open, 100.0);
        for w in bars.windows(2) {
            assert_eq!(w[1].open, w[0].close);
        }
        assert_eq!(first_malformed(&bars), None);
    }

    #[test]
    fn test_zero_volatility_is_flat() {
        let mut rng = SeedStream::new(0);
        let bars = random_walk(&mut rng, 10, Price::new_const(50.0), Volatility::new_const(0.0));
        assert!(bars.iter().all(|b| *b == Bar::flat(50.0)));
    }
}
