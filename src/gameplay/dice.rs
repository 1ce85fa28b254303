//! Dice rolls - every roll in the engine draws from the session RNG

use rand::Rng;

/// Roll a single d6
pub fn roll_d6<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(1..=6)
}

/// Roll 2d6 (the standard to-hit / location / check roll)
pub fn roll_2d6<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    roll_d6(rng) + roll_d6(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_d6_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let roll = roll_d6(&mut rng);
            assert!((1..=6).contains(&roll));
        }
    }

    #[test]
    fn test_2d6_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let roll = roll_2d6(&mut rng);
            assert!((2..=12).contains(&roll));
        }
    }

    #[test]
    fn test_seeded_rolls_reproducible() {
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        let rolls_a: Vec<u8> = (0..20).map(|_| roll_2d6(&mut a)).collect();
        let rolls_b: Vec<u8> = (0..20).map(|_| roll_2d6(&mut b)).collect();
        assert_eq!(rolls_a, rolls_b);
    }
}
