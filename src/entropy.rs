use rand::{CryptoRng, RngCore};

use crate::error::{KeyError, KeyResult};

/**
    Draws `size` bytes from a caller supplied cryptographically secure generator
*/
pub fn random_bytes_with<R>(rng: &mut R, size: usize) -> KeyResult<Vec<u8>>
where R: RngCore + CryptoRng
{
    let mut bytes: Vec<u8> = vec![0; size];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| KeyError::Entropy(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{
        rngs::{OsRng, StdRng},
        SeedableRng,
    };

    #[test]
    fn os_random_bytes() {
        let a = random_bytes_with(&mut OsRng, 32).unwrap();
        let b = random_bytes_with(&mut OsRng, 32).unwrap();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn seeded_generator_is_repeatable() {
        let a = random_bytes_with(&mut StdRng::seed_from_u64(7), 16).unwrap();
        let b = random_bytes_with(&mut StdRng::seed_from_u64(7), 16).unwrap();
        assert_eq!(a, b);
    }
}
