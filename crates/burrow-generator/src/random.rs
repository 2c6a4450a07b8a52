use crate::Generator;
use burrow_core::{GeneratorError, ShortCode};

/// The base-62 alphabet generated codes are drawn from.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Code length used when none is configured. 62^6 ≈ 5.68e10 codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Largest multiple of 62 that fits in a byte. Bytes at or above it are
/// rejected so that `byte % 62` is uniform.
const ACCEPT_BELOW: u8 = (256 - 256 % ALPHABET.len()) as u8;

const BATCH: usize = 32;

/// Source of secure random bytes.
pub trait EntropySource: Send + Sync {
    fn fill(&self, buf: &mut [u8]) -> Result<(), GeneratorError>;
}

/// The operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), GeneratorError> {
        getrandom::fill(buf).map_err(|e| GeneratorError::Entropy(e.to_string()))
    }
}

/// Random fixed-length base-62 code generator.
///
/// Each character is an independent uniform draw over the 62 symbols.
/// The generator keeps no state between calls.
#[derive(Debug, Clone)]
pub struct RandomGenerator<E = OsEntropy> {
    length: usize,
    source: E,
}

impl RandomGenerator<OsEntropy> {
    /// Creates a generator producing codes of `length` characters.
    pub fn new(length: usize) -> Self {
        Self::with_source(length, OsEntropy)
    }
}

impl Default for RandomGenerator<OsEntropy> {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl<E: EntropySource> RandomGenerator<E> {
    /// A zero `length` is raised to 1; an empty code can never be routed.
    pub fn with_source(length: usize, source: E) -> Self {
        Self {
            length: length.max(1),
            source,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    fn next_code(&self) -> Result<String, GeneratorError> {
        let mut out = String::with_capacity(self.length);
        let mut buf = [0u8; BATCH];

        while out.len() < self.length {
            self.source.fill(&mut buf)?;
            for byte in buf {
                if byte >= ACCEPT_BELOW {
                    continue;
                }
                out.push(ALPHABET[usize::from(byte) % ALPHABET.len()] as char);
                if out.len() == self.length {
                    break;
                }
            }
        }

        Ok(out)
    }
}

impl<E: EntropySource + 'static> Generator for RandomGenerator<E> {
    fn generate(&self) -> Result<ShortCode, GeneratorError> {
        self.next_code().map(ShortCode::new_unchecked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Replays a fixed byte script, then fails.
    struct ScriptedEntropy {
        bytes: Mutex<Vec<u8>>,
    }

    impl ScriptedEntropy {
        fn new(bytes: Vec<u8>) -> Self {
            Self {
                bytes: Mutex::new(bytes),
            }
        }
    }

    impl EntropySource for ScriptedEntropy {
        fn fill(&self, buf: &mut [u8]) -> Result<(), GeneratorError> {
            let mut bytes = self.bytes.lock().unwrap();
            if bytes.len() < buf.len() {
                return Err(GeneratorError::Entropy("script exhausted".to_string()));
            }
            let rest = bytes.split_off(buf.len());
            buf.copy_from_slice(&bytes);
            *bytes = rest;
            Ok(())
        }
    }

    struct BrokenEntropy;

    impl EntropySource for BrokenEntropy {
        fn fill(&self, _buf: &mut [u8]) -> Result<(), GeneratorError> {
            Err(GeneratorError::Entropy("device unavailable".to_string()))
        }
    }

    #[test]
    fn generates_requested_length_from_alphabet() {
        let generator = RandomGenerator::new(6);
        for _ in 0..200 {
            let code = generator.generate().unwrap();
            assert_eq!(code.as_str().len(), 6);
            assert!(code.as_str().bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn default_length_is_six() {
        let generator = RandomGenerator::default();
        assert_eq!(generator.length(), DEFAULT_CODE_LENGTH);
        assert_eq!(generator.generate().unwrap().as_str().len(), 6);
    }

    #[test]
    fn supports_other_lengths() {
        assert_eq!(RandomGenerator::new(1).generate().unwrap().as_str().len(), 1);
        assert_eq!(RandomGenerator::new(40).generate().unwrap().as_str().len(), 40);
    }

    #[test]
    fn zero_length_yields_one_character_codes() {
        let generator = RandomGenerator::new(0);
        assert_eq!(generator.length(), 1);
        assert_eq!(generator.generate().unwrap().as_str().len(), 1);
    }

    #[test]
    fn maps_bytes_through_alphabet_and_rejects_biased_tail() {
        let mut script = vec![0, 9, 10, 35, 36, 61, 248, 255, 62, 247];
        script.resize(BATCH, 0);
        let generator = RandomGenerator::with_source(8, ScriptedEntropy::new(script));

        let code = generator.generate().unwrap();
        // 248 and 255 are skipped; 62 wraps to '0'; 247 % 62 = 61 -> 'Z'.
        assert_eq!(code.as_str(), "09azAZ0Z");
    }

    #[test]
    fn refills_when_a_batch_is_all_rejected() {
        let mut script = vec![255u8; BATCH];
        let mut second = vec![1u8; BATCH];
        second[0] = 2;
        script.extend(second);
        let generator = RandomGenerator::with_source(3, ScriptedEntropy::new(script));

        assert_eq!(generator.generate().unwrap().as_str(), "211");
    }

    #[test]
    fn entropy_failure_is_surfaced() {
        let generator = RandomGenerator::with_source(6, BrokenEntropy);
        let err = generator.generate().unwrap_err();
        assert!(matches!(err, GeneratorError::Entropy(_)));
    }

    #[test]
    fn codes_are_distinct_across_draws() {
        let generator = RandomGenerator::new(6);
        let codes: HashSet<String> = (0..1000)
            .map(|_| generator.generate().unwrap().into_string())
            .collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
