pub mod random;

pub use random::{EntropySource, OsEntropy, RandomGenerator, ALPHABET, DEFAULT_CODE_LENGTH};

use burrow_core::{GeneratorError, ShortCode};

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage;
/// the caller is responsible for checking the code is unused.
pub trait Generator: Send + Sync + 'static {
    /// Generates a candidate short code.
    ///
    /// Fails only if the underlying entropy source is unavailable.
    fn generate(&self) -> Result<ShortCode, GeneratorError>;
}

impl<G: Generator + ?Sized> Generator for std::sync::Arc<G> {
    fn generate(&self) -> Result<ShortCode, GeneratorError> {
        (**self).generate()
    }
}
