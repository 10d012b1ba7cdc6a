use rand::RngCore;

/// Generates external ids for resources created without one.
///
/// Injected through [`RedlinkClientBuilder::external_id_generator`] so tests
/// can pin the generated value.
///
/// [`RedlinkClientBuilder::external_id_generator`]: crate::client::RedlinkClientBuilder::external_id_generator
pub trait ExternalIdGenerator: Send + Sync {
    /// Produce an id derived from `length` random bytes.
    fn generate(&self, length: usize) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
/// Default generator: hex encoding of `length` random bytes.
pub struct RandomExternalIdGenerator;

impl ExternalIdGenerator for RandomExternalIdGenerator {
    fn generate(&self, length: usize) -> String {
        let mut bytes = vec![0u8; length];
        rand::rng().fill_bytes(&mut bytes);
        bytes.iter().map(|byte| format!("{byte:02x}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_hex_of_requested_byte_length() {
        let generator = RandomExternalIdGenerator;
        let id = generator.generate(16);
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn consecutive_ids_differ() {
        let generator = RandomExternalIdGenerator;
        assert_ne!(generator.generate(16), generator.generate(16));
    }
}
