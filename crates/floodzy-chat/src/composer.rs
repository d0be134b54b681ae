//! Response Composer
//!
//! The single place that guarantees a non-empty answer string.

use tracing::warn;

/// Substituted when the model produced no usable text
pub const NO_RELEVANT_INFO: &str = "Maaf, saya tidak dapat menemukan informasi yang relevan saat \
     ini. Bisakah Anda mencoba pertanyaan lain?";

#[derive(Debug, Clone)]
pub struct ResponseComposer {
    fallback: String,
}

impl Default for ResponseComposer {
    fn default() -> Self {
        Self {
            fallback: NO_RELEVANT_INFO.to_string(),
        }
    }
}

impl ResponseComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the empty-answer message; a blank replacement is ignored
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        let fallback = fallback.into();
        if !fallback.trim().is_empty() {
            self.fallback = fallback;
        }
        self
    }

    pub fn finalize(&self, candidate: &str) -> String {
        if candidate.trim().is_empty() {
            warn!("Model returned an empty answer, using fallback");
            return self.fallback.clone();
        }
        candidate.to_string()
    }
}

/// Blunt answer used when the model could not narrate a tool result
pub fn technical_difficulty(detail: &str) -> String {
    format!(
        "Maaf, saya mengalami kesulitan teknis saat memproses data. ({})",
        detail
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_keeps_text_verbatim() {
        let composer = ResponseComposer::new();
        assert_eq!(composer.finalize("Hujan ringan di Bandung.\n"), "Hujan ringan di Bandung.\n");
    }

    #[test]
    fn test_finalize_never_empty() {
        let composer = ResponseComposer::new();
        for candidate in ["", " ", "\n\t"] {
            assert_eq!(composer.finalize(candidate), NO_RELEVANT_INFO);
        }
    }

    #[test]
    fn test_blank_fallback_is_ignored() {
        let composer = ResponseComposer::new().with_fallback("   ");
        assert_eq!(composer.finalize(""), NO_RELEVANT_INFO);

        let composer = ResponseComposer::new().with_fallback("Tidak ada data.");
        assert_eq!(composer.finalize(""), "Tidak ada data.");
    }

    #[test]
    fn test_technical_difficulty_message() {
        assert_eq!(
            technical_difficulty("BMKG tidak dapat dihubungi"),
            "Maaf, saya mengalami kesulitan teknis saat memproses data. (BMKG tidak dapat dihubungi)"
        );
    }
}
