//! Extracts plain text from a provider response.

use crate::CompleteResponse;

/// Passes the completion text through unmodified, including whitespace and
/// empty completions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrOutputParser;

impl StrOutputParser {
    pub fn parse(&self, response: &CompleteResponse) -> String {
        response.content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_passes_through_unmodified() {
        let response = CompleteResponse::text("  Steve Smith\n");
        assert_eq!(StrOutputParser.parse(&response), "  Steve Smith\n");
    }

    #[test]
    fn test_empty_completion_is_kept() {
        assert_eq!(StrOutputParser.parse(&CompleteResponse::text("")), "");
    }
}
