//! Text envelope shared by every tool: usage errors and report-level hints.
//!
//! Tools never surface protocol errors for bad input or flaky upstreams; they
//! return one of these strings as their normal result.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidParams,
    InvalidUrl,
    UnexpectedError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParams => "invalid_params",
            Self::InvalidUrl => "invalid_url",
            Self::UnexpectedError => "unexpected_error",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Self::InvalidParams => "Fill in the required parameter and try again.",
            Self::InvalidUrl => "Pass an absolute URL like https://example.com/page.",
            Self::UnexpectedError => {
                "This is a bug in the trivia server, not in your request. Retrying may help."
            }
        }
    }
}

/// `❌ Error: ...` block returned in place of a report.
pub fn error_text(code: ErrorCode, message: impl AsRef<str>) -> String {
    format!(
        "❌ Error: {}\n💡 {} [{}]",
        message.as_ref(),
        code.hint(),
        code.as_str()
    )
}

pub fn warning_hint(code: &str) -> Option<&'static str> {
    match code {
        "sources_unavailable" => Some(
            "Some upstream sources were unreachable or returned nothing usable; results may be incomplete. Trying again later may help.",
        ),
        "date_fallback" => Some("Dates use MM-DD for daily trivia and YYYY-MM-DD for weekly trivia."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_text_has_stable_shape() {
        for code in [
            ErrorCode::InvalidParams,
            ErrorCode::InvalidUrl,
            ErrorCode::UnexpectedError,
        ] {
            let t = error_text(code, "boom");
            assert!(t.starts_with("❌ Error: boom\n"));
            assert!(t.ends_with(&format!("[{}]", code.as_str())));
        }
    }

    #[test]
    fn unknown_warning_codes_have_no_hint() {
        assert!(warning_hint("sources_unavailable").is_some());
        assert!(warning_hint("nope").is_none());
    }
}
