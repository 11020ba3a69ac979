// util.rs
use std::fmt::Display;

pub type Signature = String;

/// Builds the counter key for a query: each bound parameter rendered, stripped
/// of surrounding whitespace, and joined with ", ".
pub fn signature<P: Display>(params: &[P]) -> Signature {
    params
        .iter()
        .map(|param| param.to_string().trim().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_joins_stripped_params() {
        assert_eq!(signature(&["  action ", "2006"]), "action, 2006");
        assert_eq!(signature(&["%ALIEN%", "%ALIEN%"]), "%ALIEN%, %ALIEN%");
    }

    #[test]
    fn test_signature_of_no_params_is_empty() {
        let params: [&str; 0] = [];
        assert_eq!(signature(&params), "");
    }
}
