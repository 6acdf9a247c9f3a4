//! Helper functions shared by the feed builder and the commands

mod url;

pub use url::*;

/// Quote a string as a YAML double-quoted scalar
pub fn yaml_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_quote_round_trips() {
        for title in ["Plain", "Colon: here", "Quote \"me\"", "back\\slash"] {
            let yaml = format!("title: {}\n", yaml_quote(title));
            let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
            assert_eq!(value["title"].as_str(), Some(title));
        }
    }
}
