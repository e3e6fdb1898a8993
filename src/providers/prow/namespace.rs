use regex::Regex;
use std::sync::LazyLock;

static NAMESPACE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Using namespace \S+").unwrap());

/// Finds the namespace announced by the first `Using namespace <name>` line.
///
/// Later announcements are ignored.
pub fn extract_namespace(log: &str) -> Option<&str> {
    NAMESPACE_LINE
        .find(log)
        .and_then(|m| m.as_str().split_whitespace().nth(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_namespace_found() {
        let log = "...\nUsing namespace e2e-test-abc123\nmore text";
        assert_eq!(extract_namespace(log), Some("e2e-test-abc123"));
    }

    #[test]
    fn test_extract_namespace_not_found() {
        assert_eq!(extract_namespace(""), None);
        assert_eq!(extract_namespace("Using the default namespace\n"), None);
        assert_eq!(extract_namespace("Using namespace \n"), None);
    }

    #[test]
    fn test_extract_namespace_picks_first_of_several() {
        let log = "setup\nUsing namespace ci-op-first\nrerun\nUsing namespace ci-op-second\n";
        assert_eq!(extract_namespace(log), Some("ci-op-first"));
    }

    #[test]
    fn test_extract_namespace_mid_line() {
        let log = "2024/05/01 12:00:00 Using namespace https://console.example.com/k8s/cluster/projects/ci-op-x1y2\n";
        assert_eq!(
            extract_namespace(log),
            Some("https://console.example.com/k8s/cluster/projects/ci-op-x1y2")
        );
    }
}
