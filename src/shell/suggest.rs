//! Key suggestions for selection prompts

/// Keys containing `filter`, ignoring case, capped at `max`
///
/// An empty filter matches every key. Input order is preserved.
pub fn suggest<'a>(keys: &[&'a str], filter: &str, max: usize) -> Vec<&'a str> {
    let needle = filter.trim().to_lowercase();
    keys.iter()
        .filter(|key| needle.is_empty() || key.to_lowercase().contains(&needle))
        .take(max)
        .copied()
        .collect()
}

/// What the operator typed at a selection prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionInput<'a> {
    /// List suggestions narrowed by the given filter (possibly empty)
    Suggest(&'a str),
    /// Select this key
    Select(&'a str),
}

impl<'a> SelectionInput<'a> {
    /// An empty line or `?` suggests everything, `text?` filters by `text`
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line.strip_suffix('?') {
            Some(filter) => SelectionInput::Suggest(filter.trim()),
            None if line.is_empty() => SelectionInput::Suggest(""),
            None => SelectionInput::Select(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: &[&str] = &[
        "default:s3-echoer",
        "kube-system:aws-node",
        "kube-system:coredns",
        "monitoring:prometheus",
    ];

    #[test]
    fn test_substring_match_ignores_case() {
        assert_eq!(
            suggest(KEYS, "KUBE-system", 30),
            vec!["kube-system:aws-node", "kube-system:coredns"]
        );
        assert_eq!(suggest(KEYS, "echo", 30), vec!["default:s3-echoer"]);
    }

    #[test]
    fn test_cap() {
        assert_eq!(suggest(KEYS, "", 2).len(), 2);
        assert_eq!(suggest(KEYS, "o", 30).len(), 4);
    }

    #[test]
    fn test_selection_input() {
        assert_eq!(SelectionInput::parse(""), SelectionInput::Suggest(""));
        assert_eq!(SelectionInput::parse(" ? "), SelectionInput::Suggest(""));
        assert_eq!(SelectionInput::parse("kube?"), SelectionInput::Suggest("kube"));
        assert_eq!(
            SelectionInput::parse(" default:s3-echoer "),
            SelectionInput::Select("default:s3-echoer")
        );
    }
}
