use std::fmt;

/// The compilable language and the fence tags that select it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    name: String,
    /// Lower-cased, since the scanner lower-cases fence tags.
    tags: Vec<String>,
}

impl Language {
    pub fn new<I, S>(name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Language {
            name: name.into(),
            tags: tags
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn csharp() -> Self {
        Language::new("csharp", ["csharp", "cs", "c#"])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn recognizes(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::csharp()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csharp_recognizes_common_tags() {
        let lang = Language::csharp();
        assert!(lang.recognizes("csharp"));
        assert!(lang.recognizes("CS"));
        assert!(lang.recognizes("c#"));
        assert!(!lang.recognizes("python"));
        assert!(!lang.recognizes(""));
    }

    #[test]
    fn custom_tags_are_normalized() {
        let lang = Language::new("vb", [" VB ", "", "vbnet"]);
        assert_eq!(lang.tags(), &["vb", "vbnet"]);
        assert_eq!(lang.to_string(), "vb");
    }
}
