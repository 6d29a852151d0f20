pub mod error;

pub use error::DirectiveSyntaxError;

/// Opening marker of a directive comment, matched case-insensitively after `<!--`.
const DIRECTIVE_MARKER: &str = "mdcompile:";
const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Per-block configuration, set by the directive line above an opening fence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockConfig {
    /// Whether this block (and so its whole group) is compiled.
    pub compile: bool,
    /// Explicit group identifier (`assembly=<id>`).
    pub group_id: Option<String>,
    /// Names emitted as import directives, in order.
    pub imports: Vec<String>,
    pub wrap_in_namespace: bool,
    pub wrap_in_class: bool,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl Default for BlockConfig {
    fn default() -> Self {
        BlockConfig {
            compile: true,
            group_id: None,
            imports: Vec::new(),
            wrap_in_namespace: true,
            wrap_in_class: false,
            prefix: None,
            suffix: None,
        }
    }
}

impl BlockConfig {
    /// The explicit group id, if set and non-empty.
    pub fn explicit_group(&self) -> Option<&str> {
        self.group_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// How an option consumes its value and where it stores it.
enum Setter {
    /// Bare name sets `true`; `name=true|false` sets explicitly.
    Flag(fn(&mut BlockConfig, bool)),
    /// Requires a non-empty value.
    Value(fn(&mut BlockConfig, String)),
    /// Requires `=`; an empty value leaves the field unset.
    Text(fn(&mut BlockConfig, Option<String>)),
}

struct DirectiveOption {
    name: &'static str,
    setter: Setter,
}

const OPTIONS: &[DirectiveOption] = &[
    DirectiveOption {
        name: "compile",
        setter: Setter::Flag(|config, value| config.compile = value),
    },
    DirectiveOption {
        name: "assembly",
        // `assembly=` keeps an empty id, which resolves to an anonymous group.
        setter: Setter::Text(|config, value| config.group_id = Some(value.unwrap_or_default())),
    },
    DirectiveOption {
        name: "import",
        setter: Setter::Value(|config, value| config.imports.push(value)),
    },
    DirectiveOption {
        name: "wrapInNamespace",
        setter: Setter::Flag(|config, value| config.wrap_in_namespace = value),
    },
    DirectiveOption {
        name: "wrapInClass",
        setter: Setter::Flag(|config, value| config.wrap_in_class = value),
    },
    DirectiveOption {
        name: "prefix",
        setter: Setter::Text(|config, value| config.prefix = value),
    },
    DirectiveOption {
        name: "suffix",
        setter: Setter::Text(|config, value| config.suffix = value),
    },
];

pub(crate) fn option_names() -> impl Iterator<Item = &'static str> {
    OPTIONS.iter().map(|option| option.name)
}

/// Extract the directive body from a candidate line.
///
/// Returns `None` when the line is not a directive comment, in which case the
/// following block keeps the default configuration.
pub fn directive_body(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let inner = strip_prefix_ignore_case(trimmed, COMMENT_OPEN)?;
    let inner = strip_prefix_ignore_case(inner.trim_start(), DIRECTIVE_MARKER)?;
    inner.strip_suffix(COMMENT_CLOSE)
}

/// Parse a directive body (the text between the markers) into a configuration.
///
/// `line` is the 0-based index of the directive line, carried into errors.
pub fn parse_directive(body: &str, line: usize) -> Result<BlockConfig, DirectiveSyntaxError> {
    let mut config = BlockConfig::default();
    for token in body.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        apply_token(&mut config, token, line)?;
    }
    Ok(config)
}

/// Configuration for a block whose opening fence sits on `fence_index`.
pub fn config_for_fence<L: AsRef<str>>(
    lines: &[L],
    fence_index: usize,
) -> Result<BlockConfig, DirectiveSyntaxError> {
    let Some(previous) = fence_index.checked_sub(1) else {
        return Ok(BlockConfig::default());
    };
    match lines.get(previous).and_then(|l| directive_body(l.as_ref())) {
        Some(body) => parse_directive(body, previous),
        None => Ok(BlockConfig::default()),
    }
}

fn apply_token(
    config: &mut BlockConfig,
    token: &str,
    line: usize,
) -> Result<(), DirectiveSyntaxError> {
    let (name, value) = match token.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (token, None),
    };
    if name.is_empty() {
        return Err(DirectiveSyntaxError::Malformed {
            line,
            token: token.to_string(),
        });
    }

    let Some(option) = OPTIONS.iter().find(|o| o.name.eq_ignore_ascii_case(name)) else {
        return Err(DirectiveSyntaxError::UnknownOption {
            line,
            option: name.to_string(),
        });
    };

    let missing = || DirectiveSyntaxError::MissingValue {
        line,
        option: option.name.to_string(),
    };

    match (&option.setter, value) {
        (Setter::Flag(set), None) => set(config, true),
        (Setter::Flag(set), Some(value)) => {
            let flag = if value.eq_ignore_ascii_case("true") {
                true
            } else if value.eq_ignore_ascii_case("false") {
                false
            } else {
                return Err(DirectiveSyntaxError::InvalidFlag {
                    line,
                    option: option.name.to_string(),
                    value: value.to_string(),
                });
            };
            set(config, flag);
        }
        (Setter::Value(set), Some(value)) if !value.is_empty() => set(config, value.to_string()),
        (Setter::Value(_), _) => return Err(missing()),
        (Setter::Text(set), Some(value)) => {
            set(config, Some(value).filter(|v| !v.is_empty()).map(str::to_string))
        }
        (Setter::Text(_), None) => return Err(missing()),
    }
    Ok(())
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn detects_directive_case_insensitively() {
        assert_eq!(
            directive_body("  <!-- MdCompile: assembly=foo -->  "),
            Some(" assembly=foo ")
        );
        assert_eq!(directive_body("<!--mdcompile:compile=false-->"), Some("compile=false"));
        assert_eq!(directive_body("<!-- MDCOMPILE: -->"), Some(" "));
    }

    #[test]
    fn ignores_other_comments() {
        assert_eq!(directive_body("<!-- test: compile -->"), None);
        assert_eq!(directive_body("<!-- MdCompile: assembly=foo"), None);
        assert_eq!(directive_body("MdCompile: assembly=foo -->"), None);
        assert_eq!(directive_body("plain text"), None);
    }

    #[test]
    fn empty_body_keeps_defaults() {
        assert_eq!(parse_directive("  ", 0).unwrap(), BlockConfig::default());
        assert_eq!(parse_directive("compile, ,", 0).unwrap(), BlockConfig::default());
    }

    #[test]
    fn parses_every_option() {
        let config = parse_directive(
            "compile=false, assembly=shared, import=System, import=System.Linq, \
             wrapInNamespace=false, wrapInClass, prefix=void M() {, suffix=}",
            4,
        )
        .unwrap();
        assert_eq!(
            config,
            BlockConfig {
                compile: false,
                group_id: Some("shared".into()),
                imports: vec!["System".into(), "System.Linq".into()],
                wrap_in_namespace: false,
                wrap_in_class: true,
                prefix: Some("void M() {".into()),
                suffix: Some("}".into()),
            }
        );
    }

    #[test]
    fn option_names_are_case_insensitive() {
        let config = parse_directive("WRAPINCLASS=TRUE, Assembly=x", 0).unwrap();
        assert!(config.wrap_in_class);
        assert_eq!(config.explicit_group(), Some("x"));
    }

    #[test]
    fn empty_prefix_leaves_field_unset() {
        let config = parse_directive("prefix=, suffix=  ", 0).unwrap();
        assert_eq!(config.prefix, None);
        assert_eq!(config.suffix, None);
    }

    #[test]
    fn empty_assembly_is_anonymous() {
        let config = parse_directive("assembly=", 0).unwrap();
        assert_eq!(config.group_id.as_deref(), Some(""));
        assert_eq!(config.explicit_group(), None);

        let lines = ["<!-- MdCompile: assembly= -->", "```csharp", "x", "```"];
        assert_eq!(config_for_fence(&lines, 1).unwrap().explicit_group(), None);
    }

    #[test]
    fn rejects_unknown_option() {
        assert_eq!(
            parse_directive("assembly=a, bogus", 3),
            Err(DirectiveSyntaxError::UnknownOption {
                line: 3,
                option: "bogus".into()
            })
        );
    }

    #[test]
    fn rejects_missing_values() {
        assert!(matches!(
            parse_directive("assembly", 0),
            Err(DirectiveSyntaxError::MissingValue { .. })
        ));
        assert!(matches!(
            parse_directive("import=", 0),
            Err(DirectiveSyntaxError::MissingValue { .. })
        ));
        assert!(matches!(
            parse_directive("prefix", 0),
            Err(DirectiveSyntaxError::MissingValue { .. })
        ));
    }

    #[test]
    fn rejects_bad_flag_value_and_empty_name() {
        assert!(matches!(
            parse_directive("compile=maybe", 1),
            Err(DirectiveSyntaxError::InvalidFlag { line: 1, .. })
        ));
        assert!(matches!(
            parse_directive("=foo", 2),
            Err(DirectiveSyntaxError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn directive_only_applies_directly_above_fence() {
        let lines = ["<!-- MdCompile: assembly=a -->", "", "```csharp"];
        assert_eq!(config_for_fence(&lines, 2).unwrap(), BlockConfig::default());

        let lines = ["<!-- MdCompile: assembly=a -->", "```csharp"];
        assert_eq!(config_for_fence(&lines, 1).unwrap().explicit_group(), Some("a"));
        assert_eq!(config_for_fence(&lines, 0).unwrap(), BlockConfig::default());
    }

    #[test]
    fn explicit_group_ignores_empty_id() {
        let config = BlockConfig {
            group_id: Some(String::new()),
            ..BlockConfig::default()
        };
        assert_eq!(config.explicit_group(), None);
    }
}
