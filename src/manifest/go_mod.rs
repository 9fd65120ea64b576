//! go.mod parser
//!
//! Handles:
//! - module / go directives
//! - require, exclude, replace and tool statements (single, block, and `()`)
//! - `// indirect` comments on requirements
//! - quoted module paths
//!
//! toolchain, retract and godebug directives are accepted and ignored.

use crate::domain::{Manifest, ModuleVersion, Replace, Requirement};
use crate::error::ManifestError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Parser for go.mod files
pub struct GoModParser;

// Block opener: require (
static BLOCK_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)\s*\($").unwrap());

// Empty block on one line: require ()
static EMPTY_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)\s*\(\s*\)$").unwrap());

// Single-line directive: require module/path v1.2.3
static DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)\s+(.+)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Module,
    Go,
    Require,
    Exclude,
    Replace,
    Tool,
    Ignored,
}

impl Directive {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "module" => Some(Directive::Module),
            "go" => Some(Directive::Go),
            "require" => Some(Directive::Require),
            "exclude" => Some(Directive::Exclude),
            "replace" => Some(Directive::Replace),
            "tool" => Some(Directive::Tool),
            "toolchain" | "retract" | "godebug" | "ignore" => Some(Directive::Ignored),
            _ => None,
        }
    }
}

/// Parse state threaded through the lines of one file
struct ParseState<'a> {
    origin: &'a str,
    manifest: Manifest,
    module_seen: bool,
    required: HashSet<String>,
}

impl GoModParser {
    /// Decodes go.mod content. `origin` names the snapshot in error messages.
    pub fn parse(&self, content: &str, origin: &str) -> Result<Manifest, ManifestError> {
        let mut state = ParseState {
            origin,
            manifest: Manifest::default(),
            module_seen: false,
            required: HashSet::new(),
        };
        let mut block: Option<(Directive, usize)> = None;

        for (index, raw_line) in content.lines().enumerate() {
            let line_no = index + 1;
            let (code, comment) = split_comment(raw_line);
            let code = code.trim();

            if code.is_empty() {
                continue;
            }

            if code == ")" {
                if block.take().is_none() {
                    return Err(ManifestError::parse(origin, line_no, "unexpected ')'"));
                }
                continue;
            }

            if let Some((directive, _)) = block {
                state.apply(directive, code, comment, line_no)?;
                continue;
            }

            if let Some(caps) = EMPTY_BLOCK_RE.captures(code) {
                state.block_directive(&caps[1], line_no)?;
                continue;
            }

            if let Some(caps) = BLOCK_START_RE.captures(code) {
                let directive = state.block_directive(&caps[1], line_no)?;
                block = Some((directive, line_no));
                continue;
            }

            let Some(caps) = DIRECTIVE_RE.captures(code) else {
                return Err(ManifestError::parse(
                    origin,
                    line_no,
                    format!("unrecognised line '{}'", code),
                ));
            };
            let directive = state.directive(&caps[1], line_no)?;
            state.apply(directive, caps[2].trim(), comment, line_no)?;
        }

        if let Some((_, opened_at)) = block {
            return Err(ManifestError::parse(origin, opened_at, "unterminated block"));
        }

        if !state.module_seen {
            return Err(ManifestError::parse(origin, 1, "missing module directive"));
        }

        Ok(state.manifest)
    }
}

impl ParseState<'_> {
    fn directive(&self, keyword: &str, line_no: usize) -> Result<Directive, ManifestError> {
        Directive::from_keyword(keyword).ok_or_else(|| {
            ManifestError::parse(
                self.origin,
                line_no,
                format!("unknown directive '{}'", keyword),
            )
        })
    }

    fn block_directive(&self, keyword: &str, line_no: usize) -> Result<Directive, ManifestError> {
        let directive = self.directive(keyword, line_no)?;
        if matches!(directive, Directive::Module | Directive::Go) {
            return Err(ManifestError::parse(
                self.origin,
                line_no,
                format!("{} does not accept a block", keyword),
            ));
        }
        Ok(directive)
    }

    fn apply(
        &mut self,
        directive: Directive,
        args: &str,
        comment: Option<&str>,
        line_no: usize,
    ) -> Result<(), ManifestError> {
        let tokens = tokenize(args).map_err(|message| {
            ManifestError::parse(self.origin, line_no, message)
        })?;
        let malformed = |what: &str| {
            ManifestError::parse(
                self.origin,
                line_no,
                format!("malformed {} entry '{}'", what, args),
            )
        };

        match directive {
            Directive::Module => {
                let [path] = tokens.as_slice() else {
                    return Err(malformed("module"));
                };
                if self.module_seen {
                    return Err(ManifestError::parse(
                        self.origin,
                        line_no,
                        "repeated module directive",
                    ));
                }
                self.module_seen = true;
                self.manifest.module = path.clone();
            }
            Directive::Go => {
                let [version] = tokens.as_slice() else {
                    return Err(malformed("go"));
                };
                self.manifest.go_version = Some(version.clone());
            }
            Directive::Require => {
                let [path, version] = tokens.as_slice() else {
                    return Err(malformed("require"));
                };
                if !self.required.insert(path.clone()) {
                    return Err(ManifestError::parse(
                        self.origin,
                        line_no,
                        format!("duplicate requirement {}", path),
                    ));
                }
                let requirement = if is_indirect(comment) {
                    Requirement::indirect(path.as_str(), version.as_str())
                } else {
                    Requirement::new(path.as_str(), version.as_str())
                };
                self.manifest.requirements.push(requirement);
            }
            Directive::Exclude => {
                let [path, version] = tokens.as_slice() else {
                    return Err(malformed("exclude"));
                };
                self.manifest
                    .excludes
                    .push(ModuleVersion::new(path.as_str(), Some(version.clone())));
            }
            Directive::Replace => {
                let arrow = tokens
                    .iter()
                    .position(|t| t == "=>")
                    .ok_or_else(|| malformed("replace"))?;
                let old = module_version(&tokens[..arrow]).ok_or_else(|| malformed("replace"))?;
                let new =
                    module_version(&tokens[arrow + 1..]).ok_or_else(|| malformed("replace"))?;
                self.manifest.replaces.push(Replace { old, new });
            }
            Directive::Tool => {
                let [path] = tokens.as_slice() else {
                    return Err(malformed("tool"));
                };
                self.manifest.tools.push(path.clone());
            }
            Directive::Ignored => {}
        }

        Ok(())
    }
}

fn module_version(tokens: &[String]) -> Option<ModuleVersion> {
    match tokens {
        [path] => Some(ModuleVersion::new(path.as_str(), None)),
        [path, version] => Some(ModuleVersion::new(path.as_str(), Some(version.clone()))),
        _ => None,
    }
}

fn is_indirect(comment: Option<&str>) -> bool {
    comment
        .map(str::trim)
        .is_some_and(|c| c == "indirect" || c.starts_with("indirect;"))
}

/// Splits a line at the first `//` that is not inside a quoted string
fn split_comment(line: &str) -> (&str, Option<&str>) {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == b'\\' && q == b'"' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'`' => quote = Some(b),
            None if b == b'/' && bytes.get(i + 1) == Some(&b'/') => {
                return (&line[..i], Some(&line[i + 2..]));
            }
            None => {}
        }
        i += 1;
    }

    (line, None)
}

/// Splits directive arguments on whitespace, unquoting "..." and `...` tokens
fn tokenize(args: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut chars = args.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' || c == '`' {
            chars.next();
            let mut token = String::new();
            let mut closed = false;
            while let Some(ch) = chars.next() {
                if ch == c {
                    closed = true;
                    break;
                }
                if ch == '\\' && c == '"' {
                    if let Some(escaped) = chars.next() {
                        token.push(escaped);
                    }
                    continue;
                }
                token.push(ch);
            }
            if !closed {
                return Err(format!("unterminated quoted string in '{}'", args));
            }
            tokens.push(token);
            continue;
        }

        let mut token = String::new();
        while let Some(&ch) = chars.peek() {
            if ch.is_whitespace() {
                break;
            }
            token.push(ch);
            chars.next();
        }
        tokens.push(token);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Manifest, ManifestError> {
        GoModParser.parse(content, "go.mod")
    }

    #[test]
    fn test_parse_module_and_go_version() {
        let manifest = parse("module example.com/myproject\n\ngo 1.22\n").unwrap();
        assert_eq!(manifest.module, "example.com/myproject");
        assert_eq!(manifest.go_version.as_deref(), Some("1.22"));
        assert!(manifest.requirements.is_empty());
    }

    #[test]
    fn test_parse_single_require() {
        let content = r#"
module example.com/myproject

go 1.21

require github.com/gin-gonic/gin v1.9.1
"#;

        let manifest = parse(content).unwrap();
        assert_eq!(manifest.requirements.len(), 1);
        assert_eq!(manifest.requirements[0].path, "github.com/gin-gonic/gin");
        assert_eq!(manifest.requirements[0].version, "v1.9.1");
        assert!(!manifest.requirements[0].indirect);
    }

    #[test]
    fn test_parse_require_block_with_indirect() {
        let content = r#"
module example.com/myproject

go 1.21

require (
	github.com/gin-gonic/gin v1.9.1
	golang.org/x/text v0.14.0 // indirect
)
"#;

        let manifest = parse(content).unwrap();
        assert_eq!(manifest.requirements.len(), 2);

        let gin = manifest.requirement("github.com/gin-gonic/gin").unwrap();
        assert!(!gin.indirect);

        let text = manifest.requirement("golang.org/x/text").unwrap();
        assert_eq!(text.version, "v0.14.0");
        assert!(text.indirect);
    }

    #[test]
    fn test_parse_replace_forms() {
        let content = r#"
module example.com/myproject

require github.com/gin-gonic/gin v1.9.1

replace github.com/gin-gonic/gin => ../local-gin

replace (
	golang.org/x/net v0.1.0 => golang.org/x/net v0.2.0
)
"#;

        let manifest = parse(content).unwrap();
        assert_eq!(manifest.replaces.len(), 2);
        assert_eq!(manifest.replaces[0].old.path, "github.com/gin-gonic/gin");
        assert_eq!(manifest.replaces[0].new.path, "../local-gin");
        assert_eq!(manifest.replaces[0].new.version, None);
        assert_eq!(manifest.replaces[1].old.version.as_deref(), Some("v0.1.0"));
        assert_eq!(manifest.replaces[1].new.version.as_deref(), Some("v0.2.0"));
        // replace does not add requirements
        assert_eq!(manifest.requirements.len(), 1);
    }

    #[test]
    fn test_parse_exclude_tool_and_ignored_directives() {
        let content = r#"
module example.com/myproject

go 1.24
toolchain go1.24.1

exclude github.com/bad/lib v0.3.0

tool golang.org/x/tools/cmd/stringer

retract (
	v1.0.1 // published by mistake
)
"#;

        let manifest = parse(content).unwrap();
        assert_eq!(manifest.excludes.len(), 1);
        assert_eq!(manifest.excludes[0].path, "github.com/bad/lib");
        assert_eq!(manifest.tools, vec!["golang.org/x/tools/cmd/stringer"]);
    }

    #[test]
    fn test_parse_quoted_module_path() {
        let manifest = parse("module \"example.com/quoted\"\n").unwrap();
        assert_eq!(manifest.module, "example.com/quoted");
    }

    #[test]
    fn test_missing_module_is_error() {
        let err = parse("go 1.21\n").unwrap_err();
        assert!(err.to_string().contains("missing module directive"));
    }

    #[test]
    fn test_unterminated_block_is_error() {
        let content = "module m\n\nrequire (\n\text/lib v1.0.0\n";
        let err = parse(content).unwrap_err();
        match err {
            ManifestError::Parse { line, message, .. } => {
                assert_eq!(line, 3);
                assert!(message.contains("unterminated"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_require_is_error() {
        let err = parse("module m\nrequire ext/lib\n").unwrap_err();
        assert!(err.to_string().contains("malformed require entry"));
    }

    #[test]
    fn test_duplicate_requirement_is_error() {
        let content = "module m\nrequire ext/lib v1.0.0\nrequire ext/lib v1.1.0\n";
        let err = parse(content).unwrap_err();
        assert!(err.to_string().contains("duplicate requirement ext/lib"));
    }

    #[test]
    fn test_unknown_directive_is_error() {
        let err = parse("module m\nfrobnicate x\n").unwrap_err();
        assert!(err.to_string().contains("unknown directive 'frobnicate'"));
    }

    #[test]
    fn test_stray_close_paren_is_error() {
        let err = parse("module m\n)\n").unwrap_err();
        assert!(err.to_string().contains("unexpected ')'"));
    }

    #[test]
    fn test_empty_block_on_one_line() {
        let manifest = parse("module m\n\nrequire ()\nexclude( )\n").unwrap();
        assert!(manifest.requirements.is_empty());
        assert!(manifest.excludes.is_empty());
    }

    #[test]
    fn test_empty_block_rejected_for_module() {
        let err = parse("module m\ngo ()\n").unwrap_err();
        assert!(err.to_string().contains("go does not accept a block"));
    }

    #[test]
    fn test_split_comment_ignores_slashes_in_quotes() {
        let (code, comment) = split_comment(r#"replace a => "x//y" // note"#);
        assert_eq!(code.trim(), r#"replace a => "x//y""#);
        assert_eq!(comment, Some(" note"));
    }

    #[test]
    fn test_error_mentions_origin() {
        let err = GoModParser
            .parse("require x v1\n", "origin/main:go.mod")
            .unwrap_err();
        assert!(err.to_string().contains("origin/main:go.mod"));
    }
}
