//! Doc-comment signature extraction
//!
//! GML functions in an extension carry no declared signature. Instead the
//! signature lives in JSDoc-style comment lines inside the function body:
//!
//! ```text
//! /// @description Restore health
//! /// @param {Real} amount hp to restore
//! /// @returns {Real}
//! ```
//!
//! Only lines containing an `@` take part; everything before the first `@`
//! on a line is ignored and lines without one are skipped, even in the middle
//! of a multi-line description. Parsing never fails: malformed directives
//! are parsed best-effort or ignored.

use gmext_manifest::VariableType;
use smallvec::SmallVec;
use tracing::trace;

/// Signature recovered from a function's doc comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub description: String,
    /// Parameters in declaration order, duplicates kept
    pub parameters: SmallVec<[Parameter; 4]>,
    pub return_type: VariableType,
    pub return_description: String,
    pub hidden: bool,
}

impl Signature {
    /// Parameter names joined for the descriptor's help field
    pub fn help_string(&self) -> String {
        self.parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn argument_types(&self) -> SmallVec<[VariableType; 4]> {
        self.parameters.iter().map(|p| p.var_type).collect()
    }

    pub fn argument_count(&self) -> usize {
        self.parameters.len()
    }
}

/// One `@param` entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameter {
    pub var_type: VariableType,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Description,
    Parameter,
    Return,
    Hidden,
}

/// Parser for JSDoc-style signature comments
pub struct DocCommentParser;

impl DocCommentParser {
    /// Extract a signature from the full text of a function body
    pub fn parse(content: &str) -> Signature {
        let mut signature = Signature::default();

        for line in Self::directive_lines(content) {
            let Some((directive, arguments)) = Self::identify_directive(line) else {
                trace!("Ignoring unknown directive: {}", line);
                continue;
            };

            match directive {
                Directive::Description => signature.description.push_str(arguments),
                Directive::Parameter => signature.parameters.push(Self::parse_parameter(arguments)),
                Directive::Return => {
                    let (var_type, rest) = Self::split_type(arguments);
                    signature.return_type = var_type;
                    signature.return_description = rest.trim().to_string();
                }
                Directive::Hidden => signature.hidden = true,
            }
        }

        signature
    }

    /// Lines holding an `@`, cut to start at the first one
    fn directive_lines(content: &str) -> impl Iterator<Item = &str> {
        content
            .lines()
            .filter_map(|line| line.find('@').map(|idx| line[idx..].trim_end()))
    }

    /// Classify a line starting with `@` by its alphabetic token
    fn identify_directive(line: &str) -> Option<(Directive, &str)> {
        let token_len = 1 + line[1..]
            .chars()
            .take_while(|c| c.is_alphabetic())
            .map(char::len_utf8)
            .sum::<usize>();

        let directive = match line[..token_len].to_lowercase().as_str() {
            "@desc" | "@description" => Directive::Description,
            "@param" | "@arg" | "@argument" => Directive::Parameter,
            "@return" | "@returns" => Directive::Return,
            "@hidden" => Directive::Hidden,
            _ => return None,
        };

        Some((directive, line[token_len..].trim_start()))
    }

    /// Split a `{Type}` annotation off the start of `arguments`
    fn split_type(arguments: &str) -> (VariableType, &str) {
        let Some(inner) = arguments.strip_prefix('{') else {
            return (VariableType::Unspecified, arguments);
        };
        match inner.split_once('}') {
            Some((type_name, rest)) => (VariableType::parse(type_name), rest),
            None => (VariableType::Unspecified, arguments),
        }
    }

    fn parse_parameter(arguments: &str) -> Parameter {
        let (var_type, rest) = Self::split_type(arguments);
        let rest = rest.trim_start();

        let (name, description) = match rest.split_once(char::is_whitespace) {
            Some((name, description)) => (name, description.trim()),
            None => (rest, ""),
        };

        Parameter {
            var_type,
            name: name.to_string(),
            description: if description.is_empty() {
                name.to_string()
            } else {
                description.to_string()
            },
        }
    }
}
