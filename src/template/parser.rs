//! Template parser module.
//!
//! Parses template strings into a tree of nodes.

use super::{Result, TemplateError};

/// A node in the template tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Raw text content.
    Text(String),

    /// Variable reference: `{{name}}` or `{{file.name}}`
    Variable(String),

    /// Conditional block: `{{#if condition}}...{{else}}...{{/if}}`
    If {
        condition: String,
        then_branch: Vec<Node>,
        else_branch: Vec<Node>,
    },

    /// Loop block: `{{#each items}}...{{/each}}` or `{{#each items as item}}`
    Each {
        variable: String,
        item_name: Option<String>,
        body: Vec<Node>,
    },

    /// Unless block (inverse of if): `{{#unless condition}}...{{/unless}}`
    Unless { condition: String, body: Vec<Node> },
}

/// Template parser.
pub struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse the template into a list of nodes.
    pub fn parse(mut self) -> Result<Vec<Node>> {
        self.parse_nodes(None)
    }

    /// Parse nodes until reaching the closing tag of `end_tag` or end of input.
    fn parse_nodes(&mut self, end_tag: Option<&str>) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        let closing = end_tag.map(|tag| format!("{{{{/{tag}}}}}"));

        while self.pos < self.input.len() {
            if let Some(closing) = &closing {
                if self.peek_str(closing) {
                    break;
                }
            }
            if end_tag == Some("if") && self.peek_str("{{else}}") {
                break;
            }

            if self.peek_str("\\{{") {
                self.pos += 3;
                nodes.push(Node::Text("{{".to_string()));
            } else if self.peek_str("{{") {
                nodes.push(self.parse_tag()?);
            } else {
                let text = self.collect_text();
                if !text.is_empty() {
                    nodes.push(Node::Text(text));
                }
            }
        }

        Ok(nodes)
    }

    /// Parse a single tag.
    fn parse_tag(&mut self) -> Result<Node> {
        self.expect("{{")?;
        self.skip_whitespace();

        if self.peek_char() == Some('#') {
            self.advance();
            self.skip_whitespace();
            return self.parse_block_tag();
        }

        let name = self.parse_identifier()?;
        self.skip_whitespace();
        self.expect("}}")?;

        Ok(Node::Variable(name))
    }

    /// Parse a block tag (if, each, unless).
    fn parse_block_tag(&mut self) -> Result<Node> {
        let tag_name = self.parse_identifier()?;
        self.skip_whitespace();

        match tag_name.as_str() {
            "if" => self.parse_if_block(),
            "each" => self.parse_each_block(),
            "unless" => self.parse_unless_block(),
            _ => Err(TemplateError::Parse(format!(
                "Unknown block tag: {tag_name}"
            ))),
        }
    }

    fn parse_if_block(&mut self) -> Result<Node> {
        let condition = self.parse_identifier()?;
        self.skip_whitespace();
        self.expect("}}")?;

        let then_branch = self.parse_nodes(Some("if"))?;

        let else_branch = if self.peek_str("{{else}}") {
            self.expect("{{else}}")?;
            self.parse_nodes(Some("if"))?
        } else {
            Vec::new()
        };

        self.expect("{{/if}}")?;

        Ok(Node::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_each_block(&mut self) -> Result<Node> {
        let variable = self.parse_identifier()?;
        self.skip_whitespace();

        let item_name = if self.peek_str("as ") {
            self.expect("as ")?;
            self.skip_whitespace();
            Some(self.parse_identifier()?)
        } else {
            None
        };

        self.skip_whitespace();
        self.expect("}}")?;

        let body = self.parse_nodes(Some("each"))?;
        self.expect("{{/each}}")?;

        Ok(Node::Each {
            variable,
            item_name,
            body,
        })
    }

    fn parse_unless_block(&mut self) -> Result<Node> {
        let condition = self.parse_identifier()?;
        self.skip_whitespace();
        self.expect("}}")?;

        let body = self.parse_nodes(Some("unless"))?;
        self.expect("{{/unless}}")?;

        Ok(Node::Unless { condition, body })
    }

    /// Parse an identifier (variable name, including dot notation).
    fn parse_identifier(&mut self) -> Result<String> {
        let start = self.pos;

        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() || matches!(ch, '_' | '.' | '-' | '@') {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(TemplateError::Parse("Expected identifier".to_string()));
        }

        Ok(self.input[start..self.pos].to_string())
    }

    /// Collect text until the next tag or escape sequence.
    fn collect_text(&mut self) -> String {
        let start = self.pos;

        while self.pos < self.input.len() {
            if self.peek_str("{{") || self.peek_str("\\{{") {
                break;
            }
            self.advance();
        }

        self.input[start..self.pos].to_string()
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn peek_str(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }

    /// Expect a specific string and consume it.
    fn expect(&mut self, s: &str) -> Result<()> {
        if self.peek_str(s) {
            self.pos += s.len();
            Ok(())
        } else {
            let found: String = self.input[self.pos..].chars().take(10).collect();
            Err(TemplateError::Parse(format!(
                "Expected '{s}' but found '{found}'"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_only() {
        let nodes = Parser::new("<p>Hello</p>").parse().unwrap();

        assert_eq!(nodes, vec![Node::Text("<p>Hello</p>".to_string())]);
    }

    #[test]
    fn test_parse_variable() {
        let nodes = Parser::new("<td>{{size_label}}</td>").parse().unwrap();

        assert_eq!(
            nodes,
            vec![
                Node::Text("<td>".to_string()),
                Node::Variable("size_label".to_string()),
                Node::Text("</td>".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_whitespace_in_tags() {
        let nodes = Parser::new("{{  name  }}").parse().unwrap();

        assert_eq!(nodes, vec![Node::Variable("name".to_string())]);
    }

    #[test]
    fn test_parse_if_else() {
        let nodes = Parser::new("{{#if files}}table{{else}}empty{{/if}}")
            .parse()
            .unwrap();

        assert_eq!(
            nodes,
            vec![Node::If {
                condition: "files".to_string(),
                then_branch: vec![Node::Text("table".to_string())],
                else_branch: vec![Node::Text("empty".to_string())],
            }]
        );
    }

    #[test]
    fn test_parse_each_with_as() {
        let nodes = Parser::new("{{#each files as file}}{{file.name}}{{/each}}")
            .parse()
            .unwrap();

        assert_eq!(
            nodes,
            vec![Node::Each {
                variable: "files".to_string(),
                item_name: Some("file".to_string()),
                body: vec![Node::Variable("file.name".to_string())],
            }]
        );
    }

    #[test]
    fn test_parse_unless() {
        let nodes = Parser::new("{{#unless files}}none{{/unless}}")
            .parse()
            .unwrap();

        assert_eq!(
            nodes,
            vec![Node::Unless {
                condition: "files".to_string(),
                body: vec![Node::Text("none".to_string())],
            }]
        );
    }

    #[test]
    fn test_parse_nested_blocks() {
        let nodes = Parser::new("{{#if files}}{{#each files}}{{name}}{{/each}}{{/if}}")
            .parse()
            .unwrap();

        assert_eq!(
            nodes,
            vec![Node::If {
                condition: "files".to_string(),
                then_branch: vec![Node::Each {
                    variable: "files".to_string(),
                    item_name: None,
                    body: vec![Node::Variable("name".to_string())],
                }],
                else_branch: vec![],
            }]
        );
    }

    #[test]
    fn test_parse_escaped_braces() {
        let nodes = Parser::new("\\{{literal}}").parse().unwrap();

        assert_eq!(
            nodes,
            vec![
                Node::Text("{{".to_string()),
                Node::Text("literal}}".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_css_braces_are_text() {
        let nodes = Parser::new("body { margin: 0; }").parse().unwrap();

        assert_eq!(nodes, vec![Node::Text("body { margin: 0; }".to_string())]);
    }

    #[test]
    fn test_parse_error_unclosed_tag() {
        assert!(Parser::new("{{name").parse().is_err());
    }

    #[test]
    fn test_parse_error_unclosed_block() {
        assert!(Parser::new("{{#each files}}{{name}}").parse().is_err());
    }

    #[test]
    fn test_parse_error_unknown_block() {
        let result = Parser::new("{{#with file}}x{{/with}}").parse();

        assert!(matches!(result, Err(TemplateError::Parse(_))));
    }
}
