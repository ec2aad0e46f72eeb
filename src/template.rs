//! Chat prompt templates with `{name}` placeholders.
//!
//! A template is an ordered list of `(role, pattern)` turns. Formatting
//! substitutes every placeholder in a single pass, so substituted values are
//! inserted verbatim and never re-expanded. `{{` and `}}` produce literal braces.

use std::collections::{BTreeSet, HashMap};

use crate::types::{Message, Prompt, Role};
use crate::Error;

/// System turn asking for the modern-day counterpart of a player.
pub const EQUIVALENCE_SYSTEM_TEMPLATE: &str =
    "Who is the equivalent cricket player to {player} in today's era?";

/// User turn, echoed verbatim from the request.
pub const EQUIVALENCE_USER_TEMPLATE: &str = "{text}";

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Variable(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Turn {
    role: Role,
    segments: Vec<Segment>,
}

/// An ordered set of message templates.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPromptTemplate {
    turns: Vec<Turn>,
}

impl ChatPromptTemplate {
    /// Parse a template from `(role, pattern)` pairs.
    pub fn from_messages<'a, I>(messages: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (Role, &'a str)>,
    {
        let turns = messages
            .into_iter()
            .map(|(role, pattern)| -> Result<Turn, Error> {
                Ok(Turn {
                    role,
                    segments: parse_pattern(pattern)?,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self { turns })
    }

    /// The fixed two-turn template used by the equivalence service.
    pub fn equivalence() -> Self {
        Self {
            turns: vec![
                Turn {
                    role: Role::System,
                    segments: vec![
                        Segment::Literal("Who is the equivalent cricket player to ".to_string()),
                        Segment::Variable("player".to_string()),
                        Segment::Literal(" in today's era?".to_string()),
                    ],
                },
                Turn {
                    role: Role::User,
                    segments: vec![Segment::Variable("text".to_string())],
                },
            ],
        }
    }

    /// Names of every placeholder, sorted and deduplicated.
    pub fn input_variables(&self) -> Vec<&str> {
        self.turns
            .iter()
            .flat_map(|turn| turn.segments.iter())
            .filter_map(|segment| match segment {
                Segment::Variable(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Substitute `values` into every turn.
    pub fn format(&self, values: &HashMap<&str, &str>) -> Result<Prompt, Error> {
        let mut messages = Vec::with_capacity(self.turns.len());

        for turn in &self.turns {
            let mut content = String::new();
            for segment in &turn.segments {
                match segment {
                    Segment::Literal(text) => content.push_str(text),
                    Segment::Variable(name) => {
                        let value = values.get(name.as_str()).ok_or_else(|| {
                            Error::invalid_input(format!("missing template variable '{name}'"))
                        })?;
                        content.push_str(value);
                    }
                }
            }
            messages.push(Message::new(turn.role, content));
        }

        Ok(Prompt::from(messages))
    }
}

fn parse_pattern(pattern: &str) -> Result<Vec<Segment>, Error> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => {
                            return Err(Error::config(format!(
                                "unterminated placeholder in template: {pattern}"
                            )))
                        }
                    }
                }
                let name = name.trim();
                if name.is_empty() || name.contains('{') {
                    return Err(Error::config(format!(
                        "invalid placeholder in template: {pattern}"
                    )));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Variable(name.to_string()));
            }
            '}' => {
                return Err(Error::config(format!(
                    "unmatched '}}' in template: {pattern}"
                )))
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<'a>(pairs: &[(&'a str, &'a str)]) -> HashMap<&'a str, &'a str> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_equivalence_matches_parsed_constants() {
        let parsed = ChatPromptTemplate::from_messages([
            (Role::System, EQUIVALENCE_SYSTEM_TEMPLATE),
            (Role::User, EQUIVALENCE_USER_TEMPLATE),
        ])
        .unwrap();
        assert_eq!(parsed, ChatPromptTemplate::equivalence());
        assert_eq!(parsed.input_variables(), vec!["player", "text"]);
    }

    #[test]
    fn test_format_substitutes_player() {
        let prompt = ChatPromptTemplate::equivalence()
            .format(&values(&[("player", "Bradman"), ("text", "")]))
            .unwrap();

        let messages = prompt.messages();
        assert_eq!(
            messages[0],
            Message::system("Who is the equivalent cricket player to Bradman in today's era?")
        );
        assert_eq!(messages[1], Message::user(""));
    }

    #[test]
    fn test_substituted_values_are_not_reexpanded() {
        let prompt = ChatPromptTemplate::equivalence()
            .format(&values(&[("player", "{text}"), ("text", "hi")]))
            .unwrap();
        assert_eq!(
            prompt.messages()[0].content,
            "Who is the equivalent cricket player to {text} in today's era?"
        );
    }

    #[test]
    fn test_missing_variable() {
        let err = ChatPromptTemplate::equivalence()
            .format(&values(&[("player", "Bradman")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(msg) if msg.contains("text")));
    }

    #[test]
    fn test_escaped_braces() {
        let template =
            ChatPromptTemplate::from_messages([(Role::User, "{{literal}} and {name}")]).unwrap();
        let prompt = template.format(&values(&[("name", "x")])).unwrap();
        assert_eq!(prompt.messages()[0].content, "{literal} and x");
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(ChatPromptTemplate::from_messages([(Role::User, "{open")]).is_err());
        assert!(ChatPromptTemplate::from_messages([(Role::User, "close}")]).is_err());
        assert!(ChatPromptTemplate::from_messages([(Role::User, "{}")]).is_err());
    }
}
