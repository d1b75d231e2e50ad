//! Parses the textual form produced by `Tag`'s `Display` back into a tag.
//!
//! Grammar: `Name`, `Name{N}`, `Name{W,H}`, `Name{tag, ...}`.
use super::tag::{Dims, Tag, TagKind};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot parse tag '{input}': {reason}")]
pub struct ParseTagError {
    pub input: String,
    pub reason: String,
}

impl FromStr for Tag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { src: s, pos: 0 };
        let tag = parser.tag().map_err(|reason| ParseTagError {
            input: s.to_string(),
            reason,
        })?;
        parser.skip_ws();
        if parser.pos != s.len() {
            return Err(ParseTagError {
                input: s.to_string(),
                reason: format!("trailing input at offset {}", parser.pos),
            });
        }
        Ok(tag)
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), String> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(format!("expected '{}' at offset {}", c, self.pos))
        }
    }

    fn ident(&mut self) -> Result<&'a str, String> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(format!("expected a tag name at offset {}", self.pos));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn number(&mut self) -> Result<usize, String> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let n = rest[..len]
            .parse::<usize>()
            .map_err(|_| format!("expected a number at offset {}", self.pos))?;
        self.pos += len;
        Ok(n)
    }

    fn tag_list(&mut self) -> Result<Vec<Tag>, String> {
        let mut items = Vec::new();
        if self.eat('}') {
            return Ok(items);
        }
        loop {
            items.push(self.tag()?);
            if self.eat('}') {
                return Ok(items);
            }
            self.expect(',')?;
        }
    }

    fn tag(&mut self) -> Result<Tag, String> {
        let name = self.ident()?;
        let kind = match TagKind::from_name(name) {
            Some(kind) => Some(kind),
            None if name == "Union" => None,
            None => return Err(format!("unknown tag name '{}'", name)),
        };
        let has_args = self.eat('{');

        let Some(kind) = kind else {
            if !has_args {
                return Err("Union requires braces".into());
            }
            return Ok(Tag::union(self.tag_list()?));
        };
        if !has_args {
            return Ok(kind.to_tag());
        }

        let tag = match kind {
            TagKind::Finite | TagKind::Multiclass | TagKind::OrderedFactor => {
                let n = Some(self.number()?);
                self.expect('}')?;
                match kind {
                    TagKind::Finite => Tag::Finite(n),
                    TagKind::Multiclass => Tag::Multiclass(n),
                    _ => Tag::OrderedFactor(n),
                }
            }
            TagKind::Image | TagKind::GrayImage | TagKind::ColorImage => {
                let width = self.number()?;
                self.expect(',')?;
                let height = self.number()?;
                self.expect('}')?;
                let d = Some(Dims::new(width, height));
                match kind {
                    TagKind::Image => Tag::Image(d),
                    TagKind::GrayImage => Tag::GrayImage(d),
                    _ => Tag::ColorImage(d),
                }
            }
            TagKind::Sequence | TagKind::Table => {
                let inner = Box::new(self.tag()?);
                self.expect('}')?;
                if kind == TagKind::Sequence {
                    Tag::Sequence(inner)
                } else {
                    Tag::Table(inner)
                }
            }
            TagKind::Tuple => Tag::Tuple(self.tag_list()?),
            other => return Err(format!("'{}' takes no parameters", other)),
        };
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Continuous", Tag::Continuous)]
    #[case(" Count ", Tag::Count)]
    #[case("Finite", Tag::Finite(None))]
    #[case("Multiclass{3}", Tag::Multiclass(Some(3)))]
    #[case("OrderedFactor{ 4 }", Tag::OrderedFactor(Some(4)))]
    #[case("ColorImage{32,16}", Tag::ColorImage(Some(Dims::new(32, 16))))]
    #[case("Union{Missing, Continuous}", Tag::union([Tag::Missing, Tag::Continuous]))]
    #[case("Sequence{Union{Count, Missing}}", Tag::sequence(Tag::union([Tag::Missing, Tag::Count])))]
    #[case("Tuple{Count, Textual}", Tag::Tuple(vec![Tag::Count, Tag::Textual]))]
    #[case("Tuple{}", Tag::Tuple(vec![]))]
    fn test_parse(#[case] input: &str, #[case] expected: Tag) {
        assert_eq!(input.parse::<Tag>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("Continous")]
    #[case("Multiclass{x}")]
    #[case("Count{3}")]
    #[case("Union")]
    #[case("Sequence{Count")]
    #[case("Count Count")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(input.parse::<Tag>().is_err(), "should fail: '{}'", input);
    }

    #[test]
    fn test_display_round_trip() {
        let tags = [
            Tag::table_of([Tag::Continuous, Tag::Multiclass(Some(2))]),
            Tag::union([Tag::Missing, Tag::GrayImage(Some(Dims::new(2, 3)))]),
            Tag::Tuple(vec![Tag::ScientificDate, Tag::sequence(Tag::Textual)]),
        ];
        for tag in tags {
            assert_eq!(tag.to_string().parse::<Tag>().unwrap(), tag);
        }
    }
}
