//! The built-in autotype heuristics.
//!
//! Every rule is a free function `suggest(column, native, current, config)`
//! that either proposes a replacement for the forwarded tag or abstains.
use super::AutotypeConfig;
use crate::error::ScitypeError;
use crate::store::{Column, NativeKind};
use crate::type_system::Tag;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod discrete_to_continuous;
mod few_to_finite;
mod string_to_class;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    #[default]
    FewToFinite,
    DiscreteToContinuous,
    StringToMulticlass,
}

impl Rule {
    pub const ALL: [Rule; 3] = [Rule::FewToFinite, Rule::DiscreteToContinuous, Rule::StringToMulticlass];

    pub fn name(self) -> &'static str {
        match self {
            Rule::FewToFinite => "few_to_finite",
            Rule::DiscreteToContinuous => "discrete_to_continuous",
            Rule::StringToMulticlass => "string_to_multiclass",
        }
    }

    /// Runs the rule against a column and its forwarded tag.
    pub fn suggest(self, column: &Column, native: NativeKind, current: &Tag, config: &AutotypeConfig) -> Option<Tag> {
        match self {
            Rule::FewToFinite => few_to_finite::suggest(column, native, current, config),
            Rule::DiscreteToContinuous => discrete_to_continuous::suggest(column, native, current, config),
            Rule::StringToMulticlass => string_to_class::suggest(column, native, current, config),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rule {
    type Err = ScitypeError;

    /// Accepts the canonical snake_case names and the hyphenated long forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "few_to_finite" | "few-distinct-values-to-finite" => Ok(Rule::FewToFinite),
            "discrete_to_continuous" | "discrete-to-continuous" => Ok(Rule::DiscreteToContinuous),
            "string_to_multiclass" | "string-like-to-class" => Ok(Rule::StringToMulticlass),
            other => Err(ScitypeError::UnknownRule(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("few_to_finite", Rule::FewToFinite)]
    #[case("few-distinct-values-to-finite", Rule::FewToFinite)]
    #[case("discrete-to-continuous", Rule::DiscreteToContinuous)]
    #[case("string-like-to-class", Rule::StringToMulticlass)]
    fn test_parse_names(#[case] name: &str, #[case] expected: Rule) {
        assert_eq!(name.parse::<Rule>(), Ok(expected));
    }

    #[test]
    fn test_unknown_rule() {
        assert_eq!(
            "guess".parse::<Rule>(),
            Err(ScitypeError::UnknownRule("guess".into()))
        );
        for rule in Rule::ALL {
            assert_eq!(rule.name().parse::<Rule>(), Ok(rule));
        }
    }
}
