//! The pipeline that runs autotype rules over every column of a table.
use super::{AutotypeConfig, Rule};
use crate::analysis::Classifier;
use crate::coercion::{Coercer, CoercionOptions, TagMap};
use crate::convention::ConventionRegistry;
use crate::error::Result;
use crate::store::{Column, Table};
use crate::type_system::Tag;
use smallvec::SmallVec;
use tracing::debug;

/// A resolved, ordered rule sequence.
pub type RulePipeline = SmallVec<[Rule; 4]>;

/// Suggests scitypes for table columns by folding rules over the classified tag.
pub struct AutoTyper {
    classifier: Classifier,
    config: AutotypeConfig,
}

impl AutoTyper {
    pub fn new(registry: &ConventionRegistry) -> Self {
        Self {
            classifier: Classifier::new(registry),
            config: AutotypeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AutotypeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AutotypeConfig {
        &self.config
    }

    /// Resolves rule names up front so a bad name fails before any column is read.
    pub fn resolve(names: &[&str]) -> Result<RulePipeline> {
        names.iter().map(|name| name.parse::<Rule>()).collect()
    }

    /// Suggested tag per column, keyed by column name. With `only_changes`,
    /// columns whose suggestion equals their classified tag are left out.
    pub fn run<T: Table + ?Sized>(&self, table: &T, rules: &[Rule], only_changes: bool) -> Result<TagMap> {
        let mut suggestions = TagMap::new();
        for (name, column) in table.columns()? {
            let classified = self.classifier.element_tag(column);
            let suggested = self.suggest_column(&name, column, classified.clone(), rules);
            if only_changes && suggested == classified {
                continue;
            }
            suggestions.insert(name, suggested);
        }
        Ok(suggestions)
    }

    pub fn run_named<T: Table + ?Sized>(&self, table: &T, rules: &[&str], only_changes: bool) -> Result<TagMap> {
        let pipeline = Self::resolve(rules)?;
        self.run(table, &pipeline, only_changes)
    }

    /// Folds the rules over one column. Each rule sees the tag the previous
    /// one produced.
    fn suggest_column(&self, name: &str, column: &Column, classified: Tag, rules: &[Rule]) -> Tag {
        let native = column.native_type().kind;
        rules.iter().fold(classified, |current, &rule| {
            match rule.suggest(column, native, &current, &self.config) {
                Some(next) if next != current => {
                    debug!(column = %name, rule = %rule, from = %current, to = %next, "autotype rule fired");
                    next
                }
                _ => current,
            }
        })
    }

    /// Runs the rules and converts the table to the suggested tags.
    pub fn run_and_coerce<T: Table>(
        &self,
        registry: &ConventionRegistry,
        table: &T,
        rules: &[Rule],
        options: CoercionOptions,
    ) -> Result<T> {
        let suggestions = self.run(table, rules, true)?;
        Coercer::new(registry).with_options(options).coerce_table(table, &suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScitypeError;
    use crate::store::{ColumnTable, NativeKind, Value};

    fn survey() -> ColumnTable {
        let b: Column = (0..12).map(|i| Value::Int(i % 4)).collect();
        let x: Column = (0..12).map(|i| Value::Float(f64::from(i) * 0.5)).collect();
        let s: Column = (0..12)
            .map(|i| if i == 3 { Value::Missing } else { Value::from(["lo", "hi"][i % 2]) })
            .collect();
        ColumnTable::new(vec![("b".into(), b), ("x".into(), x), ("s".into(), s)]).unwrap()
    }

    #[test]
    fn test_default_rule() {
        let typer = AutoTyper::new(&ConventionRegistry::new());
        let out = typer.run(&survey(), &[Rule::default()], false).unwrap();
        assert_eq!(out["b"], Tag::OrderedFactor(Some(4)));
        assert_eq!(out["x"], Tag::Continuous);
        assert_eq!(out["s"], Tag::Union(vec![Tag::Missing, Tag::Multiclass(Some(2))]));
    }

    #[test]
    fn test_rule_order_is_observable() {
        let typer = AutoTyper::new(&ConventionRegistry::new());
        let t = survey();
        let a = typer
            .run(&t, &[Rule::DiscreteToContinuous, Rule::FewToFinite], false)
            .unwrap();
        let b = typer
            .run(&t, &[Rule::FewToFinite, Rule::DiscreteToContinuous], false)
            .unwrap();
        assert_eq!(a["b"], Tag::Continuous);
        assert_eq!(b["b"], Tag::OrderedFactor(Some(4)));
    }

    #[test]
    fn test_only_changes() {
        let typer = AutoTyper::new(&ConventionRegistry::new());
        let out = typer.run(&survey(), &[Rule::FewToFinite], true).unwrap();
        assert!(!out.contains_key("x"));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_unknown_rule_fails_before_processing() {
        let typer = AutoTyper::new(&ConventionRegistry::new());
        let err = typer
            .run_named(&survey(), &["few_to_finite", "bogus"], false)
            .unwrap_err();
        assert_eq!(err, ScitypeError::UnknownRule("bogus".into()));
    }

    #[test]
    fn test_run_and_coerce() {
        let registry = ConventionRegistry::new();
        let typer = AutoTyper::new(&registry);
        let out = typer
            .run_and_coerce(&registry, &survey(), &[Rule::FewToFinite], CoercionOptions::default())
            .unwrap();
        assert_eq!(out.column("b").unwrap().native_type().kind, NativeKind::OrderedCategorical);
        assert_eq!(out.column("s").unwrap().native_type().kind, NativeKind::Categorical);
        assert_eq!(out.column("x"), survey().column("x"));
    }
}
