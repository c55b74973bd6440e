//! Step phrase registry
//!
//! Maps scenario phrases to handlers through compiled regular expressions.
//! A phrase must match exactly one registered pattern; captured groups are
//! handed to the handler in left-to-right order.

use std::fmt::Display;
use std::str::FromStr;

use futures_util::future::BoxFuture;
use regex::Regex;
use tracing::debug;

use crate::common::{Error, Result};

use super::StepContext;

pub type StepFuture<'a> = BoxFuture<'a, Result<()>>;

/// A step handler
pub type StepFn = for<'a> fn(&'a StepContext, StepArgs) -> StepFuture<'a>;

/// Captured groups of one phrase match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepArgs(Vec<String>);

impl StepArgs {
    pub fn new(args: Vec<String>) -> Self {
        Self(args)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Group `index` (0-based) as text
    pub fn str(&self, index: usize) -> Result<&str> {
        self.0
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| Error::StepArgument {
                index: index + 1,
                reason: format!("pattern captured only {} group(s)", self.0.len()),
            })
    }

    /// Group `index` (0-based) converted with `FromStr`
    pub fn parse<T>(&self, index: usize) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.str(index)?;
        raw.parse().map_err(|e: T::Err| Error::StepArgument {
            index: index + 1,
            reason: format!("'{}': {}", raw, e),
        })
    }

    pub fn int(&self, index: usize) -> Result<i64> {
        self.parse(index)
    }
}

struct StepDefinition {
    regex: Regex,
    handler: StepFn,
}

/// A phrase resolved to its handler
pub struct ResolvedStep<'r> {
    pub pattern: &'r str,
    pub handler: StepFn,
    pub args: StepArgs,
}

#[derive(Default)]
pub struct StepRegistry {
    steps: Vec<StepDefinition>,
}

/// Leading Gherkin keywords that carry no meaning for matching
const KEYWORDS: [&str; 6] = ["Given ", "When ", "Then ", "And ", "But ", "* "];

/// Strip the keyword and surrounding whitespace from a scenario line
pub fn strip_keyword(line: &str) -> &str {
    let line = line.trim();
    KEYWORDS
        .iter()
        .find_map(|kw| line.strip_prefix(kw))
        .map(str::trim_start)
        .unwrap_or(line)
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every step the harness ships
    pub fn standard() -> Result<Self> {
        let mut registry = Self::new();
        super::generic::register(&mut registry)?;
        super::login::register(&mut registry)?;
        super::requisition::register(&mut registry)?;
        super::stock_movement::register(&mut registry)?;
        super::products::register(&mut registry)?;
        super::server_data::register(&mut registry)?;
        Ok(registry)
    }

    pub fn register(&mut self, pattern: &str, handler: StepFn) -> Result<()> {
        if self.steps.iter().any(|s| s.regex.as_str() == pattern) {
            return Err(Error::DuplicateStep(pattern.to_string()));
        }
        let regex = Regex::new(pattern)?;
        self.steps.push(StepDefinition { regex, handler });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Registered patterns in registration order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.regex.as_str())
    }

    /// Find the single handler for a phrase
    pub fn resolve(&self, line: &str) -> Result<ResolvedStep<'_>> {
        let phrase = strip_keyword(line);
        let mut matches = self.steps.iter().filter(|s| s.regex.is_match(phrase));

        let step = matches
            .next()
            .ok_or_else(|| Error::UndefinedStep(phrase.to_string()))?;

        let others: Vec<&str> = matches.map(|s| s.regex.as_str()).collect();
        if !others.is_empty() {
            let mut patterns = vec![step.regex.as_str()];
            patterns.extend(others);
            return Err(Error::AmbiguousStep {
                phrase: phrase.to_string(),
                patterns: patterns.join(" | "),
            });
        }

        let args = step
            .regex
            .captures(phrase)
            .map(|caps| {
                caps.iter()
                    .skip(1)
                    .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();

        Ok(ResolvedStep {
            pattern: step.regex.as_str(),
            handler: step.handler,
            args: StepArgs(args),
        })
    }

    /// Resolve a phrase and run its handler
    pub async fn dispatch(&self, ctx: &StepContext, line: &str) -> Result<()> {
        let step = self.resolve(line)?;
        debug!(pattern = step.pattern, args = ?step.args, "dispatching step");
        (step.handler)(ctx, step.args).await
    }
}
