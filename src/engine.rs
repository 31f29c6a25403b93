use crate::{
    config::EngineConfig,
    error::ParseError,
    roll_parser::parse_roll_with,
    rules::dice::{DieBounds, RollOutcome, RollSpec, TotalBounds, evaluate},
    statistics::roller::{DieSource, Roller},
};

/// Holds one roll spec and the outcome of the last time it was rolled.
///
/// Every call to [`RollEngine::interpret_notation`] replaces the spec and
/// every evaluation replaces the outcome. The engine is not meant to be
/// shared between concurrent callers; create one per request instead.
#[derive(Debug)]
pub struct RollEngine<S = Roller> {
    config: EngineConfig,
    source: S,
    spec: RollSpec,
    outcome: Option<RollOutcome>,
}

impl RollEngine<Roller> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates an engine, interpreting `input` straight away if it is given.
    ///
    /// Uses the lenient policy, so this never fails: input without any
    /// notation leaves the default spec in place.
    pub fn create(input: Option<&str>) -> Self {
        let mut engine = Self::new();
        if let Some(input) = input {
            engine.spec = crate::roll_parser::parse_roll(input);
        }
        engine
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_source(Roller::from_optional_seed(config.seed), config)
    }
}

impl<S: DieSource> RollEngine<S> {
    pub fn with_source(source: S, config: EngineConfig) -> Self {
        Self {
            config,
            source,
            spec: RollSpec::default(),
            outcome: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn spec(&self) -> &RollSpec {
        &self.spec
    }

    /// Parses `input` and makes it the current spec.
    ///
    /// # Errors
    /// Under [`crate::config::MatchPolicy::Strict`], returns
    /// [`ParseError::NoMatch`] when `input` holds no notation. The current
    /// spec is left unchanged in that case.
    pub fn interpret_notation(&mut self, input: &str) -> Result<&RollSpec, ParseError> {
        self.spec = parse_roll_with(input, self.config.policy)?;
        Ok(&self.spec)
    }

    pub fn roll_single_die(&mut self, sides: u32) -> u32 {
        self.source.roll_die(sides)
    }

    /// Rolls the current spec, or `input` if given, and returns the total.
    ///
    /// # Errors
    /// Only fails when `input` is rejected by [`RollEngine::interpret_notation`].
    pub fn evaluate(&mut self, input: Option<&str>) -> Result<i64, ParseError> {
        Ok(self.evaluate_detailed(input)?.final_total)
    }

    /// Like [`RollEngine::evaluate`], but returns the whole outcome.
    ///
    /// # Errors
    /// Only fails when `input` is rejected by [`RollEngine::interpret_notation`].
    pub fn evaluate_detailed(&mut self, input: Option<&str>) -> Result<&RollOutcome, ParseError> {
        if let Some(input) = input {
            self.interpret_notation(input)?;
        }
        let outcome = evaluate(&self.spec, &mut self.source);
        Ok(&*self.outcome.insert(outcome))
    }

    pub fn result(&self) -> Option<i64> {
        self.outcome.as_ref().map(|o| o.final_total)
    }

    pub fn details(&self) -> Option<&RollOutcome> {
        self.outcome.as_ref()
    }

    pub fn total_bounds(&self) -> Option<TotalBounds> {
        self.outcome.as_ref().map(|o| o.total_bounds)
    }

    pub fn die_bounds(&self) -> Option<DieBounds> {
        self.outcome.as_ref().map(|o| o.die_bounds)
    }
}
