//! Parsed command descriptor: the pipeline and its stages.

/// One program invocation with its own argv and redirections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub argv: Vec<String>,
    pub input_redirect: Option<String>,
    pub output_redirect: Option<String>,
    pub blocking: bool,
}

impl Stage {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Stage { argv: argv.into_iter().map(Into::into).collect(), input_redirect: None, output_redirect: None, blocking: true }
    }

    pub fn with_input(mut self, path: impl Into<String>) -> Self { self.input_redirect = Some(path.into()); self }
    pub fn with_output(mut self, path: impl Into<String>) -> Self { self.output_redirect = Some(path.into()); self }
    pub fn in_background(mut self) -> Self { self.blocking = false; self }

    /// `argv[0]`. Stages built through [`Pipeline::new`] never have an empty argv.
    pub fn program(&self) -> &str { self.argv.first().map(String::as_str).unwrap_or("") }
}

/// One accepted input line: an ordered, non-empty list of stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Returns `None` for zero stages or a stage with an empty argv.
    pub fn new(stages: Vec<Stage>) -> Option<Self> {
        if stages.is_empty() || stages.iter().any(|s| s.argv.is_empty()) { return None; }
        Some(Pipeline { stages })
    }

    pub fn single(stage: Stage) -> Option<Self> { Pipeline::new(vec![stage]) }

    pub fn stages(&self) -> &[Stage] { &self.stages }
    pub fn first(&self) -> &Stage { &self.stages[0] }
    pub fn len(&self) -> usize { self.stages.len() }
    pub fn is_empty(&self) -> bool { self.stages.is_empty() }

    /// Background if any stage carries the marker; the parser only sets it on
    /// the last stage, but nothing here relies on that.
    pub fn is_blocking(&self) -> bool { self.stages.iter().all(|s| s.blocking) }
}
