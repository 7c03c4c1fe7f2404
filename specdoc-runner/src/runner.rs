//! Running specification documents end to end.
//!
//! A run fetches the document from the [`Source`], evaluates its commands
//! against the fixture, stores the annotated copy through the [`Target`],
//! then follows any links the document registered.

use crate::assertion::{Comparator, NormalizedComparator};
use crate::commands::Command;
use crate::config::RunnerConfig;
use crate::context::LinkReference;
use crate::errors::{SpecError, SpecResult};
use crate::evaluator::Evaluator;
use crate::failures::{ExpectedFailures, HarnessResult};
use crate::fixture::Fixture;
use crate::matcher::Matcher;
use crate::registry::CommandRegistry;
use crate::render::{annotate, with_stylesheet};
use crate::summary::{ChildResult, ChildSummary, ResultSummary};
use specdoc::{Document, FileSource, FileTarget, Resource, Source, SourceError, Target};
use std::collections::{HashMap, HashSet};
use std::env;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Supplies fixtures for documents reached through links.
pub trait FixtureProvider: Send + Sync {
    fn fixture_for(&self, resource: &Resource) -> Option<Box<dyn Fixture>>;
}

impl<F> FixtureProvider for F
where
    F: Fn(&Resource) -> Option<Box<dyn Fixture>> + Send + Sync,
{
    fn fixture_for(&self, resource: &Resource) -> Option<Box<dyn Fixture>> {
        self(resource)
    }
}

type FixtureFactory = Box<dyn Fn() -> Box<dyn Fixture> + Send + Sync>;

/// A [`FixtureProvider`] keyed by resource; each lookup builds a fresh fixture.
#[derive(Default)]
pub struct FixtureCatalog {
    factories: HashMap<Resource, FixtureFactory>,
}

impl FixtureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F, X>(&mut self, resource: impl Into<Resource>, factory: F)
    where
        F: Fn() -> X + Send + Sync + 'static,
        X: Fixture + 'static,
    {
        self.factories
            .insert(resource.into(), Box::new(move || -> Box<dyn Fixture> { Box::new(factory()) }));
    }

    pub fn with<F, X>(mut self, resource: impl Into<Resource>, factory: F) -> Self
    where
        F: Fn() -> X + Send + Sync + 'static,
        X: Fixture + 'static,
    {
        self.register(resource, factory);
        self
    }
}

impl FixtureProvider for FixtureCatalog {
    fn fixture_for(&self, resource: &Resource) -> Option<Box<dyn Fixture>> {
        self.factories.get(resource).map(|factory| factory())
    }
}

/// One document of a suite.
pub struct SuiteCase {
    /// Explicit document, or `None` to derive it from the fixture type.
    pub resource: Option<Resource>,
    pub fixture: Box<dyn Fixture>,
}

impl SuiteCase {
    pub fn new(fixture: impl Fixture + 'static) -> Self {
        Self {
            resource: None,
            fixture: Box::new(fixture),
        }
    }

    pub fn at(mut self, resource: impl Into<Resource>) -> Self {
        self.resource = Some(resource.into());
        self
    }
}

/// Resources on the path from the top-level document to the current one.
#[derive(Debug, Default)]
struct Traversal {
    active: HashSet<Resource>,
}

impl Traversal {
    fn enter(&mut self, resource: &Resource) {
        self.active.insert(resource.clone());
    }

    fn leave(&mut self, resource: &Resource) {
        self.active.remove(resource);
    }

    fn is_active(&self, resource: &Resource) -> bool {
        self.active.contains(resource)
    }
}

/// Processes specification documents.
///
/// A runner holds only shared, immutable state and can serve concurrent
/// calls; each top-level call gets a fresh summary and traversal.
pub struct SpecRunner {
    source: Arc<dyn Source>,
    target: Arc<dyn Target>,
    registry: CommandRegistry,
    config: RunnerConfig,
    fixtures: Arc<dyn FixtureProvider>,
}

impl SpecRunner {
    pub fn builder() -> SpecRunnerBuilder {
        SpecRunnerBuilder::new()
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// The document derived from a fixture's type name.
    pub fn resource_for(&self, fixture: &dyn Fixture) -> Resource {
        Resource::from_type_name(fixture.type_name(), &self.config.extension)
    }

    /// Process the document derived from the fixture's type name.
    pub fn process(&self, fixture: &mut dyn Fixture) -> SpecResult<ResultSummary> {
        self.run(None, Some(fixture))
    }

    pub fn process_resource(&self, resource: &Resource, fixture: &mut dyn Fixture) -> SpecResult<ResultSummary> {
        self.run(Some(resource), Some(fixture))
    }

    /// Process one document and everything it links to.
    ///
    /// Fails without touching either port when `fixture` is `None`.
    pub fn run(&self, resource: Option<&Resource>, fixture: Option<&mut dyn Fixture>) -> SpecResult<ResultSummary> {
        let fixture = fixture.ok_or_else(|| SpecError::Configuration("Fixture is null".to_string()))?;
        let resource = match resource {
            Some(resource) => resource.clone(),
            None => self.resource_for(fixture),
        };

        let mut traversal = Traversal::default();
        self.process_document(&resource, fixture, &mut traversal)
    }

    /// Run each case, classifying unsatisfied or failed documents against
    /// the expected failures.
    pub fn run_suite(&self, cases: Vec<SuiteCase>, expected: &ExpectedFailures) -> HarnessResult {
        let mut result = HarnessResult::new();
        for mut case in cases {
            let fixture: &mut dyn Fixture = case.fixture.as_mut();
            let resource = case
                .resource
                .take()
                .unwrap_or_else(|| self.resource_for(fixture));

            match self.process_resource(&resource, fixture) {
                Ok(summary) if summary.is_satisfied() => result.record_pass(),
                Ok(summary) => {
                    let totals = summary.totals();
                    debug!(resource = %resource, failures = totals.failures, exceptions = totals.exceptions, "document unsatisfied");
                    result.record_failure(expected.is_expected(&resource));
                }
                Err(err) => {
                    warn!(resource = %resource, error = %err, "document could not be processed");
                    result.record_failure(expected.is_expected(&resource));
                }
            }
        }
        info!(
            total = result.total,
            passed = result.passed,
            regressions = result.regressions,
            "suite finished"
        );
        result
    }

    fn process_document(
        &self,
        resource: &Resource,
        fixture: &mut dyn Fixture,
        traversal: &mut Traversal,
    ) -> SpecResult<ResultSummary> {
        traversal.enter(resource);
        let result = self.process_entered(resource, fixture, traversal);
        traversal.leave(resource);
        result
    }

    fn process_entered(
        &self,
        resource: &Resource,
        fixture: &mut dyn Fixture,
        traversal: &mut Traversal,
    ) -> SpecResult<ResultSummary> {
        debug!(resource = %resource, "resolving");
        let text = self.source.fetch(resource).map_err(|err| match err {
            SourceError::NotFound(resource) => SpecError::ResourceNotFound(resource),
            SourceError::Io { resource, source } => SpecError::Source { resource, source },
        })?;

        debug!(resource = %resource, bytes = text.len(), "parsing");
        let document = Document::parse(&text).map_err(|source| SpecError::Malformed {
            resource: resource.clone(),
            source,
        })?;

        let evaluation = Evaluator::new(&self.registry).evaluate(&document.root, fixture, resource);
        let mut summary = evaluation.summary;

        let mut root = annotate(&document.root, &evaluation.outcomes);
        if self.config.embed_stylesheet {
            root = with_stylesheet(root);
        }
        let output = Document::from_root(root).to_markup();
        self.target
            .store(resource, &output)
            .map_err(|source| SpecError::Target {
                resource: resource.clone(),
                source,
            })?;

        if self.config.follow_links {
            for link in &evaluation.links {
                let child = self.follow_link(link, traversal);
                summary.record_child(child);
            }
        }

        let totals = summary.totals();
        info!(
            resource = %resource,
            successes = totals.successes,
            failures = totals.failures,
            exceptions = totals.exceptions,
            "processed document"
        );
        Ok(summary)
    }

    fn follow_link(&self, link: &LinkReference, traversal: &mut Traversal) -> ChildSummary {
        let target = &link.target;
        let result = if traversal.is_active(target) {
            debug!(source = %link.source, target = %target, "link target already on the traversal path");
            ChildResult::Revisited
        } else {
            match self.fixtures.fixture_for(target) {
                None => {
                    warn!(source = %link.source, target = %target, "no fixture for linked document");
                    ChildResult::Unresolved
                }
                Some(mut fixture) => match self.process_document(target, fixture.as_mut(), traversal) {
                    Ok(summary) => ChildResult::Processed(summary),
                    Err(err) => {
                        warn!(source = %link.source, target = %target, error = %err, "linked document failed");
                        ChildResult::Failed {
                            message: err.to_string(),
                        }
                    }
                },
            }
        };

        ChildSummary {
            resource: target.clone(),
            result,
        }
    }
}

/// Builds a [`SpecRunner`].
///
/// Defaults: documents are read relative to the working directory, output
/// goes under `<tmp>/specdoc`, the standard configuration and command set
/// apply, and links have no fixtures.
pub struct SpecRunnerBuilder {
    source: Option<Arc<dyn Source>>,
    target: Option<Arc<dyn Target>>,
    config: RunnerConfig,
    comparator: Arc<dyn Comparator>,
    custom: Vec<(Box<dyn Matcher>, Box<dyn Command>)>,
    fixtures: Arc<dyn FixtureProvider>,
}

impl SpecRunnerBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            target: None,
            config: RunnerConfig::standard(),
            comparator: Arc::new(NormalizedComparator),
            custom: Vec::new(),
            fixtures: Arc::new(FixtureCatalog::new()),
        }
    }

    pub fn with_source(mut self, source: Arc<dyn Source>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_target(mut self, target: Arc<dyn Target>) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Comparator used by `assertEquals`.
    pub fn with_comparator(mut self, comparator: Arc<dyn Comparator>) -> Self {
        self.comparator = comparator;
        self
    }

    /// Register a command ahead of the built-ins.
    pub fn with_command(mut self, matcher: impl Matcher + 'static, command: impl Command + 'static) -> Self {
        self.custom.push((Box::new(matcher), Box::new(command)));
        self
    }

    pub fn with_fixtures(mut self, fixtures: impl FixtureProvider + 'static) -> Self {
        self.fixtures = Arc::new(fixtures);
        self
    }

    pub fn build(self) -> SpecRunner {
        let mut registry = CommandRegistry::new();
        for (matcher, command) in self.custom {
            registry.register_boxed(matcher, command);
        }
        registry.register_standard(&self.config.namespace, self.comparator);

        SpecRunner {
            source: self
                .source
                .unwrap_or_else(|| Arc::new(FileSource::new("."))),
            target: self
                .target
                .unwrap_or_else(|| Arc::new(FileTarget::new(env::temp_dir().join("specdoc")))),
            registry,
            config: self.config,
            fixtures: self.fixtures,
        }
    }
}

impl Default for SpecRunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
