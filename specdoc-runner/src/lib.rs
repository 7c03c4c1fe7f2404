#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/specdoc/main/assets/specdoc.svg",
    issue_tracker_base_url = "https://github.com/storyscript/specdoc/issues/"
)]

//! Runs executable specification documents against fixtures.
//!
//! A specification is an XHTML document whose elements carry command
//! attributes in the `urn:specdoc:commands` namespace. The runner evaluates
//! each command against a [`Fixture`], writes an annotated copy of the
//! document (green for success, struck-through expectations for failures,
//! messages for exceptions), and returns a [`ResultSummary`].
//!
//! ## Example
//!
//! ```
//! use specdoc::{MemorySource, MemoryTarget, Resource};
//! use specdoc_runner::{MethodFixture, SpecRunner};
//! use std::sync::Arc;
//!
//! let source = MemorySource::new().with_resource(
//!     "/example/HelloWorld.html",
//!     r#"<html xmlns:s="urn:specdoc:commands"><body>
//!          <p s:assertEquals="getGreeting()">Hello World!</p>
//!        </body></html>"#,
//! );
//! let runner = SpecRunner::builder()
//!     .with_source(Arc::new(source))
//!     .with_target(Arc::new(MemoryTarget::new()))
//!     .build();
//!
//! let mut fixture = MethodFixture::new("example.HelloWorld", ())
//!     .method("getGreeting", &[], |_, _| Ok("Hello World!"));
//! let summary = runner.process(&mut fixture).unwrap();
//! assert_eq!(summary.success_count(), 1);
//! assert!(summary.is_satisfied());
//! ```
//!
//! ## Modules
//!
//! - [`fixture`] - Fixture model and dynamic values
//! - [`invoker`] - Name-based operation invocation
//! - [`parser`] - Command expression parser
//! - [`commands`] - Built-in commands
//! - [`registry`] - Matcher to command mapping
//! - [`evaluator`] - Document walk
//! - [`render`] - Outcome annotation
//! - [`runner`] - End-to-end processing and link traversal
//! - [`failures`] - Expected failures tracking via TOML

pub mod assertion;
pub mod commands;
pub mod config;
pub mod context;
pub mod errors;
pub mod evaluator;
pub mod failures;
pub mod fixture;
pub mod formatter;
pub mod invoker;
pub mod logging;
pub mod matcher;
pub mod parser;
pub mod registry;
pub mod render;
pub mod runner;
pub mod summary;

pub use assertion::{Comparator, ExactComparator, ExceptionCause, NormalizedComparator, Outcome, Status};
pub use commands::{Command, CommandCall};
pub use config::RunnerConfig;
pub use context::{EvaluationContext, EvaluationError, LinkReference};
pub use errors::{SpecError, SpecResult, Unsatisfied};
pub use evaluator::{Evaluation, Evaluator, RecordedOutcome};
pub use failures::{ExpectedFailures, FailureEntry, FailureState, HarnessResult};
pub use fixture::{Fixture, FixtureError, MethodFixture, ParamType, Signature, Value};
pub use formatter::{format_failure, format_harness, format_summary};
pub use invoker::{Argument, FixtureInvoker, InvocationError};
pub use matcher::{AttributeMatcher, Matcher};
pub use parser::{parse_expression, Expression, ExpressionError};
pub use registry::{CommandRegistry, COMMAND_NAMESPACE};
pub use render::{annotate, render, with_stylesheet};
pub use runner::{FixtureCatalog, FixtureProvider, SpecRunner, SpecRunnerBuilder, SuiteCase};
pub use summary::{ChildResult, ChildSummary, Counts, ResultSummary};
