//! Test runner implementation
//!
//! Executes scenario steps in order against the target API. Every step is
//! an independent HTTP call: a failure is recorded for that step and the
//! run moves on, unless the scenario asks to stop on the first failure.

use std::time::Duration;

use colored::Colorize;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::client::{ApiClient, ApiRequest, ApiResponse, RequestBody};
use crate::common::{truncate_for_display, Error, Result};
use crate::fixture::Fixture;
use crate::schema::SchemaStore;

use super::config::{
    BodySpec, FieldAssertion, JsonKind, RequestSpec, ResponseExpectation, TestScenario, TestStep,
};

/// Body text longer than this is cut in console output
const DISPLAY_BODY_CHARS: usize = 500;

/// Console behaviour for a run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Print requests, latencies and response bodies of failed steps
    pub verbose: bool,
    /// Print nothing; the caller renders the report
    pub quiet: bool,
}

/// Result of a scenario run
#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub passed: bool,
    pub steps: Vec<StepReport>,
}

impl ScenarioReport {
    pub fn failed_steps(&self) -> usize {
        self.steps.iter().filter(|s| !s.passed && !s.skipped).count()
    }
}

/// Outcome of one step
#[derive(Debug, Serialize)]
pub struct StepReport {
    /// 1-based position in the scenario
    pub index: usize,
    pub name: String,
    /// `METHOD path?query`, empty if the request could not be built
    pub request: String,
    pub passed: bool,
    /// Not run because an earlier step failed under `stop_on_failure`
    pub skipped: bool,
    pub status: Option<u16>,
    pub elapsed_ms: Option<u64>,
    pub error: Option<String>,
}

/// Run a scenario with one fixture shared by every step
pub async fn run_scenario(
    scenario: &TestScenario,
    client: &ApiClient,
    fixture: &Fixture,
    schemas: &mut SchemaStore,
    options: RunOptions,
) -> ScenarioReport {
    let say = |line: String| {
        if !options.quiet {
            println!("{}", line);
        }
    };

    say(format!(
        "\n{} {}",
        "Running Test:".blue().bold(),
        scenario.name.white().bold()
    ));
    if let Some(desc) = &scenario.description {
        say(format!("  {}", desc.dimmed()));
    }
    say(format!("  {} {}", "Target:".cyan(), client.base_url().dimmed()));
    say(format!("  {} {}", "Fixture user:".cyan(), fixture.username.dimmed()));

    tracing::info!(
        scenario = %scenario.name,
        base_url = client.base_url(),
        username = %fixture.username,
        steps = scenario.steps.len(),
        "running scenario"
    );

    say(format!("\n{}", "Steps:".cyan()));

    let mut reports = Vec::with_capacity(scenario.steps.len());
    let mut halted = false;

    for (i, step) in scenario.steps.iter().enumerate() {
        let step_num = i + 1;

        if halted {
            say(format!(
                "  {} Step {}: {} (skipped)",
                "-".yellow(),
                step_num,
                step.name.dimmed()
            ));
            reports.push(StepReport {
                index: step_num,
                name: step.name.clone(),
                request: String::new(),
                passed: false,
                skipped: true,
                status: None,
                elapsed_ms: None,
                error: None,
            });
            continue;
        }

        let report = execute_step(client, fixture, schemas, step, step_num, options).await;
        if !report.passed && scenario.stop_on_failure {
            halted = true;
        }
        reports.push(report);
    }

    let passed = reports.iter().all(|r| r.passed);
    let report = ScenarioReport {
        name: scenario.name.clone(),
        passed,
        steps: reports,
    };

    if passed {
        say(format!(
            "\n{} {}\n",
            "✓".green().bold(),
            "Test Passed".green().bold()
        ));
    } else {
        say(format!(
            "\n{} {} ({} of {} steps failed)\n",
            "✗".red().bold(),
            "Test Failed".red().bold(),
            report.failed_steps(),
            report.steps.len()
        ));
    }

    tracing::info!(
        scenario = %report.name,
        passed = report.passed,
        failed = report.failed_steps(),
        "scenario finished"
    );

    report
}

/// Execute a single step and report its outcome
async fn execute_step(
    client: &ApiClient,
    fixture: &Fixture,
    schemas: &mut SchemaStore,
    step: &TestStep,
    step_num: usize,
    options: RunOptions,
) -> StepReport {
    let mut report = StepReport {
        index: step_num,
        name: step.name.clone(),
        request: String::new(),
        passed: false,
        skipped: false,
        status: None,
        elapsed_ms: None,
        error: None,
    };

    let request = match build_request(&step.request, fixture) {
        Ok(request) => request,
        Err(e) => {
            fail(&mut report, &e, None, None, options);
            return report;
        }
    };
    report.request = request.describe();

    if options.verbose && !options.quiet {
        println!("  {} {}", "→".dimmed(), report.request.dimmed());
    }

    let response = match client.send(&request).await {
        Ok(response) => response,
        Err(e) => {
            fail(&mut report, &e, Some(&request), None, options);
            return report;
        }
    };
    report.status = Some(response.status);
    report.elapsed_ms = Some(response.elapsed_ms());

    match check_response(&step.expect, &response, fixture, schemas) {
        Ok(()) => {
            report.passed = true;
            if !options.quiet {
                if options.verbose {
                    println!(
                        "  {} Step {}: {} ({} in {} ms)",
                        "✓".green(),
                        step_num,
                        step.name.dimmed(),
                        response.status,
                        response.elapsed_ms()
                    );
                } else {
                    println!("  {} Step {}: {}", "✓".green(), step_num, step.name.dimmed());
                }
            }
        }
        Err(e) => fail(&mut report, &e, Some(&request), Some(&response), options),
    }

    report
}

/// Record a failure and log the exchange that caused it
fn fail(
    report: &mut StepReport,
    error: &Error,
    request: Option<&ApiRequest>,
    response: Option<&ApiResponse>,
    options: RunOptions,
) {
    report.passed = false;
    report.error = Some(error.to_string());

    tracing::warn!(
        step = report.index,
        name = %report.name,
        request = %report.request,
        request_body = %request.map(|r| r.body_text()).unwrap_or_default(),
        status = response.map(|r| r.status),
        response_body = response.map(|r| r.body.as_str()).unwrap_or_default(),
        error = %error,
        "step failed"
    );

    if options.quiet {
        return;
    }

    println!(
        "  {} Step {}: {}: {}",
        "✗".red(),
        report.index,
        report.name,
        error
    );

    if options.verbose {
        if let Some(request) = request {
            let body = request.body_text();
            if !body.is_empty() {
                println!(
                    "      request body:  {}",
                    truncate_for_display(&body, DISPLAY_BODY_CHARS).dimmed()
                );
            }
        }
        if let Some(response) = response {
            println!(
                "      response {}: {}",
                response.status,
                truncate_for_display(&response.body, DISPLAY_BODY_CHARS).dimmed()
            );
        }
    }
}

/// Render a step's request against the fixture
pub fn build_request(spec: &RequestSpec, fixture: &Fixture) -> Result<ApiRequest> {
    let method = Method::from_bytes(spec.method.to_ascii_uppercase().as_bytes())
        .map_err(|_| Error::Config(format!("Invalid HTTP method '{}'", spec.method)))?;

    let path = fixture.render(&spec.path)?;

    let query = spec
        .query
        .iter()
        .map(|(name, value)| -> Result<(String, String)> {
            Ok((name.clone(), fixture.render(value)?))
        })
        .collect::<Result<Vec<_>>>()?;

    let body = match &spec.body {
        BodySpec::None => RequestBody::Empty,
        BodySpec::Fixture => RequestBody::Json(serde_json::to_value(fixture)?),
        BodySpec::Raw { text } => RequestBody::Raw(fixture.render(text)?),
        BodySpec::Json { value } => RequestBody::Json(render_value(value, fixture)?),
    };

    Ok(ApiRequest {
        method,
        path,
        query,
        body,
    })
}

/// Render placeholders in every string of a JSON value
fn render_value(value: &Value, fixture: &Fixture) -> Result<Value> {
    Ok(match value {
        Value::String(s) => Value::String(fixture.render(s)?),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|v| render_value(v, fixture))
                .collect::<Result<_>>()?,
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| -> Result<(String, Value)> {
                    Ok((k.clone(), render_value(v, fixture)?))
                })
                .collect::<Result<_>>()?,
        ),
        other => other.clone(),
    })
}

/// Check a response against a step's expectations
///
/// Checks run in a fixed order and stop at the first failure.
pub fn check_response(
    expect: &ResponseExpectation,
    response: &ApiResponse,
    fixture: &Fixture,
    schemas: &mut SchemaStore,
) -> Result<()> {
    if let Some(expected) = expect.status {
        if response.status != expected {
            return Err(Error::TestAssertion(format!(
                "Expected status {}, got {}. Body: '{}'",
                expected,
                response.status,
                truncate_for_display(&response.body, 200)
            )));
        }
    }

    if let Some(max_ms) = expect.max_time_ms {
        if response.elapsed >= Duration::from_millis(max_ms) {
            return Err(Error::TestAssertion(format!(
                "Expected response in under {} ms, took {} ms",
                max_ms,
                response.elapsed_ms()
            )));
        }
    }

    if let Some(expected_substr) = &expect.body_contains {
        if !response.body.contains(expected_substr.as_str()) {
            return Err(Error::TestAssertion(format!(
                "Body does not contain '{}'. Got: '{}'",
                expected_substr,
                truncate_for_display(&response.body, 200)
            )));
        }
    }

    let needs_json =
        expect.field_count.is_some() || !expect.fields.is_empty() || expect.schema.is_some();
    if !needs_json {
        return Ok(());
    }

    let body = response.json().map_err(|e| {
        Error::TestAssertion(format!(
            "Body is not JSON ({}): '{}'",
            e,
            truncate_for_display(&response.body, 200)
        ))
    })?;

    if let Some(expected_count) = expect.field_count {
        let actual = body.as_object().map(|o| o.len()).ok_or_else(|| {
            Error::TestAssertion(format!(
                "Expected a JSON object with {} fields, got {}",
                expected_count,
                JsonKind::of(&body).as_str()
            ))
        })?;
        if actual != expected_count {
            return Err(Error::TestAssertion(format!(
                "Expected {} top-level fields, got {}",
                expected_count, actual
            )));
        }
    }

    for assertion in &expect.fields {
        check_field(&body, assertion, fixture)?;
    }

    if let Some(schema) = &expect.schema {
        let violations = schemas.validate(schema, &body)?;
        if !violations.is_empty() {
            return Err(Error::TestAssertion(format!(
                "Body does not match schema '{}': {}",
                schema,
                violations.join("; ")
            )));
        }
    }

    Ok(())
}

fn check_field(body: &Value, assertion: &FieldAssertion, fixture: &Fixture) -> Result<()> {
    let actual = lookup(body, &assertion.path).ok_or_else(|| {
        Error::TestAssertion(format!("Field '{}' not found", assertion.path))
    })?;

    if let Some(kind) = assertion.kind {
        let actual_kind = JsonKind::of(actual);
        if actual_kind != kind {
            return Err(Error::TestAssertion(format!(
                "Field '{}': expected {}, got {} ({})",
                assertion.path,
                kind.as_str(),
                actual_kind.as_str(),
                actual
            )));
        }
    }

    if let Some(expected) = &assertion.equals {
        let expected = render_value(expected, fixture)?;
        if actual != &expected {
            return Err(Error::TestAssertion(format!(
                "Field '{}': expected {}, got {}",
                assertion.path, expected, actual
            )));
        }
    }

    Ok(())
}

/// Resolve a dotted path; numeric segments index into arrays
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
