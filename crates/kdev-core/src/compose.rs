//! Environment composer
//!
//! Expands an environment or wizard into a linear plan and runs it in
//! declared order: namespace, members, then feature toggles. A failing step
//! is reported and the plan continues; nothing is rolled back.

use crate::catalog::{Catalog, EnvironmentSpec, WizardSpec, WizardStep};
use crate::errors::Result;
use crate::features::{enable_feature, Feature};
use crate::kube::{apply_manifest, ensure_namespace, NamespaceOutcome};
use crate::render::render_component;
use crate::report::Reporter;
use crate::runtime::ClusterRuntime;
use crate::{log_op_end, log_op_start};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    CreateNamespace { namespace: String },
    Deploy { component: String, namespace: String },
    Feature(Feature),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::CreateNamespace { namespace } => write!(f, "namespace {}", namespace),
            Step::Deploy {
                component,
                namespace,
            } => write!(f, "{} in {}", component, namespace),
            Step::Feature(feature) => write!(f, "feature {}", feature),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub title: String,
    pub steps: Vec<Step>,
}

impl Plan {
    /// `namespace` overrides the environment's default
    pub fn for_environment(env: &EnvironmentSpec, namespace: Option<&str>) -> Self {
        let mut plan = Plan {
            title: format!("{} environment", env.name),
            steps: Vec::new(),
        };
        plan.push_environment(env, namespace);
        plan
    }

    /// Expand a wizard; a namespace, if given, applies to every environment
    ///
    /// # Errors
    ///
    /// `UnknownEnvironment` if a step names an unregistered environment.
    pub fn for_wizard(catalog: &Catalog, wizard: &WizardSpec, namespace: Option<&str>) -> Result<Self> {
        let mut plan = Plan {
            title: format!("{} wizard", wizard.name),
            steps: Vec::new(),
        };
        for step in &wizard.steps {
            match step {
                WizardStep::Environment(name) => {
                    plan.push_environment(catalog.environment(name)?, namespace)
                }
                WizardStep::Feature(feature) => plan.steps.push(Step::Feature(*feature)),
            }
        }
        Ok(plan)
    }

    fn push_environment(&mut self, env: &EnvironmentSpec, namespace: Option<&str>) {
        let namespace = namespace.unwrap_or(&env.namespace).to_string();
        self.steps.push(Step::CreateNamespace {
            namespace: namespace.clone(),
        });
        self.steps
            .extend(env.components.iter().map(|component| Step::Deploy {
                component: component.clone(),
                namespace: namespace.clone(),
            }));
        self.steps
            .extend(env.features.iter().map(|f| Step::Feature(*f)));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionState {
    NotStarted,
    Running,
    /// Every step was attempted
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Succeeded,
    /// Downgraded failure such as AlreadyExists
    Warned,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: Step,
    pub status: StepStatus,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionReport {
    pub title: String,
    pub state: CompositionState,
    pub outcomes: Vec<StepOutcome>,
}

impl CompositionReport {
    pub fn count(&self, status: StepStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == StepStatus::Failed)
    }
}

pub struct Composer<'a> {
    runtime: &'a dyn ClusterRuntime,
    catalog: &'a Catalog,
    reporter: &'a dyn Reporter,
    state: CompositionState,
}

impl<'a> Composer<'a> {
    pub fn new(
        runtime: &'a dyn ClusterRuntime,
        catalog: &'a Catalog,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            runtime,
            catalog,
            reporter,
            state: CompositionState::NotStarted,
        }
    }

    pub fn state(&self) -> CompositionState {
        self.state
    }

    /// Run every step of the plan in order
    pub fn execute(&mut self, plan: &Plan) -> CompositionReport {
        let start = Instant::now();
        log_op_start!("compose", plan = %plan.title, step_count = plan.steps.len());
        self.state = CompositionState::Running;
        self.reporter.info(&format!("Setting up {}", plan.title));

        let outcomes: Vec<StepOutcome> = plan
            .steps
            .iter()
            .map(|step| {
                let outcome = self.run_step(step);
                match outcome.status {
                    StepStatus::Succeeded => self.reporter.success(&format!("{} ready", step)),
                    StepStatus::Warned => self.reporter.warn(&format!(
                        "{}: {}",
                        step,
                        outcome.message.as_deref().unwrap_or("already present")
                    )),
                    StepStatus::Failed => self.reporter.warn(&format!(
                        "{} failed, continuing: {}",
                        step,
                        outcome.message.as_deref().unwrap_or("unknown error")
                    )),
                }
                outcome
            })
            .collect();

        self.state = CompositionState::Completed;
        let report = CompositionReport {
            title: plan.title.clone(),
            state: self.state,
            outcomes,
        };
        let failed = report.count(StepStatus::Failed);
        if failed == 0 {
            self.reporter.success(&format!("{} complete", plan.title));
        } else {
            let names: Vec<String> = report.failures().map(|o| o.step.to_string()).collect();
            self.reporter.warn(&format!(
                "{} finished with {} failed step(s): {}",
                plan.title,
                failed,
                names.join(", ")
            ));
        }
        log_op_end!(
            "compose",
            duration_ms = start.elapsed().as_millis() as u64,
            plan = %plan.title,
            step_count = report.outcomes.len(),
            failed_count = failed
        );
        report
    }

    fn run_step(&self, step: &Step) -> StepOutcome {
        let result = match step {
            Step::CreateNamespace { namespace } => {
                ensure_namespace(self.runtime, namespace).map(|outcome| match outcome {
                    NamespaceOutcome::Created => None,
                    NamespaceOutcome::AlreadyExisted => {
                        Some(format!("namespace {} already exists", namespace))
                    }
                })
            }
            Step::Deploy {
                component,
                namespace,
            } => render_component(self.catalog, component, Some(namespace), &BTreeMap::new())
                .and_then(|manifest| apply_manifest(self.runtime, &manifest.body))
                .map(|_| None),
            Step::Feature(feature) => enable_feature(self.runtime, *feature)
                .map(|warnings| (!warnings.is_empty()).then(|| warnings.join("; "))),
        };

        match result {
            Ok(None) => StepOutcome {
                step: step.clone(),
                status: StepStatus::Succeeded,
                message: None,
            },
            Ok(Some(warning)) => StepOutcome {
                step: step.clone(),
                status: StepStatus::Warned,
                message: Some(warning),
            },
            Err(e) => {
                tracing::warn!(step = %step, error = %e, "composition step failed");
                StepOutcome {
                    step: step.clone(),
                    status: StepStatus::Failed,
                    message: Some(e.to_string()),
                }
            }
        }
    }
}
