use std::time::{Duration, Instant};

use log::info;
use uuid::Uuid;

use crate::BatchError;

use super::{build_name, step::Step};

type JobResult<T> = Result<T, BatchError>;

/// A runnable batch job: a sequence of steps executed in order.
pub trait Job {
    /// Runs the job and returns the execution details.
    ///
    /// Steps run in the order they were added; the first failing step
    /// aborts the job and surfaces a [`BatchError::Step`] naming it.
    fn run(&self) -> JobResult<JobExecution>;
}

/// Timing information for one job run.
#[derive(Debug)]
pub struct JobExecution {
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
}

/// A configured job, built through [`JobBuilder`].
pub struct JobInstance<'a> {
    id: Uuid,
    name: String,
    steps: Vec<&'a dyn Step>,
}

impl Job for JobInstance<'_> {
    fn run(&self) -> JobResult<JobExecution> {
        let start = Instant::now();

        info!("Start of job: {}, id: {}", self.name, self.id);

        for step in &self.steps {
            if step.execute().is_err() {
                return Err(BatchError::Step(step.get_name().to_owned()));
            }
        }

        info!("End of job: {}, id: {}", self.name, self.id);

        Ok(JobExecution {
            start,
            end: Instant::now(),
            duration: start.elapsed(),
        })
    }
}

/// Builder for [`JobInstance`].
#[derive(Default)]
pub struct JobBuilder<'a> {
    name: Option<String>,
    steps: Vec<&'a dyn Step>,
}

impl<'a> JobBuilder<'a> {
    pub fn new() -> Self {
        Self {
            name: None,
            steps: Vec::new(),
        }
    }

    pub fn name(mut self, name: String) -> JobBuilder<'a> {
        self.name = Some(name);
        self
    }

    /// Sets the first step of the job. Semantically identical to `next()`,
    /// reads better for the initial step.
    pub fn start(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    pub fn next(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    /// Builds the job; a random name is generated if none was provided.
    pub fn build(self) -> JobInstance<'a> {
        JobInstance {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_else(build_name),
            steps: self.steps,
        }
    }
}
