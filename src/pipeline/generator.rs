//! Input generation: (year, month) periods rendered into URLs

use async_channel::Sender;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::observability::Metrics;
use crate::tasks::{Task, TaskFactory};

pub const MONTHS_PER_YEAR: u8 = 12;

/// One source file in the generated range
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period {
    pub year: u16,
    pub month: u8,
}

/// Inclusive year range, twelve months per year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRange {
    start_year: u16,
    end_year: u16,
}

impl PeriodRange {
    pub fn new(start_year: u16, end_year: u16) -> Self {
        Self {
            start_year,
            end_year,
        }
    }

    /// Number of periods, zero for an inverted range
    pub fn len(&self) -> usize {
        if self.start_year > self.end_year {
            return 0;
        }
        (self.end_year - self.start_year + 1) as usize * MONTHS_PER_YEAR as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Periods in (year, month) order, year outer
    pub fn periods(self) -> impl Iterator<Item = Period> + Send + 'static {
        (self.start_year..=self.end_year)
            .flat_map(|year| (1..=MONTHS_PER_YEAR).map(move |month| Period { year, month }))
    }
}

/// URL template with `{year}` and `{month}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub const YEAR: &'static str = "{year}";
    pub const MONTH: &'static str = "{month}";

    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Four-digit year, zero-padded two-digit month
    pub fn render(&self, period: Period) -> String {
        self.0
            .replace(Self::YEAR, &format!("{:04}", period.year))
            .replace(Self::MONTH, &format!("{:02}", period.month))
    }

    /// Every URL of `range`, in production order
    pub fn urls(self, range: PeriodRange) -> impl Iterator<Item = String> + Send + 'static {
        range.periods().map(move |period| self.render(period))
    }
}

/// Feed one task per input into the input handoff, then close it
///
/// Each push suspends while the handoff is full. The handoff is closed
/// explicitly once the last input has been pushed.
pub(crate) async fn generate<I>(
    inputs: I,
    factory: Arc<dyn TaskFactory>,
    input: Sender<Box<dyn Task>>,
    metrics: Arc<Metrics>,
) where
    I: Iterator<Item = String> + Send,
{
    let mut produced = 0u64;

    for url in inputs {
        let task = factory.make(url);
        if input.send(task).await.is_err() {
            warn!(produced, "Input handoff closed before generation finished");
            break;
        }
        produced += 1;
        metrics.task_generated();
    }

    input.close();
    debug!(produced, "Generator finished");
}
