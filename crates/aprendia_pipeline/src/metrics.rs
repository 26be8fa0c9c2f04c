//! Counters for pipeline jobs.
//!
//! Counts are always kept in process so the HTTP layer can report them. With
//! the `metrics` feature the same events are also recorded on OpenTelemetry
//! counters from the global meter provider.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "metrics")]
use opentelemetry::{KeyValue, global, metrics::Counter};

/// Kind of pipeline job, used as a metric attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Chapter,
    Quiz,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Chapter => "chapter",
            JobKind::Quiz => "quiz",
        }
    }
}

/// Point-in-time copy of [`JobMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMetricsSnapshot {
    pub jobs_started: u64,
    pub jobs_succeeded: u64,
    pub jobs_failed: u64,
    pub sentence_pairs_created: u64,
    pub audio_files_written: u64,
}

impl JobMetricsSnapshot {
    /// Jobs started but not yet finished.
    pub fn jobs_in_flight(&self) -> u64 {
        self.jobs_started
            .saturating_sub(self.jobs_succeeded + self.jobs_failed)
    }
}

#[cfg(feature = "metrics")]
#[derive(Clone)]
struct OtelCounters {
    jobs_started: Counter<u64>,
    jobs_succeeded: Counter<u64>,
    jobs_failed: Counter<u64>,
    sentence_pairs: Counter<u64>,
    audio_files: Counter<u64>,
}

#[cfg(feature = "metrics")]
impl std::fmt::Debug for OtelCounters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtelCounters").finish_non_exhaustive()
    }
}

#[cfg(feature = "metrics")]
impl OtelCounters {
    fn new() -> Self {
        let meter = global::meter("aprendia_pipeline");
        tracing::debug!("Building pipeline metrics instruments");
        Self {
            jobs_started: meter
                .u64_counter("pipeline.jobs.started")
                .with_description("Pipeline jobs started")
                .build(),
            jobs_succeeded: meter
                .u64_counter("pipeline.jobs.succeeded")
                .with_description("Pipeline jobs finished without error")
                .build(),
            jobs_failed: meter
                .u64_counter("pipeline.jobs.failed")
                .with_description("Pipeline jobs that recorded an error")
                .build(),
            sentence_pairs: meter
                .u64_counter("pipeline.sentence_pairs")
                .with_description("Sentence pairs created")
                .build(),
            audio_files: meter
                .u64_counter("pipeline.audio_files")
                .with_description("Audio artifacts written")
                .build(),
        }
    }
}

/// Job counters shared by every pipeline job.
#[derive(Debug, Default)]
pub struct JobMetrics {
    jobs_started: AtomicU64,
    jobs_succeeded: AtomicU64,
    jobs_failed: AtomicU64,
    sentence_pairs_created: AtomicU64,
    audio_files_written: AtomicU64,
    #[cfg(feature = "metrics")]
    otel: Option<OtelCounters>,
}

impl JobMetrics {
    /// Creates metrics, registering OpenTelemetry instruments when enabled.
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "metrics")]
            otel: Some(OtelCounters::new()),
            ..Self::default()
        }
    }

    pub fn job_started(&self, kind: JobKind) {
        self.jobs_started.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "metrics")]
        if let Some(otel) = &self.otel {
            otel.jobs_started
                .add(1, &[KeyValue::new("kind", kind.as_str())]);
        }
        #[cfg(not(feature = "metrics"))]
        let _ = kind;
    }

    pub fn job_succeeded(&self, kind: JobKind) {
        self.jobs_succeeded.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "metrics")]
        if let Some(otel) = &self.otel {
            otel.jobs_succeeded
                .add(1, &[KeyValue::new("kind", kind.as_str())]);
        }
        #[cfg(not(feature = "metrics"))]
        let _ = kind;
    }

    pub fn job_failed(&self, kind: JobKind) {
        self.jobs_failed.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "metrics")]
        if let Some(otel) = &self.otel {
            otel.jobs_failed
                .add(1, &[KeyValue::new("kind", kind.as_str())]);
        }
        #[cfg(not(feature = "metrics"))]
        let _ = kind;
    }

    pub fn sentence_pair_created(&self) {
        self.sentence_pairs_created.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "metrics")]
        if let Some(otel) = &self.otel {
            otel.sentence_pairs.add(1, &[]);
        }
    }

    pub fn audio_file_written(&self) {
        self.audio_files_written.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "metrics")]
        if let Some(otel) = &self.otel {
            otel.audio_files.add(1, &[]);
        }
    }

    pub fn snapshot(&self) -> JobMetricsSnapshot {
        JobMetricsSnapshot {
            jobs_started: self.jobs_started.load(Ordering::Relaxed),
            jobs_succeeded: self.jobs_succeeded.load(Ordering::Relaxed),
            jobs_failed: self.jobs_failed.load(Ordering::Relaxed),
            sentence_pairs_created: self.sentence_pairs_created.load(Ordering::Relaxed),
            audio_files_written: self.audio_files_written.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_events() {
        let metrics = JobMetrics::new();
        metrics.job_started(JobKind::Chapter);
        metrics.job_started(JobKind::Quiz);
        metrics.job_succeeded(JobKind::Chapter);
        metrics.sentence_pair_created();
        metrics.audio_file_written();
        metrics.audio_file_written();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.jobs_started, 2);
        assert_eq!(snapshot.jobs_succeeded, 1);
        assert_eq!(snapshot.jobs_failed, 0);
        assert_eq!(snapshot.jobs_in_flight(), 1);
        assert_eq!(snapshot.audio_files_written, 2);
    }

    #[test]
    fn snapshot_serializes_flat() {
        let json = serde_json::to_value(JobMetrics::new().snapshot()).unwrap();
        assert_eq!(json["jobs_failed"], 0);
        assert_eq!(json["sentence_pairs_created"], 0);
    }
}
