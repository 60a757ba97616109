//! The five durable queue topics (spec §4.12).

use recall_core::config::JobsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobTopic {
    Embedding,
    BatchImport,
    Consolidation,
    Clustering,
    Decay,
}

impl JobTopic {
    pub const ALL: [JobTopic; 5] =
        [JobTopic::Embedding, JobTopic::BatchImport, JobTopic::Consolidation, JobTopic::Clustering, JobTopic::Decay];

    pub fn as_str(self) -> &'static str {
        match self {
            JobTopic::Embedding => "embedding",
            JobTopic::BatchImport => "batch-import",
            JobTopic::Consolidation => "consolidation",
            JobTopic::Clustering => "clustering",
            JobTopic::Decay => "decay",
        }
    }

    pub fn parse(s: &str) -> Option<JobTopic> {
        match s {
            "embedding" => Some(JobTopic::Embedding),
            "batch-import" => Some(JobTopic::BatchImport),
            "consolidation" => Some(JobTopic::Consolidation),
            "clustering" => Some(JobTopic::Clustering),
            "decay" => Some(JobTopic::Decay),
            _ => None,
        }
    }

    /// How many jobs of this topic may run concurrently, per `JobsConfig`.
    pub fn concurrency(self, jobs: &JobsConfig) -> usize {
        match self {
            JobTopic::Embedding => jobs.embedding_concurrency,
            JobTopic::BatchImport => jobs.batch_concurrency,
            JobTopic::Consolidation => jobs.consolidation_concurrency,
            JobTopic::Clustering => jobs.clustering_concurrency,
            JobTopic::Decay => jobs.decay_concurrency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for topic in JobTopic::ALL {
            assert_eq!(JobTopic::parse(topic.as_str()), Some(topic));
        }
    }
}
