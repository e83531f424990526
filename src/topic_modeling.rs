use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzer::{Analyzer, BagOfWords};
use crate::convergence::{Convergence, StopReason};
use crate::error::{ModelError, Result};
use crate::labeling;
use crate::priors::{MissingSeedPolicy, ResolvedPriors, TopicPriors};
use crate::term_doc::TermDocMatrix;
use crate::vocabulary::Vocabulary;

/// Added (times the seed weight) to each seed cell before the first
/// normalization so seed words dominate the starting topic-word rows.
pub const INIT_SEED_BOOST: f64 = 1000.0;

#[derive(Debug, Clone)]
pub struct PlsaConfig {
    pub max_iterations: usize,
    pub epsilon: f64,
    pub time_cutoff: Duration,
    pub seed: Option<u64>,  // None draws from OS entropy
    pub missing_seeds: MissingSeedPolicy,
}

impl Default for PlsaConfig {
    fn default() -> Self {
        PlsaConfig {
            max_iterations: 100,
            epsilon: 0.001,
            time_cutoff: Duration::from_secs(5 * 60 * 60),
            seed: None,
            missing_seeds: MissingSeedPolicy::Reject,
        }
    }
}

impl PlsaConfig {
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn time_cutoff(mut self, cutoff: Duration) -> Self {
        self.time_cutoff = cutoff;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn missing_seeds(mut self, policy: MissingSeedPolicy) -> Self {
        self.missing_seeds = policy;
        self
    }

    pub fn convergence(&self) -> Convergence {
        Convergence {
            max_iterations: self.max_iterations,
            epsilon: self.epsilon,
            time_cutoff: self.time_cutoff,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub iterations: usize,
    pub stop_reason: StopReason,
    pub log_likelihood: Option<f64>,  // None when no iteration ran
    pub likelihood_trace: Vec<f64>,
    pub elapsed: Duration,
}

/// P(z | d, w), stored flat as documents x topics x vocabulary.
#[derive(Debug, Clone)]
pub struct Posterior {
    data: Vec<f64>,
    num_topics: usize,
    vocab_size: usize,
}

impl Posterior {
    fn zeros(num_documents: usize, num_topics: usize, vocab_size: usize) -> Self {
        Posterior {
            data: vec![0.0; num_documents * num_topics * vocab_size],
            num_topics,
            vocab_size,
        }
    }

    #[inline]
    fn offset(&self, doc_id: usize, topic: usize, word_id: usize) -> usize {
        (doc_id * self.num_topics + topic) * self.vocab_size + word_id
    }

    pub fn get(&self, doc_id: usize, topic: usize, word_id: usize) -> f64 {
        self.data[self.offset(doc_id, topic, word_id)]
    }
}

/// PLSA whose topic-word rows are continually steered toward seed words.
#[derive(Debug, Clone)]
pub struct PlsaModel {
    vocabulary: Vocabulary,
    term_doc: TermDocMatrix,
    priors: ResolvedPriors,
    document_topic: Vec<Vec<f64>>,  // Documents x Topics, P(z | d)
    topic_word: Vec<Vec<f64>>,      // Topics x Words, P(w | z)
    posterior: Posterior,
}

impl PlsaModel {
    /// Builds vocabulary and counts, binds the priors, then draws the
    /// initial distributions from `rng`.
    pub fn new<R: Rng>(
        documents: &[BagOfWords],
        priors: &TopicPriors,
        policy: MissingSeedPolicy,
        rng: &mut R,
    ) -> Result<Self> {
        if documents.is_empty() {
            return Err(ModelError::EmptyCorpus);
        }

        let vocabulary = Vocabulary::build(documents);
        if vocabulary.is_empty() {
            return Err(ModelError::EmptyCorpus);
        }

        let term_doc = TermDocMatrix::build(documents, &vocabulary)?;
        let priors = priors.resolve(&vocabulary, policy)?;

        let num_documents = term_doc.num_documents();
        let num_topics = priors.num_topics();
        let vocab_size = vocabulary.len();

        let mut model = PlsaModel {
            vocabulary,
            term_doc,
            priors,
            document_topic: vec![vec![0.0; num_topics]; num_documents],
            topic_word: vec![vec![0.0; vocab_size]; num_topics],
            posterior: Posterior::zeros(num_documents, num_topics, vocab_size),
        };
        model.initialize(rng)?;
        Ok(model)
    }

    fn initialize<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        for row in self.document_topic.iter_mut() {
            for cell in row.iter_mut() {
                *cell = rng.gen::<f64>();
            }
        }
        normalize_rows(&mut self.document_topic, None, "initial document-topic")?;

        for (topic, row) in self.topic_word.iter_mut().enumerate() {
            for cell in row.iter_mut() {
                *cell = rng.gen::<f64>();
            }
            for &(word_id, weight) in &self.priors.seeds[topic] {
                row[word_id] += weight * INIT_SEED_BOOST;
            }
        }
        normalize_rows(&mut self.topic_word, None, "initial topic-word")
    }

    /// E-step: P(z | d, w) proportional to P(z | d) * P(w | z).
    pub fn expectation_step(&mut self) -> Result<()> {
        let num_topics = self.num_topics();
        let vocab_size = self.vocab_size();

        for doc_id in 0..self.num_documents() {
            for word_id in 0..vocab_size {
                let mut total = 0.0;
                for topic in 0..num_topics {
                    let p = self.document_topic[doc_id][topic] * self.topic_word[topic][word_id];
                    let offset = self.posterior.offset(doc_id, topic, word_id);
                    self.posterior.data[offset] = p;
                    total += p;
                }

                if !(total > 0.0) {
                    return Err(ModelError::ZeroTopicSlice {
                        document: doc_id,
                        term: word_id,
                    });
                }

                for topic in 0..num_topics {
                    let offset = self.posterior.offset(doc_id, topic, word_id);
                    self.posterior.data[offset] /= total;
                }
            }
        }

        Ok(())
    }

    /// M-step: re-estimate both distributions from count-weighted
    /// posteriors, then inject the seed weights into the topic-word rows.
    pub fn maximization_step(&mut self) -> Result<()> {
        let num_topics = self.num_topics();
        let vocab_size = self.vocab_size();

        for row in self.document_topic.iter_mut() {
            row.iter_mut().for_each(|cell| *cell = 0.0);
        }
        for row in self.topic_word.iter_mut() {
            row.iter_mut().for_each(|cell| *cell = 0.0);
        }

        for doc_id in 0..self.num_documents() {
            for word_id in 0..vocab_size {
                let count = self.term_doc.get(doc_id, word_id);
                if count == 0.0 {
                    continue;
                }
                for topic in 0..num_topics {
                    let weighted = count * self.posterior.get(doc_id, topic, word_id);
                    self.document_topic[doc_id][topic] += weighted;
                    self.topic_word[topic][word_id] += weighted;
                }
            }
        }

        normalize_rows(&mut self.document_topic, None, "document-topic")?;
        normalize_rows(&mut self.topic_word, Some(self.priors.free_mass.as_slice()), "topic-word")?;

        for (topic, seeds) in self.priors.seeds.iter().enumerate() {
            for &(word_id, weight) in seeds {
                self.topic_word[topic][word_id] += weight;
            }
        }

        Ok(())
    }

    /// Sum over cells of count * log((P(z|d) . P(w|z))[d, w]).
    ///
    /// Zero-count cells contribute nothing; a positive count on a
    /// zero-probability cell is a degeneracy.
    pub fn log_likelihood(&self) -> Result<f64> {
        let mut likelihood = 0.0;

        for (doc_id, counts) in self.term_doc.rows().iter().enumerate() {
            for (word_id, &count) in counts.iter().enumerate() {
                if count == 0.0 {
                    continue;
                }
                let p: f64 = self.document_topic[doc_id]
                    .iter()
                    .zip(self.topic_word.iter())
                    .map(|(p_topic, row)| p_topic * row[word_id])
                    .sum();
                if !(p > 0.0) {
                    return Err(ModelError::NumericDegeneracy {
                        document: doc_id,
                        term: word_id,
                    });
                }
                likelihood += count * p.ln();
            }
        }

        Ok(likelihood)
    }

    /// Alternates E and M steps until a stopping rule fires.
    ///
    /// The model keeps the state of the last completed iteration.
    pub fn run(&mut self, rules: &Convergence) -> Result<FitReport> {
        info!(
            documents = self.num_documents(),
            vocabulary = self.vocab_size(),
            topics = self.num_topics(),
            max_iterations = rules.max_iterations,
            "Starting EM"
        );

        let start = Instant::now();
        let mut current = f64::NEG_INFINITY;
        let mut trace = Vec::new();
        let mut stop_reason = StopReason::MaxIterations;

        for iteration in 0..rules.max_iterations {
            self.expectation_step()?;
            self.maximization_step()?;

            let previous = current;
            current = self.log_likelihood()?;
            trace.push(current);
            debug!(
                iteration = iteration + 1,
                log_likelihood = current,
                improvement = current - previous,
                "Iteration complete"
            );

            if let Some(reason) = rules.check(iteration + 1, previous, current, start.elapsed()) {
                stop_reason = reason;
                break;
            }
        }

        let report = FitReport {
            iterations: trace.len(),
            stop_reason,
            log_likelihood: trace.last().copied(),
            likelihood_trace: trace,
            elapsed: start.elapsed(),
        };
        info!(
            iterations = report.iterations,
            stop_reason = ?report.stop_reason,
            log_likelihood = ?report.log_likelihood,
            "EM finished"
        );
        Ok(report)
    }

    /// Multi-label topic assignment per document.
    pub fn labels(&self) -> Vec<String> {
        labeling::label_documents(&self.document_topic, &self.priors.names)
    }

    /// Words of one topic ranked by weight, heaviest first.
    pub fn ranked_words(&self, topic: usize) -> Vec<(&str, f64)> {
        let mut words: Vec<(&str, f64)> = self
            .vocabulary
            .terms()
            .iter()
            .map(String::as_str)
            .zip(self.topic_word[topic].iter().copied())
            .collect();
        words.sort_by(|a, b| b.1.total_cmp(&a.1));
        words
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn term_doc(&self) -> &TermDocMatrix {
        &self.term_doc
    }

    pub fn priors(&self) -> &ResolvedPriors {
        &self.priors
    }

    pub fn topic_names(&self) -> &[String] {
        &self.priors.names
    }

    pub fn document_topic(&self) -> &[Vec<f64>] {
        &self.document_topic
    }

    pub fn topic_word(&self) -> &[Vec<f64>] {
        &self.topic_word
    }

    pub fn posterior(&self) -> &Posterior {
        &self.posterior
    }

    pub fn num_documents(&self) -> usize {
        self.document_topic.len()
    }

    pub fn num_topics(&self) -> usize {
        self.topic_word.len()
    }

    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Scales each row to sum to 1, or to `targets[row]` when given.
fn normalize_rows(
    matrix: &mut [Vec<f64>],
    targets: Option<&[f64]>,
    context: &'static str,
) -> Result<()> {
    for (row_id, row) in matrix.iter_mut().enumerate() {
        let sum: f64 = row.iter().sum();
        if !(sum > 0.0) {
            return Err(ModelError::InvariantViolation { context, row: row_id });
        }
        let target = targets.map_or(1.0, |t| t[row_id]);
        row.iter_mut().for_each(|cell| *cell = *cell / sum * target);
    }
    Ok(())
}

/// Runs the whole pipeline: analyze, build, initialize, iterate.
pub struct PriorPlsa {
    config: PlsaConfig,
    priors: TopicPriors,
}

impl PriorPlsa {
    pub fn new(config: PlsaConfig, priors: TopicPriors) -> Self {
        PriorPlsa { config, priors }
    }

    pub fn fit<A: Analyzer + ?Sized>(
        &self,
        texts: &[String],
        analyzer: &A,
    ) -> Result<(PlsaModel, FitReport)> {
        let documents: Vec<BagOfWords> = texts.iter().map(|text| analyzer.analyze(text)).collect();
        self.fit_documents(&documents)
    }

    pub fn fit_documents(&self, documents: &[BagOfWords]) -> Result<(PlsaModel, FitReport)> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let policy = self.config.missing_seeds;
        let mut model = PlsaModel::new(documents, &self.priors, policy, &mut rng)?;
        let report = model.run(&self.config.convergence())?;
        Ok((model, report))
    }
}
