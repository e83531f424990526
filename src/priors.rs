use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ModelError, Result};
use crate::vocabulary::Vocabulary;

/// A named topic and the seed words it is steered toward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicPrior {
    pub name: String,
    pub seeds: Vec<(String, f64)>,  // Seed word and its reserved probability mass
}

impl TopicPrior {
    pub fn new<S: Into<String>>(name: S, seeds: &[(&str, f64)]) -> Self {
        TopicPrior {
            name: name.into(),
            seeds: seeds.iter().map(|(word, weight)| (word.to_string(), *weight)).collect(),
        }
    }

    pub fn seed_mass(&self) -> f64 {
        self.seeds.iter().map(|(_, weight)| weight).sum()
    }

    /// Probability mass left for words learned from the data.
    pub fn free_mass(&self) -> f64 {
        1.0 - self.seed_mass()
    }
}

/// What to do with a seed word that never occurs in the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingSeedPolicy {
    #[default]
    Reject,
    Skip,
}

/// The ordered topic set handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicPriors {
    topics: Vec<TopicPrior>,
}

impl TopicPriors {
    pub fn new(topics: Vec<TopicPrior>) -> Result<Self> {
        let priors = TopicPriors { topics };
        priors.validate()?;
        Ok(priors)
    }

    /// Hand-picked themes for song lyrics.
    pub fn songs() -> Self {
        TopicPriors {
            topics: vec![
                TopicPrior::new("Love", &[("love", 0.2), ("heart", 0.05), ("hate", 0.025)]),
                TopicPrior::new("Sex", &[("sex", 0.1), ("ass", 0.05), ("pussy", 0.05), ("dick", 0.05)]),
                TopicPrior::new("Fun", &[("fun", 0.05), ("dance", 0.05), ("smile", 0.05)]),
                TopicPrior::new(
                    "Drugs",
                    &[("drugs", 0.05), ("drink", 0.05), ("smoke", 0.05), ("beer", 0.05), ("drunk", 0.05), ("high", 0.05)],
                ),
                TopicPrior::new("Christmas", &[("christmas", 0.25), ("santa", 0.15), ("tree", 0.05), ("winter", 0.05)]),
                TopicPrior::new(
                    "Sports",
                    &[("sports", 0.1), ("basketball", 0.05), ("baseball", 0.05), ("hoop", 0.05), ("nba", 0.05)],
                ),
                TopicPrior::new("Religion", &[("god", 0.2), ("bible", 0.1), ("heaven", 0.05)]),
                TopicPrior::new("Wealth", &[("money", 0.2), ("rich", 0.1)]),
                TopicPrior::new("Other", &[]),
            ],
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let topics: Vec<TopicPrior> = serde_json::from_str(&raw)?;
        Self::new(topics)
    }

    pub fn validate(&self) -> Result<()> {
        if self.topics.is_empty() {
            return Err(ModelError::InvalidPriors("no topics defined".to_string()));
        }

        let mut names = HashSet::new();
        for topic in &self.topics {
            if !names.insert(topic.name.as_str()) {
                return Err(ModelError::InvalidPriors(format!("duplicate topic '{}'", topic.name)));
            }

            let mut words = HashSet::new();
            for (word, weight) in &topic.seeds {
                if !words.insert(word.as_str()) {
                    return Err(ModelError::InvalidPriors(format!(
                        "seed word '{}' listed twice in topic '{}'",
                        word, topic.name
                    )));
                }
                if !weight.is_finite() || *weight < 0.0 || *weight >= 1.0 {
                    return Err(ModelError::InvalidPriors(format!(
                        "seed weight {} for '{}' in topic '{}' is outside [0, 1)",
                        weight, word, topic.name
                    )));
                }
            }

            if topic.seed_mass() >= 1.0 {
                return Err(ModelError::InvalidPriors(format!(
                    "seed weights of topic '{}' sum to {} and leave no free mass",
                    topic.name,
                    topic.seed_mass()
                )));
            }
        }

        Ok(())
    }

    pub fn topics(&self) -> &[TopicPrior] {
        &self.topics
    }

    pub fn names(&self) -> Vec<&str> {
        self.topics.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Maps every seed word onto its vocabulary column.
    ///
    /// Runs before initialization so a bad seed table never reaches the EM loop.
    pub fn resolve(
        &self,
        vocabulary: &Vocabulary,
        policy: MissingSeedPolicy,
    ) -> Result<ResolvedPriors> {
        self.validate()?;

        let mut names = Vec::with_capacity(self.topics.len());
        let mut seeds = Vec::with_capacity(self.topics.len());
        let mut free_mass = Vec::with_capacity(self.topics.len());

        for topic in &self.topics {
            let mut resolved = Vec::with_capacity(topic.seeds.len());
            for (word, weight) in &topic.seeds {
                match (vocabulary.index_of(word), policy) {
                    (Some(word_id), _) => resolved.push((word_id, *weight)),
                    (None, MissingSeedPolicy::Skip) => {
                        warn!(topic = %topic.name, word = %word, "Skipping seed word absent from corpus");
                    }
                    (None, MissingSeedPolicy::Reject) => {
                        return Err(ModelError::MissingSeedWord {
                            topic: topic.name.clone(),
                            word: word.clone(),
                        });
                    }
                }
            }

            let seed_mass: f64 = resolved.iter().map(|(_, weight)| weight).sum();
            names.push(topic.name.clone());
            seeds.push(resolved);
            free_mass.push(1.0 - seed_mass);
        }

        Ok(ResolvedPriors { names, seeds, free_mass })
    }
}

impl Default for TopicPriors {
    fn default() -> Self {
        Self::songs()
    }
}

/// Topic priors bound to one vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPriors {
    pub names: Vec<String>,
    pub seeds: Vec<Vec<(usize, f64)>>,  // Per topic: (word index, seed weight)
    pub free_mass: Vec<f64>,
}

impl ResolvedPriors {
    pub fn num_topics(&self) -> usize {
        self.names.len()
    }
}
