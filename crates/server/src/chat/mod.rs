//! Rule-based chat responder
//!
//! A message first runs through the keyword routes in [`dispatch`]; when none
//! matches, the bag-of-words scorer in [`fallback`] picks a canned reply from
//! the intent corpus.

mod dispatch;
pub mod fallback;
pub mod medicine;
pub mod names;

use std::sync::{Arc, Mutex, PoisonError};

use clinic_core::{ClinicDb, ClinicError, IntentCorpus};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::db::ClinicRepository;
use dispatch::{Query, ROUTES};
use fallback::FALLBACK_REPLY;
use names::{ExactTokenMatcher, NameMatcher};

pub use dispatch::{ASK_FOR_NAME, AUTO_PRESCRIPTION_NOTES};
pub use medicine::USAGE_HINT;

/// Answers free-text messages from the clinic store and the intent corpus
pub struct Responder {
    repo: Arc<dyn ClinicRepository>,
    corpus: IntentCorpus,
    names: Box<dyn NameMatcher>,
    rng: Mutex<StdRng>,
}

impl Responder {
    /// Create a responder with exact-token name matching and an entropy-seeded RNG
    pub fn new(repo: Arc<dyn ClinicRepository>, corpus: IntentCorpus) -> Self {
        Self {
            repo,
            corpus,
            names: Box::new(ExactTokenMatcher),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seed response selection so replies are reproducible
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Replace how patient names are found in messages
    pub fn with_name_matcher(mut self, matcher: impl NameMatcher + 'static) -> Self {
        self.names = Box::new(matcher);
        self
    }

    pub fn corpus(&self) -> &IntentCorpus {
        &self.corpus
    }

    pub(crate) fn names(&self) -> &dyn NameMatcher {
        self.names.as_ref()
    }

    pub(crate) fn repository(&self) -> &dyn ClinicRepository {
        self.repo.as_ref()
    }

    /// Check that the backing store can be read
    pub fn check_store(&self) -> Result<(), ClinicError> {
        self.repo.load().map(|_| ())
    }

    /// Produce the reply for one message.
    ///
    /// Missing patients, prescriptions or medicines are answered in plain text;
    /// only store failures are returned as errors.
    pub fn respond(&self, message: &str) -> Result<String, ClinicError> {
        let mut db = self.repo.load()?;
        let query = Query::new(message);

        if let Some(route) = ROUTES.iter().find(|route| (route.matches)(&query)) {
            tracing::debug!(route = route.name, "Dispatching chat message");
            metrics::counter!("chat_replies_total", "route" => route.name).increment(1);
            return (route.handle)(self, &mut db, &query);
        }

        metrics::counter!("chat_replies_total", "route" => "fallback").increment(1);
        Ok(self.fallback(&db, message))
    }

    fn fallback(&self, db: &ClinicDb, message: &str) -> String {
        let Some((intent, score)) = fallback::best_intent(&self.corpus, message) else {
            return FALLBACK_REPLY.to_string();
        };
        tracing::debug!(intent = %intent.tag, score, "Matched fallback intent");

        // RNG state is still usable after a panic elsewhere
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        match intent.responses.choose(&mut *rng) {
            Some(response) => db.stats().fill(response),
            None => FALLBACK_REPLY.to_string(),
        }
    }
}
