//! Exercise text and reading-test generation.
//!
//! Generators may be slow (an external command) so the UI never calls them
//! directly; it goes through [`GenerationWorker`], which runs each request on
//! its own thread and hands back only the answer to the latest request.

use std::collections::HashSet;
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use cgisf_lib::cgisf;
use itertools::Itertools;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::stimulus::{LanguagePack, SupportedLanguage};

pub const READING_TEST_WORDS: usize = 500;
pub const QUIZ_QUESTIONS: usize = 10;
pub const QUIZ_OPTIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextLength {
    Short,
    Medium,
    Long,
}

impl TextLength {
    pub fn target_words(self) -> usize {
        match self {
            TextLength::Short => 150,
            TextLength::Medium => 350,
            TextLength::Long => 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingTest {
    pub text: String,
    pub questions: Vec<Question>,
}

impl ReadingTest {
    pub fn from_json(raw: &str) -> Result<Self, GenerationError> {
        serde_json::from_str::<Self>(raw)?.validated()
    }

    /// Exactly ten questions of four options each, answers in range
    pub fn validated(self) -> Result<Self, GenerationError> {
        if self.text.split_whitespace().next().is_none() {
            return Err(GenerationError::Malformed("empty text".into()));
        }
        if self.questions.len() != QUIZ_QUESTIONS {
            return Err(GenerationError::Malformed(format!(
                "expected {QUIZ_QUESTIONS} questions, got {}",
                self.questions.len()
            )));
        }
        for (i, q) in self.questions.iter().enumerate() {
            if q.options.len() != QUIZ_OPTIONS {
                return Err(GenerationError::Malformed(format!(
                    "question {} has {} options",
                    i + 1,
                    q.options.len()
                )));
            }
            if q.correct_answer >= QUIZ_OPTIONS {
                return Err(GenerationError::Malformed(format!(
                    "question {} answer index {} out of range",
                    i + 1,
                    q.correct_answer
                )));
            }
        }
        Ok(self)
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

pub trait ContentGenerator: Send + Sync {
    fn generate_exercise_text(&self, age: u8, length: TextLength) -> Result<String, GenerationError>;
    fn generate_reading_test(&self, age: u8) -> Result<ReadingTest, GenerationError>;
}

/// Offline generator: passages assembled from bundled sentences, quizzes that
/// ask which word appeared in the passage.
#[derive(Debug, Clone)]
pub struct LocalGenerator {
    pack: LanguagePack,
    seed: Option<u64>,
}

const SENTENCES_PER_PARAGRAPH: usize = 5;

impl LocalGenerator {
    pub fn new(pack: LanguagePack) -> Self {
        Self { pack, seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn passage(&self, age: u8, target_words: usize, rng: &mut StdRng) -> String {
        let max_len = max_sentence_words(age);
        let pool: Vec<&str> = self
            .pack
            .sentences
            .iter()
            .map(String::as_str)
            .filter(|s| s.split_whitespace().count() <= max_len)
            .collect();
        let pool = if pool.is_empty() {
            self.pack.sentences.iter().map(String::as_str).collect()
        } else {
            pool
        };

        let mut sentences = Vec::new();
        let mut words = 0;
        while words < target_words {
            let sentence = match pool.choose(rng) {
                Some(s) => s.to_string(),
                None => synthetic_sentence(age, rng),
            };
            words += sentence.split_whitespace().count();
            sentences.push(sentence);
        }
        sentences
            .chunks(SENTENCES_PER_PARAGRAPH)
            .map(|p| p.join(" "))
            .join("\n\n")
    }

    fn quiz(&self, text: &str, rng: &mut StdRng) -> Result<Vec<Question>, GenerationError> {
        let seen: HashSet<String> = text.split_whitespace().map(clean_token).collect();
        let mut candidates: Vec<String> = seen
            .iter()
            .filter(|w| w.chars().count() >= 4)
            .cloned()
            .collect();
        candidates.sort_unstable();
        if candidates.is_empty() {
            return Err(GenerationError::Malformed(
                "passage has no words to ask about".into(),
            ));
        }
        candidates.shuffle(rng);

        let vocabulary: Vec<String> = self
            .pack
            .vocabulary()
            .into_iter()
            .map(clean_token)
            .filter(|w| !w.is_empty() && !seen.contains(w))
            .collect();

        (0..QUIZ_QUESTIONS)
            .map(|i| {
                let answer = candidates[i % candidates.len()].clone();
                let mut options = distractors(&vocabulary, &candidates, &seen, rng)?;
                let correct_answer = rng.gen_range(0..QUIZ_OPTIONS);
                options.insert(correct_answer, answer);
                Ok(Question {
                    question: self.pack.quiz_prompt.clone(),
                    options,
                    correct_answer,
                })
            })
            .collect()
    }
}

impl ContentGenerator for LocalGenerator {
    fn generate_exercise_text(&self, age: u8, length: TextLength) -> Result<String, GenerationError> {
        let mut rng = self.rng();
        Ok(self.passage(age, length.target_words(), &mut rng))
    }

    fn generate_reading_test(&self, age: u8) -> Result<ReadingTest, GenerationError> {
        let mut rng = self.rng();
        let text = self.passage(age, READING_TEST_WORDS, &mut rng);
        let questions = self.quiz(&text, &mut rng)?;
        ReadingTest { text, questions }.validated()
    }
}

fn max_sentence_words(age: u8) -> usize {
    match age {
        0..=9 => 8,
        10..=13 => 12,
        _ => usize::MAX,
    }
}

/// Grammatical nonsense sentence for packs without a corpus
fn synthetic_sentence<R: Rng + ?Sized>(age: u8, rng: &mut R) -> String {
    let extra = if age < 12 { 1 } else { 3 };
    let mut s = cgisf(
        rng.gen_range(1..=extra),
        rng.gen_range(1..=extra),
        rng.gen_range(1..=extra + 1),
        rng.gen_bool(0.5),
        rng.gen_range(1..3),
        rng.gen_bool(0.5),
    );
    s.truncate(s.trim_end().len());
    s
}

fn clean_token(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Three options that never occur in the passage: pack words first, then
/// scrambled passage words
fn distractors<R: Rng + ?Sized>(
    vocabulary: &[String],
    candidates: &[String],
    seen: &HashSet<String>,
    rng: &mut R,
) -> Result<Vec<String>, GenerationError> {
    let wanted = QUIZ_OPTIONS - 1;
    let mut out: Vec<String> = vocabulary
        .choose_multiple(rng, wanted)
        .cloned()
        .collect();

    let mut attempts = 0;
    while out.len() < wanted && attempts < 200 {
        attempts += 1;
        let Some(word) = candidates.choose(rng) else {
            break;
        };
        let mut chars: Vec<char> = word.chars().collect();
        chars.shuffle(rng);
        let scrambled: String = chars.into_iter().collect();
        if !seen.contains(&scrambled) && !out.contains(&scrambled) {
            out.push(scrambled);
        }
    }
    if out.len() < wanted {
        return Err(GenerationError::Malformed(
            "could not build quiz distractors".into(),
        ));
    }
    Ok(out)
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum CommandRequest {
    ExerciseText {
        age: u8,
        length: TextLength,
        words: usize,
        language: SupportedLanguage,
    },
    ReadingTest {
        age: u8,
        words: usize,
        questions: usize,
        language: SupportedLanguage,
    },
}

#[derive(Deserialize)]
struct TextReply {
    text: String,
}

/// Runs an external program per request: the request goes to its stdin as
/// one JSON object, the reply is read from its stdout as JSON.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    language: SupportedLanguage,
}

impl CommandGenerator {
    /// `command_line` is split on whitespace; no shell quoting
    pub fn new(command_line: &str, language: SupportedLanguage) -> Result<Self, GenerationError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| GenerationError::Service("empty generator command".into()))?;
        Ok(Self {
            program,
            args: parts.collect(),
            language,
        })
    }

    fn run(&self, request: &CommandRequest) -> Result<String, GenerationError> {
        let payload = serde_json::to_vec(request)?;
        tracing::debug!(program = %self.program, "running generator command");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            // A generator may exit without reading its input.
            if let Err(e) = stdin.write_all(&payload) {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GenerationError::Service(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        String::from_utf8(output.stdout)
            .map_err(|e| GenerationError::Malformed(format!("reply is not utf-8: {e}")))
    }
}

impl ContentGenerator for CommandGenerator {
    fn generate_exercise_text(&self, age: u8, length: TextLength) -> Result<String, GenerationError> {
        let raw = self.run(&CommandRequest::ExerciseText {
            age,
            length,
            words: length.target_words(),
            language: self.language,
        })?;
        let reply: TextReply = serde_json::from_str(&raw)?;
        if reply.text.split_whitespace().next().is_none() {
            return Err(GenerationError::Malformed("empty text".into()));
        }
        Ok(reply.text)
    }

    fn generate_reading_test(&self, age: u8) -> Result<ReadingTest, GenerationError> {
        let raw = self.run(&CommandRequest::ReadingTest {
            age,
            words: READING_TEST_WORDS,
            questions: QUIZ_QUESTIONS,
            language: self.language,
        })?;
        ReadingTest::from_json(&raw)
    }
}

/// The external command when one is configured and usable, otherwise the
/// offline generator. A bad command line is logged, never fatal.
pub fn select_generator(
    command: Option<&str>,
    pack: LanguagePack,
    language: SupportedLanguage,
) -> Arc<dyn ContentGenerator> {
    if let Some(command_line) = command {
        match CommandGenerator::new(command_line, language) {
            Ok(generator) => return Arc::new(generator),
            Err(e) => {
                tracing::warn!(command = command_line, error = %e, "using the offline generator")
            }
        }
    }
    Arc::new(LocalGenerator::new(pack))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Text(TextLength),
    ReadingTest,
}

#[derive(Debug)]
pub enum Output {
    Text(Result<String, GenerationError>),
    ReadingTest(Result<ReadingTest, GenerationError>),
}

/// Runs generation off the UI thread. Every request gets a new id; results
/// carrying an older id are dropped when polled.
pub struct GenerationWorker {
    generator: Arc<dyn ContentGenerator>,
    tx: Sender<(u64, Output)>,
    rx: Receiver<(u64, Output)>,
    latest: u64,
    pending: Option<Job>,
}

impl GenerationWorker {
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            generator,
            tx,
            rx,
            latest: 0,
            pending: None,
        }
    }

    pub fn request(&mut self, job: Job, age: u8) -> u64 {
        self.latest += 1;
        let id = self.latest;
        self.pending = Some(job);
        tracing::info!(id, ?job, age, "generation requested");

        let generator = Arc::clone(&self.generator);
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let output = match job {
                Job::Text(length) => Output::Text(generator.generate_exercise_text(age, length)),
                Job::ReadingTest => Output::ReadingTest(generator.generate_reading_test(age)),
            };
            // Receiver gone means the app exited; nothing to report to.
            let _ = tx.send((id, output));
        });
        id
    }

    /// Latest result, if it has arrived. Stale results are discarded.
    pub fn poll(&mut self) -> Option<Output> {
        while let Ok((id, output)) = self.rx.try_recv() {
            if id == self.latest && self.pending.is_some() {
                self.pending = None;
                return Some(output);
            }
            tracing::debug!(id, latest = self.latest, "dropping stale generation result");
        }
        None
    }

    /// Forgets the in-flight request; its result will be dropped
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.latest += 1;
        }
    }

    pub fn pending(&self) -> Option<Job> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
