//! Okapi BM25 scoring over an in-memory corpus.
//!
//! The model is built from scratch for every query and nothing is cached
//! between queries.

use std::collections::HashMap;

use crate::{
    document::Document,
    error::{Error, Result},
    tokenizer::tokenize,
};

pub const DEFAULT_K1: f64 = 1.5;
pub const DEFAULT_B: f64 = 0.75;
pub const DEFAULT_EPSILON: f64 = 0.25;

/// How inverse document frequency is computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IdfFlavor {
    /// `ln((N - n + 0.5) / (n + 0.5) + 1)`. Always positive.
    PlusOne,
    /// `ln((N - n + 0.5) / (n + 0.5))`, with negative values replaced by
    /// `epsilon` times the mean IDF of the vocabulary. Terms present in
    /// most documents can push scores below zero.
    Okapi { epsilon: f64 },
}

/// Tuning constants for the BM25 formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term frequency saturation.
    pub k1: f64,
    /// Document length normalization, from 0 (none) to 1 (full).
    pub b: f64,
    pub idf: IdfFlavor,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: DEFAULT_K1,
            b: DEFAULT_B,
            idf: IdfFlavor::PlusOne,
        }
    }
}

impl Bm25Params {
    pub fn validate(&self) -> Result<()> {
        if !self.k1.is_finite() || self.k1 < 0.0 {
            return Err(Error::Config(format!(
                "k1 must be a non-negative number, got {}",
                self.k1
            )));
        }
        if !(0.0..=1.0).contains(&self.b) {
            return Err(Error::Config(format!(
                "b must be between 0 and 1, got {}",
                self.b
            )));
        }
        if let IdfFlavor::Okapi { epsilon } = self.idf
            && (!epsilon.is_finite() || epsilon < 0.0)
        {
            return Err(Error::Config(format!(
                "epsilon must be a non-negative number, got {epsilon}"
            )));
        }
        Ok(())
    }
}

/// Term statistics for one corpus.
#[derive(Debug)]
pub struct Bm25Model<'a> {
    params: Bm25Params,
    term_freqs: Vec<HashMap<&'a str, usize>>,
    doc_lens: Vec<usize>,
    avgdl: f64,
    idf: HashMap<&'a str, f64>,
}

impl<'a> Bm25Model<'a> {
    /// Count term statistics over `corpus`, one token sequence per document.
    pub fn build<I>(corpus: I, params: Bm25Params) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut term_freqs = Vec::new();
        let mut doc_lens = Vec::new();
        let mut doc_freqs: HashMap<&'a str, usize> = HashMap::new();

        for tokens in corpus {
            let mut freqs: HashMap<&'a str, usize> = HashMap::new();
            for token in tokens {
                *freqs.entry(token.as_str()).or_default() += 1;
            }
            for &term in freqs.keys() {
                *doc_freqs.entry(term).or_default() += 1;
            }
            doc_lens.push(tokens.len());
            term_freqs.push(freqs);
        }

        let n_docs = doc_lens.len();
        let total_len: usize = doc_lens.iter().sum();
        let avgdl = if n_docs == 0 {
            0.0
        } else {
            total_len as f64 / n_docs as f64
        };
        let idf = compute_idf(&doc_freqs, n_docs, params.idf);

        Self {
            params,
            term_freqs,
            doc_lens,
            avgdl,
            idf,
        }
    }

    pub fn len(&self) -> usize {
        self.doc_lens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_lens.is_empty()
    }

    pub fn avgdl(&self) -> f64 {
        self.avgdl
    }

    /// IDF of `term`, or `None` if no document contains it.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Score every document against `query_terms`, in corpus order.
    ///
    /// Repeated query terms are counted once per occurrence.
    pub fn scores(&self, query_terms: &[String]) -> Vec<f64> {
        (0..self.len())
            .map(|doc| self.score(doc, query_terms))
            .collect()
    }

    fn score(&self, doc: usize, query_terms: &[String]) -> f64 {
        let Bm25Params { k1, b, .. } = self.params;
        let freqs = &self.term_freqs[doc];
        let len_ratio = self.doc_lens[doc] as f64 / self.avgdl;

        query_terms
            .iter()
            .filter_map(|term| {
                let tf = *freqs.get(term.as_str())? as f64;
                let idf = self.idf.get(term.as_str())?;
                let norm = tf + k1 * (1.0 - b + b * len_ratio);
                Some(idf * (tf * (k1 + 1.0)) / norm)
            })
            .fold(0.0, |acc, s| acc + s)
    }
}

fn compute_idf<'a>(
    doc_freqs: &HashMap<&'a str, usize>,
    n_docs: usize,
    flavor: IdfFlavor,
) -> HashMap<&'a str, f64> {
    let n = n_docs as f64;
    let mut idf: HashMap<&'a str, f64> = doc_freqs
        .iter()
        .map(|(&term, &df)| {
            let df = df as f64;
            let ratio = (n - df + 0.5) / (df + 0.5);
            let value = match flavor {
                IdfFlavor::PlusOne => (ratio + 1.0).ln(),
                IdfFlavor::Okapi { .. } => ratio.ln(),
            };
            (term, value)
        })
        .collect();

    if let IdfFlavor::Okapi { epsilon } = flavor
        && !idf.is_empty()
    {
        let average = idf.values().sum::<f64>() / idf.len() as f64;
        let floor = epsilon * average;
        for value in idf.values_mut().filter(|v| **v < 0.0) {
            *value = floor;
        }
    }

    idf
}

/// A document paired with its relevance score.
#[derive(Debug, Clone, Copy)]
pub struct ScoredDocument<'a> {
    pub document: &'a Document,
    pub score: f64,
}

/// Rank `documents` against `query` and keep the best `limit`.
///
/// Scores are sorted high to low. Equal scores keep the order of
/// `documents`, so an empty query returns the collection as given.
pub fn rank<'a>(
    query: &str,
    documents: &'a [Document],
    limit: usize,
    params: Bm25Params,
) -> Vec<ScoredDocument<'a>> {
    if documents.is_empty() {
        return Vec::new();
    }

    let model = Bm25Model::build(documents.iter().map(Document::tokens), params);
    let query_terms = tokenize(query);
    tracing::debug!(
        documents = model.len(),
        avgdl = model.avgdl(),
        terms = query_terms.len(),
        "scoring query"
    );

    let mut ranked: Vec<ScoredDocument<'a>> = documents
        .iter()
        .zip(model.scores(&query_terms))
        .map(|(document, score)| ScoredDocument { document, score })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(limit);
    ranked
}
