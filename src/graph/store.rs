use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

/// Article identity and display attributes, without the embedding.
#[derive(Clone, Debug, PartialEq)]
pub struct ArticleRecord {
    pub url: String,
    pub title: String,
    pub published_date: String,
}

/// One nearest-neighbor query result.
#[derive(Clone, Debug, PartialEq)]
pub struct Neighbor {
    pub url: String,
    pub title: String,
    pub published_date: String,
    pub distance: f32,
}

/// The neighbor-query capability the builder consumes. The persistent vector
/// store is an external collaborator; anything that can enumerate articles
/// and answer k-nearest queries can stand in for it.
pub trait NeighborSource {
    /// Articles in corpus enumeration order.
    fn articles(&self) -> &[ArticleRecord];

    /// Up to `k` nearest *other* articles by embedding distance, ordered by
    /// ascending distance, then descending published date for ties. The
    /// reference article itself is never included.
    fn nearest(&self, url: &str, k: usize) -> Result<Vec<Neighbor>>;
}

#[derive(Clone, Debug, Deserialize)]
struct RawCorpusArticle {
    url: String,
    title: String,
    published_date: String,
    embedding: Vec<f32>,
}

/// In-memory store over a corpus file with precomputed embeddings. Neighbor
/// queries are a linear scan per article; the corpus sizes this is built for
/// make one scan per article cheaper than materializing a full pairwise
/// distance matrix.
pub struct EmbeddingStore {
    records: Vec<ArticleRecord>,
    embeddings: Vec<Vec<f32>>,
    index_by_url: HashMap<String, usize>,
}

impl EmbeddingStore {
    pub fn from_corpus_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read corpus file {}", path.display()))?;
        let articles: Vec<RawCorpusArticle> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid corpus JSON in {}", path.display()))?;
        Self::from_articles(articles)
    }

    fn from_articles(articles: Vec<RawCorpusArticle>) -> Result<Self> {
        let mut records = Vec::with_capacity(articles.len());
        let mut embeddings = Vec::with_capacity(articles.len());
        let mut index_by_url = HashMap::with_capacity(articles.len());
        let mut dimension = None;

        for article in articles {
            if article.embedding.is_empty() {
                return Err(anyhow!("article {} has an empty embedding", article.url));
            }

            match dimension {
                None => dimension = Some(article.embedding.len()),
                Some(expected) if expected != article.embedding.len() => {
                    return Err(anyhow!(
                        "article {} has embedding dimension {}, expected {expected}",
                        article.url,
                        article.embedding.len()
                    ));
                }
                Some(_) => {}
            }

            let index = records.len();
            if index_by_url.insert(article.url.clone(), index).is_some() {
                return Err(anyhow!("duplicate article url {} in corpus", article.url));
            }

            records.push(ArticleRecord {
                url: article.url,
                title: article.title,
                published_date: article.published_date,
            });
            embeddings.push(article.embedding);
        }

        Ok(Self {
            records,
            embeddings,
            index_by_url,
        })
    }
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}

impl NeighborSource for EmbeddingStore {
    fn articles(&self) -> &[ArticleRecord] {
        &self.records
    }

    fn nearest(&self, url: &str, k: usize) -> Result<Vec<Neighbor>> {
        let &reference_index = self
            .index_by_url
            .get(url)
            .ok_or_else(|| anyhow!("article {url} is not present in the corpus"))?;
        let reference = &self.embeddings[reference_index];

        let mut neighbors = self
            .records
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != reference_index)
            .map(|(index, record)| Neighbor {
                url: record.url.clone(),
                title: record.title.clone(),
                published_date: record.published_date.clone(),
                distance: euclidean_distance(reference, &self.embeddings[index]),
            })
            .collect::<Vec<_>>();

        // Ascending distance; equal distances break toward the newer article.
        neighbors.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| b.published_date.cmp(&a.published_date))
        });
        neighbors.truncate(k);
        Ok(neighbors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(url: &str, date: &str, embedding: Vec<f32>) -> RawCorpusArticle {
        RawCorpusArticle {
            url: url.to_owned(),
            title: format!("Title of {url}"),
            published_date: date.to_owned(),
            embedding,
        }
    }

    fn store() -> EmbeddingStore {
        EmbeddingStore::from_articles(vec![
            article("a", "2023-01-01", vec![0.0, 0.0]),
            article("b", "2023-02-01", vec![0.3, 0.0]),
            article("c", "2023-03-01", vec![0.0, 1.0]),
            article("d", "2023-04-01", vec![2.0, 0.0]),
        ])
        .unwrap()
    }

    #[test]
    fn nearest_orders_by_ascending_distance() {
        let neighbors = store().nearest("a", 5).unwrap();
        let urls = neighbors.iter().map(|n| n.url.as_str()).collect::<Vec<_>>();
        assert_eq!(urls, ["b", "c", "d"]);
        assert!(neighbors.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn nearest_excludes_the_reference_article() {
        let neighbors = store().nearest("b", 5).unwrap();
        assert!(neighbors.iter().all(|n| n.url != "b"));
    }

    #[test]
    fn nearest_truncates_to_k() {
        let neighbors = store().nearest("a", 2).unwrap();
        assert_eq!(neighbors.len(), 2);
    }

    #[test]
    fn small_corpus_returns_fewer_than_k_without_error() {
        let store = EmbeddingStore::from_articles(vec![
            article("a", "2023-01-01", vec![0.0]),
            article("b", "2023-02-01", vec![1.0]),
        ])
        .unwrap();
        assert_eq!(store.nearest("a", 5).unwrap().len(), 1);
    }

    #[test]
    fn equal_distances_break_toward_newer_date() {
        // "old" and "new" sit at the same distance from the reference.
        let store = EmbeddingStore::from_articles(vec![
            article("ref", "2023-01-01", vec![0.0, 0.0]),
            article("old", "2022-06-01", vec![1.0, 0.0]),
            article("new", "2023-06-01", vec![-1.0, 0.0]),
        ])
        .unwrap();

        let neighbors = store.nearest("ref", 5).unwrap();
        assert_eq!(neighbors[0].url, "new");
        assert_eq!(neighbors[1].url, "old");
    }

    #[test]
    fn repeated_queries_yield_the_same_sequence() {
        let store = store();
        assert_eq!(store.nearest("c", 5).unwrap(), store.nearest("c", 5).unwrap());
    }

    #[test]
    fn unknown_reference_url_is_an_error() {
        assert!(store().nearest("nope", 5).is_err());
    }

    #[test]
    fn mismatched_embedding_dimensions_are_rejected() {
        let result = EmbeddingStore::from_articles(vec![
            article("a", "2023-01-01", vec![0.0, 0.0]),
            article("b", "2023-02-01", vec![1.0]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_urls_are_rejected() {
        let result = EmbeddingStore::from_articles(vec![
            article("a", "2023-01-01", vec![0.0]),
            article("a", "2023-02-01", vec![1.0]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn empty_embeddings_are_rejected() {
        let result = EmbeddingStore::from_articles(vec![article("a", "2023-01-01", vec![])]);
        assert!(result.is_err());
    }
}
