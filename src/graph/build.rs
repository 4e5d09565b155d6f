use anyhow::{Context, Result};

use super::document::{GraphLink, GraphNode, KnowledgeGraph};
use super::store::NeighborSource;

/// Builds the knowledge graph: one node per article in corpus order, and up
/// to `k` outgoing links per article from its nearest-neighbor query.
///
/// This deliberately issues one query per article (O(N) queries) rather than
/// a single pairwise self-join; index-backed nearest-neighbor lookups are
/// cheaper in aggregate for the corpus sizes this targets. Any single query
/// failure aborts the whole build so a partial graph is never produced.
pub fn build_knowledge_graph(source: &dyn NeighborSource, k: usize) -> Result<KnowledgeGraph> {
    let articles = source.articles();
    let mut nodes = Vec::with_capacity(articles.len());
    let mut links = Vec::new();

    for article in articles {
        tracing::info!(url = %article.url, "querying nearest neighbors");

        let neighbors = source
            .nearest(&article.url, k)
            .with_context(|| format!("neighbor query failed for {}", article.url))?;

        nodes.push(GraphNode {
            id: article.url.clone(),
            title: article.title.clone(),
            published_date: article.published_date.clone(),
        });

        for neighbor in neighbors {
            if neighbor.url == article.url {
                // A conforming source never returns the reference article;
                // drop it rather than emit a self-link if one does.
                continue;
            }

            links.push(GraphLink {
                source: article.url.clone(),
                target: neighbor.url,
                value: neighbor.distance,
            });
        }
    }

    tracing::info!(
        nodes = nodes.len(),
        links = links.len(),
        "knowledge graph assembled"
    );

    Ok(KnowledgeGraph { nodes, links })
}
