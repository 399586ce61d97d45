use openclaw_sql::{escape_sql_literal, format_vector_literal, parse_rows, PostgresClient};
use tracing::instrument;

use crate::embedder::HashEmbedder;
use crate::types::{CategoryCount, MemoryCategory, MemoryMatch};

/// Default similarity floor applied by `search`/`recall` when the caller
/// does not specify one (§4.5).
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.3;

/// Default result count for `search`/`recall` (§4.5).
pub const DEFAULT_LIMIT: usize = 5;

/// Vector-memory substrate (§3, §4.5): content rows with a 384-dim
/// embedding, searched by cosine distance via pgvector's `<=>` operator.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    sql: PostgresClient,
    embedder: HashEmbedder,
}

impl MemoryStore {
    pub fn new(sql: PostgresClient) -> Self {
        Self {
            sql,
            embedder: HashEmbedder::default(),
        }
    }

    /// Embed and insert a memory row, returning its assigned id (§4.5).
    #[instrument(skip(self, content, metadata))]
    pub async fn store(
        &self,
        content: &str,
        category: MemoryCategory,
        source: &str,
        metadata: &serde_json::Value,
    ) -> Option<i64> {
        let embedding = self.embedder.embed(content);
        let query = format!(
            "INSERT INTO memories (content, category, source, metadata, embedding) \
             VALUES ('{}', '{}', '{}', '{}'::jsonb, {}) RETURNING id;",
            escape_sql_literal(content),
            category,
            escape_sql_literal(source),
            escape_sql_literal(&metadata.to_string()),
            format_vector_literal(&embedding),
        );
        let result = self.sql.run_query(&query).await;
        result.trim().parse().ok()
    }

    /// Store a batch of memories sequentially, returning the ids that
    /// succeeded (§4.5 `store_batch`).
    #[instrument(skip(self, items))]
    pub async fn store_batch(
        &self,
        items: &[(String, MemoryCategory, String, serde_json::Value)],
    ) -> Vec<i64> {
        let mut ids = Vec::with_capacity(items.len());
        for (content, category, source, metadata) in items {
            if let Some(id) = self.store(content, *category, source, metadata).await {
                ids.push(id);
            }
        }
        ids
    }

    /// Cosine-similarity search across all categories (§4.5, §8 property 9:
    /// results come back in descending similarity order).
    #[instrument(skip(self, query_text))]
    pub async fn search(
        &self,
        query_text: &str,
        limit: usize,
        min_similarity: f32,
    ) -> Vec<MemoryMatch> {
        self.search_in(query_text, None, limit, min_similarity).await
    }

    /// Category-scoped variant of `search`, used by the category-specific
    /// `recall_*` wrappers.
    #[instrument(skip(self, query_text))]
    pub async fn search_in(
        &self,
        query_text: &str,
        category: Option<MemoryCategory>,
        limit: usize,
        min_similarity: f32,
    ) -> Vec<MemoryMatch> {
        let embedding = self.embedder.embed(query_text);
        let vector = format_vector_literal(&embedding);
        let category_clause = category
            .map(|c| format!("AND category = '{c}' "))
            .unwrap_or_default();
        let query = format!(
            "SELECT id, REPLACE(content, E'\\n', ' '), category, source, \
             REPLACE(COALESCE(metadata::text,'{{}}'), E'\\n', ' '), \
             1 - (embedding <=> {vector}::vector) AS similarity, created_at::text \
             FROM memories WHERE 1 - (embedding <=> {vector}::vector) >= {min_similarity} \
             {category_clause}ORDER BY embedding <=> {vector}::vector ASC LIMIT {limit};"
        );
        let rows = self.sql.run_query(&query).await;
        parse_rows(&rows).into_iter().filter_map(row_to_match).collect()
    }

    /// Search and render as a human-readable digest (§4.5 `recall`):
    /// `"Relevant memories:\n  [cat] (NN% match) <content>"` per line.
    #[instrument(skip(self, query_text))]
    pub async fn recall(&self, query_text: &str, limit: usize) -> String {
        let matches = self.search(query_text, limit, DEFAULT_MIN_SIMILARITY).await;
        Self::format_recall(&matches)
    }

    pub fn format_recall(matches: &[MemoryMatch]) -> String {
        if matches.is_empty() {
            return "No relevant memories found.".to_string();
        }
        let mut out = String::from("Relevant memories:\n");
        for m in matches {
            let pct = (m.similarity * 100.0).round() as i64;
            let preview = openclaw_core::text::truncate_with_suffix(&m.content, 300, "...");
            out.push_str(&format!("  [{}] ({pct}% match) {preview}\n", m.category));
        }
        out.trim_end().to_string()
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Option<MemoryMatch> {
        let query = format!(
            "SELECT id, REPLACE(content, E'\\n', ' '), category, source, \
             REPLACE(COALESCE(metadata::text,'{{}}'), E'\\n', ' '), 1.0, created_at::text \
             FROM memories WHERE id = {id};"
        );
        let rows = self.sql.run_query(&query).await;
        parse_rows(&rows).into_iter().find_map(row_to_match)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> bool {
        let query = format!(
            "WITH deleted AS (DELETE FROM memories WHERE id = {id} RETURNING id) \
             SELECT COUNT(*) FROM deleted;"
        );
        let result = self.sql.run_query(&query).await;
        result.trim().parse::<i64>().unwrap_or(0) > 0
    }

    #[instrument(skip(self))]
    pub async fn count(&self) -> i64 {
        let result = self.sql.run_query("SELECT COUNT(*) FROM memories;").await;
        result.trim().parse().unwrap_or(0)
    }

    #[instrument(skip(self))]
    pub async fn categories(&self) -> Vec<CategoryCount> {
        let rows = self
            .sql
            .run_query("SELECT category, COUNT(*) FROM memories GROUP BY category ORDER BY category;")
            .await;
        parse_rows(&rows)
            .into_iter()
            .filter_map(|r| {
                Some(CategoryCount {
                    category: r.first()?.clone(),
                    count: r.get(1)?.parse().ok()?,
                })
            })
            .collect()
    }

    #[instrument(skip(self, user_text, assistant_text))]
    pub async fn store_conversation(&self, user_text: &str, assistant_text: &str) -> Option<i64> {
        let content = format!("User: {user_text}\nAshley: {assistant_text}");
        self.store(&content, MemoryCategory::Conversation, "conversation", &serde_json::json!({}))
            .await
    }

    #[instrument(skip(self, text))]
    pub async fn store_lesson(&self, text: &str) -> Option<i64> {
        self.store(text, MemoryCategory::Lesson, "lesson", &serde_json::json!({}))
            .await
    }

    #[instrument(skip(self, text))]
    pub async fn store_note(&self, text: &str) -> Option<i64> {
        self.store(text, MemoryCategory::Note, "note", &serde_json::json!({}))
            .await
    }

    #[instrument(skip(self, url, title))]
    pub async fn store_bookmark(&self, url: &str, title: &str) -> Option<i64> {
        let content = format!("{title}: {url}");
        self.store(
            &content,
            MemoryCategory::Bookmark,
            "bookmark",
            &serde_json::json!({ "url": url }),
        )
        .await
    }

    #[instrument(skip(self, project, text))]
    pub async fn store_project_context(&self, project: &str, text: &str) -> Option<i64> {
        self.store(
            text,
            MemoryCategory::Project,
            "project",
            &serde_json::json!({ "project": project }),
        )
        .await
    }

    #[instrument(skip(self, text))]
    pub async fn store_fact(&self, text: &str) -> Option<i64> {
        self.store(text, MemoryCategory::Fact, "fact", &serde_json::json!({}))
            .await
    }
}

fn row_to_match(r: Vec<String>) -> Option<MemoryMatch> {
    Some(MemoryMatch {
        id: r.first()?.parse().ok()?,
        content: r.get(1)?.clone(),
        category: r.get(2)?.parse().ok()?,
        source: r.get(3).cloned().unwrap_or_default(),
        metadata: r
            .get(4)
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or(serde_json::json!({})),
        similarity: r.get(5)?.parse().ok()?,
        created_at: r.get(6).cloned().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_to_match_parses_fields() {
        let row = vec![
            "12".to_string(),
            "hello there".to_string(),
            "note".to_string(),
            "note".to_string(),
            "{}".to_string(),
            "0.875".to_string(),
            "2024-01-01T00:00:00Z".to_string(),
        ];
        let m = row_to_match(row).unwrap();
        assert_eq!(m.id, 12);
        assert_eq!(m.category, MemoryCategory::Note);
        assert!((m.similarity - 0.875).abs() < 1e-6);
    }

    #[test]
    fn format_recall_empty_is_explicit() {
        assert_eq!(MemoryStore::format_recall(&[]), "No relevant memories found.");
    }

    #[test]
    fn format_recall_includes_category_and_percentage() {
        let m = MemoryMatch {
            id: 1,
            content: "likes dark mode".to_string(),
            category: MemoryCategory::Preference,
            source: "note".to_string(),
            metadata: serde_json::json!({}),
            similarity: 0.92,
            created_at: String::new(),
        };
        let out = MemoryStore::format_recall(&[m]);
        assert!(out.contains("[preference]"));
        assert!(out.contains("92% match"));
        assert!(out.contains("likes dark mode"));
    }
}
