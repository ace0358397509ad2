//! Database query functions

use crate::models::*;
use crate::schema::Database;
use crate::Result;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

impl Database {
    // ==================== Response Cache ====================

    /// Get a cached payload if it has not expired
    pub async fn cache_get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        self.cache_get_at(key, Utc::now()).await
    }

    /// Get a cached payload as seen at `now`. Expired rows are removed on the way out.
    pub async fn cache_get_at(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<serde_json::Value>> {
        let Some(entry) = self.cache_entry(key).await? else {
            return Ok(None);
        };

        if !entry.is_live_at(now) {
            debug!(key = key, expired_at = %entry.expires_at, "Dropping expired cache entry");
            sqlx::query("DELETE FROM github_cache WHERE key = ? AND expires_at <= ?")
                .bind(key)
                .bind(now)
                .execute(self.pool())
                .await?;
            return Ok(None);
        }

        Ok(Some(entry.payload()?))
    }

    /// Store a payload under `key`, replacing any previous entry
    pub async fn cache_put<T: Serialize + ?Sized>(
        &self,
        key: &str,
        payload: &T,
        ttl: Duration,
    ) -> Result<()> {
        self.cache_put_at(key, payload, ttl, Utc::now()).await
    }

    /// Store a payload as if written at `now`
    pub async fn cache_put_at<T: Serialize + ?Sized>(
        &self,
        key: &str,
        payload: &T,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let data = serde_json::to_string(payload)?;
        let expires_at = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        sqlx::query(
            "INSERT INTO github_cache (key, data, cached_at, expires_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                data = excluded.data,
                cached_at = excluded.cached_at,
                expires_at = excluded.expires_at",
        )
        .bind(key)
        .bind(&data)
        .bind(now)
        .bind(expires_at)
        .execute(self.pool())
        .await?;

        debug!(key = key, bytes = data.len(), expires_at = %expires_at, "Cached payload");
        Ok(())
    }

    /// Get the raw cache row for a key, regardless of expiry
    pub async fn cache_entry(&self, key: &str) -> Result<Option<CacheEntry>> {
        let row = sqlx::query_as::<_, CacheEntry>(
            "SELECT key, data, cached_at, expires_at FROM github_cache WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(self.pool())
        .await?;

        Ok(row)
    }

    /// List all cache rows, expired ones included
    pub async fn cache_entries(&self) -> Result<Vec<CacheEntry>> {
        let rows = sqlx::query_as::<_, CacheEntry>(
            "SELECT key, data, cached_at, expires_at FROM github_cache ORDER BY key",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    /// Delete every entry past its expiry
    pub async fn purge_expired_cache(&self) -> Result<u64> {
        let removed = sqlx::query("DELETE FROM github_cache WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(self.pool())
            .await?
            .rows_affected();

        Ok(removed)
    }

    /// Delete every cache entry
    pub async fn clear_cache(&self) -> Result<u64> {
        let removed = sqlx::query("DELETE FROM github_cache")
            .execute(self.pool())
            .await?
            .rows_affected();

        Ok(removed)
    }

    // ==================== Contact Messages ====================

    /// Store a new contact message
    pub async fn insert_contact_message(&self, message: NewContactMessage) -> Result<ContactMessage> {
        let stored = ContactMessage {
            id: uuid::Uuid::new_v4().to_string(),
            name: message.name,
            email: message.email,
            subject: message.subject,
            message: message.message,
            timestamp: Utc::now(),
            status: ContactStatus::New,
            ip_address: message.ip_address,
        };

        sqlx::query(
            "INSERT INTO contact_messages
             (id, name, email, subject, message, timestamp, status, ip_address)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&stored.id)
        .bind(&stored.name)
        .bind(&stored.email)
        .bind(&stored.subject)
        .bind(&stored.message)
        .bind(stored.timestamp)
        .bind(stored.status)
        .bind(&stored.ip_address)
        .execute(self.pool())
        .await?;

        Ok(stored)
    }

    /// List contact messages, newest first
    pub async fn get_contact_messages(&self, limit: i64, skip: i64) -> Result<Vec<ContactMessage>> {
        let rows = sqlx::query_as::<_, ContactMessage>(
            "SELECT id, name, email, subject, message, timestamp, status, ip_address
             FROM contact_messages
             ORDER BY timestamp DESC
             LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    /// Update a message's status. Returns false when no message has that id.
    pub async fn set_contact_status(&self, id: &str, status: ContactStatus) -> Result<bool> {
        let affected = sqlx::query("UPDATE contact_messages SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(self.pool())
            .await?
            .rows_affected();

        Ok(affected > 0)
    }

    /// Count messages overall, by status, and over the last 30 days
    pub async fn get_contact_stats(&self) -> Result<ContactStats> {
        let cutoff = Utc::now() - TimeDelta::days(30);

        let (total, new, read, recent): (i64, i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN status = 'new' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN status = 'read' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN timestamp >= ? THEN 1 ELSE 0 END), 0)
             FROM contact_messages",
        )
        .bind(cutoff)
        .fetch_one(self.pool())
        .await?;

        Ok(ContactStats {
            total_messages: total,
            new_messages: new,
            read_messages: read,
            recent_messages: recent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_message(subject: &str) -> NewContactMessage {
        NewContactMessage {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: subject.to_string(),
            message: "Hello there, nice portfolio!".to_string(),
            ip_address: Some("127.0.0.1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_put_then_get_before_expiry() {
        let db = Database::in_memory().await.unwrap();
        let payload = json!({"login": "octocat", "public_repos": 8});

        db.cache_put("user_info", &payload, Duration::from_secs(3600))
            .await
            .unwrap();

        assert_eq!(db.cache_get("user_info").await.unwrap(), Some(payload));
    }

    #[tokio::test]
    async fn test_get_after_expiry_is_absent() {
        let db = Database::in_memory().await.unwrap();
        let written = Utc::now();

        db.cache_put_at("repos_10_updated", &json!([1, 2, 3]), Duration::from_secs(60), written)
            .await
            .unwrap();

        let before = written + TimeDelta::seconds(59);
        assert!(db.cache_get_at("repos_10_updated", before).await.unwrap().is_some());

        let at_expiry = written + TimeDelta::seconds(60);
        assert!(db.cache_get_at("repos_10_updated", at_expiry).await.unwrap().is_none());

        // expired row is deleted lazily
        assert!(db.cache_entry("repos_10_updated").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_is_immediately_absent() {
        let db = Database::in_memory().await.unwrap();

        db.cache_put("k", &json!("v"), Duration::ZERO).await.unwrap();

        assert!(db.cache_get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_key_is_not_an_error() {
        let db = Database::in_memory().await.unwrap();
        assert!(db.cache_get("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites_previous_entry() {
        let db = Database::in_memory().await.unwrap();
        let ttl = Duration::from_secs(3600);

        db.cache_put("user_info", &json!({"v": 1}), ttl).await.unwrap();
        db.cache_put("user_info", &json!({"v": 2}), ttl).await.unwrap();

        assert_eq!(db.cache_get("user_info").await.unwrap(), Some(json!({"v": 2})));
        assert_eq!(db.cache_entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_put_refreshes_expiry() {
        let db = Database::in_memory().await.unwrap();
        let first = Utc::now();

        db.cache_put_at("k", &json!(1), Duration::from_secs(10), first).await.unwrap();
        let later = first + TimeDelta::seconds(30);
        db.cache_put_at("k", &json!(2), Duration::from_secs(10), later).await.unwrap();

        let probe = first + TimeDelta::seconds(35);
        assert_eq!(db.cache_get_at("k", probe).await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_purge_expired_keeps_live_entries() {
        let db = Database::in_memory().await.unwrap();

        db.cache_put("stale", &json!(null), Duration::ZERO).await.unwrap();
        db.cache_put("fresh", &json!(true), Duration::from_secs(3600)).await.unwrap();

        assert_eq!(db.purge_expired_cache().await.unwrap(), 1);
        assert_eq!(db.cache_get("fresh").await.unwrap(), Some(json!(true)));
        assert_eq!(db.clear_cache().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_contact_message_lifecycle() {
        let db = Database::in_memory().await.unwrap();

        let stored = db.insert_contact_message(new_message("Project inquiry")).await.unwrap();
        assert_eq!(stored.status, ContactStatus::New);

        let listed = db.get_contact_messages(50, 0).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, stored.id);
        assert_eq!(listed[0].ip_address.as_deref(), Some("127.0.0.1"));

        assert!(db.set_contact_status(&stored.id, ContactStatus::Read).await.unwrap());
        assert!(!db.set_contact_status("missing", ContactStatus::Read).await.unwrap());

        let stats = db.get_contact_stats().await.unwrap();
        assert_eq!(
            stats,
            ContactStats {
                total_messages: 1,
                new_messages: 0,
                read_messages: 1,
                recent_messages: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_contact_messages_paginate_newest_first() {
        let db = Database::in_memory().await.unwrap();

        let first = db.insert_contact_message(new_message("First subject")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = db.insert_contact_message(new_message("Second subject")).await.unwrap();

        let page = db.get_contact_messages(1, 0).await.unwrap();
        assert_eq!(page[0].id, second.id);

        let page = db.get_contact_messages(1, 1).await.unwrap();
        assert_eq!(page[0].id, first.id);
    }

    #[tokio::test]
    async fn test_contact_stats_empty() {
        let db = Database::in_memory().await.unwrap();
        assert_eq!(db.get_contact_stats().await.unwrap(), ContactStats::default());
    }
}
