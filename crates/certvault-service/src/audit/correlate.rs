//! Audit event correlation and in-memory filtering.
//!
//! Correlation links an event to others sharing its origin: same source
//! IP or same acting user. Placeholder values are never treated as a
//! shared origin, otherwise every unattributed event would correlate
//! with every other one.

use serde::Serialize;

use certvault_entity::audit::{AuditLogEntry, Severity};

/// IP recorded when the real origin address was not captured.
const LOOPBACK_SENTINEL: &str = "127.0.0.1";

/// User ID recorded when no actor was attributed.
const UNKNOWN_USER_SENTINEL: &str = "unknown";

/// Result of correlating one audit event against a window of others.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlation {
    pub related: Vec<AuditLogEntry>,
    pub risk_score: u8,
}

/// Find events sharing the target's origin, newest first.
///
/// An event is related when it shares the target's IP or the target's
/// user ID, where either key only counts if it is not a placeholder.
/// The target is not excluded: when the window contains it and it
/// matches its own keys, it reappears in the related set.
pub fn correlate(target: &AuditLogEntry, window: &[AuditLogEntry]) -> Correlation {
    let ip_key = target
        .ip
        .as_deref()
        .filter(|ip| *ip != LOOPBACK_SENTINEL);
    let user_key = Some(target.user_id.as_str()).filter(|id| *id != UNKNOWN_USER_SENTINEL);

    let mut related: Vec<AuditLogEntry> = window
        .iter()
        .filter(|entry| {
            let same_ip = ip_key.is_some() && entry.ip.as_deref() == ip_key;
            let same_user = user_key.is_some_and(|key| entry.user_id == key);
            same_ip || same_user
        })
        .cloned()
        .collect();
    related.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Correlation {
        risk_score: risk_score(target.severity),
        related,
    }
}

/// Indicative risk score for an event severity.
pub fn risk_score(severity: Severity) -> u8 {
    match severity {
        Severity::Critical => 95,
        Severity::Error => 60,
        _ => 10,
    }
}

/// In-memory filter over an already-loaded slice of audit entries.
///
/// The text term matches case-insensitively against the actor name,
/// action, and target; the IP is matched as a raw substring. The
/// severity filter is exact, with `None` meaning all severities.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub text: String,
    pub severity: Option<Severity>,
}

impl LogFilter {
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if let Some(severity) = self.severity {
            if entry.severity != severity {
                return false;
            }
        }
        let term = self.text.trim();
        if term.is_empty() {
            return true;
        }
        let lowered = term.to_lowercase();
        entry.user_name.to_lowercase().contains(&lowered)
            || entry.action.to_lowercase().contains(&lowered)
            || entry.target.to_lowercase().contains(&lowered)
            || entry.ip.as_deref().is_some_and(|ip| ip.contains(term))
    }

    /// Apply the filter, preserving the input order.
    pub fn apply(&self, entries: &[AuditLogEntry]) -> Vec<AuditLogEntry> {
        entries
            .iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use certvault_entity::audit::{AuditCategory, AuditOutcome};

    fn entry(
        user_id: &str,
        user_name: &str,
        ip: Option<&str>,
        severity: Severity,
        age_minutes: i64,
    ) -> AuditLogEntry {
        AuditLogEntry {
            id: Uuid::new_v4(),
            created_at: Utc::now() - Duration::minutes(age_minutes),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            user_role: "admin".to_string(),
            action: "file.upload".to_string(),
            category: AuditCategory::Data,
            target: "cert.pdf".to_string(),
            severity,
            status: AuditOutcome::Success,
            ip: ip.map(str::to_string),
            user_agent: None,
            request_id: None,
            metadata: serde_json::json!({}),
        }
    }

    #[test]
    fn test_correlates_by_shared_ip() {
        let target = entry("u-1", "Ana", Some("10.0.0.5"), Severity::Info, 0);
        let same_ip = entry("u-2", "Bruno", Some("10.0.0.5"), Severity::Info, 1);
        let other = entry("u-3", "Carla", Some("10.0.0.9"), Severity::Info, 2);

        let result = correlate(&target, &[same_ip.clone(), other]);
        assert_eq!(result.related.len(), 1);
        assert_eq!(result.related[0].id, same_ip.id);
    }

    #[test]
    fn test_correlates_by_shared_user() {
        let target = entry("u-1", "Ana", Some("10.0.0.5"), Severity::Info, 0);
        let same_user = entry("u-1", "Ana", Some("172.16.0.2"), Severity::Info, 1);

        let result = correlate(&target, &[same_user.clone()]);
        assert_eq!(result.related.len(), 1);
        assert_eq!(result.related[0].id, same_user.id);
    }

    #[test]
    fn test_loopback_ip_is_not_a_shared_origin() {
        let target = entry("u-1", "Ana", Some("127.0.0.1"), Severity::Info, 0);
        let also_loopback = entry("u-2", "Bruno", Some("127.0.0.1"), Severity::Info, 1);

        let result = correlate(&target, &[also_loopback]);
        assert!(result.related.is_empty());
    }

    #[test]
    fn test_unknown_user_is_not_a_shared_origin() {
        let target = entry("unknown", "unknown", Some("10.0.0.5"), Severity::Info, 0);
        let also_unknown = entry("unknown", "unknown", Some("10.9.9.9"), Severity::Info, 1);
        let same_ip = entry("u-2", "Bruno", Some("10.0.0.5"), Severity::Info, 2);

        // The IP key still works; the placeholder user does not.
        let result = correlate(&target, &[also_unknown, same_ip.clone()]);
        assert_eq!(result.related.len(), 1);
        assert_eq!(result.related[0].id, same_ip.id);
    }

    #[test]
    fn test_fully_unattributed_target_correlates_with_nothing() {
        let target = entry("unknown", "unknown", Some("127.0.0.1"), Severity::Info, 0);
        let window = vec![
            entry("unknown", "unknown", Some("127.0.0.1"), Severity::Info, 1),
            entry("u-2", "Bruno", Some("10.0.0.5"), Severity::Info, 2),
        ];

        assert!(correlate(&target, &window).related.is_empty());
    }

    #[test]
    fn test_related_sorted_newest_first() {
        let target = entry("u-1", "Ana", None, Severity::Info, 5);
        let older = entry("u-1", "Ana", None, Severity::Info, 60);
        let newer = entry("u-1", "Ana", None, Severity::Info, 1);

        let window = vec![older.clone(), newer.clone()];
        let result = correlate(&target, &window);

        assert_eq!(result.related.len(), 2);
        assert_eq!(result.related[0].id, newer.id);
        assert_eq!(result.related[1].id, older.id);
    }

    #[test]
    fn test_target_reappears_when_it_matches_its_own_keys() {
        let target = entry("u-1", "Ana", Some("10.0.0.5"), Severity::Info, 5);
        let same_ip = entry("u-2", "Bruno", Some("10.0.0.5"), Severity::Info, 1);

        let window = vec![target.clone(), same_ip.clone()];
        let result = correlate(&target, &window);

        assert_eq!(result.related.len(), 2);
        assert_eq!(result.related[0].id, same_ip.id);
        assert_eq!(result.related[1].id, target.id);
    }

    #[test]
    fn test_risk_score_steps() {
        assert_eq!(risk_score(Severity::Critical), 95);
        assert_eq!(risk_score(Severity::Error), 60);
        assert_eq!(risk_score(Severity::Warning), 10);
        assert_eq!(risk_score(Severity::Info), 10);
    }

    #[test]
    fn test_filter_text_matches_name_action_target_case_insensitively() {
        let e = entry("u-1", "Ana Souza", Some("10.0.0.5"), Severity::Info, 0);

        assert!(LogFilter { text: "ana".into(), severity: None }.matches(&e));
        assert!(LogFilter { text: "UPLOAD".into(), severity: None }.matches(&e));
        assert!(LogFilter { text: "cert".into(), severity: None }.matches(&e));
        assert!(LogFilter { text: "10.0.0".into(), severity: None }.matches(&e));
        assert!(!LogFilter { text: "delete".into(), severity: None }.matches(&e));
    }

    #[test]
    fn test_filter_severity_is_exact_with_none_passing_all() {
        let e = entry("u-1", "Ana", None, Severity::Error, 0);

        assert!(LogFilter { text: String::new(), severity: None }.matches(&e));
        assert!(LogFilter { text: String::new(), severity: Some(Severity::Error) }.matches(&e));
        assert!(!LogFilter { text: String::new(), severity: Some(Severity::Critical) }.matches(&e));
    }

    #[test]
    fn test_filter_conditions_combine_with_and() {
        let hit = entry("u-1", "Ana", None, Severity::Error, 0);
        let wrong_severity = entry("u-2", "Ana", None, Severity::Info, 1);
        let wrong_text = entry("u-3", "Bruno", None, Severity::Error, 2);

        let filter = LogFilter {
            text: "ana".into(),
            severity: Some(Severity::Error),
        };
        let kept = filter.apply(&[hit.clone(), wrong_severity, wrong_text]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, hit.id);
    }
}
