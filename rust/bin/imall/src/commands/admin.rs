//! Admin record helpers.

use std::path::Path;

use anyhow::{Context, Result};
use imall_admin::{Admin, AdminParam};
use tracing::info;

/// Apply `params` to `record` and render the updated record plus the changed
/// fields as pretty JSON.
///
/// `record` is inline JSON unless it names an existing file.
pub fn apply(record: &str, params: &str) -> Result<String> {
    let record = if Path::new(record).is_file() {
        std::fs::read_to_string(record).with_context(|| format!("reading {}", record))?
    } else {
        record.to_string()
    };

    let mut admin: Admin = serde_json::from_str(&record).context("invalid admin record")?;
    let params: AdminParam = serde_json::from_str(params).context("invalid admin params")?;

    if params.is_empty() {
        anyhow::bail!("Params provide no fields to update.");
    }

    let changed = params.apply(&mut admin);
    info!(id = admin.id, ?changed, "applied admin update");

    let output = serde_json::json!({
        "admin": admin,
        "changed": changed,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "id": 3,
        "username": "ops",
        "nickName": "Ops",
        "email": "ops@imall.test",
        "note": "",
        "createTime": "2022-01-01 00:00:00",
        "updateTime": "2022-01-01 00:00:00",
        "loginTime": "2022-01-02 00:00:00",
        "status": true
    }"#;

    #[test]
    fn apply_inline_record() {
        let out = apply(RECORD, r#"{"status":false}"#).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["admin"]["status"], false);
        assert_eq!(value["admin"]["nickName"], "Ops");
        assert_eq!(value["changed"], serde_json::json!(["status"]));
    }

    #[test]
    fn apply_record_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin.json");
        std::fs::write(&path, RECORD).unwrap();

        let out = apply(path.to_str().unwrap(), r#"{"note":"moved"}"#).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["admin"]["note"], "moved");
    }

    #[test]
    fn empty_params_rejected() {
        assert!(apply(RECORD, "{}").is_err());
    }

    #[test]
    fn incomplete_record_rejected() {
        assert!(apply(r#"{"id":1}"#, r#"{"status":false}"#).is_err());
    }
}
