//! One-way export projection. Not a re-importable format.

use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::StoreError;
use crate::schema::Session;

/// Application name stamped into export documents.
pub const APP_NAME: &str = "palaver";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub exported_at: String,
    pub app: String,
    pub session: Session,
}

/// Build the export projection of one session with a current RFC3339 stamp.
pub fn export_document(session: &Session) -> Result<ExportDocument, StoreError> {
    let exported_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(StoreError::ClockFormat)?;
    Ok(ExportDocument {
        exported_at,
        app: APP_NAME.to_string(),
        session: session.clone(),
    })
}
