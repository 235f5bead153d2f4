use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::db::Database;
use crate::models::Paste;
use crate::types::api::{CreatePaste, CreatedPaste, PasteContent};
use crate::{ApiError, ApiResult};

/// Create a paste and return its retrieval link.
pub async fn create(db: &mut Database, request: CreatePaste) -> ApiResult<CreatedPaste> {
    let content = validate_content(request.content)?;

    let now = Utc::now();
    let id = generate_id(now);
    let expires_at = expiry_time(now, request.expires_in_minutes)?;
    let max_views = view_limit(request.max_views);

    info!(
        "new paste: id='{id}', size={size}, expires_at={expires_at:?}, max_views={max_views:?}",
        size = content.len()
    );

    db.insert_paste(&id, &content, expires_at, max_views).await?;

    Ok(CreatedPaste {
        link: format!("/paste/{id}"),
        id,
    })
}

/// Read a paste, counting the view. Fails with `Expired` once the paste is
/// past its expiry time or out of views; an expired paste is never counted.
pub async fn read(db: &mut Database, id: &str) -> ApiResult<PasteContent> {
    let paste = db.get_paste(id).await?;

    check_access(&paste, Utc::now())?;

    // Separate statement; the reported total is computed from the row read
    // above rather than re-queried.
    db.increment_views(id).await?;

    Ok(PasteContent {
        content: paste.content,
        views: paste.view_count + 1,
    })
}

/// Content is required and must be non-empty.
fn validate_content(content: Option<String>) -> ApiResult<String> {
    match content {
        Some(content) if !content.is_empty() => Ok(content),
        _ => Err(ApiError::MissingContent),
    }
}

/// A view limit of zero means no limit, matching the upstream API.
fn view_limit(max_views: Option<i32>) -> Option<i32> {
    max_views.filter(|limit| *limit != 0)
}

/// Paste ids are the creation time in milliseconds. Two creations within the
/// same millisecond collide on the primary key and the second insert fails.
fn generate_id(now: DateTime<Utc>) -> String {
    now.timestamp_millis().to_string()
}

/// Compute the expiry timestamp from the requested lifetime. Zero counts as
/// "no expiry"; negative lifetimes produce an already-expired paste. A
/// lifetime that is not finite or lands outside the representable timestamp
/// range fails the request.
fn expiry_time(now: DateTime<Utc>, minutes: Option<f64>) -> ApiResult<Option<DateTime<Utc>>> {
    let Some(minutes) = minutes.filter(|minutes| *minutes != 0.0) else {
        return Ok(None);
    };

    let millis = minutes * 60_000.0;
    if !millis.is_finite() {
        return Err(ApiError::ExpiryOutOfRange);
    }

    // the cast saturates; checked_add_signed catches the out-of-range cases
    now.checked_add_signed(Duration::milliseconds(millis as i64))
        .map(Some)
        .ok_or(ApiError::ExpiryOutOfRange)
}

/// Evaluate the access policy: the time check runs first, then the view
/// limit. Each is independently sufficient to reject.
fn check_access(paste: &Paste, current_time: DateTime<Utc>) -> ApiResult<()> {
    if let Some(expires_at) = paste.expires_at {
        if expires_at < current_time {
            return Err(ApiError::Expired);
        }
    }

    if let Some(max_views) = paste.max_views {
        if paste.view_count >= max_views {
            return Err(ApiError::Expired);
        }
    }

    Ok(())
}
