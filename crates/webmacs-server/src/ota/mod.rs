//! OTA firmware update orchestration: the apply-with-download flow and
//! update discovery (§4.H).

mod version;

pub use version::{is_newer, sanitize_for_path, Version};

use std::path::PathBuf;
use std::time::Duration;

use diesel_async::AsyncPgConnection;
use futures::StreamExt;
use jiff_diesel::Timestamp as DieselTimestamp;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use webmacs_core::{Error, ErrorKind};
use webmacs_data::model::{FirmwareUpdate, FirmwareUpdateChangeset};
use webmacs_data::query::FirmwareUpdateRepository;
use webmacs_data::types::FirmwareStatus;

/// Tracing target for OTA lifecycle events.
pub const TRACING_TARGET: &str = "webmacs_server::ota";

const DOWNLOAD_TIMEOUT_SECS: u64 = 30;
const RELEASE_INDEX_TIMEOUT_SECS: u64 = 8;

/// Requests a transition and fails with [`ErrorKind::InvalidTransition`]
/// if it is not in the allowed-transition table (§4.H).
async fn transition(
    conn: &mut AsyncPgConnection,
    firmware: &FirmwareUpdate,
    target: FirmwareStatus,
    extra: FirmwareUpdateChangeset,
) -> Result<FirmwareUpdate, Error> {
    if !firmware.status.can_transition_to(target) {
        return Err(ErrorKind::InvalidTransition.with_context(format!(
            "cannot transition firmware update from {:?} to {target:?}",
            firmware.status
        )));
    }

    FirmwareUpdateRepository::update(
        conn,
        firmware.public_id,
        FirmwareUpdateChangeset { status: Some(target), ..extra },
    )
    .await
    .map_err(|e| e.into_core())
}

/// Runs the full seven-step apply-with-download flow against a remote
/// firmware archive URL.
pub async fn apply_with_download(
    conn: &mut AsyncPgConnection,
    update_dir: &str,
    firmware_public_id: Uuid,
    download_url: &str,
    expected_hash: Option<&str>,
) -> Result<FirmwareUpdate, Error> {
    let firmware = FirmwareUpdateRepository::find_by_public_id(conn, firmware_public_id)
        .await
        .map_err(|e| e.into_core())?;

    // Step 1: downloading.
    let firmware = transition(
        conn,
        &firmware,
        FirmwareStatus::Downloading,
        FirmwareUpdateChangeset {
            started_on: Some(DieselTimestamp::from(jiff::Timestamp::now())),
            error_message: Some(String::new()),
            ..Default::default()
        },
    )
    .await?;

    let file_name = format!("firmware-{}.tar.gz", sanitize_for_path(&firmware.version));
    let file_path = PathBuf::from(update_dir).join(&file_name);

    // Step 2: stream + hash.
    let download_result = download_and_hash(download_url, &file_path).await;
    let (file_size, computed_hash) = match download_result {
        Ok(result) => result,
        Err(err) => {
            let _ = tokio::fs::remove_file(&file_path).await;
            return fail(conn, &firmware, err.to_string()).await;
        }
    };

    // Step 3: record file_path/file_size_bytes.
    let firmware = FirmwareUpdateRepository::update(
        conn,
        firmware.public_id,
        FirmwareUpdateChangeset {
            file_path: Some(file_path.to_string_lossy().into_owned()),
            file_size_bytes: Some(file_size as i64),
            file_hash_sha256: Some(computed_hash.clone()),
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into_core())?;

    // Step 4: verifying.
    let firmware = transition(conn, &firmware, FirmwareStatus::Verifying, FirmwareUpdateChangeset::default()).await?;

    if let Some(expected) = expected_hash {
        if !expected.eq_ignore_ascii_case(&computed_hash) {
            let _ = tokio::fs::remove_file(&file_path).await;
            return fail(conn, &firmware, "SHA-256 hash verification failed".to_string()).await;
        }
    }

    // Step 5: applying.
    let firmware = transition(conn, &firmware, FirmwareStatus::Applying, FirmwareUpdateChangeset::default()).await?;

    // Step 6: re-verify the stored hash off the event loop.
    let expected_on_disk = computed_hash.clone();
    let reverify_path = file_path.clone();
    let matches = tokio::task::spawn_blocking(move || hash_file_blocking(&reverify_path))
        .await
        .map_err(|e| ErrorKind::Transient.with_context(format!("hash re-verification task panicked: {e}")))?
        .map(|hash| hash.eq_ignore_ascii_case(&expected_on_disk))
        .unwrap_or(false);

    if !matches {
        return fail(conn, &firmware, "SHA-256 re-verification after apply failed".to_string()).await;
    }

    // Step 7: completed.
    transition(
        conn,
        &firmware,
        FirmwareStatus::Completed,
        FirmwareUpdateChangeset {
            completed_on: Some(DieselTimestamp::from(jiff::Timestamp::now())),
            ..Default::default()
        },
    )
    .await
}

async fn fail(
    conn: &mut AsyncPgConnection,
    firmware: &FirmwareUpdate,
    message: String,
) -> Result<FirmwareUpdate, Error> {
    tracing::warn!(target: TRACING_TARGET, firmware_id = %firmware.public_id, error = %message, "firmware update failed");
    transition(
        conn,
        firmware,
        FirmwareStatus::Failed,
        FirmwareUpdateChangeset { error_message: Some(message), ..Default::default() },
    )
    .await
}

/// Walks the same state sequence as [`apply_with_download`] without any
/// network I/O, for a firmware record whose archive is already staged on
/// disk (§6: the apply body is entirely optional). If `expected_hash` is
/// given it is compared against the record's stored hash; a record with no
/// stored hash and a caller-supplied expectation fails verification rather
/// than silently skipping it.
pub async fn apply_in_place(
    conn: &mut AsyncPgConnection,
    firmware_public_id: Uuid,
    expected_hash: Option<&str>,
) -> Result<FirmwareUpdate, Error> {
    let firmware = FirmwareUpdateRepository::find_by_public_id(conn, firmware_public_id)
        .await
        .map_err(|e| e.into_core())?;

    let firmware = transition(
        conn,
        &firmware,
        FirmwareStatus::Downloading,
        FirmwareUpdateChangeset {
            started_on: Some(DieselTimestamp::from(jiff::Timestamp::now())),
            error_message: Some(String::new()),
            ..Default::default()
        },
    )
    .await?;

    let firmware = transition(conn, &firmware, FirmwareStatus::Verifying, FirmwareUpdateChangeset::default()).await?;

    if let Some(expected) = expected_hash {
        let matches = firmware
            .file_hash_sha256
            .as_deref()
            .is_some_and(|stored| stored.eq_ignore_ascii_case(expected));
        if !matches {
            return fail(conn, &firmware, "SHA-256 hash verification failed".to_string()).await;
        }
    }

    let firmware = transition(conn, &firmware, FirmwareStatus::Applying, FirmwareUpdateChangeset::default()).await?;

    transition(
        conn,
        &firmware,
        FirmwareStatus::Completed,
        FirmwareUpdateChangeset {
            completed_on: Some(DieselTimestamp::from(jiff::Timestamp::now())),
            ..Default::default()
        },
    )
    .await
}

/// Rolls a completed update back (the sole transition out of `completed`).
pub async fn rollback(conn: &mut AsyncPgConnection, firmware_public_id: Uuid) -> Result<FirmwareUpdate, Error> {
    let firmware = FirmwareUpdateRepository::find_by_public_id(conn, firmware_public_id)
        .await
        .map_err(|e| e.into_core())?;
    transition(conn, &firmware, FirmwareStatus::RolledBack, FirmwareUpdateChangeset::default()).await
}

/// Streams `url` to `path`, computing SHA-256 incrementally. Returns
/// `(bytes_written, hex_digest)`. A non-200 status or transport error is
/// surfaced as a plain error string for the caller to record.
async fn download_and_hash(url: &str, path: &std::path::Path) -> Result<(u64, String), String> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| e.to_string())?;
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .build()
        .map_err(|e| e.to_string())?;

    let response = client.get(url).send().await.map_err(|e| e.to_string())?;
    if response.status().as_u16() != 200 {
        return Err(format!("download responded with status {}", response.status()));
    }

    let mut file = tokio::fs::File::create(path).await.map_err(|e| e.to_string())?;
    let mut hasher = Sha256::new();
    let mut written: u64 = 0;
    let mut stream = response.bytes_stream();

    use tokio::io::AsyncWriteExt;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| e.to_string())?;
        hasher.update(&chunk);
        written += chunk.len() as u64;
        file.write_all(&chunk).await.map_err(|e| e.to_string())?;
    }
    file.flush().await.map_err(|e| e.to_string())?;

    Ok((written, hex::encode(hasher.finalize())))
}

fn hash_file_blocking(path: &std::path::Path) -> Option<String> {
    use std::io::Read;
    let mut file = std::fs::File::open(path).ok()?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Some(hex::encode(hasher.finalize()))
}

/// One candidate in a status envelope (§4.H update discovery).
#[derive(Debug, Clone, Serialize)]
pub struct UpdateCandidate {
    pub version: String,
    pub source: &'static str,
    pub changelog: Option<String>,
}

/// The merged result of update discovery: whether a newer version exists
/// and which source won.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateStatus {
    pub current_version: String,
    pub update_available: bool,
    pub best: Option<UpdateCandidate>,
    pub local_candidates: Vec<UpdateCandidate>,
    pub remote_candidate: Option<UpdateCandidate>,
}

#[derive(Debug, Deserialize)]
struct GithubRelease {
    tag_name: String,
    body: Option<String>,
}

/// Combines the local firmware table with a single GitHub releases/latest
/// query; the higher version wins (§4.H).
pub async fn discover_updates(
    conn: &mut AsyncPgConnection,
    current_version: &str,
    github_owner: &str,
    github_repo: &str,
) -> webmacs_data::PgResult<UpdateStatus> {
    let candidates = FirmwareUpdateRepository::find_candidates(conn).await?;
    let local_candidates: Vec<UpdateCandidate> = candidates
        .into_iter()
        .filter(|f| is_newer(&f.version, current_version))
        .map(|f| UpdateCandidate { version: f.version, source: "local", changelog: f.changelog })
        .collect();

    let remote_candidate = fetch_latest_release(github_owner, github_repo)
        .await
        .filter(|c| is_newer(&c.version, current_version));

    let mut best: Option<UpdateCandidate> = None;
    for candidate in local_candidates.iter().cloned().chain(remote_candidate.clone()) {
        best = match best {
            None => Some(candidate),
            Some(current_best) if is_newer(&candidate.version, &current_best.version) => Some(candidate),
            Some(current_best) => Some(current_best),
        };
    }

    Ok(UpdateStatus {
        current_version: current_version.to_string(),
        update_available: best.is_some(),
        best,
        local_candidates,
        remote_candidate,
    })
}

async fn fetch_latest_release(owner: &str, repo: &str) -> Option<UpdateCandidate> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(RELEASE_INDEX_TIMEOUT_SECS))
        .user_agent("webmacs-server")
        .build()
        .ok()?;

    let url = format!("https://api.github.com/repos/{owner}/{repo}/releases/latest");
    let response = client.get(url).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    let release: GithubRelease = response.json().await.ok()?;
    let version = release.tag_name.trim_start_matches('v').to_string();

    Some(UpdateCandidate { version, source: "github", changelog: release.body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_local_candidate_beats_older_remote() {
        let local = UpdateCandidate { version: "2.2.0".to_string(), source: "local", changelog: None };
        let remote = UpdateCandidate { version: "2.1.0".to_string(), source: "github", changelog: None };
        assert!(is_newer(&local.version, &remote.version));
    }
}
