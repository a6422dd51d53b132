use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tokio::sync::mpsc;

/// Member activity log (joins, redirects, logouts, donations) in `logs/latest.log`.
///
/// Lines go through an unbounded channel to a background writer, so `log()`
/// never waits on disk.
#[derive(Clone)]
pub struct ActivityLogger {
    tx: mpsc::UnboundedSender<String>,
}

impl ActivityLogger {
    /// Open a new activity log in `logs_dir`.
    ///
    /// - Creates the directory if it doesn't exist
    /// - Rotates `latest.log` → `session-{timestamp}.log`
    /// - Keeps at most `retention` rotated logs
    /// - Spawns a background writer task
    ///
    /// Must be called inside a tokio runtime.
    pub async fn open(logs_dir: &Path, retention: usize) -> Option<Self> {
        if tokio::fs::create_dir_all(logs_dir).await.is_err() {
            return None;
        }

        let latest = logs_dir.join("latest.log");
        if tokio::fs::try_exists(&latest).await.unwrap_or(false) {
            let rotated = logs_dir.join(format!("session-{}.log", Utc::now().timestamp_millis()));
            let _ = tokio::fs::rename(&latest, &rotated).await;
        }

        cleanup_old_sessions(logs_dir, retention).await;

        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&latest)
            .await
            .ok()?;

        let (tx, rx) = mpsc::unbounded_channel::<String>();
        tokio::spawn(writer_task(file, rx));

        let _ = tx.send(format!("=== BlueHearts session — {} ===\n\n", timestamp()));

        Some(Self { tx })
    }

    /// Send a log line. Never blocks.
    pub fn log(&self, prefix: &str, line: &str) {
        let _ = self.tx.send(format!("[{}] [{prefix}] {line}\n", timestamp()));
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

async fn writer_task(file: tokio::fs::File, mut rx: mpsc::UnboundedReceiver<String>) {
    use tokio::io::AsyncWriteExt;
    let mut writer = tokio::io::BufWriter::new(file);

    while let Some(line) = rx.recv().await {
        let _ = writer.write_all(line.as_bytes()).await;
        let _ = writer.flush().await;
    }

    let footer = format!("\n=== Session ended — {} ===\n", timestamp());
    let _ = writer.write_all(footer.as_bytes()).await;
    let _ = writer.flush().await;
}

/// Keep only the `retention` most recent `session-*.log` files.
async fn cleanup_old_sessions(logs_dir: &Path, retention: usize) {
    let mut entries = match tokio::fs::read_dir(logs_dir).await {
        Ok(rd) => rd,
        Err(_) => return,
    };

    let mut session_files: Vec<PathBuf> = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("session-") && name.ends_with(".log") {
            session_files.push(entry.path());
        }
    }

    // Timestamp is embedded and fixed-width, so lexicographic = chronological
    session_files.sort();

    let excess = session_files.len().saturating_sub(retention);
    for oldest in session_files.drain(..excess) {
        let _ = tokio::fs::remove_file(oldest).await;
    }
}

/// Mask an address for log lines: `ada@example.com` → `a***@example.com`.
pub fn redact_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{first}***@{domain}")
        }
        None => "***".to_string(),
    }
}
