//! JSONL transcript writer for exchange events.
//!
//! Each [`ExchangeEvent`] becomes one JSON line carrying `type`, `timestamp`
//! and a per-transcript `seq`, merged with the event payload. The file is
//! opened in append mode so successive runs accumulate in one transcript.

use casematch_application::{ExchangeEvent, ExchangeLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Exchange logger that appends one JSON object per line.
pub struct JsonlExchangeLogger {
    state: Mutex<TranscriptState>,
    path: PathBuf,
}

struct TranscriptState {
    writer: BufWriter<File>,
    seq: u64,
}

impl JsonlExchangeLogger {
    /// Open (or create) the transcript at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            state: Mutex::new(TranscriptState {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(event: ExchangeEvent, seq: u64) -> Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    let mut map = match event.payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert("type".to_string(), Value::String(event.event_type.to_string()));
    map.insert("timestamp".to_string(), Value::String(timestamp));
    map.insert("seq".to_string(), Value::from(seq));
    Value::Object(map)
}

impl ExchangeLogger for JsonlExchangeLogger {
    fn log(&self, event: ExchangeEvent) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        state.seq += 1;
        let line = record(event, state.seq).to_string();

        if let Err(e) = writeln!(state.writer, "{}", line).and_then(|_| state.writer.flush()) {
            warn!("Could not write transcript {}: {}", self.path.display(), e);
        }
    }
}
