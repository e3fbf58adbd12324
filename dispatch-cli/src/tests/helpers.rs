//! Test helpers for composing dispatch request files.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Write `contents` to `path`, panicking with context on failure.
pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write test file");
}

/// Temporary directory rooted at a UTF-8 path.
pub(super) fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// Request with one worker and two normal orders.
pub(super) fn sample_request() -> Value {
    json!({
        "vehicleProfile": "driving",
        "workers": [{
            "id": "w1", "lat": 52.52, "lon": 13.40, "shiftStart": "08:00",
            "maxSessionHours": 8, "capacity": 10
        }],
        "orders": [
            {"id": "o1", "lat": 52.50, "lon": 13.42, "serviceTimeSeconds": 120, "priorityTier": 1},
            {"id": "o2", "lat": 52.51, "lon": 13.43, "serviceTimeSeconds": 60, "priorityTier": 2}
        ]
    })
}

/// Write `request` as pretty JSON to `path`.
pub(super) fn write_request(path: &Utf8Path, request: &Value) {
    let payload = serde_json::to_string_pretty(request).expect("serialise request");
    write_utf8(path, payload.as_bytes());
}
