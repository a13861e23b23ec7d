use serde::Serialize;

/// Summary of one sync run, returned by the trigger endpoints
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncSummary {
    pub message: String,
    pub elements: usize,
    pub interfaces: usize,
    pub records: usize,
    pub skipped: usize,
}
