use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub leetcode_username: String,
    pub github_username: String,
    pub gfg_username: String,
    pub extra_solved: u64,
    pub contest_rating: Option<f64>,
    pub cache_ttl_minutes: i64,
    pub db_path: String,
    pub app_data_dir: String,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub cleared: usize,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}
