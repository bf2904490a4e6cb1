use serde::Deserialize;

/// Typed settings assembled the way the teacher composes config sections
/// into a core aggregate: listening addresses, retransmission/reaper
/// timing, and the persisted-store location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifySrvConfig {
    pub udp_bind: String,
    pub tcp_bind: String,
    pub retrans_secs: u64,
    pub max_packet_age_secs: u64,
    pub max_client_age_secs: u64,
    pub admin_uid: i64,
    pub sqlite_path: String,
}

impl Default for NotifySrvConfig {
    fn default() -> Self {
        NotifySrvConfig {
            udp_bind: "0.0.0.0:2154".to_string(),
            tcp_bind: "0.0.0.0:2152".to_string(),
            retrans_secs: 20,
            max_packet_age_secs: 300,
            max_client_age_secs: 300,
            admin_uid: 1,
            sqlite_path: "sticky_notices.sqlite".to_string(),
        }
    }
}

impl NotifySrvConfig {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
