use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub generation_base_url: String,
    pub generation_model: String,
    pub generation_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME").unwrap_or_else(|_| "opinio-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            generation_base_url: env::var("GENERATION_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            generation_model: env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| "llama3.2".to_string()),
            generation_timeout_secs: env::var("GENERATION_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(45),
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "opinio-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            generation_base_url: "http://localhost:11434".to_string(),
            generation_model: "llama3.2".to_string(),
            generation_timeout_secs: 1,
        }
    }
}
