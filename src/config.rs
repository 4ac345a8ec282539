use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub admin: AdminConfig,
    #[serde(default)]
    pub lottery: LotteryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// 管理员密码，明文或 bcrypt 哈希（以 `$2` 开头）
    pub password: String,
    pub jwt_secret: String,
    pub token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotteryConfig {
    /// 奖项数量上限
    #[serde(default = "default_max_prizes")]
    pub max_prizes: u64,
    /// 未上传头像时使用的首字母头像服务
    #[serde(default = "default_avatar_base")]
    pub default_avatar_base: String,
}

fn default_max_prizes() -> u64 {
    5
}

fn default_avatar_base() -> String {
    "https://api.dicebear.com/7.x/initials/svg".to_string()
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            max_prizes: default_max_prizes(),
            default_avatar_base: default_avatar_base(),
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL")
                    .ok_or("缺少 DATABASE_URL 环境变量，且未找到配置文件 config.toml")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 3001u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    admin: AdminConfig {
                        password: get_env("ADMIN_PASSWORD")
                            .unwrap_or_else(|| "admin888".to_string()),
                        jwt_secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        token_expires_in: get_env_parse("ADMIN_TOKEN_EXPIRES_IN", 43_200i64),
                    },
                    lottery: LotteryConfig {
                        max_prizes: get_env_parse("LOTTERY_MAX_PRIZES", default_max_prizes()),
                        default_avatar_base: get_env("LOTTERY_DEFAULT_AVATAR_BASE")
                            .unwrap_or_else(default_avatar_base),
                    },
                }
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        config.apply_env_overrides();

        Ok(config)
    }

    pub fn parse(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(toml::from_str(config_str).map_err(|e| format!("解析配置文件失败: {e}"))?)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD") {
            self.admin.password = v;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.admin.jwt_secret = v;
        }
        if let Ok(v) = env::var("ADMIN_TOKEN_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.admin.token_expires_in = n;
        }
        if let Ok(v) = env::var("LOTTERY_MAX_PRIZES")
            && let Ok(n) = v.parse()
        {
            self.lottery.max_prizes = n;
        }
        if let Ok(v) = env::var("LOTTERY_DEFAULT_AVATAR_BASE") {
            self.lottery.default_avatar_base = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_lottery_section_uses_defaults() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 3001

            [database]
            url = "sqlite::memory:"
            max_connections = 1

            [admin]
            password = "secret"
            jwt_secret = "jwt"
            token_expires_in = 600
        "#;
        let config = Config::parse(raw).unwrap();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.lottery.max_prizes, 5);
        assert!(config.lottery.default_avatar_base.starts_with("https://"));
    }

    #[test]
    fn test_parse_rejects_missing_admin_section() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 3001

            [database]
            url = "sqlite::memory:"
            max_connections = 1
        "#;
        assert!(Config::parse(raw).is_err());
    }
}
