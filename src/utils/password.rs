use crate::error::{AppError, AppResult};
use bcrypt::verify;

/// 校验管理员密码；配置值以 `$2` 开头时视为 bcrypt 哈希，否则按明文比较
pub fn verify_admin_password(candidate: &str, configured: &str) -> AppResult<bool> {
    if configured.starts_with("$2") {
        return verify(candidate, configured)
            .map_err(|e| AppError::InternalError(format!("密码验证失败: {e}")));
    }
    Ok(constant_time_eq(candidate.as_bytes(), configured.as_bytes()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcrypt::hash;

    #[test]
    fn test_plain_password() {
        assert!(verify_admin_password("admin888", "admin888").unwrap());
        assert!(!verify_admin_password("admin889", "admin888").unwrap());
        assert!(!verify_admin_password("", "admin888").unwrap());
    }

    #[test]
    fn test_bcrypt_password() {
        let hashed = hash("Password123", 4).unwrap();
        assert!(verify_admin_password("Password123", &hashed).unwrap());
        assert!(!verify_admin_password("WrongPassword", &hashed).unwrap());
    }
}
