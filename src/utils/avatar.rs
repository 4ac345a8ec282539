use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

// RFC 3986 非保留字符之外全部编码
const SEED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// 根据姓名生成默认首字母头像地址
pub fn default_avatar_url(base: &str, name: &str) -> String {
    format!(
        "{}?seed={}&backgroundColor=c084fc,f472b6,60a5fa,34d399,fbbf24&backgroundType=gradientLinear&fontFamily=Arial&fontSize=40&chars=2",
        base.trim_end_matches('?'),
        utf8_percent_encode(name, SEED)
    )
}
