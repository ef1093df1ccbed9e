use axum::http::{header, HeaderMap};

/// Name of the admin session cookie.
pub const SESSION_COOKIE: &str = "pt_session";

/// Extract the session token from the Cookie header, if present.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookie_str| {
            cookie_str
                .split(';')
                .find_map(|c| c.trim().strip_prefix("pt_session="))
                .map(|t| t.to_string())
        })
}

pub fn build_session_cookie(token: &str, https: bool, session_days: u32) -> String {
    let secure = if https { "; Secure" } else { "" };
    format!(
        "{SESSION_COOKIE}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}{}",
        token,
        u64::from(session_days) * 86_400,
        secure,
    )
}

pub fn clear_session_cookie(https: bool) -> String {
    let secure = if https { "; Secure" } else { "" };
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0{}", secure)
}
