use std::fmt;

/// HTTP ステータス (コードとステータスフレーズ)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode {
    code: u16,
    reason: &'static str,
}

impl StatusCode {
    /// 200 OK
    pub const OK: StatusCode = StatusCode::new(200, "OK");
    /// 400 Bad Request
    pub const BAD_REQUEST: StatusCode = StatusCode::new(400, "Bad Request");
    /// 404 Not Found
    pub const NOT_FOUND: StatusCode = StatusCode::new(404, "Not Found");
    /// 413 Content Too Large
    pub const PAYLOAD_TOO_LARGE: StatusCode = StatusCode::new(413, "Content Too Large");
    /// 431 Request Header Fields Too Large
    pub const REQUEST_HEADER_FIELDS_TOO_LARGE: StatusCode =
        StatusCode::new(431, "Request Header Fields Too Large");
    /// 500 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode::new(500, "Internal Server Error");

    /// ステータスを作成
    pub const fn new(code: u16, reason: &'static str) -> Self {
        Self { code, reason }
    }

    /// ステータスコード
    pub const fn code(&self) -> u16 {
        self.code
    }

    /// ステータスフレーズ
    pub const fn reason(&self) -> &'static str {
        self.reason
    }

    /// ステータスコードがサーバーエラー (5xx) か確認
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.code)
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        Self::OK
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.reason)
    }
}
