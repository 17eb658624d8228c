use crate::headers::Headers;
use crate::parser::ParseState;

/// リクエスト行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    target: String,
    version: String,
}

impl RequestLine {
    pub(crate) fn new(method: String, target: String, version: String) -> Self {
        Self {
            method,
            target,
            version,
        }
    }

    /// HTTP メソッド (GET, POST, etc.)
    pub fn method(&self) -> &str {
        &self.method
    }

    /// リクエストターゲット
    pub fn target(&self) -> &str {
        &self.target
    }

    /// HTTP バージョン (`HTTP/` を除いた部分、例: `1.1`)
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// HTTP リクエスト
///
/// [`RequestParser`](crate::RequestParser) が終端状態に達するまで組み立てる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub(crate) request_line: Option<RequestLine>,
    pub(crate) headers: Headers,
    pub(crate) body: Vec<u8>,
    pub(crate) state: ParseState,
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    /// 空のリクエストを作成
    pub fn new() -> Self {
        Self {
            request_line: None,
            headers: Headers::new(),
            body: Vec::new(),
            state: ParseState::Init,
        }
    }

    /// リクエスト行 (パース前は `None`)
    pub fn request_line(&self) -> Option<&RequestLine> {
        self.request_line.as_ref()
    }

    /// HTTP メソッド
    pub fn method(&self) -> &str {
        self.request_line.as_ref().map_or("", RequestLine::method)
    }

    /// リクエストターゲット
    pub fn target(&self) -> &str {
        self.request_line.as_ref().map_or("", RequestLine::target)
    }

    /// HTTP バージョン
    pub fn version(&self) -> &str {
        self.request_line.as_ref().map_or("", RequestLine::version)
    }

    /// ヘッダー
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// ボディ
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// パース状態
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// パースが完了しているか
    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }
}
