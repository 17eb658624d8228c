//! HTTP リクエストパーサー

use crate::error::Error;
use crate::headers::{check_partial_line, find_line, is_token_char};
use crate::limits::DecoderLimits;
use crate::request::{Request, RequestLine};

use super::state::ParseState;
use super::window::ParseWindow;

/// ボディ用に先に確保する容量の上限
const INITIAL_BODY_CAPACITY: usize = 64 * 1024;

/// HTTP リクエストパーサー (Sans I/O)
///
/// 未消費のバイト列を [`RequestParser::parse`] に渡すと、消費したバイト数を返す。
/// 呼び出し側はその分だけバッファを左に詰め、残りを次回の呼び出しでもう一度渡す。
/// 分割のされ方に関係なく同じ `Request` と同じ消費バイト数になる。
///
/// ```rust
/// use http11_wire::{ParseState, RequestParser};
///
/// let mut parser = RequestParser::new();
/// let data = b"POST /coffee HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
///
/// let consumed = parser.parse(&data[..10]).unwrap();
/// assert_eq!(consumed, 0);
///
/// let consumed = parser.parse(data).unwrap();
/// assert_eq!(consumed, data.len());
/// assert_eq!(parser.state(), ParseState::Done);
///
/// let request = parser.into_request().unwrap();
/// assert_eq!(request.method(), "POST");
/// assert_eq!(request.version(), "1.1");
/// assert_eq!(request.body(), b"hello");
/// ```
#[derive(Debug, Clone)]
pub struct RequestParser {
    request: Request,
    limits: DecoderLimits,
    error: Option<Error>,
    content_length: usize,
    consumed: usize,
    received: bool,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    /// 新しいパーサーを作成
    pub fn new() -> Self {
        Self::with_limits(DecoderLimits::default())
    }

    /// 制限付きでパーサーを作成
    pub fn with_limits(limits: DecoderLimits) -> Self {
        Self {
            request: Request::new(),
            limits,
            error: None,
            content_length: 0,
            consumed: 0,
            received: false,
        }
    }

    /// 制限設定を取得
    pub fn limits(&self) -> &DecoderLimits {
        &self.limits
    }

    /// 現在の状態
    pub fn state(&self) -> ParseState {
        self.request.state
    }

    /// 組み立て中のリクエスト
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// これまでに消費した合計バイト数
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Error 状態で保持しているエラー
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// パースを 1 回進める
    ///
    /// `data` は未消費のバイト列全体。戻り値は今回消費したバイト数で、0 ならデータ不足。
    /// Done 状態では何もせず 0 を返し、Error 状態では保持しているエラーを返す。
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, Error> {
        if let Some(e) = &self.error {
            return Err(e.clone());
        }
        if !data.is_empty() {
            self.received = true;
        }

        match self.parse_pass(data) {
            Ok(read) => {
                self.consumed += read;
                Ok(read)
            }
            Err(e) => self.fail(e),
        }
    }

    /// トランスポートの終端を通知する
    ///
    /// Done 以外の状態で呼ばれた場合はエラーにして Error 状態へ遷移する。
    pub fn finish(&mut self) -> Result<(), Error> {
        if let Some(e) = &self.error {
            return Err(e.clone());
        }

        let e = match self.request.state {
            ParseState::Done => return Ok(()),
            ParseState::Init if !self.received => Error::ConnectionClosed,
            ParseState::Init | ParseState::Headers => Error::IncompleteHead,
            ParseState::Body => Error::TruncatedBody {
                expected: self.content_length,
                received: self.request.body.len(),
            },
            ParseState::Error => {
                Error::InvalidState("error state without stored error".to_string())
            }
        };
        self.fail(e)
    }

    /// ウィンドウ上の未消費データでパースを 1 回進め、消費分を捨てる
    ///
    /// 進めた後もウィンドウが満杯のままなら、これ以上読み込めないので
    /// `Error::BufferOverflow` にする。
    pub fn pump(&mut self, window: &mut ParseWindow) -> Result<ParseState, Error> {
        let read = self.parse(window.filled())?;
        window.consume(read);

        if !self.state().is_terminal() && window.is_full() {
            return self.fail(Error::BufferOverflow {
                size: window.len(),
                limit: window.capacity(),
            });
        }
        Ok(self.state())
    }

    /// 完成したリクエストを取り出す
    pub fn into_request(self) -> Result<Request, Error> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if self.request.state != ParseState::Done {
            return Err(Error::InvalidState(format!(
                "request is not complete: {}",
                self.request.state
            )));
        }
        Ok(self.request)
    }

    fn fail<T>(&mut self, e: Error) -> Result<T, Error> {
        self.request.state = ParseState::Error;
        self.error = Some(e.clone());
        Err(e)
    }

    fn parse_pass(&mut self, data: &[u8]) -> Result<usize, Error> {
        let mut read = 0;

        loop {
            let rest = &data[read..];
            match self.request.state {
                ParseState::Init => {
                    let Some((line, n)) = parse_request_line(rest, &self.limits)? else {
                        break;
                    };
                    self.request.request_line = Some(line);
                    self.request.state = ParseState::Headers;
                    read += n;
                }
                ParseState::Headers => {
                    let (n, done) = self
                        .request
                        .headers
                        .parse_all_with_limits(rest, &self.limits)?;
                    read += n;
                    if !done {
                        break;
                    }

                    let len = self.request.headers.content_length();
                    if len > self.limits.max_body_size {
                        return Err(Error::BodyTooLarge {
                            size: len,
                            limit: self.limits.max_body_size,
                        });
                    }
                    self.content_length = len;
                    if len == 0 {
                        self.request.state = ParseState::Done;
                    } else {
                        // 宣言された長さではなく受信した分だけ確保する
                        self.request.body.reserve(len.min(INITIAL_BODY_CAPACITY));
                        self.request.state = ParseState::Body;
                    }
                }
                ParseState::Body => {
                    let remaining = self.content_length - self.request.body.len();
                    if rest.len() > remaining {
                        return Err(Error::BodyOverflow {
                            expected: self.content_length,
                            received: self.request.body.len() + rest.len(),
                        });
                    }

                    self.request.body.extend_from_slice(rest);
                    read += rest.len();
                    if self.request.body.len() == self.content_length {
                        self.request.state = ParseState::Done;
                    }
                    break;
                }
                ParseState::Done => break,
                ParseState::Error => {
                    return Err(Error::InvalidState(
                        "parse called in error state".to_string(),
                    ));
                }
            }
        }

        Ok(read)
    }
}

/// リクエスト行をパース
///
/// CRLF がまだ無ければ `None`。成功時は CRLF を含めた消費バイト数を返す。
fn parse_request_line(
    data: &[u8],
    limits: &DecoderLimits,
) -> Result<Option<(RequestLine, usize)>, Error> {
    let Some(pos) = find_line(data) else {
        check_partial_line(data, limits.max_line_size)?;
        return Ok(None);
    };
    if pos > limits.max_line_size {
        return Err(Error::LineTooLong {
            size: pos,
            limit: limits.max_line_size,
        });
    }

    let line = std::str::from_utf8(&data[..pos])
        .map_err(|e| Error::MalformedRequestLine(format!("invalid UTF-8: {e}")))?;

    // METHOD SP TARGET SP HTTP/VERSION
    let parts: Vec<&str> = line.split(' ').collect();
    let [method, target, version] = parts.as_slice() else {
        return Err(Error::MalformedRequestLine(format!(
            "expected 3 parts, got {}: {:?}",
            parts.len(),
            line
        )));
    };

    if method.is_empty() || !method.bytes().all(is_token_char) {
        return Err(Error::MalformedRequestLine(format!(
            "invalid method: {:?}",
            method
        )));
    }
    if target.is_empty() {
        return Err(Error::MalformedRequestLine(
            "empty request-target".to_string(),
        ));
    }
    let version = version
        .strip_prefix("HTTP/")
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            Error::MalformedRequestLine(format!("invalid HTTP version: {:?}", version))
        })?;

    let request_line = RequestLine::new(
        method.to_string(),
        target.to_string(),
        version.to_string(),
    );
    Ok(Some((request_line, pos + 2)))
}
