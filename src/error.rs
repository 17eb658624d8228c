use std::fmt;

/// HTTP パース/フレーミングエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// 不正なリクエスト行
    MalformedRequestLine(String),
    /// 不正なヘッダー行
    MalformedHeader(String),
    /// ヘッダー名にトークン以外の文字が含まれている
    InvalidHeaderName(String),
    /// Content-Length より短いまま終端に達した
    TruncatedBody { expected: usize, received: usize },
    /// Content-Length を超えるボディ
    BodyOverflow { expected: usize, received: usize },
    /// Content-Length が上限を超えている
    BodyTooLarge { size: usize, limit: usize },
    /// 行が長すぎる (リクエスト行またはヘッダー行)
    LineTooLong { size: usize, limit: usize },
    /// パースウィンドウが満杯のまま進めない
    BufferOverflow { size: usize, limit: usize },
    /// ヘッダー数超過
    TooManyHeaders { count: usize, limit: usize },
    /// ヘッダー終端前に入力が終わった
    IncompleteHead,
    /// 何も受信しないまま接続が閉じられた
    ConnectionClosed,
    /// 状態に合わない呼び出し
    InvalidState(String),
}

impl Error {
    /// 入力不正 (4xx で応答すべき) エラーかどうか
    pub fn is_malformed_input(&self) -> bool {
        !matches!(self, Error::ConnectionClosed | Error::InvalidState(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedRequestLine(msg) => write!(f, "malformed request line: {}", msg),
            Error::MalformedHeader(msg) => write!(f, "malformed header: {}", msg),
            Error::InvalidHeaderName(name) => {
                write!(f, "malformed header: invalid field name: {:?}", name)
            }
            Error::TruncatedBody { expected, received } => {
                write!(
                    f,
                    "truncated body: content-length {} but received {}",
                    expected, received
                )
            }
            Error::BodyOverflow { expected, received } => {
                write!(
                    f,
                    "body overflow: content-length {} but received {}",
                    expected, received
                )
            }
            Error::BodyTooLarge { size, limit } => {
                write!(f, "body too large: {} > {}", size, limit)
            }
            Error::LineTooLong { size, limit } => {
                write!(f, "line too long: {} > {}", size, limit)
            }
            Error::BufferOverflow { size, limit } => {
                write!(f, "buffer overflow: {} >= {}", size, limit)
            }
            Error::TooManyHeaders { count, limit } => {
                write!(f, "too many headers: {} > {}", count, limit)
            }
            Error::IncompleteHead => write!(f, "incomplete request head"),
            Error::ConnectionClosed => write!(f, "connection closed before request"),
            Error::InvalidState(msg) => write!(f, "invalid state: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_input() {
        assert!(Error::MalformedHeader("missing colon".to_string()).is_malformed_input());
        assert!(Error::IncompleteHead.is_malformed_input());
        assert!(Error::BufferOverflow { size: 8, limit: 8 }.is_malformed_input());
        assert!(!Error::ConnectionClosed.is_malformed_input());
        assert!(!Error::InvalidState("done".to_string()).is_malformed_input());
    }

    #[test]
    fn display() {
        assert_eq!(
            Error::TruncatedBody {
                expected: 20,
                received: 15
            }
            .to_string(),
            "truncated body: content-length 20 but received 15"
        );
        assert_eq!(
            Error::InvalidHeaderName("H©st".to_string()).to_string(),
            "malformed header: invalid field name: \"H©st\""
        );
    }
}
