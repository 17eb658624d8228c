//! ヘッダーテーブル
//!
//! フィールド名は小文字に正規化して保持し、同じ名前の再設定は後勝ちで上書きする。
//!
//! ```rust
//! use http11_wire::Headers;
//!
//! let mut headers = Headers::new();
//! let (consumed, done) = headers
//!     .parse_all(b"Host: localhost:3030\r\nContent-Length: 5\r\n\r\nhello")
//!     .unwrap();
//! assert!(done);
//! assert_eq!(consumed, 43);
//! assert_eq!(headers.get("HOST"), "localhost:3030");
//! assert_eq!(headers.content_length(), 5);
//! ```

use std::collections::HashMap;
use std::collections::hash_map;

use crate::error::Error;
use crate::limits::DecoderLimits;

/// Content-Type
pub const CONTENT_TYPE: &str = "content-type";
/// Content-Length
pub const CONTENT_LENGTH: &str = "content-length";
/// Connection
pub const CONNECTION: &str = "connection";
/// Transfer-Encoding
pub const TRANSFER_ENCODING: &str = "transfer-encoding";
/// Trailer
pub const TRAILER: &str = "trailer";

/// 大文字小文字を区別しないヘッダーテーブル
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: HashMap<String, String>,
}

impl Headers {
    /// 空のテーブルを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// レスポンス用のデフォルトヘッダー
    ///
    /// `content-type: text/plain`, `content-length: N`, `connection: close`
    pub fn with_defaults(content_length: usize) -> Self {
        let mut headers = Self::new();
        headers.insert_trusted(CONTENT_TYPE, "text/plain".to_string());
        headers.insert_trusted(CONTENT_LENGTH, content_length.to_string());
        headers.insert_trusted(CONNECTION, "close".to_string());
        headers
    }

    /// ヘッダーを設定
    ///
    /// 名前か値が空の場合は何もせず `Ok(false)` を返す。
    /// 名前にトークン以外の文字が含まれる場合、または値に制御文字が含まれる場合はエラー。
    pub fn set(&mut self, name: &str, value: &str) -> Result<bool, Error> {
        if name.is_empty() || value.is_empty() {
            return Ok(false);
        }
        if !is_valid_field_name(name.as_bytes()) {
            return Err(Error::InvalidHeaderName(name.to_string()));
        }
        if !is_valid_field_value(value.as_bytes()) {
            return Err(Error::MalformedHeader(format!(
                "invalid value for {}: contains control characters",
                name
            )));
        }
        self.fields.insert(name.to_ascii_lowercase(), value.to_string());
        Ok(true)
    }

    /// 検証済みの小文字の名前で設定 (内部用)
    pub(crate) fn insert_trusted(&mut self, name: &'static str, value: String) {
        self.fields.insert(name.to_string(), value);
    }

    /// ヘッダーを取得 (存在しない場合は空文字列)
    pub fn get(&self, name: &str) -> &str {
        self.get_opt(name).unwrap_or("")
    }

    /// ヘッダーを取得
    pub fn get_opt(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// ヘッダーが存在するか確認
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_ascii_lowercase())
    }

    /// ヘッダーを削除
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(&name.to_ascii_lowercase())
    }

    /// フィールド数
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Content-Length を取得
    ///
    /// 存在しない場合やパースできない場合は 0 を返す。
    pub fn content_length(&self) -> usize {
        let value = self.get(CONTENT_LENGTH);
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return 0;
        }
        value.parse().unwrap_or(0)
    }

    /// (名前, 値) を順不同で列挙
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.fields.iter(),
        }
    }

    /// `Trailer` レスポンスヘッダーに載せる値 (フィールド名をカンマ区切りで連結)
    ///
    /// 送信するトレーラーとの一致は検証しない。
    pub fn trailer_field_value(&self) -> String {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names.join(", ")
    }

    /// ヘッダー行を 1 行パースして設定 (CRLF を含まない)
    pub fn parse_line(&mut self, line: &[u8]) -> Result<(), Error> {
        let colon = line
            .iter()
            .position(|&b| b == b':')
            .ok_or_else(|| Error::MalformedHeader("missing colon".to_string()))?;
        let (name, value) = (&line[..colon], &line[colon + 1..]);

        if name.is_empty() {
            return Err(Error::MalformedHeader("empty field name".to_string()));
        }
        if name.ends_with(b" ") || name.ends_with(b"\t") {
            return Err(Error::MalformedHeader("whitespace before colon".to_string()));
        }
        if !is_valid_field_name(name) {
            return Err(Error::MalformedHeader(format!(
                "invalid field name: {:?}",
                String::from_utf8_lossy(name)
            )));
        }

        let value = value.trim_ascii();
        if !is_valid_field_value(value) {
            return Err(Error::MalformedHeader(
                "invalid field value: contains control characters".to_string(),
            ));
        }

        // トークン文字は ASCII のみ
        let name = String::from_utf8_lossy(name);
        let value = decode_field_value(value);
        self.set(&name, &value)?;
        Ok(())
    }

    /// CRLF で区切られたヘッダー行をまとめてパース
    ///
    /// 空行を見つけた時点で `(消費バイト数, true)` を返し、それ以降は読まない。
    /// 完全な行がまだ無い場合は `(0, false)` を返す (エラーではない)。
    pub fn parse_all(&mut self, data: &[u8]) -> Result<(usize, bool), Error> {
        self.parse_all_with_limits(data, &DecoderLimits::unlimited())
    }

    /// 制限付きでヘッダー行をまとめてパース
    pub(crate) fn parse_all_with_limits(
        &mut self,
        data: &[u8],
        limits: &DecoderLimits,
    ) -> Result<(usize, bool), Error> {
        let mut consumed = 0;

        while let Some(pos) = find_line(&data[consumed..]) {
            if pos == 0 {
                return Ok((consumed + 2, true));
            }
            if pos > limits.max_line_size {
                return Err(Error::LineTooLong {
                    size: pos,
                    limit: limits.max_line_size,
                });
            }

            self.parse_line(&data[consumed..consumed + pos])?;
            if self.fields.len() > limits.max_headers_count {
                return Err(Error::TooManyHeaders {
                    count: self.fields.len(),
                    limit: limits.max_headers_count,
                });
            }
            consumed += pos + 2;
        }

        check_partial_line(&data[consumed..], limits.max_line_size)?;
        Ok((consumed, false))
    }
}

/// ヘッダーテーブルのイテレーター
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: hash_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// CRLF で終わる行を探す
pub(crate) fn find_line(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

/// CRLF がまだ来ていない行が制限を超えていないか確認
///
/// 末尾の CR は直後に LF が来る可能性があるので長さに含めない。
pub(crate) fn check_partial_line(rest: &[u8], limit: usize) -> Result<(), Error> {
    let size = rest.strip_suffix(b"\r").unwrap_or(rest).len();
    if size > limit {
        return Err(Error::LineTooLong { size, limit });
    }
    Ok(())
}

/// フィールド名が有効か確認
pub(crate) fn is_valid_field_name(name: &[u8]) -> bool {
    !name.is_empty() && name.iter().copied().all(is_token_char)
}

/// トークン文字か確認
pub(crate) fn is_token_char(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' |
        b'0'..=b'9' | b'A'..=b'Z' | b'^' | b'_' | b'`' | b'a'..=b'z' | b'|' | b'~'
    )
}

/// ヘッダー値に許可される文字か確認 (RFC 9110 Section 5.5)
///
/// VCHAR / obs-text に加えて SP と HTAB を許可する。
fn is_valid_field_value(value: &[u8]) -> bool {
    value
        .iter()
        .all(|&b| matches!(b, 0x09 | 0x20..=0x7E | 0x80..=0xFF))
}

/// ヘッダー値を文字列にする
///
/// UTF-8 として読めない obs-text は ISO-8859-1 として 1 バイト 1 文字に対応付ける。
fn decode_field_value(value: &[u8]) -> String {
    match std::str::from_utf8(value) {
        Ok(value) => value.to_string(),
        Err(_) => value.iter().copied().map(char::from).collect(),
    }
}
