//! PBT テスト共通ユーティリティ

use std::collections::BTreeMap;

use proptest::prelude::*;

// ========================================
// トークン / ヘッダー生成 (RFC 9110)
// ========================================

/// tchar
pub fn token_char() -> impl Strategy<Value = char> {
    prop_oneof![
        prop::char::range('a', 'z'),
        prop::char::range('A', 'Z'),
        prop::char::range('0', '9'),
        prop::sample::select(vec![
            '!', '#', '$', '%', '&', '\'', '*', '+', '-', '.', '^', '_', '`', '|', '~',
        ]),
    ]
}

/// token (1-32 文字)
pub fn token() -> impl Strategy<Value = String> {
    proptest::collection::vec(token_char(), 1..=32).prop_map(|chars| chars.into_iter().collect())
}

/// フィールド名 (小文字、Content-Length 以外)
pub fn header_name() -> impl Strategy<Value = String> {
    token()
        .prop_map(|s| s.to_ascii_lowercase())
        .prop_filter("content-length is framing", |s| s != "content-length")
}

/// フィールド値 (前後に空白を含まない可視 ASCII)
pub fn header_value() -> impl Strategy<Value = String> {
    "[!-~]([ -~]{0,30}[!-~])?".prop_map(|s| s)
}

/// 名前が重複しないヘッダー一覧
pub fn header_map() -> impl Strategy<Value = BTreeMap<String, String>> {
    proptest::collection::btree_map(header_name(), header_value(), 0..10)
}

/// 大文字小文字を混ぜる
pub fn mixed_case(name: &str, mask: u64) -> String {
    name.chars()
        .enumerate()
        .map(|(i, c)| {
            if mask & (1 << (i % 64)) != 0 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

// ========================================
// リクエスト生成
// ========================================

/// HTTP メソッド
pub fn http_method() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("GET".to_string()),
        Just("POST".to_string()),
        Just("PUT".to_string()),
        Just("DELETE".to_string()),
        Just("PATCH".to_string()),
        token(),
    ]
}

/// リクエストターゲット (origin-form)
pub fn request_target() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("/".to_string()),
        "/[a-zA-Z0-9/_.-]{1,64}".prop_map(|s| s),
    ]
}

/// ボディ
pub fn body() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..512)
}

/// 読み取りごとの大きさ (この列を繰り返して使う)
pub fn read_sizes() -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(1usize..64, 1..16)
}

/// リクエストのバイト列を組み立てる
///
/// ボディが空でなければ Content-Length を付ける。
pub fn request_bytes(
    method: &str,
    target: &str,
    headers: &BTreeMap<String, String>,
    body: &[u8],
) -> Vec<u8> {
    let mut buf = format!("{method} {target} HTTP/1.1\r\n").into_bytes();
    for (name, value) in headers {
        buf.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
    }
    if !body.is_empty() {
        buf.extend_from_slice(format!("Content-Length: {}\r\n", body.len()).as_bytes());
    }
    buf.extend_from_slice(b"\r\n");
    buf.extend_from_slice(body);
    buf
}
