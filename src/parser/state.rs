//! パース状態の定義

use std::fmt;

/// リクエストのパース状態
///
/// `Init → Headers → Body → Done` の順に進み、`Error` はどの状態からも遷移する終端状態。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseState {
    /// リクエスト行待ち
    Init,
    /// ヘッダー待ち
    Headers,
    /// ボディ読み取り中 (Content-Length)
    Body,
    /// 完了
    Done,
    /// エラー
    Error,
}

impl ParseState {
    /// 終端状態 (Done / Error) かどうか
    pub fn is_terminal(self) -> bool {
        matches!(self, ParseState::Done | ParseState::Error)
    }

    /// 状態名
    pub fn as_str(self) -> &'static str {
        match self {
            ParseState::Init => "init",
            ParseState::Headers => "headers",
            ParseState::Body => "body",
            ParseState::Done => "done",
            ParseState::Error => "error",
        }
    }
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
