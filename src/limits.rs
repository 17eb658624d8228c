/// リクエストパーサーの制限設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderLimits {
    /// パースウィンドウの容量 (デフォルト: 8KB)
    ///
    /// 読み取り済みだが未消費のデータはこの容量を超えて保持できない。
    pub max_buffer_size: usize,
    /// リクエスト行・ヘッダー行の最大長 (CRLF を含まない、デフォルト: 4KB)
    pub max_line_size: usize,
    /// 最大ヘッダー数 (デフォルト: 100)
    pub max_headers_count: usize,
    /// 受け付ける Content-Length の最大値 (デフォルト: 10MB)
    pub max_body_size: usize,
}

impl Default for DecoderLimits {
    fn default() -> Self {
        Self {
            max_buffer_size: 8 * 1024, // 8KB
            max_line_size: 4 * 1024,   // 4KB
            max_headers_count: 100,
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl DecoderLimits {
    /// 制限なしの設定を作成
    ///
    /// パースウィンドウは実際に確保するメモリなので、容量はデフォルトのまま。
    pub fn unlimited() -> Self {
        Self {
            max_buffer_size: Self::default().max_buffer_size,
            max_line_size: usize::MAX,
            max_headers_count: usize::MAX,
            max_body_size: usize::MAX,
        }
    }
}
