//! パースウィンドウ
//!
//! トランスポートから読み取ったがまだパーサーが消費していないバイト列を保持する固定容量バッファ。
//! 消費済みのバイトは [`ParseWindow::consume`] で左に詰めて捨てる。

/// 固定容量のパースウィンドウ
#[derive(Debug, Clone)]
pub struct ParseWindow {
    buf: Box<[u8]>,
    len: usize,
}

impl ParseWindow {
    /// 指定容量のウィンドウを作成
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// 容量
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// 未消費のバイト数
    pub fn len(&self) -> usize {
        self.len
    }

    /// 未消費のバイトがないか
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 空きがないか
    pub fn is_full(&self) -> bool {
        self.len == self.buf.len()
    }

    /// 未消費のバイト列
    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// 末尾の空き領域 (読み取り先)
    ///
    /// 書き込んだバイト数は [`ParseWindow::commit`] で確定する。
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.len..]
    }

    /// `spare_mut()` に書き込んだ `n` バイトを確定
    pub fn commit(&mut self, n: usize) {
        self.len = self.len.saturating_add(n).min(self.buf.len());
    }

    /// 入るだけコピーし、コピーしたバイト数を返す
    pub fn extend(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.buf.len() - self.len);
        self.buf[self.len..self.len + n].copy_from_slice(&data[..n]);
        self.len += n;
        n
    }

    /// 先頭 `n` バイトを捨てて残りを左に詰める
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.len);
        if n == 0 {
            return;
        }
        self.buf.copy_within(n..self.len, 0);
        self.len -= n;
    }

    /// すべて捨てる
    pub fn clear(&mut self) {
        self.len = 0;
    }
}
