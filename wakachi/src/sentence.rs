//! 入力テキストの内部表現を提供するモジュール
//!
//! このモジュールは、形態素解析のために入力テキストを効率的に処理するための
//! 内部データ構造を提供します。入力文字列を正規化(小文字化とNFKC)した上で
//! 文字単位に分割し、正規化後の各文字から元テキストへの位置対応表、
//! 文字クラス、文字のグループ化可能性などを計算・保持します。

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::dictionary::character::CharClass;

/// 入力テキストの内部表現を保持する構造体
///
/// この構造体は、形態素解析のために入力テキストを処理し、以下の情報を保持します:
/// - 元の入力文字列
/// - 正規化後の文字列(小文字化 + NFKC)
/// - 正規化後の文字位置から元テキストのバイト位置・文字位置へのマッピング
/// - 各文字の文字クラス
/// - 各文字のグループ化可能性
///
/// 辞書引きとラティス構築は正規化後のテキスト上で行われ、トークンの表層と
/// オフセットはマッピングを通じて元テキストに対して報告されます。
///
/// # フィールド
///
/// * `input` - 元の入力文字列
/// * `normalized` - 正規化後の文字列
/// * `n2b` - 正規化後の文字位置から元テキストのバイト位置へのマッピング配列
/// * `n2c` - 正規化後の文字位置から元テキストの文字位置へのマッピング配列
/// * `nb` - 正規化後の文字位置から正規化後のバイト位置へのマッピング配列
/// * `classes` - 正規化後の各文字の文字クラスを保持する配列
/// * `groupable` - 各文字位置からグループ化可能な文字数を保持する配列
#[derive(Default, Clone, Debug)]
pub struct Sentence {
    input: String,
    normalized: String,
    n2b: Vec<usize>,
    n2c: Vec<usize>,
    nb: Vec<usize>,
    classes: Vec<CharClass>,
    groupable: Vec<usize>,
}

impl Sentence {
    /// 新しい空の `Sentence` インスタンスを生成します
    ///
    /// # 戻り値
    ///
    /// 空の `Sentence` インスタンス
    pub fn new() -> Self {
        Self::default()
    }

    /// 内部状態をクリアします
    ///
    /// すべての内部フィールド（入力文字列、正規化結果、マッピング情報など）を
    /// 空の状態にリセットします。確保済みの容量は保持されるため、
    /// インスタンスを使い回すことでアロケーションを削減できます。
    #[inline(always)]
    pub fn clear(&mut self) {
        self.input.clear();
        self.normalized.clear();
        self.n2b.clear();
        self.n2c.clear();
        self.nb.clear();
        self.classes.clear();
        self.groupable.clear();
    }

    /// 入力文字列を設定します
    ///
    /// 既存の内部状態をクリアした後、新しい入力文字列を設定します。
    /// この時点では正規化は行われません。正規化と解析を行うには
    /// [`compile`] を呼び出す必要があります。
    ///
    /// # 引数
    ///
    /// * `input` - 設定する入力文字列
    ///
    /// [`compile`]: Self::compile
    pub fn set_sentence<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.clear();
        self.input.push_str(input.as_ref());
    }

    /// 入力文字列を正規化し、内部データ構造を構築します
    ///
    /// 設定された入力文字列に対して以下の処理を実行します:
    /// 1. チャンク単位の正規化(小文字化 + NFKC)と位置対応表の計算
    /// 2. 各文字の文字クラスの計算
    /// 3. 文字のグループ化可能性の計算
    pub fn compile(&mut self) {
        self.compute_normalized();
        self.compute_groupable();
    }

    /// 入力を正規化し、元テキストへの位置対応表を構築します（内部メソッド）
    ///
    /// 入力をチャンク(基底文字とそれに続く結合文字・濁点類)単位に区切り、
    /// チャンクごとに小文字化とNFKC正規化を適用します。チャンク内で
    /// 正規化結果が複数文字に展開された場合、2文字目以降の境界はチャンク
    /// 末尾に対応付けられます。これにより、展開位置をまたいでトークンが
    /// 区切られても元テキストのオフセット列は単調かつ被覆を保ちます。
    fn compute_normalized(&mut self) {
        let mut iter = self.input.char_indices().peekable();
        let mut pos_char = 0;
        while let Some((chunk_start, c)) = iter.next() {
            let chunk_start_char = pos_char;
            let mut chunk_end = chunk_start + c.len_utf8();
            pos_char += 1;
            while let Some(&(bi, nc)) = iter.peek() {
                if !continues_chunk(nc) {
                    break;
                }
                chunk_end = bi + nc.len_utf8();
                pos_char += 1;
                iter.next();
            }
            let chunk = &self.input[chunk_start..chunk_end];
            let mut first = true;
            for nc in chunk.chars().flat_map(char::to_lowercase).nfkc() {
                if first {
                    self.n2b.push(chunk_start);
                    self.n2c.push(chunk_start_char);
                    first = false;
                } else {
                    self.n2b.push(chunk_end);
                    self.n2c.push(pos_char);
                }
                self.nb.push(self.normalized.len());
                self.classes.push(CharClass::of(nc));
                self.normalized.push(nc);
            }
        }
        self.n2b.push(self.input.len());
        self.n2c.push(pos_char);
        self.nb.push(self.normalized.len());
    }

    /// 各文字位置からグループ化可能な文字数を計算します（内部メソッド）
    ///
    /// 隣接する文字が同じ文字クラスに属し、かつそのクラスがグループ化を
    /// 許す場合に、各位置から連続してグループ化可能な文字数を計算します。
    /// 空白と句読点のクラスは常に1文字のままです。
    /// この情報は未知語処理において使用されます。
    fn compute_groupable(&mut self) {
        debug_assert_eq!(self.classes.len(), self.normalized.chars().count());

        self.groupable.resize(self.classes.len(), 1);
        if self.classes.is_empty() {
            return;
        }
        let mut rhs = *self.classes.last().unwrap();
        for i in (1..self.classes.len()).rev() {
            let lhs = self.classes[i - 1];
            if lhs == rhs && lhs.is_groupable() {
                self.groupable[i - 1] = self.groupable[i] + 1;
            }
            rhs = lhs;
        }
    }

    /// 元の入力文字列への参照を返します
    ///
    /// # 戻り値
    ///
    /// 元の入力文字列への不変参照
    #[inline(always)]
    pub fn raw(&self) -> &str {
        &self.input
    }

    /// 正規化後の文字列への参照を返します
    ///
    /// # 戻り値
    ///
    /// 正規化後の文字列への不変参照
    #[inline(always)]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// 指定された文字位置から始まる正規化後の接尾辞を返します
    ///
    /// 辞書のcommon prefix検索の入力として使用されます。
    ///
    /// # 引数
    ///
    /// * `pos_char` - 正規化後の文字位置（0始まり）
    ///
    /// # 戻り値
    ///
    /// 正規化後文字列の当該位置以降のスライス
    #[inline(always)]
    pub fn suffix(&self, pos_char: usize) -> &str {
        &self.normalized[self.nb[pos_char]..]
    }

    /// 正規化後の文字数を返します
    ///
    /// # 戻り値
    ///
    /// 正規化後の文字数（バイト数ではない）
    #[inline(always)]
    pub fn len_char(&self) -> usize {
        self.classes.len()
    }

    /// 指定された正規化後の文字位置に対応する元テキストのバイト位置を返します
    ///
    /// 元の入力文字列内での部分文字列の抽出などに使用されます。
    ///
    /// # 引数
    ///
    /// * `pos_char` - 正規化後の文字位置（0始まり、文字数と同値まで有効）
    ///
    /// # 戻り値
    ///
    /// 対応する元テキストのバイト位置
    #[inline(always)]
    pub fn byte_position(&self, pos_char: usize) -> usize {
        self.n2b[pos_char]
    }

    /// 指定された正規化後の文字位置に対応する元テキストの文字位置を返します
    ///
    /// # 引数
    ///
    /// * `pos_char` - 正規化後の文字位置（0始まり、文字数と同値まで有効）
    ///
    /// # 戻り値
    ///
    /// 対応する元テキストの文字位置
    #[inline(always)]
    pub fn char_position(&self, pos_char: usize) -> usize {
        self.n2c[pos_char]
    }

    /// 指定された文字位置の文字クラスを返します
    ///
    /// # 引数
    ///
    /// * `pos_char` - 正規化後の文字位置（0始まり）
    ///
    /// # 戻り値
    ///
    /// 文字クラス
    #[inline(always)]
    pub fn char_class(&self, pos_char: usize) -> CharClass {
        self.classes[pos_char]
    }

    /// 指定された文字位置からグループ化可能な文字数を返します
    ///
    /// 指定された位置から、同じ文字クラスに属する文字が連続している数を返します。
    /// この情報は未知語処理において、連続する同種の文字をまとめて扱う際に使用されます。
    ///
    /// # 引数
    ///
    /// * `pos_char` - 正規化後の文字位置（0始まり）
    ///
    /// # 戻り値
    ///
    /// グループ化可能な文字数
    #[inline(always)]
    pub fn groupable(&self, pos_char: usize) -> usize {
        self.groupable[pos_char]
    }
}

/// 直前の基底文字と同じチャンクに属する文字かどうかを判定します
///
/// Unicodeの結合文字に加えて、NFKCで結合文字に分解される半角・全角の
/// 濁点と半濁点もチャンクの継続として扱います。これにより「ｶﾞ」のような
/// 列がチャンク内で「ガ」へ合成されます。
#[inline(always)]
fn continues_chunk(c: char) -> bool {
    is_combining_mark(c) || matches!(c, '\u{309B}' | '\u{309C}' | '\u{FF9E}' | '\u{FF9F}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain() {
        let mut sent = Sentence::new();
        sent.set_sentence("自然");
        sent.compile();
        assert_eq!(sent.normalized(), "自然");
        assert_eq!(sent.len_char(), 2);
        assert_eq!(sent.byte_position(0), 0);
        assert_eq!(sent.byte_position(1), 3);
        assert_eq!(sent.byte_position(2), 6);
        assert_eq!(sent.char_position(2), 2);
    }

    #[test]
    fn test_lowercase_fullwidth() {
        let mut sent = Sentence::new();
        sent.set_sentence("ＡＢＣ");
        sent.compile();
        assert_eq!(sent.normalized(), "abc");
        assert_eq!(sent.len_char(), 3);
        // Each fullwidth letter occupies 3 bytes in the original text.
        assert_eq!(sent.byte_position(0), 0);
        assert_eq!(sent.byte_position(1), 3);
        assert_eq!(sent.byte_position(2), 6);
        assert_eq!(sent.byte_position(3), 9);
    }

    #[test]
    fn test_combining_mark_composition() {
        // か + combining voiced sound mark composes to が.
        let mut sent = Sentence::new();
        sent.set_sentence("か\u{3099}き");
        sent.compile();
        assert_eq!(sent.normalized(), "がき");
        assert_eq!(sent.len_char(), 2);
        assert_eq!(sent.byte_position(0), 0);
        assert_eq!(sent.byte_position(1), 6);
        assert_eq!(sent.char_position(1), 2);
    }

    #[test]
    fn test_halfwidth_voiced_kana() {
        let mut sent = Sentence::new();
        sent.set_sentence("ｶﾞｷ");
        sent.compile();
        assert_eq!(sent.normalized(), "ガキ");
        assert_eq!(sent.len_char(), 2);
        assert_eq!(sent.byte_position(0), 0);
        assert_eq!(sent.byte_position(1), 6);
    }

    #[test]
    fn test_expansion_maps_to_chunk_end() {
        // ㍍ expands to four normalized chars; interior boundaries all
        // point at the end of the original three-byte char.
        let mut sent = Sentence::new();
        sent.set_sentence("㍍");
        sent.compile();
        assert_eq!(sent.normalized(), "メートル");
        assert_eq!(sent.len_char(), 4);
        assert_eq!(sent.byte_position(0), 0);
        assert_eq!(sent.byte_position(1), 3);
        assert_eq!(sent.byte_position(2), 3);
        assert_eq!(sent.byte_position(3), 3);
        assert_eq!(sent.byte_position(4), 3);
        assert_eq!(sent.char_position(0), 0);
        assert_eq!(sent.char_position(4), 1);
    }

    #[test]
    fn test_groupable() {
        let mut sent = Sentence::new();
        sent.set_sentence("株式会社です。abc");
        sent.compile();
        // Four kanji, two hiragana, one punctuation, three ascii.
        assert_eq!(sent.groupable(0), 4);
        assert_eq!(sent.groupable(1), 3);
        assert_eq!(sent.groupable(3), 1);
        assert_eq!(sent.groupable(4), 2);
        assert_eq!(sent.groupable(6), 1);
        assert_eq!(sent.groupable(7), 3);
    }

    #[test]
    fn test_empty() {
        let mut sent = Sentence::new();
        sent.set_sentence("");
        sent.compile();
        assert_eq!(sent.len_char(), 0);
        assert_eq!(sent.byte_position(0), 0);
    }

    #[test]
    fn test_suffix() {
        let mut sent = Sentence::new();
        sent.set_sentence("東京都");
        sent.compile();
        assert_eq!(sent.suffix(0), "東京都");
        assert_eq!(sent.suffix(1), "京都");
        assert_eq!(sent.suffix(3), "");
    }
}
