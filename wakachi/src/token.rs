//! トークンの結果コンテナ
//!
//! このモジュールは、形態素解析の結果として得られるトークンを表現する型を提供します。
//! トークンは辞書内の単語への参照を保持し、表層形、品詞情報、語彙情報、
//! 位置情報などへのアクセスを提供します。

use std::ops::Range;

use crate::dictionary::DictionaryInnerRef;
use crate::dictionary::{word_idx::WordIdx, LexType};
use crate::tokenizer::worker::Worker;

/// 形態素解析の結果トークン
///
/// このトークンは[`Worker`]への軽量な参照であり、実際のデータは
/// Workerが保持しています。トークンはWorkerが生存している間のみ有効です。
///
/// トークンからは以下の情報にアクセスできます：
/// - 表層形（元のテキスト中の文字列）
/// - 品詞パス、読み、正規化表記、辞書形
/// - 元テキストに対する文字位置およびバイト位置
/// - 単語コストおよび累積コスト
pub struct Token<'w> {
    worker: &'w Worker,
    index: usize,
}

impl<'w> Token<'w> {
    #[inline(always)]
    pub(crate) const fn new(worker: &'w Worker, index: usize) -> Self {
        Self { worker, index }
    }

    /// トークンの文字単位の位置範囲を取得します。
    ///
    /// # 戻り値
    ///
    /// 元の入力テキストにおける開始位置から終了位置までの文字単位の範囲を返します。
    ///
    /// Gets the position range of the token in characters.
    #[inline(always)]
    pub fn range_char(&self) -> Range<usize> {
        let sent = &self.worker.sent;
        let span = &self.worker.spans[self.index];
        sent.char_position(span.start_char)..sent.char_position(span.end_char)
    }

    /// トークンのバイト単位の位置範囲を取得します。
    ///
    /// # 戻り値
    ///
    /// 元の入力テキストにおける開始位置から終了位置までのバイト単位の範囲を返します。
    ///
    /// Gets the position range of the token in bytes.
    #[inline(always)]
    pub fn range_byte(&self) -> Range<usize> {
        let sent = &self.worker.sent;
        let span = &self.worker.spans[self.index];
        sent.byte_position(span.start_char)..sent.byte_position(span.end_char)
    }

    /// トークンの表層形（元のテキスト中の文字列）を取得します。
    ///
    /// # 戻り値
    ///
    /// トークンの表層形の文字列参照を返します。
    ///
    /// Gets the surface string of the token.
    #[inline(always)]
    pub fn surface(&self) -> &'w str {
        let sent = &self.worker.sent;
        &sent.raw()[self.range_byte()]
    }

    /// トークンの単語インデックスを取得します。
    ///
    /// # 戻り値
    ///
    /// 辞書内の単語を一意に識別する[`WordIdx`]を返します。
    ///
    /// Gets the word index of the token.
    #[inline(always)]
    pub fn word_idx(&self) -> WordIdx {
        self.worker.spans[self.index].word_idx
    }

    /// トークンの品詞パス文字列を取得します。
    ///
    /// # 戻り値
    ///
    /// `品詞1,品詞2,品詞3,品詞4`形式のカンマ区切り文字列を返します。
    /// 未知語の場合は未知語テンプレートの品詞パスを返します。
    ///
    /// Gets the part-of-speech path of the token.
    #[inline(always)]
    pub fn pos(&self) -> &'w str {
        self.worker.tokenizer.dictionary().word_pos(self.word_idx())
    }

    /// トークンの読み（カタカナ）を取得します。
    ///
    /// # 戻り値
    ///
    /// 辞書に登録された読みを返します。未知語の場合は表層形を返します。
    ///
    /// Gets the reading of the token.
    #[inline(always)]
    pub fn reading(&self) -> &'w str {
        if self.is_oov() {
            return self.surface();
        }
        match self.worker.tokenizer.dictionary() {
            DictionaryInnerRef::Archived(dict) => dict.word_info(self.word_idx()).reading.as_str(),
            DictionaryInnerRef::Owned(dict) => dict.word_info(self.word_idx()).reading.as_str(),
        }
    }

    /// トークンの正規化表記を取得します。
    ///
    /// # 戻り値
    ///
    /// 辞書に登録された正規化表記を返します。未知語の場合は表層形を返します。
    ///
    /// Gets the normalized form of the token.
    #[inline(always)]
    pub fn normalized(&self) -> &'w str {
        if self.is_oov() {
            return self.surface();
        }
        match self.worker.tokenizer.dictionary() {
            DictionaryInnerRef::Archived(dict) => {
                dict.word_info(self.word_idx()).normalized.as_str()
            }
            DictionaryInnerRef::Owned(dict) => dict.word_info(self.word_idx()).normalized.as_str(),
        }
    }

    /// トークンの辞書形（終止形）を取得します。
    ///
    /// # 戻り値
    ///
    /// 辞書に登録された辞書形を返します。未知語の場合は表層形を返します。
    ///
    /// Gets the dictionary form of the token.
    #[inline(always)]
    pub fn dictionary_form(&self) -> &'w str {
        if self.is_oov() {
            return self.surface();
        }
        match self.worker.tokenizer.dictionary() {
            DictionaryInnerRef::Archived(dict) => {
                dict.word_info(self.word_idx()).dict_form.as_str()
            }
            DictionaryInnerRef::Owned(dict) => dict.word_info(self.word_idx()).dict_form.as_str(),
        }
    }

    /// トークンが由来する辞書のタイプを取得します。
    ///
    /// # 戻り値
    ///
    /// システム辞書、ユーザー辞書、未知語のいずれかを示す[`LexType`]を返します。
    ///
    /// Gets the lexicon type where the token is from.
    #[inline(always)]
    pub fn lex_type(&self) -> LexType {
        self.word_idx().lex_type
    }

    /// トークンが未知語かどうかを返します。
    ///
    /// # 戻り値
    ///
    /// 辞書に登録のない未知語なら`true`
    ///
    /// Checks if the token is out of vocabulary.
    #[inline(always)]
    pub fn is_oov(&self) -> bool {
        self.lex_type() == LexType::Unknown
    }

    /// トークンの左文脈IDを取得します。
    ///
    /// # 戻り値
    ///
    /// 接続コスト計算に使用される左文脈IDを返します。
    ///
    /// Gets the left id of the token.
    #[inline(always)]
    pub fn left_id(&self) -> u16 {
        self.worker
            .tokenizer
            .dictionary()
            .word_param(self.word_idx())
            .left_id
    }

    /// トークンの右文脈IDを取得します。
    ///
    /// # 戻り値
    ///
    /// 接続コスト計算に使用される右文脈IDを返します。
    ///
    /// Gets the right id of the token.
    #[inline(always)]
    pub fn right_id(&self) -> u16 {
        self.worker
            .tokenizer
            .dictionary()
            .word_param(self.word_idx())
            .right_id
    }

    /// トークンの単語コストを取得します。
    ///
    /// # 戻り値
    ///
    /// 単語の生起コストを返します。値が低いほど出現しやすい単語です。
    ///
    /// Gets the word cost of the token.
    #[inline(always)]
    pub fn word_cost(&self) -> i16 {
        self.worker
            .tokenizer
            .dictionary()
            .word_param(self.word_idx())
            .word_cost
    }

    /// 文頭からこのトークンまでの累積コストを取得します。
    ///
    /// 短単位へ展開されたトークンは展開元ノードの累積コストを共有し、
    /// 長単位へ結合されたトークンは末尾構成要素の累積コストを引き継ぎます。
    ///
    /// # 戻り値
    ///
    /// BOS（文頭）からこのトークンまでのパス全体の累積コストを返します。
    ///
    /// Gets the total cost from BOS to the token.
    #[inline(always)]
    pub fn total_cost(&self) -> i32 {
        self.worker.spans[self.index].total_cost
    }

    /// このトークンビューを所有型の[`TokenBuf`]に変換します。
    ///
    /// # 戻り値
    ///
    /// このトークンのすべての情報を含む所有型の[`TokenBuf`]を返します。
    /// スレッド間でトークン情報を送信したり、長期保存する際に有用です。
    pub fn to_buf(&self) -> TokenBuf {
        TokenBuf {
            surface: self.surface().to_string(),
            pos: self.pos().to_string(),
            reading: self.reading().to_string(),
            normalized: self.normalized().to_string(),
            dictionary_form: self.dictionary_form().to_string(),
            range_char: self.range_char(),
            range_byte: self.range_byte(),
            word_id: self.word_idx(),
            lex_type: self.lex_type(),
            left_id: self.left_id(),
            right_id: self.right_id(),
            word_cost: self.word_cost(),
            total_cost: self.total_cost(),
        }
    }
}

impl std::fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("surface", &self.surface())
            .field("range_char", &self.range_char())
            .field("range_byte", &self.range_byte())
            .field("pos", &self.pos())
            .field("reading", &self.reading())
            .field("normalized", &self.normalized())
            .field("dictionary_form", &self.dictionary_form())
            .field("lex_type", &self.lex_type())
            .field("word_id", &self.word_idx())
            .field("left_id", &self.left_id())
            .field("right_id", &self.right_id())
            .field("word_cost", &self.word_cost())
            .field("total_cost", &self.total_cost())
            .finish()
    }
}

/// トークンのイテレータ
///
/// 形態素解析の結果得られたトークン列を順次取得するためのイテレータです。
/// 前方および後方からの走査をサポートしています（[`DoubleEndedIterator`]を実装）。
///
/// Iterator of tokens.
pub struct TokenIter<'w> {
    worker: &'w Worker,
    front: usize,
    back: usize,
}

impl<'w> TokenIter<'w> {
    #[inline(always)]
    pub(crate) fn new(worker: &'w Worker) -> Self {
        let num_tokens = worker.num_tokens();
        Self {
            worker,
            front: 0,
            back: num_tokens,
        }
    }
}

impl<'w> Iterator for TokenIter<'w> {
    type Item = Token<'w>;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            let t = self.worker.token(self.front);
            self.front += 1;
            Some(t)
        } else {
            None
        }
    }
}

impl<'w> DoubleEndedIterator for TokenIter<'w> {
    #[inline(always)]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            self.back -= 1;
            let t = self.worker.token(self.back);
            Some(t)
        } else {
            None
        }
    }
}

/// 所有型の自己完結したトークン
///
/// このトークンは[`Token`]の所有型版です。形態素解析の結果を長期保存したり、
/// スレッド間で送信する際に有用です。すべてのトークン情報を自身で保持するため、
/// [`Worker`]への参照が不要です。
///
/// An owned, self-contained token.
///
/// This struct is the owned counterpart to [`Token`].
/// It is useful for storing tokenization results or
/// sending them across threads.
#[derive(Debug, Clone)]
pub struct TokenBuf {
    /// トークンの表層形（元のテキスト中の文字列）
    ///
    /// The surface string of the token.
    pub surface: String,

    /// トークンの品詞パス
    ///
    /// The part-of-speech path of the token.
    pub pos: String,

    /// トークンの読み
    ///
    /// The reading of the token.
    pub reading: String,

    /// トークンの正規化表記
    ///
    /// The normalized form of the token.
    pub normalized: String,

    /// トークンの辞書形
    ///
    /// The dictionary form of the token.
    pub dictionary_form: String,

    /// トークンの文字単位の位置範囲
    ///
    /// The position range of the token in characters.
    pub range_char: Range<usize>,

    /// トークンのバイト単位の位置範囲
    ///
    /// The position range of the token in bytes.
    pub range_byte: Range<usize>,

    /// トークンが由来する辞書のタイプ
    ///
    /// The lexicon type where the token is from.
    pub lex_type: LexType,

    /// トークンの単語インデックス
    ///
    /// The word index of the token.
    pub word_id: WordIdx,

    /// トークンの左文脈ID
    ///
    /// The left connection ID of the token.
    pub left_id: u16,

    /// トークンの右文脈ID
    ///
    /// The right connection ID of the token.
    pub right_id: u16,

    /// トークンの単語コスト
    ///
    /// The word cost of the token.
    pub word_cost: i16,

    /// 文頭からこのトークンまでの累積コスト
    ///
    /// The total cost from BOS to the token.
    pub total_cost: i32,
}

impl<'w> From<Token<'w>> for TokenBuf {
    fn from(token: Token<'w>) -> Self {
        token.to_buf()
    }
}
