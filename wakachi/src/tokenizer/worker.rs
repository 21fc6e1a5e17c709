//! トークン化処理のためのルーチンを提供するモジュール。
//!
//! このモジュールは、形態素解析のための主要なワーカー構造体を提供します。
//! ワーカーは内部データ構造を保持し、再利用することで不要なメモリアロケーションを避けます。
use crate::common::MAX_SENTENCE_LENGTH;
use crate::errors::{Result, WakachiError};
use crate::mode::Mode;
use crate::sentence::Sentence;
use crate::token::{Token, TokenIter};
use crate::tokenizer::lattice::{Lattice, Node};
use crate::tokenizer::projector::{Projector, TokenSpan};
use crate::tokenizer::Tokenizer;

/// トークン化処理のためのルーチンを提供する構造体。
///
/// トークン化に使用される内部データ構造を保持し、それらを再利用することで
/// 不要なメモリ再割り当てを回避します。
///
/// # 例
///
/// ```ignore
/// let mut worker = tokenizer.new_worker();
/// worker.reset_sentence("日本語の文章")?;
/// worker.tokenize(Mode::Medium)?;
/// for token in worker.token_iter() {
///     println!("{}", token.surface());
/// }
/// ```
pub struct Worker {
    pub(crate) tokenizer: Tokenizer,
    pub(crate) sent: Sentence,
    pub(crate) lattice: Lattice,
    pub(crate) top_nodes: Vec<(usize, Node)>,
    pub(crate) spans: Vec<TokenSpan>,
    pub(crate) projector: Projector,
}

impl Worker {
    /// 新しいインスタンスを作成します。
    ///
    /// # 引数
    ///
    /// * `tokenizer` - 使用するトークナイザー
    pub(crate) fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            sent: Sentence::new(),
            lattice: Lattice::default(),
            top_nodes: vec![],
            spans: vec![],
            projector: Projector::default(),
        }
    }

    /// トークン化する入力文をリセットします。
    ///
    /// 新しい文を設定し、以前のトークン化結果をクリアします。空文字列は
    /// 有効な入力であり、トークン化すると空の結果になります。
    ///
    /// # 引数
    ///
    /// * `input` - トークン化する入力文字列
    ///
    /// # エラー
    ///
    /// 正規化後の文字数が上限を超える入力に対して
    /// [`WakachiError::InvalidInput`]を返します。エラー時は以前の結果も
    /// クリアされ、ワーカーは次の入力にそのまま使用できます。
    pub fn reset_sentence<S>(&mut self, input: S) -> Result<()>
    where
        S: AsRef<str>,
    {
        self.sent.clear();
        self.top_nodes.clear();
        self.spans.clear();
        let input = input.as_ref();
        if !input.is_empty() {
            self.sent.set_sentence(input);
            self.sent.compile();
            if self.sent.len_char() > MAX_SENTENCE_LENGTH {
                self.sent.clear();
                return Err(WakachiError::invalid_input(format!(
                    "the input must not exceed {MAX_SENTENCE_LENGTH} characters after normalization"
                )));
            }
        }
        Ok(())
    }

    /// 設定された入力文をトークン化します。
    ///
    /// トークン化結果は内部状態に保存され、`token_iter()`や`token()`メソッドで
    /// アクセスできます。空の文が設定されている場合、結果は空になります。
    ///
    /// # 引数
    ///
    /// * `mode` - 分割単位
    ///
    /// # エラー
    ///
    /// ラティスの経路解決に失敗した場合、
    /// [`WakachiError::PathResolutionFailed`]を返します。エラー時に部分的な
    /// 結果が残ることはありません。
    pub fn tokenize(&mut self, mode: Mode) -> Result<()> {
        self.top_nodes.clear();
        self.spans.clear();
        if self.sent.len_char() == 0 {
            return Ok(());
        }
        self.tokenizer.build_lattice(&self.sent, &mut self.lattice);
        self.lattice.append_top_nodes(&mut self.top_nodes)?;
        self.projector.project(
            self.tokenizer.dictionary(),
            &self.top_nodes,
            mode,
            &mut self.spans,
        );
        Ok(())
    }

    /// トークン化結果のトークン数を取得します。
    ///
    /// # 戻り値
    ///
    /// トークンの総数
    #[inline(always)]
    pub fn num_tokens(&self) -> usize {
        self.spans.len()
    }

    /// `i`番目のトークンを取得します。
    ///
    /// # 引数
    ///
    /// * `i` - トークンのインデックス(0から始まる、文頭からの順)
    ///
    /// # 戻り値
    ///
    /// 指定されたインデックスのトークン
    #[inline(always)]
    pub fn token<'w>(&'w self, i: usize) -> Token<'w> {
        Token::new(self, i)
    }

    /// トークン化結果のイテレータを作成します。
    ///
    /// # 戻り値
    ///
    /// 文頭からの順でトークンを返すイテレータ
    #[inline(always)]
    pub fn token_iter<'w>(&'w self) -> TokenIter<'w> {
        TokenIter::new(self)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::dictionary::{Dictionary, SystemDictionaryBuilder};

    use super::*;

    fn test_tokenizer() -> Tokenizer {
        let lexicon_csv = "\
自然,1,1,1000,名詞,普通名詞,一般,*,シゼン,*,*,A,*
言語,1,1,1000,名詞,普通名詞,一般,*,ゲンゴ,*,*,A,*";
        let matrix_def = "2 2\n0 0 0\n0 1 0\n1 0 0\n1 1 0";
        let unk_def = "DEFAULT,0,0,2000,補助記号,一般,*,*";
        let dict = SystemDictionaryBuilder::from_readers(
            lexicon_csv.as_bytes(),
            matrix_def.as_bytes(),
            unk_def.as_bytes(),
        )
        .unwrap();
        Tokenizer::new(Dictionary::from_inner(dict))
    }

    #[test]
    fn test_empty_input() {
        let mut worker = test_tokenizer().new_worker();
        worker.reset_sentence("").unwrap();
        worker.tokenize(Mode::Medium).unwrap();
        assert_eq!(worker.num_tokens(), 0);
    }

    #[test]
    fn test_too_long_input() {
        let mut worker = test_tokenizer().new_worker();
        let input = "あ".repeat(MAX_SENTENCE_LENGTH + 1);
        let e = worker.reset_sentence(&input).unwrap_err();
        assert!(matches!(e, WakachiError::InvalidInput(_)));
        assert_eq!(worker.num_tokens(), 0);
    }

    #[test]
    fn test_usable_after_rejected_input() {
        let mut worker = test_tokenizer().new_worker();
        let input = "あ".repeat(MAX_SENTENCE_LENGTH + 1);
        assert!(worker.reset_sentence(&input).is_err());

        worker.reset_sentence("自然言語").unwrap();
        worker.tokenize(Mode::Medium).unwrap();
        assert_eq!(worker.num_tokens(), 2);
        assert_eq!(worker.token(0).surface(), "自然");
        assert_eq!(worker.token(1).surface(), "言語");
    }

    #[test]
    fn test_normalization_expands_past_limit() {
        let mut worker = test_tokenizer().new_worker();
        // The raw input fits, but NFKC expands each ㍍ to four characters.
        let input = "㍍".repeat(MAX_SENTENCE_LENGTH / 4 + 1);
        assert!(input.chars().count() <= MAX_SENTENCE_LENGTH);
        let e = worker.reset_sentence(&input).unwrap_err();
        assert!(matches!(e, WakachiError::InvalidInput(_)));
    }

    #[test]
    fn test_worker_is_shared_dictionary() {
        let tokenizer = test_tokenizer();
        let mut w1 = tokenizer.new_worker();
        let mut w2 = tokenizer.new_worker();
        w1.reset_sentence("自然").unwrap();
        w2.reset_sentence("言語").unwrap();
        w1.tokenize(Mode::Medium).unwrap();
        w2.tokenize(Mode::Medium).unwrap();
        assert_eq!(w1.token(0).surface(), "自然");
        assert_eq!(w2.token(0).surface(), "言語");
        assert!(Arc::ptr_eq(&w1.tokenizer.dict, &w2.tokenizer.dict));
    }
}
