//! ビタビアルゴリズムに基づくトークナイザー。
//!
//! このモジュールは、日本語形態素解析のためのメイントークナイザーを提供します。
//! ビタビアルゴリズムを使用して、入力文を最適な形態素列に分割します。
//!
//! # 主要な構造体
//!
//! - [`Tokenizer`]: 形態素解析を実行するメイントークナイザー構造体
//! - [`Worker`]: トークナイザーのワーカー。実際の解析処理を行う
//!
//! # 例
//!
//! ```no_run
//! use wakachi::{Tokenizer, Dictionary, LoadMode, Mode};
//!
//! let dict = Dictionary::from_path("path/to/dict", LoadMode::Validate)?;
//! let tokenizer = Tokenizer::new(dict);
//! let mut worker = tokenizer.new_worker();
//!
//! worker.reset_sentence("自然言語処理")?;
//! worker.tokenize(Mode::Medium)?;
//!
//! for i in 0..worker.num_tokens() {
//!     let token = worker.token(i);
//!     println!("{}", token.surface());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub(crate) mod lattice;
pub(crate) mod projector;
pub mod worker;

use std::sync::Arc;

use crate::dictionary::connector::ConnectorCost;
use crate::dictionary::{ArchivedDictionaryInner, DictionaryInner, DictionaryInnerRef};
use crate::sentence::Sentence;
use crate::tokenizer::lattice::Lattice;
use crate::tokenizer::worker::Worker;
use crate::Dictionary;

/// 未知語グルーピングのデフォルト上限(文字数)
const DEFAULT_MAX_GROUPING_LEN: usize = 4;

/// 形態素解析を行うトークナイザー。
///
/// `Tokenizer`は、ビタビアルゴリズムを使用して日本語テキストを形態素に分割します。
/// 辞書データを保持し、複数の[`Worker`]インスタンスを生成して並列処理を行うことができます。
///
/// # 例
///
/// ```no_run
/// use wakachi::{Dictionary, Tokenizer, LoadMode, Mode};
///
/// let dict = Dictionary::from_path("path/to/dict", LoadMode::Validate)?;
/// let tokenizer = Tokenizer::new(dict);
/// let mut worker = tokenizer.new_worker();
///
/// worker.reset_sentence("形態素解析")?;
/// worker.tokenize(Mode::Medium)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct Tokenizer {
    dict: Arc<Dictionary>,
    max_grouping_len: usize,
}

impl Tokenizer {
    /// 新しいトークナイザーを作成します。
    ///
    /// 辞書はトークナイザーに所有権が移動します。複数のトークナイザー間で辞書を共有する
    /// 必要がある場合は、[`Tokenizer::from_shared_dictionary`]を使用してください。
    ///
    /// # 引数
    ///
    /// * `dict` - 形態素解析に使用する辞書
    ///
    /// # 戻り値
    ///
    /// 新しい`Tokenizer`インスタンス
    ///
    /// # 例
    ///
    /// ```no_run
    /// use wakachi::{Dictionary, Tokenizer, LoadMode};
    ///
    /// let dict = Dictionary::from_path("path/to/dict", LoadMode::Validate)?;
    /// let tokenizer = Tokenizer::new(dict);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(dict: Dictionary) -> Self {
        Self {
            dict: Arc::new(dict),
            max_grouping_len: DEFAULT_MAX_GROUPING_LEN,
        }
    }

    /// `DictionaryInner`から新しいトークナイザーを作成します。
    ///
    /// # 引数
    ///
    /// * `dict` - 内部辞書データ
    ///
    /// # 戻り値
    ///
    /// 新しい`Tokenizer`インスタンス
    pub fn from_inner(dict: DictionaryInner) -> Self {
        Self {
            dict: Arc::new(Dictionary::from_inner(dict)),
            max_grouping_len: DEFAULT_MAX_GROUPING_LEN,
        }
    }

    /// 共有された辞書から新しいトークナイザーを作成します。
    ///
    /// これは、複数のトークナイザーインスタンスが辞書データを再読み込みすることなく
    /// 同じ辞書データを共有する必要があるマルチスレッドシナリオで便利です。
    ///
    /// # 引数
    ///
    /// * `dict` - 共有される辞書への`Arc`参照
    ///
    /// # 戻り値
    ///
    /// 新しい`Tokenizer`インスタンス
    ///
    /// # 例
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use wakachi::{Dictionary, Tokenizer, LoadMode};
    ///
    /// let dict = Arc::new(Dictionary::from_path("path/to/dict", LoadMode::Validate)?);
    /// let tokenizer1 = Tokenizer::from_shared_dictionary(dict.clone());
    /// let tokenizer2 = Tokenizer::from_shared_dictionary(dict.clone());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_shared_dictionary(dict: Arc<Dictionary>) -> Self {
        Self {
            dict,
            max_grouping_len: DEFAULT_MAX_GROUPING_LEN,
        }
    }

    /// 未知語の最大グルーピング長を指定します。
    ///
    /// グルーピング可能な文字クラスの未知語候補は、同一クラスの連続を
    /// この長さまでまとめた候補として生成されます。デフォルトは4文字です。
    ///
    /// # 引数
    ///
    /// * `max_grouping_len` - 未知語の最大グルーピング長。
    ///   0を指定すると長さは無制限になります。
    ///
    /// # 戻り値
    ///
    /// 設定が適用された`Tokenizer`インスタンス
    ///
    /// # 例
    ///
    /// ```no_run
    /// use wakachi::{Dictionary, Tokenizer, LoadMode};
    ///
    /// let dict = Dictionary::from_path("path/to/dict", LoadMode::Validate)?;
    /// let tokenizer = Tokenizer::new(dict).max_grouping_len(24);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub const fn max_grouping_len(mut self, max_grouping_len: usize) -> Self {
        self.max_grouping_len = max_grouping_len;
        self
    }

    /// 辞書への参照を取得します。
    ///
    /// # 戻り値
    ///
    /// 辞書内部データへの参照
    pub(crate) fn dictionary<'a>(&'a self) -> DictionaryInnerRef<'a> {
        match &*self.dict {
            Dictionary::Archived(archived_dict) => DictionaryInnerRef::Archived(archived_dict),
            Dictionary::Owned { dict } => DictionaryInnerRef::Owned(dict),
        }
    }

    /// 新しいワーカーを作成します。
    ///
    /// ワーカーは実際の形態素解析処理を実行するために使用されます。
    /// 各ワーカーは独立したラティス構造を保持するため、複数のワーカーを
    /// 並列に使用して同時に複数の文を解析できます。
    ///
    /// # 戻り値
    ///
    /// 新しい[`Worker`]インスタンス
    ///
    /// # 例
    ///
    /// ```no_run
    /// use wakachi::{Dictionary, Tokenizer, LoadMode, Mode};
    ///
    /// let dict = Dictionary::from_path("path/to/dict", LoadMode::Validate)?;
    /// let tokenizer = Tokenizer::new(dict);
    /// let mut worker = tokenizer.new_worker();
    ///
    /// worker.reset_sentence("形態素解析")?;
    /// worker.tokenize(Mode::Medium)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new_worker(&self) -> Worker {
        Worker::new(self.clone())
    }

    /// ラティス構造を構築します。
    ///
    /// 入力文に対してビタビアルゴリズム用のラティスを構築します。
    ///
    /// # 引数
    ///
    /// * `sent` - 入力文
    /// * `lattice` - 構築するラティス構造
    pub(crate) fn build_lattice(&self, sent: &Sentence, lattice: &mut Lattice) {
        match &*self.dict {
            Dictionary::Archived(archived_dict) => {
                self.build_lattice_inner(sent, lattice, archived_dict.connector())
            }
            Dictionary::Owned { dict } => {
                self.build_lattice_inner(sent, lattice, dict.connector())
            }
        }
    }

    /// ラティス構造の内部構築処理。
    ///
    /// 到達可能な各開始位置に対して辞書エントリと未知語の候補ノードを
    /// 追加し、最後にEOSノードを挿入します。
    ///
    /// # 引数
    ///
    /// * `sent` - 入力文
    /// * `lattice` - 構築するラティス構造
    /// * `connector` - 接続コスト計算用のコネクタ
    fn build_lattice_inner<C>(&self, sent: &Sentence, lattice: &mut Lattice, connector: &C)
    where
        C: ConnectorCost,
    {
        lattice.reset(sent.len_char());

        for start_word in 0..sent.len_char() {
            if !lattice.has_previous_node(start_word) {
                continue;
            }
            self.add_lattice_edges(sent, lattice, start_word, connector);
        }

        lattice.insert_eos(connector);
    }
}

macro_rules! add_lattice_edges_logic {
    (
        // self is required to access max_grouping_len
        $self:expr,
        $sent:expr,
        $lattice:expr,
        $start_word:expr,
        $connector:expr,
        $dict:expr,
    ) => {{
        let mut has_matched = false;
        let suffix = $sent.suffix($start_word);

        if let Some(user_lexicon) = $dict.user_lexicon().as_ref() {
            user_lexicon.common_prefix_scan(suffix, |m| {
                debug_assert!($start_word + m.end_char <= $sent.len_char());
                $lattice.insert_node(
                    $start_word,
                    $start_word + m.end_char,
                    m.word_idx,
                    m.word_param,
                    $connector,
                );
                has_matched = true;
            });
        }

        $dict.system_lexicon().common_prefix_scan(suffix, |m| {
            debug_assert!($start_word + m.end_char <= $sent.len_char());
            $lattice.insert_node(
                $start_word,
                $start_word + m.end_char,
                m.word_idx,
                m.word_param,
                $connector,
            );
            has_matched = true;
        });

        $dict.unk_handler().gen_unk_words(
            $sent,
            $start_word,
            has_matched,
            $self.max_grouping_len,
            |w| {
                $lattice.insert_node(
                    w.begin_char(),
                    w.end_char(),
                    w.word_idx(),
                    w.word_param(),
                    $connector,
                );
            },
        );
    }};
}

impl Tokenizer {
    /// ラティスにエッジを追加します。
    ///
    /// 辞書の型（アーカイブ版または所有版）に応じて適切な内部メソッドを呼び出します。
    ///
    /// # 引数
    ///
    /// * `sent` - 入力文
    /// * `lattice` - エッジを追加するラティス
    /// * `start_word` - 単語の開始位置
    /// * `connector` - 接続コスト計算用のコネクタ
    fn add_lattice_edges<C>(
        &self,
        sent: &Sentence,
        lattice: &mut Lattice,
        start_word: usize,
        connector: &C,
    ) where
        C: ConnectorCost,
    {
        match self.dictionary() {
            DictionaryInnerRef::Archived(dict) => {
                self.add_lattice_edges_archived(sent, lattice, start_word, connector, dict)
            }
            DictionaryInnerRef::Owned(dict) => {
                self.add_lattice_edges_owned(sent, lattice, start_word, connector, dict)
            }
        }
    }

    /// アーカイブ版辞書を使用してラティスにエッジを追加します。
    ///
    /// ユーザー辞書とシステム辞書から単語を検索し、
    /// 未知語ハンドラを使用して未知語も処理します。
    ///
    /// # 引数
    ///
    /// * `sent` - 入力文
    /// * `lattice` - エッジを追加するラティス
    /// * `start_word` - 単語の開始位置
    /// * `connector` - 接続コスト計算用のコネクタ
    /// * `dict` - アーカイブ版辞書
    fn add_lattice_edges_archived<C>(
        &self,
        sent: &Sentence,
        lattice: &mut Lattice,
        start_word: usize,
        connector: &C,
        dict: &ArchivedDictionaryInner,
    ) where
        C: ConnectorCost,
    {
        add_lattice_edges_logic!(
            self,
            sent,
            lattice,
            start_word,
            connector,
            dict,
        )
    }

    /// 所有版辞書を使用してラティスにエッジを追加します。
    ///
    /// ユーザー辞書とシステム辞書から単語を検索し、
    /// 未知語ハンドラを使用して未知語も処理します。
    ///
    /// # 引数
    ///
    /// * `sent` - 入力文
    /// * `lattice` - エッジを追加するラティス
    /// * `start_word` - 単語の開始位置
    /// * `connector` - 接続コスト計算用のコネクタ
    /// * `dict` - 所有版辞書
    fn add_lattice_edges_owned<C>(
        &self,
        sent: &Sentence,
        lattice: &mut Lattice,
        start_word: usize,
        connector: &C,
        dict: &DictionaryInner,
    ) where
        C: ConnectorCost,
    {
        add_lattice_edges_logic!(
            self,
            sent,
            lattice,
            start_word,
            connector,
            dict,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dictionary::{LexType, SystemDictionaryBuilder};
    use crate::mode::Mode;

    #[track_caller]
    fn build_test_dictionary(
        lexicon_csv: &[u8],
        matrix_def: &[u8],
        unk_def: &[u8],
    ) -> Dictionary {
        let dict_inner =
            SystemDictionaryBuilder::from_readers(lexicon_csv, matrix_def, unk_def).unwrap();

        Dictionary::from_inner(dict_inner)
    }

    const LEXICON_CSV: &str = "\
自然,0,0,1,名詞,普通名詞,一般,*,シゼン,*,*,A,*
言語,0,0,4,名詞,普通名詞,一般,*,ゲンゴ,*,*,A,*
処理,0,0,3,名詞,普通名詞,一般,*,ショリ,*,*,A,*
自然言語,0,0,6,名詞,普通名詞,一般,*,シゼンゲンゴ,*,*,B,0/1
言語処理,0,0,5,名詞,普通名詞,一般,*,ゲンゴショリ,*,*,B,1/2";
    const MATRIX_DEF: &str = "1 1\n0 0 0";
    const UNK_DEF: &str = "DEFAULT,0,0,100,補助記号,一般,*,*";

    #[test]
    fn test_tokenize_1() {
        let dict = build_test_dictionary(
            LEXICON_CSV.as_bytes(),
            MATRIX_DEF.as_bytes(),
            UNK_DEF.as_bytes(),
        );

        let tokenizer = Tokenizer::new(dict);
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("自然言語処理").unwrap();
        worker.tokenize(Mode::Medium).unwrap();
        assert_eq!(worker.num_tokens(), 2);

        {
            let t = worker.token(0);
            assert_eq!(t.surface(), "自然");
            assert_eq!(t.range_char(), 0..2);
            assert_eq!(t.range_byte(), 0..6);
            assert_eq!(t.reading(), "シゼン");
            assert_eq!(t.total_cost(), 1);
            assert!(!t.is_oov());
        }
        {
            let t = worker.token(1);
            assert_eq!(t.surface(), "言語処理");
            assert_eq!(t.range_char(), 2..6);
            assert_eq!(t.range_byte(), 6..18);
            assert_eq!(t.reading(), "ゲンゴショリ");
            assert_eq!(t.total_cost(), 6);
            assert!(!t.is_oov());
        }
    }

    #[test]
    fn test_tokenize_2() {
        let dict = build_test_dictionary(
            LEXICON_CSV.as_bytes(),
            MATRIX_DEF.as_bytes(),
            UNK_DEF.as_bytes(),
        );

        let tokenizer = Tokenizer::new(dict);
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("自然日本語").unwrap();
        worker.tokenize(Mode::Medium).unwrap();
        assert_eq!(worker.num_tokens(), 2);

        {
            let t = worker.token(0);
            assert_eq!(t.surface(), "自然");
            assert_eq!(t.range_char(), 0..2);
            assert_eq!(t.range_byte(), 0..6);
            assert_eq!(t.total_cost(), 1);
        }
        {
            let t = worker.token(1);
            assert_eq!(t.surface(), "日本語");
            assert_eq!(t.range_char(), 2..5);
            assert_eq!(t.range_byte(), 6..15);
            assert_eq!(t.pos(), "補助記号,一般,*,*");
            assert_eq!(t.reading(), "日本語");
            assert_eq!(t.total_cost(), 101);
            assert!(t.is_oov());
        }
    }

    #[test]
    fn test_tokenize_3() {
        let dict = build_test_dictionary(
            LEXICON_CSV.as_bytes(),
            MATRIX_DEF.as_bytes(),
            UNK_DEF.as_bytes(),
        );

        let tokenizer = Tokenizer::new(dict);
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("不自然言語処理").unwrap();
        worker.tokenize(Mode::Medium).unwrap();
        assert_eq!(worker.num_tokens(), 2);

        {
            let t = worker.token(0);
            assert_eq!(t.surface(), "不自然");
            assert_eq!(t.range_char(), 0..3);
            assert_eq!(t.range_byte(), 0..9);
            assert_eq!(t.total_cost(), 100);
            assert!(t.is_oov());
        }
        {
            let t = worker.token(1);
            assert_eq!(t.surface(), "言語処理");
            assert_eq!(t.range_char(), 3..7);
            assert_eq!(t.range_byte(), 9..21);
            assert_eq!(t.total_cost(), 105);
            assert!(!t.is_oov());
        }
    }

    #[test]
    fn test_tokenize_empty() {
        let dict = build_test_dictionary(
            LEXICON_CSV.as_bytes(),
            MATRIX_DEF.as_bytes(),
            UNK_DEF.as_bytes(),
        );

        let tokenizer = Tokenizer::new(dict);
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("").unwrap();
        worker.tokenize(Mode::Medium).unwrap();
        assert_eq!(worker.num_tokens(), 0);
    }

    #[test]
    fn test_tokenize_short() {
        let dict = build_test_dictionary(
            LEXICON_CSV.as_bytes(),
            MATRIX_DEF.as_bytes(),
            UNK_DEF.as_bytes(),
        );

        let tokenizer = Tokenizer::new(dict);
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("自然言語処理").unwrap();
        worker.tokenize(Mode::Short).unwrap();
        assert_eq!(worker.num_tokens(), 3);

        // The medium-unit word 言語処理 expands into its declared
        // short-unit constituents; 自然 is already a short unit.
        assert_eq!(worker.token(0).surface(), "自然");
        assert_eq!(worker.token(0).range_char(), 0..2);
        assert_eq!(worker.token(1).surface(), "言語");
        assert_eq!(worker.token(1).range_char(), 2..4);
        assert_eq!(worker.token(1).reading(), "ゲンゴ");
        assert_eq!(worker.token(2).surface(), "処理");
        assert_eq!(worker.token(2).range_char(), 4..6);
        assert_eq!(worker.token(2).reading(), "ショリ");
    }

    #[test]
    fn test_tokenize_short_oov_unsplit() {
        let dict = build_test_dictionary(
            LEXICON_CSV.as_bytes(),
            MATRIX_DEF.as_bytes(),
            UNK_DEF.as_bytes(),
        );

        let tokenizer = Tokenizer::new(dict);
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("不自然言語処理").unwrap();
        worker.tokenize(Mode::Short).unwrap();

        // The OOV token never splits.
        assert_eq!(worker.token(0).surface(), "不自然");
        assert!(worker.token(0).is_oov());
    }

    #[test]
    fn test_tokenize_long() {
        let lexicon_csv = "\
自然,0,0,10,名詞,普通名詞,一般,*,シゼン,*,*,A,*
言語,0,0,10,名詞,普通名詞,一般,*,ゲンゴ,*,*,A,*
処理,0,0,3,名詞,普通名詞,一般,*,ショリ,*,*,A,*
自然言語,0,0,2,名詞,普通名詞,一般,*,シゼンゲンゴ,*,*,B,0/1
言語処理,0,0,50,名詞,普通名詞,一般,*,ゲンゴショリ,*,*,B,1/2
自然言語処理,0,0,0,名詞,普通名詞,一般,*,シゼンゲンゴショリ,*,*,C,3/2";
        let dict = build_test_dictionary(
            lexicon_csv.as_bytes(),
            MATRIX_DEF.as_bytes(),
            UNK_DEF.as_bytes(),
        );

        let tokenizer = Tokenizer::new(dict);
        let mut worker = tokenizer.new_worker();

        worker.reset_sentence("自然言語処理").unwrap();
        worker.tokenize(Mode::Medium).unwrap();
        assert_eq!(worker.num_tokens(), 2);
        assert_eq!(worker.token(0).surface(), "自然言語");
        assert_eq!(worker.token(1).surface(), "処理");

        // The medium-unit sequence matches the declared constituents of
        // the long-unit row, so it merges into a single token.
        worker.tokenize(Mode::Long).unwrap();
        assert_eq!(worker.num_tokens(), 1);
        {
            let t = worker.token(0);
            assert_eq!(t.surface(), "自然言語処理");
            assert_eq!(t.range_char(), 0..6);
            assert_eq!(t.reading(), "シゼンゲンゴショリ");
            assert_eq!(t.total_cost(), 5);
        }

        worker.tokenize(Mode::Short).unwrap();
        assert_eq!(worker.num_tokens(), 3);
        assert_eq!(worker.token(0).surface(), "自然");
        assert_eq!(worker.token(1).surface(), "言語");
        assert_eq!(worker.token(2).surface(), "処理");
    }

    #[test]
    fn test_tokenize_long_without_compound() {
        let dict = build_test_dictionary(
            LEXICON_CSV.as_bytes(),
            MATRIX_DEF.as_bytes(),
            UNK_DEF.as_bytes(),
        );

        let tokenizer = Tokenizer::new(dict);
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("自然言語処理").unwrap();
        worker.tokenize(Mode::Long).unwrap();

        // No long-unit row covers this sequence, so the result equals
        // the medium-unit one.
        assert_eq!(worker.num_tokens(), 2);
        assert_eq!(worker.token(0).surface(), "自然");
        assert_eq!(worker.token(1).surface(), "言語処理");
    }

    #[test]
    fn test_user_lexicon() {
        let dict = build_test_dictionary(
            LEXICON_CSV.as_bytes(),
            MATRIX_DEF.as_bytes(),
            UNK_DEF.as_bytes(),
        );
        let user_csv = "自然言語処理,0,0,0,名詞,固有名詞,一般,*,シゼンゲンゴショリ,*,*,A,*";
        let dict = dict
            .reset_user_lexicon_from_reader(Some(user_csv.as_bytes()))
            .unwrap();

        let tokenizer = Tokenizer::new(dict);
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("自然言語処理").unwrap();
        worker.tokenize(Mode::Medium).unwrap();

        assert_eq!(worker.num_tokens(), 1);
        let t = worker.token(0);
        assert_eq!(t.surface(), "自然言語処理");
        assert_eq!(t.lex_type(), LexType::User);
        assert_eq!(t.pos(), "名詞,固有名詞,一般,*");
    }

    #[test]
    fn test_max_grouping_len() {
        let dict = build_test_dictionary(
            LEXICON_CSV.as_bytes(),
            MATRIX_DEF.as_bytes(),
            UNK_DEF.as_bytes(),
        );

        // Six unknown kanji exceed the default grouping limit of four.
        let tokenizer = Tokenizer::new(dict);
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("東京特許許可").unwrap();
        worker.tokenize(Mode::Medium).unwrap();
        assert_eq!(worker.num_tokens(), 2);
        assert_eq!(worker.token(0).surface(), "東京");
        assert_eq!(worker.token(1).surface(), "特許許可");

        let tokenizer = tokenizer.max_grouping_len(0);
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence("東京特許許可").unwrap();
        worker.tokenize(Mode::Medium).unwrap();
        assert_eq!(worker.num_tokens(), 1);
        assert_eq!(worker.token(0).surface(), "東京特許許可");
    }
}
