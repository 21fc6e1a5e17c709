//! 未知語処理モジュール
//!
//! このモジュールは、辞書に登録されていない未知語を処理するための
//! 機能を提供します。未知語テンプレートは`unk.def`形式のCSVから読み込まれ、
//! 文字クラスごとに候補ノードのパラメータと品詞を定義します。

use std::io::{prelude::*, BufReader, Read};
use std::ops::Range;

use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::character::{CharClass, NUM_CHAR_CLASSES};
use crate::dictionary::connector::ConnectorView;
use crate::dictionary::lexicon::WordParam;
use crate::dictionary::word_idx::WordIdx;
use crate::dictionary::LexType;
use crate::errors::{Result, WakachiError};
use crate::sentence::Sentence;
use crate::utils::{self, FromU32};

/// 未知語テンプレートのエントリ
///
/// 文字クラスごとに、未知語ノードへ与える接続IDとコスト、
/// および品詞パスを定義します。
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct UnkEntry {
    /// 文字クラス
    pub char_class: CharClass,
    /// 左文脈ID
    pub left_id: u16,
    /// 右文脈ID
    pub right_id: u16,
    /// 単語コスト
    pub word_cost: i16,
    /// 品詞パス
    pub pos: String,
}

/// 未知語の候補ノード
///
/// ラティスへ挿入する1つの未知語候補を表します。
#[derive(Clone, Copy, Debug)]
pub struct UnkWord {
    begin_char: usize,
    end_char: usize,
    left_id: u16,
    right_id: u16,
    word_cost: i16,
    word_id: u32,
}

impl UnkWord {
    /// 開始文字位置を返します。
    #[inline(always)]
    pub const fn begin_char(&self) -> usize {
        self.begin_char
    }

    /// 終了文字位置を返します。
    #[inline(always)]
    pub const fn end_char(&self) -> usize {
        self.end_char
    }

    /// 単語パラメータを返します。
    #[inline(always)]
    pub const fn word_param(&self) -> WordParam {
        WordParam::new(self.left_id, self.right_id, self.word_cost)
    }

    /// 単語インデックスを返します。
    #[inline(always)]
    pub const fn word_idx(&self) -> WordIdx {
        WordIdx::new(LexType::Unknown, self.word_id)
    }
}

/// 未知語ハンドラー
///
/// 文字クラスごとの未知語テンプレートを保持し、辞書に一致のなかった
/// 開始位置へ候補ノードを生成します。テンプレートを持たないクラスは
/// `DEFAULT`クラスのテンプレートへフォールバックします。
#[derive(Archive, Serialize, Deserialize)]
pub struct UnkHandler {
    /// 文字クラスでインデックス化されたオフセット配列
    offsets: Vec<usize>,
    /// 未知語エントリの配列(文字クラス順)
    entries: Vec<UnkEntry>,
}

impl UnkHandler {
    /// `unk.def` 形式のCSVから新しいインスタンスを構築します。
    ///
    /// 各行は `クラス名,左文脈ID,右文脈ID,コスト,品詞1,品詞2,品詞3,品詞4`
    /// の8フィールドです。同一クラスの複数行はそれぞれ候補になります。
    /// `DEFAULT` クラスの行は必須です。
    ///
    /// # 引数
    ///
    /// * `rdr` - `unk.def` ファイルのリーダー
    ///
    /// # 戻り値
    ///
    /// 成功時は `Ok(UnkHandler)` を返します。
    ///
    /// # エラー
    ///
    /// ファイルフォーマットが不正な場合にエラーを返します。
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut parsed: Vec<Vec<UnkEntry>> = vec![vec![]; NUM_CHAR_CLASSES];
        let reader = BufReader::new(rdr);
        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let entry = Self::parse_unk_entry(&line)?;
            parsed[entry.char_class.as_index()].push(entry);
        }

        if parsed[CharClass::Default.as_index()].is_empty() {
            return Err(WakachiError::invalid_format(
                "unk.def",
                "a row of the DEFAULT class is required",
            ));
        }

        let mut offsets = Vec::with_capacity(NUM_CHAR_CLASSES + 1);
        let mut entries = vec![];
        offsets.push(0);
        for class_entries in parsed {
            entries.extend(class_entries);
            offsets.push(entries.len());
        }
        Ok(Self { offsets, entries })
    }

    /// `unk.def` の1行をパースします。
    fn parse_unk_entry(line: &str) -> Result<UnkEntry> {
        let fields = utils::parse_csv_row(line);
        if fields.len() != 8 {
            let msg = format!("A csv row of unk.def must have eight fields, {line}");
            return Err(WakachiError::invalid_format("unk.def", msg));
        }

        let char_class = CharClass::from_name(&fields[0]).ok_or_else(|| {
            let msg = format!("Undefined character class, {line}");
            WakachiError::invalid_format("unk.def", msg)
        })?;
        let left_id = fields[1].parse()?;
        let right_id = fields[2].parse()?;
        let word_cost = fields[3].parse()?;
        let pos = fields[4..8].join(",");

        Ok(UnkEntry {
            char_class,
            left_id,
            right_id,
            word_cost,
            pos,
        })
    }

    /// 指定の開始位置に対する未知語候補をコールバックへ通知します。
    ///
    /// 辞書に一致があった開始位置では何も生成しません。グループ化可能な
    /// クラスでは、同一クラスの連続長と`max_grouping_len`の小さい方を
    /// 上限として、1文字からの各長さの候補を生成します。空白と句読点は
    /// 常に1文字の候補のみ生成します。
    ///
    /// # 引数
    ///
    /// * `sent` - 解析対象の文
    /// * `start_char` - 開始文字位置
    /// * `has_matched` - この位置に辞書の一致があったかどうか
    /// * `max_grouping_len` - グループ化の最大長(0は無制限)
    /// * `f` - 候補ごとに呼び出されるコールバック
    #[inline(always)]
    pub fn gen_unk_words<F>(
        &self,
        sent: &Sentence,
        start_char: usize,
        has_matched: bool,
        max_grouping_len: usize,
        mut f: F,
    ) where
        F: FnMut(UnkWord),
    {
        if has_matched {
            return;
        }

        let class = sent.char_class(start_char);
        let max_len = Self::grouping_len(class, sent.groupable(start_char), max_grouping_len);
        for word_id in self.range(class) {
            let e = &self.entries[word_id];
            for len in 1..=max_len {
                f(UnkWord {
                    begin_char: start_char,
                    end_char: start_char + len,
                    left_id: e.left_id,
                    right_id: e.right_id,
                    word_cost: e.word_cost,
                    word_id: u32::try_from(word_id).unwrap(),
                });
            }
        }
    }

    #[inline(always)]
    fn grouping_len(class: CharClass, groupable: usize, max_grouping_len: usize) -> usize {
        if !class.is_groupable() {
            return 1;
        }
        if max_grouping_len == 0 {
            groupable
        } else {
            groupable.min(max_grouping_len)
        }
    }

    /// クラスに対応するエントリ範囲を返します。
    ///
    /// クラスにエントリがない場合は`DEFAULT`クラスの範囲を返します。
    #[inline(always)]
    fn range(&self, class: CharClass) -> Range<usize> {
        let i = class.as_index();
        let range = self.offsets[i]..self.offsets[i + 1];
        if range.is_empty() {
            let i = CharClass::Default.as_index();
            self.offsets[i]..self.offsets[i + 1]
        } else {
            range
        }
    }

    /// 未知語の単語パラメータを取得します。
    #[inline(always)]
    pub fn word_param(&self, word_idx: WordIdx) -> WordParam {
        debug_assert_eq!(word_idx.lex_type, LexType::Unknown);
        let e = &self.entries[usize::from_u32(word_idx.word_id)];
        WordParam::new(e.left_id, e.right_id, e.word_cost)
    }

    /// 未知語の品詞パス文字列を取得します。
    #[inline(always)]
    pub fn word_pos(&self, word_idx: WordIdx) -> &str {
        debug_assert_eq!(word_idx.lex_type, LexType::Unknown);
        &self.entries[usize::from_u32(word_idx.word_id)].pos
    }

    /// 左右の文脈IDがコネクターで有効かどうかをチェックします。
    ///
    /// # 引数
    ///
    /// * `conn` - コネクター
    ///
    /// # 戻り値
    ///
    /// すべてのIDが有効な場合は `true`
    pub fn verify<C>(&self, conn: &C) -> bool
    where
        C: ConnectorView,
    {
        for e in &self.entries {
            if conn.num_left() <= usize::from(e.left_id) {
                return false;
            }
            if conn.num_right() <= usize::from(e.right_id) {
                return false;
            }
        }
        true
    }
}

impl ArchivedUnkHandler {
    /// 指定の開始位置に対する未知語候補をコールバックへ通知します
    /// （アーカイブ版）。
    #[inline(always)]
    pub fn gen_unk_words<F>(
        &self,
        sent: &Sentence,
        start_char: usize,
        has_matched: bool,
        max_grouping_len: usize,
        mut f: F,
    ) where
        F: FnMut(UnkWord),
    {
        if has_matched {
            return;
        }

        let class = sent.char_class(start_char);
        let max_len = UnkHandler::grouping_len(class, sent.groupable(start_char), max_grouping_len);
        for word_id in self.range(class) {
            let e = &self.entries[word_id];
            for len in 1..=max_len {
                f(UnkWord {
                    begin_char: start_char,
                    end_char: start_char + len,
                    left_id: e.left_id.to_native(),
                    right_id: e.right_id.to_native(),
                    word_cost: e.word_cost.to_native(),
                    word_id: u32::try_from(word_id).unwrap(),
                });
            }
        }
    }

    #[inline(always)]
    fn range(&self, class: CharClass) -> Range<usize> {
        let i = class.as_index();
        let range = self.offsets[i].to_native() as usize..self.offsets[i + 1].to_native() as usize;
        if range.is_empty() {
            let i = CharClass::Default.as_index();
            self.offsets[i].to_native() as usize..self.offsets[i + 1].to_native() as usize
        } else {
            range
        }
    }

    /// 未知語の単語パラメータを取得します（アーカイブ版）。
    #[inline(always)]
    pub fn word_param(&self, word_idx: WordIdx) -> WordParam {
        debug_assert_eq!(word_idx.lex_type, LexType::Unknown);
        let e = &self.entries[usize::from_u32(word_idx.word_id)];
        WordParam::new(
            e.left_id.to_native(),
            e.right_id.to_native(),
            e.word_cost.to_native(),
        )
    }

    /// 未知語の品詞パス文字列を取得します（アーカイブ版）。
    #[inline(always)]
    pub fn word_pos(&self, word_idx: WordIdx) -> &str {
        debug_assert_eq!(word_idx.lex_type, LexType::Unknown);
        &self.entries[usize::from_u32(word_idx.word_id)].pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNK_DEF: &str = "\
DEFAULT,0,0,4000,補助記号,一般,*,*
KANJI,1,1,3000,名詞,普通名詞,一般,*
KANJI,2,2,5000,動詞,一般,*,*
KATAKANA,3,3,2500,名詞,普通名詞,一般,*
SPACE,4,4,1000,空白,*,*,*";

    fn compiled(text: &str) -> Sentence {
        let mut sent = Sentence::new();
        sent.set_sentence(text);
        sent.compile();
        sent
    }

    #[test]
    fn test_gen_unk_words_kanji() {
        let unk = UnkHandler::from_reader(UNK_DEF.as_bytes()).unwrap();
        let sent = compiled("漢漢漢漢漢漢");
        let mut words = vec![];
        unk.gen_unk_words(&sent, 0, false, 4, |w| words.push(w));
        // Two KANJI templates, four lengths each.
        assert_eq!(words.len(), 8);
        for w in &words {
            assert_eq!(w.begin_char(), 0);
            assert!((1..=4).contains(&(w.end_char() - w.begin_char())));
        }
    }

    #[test]
    fn test_gen_unk_words_unlimited() {
        let unk = UnkHandler::from_reader(UNK_DEF.as_bytes()).unwrap();
        let sent = compiled("漢漢漢漢漢漢");
        let mut words = vec![];
        unk.gen_unk_words(&sent, 0, false, 0, |w| words.push(w));
        assert_eq!(words.len(), 12);
    }

    #[test]
    fn test_gen_unk_words_matched() {
        let unk = UnkHandler::from_reader(UNK_DEF.as_bytes()).unwrap();
        let sent = compiled("漢漢漢");
        let mut words = vec![];
        unk.gen_unk_words(&sent, 0, true, 4, |w| words.push(w));
        assert!(words.is_empty());
    }

    #[test]
    fn test_gen_unk_words_punct_single_char() {
        let unk = UnkHandler::from_reader(UNK_DEF.as_bytes()).unwrap();
        let sent = compiled("。。。");
        let mut words = vec![];
        unk.gen_unk_words(&sent, 0, false, 4, |w| words.push(w));
        // PUNCT falls back to the DEFAULT template and is never grouped.
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].end_char(), 1);
        assert_eq!(words[0].word_param(), WordParam::new(0, 0, 4000));
    }

    #[test]
    fn test_fallback_pos() {
        let unk = UnkHandler::from_reader(UNK_DEF.as_bytes()).unwrap();
        let sent = compiled("ひらがな");
        let mut words = vec![];
        unk.gen_unk_words(&sent, 0, false, 1, |w| words.push(w));
        assert_eq!(words.len(), 1);
        assert_eq!(unk.word_pos(words[0].word_idx()), "補助記号,一般,*,*");
    }

    #[test]
    fn test_missing_default() {
        let data = "KANJI,1,1,3000,名詞,普通名詞,一般,*";
        assert!(UnkHandler::from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_invalid_class_name() {
        let data = "\
DEFAULT,0,0,4000,補助記号,一般,*,*
GREEK,1,1,3000,名詞,普通名詞,一般,*";
        assert!(UnkHandler::from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_few_fields() {
        let data = "DEFAULT,0,0,4000,補助記号";
        assert!(UnkHandler::from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_verify() {
        use crate::dictionary::connector::MatrixConnector;

        let unk = UnkHandler::from_reader(UNK_DEF.as_bytes()).unwrap();
        let valid = MatrixConnector::from_reader("5 5\n0 0 0".as_bytes()).unwrap();
        assert!(unk.verify(&valid));
        let invalid = MatrixConnector::from_reader("3 3\n0 0 0".as_bytes()).unwrap();
        assert!(!unk.verify(&invalid));
    }
}
