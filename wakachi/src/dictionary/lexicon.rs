//! 辞書の語彙情報を管理するモジュール
//!
//! このモジュールは、単語の表層形、パラメータ、語彙情報を管理する
//! 語彙データ構造を提供します。
//!
//! 語彙のソースは13フィールドのCSVです:
//!
//! ```text
//! 表層形,左文脈ID,右文脈ID,コスト,品詞1,品詞2,品詞3,品詞4,読み,正規化形,辞書形,階層,分割
//! ```
//!
//! - 正規化形の `*` は表層形と同一であることを表します。
//! - 辞書形は `*` (自身が辞書形)または辞書形の行番号です。
//! - 階層は `A` (短単位)、`B` (中単位)、`C` (長単位)のいずれかです。
//! - 分割は `*` (なし)または `/` 区切りの行番号リストです。B行はA行への
//!   短単位分割を、C行はA/B行からなる構成列を宣言します。A行は常に `*` です。

pub mod compound;
mod info;
mod map;
mod param;

use std::io::Read;

use csv_core::ReadFieldResult;
use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::connector::ConnectorView;
use crate::dictionary::lexicon::compound::{CompoundIndex, CompoundIndexBuilder};
use crate::dictionary::lexicon::info::{PosTableBuilder, WordInfos};
use crate::dictionary::lexicon::map::{WordMap, WordMapBuilder};
use crate::dictionary::lexicon::param::WordParams;
use crate::dictionary::word_idx::WordIdx;
use crate::dictionary::LexType;
use crate::errors::{Result, WakachiError};
use crate::utils::FromU32;

pub use crate::dictionary::lexicon::info::{ArchivedWordInfo, Tier, WordInfo};
pub use crate::dictionary::lexicon::param::WordParam;

/// 単語の語彙情報
#[derive(Archive, Serialize, Deserialize)]
pub struct Lexicon {
    map: WordMap,
    params: WordParams,
    infos: WordInfos,
    compounds: CompoundIndex,
    lex_type: LexType,
}

impl Lexicon {
    /// 入力文字列の接頭辞に一致する単語をコールバックへ通知します。
    ///
    /// 通知されるのはラティスに参加する短単位(A)と中単位(B)のみです。
    /// 長単位(C)はトライに登録されないため、ここからは現れません。
    ///
    /// # 引数
    ///
    /// * `input` - 入力文字列
    /// * `f` - 一致ごとに呼び出されるコールバック
    #[inline(always)]
    pub fn common_prefix_scan<F>(&self, input: &str, mut f: F)
    where
        F: FnMut(LexMatch),
    {
        self.map.common_prefix_scan(input, |word_id, end_char| {
            f(LexMatch::new(
                WordIdx::new(self.lex_type, word_id),
                self.params.get(usize::from_u32(word_id)),
                end_char,
            ));
        });
    }

    /// 単語のパラメータを取得します。
    ///
    /// # 引数
    ///
    /// * `word_idx` - 単語インデックス
    ///
    /// # 戻り値
    ///
    /// 単語パラメータ
    #[inline(always)]
    pub fn word_param(&self, word_idx: WordIdx) -> WordParam {
        debug_assert_eq!(word_idx.lex_type, self.lex_type);
        self.params.get(usize::from_u32(word_idx.word_id))
    }

    /// 単語の語彙情報を取得します。
    #[inline(always)]
    pub fn word_info(&self, word_idx: WordIdx) -> &WordInfo {
        debug_assert_eq!(word_idx.lex_type, self.lex_type);
        self.infos.get(usize::from_u32(word_idx.word_id))
    }

    /// 単語の品詞パス文字列を取得します。
    #[inline(always)]
    pub fn word_pos(&self, word_idx: WordIdx) -> &str {
        debug_assert_eq!(word_idx.lex_type, self.lex_type);
        self.infos.word_pos(usize::from_u32(word_idx.word_id))
    }

    /// 指定の単語を先頭構成語とする複合語エントリの単語IDをバッファへ
    /// 書き出します。
    #[inline(always)]
    pub fn compound_candidates_to(&self, word_id: u32, out: &mut Vec<u32>) {
        out.clear();
        out.extend(self.compounds.candidates(word_id));
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
        for i in 0..self.params.len() {
            let p = self.params.get(i);
            if conn.num_left() <= usize::from(p.left_id) {
                return false;
            }
            if conn.num_right() <= usize::from(p.right_id) {
                return false;
            }
        }
        true
    }

    /// エントリのリストから新しいインスタンスを構築します。
    ///
    /// # 引数
    ///
    /// * `entries` - 単語エントリのスライス
    /// * `lex_type` - 辞書の種類
    ///
    /// # 戻り値
    ///
    /// 成功時は `Ok(Lexicon)` を返します。
    ///
    /// # エラー
    ///
    /// 参照や階層の制約に違反するエントリが含まれる場合、または構築に
    /// 失敗した場合にエラーを返します。
    pub fn from_entries(entries: &[RawWordEntry], lex_type: LexType) -> Result<Self> {
        Self::validate_entries(entries)?;

        let mut map_builder = WordMapBuilder::new();
        for (word_id, entry) in entries.iter().enumerate() {
            if entry.tier != Tier::Long {
                map_builder.add_record(entry.surface.clone(), u32::try_from(word_id)?);
            }
        }
        let map = map_builder.build()?;

        let params = WordParams::new(entries.iter().map(|e| e.param));

        let mut pos_builder = PosTableBuilder::new();
        let mut infos = Vec::with_capacity(entries.len());
        for entry in entries {
            let pos_id = pos_builder.intern(&entry.pos).ok_or_else(|| {
                WakachiError::invalid_argument(
                    "entries",
                    "the number of unique POS paths must not exceed 65536",
                )
            })?;
            let dict_form = match entry.dict_form_ref {
                Some(i) => entries[usize::from_u32(i)].surface.clone(),
                None => entry.surface.clone(),
            };
            infos.push(WordInfo {
                surface: entry.surface.clone(),
                pos_id,
                tier: entry.tier,
                reading: entry.reading.clone(),
                normalized: entry.normalized.clone(),
                dict_form,
                splits: entry.split_refs.clone(),
            });
        }
        let infos = WordInfos::new(pos_builder.build(), infos);

        let mut compound_builder = CompoundIndexBuilder::new();
        for (word_id, entry) in entries.iter().enumerate() {
            if entry.tier == Tier::Long {
                compound_builder.add_record(entry.split_refs[0], u32::try_from(word_id)?);
            }
        }
        let compounds = compound_builder.build(entries.len())?;

        Ok(Self {
            map,
            params,
            infos,
            compounds,
            lex_type,
        })
    }

    /// CSV形式の辞書ファイルから新しいインスタンスを構築します。
    ///
    /// # 引数
    ///
    /// * `rdr` - 辞書ファイルのリーダー
    /// * `lex_type` - 辞書の種類
    ///
    /// # 戻り値
    ///
    /// 成功時は `Ok(Lexicon)` を返します。
    ///
    /// # エラー
    ///
    /// ファイルフォーマットが不正な場合にエラーを返します。
    pub fn from_reader<R>(mut rdr: R, lex_type: LexType) -> Result<Self>
    where
        R: Read,
    {
        let mut buf = vec![];
        rdr.read_to_end(&mut buf)?;

        let entries = Self::parse_csv(&buf, "lexicon.csv")?;

        Self::from_entries(&entries, lex_type)
    }

    /// 行参照と階層の制約を検証します。
    fn validate_entries(entries: &[RawWordEntry]) -> Result<()> {
        for (word_id, entry) in entries.iter().enumerate() {
            if let Some(i) = entry.dict_form_ref {
                if entries.get(usize::from_u32(i)).is_none() {
                    let msg =
                        format!("a dictionary form reference is out of range, word_id={word_id}");
                    return Err(WakachiError::invalid_argument("entries", msg));
                }
            }
            match entry.tier {
                Tier::Short => {
                    if !entry.split_refs.is_empty() {
                        let msg = format!("a short-unit row must not declare splits, word_id={word_id}");
                        return Err(WakachiError::invalid_argument("entries", msg));
                    }
                }
                Tier::Medium => {
                    Self::validate_splits(entries, word_id, entry, &[Tier::Short])?;
                }
                Tier::Long => {
                    if entry.split_refs.len() < 2 {
                        let msg = format!(
                            "a long-unit row must declare two or more constituents, word_id={word_id}"
                        );
                        return Err(WakachiError::invalid_argument("entries", msg));
                    }
                    Self::validate_splits(entries, word_id, entry, &[Tier::Short, Tier::Medium])?;
                }
            }
        }
        Ok(())
    }

    /// 分割参照の範囲・階層・表層形の連結を検証します。
    fn validate_splits(
        entries: &[RawWordEntry],
        word_id: usize,
        entry: &RawWordEntry,
        allowed: &[Tier],
    ) -> Result<()> {
        let mut concat = String::new();
        for &i in &entry.split_refs {
            let constituent = entries.get(usize::from_u32(i)).ok_or_else(|| {
                let msg = format!("a split reference is out of range, word_id={word_id}");
                WakachiError::invalid_argument("entries", msg)
            })?;
            if !allowed.contains(&constituent.tier) {
                let msg = format!("a split reference has a wrong tier, word_id={word_id}");
                return Err(WakachiError::invalid_argument("entries", msg));
            }
            concat.push_str(&constituent.surface);
        }
        if !entry.split_refs.is_empty() && concat != entry.surface {
            let msg = format!(
                "the concatenation of split surfaces must equal the parent surface, word_id={word_id}"
            );
            return Err(WakachiError::invalid_argument("entries", msg));
        }
        Ok(())
    }

    pub(crate) fn parse_csv(mut bytes: &[u8], name: &'static str) -> Result<Vec<RawWordEntry>> {
        let mut entries = vec![];

        let mut rdr = csv_core::Reader::new();
        let mut output = [0; 4096];
        let mut field_len = 0;
        let mut fields: Vec<String> = vec![];

        loop {
            let (result, nin, nout) = rdr.read_field(bytes, &mut output[field_len..]);
            let record_end = match result {
                ReadFieldResult::InputEmpty => {
                    field_len += nout;
                    false
                }
                ReadFieldResult::OutputFull => {
                    return Err(WakachiError::invalid_format(name, "Field too large"))
                }
                ReadFieldResult::Field { record_end } => {
                    field_len += nout;
                    fields.push(std::str::from_utf8(&output[..field_len])?.to_string());
                    field_len = 0;
                    record_end
                }
                ReadFieldResult::End => break,
            };
            bytes = &bytes[nin..];
            if record_end {
                if let Some(entry) = Self::parse_record(&fields, name)? {
                    entries.push(entry);
                }
                fields.clear();
            }
        }
        Ok(entries)
    }

    /// 1レコード分のフィールド列をパースします。
    ///
    /// 空行と表層形が空の行は`None`を返してスキップします。
    fn parse_record(fields: &[String], name: &'static str) -> Result<Option<RawWordEntry>> {
        if fields.len() == 1 && fields[0].is_empty() {
            return Ok(None);
        }
        if fields.len() != 13 {
            let msg = format!(
                "A csv row of lexicon must have 13 fields, {:?}",
                fields.join(","),
            );
            return Err(WakachiError::invalid_format(name, msg));
        }

        let surface = fields[0].clone();
        if surface.is_empty() {
            log::warn!("Skipped an empty surface, {:?}", fields.join(","));
            return Ok(None);
        }

        let left_id = fields[1].parse()?;
        let right_id = fields[2].parse()?;
        let word_cost = fields[3].parse()?;
        let pos = fields[4..8].join(",");
        let reading = fields[8].clone();
        let normalized = if fields[9] == "*" {
            surface.clone()
        } else {
            fields[9].clone()
        };
        let dict_form_ref = if fields[10] == "*" {
            None
        } else {
            Some(fields[10].parse()?)
        };
        let tier = Tier::from_symbol(&fields[11]).ok_or_else(|| {
            let msg = format!(
                "The tier must be one of A, B, and C, {:?}",
                fields.join(","),
            );
            WakachiError::invalid_format(name, msg)
        })?;
        let split_refs = if fields[12] == "*" {
            vec![]
        } else {
            let mut refs = vec![];
            for i in fields[12].split('/') {
                refs.push(i.parse()?);
            }
            refs
        };

        Ok(Some(RawWordEntry {
            surface,
            param: WordParam::new(left_id, right_id, word_cost),
            pos,
            reading,
            normalized,
            dict_form_ref,
            tier,
            split_refs,
        }))
    }
}

/// 語彙マッチング結果
#[derive(Eq, PartialEq, Debug)]
pub struct LexMatch {
    pub word_idx: WordIdx,
    pub word_param: WordParam,
    pub end_char: usize,
}

impl LexMatch {
    /// 新しいマッチング結果を作成します。
    #[inline(always)]
    pub const fn new(word_idx: WordIdx, word_param: WordParam, end_char: usize) -> Self {
        Self {
            word_idx,
            word_param,
            end_char,
        }
    }
}

/// 生の単語エントリ
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RawWordEntry {
    pub surface: String,
    pub param: WordParam,
    pub pos: String,
    pub reading: String,
    pub normalized: String,
    pub dict_form_ref: Option<u32>,
    pub tier: Tier,
    pub split_refs: Vec<u32>,
}

impl ArchivedLexicon {
    /// 入力文字列の接頭辞に一致する単語をコールバックへ通知します
    /// （アーカイブ版）。
    ///
    /// # 引数
    ///
    /// * `input` - 入力文字列
    /// * `f` - 一致ごとに呼び出されるコールバック
    #[inline(always)]
    pub fn common_prefix_scan<F>(&self, input: &str, mut f: F)
    where
        F: FnMut(LexMatch),
    {
        self.map.common_prefix_scan(input, |word_id, end_char| {
            f(LexMatch::new(
                WordIdx::new(self.lex_type.to_native(), word_id),
                self.params.get(usize::from_u32(word_id)),
                end_char,
            ));
        });
    }

    /// 単語のパラメータを取得します（アーカイブ版）。
    #[inline(always)]
    pub fn word_param(&self, word_idx: WordIdx) -> WordParam {
        debug_assert_eq!(word_idx.lex_type, self.lex_type.to_native());
        self.params.get(usize::from_u32(word_idx.word_id))
    }

    /// 単語の語彙情報を取得します（アーカイブ版）。
    #[inline(always)]
    pub fn word_info(&self, word_idx: WordIdx) -> &ArchivedWordInfo {
        debug_assert_eq!(word_idx.lex_type, self.lex_type.to_native());
        self.infos.get(usize::from_u32(word_idx.word_id))
    }

    /// 単語の品詞パス文字列を取得します（アーカイブ版）。
    #[inline(always)]
    pub fn word_pos(&self, word_idx: WordIdx) -> &str {
        debug_assert_eq!(word_idx.lex_type, self.lex_type.to_native());
        self.infos.word_pos(usize::from_u32(word_idx.word_id))
    }

    /// 指定の単語を先頭構成語とする複合語エントリの単語IDをバッファへ
    /// 書き出します（アーカイブ版）。
    #[inline(always)]
    pub fn compound_candidates_to(&self, word_id: u32, out: &mut Vec<u32>) {
        out.clear();
        out.extend(self.compounds.candidates(word_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEXICON_CSV: &str = "\
東京,1,2,3,名詞,固有名詞,地名,一般,トウキョウ,*,*,A,*
東京都,4,5,6,名詞,固有名詞,地名,一般,トウキョウト,*,*,B,0/4
東京,7,8,9,名詞,普通名詞,一般,*,トウキョウ,*,*,A,*
京都,10,11,12,名詞,固有名詞,地名,一般,キョウト,*,*,A,*
都,13,14,15,名詞,普通名詞,一般,*,ト,*,*,A,*";

    #[test]
    fn test_common_prefix_scan() {
        let lexicon = Lexicon::from_reader(LEXICON_CSV.as_bytes(), LexType::System).unwrap();
        let mut matched = vec![];
        lexicon.common_prefix_scan("東京都", |m| matched.push(m));
        assert_eq!(
            matched,
            vec![
                LexMatch {
                    word_idx: WordIdx::new(LexType::System, 0),
                    word_param: WordParam::new(1, 2, 3),
                    end_char: 2,
                },
                LexMatch {
                    word_idx: WordIdx::new(LexType::System, 2),
                    word_param: WordParam::new(7, 8, 9),
                    end_char: 2,
                },
                LexMatch {
                    word_idx: WordIdx::new(LexType::System, 1),
                    word_param: WordParam::new(4, 5, 6),
                    end_char: 3,
                },
            ]
        );
    }

    #[test]
    fn test_word_info() {
        let lexicon = Lexicon::from_reader(LEXICON_CSV.as_bytes(), LexType::System).unwrap();
        let info = lexicon.word_info(WordIdx::new(LexType::System, 1));
        assert_eq!(info.reading, "トウキョウト");
        assert_eq!(info.normalized, "東京都");
        assert_eq!(info.dict_form, "東京都");
        assert_eq!(info.tier, Tier::Medium);
        assert_eq!(info.splits, vec![0, 4]);
        assert_eq!(
            lexicon.word_pos(WordIdx::new(LexType::System, 1)),
            "名詞,固有名詞,地名,一般"
        );
    }

    #[test]
    fn test_dict_form_reference() {
        let data = "\
行く,1,1,5,動詞,非自立可能,*,*,イク,*,*,A,*
行っ,1,1,7,動詞,非自立可能,*,*,イッ,*,0,A,*";
        let lexicon = Lexicon::from_reader(data.as_bytes(), LexType::System).unwrap();
        let info = lexicon.word_info(WordIdx::new(LexType::System, 1));
        assert_eq!(info.dict_form, "行く");
    }

    #[test]
    fn test_normalized_resolution() {
        let data = "髙島,1,1,5,名詞,固有名詞,人名,姓,タカシマ,高島,*,A,*";
        let lexicon = Lexicon::from_reader(data.as_bytes(), LexType::System).unwrap();
        let info = lexicon.word_info(WordIdx::new(LexType::System, 0));
        assert_eq!(info.normalized, "高島");
    }

    #[test]
    fn test_long_rows_not_scanned() {
        let data = "\
関西,1,1,5,名詞,固有名詞,地名,一般,カンサイ,*,*,A,*
国際,1,1,5,名詞,普通名詞,一般,*,コクサイ,*,*,A,*
空港,1,1,5,名詞,普通名詞,一般,*,クウコウ,*,*,A,*
関西国際空港,1,1,5,名詞,固有名詞,一般,*,カンサイコクサイクウコウ,*,*,C,0/1/2";
        let lexicon = Lexicon::from_reader(data.as_bytes(), LexType::System).unwrap();
        let mut matched = vec![];
        lexicon.common_prefix_scan("関西国際空港", |m| matched.push(m));
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].word_idx.word_id, 0);

        let mut candidates = vec![];
        lexicon.compound_candidates_to(0, &mut candidates);
        assert_eq!(candidates, vec![3]);
    }

    #[test]
    fn test_parse_csv_empty_surface() {
        let data = "\
自然,0,2,1,名詞,普通名詞,一般,*,シゼン,*,*,A,*
,1,0,-4,名詞,普通名詞,一般,*,ゲンゴ,*,*,A,*";
        let result = Lexicon::parse_csv(data.as_bytes(), "test").unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_from_reader_few_cols() {
        let data = "自然,0,2,1,名詞,普通名詞,一般,*,シゼン,*,*,A";
        let result = Lexicon::from_reader(data.as_bytes(), LexType::System);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_reader_invalid_left_id() {
        let data = "自然,-2,2,1,名詞,普通名詞,一般,*,シゼン,*,*,A,*";
        let result = Lexicon::from_reader(data.as_bytes(), LexType::System);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_reader_invalid_cost() {
        let data = "自然,2,1,コスト,名詞,普通名詞,一般,*,シゼン,*,*,A,*";
        let result = Lexicon::from_reader(data.as_bytes(), LexType::System);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_reader_invalid_tier() {
        let data = "自然,0,2,1,名詞,普通名詞,一般,*,シゼン,*,*,D,*";
        let result = Lexicon::from_reader(data.as_bytes(), LexType::System);
        assert!(result.is_err());
    }

    #[test]
    fn test_short_row_with_splits() {
        let data = "\
自然,0,2,1,名詞,普通名詞,一般,*,シゼン,*,*,A,1
言語,1,0,-4,名詞,普通名詞,一般,*,ゲンゴ,*,*,A,*";
        let result = Lexicon::from_reader(data.as_bytes(), LexType::System);
        assert!(result.is_err());
    }

    #[test]
    fn test_split_reference_out_of_range() {
        let data = "自然言語,0,2,1,名詞,普通名詞,一般,*,シゼンゲンゴ,*,*,B,5/6";
        let result = Lexicon::from_reader(data.as_bytes(), LexType::System);
        assert!(result.is_err());
    }

    #[test]
    fn test_split_concatenation_mismatch() {
        let data = "\
自然,0,2,1,名詞,普通名詞,一般,*,シゼン,*,*,A,*
言語,1,0,-4,名詞,普通名詞,一般,*,ゲンゴ,*,*,A,*
自然言語処理,1,0,-4,名詞,普通名詞,一般,*,シゼンゲンゴショリ,*,*,B,0/1";
        let result = Lexicon::from_reader(data.as_bytes(), LexType::System);
        assert!(result.is_err());
    }

    #[test]
    fn test_medium_split_must_reference_short() {
        let data = "\
自然,0,2,1,名詞,普通名詞,一般,*,シゼン,*,*,B,*
言語,1,0,-4,名詞,普通名詞,一般,*,ゲンゴ,*,*,A,*
自然言語,1,0,-4,名詞,普通名詞,一般,*,シゼンゲンゴ,*,*,B,0/1";
        let result = Lexicon::from_reader(data.as_bytes(), LexType::System);
        assert!(result.is_err());
    }

    #[test]
    fn test_long_row_single_constituent() {
        let data = "\
空港,1,1,5,名詞,普通名詞,一般,*,クウコウ,*,*,A,*
空港,1,1,5,名詞,普通名詞,一般,*,クウコウ,*,*,C,0";
        let result = Lexicon::from_reader(data.as_bytes(), LexType::System);
        assert!(result.is_err());
    }

    #[test]
    fn test_verify() {
        use crate::dictionary::connector::MatrixConnector;

        let lexicon = Lexicon::from_reader(LEXICON_CSV.as_bytes(), LexType::System).unwrap();
        let valid = MatrixConnector::from_reader("16 16\n0 0 0".as_bytes()).unwrap();
        assert!(lexicon.verify(&valid));
        let invalid = MatrixConnector::from_reader("4 4\n0 0 0".as_bytes()).unwrap();
        assert!(!lexicon.verify(&invalid));
    }
}
