//! 複合語(長単位)の逆引き索引
//!
//! 長単位(C)のエントリはトライに登録されず、構成列の先頭の単語IDから
//! 引ける索引を通してのみ参照されます。結合処理はこの索引で候補を列挙し、
//! 後続の解析結果が構成列と一致するかを照合します。

use std::collections::BTreeMap;

use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::lexicon::map::posting::{Postings, PostingsBuilder};
use crate::errors::Result;
use crate::utils::FromU32;

/// 複合語参照を持たない単語を表す番兵値
const INVALID_OFFSET: u32 = u32::MAX;

/// 先頭構成語の単語IDから複合語エントリの単語IDを引く索引
#[derive(Default, Archive, Serialize, Deserialize)]
pub struct CompoundIndex {
    offsets: Vec<u32>,
    postings: Postings,
}

impl CompoundIndex {
    /// 指定の単語を先頭構成語とする複合語エントリの単語IDを列挙します。
    ///
    /// # 引数
    ///
    /// * `word_id` - 先頭構成語の単語ID
    ///
    /// # 戻り値
    ///
    /// 複合語エントリの単語IDのイテレータ(該当なしの場合は空)
    #[inline(always)]
    pub fn candidates(&self, word_id: u32) -> impl Iterator<Item = u32> + '_ {
        self.offsets
            .get(usize::from_u32(word_id))
            .copied()
            .filter(|&offset| offset != INVALID_OFFSET)
            .into_iter()
            .flat_map(move |offset| self.postings.ids(usize::from_u32(offset)))
    }
}

impl ArchivedCompoundIndex {
    /// 指定の単語を先頭構成語とする複合語エントリの単語IDを列挙します
    /// （アーカイブ版）。
    #[inline(always)]
    pub fn candidates(&self, word_id: u32) -> impl Iterator<Item = u32> + '_ {
        self.offsets
            .get(usize::from_u32(word_id))
            .map(|offset| offset.to_native())
            .filter(|&offset| offset != INVALID_OFFSET)
            .into_iter()
            .flat_map(move |offset| {
                self.postings
                    .ids(usize::from_u32(offset))
                    .map(|id| id.to_native())
            })
    }
}

/// [`CompoundIndex`] のビルダー
#[derive(Default)]
pub struct CompoundIndexBuilder {
    map: BTreeMap<u32, Vec<u32>>,
}

impl CompoundIndexBuilder {
    /// 新しいビルダーを作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 先頭構成語の単語IDに複合語エントリの単語IDを関連付けます。
    pub fn add_record(&mut self, first_id: u32, compound_id: u32) {
        self.map.entry(first_id).or_default().push(compound_id);
    }

    /// 索引を構築します。
    ///
    /// # 引数
    ///
    /// * `num_words` - 語彙の総単語数(オフセット表の長さ)
    pub fn build(self, num_words: usize) -> Result<CompoundIndex> {
        let mut offsets = vec![INVALID_OFFSET; num_words];
        let mut postings_builder = PostingsBuilder::new();
        for (first_id, compound_ids) in &self.map {
            let offset = postings_builder.push(compound_ids)?;
            offsets[usize::from_u32(*first_id)] = u32::try_from(offset)?;
        }
        Ok(CompoundIndex {
            offsets,
            postings: postings_builder.build(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates() {
        let mut builder = CompoundIndexBuilder::new();
        builder.add_record(1, 5);
        builder.add_record(1, 6);
        builder.add_record(3, 7);
        let index = builder.build(5).unwrap();

        let ids: Vec<_> = index.candidates(1).collect();
        assert_eq!(ids, vec![5, 6]);
        let ids: Vec<_> = index.candidates(3).collect();
        assert_eq!(ids, vec![7]);
    }

    #[test]
    fn test_no_candidates() {
        let mut builder = CompoundIndexBuilder::new();
        builder.add_record(1, 5);
        let index = builder.build(3).unwrap();

        assert_eq!(index.candidates(0).count(), 0);
        assert_eq!(index.candidates(2).count(), 0);
    }

    #[test]
    fn test_out_of_range() {
        let index = CompoundIndexBuilder::new().build(2).unwrap();
        assert_eq!(index.candidates(10).count(), 0);
    }
}
