//! 単語マッピングとトライ構造
//!
//! このモジュールは、単語をトライ構造で効率的に検索するための
//! データ構造を提供します。同じ表層形を持つ複数の単語IDは
//! ポスティングリストにまとめて格納されます。

pub mod posting;
pub mod trie;

use std::collections::BTreeMap;

use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::lexicon::map::posting::{Postings, PostingsBuilder};
use crate::dictionary::lexicon::map::trie::Trie;
use crate::errors::Result;
use crate::utils::FromU32;

/// 単語をトライ構造で管理するマップ
#[derive(Archive, Serialize, Deserialize)]
pub struct WordMap {
    trie: Trie,
    postings: Postings,
}

impl WordMap {
    /// 単語のイテレータから新しいインスタンスを作成します。
    ///
    /// 単語IDはイテレータでの出現順(0始まり)で割り当てられます。
    pub fn new<I, W>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let mut b = WordMapBuilder::new();
        for (i, w) in words.into_iter().enumerate() {
            b.add_record(w.as_ref().to_string(), u32::try_from(i)?);
        }
        b.build()
    }

    /// 共通接頭辞検索を実行し、マッチした単語ごとにコールバックを呼び出します。
    ///
    /// # 引数
    ///
    /// * `input` - 検索対象の文字列
    /// * `f` - 単語IDとマッチ文字長を受け取るコールバック
    #[inline(always)]
    pub fn common_prefix_scan<F>(&self, input: &str, mut f: F)
    where
        F: FnMut(u32, usize),
    {
        self.trie.common_prefix_scan(input, |e| {
            for word_id in self.postings.ids(usize::from_u32(e.value)) {
                f(word_id, e.end_char);
            }
        });
    }
}

/// 単語マップを構築するビルダー
#[derive(Default)]
pub struct WordMapBuilder {
    map: BTreeMap<String, Vec<u32>>,
}

impl WordMapBuilder {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn add_record(&mut self, word: String, id: u32) {
        self.map.entry(word).or_default().push(id);
    }

    pub fn build(self) -> Result<WordMap> {
        let mut entries = vec![];
        let mut builder = PostingsBuilder::new();
        for (word, ids) in self.map {
            let offset = builder.push(&ids)?;
            entries.push((word, u32::try_from(offset)?));
        }
        Ok(WordMap {
            trie: Trie::from_records(&entries)?,
            postings: builder.build(),
        })
    }
}

impl ArchivedWordMap {
    /// 共通接頭辞検索を実行します（アーカイブ版）。
    #[inline(always)]
    pub fn common_prefix_scan<F>(&self, input: &str, mut f: F)
    where
        F: FnMut(u32, usize),
    {
        self.trie.common_prefix_scan(input, |e| {
            for word_id in self.postings.ids(usize::from_u32(e.value)) {
                f(word_id.to_native(), e.end_char);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homographs_share_postings() {
        // Two ids registered under the same surface come back together.
        let map = WordMap::new(["東京", "京都", "東京"]).unwrap();
        let mut matched = vec![];
        map.common_prefix_scan("東京都", |word_id, end_char| {
            matched.push((word_id, end_char));
        });
        matched.sort_unstable();
        assert_eq!(matched, vec![(0, 2), (2, 2)]);
    }
}
